//! Crate-level error aggregation for engine operations.

use thiserror::Error;

use crate::color::ConvertError;
use crate::decode::DecodeError;
use crate::distance::CompareError;
use crate::store::StoreError;

/// Errors surfaced by [`crate::engine::MatchEngine`] operations.
///
/// `DuplicateRejected` is deliberately not here: rejecting a duplicate is a
/// defined outcome of register, not a failure.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("color conversion failed: {0}")]
    Convert(#[from] ConvertError),

    /// Mismatched fingerprint bin layouts. Unreachable while the layout is
    /// fixed process-wide.
    #[error("fingerprint comparison failed: {0}")]
    Compare(#[from] CompareError),

    #[error("persistence failed: {0}")]
    Store(#[from] StoreError),

    /// Startup load hit a corrupt persisted entry under
    /// [`crate::config::StartupPolicy::Abort`].
    #[error("startup load failed on persisted entry {id}: {source}")]
    StartupLoad {
        id: u64,
        #[source]
        source: Box<EngineError>,
    },
}
