//! # histmatch
//!
//! Near-duplicate image detection over color-distribution fingerprints.
//!
//! A submitted image is decoded, converted to HSV, and tallied into a
//! three-channel histogram [`Fingerprint`]. Known fingerprints live in an
//! ordered, append-only registry backed by a durable [`BlobStore`];
//! querying scans that registry in insertion order and reports the first
//! entry whose per-channel Bhattacharyya distances all clear the match
//! threshold. Registering rejects images whose fingerprint is exactly equal
//! to a known one.
//!
//! ## Core types
//!
//! - [`Fingerprint`]: three fixed-layout bin-count vectors (H, S, V).
//! - [`MatchEngine`]: owns the registry; serves [`MatchEngine::register`],
//!   [`MatchEngine::query`], and [`MatchEngine::list_known`].
//! - [`BlobStore`]: persistence collaborator ([`RedbStore`] for durable
//!   deployments, [`MemoryStore`] for tests).
//! - [`ImageDecoder`] / [`ImageSource`]: byte-level collaborators for
//!   decoding and fetching.
//!
//! ## Example
//!
//! ```
//! use histmatch::{Fingerprint, channel_distances, within_threshold};
//!
//! let a = Fingerprint::from_channels(256, [vec![4, 0], vec![2, 2], vec![0, 4]])?;
//! let b = Fingerprint::from_channels(256, [vec![4, 0], vec![2, 2], vec![0, 4]])?;
//!
//! let distances = channel_distances(&a, &b)?;
//! assert_eq!(distances, [0.0, 0.0, 0.0]);
//! assert!(within_threshold(&distances, 0.25));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The HTTP surface (URL-based register/check endpoints) lives in
//! [`server`] behind the `server` feature; the engine itself is synchronous
//! and runtime-free.

pub mod color;
pub mod config;
pub mod decode;
pub mod distance;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod registry;
pub mod source;
pub mod store;

#[cfg(feature = "server")]
pub mod server;

pub use crate::color::{ConvertError, HsvImage, to_hsv};
pub use crate::config::{EngineConfig, FingerprintConfig, StartupPolicy};
pub use crate::decode::{DecodeError, ImageDecoder, PixelGrid, RasterDecoder};
pub use crate::distance::{CompareError, channel_distances, combined_score, within_threshold};
pub use crate::engine::{MatchEngine, QueryOutcome, RegisterOutcome};
pub use crate::error::EngineError;
pub use crate::fingerprint::{Fingerprint, FingerprintError, fingerprint_image};
pub use crate::registry::{Registry, RegistryEntry, ScanHit};
pub use crate::source::{FetchError, ImageSource};
pub use crate::store::{BlobStore, MemoryStore, RedbStore, StoreError};

#[cfg(feature = "server")]
pub use crate::source::HttpImageSource;
