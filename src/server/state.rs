//! Shared application state.

use std::sync::Arc;

use crate::engine::MatchEngine;
use crate::server::config::ServerConfig;
use crate::server::error::ServerResult;
use crate::source::{HttpImageSource, ImageSource};
use crate::store::RedbStore;

/// State shared across all request handlers.
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<ServerConfig>,

    /// Matching engine; owns the registry, loaded before serving starts.
    pub engine: Arc<MatchEngine>,

    /// Resolves image URLs to bytes.
    pub source: Arc<dyn ImageSource>,
}

impl ServerState {
    /// Production state: redb-backed store, HTTP image source. Performs the
    /// startup load, so construction fails if the store is unreadable (or,
    /// under `StartupPolicy::Abort`, if any persisted entry is corrupt).
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let store = Arc::new(
            RedbStore::open(&config.db_path)
                .map_err(crate::error::EngineError::from)?,
        );
        let engine = Arc::new(MatchEngine::open(config.engine, store)?);

        Ok(Self {
            config: Arc::new(config),
            engine,
            source: Arc::new(HttpImageSource::new()),
        })
    }

    /// Assemble state from pre-built parts. Used by tests to inject an
    /// in-memory store and a canned image source.
    pub fn with_parts(
        config: ServerConfig,
        engine: Arc<MatchEngine>,
        source: Arc<dyn ImageSource>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            engine,
            source,
        }
    }
}
