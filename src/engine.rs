//! The matching engine: owns the registry and serves register/query.
//!
//! Both operations run the same pure pipeline (decode, convert to HSV,
//! fingerprint) and then diverge: register probes for an exact duplicate and
//! appends, query runs the first-acceptable similarity scan. The registry
//! is rebuilt from the blob store once, before the engine serves anything.
//!
//! # Consistency
//!
//! Register persists first and appends to the in-memory registry only after
//! the store reports durability. A failed persist leaves the registry
//! exactly as it was; there is no partial commit.
//!
//! # Concurrency
//!
//! Queries scan under a read lock and may run concurrently with each other.
//! Registers are serialized by a writer gate held across the duplicate
//! probe, the persist, and the append, so two concurrent registers of the
//! same image cannot both pass the probe. The registry write lock itself is
//! held only for the instant of the append; an in-flight query observes
//! either the complete pre-append or complete post-append registry.

use std::sync::{Arc, Mutex, RwLock};

use bytes::Bytes;

use crate::color::to_hsv;
use crate::config::{EngineConfig, StartupPolicy};
use crate::decode::{ImageDecoder, RasterDecoder};
use crate::error::EngineError;
use crate::fingerprint::{Fingerprint, fingerprint_image};
use crate::registry::Registry;
use crate::store::BlobStore;

/// Outcome of a register call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// The image was persisted and added to the registry.
    Registered { id: u64 },
    /// An exactly-equal fingerprint is already registered; nothing changed.
    DuplicateRejected,
}

/// Outcome of a query call.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// First registry entry (in insertion order) whose channel distances
    /// are all strictly below the threshold.
    Match { id: u64, score: f64 },
    NoMatch,
}

/// Near-duplicate matching engine over a durable blob store.
pub struct MatchEngine {
    config: EngineConfig,
    decoder: Box<dyn ImageDecoder>,
    store: Arc<dyn BlobStore>,
    registry: RwLock<Registry>,
    /// Serializes registers across the probe-persist-append sequence.
    register_gate: Mutex<()>,
}

impl MatchEngine {
    /// Build an engine with the default raster decoder, loading every
    /// persisted entry into the registry before returning.
    pub fn open(config: EngineConfig, store: Arc<dyn BlobStore>) -> Result<Self, EngineError> {
        Self::with_decoder(config, store, Box::new(RasterDecoder))
    }

    /// Build an engine with a custom decoder.
    pub fn with_decoder(
        config: EngineConfig,
        store: Arc<dyn BlobStore>,
        decoder: Box<dyn ImageDecoder>,
    ) -> Result<Self, EngineError> {
        let engine = Self {
            config,
            decoder,
            store,
            registry: RwLock::new(Registry::new()),
            register_gate: Mutex::new(()),
        };
        engine.load()?;
        Ok(engine)
    }

    /// Startup load: run every persisted entry through the pipeline, in
    /// persisted order. Corrupt entries are handled per the configured
    /// [`StartupPolicy`].
    fn load(&self) -> Result<(), EngineError> {
        let entries = self.store.load_all()?;
        let mut registry = self.registry.write().expect("registry lock poisoned");

        for (id, bytes) in entries {
            match self.fingerprint_bytes(&bytes) {
                Ok(fingerprint) => registry.push(id, fingerprint),
                Err(err) => match self.config.startup {
                    StartupPolicy::SkipCorrupt => {
                        tracing::warn!(entry_id = id, error = %err, "skipping corrupt persisted entry");
                    }
                    StartupPolicy::Abort => {
                        return Err(EngineError::StartupLoad {
                            id,
                            source: Box::new(err),
                        });
                    }
                },
            }
        }

        tracing::info!(known = registry.len(), "registry loaded");
        Ok(())
    }

    /// The pure pipeline shared by every operation: decode → HSV →
    /// fingerprint. No shared state is touched.
    fn fingerprint_bytes(&self, bytes: &[u8]) -> Result<Fingerprint, EngineError> {
        let grid = self.decoder.decode(bytes)?;
        let hsv = to_hsv(&grid)?;
        Ok(fingerprint_image(&hsv, &self.config.fingerprint))
    }

    /// Register an image: fingerprint it, reject exact duplicates, persist,
    /// then append to the registry.
    pub fn register(&self, bytes: &[u8]) -> Result<RegisterOutcome, EngineError> {
        let fingerprint = self.fingerprint_bytes(bytes)?;

        let _gate = self.register_gate.lock().expect("register gate poisoned");

        {
            let registry = self.registry.read().expect("registry lock poisoned");
            if registry.contains_exact(&fingerprint) {
                tracing::debug!("register rejected: exact fingerprint already known");
                return Ok(RegisterOutcome::DuplicateRejected);
            }
        }

        // Persist first; only a durable entry may enter the registry.
        let id = self.store.append(bytes)?;

        let mut registry = self.registry.write().expect("registry lock poisoned");
        registry.push(id, fingerprint);
        tracing::info!(entry_id = id, known = registry.len(), "image registered");

        Ok(RegisterOutcome::Registered { id })
    }

    /// Query an image against the registry: first-acceptable scan in
    /// insertion order, strict less-than threshold on all three channels.
    pub fn query(&self, bytes: &[u8]) -> Result<QueryOutcome, EngineError> {
        let fingerprint = self.fingerprint_bytes(bytes)?;

        let registry = self.registry.read().expect("registry lock poisoned");
        match registry.find_first_match(&fingerprint, self.config.threshold)? {
            Some(hit) => {
                tracing::debug!(entry_id = hit.id, score = hit.score, "query matched");
                Ok(QueryOutcome::Match {
                    id: hit.id,
                    score: hit.score,
                })
            }
            None => Ok(QueryOutcome::NoMatch),
        }
    }

    /// Snapshot of all persisted entries, in insertion order.
    pub fn list_known(&self) -> Result<Vec<(u64, Bytes)>, EngineError> {
        Ok(self.store.load_all()?)
    }

    /// Number of fingerprints currently in the registry.
    pub fn known_count(&self) -> usize {
        self.registry.read().expect("registry lock poisoned").len()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
