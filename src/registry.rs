//! The registry: an ordered, append-only collection of known fingerprints.
//!
//! Entries are held in insertion order, which is also persisted order.
//! There is no deletion or mutation path. Exact-equality duplicate probing
//! and threshold-based similarity scanning are deliberately separate
//! operations: one answers "same distribution", the other "close enough
//! distribution", and conflating them is how the two policies drift.

use crate::distance::{CompareError, channel_distances, combined_score, within_threshold};
use crate::fingerprint::Fingerprint;

/// One known image: its persisted id plus its fingerprint. The blob store
/// owns the mapping back to the original bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryEntry {
    pub id: u64,
    pub fingerprint: Fingerprint,
}

/// A registry entry accepted by the similarity scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanHit {
    /// Persisted id of the matched entry.
    pub id: u64,
    /// Per-channel distances (H, S, V) against the probe.
    pub distances: [f64; 3],
    /// Sum of the three channel distances.
    pub score: f64,
}

/// Ordered, append-only set of known fingerprints.
#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a new entry. The caller guarantees the id was durably
    /// persisted before this is called.
    pub fn push(&mut self, id: u64, fingerprint: Fingerprint) {
        self.entries.push(RegistryEntry { id, fingerprint });
    }

    /// Exact-equality duplicate probe: elementwise identical distributions
    /// on all three channels. This is the Register-time predicate, not the
    /// similarity test.
    pub fn contains_exact(&self, probe: &Fingerprint) -> bool {
        self.entries.iter().any(|e| &e.fingerprint == probe)
    }

    /// First-acceptable similarity scan, in insertion order.
    ///
    /// Stops at the first entry whose three channel distances are all
    /// strictly below `threshold`. An earlier entry that barely clears the
    /// threshold wins over a later exact match; that is the policy, not an
    /// accident.
    pub fn find_first_match(
        &self,
        probe: &Fingerprint,
        threshold: f64,
    ) -> Result<Option<ScanHit>, CompareError> {
        for entry in &self.entries {
            let distances = channel_distances(probe, &entry.fingerprint)?;
            if within_threshold(&distances, threshold) {
                return Ok(Some(ScanHit {
                    id: entry.id,
                    distances,
                    score: combined_score(&distances),
                }));
            }
        }
        Ok(None)
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }
}
