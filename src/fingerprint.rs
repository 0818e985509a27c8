//! Histogram fingerprints: the comparison key for every known image.
//!
//! A [`Fingerprint`] is three fixed-length bin-count vectors, one per HSV
//! channel, all sharing one bin layout. It is an immutable value: built once
//! at register or startup-load time, never mutated, cheap to clone and
//! compare. Identical pixel grids always produce bit-identical fingerprints.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::HsvImage;
use crate::config::FingerprintConfig;

/// Errors from constructing a fingerprint out of raw channel histograms.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FingerprintError {
    #[error("channel histograms must share one length, got {0}, {1} and {2}")]
    UnevenChannels(usize, usize, usize),
    #[error("a fingerprint needs at least one bin")]
    ZeroBins,
}

/// Three-channel intensity-frequency distribution of an image.
///
/// Equality is elementwise identity across all three channels plus the bin
/// layout; that is the duplicate-detection predicate, distinct from the
/// threshold-based similarity scan in [`crate::registry::Registry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    bins: usize,
    range_max: u32,
    channels: [Vec<u32>; 3],
}

impl Fingerprint {
    /// Build a fingerprint from raw per-channel histograms. All three must
    /// have the same non-zero length.
    pub fn from_channels(
        range_max: u32,
        channels: [Vec<u32>; 3],
    ) -> Result<Self, FingerprintError> {
        let [a, b, c] = &channels;
        if a.len() != b.len() || b.len() != c.len() {
            return Err(FingerprintError::UnevenChannels(a.len(), b.len(), c.len()));
        }
        if a.is_empty() {
            return Err(FingerprintError::ZeroBins);
        }
        Ok(Self {
            bins: a.len(),
            range_max,
            channels,
        })
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    pub fn range_max(&self) -> u32 {
        self.range_max
    }

    /// Bin counts for one channel, indexed 0..3 (H, S, V).
    pub fn channel(&self, index: usize) -> &[u32] {
        &self.channels[index]
    }

    /// Whether two fingerprints share a bin layout and are thus comparable.
    pub fn same_layout(&self, other: &Self) -> bool {
        self.bins == other.bins && self.range_max == other.range_max
    }
}

/// Tally a converted image into a three-channel histogram fingerprint.
///
/// Deterministic and pure; cost is linear in pixel count. Intensities at or
/// above `range_max` are clamped into the last bin.
pub fn fingerprint_image(image: &HsvImage, config: &FingerprintConfig) -> Fingerprint {
    let bins = config.bins.max(1);
    let range_max = config.range_max.max(1) as u64;
    let mut channels = [vec![0u32; bins], vec![0u32; bins], vec![0u32; bins]];

    for hsv in image.data().chunks_exact(3) {
        for (channel, &value) in channels.iter_mut().zip(hsv) {
            let bin = (value as u64 * bins as u64 / range_max).min(bins as u64 - 1);
            channel[bin as usize] += 1;
        }
    }

    Fingerprint {
        bins,
        range_max: range_max as u32,
        channels,
    }
}
