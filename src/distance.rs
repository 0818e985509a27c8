//! Bhattacharyya-derived distance between histogram fingerprints.
//!
//! Each channel is compared independently, producing a bounded distance in
//! `[0, 1]`: 0 for identical distribution shape, 1 for disjoint support.
//! For bin counts `A`, `B` over `N` bins:
//!
//! ```text
//! d = sqrt(1 - sum(sqrt(A_i * B_i)) / sqrt(sum(A) * sum(B)))
//! ```
//!
//! (`sum(A) * sum(B)` equals `mean(A) * mean(B) * N^2`.) Pure functions, no
//! side effects.

use thiserror::Error;

use crate::fingerprint::Fingerprint;

/// Errors from comparing two fingerprints.
///
/// Unreachable while the fingerprint layout is fixed process-wide; kept as
/// a real error so mixed-layout registries fail loudly instead of producing
/// garbage distances.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompareError {
    #[error(
        "fingerprint bin layouts differ: {left_bins} bins over [0,{left_range}) \
         vs {right_bins} bins over [0,{right_range})"
    )]
    BinLayoutMismatch {
        left_bins: usize,
        left_range: u32,
        right_bins: usize,
        right_range: u32,
    },
}

/// Bhattacharyya distance between two same-length bin-count slices.
fn bhattacharyya(a: &[u32], b: &[u32]) -> f64 {
    let sum_a: f64 = a.iter().map(|&x| x as f64).sum();
    let sum_b: f64 = b.iter().map(|&x| x as f64).sum();
    if sum_a == 0.0 || sum_b == 0.0 {
        // Empty distributions have no overlap with anything, including
        // each other only vacuously; treat a shared empty as identical.
        return if sum_a == sum_b { 0.0 } else { 1.0 };
    }

    let overlap: f64 = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| (x as f64 * y as f64).sqrt())
        .sum();

    (1.0 - overlap / (sum_a * sum_b).sqrt()).max(0.0).sqrt()
}

/// Per-channel distances between two fingerprints, ordered (H, S, V).
pub fn channel_distances(a: &Fingerprint, b: &Fingerprint) -> Result<[f64; 3], CompareError> {
    if !a.same_layout(b) {
        return Err(CompareError::BinLayoutMismatch {
            left_bins: a.bins(),
            left_range: a.range_max(),
            right_bins: b.bins(),
            right_range: b.range_max(),
        });
    }
    Ok([
        bhattacharyya(a.channel(0), b.channel(0)),
        bhattacharyya(a.channel(1), b.channel(1)),
        bhattacharyya(a.channel(2), b.channel(2)),
    ])
}

/// The engine's match predicate: all three channel distances strictly below
/// the threshold. A channel sitting exactly on the threshold does not match.
pub fn within_threshold(distances: &[f64; 3], threshold: f64) -> bool {
    distances.iter().all(|d| *d < threshold)
}

/// Combined score reported for a match: the sum of the channel distances.
pub fn combined_score(distances: &[f64; 3]) -> f64 {
    distances.iter().sum()
}
