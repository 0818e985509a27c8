//! Configuration types for the matching engine.
//!
//! Every fingerprint built by one engine instance shares one
//! [`FingerprintConfig`]; distances between fingerprints with different bin
//! layouts are undefined and rejected at comparison time. Keep the layout
//! fixed process-wide.

use serde::{Deserialize, Serialize};

/// Bin layout for histogram fingerprints.
///
/// The reference configuration is 256 equal-width bins over the intensity
/// range `[0, 256)`, one histogram per HSV channel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FingerprintConfig {
    /// Number of equal-width bins per channel. Must be >= 1.
    #[serde(default = "default_bins")]
    pub bins: usize,

    /// Exclusive upper bound of the intensity range. Values at or above
    /// this bound land in the last bin. Must be >= 1.
    #[serde(default = "default_range_max")]
    pub range_max: u32,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            bins: default_bins(),
            range_max: default_range_max(),
        }
    }
}

/// What to do when a persisted entry fails decode/convert during startup load.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StartupPolicy {
    /// Skip the corrupt entry, log a warning with its id, and keep loading.
    #[default]
    SkipCorrupt,
    /// Fail engine construction on the first corrupt entry.
    Abort,
}

/// Engine-wide configuration: fingerprint layout, match threshold, and the
/// startup-load policy for corrupt persisted entries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    #[serde(default)]
    pub fingerprint: FingerprintConfig,

    /// A registry entry matches a query when all three channel distances
    /// are strictly below this value.
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    #[serde(default)]
    pub startup: StartupPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fingerprint: FingerprintConfig::default(),
            threshold: default_threshold(),
            startup: StartupPolicy::default(),
        }
    }
}

fn default_bins() -> usize {
    256
}

fn default_range_max() -> u32 {
    256
}

fn default_threshold() -> f64 {
    0.25
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_configuration() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.fingerprint.bins, 256);
        assert_eq!(cfg.fingerprint.range_max, 256);
        assert_eq!(cfg.threshold, 0.25);
        assert_eq!(cfg.startup, StartupPolicy::SkipCorrupt);
    }

    #[test]
    fn startup_policy_round_trips_through_serde() {
        let json = serde_json::to_string(&StartupPolicy::Abort).unwrap();
        assert_eq!(json, "\"abort\"");
        let back: StartupPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(back, StartupPolicy::Abort);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, EngineConfig::default());
    }
}
