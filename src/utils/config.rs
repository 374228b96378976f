//! Configuration and constants for the analyzers and the CLI.
//!
//! Constants live here so the analyzers and the CLI agree on them. Tunable
//! values can be overridden from a TOML file via [`load_config`].

use crate::utils::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Current output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// How many layout-shift nodes are handed to the resolver
pub const TOP_SHIFT_NODES: usize = 5;

/// Duplicated modules wasting fewer bytes than this are folded into "Other"
pub const DEFAULT_IGNORE_THRESHOLD_BYTES: u64 = 1024;

/// Transient DOM attribute used to find trace nodes from inside the page
pub const LH_ATTRIBUTE_MARKER: &str = "lhtemp";

// Trace event names (Chrome's devtools.timeline / loading categories)
pub const LAYOUT_SHIFT_EVENT: &str = "LayoutShift";
pub const LCP_CANDIDATE_EVENT: &str = "largestContentfulPaint::Candidate";

// Field names for the trace envelope (different capture tools use different names)
pub const TRACE_EVENT_FIELD_NAMES: &[&str] = &["traceEvents", "trace_events", "events"];

/// Label of the synthetic duplication group collecting unattributed bytes
pub const OTHER_GROUP_NAME: &str = "Other";

/// Default transfer-time model throughput, roughly a throttled 4G connection
pub const DEFAULT_THROUGHPUT_KBPS: f64 = 1638.4;

/// Tunables for one analysis run
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct AnalysisConfig {
    /// Duplicated-code settings
    #[serde(default)]
    pub duplication: DuplicationSettings,

    /// Transfer-time model settings
    #[serde(default)]
    pub network: NetworkSettings,
}

/// Duplicated-code detector settings
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct DuplicationSettings {
    /// Groups wasting fewer bytes than this are reported under "Other"
    #[serde(default = "default_ignore_threshold")]
    pub ignore_threshold_bytes: u64,
}

impl Default for DuplicationSettings {
    fn default() -> Self {
        Self {
            ignore_threshold_bytes: DEFAULT_IGNORE_THRESHOLD_BYTES,
        }
    }
}

/// Parameters of the fixed-throughput transfer model
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct NetworkSettings {
    #[serde(default = "default_throughput_kbps")]
    pub throughput_kbps: f64,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            throughput_kbps: DEFAULT_THROUGHPUT_KBPS,
        }
    }
}

fn default_ignore_threshold() -> u64 {
    DEFAULT_IGNORE_THRESHOLD_BYTES
}

fn default_throughput_kbps() -> f64 {
    DEFAULT_THROUGHPUT_KBPS
}

/// Load an analysis config from a TOML file
///
/// Missing sections and fields fall back to their defaults.
///
/// # Errors
/// * `ConfigError::IoError` - If the file cannot be read
/// * `ConfigError::ParseFailed` - If the TOML is invalid
/// * `ConfigError::Invalid` - If a value is out of range
pub fn load_config(path: impl AsRef<Path>) -> Result<AnalysisConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parse an analysis config from TOML text
pub fn parse_config(contents: &str) -> Result<AnalysisConfig, ConfigError> {
    let config: AnalysisConfig = toml::from_str(contents)?;

    if !(config.network.throughput_kbps > 0.0) {
        return Err(ConfigError::Invalid(format!(
            "network.throughput_kbps must be positive, got {}",
            config.network.throughput_kbps
        )));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.duplication.ignore_threshold_bytes, 1024);
    }

    #[test]
    fn test_partial_config() {
        let config = parse_config(
            r#"
            [duplication]
            ignore_threshold_bytes = 200

            [network]
            throughput_kbps = 100.0
            "#,
        )
        .unwrap();

        assert_eq!(config.duplication.ignore_threshold_bytes, 200);
        assert_eq!(config.network.throughput_kbps, 100.0);
    }

    #[test]
    fn test_zero_throughput_rejected() {
        let err = parse_config("[network]\nthroughput_kbps = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_bad_toml_rejected() {
        let err = parse_config("[duplication\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseFailed(_)));
    }
}
