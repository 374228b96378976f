use serde::Deserialize;
use std::path::PathBuf;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Trace JSON to analyze for layout shifts (optional)
    pub trace: Option<PathBuf>,

    /// Bundle manifest to analyze for duplicated code (optional)
    pub bundles: Option<PathBuf>,

    /// TOML config overriding the defaults (optional)
    pub config: Option<PathBuf>,

    /// Output path for the JSON report
    pub output_json: PathBuf,

    /// Override of `duplication.ignore_threshold_bytes`
    pub ignore_threshold_bytes: Option<u64>,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            trace: None,
            bundles: None,
            config: None,
            output_json: PathBuf::from("report.json"),
            ignore_threshold_bytes: None,
            print_summary: false,
        }
    }
}

/// One entry of a bundle manifest
///
/// Paths are relative to the manifest file. A bundle without a source map
/// is analyzed as fully unattributed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BundleEntry {
    /// URL the bundle was served from
    pub url: String,

    /// Path to the bundle's JavaScript
    pub script: PathBuf,

    /// Path to the bundle's source map
    #[serde(default)]
    pub map: Option<PathBuf>,
}
