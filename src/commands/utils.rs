use crate::output::read_report;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use std::path::Path;

/// Validate a report JSON file
pub fn validate_report_file(file_path: &Path) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(file_path)
        .with_context(|| format!("Failed to read report {}", file_path.display()))?;

    if report.version != SCHEMA_VERSION {
        anyhow::bail!(
            "Unsupported report version {} (expected {})",
            report.version,
            SCHEMA_VERSION
        );
    }

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Generated: {}", report.generated_at);

    if let Some(layout_shift) = &report.layout_shift {
        println!("  Layout-shift nodes: {}", layout_shift.contributions.len());
    }

    if let Some(duplication) = &report.duplication {
        println!("  Bundles: {}", duplication.bundles.len());
        println!("  Duplicate groups: {}", duplication.report.groups.len());
        println!("  Wasted bytes: {}", duplication.report.total_wasted_bytes());
    }

    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("Pageload Insights v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Layout-shift attribution and duplicated JavaScript analysis for page loads.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{write_report, AnalysisReport};

    #[test]
    fn test_validate_written_report() {
        let file = tempfile::NamedTempFile::new().unwrap();
        write_report(&AnalysisReport::new(None, None), file.path()).unwrap();
        assert!(validate_report_file(file.path()).is_ok());
    }

    #[test]
    fn test_validate_rejects_other_version() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut report = AnalysisReport::new(None, None);
        report.version = "0.1.0".to_string();
        write_report(&report, file.path()).unwrap();
        assert!(validate_report_file(file.path()).is_err());
    }
}
