//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Loads the config
//! 2. Ranks layout-shift nodes from a trace (if given)
//! 3. Attributes bundles to their sources (if given)
//! 4. Detects duplicated modules and estimates savings
//! 5. Writes the report

use super::models::{AnalyzeArgs, BundleEntry};
use crate::aggregator::{
    attribute_bundle, detect_duplicates, estimate_savings_ms, shift_contributions, BundleRecord,
    ThroughputModel,
};
use crate::output::{
    write_report, AnalysisReport, BundleSummary, DuplicationSummary, LayoutShiftSummary,
};
use crate::parser::{lcp_node_id, parse_trace_str, SourceMap};
use crate::utils::config::{load_config, AnalysisConfig, TOP_SHIFT_NODES};
use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::path::Path;
use std::time::Instant;

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Arguments
/// * `args` - Analyze command arguments
///
/// # Returns
/// The report that was written
///
/// # Errors
/// * Config, trace, manifest or bundle files that cannot be read or parsed
/// * Source maps that reference undeclared sources
/// * File write errors
pub fn execute_analyze(args: AnalyzeArgs) -> Result<AnalysisReport> {
    let start_time = Instant::now();

    // Step 1: Load config
    info!("Step 1/4: Loading config...");
    let mut config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    if let Some(threshold) = args.ignore_threshold_bytes {
        config.duplication.ignore_threshold_bytes = threshold;
    }
    debug!("Config: {:?}", config);

    // Step 2: Layout shifts
    let layout_shift = match &args.trace {
        Some(path) => {
            info!("Step 2/4: Analyzing trace {}...", path.display());
            Some(analyze_trace(path)?)
        }
        None => {
            info!("Step 2/4: Skipping layout-shift analysis (no trace)");
            None
        }
    };

    // Step 3: Duplicated code
    let duplication = match &args.bundles {
        Some(path) => {
            info!("Step 3/4: Analyzing bundles from {}...", path.display());
            Some(analyze_bundles(path, &config)?)
        }
        None => {
            info!("Step 3/4: Skipping duplication analysis (no bundles)");
            None
        }
    };

    // Step 4: Write report
    info!("Step 4/4: Writing report...");
    let report = AnalysisReport::new(layout_shift, duplication);
    write_report(&report, &args.output_json).context("Failed to write report JSON")?;

    info!("✓ Report written to: {}", args.output_json.display());

    if args.print_summary {
        print_summary(&report);
    }

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(report)
}

/// Rank the layout-shift contributors of one trace
///
/// **Private** - internal helper for execute_analyze
fn analyze_trace(path: &Path) -> Result<LayoutShiftSummary> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read trace {}", path.display()))?;
    let trace = parse_trace_str(&text).context("Failed to parse trace data")?;

    let contributions = shift_contributions(&trace.events);
    let top_nodes = contributions
        .iter()
        .take(TOP_SHIFT_NODES)
        .map(|contribution| contribution.node_id)
        .collect();
    let lcp_node = lcp_node_id(&trace.events);

    debug!(
        "{} nodes shifted, LCP node {:?}",
        contributions.len(),
        lcp_node
    );

    Ok(LayoutShiftSummary {
        top_nodes,
        contributions,
        lcp_node,
    })
}

/// Attribute every bundle of a manifest and look for duplicates
///
/// **Private** - internal helper for execute_analyze
fn analyze_bundles(manifest_path: &Path, config: &AnalysisConfig) -> Result<DuplicationSummary> {
    let bundles = load_bundles(manifest_path)?;
    info!("Attributed {} bundles", bundles.len());

    let report = detect_duplicates(&bundles, config.duplication.ignore_threshold_bytes);
    let model = ThroughputModel::from(&config.network);
    let estimated_savings_ms = estimate_savings_ms(&report.wasted_bytes_by_url, &model);

    info!(
        "{} duplicated modules, {} wasted bytes (~{:.0} ms)",
        report.groups.iter().filter(|group| !group.is_other()).count(),
        report.total_wasted_bytes(),
        estimated_savings_ms
    );

    Ok(DuplicationSummary {
        bundles: bundles.iter().map(BundleSummary::from).collect(),
        report,
        estimated_savings_ms,
    })
}

/// Read a bundle manifest and attribute each listed bundle
///
/// **Public** - also used by integration tests
pub fn load_bundles(manifest_path: &Path) -> Result<Vec<BundleRecord>> {
    let text = fs::read_to_string(manifest_path)
        .with_context(|| format!("Failed to read bundle manifest {}", manifest_path.display()))?;
    let entries: Vec<BundleEntry> =
        serde_json::from_str(&text).context("Bundle manifest is not a list of bundles")?;

    let base = manifest_path.parent().unwrap_or_else(|| Path::new(""));

    entries
        .iter()
        .map(|entry| load_bundle(base, entry))
        .collect()
}

/// Attribute one manifest entry
///
/// **Private** - internal helper for load_bundles
fn load_bundle(base: &Path, entry: &BundleEntry) -> Result<BundleRecord> {
    let script_path = base.join(&entry.script);
    let content = fs::read_to_string(&script_path)
        .with_context(|| format!("Failed to read bundle {}", script_path.display()))?;

    let map = match &entry.map {
        Some(map) => {
            let map_path = base.join(map);
            let map_text = fs::read_to_string(&map_path)
                .with_context(|| format!("Failed to read source map {}", map_path.display()))?;
            SourceMap::from_json(&map_text)
                .with_context(|| format!("Invalid source map {}", map_path.display()))?
        }
        None => {
            debug!("No source map for {}", entry.url);
            SourceMap::default()
        }
    };

    attribute_bundle(entry.url.clone(), &content, &map)
        .with_context(|| format!("Failed to attribute {}", entry.url))
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.trace.is_none() && args.bundles.is_none() {
        anyhow::bail!("Nothing to analyze: pass --trace and/or --bundles");
    }

    if args.output_json.as_os_str().is_empty() {
        anyhow::bail!("Output path cannot be empty");
    }

    for path in [&args.trace, &args.bundles, &args.config].into_iter().flatten() {
        if !path.is_file() {
            anyhow::bail!("Input file not found: {}", path.display());
        }
    }

    Ok(())
}

/// Print a text summary of a report
///
/// **Private** - internal helper for execute_analyze
fn print_summary(report: &AnalysisReport) {
    println!("\n{}", "=".repeat(80));
    println!("ANALYSIS SUMMARY");
    println!("{}", "=".repeat(80));

    if let Some(layout_shift) = &report.layout_shift {
        if let Some(lcp) = layout_shift.lcp_node {
            println!("LCP node: {}", lcp);
        }
        println!("Top layout-shift nodes:");
        for contribution in layout_shift.contributions.iter().take(TOP_SHIFT_NODES) {
            println!("  node {:<10} {:>14.1} px²", contribution.node_id, contribution.impact);
        }
    }

    if let Some(duplication) = &report.duplication {
        println!("\nDuplicated modules:");
        for group in &duplication.report.groups {
            println!("  {:<60} {:>10} bytes wasted", group.source, group.wasted_bytes);
            for (url, bytes) in group.urls.iter().zip(&group.source_bytes) {
                println!("    {:<58} {:>10} bytes", url, bytes);
            }
        }
        println!(
            "\nTotal wasted: {} bytes (~{:.0} ms)",
            duplication.report.total_wasted_bytes(),
            duplication.estimated_savings_ms
        );
    }

    println!("{}", "=".repeat(80));
}
