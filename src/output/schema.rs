//! Output JSON schema definitions for analysis reports.
//!
//! This module defines the structure of JSON files we write to disk.
//! Schema is versioned to allow future evolution.

use crate::aggregator::{BundleRecord, DuplicationReport, ShiftContribution};
use crate::parser::TraceNodeId;
use crate::utils::config::SCHEMA_VERSION;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Top-level report written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Timestamp when the report was generated
    pub generated_at: String,

    /// Layout-shift findings (absent when no trace was analyzed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_shift: Option<LayoutShiftSummary>,

    /// Duplicated JavaScript findings (absent when no bundles were analyzed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplication: Option<DuplicationSummary>,
}

impl AnalysisReport {
    /// Stamp a report with the current schema version and time
    pub fn new(
        layout_shift: Option<LayoutShiftSummary>,
        duplication: Option<DuplicationSummary>,
    ) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            generated_at: Utc::now().to_rfc3339(),
            layout_shift,
            duplication,
        }
    }
}

/// Layout-shift attribution results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutShiftSummary {
    /// Nodes handed to the resolver, heaviest first
    pub top_nodes: Vec<TraceNodeId>,

    /// Every node's cumulative impact, heaviest first
    pub contributions: Vec<ShiftContribution>,

    /// Node of the final LCP candidate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lcp_node: Option<TraceNodeId>,
}

/// Size breakdown of one analyzed bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleSummary {
    pub url: String,
    pub total_bytes: u64,
    pub unattributed_bytes: u64,
    pub source_count: usize,
}

impl From<&BundleRecord> for BundleSummary {
    fn from(bundle: &BundleRecord) -> Self {
        Self {
            url: bundle.url.clone(),
            total_bytes: bundle.total_bytes,
            unattributed_bytes: bundle.unattributed_bytes(),
            source_count: bundle
                .attribution
                .iter()
                .filter(|entry| entry.source.is_some())
                .count(),
        }
    }
}

/// Duplicated JavaScript results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicationSummary {
    pub bundles: Vec<BundleSummary>,

    #[serde(flatten)]
    pub report: DuplicationReport,

    /// Time the waste costs under the configured transfer model
    pub estimated_savings_ms: f64,
}
