//! Analysis of decoded traces and bundles.
//!
//! This module turns parsed inputs into findings:
//! - Layout-shift impact per node (top contributors)
//! - Byte attribution of bundles to original sources
//! - Duplicated modules across bundles and their wasted bytes
//! - Estimated time savings of removing the waste

pub mod attribution;
pub mod duplication;
pub mod layout_shift;
pub mod rank;
pub mod savings;

// Re-export main types and functions
pub use attribution::{attribute, attribute_bundle, BundleRecord, SourceBytes};
pub use duplication::{
    canonical_source_name, detect_duplicates, node_module_name, DuplicateGroup, DuplicationReport,
    UrlWaste,
};
pub use layout_shift::{rank_layout_shift_nodes, shift_contributions, ShiftContribution};
pub use rank::{rank_descending, WeightedTally};
pub use savings::{estimate_savings_ms, ThroughputModel, TransferTimeModel};
