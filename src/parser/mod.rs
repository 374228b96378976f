//! Input decoding.
//!
//! This module handles:
//! - Parsing raw trace JSON into events
//! - Extracting layout-shift records and the LCP node from events
//! - Decoding Source Map v3 documents

pub mod layout_shift;
pub mod source_map;
pub mod trace;

// Re-export main types
pub use layout_shift::{layout_shift_records, lcp_node_id, shift_records, LayoutShiftRecord, TraceNodeId};
pub use source_map::{Mapping, SourceMap};
pub use trace::{parse_trace, parse_trace_str, Trace, TraceEvent};
