//! Per-node layout-shift attribution.
//!
//! Each impacted node contributes the area it swept during a shift
//! (old + new − overlap). Contributions are summed per node across the
//! whole trace and the heaviest nodes are reported.

use super::rank::WeightedTally;
use crate::geometry::swept_area;
use crate::parser::{layout_shift_records, TraceEvent, TraceNodeId};
use crate::utils::config::TOP_SHIFT_NODES;
use log::debug;
use serde::{Deserialize, Serialize};

/// Cumulative shift impact of one node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShiftContribution {
    pub node_id: TraceNodeId,

    /// Total swept area in square CSS pixels
    pub impact: f64,
}

/// Fold every layout-shift event into per-node totals, heaviest first
///
/// Nodes with equal totals keep the order they first appeared in.
pub fn shift_contributions(events: &[TraceEvent]) -> Vec<ShiftContribution> {
    let mut tally: WeightedTally<TraceNodeId, f64> = WeightedTally::new();

    for record in layout_shift_records(events) {
        tally.add(record.node_id, swept_area(&record.old_rect, &record.new_rect));
    }

    debug!("Accumulated layout shift impact for {} nodes", tally.len());

    tally
        .into_ranked()
        .into_iter()
        .map(|(node_id, impact)| ShiftContribution { node_id, impact })
        .collect()
}

/// The nodes contributing most to cumulative layout shift
///
/// **Public** - main entry point for shift attribution
///
/// Returns at most five ids. An empty list is a valid result.
pub fn rank_layout_shift_nodes(events: &[TraceEvent]) -> Vec<TraceNodeId> {
    shift_contributions(events)
        .into_iter()
        .take(TOP_SHIFT_NODES)
        .map(|contribution| contribution.node_id)
        .collect()
}
