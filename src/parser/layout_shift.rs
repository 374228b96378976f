//! Extraction of node-level records from rendering events.
//!
//! `LayoutShift` events carry an `impacted_nodes` list in `args.data`:
//! `{node_id, old_rect: [x, y, w, h], new_rect: [x, y, w, h]}`.
//! Entries missing any of those are skipped, never fatal.

use super::trace::TraceEvent;
use crate::geometry::Rect;
use crate::utils::config::{LAYOUT_SHIFT_EVENT, LCP_CANDIDATE_EVENT};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Node id in the trace's own id space (a backend node id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraceNodeId(pub i64);

impl fmt::Display for TraceNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One element's movement within a layout shift
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutShiftRecord {
    pub node_id: TraceNodeId,
    pub old_rect: Rect,
    pub new_rect: Rect,
}

/// Raw impacted-node entry as it appears in the trace
#[derive(Debug, Deserialize)]
struct ImpactedNode {
    #[serde(default)]
    node_id: Option<i64>,
    #[serde(default)]
    old_rect: Option<Vec<f64>>,
    #[serde(default)]
    new_rect: Option<Vec<f64>>,
}

/// Extract the shift records of a single event
///
/// Returns an empty list for events that are not layout shifts.
pub fn shift_records(event: &TraceEvent) -> Vec<LayoutShiftRecord> {
    if event.name != LAYOUT_SHIFT_EVENT {
        return Vec::new();
    }

    let Some(entries) = event
        .data()
        .and_then(|data| data.get("impacted_nodes"))
        .and_then(|nodes| nodes.as_array())
    else {
        return Vec::new();
    };

    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let record = parse_impacted_node(entry);
            if record.is_none() {
                debug!("Skipping malformed impacted node {}: {}", index, entry);
            }
            record
        })
        .collect()
}

/// Extract shift records from every layout-shift event, in arrival order
pub fn layout_shift_records(events: &[TraceEvent]) -> Vec<LayoutShiftRecord> {
    events.iter().flat_map(shift_records).collect()
}

/// Validate and convert one impacted-node entry
///
/// **Private** - a zero node id is treated as missing
fn parse_impacted_node(entry: &serde_json::Value) -> Option<LayoutShiftRecord> {
    let node = ImpactedNode::deserialize(entry).ok()?;

    let node_id = node.node_id.filter(|id| *id != 0)?;
    let old_rect = Rect::from_trace(&node.old_rect?)?;
    let new_rect = Rect::from_trace(&node.new_rect?)?;

    Some(LayoutShiftRecord {
        node_id: TraceNodeId(node_id),
        old_rect,
        new_rect,
    })
}

/// Node id of the final Largest Contentful Paint candidate
///
/// Later candidates supersede earlier ones, so the last event wins.
pub fn lcp_node_id(events: &[TraceEvent]) -> Option<TraceNodeId> {
    let candidate = events
        .iter()
        .rev()
        .find(|event| event.name == LCP_CANDIDATE_EVENT)?;

    candidate
        .data()
        .and_then(|data| data.get("nodeId"))
        .and_then(|id| id.as_i64())
        .filter(|id| *id != 0)
        .map(TraceNodeId)
}
