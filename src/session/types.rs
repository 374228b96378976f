//! Types for talking to a remote-debugging DOM session.
//!
//! The transport itself lives outside this crate. Anything that can
//! snapshot the document, translate backend node ids, set and clear
//! attributes, and run the marked-node query can act as a session.

use crate::parser::TraceNodeId;
use crate::utils::config::LH_ATTRIBUTE_MARKER;
use crate::utils::error::SessionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Node id addressable through the session (a frontend node id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProtocolNodeId(pub i64);

impl fmt::Display for ProtocolNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The metric a trace node is reported for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricTag {
    LargestContentfulPaint,
    CumulativeLayoutShift,
}

impl MetricTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricTag::LargestContentfulPaint => "largest-contentful-paint",
            MetricTag::CumulativeLayoutShift => "cumulative-layout-shift",
        }
    }
}

impl fmt::Display for MetricTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "largest-contentful-paint" => Ok(MetricTag::LargestContentfulPaint),
            "cumulative-layout-shift" => Ok(MetricTag::CumulativeLayoutShift),
            other => Err(format!("unknown metric tag: {}", other)),
        }
    }
}

/// A trace node to resolve, with the metric it is reported for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaggedNode {
    pub node_id: TraceNodeId,
    pub tag: MetricTag,
}

impl TaggedNode {
    pub fn new(node_id: TraceNodeId, tag: MetricTag) -> Self {
        Self { node_id, tag }
    }
}

/// Page-level description of an element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    /// DevTools node path (e.g. "1,HTML,3,BODY,5,DIV")
    pub dom_path: String,
    pub css_selector: String,
    pub accessible_label: String,
    /// Truncated outer HTML
    pub html_snippet: String,
}

/// One row of the in-page marked-node query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkedNode {
    /// Value of the marker attribute
    pub tag: String,
    #[serde(flatten)]
    pub descriptor: NodeDescriptor,
}

/// A resolved trace node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceElement {
    pub metric_tag: MetricTag,
    #[serde(flatten)]
    pub descriptor: NodeDescriptor,
}

/// Remote-debugging DOM session collaborator
///
/// Methods take `&mut self`, so one resolve batch owns the session for
/// its whole snapshot → mark → query → unmark sequence.
pub trait DomSession {
    /// Load the full document so backend ids can be translated
    fn snapshot_document(&mut self) -> Result<(), SessionError>;

    /// Translate trace ids to session ids (`None` where a node is gone)
    fn translate_ids(&mut self, ids: &[TraceNodeId]) -> Result<Vec<Option<ProtocolNodeId>>, SessionError>;

    /// Set the transient marker attribute ([`LH_ATTRIBUTE_MARKER`]) on a node
    fn set_marker(&mut self, id: ProtocolNodeId, tag: &str) -> Result<(), SessionError>;

    /// Enumerate every element matching [`marker_selector`] from inside the page
    fn query_marked(&mut self) -> Result<Vec<MarkedNode>, SessionError>;

    /// Remove the marker attribute from a node
    fn clear_marker(&mut self, id: ProtocolNodeId) -> Result<(), SessionError>;
}

/// CSS selector matching every marked element
pub fn marker_selector() -> String {
    format!("[{}]", LH_ATTRIBUTE_MARKER)
}
