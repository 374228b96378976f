//! DOM session collaborator and trace node resolution.

pub mod resolver;
pub mod types;

pub use resolver::{cls_elements, collect_trace_elements, resolve_nodes, trace_nodes_to_resolve};
pub use types::{
    marker_selector, DomSession, MarkedNode, MetricTag, NodeDescriptor, ProtocolNodeId, TaggedNode, TraceElement,
};
