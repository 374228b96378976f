//! Resolution of trace node ids to page elements.
//!
//! The trace only knows backend node ids. To describe those nodes we
//! translate them through the DOM session, tag each one with a transient
//! attribute, query the tagged elements from inside the page, and remove
//! the tags again. Removal runs on every exit path.

use super::types::{DomSession, MarkedNode, MetricTag, ProtocolNodeId, TaggedNode, TraceElement};
use crate::aggregator::rank_layout_shift_nodes;
use crate::parser::{lcp_node_id, Trace, TraceNodeId};
use crate::utils::error::{ResolutionError, SessionError};
use log::{debug, info, warn};

/// Marker attributes set during one batch
///
/// `release` clears them and reports failures; dropping an unreleased
/// guard (early return, panic) clears them best-effort.
struct MarkerGuard<'s, S: DomSession + ?Sized> {
    session: &'s mut S,
    marked: Vec<ProtocolNodeId>,
    released: bool,
}

impl<'s, S: DomSession + ?Sized> MarkerGuard<'s, S> {
    fn new(session: &'s mut S) -> Self {
        Self {
            session,
            marked: Vec::new(),
            released: false,
        }
    }

    /// Tag a node; it is scheduled for clearing even if the call fails
    fn mark(&mut self, id: ProtocolNodeId, tag: MetricTag) -> Result<(), ResolutionError> {
        if !self.marked.contains(&id) {
            self.marked.push(id);
        }
        self.session
            .set_marker(id, tag.as_str())
            .map_err(ResolutionError::session("set_marker"))
    }

    fn is_empty(&self) -> bool {
        self.marked.is_empty()
    }

    fn query(&mut self) -> Result<Vec<MarkedNode>, ResolutionError> {
        self.session
            .query_marked()
            .map_err(ResolutionError::session("query_marked"))
    }

    /// Attempt to clear every marker, returning the first failure
    fn clear_all(&mut self) -> Result<(), SessionError> {
        self.released = true;
        let mut first_failure = None;

        for id in self.marked.drain(..) {
            if let Err(e) = self.session.clear_marker(id) {
                warn!("Failed to clear marker on node {}: {}", id, e);
                first_failure.get_or_insert(e);
            }
        }

        first_failure.map_or(Ok(()), Err)
    }

    fn release(mut self) -> Result<(), ResolutionError> {
        self.clear_all().map_err(ResolutionError::session("clear_marker"))
    }
}

impl<S: DomSession + ?Sized> Drop for MarkerGuard<'_, S> {
    fn drop(&mut self) {
        if !self.released {
            debug!("Clearing {} markers after an aborted batch", self.marked.len());
            // Failures were already logged; the in-flight error wins
            let _ = self.clear_all();
        }
    }
}

/// Resolve tagged trace nodes to element descriptors
///
/// **Public** - main entry point for node resolution
///
/// Nodes the session cannot translate are left out of the result. The
/// result follows the page's query order; several elements may carry the
/// same tag. Elements carry only their [`MetricTag`], so a descriptor
/// cannot be linked back to the `TraceNodeId` it was resolved from.
///
/// # Errors
/// * `ResolutionError::Session` - A session call failed. Markers set so far
///   are still cleared; a clearing failure is only reported when nothing
///   else failed first.
pub fn resolve_nodes<S: DomSession + ?Sized>(
    session: &mut S,
    nodes: &[TaggedNode],
) -> Result<Vec<TraceElement>, ResolutionError> {
    if nodes.is_empty() {
        return Ok(Vec::new());
    }

    session
        .snapshot_document()
        .map_err(ResolutionError::session("snapshot_document"))?;

    let ids: Vec<TraceNodeId> = nodes.iter().map(|node| node.node_id).collect();
    let translated = session
        .translate_ids(&ids)
        .map_err(ResolutionError::session("translate_ids"))?;
    if translated.len() != ids.len() {
        warn!(
            "Session translated {} of {} node ids",
            translated.len(),
            ids.len()
        );
    }

    let mut guard = MarkerGuard::new(session);
    for (node, protocol_id) in nodes.iter().zip(translated) {
        match protocol_id.filter(|id| id.0 != 0) {
            Some(id) => guard.mark(id, node.tag)?,
            None => debug!("Trace node {} is no longer in the document", node.node_id),
        }
    }

    if guard.is_empty() {
        guard.release()?;
        return Ok(Vec::new());
    }

    let queried = guard.query();
    let cleanup = guard.release();
    let marked = match (queried, cleanup) {
        (Ok(marked), Ok(())) => marked,
        (Err(e), Ok(())) => return Err(e),
        (Ok(_), Err(cleanup_error)) => return Err(cleanup_error),
        (Err(e), Err(cleanup_error)) => {
            warn!("Ignoring cleanup failure after query failure: {}", cleanup_error);
            return Err(e);
        }
    };

    Ok(marked
        .into_iter()
        .filter_map(|node| match node.tag.parse::<MetricTag>() {
            Ok(metric_tag) => Some(TraceElement {
                metric_tag,
                descriptor: node.descriptor,
            }),
            Err(e) => {
                warn!("Dropping marked element: {}", e);
                None
            }
        })
        .collect())
}

/// The nodes a trace asks to describe: the LCP element, then the top
/// layout-shift contributors
///
/// A shift node that is also the LCP element is reported once, as LCP.
pub fn trace_nodes_to_resolve(trace: &Trace) -> Vec<TaggedNode> {
    let lcp = lcp_node_id(&trace.events);
    let mut nodes: Vec<TaggedNode> = lcp
        .map(|id| TaggedNode::new(id, MetricTag::LargestContentfulPaint))
        .into_iter()
        .collect();

    nodes.extend(
        rank_layout_shift_nodes(&trace.events)
            .into_iter()
            .filter(|id| Some(*id) != lcp)
            .map(|id| TaggedNode::new(id, MetricTag::CumulativeLayoutShift)),
    );

    nodes
}

/// Describe the LCP and layout-shift elements of a page load
///
/// # Errors
/// * `ResolutionError::MissingTraceData` - No trace was captured
/// * `ResolutionError::Session` - See [`resolve_nodes`]
pub fn collect_trace_elements<S: DomSession + ?Sized>(
    session: &mut S,
    trace: Option<&Trace>,
) -> Result<Vec<TraceElement>, ResolutionError> {
    let trace = trace.ok_or(ResolutionError::MissingTraceData)?;
    let nodes = trace_nodes_to_resolve(trace);
    info!("Resolving {} trace nodes", nodes.len());

    resolve_nodes(session, &nodes)
}

/// Elements reported for cumulative layout shift
pub fn cls_elements(elements: &[TraceElement]) -> Vec<&TraceElement> {
    elements
        .iter()
        .filter(|element| element.metric_tag == MetricTag::CumulativeLayoutShift)
        .collect()
}
