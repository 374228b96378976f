use pageload_insights::parser::{parse_trace, TraceNodeId};
use pageload_insights::session::{
    cls_elements, collect_trace_elements, marker_selector, resolve_nodes, DomSession, MarkedNode,
    MetricTag, NodeDescriptor, ProtocolNodeId, TaggedNode,
};
use pageload_insights::utils::error::{ResolutionError, SessionError};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::BTreeMap;

/// In-memory page: protocol id = trace id + 100, attributes per node
#[derive(Default)]
struct Page {
    attributes: BTreeMap<i64, BTreeMap<String, String>>,
    clear_attempts: Vec<i64>,
    failing_clear: Option<i64>,
}

impl DomSession for Page {
    fn snapshot_document(&mut self) -> Result<(), SessionError> {
        Ok(())
    }

    fn translate_ids(&mut self, ids: &[TraceNodeId]) -> Result<Vec<Option<ProtocolNodeId>>, SessionError> {
        Ok(ids.iter().map(|id| Some(ProtocolNodeId(id.0 + 100))).collect())
    }

    fn set_marker(&mut self, id: ProtocolNodeId, tag: &str) -> Result<(), SessionError> {
        self.attributes
            .entry(id.0)
            .or_default()
            .insert("lhtemp".to_string(), tag.to_string());
        Ok(())
    }

    fn query_marked(&mut self) -> Result<Vec<MarkedNode>, SessionError> {
        assert_eq!(marker_selector(), "[lhtemp]");
        Ok(self
            .attributes
            .iter()
            .filter_map(|(id, attributes)| {
                attributes.get("lhtemp").map(|tag| MarkedNode {
                    tag: tag.clone(),
                    descriptor: NodeDescriptor {
                        css_selector: format!("#node-{}", id),
                        ..Default::default()
                    },
                })
            })
            .collect())
    }

    fn clear_marker(&mut self, id: ProtocolNodeId) -> Result<(), SessionError> {
        self.clear_attempts.push(id.0);
        if self.failing_clear == Some(id.0) {
            return Err(SessionError::new("Could not find node with given id"));
        }
        if let Some(attributes) = self.attributes.get_mut(&id.0) {
            attributes.remove("lhtemp");
        }
        Ok(())
    }
}

fn cls(id: i64) -> TaggedNode {
    TaggedNode::new(TraceNodeId(id), MetricTag::CumulativeLayoutShift)
}

#[test]
fn test_clear_failure_on_second_node_still_clears_the_rest() {
    let mut page = Page {
        failing_clear: Some(102),
        ..Default::default()
    };

    let result = resolve_nodes(&mut page, &[cls(1), cls(2), cls(3)]);

    assert!(matches!(
        result,
        Err(ResolutionError::Session { operation: "clear_marker", .. })
    ));
    assert_eq!(page.clear_attempts, vec![101, 102, 103]);
    assert!(!page.attributes[&101].contains_key("lhtemp"));
    assert!(!page.attributes[&103].contains_key("lhtemp"));
}

#[test]
fn test_trace_elements_for_page_load() {
    let trace = parse_trace(&json!({
        "traceEvents": [
            { "name": "largestContentfulPaint::Candidate", "args": { "data": { "nodeId": 9 } } },
            {
                "name": "LayoutShift",
                "args": { "data": { "impacted_nodes": [
                    { "node_id": 4, "old_rect": [0, 0, 50, 50], "new_rect": [0, 20, 50, 50] },
                    { "node_id": 9, "old_rect": [0, 0, 10, 10], "new_rect": [0, 0, 10, 10] }
                ] } }
            }
        ]
    }))
    .unwrap();
    let mut page = Page::default();

    let elements = collect_trace_elements(&mut page, Some(&trace)).unwrap();

    // Node 9 is the LCP element and is reported once
    assert_eq!(elements.len(), 2);
    let lcp: Vec<_> = elements
        .iter()
        .filter(|e| e.metric_tag == MetricTag::LargestContentfulPaint)
        .collect();
    assert_eq!(lcp.len(), 1);
    assert_eq!(lcp[0].descriptor.css_selector, "#node-109");

    let shifted = cls_elements(&elements);
    assert_eq!(shifted.len(), 1);
    assert_eq!(shifted[0].descriptor.css_selector, "#node-104");

    // Every marker is gone afterwards
    assert!(page.attributes.values().all(|a| !a.contains_key("lhtemp")));
}

#[test]
fn test_missing_trace_is_an_error() {
    let mut page = Page::default();
    let result = collect_trace_elements(&mut page, None);
    assert!(matches!(result, Err(ResolutionError::MissingTraceData)));
}
