use pageload_insights::aggregator::{rank_layout_shift_nodes, shift_contributions};
use pageload_insights::parser::{lcp_node_id, parse_trace, TraceNodeId};
use pretty_assertions::assert_eq;
use serde_json::json;

fn impacted(node_id: i64, old_rect: [f64; 4], new_rect: [f64; 4]) -> serde_json::Value {
    json!({ "node_id": node_id, "old_rect": old_rect, "new_rect": new_rect })
}

fn shift_event(nodes: Vec<serde_json::Value>) -> serde_json::Value {
    json!({
        "name": "LayoutShift",
        "args": { "data": { "impacted_nodes": nodes } }
    })
}

#[test]
fn test_empty_trace_ranks_nothing() {
    let trace = parse_trace(&json!({ "traceEvents": [] })).unwrap();
    assert!(rank_layout_shift_nodes(&trace.events).is_empty());
}

#[test]
fn test_trace_without_shifts_ranks_nothing() {
    let trace = parse_trace(&json!([
        { "name": "Paint", "args": {} },
        { "name": "LayoutShift", "args": { "data": { "score": 0.1 } } }
    ]))
    .unwrap();
    assert!(rank_layout_shift_nodes(&trace.events).is_empty());
}

#[test]
fn test_zero_displacement_counts_full_area_once() {
    let trace = parse_trace(&json!({
        "traceEvents": [shift_event(vec![impacted(
            7,
            [0.0, 0.0, 10.0, 10.0],
            [0.0, 0.0, 10.0, 10.0],
        )])]
    }))
    .unwrap();

    let contributions = shift_contributions(&trace.events);

    assert_eq!(contributions.len(), 1);
    assert_eq!(contributions[0].node_id, TraceNodeId(7));
    assert_eq!(contributions[0].impact, 100.0);
}

#[test]
fn test_ranking_across_events() {
    let trace = parse_trace(&json!({
        "traceEvents": [
            shift_event(vec![
                impacted(1, [0.0, 0.0, 10.0, 10.0], [0.0, 5.0, 10.0, 10.0]),
                impacted(2, [0.0, 0.0, 20.0, 20.0], [0.0, 0.0, 20.0, 20.0]),
            ]),
            { "name": "Paint", "args": {} },
            shift_event(vec![
                impacted(1, [0.0, 0.0, 30.0, 30.0], [0.0, 0.0, 30.0, 30.0]),
                impacted(3, [0.0, 0.0, 1.0, 1.0], [5.0, 5.0, 1.0, 1.0]),
            ]),
        ]
    }))
    .unwrap();

    // node 1: 150 + 900, node 2: 400, node 3: 2
    assert_eq!(
        rank_layout_shift_nodes(&trace.events),
        vec![TraceNodeId(1), TraceNodeId(2), TraceNodeId(3)]
    );
}

#[test]
fn test_malformed_entries_are_skipped() {
    let trace = parse_trace(&json!([shift_event(vec![
        json!({ "node_id": 4, "old_rect": [0, 0, 1] , "new_rect": [0, 0, 1, 1] }),
        json!({ "old_rect": [0, 0, 1, 1], "new_rect": [0, 0, 1, 1] }),
        impacted(5, [0.0, 0.0, 2.0, 2.0], [0.0, 0.0, 2.0, 2.0]),
    ])]))
    .unwrap();

    assert_eq!(rank_layout_shift_nodes(&trace.events), vec![TraceNodeId(5)]);
}

#[test]
fn test_at_most_five_nodes() {
    let nodes = (1..=8)
        .map(|id| impacted(id, [0.0, 0.0, id as f64, 1.0], [0.0, 0.0, id as f64, 1.0]))
        .collect();
    let trace = parse_trace(&json!([shift_event(nodes)])).unwrap();

    let ranked = rank_layout_shift_nodes(&trace.events);

    assert_eq!(ranked.len(), 5);
    assert_eq!(ranked[0], TraceNodeId(8));
    assert_eq!(ranked[4], TraceNodeId(4));
}

#[test]
fn test_lcp_node_is_last_candidate() {
    let trace = parse_trace(&json!([
        { "name": "largestContentfulPaint::Candidate", "args": { "data": { "nodeId": 11 } } },
        { "name": "largestContentfulPaint::Candidate", "args": { "data": { "nodeId": 12 } } }
    ]))
    .unwrap();

    assert_eq!(lcp_node_id(&trace.events), Some(TraceNodeId(12)));
}
