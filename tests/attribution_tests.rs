use pageload_insights::aggregator::attribute;
use pageload_insights::parser::{Mapping, SourceMap};
use pageload_insights::utils::error::SourceMapError;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn sources(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("src/module{}.js", i)).collect()
}

prop_compose! {
    fn content_and_map()(
        lines in prop::collection::vec("[a-z é😀{};]{0,40}", 1..6),
        source_count in 1usize..4,
    )(
        mappings in prop::collection::vec(
            (0u32..8, 0u32..50, prop::option::of(0..source_count)),
            0..20,
        ),
        lines in Just(lines),
        source_count in Just(source_count),
    ) -> (String, SourceMap) {
        let mappings = mappings
            .into_iter()
            .map(|(line, column, source)| Mapping::new(line, column, source))
            .collect();
        (lines.join("\n"), SourceMap::new(sources(source_count), mappings))
    }
}

proptest! {
    #[test]
    fn attribution_sums_to_bundle_length((content, map) in content_and_map()) {
        let attribution = attribute(&content, &map).unwrap();
        let total: u64 = attribution.iter().map(|entry| entry.bytes).sum();
        prop_assert_eq!(total, content.len() as u64);
    }

    #[test]
    fn attribution_names_each_source_once((content, map) in content_and_map()) {
        let attribution = attribute(&content, &map).unwrap();
        let mut names: Vec<_> = attribution.iter().map(|entry| entry.source.clone()).collect();
        let before = names.len();
        names.sort();
        names.dedup();
        prop_assert_eq!(names.len(), before);
    }
}

#[test]
fn test_decoded_map_end_to_end() {
    let map = SourceMap::from_json(
        r#"{
            "version": 3,
            "sources": ["a.js", "b.js"],
            "sourceRoot": "webpack:///",
            "mappings": "AAAA,IAAI;ACAA"
        }"#,
    )
    .unwrap();

    let attribution = attribute("abcdefgh\nxyz", &map).unwrap();

    let pairs: Vec<(Option<&str>, u64)> = attribution
        .iter()
        .map(|entry| (entry.source.as_deref(), entry.bytes))
        .collect();
    assert_eq!(pairs, vec![(Some("webpack:///a.js"), 9), (Some("webpack:///b.js"), 3)]);
}

#[test]
fn test_leading_unmapped_bytes() {
    let map = SourceMap::new(sources(1), vec![Mapping::new(0, 4, Some(0))]);
    let attribution = attribute("var x=1;", &map).unwrap();

    assert_eq!(attribution.len(), 2);
    assert_eq!(attribution[0].source, None);
    assert_eq!(attribution[0].bytes, 4);
    assert_eq!(attribution[1].bytes, 4);
}

#[test]
fn test_map_without_mappings() {
    let attribution = attribute("console.log(1)", &SourceMap::new(sources(2), vec![])).unwrap();
    assert_eq!(attribution.len(), 1);
    assert_eq!(attribution[0].source, None);
    assert_eq!(attribution[0].bytes, 14);
}

#[test]
fn test_undeclared_source_index() {
    let map = SourceMap::new(sources(1), vec![Mapping::new(0, 0, Some(3))]);
    let result = attribute("abc", &map);
    assert!(matches!(result, Err(SourceMapError::InvalidSourceMap(_))));
}
