//! Duplicated module detection across bundles.
//!
//! Sources are reduced to a canonical key (third-party packages collapse to
//! their package name), then every key attributed in two or more bundles
//! forms a group. One copy per group - the largest - is treated as the one
//! the page needs; every other copy counts as wasted bytes. This is an
//! upper-bound heuristic, not a byte-level diff.

use super::attribution::BundleRecord;
use super::rank::{rank_descending, WeightedTally};
use crate::utils::config::OTHER_GROUP_NAME;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

const NODE_MODULES: &str = "node_modules/";

/// Source paths that are bundler runtime or shims rather than module code
const IGNORED_SOURCE_MARKERS: &[&str] = &["webpack/bootstrap", "(webpack)/buildin", "external "];

/// One module shipped in several bundles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// Canonical source name, or "Other"
    pub source: String,

    /// Member bundle urls, in input order
    pub urls: Vec<String>,

    /// Bytes of this source in each member bundle (parallel to `urls`)
    pub source_bytes: Vec<u64>,

    /// `sum(source_bytes) - max(source_bytes)` for real groups; for "Other",
    /// the waste of groups below the reporting threshold
    pub wasted_bytes: u64,
}

impl DuplicateGroup {
    pub fn is_other(&self) -> bool {
        self.source == OTHER_GROUP_NAME
    }
}

/// Waste credited to one bundle url
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlWaste {
    pub url: String,
    pub wasted_bytes: u64,
}

/// Result of a duplication pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicationReport {
    /// Reported groups, heaviest first, "Other" last
    pub groups: Vec<DuplicateGroup>,

    /// Waste per bundle url, in the order urls were first credited
    pub wasted_bytes_by_url: Vec<UrlWaste>,
}

impl DuplicationReport {
    /// Waste credited to `url` (0 if none)
    pub fn wasted_bytes_for(&self, url: &str) -> u64 {
        self.wasted_bytes_by_url
            .iter()
            .find(|entry| entry.url == url)
            .map_or(0, |entry| entry.wasted_bytes)
    }

    /// Total waste across all urls
    pub fn total_wasted_bytes(&self) -> u64 {
        self.wasted_bytes_by_url.iter().map(|e| e.wasted_bytes).sum()
    }

    /// The synthetic "Other" group
    pub fn other(&self) -> Option<&DuplicateGroup> {
        self.groups.iter().find(|g| g.is_other())
    }
}

/// Trim bundler noise and keep everything from the last `node_modules` on
pub fn normalize_source(source: &str) -> &str {
    let source = source.strip_suffix('?').unwrap_or(source);
    match source.rfind("node_modules") {
        Some(index) => &source[index..],
        None => source,
    }
}

/// Whether a source is bundler runtime rather than module code
pub fn is_ignored_source(source: &str) -> bool {
    IGNORED_SOURCE_MARKERS
        .iter()
        .any(|marker| source.contains(marker))
}

/// Package name (`pkg` or `@scope/pkg`) of the innermost `node_modules` entry
///
/// Returns `None` for paths outside `node_modules`.
pub fn node_module_name(source: &str) -> Option<&str> {
    let index = source.rfind(NODE_MODULES)?;
    let rest = &source[index + NODE_MODULES.len()..];

    let mut segments = rest.match_indices('/').map(|(i, _)| i);
    let boundary = if rest.starts_with('@') {
        segments.nth(1)
    } else {
        segments.next()
    };
    let end = boundary.unwrap_or(rest.len());

    let name = &rest[..end];
    (!name.is_empty()).then_some(name)
}

/// Grouping key of a source path
pub fn canonical_source_name(source: &str) -> String {
    let source = normalize_source(source);
    match node_module_name(source) {
        Some(name) => format!("{}{}", NODE_MODULES, name),
        None => source.to_string(),
    }
}

/// Per-bundle bytes keyed by canonical source, plus unattributed bytes
struct BundleSources<'a> {
    url: &'a str,
    by_key: Vec<(String, u64)>,
    unattributed: u64,
}

fn collect_bundle_sources(bundle: &BundleRecord) -> BundleSources<'_> {
    let mut tally: WeightedTally<String, u64> = WeightedTally::new();
    let mut unattributed = 0;

    for entry in &bundle.attribution {
        match entry.source.as_deref() {
            Some(source) if !is_ignored_source(source) => {
                tally.add(canonical_source_name(source), entry.bytes);
            }
            _ => unattributed += entry.bytes,
        }
    }

    BundleSources {
        url: &bundle.url,
        by_key: tally.into_entries(),
        unattributed,
    }
}

/// Find modules duplicated across bundles
///
/// **Public** - main entry point for duplicate detection
///
/// # Arguments
/// * `bundles` - Attributed bundles, in page order
/// * `ignore_threshold_bytes` - Groups wasting less than this are folded into "Other"
///
/// # Returns
/// Groups sorted by descending waste with "Other" last (always present),
/// and the waste credited to each bundle url.
pub fn detect_duplicates(bundles: &[BundleRecord], ignore_threshold_bytes: u64) -> DuplicationReport {
    let per_bundle: Vec<BundleSources> = bundles.iter().map(collect_bundle_sources).collect();

    // canonical key -> [(bundle index, bytes)], keys in first-seen order
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut members: Vec<(&str, Vec<(usize, u64)>)> = Vec::new();
    for (bundle_index, bundle) in per_bundle.iter().enumerate() {
        for (key, bytes) in &bundle.by_key {
            let slot = *slots.entry(key.as_str()).or_insert_with(|| {
                members.push((key.as_str(), Vec::new()));
                members.len() - 1
            });
            members[slot].1.push((bundle_index, *bytes));
        }
    }

    let mut groups = Vec::new();
    let mut url_waste: WeightedTally<&str, u64> = WeightedTally::new();
    let mut other_wasted = 0;
    let mut other_members: BTreeSet<usize> = BTreeSet::new();

    for (key, copies) in members.into_iter().filter(|(_, copies)| copies.len() >= 2) {
        let free_copy = largest_copy(&copies);
        for (position, &(bundle_index, bytes)) in copies.iter().enumerate() {
            if position != free_copy {
                url_waste.add(per_bundle[bundle_index].url, bytes);
            }
        }

        let total: u64 = copies.iter().map(|(_, bytes)| bytes).sum();
        let wasted_bytes = total - copies[free_copy].1;

        if wasted_bytes < ignore_threshold_bytes {
            debug!("Folding {} ({} wasted bytes) into Other", key, wasted_bytes);
            other_wasted += wasted_bytes;
            other_members.extend(copies.iter().map(|(bundle_index, _)| *bundle_index));
            continue;
        }

        groups.push(DuplicateGroup {
            source: key.to_string(),
            urls: copies
                .iter()
                .map(|(bundle_index, _)| per_bundle[*bundle_index].url.to_string())
                .collect(),
            source_bytes: copies.iter().map(|(_, bytes)| *bytes).collect(),
            wasted_bytes,
        });
    }

    rank_descending(&mut groups, |group| group.wasted_bytes);

    other_members.extend(
        per_bundle
            .iter()
            .enumerate()
            .filter(|(_, bundle)| bundle.unattributed > 0)
            .map(|(bundle_index, _)| bundle_index),
    );
    groups.push(DuplicateGroup {
        source: OTHER_GROUP_NAME.to_string(),
        urls: other_members
            .iter()
            .map(|&bundle_index| per_bundle[bundle_index].url.to_string())
            .collect(),
        source_bytes: other_members
            .iter()
            .map(|&bundle_index| per_bundle[bundle_index].unattributed)
            .collect(),
        wasted_bytes: other_wasted,
    });

    debug!("Found {} duplicated modules", groups.len() - 1);

    DuplicationReport {
        groups,
        wasted_bytes_by_url: url_waste
            .into_entries()
            .into_iter()
            .map(|(url, wasted_bytes)| UrlWaste {
                url: url.to_string(),
                wasted_bytes,
            })
            .collect(),
    }
}

/// Position of the copy treated as the one the page keeps
///
/// Ties at the maximum go to the last copy encountered.
fn largest_copy(copies: &[(usize, u64)]) -> usize {
    let mut best = 0;
    for (position, &(_, bytes)) in copies.iter().enumerate() {
        if bytes >= copies[best].1 {
            best = position;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_module_name() {
        let cases = [
            ("node_modules/package/othermodule.js", "package"),
            ("node_modules/somemodule/node_modules/package/othermodule.js", "package"),
            (
                "node_modules/somemodule/node_modules/somemodule2/node_modules/somemodule2/othermodule.js",
                "somemodule2",
            ),
            ("node_modules/@lh/ci", "@lh/ci"),
            ("node_modules/blahblah/node_modules/@lh/ci", "@lh/ci"),
        ];
        for (input, expected) in cases {
            assert_eq!(node_module_name(input), Some(expected), "{}", input);
        }
        assert_eq!(node_module_name("src/app.js"), None);
        assert_eq!(node_module_name("node_modules/"), None);
    }

    #[test]
    fn test_canonical_source_name() {
        assert_eq!(
            canonical_source_name("webpack:///./node_modules/@babel/runtime/helpers/extends.js"),
            "node_modules/@babel/runtime"
        );
        assert_eq!(
            canonical_source_name("webpack:///./node_modules/lodash/map.js?"),
            "node_modules/lodash"
        );
        assert_eq!(
            canonical_source_name("js/src/search/results/store/filter-store.ts"),
            "js/src/search/results/store/filter-store.ts"
        );
    }

    #[test]
    fn test_ignored_sources() {
        assert!(is_ignored_source("webpack:///webpack/bootstrap"));
        assert!(is_ignored_source("webpack:///(webpack)/buildin/global.js"));
        assert!(is_ignored_source("external \"React\""));
        assert!(!is_ignored_source("src/webpack-config-helper.js"));
    }

    #[test]
    fn test_largest_copy_tie_goes_to_last() {
        assert_eq!(largest_copy(&[(0, 10), (1, 10)]), 1);
        assert_eq!(largest_copy(&[(0, 12), (1, 10), (2, 11)]), 0);
        assert_eq!(largest_copy(&[(0, 5), (1, 9), (2, 9), (3, 1)]), 2);
    }
}
