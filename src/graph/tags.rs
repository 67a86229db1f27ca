//! Tag filters used when previewing an endpoint's reachable paths.

use std::collections::BTreeSet;

/// A set of labels parsed from a `"a, b c"` style field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagSet(BTreeSet<String>);

impl TagSet {
    /// Commas count as whitespace; empty tokens are dropped.
    pub fn parse(raw: &str) -> Self {
        TagSet(
            raw.replace(',', " ")
                .split_whitespace()
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// An empty set on either side always matches.
    pub fn matches(&self, other: &TagSet) -> bool {
        if self.is_empty() || other.is_empty() {
            return true;
        }
        self.0.iter().any(|tag| other.0.contains(tag))
    }
}

/// Convenience wrapper over two raw tag fields.
pub fn compare_tags(active: &str, candidate: &str) -> bool {
    TagSet::parse(active).matches(&TagSet::parse(candidate))
}
