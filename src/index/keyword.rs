//! Facet keywords inverted to the entries that carry them.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::category::Category;

use super::IndexEntry;

/// Facets whose values become keywords.
pub const KEYWORD_FACETS: &[&str] = &[
    "damage_types",
    "conditions",
    "type",
    "movement",
    "immunities",
    "school",
    "rarity",
];

/// A `{name, path}` pointer under a keyword.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct KeywordRef {
    pub name: String,
    pub path: String,
}

/// keyword → category → entries, deduplicated and name-sorted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct KeywordIndex(BTreeMap<String, BTreeMap<Category, Vec<KeywordRef>>>);

impl KeywordIndex {
    pub(crate) fn build(entries: &[IndexEntry]) -> Self {
        let mut grouped: BTreeMap<String, BTreeMap<Category, BTreeSet<KeywordRef>>> =
            BTreeMap::new();

        for entry in entries {
            let keywords: BTreeSet<String> = KEYWORD_FACETS
                .iter()
                .flat_map(|facet| entry.facets.values(facet))
                .map(|value| value.trim().to_lowercase())
                .filter(|value| !value.is_empty())
                .collect();

            for keyword in keywords {
                grouped
                    .entry(keyword)
                    .or_default()
                    .entry(entry.category)
                    .or_default()
                    .insert(KeywordRef {
                        name: entry.name.clone(),
                        path: entry.path.clone(),
                    });
            }
        }

        Self(
            grouped
                .into_iter()
                .map(|(keyword, categories)| {
                    let categories = categories
                        .into_iter()
                        .map(|(category, refs)| {
                            let mut refs: Vec<KeywordRef> = refs.into_iter().collect();
                            refs.sort_by(|a, b| {
                                a.name
                                    .to_lowercase()
                                    .cmp(&b.name.to_lowercase())
                                    .then_with(|| a.cmp(b))
                            });
                            (category, refs)
                        })
                        .collect();
                    (keyword, categories)
                })
                .collect(),
        )
    }

    /// Entries under a keyword (case-insensitive).
    pub fn get(&self, keyword: &str) -> Option<&BTreeMap<Category, Vec<KeywordRef>>> {
        self.0.get(&keyword.trim().to_lowercase())
    }

    /// Every keyword, sorted.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
