//! Index collection over built documents.
//!
//! Builders emit one [`IndexEntry`] per document. The [`IndexCollector`]
//! accumulates them (append-only) and derives every browsing structure as
//! a pure re-grouping of the collected entries:
//!
//! - [`GlobalIndex`]: name-sorted flat listing with normalized-key lookup
//! - [`QuickReferences`]: compact per-category listings with summaries
//! - [`CrossReferences`]: facet groupings (creatures by CR, spells by level, ...)
//! - [`KeywordIndex`]: facet keywords inverted to the entries carrying them
//!
//! All derived outputs are sorted, so the order in which entries were added
//! (or collectors merged) never changes the result.

mod global;
mod keyword;
mod quick;
mod xref;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::category::Category;

pub use global::{GlobalEntry, GlobalIndex};
pub use keyword::{KEYWORD_FACETS, KeywordIndex, KeywordRef};
pub use quick::{QuickRef, QuickReferences, summarize};
pub use xref::{CrossReferences, EntryRef, FacetGroup, parse_challenge_rating};

/// One indexable attribute value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FacetValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Flag(bool),
    List(Vec<String>),
}

impl From<String> for FacetValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for FacetValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for FacetValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for FacetValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for FacetValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<Vec<String>> for FacetValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// Category-specific indexable attributes of one entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Facets(BTreeMap<String, FacetValue>);

impl Facets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a facet. Blank text, empty lists and `false` flags are dropped.
    pub fn insert(&mut self, key: &str, value: impl Into<FacetValue>) {
        let value = value.into();
        let keep = match &value {
            FacetValue::Text(text) => !text.trim().is_empty(),
            FacetValue::List(items) => !items.is_empty(),
            FacetValue::Flag(flag) => *flag,
            FacetValue::Integer(_) => true,
            FacetValue::Number(n) => n.is_finite(),
        };
        if keep {
            self.0.insert(key.to_string(), value);
        }
    }

    /// Insert a facet when present.
    pub fn insert_opt<V: Into<FacetValue>>(&mut self, key: &str, value: Option<V>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&FacetValue> {
        self.0.get(key)
    }

    /// A facet as display text (lists are joined with `, `).
    pub fn text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            FacetValue::Text(text) => Some(text.clone()),
            FacetValue::Integer(n) => Some(n.to_string()),
            FacetValue::Number(n) => Some(n.to_string()),
            FacetValue::Flag(flag) => Some(flag.to_string()),
            FacetValue::List(items) => Some(items.join(", ")),
        }
    }

    /// A numeric facet.
    pub fn number(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            FacetValue::Integer(n) => Some(*n as f64),
            FacetValue::Number(n) => Some(*n),
            FacetValue::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    /// An integer facet.
    pub fn integer(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            FacetValue::Integer(n) => Some(*n),
            FacetValue::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    /// Whether a flag facet is set.
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.get(key), Some(FacetValue::Flag(true)))
    }

    /// A facet as a list of values (a single text value is a one-item list).
    pub fn values(&self, key: &str) -> Vec<&str> {
        match self.get(key) {
            Some(FacetValue::Text(text)) => vec![text.as_str()],
            Some(FacetValue::List(items)) => items.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FacetValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Flat summary record for one built document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexEntry {
    pub name: String,
    pub category: Category,
    pub source: Option<String>,
    /// Output path relative to the output root.
    pub path: String,
    pub facets: Facets,
}

/// Append-only accumulator of index entries.
///
/// Owned by a single writer (the converter); independent collectors can be
/// combined with [`IndexCollector::merge`].
#[derive(Debug, Clone, Default)]
pub struct IndexCollector {
    entries: Vec<IndexEntry>,
}

impl IndexCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add entries for one category.
    ///
    /// May be called repeatedly; entries whose category differs are
    /// re-tagged to `category`.
    pub fn add(&mut self, category: Category, entries: impl IntoIterator<Item = IndexEntry>) {
        self.entries.extend(entries.into_iter().map(|mut entry| {
            entry.category = category;
            entry
        }));
    }

    /// Add a single entry.
    pub fn push(&mut self, entry: IndexEntry) {
        self.entries.push(entry);
    }

    /// Absorb every entry of another collector.
    pub fn merge(&mut self, other: IndexCollector) {
        self.entries.extend(other.entries);
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries of one category, sorted by name.
    pub fn by_category(&self, category: Category) -> Vec<&IndexEntry> {
        let mut entries: Vec<&IndexEntry> = self
            .entries
            .iter()
            .filter(|entry| entry.category == category)
            .collect();
        entries.sort_by(|a, b| entry_order(a, b));
        entries
    }

    /// Categories that have at least one entry, in [`Category::ALL`] order.
    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|category| self.entries.iter().any(|e| e.category == *category))
            .collect()
    }

    pub fn build_global_index(&self) -> GlobalIndex {
        GlobalIndex::build(&self.entries)
    }

    pub fn build_quick_references(&self) -> QuickReferences {
        QuickReferences::build(&self.entries)
    }

    pub fn build_cross_references(&self) -> CrossReferences {
        CrossReferences::build(&self.entries)
    }

    pub fn build_keyword_index(&self) -> KeywordIndex {
        KeywordIndex::build(&self.entries)
    }
}

/// Total order over entries: name (case-insensitive), then category,
/// source and path.
pub(crate) fn entry_order(a: &IndexEntry, b: &IndexEntry) -> std::cmp::Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.category.cmp(&b.category))
        .then_with(|| a.source.cmp(&b.source))
        .then_with(|| a.path.cmp(&b.path))
}
