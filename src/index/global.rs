//! Name-sorted global index with normalized-key lookup.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::category::Category;
use crate::markdown::normalize_key;

use super::{IndexEntry, entry_order};

/// One row of the global index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlobalEntry {
    pub name: String,
    pub category: Category,
    pub source: Option<String>,
    pub path: String,
}

/// Flat listing of every entry plus per-category name listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalIndex {
    pub total: usize,
    pub entries: Vec<GlobalEntry>,
    pub categories: BTreeMap<Category, Vec<String>>,
    #[serde(skip)]
    keys: HashMap<String, Vec<usize>>,
}

impl GlobalIndex {
    pub(crate) fn build(entries: &[IndexEntry]) -> Self {
        let mut sorted: Vec<&IndexEntry> = entries.iter().collect();
        sorted.sort_by(|a, b| entry_order(a, b));

        let entries: Vec<GlobalEntry> = sorted
            .into_iter()
            .map(|entry| GlobalEntry {
                name: entry.name.clone(),
                category: entry.category,
                source: entry.source.clone(),
                path: entry.path.clone(),
            })
            .collect();

        let mut categories: BTreeMap<Category, Vec<String>> = BTreeMap::new();
        let mut keys: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, entry) in entries.iter().enumerate() {
            categories
                .entry(entry.category)
                .or_default()
                .push(entry.name.clone());
            keys.entry(normalize_key(&entry.name)).or_default().push(i);
        }

        Self {
            total: entries.len(),
            entries,
            categories,
            keys,
        }
    }

    /// Look up an entry by name.
    ///
    /// The key is normalized (case-folded, punctuation stripped, whitespace
    /// collapsed). When several entries share the key, the first in index
    /// order wins unless `category` narrows the candidates.
    pub fn lookup(&self, key: &str, category: Option<Category>) -> Option<&GlobalEntry> {
        self.candidates(key)
            .find(|entry| category.is_none_or(|c| entry.category == c))
    }

    /// Every entry whose name normalizes to `key`, in index order.
    pub fn lookup_all(&self, key: &str) -> Vec<&GlobalEntry> {
        self.candidates(key).collect()
    }

    fn candidates(&self, key: &str) -> impl Iterator<Item = &GlobalEntry> {
        self.keys
            .get(&normalize_key(key))
            .into_iter()
            .flatten()
            .filter_map(|&i| self.entries.get(i))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{Facets, IndexCollector};

    fn collector() -> IndexCollector {
        let mut collector = IndexCollector::new();
        for (name, category, path) in [
            ("Shield", Category::Spell, "spells/shield.md"),
            ("Shield", Category::Equipment, "equipment/shield.md"),
            ("Acid Splash", Category::Spell, "spells/acid-splash.md"),
            ("goblin", Category::Creature, "bestiary/goblin.md"),
        ] {
            collector.push(IndexEntry {
                name: name.to_string(),
                category,
                source: Some("PHB".to_string()),
                path: path.to_string(),
                facets: Facets::new(),
            });
        }
        collector
    }

    #[test]
    fn test_entries_are_name_sorted() {
        let index = collector().build_global_index();
        let names: Vec<&str> = index.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Acid Splash", "goblin", "Shield", "Shield"]);
        assert_eq!(index.total, 4);
        assert_eq!(index.categories[&Category::Spell], vec!["Acid Splash", "Shield"]);
    }

    #[test]
    fn test_lookup_normalizes_key() {
        let index = collector().build_global_index();
        let hit = index.lookup("  ACID splash!! ", None).unwrap();
        assert_eq!(hit.path, "spells/acid-splash.md");
        assert!(index.lookup("acid-splash", None).is_none());
    }

    #[test]
    fn test_ambiguous_lookup_first_match_then_filter() {
        let index = collector().build_global_index();
        // Spell sorts before Equipment in category order
        assert_eq!(index.lookup("shield", None).unwrap().category, Category::Spell);
        assert_eq!(
            index
                .lookup("shield", Some(Category::Equipment))
                .unwrap()
                .path,
            "equipment/shield.md"
        );
        assert_eq!(index.lookup_all("Shield").len(), 2);
        assert!(index.lookup("shield", Some(Category::Creature)).is_none());
    }
}
