//! Cross-reference tables: entries regrouped by facet.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::category::Category;

use super::IndexEntry;

/// A pointer to an entry inside a facet group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryRef {
    pub name: String,
    pub path: String,
    pub source: Option<String>,
}

/// All entries sharing one facet value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetGroup {
    pub key: String,
    pub entries: Vec<EntryRef>,
}

/// Facet groupings of already-collected entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrossReferences {
    pub creatures_by_cr: Vec<FacetGroup>,
    pub creatures_by_type: Vec<FacetGroup>,
    pub spells_by_level: Vec<FacetGroup>,
    pub spells_by_school: Vec<FacetGroup>,
    pub spells_by_class: Vec<FacetGroup>,
    pub items_by_rarity: Vec<FacetGroup>,
}

impl CrossReferences {
    pub(crate) fn build(entries: &[IndexEntry]) -> Self {
        Self {
            creatures_by_cr: group(entries, Category::Creature, "cr", by_challenge_rating),
            creatures_by_type: group(entries, Category::Creature, "type", by_text),
            spells_by_level: group(entries, Category::Spell, "level", by_number),
            spells_by_school: group(entries, Category::Spell, "school", by_text),
            spells_by_class: group(entries, Category::Spell, "classes", by_text),
            items_by_rarity: group(entries, Category::Item, "rarity", by_rarity),
        }
    }

    /// Look up one group of a table by key.
    pub fn find<'a>(groups: &'a [FacetGroup], key: &str) -> Option<&'a FacetGroup> {
        groups.iter().find(|group| group.key == key)
    }
}

/// Numeric value of a challenge rating (`1/8` → 0.125, `5` → 5.0).
pub fn parse_challenge_rating(cr: &str) -> Option<f64> {
    let cr = cr.trim();
    match cr.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            (den != 0.0).then(|| num / den)
        }
        None => cr.parse().ok(),
    }
}

fn group(
    entries: &[IndexEntry],
    category: Category,
    facet: &str,
    order: fn(&str, &str) -> Ordering,
) -> Vec<FacetGroup> {
    let mut grouped: BTreeMap<String, Vec<EntryRef>> = BTreeMap::new();
    for entry in entries.iter().filter(|e| e.category == category) {
        let mut keys: Vec<String> = match entry.facets.get(facet) {
            Some(super::FacetValue::Integer(n)) => vec![n.to_string()],
            _ => entry
                .facets
                .values(facet)
                .into_iter()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .collect(),
        };
        keys.sort();
        keys.dedup();
        for key in keys {
            grouped.entry(key).or_default().push(EntryRef {
                name: entry.name.clone(),
                path: entry.path.clone(),
                source: entry.source.clone(),
            });
        }
    }

    let mut groups: Vec<FacetGroup> = grouped
        .into_iter()
        .map(|(key, mut entries)| {
            entries.sort_by(|a, b| {
                a.name
                    .to_lowercase()
                    .cmp(&b.name.to_lowercase())
                    .then_with(|| a.path.cmp(&b.path))
            });
            FacetGroup { key, entries }
        })
        .collect();
    groups.sort_by(|a, b| order(&a.key, &b.key));
    groups
}

fn by_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

fn by_number(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        _ => by_text(a, b),
    }
}

fn by_challenge_rating(a: &str, b: &str) -> Ordering {
    match (parse_challenge_rating(a), parse_challenge_rating(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        _ => by_text(a, b),
    }
}

/// Rarity in ascending order of power; unknown rarities sort last.
fn rarity_rank(rarity: &str) -> usize {
    const ORDER: &[&str] = &[
        "none",
        "common",
        "uncommon",
        "rare",
        "very rare",
        "legendary",
        "artifact",
        "varies",
    ];
    ORDER
        .iter()
        .position(|r| r.eq_ignore_ascii_case(rarity))
        .unwrap_or(ORDER.len())
}

fn by_rarity(a: &str, b: &str) -> Ordering {
    rarity_rank(a)
        .cmp(&rarity_rank(b))
        .then_with(|| by_text(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{Facets, IndexCollector};

    fn creature(name: &str, cr: &str, kind: &str) -> IndexEntry {
        let mut facets = Facets::new();
        facets.insert("cr", cr);
        facets.insert("type", kind);
        IndexEntry {
            name: name.to_string(),
            category: Category::Creature,
            source: Some("MM".to_string()),
            path: format!("bestiary/{}.md", name.to_lowercase()),
            facets,
        }
    }

    #[test]
    fn test_parse_challenge_rating() {
        assert_eq!(parse_challenge_rating("1/8"), Some(0.125));
        assert_eq!(parse_challenge_rating("1/2"), Some(0.5));
        assert_eq!(parse_challenge_rating("10"), Some(10.0));
        assert_eq!(parse_challenge_rating("1/0"), None);
        assert_eq!(parse_challenge_rating("Unknown"), None);
    }

    #[test]
    fn test_creatures_by_cr_numeric_order() {
        let mut collector = IndexCollector::new();
        collector.push(creature("Dragon", "10", "dragon"));
        collector.push(creature("Rat", "0", "beast"));
        collector.push(creature("Goblin", "1/4", "humanoid"));
        collector.push(creature("Ogre", "2", "giant"));
        collector.push(creature("Kobold", "1/8", "humanoid"));

        let xref = collector.build_cross_references();
        let keys: Vec<&str> = xref.creatures_by_cr.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["0", "1/8", "1/4", "2", "10"]);

        let humanoids = CrossReferences::find(&xref.creatures_by_type, "humanoid").unwrap();
        let names: Vec<&str> = humanoids.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Goblin", "Kobold"]);
    }

    #[test]
    fn test_spells_by_level_and_class() {
        let mut collector = IndexCollector::new();
        for (name, level, classes) in [
            ("Fireball", 3, vec!["Sorcerer", "Wizard"]),
            ("Light", 0, vec!["Wizard"]),
            ("Wish", 9, vec!["Wizard"]),
        ] {
            let mut facets = Facets::new();
            facets.insert("level", level as i64);
            facets.insert("classes", classes.iter().map(|c| c.to_string()).collect::<Vec<_>>());
            collector.push(IndexEntry {
                name: name.to_string(),
                category: Category::Spell,
                source: None,
                path: format!("spells/{}.md", name.to_lowercase()),
                facets,
            });
        }
        let xref = collector.build_cross_references();
        let levels: Vec<&str> = xref.spells_by_level.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(levels, vec!["0", "3", "9"]);
        assert_eq!(
            CrossReferences::find(&xref.spells_by_class, "Wizard").unwrap().entries.len(),
            3
        );
        assert!(xref.items_by_rarity.is_empty());
    }

    #[test]
    fn test_items_by_rarity_order() {
        let mut collector = IndexCollector::new();
        for (name, rarity) in [("Vorpal", "legendary"), ("Potion", "common"), ("Bag", "uncommon")] {
            let mut facets = Facets::new();
            facets.insert("rarity", rarity);
            collector.push(IndexEntry {
                name: name.to_string(),
                category: Category::Item,
                source: None,
                path: format!("items/{}.md", name.to_lowercase()),
                facets,
            });
        }
        let xref = collector.build_cross_references();
        let keys: Vec<&str> = xref.items_by_rarity.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["common", "uncommon", "legendary"]);
    }
}
