//! Compact per-category listings with one-line summaries.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::category::Category;
use crate::util::ordinal;

use super::{Facets, IndexEntry, entry_order};

/// One line of a quick reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickRef {
    pub name: String,
    pub path: String,
    pub source: Option<String>,
    pub summary: String,
}

/// category → name-sorted quick references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QuickReferences(BTreeMap<Category, Vec<QuickRef>>);

impl QuickReferences {
    pub(crate) fn build(entries: &[IndexEntry]) -> Self {
        let mut sorted: Vec<&IndexEntry> = entries.iter().collect();
        sorted.sort_by(|a, b| entry_order(a, b));

        let mut grouped: BTreeMap<Category, Vec<QuickRef>> = BTreeMap::new();
        for entry in sorted {
            grouped.entry(entry.category).or_default().push(QuickRef {
                name: entry.name.clone(),
                path: entry.path.clone(),
                source: entry.source.clone(),
                summary: summarize(entry.category, &entry.facets),
            });
        }
        Self(grouped)
    }

    pub fn get(&self, category: Category) -> &[QuickRef] {
        self.0.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &[QuickRef])> {
        self.0.iter().map(|(c, refs)| (*c, refs.as_slice()))
    }
}

/// One-line summary of an entry, derived from its facets only.
pub fn summarize(category: Category, facets: &Facets) -> String {
    let text = |key: &str| facets.text(key).unwrap_or_default();
    let summary = match category {
        Category::Spell => {
            let school = facets.text("school");
            match (facets.integer("level"), school) {
                (Some(0), Some(school)) => format!("{school} cantrip"),
                (Some(0), None) => "Cantrip".to_string(),
                (Some(level), Some(school)) => format!("{}-level {school}", ordinal(level)),
                (Some(level), None) => format!("{}-level spell", ordinal(level)),
                (None, school) => school.unwrap_or_default(),
            }
        }
        Category::Creature => {
            let cr = facets
                .text("cr")
                .map(|cr| format!("CR {cr}"))
                .unwrap_or_default();
            join_words(&[cr, text("size"), text("type")])
        }
        Category::Item | Category::Equipment => {
            let mut summary = join_words(&[text("rarity"), text("item_type").to_lowercase()]);
            if facets.flag("attunement") {
                summary.push_str(" (requires attunement)");
            }
            summary
        }
        Category::Class => facets
            .integer("hit_die")
            .map(|die| format!("Hit die d{die}"))
            .unwrap_or_default(),
        Category::Subclass => facets
            .text("class")
            .map(|class| format!("{class} subclass"))
            .unwrap_or_default(),
        Category::Species => {
            let speed = facets
                .integer("speed")
                .map(|speed| format!("speed {speed} ft."))
                .unwrap_or_default();
            [text("size"), speed]
                .into_iter()
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(", ")
        }
        Category::Background => facets
            .text("skills")
            .map(|skills| format!("Skills: {skills}"))
            .unwrap_or_default(),
        Category::Feat => facets
            .text("feat_category")
            .or_else(|| {
                facets
                    .text("prerequisite")
                    .map(|p| format!("Prerequisite: {p}"))
            })
            .unwrap_or_default(),
        Category::Rule => text("rule_type"),
        Category::Action => text("time"),
        Category::Vehicle => join_words(&[text("size"), text("vehicle_type")]),
        Category::Trap => {
            let tier = facets
                .integer("tier")
                .map(|tier| format!("tier {tier}"))
                .unwrap_or_default();
            [text("trap_type"), tier]
                .into_iter()
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(", ")
        }
        Category::Deck => facets
            .integer("cards")
            .map(|n| format!("{n} cards"))
            .unwrap_or_default(),
        Category::Table => match (facets.integer("columns"), facets.integer("rows")) {
            (Some(c), Some(r)) => format!("{c} columns, {r} rows"),
            _ => String::new(),
        },
        Category::Condition => String::new(),
    };
    summary.trim().to_string()
}

fn join_words(parts: &[String]) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
