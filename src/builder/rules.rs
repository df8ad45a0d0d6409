//! Rules, conditions, actions, decks and standalone tables.

use serde_json::Value;

use crate::category::Category;
use crate::index::Facets;
use crate::ir::Record;
use crate::markdown::{Renderer, join_blocks};

use super::common::{reference_name, time_text};
use super::spec::{CategorySpec, FieldRule, Part};

pub(crate) static RULE: CategorySpec = CategorySpec {
    category: Category::Rule,
    subtitle: |_, rec| {
        Some(match rule_type(rec) {
            Some(kind) => format!("{kind} rule"),
            None => "Rule".to_string(),
        })
    },
    parts: &[Part::Rule, Part::Entries("entries")],
    facets: |_, rec| {
        let mut facets = Facets::new();
        facets.insert_opt("rule_type", rule_type(rec));
        facets
    },
};

fn rule_type(rec: Record<'_>) -> Option<&'static str> {
    Some(match rec.str("ruleType")? {
        "C" => "Core",
        "O" => "Optional",
        "P" => "Prerelease",
        "V" => "Variant",
        "VO" => "Variant optional",
        "VV" => "Variant variant",
        "U" => "Unofficial",
        _ => return None,
    })
}

pub(crate) static CONDITION: CategorySpec = CategorySpec {
    category: Category::Condition,
    subtitle: |_, _| Some("Condition".to_string()),
    parts: &[Part::Rule, Part::Entries("entries")],
    facets: |_, _| Facets::new(),
};

const ACTION_FIELDS: &[FieldRule] = &[FieldRule::new("Time", action_time)];

pub(crate) static ACTION: CategorySpec = CategorySpec {
    category: Category::Action,
    subtitle: |_, _| Some("Action".to_string()),
    parts: &[
        Part::Fields(ACTION_FIELDS),
        Part::Rule,
        Part::Entries("entries"),
        Part::Custom(see_also),
    ],
    facets: |renderer, rec| {
        let mut facets = Facets::new();
        facets.insert_opt("time", action_time(renderer, rec));
        facets
    },
};

fn action_time(renderer: &Renderer, rec: Record<'_>) -> Option<String> {
    time_text(renderer, rec.array("time"))
}

fn see_also(_: &Renderer, rec: Record<'_>) -> String {
    let names: Vec<&str> = rec
        .strings("seeAlsoAction")
        .into_iter()
        .map(reference_name)
        .collect();
    if names.is_empty() {
        return String::new();
    }
    format!("*See also: {}*", names.join(", "))
}

pub(crate) static DECK: CategorySpec = CategorySpec {
    category: Category::Deck,
    subtitle: |_, _| Some("Deck".to_string()),
    parts: &[Part::Rule, Part::Entries("entries"), Part::Custom(card_list)],
    facets: |_, rec| {
        let mut facets = Facets::new();
        let count = cards(rec).iter().map(|(_, n)| n).sum::<i64>();
        if count > 0 {
            facets.insert("cards", count);
        }
        facets
    },
};

/// Card names with their copy counts.
fn cards(rec: Record<'_>) -> Vec<(&str, i64)> {
    rec.array("cards")
        .iter()
        .filter_map(|card| match card {
            Value::String(uid) => Some((reference_name(uid), 1)),
            Value::Object(map) => {
                let card = Record::new(map);
                let name = reference_name(card.str("uid")?);
                Some((name, card.i64("count").unwrap_or(1).max(1)))
            }
            _ => None,
        })
        .filter(|(name, _)| !name.is_empty())
        .collect()
}

fn card_list(renderer: &Renderer, rec: Record<'_>) -> String {
    let lines: Vec<String> = cards(rec)
        .into_iter()
        .map(|(name, count)| match count {
            1 => format!("- {name}"),
            n => format!("- {name} (×{n})"),
        })
        .collect();
    if lines.is_empty() {
        return String::new();
    }
    format!("{}\n\n{}", renderer.heading("Cards", 0, 0), lines.join("\n"))
}

pub(crate) static TABLE: CategorySpec = CategorySpec {
    category: Category::Table,
    subtitle: |_, _| Some("Table".to_string()),
    parts: &[Part::Rule, Part::Custom(table_body)],
    facets: |_, rec| {
        let mut facets = Facets::new();
        let (columns, rows) = table_shape(rec);
        if columns > 0 {
            facets.insert("columns", columns as i64);
            facets.insert("rows", rows as i64);
        }
        facets
    },
};

/// A single table, or each table of a table group under its own name.
fn table_body(renderer: &Renderer, rec: Record<'_>) -> String {
    let tables = rec.array("tables");
    if tables.is_empty() {
        return renderer.render_table(rec, 0);
    }
    join_blocks(tables.iter().map(|table| renderer.render_value(table, 0)))
}

fn table_shape(rec: Record<'_>) -> (usize, usize) {
    let shape = |table: Record<'_>| {
        let rows = table.array("rows");
        let widest = rows
            .iter()
            .filter_map(Value::as_array)
            .map(Vec::len)
            .max()
            .unwrap_or(0);
        (table.array("colLabels").len().max(widest), rows.len())
    };
    let tables = rec.array("tables");
    if tables.is_empty() {
        return shape(rec);
    }
    tables
        .iter()
        .filter_map(Record::from_value)
        .map(shape)
        .fold((0, 0), |(c, r), (tc, tr)| (c.max(tc), r + tr))
}
