//! Magic items and mundane equipment.
//!
//! Both categories share one layout; equipment records usually carry no
//! rarity, so their subtitle is just the item kind.

use serde_json::Value;

use crate::category::Category;
use crate::index::Facets;
use crate::ir::{Record, number_text};
use crate::markdown::Renderer;
use crate::util::capitalize;

use super::common::{coin_text, damage_type_name, reference_name};
use super::spec::{CategorySpec, FieldRule, Part};

const FIELDS: &[FieldRule] = &[
    FieldRule::new("Weight", weight),
    FieldRule::new("Value", value),
    FieldRule::new("Damage", damage),
    FieldRule::new("Properties", properties),
    FieldRule::new("Range", range),
    FieldRule::new("Armor Class", armor_class),
    FieldRule::new("Strength", strength),
    FieldRule::new("Stealth", stealth),
    FieldRule::new("Charges", charges),
];

const PARTS: &[Part] = &[
    Part::Fields(FIELDS),
    Part::Rule,
    Part::Entries("entries"),
    Part::Entries("additionalEntries"),
];

pub(crate) static ITEM: CategorySpec = CategorySpec {
    category: Category::Item,
    subtitle,
    parts: PARTS,
    facets,
};

pub(crate) static EQUIPMENT: CategorySpec = CategorySpec {
    category: Category::Equipment,
    subtitle,
    parts: PARTS,
    facets,
};

/// Item kind for a type code (`M`, `LA`, `P|XPHB`, ...).
fn type_label(code: &str) -> Option<&'static str> {
    Some(match reference_name(code) {
        "M" => "melee weapon",
        "R" => "ranged weapon",
        "A" | "AF" => "ammunition",
        "LA" => "light armor",
        "MA" => "medium armor",
        "HA" => "heavy armor",
        "S" => "shield",
        "G" => "adventuring gear",
        "P" => "potion",
        "RD" => "rod",
        "RG" => "ring",
        "SC" => "scroll",
        "WD" => "wand",
        "ST" => "staff",
        "INS" => "musical instrument",
        "AT" => "artisan's tools",
        "T" => "tools",
        "GS" => "gaming set",
        "SCF" => "spellcasting focus",
        "TAH" => "tack and harness",
        "TG" => "trade good",
        "MNT" => "mount",
        "VEH" => "vehicle (land)",
        "AIR" => "vehicle (air)",
        "SHP" => "vehicle (water)",
        "FD" => "food and drink",
        "EXP" => "explosive",
        "$" | "$C" | "$A" | "$G" => "treasure",
        "OTH" => "other",
        _ => return None,
    })
}

/// The kind of item, e.g. `Wondrous item`, `Martial melee weapon`, `Potion`.
fn kind(rec: Record<'_>) -> Option<String> {
    let label = rec.str("type").and_then(type_label);
    let text = match (label, rec.str("weaponCategory")) {
        _ if rec.flag("wondrous") => "wondrous item".to_string(),
        (Some(label), Some(category)) => format!("{} {label}", category.to_lowercase()),
        (Some(label), None) => label.to_string(),
        (None, Some(category)) => format!("{} weapon", category.to_lowercase()),
        (None, None) if rec.flag("staff") => "staff".to_string(),
        (None, None) => return None,
    };
    Some(capitalize(&text))
}

fn rarity(rec: Record<'_>) -> Option<&str> {
    rec.str("rarity")
        .filter(|r| !matches!(r.to_ascii_lowercase().as_str(), "none" | "unknown"))
}

fn attunement(renderer: &Renderer, rec: Record<'_>) -> Option<String> {
    match rec.get("reqAttune")? {
        Value::Bool(true) => Some("requires attunement".to_string()),
        Value::String(text) if text.trim().is_empty() => None,
        Value::String(text) => Some(format!("requires attunement {}", renderer.expand(text))),
        _ => None,
    }
}

fn subtitle(renderer: &Renderer, rec: Record<'_>) -> Option<String> {
    let mut line = [kind(rec), rarity(rec).map(str::to_string)]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ");
    if let Some(attune) = attunement(renderer, rec) {
        if line.is_empty() {
            line = capitalize(&attune);
        } else {
            line.push_str(&format!(" ({attune})"));
        }
    }
    (!line.is_empty()).then_some(line)
}

fn weight(_: &Renderer, rec: Record<'_>) -> Option<String> {
    match rec.get("weight")? {
        Value::Number(n) => Some(format!("{} lb.", number_text(n))),
        _ => None,
    }
}

fn value_cp(rec: Record<'_>) -> Option<i64> {
    rec.i64("value").filter(|v| *v > 0)
}

fn value(_: &Renderer, rec: Record<'_>) -> Option<String> {
    value_cp(rec).map(coin_text)
}

fn damage_type(rec: Record<'_>) -> Option<&'static str> {
    rec.str("dmgType").and_then(damage_type_name)
}

fn damage(_: &Renderer, rec: Record<'_>) -> Option<String> {
    let dice = rec.str("dmg1")?;
    let mut text = match damage_type(rec) {
        Some(kind) => format!("{dice} {kind}"),
        None => dice.to_string(),
    };
    if let Some(versatile) = rec.str("dmg2") {
        text.push_str(&format!(" (versatile {versatile})"));
    }
    Some(text)
}

/// Weapon property codes with their display names.
fn property_name(code: &str) -> Option<&'static str> {
    Some(match reference_name(code) {
        "A" => "ammunition",
        "AF" => "ammunition (firearm)",
        "BF" => "burst fire",
        "F" => "finesse",
        "H" => "heavy",
        "L" => "light",
        "LD" => "loading",
        "R" => "reach",
        "RLD" => "reload",
        "S" => "special",
        "T" => "thrown",
        "2H" => "two-handed",
        "V" => "versatile",
        _ => return None,
    })
}

fn property_codes(rec: Record<'_>) -> Vec<&str> {
    rec.array("property")
        .iter()
        .filter_map(|p| match p {
            Value::String(code) => Some(code.as_str()),
            Value::Object(map) => map.get("uid").and_then(Value::as_str),
            _ => None,
        })
        .collect()
}

fn property_names(rec: Record<'_>) -> Vec<String> {
    property_codes(rec)
        .into_iter()
        .filter_map(property_name)
        .map(str::to_string)
        .collect()
}

fn has_ranged_property(rec: Record<'_>) -> bool {
    property_codes(rec)
        .into_iter()
        .any(|code| matches!(reference_name(code), "T" | "A" | "AF"))
}

fn properties(_: &Renderer, rec: Record<'_>) -> Option<String> {
    let range = rec.str("range");
    let parts: Vec<String> = property_codes(rec)
        .into_iter()
        .filter_map(|code| {
            let name = capitalize(property_name(code)?);
            Some(match (reference_name(code), range, rec.str("dmg2")) {
                ("T" | "A" | "AF", Some(range), _) => format!("{name} (range {range})"),
                ("V", _, Some(versatile)) => format!("{name} ({versatile})"),
                _ => name,
            })
        })
        .collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}

fn range(_: &Renderer, rec: Record<'_>) -> Option<String> {
    if has_ranged_property(rec) {
        return None;
    }
    rec.str("range").map(|range| format!("{range} ft."))
}

fn armor_class(_: &Renderer, rec: Record<'_>) -> Option<String> {
    let ac = rec.i64("ac")?;
    let code = rec.str("type").map(reference_name);
    Some(match code {
        Some("LA") => format!("{ac} + Dex modifier"),
        Some("MA") => format!("{ac} + Dex modifier (max 2)"),
        Some("S") => format!("+{ac}"),
        _ => ac.to_string(),
    })
}

fn strength(_: &Renderer, rec: Record<'_>) -> Option<String> {
    rec.text("strength").map(|s| format!("Str {s}"))
}

fn stealth(_: &Renderer, rec: Record<'_>) -> Option<String> {
    rec.flag("stealth").then(|| "Disadvantage".to_string())
}

fn charges(_: &Renderer, rec: Record<'_>) -> Option<String> {
    let charges = rec.text("charges")?;
    Some(match rec.str("recharge") {
        Some("dawn") => format!("{charges} (regains charges daily at dawn)"),
        Some("dusk") => format!("{charges} (regains charges daily at dusk)"),
        Some("midnight") => format!("{charges} (regains charges daily at midnight)"),
        _ => charges,
    })
}

fn facets(renderer: &Renderer, rec: Record<'_>) -> Facets {
    let mut facets = Facets::new();
    facets.insert_opt("rarity", rarity(rec).map(str::to_lowercase));
    facets.insert_opt("item_type", kind(rec));
    facets.insert("attunement", attunement(renderer, rec).is_some());
    facets.insert("wondrous", rec.flag("wondrous"));
    facets.insert_opt("damage_types", damage_type(rec).map(|d| vec![d.to_string()]));
    facets.insert("properties", property_names(rec));
    facets.insert_opt("weight", rec.f64("weight"));
    facets.insert_opt("value_cp", value_cp(rec));
    facets
}
