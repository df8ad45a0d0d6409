//! Spells.

use serde_json::Value;

use crate::category::Category;
use crate::index::Facets;
use crate::ir::Record;
use crate::markdown::Renderer;
use crate::util::{join_conjunction, ordinal};

use super::common::{coin_text, damage_type_name, reference_name, time_text};
use super::spec::{CategorySpec, FieldRule, Part};

const FIELDS: &[FieldRule] = &[
    FieldRule::new("Casting Time", casting_time),
    FieldRule::new("Range", range),
    FieldRule::new("Components", components),
    FieldRule::new("Duration", duration),
    FieldRule::new("Classes", classes_text),
];

pub(crate) static SPELL: CategorySpec = CategorySpec {
    category: Category::Spell,
    subtitle,
    parts: &[
        Part::Fields(FIELDS),
        Part::Rule,
        Part::Entries("entries"),
        Part::Section {
            title: "At Higher Levels",
            key: "entriesHigherLevel",
        },
    ],
    facets,
};

/// Full school name for a school code.
pub(crate) fn school_name(code: &str) -> &str {
    match code {
        "A" => "Abjuration",
        "C" => "Conjuration",
        "D" => "Divination",
        "E" => "Enchantment",
        "V" => "Evocation",
        "I" => "Illusion",
        "N" => "Necromancy",
        "T" => "Transmutation",
        "P" => "Psionic",
        other => other,
    }
}

fn subtitle(_: &Renderer, rec: Record<'_>) -> Option<String> {
    let school = rec.str("school").map(school_name);
    let level = rec.i64("level");
    let mut line = match (level, school) {
        (Some(0), Some(school)) => format!("{school} cantrip"),
        (Some(0), None) => "Cantrip".to_string(),
        (Some(level), Some(school)) => format!("{}-level {school}", ordinal(level)),
        (Some(level), None) => format!("{}-level spell", ordinal(level)),
        (None, Some(school)) => school.to_string(),
        (None, None) => return None,
    };
    if is_ritual(rec) {
        line.push_str(" (ritual)");
    }
    Some(line)
}

fn is_ritual(rec: Record<'_>) -> bool {
    rec.object("meta").is_some_and(|meta| meta.flag("ritual"))
}

fn casting_time(renderer: &Renderer, rec: Record<'_>) -> Option<String> {
    time_text(renderer, rec.array("time"))
}

fn range(_: &Renderer, rec: Record<'_>) -> Option<String> {
    let range = rec.object("range")?;
    let distance = range.object("distance");
    match range.str("type").unwrap_or("point") {
        "special" => Some("Special".to_string()),
        "point" => {
            let d = distance?;
            Some(match d.str("type")? {
                "self" => "Self".to_string(),
                "touch" => "Touch".to_string(),
                "sight" => "Sight".to_string(),
                "unlimited" => "Unlimited".to_string(),
                "plane" => "Unlimited (same plane)".to_string(),
                unit => match d.i64("amount") {
                    Some(1) => format!("1 {}", singular_unit(unit)),
                    Some(amount) => format!("{amount} {unit}"),
                    None => unit.to_string(),
                },
            })
        }
        // Area shapes (cone, radius, line, ...) originate from the caster
        shape => {
            let d = distance?;
            let amount = d.i64("amount")?;
            let unit = singular_unit(d.str("type").unwrap_or("feet"));
            Some(format!("Self ({amount}-{unit} {shape})"))
        }
    }
}

fn singular_unit(unit: &str) -> &str {
    match unit {
        "feet" => "foot",
        "miles" => "mile",
        other => other,
    }
}

fn components(renderer: &Renderer, rec: Record<'_>) -> Option<String> {
    let components = rec.object("components")?;
    let parts: Vec<String> = component_codes(components)
        .into_iter()
        .map(|code| match code {
            "M" => match material(renderer, components) {
                Some(material) => format!("M ({material})"),
                None => "M".to_string(),
            },
            other => other.to_string(),
        })
        .collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}

fn component_codes(components: Record<'_>) -> Vec<&'static str> {
    let material = matches!(
        components.get("m"),
        Some(Value::String(_) | Value::Object(_) | Value::Bool(true))
    );
    [
        ("V", components.flag("v")),
        ("S", components.flag("s")),
        ("M", material),
        ("R", components.flag("r")),
    ]
    .into_iter()
    .filter_map(|(code, present)| present.then_some(code))
    .collect()
}

/// Material description; object form adds the cost in copper and whether
/// the spell consumes it.
fn material(renderer: &Renderer, components: Record<'_>) -> Option<String> {
    match components.get("m")? {
        Value::String(text) => Some(renderer.expand(text)),
        Value::Object(map) => {
            let material = Record::new(map);
            let text = material.str("text").map(|text| renderer.expand(text));
            let mut notes = Vec::new();
            if let Some(cost) = material.i64("cost").filter(|&cost| cost > 0) {
                notes.push(format!("worth {}", coin_text(cost)));
            }
            if material.flag("consume") {
                notes.push("consumed".to_string());
            }
            match (text, notes.is_empty()) {
                (text, true) => text,
                (Some(text), false) => Some(format!("{text}; {}", notes.join(", "))),
                (None, false) => Some(notes.join(", ")),
            }
        }
        _ => None,
    }
}

fn duration(renderer: &Renderer, rec: Record<'_>) -> Option<String> {
    let parts: Vec<String> = rec
        .array("duration")
        .iter()
        .filter_map(Record::from_value)
        .filter_map(|d| duration_part(renderer, d))
        .collect();
    (!parts.is_empty()).then(|| join_conjunction(&parts, "or"))
}

fn duration_part(renderer: &Renderer, d: Record<'_>) -> Option<String> {
    Some(match d.str("type")? {
        "instant" => "Instantaneous".to_string(),
        "special" => "Special".to_string(),
        "permanent" => {
            let ends: Vec<String> = d
                .strings("ends")
                .into_iter()
                .map(|end| match end {
                    "dispel" => "dispelled".to_string(),
                    "trigger" => "triggered".to_string(),
                    "discharge" => "discharged".to_string(),
                    other => other.to_string(),
                })
                .collect();
            if ends.is_empty() {
                "Permanent".to_string()
            } else {
                format!("Until {}", join_conjunction(&ends, "or"))
            }
        }
        "timed" => {
            let inner = d.object("duration")?;
            let amount = inner.i64("amount").unwrap_or(1);
            let unit = inner.str("type").unwrap_or("round");
            let span = if amount == 1 {
                format!("1 {unit}")
            } else {
                format!("{amount} {unit}s")
            };
            if d.flag("concentration") {
                format!("Concentration, up to {span}")
            } else if inner.flag("upTo") {
                format!("Up to {span}")
            } else {
                span
            }
        }
        other => renderer.expand(other),
    })
}

/// Class names from `classes.fromClassList`, sorted and deduplicated.
fn class_names(rec: Record<'_>) -> Vec<String> {
    let Some(classes) = rec.object("classes") else {
        return Vec::new();
    };
    let mut names: Vec<String> = classes
        .array("fromClassList")
        .iter()
        .filter_map(|class| match class {
            Value::String(uid) => Some(reference_name(uid).to_string()),
            Value::Object(map) => Record::new(map).name().map(str::to_string),
            _ => None,
        })
        .collect();
    names.sort();
    names.dedup();
    names
}

fn classes_text(_: &Renderer, rec: Record<'_>) -> Option<String> {
    let names = class_names(rec);
    (!names.is_empty()).then(|| names.join(", "))
}

fn facets(_: &Renderer, rec: Record<'_>) -> Facets {
    let mut facets = Facets::new();
    facets.insert_opt("level", rec.i64("level"));
    facets.insert_opt("school", rec.str("school").map(school_name));
    facets.insert("classes", class_names(rec));
    facets.insert("ritual", is_ritual(rec));
    facets.insert(
        "concentration",
        rec.array("duration")
            .iter()
            .filter_map(Record::from_value)
            .any(|d| d.flag("concentration")),
    );
    facets.insert("damage_types", lowercase_list(rec.strings("damageInflict")));
    facets.insert("conditions", lowercase_list(rec.strings("conditionInflict")));
    if let Some(components) = rec.object("components") {
        let codes = component_codes(components);
        if !codes.is_empty() {
            facets.insert("components", codes.join(", "));
        }
        let cost = components.object("m").and_then(|m| m.i64("cost"));
        facets.insert_opt("material_cost_cp", cost);
    }
    if let Some(tags) = rec.get("damageTags").and_then(Value::as_array) {
        // Some records tag damage with letter codes instead
        let mut damage: Vec<String> = tags
            .iter()
            .filter_map(Value::as_str)
            .filter_map(damage_type_name)
            .map(str::to_string)
            .collect();
        if !damage.is_empty() && facets.get("damage_types").is_none() {
            damage.sort();
            damage.dedup();
            facets.insert("damage_types", damage);
        }
    }
    facets
}

pub(crate) fn lowercase_list(values: Vec<&str>) -> Vec<String> {
    let mut list: Vec<String> = values
        .into_iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect();
    list.sort();
    list.dedup();
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{BuildOutcome, DocumentBuilder, SourceFilter};
    use serde_json::json;

    fn build(record: Value) -> (String, Facets) {
        match DocumentBuilder::default().build(Category::Spell, &record, &SourceFilter::all()) {
            BuildOutcome::Built { document, entry } => (document.body, entry.facets),
            other => panic!("unexpected {other:?}"),
        }
    }

    fn fireball() -> Value {
        json!({
            "name": "Fireball",
            "source": "PHB",
            "page": 241,
            "level": 3,
            "school": "V",
            "time": [{"number": 1, "unit": "action"}],
            "range": {"type": "point", "distance": {"type": "feet", "amount": 150}},
            "components": {"v": true, "s": true, "m": "a tiny ball of bat guano and sulfur"},
            "duration": [{"type": "instant"}],
            "entries": ["A bright streak flashes. Each creature takes {@damage 8d6} fire damage."],
            "damageInflict": ["fire"],
            "classes": {"fromClassList": [{"name": "Wizard", "source": "PHB"}, {"name": "Sorcerer", "source": "PHB"}]}
        })
    }

    #[test]
    fn test_spell_document() {
        let (body, _) = build(fireball());
        assert!(body.contains("*3rd-level Evocation*"));
        assert!(body.contains("**Casting Time** 1 action"));
        assert!(body.contains("**Range** 150 feet"));
        assert!(body.contains("**Components** V, S, M (a tiny ball of bat guano and sulfur)"));
        assert!(body.contains("**Duration** Instantaneous"));
        assert!(body.contains("**Classes** Sorcerer, Wizard"));
        assert!(body.contains("takes `8d6` fire damage."));
        assert!(!body.contains("At Higher Levels"));
    }

    #[test]
    fn test_higher_levels_section_unwrapped() {
        let mut record = fireball();
        record["entriesHigherLevel"] = json!([{"type": "entries", "name": "At Higher Levels",
            "entries": ["The damage increases by {@scaledamage 8d6|3-9|1d6} for each slot level above 3rd."]}]);
        let (body, _) = build(record);
        assert!(body.contains("## At Higher Levels\n\nThe damage increases by `1d6`"));
        assert_eq!(body.matches("At Higher Levels").count(), 1);
    }

    #[test]
    fn test_concentration_ritual_and_self_range() {
        let record = json!({
            "name": "Detect Magic",
            "level": 1,
            "school": "D",
            "meta": {"ritual": true},
            "range": {"type": "radius", "distance": {"type": "feet", "amount": 30}},
            "duration": [{"type": "timed", "duration": {"type": "minute", "amount": 10}, "concentration": true}]
        });
        let (body, facets) = build(record);
        assert!(body.contains("*1st-level Divination (ritual)*"));
        assert!(body.contains("**Range** Self (30-foot radius)"));
        assert!(body.contains("**Duration** Concentration, up to 10 minutes"));
        assert!(facets.flag("ritual"));
        assert!(facets.flag("concentration"));
    }

    #[test]
    fn test_cantrip_subtitle() {
        let (body, _) = build(json!({"name": "Light", "level": 0, "school": "V"}));
        assert!(body.contains("*Evocation cantrip*"));
    }

    #[test]
    fn test_spell_facets() {
        let (_, facets) = build(fireball());
        assert_eq!(facets.integer("level"), Some(3));
        assert_eq!(facets.text("school").as_deref(), Some("Evocation"));
        assert_eq!(facets.values("classes"), vec!["Sorcerer", "Wizard"]);
        assert_eq!(facets.values("damage_types"), vec!["fire"]);
        assert_eq!(facets.text("components").as_deref(), Some("V, S, M"));
    }

    #[test]
    fn test_material_cost_and_consumption() {
        let record = json!({
            "name": "Revivify",
            "level": 3,
            "school": "N",
            "components": {"v": true, "s": true, "r": true,
                "m": {"text": "diamonds", "cost": 30000, "consume": true}}
        });
        let (body, facets) = build(record);
        assert!(body.contains("**Components** V, S, M (diamonds; worth 300 gp, consumed), R"));
        assert_eq!(facets.text("components").as_deref(), Some("V, S, M, R"));
        assert_eq!(facets.integer("material_cost_cp"), Some(30000));

        let (body, _) = build(json!({"name": "Bare", "level": 1, "school": "A",
            "components": {"m": {"cost": 50}}}));
        assert!(body.contains("**Components** M (worth 5 sp)"));
    }

    #[test]
    fn test_permanent_duration() {
        let record = json!({"name": "Glyph", "level": 3, "school": "A",
            "duration": [{"type": "permanent", "ends": ["dispel", "trigger"]}]});
        let (body, _) = build(record);
        assert!(body.contains("**Duration** Until dispelled or triggered"));
    }
}
