//! Character options: classes, subclasses, species, backgrounds and feats.

use std::collections::BTreeMap;

use serde_json::{Value, json};

use crate::category::Category;
use crate::index::Facets;
use crate::ir::Record;
use crate::macros::ability_name;
use crate::markdown::Renderer;
use crate::util::{join_conjunction, ordinal, title_case};

use super::common::{
    ability_bonus_text, expand_list, movement_modes, proficiency_text, reference_name, size_text,
    sizes, speed_text, walk_speed,
};
use super::spec::{CategorySpec, FieldRule, Part};

// ============================================================================
// Classes
// ============================================================================

const CLASS_FIELDS: &[FieldRule] = &[
    FieldRule::new("Hit Die", hit_die_text),
    FieldRule::new("Saving Throws", class_saves),
    FieldRule::new("Armor", |r, rec| starting(r, rec, "armor")),
    FieldRule::new("Weapons", |r, rec| starting(r, rec, "weapons")),
    FieldRule::new("Tools", |r, rec| starting(r, rec, "tools")),
    FieldRule::new("Skills", starting_skills),
    FieldRule::new("Spellcasting Ability", spellcasting_ability),
];

pub(crate) static CLASS: CategorySpec = CategorySpec {
    category: Category::Class,
    subtitle: |_, _| Some("Class".to_string()),
    parts: &[
        Part::Fields(CLASS_FIELDS),
        Part::Custom(class_table),
        Part::Rule,
        Part::Entries("entries"),
        Part::Custom(class_features),
    ],
    facets: class_facets,
};

fn hit_die(rec: Record<'_>) -> Option<i64> {
    rec.object("hd")?.i64("faces")
}

fn hit_die_text(_: &Renderer, rec: Record<'_>) -> Option<String> {
    let faces = hit_die(rec)?;
    let name = rec.name().unwrap_or_default().to_lowercase();
    Some(format!("d{faces} per {name} level"))
}

fn save_names(rec: Record<'_>) -> Vec<String> {
    rec.strings("proficiency")
        .into_iter()
        .map(|code| ability_name(code).to_string())
        .collect()
}

fn class_saves(_: &Renderer, rec: Record<'_>) -> Option<String> {
    let saves = save_names(rec);
    (!saves.is_empty()).then(|| saves.join(", "))
}

fn starting(renderer: &Renderer, rec: Record<'_>, key: &str) -> Option<String> {
    let list = expand_list(renderer, rec.object("startingProficiencies")?.array(key));
    (!list.is_empty()).then(|| list.join(", "))
}

fn starting_skills(renderer: &Renderer, rec: Record<'_>) -> Option<String> {
    proficiency_text(renderer, rec.object("startingProficiencies")?.array("skills"))
}

fn spellcasting_ability(_: &Renderer, rec: Record<'_>) -> Option<String> {
    rec.str("spellcastingAbility").map(|a| ability_name(a).to_string())
}

/// Level progression table assembled from every table group side by side.
fn class_table(renderer: &Renderer, rec: Record<'_>) -> String {
    let groups: Vec<Record<'_>> = rec
        .array("classTableGroups")
        .iter()
        .filter_map(Record::from_value)
        .collect();
    if groups.is_empty() {
        return String::new();
    }

    let mut labels = vec![Value::String("Level".to_string())];
    for group in &groups {
        labels.extend(group.array("colLabels").iter().cloned());
    }
    let group_rows: Vec<&[Value]> = groups
        .iter()
        .map(|group| {
            let rows = group.array("rows");
            if rows.is_empty() {
                group.array("rowsSpellProgression")
            } else {
                rows
            }
        })
        .collect();
    let levels = group_rows.iter().map(|rows| rows.len()).max().unwrap_or(0);

    let rows: Vec<Value> = (0..levels)
        .map(|i| {
            let mut row = vec![Value::String(ordinal(i as i64 + 1))];
            for (group, rows) in groups.iter().zip(&group_rows) {
                let width = group.array("colLabels").len();
                let cells = rows.get(i).and_then(Value::as_array);
                for column in 0..width {
                    let cell = cells.and_then(|cells| cells.get(column)).cloned();
                    row.push(cell.unwrap_or_else(|| Value::String("—".to_string())));
                }
            }
            Value::Array(row)
        })
        .collect();

    let table = json!({"type": "table", "colLabels": labels, "rows": rows});
    format!(
        "{}\n\n{}",
        renderer.heading("Class Table", 0, 0),
        renderer.render_value(&table, 1)
    )
}

/// A feature reference with the level it is gained at.
struct FeatureRef {
    name: String,
    level: i64,
}

/// Parse `name|class|classSource|level` (class) or
/// `name|class|classSource|subclass|subclassSource|level` (subclass).
fn parse_feature(value: &Value, key: &str, level_index: usize) -> Option<FeatureRef> {
    let uid = match value {
        Value::String(uid) => uid.as_str(),
        Value::Object(map) => map.get(key)?.as_str()?,
        _ => return None,
    };
    let parts: Vec<&str> = uid.split('|').collect();
    let name = parts.first()?.trim();
    let level = parts.get(level_index)?.trim().parse().ok()?;
    (!name.is_empty()).then(|| FeatureRef {
        name: name.to_string(),
        level,
    })
}

fn features_by_level(
    renderer: &Renderer,
    values: &[Value],
    key: &str,
    level_index: usize,
) -> String {
    let mut levels: BTreeMap<i64, Vec<String>> = BTreeMap::new();
    for feature in values.iter().filter_map(|v| parse_feature(v, key, level_index)) {
        levels
            .entry(feature.level)
            .or_default()
            .push(renderer.expander().expand_plain(&feature.name));
    }
    if levels.is_empty() {
        return String::new();
    }
    let lines: Vec<String> = levels
        .into_iter()
        .map(|(level, names)| format!("- **{} level**: {}", ordinal(level), names.join(", ")))
        .collect();
    format!("{}\n\n{}", renderer.heading("Features", 0, 0), lines.join("\n"))
}

fn class_features(renderer: &Renderer, rec: Record<'_>) -> String {
    features_by_level(renderer, rec.array("classFeatures"), "classFeature", 3)
}

fn class_facets(_: &Renderer, rec: Record<'_>) -> Facets {
    let mut facets = Facets::new();
    facets.insert_opt("hit_die", hit_die(rec));
    facets.insert("saves", save_names(rec));
    facets.insert_opt(
        "spellcasting_ability",
        rec.str("spellcastingAbility").map(|a| ability_name(a).to_string()),
    );
    facets
}

// ============================================================================
// Subclasses
// ============================================================================

const SUBCLASS_FIELDS: &[FieldRule] = &[
    FieldRule::new("Class", |_, rec| rec.str("className").map(str::to_string)),
    FieldRule::new("Short Name", |_, rec| rec.str("shortName").map(str::to_string)),
];

pub(crate) static SUBCLASS: CategorySpec = CategorySpec {
    category: Category::Subclass,
    subtitle: |_, rec| {
        Some(match rec.str("className") {
            Some(class) => format!("{class} subclass"),
            None => "Subclass".to_string(),
        })
    },
    parts: &[
        Part::Fields(SUBCLASS_FIELDS),
        Part::Rule,
        Part::Entries("entries"),
        Part::Custom(subclass_features),
    ],
    facets: subclass_facets,
};

fn subclass_features(renderer: &Renderer, rec: Record<'_>) -> String {
    features_by_level(renderer, rec.array("subclassFeatures"), "subclassFeature", 5)
}

fn subclass_facets(_: &Renderer, rec: Record<'_>) -> Facets {
    let mut facets = Facets::new();
    facets.insert_opt("class", rec.str("className"));
    facets.insert_opt("short_name", rec.str("shortName"));
    facets
}

// ============================================================================
// Species
// ============================================================================

const SPECIES_FIELDS: &[FieldRule] = &[
    FieldRule::new("Size", |_, rec| size_text(rec)),
    FieldRule::new("Speed", |r, rec| speed_text(r, rec.get("speed")?)),
    FieldRule::new("Ability Scores", |_, rec| ability_bonus_text(rec.array("ability"))),
    FieldRule::new("Darkvision", |_, rec| rec.i64("darkvision").map(|d| format!("{d} ft."))),
    FieldRule::new("Languages", |r, rec| {
        proficiency_text(r, rec.array("languageProficiencies"))
    }),
];

pub(crate) static SPECIES: CategorySpec = CategorySpec {
    category: Category::Species,
    subtitle: |_, _| Some("Species".to_string()),
    parts: &[Part::Fields(SPECIES_FIELDS), Part::Rule, Part::Entries("entries")],
    facets: species_facets,
};

fn species_facets(_: &Renderer, rec: Record<'_>) -> Facets {
    let mut facets = Facets::new();
    facets.insert_opt("size", sizes(rec).into_iter().next());
    facets.insert_opt("speed", walk_speed(rec.get("speed")));
    facets.insert_opt("darkvision", rec.i64("darkvision"));
    facets.insert("movement", movement_modes(rec.get("speed")));
    facets
}

// ============================================================================
// Backgrounds
// ============================================================================

const BACKGROUND_FIELDS: &[FieldRule] = &[
    FieldRule::new("Skill Proficiencies", |r, rec| {
        proficiency_text(r, rec.array("skillProficiencies"))
    }),
    FieldRule::new("Tool Proficiencies", |r, rec| {
        proficiency_text(r, rec.array("toolProficiencies"))
    }),
    FieldRule::new("Languages", |r, rec| {
        proficiency_text(r, rec.array("languageProficiencies"))
    }),
    FieldRule::new("Ability Scores", |_, rec| ability_bonus_text(rec.array("ability"))),
    FieldRule::new("Feat", |r, rec| proficiency_text(r, rec.array("feats"))),
];

pub(crate) static BACKGROUND: CategorySpec = CategorySpec {
    category: Category::Background,
    subtitle: |_, _| Some("Background".to_string()),
    parts: &[Part::Fields(BACKGROUND_FIELDS), Part::Rule, Part::Entries("entries")],
    facets: background_facets,
};

/// Fixed skill names granted by a background (choices are not listed).
fn granted_skills(rec: Record<'_>) -> Vec<String> {
    let mut skills: Vec<String> = rec
        .array("skillProficiencies")
        .iter()
        .filter_map(Value::as_object)
        .flat_map(|map| {
            map.iter()
                .filter(|(_, v)| v.as_bool() == Some(true))
                .map(|(k, _)| title_case(reference_name(k)))
        })
        .collect();
    skills.sort();
    skills.dedup();
    skills
}

fn background_facets(_: &Renderer, rec: Record<'_>) -> Facets {
    let mut facets = Facets::new();
    facets.insert("skills", granted_skills(rec));
    facets
}

// ============================================================================
// Feats
// ============================================================================

const FEAT_FIELDS: &[FieldRule] = &[
    FieldRule::new("Prerequisite", prerequisite_field),
    FieldRule::new("Ability Increase", |_, rec| ability_bonus_text(rec.array("ability"))),
];

pub(crate) static FEAT: CategorySpec = CategorySpec {
    category: Category::Feat,
    subtitle: |_, rec| Some(feat_category(rec).map_or_else(|| "Feat".to_string(), |c| format!("{c} feat"))),
    parts: &[Part::Fields(FEAT_FIELDS), Part::Rule, Part::Entries("entries")],
    facets: feat_facets,
};

fn feat_category(rec: Record<'_>) -> Option<&'static str> {
    Some(match rec.str("category")? {
        "G" => "General",
        "O" => "Origin",
        "FS" | "FS:P" | "FS:R" => "Fighting Style",
        "EB" => "Epic Boon",
        _ => return None,
    })
}

/// Prerequisites; alternatives are joined with `or`.
fn prerequisite(renderer: &Renderer, rec: Record<'_>) -> Option<String> {
    let alternatives: Vec<String> = rec
        .array("prerequisite")
        .iter()
        .filter_map(Record::from_value)
        .map(|p| prerequisite_parts(renderer, p).join(", "))
        .filter(|text| !text.is_empty())
        .collect();
    (!alternatives.is_empty()).then(|| join_conjunction(&alternatives, "or"))
}

fn prerequisite_field(renderer: &Renderer, rec: Record<'_>) -> Option<String> {
    prerequisite(renderer, rec)
}

fn prerequisite_parts(renderer: &Renderer, p: Record<'_>) -> Vec<String> {
    let mut parts = Vec::new();
    match p.get("level") {
        Some(Value::Number(n)) => parts.push(format!("Level {n}")),
        Some(Value::Object(map)) => {
            let level = Record::new(map);
            if let Some(n) = level.i64("level") {
                match level.object("class").and_then(|c| c.name()) {
                    Some(class) => parts.push(format!("{} level {class}", ordinal(n))),
                    None => parts.push(format!("Level {n}")),
                }
            }
        }
        _ => {}
    }
    let abilities: Vec<String> = p
        .array("ability")
        .iter()
        .filter_map(Value::as_object)
        .flat_map(|map| {
            map.iter()
                .filter_map(|(k, v)| Some(format!("{} {}", ability_name(k), v.as_i64()?)))
        })
        .collect();
    if !abilities.is_empty() {
        parts.push(join_conjunction(&abilities, "or"));
    }
    let names = |key: &str| -> Vec<String> {
        p.array(key)
            .iter()
            .filter_map(|v| match v {
                Value::String(uid) => Some(title_case(reference_name(uid))),
                Value::Object(map) => {
                    let rec = Record::new(map);
                    let name = rec.name()?;
                    Some(match rec.str("subrace") {
                        Some(sub) => format!("{} ({sub})", title_case(name)),
                        None => title_case(name),
                    })
                }
                _ => None,
            })
            .collect()
    };
    for key in ["race", "species", "background", "feat"] {
        let list = names(key);
        if !list.is_empty() {
            parts.push(join_conjunction(&list, "or"));
        }
    }
    if p.flag("spellcasting") || p.flag("spellcasting2020") {
        parts.push("The ability to cast at least one spell".to_string());
    }
    for proficiency in p.array("proficiency").iter().filter_map(Value::as_object) {
        for (kind, what) in proficiency {
            if let Some(what) = what.as_str() {
                parts.push(format!("Proficiency with {what} {kind}"));
            }
        }
    }
    if let Some(other) = p.str("other") {
        parts.push(renderer.expand(other));
    }
    parts
}

fn feat_facets(renderer: &Renderer, rec: Record<'_>) -> Facets {
    let mut facets = Facets::new();
    facets.insert_opt("feat_category", feat_category(rec));
    facets.insert_opt(
        "prerequisite",
        prerequisite(renderer, rec).map(|p| renderer.expander().expand_plain(&p)),
    );
    facets
}
