//! Vehicles, traps and hazards.

use serde_json::Value;

use crate::category::Category;
use crate::index::Facets;
use crate::ir::Record;
use crate::markdown::{NameStyle, Renderer, join_blocks};
use crate::util::capitalize;

use super::common::{expand_list, size_text, sizes, speed_text, thousands};
use super::spec::{CategorySpec, FieldRule, Part};

// ============================================================================
// Vehicles
// ============================================================================

const VEHICLE_FIELDS: &[FieldRule] = &[
    FieldRule::new("Dimensions", |r, rec| {
        let dims = expand_list(r, rec.array("dimensions"));
        (!dims.is_empty()).then(|| dims.join(" by "))
    }),
    FieldRule::new("Creature Capacity", creature_capacity),
    FieldRule::new("Cargo Capacity", cargo_capacity),
    FieldRule::new("Travel Pace", travel_pace),
    FieldRule::new("Speed", |r, rec| speed_text(r, rec.get("speed")?)),
    FieldRule::new("Armor Class", vehicle_ac),
    FieldRule::new("Hit Points", vehicle_hp),
    FieldRule::new("Damage Immunities", |r, rec| list_text(r, rec.array("immune"))),
    FieldRule::new("Condition Immunities", |r, rec| {
        list_text(r, rec.array("conditionImmune"))
    }),
];

pub(crate) static VEHICLE: CategorySpec = CategorySpec {
    category: Category::Vehicle,
    subtitle: |_, rec| {
        let line = [size_text(rec), vehicle_type(rec).map(str::to_string)]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        (!line.is_empty()).then(|| capitalize(&line))
    },
    parts: &[
        Part::Fields(VEHICLE_FIELDS),
        Part::AbilityScores,
        Part::Rule,
        Part::Entries("entries"),
        Part::Custom(vehicle_groups),
    ],
    facets: vehicle_facets,
};

fn vehicle_type(rec: Record<'_>) -> Option<&'static str> {
    Some(match rec.str("vehicleType")? {
        "SHIP" => "ship",
        "SPELLJAMMER" => "spelljammer",
        "ELEMENTAL_AIRSHIP" => "elemental airship",
        "INFWAR" => "infernal war machine",
        "CREATURE" => "creature",
        "OBJECT" => "object",
        _ => return None,
    })
}

fn list_text(renderer: &Renderer, values: &[Value]) -> Option<String> {
    let list = expand_list(renderer, values);
    (!list.is_empty()).then(|| list.join(", "))
}

fn creature_capacity(_: &Renderer, rec: Record<'_>) -> Option<String> {
    let parts: Vec<String> = [("capCrew", "crew"), ("capPassenger", "passengers")]
        .into_iter()
        .filter_map(|(key, label)| rec.i64(key).map(|n| format!("{n} {label}")))
        .collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}

fn cargo_capacity(_: &Renderer, rec: Record<'_>) -> Option<String> {
    match rec.get("capCargo")? {
        Value::Number(n) => {
            let tons = n.as_f64()?;
            Some(if tons == 1.0 {
                "1 ton".to_string()
            } else if tons.fract() == 0.0 {
                format!("{} tons", thousands(tons as i64))
            } else {
                format!("{tons} tons")
            })
        }
        Value::String(text) => Some(text.clone()),
        _ => None,
    }
}

fn travel_pace(_: &Renderer, rec: Record<'_>) -> Option<String> {
    let mph = rec.i64("pace")?;
    Some(format!("{mph} miles per hour ({} miles per day)", mph * 24))
}

fn vehicle_ac(_: &Renderer, rec: Record<'_>) -> Option<String> {
    rec.object("hull")
        .and_then(|hull| hull.i64("ac"))
        .or_else(|| rec.i64("ac"))
        .map(|ac| ac.to_string())
}

fn vehicle_hp(_: &Renderer, rec: Record<'_>) -> Option<String> {
    let hp = rec.object("hull").or_else(|| rec.object("hp"));
    let (hp, dt) = match hp {
        Some(hull) => (hull.i64("hp")?, hull.i64("dt")),
        None => (rec.i64("hp")?, None),
    };
    Some(match dt {
        Some(dt) => format!("{hp} (damage threshold {dt})"),
        None => hp.to_string(),
    })
}

/// Actions, weapons and other named features in fixed order.
fn vehicle_groups(renderer: &Renderer, rec: Record<'_>) -> String {
    let groups = [
        ("Traits", "trait"),
        ("Actions", "action"),
        ("Weapons", "weapon"),
        ("Other Features", "other"),
    ];
    join_blocks(groups.iter().filter_map(|(title, key)| {
        let items: Vec<String> = rec
            .array(key)
            .iter()
            .map(|item| match Record::from_value(item) {
                Some(named) if named.name().is_some() => {
                    let mut named_item = renderer.render_named_entry(named, 1, NameStyle::BoldItalic);
                    if let Some(count) = named.i64("count").filter(|c| *c > 1) {
                        named_item = named_item.replacen(".***", &format!(" ({count}).***"), 1);
                    }
                    named_item
                }
                _ => renderer.render_value(item, 1),
            })
            .filter(|text| !text.is_empty())
            .collect();
        if items.is_empty() {
            return None;
        }
        Some(join_blocks(
            std::iter::once(renderer.heading(title, 0, 0)).chain(items),
        ))
    }))
}

fn vehicle_facets(_: &Renderer, rec: Record<'_>) -> Facets {
    let mut facets = Facets::new();
    facets.insert_opt("vehicle_type", vehicle_type(rec));
    facets.insert_opt("size", sizes(rec).into_iter().next());
    let mut terrain: Vec<String> = rec
        .strings("terrain")
        .into_iter()
        .map(str::to_lowercase)
        .collect();
    terrain.sort();
    terrain.dedup();
    facets.insert("terrain", terrain);
    facets
}

// ============================================================================
// Traps and hazards
// ============================================================================

const TRAP_FIELDS: &[FieldRule] = &[
    FieldRule::new("Tier", |_, rec| trap_tier(rec).map(|t| t.to_string())),
    FieldRule::new("Threat", |_, rec| trap_threat(rec).map(capitalize)),
    FieldRule::new("Initiative", |_, rec| rec.text("initiative")),
];

pub(crate) static TRAP: CategorySpec = CategorySpec {
    category: Category::Trap,
    subtitle: |_, rec| {
        let label = trap_type(rec)?;
        Some(match trap_tier(rec) {
            Some(tier) => format!("{label} (tier {tier})"),
            None => label.to_string(),
        })
    },
    parts: &[
        Part::Fields(TRAP_FIELDS),
        Part::Rule,
        Part::Entries("entries"),
        Part::Section {
            title: "Trigger",
            key: "trigger",
        },
        Part::Section {
            title: "Effect",
            key: "effect",
        },
        Part::Section {
            title: "Active Elements",
            key: "eActive",
        },
        Part::Section {
            title: "Dynamic Elements",
            key: "eDynamic",
        },
        Part::Section {
            title: "Constant Elements",
            key: "eConstant",
        },
        Part::Section {
            title: "Countermeasures",
            key: "countermeasures",
        },
    ],
    facets: trap_facets,
};

fn trap_type(rec: Record<'_>) -> Option<&'static str> {
    Some(match rec.str("trapHazType")? {
        "MECH" => "Mechanical trap",
        "MAG" => "Magic trap",
        "SMPL" => "Simple trap",
        "CMPX" => "Complex trap",
        "TRP" => "Trap",
        "HAZ" => "Hazard",
        "WTH" => "Weather",
        "ENV" => "Environmental hazard",
        "WLD" => "Wilderness hazard",
        "GEN" => "Generic",
        "EST" => "Eldritch storm",
        _ => return None,
    })
}

/// First rating entry, used when tier and threat are not top-level.
fn rating(rec: Record<'_>) -> Option<Record<'_>> {
    rec.array("rating").first().and_then(Record::from_value)
}

fn trap_tier(rec: Record<'_>) -> Option<i64> {
    rec.i64("tier").or_else(|| rating(rec)?.i64("tier"))
}

fn trap_threat(rec: Record<'_>) -> Option<&str> {
    rec.str("threat").or_else(|| rating(rec)?.str("threat"))
}

fn trap_facets(_: &Renderer, rec: Record<'_>) -> Facets {
    let mut facets = Facets::new();
    facets.insert_opt("trap_type", trap_type(rec));
    facets.insert_opt("tier", trap_tier(rec));
    facets.insert_opt("threat", trap_threat(rec).map(str::to_lowercase));
    facets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{BuildOutcome, DocumentBuilder, SourceFilter};
    use serde_json::json;

    fn build(category: Category, record: Value) -> (String, Facets) {
        match DocumentBuilder::default().build(category, &record, &SourceFilter::all()) {
            BuildOutcome::Built { document, entry } => (document.body, entry.facets),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_ship() {
        let (body, facets) = build(
            Category::Vehicle,
            json!({
                "name": "Galley",
                "vehicleType": "SHIP",
                "size": "G",
                "dimensions": ["130 ft.", "20 ft."],
                "capCrew": 80,
                "capCargo": 150,
                "pace": 4,
                "str": 24, "dex": 4, "con": 20, "int": 0, "wis": 0, "cha": 0,
                "hull": {"ac": 15, "hp": 500, "dt": 20},
                "weapon": [{"name": "Ballista", "count": 4, "entries": ["{@atk rw} {@hit 6} to hit."]}],
                "terrain": ["sea"]
            }),
        );
        assert!(body.contains("*Gargantuan ship*"));
        assert!(body.contains("**Dimensions** 130 ft. by 20 ft."));
        assert!(body.contains("**Creature Capacity** 80 crew"));
        assert!(body.contains("**Cargo Capacity** 150 tons"));
        assert!(body.contains("**Travel Pace** 4 miles per hour (96 miles per day)"));
        assert!(body.contains("**Armor Class** 15"));
        assert!(body.contains("**Hit Points** 500 (damage threshold 20)"));
        assert!(body.contains("| STR | DEX | CON | INT | WIS | CHA |"));
        assert!(body.contains("## Weapons\n\n***Ballista (4).*** *Ranged Weapon Attack:* +6 to hit."));
        assert_eq!(facets.text("vehicle_type").as_deref(), Some("ship"));
        assert_eq!(facets.text("size").as_deref(), Some("Gargantuan"));
        assert_eq!(facets.values("terrain"), vec!["sea"]);
    }

    #[test]
    fn test_trap_sections() {
        let (body, facets) = build(
            Category::Trap,
            json!({
                "name": "Collapsing Roof",
                "trapHazType": "MECH",
                "tier": 1,
                "threat": "dangerous",
                "trigger": ["A creature crosses the tripwire."],
                "effect": ["The roof collapses."],
                "countermeasures": ["A {@skill Perception} check spots the wire."]
            }),
        );
        assert!(body.contains("*Mechanical trap (tier 1)*"));
        assert!(body.contains("**Threat** Dangerous"));
        let trigger = body.find("## Trigger").unwrap();
        let effect = body.find("## Effect").unwrap();
        let counter = body.find("## Countermeasures").unwrap();
        assert!(trigger < effect && effect < counter);
        assert!(body.contains("A Perception check spots the wire."));
        assert!(!body.contains("Active Elements"));
        assert_eq!(facets.integer("tier"), Some(1));
        assert_eq!(facets.text("trap_type").as_deref(), Some("Mechanical trap"));
    }

    #[test]
    fn test_trap_rating_fallback() {
        let (body, facets) = build(
            Category::Trap,
            json!({"name": "Sphere", "trapHazType": "CMPX", "rating": [{"tier": 3, "threat": "deadly"}]}),
        );
        assert!(body.contains("*Complex trap (tier 3)*"));
        assert!(body.contains("**Threat** Deadly"));
        assert_eq!(facets.text("threat").as_deref(), Some("deadly"));
    }
}
