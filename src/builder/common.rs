//! Field formatters shared by several categories.

use serde_json::Value;

use crate::ir::Record;
use crate::macros::ability_name;
use crate::markdown::Renderer;
use crate::util::{join_conjunction, signed, title_case};

/// Ability score keys with their table headers.
pub(crate) const ABILITIES: [(&str, &str); 6] = [
    ("str", "STR"),
    ("dex", "DEX"),
    ("con", "CON"),
    ("int", "INT"),
    ("wis", "WIS"),
    ("cha", "CHA"),
];

/// Movement modes in display order.
pub(crate) const MOVEMENT_MODES: [&str; 5] = ["walk", "burrow", "climb", "fly", "swim"];

/// Ability modifier: `floor((score - 10) / 2)`.
///
/// ```
/// use grimoire::builder::ability_modifier;
///
/// assert_eq!(ability_modifier(10), 0);
/// assert_eq!(ability_modifier(15), 2);
/// assert_eq!(ability_modifier(8), -1);
/// assert_eq!(ability_modifier(20), 5);
/// ```
pub fn ability_modifier(score: i64) -> i64 {
    score.saturating_sub(10).div_euclid(2)
}

/// A score with its signed modifier, e.g. `15 (+2)`.
pub fn format_modifier(score: i64) -> String {
    format!("{score} ({})", signed(ability_modifier(score)))
}

/// Six-column ability table; `None` when the record has no scores.
pub(crate) fn ability_table(rec: Record<'_>) -> Option<String> {
    let scores: Vec<Option<i64>> = ABILITIES.iter().map(|(key, _)| rec.i64(key)).collect();
    if scores.iter().all(Option::is_none) {
        return None;
    }
    let header: Vec<&str> = ABILITIES.iter().map(|(_, label)| *label).collect();
    let values: Vec<String> = scores
        .into_iter()
        .map(|score| score.map(format_modifier).unwrap_or_else(|| "—".to_string()))
        .collect();
    Some(format!(
        "| {} |\n|{}|\n| {} |",
        header.join(" | "),
        vec![":---:"; ABILITIES.len()].join("|"),
        values.join(" | ")
    ))
}

/// `## Title` followed by the rendered field, or nothing when empty.
///
/// A lone `entries` child carrying the same name as the section is
/// unwrapped so the title is not repeated.
pub(crate) fn titled_section(renderer: &Renderer, rec: Record<'_>, title: &str, key: &str) -> String {
    let Some(value) = rec.get(key) else {
        return String::new();
    };
    let value = unwrap_same_name(value, title);
    let body = renderer.render_value(value, 1);
    if body.is_empty() {
        return String::new();
    }
    format!("{}\n\n{body}", renderer.heading(title, 0, 0))
}

fn unwrap_same_name<'a>(value: &'a Value, title: &str) -> &'a Value {
    let single = match value {
        Value::Array(items) if items.len() == 1 => &items[0],
        other => other,
    };
    match Record::from_value(single) {
        Some(rec) if rec.name().is_some_and(|name| name.eq_ignore_ascii_case(title)) => {
            rec.children().unwrap_or(value)
        }
        _ => value,
    }
}

/// Full size name for a size code.
pub(crate) fn size_name(code: &str) -> &str {
    match code {
        "F" => "Fine",
        "D" => "Diminutive",
        "T" => "Tiny",
        "S" => "Small",
        "M" => "Medium",
        "L" => "Large",
        "H" => "Huge",
        "G" => "Gargantuan",
        "C" => "Colossal",
        "V" => "Varies",
        other => other,
    }
}

/// Sizes joined with `or`, from a string or array `size` field.
pub(crate) fn sizes(rec: Record<'_>) -> Vec<String> {
    match rec.get("size") {
        Some(Value::String(code)) => vec![size_name(code).to_string()],
        Some(Value::Array(codes)) => codes
            .iter()
            .filter_map(Value::as_str)
            .map(|code| size_name(code).to_string())
            .collect(),
        _ => Vec::new(),
    }
}

pub(crate) fn size_text(rec: Record<'_>) -> Option<String> {
    let sizes = sizes(rec);
    (!sizes.is_empty()).then(|| join_conjunction(&sizes, "or"))
}

/// Speed line: walking speed first, then labelled modes.
///
/// Accepts a bare number or a `{walk, fly, ...}` object whose values are
/// numbers, `{number, condition}` objects, or `true` (equal to walking).
pub(crate) fn speed_text(renderer: &Renderer, value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(format!("{n} ft.")),
        Value::String(s) => Some(renderer.expand(s)).filter(|s| !s.is_empty()),
        Value::Object(map) => {
            let rec = Record::new(map);
            let hover = rec.flag("canHover") || rec.flag("hover");
            let parts: Vec<String> = MOVEMENT_MODES
                .iter()
                .filter_map(|mode| {
                    let amount = match rec.get(mode)? {
                        Value::Number(n) => format!("{n} ft."),
                        Value::Bool(true) => "equal to your walking speed".to_string(),
                        Value::Object(inner) => {
                            let inner = Record::new(inner);
                            let number = inner.i64("number")?;
                            match inner.str("condition") {
                                Some(cond) => format!("{number} ft. {}", renderer.expand(cond)),
                                None => format!("{number} ft."),
                            }
                        }
                        _ => return None,
                    };
                    let mut part = if *mode == "walk" {
                        amount
                    } else {
                        format!("{mode} {amount}")
                    };
                    if *mode == "fly" && hover {
                        part.push_str(" (hover)");
                    }
                    Some(part)
                })
                .collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        _ => None,
    }
}

/// Movement modes present on a speed value.
pub(crate) fn movement_modes(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Number(_)) => vec!["walk".to_string()],
        Some(Value::Object(map)) => MOVEMENT_MODES
            .iter()
            .filter(|mode| {
                map.get(**mode)
                    .is_some_and(|v| !v.is_null() && v != &Value::Bool(false))
            })
            .map(|mode| mode.to_string())
            .collect(),
        _ => Vec::new(),
    }
}

/// Walking speed in feet.
pub(crate) fn walk_speed(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::Object(map) => match map.get("walk")? {
            Value::Number(n) => n.as_i64(),
            Value::Object(inner) => inner.get("number").and_then(Value::as_i64),
            _ => None,
        },
        _ => None,
    }
}

/// Casting or action time: `1 action`, `1 reaction, which you take when ...`.
pub(crate) fn time_text(renderer: &Renderer, times: &[Value]) -> Option<String> {
    let parts: Vec<String> = times
        .iter()
        .filter_map(|time| match time {
            Value::String(s) => Some(renderer.expand(s)),
            Value::Object(map) => {
                let rec = Record::new(map);
                let unit = rec.str("unit")?;
                let number = rec.i64("number").unwrap_or(1);
                let unit = match unit {
                    "bonus" => "bonus action",
                    other => other,
                };
                let mut text = if unit == "special" {
                    "Special".to_string()
                } else if number == 1 {
                    format!("1 {unit}")
                } else {
                    format!("{number} {unit}s")
                };
                if let Some(condition) = rec.str("condition") {
                    text.push_str(&format!(", which you take {}", renderer.expand(condition)));
                }
                Some(text)
            }
            _ => None,
        })
        .filter(|text| !text.is_empty())
        .collect();
    (!parts.is_empty()).then(|| parts.join(" or "))
}

/// Damage type for a one-letter damage tag.
pub(crate) fn damage_type_name(code: &str) -> Option<&'static str> {
    Some(match code {
        "A" => "acid",
        "B" => "bludgeoning",
        "C" => "cold",
        "F" => "fire",
        "O" => "force",
        "L" => "lightning",
        "N" => "necrotic",
        "P" => "piercing",
        "I" => "poison",
        "Y" => "psychic",
        "R" => "radiant",
        "S" => "slashing",
        "T" => "thunder",
        _ => return None,
    })
}

/// Display name of a `name|source|...` reference.
pub(crate) fn reference_name(uid: &str) -> &str {
    uid.split('|').next().unwrap_or(uid).trim()
}

/// Expanded text of each element: strings, numbers and named objects.
pub(crate) fn expand_list(renderer: &Renderer, values: &[Value]) -> Vec<String> {
    values
        .iter()
        .filter_map(|value| match value {
            Value::String(s) => Some(renderer.expand(s)),
            Value::Number(n) => Some(n.to_string()),
            Value::Object(map) => {
                let rec = Record::new(map);
                rec.str("full")
                    .or_else(|| rec.str("special"))
                    .or_else(|| rec.str("entry"))
                    .or_else(|| rec.name())
                    .or_else(|| rec.str("proficiency"))
                    .map(|text| renderer.expand(text))
            }
            _ => None,
        })
        .filter(|text| !text.is_empty())
        .collect()
}

/// Proficiency blocks such as `[{"insight": true, "religion": true}]`.
///
/// Alternatives (several objects) are joined with `; or`.
pub(crate) fn proficiency_text(renderer: &Renderer, values: &[Value]) -> Option<String> {
    let alternatives: Vec<String> = values
        .iter()
        .filter_map(Record::from_value)
        .map(|rec| {
            rec.map()
                .iter()
                .filter_map(|(key, value)| proficiency_part(renderer, key, value))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .filter(|text| !text.is_empty())
        .collect();
    (!alternatives.is_empty()).then(|| alternatives.join("; or "))
}

fn proficiency_part(renderer: &Renderer, key: &str, value: &Value) -> Option<String> {
    match value {
        Value::Bool(true) => Some(title_case(&renderer.expander().expand_plain(reference_name(key)))),
        Value::Number(n) if key.starts_with("any") => {
            let kind = key.trim_start_matches("any").to_lowercase();
            if kind.is_empty() {
                Some(format!("any {n} of your choice"))
            } else {
                Some(format!("any {n} {kind}"))
            }
        }
        Value::Object(map) if key == "choose" => {
            let choose = Record::new(map);
            let count = choose.i64("count").unwrap_or(1);
            let from: Vec<String> = choose
                .strings("from")
                .into_iter()
                .map(|option| title_case(reference_name(option)))
                .collect();
            (!from.is_empty()).then(|| format!("choose {count} from {}", from.join(", ")))
        }
        _ => None,
    }
}

/// Ability score increases such as `[{"str": 2, "cha": 1}]`.
pub(crate) fn ability_bonus_text(values: &[Value]) -> Option<String> {
    let alternatives: Vec<String> = values
        .iter()
        .filter_map(Record::from_value)
        .map(|rec| {
            let mut parts: Vec<String> = ABILITIES
                .iter()
                .filter_map(|(key, _)| {
                    rec.i64(key)
                        .map(|bonus| format!("{} {}", ability_name(key), signed(bonus)))
                })
                .collect();
            if let Some(choose) = rec.object("choose") {
                parts.extend(choose_bonus_text(choose));
            }
            parts.join(", ")
        })
        .filter(|text| !text.is_empty())
        .collect();
    (!alternatives.is_empty()).then(|| alternatives.join("; or "))
}

fn choose_bonus_text(choose: Record<'_>) -> Option<String> {
    if let Some(weighted) = choose.object("weighted") {
        let from = ability_names(weighted.strings("from"));
        let weights: Vec<String> = weighted
            .array("weights")
            .iter()
            .filter_map(Value::as_i64)
            .map(signed)
            .collect();
        if from.is_empty() || weights.is_empty() {
            return None;
        }
        return Some(format!(
            "{} among {}",
            join_conjunction(&weights, "and"),
            join_conjunction(&from, "or")
        ));
    }
    let from = ability_names(choose.strings("from"));
    if from.is_empty() {
        return None;
    }
    let amount = choose.i64("amount").unwrap_or(1);
    let count = choose.i64("count").unwrap_or(1);
    Some(if count == 1 {
        format!("{} to {}", signed(amount), join_conjunction(&from, "or"))
    } else {
        format!("{} to {count} of {}", signed(amount), join_conjunction(&from, "or"))
    })
}

fn ability_names(codes: Vec<&str>) -> Vec<String> {
    codes
        .into_iter()
        .map(|code| ability_name(code).to_string())
        .collect()
}

/// Value in copper pieces as the largest whole coin (`1,500 gp`, `5 sp`).
pub(crate) fn coin_text(copper: i64) -> String {
    let (amount, coin) = if copper % 100 == 0 {
        (copper / 100, "gp")
    } else if copper % 10 == 0 {
        (copper / 10, "sp")
    } else {
        (copper, "cp")
    };
    format!("{} {coin}", thousands(amount))
}

pub(crate) fn thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if n < 0 { format!("-{out}") } else { out }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ability_modifier_floor() {
        assert_eq!(ability_modifier(10), 0);
        assert_eq!(ability_modifier(11), 0);
        assert_eq!(ability_modifier(15), 2);
        assert_eq!(ability_modifier(8), -1);
        assert_eq!(ability_modifier(9), -1);
        assert_eq!(ability_modifier(1), -5);
        assert_eq!(ability_modifier(i64::MIN), i64::MIN / 2);
        assert_eq!(format_modifier(i64::MIN), format!("{} ({})", i64::MIN, i64::MIN / 2));
        assert_eq!(ability_modifier(i64::MAX), (i64::MAX - 10) / 2);
        assert_eq!(ability_modifier(20), 5);
        assert_eq!(format_modifier(8), "8 (-1)");
    }

    #[test]
    fn test_ability_table() {
        let value = json!({"str": 8, "dex": 14, "con": 10, "int": 10, "wis": 8, "cha": 8});
        let table = ability_table(Record::from_value(&value).unwrap()).unwrap();
        assert_eq!(
            table,
            "| STR | DEX | CON | INT | WIS | CHA |\n\
             |:---:|:---:|:---:|:---:|:---:|:---:|\n\
             | 8 (-1) | 14 (+2) | 10 (+0) | 10 (+0) | 8 (-1) | 8 (-1) |"
        );
        let value = json!({"name": "x"});
        assert!(ability_table(Record::from_value(&value).unwrap()).is_none());
    }

    #[test]
    fn test_speed_text() {
        let renderer = Renderer::default();
        assert_eq!(
            speed_text(&renderer, &json!({"walk": 30, "fly": 60})).as_deref(),
            Some("30 ft., fly 60 ft.")
        );
        assert_eq!(
            speed_text(&renderer, &json!({"walk": 10, "fly": {"number": 40, "condition": "(in bat form)"}, "canHover": true})).as_deref(),
            Some("10 ft., fly 40 ft. (in bat form) (hover)")
        );
        assert_eq!(speed_text(&renderer, &json!(25)).as_deref(), Some("25 ft."));
        assert_eq!(speed_text(&renderer, &json!({"walk": 30, "climb": true})).as_deref(),
            Some("30 ft., climb equal to your walking speed"));
        assert!(speed_text(&renderer, &json!([])).is_none());
    }

    #[test]
    fn test_time_text() {
        let renderer = Renderer::default();
        let times = json!([{"number": 1, "unit": "reaction", "condition": "when you are hit"}]);
        assert_eq!(
            time_text(&renderer, times.as_array().unwrap()).as_deref(),
            Some("1 reaction, which you take when you are hit")
        );
        let times = json!([{"number": 10, "unit": "minute"}, {"number": 1, "unit": "bonus"}]);
        assert_eq!(
            time_text(&renderer, times.as_array().unwrap()).as_deref(),
            Some("10 minutes or 1 bonus action")
        );
    }

    #[test]
    fn test_proficiency_text() {
        let renderer = Renderer::default();
        let values = json!([{"insight": true, "religion": true}]);
        assert_eq!(
            proficiency_text(&renderer, values.as_array().unwrap()).as_deref(),
            Some("Insight, Religion")
        );
        let values = json!([{"choose": {"from": ["arcana", "history"], "count": 2}}, {"anyStandard": 1}]);
        assert_eq!(
            proficiency_text(&renderer, values.as_array().unwrap()).as_deref(),
            Some("choose 2 from Arcana, History; or any 1 standard")
        );
    }

    #[test]
    fn test_ability_bonus_text() {
        let values = json!([{"str": 2, "cha": 1}]);
        assert_eq!(
            ability_bonus_text(values.as_array().unwrap()).as_deref(),
            Some("Strength +2, Charisma +1")
        );
        let values = json!([{"choose": {"from": ["str", "dex"], "amount": 1}}]);
        assert_eq!(
            ability_bonus_text(values.as_array().unwrap()).as_deref(),
            Some("+1 to Strength or Dexterity")
        );
    }

    #[test]
    fn test_coin_text() {
        assert_eq!(coin_text(150_000), "1,500 gp");
        assert_eq!(coin_text(50), "5 sp");
        assert_eq!(coin_text(7), "7 cp");
    }
}
