//! Spellcasting blocks, shared by entry rendering and creature statblocks.

use serde_json::Value;

use crate::ir::Record;
use crate::util::ordinal;

use super::render::{NameStyle, Renderer, join_blocks, named_paragraph};

/// Frequency groups keyed by use count (`daily`, `rest`, `weekly`).
const FREQUENCIES: &[(&str, &str)] = &[("daily", "day"), ("rest", "rest"), ("weekly", "week")];

pub(crate) fn render_spellcasting(renderer: &Renderer, rec: Record<'_>, depth: usize) -> String {
    let name = rec.name().unwrap_or("Spellcasting");
    let header = rec
        .get("headerEntries")
        .map(|entries| renderer.render_value(entries, depth + 1))
        .unwrap_or_default();
    let lead = named_paragraph(&renderer.expand(name), &header, NameStyle::BoldItalic);

    let mut lines = Vec::new();

    let at_will = spell_list(renderer, rec.array("will"));
    if !at_will.is_empty() {
        lines.push(format!("- At will: {at_will}"));
    }

    for (key, period) in FREQUENCIES {
        let Some(groups) = rec.object(key) else {
            continue;
        };
        let mut counts: Vec<(i64, bool, &Value)> = groups
            .map()
            .iter()
            .filter_map(|(count, spells)| {
                let each = count.ends_with('e');
                let n = count.trim_end_matches('e').parse().ok()?;
                Some((n, each, spells))
            })
            .collect();
        counts.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));
        for (n, each, spells) in counts {
            let list = spell_list(renderer, spells.as_array().map(Vec::as_slice).unwrap_or(&[]));
            if list.is_empty() {
                continue;
            }
            let each = if each { " each" } else { "" };
            lines.push(format!("- {n}/{period}{each}: {list}"));
        }
    }

    if let Some(levels) = rec.object("spells") {
        let mut by_level: Vec<(i64, Record<'_>)> = levels
            .map()
            .iter()
            .filter_map(|(level, group)| Some((level.parse().ok()?, Record::from_value(group)?)))
            .collect();
        by_level.sort_by_key(|(level, _)| *level);
        for (level, group) in by_level {
            let list = spell_list(renderer, group.array("spells"));
            if list.is_empty() {
                continue;
            }
            let label = if level == 0 {
                "Cantrips (at will)".to_string()
            } else {
                match group.i64("slots") {
                    Some(1) => format!("{} level (1 slot)", ordinal(level)),
                    Some(slots) => format!("{} level ({slots} slots)", ordinal(level)),
                    None => format!("{} level", ordinal(level)),
                }
            };
            lines.push(format!("- {label}: {list}"));
        }
    }

    let rituals = spell_list(renderer, rec.array("ritual"));
    if !rituals.is_empty() {
        lines.push(format!("- Rituals: {rituals}"));
    }

    let footer = rec
        .get("footerEntries")
        .map(|entries| renderer.render_value(entries, depth + 1))
        .unwrap_or_default();

    join_blocks([lead, lines.join("\n"), footer])
}

fn spell_list(renderer: &Renderer, spells: &[Value]) -> String {
    spells
        .iter()
        .filter_map(Value::as_str)
        .map(|spell| renderer.expand(spell))
        .filter(|spell| !spell.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_innate_spellcasting() {
        let value = json!({
            "type": "spellcasting",
            "name": "Innate Spellcasting",
            "headerEntries": ["The drow's spellcasting ability is Charisma."],
            "will": ["{@spell dancing lights}"],
            "daily": {"1e": ["{@spell darkness}", "{@spell faerie fire}"], "3": ["{@spell levitate}"]}
        });
        let out = Renderer::default().render_value(&value, 0);
        assert_eq!(
            out,
            "***Innate Spellcasting.*** The drow's spellcasting ability is Charisma.\n\n\
             - At will: *dancing lights*\n\
             - 3/day: *levitate*\n\
             - 1/day each: *darkness*, *faerie fire*"
        );
    }

    #[test]
    fn test_slot_spellcasting() {
        let value = json!({
            "type": "spellcasting",
            "headerEntries": ["Uses Intelligence."],
            "spells": {
                "1": {"slots": 4, "spells": ["{@spell magic missile}"]},
                "0": {"spells": ["{@spell light}"]},
                "3": {"slots": 1, "spells": ["{@spell fireball}"]}
            },
            "footerEntries": ["Casts before combat."]
        });
        let out = Renderer::default().render_value(&value, 0);
        assert_eq!(
            out,
            "***Spellcasting.*** Uses Intelligence.\n\n\
             - Cantrips (at will): *light*\n\
             - 1st level (4 slots): *magic missile*\n\
             - 3rd level (1 slot): *fireball*\n\n\
             Casts before combat."
        );
    }

    #[test]
    fn test_empty_spellcasting_is_header_only() {
        let value = json!({"type": "spellcasting", "daily": "bad"});
        let out = Renderer::default().render_value(&value, 0);
        assert_eq!(out, "***Spellcasting.***");
    }
}
