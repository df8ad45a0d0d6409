//! Creatures (bestiary statblocks).

use serde_json::Value;

use crate::category::Category;
use crate::index::{Facets, parse_challenge_rating};
use crate::ir::Record;
use crate::markdown::{NameStyle, Renderer, join_blocks};
use crate::util::{capitalize, join_conjunction, signed, title_case};

use super::common::{
    ABILITIES, damage_type_name, expand_list, movement_modes, size_name, size_text, sizes,
    speed_text, thousands,
};
use super::spec::{CategorySpec, FieldRule, Part};
use super::spell::lowercase_list;

const DEFENSES: &[FieldRule] = &[
    FieldRule::new("Armor Class", armor_class),
    FieldRule::new("Hit Points", hit_points),
    FieldRule::new("Speed", speed),
];

const DETAILS: &[FieldRule] = &[
    FieldRule::new("Saving Throws", saving_throws),
    FieldRule::new("Skills", skills),
    FieldRule::new("Damage Vulnerabilities", vulnerabilities),
    FieldRule::new("Damage Resistances", resistances),
    FieldRule::new("Damage Immunities", immunities),
    FieldRule::new("Condition Immunities", condition_immunities),
    FieldRule::new("Senses", senses),
    FieldRule::new("Languages", languages),
    FieldRule::new("Challenge", challenge),
    FieldRule::new("Proficiency Bonus", proficiency_bonus),
];

pub(crate) static CREATURE: CategorySpec = CategorySpec {
    category: Category::Creature,
    subtitle,
    parts: &[
        Part::Fields(DEFENSES),
        Part::AbilityScores,
        Part::Fields(DETAILS),
        Part::Rule,
        Part::ActionGroups,
        Part::Entries("entries"),
    ],
    facets,
};

/// Action groups in statblock order: (heading, field).
const ACTION_GROUPS: &[(&str, &str)] = &[
    ("Traits", "trait"),
    ("Spellcasting", "spellcasting"),
    ("Actions", "action"),
    ("Bonus Actions", "bonus"),
    ("Reactions", "reaction"),
    ("Legendary Actions", "legendary"),
    ("Mythic Actions", "mythic"),
];

/// XP awarded per challenge rating.
const XP_BY_CR: &[(&str, i64)] = &[
    ("0", 10),
    ("1/8", 25),
    ("1/4", 50),
    ("1/2", 100),
    ("1", 200),
    ("2", 450),
    ("3", 700),
    ("4", 1_100),
    ("5", 1_800),
    ("6", 2_300),
    ("7", 2_900),
    ("8", 3_900),
    ("9", 5_000),
    ("10", 5_900),
    ("11", 7_200),
    ("12", 8_400),
    ("13", 10_000),
    ("14", 11_500),
    ("15", 13_000),
    ("16", 15_000),
    ("17", 18_000),
    ("18", 20_000),
    ("19", 22_000),
    ("20", 25_000),
    ("21", 33_000),
    ("22", 41_000),
    ("23", 50_000),
    ("24", 62_000),
    ("25", 75_000),
    ("26", 90_000),
    ("27", 105_000),
    ("28", 120_000),
    ("29", 135_000),
    ("30", 155_000),
];

fn subtitle(renderer: &Renderer, rec: Record<'_>) -> Option<String> {
    let head = [size_text(rec), creature_type(rec)]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
    let alignment = alignment(renderer, rec);
    match (head.is_empty(), alignment) {
        (true, None) => None,
        (true, Some(alignment)) => Some(capitalize(&alignment)),
        (false, Some(alignment)) => Some(format!("{head}, {alignment}")),
        (false, None) => Some(head),
    }
}

/// Base creature type, e.g. `humanoid` or `celestial or fiend`.
fn base_type(rec: Record<'_>) -> Option<String> {
    match rec.get("type")? {
        Value::String(kind) => Some(kind.clone()),
        Value::Object(map) => match map.get("type")? {
            Value::String(kind) => Some(kind.clone()),
            Value::Object(choose) => {
                let options: Vec<String> = choose
                    .get("choose")?
                    .as_array()?
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect();
                (!options.is_empty()).then(|| join_conjunction(&options, "or"))
            }
            _ => None,
        },
        _ => None,
    }
}

/// Full type with swarm form and tags, e.g. `humanoid (goblinoid)`.
fn creature_type(rec: Record<'_>) -> Option<String> {
    let base = base_type(rec)?;
    let Some(details) = rec.object("type") else {
        return Some(base);
    };
    let mut text = match details.str("swarmSize") {
        Some(size) => format!("swarm of {} {base}s", size_name(size)),
        None => base,
    };
    let tags: Vec<String> = details
        .array("tags")
        .iter()
        .filter_map(|tag| match tag {
            Value::String(tag) => Some(tag.clone()),
            Value::Object(map) => {
                let tag = Record::new(map);
                let name = tag.str("tag")?;
                Some(match tag.str("prefix") {
                    Some(prefix) => format!("{prefix} {name}"),
                    None => name.to_string(),
                })
            }
            _ => None,
        })
        .collect();
    if !tags.is_empty() {
        text.push_str(&format!(" ({})", tags.join(", ")));
    }
    Some(text)
}

fn alignment_word(code: &str) -> Option<&'static str> {
    Some(match code {
        "L" => "lawful",
        "N" | "NX" | "NY" => "neutral",
        "C" => "chaotic",
        "G" => "good",
        "E" => "evil",
        "U" => "unaligned",
        "A" => "any alignment",
        _ => return None,
    })
}

/// Alignment text from codes such as `["C", "E"]` or `["L", "NX", "C", "E"]`.
fn alignment(renderer: &Renderer, rec: Record<'_>) -> Option<String> {
    let values = rec.array("alignment");
    if values.iter().all(Value::is_object) && !values.is_empty() {
        // Alternatives with an optional chance or note
        let options: Vec<String> = values
            .iter()
            .filter_map(Record::from_value)
            .filter_map(|option| {
                if let Some(special) = option.str("special") {
                    return Some(renderer.expand(special));
                }
                let text = alignment_codes(option.strings("alignment"))?;
                Some(match option.i64("chance") {
                    Some(chance) => format!("{text} ({chance}%)"),
                    None => text,
                })
            })
            .collect();
        return (!options.is_empty()).then(|| join_conjunction(&options, "or"));
    }
    alignment_codes(values.iter().filter_map(Value::as_str).collect())
}

fn alignment_codes(codes: Vec<&str>) -> Option<String> {
    if codes.is_empty() {
        return None;
    }
    let has = |code: &str| codes.contains(&code);
    if has("A") {
        return Some("any alignment".to_string());
    }
    let axes = ["L", "NX", "C"].iter().all(|c| has(c));
    let morals = ["G", "NY", "E"].iter().all(|c| has(c));
    let any = match codes.len() {
        5 if morals && !has("L") => Some("any non-lawful alignment"),
        5 if morals && !has("C") => Some("any non-chaotic alignment"),
        5 if axes && !has("G") => Some("any non-good alignment"),
        5 if axes && !has("E") => Some("any non-evil alignment"),
        4 if axes && has("G") => Some("any good alignment"),
        4 if axes && has("E") => Some("any evil alignment"),
        4 if morals && has("L") => Some("any lawful alignment"),
        4 if morals && has("C") => Some("any chaotic alignment"),
        n if n >= 6 => Some("any alignment"),
        _ => None,
    };
    if let Some(any) = any {
        return Some(any.to_string());
    }
    let words: Vec<&str> = codes.iter().filter_map(|c| alignment_word(c)).collect();
    if words.is_empty() {
        return None;
    }
    if words == ["neutral", "neutral"] {
        return Some("neutral".to_string());
    }
    Some(words.join(" "))
}

fn armor_class(renderer: &Renderer, rec: Record<'_>) -> Option<String> {
    let parts: Vec<String> = rec
        .array("ac")
        .iter()
        .filter_map(|ac| match ac {
            Value::Number(n) => Some(n.to_string()),
            Value::Object(map) => {
                let ac = Record::new(map);
                if let Some(special) = ac.str("special") {
                    return Some(renderer.expand(special));
                }
                let mut text = ac.i64("ac")?.to_string();
                let from = expand_list(renderer, ac.array("from"));
                if !from.is_empty() {
                    text.push_str(&format!(" ({})", from.join(", ")));
                }
                if let Some(condition) = ac.str("condition") {
                    text.push(' ');
                    text.push_str(&renderer.expand(condition));
                }
                Some(text)
            }
            _ => None,
        })
        .collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}

fn hit_points(renderer: &Renderer, rec: Record<'_>) -> Option<String> {
    let hp = rec.object("hp")?;
    if let Some(special) = hp.str("special") {
        return Some(renderer.expand(special));
    }
    let average = hp.i64("average")?;
    Some(match hp.str("formula") {
        Some(formula) => format!("{average} ({})", formula.trim()),
        None => average.to_string(),
    })
}

fn speed(renderer: &Renderer, rec: Record<'_>) -> Option<String> {
    speed_text(renderer, rec.get("speed")?)
}

fn saving_throws(_: &Renderer, rec: Record<'_>) -> Option<String> {
    let saves = rec.object("save")?;
    let parts: Vec<String> = ABILITIES
        .iter()
        .filter_map(|(key, _)| {
            let bonus = saves.text(key)?;
            Some(format!("{} {}", capitalize(key), bonus_text(&bonus)))
        })
        .collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}

fn skills(_: &Renderer, rec: Record<'_>) -> Option<String> {
    let skills = rec.object("skill")?;
    let mut parts: Vec<(String, String)> = skills
        .map()
        .iter()
        .filter_map(|(name, bonus)| {
            let bonus = match bonus {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                _ => return None,
            };
            Some((title_case(name), bonus_text(&bonus)))
        })
        .collect();
    parts.sort();
    let parts: Vec<String> = parts
        .into_iter()
        .map(|(name, bonus)| format!("{name} {bonus}"))
        .collect();
    (!parts.is_empty()).then(|| parts.join(", "))
}

fn bonus_text(bonus: &str) -> String {
    match bonus.trim().parse::<i64>() {
        Ok(n) => signed(n),
        Err(_) => bonus.trim().to_string(),
    }
}

/// Damage or condition list supporting plain and qualified forms.
///
/// Plain entries are joined with commas; qualified groups such as
/// `{"resist": [...], "note": "from nonmagical attacks"}` follow after a
/// semicolon.
fn defense_list(renderer: &Renderer, values: &[Value], key: &str) -> Option<String> {
    let mut plain = Vec::new();
    let mut qualified = Vec::new();
    for value in values {
        match value {
            Value::String(text) => plain.push(renderer.expand(text)),
            Value::Object(map) => {
                let group = Record::new(map);
                if let Some(special) = group.str("special") {
                    qualified.push(renderer.expand(special));
                    continue;
                }
                let Some(inner) = defense_list(renderer, group.array(key), key) else {
                    continue;
                };
                let text = [
                    group.str("preNote").map(|n| renderer.expand(n)),
                    Some(inner),
                    group.str("note").map(|n| renderer.expand(n)),
                ]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ");
                qualified.push(text);
            }
            _ => {}
        }
    }

    let plain = (!plain.is_empty()).then(|| plain.join(", "));
    let parts: Vec<String> = plain.into_iter().chain(qualified).collect();
    (!parts.is_empty()).then(|| parts.join("; "))
}

fn vulnerabilities(renderer: &Renderer, rec: Record<'_>) -> Option<String> {
    defense_list(renderer, rec.array("vulnerable"), "vulnerable")
}

fn resistances(renderer: &Renderer, rec: Record<'_>) -> Option<String> {
    defense_list(renderer, rec.array("resist"), "resist")
}

fn immunities(renderer: &Renderer, rec: Record<'_>) -> Option<String> {
    defense_list(renderer, rec.array("immune"), "immune")
}

fn condition_immunities(renderer: &Renderer, rec: Record<'_>) -> Option<String> {
    defense_list(renderer, rec.array("conditionImmune"), "conditionImmune")
}

/// Every plain damage/condition name in a defense list, including those
/// nested in qualified groups.
fn defense_names(values: &[Value], key: &str) -> Vec<String> {
    let mut names = Vec::new();
    for value in values {
        match value {
            Value::String(text) => names.push(text.to_lowercase()),
            Value::Object(map) => {
                if let Some(inner) = map.get(key).and_then(Value::as_array) {
                    names.extend(defense_names(inner, key));
                }
            }
            _ => {}
        }
    }
    names.sort();
    names.dedup();
    names
}

fn senses(renderer: &Renderer, rec: Record<'_>) -> Option<String> {
    let mut parts = expand_list(renderer, rec.array("senses"));
    if let Some(passive) = rec.i64("passive") {
        parts.push(format!("passive Perception {passive}"));
    }
    (!parts.is_empty()).then(|| parts.join(", "))
}

fn languages(renderer: &Renderer, rec: Record<'_>) -> Option<String> {
    if !rec.has("languages") {
        return None;
    }
    let languages = expand_list(renderer, rec.array("languages"));
    Some(if languages.is_empty() {
        "—".to_string()
    } else {
        languages.join(", ")
    })
}

/// Challenge rating with optional lair and coven ratings.
struct Challenge {
    cr: String,
    lair: Option<String>,
    coven: Option<String>,
}

fn challenge_rating(rec: Record<'_>) -> Option<Challenge> {
    match rec.get("cr")? {
        Value::String(cr) => Some(Challenge {
            cr: cr.trim().to_string(),
            lair: None,
            coven: None,
        }),
        Value::Number(n) => Some(Challenge {
            cr: n.to_string(),
            lair: None,
            coven: None,
        }),
        Value::Object(map) => {
            let cr = Record::new(map);
            Some(Challenge {
                cr: cr.text("cr")?,
                lair: cr.text("lair"),
                coven: cr.text("coven"),
            })
        }
        _ => None,
    }
}

fn xp_for(cr: &str) -> Option<i64> {
    XP_BY_CR
        .iter()
        .find(|(rating, _)| *rating == cr)
        .map(|(_, xp)| *xp)
}

fn challenge(_: &Renderer, rec: Record<'_>) -> Option<String> {
    let challenge = challenge_rating(rec)?;
    let Some(xp) = xp_for(&challenge.cr) else {
        return Some(challenge.cr);
    };
    let mut detail = format!("{} XP", thousands(xp));
    if let Some(lair_xp) = challenge.lair.as_deref().and_then(xp_for) {
        detail.push_str(&format!(", or {} XP in lair", thousands(lair_xp)));
    }
    if let Some(coven_xp) = challenge.coven.as_deref().and_then(xp_for) {
        detail.push_str(&format!(", or {} XP when part of a coven", thousands(coven_xp)));
    }
    Some(format!("{} ({detail})", challenge.cr))
}

/// Proficiency bonus implied by a challenge rating.
pub(crate) fn proficiency_for_cr(cr: f64) -> i64 {
    if cr < 1.0 {
        return 2;
    }
    2 + ((cr as i64) - 1) / 4
}

fn proficiency_bonus(_: &Renderer, rec: Record<'_>) -> Option<String> {
    let cr = parse_challenge_rating(&challenge_rating(rec)?.cr)?;
    Some(signed(proficiency_for_cr(cr)))
}

/// Traits, spellcasting, actions and the rest, in fixed order.
///
/// Each item renders as `***Name.*** body`; empty groups get no heading.
pub(crate) fn action_groups(renderer: &Renderer, rec: Record<'_>) -> String {
    let groups = ACTION_GROUPS.iter().filter_map(|(title, key)| {
        let items: Vec<String> = if *key == "spellcasting" {
            rec.array(key)
                .iter()
                .filter_map(Record::from_value)
                .map(|block| renderer.render_spellcasting(block, 1))
                .collect()
        } else {
            rec.array(key)
                .iter()
                .map(|item| match Record::from_value(item) {
                    Some(named) if named.name().is_some() => {
                        renderer.render_named_entry(named, 1, NameStyle::BoldItalic)
                    }
                    _ => renderer.render_value(item, 1),
                })
                .collect()
        };
        let items: Vec<String> = items.into_iter().filter(|i| !i.trim().is_empty()).collect();
        if items.is_empty() {
            return None;
        }
        let intro = match *key {
            "legendary" => Some(legendary_header(renderer, rec)),
            "mythic" => rec
                .get("mythicHeader")
                .map(|header| renderer.render_value(header, 1)),
            _ => None,
        };
        Some(join_blocks(
            std::iter::once(renderer.heading(title, 0, 0))
                .chain(intro)
                .chain(items),
        ))
    });
    join_blocks(groups)
}

fn legendary_header(renderer: &Renderer, rec: Record<'_>) -> String {
    if let Some(header) = rec.get("legendaryHeader") {
        return renderer.render_value(header, 1);
    }
    let name = rec
        .name()
        .map(|n| renderer.expander().expand_plain(n))
        .unwrap_or_default();
    let subject = if rec.flag("isNamedCreature") {
        name
    } else {
        let short = rec
            .str("shortName")
            .map(str::to_string)
            .unwrap_or_else(|| name.to_lowercase());
        format!("the {short}")
    };
    let count = rec.i64("legendaryActions").unwrap_or(3);
    format!(
        "{} can take {count} legendary actions, choosing from the options below. \
         Only one legendary action can be used at a time and only at the end of another \
         creature's turn. {} regains spent legendary actions at the start of its turn.",
        capitalize(&subject),
        capitalize(&subject)
    )
}

fn facets(_: &Renderer, rec: Record<'_>) -> Facets {
    let mut facets = Facets::new();
    if let Some(challenge) = challenge_rating(rec) {
        facets.insert_opt("cr_value", parse_challenge_rating(&challenge.cr));
        facets.insert("cr", challenge.cr);
    }
    facets.insert_opt("type", base_type(rec).map(|t| t.to_lowercase()));
    facets.insert_opt("size", sizes(rec).into_iter().next());
    facets.insert("movement", movement_modes(rec.get("speed")));
    facets.insert("immunities", defense_names(rec.array("immune"), "immune"));
    facets.insert("resistances", defense_names(rec.array("resist"), "resist"));
    facets.insert("conditions", lowercase_list(rec.strings("conditionInflict")));

    let mut damage: Vec<String> = rec
        .strings("damageTags")
        .into_iter()
        .filter_map(damage_type_name)
        .map(str::to_string)
        .collect();
    damage.sort();
    damage.dedup();
    facets.insert("damage_types", damage);

    facets.insert("legendary", !rec.array("legendary").is_empty());
    facets.insert("environment", lowercase_list(rec.strings("environment")));
    facets
}
