//! Macro name table and handlers.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::category::Category;
use crate::markdown::{inline_code, slugify};
use crate::util::signed;

use super::{ExpandOptions, Mode};

/// Characters escaped in link targets.
const LINK_TARGET: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'<').add(b'>').add(b'`');

/// Emphasis applied to a wrapped argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Bold,
    Italic,
    Strike,
    Code,
    Plain,
}

/// Fixed phrases emitted by marker tags such as `{@h}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Hit,
    Miss,
    HitOrMiss,
    SaveFail,
    SaveSuccess,
    SaveSuccessOrFail,
    Trigger,
    Response,
}

impl Marker {
    fn phrase(self) -> &'static str {
        match self {
            Self::Hit => "Hit:",
            Self::Miss => "Miss:",
            Self::HitOrMiss => "Hit or Miss:",
            Self::SaveFail => "Failure:",
            Self::SaveSuccess => "Success:",
            Self::SaveSuccessOrFail => "Failure or Success:",
            Self::Trigger => "Trigger:",
            Self::Response => "Response:",
        }
    }
}

/// Handler family for a macro name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroKind {
    /// `arg0` wrapped in an emphasis.
    Wrap(Emphasis),
    /// Reference to another entity; wrapped, or linked when linking is on.
    Reference(Emphasis),
    /// Dice expression shown as code.
    Dice,
    /// Scaling dice; shows the scaled die (`arg2`) when present.
    ScaleDice,
    /// Signed attack bonus.
    Hit,
    /// Save DC.
    Dc,
    /// Attack-type phrase (`mw` → Melee Weapon Attack).
    Attack,
    /// Attack-roll phrase (2024 wording).
    AttackRoll,
    /// Saving throw phrase for an ability.
    Save,
    /// Recharge annotation.
    Recharge,
    /// Percentage chance.
    Chance,
    /// Fixed italic phrase.
    Marker(Marker),
    /// Fixed literal text.
    Literal(&'static str),
    /// Annotation-only tag; yields `arg0`.
    PassThrough,
    /// Hyperlink to `arg1`.
    Link,
    /// Unrecognized name; yields `arg0`.
    Unknown,
}

impl MacroKind {
    /// Look up the handler for a macro name.
    pub fn from_name(name: &str) -> Self {
        use Emphasis::*;
        match name {
            "b" | "bold" => Self::Wrap(Bold),
            "i" | "italic" | "note" => Self::Wrap(Italic),
            "s" | "strike" | "s2" | "strikeDouble" => Self::Wrap(Strike),
            "code" => Self::Wrap(Code),

            "dice" | "damage" | "autodice" => Self::Dice,
            "scaledice" | "scaledamage" => Self::ScaleDice,
            "hit" | "d20" => Self::Hit,
            "dc" => Self::Dc,
            "atk" => Self::Attack,
            "atkr" => Self::AttackRoll,
            "actSave" => Self::Save,
            "recharge" => Self::Recharge,
            "chance" => Self::Chance,
            "h" => Self::Marker(Marker::Hit),
            "m" => Self::Marker(Marker::Miss),
            "hom" => Self::Marker(Marker::HitOrMiss),
            "actSaveFail" => Self::Marker(Marker::SaveFail),
            "actSaveSuccess" => Self::Marker(Marker::SaveSuccess),
            "actSaveSuccessOrFail" => Self::Marker(Marker::SaveSuccessOrFail),
            "actTrigger" => Self::Marker(Marker::Trigger),
            "actResponse" => Self::Marker(Marker::Response),
            "hitYourSpellAttack" => Self::Literal("your spell attack modifier"),
            "coinflip" => Self::Literal("flip a coin"),

            "creature" => Self::Reference(Bold),
            "spell" | "item" | "book" | "adventure" | "class" | "subclass" | "feat"
            | "background" | "race" | "optfeature" | "deity" | "vehicle" | "vehupgrade"
            | "trap" | "hazard" | "variantrule" | "deck" | "card" | "table" | "reward"
            | "object" | "disease" | "status" | "psionic" | "cult" | "boon" | "charoption"
            | "recipe" | "facility" | "itemMastery" | "classFeature" | "subclassFeature"
            | "legroup" | "language" => Self::Reference(Italic),
            "condition" | "skill" | "sense" | "action" | "quickref" => Self::Reference(Plain),

            "filter" | "5etools" | "area" | "color" | "highlight" | "font" | "style" | "u"
            | "underline" | "sup" | "sub" | "help" | "unit" | "loader" | "homebrew"
            | "footnote" | "kbd" | "tip" => Self::PassThrough,

            "link" => Self::Link,
            _ => Self::Unknown,
        }
    }
}

/// Position of the optional display-text argument of a reference tag.
fn display_index(name: &str) -> usize {
    match name {
        "classFeature" => 5,
        "subclassFeature" => 7,
        "subclass" => 4,
        "card" | "deity" => 3,
        _ => 2,
    }
}

/// Produce the replacement text for one invocation with expanded arguments.
pub(super) fn render(
    name: &str,
    args: &[String],
    options: &ExpandOptions,
    mode: Mode,
) -> String {
    let arg0 = args.first().map(|s| s.trim()).unwrap_or("");
    match MacroKind::from_name(name) {
        MacroKind::Wrap(emphasis) => wrap(emphasis, arg0, mode),
        MacroKind::Reference(emphasis) => {
            let display = args
                .get(display_index(name))
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .unwrap_or(arg0);
            if mode == Mode::Markdown
                && options.link_references
                && let Some(category) = Category::from_reference_tag(name)
            {
                let slug = slugify(arg0);
                if !slug.is_empty() {
                    return format!("[{display}](../{}/{slug}.md)", category.dir());
                }
            }
            wrap(emphasis, display, mode)
        }
        MacroKind::Dice => wrap(Emphasis::Code, arg0, mode),
        MacroKind::ScaleDice => {
            let shown = args
                .get(2)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .unwrap_or(arg0);
            wrap(Emphasis::Code, shown, mode)
        }
        MacroKind::Hit => signed_text(arg0),
        MacroKind::Dc => {
            if arg0.is_empty() {
                "DC".to_string()
            } else {
                format!("DC {arg0}")
            }
        }
        MacroKind::Attack => wrap(Emphasis::Italic, &attack_phrase(arg0, false), mode),
        MacroKind::AttackRoll => wrap(Emphasis::Italic, &attack_phrase(arg0, true), mode),
        MacroKind::Save => {
            let abilities: Vec<&str> = arg0
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ability_name)
                .collect();
            let phrase = if abilities.is_empty() {
                "Saving Throw:".to_string()
            } else {
                format!("{} Saving Throw:", abilities.join(" or "))
            };
            wrap(Emphasis::Italic, &phrase, mode)
        }
        MacroKind::Recharge => {
            if arg0.is_empty() || arg0 == "6" {
                "(Recharge 6)".to_string()
            } else {
                format!("(Recharge {arg0}-6)")
            }
        }
        MacroKind::Chance => {
            if arg0.is_empty() {
                String::new()
            } else {
                format!("{arg0}%")
            }
        }
        MacroKind::Marker(marker) => format!("{} ", wrap(Emphasis::Italic, marker.phrase(), mode)),
        MacroKind::Literal(text) => text.to_string(),
        MacroKind::PassThrough | MacroKind::Unknown => arg0.to_string(),
        MacroKind::Link => {
            let target = args.get(1).map(|s| s.trim()).unwrap_or("");
            if mode == Mode::Plain || target.is_empty() {
                arg0.to_string()
            } else {
                markdown_link(if arg0.is_empty() { target } else { arg0 }, target)
            }
        }
    }
}

/// Markdown link with an encoded target.
pub(crate) fn markdown_link(text: &str, target: &str) -> String {
    format!("[{text}]({})", utf8_percent_encode(target, LINK_TARGET))
}

fn wrap(emphasis: Emphasis, text: &str, mode: Mode) -> String {
    if text.is_empty() || mode == Mode::Plain {
        return text.to_string();
    }
    match emphasis {
        Emphasis::Bold => format!("**{text}**"),
        Emphasis::Italic => format!("*{text}*"),
        Emphasis::Strike => format!("~~{text}~~"),
        Emphasis::Code => inline_code(text),
        Emphasis::Plain => text.to_string(),
    }
}

fn signed_text(arg: &str) -> String {
    if arg.is_empty() {
        return String::new();
    }
    match arg.trim_start_matches('+').parse::<i64>() {
        Ok(n) => signed(n),
        Err(_) if arg.starts_with(['+', '-']) => arg.to_string(),
        Err(_) => format!("+{arg}"),
    }
}

/// Attack codes in canonical order (melee before ranged).
const ATTACK_TYPES: &[(&str, &str)] = &[
    ("m", "Melee Attack"),
    ("r", "Ranged Attack"),
    ("mw", "Melee Weapon Attack"),
    ("rw", "Ranged Weapon Attack"),
    ("ms", "Melee Spell Attack"),
    ("rs", "Ranged Spell Attack"),
    ("m,r", "Melee or Ranged Attack"),
    ("mw,rw", "Melee or Ranged Weapon Attack"),
    ("ms,rs", "Melee or Ranged Spell Attack"),
];

const ATTACK_ROLL_TYPES: &[(&str, &str)] = &[
    ("m", "Melee Attack Roll"),
    ("r", "Ranged Attack Roll"),
    ("m,r", "Melee or Ranged Attack Roll"),
];

/// Map an attack code such as `mw` or `rw, mw` to its phrase.
fn attack_phrase(code: &str, roll: bool) -> String {
    let mut parts: Vec<String> = code
        .split(',')
        .map(|p| p.trim().to_ascii_lowercase())
        .filter(|p| !p.is_empty())
        .collect();
    // Melee codes sort before ranged ones
    parts.sort_by_key(|p| !p.starts_with('m'));
    parts.dedup();
    let key = parts.join(",");

    let table = if roll { ATTACK_ROLL_TYPES } else { ATTACK_TYPES };
    let phrase = table
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
        .unwrap_or(if roll { "Attack Roll" } else { "Attack" });
    format!("{phrase}:")
}

/// Full ability name for a three-letter code; other text passes through.
pub(crate) fn ability_name(code: &str) -> &str {
    match code.to_ascii_lowercase().as_str() {
        "str" => "Strength",
        "dex" => "Dexterity",
        "con" => "Constitution",
        "int" => "Intelligence",
        "wis" => "Wisdom",
        "cha" => "Charisma",
        _ => code,
    }
}
