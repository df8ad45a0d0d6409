//! Entity categories and their corpus/output naming.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// An entity family in the reference corpus.
///
/// Each category owns one output directory and one builder table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Spell,
    Creature,
    Item,
    Equipment,
    Class,
    Subclass,
    Species,
    Background,
    Feat,
    Rule,
    Condition,
    Action,
    Vehicle,
    Trap,
    Deck,
    Table,
}

impl Category {
    /// Every category, in output order.
    pub const ALL: [Category; 16] = [
        Category::Spell,
        Category::Creature,
        Category::Item,
        Category::Equipment,
        Category::Class,
        Category::Subclass,
        Category::Species,
        Category::Background,
        Category::Feat,
        Category::Rule,
        Category::Condition,
        Category::Action,
        Category::Vehicle,
        Category::Trap,
        Category::Deck,
        Category::Table,
    ];

    /// Identifier used in index files and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Spell => "spell",
            Self::Creature => "creature",
            Self::Item => "item",
            Self::Equipment => "equipment",
            Self::Class => "class",
            Self::Subclass => "subclass",
            Self::Species => "species",
            Self::Background => "background",
            Self::Feat => "feat",
            Self::Rule => "rule",
            Self::Condition => "condition",
            Self::Action => "action",
            Self::Vehicle => "vehicle",
            Self::Trap => "trap",
            Self::Deck => "deck",
            Self::Table => "table",
        }
    }

    /// Output directory for rendered documents of this category.
    pub fn dir(self) -> &'static str {
        match self {
            Self::Spell => "spells",
            Self::Creature => "bestiary",
            Self::Item => "items",
            Self::Equipment => "equipment",
            Self::Class => "classes",
            Self::Subclass => "subclasses",
            Self::Species => "species",
            Self::Background => "backgrounds",
            Self::Feat => "feats",
            Self::Rule => "rules",
            Self::Condition => "conditions",
            Self::Action => "actions",
            Self::Vehicle => "vehicles",
            Self::Trap => "traps",
            Self::Deck => "decks",
            Self::Table => "tables",
        }
    }

    /// Human-readable plural label, used for listing pages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Spell => "Spells",
            Self::Creature => "Bestiary",
            Self::Item => "Magic Items",
            Self::Equipment => "Equipment",
            Self::Class => "Classes",
            Self::Subclass => "Subclasses",
            Self::Species => "Species",
            Self::Background => "Backgrounds",
            Self::Feat => "Feats",
            Self::Rule => "Rules",
            Self::Condition => "Conditions",
            Self::Action => "Actions",
            Self::Vehicle => "Vehicles",
            Self::Trap => "Traps & Hazards",
            Self::Deck => "Decks",
            Self::Table => "Tables",
        }
    }

    /// Map a top-level corpus key (e.g. `"monster"`) to its category.
    pub fn from_corpus_key(key: &str) -> Option<Self> {
        Some(match key {
            "spell" => Self::Spell,
            "monster" => Self::Creature,
            "item" | "magicvariant" => Self::Item,
            "baseitem" => Self::Equipment,
            "class" => Self::Class,
            "subclass" => Self::Subclass,
            "race" | "species" => Self::Species,
            "background" => Self::Background,
            "feat" => Self::Feat,
            "variantrule" => Self::Rule,
            "condition" | "disease" | "status" => Self::Condition,
            "action" => Self::Action,
            "vehicle" => Self::Vehicle,
            "trap" | "hazard" => Self::Trap,
            "deck" => Self::Deck,
            "table" => Self::Table,
            _ => return None,
        })
    }

    /// Map a reference macro name (e.g. `"creature"` in `{@creature goblin}`)
    /// to the category whose documents it points at.
    pub fn from_reference_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "spell" => Self::Spell,
            "creature" => Self::Creature,
            "item" => Self::Item,
            "class" => Self::Class,
            "subclass" => Self::Subclass,
            "race" => Self::Species,
            "background" => Self::Background,
            "feat" => Self::Feat,
            "variantrule" => Self::Rule,
            "condition" | "disease" | "status" => Self::Condition,
            "action" => Self::Action,
            "vehicle" => Self::Vehicle,
            "trap" | "hazard" => Self::Trap,
            "deck" => Self::Deck,
            "table" => Self::Table,
            _ => return None,
        })
    }

    /// Parse a category from its identifier or output directory name.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == name || c.dir() == name)
            .or_else(|| Self::from_corpus_key(&name))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}
