//! Declarative per-category document layout.

use crate::category::Category;
use crate::index::Facets;
use crate::ir::Record;
use crate::markdown::Renderer;

use super::{character, creature, item, rules, spell, vehicle};

/// Formats one labelled field from a record; `None` omits the line.
pub type FieldFormat = fn(&Renderer, Record<'_>) -> Option<String>;

/// Renders a free-form part of a document.
pub type PartRender = fn(&Renderer, Record<'_>) -> String;

/// `**Label** value` line.
pub struct FieldRule {
    pub label: &'static str,
    pub format: FieldFormat,
}

impl FieldRule {
    pub const fn new(label: &'static str, format: FieldFormat) -> Self {
        Self { label, format }
    }
}

/// One part of a document body, rendered in order after the header.
pub enum Part {
    /// Labelled mechanic lines.
    Fields(&'static [FieldRule]),
    /// STR..CHA score table with modifiers.
    AbilityScores,
    /// Horizontal rule.
    Rule,
    /// Free-form entries under a record field.
    Entries(&'static str),
    /// A titled section over a record field, omitted when empty.
    Section {
        title: &'static str,
        key: &'static str,
    },
    /// Creature action groups (traits through mythic actions).
    ActionGroups,
    /// Category-specific rendering.
    Custom(PartRender),
}

/// Layout and facet extraction for one category.
pub struct CategorySpec {
    pub category: Category,
    /// Italic line under the title.
    pub subtitle: fn(&Renderer, Record<'_>) -> Option<String>,
    pub parts: &'static [Part],
    /// The only place that decides what is indexable for a category.
    pub facets: fn(&Renderer, Record<'_>) -> Facets,
}

/// The layout table for a category.
pub fn spec_for(category: Category) -> &'static CategorySpec {
    match category {
        Category::Spell => &spell::SPELL,
        Category::Creature => &creature::CREATURE,
        Category::Item => &item::ITEM,
        Category::Equipment => &item::EQUIPMENT,
        Category::Class => &character::CLASS,
        Category::Subclass => &character::SUBCLASS,
        Category::Species => &character::SPECIES,
        Category::Background => &character::BACKGROUND,
        Category::Feat => &character::FEAT,
        Category::Rule => &rules::RULE,
        Category::Condition => &rules::CONDITION,
        Category::Action => &rules::ACTION,
        Category::Deck => &rules::DECK,
        Category::Table => &rules::TABLE,
        Category::Vehicle => &vehicle::VEHICLE,
        Category::Trap => &vehicle::TRAP,
    }
}
