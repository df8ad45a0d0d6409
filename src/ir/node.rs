//! Node types and block kinds.

use std::borrow::Cow;

use serde_json::Value;

use super::record::{Record, number_text};

/// Kind of a block node, decoded from its `type` field.
///
/// The corpus vocabulary is open-ended, so the set is closed with an
/// explicit [`BlockKind::Unknown`] arm. The raw type name stays available
/// through [`Block::type_name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// Named section; heading at the base level plus depth.
    Section,
    /// Named sub-entry; heading one level below a section at the same depth.
    Entries,
    /// Alias of `Section` used by some records.
    Entry,
    /// Bulleted list of strings or named items.
    List,
    /// Table with column labels and rows.
    Table,
    /// Several tables under one name.
    TableGroup,
    /// Styled table row (`{"type": "row", "row": [...]}`).
    Row,
    /// Table cell with a dice roll range.
    Cell,
    /// Sidebar rendered as a blockquote.
    Inset,
    /// Boxed text meant to be read aloud; blockquote with italic lines.
    InsetReadaloud,
    /// Quotation with optional attribution.
    Quote,
    /// Variant rule sidebar.
    Variant,
    /// Sub-section of a variant rule.
    VariantInner,
    /// Inline-named paragraph inside a variant rule.
    VariantSub,
    /// Set of alternatives, rendered as their children.
    Options,
    /// Inline-named paragraph (`**Name.** body`).
    Item,
    /// Inline-named paragraph with italic name.
    ItemSub,
    /// Spell list line inside a spellcasting item.
    ItemSpell,
    /// Children concatenated without separators.
    Inline,
    /// Children concatenated as one paragraph.
    InlineBlock,
    /// Image; rendered as a text placeholder.
    Image,
    /// Group of images.
    Gallery,
    /// Hyperlink node.
    Link,
    /// Save DC formula.
    AbilityDc,
    /// Attack modifier formula.
    AbilityAttackMod,
    /// Free-form ability formula.
    AbilityGeneric,
    /// Reference to a full statblock elsewhere.
    Statblock,
    /// Embedded statblock; rendered as a reference only.
    StatblockInline,
    /// Horizontal rule.
    Hr,
    /// Signed bonus.
    Bonus,
    /// Signed speed bonus in feet.
    BonusSpeed,
    /// Dice expression.
    Dice,
    /// Preformatted text.
    Code,
    /// Sequence of flow blocks.
    Flowchart,
    /// One step of a flowchart.
    FlowBlock,
    /// Homebrew wrapper; rendered as its children.
    Homebrew,
    /// Transparent wrapper around a single child.
    Wrapper,
    /// Spellcasting block (at-will, daily and slotted spell lists).
    Spellcasting,
    /// Pointer to a class feature.
    RefClassFeature,
    /// Pointer to a subclass feature.
    RefSubclassFeature,
    /// Pointer to an optional feature.
    RefOptionalFeature,
    /// Any type name not listed above.
    Unknown,
}

impl BlockKind {
    /// Decode a `type` field.
    pub fn from_type(name: &str) -> Self {
        match name {
            "section" => Self::Section,
            "entries" => Self::Entries,
            "entry" => Self::Entry,
            "list" => Self::List,
            "table" => Self::Table,
            "tableGroup" => Self::TableGroup,
            "row" => Self::Row,
            "cell" => Self::Cell,
            "inset" => Self::Inset,
            "insetReadaloud" => Self::InsetReadaloud,
            "quote" => Self::Quote,
            "variant" => Self::Variant,
            "variantInner" => Self::VariantInner,
            "variantSub" => Self::VariantSub,
            "options" => Self::Options,
            "item" => Self::Item,
            "itemSub" => Self::ItemSub,
            "itemSpell" => Self::ItemSpell,
            "inline" => Self::Inline,
            "inlineBlock" => Self::InlineBlock,
            "image" => Self::Image,
            "gallery" => Self::Gallery,
            "link" => Self::Link,
            "abilityDc" => Self::AbilityDc,
            "abilityAttackMod" => Self::AbilityAttackMod,
            "abilityGeneric" => Self::AbilityGeneric,
            "statblock" => Self::Statblock,
            "statblockInline" => Self::StatblockInline,
            "hr" => Self::Hr,
            "bonus" => Self::Bonus,
            "bonusSpeed" => Self::BonusSpeed,
            "dice" => Self::Dice,
            "code" => Self::Code,
            "flowchart" => Self::Flowchart,
            "flowBlock" => Self::FlowBlock,
            "homebrew" => Self::Homebrew,
            "wrapper" => Self::Wrapper,
            "spellcasting" => Self::Spellcasting,
            "refClassFeature" => Self::RefClassFeature,
            "refSubclassFeature" => Self::RefSubclassFeature,
            "refOptionalfeature" => Self::RefOptionalFeature,
            _ => Self::Unknown,
        }
    }
}

/// A block node: a kind plus the object carrying its fields and children.
#[derive(Debug, Clone, Copy)]
pub struct Block<'a> {
    pub kind: BlockKind,
    pub record: Record<'a>,
}

impl<'a> Block<'a> {
    /// The raw `type` name (empty for untyped objects).
    pub fn type_name(&self) -> &'a str {
        self.record.type_name().unwrap_or("")
    }
}

/// One unit of a record's structured body.
#[derive(Debug, Clone)]
pub enum Node<'a> {
    /// Free text, possibly containing inline macros.
    Text(Cow<'a, str>),
    /// Sibling nodes rendered at the same depth.
    List(&'a [Value]),
    /// Typed block.
    Block(Block<'a>),
    /// `null` or anything with no renderable content.
    Empty,
}

impl<'a> Node<'a> {
    /// Classify a JSON value.
    ///
    /// Objects without a `type` but with an `entries` field are treated as
    /// `entries` blocks; other untyped objects become [`BlockKind::Unknown`].
    pub fn from_value(value: &'a Value) -> Self {
        match value {
            Value::String(s) => Node::Text(Cow::Borrowed(s.as_str())),
            Value::Number(n) => Node::Text(Cow::Owned(number_text(n))),
            Value::Bool(b) => Node::Text(Cow::Owned(b.to_string())),
            Value::Array(items) => Node::List(items.as_slice()),
            Value::Object(map) => {
                let record = Record::new(map);
                let kind = match record.type_name() {
                    Some(name) => BlockKind::from_type(name),
                    None if record.has("entries") => BlockKind::Entries,
                    None => BlockKind::Unknown,
                };
                Node::Block(Block { kind, record })
            }
            Value::Null => Node::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars_become_text() {
        let value = json!(42);
        assert!(matches!(Node::from_value(&value), Node::Text(t) if t == "42"));
        let value = json!("hello");
        assert!(matches!(Node::from_value(&value), Node::Text(t) if t == "hello"));
    }

    #[test]
    fn test_untyped_object_with_entries() {
        let value = json!({"name": "Lore", "entries": ["text"]});
        match Node::from_value(&value) {
            Node::Block(block) => {
                assert_eq!(block.kind, BlockKind::Entries);
                assert_eq!(block.type_name(), "");
            }
            other => panic!("expected block, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_kind_keeps_type_name() {
        let value = json!({"type": "somethingNew"});
        match Node::from_value(&value) {
            Node::Block(block) => {
                assert_eq!(block.kind, BlockKind::Unknown);
                assert_eq!(block.type_name(), "somethingNew");
            }
            other => panic!("expected block, got {other:?}"),
        }
    }

    #[test]
    fn test_null_is_empty() {
        assert!(matches!(Node::from_value(&Value::Null), Node::Empty));
    }
}
