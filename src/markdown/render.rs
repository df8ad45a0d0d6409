//! Core node → Markdown rendering.
//!
//! This module provides pure rendering logic that transforms record bodies
//! into Markdown strings. No I/O is performed here; the export layer
//! handles writing to files.

use serde_json::Value;

use crate::category::Category;
use crate::ir::{Block, BlockKind, Node, Record};
use crate::macros::{Expander, ability_name, markdown_link};
use crate::util::signed;

use super::escape::{calculate_fence_length, inline_code};
use super::slugify::slugify;
use super::{spellcasting, table};

/// Deepest Markdown heading level.
pub const MAX_HEADING_LEVEL: usize = 6;

/// Heading level of a top-level section when the document title is H1.
pub const DEFAULT_BASE_HEADING_LEVEL: u8 = 2;

/// How an inline name is emphasised in front of its paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameStyle {
    /// `***Name.*** body` (statblock actions, variant sub-entries).
    BoldItalic,
    /// `**Name.** body`.
    Bold,
    /// `*Name.* body`.
    Italic,
    /// `Name body`.
    Plain,
}

/// Depth-aware renderer over corpus nodes.
///
/// Rendering is pure: the same node, depth and expander options always
/// produce byte-identical output. Every handler is total; malformed or
/// missing fields degrade to an empty string.
#[derive(Debug, Clone)]
pub struct Renderer {
    expander: Expander,
    base_heading_level: usize,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(Expander::new())
    }
}

impl Renderer {
    /// Create a renderer around a macro expander.
    pub fn new(expander: Expander) -> Self {
        Self {
            expander,
            base_heading_level: DEFAULT_BASE_HEADING_LEVEL as usize,
        }
    }

    /// Set the heading level used for depth-0 sections (clamped to 1..=6).
    pub fn with_base_heading_level(mut self, level: u8) -> Self {
        self.base_heading_level = (level as usize).clamp(1, MAX_HEADING_LEVEL);
        self
    }

    /// The macro expander used for text leaves.
    pub fn expander(&self) -> &Expander {
        &self.expander
    }

    /// Heading level of depth-0 sections.
    pub fn base_heading_level(&self) -> usize {
        self.base_heading_level
    }

    /// Expand macros in a text leaf and trim surrounding whitespace.
    pub fn expand(&self, text: &str) -> String {
        self.expander.expand(text).trim().to_string()
    }

    /// Heading level for a node at `depth`, saturating at H6.
    pub fn heading_level(&self, depth: usize, extra: usize) -> usize {
        self.base_heading_level
            .saturating_add(depth)
            .saturating_add(extra)
            .min(MAX_HEADING_LEVEL)
    }

    /// A Markdown heading line.
    pub fn heading(&self, title: &str, depth: usize, extra: usize) -> String {
        let level = self.heading_level(depth, extra);
        format!("{} {}", "#".repeat(level), self.expand(title))
    }

    /// Render a JSON value as a node.
    pub fn render_value(&self, value: &Value, depth: usize) -> String {
        self.render(&Node::from_value(value), depth)
    }

    /// Render a node at `depth`.
    pub fn render(&self, node: &Node<'_>, depth: usize) -> String {
        match node {
            Node::Text(text) => self.expand(text),
            Node::List(items) => {
                join_blocks(items.iter().map(|item| self.render_value(item, depth)))
            }
            Node::Block(block) => self.render_block(block, depth),
            Node::Empty => String::new(),
        }
    }

    /// Render the children (`entries`/`items`/`entry`) of a record.
    pub fn render_children(&self, record: Record<'_>, depth: usize) -> String {
        record
            .children()
            .map(|children| self.render_value(children, depth))
            .unwrap_or_default()
    }

    fn render_block(&self, block: &Block<'_>, depth: usize) -> String {
        let rec = block.record;
        match block.kind {
            BlockKind::Section | BlockKind::Entry => self.render_titled(rec, depth, 0),
            BlockKind::Entries | BlockKind::VariantInner => self.render_titled(rec, depth, 1),
            BlockKind::Options | BlockKind::Homebrew => self.render_children(rec, depth),
            BlockKind::Wrapper => rec
                .get("wrapped")
                .map(|wrapped| self.render_value(wrapped, depth))
                .unwrap_or_default(),
            BlockKind::List => self.render_list(rec, depth),
            BlockKind::Table => self.render_table(rec, depth),
            BlockKind::TableGroup => {
                let tables = rec
                    .array("tables")
                    .iter()
                    .filter_map(Record::from_value)
                    .map(|table| self.render_table(table, depth));
                match rec.name() {
                    Some(name) => join_blocks(
                        std::iter::once(format!("**{}**", self.expand(name))).chain(tables),
                    ),
                    None => join_blocks(tables),
                }
            }
            BlockKind::Row => rec
                .array("row")
                .iter()
                .map(|cell| table::render_cell(self, cell, depth))
                .collect::<Vec<_>>()
                .join(" | "),
            BlockKind::Cell => table::render_cell_record(self, rec, depth),
            BlockKind::Inset => {
                let title = rec.name().map(|name| self.expand(name));
                self.render_inset(rec, depth, title.as_deref())
            }
            BlockKind::Variant => {
                let title = rec
                    .name()
                    .map(|name| format!("Variant: {}", self.expand(name)));
                self.render_inset(rec, depth, title.as_deref())
            }
            BlockKind::InsetReadaloud => self.render_readaloud(rec, depth),
            BlockKind::Quote => self.render_quote(rec, depth),
            BlockKind::VariantSub => self.render_named_entry(rec, depth, NameStyle::BoldItalic),
            BlockKind::Item => self.render_named_entry(rec, depth, NameStyle::Bold),
            BlockKind::ItemSub => self.render_named_entry(rec, depth, NameStyle::Italic),
            BlockKind::ItemSpell => self.render_named_entry(rec, depth, NameStyle::Plain),
            BlockKind::Inline | BlockKind::InlineBlock => self.render_inline(rec, depth),
            BlockKind::Image => self.render_image(rec),
            BlockKind::Gallery => join_blocks(
                rec.array("images")
                    .iter()
                    .filter_map(Record::from_value)
                    .map(|image| self.render_image(image)),
            ),
            BlockKind::Link => self.render_link(rec),
            BlockKind::AbilityDc => {
                let name = rec.name().map(|n| self.expand(n));
                format!(
                    "**{} save DC** = 8 + your proficiency bonus + your {} modifier",
                    name.as_deref().unwrap_or("Spell"),
                    ability_list(rec)
                )
            }
            BlockKind::AbilityAttackMod => {
                let name = rec.name().map(|n| self.expand(n));
                format!(
                    "**{} attack modifier** = your proficiency bonus + your {} modifier",
                    name.as_deref().unwrap_or("Spell"),
                    ability_list(rec)
                )
            }
            BlockKind::AbilityGeneric => self.render_ability_generic(rec),
            BlockKind::Statblock | BlockKind::StatblockInline => self.render_statblock_ref(rec),
            BlockKind::Hr => "---".to_string(),
            BlockKind::Bonus => rec.i64("value").map(signed).unwrap_or_default(),
            BlockKind::BonusSpeed => rec
                .i64("value")
                .map(|v| format!("{} ft.", signed(v)))
                .unwrap_or_default(),
            BlockKind::Dice => render_dice(rec),
            BlockKind::Code => render_code(rec),
            BlockKind::Flowchart => join_blocks(
                rec.array("blocks")
                    .iter()
                    .map(|block| self.render_value(block, depth + 1)),
            ),
            BlockKind::FlowBlock => {
                let title = rec.name().map(|name| self.expand(name));
                self.render_inset(rec, depth, title.as_deref())
            }
            BlockKind::Spellcasting => self.render_spellcasting(rec, depth),
            BlockKind::RefClassFeature => self.render_see_also(rec, "classFeature"),
            BlockKind::RefSubclassFeature => self.render_see_also(rec, "subclassFeature"),
            BlockKind::RefOptionalFeature => self.render_see_also(rec, "optionalfeature"),
            BlockKind::Unknown => {
                if rec.children().is_some() {
                    self.render_titled(rec, depth, 1)
                } else {
                    String::new()
                }
            }
        }
    }

    /// Optional heading from `name`, then children one level deeper.
    fn render_titled(&self, rec: Record<'_>, depth: usize, extra: usize) -> String {
        let body = self.render_children(rec, depth + 1);
        match rec.name() {
            Some(name) => join_blocks([self.heading(name, depth, extra), body]),
            None => body,
        }
    }

    /// Bulleted list. Named items render as `- **Name**: body`.
    fn render_list(&self, rec: Record<'_>, depth: usize) -> String {
        let items: Vec<String> = rec
            .array("items")
            .iter()
            .filter_map(|item| self.render_list_item(item, depth + 1))
            .collect();
        items.join("\n")
    }

    fn render_list_item(&self, item: &Value, depth: usize) -> Option<String> {
        match Node::from_value(item) {
            Node::Block(block) if block.kind == BlockKind::List => {
                let nested = self.render_list(block.record, depth);
                (!nested.is_empty()).then(|| indent(&nested, "  "))
            }
            Node::Block(block)
                if matches!(
                    block.kind,
                    BlockKind::Item
                        | BlockKind::ItemSub
                        | BlockKind::ItemSpell
                        | BlockKind::Entries
                        | BlockKind::Entry
                        | BlockKind::Section
                ) && block.record.name().is_some() =>
            {
                let name = block.record.name().unwrap_or_default();
                let name = self.expand(name);
                let name = name.trim_end_matches(['.', ':']);
                let body = self.render_children(block.record, depth);
                if body.is_empty() {
                    bullet(&format!("**{name}**"))
                } else {
                    bullet(&format!("**{name}**: {body}"))
                }
            }
            node => bullet(&self.render(&node, depth)),
        }
    }

    /// Sidebar as a blockquote with an optional bold title.
    fn render_inset(&self, rec: Record<'_>, depth: usize, title: Option<&str>) -> String {
        let title = title.map(|t| format!("**{t}**"));
        let body = self.render_children(rec, depth + 1);
        quote_lines(&join_blocks(title.into_iter().chain([body])))
    }

    /// Read-aloud text: blockquote with every line italicised.
    fn render_readaloud(&self, rec: Record<'_>, depth: usize) -> String {
        let body = self.render_children(rec, depth + 1);
        let italic = body
            .lines()
            .map(italicize_line)
            .collect::<Vec<_>>()
            .join("\n");
        let title = rec.name().map(|name| format!("**{}**", self.expand(name)));
        quote_lines(&join_blocks(title.into_iter().chain([italic])))
    }

    fn render_quote(&self, rec: Record<'_>, depth: usize) -> String {
        let body = self.render_children(rec, depth + 1);
        let attribution = rec.str("by").map(|by| {
            let by = self.expand(by);
            match rec.str("from") {
                Some(from) => format!("— {by}, *{}*", self.expand(from)),
                None => format!("— {by}"),
            }
        });
        quote_lines(&join_blocks([body].into_iter().chain(attribution)))
    }

    /// Inline-named paragraph: the name leads the first paragraph of the body.
    pub fn render_named_entry(&self, rec: Record<'_>, depth: usize, style: NameStyle) -> String {
        let body = self.render_children(rec, depth + 1);
        match rec.name() {
            Some(name) => named_paragraph(&self.expand(name), &body, style),
            None => body,
        }
    }

    fn render_inline(&self, rec: Record<'_>, depth: usize) -> String {
        let parts = rec.array("entries").iter().map(|entry| match entry {
            // Inline text keeps its own spacing
            Value::String(text) => self.expander.expand(text),
            other => self.render_value(other, depth),
        });
        parts.collect::<String>().trim().to_string()
    }

    /// Images never embed data; they degrade to a text placeholder.
    fn render_image(&self, rec: Record<'_>) -> String {
        let label = rec
            .str("title")
            .or_else(|| rec.str("altText"))
            .map(|t| self.expand(t))
            .or_else(|| {
                let href = rec.object("href")?;
                let target = href.str("path").or_else(|| href.str("url"))?;
                target.rsplit('/').next().map(str::to_string)
            });
        let placeholder = match label {
            Some(label) if !label.is_empty() => format!("*[Image: {label}]*"),
            _ => "*[Image]*".to_string(),
        };
        match rec.str("credit") {
            Some(credit) => format!("{placeholder}\n\n*Credit: {}*", self.expand(credit)),
            None => placeholder,
        }
    }

    fn render_link(&self, rec: Record<'_>) -> String {
        let text = rec.str("text").map(|t| self.expand(t)).unwrap_or_default();
        let target = rec.object("href").and_then(|href| match href.str("type") {
            Some("internal") => {
                let path = href.str("path")?;
                Some(match href.str("hash") {
                    Some(hash) => format!("{path}#{hash}"),
                    None => path.to_string(),
                })
            }
            _ => href.str("url").map(str::to_string),
        });
        match target {
            Some(target) if !text.is_empty() => markdown_link(&text, &target),
            Some(target) => markdown_link(&target, &target),
            None => text,
        }
    }

    fn render_ability_generic(&self, rec: Record<'_>) -> String {
        let text = rec.str("text").map(|t| self.expand(t)).unwrap_or_default();
        let attributes = rec.strings("attributes");
        let formula = if attributes.is_empty() {
            text
        } else {
            let names: Vec<&str> = attributes.into_iter().map(ability_name).collect();
            format!("{text} your {} modifier", names.join(" or "))
                .trim()
                .to_string()
        };
        match rec.name() {
            Some(name) => format!("**{}** = {formula}", self.expand(name)),
            None => formula,
        }
    }

    /// Statblocks are referenced by name, never inlined.
    fn render_statblock_ref(&self, rec: Record<'_>) -> String {
        let data = rec.object("data");
        let Some(name) = rec
            .str("displayName")
            .or_else(|| rec.name())
            .or_else(|| data.and_then(|d| d.name()))
        else {
            return String::new();
        };
        let tag = rec
            .str("tag")
            .or_else(|| rec.str("dataType"))
            .or_else(|| rec.str("prop"))
            .unwrap_or("creature");
        let name = self.expander.expand_plain(name);

        let reference = match Category::from_reference_tag(tag) {
            Some(category) if self.expander.options().link_references => {
                format!("[{name}](../{}/{}.md)", category.dir(), slugify(&name))
            }
            _ => format!("**{name}**"),
        };
        format!("*See the {reference} statblock.*")
    }

    fn render_see_also(&self, rec: Record<'_>, key: &str) -> String {
        let name = rec
            .str(key)
            .and_then(|uid| uid.split('|').next())
            .map(str::trim)
            .filter(|n| !n.is_empty());
        match name {
            Some(name) => format!("*See: {}*", self.expand(name)),
            None => String::new(),
        }
    }

    /// Render a table record (caption, header, rows, footnotes).
    pub fn render_table(&self, rec: Record<'_>, depth: usize) -> String {
        table::render_table(self, rec, depth)
    }

    /// Render a spellcasting block (header, at-will/daily/slot lists, footer).
    pub fn render_spellcasting(&self, rec: Record<'_>, depth: usize) -> String {
        spellcasting::render_spellcasting(self, rec, depth)
    }
}

/// Join rendered blocks with blank lines, skipping empty ones.
pub fn join_blocks<I, S>(blocks: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    blocks
        .into_iter()
        .filter_map(|block| {
            let block = block.as_ref().trim_end();
            (!block.trim().is_empty()).then(|| block.to_string())
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// `***Name.*** body` with the name leading the first paragraph.
pub fn named_paragraph(name: &str, body: &str, style: NameStyle) -> String {
    let name = name.trim();
    let label = if name.ends_with(['.', '!', '?', ':']) {
        name.to_string()
    } else {
        format!("{name}.")
    };
    let label = match style {
        NameStyle::BoldItalic => format!("***{label}***"),
        NameStyle::Bold => format!("**{label}**"),
        NameStyle::Italic => format!("*{label}*"),
        NameStyle::Plain => name.to_string(),
    };
    if body.is_empty() {
        label
    } else {
        format!("{label} {body}")
    }
}

/// Prefix every line with a blockquote marker.
pub fn quote_lines(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    text.lines()
        .map(|line| {
            if line.is_empty() {
                ">".to_string()
            } else {
                format!("> {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Indent every non-empty line.
fn indent(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// A list bullet; continuation lines are indented under the marker.
fn bullet(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        return None;
    }
    let mut lines = text.lines();
    let first = lines.next().unwrap_or_default();
    let mut out = format!("- {first}");
    for line in lines {
        out.push('\n');
        if !line.is_empty() {
            out.push_str("  ");
            out.push_str(line);
        }
    }
    Some(out)
}

/// Italicise a line's content, keeping any leading block markers outside.
fn italicize_line(line: &str) -> String {
    let content = line.trim_start_matches(['#', '>', '-', ' ']);
    if content.trim().is_empty() {
        return line.to_string();
    }
    let prefix = &line[..line.len() - content.len()];
    format!("{prefix}*{}*", content.trim_end())
}

/// Ability names joined with `/`.
fn ability_list(rec: Record<'_>) -> String {
    let names: Vec<&str> = rec
        .strings("attributes")
        .into_iter()
        .map(ability_name)
        .collect();
    if names.is_empty() {
        "spellcasting ability".to_string()
    } else {
        names.join("/")
    }
}

/// `{count, faces}` pairs joined into backtick-quoted dice notation.
fn render_dice(rec: Record<'_>) -> String {
    let terms: Vec<String> = match rec.get("toRoll") {
        Some(Value::String(expr)) => vec![expr.trim().to_string()],
        Some(Value::Array(terms)) => terms
            .iter()
            .filter_map(Record::from_value)
            .filter_map(|term| {
                let count = term.i64("number").or_else(|| term.i64("count")).unwrap_or(1);
                let faces = term.i64("faces")?;
                Some(match term.i64("modifier") {
                    Some(m) if m != 0 => format!("{count}d{faces}{}", signed(m)),
                    _ => format!("{count}d{faces}"),
                })
            })
            .collect(),
        _ => Vec::new(),
    };
    inline_code(&terms.join(" + "))
}

fn render_code(rec: Record<'_>) -> String {
    let Some(text) = rec.get("preformatted").and_then(Value::as_str) else {
        return String::new();
    };
    let fence = "`".repeat(calculate_fence_length(text, '`'));
    format!("{fence}\n{}\n{fence}", text.trim_end_matches('\n'))
}
