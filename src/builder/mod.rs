//! Document builders.
//!
//! One generic [`DocumentBuilder`] turns a raw corpus record into a
//! [`RenderedDocument`] and its [`IndexEntry`]. What differs between
//! categories lives in a declarative [`CategorySpec`] table: the subtitle
//! formatter, ordered field rules, body parts and facet extraction.
//!
//! Every document has the same shape:
//!
//! ```text
//! # Name
//!
//! *subtitle*
//!
//! **Source**: CODE, page N
//!
//! **Field** value ...
//!
//! ---
//!
//! entries ...
//! ```
//!
//! Builders are pure. Records outside the source filter and records with
//! no name are skipped, never failed; nothing here logs or touches disk.

mod character;
mod common;
mod creature;
mod item;
mod rules;
mod spec;
mod spell;
mod vehicle;

use std::collections::BTreeSet;

use serde_json::Value;

use crate::category::Category;
use crate::index::IndexEntry;
use crate::ir::Record;
use crate::markdown::{Renderer, join_blocks, slugify};

pub use common::{ability_modifier, format_modifier};
pub use spec::{CategorySpec, FieldFormat, FieldRule, Part, PartRender, spec_for};

/// Allowed source codes; an empty filter allows everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFilter {
    allowed: BTreeSet<String>,
}

impl SourceFilter {
    /// A filter that allows every source.
    pub fn all() -> Self {
        Self::default()
    }

    /// A filter allowing only the given codes (case-insensitive).
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed: codes
                .into_iter()
                .map(|code| code.as_ref().trim().to_ascii_uppercase())
                .filter(|code| !code.is_empty())
                .collect(),
        }
    }

    /// Whether a record with this source passes.
    ///
    /// Records without a source only pass an empty filter.
    pub fn allows(&self, source: Option<&str>) -> bool {
        if self.allowed.is_empty() {
            return true;
        }
        source.is_some_and(|s| self.allowed.contains(&s.trim().to_ascii_uppercase()))
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}

/// A rendered Markdown document and where it should be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub name: String,
    pub source: Option<String>,
    pub page: Option<u32>,
    pub category: Category,
    /// Output path relative to the output root, e.g. `spells/fireball.md`.
    pub path: String,
    pub body: String,
}

/// Why a record produced no document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The record's source is not in the filter.
    SourceFiltered {
        name: String,
        source: Option<String>,
    },
    /// The record is not an object or has no `name`.
    MissingName,
}

/// Result of building one record.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildOutcome {
    Built {
        document: RenderedDocument,
        entry: IndexEntry,
    },
    Skipped(SkipReason),
}

/// Generic builder driven by [`CategorySpec`] tables.
#[derive(Debug, Clone, Default)]
pub struct DocumentBuilder {
    renderer: Renderer,
}

impl DocumentBuilder {
    pub fn new(renderer: Renderer) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Build the document and index entry for one record.
    pub fn build(&self, category: Category, record: &Value, filter: &SourceFilter) -> BuildOutcome {
        let Some(rec) = Record::from_value(record) else {
            return BuildOutcome::Skipped(SkipReason::MissingName);
        };
        let Some(raw_name) = rec.name() else {
            return BuildOutcome::Skipped(SkipReason::MissingName);
        };
        let name = self.renderer.expander().expand_plain(raw_name).trim().to_string();
        if name.is_empty() {
            return BuildOutcome::Skipped(SkipReason::MissingName);
        }

        let source = rec.source().map(|s| s.trim().to_string());
        if !filter.allows(source.as_deref()) {
            return BuildOutcome::Skipped(SkipReason::SourceFiltered { name, source });
        }

        let spec = spec_for(category);
        let page = rec.page();
        let path = document_path(category, &name);

        let mut blocks = vec![format!("# {name}")];
        if let Some(subtitle) = (spec.subtitle)(&self.renderer, rec) {
            blocks.push(format!("*{subtitle}*"));
        }
        if let Some(line) = source_line(source.as_deref(), page) {
            blocks.push(line);
        }
        blocks.extend(spec.parts.iter().map(|part| self.render_part(part, rec)));

        let mut body = join_blocks(blocks);
        body.push('\n');

        let entry = IndexEntry {
            name: name.clone(),
            category,
            source: source.clone(),
            path: path.clone(),
            facets: (spec.facets)(&self.renderer, rec),
        };
        let document = RenderedDocument {
            name,
            source,
            page,
            category,
            path,
            body,
        };
        BuildOutcome::Built { document, entry }
    }

    fn render_part(&self, part: &Part, rec: Record<'_>) -> String {
        let renderer = &self.renderer;
        match part {
            Part::Fields(rules) => join_blocks(rules.iter().filter_map(|rule| {
                let value = (rule.format)(renderer, rec)?;
                let value = value.trim();
                (!value.is_empty()).then(|| format!("**{}** {value}", rule.label))
            })),
            Part::AbilityScores => common::ability_table(rec).unwrap_or_default(),
            Part::Rule => "---".to_string(),
            Part::Entries(key) => rec
                .get(key)
                .map(|entries| renderer.render_value(entries, 0))
                .unwrap_or_default(),
            Part::Section { title, key } => common::titled_section(renderer, rec, title, key),
            Part::ActionGroups => creature::action_groups(renderer, rec),
            Part::Custom(render) => render(renderer, rec),
        }
    }
}

/// `{category dir}/{slug}.md`; names that slug to nothing become `entry`.
pub fn document_path(category: Category, name: &str) -> String {
    let slug = slugify(name);
    let slug = if slug.is_empty() { "entry".to_string() } else { slug };
    format!("{}/{slug}.md", category.dir())
}

fn source_line(source: Option<&str>, page: Option<u32>) -> Option<String> {
    match (source, page) {
        (Some(source), Some(page)) => Some(format!("**Source**: {source}, page {page}")),
        (Some(source), None) => Some(format!("**Source**: {source}")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn built(outcome: BuildOutcome) -> (RenderedDocument, IndexEntry) {
        match outcome {
            BuildOutcome::Built { document, entry } => (document, entry),
            BuildOutcome::Skipped(reason) => panic!("unexpected skip: {reason:?}"),
        }
    }

    #[test]
    fn test_source_filter() {
        let filter = SourceFilter::new(["phb", " MM "]);
        assert!(filter.allows(Some("PHB")));
        assert!(filter.allows(Some("mm")));
        assert!(!filter.allows(Some("XGE")));
        assert!(!filter.allows(None));
        assert!(SourceFilter::all().allows(None));
    }

    #[test]
    fn test_header_shape() {
        let builder = DocumentBuilder::default();
        let record = json!({"name": "Blinded", "source": "PHB", "page": 290, "entries": ["You can't see."]});
        let (doc, entry) = built(builder.build(Category::Condition, &record, &SourceFilter::all()));
        assert_eq!(
            doc.body,
            "# Blinded\n\n*Condition*\n\n**Source**: PHB, page 290\n\n---\n\nYou can't see.\n"
        );
        assert_eq!(doc.path, "conditions/blinded.md");
        assert_eq!(entry.path, doc.path);
        assert_eq!(entry.source.as_deref(), Some("PHB"));
    }

    #[test]
    fn test_filtered_and_nameless_records_skip() {
        let builder = DocumentBuilder::default();
        let filter = SourceFilter::new(["PHB"]);
        let outcome = builder.build(Category::Spell, &json!({"name": "Hex", "source": "XGE"}), &filter);
        assert_eq!(
            outcome,
            BuildOutcome::Skipped(SkipReason::SourceFiltered {
                name: "Hex".to_string(),
                source: Some("XGE".to_string()),
            })
        );
        let outcome = builder.build(Category::Spell, &json!({"source": "PHB"}), &filter);
        assert_eq!(outcome, BuildOutcome::Skipped(SkipReason::MissingName));
        let outcome = builder.build(Category::Spell, &json!("not a record"), &filter);
        assert_eq!(outcome, BuildOutcome::Skipped(SkipReason::MissingName));
    }

    #[test]
    fn test_document_path() {
        assert_eq!(document_path(Category::Spell, "Acid Splash!"), "spells/acid-splash.md");
        assert_eq!(document_path(Category::Creature, "!!!"), "bestiary/entry.md");
    }

    #[test]
    fn test_every_category_builds_minimal_record() {
        let builder = DocumentBuilder::default();
        let record = json!({"name": "Thing", "source": "X"});
        for category in Category::ALL {
            let (doc, _) = built(builder.build(category, &record, &SourceFilter::all()));
            assert!(doc.body.starts_with("# Thing\n"), "{category}: {}", doc.body);
            assert!(doc.path.starts_with(category.dir()));
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        let builder = DocumentBuilder::default();
        let record = json!({"name": "Fireball", "source": "PHB", "level": 3, "school": "V",
            "entries": ["A bright streak {@damage 8d6}."]});
        let first = builder.build(Category::Spell, &record, &SourceFilter::all());
        let second = builder.build(Category::Spell, &record, &SourceFilter::all());
        assert_eq!(first, second);
    }
}
