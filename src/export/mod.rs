//! Writing converted documents and indexes.
//!
//! The exporter follows a builder pattern:
//! - `new()` creates an exporter with default configuration
//! - `with_config()` allows customization
//! - `export()` writes to any [`OutputSink`] destination
//!
//! Layout of an export:
//!
//! ```text
//! index.md                  category overview
//! index.json                global index
//! quick-reference.json      per-category summaries
//! cross-references.json     facet groupings
//! keywords.json             keyword → category → entries
//! spells/index.md           category listing (optional)
//! spells/fireball.md        one file per document
//! ```
//!
//! # Example
//!
//! ```
//! use grimoire::export::{MarkdownExporter, MemorySink};
//! use grimoire::{Category, ConvertConfig, Converter};
//! use serde_json::json;
//!
//! let mut converter = Converter::new(ConvertConfig::default());
//! let docs = converter.convert_value(Category::Spell, &[json!({"name": "Light"})]);
//! let (collector, _) = converter.finish();
//!
//! let mut sink = MemorySink::new();
//! MarkdownExporter::new().export(&docs, &collector, &mut sink)?;
//! assert!(sink.text("spells/light.md").unwrap().starts_with("# Light"));
//! # Ok::<(), grimoire::Error>(())
//! ```

mod pages;
mod sink;

use serde::Serialize;

use crate::builder::RenderedDocument;
use crate::convert::RESERVED_STEM;
use crate::error::Result;
use crate::index::IndexCollector;

pub use pages::{category_page, overview_page};
pub use sink::{DirectorySink, MemorySink, OutputSink};

/// Names of the JSON index files at the output root.
pub const GLOBAL_INDEX_FILE: &str = "index.json";
pub const QUICK_REFERENCE_FILE: &str = "quick-reference.json";
pub const CROSS_REFERENCE_FILE: &str = "cross-references.json";
pub const KEYWORD_INDEX_FILE: &str = "keywords.json";

/// Configuration for Markdown export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Write `{category}/index.md` listings and the root `index.md`.
    pub category_pages: bool,
    /// Pretty-print the JSON indexes.
    pub pretty_json: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            category_pages: true,
            pretty_json: true,
        }
    }
}

/// What an export wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub documents: usize,
    pub index_files: usize,
    pub pages: usize,
}

/// Exporter for the Markdown document tree and its indexes.
#[derive(Debug, Clone, Default)]
pub struct MarkdownExporter {
    config: ExportConfig,
}

impl MarkdownExporter {
    /// Create a new MarkdownExporter with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a MarkdownExporter with the specified configuration.
    pub fn with_config(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Write documents, JSON indexes and (optionally) listing pages.
    pub fn export<S: OutputSink>(
        &self,
        documents: &[RenderedDocument],
        collector: &IndexCollector,
        sink: &mut S,
    ) -> Result<ExportReport> {
        let mut report = ExportReport::default();

        for document in documents {
            sink.write_file(&document.path, document.body.as_bytes())?;
            report.documents += 1;
        }

        self.write_json(sink, GLOBAL_INDEX_FILE, &collector.build_global_index())?;
        self.write_json(sink, QUICK_REFERENCE_FILE, &collector.build_quick_references())?;
        self.write_json(sink, CROSS_REFERENCE_FILE, &collector.build_cross_references())?;
        self.write_json(sink, KEYWORD_INDEX_FILE, &collector.build_keyword_index())?;
        report.index_files = 4;

        if self.config.category_pages {
            let quick = collector.build_quick_references();
            for (category, refs) in quick.iter() {
                let path = format!("{}/{RESERVED_STEM}.md", category.dir());
                sink.write_file(&path, category_page(category, refs).as_bytes())?;
                report.pages += 1;
            }
            sink.write_file(&format!("{RESERVED_STEM}.md"), overview_page(&quick).as_bytes())?;
            report.pages += 1;
        }

        log::info!(
            "Exported {} document(s), {} index file(s), {} page(s)",
            report.documents,
            report.index_files,
            report.pages
        );
        Ok(report)
    }

    fn write_json<S: OutputSink, T: Serialize>(&self, sink: &mut S, path: &str, value: &T) -> Result<()> {
        let mut json = if self.config.pretty_json {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        json.push('\n');
        sink.write_file(path, json.as_bytes())?;
        Ok(())
    }
}
