//! Conversion driver.
//!
//! [`Converter`] is the single writer that threads records through the
//! pure builders: it applies the source filter, resolves slug collisions
//! under the configured [`CollisionPolicy`], accumulates index entries in an
//! [`IndexCollector`] and keeps [`ConversionStats`]. It never writes to
//! disk; see [`crate::export`] for that.
//!
//! # Example
//!
//! ```
//! use grimoire::{Category, ConvertConfig, Converter};
//! use serde_json::json;
//!
//! let mut converter = Converter::new(ConvertConfig::default());
//! let docs = converter.convert_value(Category::Spell, &[json!({"name": "Light", "level": 0, "school": "V"})]);
//! assert_eq!(docs[0].path, "spells/light.md");
//! assert_eq!(converter.stats().built, 1);
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use crate::builder::{BuildOutcome, DocumentBuilder, RenderedDocument, SkipReason, SourceFilter};
use crate::category::Category;
use crate::config::{CollisionPolicy, ConvertConfig};
use crate::error::{Error, Result};
use crate::index::IndexCollector;
use crate::markdown::slugify;
use crate::util::decode_text;

/// Counters for one conversion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionStats {
    /// Documents produced.
    pub built: usize,
    /// Records skipped by the source filter.
    pub filtered: usize,
    /// Records skipped for having no name.
    pub rejected: usize,
    /// Documents whose path collided with an earlier one.
    pub collisions: usize,
}

/// File stem of the per-directory listing pages written by the exporter.
pub const RESERVED_STEM: &str = "index";

/// Output paths already claimed in this run, with the document that owns each.
///
/// `{dir}/index.md` belongs to the category listing page and is never
/// handed to a document.
#[derive(Debug, Default)]
pub struct PathRegistry {
    claimed: HashMap<String, String>,
}

impl PathRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a path has been claimed or is reserved.
    pub fn contains(&self, path: &str) -> bool {
        Self::is_reserved(path) || self.claimed.contains_key(path)
    }

    fn is_reserved(path: &str) -> bool {
        let file = path.rsplit('/').next().unwrap_or(path);
        file.strip_suffix(".md") == Some(RESERVED_STEM)
    }

    /// Claim a document's path, returning the final path and whether the
    /// preferred one was already taken.
    pub fn claim(&mut self, document: &RenderedDocument, policy: CollisionPolicy) -> (String, bool) {
        let preferred = document.path.clone();
        if !self.contains(&preferred) {
            self.claimed.insert(preferred.clone(), document.name.clone());
            return (preferred, false);
        }
        let path = match policy {
            CollisionPolicy::Overwrite if !Self::is_reserved(&preferred) => preferred,
            _ => self.suffixed(&preferred, document.source.as_deref()),
        };
        self.claimed.insert(path.clone(), document.name.clone());
        (path, true)
    }

    fn suffixed(&self, preferred: &str, source: Option<&str>) -> String {
        let stem = preferred.strip_suffix(".md").unwrap_or(preferred);
        let source_slug = source.map(slugify).filter(|s| !s.is_empty());
        if let Some(source) = &source_slug {
            let candidate = format!("{stem}-{source}.md");
            if !self.contains(&candidate) {
                return candidate;
            }
        }
        let base = match &source_slug {
            Some(source) => format!("{stem}-{source}"),
            None => stem.to_string(),
        };
        (2..)
            .map(|n| format!("{base}-{n}.md"))
            .find(|candidate| !self.contains(candidate))
            .unwrap_or(base)
    }

    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}

/// Single-writer conversion state for one run.
#[derive(Debug)]
pub struct Converter {
    config: ConvertConfig,
    builder: DocumentBuilder,
    filter: SourceFilter,
    paths: PathRegistry,
    collector: IndexCollector,
    stats: ConversionStats,
}

impl Converter {
    pub fn new(config: ConvertConfig) -> Self {
        let builder = DocumentBuilder::new(config.renderer());
        let filter = config.source_filter();
        Self {
            config,
            builder,
            filter,
            paths: PathRegistry::new(),
            collector: IndexCollector::new(),
            stats: ConversionStats::default(),
        }
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    pub fn stats(&self) -> ConversionStats {
        self.stats
    }

    pub fn collector(&self) -> &IndexCollector {
        &self.collector
    }

    /// Build every record of one category.
    ///
    /// Returned documents carry their final, collision-resolved paths; the
    /// matching index entries point at the same paths.
    pub fn convert_value(&mut self, category: Category, records: &[Value]) -> Vec<RenderedDocument> {
        let mut documents = Vec::with_capacity(records.len());
        let mut entries = Vec::with_capacity(records.len());
        for record in records {
            match self.builder.build(category, record, &self.filter) {
                BuildOutcome::Built {
                    mut document,
                    mut entry,
                } => {
                    let (path, collided) = self.paths.claim(&document, self.config.collision);
                    if collided {
                        self.stats.collisions += 1;
                        log::warn!(
                            "{category} '{}' ({}) collides at {}; writing {path}",
                            document.name,
                            document.source.as_deref().unwrap_or("no source"),
                            document.path
                        );
                    }
                    document.path = path.clone();
                    entry.path = path;
                    self.stats.built += 1;
                    documents.push(document);
                    entries.push(entry);
                }
                BuildOutcome::Skipped(SkipReason::SourceFiltered { name, source }) => {
                    self.stats.filtered += 1;
                    log::debug!(
                        "Skipping {category} '{name}' from source {}",
                        source.as_deref().unwrap_or("(none)")
                    );
                }
                BuildOutcome::Skipped(SkipReason::MissingName) => {
                    self.stats.rejected += 1;
                    log::warn!("Skipping {category} record without a name");
                }
            }
        }
        self.collector.add(category, entries);
        documents
    }

    /// Convert every recognised top-level key of a corpus file.
    ///
    /// Keys that name no category (`_meta`, ...) are ignored.
    pub fn convert_corpus(&mut self, corpus: &Value) -> Result<Vec<RenderedDocument>> {
        let map = corpus.as_object().ok_or_else(|| {
            Error::InvalidInput("corpus file must be a JSON object".to_string())
        })?;
        let mut documents = Vec::new();
        for (key, value) in map {
            let Some(category) = Category::from_corpus_key(key) else {
                log::debug!("Ignoring corpus key '{key}'");
                continue;
            };
            let Some(records) = value.as_array() else {
                log::warn!("Corpus key '{key}' is not an array");
                continue;
            };
            log::debug!("Converting {} {category} record(s)", records.len());
            documents.extend(self.convert_value(category, records));
        }
        Ok(documents)
    }

    /// Read, decode and convert one corpus file.
    pub fn convert_file(&mut self, path: impl AsRef<Path>) -> Result<Vec<RenderedDocument>> {
        let path = path.as_ref();
        log::debug!("Reading {}", path.display());
        let bytes = std::fs::read(path)?;
        let text = decode_text(&bytes, None);
        let corpus: Value = serde_json::from_str(&text)?;
        let documents = self.convert_corpus(&corpus)?;
        log::info!("{}: {} document(s)", path.display(), documents.len());
        Ok(documents)
    }

    /// End the run, returning the collected index and final counters.
    pub fn finish(self) -> (IndexCollector, ConversionStats) {
        log::info!(
            "Built {} document(s); {} filtered, {} rejected, {} path collision(s)",
            self.stats.built,
            self.stats.filtered,
            self.stats.rejected,
            self.stats.collisions
        );
        (self.collector, self.stats)
    }
}
