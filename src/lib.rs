//! # grimoire
//!
//! Render tabletop RPG reference data into Markdown documents and search indexes.
//!
//! ## Features
//!
//! - Expand inline `{@name arg0|arg1|...}` macros into Markdown
//! - Render nested entry trees (sections, lists, tables, insets, statblock
//!   references) with capped heading depth
//! - Build one document per spell, creature, item, class, rule and more,
//!   from declarative per-category layout tables
//! - Collect a global index, quick references, cross references and a
//!   keyword index over everything built
//!
//! ## Quick Start
//!
//! ```
//! use grimoire::{Category, ConvertConfig, Converter};
//! use grimoire::export::{MarkdownExporter, MemorySink};
//! use serde_json::json;
//!
//! let corpus = json!({
//!     "spell": [{
//!         "name": "Fireball",
//!         "source": "PHB",
//!         "level": 3,
//!         "school": "V",
//!         "entries": ["Each creature takes {@damage 8d6} fire damage."]
//!     }]
//! });
//!
//! let mut converter = Converter::new(ConvertConfig::default());
//! let documents = converter.convert_corpus(&corpus)?;
//! let (collector, stats) = converter.finish();
//! assert_eq!(stats.built, 1);
//!
//! let mut sink = MemorySink::new();
//! MarkdownExporter::new().export(&documents, &collector, &mut sink)?;
//! let body = sink.text("spells/fireball.md").unwrap();
//! assert!(body.contains("*3rd-level Evocation*"));
//! assert!(body.contains("takes `8d6` fire damage."));
//! # Ok::<(), grimoire::Error>(())
//! ```
//!
//! ## Rendering Without I/O
//!
//! The core is pure: macro expansion, node rendering and document building
//! never touch the filesystem and never fail on malformed data.
//!
//! ```
//! use grimoire::{Category, DocumentBuilder, BuildOutcome, SourceFilter};
//! use serde_json::json;
//!
//! let record = json!({
//!     "name": "Griffon",
//!     "ac": [{"ac": 12}],
//!     "hp": {"average": 59, "formula": "7d10 + 21"},
//!     "speed": {"walk": 30, "fly": 80}
//! });
//! let outcome = DocumentBuilder::default().build(Category::Creature, &record, &SourceFilter::all());
//! let BuildOutcome::Built { document, .. } = outcome else { unreachable!() };
//! assert!(document.body.contains("**Speed** 30 ft., fly 80 ft."));
//! ```

pub mod builder;
pub mod category;
pub mod config;
pub mod convert;
pub mod error;
pub mod export;
pub mod index;
pub mod ir;
pub mod macros;
pub mod markdown;
pub mod util;

pub use builder::{BuildOutcome, DocumentBuilder, RenderedDocument, SkipReason, SourceFilter};
pub use category::Category;
pub use config::{CollisionPolicy, ConvertConfig};
pub use convert::{ConversionStats, Converter};
pub use error::{Error, Result};
pub use index::{IndexCollector, IndexEntry};
pub use macros::Expander;
pub use markdown::Renderer;
