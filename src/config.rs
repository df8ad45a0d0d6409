//! Conversion settings loaded from TOML.
//!
//! ```toml
//! sources = ["PHB", "MM"]
//! collision = "suffix-source"
//!
//! [render]
//! base_heading_level = 2
//! link_references = true
//!
//! [output]
//! write_category_pages = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::builder::SourceFilter;
use crate::error::Result;
use crate::macros::{ExpandOptions, Expander};
use crate::markdown::{DEFAULT_BASE_HEADING_LEVEL, Renderer};

/// Top-level conversion configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    pub render: RenderConfig,
    /// Allowed source codes. Empty allows every source.
    pub sources: Vec<String>,
    /// What to do when two documents slug to the same path.
    pub collision: CollisionPolicy,
    pub output: OutputConfig,
}

/// Rendering options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Heading level of depth-0 sections (the document title is always H1).
    pub base_heading_level: u8,
    /// Turn reference macros into relative links between documents.
    pub link_references: bool,
}

/// Output layout options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Write a Markdown listing page per category (`spells/index.md`).
    pub write_category_pages: bool,
}

/// Slug collision handling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// Append the lowercased source code, then a counter if still taken.
    #[default]
    SuffixSource,
    /// Reuse the path; the later document replaces the earlier one.
    Overwrite,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            sources: Vec::new(),
            collision: CollisionPolicy::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            base_heading_level: DEFAULT_BASE_HEADING_LEVEL,
            link_references: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            write_category_pages: true,
        }
    }
}

impl ConvertConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        log::debug!(
            "Config: {} source filter(s), collision policy {:?}",
            config.sources.len(),
            config.collision
        );
        Ok(config)
    }

    /// The renderer these settings describe.
    pub fn renderer(&self) -> Renderer {
        let expander = Expander::with_options(ExpandOptions {
            link_references: self.render.link_references,
        });
        Renderer::new(expander).with_base_heading_level(self.render.base_heading_level)
    }

    /// The source filter these settings describe.
    pub fn source_filter(&self) -> SourceFilter {
        SourceFilter::new(&self.sources)
    }
}
