//! Pure markdown generation from corpus nodes.
//!
//! This module renders record bodies to Markdown. The design separates pure
//! rendering logic from I/O:
//!
//! - [`escape`]: Pure string transformation utilities for table cells and code spans
//! - [`slugify`]: Slug and lookup-key normalization
//! - [`render`]: Core node → Markdown rendering
//!
//! The export layer ([`crate::export`]) handles I/O orchestration, writing
//! what these pure functions produce.
//!
//! ## Design Notes
//!
//! - **Heading depth**: a named `section`/`entry` renders at
//!   `base + depth`, `entries` one level deeper, saturating at H6
//! - **Tables**: every cell is macro-expanded and pipe-escaped, so literal
//!   `|` characters never change the column count
//! - **Dynamic code fence length**: code blocks use the minimum fence length
//!   that doesn't conflict with content
//! - **Statblocks**: embedded creatures render as a short named reference,
//!   never as a second copy of the creature document

mod escape;
mod render;
mod slugify;
mod spellcasting;
mod table;

pub use escape::{
    calculate_fence_length, calculate_inline_code_ticks, escape_table_cell, inline_code,
    split_table_row,
};
pub use render::{
    DEFAULT_BASE_HEADING_LEVEL, MAX_HEADING_LEVEL, NameStyle, Renderer, join_blocks,
    named_paragraph, quote_lines,
};
pub use slugify::{MAX_SLUG_LEN, normalize_key, slugify};
