//! Intermediate representation over raw corpus records.
//!
//! Corpus records are arbitrary JSON trees. The IR gives them two views:
//! - [`Record`]: a borrowed object with lenient, typed field accessors
//! - [`Node`]: the discriminated union the renderer walks (text leaf,
//!   node list, or block node with a closed [`BlockKind`])
//!
//! Neither view copies or mutates the underlying `serde_json::Value`.
//!
//! # Example
//!
//! ```
//! use grimoire::ir::{BlockKind, Node};
//! use serde_json::json;
//!
//! let value = json!({"type": "list", "items": ["one", "two"]});
//! match Node::from_value(&value) {
//!     Node::Block(block) => assert_eq!(block.kind, BlockKind::List),
//!     _ => unreachable!(),
//! }
//! ```

mod node;
mod record;

pub use node::{Block, BlockKind, Node};
pub use record::Record;
pub(crate) use record::number_text;
