//! Inline macro expansion.
//!
//! Free-form corpus text embeds macros of the form `{@name arg0|arg1|...}`.
//! The expander replaces each with formatted Markdown:
//!
//! - **Emphasis/reference wrappers**: `{@b x}` → `**x**`, `{@spell x}` → `*x*`
//! - **Computed handlers**: `{@hit 5}` → `+5`, `{@dc 15}` → `DC 15`,
//!   `{@atk mw}` → `*Melee Weapon Attack:*`, `{@recharge 5}` → `(Recharge 5-6)`
//! - **Pass-through tags**: annotation-only tags yield their display text
//! - **Links**: `{@link text|url}` → `[text](url)`
//!
//! Unknown names yield `arg0` unchanged; expansion never fails.
//!
//! ## Design Notes
//!
//! Expansion is a single structural pass. Each invocation's arguments are
//! split on top-level pipes and expanded recursively before the outer
//! handler runs, so nesting resolves inside-out without rescanning the
//! output. Recursion is bounded by [`MAX_MACRO_DEPTH`]; invocations nested
//! deeper are emitted verbatim.
//!
//! # Example
//!
//! ```
//! use grimoire::macros::Expander;
//!
//! let expander = Expander::new();
//! assert_eq!(
//!     expander.expand("Deals {@damage 2d6} {@i fire} damage on a {@hit 5} to hit."),
//!     "Deals `2d6` *fire* damage on a +5 to hit."
//! );
//! ```

mod parser;
mod tags;

pub use parser::MacroInvocation;
pub use tags::{Emphasis, MacroKind, Marker};

pub(crate) use tags::{ability_name, markdown_link};

use parser::{OPENER, find_close, find_opener};

/// Maximum nesting depth of macros inside macro arguments.
pub const MAX_MACRO_DEPTH: usize = 10;

/// Options controlling macro output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandOptions {
    /// Render reference tags as relative links to generated documents.
    pub link_references: bool,
}

/// Output flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Markdown emphasis, code spans and links.
    Markdown,
    /// Display text only.
    Plain,
}

/// Stateless macro expander.
///
/// Expansion is a pure function of the input text and the options.
#[derive(Debug, Clone, Default)]
pub struct Expander {
    options: ExpandOptions,
}

impl Expander {
    /// Create an expander with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an expander with the given options.
    pub fn with_options(options: ExpandOptions) -> Self {
        Self { options }
    }

    /// The active options.
    pub fn options(&self) -> &ExpandOptions {
        &self.options
    }

    /// Expand every macro in `text` to Markdown.
    pub fn expand(&self, text: &str) -> String {
        self.expand_with(text, Mode::Markdown)
    }

    /// Expand every macro in `text` to its plain display text.
    ///
    /// Used where Markdown markup would be noise, such as index names.
    pub fn expand_plain(&self, text: &str) -> String {
        self.expand_with(text, Mode::Plain)
    }

    fn expand_with(&self, text: &str, mode: Mode) -> String {
        if !text.contains(OPENER) {
            return text.to_string();
        }
        let mut out = String::with_capacity(text.len());
        self.expand_into(text, 0, mode, &mut out);
        out
    }

    fn expand_into(&self, text: &str, depth: usize, mode: Mode, out: &mut String) {
        if depth >= MAX_MACRO_DEPTH {
            out.push_str(text);
            return;
        }

        let mut pos = 0;
        while let Some(open) = find_opener(text, pos) {
            out.push_str(&text[pos..open]);

            let Some(close) = find_close(text, open) else {
                // Unterminated: keep the opener literally and keep scanning
                out.push_str(OPENER);
                pos = open + OPENER.len();
                continue;
            };

            let invocation = MacroInvocation::parse(&text[open + OPENER.len()..close - 1]);
            let args: Vec<String> = invocation
                .args
                .iter()
                .map(|arg| {
                    let mut expanded = String::with_capacity(arg.len());
                    self.expand_into(arg, depth + 1, mode, &mut expanded);
                    expanded
                })
                .collect();

            out.push_str(&tags::render(invocation.name, &args, &self.options, mode));
            pos = close;
        }
        out.push_str(&text[pos..]);
    }
}
