//! Recursive-descent scanner for `{@name arg0|arg1|...}` invocations.
//!
//! The scanner only finds boundaries; expansion (including nested
//! invocations inside arguments) is driven by [`super::Expander`].

use memchr::memmem;

/// Opening sequence of an inline macro.
pub(crate) const OPENER: &str = "{@";

/// A parsed invocation with raw (unexpanded) arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroInvocation<'a> {
    /// Tag name, e.g. `damage` in `{@damage 2d6}`.
    pub name: &'a str,
    /// Pipe-separated arguments; `args[0]` is the display text.
    pub args: Vec<&'a str>,
}

impl<'a> MacroInvocation<'a> {
    /// Parse the body between `{@` and the matching `}`.
    pub fn parse(body: &'a str) -> Self {
        let body = body.trim_start();
        let (name, rest) = match body.find(char::is_whitespace) {
            Some(pos) => (&body[..pos], body[pos..].trim_start()),
            None => (body, ""),
        };
        Self {
            name,
            args: split_args(rest),
        }
    }

    /// The display argument, or `""` when absent.
    pub fn arg0(&self) -> &'a str {
        self.args.first().copied().unwrap_or("")
    }
}

/// Position of the next `{@` at or after `from`.
pub(crate) fn find_opener(text: &str, from: usize) -> Option<usize> {
    memmem::find(&text.as_bytes()[from..], OPENER.as_bytes()).map(|pos| from + pos)
}

/// Given the byte offset of a `{`, return the offset one past its matching `}`.
///
/// Braces are counted structurally, so nested invocations are skipped as a
/// unit. Returns `None` when the text ends before the brace closes.
pub(crate) fn find_close(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split arguments on `|` at brace depth zero.
fn split_args(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return Vec::new();
    }
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, b) in text.bytes().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b'|' if depth == 0 => {
                args.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    args.push(&text[start..]);
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name_and_args() {
        let inv = MacroInvocation::parse("spell fireball|phb");
        assert_eq!(inv.name, "spell");
        assert_eq!(inv.args, vec!["fireball", "phb"]);
        assert_eq!(inv.arg0(), "fireball");
    }

    #[test]
    fn test_parse_no_args() {
        let inv = MacroInvocation::parse("recharge");
        assert_eq!(inv.name, "recharge");
        assert!(inv.args.is_empty());
        assert_eq!(inv.arg0(), "");
    }

    #[test]
    fn test_parse_keeps_empty_args() {
        let inv = MacroInvocation::parse("classFeature Rage|Barbarian||1");
        assert_eq!(inv.args, vec!["Rage", "Barbarian", "", "1"]);
    }

    #[test]
    fn test_split_ignores_nested_pipes() {
        let inv = MacroInvocation::parse("b {@spell fireball|phb} now|x");
        assert_eq!(inv.args, vec!["{@spell fireball|phb} now", "x"]);
    }

    #[test]
    fn test_find_close_nested() {
        let text = "{@b {@i x}} tail";
        assert_eq!(find_close(text, 0), Some(11));
    }

    #[test]
    fn test_find_close_unterminated() {
        assert_eq!(find_close("{@b open", 0), None);
    }

    #[test]
    fn test_find_opener() {
        assert_eq!(find_opener("abc {@x}", 0), Some(4));
        assert_eq!(find_opener("abc {@x}", 5), None);
        assert_eq!(find_opener("{plain}", 0), None);
    }
}
