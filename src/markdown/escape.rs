//! Pure markdown escaping utilities.
//!
//! These functions handle escaping table cells and calculating appropriate
//! fence/tick lengths for code blocks and inline code.

/// Escape text for use inside a Markdown table cell.
///
/// Backslashes are doubled and pipes become `\|`, so a cell can never
/// introduce a column separator. Line breaks become `<br>`.
///
/// # Examples
///
/// ```
/// use grimoire::markdown::escape_table_cell;
///
/// assert_eq!(escape_table_cell("a|b"), "a\\|b");
/// assert_eq!(escape_table_cell("one\ntwo"), "one<br>two");
/// ```
pub fn escape_table_cell(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + 8);
    let mut lines = text
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .peekable();

    while let Some(line) = lines.next() {
        for c in line.chars() {
            match c {
                '\\' => result.push_str("\\\\"),
                '|' => result.push_str("\\|"),
                _ => result.push(c),
            }
        }
        if lines.peek().is_some() {
            result.push_str("<br>");
        }
    }

    result
}

/// Split a rendered table row into its cells on unescaped pipes.
///
/// Inverse of the row layout produced by the renderer: leading and
/// trailing pipes are dropped and each cell is trimmed. Escapes are kept.
///
/// # Examples
///
/// ```
/// use grimoire::markdown::split_table_row;
///
/// assert_eq!(split_table_row("| a\\|b | c |"), vec!["a\\|b", "c"]);
/// ```
pub fn split_table_row(row: &str) -> Vec<String> {
    let row = row.trim();
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut escaped = false;

    for c in row.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        match c {
            '\\' => {
                current.push(c);
                escaped = true;
            }
            '|' => {
                cells.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    cells.push(current);

    if row.starts_with('|') && !cells.is_empty() {
        cells.remove(0);
    }
    if row.ends_with('|') && !row.ends_with("\\|") && !cells.is_empty() {
        cells.pop();
    }

    cells.into_iter().map(|c| c.trim().to_string()).collect()
}

/// Calculate the minimum fence length needed for a code block.
///
/// Returns the smallest number of fence characters (at least 3) that
/// doesn't appear as a run in the content.
///
/// # Examples
///
/// ```
/// use grimoire::markdown::calculate_fence_length;
///
/// // Normal content needs 3 backticks
/// assert_eq!(calculate_fence_length("let x = 1;", '`'), 3);
///
/// // Content with 3 backticks needs 4
/// assert_eq!(calculate_fence_length("```rust\ncode\n```", '`'), 4);
/// ```
pub fn calculate_fence_length(content: &str, fence_char: char) -> usize {
    longest_run(content, fence_char).max(2) + 1
}

/// Calculate the minimum backtick count needed for inline code.
///
/// Returns the smallest number of backticks (at least 1) that doesn't
/// appear as a run in the content.
///
/// # Examples
///
/// ```
/// use grimoire::markdown::calculate_inline_code_ticks;
///
/// assert_eq!(calculate_inline_code_ticks("2d6"), 1);
/// assert_eq!(calculate_inline_code_ticks("code with ` backtick"), 2);
/// ```
pub fn calculate_inline_code_ticks(content: &str) -> usize {
    longest_run(content, '`') + 1
}

/// Wrap text in an inline code span with a non-conflicting tick count.
pub fn inline_code(content: &str) -> String {
    if content.is_empty() {
        return String::new();
    }
    let ticks = "`".repeat(calculate_inline_code_ticks(content));
    let spacer = if content.starts_with('`') || content.ends_with('`') {
        " "
    } else {
        ""
    };
    format!("{ticks}{spacer}{content}{spacer}{ticks}")
}

fn longest_run(content: &str, target: char) -> usize {
    let mut max_run = 0;
    let mut current_run = 0;

    for c in content.chars() {
        if c == target {
            current_run += 1;
            max_run = max_run.max(current_run);
        } else {
            current_run = 0;
        }
    }

    max_run
}
