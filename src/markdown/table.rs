//! Table rendering.
//!
//! Every cell is rendered, then escaped with [`escape_table_cell`], so
//! literal pipes in corpus text never add columns.

use serde_json::Value;

use crate::ir::{Node, Record};

use super::escape::escape_table_cell;
use super::render::{Renderer, join_blocks};

/// Render a `table` record: caption, intro, header, rows, footnotes, outro.
pub(crate) fn render_table(renderer: &Renderer, rec: Record<'_>, depth: usize) -> String {
    let labels: Vec<String> = rec
        .array("colLabels")
        .iter()
        .map(|label| render_cell(renderer, label, depth))
        .collect();
    let rows: Vec<Vec<String>> = rec
        .array("rows")
        .iter()
        .filter_map(|row| row_cells(row))
        .map(|cells| {
            cells
                .iter()
                .map(|cell| render_cell(renderer, cell, depth))
                .collect()
        })
        .collect();

    let columns = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(labels.len()))
        .max()
        .unwrap_or(0);

    let caption = rec
        .str("caption")
        .map(|caption| format!("**{}**", renderer.expand(caption)));
    let intro = rec
        .get("intro")
        .map(|intro| renderer.render_value(intro, depth));

    let grid = if columns == 0 {
        String::new()
    } else {
        let mut header = labels;
        header.resize(columns, String::new());
        let styles = rec.strings("colStyles");
        let separator: Vec<&str> = (0..columns)
            .map(|i| alignment(styles.get(i).copied().unwrap_or("")))
            .collect();

        let mut lines = Vec::with_capacity(rows.len() + 2);
        lines.push(format_row(&header));
        lines.push(format!("|{}|", separator.join("|")));
        lines.extend(rows.iter().map(|row| format_row(row)));
        lines.join("\n")
    };

    let footnotes = rec
        .array("footnotes")
        .iter()
        .map(|note| renderer.render_value(note, depth))
        .filter(|note| !note.is_empty())
        .map(|note| format!("*{note}*"))
        .collect::<Vec<_>>()
        .join("\n");
    let outro = rec
        .get("outro")
        .map(|outro| renderer.render_value(outro, depth));

    if grid.is_empty() {
        return String::new();
    }
    join_blocks(
        caption
            .into_iter()
            .chain(intro)
            .chain([grid, footnotes])
            .chain(outro),
    )
}

/// The raw cells of a row, which may be a plain array or a styled `row`.
fn row_cells(row: &Value) -> Option<&[Value]> {
    match row {
        Value::Array(cells) => Some(cells.as_slice()),
        Value::Object(_) => {
            let rec = Record::from_value(row)?;
            rec.get("row")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
        }
        Value::String(_) | Value::Number(_) => Some(std::slice::from_ref(row)),
        _ => None,
    }
}

/// Render one cell and escape it for table layout.
pub(crate) fn render_cell(renderer: &Renderer, cell: &Value, depth: usize) -> String {
    let text = match Node::from_value(cell) {
        Node::Block(block) if block.kind == crate::ir::BlockKind::Cell => {
            render_cell_record(renderer, block.record, depth)
        }
        node => renderer.render(&node, depth + 1),
    };
    escape_table_cell(&text)
}

/// A `cell` record: a roll range or a nested entry.
pub(crate) fn render_cell_record(renderer: &Renderer, rec: Record<'_>, depth: usize) -> String {
    if let Some(roll) = rec.object("roll") {
        let pad = roll.flag("pad");
        if let Some(exact) = roll.i64("exact") {
            return roll_number(exact, pad);
        }
        return match (roll.i64("min"), roll.i64("max")) {
            (Some(min), Some(max)) if min == max => roll_number(min, pad),
            (Some(min), Some(max)) => {
                format!("{}-{}", roll_number(min, pad), roll_number(max, pad))
            }
            (Some(min), None) => format!("{}+", roll_number(min, pad)),
            _ => String::new(),
        };
    }
    renderer.render_children(rec, depth + 1)
}

/// Roll bounds on percentile tables are padded; 100 reads as `00`.
fn roll_number(n: i64, pad: bool) -> String {
    match (pad, n) {
        (true, 100) => "00".to_string(),
        (true, n) => format!("{n:02}"),
        (false, n) => n.to_string(),
    }
}

fn alignment(style: &str) -> &'static str {
    if style.contains("text-center") {
        ":---:"
    } else if style.contains("text-right") {
        "---:"
    } else {
        "---"
    }
}

fn format_row(cells: &[String]) -> String {
    if cells.is_empty() {
        return "| |".to_string();
    }
    format!("| {} |", cells.join(" | "))
}
