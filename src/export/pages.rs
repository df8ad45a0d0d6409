//! Markdown listing pages.

use crate::category::Category;
use crate::convert::RESERVED_STEM;
use crate::index::{QuickRef, QuickReferences};
use crate::macros::markdown_link;

/// `{category}/index.md`: one line per entry with its summary.
pub fn category_page(category: Category, refs: &[QuickRef]) -> String {
    let prefix = format!("{}/", category.dir());
    let mut page = format!("# {}\n\n", category.label());
    for entry in refs {
        let target = entry.path.strip_prefix(&prefix).unwrap_or(&entry.path);
        page.push_str("- ");
        page.push_str(&markdown_link(&entry.name, target));
        let details: Vec<&str> = [entry.source.as_deref(), Some(entry.summary.as_str())]
            .into_iter()
            .flatten()
            .filter(|d| !d.is_empty())
            .collect();
        if !details.is_empty() {
            page.push_str(&format!(" ({})", details.join(", ")));
        }
        page.push('\n');
    }
    page
}

/// Root `index.md`: every category with its entry count.
pub fn overview_page(quick: &QuickReferences) -> String {
    let mut page = String::from("# Index\n\n");
    for (category, refs) in quick.iter() {
        let target = format!("{}/{RESERVED_STEM}.md", category.dir());
        page.push_str(&format!(
            "- {} ({})\n",
            markdown_link(category.label(), &target),
            refs.len()
        ));
    }
    page
}
