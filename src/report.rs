//! Non-interactive output of a rendered view, for `--print`.
//!
//! The text form mirrors the terminal layout: search and category line, rows,
//! then the pager line when there is more than one page. The JSON form carries
//! the same rows with entry details resolved.
use crate::filter::Category;
use crate::listing::{Entry, PageKind};
use crate::util::strip_control_chars;
use crate::view::{Coordinator, Row};
use chrono::NaiveDate;
use serde::Serialize;

/// One output row with the entry resolved from the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ReportRow<'a> {
    Header {
        label: &'a str,
        continued: bool,
    },
    Entry {
        index: usize,
        title: &'a str,
        published_at: Option<NaiveDate>,
        is_draft: bool,
        is_starred: bool,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryCount {
    pub category: Category,
    pub count: usize,
    pub active: bool,
}

/// Serializable snapshot of what the coordinator currently shows.
#[derive(Debug, Clone, Serialize)]
pub struct Report<'a> {
    pub kind: PageKind,
    pub search: &'a str,
    pub categories: Vec<CategoryCount>,
    pub page: usize,
    pub total_pages: usize,
    pub matched: usize,
    pub hidden_undated: usize,
    pub rows: Vec<ReportRow<'a>>,
}

impl<'a> Report<'a> {
    pub fn new(coordinator: &'a Coordinator) -> Self {
        let view = coordinator.view();
        let bar = coordinator.category_bar();
        let categories = bar
            .links()
            .iter()
            .map(|link| CategoryCount {
                category: link.category,
                count: link.count,
                active: link.category == bar.active(),
            })
            .collect();

        let rows = view
            .rows
            .iter()
            .filter_map(|row| match row {
                Row::Header { label, continued } => Some(ReportRow::Header {
                    label: label.as_str(),
                    continued: *continued,
                }),
                Row::Entry { index } => coordinator.entry(*index).map(|e| entry_row(*index, e)),
            })
            .collect();

        Self {
            kind: coordinator.kind(),
            search: coordinator.search_box().value(),
            categories,
            page: view.pager.page,
            total_pages: view.pager.total_pages,
            matched: view.matched,
            hidden_undated: view.hidden_undated,
            rows,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn entry_row(index: usize, entry: &Entry) -> ReportRow<'_> {
    ReportRow::Entry {
        index,
        title: &entry.title,
        published_at: entry.published_at,
        is_draft: entry.is_draft,
        is_starred: entry.is_starred,
    }
}

/// Plain-text rendering of the current view.
pub fn render_text(coordinator: &Coordinator) -> String {
    let view = coordinator.view();
    let mut out = String::new();

    if coordinator.listing().is_empty() {
        out.push_str("No posts found\n");
        return out;
    }

    let bar = coordinator.category_bar();
    let links: Vec<String> = bar
        .links()
        .iter()
        .map(|link| {
            if link.category == bar.active() {
                format!("[{}]", link.text())
            } else {
                link.text()
            }
        })
        .collect();
    out.push_str(&format!("Search: {}\n", coordinator.search_box().value()));
    out.push_str(&links.join("  "));
    out.push_str("\n\n");

    if view.rows.is_empty() {
        out.push_str("No matching posts\n");
    }
    for row in &view.rows {
        match row {
            Row::Header { label, continued } => {
                if *continued {
                    out.push_str(&format!("== {} (continued) ==\n", label));
                } else {
                    out.push_str(&format!("== {} ==\n", label));
                }
            }
            Row::Entry { index } => {
                if let Some(entry) = coordinator.entry(*index) {
                    out.push_str(&entry_line(entry));
                    out.push('\n');
                }
            }
        }
    }

    if view.pager.visible {
        let prev = if view.pager.prev_enabled { "< Prev" } else { "      " };
        let next = if view.pager.next_enabled { "Next >" } else { "" };
        out.push('\n');
        out.push_str(&format!("{}  {}  {}\n", prev, view.pager.indicator(), next));
    }
    if view.hidden_undated > 0 {
        out.push_str(&format!("({} undated not shown)\n", view.hidden_undated));
    }
    out
}

fn entry_line(entry: &Entry) -> String {
    let date = entry
        .published_at
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "----------".to_string());
    let mut line = format!("  {}  {}", date, strip_control_chars(&entry.title));
    if entry.is_starred {
        line.push_str(" *");
    }
    if entry.is_draft {
        line.push_str(" (draft)");
    }
    line
}
