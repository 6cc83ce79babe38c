use crate::app::App;
use postdeck::listing::{Entry, PageKind};
use postdeck::util::{display_width, pad_to_width, strip_control_chars, truncate_to_width};
use postdeck::view::Row;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Width of "YYYY-MM-DD  ".
const DATE_COLUMN: usize = 12;

/// Render the entry list for the current page, month headers included.
pub(super) fn render(f: &mut Frame, app: &mut App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if app.search_mode {
            app.style("panel_border")
        } else {
            app.style("panel_border_focused")
        });

    if app.view().rows.is_empty() {
        let message = if app.coordinator.listing().is_empty() {
            match app.coordinator.kind() {
                PageKind::Analytics => "Analytics page: nothing to organize",
                _ => "No posts found",
            }
        } else {
            "No matching posts"
        };
        let paragraph = Paragraph::new(message)
            .style(app.style("entry_date"))
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let inner_width = area.width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = app
        .view()
        .rows
        .iter()
        .filter_map(|row| match row {
            Row::Header { label, continued } => {
                let text = if *continued {
                    format!("{} (continued)", label)
                } else {
                    label.clone()
                };
                Some(ListItem::new(Line::from(Span::styled(
                    truncate_to_width(&text, inner_width).into_owned(),
                    app.style("month_header"),
                ))))
            }
            Row::Entry { index } => app
                .coordinator
                .entry(*index)
                .map(|entry| ListItem::new(entry_line(app, entry, inner_width))),
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(app.style("entry_selected"));

    f.render_stateful_widget(list, area, &mut app.list_state);
}

fn entry_line(app: &App, entry: &Entry, width: usize) -> Line<'static> {
    let date = entry
        .published_at
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "----------".to_string());

    let mut suffix = String::new();
    if entry.is_starred {
        suffix.push_str(" ★");
    }
    if entry.is_draft {
        suffix.push_str(" (draft)");
    }

    let title_width = width
        .saturating_sub(DATE_COLUMN)
        .saturating_sub(display_width(&suffix));
    let title = strip_control_chars(&entry.title);
    // Padded so the star and draft markers line up in one column
    let title = if suffix.is_empty() {
        truncate_to_width(&title, title_width).into_owned()
    } else {
        pad_to_width(&title, title_width)
    };

    let title_style = if entry.is_draft {
        app.style("entry_draft")
    } else {
        app.style("entry_normal")
    };

    let mut spans = vec![
        Span::styled(format!("{}  ", date), app.style("entry_date")),
        Span::styled(title, title_style),
    ];
    if entry.is_starred {
        spans.push(Span::styled(" ★", app.style("entry_star")));
    }
    if entry.is_draft {
        spans.push(Span::styled(" (draft)", app.style("entry_draft")));
    }
    Line::from(spans)
}
