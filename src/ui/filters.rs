use crate::app::App;
use postdeck::listing::PageKind;
use postdeck::util::{strip_control_chars, truncate_to_width};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Rows taken by the filter bar: two lines of content plus borders.
pub(super) const HEIGHT: u16 = 4;

/// Render the search box and the category links.
pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }
    let inner_width = area.width.saturating_sub(2) as usize;

    let term = app.coordinator.search_box().value();
    let search_line = if app.search_mode {
        Line::from(vec![
            Span::styled("Search: ", app.style("search_box_active")),
            Span::styled(format!("{}_", term), app.style("search_box_active")),
        ])
    } else if term.is_empty() {
        Line::from(Span::styled("Search: (press / to filter)", app.style("filter_inactive")))
    } else {
        Line::from(vec![
            Span::styled("Search: ", app.style("search_box")),
            Span::styled(term.to_string(), app.style("search_box")),
        ])
    };

    let bar = app.coordinator.category_bar();
    let mut links = Vec::with_capacity(bar.links().len() * 2);
    for (i, link) in bar.links().iter().enumerate() {
        if i > 0 {
            links.push(Span::raw("  "));
        }
        let style = if link.category == bar.active() {
            app.style("filter_active")
        } else {
            app.style("filter_inactive")
        };
        links.push(Span::styled(link.text(), style));
    }

    let kind = match app.coordinator.kind() {
        PageKind::Posts => "Posts",
        PageKind::Pages => "Pages",
        PageKind::Analytics => "Analytics",
        PageKind::Other => "Listing",
    };
    let source = strip_control_chars(&app.source_name);
    let title = format!(" {} - {} ", kind, source);
    let title = truncate_to_width(&title, inner_width).into_owned();

    let border_style = if app.search_mode {
        app.style("panel_border_focused")
    } else {
        app.style("panel_border")
    };

    let paragraph = Paragraph::new(vec![search_line, Line::from(links)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );
    f.render_widget(paragraph, area);
}
