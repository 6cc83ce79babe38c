use crate::app::App;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render "< Prev  Page X of Y  Next >". Nothing is drawn for a single page.
pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    let pager = app.view().pager;
    if !pager.visible || area.width < 1 || area.height < 1 {
        return;
    }

    let edge = |enabled: bool| {
        if enabled {
            app.style("pager_enabled")
        } else {
            app.style("pager_disabled")
        }
    };

    let line = Line::from(vec![
        Span::styled("< Prev", edge(pager.prev_enabled)),
        Span::raw("  "),
        Span::styled(pager.indicator(), app.style("entry_normal")),
        Span::raw("  "),
        Span::styled("Next >", edge(pager.next_enabled)),
    ]);
    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}
