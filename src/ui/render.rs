//! Render functions for the TUI.
//!
//! Lays out the filter bar, the entry list, the pager and the status bar, and
//! draws the help overlay on top when it is open.

use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    widgets::Paragraph,
    Frame,
};

use super::{filters, help, pager, posts, status};

/// Minimum terminal height required for normal operation.
pub(super) const MIN_HEIGHT: u16 = 10;

/// Main render function. Validates the terminal size first.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < app.min_width || area.height < MIN_HEIGHT {
        // For very small terminals (less than 3 lines), just show minimal message
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                app.min_width, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let pager_height = if app.view().pager.visible { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(filters::HEIGHT),
            Constraint::Min(0),
            Constraint::Length(pager_height),
            Constraint::Length(1),
        ])
        .split(area);

    filters::render(f, app, chunks[0]);
    posts::render(f, app, chunks[1]);
    pager::render(f, app, chunks[2]);
    status::render(f, app, chunks[3]);

    if app.show_help {
        help::render(f, app);
    }
}
