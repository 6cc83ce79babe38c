use crate::app::App;
use crate::keybindings::Action;
use postdeck::util::strip_control_chars;
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(&**msg)
    } else if app.search_mode {
        Cow::Borrowed("Type to search | ESC clear | ENTER keep")
    } else {
        Cow::Owned(idle_text(app))
    };

    let paragraph = Paragraph::new(text).style(app.style("status_bar"));
    f.render_widget(paragraph, area);
}

/// Match counts, the full title of the selected entry, then key hints that
/// follow any config overrides.
fn idle_text(app: &App) -> String {
    let mut parts = vec![app.summary()];
    if let Some(entry) = app.selected_entry() {
        parts.push(strip_control_chars(&entry.title).into_owned());
    }
    let hints: Vec<String> = [
        (Action::EnterSearch, "search"),
        (Action::ShowHelp, "help"),
        (Action::Quit, "quit"),
    ]
    .into_iter()
    .filter_map(|(action, name)| {
        app.keybindings
            .key_for(action)
            .map(|key| format!("[{}]{}", key, name))
    })
    .collect();
    parts.push(hints.join(" "));
    parts.join(" | ")
}
