//! Input handling for the TUI.
//!
//! Keys go to the help overlay when it is open, then to the search box when it
//! has focus, and to the listing otherwise.

use crate::app::App;
use crate::keybindings::{Action as KbAction, Context as KbContext};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use postdeck::filter::Category;
use postdeck::pagination::Direction;
use postdeck::util::MAX_SEARCH_QUERY_LENGTH;

use super::Action;

/// Main input dispatch function.
pub(super) fn handle_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<Action> {
    // Help overlay captures all keys when visible
    if app.show_help {
        return Ok(handle_help_input(app, code));
    }

    if app.search_mode {
        return handle_search_input(app, code, modifiers);
    }

    handle_listing_input(app, code, modifiers)
}

/// Handle input while the help overlay is visible.
///
/// Captures all keys: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

/// Handle input in the listing.
fn handle_listing_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<Action> {
    let action = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Global);
    Ok(apply(app, action))
}

/// Handle input while the search box has focus.
///
/// Printable keys edit the term and refilter immediately; the search context
/// only binds non-printable keys.
fn handle_search_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Result<Action> {
    if let Some(action) = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Search)
    {
        return Ok(apply(app, Some(action)));
    }

    match code {
        KeyCode::Backspace => app.search_pop(),
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
            if app.coordinator.search_box().value().chars().count() >= MAX_SEARCH_QUERY_LENGTH {
                app.set_status(format!(
                    "Search query at max length ({} chars)",
                    MAX_SEARCH_QUERY_LENGTH
                ));
            } else {
                app.search_push(c);
            }
        }
        _ => {}
    }
    Ok(Action::Continue)
}

fn apply(app: &mut App, action: Option<KbAction>) -> Action {
    match action {
        Some(KbAction::Quit) => return Action::Quit,
        Some(KbAction::NavDown) => app.nav_down(),
        Some(KbAction::NavUp) => app.nav_up(),
        Some(KbAction::EnterSearch) => app.enter_search(),
        Some(KbAction::ExitSearch) => app.cancel_search(),
        Some(KbAction::CommitSearch) => app.commit_search(),
        Some(KbAction::NextPage) => app.navigate(Direction::Next),
        Some(KbAction::PrevPage) => app.navigate(Direction::Prev),
        Some(KbAction::FirstPage) => app.navigate(Direction::First),
        Some(KbAction::LastPage) => app.navigate(Direction::Last),
        Some(KbAction::ShowAll) => app.select_category(Category::All),
        Some(KbAction::ShowPublished) => app.select_category(Category::Published),
        Some(KbAction::ShowDrafts) => app.select_category(Category::Drafts),
        Some(KbAction::ShowStarred) => app.select_category(Category::Starred),
        Some(KbAction::CycleCategory) => app.cycle_category(),
        Some(KbAction::CycleTheme) => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
        }
        Some(KbAction::ShowHelp) => {
            app.show_help = true;
            app.help_scroll_offset = 0;
        }
        None => {}
    }
    Action::Continue
}
