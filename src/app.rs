use crate::keybindings::KeybindingRegistry;
use crate::theme::{StyleMap, ThemeVariant};
use postdeck::filter::Category;
use postdeck::listing::{Entry, PageKind};
use postdeck::pagination::Direction;
use postdeck::view::{Coordinator, RenderedView, Row};
use ratatui::style::Style;
use ratatui::widgets::ListState;
use std::borrow::Cow;
use std::time::Duration;
use tokio::time::Instant;

/// How long a status message stays on screen.
const STATUS_TTL: Duration = Duration::from_secs(3);

// ============================================================================
// Application State
// ============================================================================

/// Central application state
pub struct App {
    /// Owns the snapshot, the view state and the controls.
    pub coordinator: Coordinator,

    // Theme
    pub theme_variant: ThemeVariant,
    pub theme: StyleMap,

    pub keybindings: KeybindingRegistry,

    // UI State
    /// Position among the visible entries of the current page.
    pub selected: usize,
    /// Scroll state of the entry list, in row units (headers included).
    pub list_state: ListState,
    /// True while the search box has focus.
    pub search_mode: bool,

    // Status message with expiry; Cow avoids allocation for static literals
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Dirty flag to skip unnecessary frame renders
    pub needs_redraw: bool,

    pub show_help: bool,
    pub help_scroll_offset: usize,

    /// Shown in the title bar: file name or "stdin".
    pub source_name: String,
    /// Narrowest terminal the listing is drawn in.
    pub min_width: u16,
}

impl App {
    pub fn new(
        coordinator: Coordinator,
        keybindings: KeybindingRegistry,
        theme_variant: ThemeVariant,
        source_name: impl Into<String>,
        min_width: u16,
    ) -> Self {
        let mut app = Self {
            coordinator,
            theme_variant,
            theme: StyleMap::from_palette(&theme_variant.palette()),
            keybindings,
            selected: 0,
            list_state: ListState::default(),
            search_mode: false,
            status_message: None,
            needs_redraw: true,
            show_help: false,
            help_scroll_offset: 0,
            source_name: source_name.into(),
            min_width,
        };
        app.sync_selection();
        app
    }

    pub fn view(&self) -> &RenderedView {
        self.coordinator.view()
    }

    /// Resolve a semantic role name to its `Style`.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    /// Dark → Light → Dark. Returns the new theme's name.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }

    // ------------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------------

    pub fn selected_entry(&self) -> Option<&Entry> {
        let index = *self.view().entry_indices().get(self.selected)?;
        self.coordinator.entry(index)
    }

    /// Row position of the selected entry, for the list widget.
    pub fn selected_row(&self) -> Option<usize> {
        self.view()
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| matches!(row, Row::Entry { .. }))
            .nth(self.selected)
            .map(|(pos, _)| pos)
    }

    pub fn nav_down(&mut self) {
        let visible = self.view().visible_entries();
        if visible > 0 {
            self.selected = self.selected.saturating_add(1).min(visible - 1);
        }
        self.sync_selection();
    }

    pub fn nav_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.sync_selection();
    }

    /// Keep the selection inside the current page and mirror it into the list state.
    fn sync_selection(&mut self) {
        let visible = self.view().visible_entries();
        self.selected = self.selected.min(visible.saturating_sub(1));
        let row = self.selected_row();
        self.list_state.select(row);
    }

    /// After the visible set changed: back to the first entry.
    fn view_changed(&mut self) {
        self.selected = 0;
        *self.list_state.offset_mut() = 0;
        self.sync_selection();
        self.needs_redraw = true;
    }

    // ------------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------------

    pub fn enter_search(&mut self) {
        self.search_mode = true;
        self.needs_redraw = true;
    }

    /// Leave the search box, keeping the term.
    pub fn commit_search(&mut self) {
        self.search_mode = false;
        self.needs_redraw = true;
    }

    /// Leave the search box and clear the term.
    pub fn cancel_search(&mut self) {
        self.search_mode = false;
        if !self.coordinator.search_box().value().is_empty() {
            self.coordinator.on_search_input("");
            self.view_changed();
        }
        self.needs_redraw = true;
    }

    pub fn search_push(&mut self, c: char) {
        self.coordinator.on_search_push(c);
        self.view_changed();
    }

    pub fn search_pop(&mut self) {
        self.coordinator.on_search_pop();
        self.view_changed();
    }

    // ------------------------------------------------------------------------
    // Filters and pages
    // ------------------------------------------------------------------------

    pub fn select_category(&mut self, category: Category) {
        if !self.coordinator.category_bar().offers(category) {
            self.set_status(format!(
                "{} is not offered on this listing",
                category.label()
            ));
            return;
        }
        self.coordinator.on_category_select(category);
        self.view_changed();
    }

    pub fn cycle_category(&mut self) {
        let next = self.coordinator.category_bar().next_after_active();
        self.select_category(next);
    }

    pub fn navigate(&mut self, direction: Direction) {
        let before = self.coordinator.state().current_page;
        self.coordinator.on_page_navigate(direction);
        if self.coordinator.state().current_page == before {
            let edge = match direction {
                Direction::Prev | Direction::First => "Already on the first page",
                Direction::Next | Direction::Last => "Already on the last page",
            };
            self.set_status(edge);
        } else {
            self.view_changed();
        }
    }

    // ------------------------------------------------------------------------
    // Status
    // ------------------------------------------------------------------------

    /// Set a status message that expires after 3 seconds.
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
        self.needs_redraw = true;
    }

    /// Returns true if a message was actually cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed() >= STATUS_TTL {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    /// Match counts for the status bar, e.g. "12 of 45 posts, 2 undated not shown".
    pub fn summary(&self) -> String {
        let listing = self.coordinator.listing();
        if listing.is_empty() {
            return match listing.kind {
                PageKind::Analytics => "Analytics page: nothing to organize".to_string(),
                _ => "No posts found".to_string(),
            };
        }
        let view = self.view();
        let mut summary = format!("{} of {} posts", view.matched, listing.len());
        if view.hidden_undated > 0 {
            summary.push_str(&format!(", {} undated not shown", view.hidden_undated));
        }
        summary
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use postdeck::listing::Listing;
    use tokio::time;

    fn entry(title: &str, draft: bool, date: Option<(i32, u32, u32)>) -> Entry {
        let published = date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d));
        Entry::new(title, title, draft, published, false)
    }

    fn test_app(kind: PageKind, entries: Vec<Entry>, page_size: usize) -> App {
        App::new(
            Coordinator::new(Listing::new(kind, entries), page_size),
            KeybindingRegistry::new(),
            ThemeVariant::Dark,
            "test.html",
            60,
        )
    }

    fn flat(n: usize) -> App {
        let entries = (0..n)
            .map(|i| entry(&format!("Post {}", i), i % 2 == 1, None))
            .collect();
        test_app(PageKind::Other, entries, 5)
    }

    #[test]
    fn test_nav_clamps_to_page() {
        let mut app = flat(7);
        for _ in 0..10 {
            app.nav_down();
        }
        assert_eq!(app.selected, 4);
        assert_eq!(app.selected_entry().map(|e| e.title.as_str()), Some("Post 4"));
        app.nav_up();
        assert_eq!(app.selected, 3);
    }

    #[test]
    fn test_nav_empty_listing() {
        let mut app = test_app(PageKind::Posts, Vec::new(), 5);
        app.nav_down();
        assert_eq!(app.selected, 0);
        assert!(app.selected_entry().is_none());
        assert_eq!(app.list_state.selected(), None);
    }

    #[test]
    fn test_selected_row_skips_headers() {
        let entries = vec![
            entry("a", false, Some((2024, 4, 1))),
            entry("b", false, Some((2024, 3, 1))),
        ];
        let mut app = test_app(PageKind::Posts, entries, 5);
        assert_eq!(app.selected_row(), Some(1));
        app.nav_down();
        assert_eq!(app.selected_row(), Some(3));
        assert_eq!(app.list_state.selected(), Some(3));
    }

    #[test]
    fn test_page_change_resets_selection() {
        let mut app = flat(7);
        app.nav_down();
        app.navigate(Direction::Next);
        assert_eq!(app.selected, 0);
        assert_eq!(app.selected_entry().map(|e| e.title.as_str()), Some("Post 5"));
    }

    #[test]
    fn test_navigate_past_edge_sets_status() {
        let mut app = flat(3);
        app.navigate(Direction::Next);
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg, "Already on the last page");
    }

    #[test]
    fn test_search_edit_and_cancel() {
        let mut app = flat(7);
        app.enter_search();
        app.search_push('6');
        assert_eq!(app.view().visible_entries(), 1);
        app.cancel_search();
        assert!(!app.search_mode);
        assert_eq!(app.coordinator.search_box().value(), "");
        assert_eq!(app.view().matched, 7);
    }

    #[test]
    fn test_commit_search_keeps_term() {
        let mut app = flat(7);
        app.enter_search();
        app.search_push('6');
        app.commit_search();
        assert!(!app.search_mode);
        assert_eq!(app.coordinator.search_box().value(), "6");
    }

    #[test]
    fn test_unavailable_category_reports_status() {
        let mut app = flat(3);
        app.select_category(Category::Starred);
        assert_eq!(app.coordinator.state().category, Category::All);
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_cycle_category() {
        let mut app = flat(4);
        app.cycle_category();
        assert_eq!(app.coordinator.state().category, Category::Published);
        app.cycle_category();
        assert_eq!(app.coordinator.state().category, Category::Drafts);
        app.cycle_category();
        assert_eq!(app.coordinator.state().category, Category::All);
    }

    #[test]
    fn test_cycle_theme() {
        let mut app = flat(1);
        assert_eq!(app.cycle_theme(), "Light");
        assert_eq!(app.theme_variant, ThemeVariant::Light);
        assert_eq!(app.cycle_theme(), "Dark");
    }

    #[test]
    fn test_summary_reports_hidden_undated() {
        let entries = vec![entry("a", false, Some((2024, 4, 1))), entry("b", false, None)];
        let app = test_app(PageKind::Posts, entries, 5);
        assert_eq!(app.summary(), "2 of 2 posts, 1 undated not shown");
    }

    #[test]
    fn test_summary_empty_listings() {
        assert_eq!(
            test_app(PageKind::Analytics, Vec::new(), 5).summary(),
            "Analytics page: nothing to organize"
        );
        assert_eq!(test_app(PageKind::Posts, Vec::new(), 5).summary(), "No posts found");
    }

    #[tokio::test]
    async fn test_status_expires_after_3_seconds() {
        time::pause();
        let mut app = flat(1);
        app.set_status("Test message");

        time::advance(Duration::from_secs(2)).await;
        assert!(!app.clear_expired_status());
        assert!(app.status_message.is_some());

        time::advance(Duration::from_secs(2)).await;
        assert!(app.clear_expired_status());
        assert!(app.status_message.is_none());
    }
}
