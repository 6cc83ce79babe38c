//! View coordinator: owns the view state and the controls, and rebuilds the
//! visible rows from the entry snapshot on every change.
//!
//! The pipeline runs in a fixed order: text filter and category filter, month
//! grouping (posts listing only), pagination, then row construction. Rows are
//! always rebuilt from snapshot indices, so running it twice with the same
//! state yields the same rows.
use crate::filter::{Category, TextFilter};
use crate::grouping::{self, Grouping};
use crate::listing::{Entry, Listing, PageKind};
use crate::pagination::{Direction, Paginator};
use crate::util::MAX_SEARCH_QUERY_LENGTH;
use serde::Serialize;

// ============================================================================
// View State
// ============================================================================

/// The user's current choices. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub search_term: String,
    pub category: Category,
    /// 1-based.
    pub current_page: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            category: Category::All,
            current_page: 1,
        }
    }
}

// ============================================================================
// Controls
// ============================================================================

/// The search input's value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchBox {
    value: String,
}

impl SearchBox {
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace the value, truncated to the maximum query length.
    fn set(&mut self, term: &str) {
        self.value = term.chars().take(MAX_SEARCH_QUERY_LENGTH).collect();
    }
}

/// One quick-filter link with the number of entries it selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryLink {
    pub category: Category,
    /// Count over the whole snapshot, independent of the search term.
    pub count: usize,
}

impl CategoryLink {
    /// Link text, e.g. "Drafts (3)".
    pub fn text(&self) -> String {
        format!("{} ({})", self.category.label(), self.count)
    }
}

/// The quick-filter links offered by this listing, and which is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryBar {
    links: Vec<CategoryLink>,
    active: Category,
}

impl CategoryBar {
    fn build(listing: &Listing) -> Self {
        let links = Category::available(listing.kind)
            .iter()
            .map(|&category| CategoryLink {
                category,
                count: listing
                    .entries
                    .iter()
                    .filter(|e| category.matches(e))
                    .count(),
            })
            .collect();
        Self {
            links,
            active: Category::All,
        }
    }

    pub fn links(&self) -> &[CategoryLink] {
        &self.links
    }

    pub fn active(&self) -> Category {
        self.active
    }

    pub fn offers(&self, category: Category) -> bool {
        self.links.iter().any(|link| link.category == category)
    }

    /// The link after the active one, wrapping around.
    pub fn next_after_active(&self) -> Category {
        let pos = self
            .links
            .iter()
            .position(|link| link.category == self.active)
            .unwrap_or(0);
        self.links
            .get((pos + 1) % self.links.len().max(1))
            .map(|link| link.category)
            .unwrap_or(Category::All)
    }
}

/// Prev/next links and the page indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PagerControls {
    /// False when everything fits on one page; the controls are not drawn at all.
    pub visible: bool,
    pub page: usize,
    pub total_pages: usize,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

impl PagerControls {
    /// "Page 2 of 3".
    pub fn indicator(&self) -> String {
        format!("Page {} of {}", self.page, self.total_pages)
    }
}

impl Default for PagerControls {
    fn default() -> Self {
        Self {
            visible: false,
            page: 1,
            total_pages: 1,
            prev_enabled: false,
            next_enabled: false,
        }
    }
}

// ============================================================================
// Rendered View
// ============================================================================

/// One displayed row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Row {
    /// Month header. `continued` marks a group carried over from the previous page.
    Header { label: String, continued: bool },
    /// Snapshot index of a visible entry.
    Entry { index: usize },
}

/// Everything the display needs for the current state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderedView {
    pub rows: Vec<Row>,
    /// Entries matching both filters, across all pages.
    pub matched: usize,
    /// Matching entries left out of the month grouping for lack of a date.
    pub hidden_undated: usize,
    pub pager: PagerControls,
}

impl RenderedView {
    /// Snapshot indices of the visible entries, in display order.
    pub fn entry_indices(&self) -> Vec<usize> {
        self.rows
            .iter()
            .filter_map(|row| match row {
                Row::Entry { index } => Some(*index),
                Row::Header { .. } => None,
            })
            .collect()
    }

    pub fn visible_entries(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| matches!(row, Row::Entry { .. }))
            .count()
    }
}

// ============================================================================
// Coordinator
// ============================================================================

/// Owns one listing snapshot, its view state and its controls.
///
/// Independent coordinators share nothing, so several can coexist.
pub struct Coordinator {
    listing: Listing,
    search_term: String,
    search: SearchBox,
    text_filter: TextFilter,
    categories: CategoryBar,
    paginator: Paginator,
    view: RenderedView,
}

impl Coordinator {
    pub fn new(listing: Listing, page_size: usize) -> Self {
        Self::with_state(listing, page_size, ViewState::default())
    }

    /// Build a coordinator already showing `state` (page clamped, unavailable
    /// category replaced by All).
    pub fn with_state(listing: Listing, page_size: usize, state: ViewState) -> Self {
        let categories = CategoryBar::build(&listing);
        let mut coordinator = Self {
            listing,
            search_term: String::new(),
            search: SearchBox::default(),
            text_filter: TextFilter::default(),
            categories,
            paginator: Paginator::new(page_size),
            view: RenderedView::default(),
        };

        coordinator.set_search(&state.search_term);
        if coordinator.categories.offers(state.category) {
            coordinator.categories.active = state.category;
        }
        coordinator.recompute();
        coordinator.paginator.go_to(state.current_page);
        coordinator.recompute();
        coordinator
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    pub fn kind(&self) -> PageKind {
        self.listing.kind
    }

    pub fn entry(&self, index: usize) -> Option<&Entry> {
        self.listing.entries.get(index)
    }

    pub fn view(&self) -> &RenderedView {
        &self.view
    }

    pub fn search_box(&self) -> &SearchBox {
        &self.search
    }

    pub fn category_bar(&self) -> &CategoryBar {
        &self.categories
    }

    pub fn page_size(&self) -> usize {
        self.paginator.page_size()
    }

    /// The current view state as a value.
    pub fn state(&self) -> ViewState {
        ViewState {
            search_term: self.search_term.clone(),
            category: self.categories.active,
            current_page: self.paginator.current(),
        }
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    /// New search term: back to page 1.
    pub fn on_search_input(&mut self, term: &str) -> &RenderedView {
        self.set_search(term);
        self.paginator.reset();
        self.recompute()
    }

    /// Append one character to the search term.
    pub fn on_search_push(&mut self, c: char) -> &RenderedView {
        let mut term = self.search.value().to_string();
        term.push(c);
        self.on_search_input(&term)
    }

    /// Remove the last character of the search term.
    pub fn on_search_pop(&mut self) -> &RenderedView {
        let mut term = self.search.value().to_string();
        term.pop();
        self.on_search_input(&term)
    }

    /// New category: back to page 1. Categories this listing does not offer
    /// are ignored.
    pub fn on_category_select(&mut self, category: Category) -> &RenderedView {
        if !self.categories.offers(category) {
            tracing::debug!(?category, kind = ?self.listing.kind, "Category not offered");
            return &self.view;
        }
        self.categories.active = category;
        self.paginator.reset();
        self.recompute()
    }

    /// Move between pages. Filters are untouched.
    pub fn on_page_navigate(&mut self, direction: Direction) -> &RenderedView {
        self.paginator.navigate(direction);
        self.recompute()
    }

    /// Run the pipeline for the current state.
    pub fn recompute(&mut self) -> &RenderedView {
        let category = self.categories.active;
        let filtered: Vec<usize> = self
            .listing
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| category.matches(e) && self.text_filter.matches(e))
            .map(|(i, _)| i)
            .collect();
        let matched = filtered.len();

        let (rows, hidden_undated) = if self.listing.groups_by_month() {
            let grouping = grouping::group(&self.listing.entries, &filtered);
            let hidden = grouping.undated.len();
            (self.grouped_rows(&grouping), hidden)
        } else {
            (self.flat_rows(&filtered), 0)
        };

        let pager = PagerControls {
            visible: self.paginator.total_pages() > 1,
            page: self.paginator.current(),
            total_pages: self.paginator.total_pages(),
            prev_enabled: self.paginator.current() > 1,
            next_enabled: self.paginator.current() < self.paginator.total_pages(),
        };

        tracing::trace!(
            search = %self.search_term,
            ?category,
            page = pager.page,
            total_pages = pager.total_pages,
            matched,
            hidden_undated,
            "Recomputed view"
        );

        self.view = RenderedView {
            rows,
            matched,
            hidden_undated,
            pager,
        };
        &self.view
    }

    fn set_search(&mut self, term: &str) {
        self.search.set(term);
        self.search_term = self.search.value().to_string();
        self.text_filter = TextFilter::new(&self.search_term);
    }

    fn flat_rows(&mut self, filtered: &[usize]) -> Vec<Row> {
        self.paginator.set_len(filtered.len());
        self.paginator
            .page(filtered)
            .items
            .iter()
            .map(|&index| Row::Entry { index })
            .collect()
    }

    /// Paginate the grouped order. Page slots count entries only; a header is
    /// emitted before the first entry of each group present on the page, and
    /// never for a group with no entries on it.
    fn grouped_rows(&mut self, grouping: &Grouping) -> Vec<Row> {
        let ordered = grouping.ordered_entries();
        self.paginator.set_len(ordered.len());
        let page = self.paginator.page(&ordered);

        let mut rows = Vec::with_capacity(page.items.len() + grouping.groups.len());
        let mut current_group = None;
        for (pos, &(group, index)) in page.items.iter().enumerate() {
            if current_group != Some(group) {
                let continued = pos == 0
                    && page.offset > 0
                    && ordered
                        .get(page.offset - 1)
                        .is_some_and(|&(prev, _)| prev == group);
                rows.push(Row::Header {
                    label: grouping.groups[group].label.clone(),
                    continued,
                });
                current_group = Some(group);
            }
            rows.push(Row::Entry { index });
        }
        rows
    }
}

// ============================================================================
// Tests
// ============================================================================
