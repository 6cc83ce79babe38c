//! Entry snapshot captured from the dashboard's post-listing markup.
//!
//! The dashboard renders its listing as a `ul.post-list` of `li` entries, each
//! with a title link, an optional `<small>` status marker and an optional
//! `<time datetime="...">`. An `<h1>` names the page. Capture walks the markup
//! once with a tolerant tokenizer and produces an immutable [`Listing`]; every
//! later step works from that snapshot and never reads rendered output back.
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;

/// Default status text marking an entry as a draft.
pub const DEFAULT_DRAFT_MARKER: &str = "not published";

/// Upper bound on the markup we are willing to scan (16 MB).
pub const MAX_LISTING_SIZE: usize = 16 * 1024 * 1024;

/// Elements that never have a closing tag in HTML.
const VOID_ELEMENTS: [&[u8]; 14] = [
    b"area", b"base", b"br", b"col", b"embed", b"hr", b"img", b"input", b"link", b"meta",
    b"param", b"source", b"track", b"wbr",
];

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Listing markup could not be tokenized near byte {position}: {message}")]
    Markup { position: u64, message: String },

    #[error("Listing is too large: {0} bytes (max {MAX_LISTING_SIZE} bytes)")]
    TooLarge(usize),
}

// ============================================================================
// Entry Model
// ============================================================================

/// Which dashboard listing the markup came from, as named by its heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    /// Blog posts. Entries are grouped by month.
    Posts,
    /// Standalone pages. The starred quick filter is offered.
    Pages,
    /// Analytics dashboard. Nothing to organize.
    Analytics,
    Other,
}

impl PageKind {
    /// Classify a heading's text.
    pub fn from_heading(heading: &str) -> Self {
        let heading = heading.to_lowercase();
        if heading.contains("analytics") {
            Self::Analytics
        } else if heading.contains("post") || heading.contains("blog") {
            Self::Posts
        } else if heading.contains("page") {
            Self::Pages
        } else {
            Self::Other
        }
    }
}

/// One post entry as it appeared on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub title: String,
    /// Full visible text of the entry, whitespace collapsed.
    pub text: String,
    pub is_draft: bool,
    pub published_at: Option<NaiveDate>,
    pub is_starred: bool,
    #[serde(skip)]
    haystack: String,
}

impl Entry {
    pub fn new(
        title: impl Into<String>,
        text: impl Into<String>,
        is_draft: bool,
        published_at: Option<NaiveDate>,
        is_starred: bool,
    ) -> Self {
        let text = text.into();
        Self {
            title: title.into(),
            haystack: text.to_lowercase(),
            text,
            is_draft,
            published_at,
            is_starred,
        }
    }

    /// Lowercased full text, computed once at capture for the text filter.
    pub fn haystack(&self) -> &str {
        &self.haystack
    }
}

/// Settings that shape how entries are derived from markup.
#[derive(Debug, Clone)]
pub struct CaptureOptions {
    /// Exact titles that count as starred.
    pub starred_titles: HashSet<String>,
    /// Case-insensitive text inside `<small>` that marks a draft.
    pub draft_marker: String,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            starred_titles: HashSet::new(),
            draft_marker: DEFAULT_DRAFT_MARKER.to_string(),
        }
    }
}

/// Immutable snapshot of a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub kind: PageKind,
    pub entries: Vec<Entry>,
}

impl Listing {
    pub fn new(kind: PageKind, entries: Vec<Entry>) -> Self {
        Self { kind, entries }
    }

    /// A listing with nothing in it. Every operation on it is a no-op.
    pub fn empty(kind: PageKind) -> Self {
        Self::new(kind, Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Only the posts listing is reorganized into month buckets.
    pub fn groups_by_month(&self) -> bool {
        self.kind == PageKind::Posts
    }
}

/// Parse an entry's `datetime` attribute into a calendar date.
///
/// Accepts RFC 3339 (the date is taken in the timestamp's own offset), naive
/// ISO date-times and plain `YYYY-MM-DD`. Anything else yields `None`.
pub fn parse_published(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

// ============================================================================
// Capture
// ============================================================================

/// Entry under construction. Depths are positions in the open-element stack.
struct EntryDraft {
    depth: usize,
    title: String,
    title_depth: Option<usize>,
    title_done: bool,
    text: String,
    marker: String,
    marker_depth: Option<usize>,
    datetime: Option<String>,
}

impl EntryDraft {
    fn new(depth: usize) -> Self {
        Self {
            depth,
            title: String::new(),
            title_depth: None,
            title_done: false,
            text: String::new(),
            marker: String::new(),
            marker_depth: None,
            datetime: None,
        }
    }

    fn finish(self, options: &CaptureOptions, draft_marker: &str) -> Entry {
        let text = collapse_whitespace(&self.text);
        let title = match collapse_whitespace(&self.title) {
            t if t.is_empty() => text.clone(),
            t => t,
        };
        let is_draft =
            !draft_marker.is_empty() && self.marker.to_lowercase().contains(draft_marker);
        let published_at = self.datetime.as_deref().and_then(parse_published);
        if self.datetime.is_some() && published_at.is_none() {
            tracing::debug!(title = %title, raw = ?self.datetime, "Unparseable entry date");
        }
        let is_starred = options.starred_titles.contains(&title);
        Entry::new(title, text, is_draft, published_at, is_starred)
    }
}

/// Walk state for a single capture pass.
struct Capture<'o> {
    options: &'o CaptureOptions,
    draft_marker: String,
    stack: Vec<Vec<u8>>,
    heading: Option<String>,
    heading_depth: Option<usize>,
    container_depth: Option<usize>,
    container_closed: bool,
    entry: Option<EntryDraft>,
    entries: Vec<Entry>,
}

impl<'o> Capture<'o> {
    fn new(options: &'o CaptureOptions) -> Self {
        Self {
            options,
            draft_marker: options.draft_marker.trim().to_lowercase(),
            stack: Vec::new(),
            heading: None,
            heading_depth: None,
            container_depth: None,
            container_closed: false,
            entry: None,
            entries: Vec::new(),
        }
    }

    fn in_container(&self) -> bool {
        self.container_depth.is_some() && !self.container_closed
    }

    /// Handle an opening tag. Regions are only tracked for elements that will
    /// actually sit on the stack; void and self-closing tags contribute
    /// attributes only.
    fn open(&mut self, e: &BytesStart<'_>, reader: &Reader<&[u8]>, self_closing: bool) {
        let name = e.name().as_ref().to_ascii_lowercase();
        let depth = self.stack.len();
        let pushed = !self_closing && !VOID_ELEMENTS.contains(&name.as_slice());

        match name.as_slice() {
            b"h1" if pushed && self.heading.is_none() => {
                self.heading_depth = Some(depth);
                self.heading = Some(String::new());
            }
            b"ul" if pushed && self.container_depth.is_none() => {
                if has_class(e, reader, "post-list") {
                    self.container_depth = Some(depth);
                }
            }
            b"li" if pushed && self.in_container() && self.entry.is_none() => {
                self.entry = Some(EntryDraft::new(depth));
            }
            b"a" if pushed => {
                if let Some(entry) = self.entry.as_mut() {
                    if !entry.title_done && entry.title_depth.is_none() {
                        entry.title_depth = Some(depth);
                    }
                }
            }
            b"small" if pushed => {
                if let Some(entry) = self.entry.as_mut() {
                    if entry.marker_depth.is_none() {
                        entry.marker_depth = Some(depth);
                    }
                }
            }
            b"time" => {
                if let Some(entry) = self.entry.as_mut() {
                    if entry.datetime.is_none() {
                        entry.datetime = attribute(e, reader, b"datetime");
                    }
                }
            }
            _ => {}
        }

        if pushed {
            self.stack.push(name);
        }
    }

    /// Handle a closing tag: pop back to the matching open element. Unmatched
    /// end tags are ignored.
    fn close(&mut self, name: &[u8]) {
        let name = name.to_ascii_lowercase();
        if let Some(pos) = self.stack.iter().rposition(|open| *open == name) {
            self.stack.truncate(pos);
            self.settle();
        }
    }

    /// End every tracked region whose element is no longer open.
    fn settle(&mut self) {
        let open = self.stack.len();

        if matches!(self.heading_depth, Some(d) if open <= d) {
            self.heading_depth = None;
        }

        if let Some(entry) = self.entry.as_mut() {
            if matches!(entry.title_depth, Some(d) if open <= d) {
                entry.title_depth = None;
                entry.title_done = true;
            }
            if matches!(entry.marker_depth, Some(d) if open <= d) {
                entry.marker_depth = None;
            }
        }

        if matches!(&self.entry, Some(entry) if open <= entry.depth) {
            self.finish_entry();
        }

        if !self.container_closed && matches!(self.container_depth, Some(d) if open <= d) {
            self.finish_entry();
            self.container_closed = true;
        }
    }

    fn finish_entry(&mut self) {
        if let Some(draft) = self.entry.take() {
            let entry = draft.finish(self.options, &self.draft_marker);
            self.entries.push(entry);
        }
    }

    /// Text nodes are appended as-is, like the DOM's `textContent`; inline
    /// elements never introduce a separator. Whitespace is collapsed once the
    /// entry is finished.
    fn text(&mut self, text: &str) {
        if self.heading_depth.is_some() {
            if let Some(heading) = self.heading.as_mut() {
                heading.push_str(text);
            }
        }
        if let Some(entry) = self.entry.as_mut() {
            entry.text.push_str(text);
            if entry.title_depth.is_some() {
                entry.title.push_str(text);
            }
            if entry.marker_depth.is_some() {
                entry.marker.push_str(text);
            }
        }
    }

    fn finish(mut self) -> Listing {
        // Markup that ends mid-entry still yields that entry.
        self.finish_entry();

        let Some(heading) = self.heading.as_deref() else {
            tracing::debug!("No page heading found, nothing to organize");
            return Listing::empty(PageKind::Other);
        };
        let kind = PageKind::from_heading(&collapse_whitespace(heading));

        if self.container_depth.is_none() {
            tracing::debug!(?kind, "No post-list container found, nothing to organize");
            return Listing::empty(kind);
        }
        if kind == PageKind::Analytics {
            tracing::debug!("Analytics page, nothing to organize");
            return Listing::empty(kind);
        }

        tracing::debug!(
            ?kind,
            entries = self.entries.len(),
            drafts = self.entries.iter().filter(|e| e.is_draft).count(),
            undated = self.entries.iter().filter(|e| e.published_at.is_none()).count(),
            "Captured listing"
        );
        Listing::new(kind, self.entries)
    }
}

/// Capture the entry snapshot from a dashboard listing page.
///
/// Runs once, in document order. Missing structure (no heading, no
/// `ul.post-list`, no `li` entries) is not an error: the returned listing is
/// simply empty and every later step becomes a no-op. Only markup that cannot
/// be tokenized at all is reported.
pub fn capture(html: &str, options: &CaptureOptions) -> Result<Listing, CaptureError> {
    if html.len() > MAX_LISTING_SIZE {
        return Err(CaptureError::TooLarge(html.len()));
    }

    let mut reader = Reader::from_str(html);
    {
        let config = reader.config_mut();
        config.check_end_names = false;
        config.allow_unmatched_ends = true;
        config.check_comments = false;
    }

    let mut walk = Capture::new(options);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.name().as_ref().to_ascii_lowercase();
                if name == b"script" || name == b"style" {
                    // Raw text bodies: skip without tokenizing.
                    let end = e.to_end().into_owned();
                    reader
                        .read_text(end.name())
                        .map_err(|err| markup_error(&reader, err))?;
                    continue;
                }
                walk.open(&e, &reader, false);
            }
            Ok(Event::Empty(e)) => walk.open(&e, &reader, true),
            Ok(Event::End(e)) => walk.close(e.name().as_ref()),
            Ok(Event::Text(t)) => walk.text(&decode_entities(&String::from_utf8_lossy(&t))),
            Ok(Event::CData(c)) => walk.text(&String::from_utf8_lossy(&c)),
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => return Err(markup_error(&reader, err)),
        }
    }

    Ok(walk.finish())
}

// ============================================================================
// Markup Helpers
// ============================================================================

fn markup_error(reader: &Reader<&[u8]>, err: quick_xml::Error) -> CaptureError {
    CaptureError::Markup {
        position: reader.error_position() as u64,
        message: err.to_string(),
    }
}

/// Look up an attribute by name (ASCII case-insensitive), HTML rules.
fn attribute(e: &BytesStart<'_>, reader: &Reader<&[u8]>, key: &[u8]) -> Option<String> {
    for attr in e.html_attributes() {
        let attr = match attr {
            Ok(attr) => attr,
            Err(err) => {
                tracing::debug!(error = %err, "Skipping malformed attribute");
                continue;
            }
        };
        if attr.key.as_ref().eq_ignore_ascii_case(key) {
            let value = match attr.decode_and_unescape_value(reader.decoder()) {
                Ok(value) => value.into_owned(),
                Err(_) => decode_entities(&String::from_utf8_lossy(&attr.value)),
            };
            return Some(value);
        }
    }
    None
}

fn has_class(e: &BytesStart<'_>, reader: &Reader<&[u8]>, class: &str) -> bool {
    attribute(e, reader, b"class")
        .is_some_and(|value| value.split_whitespace().any(|c| c == class))
}

/// Resolve XML builtins, numeric references and the HTML entities dashboards
/// actually emit. Text with anything else is kept verbatim.
fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    quick_xml::escape::unescape_with(raw, |name| {
        quick_xml::escape::resolve_predefined_entity(name).or_else(|| html_entity(name))
    })
    .map(|text| text.into_owned())
    .unwrap_or_else(|_| raw.to_string())
}

fn html_entity(name: &str) -> Option<&'static str> {
    match name {
        "nbsp" => Some("\u{a0}"),
        "mdash" => Some("\u{2014}"),
        "ndash" => Some("\u{2013}"),
        "hellip" => Some("\u{2026}"),
        "lsquo" => Some("\u{2018}"),
        "rsquo" => Some("\u{2019}"),
        "ldquo" => Some("\u{201c}"),
        "rdquo" => Some("\u{201d}"),
        "middot" => Some("\u{b7}"),
        "copy" => Some("\u{a9}"),
        _ => None,
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ============================================================================
// Tests
// ============================================================================
