//! End-to-end: dashboard HTML → capture → coordinator → rendered output.

use postdeck::config::Config;
use postdeck::filter::Category;
use postdeck::listing::{capture, CaptureOptions, PageKind};
use postdeck::pagination::Direction;
use postdeck::report::{render_text, Report};
use postdeck::view::{Coordinator, Row, ViewState};
use pretty_assertions::assert_eq;

/// 45 posts, newest first, four per month from December 2024 back to
/// January 2024. Entries 0, 15 and 30 are drafts.
fn posts_page() -> String {
    let mut items = String::new();
    for i in 0..45u32 {
        let month = 12 - i / 4;
        let day = 28 - (i % 4) * 5;
        let title = match i {
            3 => "Launch Day".to_string(),
            10 => "My Launch Recap".to_string(),
            _ => format!("Post {}", i),
        };
        let marker = if i % 15 == 0 {
            "<small>(not published)</small>"
        } else {
            ""
        };
        items.push_str(&format!(
            "<li><span><time datetime=\"2024-{:02}-{:02}T08:00:00Z\">x</time></span>\
             <a href=\"/p/{}/\">{}</a>{}</li>\n",
            month, day, i, title, marker
        ));
    }
    format!(
        "<html><body><h1>Posts</h1><ul class=\"post-list\">\n{}</ul></body></html>",
        items
    )
}

fn coordinator(page_size: usize) -> Coordinator {
    let listing = capture(&posts_page(), &CaptureOptions::default()).unwrap();
    Coordinator::new(listing, page_size)
}

fn headers(coordinator: &Coordinator) -> Vec<(String, bool)> {
    coordinator
        .view()
        .rows
        .iter()
        .filter_map(|row| match row {
            Row::Header { label, continued } => Some((label.clone(), *continued)),
            Row::Entry { .. } => None,
        })
        .collect()
}

#[test]
fn captured_posts_paginate_into_three_pages() {
    let mut c = coordinator(20);
    assert_eq!(c.kind(), PageKind::Posts);
    assert_eq!(c.listing().len(), 45);
    assert_eq!(c.view().pager.total_pages, 3);
    assert_eq!(c.view().visible_entries(), 20);
    assert_eq!(
        headers(&c).iter().map(|(l, _)| l.as_str()).collect::<Vec<_>>(),
        vec![
            "December 2024",
            "November 2024",
            "October 2024",
            "September 2024",
            "August 2024"
        ]
    );

    c.on_page_navigate(Direction::Last);
    assert_eq!(c.view().visible_entries(), 5);
    assert_eq!(
        headers(&c),
        vec![
            ("February 2024".to_string(), false),
            ("January 2024".to_string(), false)
        ]
    );
    assert!(c.view().pager.prev_enabled);
    assert!(!c.view().pager.next_enabled);
}

#[test]
fn group_split_across_pages_repeats_header() {
    let mut c = coordinator(6);
    c.on_page_navigate(Direction::Next);
    assert_eq!(
        headers(&c),
        vec![
            ("November 2024".to_string(), true),
            ("October 2024".to_string(), false)
        ]
    );
}

#[test]
fn search_matches_case_insensitively() {
    let mut c = coordinator(20);
    c.on_search_input("LAUNCH");
    let titles: Vec<&str> = c
        .view()
        .entry_indices()
        .into_iter()
        .filter_map(|i| c.entry(i))
        .map(|e| e.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Launch Day", "My Launch Recap"]);
    assert_eq!(c.view().matched, 2);
    assert!(!c.view().pager.visible);
}

#[test]
fn drafts_and_published_partition_the_listing() {
    let mut c = coordinator(20);
    let counts: Vec<(Category, usize)> = c
        .category_bar()
        .links()
        .iter()
        .map(|l| (l.category, l.count))
        .collect();
    assert_eq!(
        counts,
        vec![
            (Category::All, 45),
            (Category::Published, 42),
            (Category::Drafts, 3)
        ]
    );

    c.on_category_select(Category::Drafts);
    assert_eq!(c.view().matched, 3);
    c.on_category_select(Category::Published);
    assert_eq!(c.view().matched, 42);
}

#[test]
fn initial_state_from_flags_is_clamped() {
    let listing = capture(&posts_page(), &CaptureOptions::default()).unwrap();
    let state = ViewState {
        search_term: "post".to_string(),
        category: Category::Starred,
        current_page: 99,
    };
    let c = Coordinator::with_state(listing, 20, state);
    let state = c.state();
    assert_eq!(state.category, Category::All);
    assert_eq!(state.current_page, 3);
    assert_eq!(c.view().matched, 43);
}

#[test]
fn config_drives_capture() {
    let config = Config::parse(
        "page_size = 2\nstarred_titles = [\"Now\"]\ndraft_marker = \"wip\"\n",
    )
    .unwrap();
    let html = r#"<h1>Pages</h1><ul class="post-list">
        <li><a>Now</a></li>
        <li><a>Uses</a><small>WIP</small></li>
        <li><a>Colophon</a></li>
    </ul>"#;
    let listing = capture(html, &config.capture_options()).unwrap();
    let mut c = Coordinator::new(listing, config.page_size);
    assert_eq!(c.kind(), PageKind::Pages);
    assert!(c.category_bar().offers(Category::Starred));
    assert_eq!(c.view().pager.total_pages, 2);

    c.on_category_select(Category::Starred);
    assert_eq!(c.view().matched, 1);
    c.on_category_select(Category::Drafts);
    assert_eq!(c.view().matched, 1);
}

#[test]
fn print_output_for_missing_listing() {
    let listing = capture("<html><body><p>Nothing</p></body></html>", &CaptureOptions::default())
        .unwrap();
    let c = Coordinator::new(listing, 20);
    assert_eq!(render_text(&c), "No posts found\n");
}

#[test]
fn json_report_matches_view() {
    let mut c = coordinator(20);
    c.on_page_navigate(Direction::Next);
    let json = Report::new(&c).to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["page"], 2);
    assert_eq!(value["total_pages"], 3);
    assert_eq!(value["rows"][0]["label"], "July 2024");
    assert_eq!(value["rows"][1]["title"], "Post 20");
    assert_eq!(value["rows"][1]["published_at"], "2024-07-28");
}
