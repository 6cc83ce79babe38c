//! Theme system for the TUI.
//!
//! Semantic color roles map to ratatui `Style` values. `ThemeVariant` selects
//! the Dark or Light palette, and `StyleMap` resolves role names to styles.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette
// ============================================================================

/// A style for every semantic UI role.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Entry list --
    pub entry_normal: Style,
    pub entry_selected: Style,
    pub entry_draft: Style,
    pub entry_date: Style,
    pub entry_star: Style,
    pub month_header: Style,

    // -- Controls --
    pub filter_active: Style,
    pub filter_inactive: Style,
    pub search_box: Style,
    pub search_box_active: Style,
    pub pager_enabled: Style,
    pub pager_disabled: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,

    // -- Help overlay --
    pub help_heading: Style,
    pub help_body: Style,
    pub help_hint: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            entry_normal: Style::default(),
            entry_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            entry_draft: Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
            entry_date: Style::default().fg(Color::DarkGray),
            entry_star: Style::default().fg(Color::Yellow),
            month_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),

            filter_active: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            filter_inactive: Style::default().fg(Color::Gray),
            search_box: Style::default(),
            search_box_active: Style::default().fg(Color::Yellow),
            pager_enabled: Style::default().fg(Color::Cyan),
            pager_disabled: Style::default().fg(Color::DarkGray),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),

            help_heading: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            help_body: Style::default(),
            help_hint: Style::default().fg(Color::DarkGray),
        }
    }

    fn light() -> Self {
        Self {
            entry_normal: Style::default().fg(Color::Black),
            entry_selected: Style::default().bg(Color::Blue).fg(Color::White),
            entry_draft: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            entry_date: Style::default().fg(Color::DarkGray),
            entry_star: Style::default().fg(Color::Magenta),
            month_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),

            filter_active: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            filter_inactive: Style::default().fg(Color::DarkGray),
            search_box: Style::default().fg(Color::Black),
            search_box_active: Style::default().fg(Color::Magenta),
            pager_enabled: Style::default().fg(Color::Blue),
            pager_disabled: Style::default().fg(Color::Gray),

            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),

            help_heading: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            help_body: Style::default().fg(Color::Black),
            help_hint: Style::default().fg(Color::DarkGray),
        }
    }
}

// ============================================================================
// Style Map
// ============================================================================

/// String-keyed style lookup built from a `ColorPalette`.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

/// All semantic role names, in declaration order.
const ROLE_NAMES: [&str; 18] = [
    "entry_normal",
    "entry_selected",
    "entry_draft",
    "entry_date",
    "entry_star",
    "month_header",
    "filter_active",
    "filter_inactive",
    "search_box",
    "search_box_active",
    "pager_enabled",
    "pager_disabled",
    "status_bar",
    "panel_border",
    "panel_border_focused",
    "help_heading",
    "help_body",
    "help_hint",
];

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; 18] = [
            p.entry_normal,
            p.entry_selected,
            p.entry_draft,
            p.entry_date,
            p.entry_star,
            p.month_header,
            p.filter_active,
            p.filter_inactive,
            p.search_box,
            p.search_box_active,
            p.pager_enabled,
            p.pager_disabled,
            p.status_bar,
            p.panel_border,
            p.panel_border_focused,
            p.help_heading,
            p.help_body,
            p.help_hint,
        ];

        let map = ROLE_NAMES.iter().copied().zip(styles).collect();
        Self { map }
    }

    /// Resolve a role name. Unknown roles get `Style::default()`.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================
