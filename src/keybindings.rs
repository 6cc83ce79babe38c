//! Keybinding registry: maps keys to listing actions, with config overrides.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavDown,
    NavUp,
    EnterSearch,
    ExitSearch,
    CommitSearch,
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    ShowAll,
    ShowPublished,
    ShowDrafts,
    ShowStarred,
    CycleCategory,
    CycleTheme,
    ShowHelp,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit",
            Self::NavDown => "Select next entry",
            Self::NavUp => "Select previous entry",
            Self::EnterSearch => "Search posts",
            Self::ExitSearch => "Clear search and leave search box",
            Self::CommitSearch => "Keep search and leave search box",
            Self::NextPage => "Next page",
            Self::PrevPage => "Previous page",
            Self::FirstPage => "First page",
            Self::LastPage => "Last page",
            Self::ShowAll => "Show all posts",
            Self::ShowPublished => "Show published posts",
            Self::ShowDrafts => "Show drafts",
            Self::ShowStarred => "Show starred pages",
            Self::CycleCategory => "Cycle category filter",
            Self::CycleTheme => "Cycle theme",
            Self::ShowHelp => "Show help",
        }
    }
}

// ============================================================================
// Context Enum
// ============================================================================

/// Dispatch context: determines which bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Global,
    /// The search box has focus. Printable keys are text, not actions.
    Search,
}

impl Context {
    pub fn label(self) -> &'static str {
        match self {
            Self::Global => "Listing",
            Self::Search => "Search",
        }
    }
}

// ============================================================================
// Key Combination
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    const fn char(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }
}

/// Parse a key string from config into a KeySpec.
///
/// Supported formats:
/// - Single char: "q", "n", "/"
/// - Named keys: "Enter", "Esc", "Tab", "Up", "Down", "Left", "Right",
///   "Home", "End", "PageUp", "PageDown", "Backspace", "Space"
/// - Modifier combos: "Ctrl+n"
/// - Function keys: "F1" through "F12"
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let mut chars = rest.trim().chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Some(KeySpec::ctrl(c)),
            _ => None,
        };
    }

    let named = match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "home" => Some(KeyCode::Home),
        "end" => Some(KeyCode::End),
        "pageup" => Some(KeyCode::PageUp),
        "pagedown" => Some(KeyCode::PageDown),
        "backspace" => Some(KeyCode::Backspace),
        "space" => Some(KeyCode::Char(' ')),
        _ => None,
    };
    if let Some(code) = named {
        return Some(KeySpec::plain(code));
    }

    if let Some(n) = s
        .strip_prefix(|c: char| c == 'F' || c == 'f')
        .and_then(|rest| rest.parse::<u8>().ok())
    {
        return (1..=12).contains(&n).then(|| KeySpec::plain(KeyCode::F(n)));
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(KeySpec::char(c)),
        _ => None,
    }
}

/// Format a KeySpec for the help screen.
fn format_key(key: &KeySpec) -> String {
    let modifier = if key.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else {
        ""
    };

    let key_name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };

    format!("{}{}", modifier, key_name)
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Keybindings by context, with defaults and config overrides.
///
/// The same key can map to different actions in different contexts; lookups
/// fall back to Global.
pub struct KeybindingRegistry {
    lookup: HashMap<(Context, KeySpec), Action>,
    /// In registration order, for the help screen.
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        registry.register_defaults();
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    fn register_defaults(&mut self) {
        use Action::*;

        let global = [
            (KeySpec::char('q'), Quit),
            (KeySpec::char('j'), NavDown),
            (KeySpec::plain(KeyCode::Down), NavDown),
            (KeySpec::char('k'), NavUp),
            (KeySpec::plain(KeyCode::Up), NavUp),
            (KeySpec::char('/'), EnterSearch),
            (KeySpec::char('n'), NextPage),
            (KeySpec::plain(KeyCode::Right), NextPage),
            (KeySpec::char('p'), PrevPage),
            (KeySpec::plain(KeyCode::Left), PrevPage),
            (KeySpec::char('g'), FirstPage),
            (KeySpec::char('G'), LastPage),
            (KeySpec::char('1'), ShowAll),
            (KeySpec::char('2'), ShowPublished),
            (KeySpec::char('3'), ShowDrafts),
            (KeySpec::char('4'), ShowStarred),
            (KeySpec::char('c'), CycleCategory),
            (KeySpec::char('T'), CycleTheme),
            (KeySpec::char('?'), ShowHelp),
        ];
        for (key, action) in global {
            self.bind(Context::Global, key, action);
        }

        // Only non-printable keys here: everything printable is search text.
        let search = [
            (KeySpec::plain(KeyCode::Esc), ExitSearch),
            (KeySpec::plain(KeyCode::Enter), CommitSearch),
            (KeySpec::plain(KeyCode::Down), NavDown),
            (KeySpec::plain(KeyCode::Up), NavUp),
        ];
        for (key, action) in search {
            self.bind(Context::Search, key, action);
        }
    }

    /// Apply user overrides from the config `[keybindings]` table.
    ///
    /// Keys are action names ("next_page"), values are key strings ("l",
    /// "Ctrl+n", "F5"). The new key replaces every default key for that action,
    /// in every context the action was bound in.
    ///
    /// Returns warnings for unknown action names or unparseable keys.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        // Sorted for deterministic results when two overrides share a key.
        let mut overrides: Vec<(&String, &String)> = overrides.iter().collect();
        overrides.sort();

        for (action_name, key_str) in overrides {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };
            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            let mut contexts: Vec<Context> = self
                .bindings
                .iter()
                .filter(|(_, _, a)| *a == action)
                .map(|(c, _, _)| *c)
                .collect();
            contexts.dedup();

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);
            for ctx in contexts {
                self.bind(ctx, key, action);
            }

            tracing::info!(
                action = %action_name,
                key = %key_str,
                "Applied keybinding override"
            );
        }

        warnings
    }

    /// Look up the action for a key, trying `context` first and then Global.
    ///
    /// In the search context only non-character keys fall back to Global, so
    /// typing "q" into the search box never quits.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        let key = KeySpec::new(code, modifiers);

        if let Some(&action) = self.lookup.get(&(context, key)) {
            return Some(action);
        }

        let typed_text =
            matches!(code, KeyCode::Char(_)) && !modifiers.contains(KeyModifiers::CONTROL);
        if context == Context::Search && typed_text {
            return None;
        }
        if context != Context::Global {
            return self.lookup.get(&(Context::Global, key)).copied();
        }
        None
    }

    /// All bindings for the help screen: (context, key, action, description).
    pub fn all_bindings(&self) -> Vec<(Context, String, Action, &'static str)> {
        self.bindings
            .iter()
            .map(|(ctx, key, action)| (*ctx, format_key(key), *action, action.describe()))
            .collect()
    }

    /// First key bound to `action`, for inline hints.
    pub fn key_for(&self, action: Action) -> Option<String> {
        self.bindings
            .iter()
            .find(|(_, _, a)| *a == action)
            .map(|(_, key, _)| format_key(key))
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an action name from config.
fn parse_action_name(name: &str) -> Option<Action> {
    match name.to_lowercase().replace('-', "_").as_str() {
        "quit" => Some(Action::Quit),
        "nav_down" | "down" => Some(Action::NavDown),
        "nav_up" | "up" => Some(Action::NavUp),
        "enter_search" | "search" => Some(Action::EnterSearch),
        "exit_search" => Some(Action::ExitSearch),
        "commit_search" => Some(Action::CommitSearch),
        "next_page" | "next" => Some(Action::NextPage),
        "prev_page" | "previous_page" | "prev" => Some(Action::PrevPage),
        "first_page" | "first" => Some(Action::FirstPage),
        "last_page" | "last" => Some(Action::LastPage),
        "show_all" | "all" => Some(Action::ShowAll),
        "show_published" | "published" => Some(Action::ShowPublished),
        "show_drafts" | "drafts" => Some(Action::ShowDrafts),
        "show_starred" | "starred" => Some(Action::ShowStarred),
        "cycle_category" | "category" => Some(Action::CycleCategory),
        "cycle_theme" | "theme" => Some(Action::CycleTheme),
        "show_help" | "help" => Some(Action::ShowHelp),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
