//! Configuration file parser for ~/.config/postdeck/config.toml.
//!
//! The config file is optional: a missing or empty file yields
//! `Config::default()`. Unknown keys are accepted but logged as warnings since
//! they are usually typos.
use crate::listing::{CaptureOptions, DEFAULT_DRAFT_MARKER};
use crate::pagination::DEFAULT_PAGE_SIZE;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Invalid value for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

// ============================================================================
// Configuration
// ============================================================================

/// Top-level configuration. Any subset of keys may be given.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// "dark" or "light".
    pub theme: String,

    /// Entries per page. Must be at least 1.
    pub page_size: usize,

    /// Entry titles that count as starred (exact match).
    pub starred_titles: Vec<String>,

    /// Status text that marks an entry as a draft (case-insensitive).
    pub draft_marker: String,

    /// Narrowest terminal the listing is drawn in.
    pub min_width: u16,

    /// Keybinding overrides: action name to key string.
    pub keybindings: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            starred_titles: Vec::new(),
            draft_marker: DEFAULT_DRAFT_MARKER.to_string(),
            min_width: 60,
            keybindings: HashMap::new(),
        }
    }
}

const KNOWN_KEYS: [&str; 6] = [
    "theme",
    "page_size",
    "starred_titles",
    "draft_marker",
    "min_width",
    "keybindings",
];

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// `~/.config/postdeck/config.toml`, if `HOME` is set.
    pub fn default_path() -> Option<PathBuf> {
        std::env::var_os("HOME").map(|home| {
            PathBuf::from(home)
                .join(".config")
                .join("postdeck")
                .join("config.toml")
        })
    }

    /// Load configuration from a TOML file.
    ///
    /// - Missing or empty file: `Ok(Config::default())`
    /// - Invalid TOML or wrong types: `Err(ConfigError::Parse)`
    /// - Out-of-range values: `Err(ConfigError::Invalid)`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        let config = Self::parse(&content)?;
        tracing::info!(
            path = %path.display(),
            theme = %config.theme,
            page_size = config.page_size,
            starred = config.starred_titles.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Parse and validate config text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid {
                key: "page_size",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Capture settings derived from this config.
    pub fn capture_options(&self) -> CaptureOptions {
        CaptureOptions {
            starred_titles: self.starred_titles.iter().cloned().collect(),
            draft_marker: self.draft_marker.clone(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_config(test: &str, content: &str) -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir().join(format!("postdeck_config_test_{}", test));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.theme, "dark");
        assert_eq!(config.page_size, 20);
        assert!(config.starred_titles.is_empty());
        assert_eq!(config.draft_marker, "not published");
        assert_eq!(config.min_width, 60);
        assert!(config.keybindings.is_empty());
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/postdeck_test_nonexistent_config.toml");
        assert_eq!(Config::load(path).unwrap(), Config::default());
    }

    #[test]
    fn test_whitespace_only_file_returns_default() {
        let (dir, path) = write_config("whitespace", "   \n  \n  ");
        assert_eq!(Config::load(&path).unwrap(), Config::default());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let (dir, path) = write_config("partial", "page_size = 5\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.page_size, 5);
        assert_eq!(config.theme, "dark");
        assert_eq!(config.draft_marker, "not published");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_full_config() {
        let content = r#"
theme = "light"
page_size = 10
starred_titles = ["Now", "Uses"]
draft_marker = "hidden"
min_width = 80

[keybindings]
quit = "Ctrl+q"
next_page = "l"
"#;
        let (dir, path) = write_config("full", content);
        let config = Config::load(&path).unwrap();
        assert_eq!(config.theme, "light");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.starred_titles, vec!["Now", "Uses"]);
        assert_eq!(config.draft_marker, "hidden");
        assert_eq!(config.min_width, 80);
        assert_eq!(
            config.keybindings.get("next_page").map(String::as_str),
            Some("l")
        );
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let err = Config::parse("page_size = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "page_size", .. }));
        assert!(err.to_string().contains("page_size"));
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let (dir, path) = write_config("invalid", "this is not [valid toml");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_wrong_type_returns_error() {
        assert!(matches!(
            Config::parse("page_size = \"twenty\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let config = Config::parse("theme = \"dark\"\nrefresh_interval = 5\n").unwrap();
        assert_eq!(config.theme, "dark");
    }

    #[test]
    fn test_too_large_file_rejected() {
        let (dir, path) = write_config("too_large", &"a".repeat(1_048_577));
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        assert!(err.to_string().contains("too large"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_capture_options_from_config() {
        let config = Config::parse("starred_titles = [\"Now\"]\ndraft_marker = \"WIP\"\n").unwrap();
        let options = config.capture_options();
        assert!(options.starred_titles.contains("Now"));
        assert_eq!(options.draft_marker, "WIP");
    }
}
