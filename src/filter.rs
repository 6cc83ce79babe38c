//! Entry predicates: category quick filters and the free-text filter.
use crate::listing::{Entry, PageKind};
use serde::Serialize;

// ============================================================================
// Category Filter
// ============================================================================

/// Quick filter over an entry's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    All,
    Published,
    Drafts,
    Starred,
}

/// Categories offered on listings without starred entries.
const STANDARD: [Category; 3] = [Category::All, Category::Published, Category::Drafts];
/// Categories offered on the pages listing.
const WITH_STARRED: [Category; 4] = [
    Category::All,
    Category::Published,
    Category::Drafts,
    Category::Starred,
];

impl Category {
    pub fn matches(self, entry: &Entry) -> bool {
        match self {
            Self::All => true,
            Self::Published => !entry.is_draft,
            Self::Drafts => entry.is_draft,
            Self::Starred => entry.is_starred,
        }
    }

    /// Categories a listing of the given kind offers, in display order.
    pub fn available(kind: PageKind) -> &'static [Category] {
        match kind {
            PageKind::Pages => &WITH_STARRED,
            _ => &STANDARD,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Published => "Published",
            Self::Drafts => "Drafts",
            Self::Starred => "Starred",
        }
    }

    /// Parse a category name (case-insensitive, singular accepted).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "published" => Some(Self::Published),
            "drafts" | "draft" => Some(Self::Drafts),
            "starred" | "star" => Some(Self::Starred),
            _ => None,
        }
    }
}

// ============================================================================
// Text Filter
// ============================================================================

/// Case-insensitive literal substring match over an entry's full text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextFilter {
    needle: String,
}

impl TextFilter {
    pub fn new(term: &str) -> Self {
        Self {
            needle: term.to_lowercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// The empty term matches everything.
    pub fn matches(&self, entry: &Entry) -> bool {
        self.needle.is_empty() || entry.haystack().contains(&self.needle)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn entry(title: &str, is_draft: bool, is_starred: bool) -> Entry {
        Entry::new(title, title, is_draft, None, is_starred)
    }

    #[test]
    fn test_category_matches() {
        let published = entry("Hello", false, false);
        let draft = entry("WIP", true, false);
        let starred = entry("Now", false, true);

        assert!(Category::All.matches(&published));
        assert!(Category::All.matches(&draft));
        assert!(Category::Published.matches(&published));
        assert!(!Category::Published.matches(&draft));
        assert!(Category::Drafts.matches(&draft));
        assert!(!Category::Drafts.matches(&published));
        assert!(Category::Starred.matches(&starred));
        assert!(!Category::Starred.matches(&published));
    }

    #[test]
    fn test_drafts_and_published_complement() {
        // 10 entries, 3 drafts
        let entries: Vec<Entry> = (0..10)
            .map(|i| entry(&format!("Post {}", i), i % 4 == 1, false))
            .collect();
        let drafts = entries.iter().filter(|e| Category::Drafts.matches(e)).count();
        let published = entries
            .iter()
            .filter(|e| Category::Published.matches(e))
            .count();
        assert_eq!(drafts, 3);
        assert_eq!(published, 7);
    }

    #[test]
    fn test_available_categories() {
        assert_eq!(
            Category::available(PageKind::Posts),
            &[Category::All, Category::Published, Category::Drafts]
        );
        assert!(Category::available(PageKind::Pages).contains(&Category::Starred));
        assert!(!Category::available(PageKind::Other).contains(&Category::Starred));
    }

    #[test]
    fn test_category_from_str_name() {
        assert_eq!(Category::from_str_name("ALL"), Some(Category::All));
        assert_eq!(Category::from_str_name("draft"), Some(Category::Drafts));
        assert_eq!(Category::from_str_name(" starred "), Some(Category::Starred));
        assert_eq!(Category::from_str_name("archived"), None);
    }

    #[test]
    fn test_text_filter_scenario() {
        let entries = ["Launch Day", "Other", "My Launch Recap"].map(|t| entry(t, false, false));
        let filter = TextFilter::new("launch");
        let matched: Vec<usize> = entries
            .iter()
            .enumerate()
            .filter(|(_, e)| filter.matches(e))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(matched, vec![0, 2]);
    }

    #[test]
    fn test_text_filter_empty_matches_everything() {
        let filter = TextFilter::new("");
        assert!(filter.is_empty());
        assert!(filter.matches(&entry("", false, false)));
        assert!(filter.matches(&entry("Anything", true, false)));
    }

    #[test]
    fn test_text_filter_is_literal() {
        let filter = TextFilter::new("c++ (part 1)");
        assert!(filter.matches(&entry("Learning C++ (Part 1)", false, false)));
        assert!(!TextFilter::new(".*").matches(&entry("anything", false, false)));
    }

    #[test]
    fn test_text_filter_unicode_case() {
        assert!(TextFilter::new("ÉTÉ").matches(&entry("Notes d'été", false, false)));
    }

    proptest! {
        #[test]
        fn prop_published_and_drafts_partition_all(
            flags in proptest::collection::vec((any::<bool>(), any::<bool>()), 0..64)
        ) {
            let entries: Vec<Entry> = flags
                .iter()
                .enumerate()
                .map(|(i, (draft, star))| entry(&format!("e{}", i), *draft, *star))
                .collect();

            for e in &entries {
                // Exactly one of Published/Drafts holds for every entry.
                prop_assert!(Category::Published.matches(e) != Category::Drafts.matches(e));
                prop_assert!(Category::All.matches(e));
                prop_assert_eq!(Category::Starred.matches(e), e.is_starred);
            }

            let published = entries.iter().filter(|e| Category::Published.matches(e)).count();
            let drafts = entries.iter().filter(|e| Category::Drafts.matches(e)).count();
            prop_assert_eq!(published + drafts, entries.len());
        }
    }
}
