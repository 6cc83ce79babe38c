//! Calendar-month grouping of captured entries.
//!
//! Groups are keyed by `(year, month)` of the entry's publish date and ordered
//! newest first. Members are snapshot indices and keep their input order.
//! Entries without a date never land in a group; they are reported separately
//! in [`Grouping::undated`].
use crate::listing::Entry;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Calendar month bucket key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Long month name and numeric year, e.g. "March 2024".
    pub fn label(self) -> String {
        match self.first_day() {
            Some(day) => day.format("%B %Y").to_string(),
            None => format!("{}-{:02}", self.year, self.month),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGroup {
    pub key: MonthKey,
    pub label: String,
    /// Snapshot indices, in input order.
    pub entries: Vec<usize>,
}

/// One item of a flattened grouping: a header marker or an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupedItem {
    /// Index into [`Grouping::groups`].
    Header(usize),
    /// Snapshot index.
    Entry(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Grouping {
    pub groups: Vec<MonthGroup>,
    /// Entries left out because they have no usable date.
    pub undated: Vec<usize>,
}

impl Grouping {
    /// Number of entries placed in a group.
    pub fn grouped_len(&self) -> usize {
        self.groups.iter().map(|g| g.entries.len()).sum()
    }

    /// Headers interleaved with their entries, in group order.
    pub fn flatten(&self) -> Vec<GroupedItem> {
        let mut items = Vec::with_capacity(self.groups.len() + self.grouped_len());
        for (g, group) in self.groups.iter().enumerate() {
            items.push(GroupedItem::Header(g));
            items.extend(group.entries.iter().copied().map(GroupedItem::Entry));
        }
        items
    }

    /// Grouped entries in display order, each with the index of its group.
    ///
    /// This is `flatten` with each header folded into the entries after it.
    pub fn ordered_entries(&self) -> Vec<(usize, usize)> {
        let mut current = 0;
        self.flatten()
            .into_iter()
            .filter_map(|item| match item {
                GroupedItem::Header(g) => {
                    current = g;
                    None
                }
                GroupedItem::Entry(i) => Some((current, i)),
            })
            .collect()
    }
}

/// Group `indices` (into `entries`) by calendar month, newest month first.
///
/// Indices that do not resolve to an entry are dropped.
pub fn group(entries: &[Entry], indices: &[usize]) -> Grouping {
    let mut buckets: BTreeMap<Reverse<MonthKey>, Vec<usize>> = BTreeMap::new();
    let mut undated = Vec::new();

    for &index in indices {
        let Some(entry) = entries.get(index) else {
            tracing::debug!(index, "Ignoring out-of-range entry index");
            continue;
        };
        match entry.published_at {
            Some(date) => buckets
                .entry(Reverse(MonthKey::of(date)))
                .or_default()
                .push(index),
            None => undated.push(index),
        }
    }

    let groups = buckets
        .into_iter()
        .map(|(Reverse(key), entries)| MonthGroup {
            key,
            label: key.label(),
            entries,
        })
        .collect();

    Grouping { groups, undated }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dated(title: &str, y: i32, m: u32, d: u32) -> Entry {
        Entry::new(title, title, false, NaiveDate::from_ymd_opt(y, m, d), false)
    }

    fn undated(title: &str) -> Entry {
        Entry::new(title, title, false, None, false)
    }

    fn all(entries: &[Entry]) -> Vec<usize> {
        (0..entries.len()).collect()
    }

    #[test]
    fn test_same_month_shares_group_newest_first() {
        let entries = vec![
            dated("a", 2024, 3, 5),
            dated("b", 2024, 3, 28),
            dated("c", 2024, 4, 1),
        ];
        let grouping = group(&entries, &all(&entries));

        let labels: Vec<&str> = grouping.groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["April 2024", "March 2024"]);
        assert_eq!(grouping.groups[0].entries, vec![2]);
        assert_eq!(grouping.groups[1].entries, vec![0, 1]);
        assert!(grouping.undated.is_empty());
    }

    #[test]
    fn test_year_boundary_ordering() {
        let entries = vec![
            dated("dec", 2023, 12, 31),
            dated("jan", 2024, 1, 1),
            dated("nov", 2023, 11, 2),
        ];
        let grouping = group(&entries, &all(&entries));
        let keys: Vec<MonthKey> = grouping.groups.iter().map(|g| g.key).collect();
        assert_eq!(
            keys,
            vec![
                MonthKey { year: 2024, month: 1 },
                MonthKey { year: 2023, month: 12 },
                MonthKey { year: 2023, month: 11 },
            ]
        );
    }

    #[test]
    fn test_members_keep_input_order() {
        // Later day listed first must stay first.
        let entries = vec![
            dated("late", 2024, 5, 30),
            dated("early", 2024, 5, 1),
            dated("mid", 2024, 5, 15),
        ];
        let grouping = group(&entries, &all(&entries));
        assert_eq!(grouping.groups.len(), 1);
        assert_eq!(grouping.groups[0].entries, vec![0, 1, 2]);
    }

    #[test]
    fn test_undated_entries_are_left_out() {
        let entries = vec![dated("a", 2024, 3, 5), undated("b"), dated("c", 2024, 3, 6)];
        let grouping = group(&entries, &all(&entries));
        assert_eq!(grouping.undated, vec![1]);
        assert_eq!(grouping.grouped_len(), 2);
        assert!(grouping.groups.iter().all(|g| !g.entries.contains(&1)));
    }

    #[test]
    fn test_subset_of_indices() {
        let entries = vec![
            dated("a", 2024, 3, 5),
            dated("b", 2024, 4, 5),
            dated("c", 2024, 3, 6),
        ];
        let grouping = group(&entries, &[2, 1]);
        assert_eq!(grouping.groups[0].entries, vec![1]);
        assert_eq!(grouping.groups[1].entries, vec![2]);
    }

    #[test]
    fn test_out_of_range_index_ignored() {
        let entries = vec![dated("a", 2024, 3, 5)];
        let grouping = group(&entries, &[0, 7]);
        assert_eq!(grouping.grouped_len(), 1);
        assert!(grouping.undated.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let grouping = group(&[], &[]);
        assert!(grouping.groups.is_empty());
        assert!(grouping.flatten().is_empty());
    }

    #[test]
    fn test_flatten_then_regroup_is_stable() {
        let entries = vec![
            dated("a", 2024, 3, 5),
            dated("b", 2024, 4, 1),
            undated("c"),
            dated("d", 2023, 12, 24),
            dated("e", 2024, 3, 28),
            dated("f", 2024, 4, 30),
        ];
        let first = group(&entries, &all(&entries));

        let flattened: Vec<usize> = first
            .flatten()
            .into_iter()
            .filter_map(|item| match item {
                GroupedItem::Entry(i) => Some(i),
                GroupedItem::Header(_) => None,
            })
            .collect();
        let second = group(&entries, &flattened);

        assert_eq!(first.groups, second.groups);
        assert_eq!(second.undated, Vec::<usize>::new());
    }

    #[test]
    fn test_flatten_interleaves_headers() {
        let entries = vec![dated("a", 2024, 3, 5), dated("b", 2024, 4, 1)];
        let grouping = group(&entries, &all(&entries));
        assert_eq!(
            grouping.flatten(),
            vec![
                GroupedItem::Header(0),
                GroupedItem::Entry(1),
                GroupedItem::Header(1),
                GroupedItem::Entry(0),
            ]
        );
        assert_eq!(grouping.ordered_entries(), vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn test_ordered_entries_follow_flatten() {
        let entries = vec![
            dated("a", 2024, 4, 1),
            dated("b", 2024, 3, 5),
            dated("c", 2024, 4, 20),
            dated("d", 2023, 12, 31),
            dated("e", 2024, 3, 28),
        ];
        let grouping = group(&entries, &all(&entries));
        assert_eq!(
            grouping.ordered_entries(),
            vec![(0, 0), (0, 2), (1, 1), (1, 4), (2, 3)]
        );
        let entry_count = grouping
            .flatten()
            .iter()
            .filter(|item| matches!(item, GroupedItem::Entry(_)))
            .count();
        assert_eq!(entry_count, grouping.ordered_entries().len());
    }

    #[test]
    fn test_month_label() {
        assert_eq!(MonthKey { year: 2024, month: 3 }.label(), "March 2024");
        assert_eq!(MonthKey { year: 2024, month: 13 }.label(), "2024-13");
    }
}
