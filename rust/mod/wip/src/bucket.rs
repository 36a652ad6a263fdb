//! Date bucketing for the board and the archives.
//!
//! Live shift notes fall into today / yesterday / archivable relative to the
//! shop's local date. Archived orders are keyed by a month label such as
//! "October 2025"; archived notes by their archive day.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Timelike};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Where a live note sits relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteDay {
    Today,
    Yesterday,
    Archivable,
}

fn yesterday_of(today: NaiveDate) -> NaiveDate {
    today.pred_opt().unwrap_or(today)
}

/// Classify a note's day. Future-dated notes count as today.
pub fn classify_day(today: NaiveDate, day: NaiveDate) -> NoteDay {
    if day >= today {
        NoteDay::Today
    } else if day == yesterday_of(today) {
        NoteDay::Yesterday
    } else {
        NoteDay::Archivable
    }
}

/// When the end-of-day note archive is allowed to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchivePolicy {
    /// Local hour (0-23) from which archiving is open.
    pub archive_hour: u32,
}

impl Default for ArchivePolicy {
    fn default() -> Self {
        Self { archive_hour: 20 }
    }
}

impl ArchivePolicy {
    pub fn new(archive_hour: u32) -> Self {
        Self { archive_hour }
    }

    pub fn is_open(&self, now: &DateTime<FixedOffset>) -> bool {
        now.hour() >= self.archive_hour
    }

    /// Notes dated strictly before this day are archivable.
    pub fn cutoff(&self, today: NaiveDate) -> NaiveDate {
        yesterday_of(today)
    }

    pub fn is_archivable(&self, today: NaiveDate, day: NaiveDate) -> bool {
        day < self.cutoff(today)
    }
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A calendar month used as an archive bucket key.
///
/// Field order gives chronological ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthLabel {
    pub year: i32,
    /// 1-12.
    pub month: u32,
}

#[derive(Debug, Error, PartialEq)]
#[error("invalid month label '{0}' (expected e.g. \"October 2025\")")]
pub struct InvalidMonthLabel(pub String);

impl MonthLabel {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = MONTH_NAMES
            .get(self.month.saturating_sub(1) as usize)
            .copied()
            .unwrap_or("?");
        write!(f, "{} {}", name, self.year)
    }
}

impl FromStr for MonthLabel {
    type Err = InvalidMonthLabel;

    /// Accepts "October 2025", "october 2025", "October-2025", "Oct 2025".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidMonthLabel(s.to_string());
        let mut parts = s
            .split(|c: char| c.is_whitespace() || c == '-')
            .filter(|p| !p.is_empty());
        let (name, year) = match (parts.next(), parts.next(), parts.next()) {
            (Some(name), Some(year), None) => (name.to_lowercase(), year),
            _ => return Err(invalid()),
        };
        if name.len() < 3 {
            return Err(invalid());
        }
        let month = MONTH_NAMES
            .iter()
            .position(|m| {
                let m = m.to_lowercase();
                m == name || (name.len() == 3 && m.starts_with(&name))
            })
            .ok_or_else(invalid)?;
        if year.len() != 4 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        Ok(Self {
            year,
            month: month as u32 + 1,
        })
    }
}

/// Newest month first; labels that don't parse sort last, by name.
pub fn newest_month_first(a: &str, b: &str) -> Ordering {
    match (a.parse::<MonthLabel>(), b.parse::<MonthLabel>()) {
        (Ok(a), Ok(b)) => b.cmp(&a),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Newest `YYYY-MM-DD` key first.
pub fn newest_date_first(a: &str, b: &str) -> Ordering {
    b.cmp(a)
}

/// An ordered key -> items partition.
///
/// Serializes as a JSON object whose keys keep the group order.
#[derive(Debug, Clone, PartialEq)]
pub struct Grouped<T> {
    groups: Vec<(String, Vec<T>)>,
}

impl<T> Default for Grouped<T> {
    fn default() -> Self {
        Self { groups: Vec::new() }
    }
}

impl<T> Grouped<T> {
    /// Partition by key equality. Groups appear in first-seen order and items
    /// keep their input order.
    pub fn partition<I, F>(items: I, key: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: Fn(&T) -> String,
    {
        let mut groups: Vec<(String, Vec<T>)> = Vec::new();
        for item in items {
            let k = key(&item);
            match groups.iter_mut().find(|(g, _)| *g == k) {
                Some((_, members)) => members.push(item),
                None => groups.push((k, vec![item])),
            }
        }
        Self { groups }
    }

    pub fn sort_keys_by<F>(mut self, mut cmp: F) -> Self
    where
        F: FnMut(&str, &str) -> Ordering,
    {
        self.groups.sort_by(|(a, _), (b, _)| cmp(a, b));
        self
    }

    pub fn sort_items_by<F>(mut self, mut cmp: F) -> Self
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        for (_, items) in &mut self.groups {
            items.sort_by(&mut cmp);
        }
        self
    }

    pub fn retain<F>(mut self, mut keep: F) -> Self
    where
        F: FnMut(&str, &[T]) -> bool,
    {
        self.groups.retain(|(k, items)| keep(k, items));
        self
    }

    pub fn get(&self, key: &str) -> Option<&[T]> {
        self.groups
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, items)| items.as_slice())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn into_groups(self) -> Vec<(String, Vec<T>)> {
        self.groups
    }
}

impl<T: Serialize> Serialize for Grouped<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (key, items) in &self.groups {
            map.serialize_entry(key, items)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn classify_relative_to_today() {
        let today = day(2025, 10, 14);
        assert_eq!(classify_day(today, day(2025, 10, 14)), NoteDay::Today);
        assert_eq!(classify_day(today, day(2025, 10, 15)), NoteDay::Today);
        assert_eq!(classify_day(today, day(2025, 10, 13)), NoteDay::Yesterday);
        assert_eq!(classify_day(today, day(2025, 10, 12)), NoteDay::Archivable);
    }

    #[test]
    fn classify_across_month_boundary() {
        let today = day(2025, 11, 1);
        assert_eq!(classify_day(today, day(2025, 10, 31)), NoteDay::Yesterday);
        assert_eq!(classify_day(today, day(2025, 10, 30)), NoteDay::Archivable);
    }

    #[test]
    fn policy_opens_at_archive_hour() {
        let policy = ArchivePolicy::default();
        let at = |s: &str| DateTime::parse_from_rfc3339(s).unwrap();
        assert!(!policy.is_open(&at("2025-10-14T19:59:59-05:00")));
        assert!(policy.is_open(&at("2025-10-14T20:00:00-05:00")));
        assert!(policy.is_open(&at("2025-10-14T23:30:00-05:00")));
        assert!(!policy.is_open(&at("2025-10-15T00:10:00-05:00")));
    }

    #[test]
    fn policy_never_archives_today_or_yesterday() {
        let policy = ArchivePolicy::default();
        let today = day(2025, 10, 14);
        assert_eq!(policy.cutoff(today), day(2025, 10, 13));
        assert!(!policy.is_archivable(today, day(2025, 10, 14)));
        assert!(!policy.is_archivable(today, day(2025, 10, 13)));
        assert!(policy.is_archivable(today, day(2025, 10, 12)));
    }

    #[test]
    fn month_label_forms() {
        let oct = MonthLabel { year: 2025, month: 10 };
        assert_eq!("October 2025".parse::<MonthLabel>().unwrap(), oct);
        assert_eq!("october 2025".parse::<MonthLabel>().unwrap(), oct);
        assert_eq!("October-2025".parse::<MonthLabel>().unwrap(), oct);
        assert_eq!("Oct 2025".parse::<MonthLabel>().unwrap(), oct);
        assert_eq!(oct.to_string(), "October 2025");
        assert_eq!(MonthLabel::of(day(2025, 10, 31)), oct);
    }

    #[test]
    fn month_label_rejects_garbage() {
        for bad in ["", "October", "2025", "Octo 2025", "Smarch 2025", "October 25", "Oct 2025 x"] {
            assert!(bad.parse::<MonthLabel>().is_err(), "{bad:?}");
        }
    }

    #[test]
    fn month_labels_order_chronologically() {
        let mut keys = vec!["March 2025", "Legacy", "December 2024", "October 2025"];
        keys.sort_by(|a, b| newest_month_first(a, b));
        assert_eq!(keys, vec!["October 2025", "March 2025", "December 2024", "Legacy"]);
    }

    #[test]
    fn grouped_serializes_in_group_order() {
        let grouped = Grouped::partition(vec![("a", 1), ("b", 2), ("a", 3)], |(k, _)| k.to_string())
            .sort_keys_by(|a, b| b.cmp(a));
        assert_eq!(grouped.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(grouped.get("a").unwrap().len(), 2);

        let json = serde_json::to_string(&grouped.sort_items_by(|x, y| y.1.cmp(&x.1))).unwrap();
        assert_eq!(json, r#"{"b":[["b",2]],"a":[["a",3],["a",1]]}"#);
    }
}
