use crate::models::Entry;
use chrono::{Datelike, FixedOffset, NaiveDate, Offset, Utc};

/// Long form used for date search, e.g. `January 15th, 2024`.
pub fn long_date(date: NaiveDate) -> String {
    let day = date.day();
    format!(
        "{} {}{}, {}",
        date.format("%B"),
        day,
        ordinal_suffix(day),
        date.year()
    )
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Case-insensitive substring match against mood, notes and the long date
/// (taken in `offset`). An empty query matches every entry.
pub fn matches(entry: &Entry, query: &str, offset: &FixedOffset) -> bool {
    let needle = query.to_lowercase();
    matches_folded(entry, &needle, offset)
}

fn matches_folded(entry: &Entry, needle: &str, offset: &FixedOffset) -> bool {
    if needle.is_empty() {
        return true;
    }
    if entry.mood.to_lowercase().contains(needle) {
        return true;
    }
    if entry.notes_text().to_lowercase().contains(needle) {
        return true;
    }
    entry
        .day_in(offset)
        .map(|date| long_date(date).to_lowercase().contains(needle))
        .unwrap_or(false)
}

/// Entries matching `query`, in input order.
pub fn filter_entries<'a>(entries: &'a [Entry], query: &str, offset: &FixedOffset) -> Vec<&'a Entry> {
    let needle = query.to_lowercase();
    entries
        .iter()
        .filter(|entry| matches_folded(entry, &needle, offset))
        .collect()
}

/// Same as [`filter_entries`] with dates rendered in UTC.
pub fn filter_entries_utc<'a>(entries: &'a [Entry], query: &str) -> Vec<&'a Entry> {
    filter_entries(entries, query, &Utc.fix())
}
