use crate::models::{Entry, MoodShare, Statistics};
use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub fn build_stats(entries: &[Entry], offset: &FixedOffset) -> Statistics {
    compute_statistics_in(entries, Utc::now().with_timezone(offset).date_naive(), offset)
}

/// Aggregates `entries` with calendar days taken in UTC.
pub fn compute_statistics(entries: &[Entry], today: NaiveDate) -> Statistics {
    compute_statistics_in(entries, today, &Utc.fix())
}

/// Aggregates `entries` with calendar days taken in `offset`.
///
/// Entries whose `created_at` does not parse still count towards the totals
/// and mood counts, but are left out of the day count and the streak.
pub fn compute_statistics_in(
    entries: &[Entry],
    today: NaiveDate,
    offset: &FixedOffset,
) -> Statistics {
    let total_entries = entries.len() as u64;

    let mut mood_counts: BTreeMap<String, u64> = BTreeMap::new();
    let mut first_seen: HashMap<&str, usize> = HashMap::new();
    for entry in entries {
        let next = first_seen.len();
        first_seen.entry(entry.mood.as_str()).or_insert(next);
        *mood_counts.entry(entry.mood.clone()).or_default() += 1;
    }

    let mut ranked: Vec<(&String, u64)> = mood_counts
        .iter()
        .map(|(mood, count)| (mood, *count))
        .collect();
    ranked.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| first_seen[a.0.as_str()].cmp(&first_seen[b.0.as_str()]))
    });

    let mood_breakdown: Vec<MoodShare> = ranked
        .iter()
        .map(|(mood, count)| MoodShare {
            mood: (*mood).clone(),
            count: *count,
            percent: percent_of(*count, total_entries),
        })
        .collect();

    let (most_common_mood, most_common_count) = match mood_breakdown.first() {
        Some(top) => (Some(top.mood.clone()), top.count),
        None => (None, 0),
    };

    let days: BTreeSet<NaiveDate> = entries
        .iter()
        .filter_map(|entry| entry.day_in(offset))
        .collect();
    let unique_days_tracked = days.len() as u64;

    let average_entries_per_day = if unique_days_tracked == 0 {
        0.0
    } else {
        total_entries as f64 / unique_days_tracked as f64
    };

    Statistics {
        total_entries,
        mood_counts,
        mood_breakdown,
        most_common_mood,
        most_common_count,
        unique_days_tracked,
        current_streak: current_streak(&days, today),
        average_entries_per_day,
    }
}

/// Consecutive days ending today that have at least one entry. Days after
/// `today` are ignored.
fn current_streak(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u64 {
    let mut cursor = today;
    let mut streak = 0;

    for day in days.iter().rev() {
        if *day > cursor {
            continue;
        }
        if *day < cursor {
            break;
        }
        streak += 1;
        match cursor.pred_opt() {
            Some(prev) => cursor = prev,
            None => break,
        }
    }

    streak
}

fn percent_of(count: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    (count as f64 / total as f64 * 100.0).round() as u32
}
