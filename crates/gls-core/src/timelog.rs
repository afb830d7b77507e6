//! Time-log entries and the windowed merge fold.
//!
//! A date range is split into fixed 7-day windows, each window is queried
//! once, and the ordered window results are folded into one entry per issue.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};

/// Length of one query window in days.
pub const WINDOW_DAYS: i64 = 7;

/// An inclusive date window sent as one timelog query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Splits an inclusive range into consecutive 7-day windows.
///
/// The last window is truncated to `end`. A range whose start is after its
/// end yields no windows.
pub fn date_windows(start: NaiveDate, end: NaiveDate) -> Vec<DateWindow> {
    if start > end {
        return Vec::new();
    }

    let count = (end - start).num_days() / WINDOW_DAYS + 1;
    (0..count)
        .map(|i| {
            let window_start = start + Duration::days(i * WINDOW_DAYS);
            let window_end = (window_start + Duration::days(WINDOW_DAYS - 1)).min(end);
            DateWindow {
                start: window_start,
                end: window_end,
            }
        })
        .collect()
}

/// One raw timelog record as returned by a window query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeLogRecord {
    pub issue_iid: u64,
    pub issue_title: String,
    /// Time spent in seconds.
    pub time_spent: i64,
    pub labels: Vec<String>,
}

/// Time spent on one issue, merged across every record for that issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeLogEntry {
    pub issue_iid: u64,
    pub issue_title: String,
    /// Cumulative time spent in seconds.
    pub time_spent: i64,
    /// Labels captured from the first record seen for the issue.
    pub labels: Vec<String>,
}

impl From<TimeLogRecord> for TimeLogEntry {
    fn from(record: TimeLogRecord) -> Self {
        Self {
            issue_iid: record.issue_iid,
            issue_title: record.issue_title,
            time_spent: record.time_spent,
            labels: record.labels,
        }
    }
}

/// Entries keyed by issue iid, in the order issues were first seen.
#[derive(Debug, Clone, Default)]
pub struct TimeLogs {
    entries: Vec<TimeLogEntry>,
    positions: HashMap<u64, usize>,
}

impl TimeLogs {
    /// Folds one record into the mapping.
    ///
    /// The first record for an issue seeds the entry. Later records only add
    /// to its time: their labels are dropped even when they differ.
    // Open question: labels are frozen at first sight, so a relabelled issue
    // keeps its old classification for the whole range. Kept as observed.
    pub fn absorb(&mut self, record: TimeLogRecord) {
        if let Some(&position) = self.positions.get(&record.issue_iid) {
            self.entries[position].time_spent += record.time_spent;
            return;
        }
        self.positions.insert(record.issue_iid, self.entries.len());
        self.entries.push(record.into());
    }

    pub fn get(&self, issue_iid: u64) -> Option<&TimeLogEntry> {
        self.positions
            .get(&issue_iid)
            .map(|&position| &self.entries[position])
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimeLogEntry> {
        self.entries.iter()
    }

    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of every entry's time in seconds.
    pub fn total_time(&self) -> i64 {
        self.entries.iter().map(|entry| entry.time_spent).sum()
    }
}

/// Folds ordered window results into one entry per issue.
pub fn merge_records<W, R>(windows: W) -> TimeLogs
where
    W: IntoIterator<Item = R>,
    R: IntoIterator<Item = TimeLogRecord>,
{
    windows
        .into_iter()
        .flatten()
        .fold(TimeLogs::default(), |mut logs, record| {
            logs.absorb(record);
            logs
        })
}
