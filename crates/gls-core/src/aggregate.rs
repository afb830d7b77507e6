//! Folds time-log entries into the classification index.
//!
//! # Rules
//!
//! For every entry and every board, in board discovery order, the entry's
//! labels are scanned in captured order. The first label that exists in the
//! board, is not excluded and is not named like the board itself receives the
//! entry's time and title. Scanning then moves on to the next board.

use std::collections::HashSet;

use crate::classification::ClassificationIndex;
use crate::timelog::TimeLogs;

/// Label titles that never receive attributed time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet(HashSet<String>);

impl ExclusionSet {
    /// Parses a comma-separated list, ignoring blank items.
    pub fn from_csv(raw: &str) -> Self {
        raw.split(',')
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .collect()
    }

    pub fn contains(&self, title: &str) -> bool {
        self.0.contains(title)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Attributes every entry's time to at most one label per board.
///
/// Takes the freshly built index by value and returns it populated.
// Open question: first match wins per board, so the order labels come back
// from the API decides attribution when an issue carries several labels of
// the same board. Kept as observed.
pub fn aggregate(
    logs: &TimeLogs,
    mut index: ClassificationIndex,
    excluded: &ExclusionSet,
) -> ClassificationIndex {
    for entry in logs.iter() {
        for section in index.boards_mut() {
            let matched = entry.labels.iter().find(|label| {
                section.contains_label(label)
                    && !excluded.contains(label)
                    && label.as_str() != section.name()
            });

            let Some(label) = matched else {
                continue;
            };
            if let Some(accumulator) = section.label_mut(label) {
                accumulator.attribute(entry.time_spent, &entry.issue_title);
                tracing::trace!(
                    issue = entry.issue_iid,
                    board = section.name(),
                    label = %label,
                    seconds = entry.time_spent,
                    "attributed time"
                );
            }
        }
    }

    tracing::debug!(
        entries = logs.len(),
        boards = index.len(),
        attributed = index.grand_total(),
        "aggregated timelogs"
    );
    index
}
