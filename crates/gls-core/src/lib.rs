//! Core domain logic for GitLab label synthesis.
//!
//! This crate contains the pure, network-free pieces:
//! - Timelog windows and the per-issue merge fold
//! - The board/label classification index
//! - Aggregation of timelogs into that index

mod aggregate;
pub mod classification;
pub mod timelog;

pub use aggregate::{ExclusionSet, aggregate};
pub use classification::{Accumulator, Board, BoardLabels, BoardSection, ClassificationIndex, Label};
pub use timelog::{DateWindow, TimeLogEntry, TimeLogRecord, TimeLogs, date_windows, merge_records};
