//! Markdown synthesis report rendering.
//!
//! One report per user: a grand total, then one table per board with
//! attributed time, labels sorted by descending time.

use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;

use gls_core::{Accumulator, BoardSection, ClassificationIndex};

/// Longest issue list rendered before truncation, in characters.
const MAX_ISSUES_WIDTH: usize = 40;
const TRUNCATED_ISSUES_WIDTH: usize = 37;

/// Who and which period a report covers.
#[derive(Debug, Clone, Copy)]
pub struct ReportHeader<'a> {
    pub user: &'a str,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

// ========== Formatting Helpers ==========

/// Formats seconds as `{h}h {mm}min`.
/// Negative durations are treated as zero.
pub fn format_duration(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    format!("{hours}h {minutes:02}min")
}

/// Share of `part` in `whole`, in percent. Zero when `whole` is zero.
#[allow(clippy::cast_precision_loss)]
pub fn percentage(part: i64, whole: i64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Distinct issue titles, sorted, truncated past 40 characters.
fn format_issues(issues: &[String]) -> String {
    let distinct: BTreeSet<&str> = issues.iter().map(String::as_str).collect();
    let joined = escape_cell(&distinct.into_iter().collect::<Vec<_>>().join(", "));
    if joined.chars().count() > MAX_ISSUES_WIDTH {
        let head: String = joined.chars().take(TRUNCATED_ISSUES_WIDTH).collect();
        format!("{head}...")
    } else {
        joined
    }
}

// ========== Report Generation ==========

fn board_lines(section: &BoardSection, grand_total: i64) -> Vec<String> {
    let board_total = section.total_time();

    let mut rows: Vec<(&str, &Accumulator)> = section
        .labels()
        .filter(|(_, accumulator)| accumulator.time_spent > 0)
        .collect();
    rows.sort_by_key(|(_, accumulator)| Reverse(accumulator.time_spent));

    let mut lines = Vec::new();
    lines.push(format!("## {}", section.name()));
    lines.push(String::new());
    lines.push("| Label | Temps | % | Issues |".to_string());
    lines.push("|-------|-------|---|--------|".to_string());
    for (label, accumulator) in rows {
        lines.push(format!(
            "| {} | {} | {:.1}% | {} |",
            escape_cell(label),
            format_duration(accumulator.time_spent),
            percentage(accumulator.time_spent, board_total),
            format_issues(&accumulator.issues),
        ));
    }
    lines.push(format!(
        "| **TOTAL {}** | **{}** | **{:.1}%** | du temps total |",
        escape_cell(section.name()),
        format_duration(board_total),
        percentage(board_total, grand_total),
    ));
    lines.push(String::new());
    lines
}

/// Formats the Markdown report for one user.
pub fn format_report(header: &ReportHeader<'_>, index: &ClassificationIndex) -> String {
    let grand_total = index.grand_total();

    let mut lines = Vec::new();
    lines.push(format!(
        "# Fiche de Synthèse - {} - Période du {} au {}",
        header.user,
        header.start.format("%Y-%m-%d"),
        header.end.format("%Y-%m-%d"),
    ));
    lines.push(String::new());
    lines.push("## Temps total".to_string());
    lines.push(String::new());
    lines.push(format!("> **TOTAL:** **{}**", format_duration(grand_total)));
    lines.push(String::new());

    let sections: Vec<&BoardSection> = index
        .boards()
        .filter(|section| section.total_time() != 0)
        .collect();
    if sections.is_empty() {
        lines.push("Aucun temps attribué sur la période.".to_string());
        lines.push(String::new());
    }
    for section in sections {
        lines.extend(board_lines(section, grand_total));
    }

    lines.join("\n")
}

/// `<report_dir>/<user>_synthese_label_<YYYYMMDD>.md`
pub fn report_path(report_dir: &Path, user: &str, generated_on: NaiveDate) -> PathBuf {
    report_dir.join(format!(
        "{user}_synthese_label_{}.md",
        generated_on.format("%Y%m%d")
    ))
}

/// Writes the report, replacing any report of the same user and day.
pub fn write_report(
    report_dir: &Path,
    header: &ReportHeader<'_>,
    index: &ClassificationIndex,
    generated_on: NaiveDate,
) -> Result<PathBuf> {
    fs::create_dir_all(report_dir)
        .with_context(|| format!("failed to create {}", report_dir.display()))?;

    let path = report_path(report_dir, header.user, generated_on);
    fs::write(&path, format_report(header, index))
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use gls_core::{
        Board, BoardLabels, ExclusionSet, Label, TimeLogRecord, aggregate, merge_records,
    };
    use insta::assert_snapshot;
    use tempfile::TempDir;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn header() -> ReportHeader<'static> {
        ReportHeader {
            user: "alice",
            start: date(2025, 1, 1),
            end: date(2025, 1, 7),
        }
    }

    fn populated(boards: &[(&str, &[&str])], entries: &[(u64, &str, i64, &[&str])]) -> ClassificationIndex {
        let index = ClassificationIndex::build(boards.iter().map(|(name, labels)| BoardLabels {
            board: Board {
                id: format!("gid://gitlab/Board/{name}"),
                name: (*name).to_string(),
            },
            labels: labels
                .iter()
                .map(|title| {
                    Some(Label {
                        id: format!("gid://gitlab/ProjectLabel/{title}"),
                        title: (*title).to_string(),
                        color: None,
                    })
                })
                .collect(),
        }));
        let logs = merge_records(vec![
            entries
                .iter()
                .map(|(iid, title, seconds, labels)| TimeLogRecord {
                    issue_iid: *iid,
                    issue_title: (*title).to_string(),
                    time_spent: *seconds,
                    labels: labels.iter().map(ToString::to_string).collect(),
                })
                .collect::<Vec<_>>(),
        ]);
        aggregate(&logs, index, &ExclusionSet::default())
    }

    // ========== Formatting Helper Tests ==========

    #[test]
    fn test_format_duration_pads_minutes() {
        assert_eq!(format_duration(3600), "1h 00min");
        assert_eq!(format_duration(5 * 60), "0h 05min");
        assert_eq!(format_duration(26 * 3600 + 45 * 60 + 59), "26h 45min");
    }

    #[test]
    fn test_format_duration_zero_and_negative() {
        assert_eq!(format_duration(0), "0h 00min");
        assert_eq!(format_duration(-90), "0h 00min");
    }

    #[test]
    fn test_percentage_of_zero_is_zero() {
        assert!(percentage(0, 0).abs() < f64::EPSILON);
        assert!((percentage(1, 4) - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_format_issues_dedups_sorts_and_truncates() {
        let issues = vec!["b".to_string(), "a".to_string(), "b".to_string()];
        assert_eq!(format_issues(&issues), "a, b");

        let long = vec!["An issue title that is quite long".to_string(), "Another one".to_string()];
        let formatted = format_issues(&long);
        assert_eq!(formatted.chars().count(), 40);
        assert!(formatted.ends_with("..."));
    }

    #[test]
    fn test_report_path_uses_user_and_date() {
        let path = report_path(Path::new("fiches_de_synthese"), "alice", date(2025, 3, 12));
        assert_eq!(
            path,
            PathBuf::from("fiches_de_synthese/alice_synthese_label_20250312.md")
        );
    }

    // ========== Report Tests ==========

    #[test]
    fn test_report_counts_entry_in_every_matching_board() {
        let index = populated(
            &[("Dev", &["bug", "feature"]), ("QA", &["test"])],
            &[(1, "Issue1", 3600, &["feature", "test"])],
        );

        let output = format_report(&header(), &index);
        assert_snapshot!(output, @r"
# Fiche de Synthèse - alice - Période du 2025-01-01 au 2025-01-07

## Temps total

> **TOTAL:** **2h 00min**

## Dev

| Label | Temps | % | Issues |
|-------|-------|---|--------|
| feature | 1h 00min | 100.0% | Issue1 |
| **TOTAL Dev** | **1h 00min** | **50.0%** | du temps total |

## QA

| Label | Temps | % | Issues |
|-------|-------|---|--------|
| test | 1h 00min | 100.0% | Issue1 |
| **TOTAL QA** | **1h 00min** | **50.0%** | du temps total |
");
    }

    #[test]
    fn test_report_sorts_labels_by_descending_time() {
        let index = populated(
            &[("Dev", &["bug", "feature", "chore"])],
            &[
                (1, "Small", 600, &["bug"]),
                (2, "Big", 7200, &["feature"]),
                (3, "Tie", 600, &["chore"]),
            ],
        );

        let output = format_report(&header(), &index);
        let feature = output.find("| feature |").unwrap();
        let bug = output.find("| bug |").unwrap();
        let chore = output.find("| chore |").unwrap();
        assert!(feature < bug, "largest label first");
        assert!(bug < chore, "ties keep board order");
        assert!(output.contains("| feature | 2h 00min | 85.7% | Big |"));
    }

    #[test]
    fn test_report_omits_boards_without_time() {
        let index = populated(
            &[("Dev", &["bug"]), ("QA", &["test"])],
            &[(1, "Issue1", 1800, &["bug"])],
        );

        let output = format_report(&header(), &index);
        assert!(output.contains("## Dev"));
        assert!(!output.contains("## QA"));
        assert!(output.contains("| **TOTAL Dev** | **0h 30min** | **100.0%** |"));
    }

    #[test]
    fn test_report_with_zero_total() {
        let index = populated(&[("Dev", &["bug"])], &[]);

        let output = format_report(&header(), &index);
        assert!(output.contains("> **TOTAL:** **0h 00min**"));
        assert!(!output.contains("## Dev"));
        assert!(!output.contains("NaN"));
    }

    #[test]
    fn test_write_report_creates_dir_and_overwrites() {
        let temp = TempDir::new().unwrap();
        let report_dir = temp.path().join("fiches_de_synthese");
        let today = date(2025, 3, 12);

        let empty = populated(&[("Dev", &["bug"])], &[]);
        let first = write_report(&report_dir, &header(), &empty, today).unwrap();

        let full = populated(&[("Dev", &["bug"])], &[(1, "Issue1", 3600, &["bug"])]);
        let second = write_report(&report_dir, &header(), &full, today).unwrap();

        assert_eq!(first, second);
        assert_eq!(std::fs::read_dir(&report_dir).unwrap().count(), 1);
        let content = std::fs::read_to_string(&second).unwrap();
        assert!(content.contains("> **TOTAL:** **1h 00min**"));
    }
}
