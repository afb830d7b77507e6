//! Windowed timelog retrieval for one user.

use chrono::NaiveDate;
use serde_json::json;

use gls_core::{DateWindow, TimeLogRecord, TimeLogs, date_windows, merge_records};

use crate::wire::{TimelogsData, USER_TIMELOGS_QUERY};
use crate::{GitlabError, GraphqlRequest, GraphqlTransport};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Fetches the timelog records of one user within one window.
///
/// Timelogs not attached to an issue (merge request time) are skipped.
pub async fn fetch_window<T: GraphqlTransport>(
    transport: &T,
    user: &str,
    window: DateWindow,
) -> Result<Vec<TimeLogRecord>, GitlabError> {
    let request = GraphqlRequest {
        query: USER_TIMELOGS_QUERY,
        variables: json!({
            "username": user,
            "startDate": window.start.format(DATE_FORMAT).to_string(),
            "endDate": window.end.format(DATE_FORMAT).to_string(),
        }),
    };
    let data: TimelogsData = transport.execute(&request).await?;

    let mut records = Vec::with_capacity(data.timelogs.edges.len());
    for edge in data.timelogs.edges {
        let Some(issue) = edge.node.issue else {
            tracing::debug!(user, seconds = edge.node.time_spent, "skipping timelog without issue");
            continue;
        };
        records.push(TimeLogRecord {
            issue_iid: issue.iid,
            issue_title: issue.title,
            time_spent: edge.node.time_spent,
            labels: issue
                .labels
                .edges
                .into_iter()
                .map(|label| label.node.title)
                .collect(),
        });
    }
    Ok(records)
}

/// Fetches and merges a user's timelogs over an inclusive date range.
///
/// Windows are requested one after the other. Any failure discards the
/// windows already fetched.
pub async fn fetch_timelogs<T: GraphqlTransport>(
    transport: &T,
    user: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<TimeLogs, GitlabError> {
    let windows = date_windows(start, end);
    let mut results = Vec::with_capacity(windows.len());
    for window in windows {
        let records = fetch_window(transport, user, window).await?;
        tracing::debug!(
            user,
            start = %window.start,
            end = %window.end,
            records = records.len(),
            "fetched timelog window"
        );
        results.push(records);
    }

    let logs = merge_records(results);
    tracing::info!(user, issues = logs.len(), seconds = logs.total_time(), "fetched timelogs");
    Ok(logs)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::fake::FakeTransport;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn timelog(iid: &str, title: &str, seconds: i64, labels: &[&str]) -> serde_json::Value {
        let edges: Vec<_> = labels
            .iter()
            .map(|title| json!({ "node": { "title": title } }))
            .collect();
        json!({ "node": {
            "timeSpent": seconds,
            "issue": { "iid": iid, "title": title, "labels": { "edges": edges } }
        }})
    }

    fn window_body(edges: Vec<serde_json::Value>) -> serde_json::Value {
        json!({ "timelogs": { "edges": edges } })
    }

    #[tokio::test]
    async fn fetch_timelogs_queries_each_window_in_order() {
        let transport = FakeTransport::default()
            .respond(window_body(vec![]))
            .respond(window_body(vec![]))
            .respond(window_body(vec![]));

        fetch_timelogs(&transport, "alice", date(2025, 1, 1), date(2025, 1, 15))
            .await
            .unwrap();

        let windows: Vec<(String, String)> = transport
            .requests()
            .iter()
            .map(|request| {
                assert_eq!(request.variables["username"], "alice");
                (
                    request.variables["startDate"].as_str().unwrap().to_string(),
                    request.variables["endDate"].as_str().unwrap().to_string(),
                )
            })
            .collect();
        assert_eq!(
            windows,
            vec![
                ("2025-01-01".to_string(), "2025-01-07".to_string()),
                ("2025-01-08".to_string(), "2025-01-14".to_string()),
                ("2025-01-15".to_string(), "2025-01-15".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn fetch_timelogs_merges_records_across_windows() {
        let transport = FakeTransport::default()
            .respond(window_body(vec![
                timelog("12", "Login page", 1800, &["feature", "frontend"]),
                timelog("12", "Login page", 600, &["feature", "frontend"]),
            ]))
            .respond(window_body(vec![
                timelog("12", "Login page", 900, &["bug"]),
                timelog("3", "Fix CI", 300, &[]),
            ]));

        let logs = fetch_timelogs(&transport, "alice", date(2025, 1, 1), date(2025, 1, 10))
            .await
            .unwrap();

        assert_eq!(logs.len(), 2);
        let login = logs.get(12).unwrap();
        assert_eq!(login.time_spent, 3300);
        assert_eq!(login.labels, vec!["feature", "frontend"]);
        assert_eq!(logs.get(3).unwrap().time_spent, 300);
    }

    #[tokio::test]
    async fn fetch_timelogs_discards_partial_results_on_failure() {
        let transport = FakeTransport::default()
            .respond(window_body(vec![timelog("1", "A", 60, &[])]))
            .fail(502);

        let err = fetch_timelogs(&transport, "alice", date(2025, 1, 1), date(2025, 1, 10))
            .await
            .unwrap_err();

        assert!(matches!(err, GitlabError::Status { status: 502 }));
    }

    #[tokio::test]
    async fn fetch_window_skips_timelogs_without_issue() {
        let transport = FakeTransport::default().respond(window_body(vec![
            json!({ "node": { "timeSpent": 120, "issue": null } }),
            timelog("5", "Docs", 240, &["docs"]),
        ]));
        let window = DateWindow {
            start: date(2025, 1, 1),
            end: date(2025, 1, 7),
        };

        let records = fetch_window(&transport, "alice", window).await.unwrap();

        assert_eq!(
            records,
            vec![TimeLogRecord {
                issue_iid: 5,
                issue_title: "Docs".to_string(),
                time_spent: 240,
                labels: vec!["docs".to_string()],
            }]
        );
    }

    #[tokio::test]
    async fn reversed_range_sends_no_request() {
        let transport = FakeTransport::default();
        let logs = fetch_timelogs(&transport, "alice", date(2025, 2, 1), date(2025, 1, 1))
            .await
            .unwrap();
        assert!(logs.is_empty());
        assert!(transport.requests().is_empty());
    }
}
