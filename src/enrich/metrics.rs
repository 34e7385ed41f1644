use chrono::{DateTime, Utc};

use super::record::TimestampMetrics;
use super::EnrichOptions;
use crate::github::types::{RawComment, RawIssue};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Derive all wall-clock metrics for one issue.
///
/// Durations are floored to whole seconds and clamped non-negative; each is
/// null when its anchor event never happened. `time_open_days` is always
/// present: for open issues it measures against `now`, the harvest run's
/// clock, which the caller passes in so a record is reproducible within one
/// run.
pub fn synthesize_timestamps(
    issue: &RawIssue,
    comments: &[RawComment],
    options: &EnrichOptions,
    now: DateTime<Utc>,
) -> TimestampMetrics {
    let created_at = issue.created_at;
    let author_username = issue.user.as_ref().map(|u| u.login.as_str());

    let time_to_close_seconds = issue
        .closed_at
        .map(|closed| (closed - created_at).num_seconds().max(0));

    let time_to_first_comment_seconds = comments
        .iter()
        .map(|c| c.created_at)
        .min()
        .map(|first| (first - created_at).num_seconds().max(0));

    // First response: earliest comment from a maintainer who isn't the
    // author, mirroring the has_maintainer_response definition.
    let time_to_first_response_seconds = comments
        .iter()
        .filter(|c| options.is_maintainer_role(c.author_association.as_deref()))
        .filter(|c| match (&c.user, author_username) {
            (Some(user), Some(author)) => user.login != author,
            (Some(_), None) => true,
            (None, _) => false,
        })
        .map(|c| c.created_at)
        .min()
        .map(|first| (first - created_at).num_seconds().max(0));

    let open_until = issue.closed_at.unwrap_or(now);
    let time_open_days = (open_until - created_at).num_seconds().max(0) as f64 / SECONDS_PER_DAY;

    TimestampMetrics {
        time_to_close_seconds,
        time_to_first_comment_seconds,
        time_to_first_response_seconds,
        time_open_days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::types::RawActor;
    use chrono::TimeZone;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn issue(closed_offset: Option<i64>) -> RawIssue {
        RawIssue {
            number: 1,
            id: 1,
            html_url: "https://github.com/o/r/issues/1".to_string(),
            title: "t".to_string(),
            body: None,
            state: if closed_offset.is_some() {
                "closed".to_string()
            } else {
                "open".to_string()
            },
            state_reason: None,
            locked: false,
            comments: 0,
            created_at: ts(0),
            updated_at: ts(0),
            closed_at: closed_offset.map(ts),
            user: Some(RawActor {
                login: "reporter".to_string(),
                id: 1,
            }),
            closed_by: None,
            author_association: Some("NONE".to_string()),
            assignees: vec![],
            labels: vec![],
            milestone: None,
        }
    }

    fn comment(login: &str, association: &str, offset: i64) -> RawComment {
        RawComment {
            id: offset as u64,
            created_at: ts(offset),
            updated_at: None,
            user: Some(RawActor {
                login: login.to_string(),
                id: 2,
            }),
            author_association: Some(association.to_string()),
            body: None,
        }
    }

    #[test]
    fn test_closed_issue_with_contributor_then_owner() {
        let issue = issue(Some(10_000));
        let comments = vec![
            comment("helper", "CONTRIBUTOR", 3_600),
            comment("boss", "OWNER", 7_200),
        ];
        let m = synthesize_timestamps(&issue, &comments, &EnrichOptions::default(), ts(20_000));

        assert_eq!(m.time_to_close_seconds, Some(10_000));
        assert_eq!(m.time_to_first_comment_seconds, Some(3_600));
        assert_eq!(m.time_to_first_response_seconds, Some(7_200));
        assert!((m.time_open_days - 10_000.0 / 86_400.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_comments_yields_nulls() {
        let m = synthesize_timestamps(&issue(None), &[], &EnrichOptions::default(), ts(500));
        assert_eq!(m.time_to_close_seconds, None);
        assert_eq!(m.time_to_first_comment_seconds, None);
        assert_eq!(m.time_to_first_response_seconds, None);
    }

    #[test]
    fn test_open_issue_days_track_harvest_clock() {
        let m = synthesize_timestamps(
            &issue(None),
            &[],
            &EnrichOptions::default(),
            ts(86_400 * 3),
        );
        assert!((m.time_open_days - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_author_maintainer_comment_is_not_first_response() {
        let mut issue = issue(None);
        issue.user = Some(RawActor {
            login: "boss".to_string(),
            id: 1,
        });
        let comments = vec![
            comment("boss", "OWNER", 100),
            comment("other", "MEMBER", 300),
        ];
        let m = synthesize_timestamps(&issue, &comments, &EnrichOptions::default(), ts(1_000));
        assert_eq!(m.time_to_first_response_seconds, Some(300));
        assert_eq!(m.time_to_first_comment_seconds, Some(100));
    }

    #[test]
    fn test_non_maintainer_comments_never_count_as_response() {
        let comments = vec![comment("helper", "CONTRIBUTOR", 50)];
        let m = synthesize_timestamps(&issue(None), &comments, &EnrichOptions::default(), ts(100));
        assert_eq!(m.time_to_first_response_seconds, None);
    }
}
