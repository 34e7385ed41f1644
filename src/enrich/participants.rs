use std::collections::BTreeSet;

use super::record::ParticipantMetrics;
use super::EnrichOptions;
use crate::github::types::{RawComment, RawIssue};

/// Derive participation and maintainer-response metrics from the issue author
/// plus the ordered comment stream.
///
/// Commenters exclude the author; participants are commenters plus the
/// author. Maintainer status is sticky: once a username shows up with a
/// maintainer association anywhere, it stays a maintainer even if later
/// comments carry a different role.
pub fn aggregate_participants(
    issue: &RawIssue,
    comments: &[RawComment],
    options: &EnrichOptions,
) -> ParticipantMetrics {
    let author_username = issue.user.as_ref().map(|u| u.login.as_str());

    let mut participants: BTreeSet<String> = BTreeSet::new();
    let mut commenters: BTreeSet<String> = BTreeSet::new();
    let mut maintainers: BTreeSet<String> = BTreeSet::new();
    let mut has_maintainer_response = false;

    if let Some(author) = author_username {
        participants.insert(author.to_string());
        if options.is_maintainer_role(issue.author_association.as_deref()) {
            maintainers.insert(author.to_string());
        }
    }

    for comment in comments {
        let Some(user) = &comment.user else { continue };
        participants.insert(user.login.clone());
        if Some(user.login.as_str()) != author_username {
            commenters.insert(user.login.clone());
        }

        if options.is_maintainer_role(comment.author_association.as_deref()) {
            maintainers.insert(user.login.clone());
            // A maintainer commenting on their own issue is not a response.
            if Some(user.login.as_str()) != author_username {
                has_maintainer_response = true;
            }
        }
    }

    ParticipantMetrics {
        total_participants: participants.len(),
        unique_commenters: commenters.len(),
        maintainer_participants: maintainers.len(),
        has_maintainer_response,
        participant_usernames: participants.into_iter().collect(),
        commenter_usernames: commenters.into_iter().collect(),
        maintainer_usernames: maintainers.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::types::RawActor;
    use chrono::{TimeZone, Utc};

    fn issue_by(login: &str, association: Option<&str>) -> RawIssue {
        RawIssue {
            number: 1,
            id: 1,
            html_url: "https://github.com/o/r/issues/1".to_string(),
            title: "t".to_string(),
            body: None,
            state: "open".to_string(),
            state_reason: None,
            locked: false,
            comments: 0,
            created_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            updated_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            closed_at: None,
            user: Some(RawActor {
                login: login.to_string(),
                id: 1,
            }),
            closed_by: None,
            author_association: association.map(str::to_string),
            assignees: vec![],
            labels: vec![],
            milestone: None,
        }
    }

    fn comment(login: &str, association: &str, offset: i64) -> RawComment {
        RawComment {
            id: offset as u64,
            created_at: Utc.timestamp_opt(1_700_000_000 + offset, 0).unwrap(),
            updated_at: None,
            user: Some(RawActor {
                login: login.to_string(),
                id: 99,
            }),
            author_association: Some(association.to_string()),
            body: Some("hi".to_string()),
        }
    }

    #[test]
    fn test_counts_and_maintainer_response() {
        let issue = issue_by("reporter", Some("NONE"));
        let comments = vec![
            comment("helper", "CONTRIBUTOR", 10),
            comment("maintainer", "OWNER", 20),
        ];
        let m = aggregate_participants(&issue, &comments, &EnrichOptions::default());

        assert_eq!(m.total_participants, 3);
        assert_eq!(m.unique_commenters, 2);
        assert_eq!(m.maintainer_participants, 1);
        assert!(m.has_maintainer_response);
        assert_eq!(m.maintainer_usernames, vec!["maintainer"]);
        assert_eq!(m.commenter_usernames, vec!["helper", "maintainer"]);
    }

    #[test]
    fn test_author_excluded_from_commenters() {
        let issue = issue_by("reporter", Some("NONE"));
        let comments = vec![comment("reporter", "NONE", 10)];
        let m = aggregate_participants(&issue, &comments, &EnrichOptions::default());

        assert_eq!(m.total_participants, 1);
        assert_eq!(m.unique_commenters, 0);
        assert!(m.commenter_usernames.is_empty());
    }

    #[test]
    fn test_maintainer_self_comment_is_not_a_response() {
        let issue = issue_by("owner-dev", Some("OWNER"));
        let comments = vec![comment("owner-dev", "OWNER", 10)];
        let m = aggregate_participants(&issue, &comments, &EnrichOptions::default());

        assert_eq!(m.maintainer_participants, 1);
        assert!(!m.has_maintainer_response);
    }

    #[test]
    fn test_maintainer_status_is_sticky() {
        let issue = issue_by("reporter", None);
        let comments = vec![
            comment("drifter", "MEMBER", 10),
            comment("drifter", "NONE", 20),
        ];
        let m = aggregate_participants(&issue, &comments, &EnrichOptions::default());
        assert_eq!(m.maintainer_usernames, vec!["drifter"]);
    }

    #[test]
    fn test_contributor_is_not_a_maintainer_by_default() {
        let issue = issue_by("reporter", None);
        let comments = vec![comment("helper", "CONTRIBUTOR", 10)];
        let m = aggregate_participants(&issue, &comments, &EnrichOptions::default());
        assert_eq!(m.maintainer_participants, 0);
        assert!(!m.has_maintainer_response);
    }

    #[test]
    fn test_response_property_matches_maintainer_set() {
        // has_maintainer_response iff some maintainer username differs from
        // the author's.
        let issue = issue_by("owner-dev", Some("OWNER"));
        let comments = vec![comment("other-owner", "OWNER", 5)];
        let m = aggregate_participants(&issue, &comments, &EnrichOptions::default());
        assert!(m.has_maintainer_response);
        assert!(m
            .maintainer_usernames
            .iter()
            .any(|u| u != "owner-dev"));
    }
}
