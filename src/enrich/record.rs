use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::dataset::Classification;

/// Parsed identity of one issue, extracted from its HTML URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl IssueRef {
    /// Short reference in the format "owner/repo#123"
    pub fn short_ref(&self) -> String {
        format!("{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// A GitHub identity normalized for output. `author_association` is only
/// known for issue authors and commenters; it serializes as null elsewhere.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Actor {
    pub username: Option<String>,
    pub id: Option<u64>,
    pub author_association: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TimestampMetrics {
    pub time_to_close_seconds: Option<i64>,
    pub time_to_first_comment_seconds: Option<i64>,
    pub time_to_first_response_seconds: Option<i64>,
    /// Days between creation and closure, or creation and the harvest run's
    /// clock for issues that are still open. Always present.
    pub time_open_days: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ParticipantMetrics {
    pub total_participants: usize,
    pub unique_commenters: usize,
    pub maintainer_participants: usize,
    pub has_maintainer_response: bool,
    pub participant_usernames: Vec<String>,
    pub commenter_usernames: Vec<String>,
    pub maintainer_usernames: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ReopenMetrics {
    pub was_reopened: bool,
    pub reopen_count: usize,
    pub time_to_reopen_seconds: Option<i64>,
    pub final_resolution_time_seconds: Option<i64>,
    pub reopen_timestamps: Vec<DateTime<Utc>>,
}

impl ReopenMetrics {
    pub fn empty() -> Self {
        Self {
            was_reopened: false,
            reopen_count: 0,
            time_to_reopen_seconds: None,
            final_resolution_time_seconds: None,
            reopen_timestamps: Vec::new(),
        }
    }
}

/// The pull request that resolved the issue, with diff and review aggregates.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClosingPull {
    pub number: u64,
    pub title: Option<String>,
    pub html_url: Option<String>,
    pub state: Option<String>,
    pub body: Option<String>,
    pub merged: bool,
    pub merged_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub author: Actor,
    pub merged_by: Option<Actor>,
    pub commits: Option<u64>,
    pub additions: Option<u64>,
    pub deletions: Option<u64>,
    pub total_changes: u64,
    pub changed_files: Option<u64>,
    pub review_comments: Option<u64>,
    pub comments: Option<u64>,
    pub total_reviews: usize,
    pub unique_reviewers: usize,
    pub reviewer_usernames: Vec<String>,
    pub approved_count: usize,
    pub changes_requested_count: usize,
    pub commented_count: usize,
    pub dismissed_count: usize,
    pub head_ref: Option<String>,
    pub base_ref: Option<String>,
    pub head_sha: Option<String>,
    pub merge_commit_sha: Option<String>,
}

/// The bare commit that resolved the issue when no PR was involved.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClosingCommit {
    pub sha: String,
    pub message: Option<String>,
    pub html_url: Option<String>,
    pub author: CommitIdentity,
    pub committer: CommitIdentity,
    pub additions: Option<u64>,
    pub deletions: Option<u64>,
    pub total_changes: Option<u64>,
    pub files_changed: usize,
}

/// Git-level identity plus the linked GitHub username when one exists.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CommitIdentity {
    pub username: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Label {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Milestone {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub due_on: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CommentRecord {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub author: Actor,
    pub body: Option<String>,
}

/// One fully enriched issue, the unit written to the JSONL output.
///
/// At most one of `closing_pr` / `closing_commit` is populated; both are null
/// for issues that are open or were closed without a linkable artifact.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DerivedRecord {
    pub owner: String,
    pub repo: String,
    pub number: u64,
    pub id: u64,
    pub html_url: String,
    pub title: String,
    pub body: Option<String>,
    pub state: String,
    pub state_reason: Option<String>,
    pub locked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub comments_count: u64,
    pub final_classification: Classification,
    pub is_bot_close: bool,
    pub author: Actor,
    pub closed_by: Option<Actor>,
    pub timestamp_metrics: TimestampMetrics,
    pub participant_metrics: ParticipantMetrics,
    pub reopen_metrics: ReopenMetrics,
    pub closing_pr: Option<ClosingPull>,
    pub closing_commit: Option<ClosingCommit>,
    pub assignees: Vec<Actor>,
    pub labels: Vec<Label>,
    pub milestone: Option<Milestone>,
    pub comments: Vec<CommentRecord>,
    pub comments_text: String,
}
