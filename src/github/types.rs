use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A GitHub account as it appears nested in issue/comment/PR payloads.
#[derive(Debug, Clone, Deserialize)]
pub struct RawActor {
    pub login: String,
    pub id: u64,
}

/// Raw issue payload from `GET /repos/{owner}/{repo}/issues/{number}`.
///
/// Only the fields the enrichment core consumes are deserialized; everything
/// else in the payload is dropped on the floor.
#[derive(Debug, Clone, Deserialize)]
pub struct RawIssue {
    pub number: u64,
    pub id: u64,
    pub html_url: String,
    pub title: String,
    pub body: Option<String>,
    pub state: String,
    pub state_reason: Option<String>,
    #[serde(default)]
    pub locked: bool,
    /// Comment count as reported by the API (the `comments` field).
    #[serde(default)]
    pub comments: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub user: Option<RawActor>,
    pub closed_by: Option<RawActor>,
    pub author_association: Option<String>,
    #[serde(default)]
    pub assignees: Vec<RawActor>,
    #[serde(default)]
    pub labels: Vec<RawLabel>,
    pub milestone: Option<RawMilestone>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLabel {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMilestone {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub due_on: Option<DateTime<Utc>>,
}

/// Raw issue comment from `GET /repos/{owner}/{repo}/issues/{number}/comments`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawComment {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub user: Option<RawActor>,
    pub author_association: Option<String>,
    pub body: Option<String>,
}

/// One entry from the issue timeline API. The `event` discriminant decides
/// which of the optional fields are populated; unknown event kinds are kept
/// but ignored by the reducer.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTimelineEvent {
    #[serde(default)]
    pub event: String,
    pub created_at: Option<DateTime<Utc>>,
    pub commit_id: Option<String>,
    pub commit_url: Option<String>,
    pub source: Option<RawEventSource>,
}

/// `source` payload on cross-referenced / closed events. PRs surface here
/// with `type == "issue"` plus a nested issue object carrying the number.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEventSource {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub issue: Option<RawSourceIssue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSourceIssue {
    pub number: Option<u64>,
}

/// Raw pull request payload from `GET /repos/{owner}/{repo}/pulls/{number}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPull {
    pub number: u64,
    pub title: Option<String>,
    pub html_url: Option<String>,
    pub state: Option<String>,
    pub body: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub merged_at: Option<DateTime<Utc>>,
    pub user: Option<RawActor>,
    pub merged_by: Option<RawActor>,
    pub commits: Option<u64>,
    pub additions: Option<u64>,
    pub deletions: Option<u64>,
    pub changed_files: Option<u64>,
    pub review_comments: Option<u64>,
    pub comments: Option<u64>,
    pub head: Option<RawBranchRef>,
    pub base: Option<RawBranchRef>,
    pub merge_commit_sha: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawBranchRef {
    #[serde(rename = "ref")]
    pub branch: Option<String>,
    pub sha: Option<String>,
}

/// One review from `GET /repos/{owner}/{repo}/pulls/{number}/reviews`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawReview {
    pub user: Option<RawActor>,
    pub state: Option<String>,
}

/// Raw commit payload from `GET /repos/{owner}/{repo}/commits/{sha}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCommit {
    pub sha: String,
    pub html_url: Option<String>,
    pub commit: RawCommitDetail,
    /// Linked GitHub account of the author, if any. Commits authored with an
    /// unrecognized email have no account here.
    pub author: Option<RawActor>,
    pub committer: Option<RawActor>,
    pub stats: Option<RawCommitStats>,
    #[serde(default)]
    pub files: Vec<RawCommitFile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCommitDetail {
    pub message: Option<String>,
    pub author: Option<RawGitIdentity>,
    pub committer: Option<RawGitIdentity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawGitIdentity {
    pub name: Option<String>,
    pub email: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCommitStats {
    pub additions: Option<u64>,
    pub deletions: Option<u64>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCommitFile {
    pub filename: Option<String>,
}
