use chrono::{DateTime, Utc};

use super::bots::is_bot_close;
use super::metrics::synthesize_timestamps;
use super::participants::aggregate_participants;
use super::record::{
    Actor, ClosingCommit, ClosingPull, CommentRecord, DerivedRecord, IssueRef, Label, Milestone,
};
use super::timeline::reduce_timeline;
use super::EnrichOptions;
use crate::dataset::Classification;
use crate::github::types::{RawComment, RawIssue, RawTimelineEvent};

/// Everything needed to produce one record. The closing PR/commit sections
/// are pre-fetched by the caller, driven by the timeline reducer's candidate
/// list; the assembler itself never touches the network.
pub struct AssembleInput<'a> {
    pub issue_ref: &'a IssueRef,
    pub issue: &'a RawIssue,
    pub comments: &'a [RawComment],
    pub events: &'a [RawTimelineEvent],
    pub closing_pr: Option<ClosingPull>,
    pub closing_commit: Option<ClosingCommit>,
    pub classification: Classification,
    /// The harvest run's clock, used for still-open durations.
    pub now: DateTime<Utc>,
}

/// Pure transform from one issue's raw payloads to its output record.
pub fn assemble_record(input: AssembleInput<'_>, options: &EnrichOptions) -> DerivedRecord {
    let issue = input.issue;

    // Comments arrive in API order; sort defensively so the transcript and
    // first-response math stay chronological even if a page came back odd.
    let mut ordered: Vec<&RawComment> = input.comments.iter().collect();
    ordered.sort_by_key(|c| c.created_at);

    let sorted: Vec<RawComment> = ordered.iter().map(|c| (*c).clone()).collect();

    let summary = reduce_timeline(input.events, issue.created_at, issue.closed_at);
    let timestamp_metrics = synthesize_timestamps(issue, &sorted, options, input.now);
    let participant_metrics = aggregate_participants(issue, &sorted, options);

    let author = Actor {
        username: issue.user.as_ref().map(|u| u.login.clone()),
        id: issue.user.as_ref().map(|u| u.id),
        author_association: issue.author_association.clone(),
    };
    let closed_by = issue.closed_by.as_ref().map(|u| Actor {
        username: Some(u.login.clone()),
        id: Some(u.id),
        author_association: None,
    });

    // At most one closing artifact; a PR always wins over a bare commit
    // since the commit is usually just the PR's head.
    let (closing_pr, closing_commit): (Option<ClosingPull>, Option<ClosingCommit>) =
        match (input.closing_pr, input.closing_commit) {
            (Some(pr), _) => (Some(pr), None),
            (None, commit) => (None, commit),
        };

    let comments_text = build_transcript(&ordered);
    let comments = ordered
        .iter()
        .map(|c| CommentRecord {
            id: c.id,
            created_at: c.created_at,
            updated_at: c.updated_at,
            author: Actor {
                username: c.user.as_ref().map(|u| u.login.clone()),
                id: c.user.as_ref().map(|u| u.id),
                author_association: c.author_association.clone(),
            },
            body: c.body.clone(),
        })
        .collect();

    DerivedRecord {
        owner: input.issue_ref.owner.clone(),
        repo: input.issue_ref.repo.clone(),
        number: issue.number,
        id: issue.id,
        html_url: issue.html_url.clone(),
        title: issue.title.clone(),
        body: issue.body.clone(),
        state: issue.state.clone(),
        state_reason: issue.state_reason.clone(),
        locked: issue.locked,
        created_at: issue.created_at,
        updated_at: issue.updated_at,
        closed_at: issue.closed_at,
        comments_count: issue.comments,
        final_classification: input.classification,
        is_bot_close: is_bot_close(closed_by.as_ref(), &options.recognized_bots),
        author,
        closed_by,
        timestamp_metrics,
        participant_metrics,
        reopen_metrics: summary.reopen,
        closing_pr,
        closing_commit,
        assignees: issue
            .assignees
            .iter()
            .map(|u| Actor {
                username: Some(u.login.clone()),
                id: Some(u.id),
                author_association: None,
            })
            .collect(),
        labels: issue
            .labels
            .iter()
            .map(|l| Label {
                name: l.name.clone(),
                description: l.description.clone(),
                color: l.color.clone(),
            })
            .collect(),
        milestone: issue.milestone.as_ref().map(|m| Milestone {
            number: m.number,
            title: m.title.clone(),
            state: m.state.clone(),
            due_on: m.due_on,
        }),
        comments,
        comments_text,
    }
}

/// Human-readable transcript: one block per comment in chronological order,
/// `[YYYY-MM-DD HH:MMZ] [ASSOCIATION] username:` followed by the body,
/// blocks joined by a `---` separator line.
fn build_transcript(comments: &[&RawComment]) -> String {
    let blocks: Vec<String> = comments
        .iter()
        .map(|c| {
            let ts = c.created_at.format("%Y-%m-%d %H:%MZ");
            let username = c
                .user
                .as_ref()
                .map(|u| u.login.as_str())
                .unwrap_or("unknown");
            let assoc = c.author_association.as_deref().unwrap_or("UNKNOWN");
            let body = c.body.as_deref().unwrap_or("");
            format!("[{}] [{}] {}:\n{}", ts, assoc, username, body)
        })
        .collect();
    blocks.join("\n\n---\n\n")
}
