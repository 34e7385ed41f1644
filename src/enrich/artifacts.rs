use std::collections::BTreeSet;

use super::record::{Actor, ClosingCommit, ClosingPull, CommitIdentity};
use crate::github::types::{RawActor, RawCommit, RawGitIdentity, RawPull, RawReview};

fn actor(raw: &RawActor) -> Actor {
    Actor {
        username: Some(raw.login.clone()),
        id: Some(raw.id),
        author_association: None,
    }
}

fn null_actor() -> Actor {
    Actor {
        username: None,
        id: None,
        author_association: None,
    }
}

/// Reshape a raw PR payload plus its reviews into the closing-PR section of
/// the output record.
pub fn pull_metrics(raw: &RawPull, reviews: &[RawReview]) -> ClosingPull {
    let mut reviewers: BTreeSet<String> = BTreeSet::new();
    let mut approved = 0;
    let mut changes_requested = 0;
    let mut commented = 0;
    let mut dismissed = 0;

    for review in reviews {
        if let Some(user) = &review.user {
            reviewers.insert(user.login.clone());
        }
        match review.state.as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("approved") => approved += 1,
            Some("changes_requested") => changes_requested += 1,
            Some("commented") => commented += 1,
            Some("dismissed") => dismissed += 1,
            _ => {}
        }
    }

    ClosingPull {
        number: raw.number,
        title: raw.title.clone(),
        html_url: raw.html_url.clone(),
        state: raw.state.clone(),
        body: raw.body.clone(),
        merged: raw.merged_at.is_some(),
        merged_at: raw.merged_at,
        created_at: raw.created_at,
        updated_at: raw.updated_at,
        closed_at: raw.closed_at,
        author: raw.user.as_ref().map(actor).unwrap_or_else(null_actor),
        merged_by: raw.merged_by.as_ref().map(actor),
        commits: raw.commits,
        additions: raw.additions,
        deletions: raw.deletions,
        total_changes: raw.additions.unwrap_or(0) + raw.deletions.unwrap_or(0),
        changed_files: raw.changed_files,
        review_comments: raw.review_comments,
        comments: raw.comments,
        total_reviews: reviews.len(),
        unique_reviewers: reviewers.len(),
        reviewer_usernames: reviewers.into_iter().collect(),
        approved_count: approved,
        changes_requested_count: changes_requested,
        commented_count: commented,
        dismissed_count: dismissed,
        head_ref: raw.head.as_ref().and_then(|h| h.branch.clone()),
        base_ref: raw.base.as_ref().and_then(|b| b.branch.clone()),
        head_sha: raw.head.as_ref().and_then(|h| h.sha.clone()),
        merge_commit_sha: raw.merge_commit_sha.clone(),
    }
}

fn commit_identity(account: Option<&RawActor>, git: Option<&RawGitIdentity>) -> CommitIdentity {
    CommitIdentity {
        username: account.map(|a| a.login.clone()),
        name: git.and_then(|g| g.name.clone()),
        email: git.and_then(|g| g.email.clone()),
        date: git.and_then(|g| g.date),
    }
}

/// Reshape a raw commit payload into the closing-commit section of the
/// output record. Either identity may lack a linked GitHub account.
pub fn commit_metrics(raw: &RawCommit) -> ClosingCommit {
    let stats = raw.stats.as_ref();
    ClosingCommit {
        sha: raw.sha.clone(),
        message: raw.commit.message.clone(),
        html_url: raw.html_url.clone(),
        author: commit_identity(raw.author.as_ref(), raw.commit.author.as_ref()),
        committer: commit_identity(raw.committer.as_ref(), raw.commit.committer.as_ref()),
        additions: stats.and_then(|s| s.additions),
        deletions: stats.and_then(|s| s.deletions),
        total_changes: stats.and_then(|s| s.total),
        files_changed: raw.files.len(),
    }
}
