use anyhow::{anyhow, Result};
use chrono::Duration;
use octocrab::Octocrab;
use serde::de::DeserializeOwned;
use serde_json::json;
use tokio_retry::{strategy::ExponentialBackoff, RetryIf};

use super::types::{RawComment, RawCommit, RawIssue, RawPull, RawReview, RawTimelineEvent};
use crate::enrich::record::{ClosingCommit, ClosingPull, IssueRef};
use crate::enrich::timeline::{select_closing_pull, ArtifactCandidate, PullTiming};
use crate::enrich::{artifacts, EnrichOptions};

const PER_PAGE: usize = 100;

fn is_not_found(error: &octocrab::Error) -> bool {
    let error_str = format!("{:?}", error);
    error_str.contains("404") || error_str.contains("Not Found")
}

fn describe_api_error(error: octocrab::Error, route: &str) -> anyhow::Error {
    // Extract useful error info from octocrab error
    let error_str = format!("{:?}", error);
    if error_str.contains("rate limit") || error_str.contains("403") {
        anyhow!(
            "GitHub API rate limit exceeded on {}. Wait a few minutes and try again.",
            route
        )
    } else if error_str.contains("401") || error_str.contains("Bad credentials") {
        anyhow!("Authentication failed. Your GitHub token may be invalid or expired.")
    } else {
        anyhow!("GitHub API error on {}: {}", route, error)
    }
}

/// One authenticated GET with exponential-backoff retries. 404s are not
/// retried; the caller decides whether they're fatal.
async fn get_json<T>(client: &Octocrab, route: &str, page: Option<usize>) -> Result<T>
where
    T: DeserializeOwned,
{
    let retry_strategy = ExponentialBackoff::from_millis(500)
        .max_delay(std::time::Duration::from_secs(60))
        .take(4);

    let params = page.map(|p| json!({ "per_page": PER_PAGE, "page": p }));

    RetryIf::spawn(
        retry_strategy,
        || client.get(route, params.as_ref()),
        |e: &octocrab::Error| !is_not_found(e),
    )
    .await
    .map_err(|e| describe_api_error(e, route))
}

/// Fetch every page of a list endpoint.
async fn get_paginated<T>(client: &Octocrab, route: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned,
{
    let mut items = Vec::new();
    let mut page = 1;
    loop {
        let batch: Vec<T> = get_json(client, route, Some(page)).await?;
        let batch_len = batch.len();
        items.extend(batch);
        if batch_len < PER_PAGE {
            break;
        }
        page += 1;
    }
    Ok(items)
}

pub async fn fetch_issue(client: &Octocrab, issue: &IssueRef) -> Result<RawIssue> {
    let route = format!(
        "/repos/{}/{}/issues/{}",
        issue.owner, issue.repo, issue.number
    );
    get_json(client, &route, None).await
}

pub async fn fetch_comments(client: &Octocrab, issue: &IssueRef) -> Result<Vec<RawComment>> {
    let route = format!(
        "/repos/{}/{}/issues/{}/comments",
        issue.owner, issue.repo, issue.number
    );
    get_paginated(client, &route).await
}

pub async fn fetch_timeline(client: &Octocrab, issue: &IssueRef) -> Result<Vec<RawTimelineEvent>> {
    let route = format!(
        "/repos/{}/{}/issues/{}/timeline",
        issue.owner, issue.repo, issue.number
    );
    get_paginated(client, &route).await
}

/// Fetch one PR's details. A 404 is expected for cross-repo or deleted PRs
/// and comes back as None.
pub async fn fetch_pull(client: &Octocrab, issue: &IssueRef, number: u64) -> Result<Option<RawPull>> {
    let route = format!("/repos/{}/{}/pulls/{}", issue.owner, issue.repo, number);
    match get_json(client, &route, None).await {
        Ok(pull) => Ok(Some(pull)),
        Err(e) if e.to_string().contains("404") || e.to_string().contains("Not Found") => Ok(None),
        Err(e) => Err(e),
    }
}

pub async fn fetch_pull_reviews(
    client: &Octocrab,
    issue: &IssueRef,
    number: u64,
) -> Result<Vec<RawReview>> {
    let route = format!(
        "/repos/{}/{}/pulls/{}/reviews",
        issue.owner, issue.repo, number
    );
    get_paginated(client, &route).await
}

pub async fn fetch_commit(
    client: &Octocrab,
    issue: &IssueRef,
    sha: &str,
) -> Result<Option<RawCommit>> {
    let route = format!("/repos/{}/{}/commits/{}", issue.owner, issue.repo, sha);
    match get_json(client, &route, None).await {
        Ok(commit) => Ok(Some(commit)),
        Err(e) if e.to_string().contains("404") || e.to_string().contains("Not Found") => Ok(None),
        Err(e) => Err(e),
    }
}

/// PRs associated with a commit, used to tell "closed by merged PR" apart
/// from "closed by a direct push".
pub async fn fetch_pulls_for_commit(
    client: &Octocrab,
    issue: &IssueRef,
    sha: &str,
) -> Result<Vec<RawPull>> {
    let route = format!("/repos/{}/{}/commits/{}/pulls", issue.owner, issue.repo, sha);
    get_json(client, &route, None).await
}

/// Resolve the timeline reducer's candidate list into at most one closing
/// artifact, fetching lazily.
///
/// Commit candidates are first promoted to PR candidates when the commit
/// belongs to a merged PR (the commit is usually just that PR's head). All
/// surviving PR candidates are fetched and the one merged closest to the
/// issue's closure wins; only if no PR qualifies does a bare commit become
/// the artifact.
pub async fn resolve_closing_artifact(
    client: &Octocrab,
    issue_ref: &IssueRef,
    raw_issue: &RawIssue,
    candidates: &[ArtifactCandidate],
    options: &EnrichOptions,
    verbose: bool,
) -> Result<(Option<ClosingPull>, Option<ClosingCommit>)> {
    if raw_issue.closed_at.is_none() || candidates.is_empty() {
        return Ok((None, None));
    }

    let mut pr_numbers: Vec<u64> = Vec::new();
    let mut commit_shas: Vec<String> = Vec::new();

    for candidate in candidates {
        match candidate {
            ArtifactCandidate::Pull(number) => {
                if !pr_numbers.contains(number) {
                    pr_numbers.push(*number);
                }
            }
            ArtifactCandidate::Commit(sha) => {
                match fetch_pulls_for_commit(client, issue_ref, sha).await {
                    Ok(pulls) if !pulls.is_empty() => {
                        let number = pulls[0].number;
                        if verbose {
                            eprintln!(
                                "  {}: commit {} belongs to PR #{}",
                                issue_ref.short_ref(),
                                &sha[..sha.len().min(7)],
                                number
                            );
                        }
                        if !pr_numbers.contains(&number) {
                            pr_numbers.push(number);
                        }
                    }
                    Ok(_) => commit_shas.push(sha.clone()),
                    Err(e) => {
                        eprintln!(
                            "Warning: could not look up PRs for commit {}: {}",
                            &sha[..sha.len().min(7)],
                            e
                        );
                        commit_shas.push(sha.clone());
                    }
                }
            }
        }
    }

    let mut pulls: Vec<RawPull> = Vec::new();
    for number in &pr_numbers {
        match fetch_pull(client, issue_ref, *number).await {
            Ok(Some(pull)) => pulls.push(pull),
            Ok(None) => {} // cross-repo or deleted PR
            Err(e) => {
                eprintln!("Warning: could not fetch PR #{}: {}", number, e);
            }
        }
    }

    let timings: Vec<PullTiming> = pulls
        .iter()
        .map(|p| PullTiming {
            number: p.number,
            merged_at: p.merged_at,
        })
        .collect();

    let window = Duration::seconds(options.artifact_window_seconds);
    if let Some(winner) =
        select_closing_pull(&timings, raw_issue.created_at, raw_issue.closed_at, window)
    {
        // The winner came from `timings`, so it is present in `pulls`.
        if let Some(pull) = pulls.iter().find(|p| p.number == winner) {
            if verbose {
                eprintln!("  {}: closed by PR #{}", issue_ref.short_ref(), winner);
            }
            let reviews = match fetch_pull_reviews(client, issue_ref, winner).await {
                Ok(reviews) => reviews,
                Err(e) => {
                    eprintln!("Warning: could not fetch reviews for PR #{}: {}", winner, e);
                    Vec::new()
                }
            };
            return Ok((Some(artifacts::pull_metrics(pull, &reviews)), None));
        }
    }

    for sha in &commit_shas {
        if let Some(commit) = fetch_commit(client, issue_ref, sha).await? {
            if verbose {
                eprintln!(
                    "  {}: closed by direct commit {}",
                    issue_ref.short_ref(),
                    &sha[..sha.len().min(7)]
                );
            }
            return Ok((None, Some(artifacts::commit_metrics(&commit))));
        }
    }

    Ok((None, None))
}
