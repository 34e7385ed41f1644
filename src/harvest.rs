use anyhow::Result;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;

use crate::dataset::DatasetRow;
use crate::enrich::{
    assemble_record, parse_issue_url, reduce_timeline, AssembleInput, DerivedRecord, EnrichOptions,
};
use crate::github::{fetch_comments, fetch_issue, fetch_timeline, resolve_closing_artifact};

/// Fetch and enrich one labeled issue end to end.
///
/// This is the only place fetch and enrichment meet: raw payloads come in
/// sequentially, the timeline reducer decides which closing artifacts are
/// worth fetching, and the assembler does the rest without touching the
/// network. `now` is the harvest run's clock, shared across the whole run so
/// still-open durations are consistent within one output file.
///
/// Errors are per-issue: the caller logs them and moves on to the next row.
pub async fn harvest_issue(
    client: &Octocrab,
    row: &DatasetRow,
    options: &EnrichOptions,
    now: DateTime<Utc>,
    verbose: bool,
) -> Result<DerivedRecord> {
    let issue_ref = parse_issue_url(&row.html_url)?;

    let issue = fetch_issue(client, &issue_ref).await?;
    let comments = fetch_comments(client, &issue_ref).await?;

    // A missing timeline degrades every timeline-derived metric to its
    // empty value instead of dropping the whole issue.
    let events = match fetch_timeline(client, &issue_ref).await {
        Ok(events) => events,
        Err(e) => {
            eprintln!(
                "Warning: could not fetch timeline for {}: {}",
                issue_ref.short_ref(),
                e
            );
            Vec::new()
        }
    };

    let summary = reduce_timeline(&events, issue.created_at, issue.closed_at);

    let (closing_pr, closing_commit) = if issue.state == "closed" {
        resolve_closing_artifact(client, &issue_ref, &issue, &summary.candidates, options, verbose)
            .await?
    } else {
        (None, None)
    };

    Ok(assemble_record(
        AssembleInput {
            issue_ref: &issue_ref,
            issue: &issue,
            comments: &comments,
            events: &events,
            closing_pr,
            closing_commit,
            classification: row.classification,
            now,
        },
        options,
    ))
}
