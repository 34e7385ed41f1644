use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

use super::record::ReopenMetrics;
use crate::github::types::RawTimelineEvent;

/// A closing-artifact lead discovered on the timeline. Candidates are ordered
/// by how directly they are tied to the closure; the fetch layer resolves
/// them lazily and [`select_closing_pull`] picks the winner.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArtifactCandidate {
    Pull(u64),
    Commit(String),
}

/// Everything the reducer learns from one chronological walk of the timeline.
#[derive(Debug, Clone)]
pub struct TimelineSummary {
    pub reopen: ReopenMetrics,
    pub candidates: Vec<ArtifactCandidate>,
    /// True when the walk ends with the issue open (no close, or a reopen
    /// after the last close).
    pub ends_open: bool,
}

/// Merge/close timing for one candidate PR, supplied by the fetch layer.
#[derive(Debug, Clone)]
pub struct PullTiming {
    pub number: u64,
    pub merged_at: Option<DateTime<Utc>>,
}

/// Walk the timeline in chronological order, deriving reopen history and
/// gathering closing-artifact candidates.
pub fn reduce_timeline(
    events: &[RawTimelineEvent],
    created_at: DateTime<Utc>,
    closed_at: Option<DateTime<Utc>>,
) -> TimelineSummary {
    let mut reopen = ReopenMetrics::empty();
    let mut first_close: Option<DateTime<Utc>> = None;
    let mut last_close: Option<DateTime<Utc>> = None;
    let mut open = true;

    for event in events {
        match event.event.as_str() {
            "closed" => {
                if let Some(ts) = event.created_at {
                    if first_close.is_none() {
                        first_close = Some(ts);
                    }
                    last_close = Some(ts);
                }
                open = false;
            }
            "reopened" => {
                if let Some(ts) = event.created_at {
                    reopen.reopen_count += 1;
                    reopen.reopen_timestamps.push(ts);
                    if reopen.time_to_reopen_seconds.is_none() {
                        if let Some(close_ts) = first_close {
                            reopen.time_to_reopen_seconds =
                                Some((ts - close_ts).num_seconds().max(0));
                        }
                    }
                }
                open = true;
            }
            _ => {}
        }
    }

    reopen.was_reopened = reopen.reopen_count > 0;

    // The timeline can be missing close events that the issue itself records
    // (truncated history). Fall back to the issue's own closed_at.
    if last_close.is_none() {
        if let Some(ts) = closed_at {
            last_close = Some(ts);
            open = false;
        }
    }

    if !open {
        if let Some(ts) = last_close {
            reopen.final_resolution_time_seconds = Some((ts - created_at).num_seconds().max(0));
        }
    }

    TimelineSummary {
        reopen,
        candidates: collect_candidates(events),
        ends_open: open,
    }
}

/// Gather PR/commit candidates in the priority order the closure-detection
/// strategies use: the final close event's own source first, then
/// cross-references and plain references newest-first, then the close
/// event's commit SHA as a last resort.
fn collect_candidates(events: &[RawTimelineEvent]) -> Vec<ArtifactCandidate> {
    let mut candidates = Vec::new();

    let last_closed = events
        .iter()
        .filter(|e| e.event == "closed")
        .max_by_key(|e| e.created_at);

    if let Some(event) = last_closed {
        if let Some(number) = source_pull_number(event) {
            candidates.push(ArtifactCandidate::Pull(number));
        }
    }

    for kind in ["cross-referenced", "referenced"] {
        let mut refs: Vec<&RawTimelineEvent> =
            events.iter().filter(|e| e.event == kind).collect();
        refs.sort_by_key(|e| e.created_at);
        for event in refs.iter().rev() {
            if let Some(number) = source_pull_number(event) {
                candidates.push(ArtifactCandidate::Pull(number));
            } else if let Some(sha) = event_commit_sha(event) {
                candidates.push(ArtifactCandidate::Commit(sha));
            }
        }
    }

    if let Some(event) = last_closed {
        if let Some(sha) = event_commit_sha(event) {
            candidates.push(ArtifactCandidate::Commit(sha));
        }
    }

    let mut seen = HashSet::new();
    candidates.retain(|c| seen.insert(c.clone()));
    candidates
}

/// PRs surface on timeline events as a `source` of type "issue" with a
/// nested issue number.
fn source_pull_number(event: &RawTimelineEvent) -> Option<u64> {
    let source = event.source.as_ref()?;
    if source.kind.as_deref() != Some("issue") {
        return None;
    }
    source.issue.as_ref()?.number
}

fn event_commit_sha(event: &RawTimelineEvent) -> Option<String> {
    if let Some(sha) = &event.commit_id {
        return Some(sha.clone());
    }
    // Some events carry only commit_url; the SHA is its last path segment.
    let url = event.commit_url.as_deref()?;
    let sha = url.trim_end_matches('/').rsplit('/').next()?;
    if sha.is_empty() {
        None
    } else {
        Some(sha.to_string())
    }
}

/// Pick the closing PR among candidates: it must be merged, merged no earlier
/// than the issue was created, and merged within `window` of the issue's
/// closure. Ties between surviving candidates go to the merge time closest to
/// closed_at.
pub fn select_closing_pull(
    pulls: &[PullTiming],
    created_at: DateTime<Utc>,
    closed_at: Option<DateTime<Utc>>,
    window: Duration,
) -> Option<u64> {
    let closed_at = closed_at?;

    pulls
        .iter()
        .filter_map(|p| {
            let merged_at = p.merged_at?;
            if merged_at < created_at {
                return None;
            }
            let drift = (merged_at - closed_at).num_seconds().abs();
            if drift > window.num_seconds() {
                return None;
            }
            Some((drift, p.number))
        })
        .min_by_key(|(drift, _)| *drift)
        .map(|(_, number)| number)
}
