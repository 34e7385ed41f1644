use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::time::Duration;

use crate::enrich::DerivedRecord;

/// Check if stderr is a TTY (progress and summaries go to stderr so the
/// output file can be piped)
pub fn should_use_colors() -> bool {
    std::io::stderr().is_terminal()
}

/// One-line progress marker printed before fetching an issue
pub fn format_progress(index: usize, total: usize, url: &str, use_colors: bool) -> String {
    if use_colors {
        format!("[{}/{}] {}", index.bold(), total, url.cyan())
    } else {
        format!("[{}/{}] {}", index, total, url)
    }
}

/// One-line result marker printed after a record is written
pub fn format_result(record: &DerivedRecord, use_colors: bool) -> String {
    let closure = if let Some(pr) = &record.closing_pr {
        format!("closed by PR #{}", pr.number)
    } else if let Some(commit) = &record.closing_commit {
        format!("closed by commit {}", &commit.sha[..commit.sha.len().min(7)])
    } else if record.state == "closed" {
        "closed, no linked artifact".to_string()
    } else {
        "still open".to_string()
    };

    let detail = format!(
        "{} participants, {} comments, {}",
        record.participant_metrics.total_participants,
        record.comments.len(),
        closure
    );

    if use_colors {
        format!("  {} {}", "ok".green(), detail)
    } else {
        format!("  ok {}", detail)
    }
}

/// Run summary printed once at the end
pub fn format_summary(written: usize, failed: usize, elapsed: Duration, use_colors: bool) -> String {
    let line = format!(
        "Done: {} records written, {} failed, {:.1}s",
        written,
        failed,
        elapsed.as_secs_f64()
    );
    if use_colors && failed > 0 {
        format!("{}", line.yellow())
    } else {
        line
    }
}
