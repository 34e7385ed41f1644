use anyhow::{bail, Result};

use super::record::IssueRef;

/// Extract (owner, repo, number) from an issue HTML URL of the form
/// `https://github.com/<owner>/<repo>/issues/<number>`.
///
/// Rejects anything that isn't an issue URL so a bad dataset row fails loudly
/// instead of producing a half-parsed reference.
pub fn parse_issue_url(url: &str) -> Result<IssueRef> {
    let trimmed = url.trim().trim_end_matches('/');
    let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

    if segments.len() < 4 {
        bail!("Issue URL has too few path segments: {}", url);
    }

    let number_seg = segments[segments.len() - 1];
    let kind_seg = segments[segments.len() - 2];
    let repo = segments[segments.len() - 3];
    let owner = segments[segments.len() - 4];

    if kind_seg != "issues" {
        bail!("Not an issue URL (expected /issues/<number>): {}", url);
    }
    // Guard against URLs so short that the host lands in the owner/repo slot.
    if owner.contains(':') || owner.contains('.') {
        bail!("Issue URL is missing owner/repo segments: {}", url);
    }

    let number: u64 = match number_seg.parse() {
        Ok(n) => n,
        Err(_) => bail!("Issue number is not numeric in URL: {}", url),
    };

    Ok(IssueRef {
        owner: owner.to_string(),
        repo: repo.to_string(),
        number,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_url() {
        let r = parse_issue_url("https://github.com/vuejs/vue/issues/1234").unwrap();
        assert_eq!(r.owner, "vuejs");
        assert_eq!(r.repo, "vue");
        assert_eq!(r.number, 1234);
    }

    #[test]
    fn test_parse_trailing_slash_and_whitespace() {
        let r = parse_issue_url("  https://github.com/rust-lang/rust/issues/42/  ").unwrap();
        assert_eq!(r.owner, "rust-lang");
        assert_eq!(r.repo, "rust");
        assert_eq!(r.number, 42);
    }

    #[test]
    fn test_parse_repo_with_dot() {
        let r = parse_issue_url("https://github.com/vercel/next.js/issues/7").unwrap();
        assert_eq!(r.owner, "vercel");
        assert_eq!(r.repo, "next.js");
    }

    #[test]
    fn test_reject_pull_request_url() {
        let err = parse_issue_url("https://github.com/vuejs/vue/pull/1234").unwrap_err();
        assert!(err.to_string().contains("Not an issue URL"));
    }

    #[test]
    fn test_reject_non_numeric_number() {
        let err = parse_issue_url("https://github.com/vuejs/vue/issues/abc").unwrap_err();
        assert!(err.to_string().contains("not numeric"));
    }

    #[test]
    fn test_reject_missing_segments() {
        assert!(parse_issue_url("https://github.com/issues/5").is_err());
        assert!(parse_issue_url("issues/5").is_err());
        assert!(parse_issue_url("").is_err());
    }
}
