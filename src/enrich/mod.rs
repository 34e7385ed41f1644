pub mod artifacts;
pub mod assembler;
pub mod bots;
pub mod identifier;
pub mod metrics;
pub mod participants;
pub mod record;
pub mod timeline;

pub use assembler::{assemble_record, AssembleInput};
pub use identifier::parse_issue_url;
pub use record::{DerivedRecord, IssueRef};
pub use timeline::{reduce_timeline, ArtifactCandidate, TimelineSummary};

/// Knobs for the enrichment core. Role membership and bot identities are
/// repository policy, not domain logic, so they come from configuration.
#[derive(Debug, Clone)]
pub struct EnrichOptions {
    /// `author_association` values that count as maintainers.
    pub maintainer_roles: Vec<String>,
    /// Usernames (matched case-insensitively, equals-or-contains) that mark a
    /// closure as automated.
    pub recognized_bots: Vec<String>,
    /// How far a candidate PR's merge time may drift from the issue's
    /// closed_at and still count as the closing artifact.
    pub artifact_window_seconds: i64,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            maintainer_roles: vec![
                "OWNER".to_string(),
                "MEMBER".to_string(),
                "COLLABORATOR".to_string(),
            ],
            recognized_bots: vec!["stale[bot]".to_string(), "vue-bot".to_string()],
            // 7 days
            artifact_window_seconds: 604_800,
        }
    }
}

impl EnrichOptions {
    pub fn is_maintainer_role(&self, association: Option<&str>) -> bool {
        match association {
            Some(assoc) => self.maintainer_roles.iter().any(|r| r == assoc),
            None => false,
        }
    }
}
