use serde::Deserialize;

use crate::enrich::EnrichOptions;

/// Harvester configuration, loaded from YAML. Every field is optional;
/// defaults match the repositories the dataset was originally collected from.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// author_association values that count as maintainers.
    pub maintainer_roles: Option<Vec<String>>,
    /// Usernames that mark a closure as automated.
    pub recognized_bots: Option<Vec<String>>,
    /// Max drift, in seconds, between a candidate PR's merge time and the
    /// issue's closed_at for the PR to count as the closing artifact.
    pub artifact_window_seconds: Option<i64>,
    /// Environment variable to read the API token from, when GITHUB_TOKEN
    /// isn't the one.
    pub token_env: Option<String>,
}

impl Config {
    /// Resolve the enrichment options, filling unset fields from defaults.
    pub fn enrich_options(&self) -> EnrichOptions {
        let defaults = EnrichOptions::default();
        EnrichOptions {
            maintainer_roles: self
                .maintainer_roles
                .clone()
                .unwrap_or(defaults.maintainer_roles),
            recognized_bots: self
                .recognized_bots
                .clone()
                .unwrap_or(defaults.recognized_bots),
            artifact_window_seconds: self
                .artifact_window_seconds
                .unwrap_or(defaults.artifact_window_seconds),
        }
    }
}
