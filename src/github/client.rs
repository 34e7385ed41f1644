use anyhow::{Context, Result};
use octocrab::Octocrab;

/// Environment variable holding the API token unless the config names
/// another one.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Read the API token from the environment, from `var` when the config
/// overrides the default variable name. Harvesting unauthenticated is
/// pointless (60 requests/hour), so a missing token is a hard error.
pub fn token_from_env(var: Option<&str>) -> Result<String> {
    let var = var.unwrap_or(TOKEN_ENV);
    std::env::var(var)
        .ok()
        .filter(|t| !t.trim().is_empty())
        .with_context(|| format!("Set the {} environment variable to a GitHub API token", var))
}

/// Create an authenticated GitHub client using a personal access token
pub fn create_client(token: &str) -> Result<Octocrab> {
    Octocrab::builder()
        .personal_token(token.to_string())
        .build()
        .context("Failed to create GitHub client")
}
