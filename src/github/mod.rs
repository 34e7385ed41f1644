pub mod client;
pub mod fetch;
pub mod types;

pub use client::{create_client, token_from_env};
pub use fetch::{fetch_comments, fetch_issue, fetch_timeline, resolve_closing_artifact};
