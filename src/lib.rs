pub mod config;
pub mod dataset;
pub mod enrich;
pub mod github;
pub mod harvest;
pub mod output;
