use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;

use issue_harvest::output::{format_progress, format_result, format_summary, should_use_colors};

const EXIT_SUCCESS: i32 = 0;
const EXIT_AUTH: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Parser, Debug)]
#[command(name = "issue-harvest")]
#[command(about = "Harvests labeled GitHub issues into an enriched JSONL dataset", long_about = None)]
#[command(version)]
struct Cli {
    /// CSV of labeled issues (html_url, FINAL Classification columns)
    input: PathBuf,

    /// Output JSONL file, one enriched record per issue
    output: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/issue-harvest/config.yaml)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let cli = Cli::parse();
    let start_time = Instant::now();
    let use_colors = should_use_colors();

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match issue_harvest::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    let options = config.enrich_options();

    if cli.verbose {
        eprintln!("Maintainer roles: {:?}", options.maintainer_roles);
        eprintln!("Recognized bots: {:?}", options.recognized_bots);
        eprintln!(
            "Closing-artifact window: {}s",
            options.artifact_window_seconds
        );
    }

    // Read the labeled dataset
    let rows = match issue_harvest::dataset::read_dataset(&cli.input) {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("Dataset error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    if rows.is_empty() {
        eprintln!(
            "No usable rows in {} (need an html_url column with github.com issue URLs)",
            cli.input.display()
        );
        std::process::exit(EXIT_CONFIG);
    }

    let token = match issue_harvest::github::token_from_env(config.token_env.as_deref()) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Credential error: {}", e);
            std::process::exit(EXIT_AUTH);
        }
    };

    let client = match issue_harvest::github::create_client(&token) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create GitHub client: {}", e);
            std::process::exit(EXIT_NETWORK);
        }
    };

    let mut writer = match issue_harvest::output::JsonlWriter::create(&cli.output) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Output error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // One clock for the whole run so still-open durations are consistent
    // across the output file.
    let now = chrono::Utc::now();

    let total = rows.len();
    let mut written = 0usize;
    let mut failed = 0usize;

    for (i, row) in rows.iter().enumerate() {
        eprintln!(
            "{}",
            format_progress(i + 1, total, &row.html_url, use_colors)
        );

        match issue_harvest::harvest::harvest_issue(&client, row, &options, now, cli.verbose).await
        {
            Ok(record) => match writer.write_record(&record) {
                Ok(()) => {
                    written += 1;
                    if cli.verbose {
                        eprintln!("{}", format_result(&record, use_colors));
                    }
                }
                Err(e) => {
                    eprintln!("Failed to write record for {}: {}", row.html_url, e);
                    failed += 1;
                }
            },
            Err(e) => {
                // One bad issue never halts the batch.
                eprintln!("Error processing {}: {}", row.html_url, e);
                failed += 1;
            }
        }
    }

    if let Err(e) = writer.finish() {
        eprintln!("Failed to finalize output: {}", e);
        std::process::exit(EXIT_NETWORK);
    }

    eprintln!(
        "{}",
        format_summary(written, failed, start_time.elapsed(), use_colors)
    );

    if written == 0 {
        std::process::exit(EXIT_NETWORK);
    }
    std::process::exit(EXIT_SUCCESS);
}
