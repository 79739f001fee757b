//! # Weekly Push
//!
//! Picks one random past issue of a markdown weekly digest and pushes its
//! full text to subscribers through a push-notification API.
//!
//! ## Usage
//!
//! ```sh
//! WXPUSHER_APP_TOKEN=AT_xxx weekly_push --topic-id 34192
//! ```
//!
//! The binary performs exactly one run per invocation; schedule it with cron
//! or any other time-based trigger (the original deployment ran daily at
//! 03:30).
//!
//! ## Architecture
//!
//! The run is a straight pipeline:
//! 1. **Index**: download the markdown index of all issues
//! 2. **Parse**: recover year, month, number, title and link for each issue
//! 3. **Pick**: choose one issue uniformly at random
//! 4. **Content**: download the chosen issue's markdown
//! 5. **Notify**: POST the message to the push-notification API
//!
//! On success the API's JSON reply is printed to stdout. On failure a
//! `{"error": ...}` line is printed and the process exits non-zero, so the
//! trigger records a failed execution. Logs go to stderr.

use clap::Parser;
use serde_json::json;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod api;
mod cli;
mod config;
mod error;
mod fetch;
mod models;
mod pipeline;
mod scrapers;
mod select;
mod utils;

use cli::Cli;
use config::Config;
use error::PushError;
use pipeline::{Pipeline, RunOutcome};
use select::seeded_rng;
use utils::truncate_for_log;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!(version = env!("CARGO_PKG_VERSION"), "weekly_push starting up");

    let args = Cli::parse();
    debug!(config = ?args.config, dry_run = args.dry_run, seed = ?args.seed, "Parsed CLI arguments");

    match run(&args).await {
        Ok(reply) => {
            println!("{reply}");
            let elapsed = start_time.elapsed();
            info!(?elapsed, millis = elapsed.as_millis() as u64, "Execution complete");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Run failed");
            println!("{}", json!({ "error": e.to_string() }));
            Err(e.into())
        }
    }
}

/// One run; returns the JSON document to report on stdout.
async fn run(args: &Cli) -> Result<serde_json::Value, PushError> {
    let config = Config::resolve(args)?;
    info!(
        index_url = %config.index_url,
        topics = config.topic_ids.len(),
        uids = config.uids.len(),
        "Configuration resolved"
    );

    let client = reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let mut rng = seeded_rng(args.seed);

    match Pipeline::new(&config, client).run(&mut rng, args.dry_run).await? {
        RunOutcome::Delivered(reply) => {
            debug!(reply = %truncate_for_log(&reply.to_string(), 300), "Notification API reply");
            Ok(reply)
        }
        RunOutcome::DryRun(payload) => Ok(serde_json::to_value(payload.redacted())?),
    }
}
