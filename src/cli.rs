//! Command-line interface definitions for weekly_push.
//!
//! Every option can be given as a flag or through the environment, which is
//! how a scheduler usually passes secrets. Options left unset fall back to the
//! YAML file named by `--config`, then to built-in defaults.

use clap::Parser;

/// Push one random weekly-digest issue to subscribers.
///
/// # Examples
///
/// ```sh
/// # Token and topic from the environment
/// WXPUSHER_APP_TOKEN=AT_xxx WXPUSHER_TOPIC_IDS=34192 weekly_push
///
/// # Everything from a file, see what would be sent
/// weekly_push -c weekly_push.yaml --dry-run
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML configuration file
    #[arg(short, long, env = "WEEKLY_PUSH_CONFIG")]
    pub config: Option<String>,

    /// Application token for the push-notification service
    #[arg(long, env = "WXPUSHER_APP_TOKEN", hide_env_values = true)]
    pub app_token: Option<String>,

    /// Topic id to deliver to (repeatable)
    #[arg(long = "topic-id", env = "WXPUSHER_TOPIC_IDS", value_delimiter = ',')]
    pub topic_ids: Vec<u64>,

    /// Recipient uid to deliver to (repeatable)
    #[arg(long = "uid", env = "WXPUSHER_UIDS", value_delimiter = ',')]
    pub uids: Vec<String>,

    /// Build the message but print it instead of sending it
    #[arg(long)]
    pub dry_run: bool,

    /// Seed for the random issue pick
    #[arg(long)]
    pub seed: Option<u64>,
}
