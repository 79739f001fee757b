//! Run configuration.
//!
//! A [`Config`] is built once at startup from an optional YAML file and the
//! command line (flags or environment variables, see [`Cli`]), then handed to
//! the pipeline by reference. Command-line values win over the file.
//!
//! ```yaml
//! app_token: AT_xxxxxxxx
//! topic_ids: [34192]
//! uids: []
//! content_type: 3
//! verify_pay_type: 0
//! ```

use crate::cli::Cli;
use crate::error::PushError;
use serde::Deserialize;
use std::fs;
use tracing::{debug, info, instrument};

pub const DEFAULT_INDEX_URL: &str =
    "https://raw.githubusercontent.com/ruanyf/weekly/refs/heads/master/README.md";
pub const DEFAULT_RAW_BASE_URL: &str =
    "https://raw.githubusercontent.com/ruanyf/weekly/refs/heads/master/";
pub const DEFAULT_ORIGIN_BASE_URL: &str = "https://www.ruanyifeng.com/blog/";
pub const DEFAULT_ENDPOINT: &str = "https://wxpusher.zjiecode.com/api/send/message";

/// Immutable settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Application token issued by the push-notification service.
    pub app_token: String,
    /// Topics whose subscribers receive the message.
    pub topic_ids: Vec<u64>,
    /// Individual recipients.
    pub uids: Vec<String>,
    /// 3 = markdown.
    pub content_type: u8,
    /// 0 = deliver regardless of the recipient's subscription status.
    pub verify_pay_type: u8,
    /// Markdown index listing every issue.
    pub index_url: String,
    /// Base that issue links are resolved against. Must end with `/`.
    pub raw_base_url: String,
    /// Blog root used to build the human-readable article link.
    pub origin_base_url: String,
    /// Send-message endpoint of the push-notification API.
    pub endpoint: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_token: String::new(),
            topic_ids: Vec::new(),
            uids: Vec::new(),
            content_type: 3,
            verify_pay_type: 0,
            index_url: DEFAULT_INDEX_URL.to_string(),
            raw_base_url: DEFAULT_RAW_BASE_URL.to_string(),
            origin_base_url: DEFAULT_ORIGIN_BASE_URL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl Config {
    /// Parse a YAML document. Missing keys take their defaults.
    pub fn from_yaml(text: &str) -> Result<Self, PushError> {
        serde_yaml::from_str(text).map_err(|e| PushError::Config(format!("invalid YAML: {e}")))
    }

    /// Read and parse a YAML configuration file.
    #[instrument(level = "info", skip_all, fields(%path))]
    pub fn load(path: &str) -> Result<Self, PushError> {
        let text = fs::read_to_string(path)
            .map_err(|e| PushError::Config(format!("cannot read {path}: {e}")))?;
        let config = Self::from_yaml(&text)?;
        info!("Loaded configuration file");
        Ok(config)
    }

    /// Build the run configuration from the file named on the command line
    /// (if any) and the command-line overrides.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be loaded, or when no app token is set and
    /// the run is going to deliver.
    pub fn resolve(cli: &Cli) -> Result<Self, PushError> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(token) = &cli.app_token {
            config.app_token = token.clone();
        }
        if !cli.topic_ids.is_empty() {
            config.topic_ids = cli.topic_ids.clone();
        }
        if !cli.uids.is_empty() {
            config.uids = cli.uids.clone();
        }

        if !config.raw_base_url.ends_with('/') {
            config.raw_base_url.push('/');
        }

        if config.app_token.trim().is_empty() && !cli.dry_run {
            return Err(PushError::Config(
                "app token is required (--app-token or WXPUSHER_APP_TOKEN)".to_string(),
            ));
        }
        if config.topic_ids.is_empty() && config.uids.is_empty() {
            debug!("No topic ids or uids configured; the message will reach nobody");
        }

        Ok(config)
    }
}
