//! The end-to-end run: index → parse → pick → content → notify.
//!
//! Stages run strictly in sequence and the first failure aborts the run.

use crate::api::send_message;
use crate::config::Config;
use crate::error::PushError;
use crate::fetch::{fetch_text, resolve_link};
use crate::models::{IssueRecord, NotificationPayload};
use crate::scrapers::weekly::parse_issues;
use crate::select::choose_issue;
use rand::Rng;
use reqwest::Client;
use serde_json::Value;
use tracing::{info, instrument, warn};

/// What a successful run produced.
#[derive(Debug)]
pub enum RunOutcome {
    /// The notification API accepted the message; holds its JSON reply.
    Delivered(Value),
    /// Delivery skipped on request; holds the payload that would have been sent.
    DryRun(NotificationPayload),
}

/// One configured pipeline. Holds no state between runs.
#[derive(Debug)]
pub struct Pipeline<'a> {
    config: &'a Config,
    client: Client,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a Config, client: Client) -> Self {
        Self { config, client }
    }

    /// Execute one run.
    #[instrument(level = "info", skip_all, fields(index_url = %self.config.index_url, dry_run = dry_run))]
    pub async fn run<R>(&self, rng: &mut R, dry_run: bool) -> Result<RunOutcome, PushError>
    where
        R: Rng + ?Sized,
    {
        let index = fetch_text(&self.client, &self.config.index_url).await?;
        let scan = parse_issues(&index);
        if !scan.gaps.is_empty() {
            warn!(gaps = scan.gaps.len(), "Index contained items without a year or month");
        }

        let issue = choose_issue(&scan.issues, rng).ok_or_else(|| PushError::EmptyIndex {
            url: self.config.index_url.clone(),
        })?;
        info!(
            year = %issue.year,
            month = %issue.month,
            issue_number = ?issue.issue_number,
            title = %issue.title,
            "Selected issue"
        );

        let content_url = resolve_link(&self.config.raw_base_url, &issue.link)?;
        let content = fetch_text(&self.client, content_url.as_str()).await?;
        let payload = build_payload(self.config, issue, content, content_url.as_str());

        if dry_run {
            info!("Dry run; message not sent");
            return Ok(RunOutcome::DryRun(payload));
        }

        let reply = send_message(&self.client, &self.config.endpoint, &payload).await?;
        Ok(RunOutcome::Delivered(reply))
    }
}

/// Combine static settings with the selected issue and its body.
///
/// Without an issue number the blog URL cannot be built, so the raw content
/// URL is linked instead.
pub fn build_payload(
    config: &Config,
    issue: &IssueRecord,
    content: String,
    content_url: &str,
) -> NotificationPayload {
    let url = match issue.origin_url(&config.origin_base_url) {
        Some(url) => url,
        None => {
            warn!(link = %issue.link, "Issue number missing; linking raw content instead");
            content_url.to_string()
        }
    };

    NotificationPayload {
        app_token: config.app_token.clone(),
        content,
        summary: issue.summary(),
        content_type: config.content_type,
        topic_ids: config.topic_ids.clone(),
        uids: config.uids.clone(),
        url,
        verify_pay_type: config.verify_pay_type,
    }
}
