//! Raw document download.
//!
//! Both the index and the selected issue are plain markdown files served over
//! HTTP. A non-success status fails the run; there are no retries.

use crate::error::PushError;
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// GET `url` and return the response body as text.
///
/// # Errors
///
/// [`PushError::Retrieval`] on a non-2xx status, [`PushError::Http`] on
/// transport failures.
#[instrument(level = "info", skip(client))]
pub async fn fetch_text(client: &Client, url: &str) -> Result<String, PushError> {
    let t0 = Instant::now();
    let response = client.get(url).send().await?;
    let status = response.status();

    if !status.is_success() {
        warn!(%status, "Download failed");
        return Err(PushError::Retrieval {
            url: url.to_string(),
            status,
        });
    }

    let body = response.text().await?;
    info!(
        bytes = body.len(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Downloaded document"
    );
    Ok(body)
}

/// Resolve an issue's relative link against the raw-content base URL.
///
/// `base` should end with `/`, otherwise its last path segment is replaced.
pub fn resolve_link(base: &str, link: &str) -> Result<Url, PushError> {
    let resolved = Url::parse(base)?.join(link)?;
    debug!(%base, %link, %resolved, "Resolved issue link");
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_link_relative() {
        let url = resolve_link(
            "https://raw.githubusercontent.com/ruanyf/weekly/refs/heads/master/",
            "docs/issue-330.md",
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://raw.githubusercontent.com/ruanyf/weekly/refs/heads/master/docs/issue-330.md"
        );
    }

    #[test]
    fn test_resolve_link_bad_base() {
        assert!(matches!(
            resolve_link("not a url", "docs/x.md"),
            Err(PushError::Url(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_text_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/README.md")
            .with_status(200)
            .with_body("## 2024\n")
            .create_async()
            .await;

        let url = format!("{}/README.md", server.url());
        let body = fetch_text(&Client::new(), &url).await.unwrap();

        assert_eq!(body, "## 2024\n");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_text_non_success_is_retrieval_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing.md")
            .with_status(404)
            .with_body("404: Not Found")
            .create_async()
            .await;

        let url = format!("{}/missing.md", server.url());
        match fetch_text(&Client::new(), &url).await {
            Err(PushError::Retrieval { url: failed, status }) => {
                assert_eq!(failed, url);
                assert_eq!(status.as_u16(), 404);
            }
            other => panic!("expected retrieval error, got {other:?}"),
        }
    }
}
