//! Push-notification API client.
//!
//! One call per run: POST the [`NotificationPayload`] as JSON to the
//! send-message endpoint. The HTTP status decides success. The service also
//! reports its own result in the body (`{"code": 1000, "success": true, ...}`);
//! a service-level failure is logged but the body is still returned to the
//! caller, who reports it as the run's result.

use crate::error::PushError;
use crate::models::NotificationPayload;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::time::Instant;
use tracing::{error, info, instrument, warn};

/// Deliver `payload` to `endpoint` and return the parsed JSON response.
///
/// # Errors
///
/// - [`PushError::Delivery`] with the response body when the status is not 2xx
/// - [`PushError::Http`] on transport failures or a non-JSON success body
#[instrument(level = "info", skip(client, payload), fields(summary = %payload.summary))]
pub async fn send_message(
    client: &Client,
    endpoint: &str,
    payload: &NotificationPayload,
) -> Result<Value, PushError> {
    let t0 = Instant::now();
    let body = serde_json::to_vec(payload)?;
    let response = client
        .post(endpoint)
        .header(CONTENT_TYPE, "application/json")
        .body(body)
        .send()
        .await?;

    let status = response.status();
    let elapsed_ms = t0.elapsed().as_millis() as u64;

    if !status.is_success() {
        let body = response.text().await?;
        error!(%status, elapsed_ms, "Failed to send message");
        return Err(PushError::Delivery { status, body });
    }

    let reply: Value = response.json().await?;
    if reply.get("success").and_then(Value::as_bool) == Some(false) {
        warn!(
            code = ?reply.get("code"),
            msg = ?reply.get("msg"),
            "Notification service reported a failure"
        );
    } else {
        info!(%status, elapsed_ms, "Message sent");
    }
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn payload() -> NotificationPayload {
        NotificationPayload {
            app_token: "AT_test".to_string(),
            content: "# 第 5 期".to_string(),
            summary: "第5期: Example".to_string(),
            content_type: 3,
            topic_ids: vec![34192],
            uids: vec![],
            url: "https://www.ruanyifeng.com/blog/2024/03/weekly-issue-5.html".to_string(),
            verify_pay_type: 0,
        }
    }

    #[tokio::test]
    async fn test_send_message_posts_json() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/send/message")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "appToken": "AT_test",
                "content": "# 第 5 期",
                "summary": "第5期: Example",
                "contentType": 3,
                "topicIds": [34192],
                "uids": [],
                "url": "https://www.ruanyifeng.com/blog/2024/03/weekly-issue-5.html",
                "verifyPayType": 0
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"code":1000,"msg":"处理成功","success":true}"#)
            .create_async()
            .await;

        let endpoint = format!("{}/api/send/message", server.url());
        let reply = send_message(&Client::new(), &endpoint, &payload())
            .await
            .unwrap();

        assert_eq!(reply["code"], 1000);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_message_non_success_is_delivery_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/send/message")
            .with_status(500)
            .with_body("upstream exploded")
            .create_async()
            .await;

        let endpoint = format!("{}/api/send/message", server.url());
        match send_message(&Client::new(), &endpoint, &payload()).await {
            Err(PushError::Delivery { status, body }) => {
                assert_eq!(status.as_u16(), 500);
                assert_eq!(body, "upstream exploded");
            }
            other => panic!("expected delivery error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_service_level_failure_still_returned() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/send/message")
            .with_status(200)
            .with_body(r#"{"code":1001,"msg":"appToken不正确","success":false}"#)
            .create_async()
            .await;

        let endpoint = format!("{}/api/send/message", server.url());
        let reply = send_message(&Client::new(), &endpoint, &payload())
            .await
            .unwrap();

        assert_eq!(reply["success"], false);
    }
}
