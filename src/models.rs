//! Data models for digest issues and outgoing notifications.
//!
//! - [`IssueRecord`]: one issue recovered from the index document
//! - [`ParseGap`]: a list item that could not be attributed to a year and month
//! - [`NotificationPayload`]: the JSON body posted to the push-notification API
//!
//! The payload uses camelCase field names on the wire to match the API, hence
//! the `#[serde(rename_all = "camelCase")]` attribute.

use serde::{Deserialize, Serialize};

/// A single issue of the weekly digest as listed in the index document.
///
/// `year` and `month` are always resolved: the extractor refuses to emit a
/// record without them. The issue number comes from free text and may be
/// missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRecord {
    /// Four-digit year, e.g. `"2024"`.
    pub year: String,
    /// Zero-padded month, `"01"` through `"12"`.
    pub month: String,
    /// Digits captured from the `第 N 期` marker, if present.
    pub issue_number: Option<String>,
    /// Visible text of the issue's hyperlink.
    pub title: String,
    /// The hyperlink's `href`, relative to the repository root.
    pub link: String,
}

impl IssueRecord {
    /// Short subject line, e.g. `第5期: Example`.
    ///
    /// Falls back to the bare title when the issue number is unknown.
    pub fn summary(&self) -> String {
        match &self.issue_number {
            Some(n) => format!("第{}期: {}", n, self.title),
            None => self.title.clone(),
        }
    }

    /// Human-readable article URL on the blog, e.g.
    /// `{base}2024/03/weekly-issue-5.html`.
    ///
    /// `None` when the issue number is unknown, since the page name depends on it.
    pub fn origin_url(&self, base: &str) -> Option<String> {
        self.issue_number.as_ref().map(|n| {
            format!(
                "{}/{}/{}/weekly-issue-{}.html",
                base.trim_end_matches('/'),
                self.year,
                self.month,
                n
            )
        })
    }
}

/// A list item that had a hyperlink but no resolvable year or month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseGap {
    pub year: Option<String>,
    /// Raw text of the last paragraph seen, when it was not a month name.
    pub month_text: Option<String>,
    /// Text of the skipped list item.
    pub item: String,
}

/// Message body accepted by the push-notification send endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    pub app_token: String,
    /// Full markdown body of the selected issue.
    pub content: String,
    /// Short subject shown in the notification list.
    pub summary: String,
    /// 1 = text, 2 = html, 3 = markdown.
    pub content_type: u8,
    pub topic_ids: Vec<u64>,
    pub uids: Vec<String>,
    /// Link opened when the reader taps "read original".
    pub url: String,
    pub verify_pay_type: u8,
}

impl NotificationPayload {
    /// Copy with the app token masked, safe to print or log.
    pub fn redacted(&self) -> Self {
        Self {
            app_token: "***".to_string(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(number: Option<&str>) -> IssueRecord {
        IssueRecord {
            year: "2024".to_string(),
            month: "03".to_string(),
            issue_number: number.map(str::to_string),
            title: "Example".to_string(),
            link: "blog/2024/03/x.md".to_string(),
        }
    }

    #[test]
    fn test_summary_with_issue_number() {
        assert_eq!(issue(Some("5")).summary(), "第5期: Example");
    }

    #[test]
    fn test_summary_without_issue_number() {
        assert_eq!(issue(None).summary(), "Example");
    }

    #[test]
    fn test_origin_url() {
        assert_eq!(
            issue(Some("5")).origin_url("https://www.ruanyifeng.com/blog/"),
            Some("https://www.ruanyifeng.com/blog/2024/03/weekly-issue-5.html".to_string())
        );
        assert_eq!(issue(None).origin_url("https://www.ruanyifeng.com/blog"), None);
    }

    #[test]
    fn test_payload_serializes_camel_case() {
        let payload = NotificationPayload {
            app_token: "AT_x".to_string(),
            content: "# body".to_string(),
            summary: "第5期: Example".to_string(),
            content_type: 3,
            topic_ids: vec![34192],
            uids: vec![],
            url: "https://example.com".to_string(),
            verify_pay_type: 0,
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["appToken"], "AT_x");
        assert_eq!(json["contentType"], 3);
        assert_eq!(json["topicIds"][0], 34192);
        assert_eq!(json["verifyPayType"], 0);
        assert!(json["uids"].as_array().unwrap().is_empty());
        assert!(json.get("app_token").is_none());
    }

    #[test]
    fn test_redacted_masks_token_only() {
        let payload = NotificationPayload {
            app_token: "AT_secret".to_string(),
            content: "body".to_string(),
            summary: "s".to_string(),
            content_type: 3,
            topic_ids: vec![1],
            uids: vec!["UID_a".to_string()],
            url: "u".to_string(),
            verify_pay_type: 0,
        };
        let redacted = payload.redacted();
        assert_eq!(redacted.app_token, "***");
        assert_eq!(redacted.uids, payload.uids);
        assert_eq!(redacted.content, payload.content);
    }
}
