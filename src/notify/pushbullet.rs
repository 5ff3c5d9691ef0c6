// src/notify/pushbullet.rs
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::{AlertPayload, Notifier};

const PUSHES_URL: &str = "https://api.pushbullet.com/v2/pushes";
const DEFAULT_TITLE: &str = "New Book Subscription Alert";
pub const DEFAULT_CHANNEL_TAG: &str = "book-subscription-alert";

#[derive(Clone)]
pub struct PushbulletNotifier {
    api_key: String,
    title: String,
    channel_tag: Option<String>,
    client: Client,
    timeout: Duration,
}

impl PushbulletNotifier {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            title: DEFAULT_TITLE.to_string(),
            channel_tag: None,
            client: Client::new(),
            timeout: Duration::from_secs(20),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Push to a Pushbullet channel instead of the account's own devices.
    pub fn with_channel_tag(mut self, tag: &str) -> Self {
        self.channel_tag = Some(tag.to_string());
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

#[async_trait]
impl Notifier for PushbulletNotifier {
    async fn send(&self, alert: &AlertPayload) -> Result<()> {
        let payload = PushPayload {
            kind: "link",
            title: &self.title,
            body: &alert.message,
            url: &alert.link,
            channel_tag: self.channel_tag.as_deref(),
        };

        let rsp = self
            .client
            .post(PUSHES_URL)
            .header("Access-Token", &self.api_key)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| anyhow!("Pushbullet request failed: {e}"))?;

        rsp.error_for_status()
            .map_err(|e| anyhow!("Pushbullet HTTP error: {e}"))?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "pushbullet"
    }
}

#[derive(Serialize)]
struct PushPayload<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    title: &'a str,
    body: &'a str,
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    channel_tag: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_tag_is_carried_in_the_push_payload() {
        let notifier =
            PushbulletNotifier::new("key".into()).with_channel_tag(DEFAULT_CHANNEL_TAG);
        assert_eq!(notifier.channel_tag.as_deref(), Some(DEFAULT_CHANNEL_TAG));

        let payload = PushPayload {
            kind: "link",
            title: &notifier.title,
            body: "summary",
            url: "https://example.com/p1",
            channel_tag: notifier.channel_tag.as_deref(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["channel_tag"], "book-subscription-alert");
        assert_eq!(json["type"], "link");
    }

    #[test]
    fn payload_without_channel_tag_omits_the_field() {
        let payload = PushPayload {
            kind: "link",
            title: DEFAULT_TITLE,
            body: "summary",
            url: "https://example.com/p1",
            channel_tag: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("channel_tag").is_none());
    }
}
