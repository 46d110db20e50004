//! Webhook revalidation
//!
//! Forwards each revalidation request to the presentation layer as
//! `POST <url>` with body `{"path": "..."}`. Delivery failures are logged and
//! never surface to the mutation that triggered them.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use threadline_core::Revalidator;

#[derive(Serialize)]
struct RevalidateRequest<'a> {
    path: &'a str,
}

/// Revalidator that calls an HTTP endpoint
#[derive(Debug, Clone)]
pub struct WebhookRevalidator {
    client: reqwest::Client,
    url: String,
}

impl WebhookRevalidator {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Revalidator for WebhookRevalidator {
    async fn revalidate(&self, path: &str) {
        let result = self
            .client
            .post(&self.url)
            .json(&RevalidateRequest { path })
            .send()
            .await
            .and_then(|response| response.error_for_status());

        match result {
            Ok(_) => tracing::debug!(path, "revalidation delivered"),
            Err(e) => tracing::warn!(path, url = %self.url, error = %e, "revalidation failed"),
        }
    }
}
