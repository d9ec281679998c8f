use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use url::Url;

use super::Transport;
use crate::error::{Result, StatusError};

/// `reqwest` backed transport shared by every probe of an engine.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(StatusError::HttpClient)?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn reach(&self, target: &Url) -> Result<()> {
        // HEAD without a body; the response status is not inspected.
        self.client
            .head(target.clone())
            .send()
            .await
            .map(|_| ())
            .map_err(|e| StatusError::transport(target.as_str(), e))
    }

    async fn fetch_json(&self, url: &Url) -> Result<Value> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| StatusError::transport(url.as_str(), e))?;

        response.json::<Value>().await.map_err(|e| {
            if e.is_decode() {
                StatusError::MalformedVersionPayload {
                    reason: e.to_string(),
                }
            } else {
                StatusError::transport(url.as_str(), e)
            }
        })
    }
}
