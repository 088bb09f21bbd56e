use crate::config::Config;
use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tokio::time::Duration;

/// Wire payload for the ask endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct AskRequest<'a> {
    pub question: &'a str,
}

/// Remote service that turns a question into an answer.
///
/// The controller only talks to this trait, so tests can drive it with a
/// stub instead of a live server.
#[async_trait]
pub trait AnswerService: Send + Sync {
    async fn ask(&self, question: &str) -> Result<String>;
}

/// HTTP client for the answer service.
#[derive(Clone)]
pub struct AnswerClient {
    base_url: String,
    client: reqwest::Client,
}

impl AnswerClient {
    pub fn new(config: &Config) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().expect("Failed to create HTTP client");

        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Probe the service health endpoint.
    pub async fn ping(&self) -> Result<String> {
        let url = format!("{}/ping", self.base_url);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "answer service returned {}",
                response.status()
            ));
        }

        let body: Value = response.json().await?;
        let status = body
            .get("status")
            .and_then(|s| s.as_str())
            .unwrap_or("online");
        Ok(status.to_string())
    }
}

#[async_trait]
impl AnswerService for AnswerClient {
    async fn ask(&self, question: &str) -> Result<String> {
        let url = format!("{}/ask", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&AskRequest { question })
            .send()
            .await?;

        // The body of an error response is not inspected; status is enough.
        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "answer service returned {}",
                response.status()
            ));
        }

        let body: Value = response.json().await?;
        Ok(decode_answer(body))
    }
}

/// The service replies with a bare JSON value. A string is the answer text;
/// anything else is rendered as its JSON text rather than rejected.
pub fn decode_answer(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}
