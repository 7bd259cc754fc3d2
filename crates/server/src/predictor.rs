use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use url::Url;

/// The model behind the gateway.
#[async_trait]
pub trait Predictor: Send + Sync {
    /// Returns the raw prediction output for `query`.
    async fn predict(&self, query: &str) -> anyhow::Result<Value>;
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    data: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    data: Value,
    #[serde(default)]
    error: Option<String>,
}

/// Calls a Gradio app's `/run/predict` endpoint.
pub struct GradioPredictor {
    http: Client,
    endpoint: Url,
}

impl GradioPredictor {
    pub fn new(endpoint: Url, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build upstream http client")?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Predictor for GradioPredictor {
    async fn predict(&self, query: &str) -> anyhow::Result<Value> {
        debug!(endpoint = %self.endpoint, "calling upstream predictor");
        let res = self
            .http
            .post(self.endpoint.clone())
            .json(&PredictRequest { data: [query] })
            .send()
            .await
            .context("upstream predictor is unreachable")?;

        let status = res.status();
        if !status.is_success() {
            return Err(anyhow!("upstream predictor returned {status}"));
        }

        let body: PredictResponse = res
            .json()
            .await
            .context("upstream predictor returned an unreadable body")?;
        if let Some(error) = body.error.filter(|e| !e.trim().is_empty()) {
            return Err(anyhow!(error));
        }
        Ok(match body.data {
            Value::Null => Value::Array(Vec::new()),
            data => data,
        })
    }
}

#[cfg(test)]
#[path = "tests/predictor_tests.rs"]
mod tests;
