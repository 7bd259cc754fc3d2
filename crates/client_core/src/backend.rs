use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{RecommendationRequest, ResponseEnvelope};
use tracing::{debug, warn};

use crate::{config::ClientSettings, error::RecommendError};

#[async_trait]
pub trait RecommendationBackend: Send + Sync {
    async fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> Result<ResponseEnvelope, RecommendError>;
}

pub struct HttpRecommendationBackend {
    http: Client,
    endpoint: String,
}

impl HttpRecommendationBackend {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, RecommendError> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|err| RecommendError::Transport(err.to_string()))?;
        Ok(Self {
            http,
            endpoint: settings.backend_url.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RecommendationBackend for HttpRecommendationBackend {
    async fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> Result<ResponseEnvelope, RecommendError> {
        debug!(endpoint = %self.endpoint, "posting recommendation request");
        let res = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|err| {
                warn!(endpoint = %self.endpoint, error = %err, "recommendation request failed");
                RecommendError::Transport(err.to_string())
            })?;

        let status = res.status();
        if !status.is_success() {
            return Err(RecommendError::HttpStatus {
                status: status.as_u16(),
            });
        }

        res.json::<ResponseEnvelope>()
            .await
            .map_err(|err| RecommendError::InvalidBody(err.to_string()))
    }
}
