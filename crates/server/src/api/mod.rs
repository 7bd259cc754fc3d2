use std::sync::Arc;

use serde_json::Value;
use shared::{
    error::{ApiException, ErrorCode},
    protocol::ResponseEnvelope,
};
use tracing::{info, warn};

use crate::predictor::Predictor;

pub const QUERY_REQUIRED: &str = "Query is required";
pub const UNKNOWN_UPSTREAM_ERROR: &str = "Unknown error";

#[derive(Clone)]
pub struct ApiContext {
    pub predictor: Arc<dyn Predictor>,
}

/// Pulls a usable query out of a request body. Anything but a non-blank
/// string under `query` is refused.
pub fn extract_query(body: &[u8]) -> Result<String, ApiException> {
    let parsed: Value = serde_json::from_slice(body)
        .map_err(|_| ApiException::new(ErrorCode::Validation, QUERY_REQUIRED))?;
    match parsed.get("query").and_then(Value::as_str) {
        Some(query) if !query.trim().is_empty() => Ok(query.to_string()),
        _ => Err(ApiException::new(ErrorCode::Validation, QUERY_REQUIRED)),
    }
}

pub async fn recommend(ctx: &ApiContext, query: &str) -> Result<ResponseEnvelope, ApiException> {
    match ctx.predictor.predict(query).await {
        Ok(data) => {
            let data = match data {
                Value::Null => Value::Array(Vec::new()),
                data => data,
            };
            let envelope = ResponseEnvelope::ok(data);
            info!(count = envelope.count, "prediction forwarded");
            Ok(envelope)
        }
        Err(err) => {
            let message = format!("{err:#}");
            warn!(error = %message, "upstream prediction failed");
            let message = if message.trim().is_empty() {
                UNKNOWN_UPSTREAM_ERROR.to_string()
            } else {
                message
            };
            Err(ApiException::new(ErrorCode::Upstream, message))
        }
    }
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
