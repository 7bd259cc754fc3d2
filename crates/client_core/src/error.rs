use thiserror::Error;

pub const GENERIC_FAILURE: &str = "Unknown error occurred";
pub const BACKEND_REJECTED_FALLBACK: &str = "API request failed";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecommendError {
    #[error("HTTP error! status: {status}")]
    HttpStatus { status: u16 },
    #[error("{}", non_empty_or(.0, GENERIC_FAILURE))]
    Transport(String),
    #[error("{}", non_empty_or(.0, GENERIC_FAILURE))]
    InvalidBody(String),
    #[error("{}", non_empty_or(.0.as_deref().unwrap_or_default(), BACKEND_REJECTED_FALLBACK))]
    Rejected(Option<String>),
}

impl RecommendError {
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::HttpStatus { .. } | Self::Transport(_))
    }
}

fn non_empty_or<'a>(message: &'a str, fallback: &'a str) -> &'a str {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        fallback
    } else {
        trimmed
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse settings file '{path}': {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid backend url '{url}': {source}")]
    InvalidBackendUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("backend url '{0}' must use http or https")]
    UnsupportedScheme(String),
    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },
}
