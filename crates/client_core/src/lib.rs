pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod normalizer;
pub mod session_store;
pub mod title_reveal;
pub mod types;

pub use backend::{HttpRecommendationBackend, RecommendationBackend};
pub use config::{load_settings, load_settings_from, ClientSettings};
pub use controller::{QueryController, FAILURE_TRANSCRIPT};
pub use error::{RecommendError, SettingsError};
pub use normalizer::{normalize, Normalized};
pub use session_store::{DeleteOutcome, RenameOutcome};
pub use title_reveal::{RevealEnd, TitleReveal};
pub use types::{
    ClientEvent, ClientSnapshot, IgnoredReason, Session, SessionSummary, SubmitOutcome,
    TranscriptEntry, TranscriptRole,
};

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
