use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(SessionId);

pub const DEFAULT_DESCRIPTION: &str = "No description available.";
pub const PLACEHOLDER_POSTER_URL: &str = "/placeholder.svg";
pub const UNKNOWN_LABEL: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Movie,
    TvSeries,
    TvMiniSeries,
    TvMovie,
    Video,
    #[default]
    Unknown,
}

impl MediaType {
    /// Maps a backend `type` code. Codes outside the table are `Unknown`.
    pub fn from_code(code: &str) -> Self {
        match code {
            "movie" => Self::Movie,
            "tvSeries" => Self::TvSeries,
            "tvMiniSeries" => Self::TvMiniSeries,
            "tvMovie" => Self::TvMovie,
            "video" => Self::Video,
            _ => Self::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Movie => "Movie",
            Self::TvSeries => "TV Series",
            Self::TvMiniSeries => "TV Mini Series",
            Self::TvMovie => "TV Movie",
            Self::Video => "Video Movie",
            Self::Unknown => UNKNOWN_LABEL,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A normalized recommendation.
///
/// `id` is the position inside one result set and carries no meaning across
/// sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: usize,
    pub title: String,
    pub description: String,
    pub rating_value: f64,
    pub year: i64,
    pub runtime_minutes: i64,
    pub genres: Vec<String>,
    pub poster_url: String,
    pub media_type: MediaType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub origin_country: String,
}

impl Item {
    pub fn imdb_url(&self) -> Option<String> {
        self.external_id
            .as_deref()
            .map(|id| format!("https://www.imdb.com/title/{id}/"))
    }

    pub fn year_label(&self) -> String {
        non_zero_label(self.year)
    }

    pub fn runtime_label(&self) -> String {
        non_zero_label(self.runtime_minutes)
    }
}

fn non_zero_label(value: i64) -> String {
    if value == 0 {
        "N/A".to_string()
    } else {
        value.to_string()
    }
}
