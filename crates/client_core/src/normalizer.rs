//! Maps raw, version-skewed backend payloads onto the canonical [`Item`] list.

use serde_json::Value;
use shared::{
    domain::{Item, MediaType, DEFAULT_DESCRIPTION, PLACEHOLDER_POSTER_URL, UNKNOWN_LABEL},
    protocol::RecommendationPayload,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub items: Vec<Item>,
    pub suggested_title: Option<String>,
}

pub fn normalize(data: &Value) -> Normalized {
    let (raw_items, suggested_title) = RecommendationPayload::detect(data).into_parts();
    let items = raw_items
        .iter()
        .enumerate()
        .map(|(index, raw)| normalize_item(index, raw))
        .collect();
    Normalized {
        items,
        suggested_title,
    }
}

static MISSING: Value = Value::Null;

fn field<'a>(raw: &'a Value, name: &str) -> &'a Value {
    raw.get(name).unwrap_or(&MISSING)
}

pub fn normalize_item(index: usize, raw: &Value) -> Item {
    Item {
        id: index,
        title: text(field(raw, "title")).unwrap_or_else(|| format!("Movie {}", index + 1)),
        description: text(field(raw, "overview"))
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        rating_value: number(field(raw, "rating")),
        year: integer(field(raw, "year")),
        runtime_minutes: integer(field(raw, "runtime_minutes")),
        genres: genres(field(raw, "genres")),
        poster_url: text(field(raw, "poster_url"))
            .unwrap_or_else(|| PLACEHOLDER_POSTER_URL.to_string()),
        media_type: field(raw, "type")
            .as_str()
            .map(MediaType::from_code)
            .unwrap_or_default(),
        external_id: text(field(raw, "imdb_id")),
        origin_country: text(field(raw, "country_of_origin"))
            .unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
    }
}

pub fn number(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        Value::String(s) => parse_numeric_text(s),
        // a one-element list coerces like its element
        Value::Array(items) if items.len() == 1 => number(&items[0]),
        _ => 0.0,
    };
    if parsed.is_finite() {
        parsed
    } else {
        0.0
    }
}

fn parse_numeric_text(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(0.0)
}

pub fn integer(value: &Value) -> i64 {
    number(value).trunc() as i64
}

pub fn genres(value: &Value) -> Vec<String> {
    match value {
        Value::Array(entries) => entries.iter().filter_map(text_or_empty).collect(),
        Value::String(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|genre| !genre.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

fn text_or_empty(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn derive_title(query: &str, word_limit: usize) -> String {
    const PREFIX_WORDS: usize = 4;

    let words: Vec<&str> = query.split_whitespace().collect();
    if words.len() <= word_limit {
        return query.to_string();
    }
    format!("{}...", words[..PREFIX_WORDS.min(words.len())].join(" "))
}

#[cfg(test)]
#[path = "tests/normalizer_tests.rs"]
mod tests;
