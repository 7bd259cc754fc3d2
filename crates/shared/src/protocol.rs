use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub query: String,
}

/// Envelope wrapping every recommendation answer.
///
/// Fields are read leniently so envelopes from older or looser backends still
/// decode: a non-bool `success` is false, `count` accepts integral floats and
/// numeric strings, and a non-string `error` is dropped. `data` stays raw; see
/// [`RecommendationPayload`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(default, deserialize_with = "lenient_flag")]
    pub success: bool,
    #[serde(default)]
    pub data: Value,
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub count: Option<u64>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub error: Option<String>,
}

fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let count = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(count)
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

impl ResponseEnvelope {
    pub fn ok(data: Value) -> Self {
        let count = data.as_array().map_or(0, |items| items.len() as u64);
        Self {
            success: true,
            data,
            count: Some(count),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Value::Array(Vec::new()),
            count: None,
            error: Some(message.into()),
        }
    }
}

/// The shapes `data` has taken across backend versions.
#[derive(Debug, Clone, PartialEq)]
pub enum RecommendationPayload {
    /// `data: Item[]`
    Flat(Vec<Value>),
    /// `data: { recommendations, prompt_title }`, also seen as the first
    /// element of a one-element array.
    Wrapped {
        recommendations: Vec<Value>,
        prompt_title: Option<String>,
    },
    /// `data: Item[][]`; only the first inner list is meaningful.
    Nested(Vec<Value>),
    Unrecognized,
}

impl RecommendationPayload {
    pub fn detect(data: &Value) -> Self {
        match data {
            Value::Object(_) if data.get("recommendations").is_some() => Self::decode_wrapped(data),
            Value::Array(entries) => match entries.first() {
                Some(first) if first.get("recommendations").is_some() => {
                    Self::decode_wrapped(first)
                }
                Some(Value::Array(_)) => Self::decode_nested(entries),
                _ => Self::decode_flat(entries),
            },
            _ => Self::Unrecognized,
        }
    }

    fn decode_flat(entries: &[Value]) -> Self {
        Self::Flat(entries.to_vec())
    }

    fn decode_wrapped(wrapper: &Value) -> Self {
        let recommendations = wrapper
            .get("recommendations")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let prompt_title = wrapper
            .get("prompt_title")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .map(str::to_string);
        Self::Wrapped {
            recommendations,
            prompt_title,
        }
    }

    fn decode_nested(entries: &[Value]) -> Self {
        let inner = entries
            .first()
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        Self::Nested(inner)
    }

    pub fn into_parts(self) -> (Vec<Value>, Option<String>) {
        match self {
            Self::Flat(items) | Self::Nested(items) => (items, None),
            Self::Wrapped {
                recommendations,
                prompt_title,
            } => (recommendations, prompt_title),
            Self::Unrecognized => (Vec::new(), None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detects_each_envelope_shape() {
        let flat = json!([{ "title": "Alien" }]);
        assert!(matches!(
            RecommendationPayload::detect(&flat),
            RecommendationPayload::Flat(items) if items.len() == 1
        ));

        let wrapped = json!({ "recommendations": [{ "title": "Alien" }], "prompt_title": "Space" });
        assert_eq!(
            RecommendationPayload::detect(&wrapped),
            RecommendationPayload::Wrapped {
                recommendations: vec![json!({ "title": "Alien" })],
                prompt_title: Some("Space".into()),
            }
        );

        let wrapped_in_list = json!([{ "recommendations": [], "prompt_title": "Space" }]);
        assert!(matches!(
            RecommendationPayload::detect(&wrapped_in_list),
            RecommendationPayload::Wrapped { prompt_title: Some(_), .. }
        ));

        let nested = json!([[{ "title": "Alien" }, { "title": "Aliens" }]]);
        assert!(matches!(
            RecommendationPayload::detect(&nested),
            RecommendationPayload::Nested(items) if items.len() == 2
        ));
    }

    #[test]
    fn scalar_and_null_payloads_are_unrecognized() {
        for data in [json!(null), json!(3), json!("movies"), json!({ "items": [] })] {
            assert_eq!(
                RecommendationPayload::detect(&data),
                RecommendationPayload::Unrecognized
            );
        }
    }

    #[test]
    fn envelope_decodes_without_optional_fields() {
        let envelope: ResponseEnvelope =
            serde_json::from_value(json!({ "success": true })).expect("envelope");
        assert!(envelope.success);
        assert!(envelope.data.is_null());
        assert_eq!(envelope.count, None);
    }

    #[test]
    fn envelope_tolerates_loosely_typed_fields() {
        for count in [json!(1), json!(1.0), json!("1"), json!(" 1 ")] {
            let envelope: ResponseEnvelope =
                serde_json::from_value(json!({ "success": true, "data": [], "count": count }))
                    .expect("envelope");
            assert_eq!(envelope.count, Some(1));
        }

        for count in [json!(1.5), json!(-2), json!("many"), json!(null), json!([1])] {
            let envelope: ResponseEnvelope =
                serde_json::from_value(json!({ "success": true, "count": count }))
                    .expect("envelope");
            assert_eq!(envelope.count, None);
        }

        let envelope: ResponseEnvelope =
            serde_json::from_value(json!({ "success": "yes", "error": { "detail": "boom" } }))
                .expect("envelope");
        assert!(!envelope.success);
        assert_eq!(envelope.error, None);

        let envelope: ResponseEnvelope =
            serde_json::from_value(json!({ "success": null, "error": "quota" }))
                .expect("envelope");
        assert!(!envelope.success);
        assert_eq!(envelope.error.as_deref(), Some("quota"));
    }
}
