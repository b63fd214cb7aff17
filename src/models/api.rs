use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

pub const DEFAULT_MAX_LENGTH: i64 = 100;
pub const DEFAULT_MIN_LENGTH: i64 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplifyRequest {
    pub text: String,
    #[serde(default = "default_max_length", deserialize_with = "lax_integer")]
    pub max_length: i64,
    #[serde(default = "default_min_length", deserialize_with = "lax_integer")]
    pub min_length: i64,
}

fn default_max_length() -> i64 {
    DEFAULT_MAX_LENGTH
}

fn default_min_length() -> i64 {
    DEFAULT_MIN_LENGTH
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LaxInteger {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Accepts `60`, `60.0` and `"60"`; rejects fractional or non-numeric values.
fn lax_integer<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match LaxInteger::deserialize(deserializer)? {
        LaxInteger::Int(value) => Ok(value),
        LaxInteger::Float(value) => integral_float(value)
            .ok_or_else(|| de::Error::custom(format!("expected an integer, got {}", value))),
        LaxInteger::Text(text) => {
            let trimmed = text.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(integral_float))
                .ok_or_else(|| de::Error::custom(format!("expected an integer, got \"{}\"", text)))
        }
    }
}

fn integral_float(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

/// Success payload of `/simplify`. `note` is only present on the short-text bypass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplifyResponse {
    pub original_prompt: String,
    pub simplified_prompt: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub note: Option<String>,
}

impl SimplifyResponse {
    pub fn paraphrased(original: impl Into<String>, simplified: impl Into<String>) -> Self {
        Self {
            original_prompt: original.into(),
            simplified_prompt: simplified.into(),
            note: None,
        }
    }

    pub fn echoed(original: impl Into<String>, note: impl Into<String>) -> Self {
        let original = original.into();
        Self {
            simplified_prompt: original.clone(),
            original_prompt: original,
            note: Some(note.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub uptime_seconds: u64,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn request_bounds_default_when_omitted() {
        let req: SimplifyRequest = serde_json::from_value(json!({ "text": "hello" })).unwrap();
        assert_eq!(req.max_length, 100);
        assert_eq!(req.min_length, 10);
    }

    #[test]
    fn request_bounds_are_not_range_checked() {
        let req: SimplifyRequest =
            serde_json::from_value(json!({ "text": "x", "max_length": -5, "min_length": 900 }))
                .unwrap();
        assert_eq!(req.max_length, -5);
        assert_eq!(req.min_length, 900);
    }

    #[rstest]
    #[case(json!(60), 60)]
    #[case(json!(60.0), 60)]
    #[case(json!("60"), 60)]
    #[case(json!(" 60 "), 60)]
    #[case(json!("60.0"), 60)]
    #[case(json!(-7), -7)]
    fn bounds_are_coerced_to_integers(#[case] raw: serde_json::Value, #[case] expected: i64) {
        let req: SimplifyRequest =
            serde_json::from_value(json!({ "text": "x", "max_length": raw.clone(), "min_length": raw }))
                .unwrap();
        assert_eq!(req.max_length, expected);
        assert_eq!(req.min_length, expected);
    }

    #[rstest]
    #[case(json!(60.5))]
    #[case(json!("sixty"))]
    #[case(json!(true))]
    #[case(json!(null))]
    fn non_integral_bounds_are_rejected(#[case] raw: serde_json::Value) {
        let result = serde_json::from_value::<SimplifyRequest>(json!({ "text": "x", "max_length": raw }));
        assert!(result.is_err());
    }

    #[test]
    fn request_without_text_is_rejected() {
        assert!(serde_json::from_value::<SimplifyRequest>(json!({ "max_length": 20 })).is_err());
    }

    #[test]
    fn echoed_response_carries_note() {
        let value = serde_json::to_value(SimplifyResponse::echoed("too short", "text is too short"))
            .unwrap();
        assert_eq!(
            value,
            json!({
                "original_prompt": "too short",
                "simplified_prompt": "too short",
                "note": "text is too short"
            })
        );
    }

    #[test]
    fn paraphrased_response_has_no_note_key() {
        let value = serde_json::to_value(SimplifyResponse::paraphrased("a b", "b a")).unwrap();
        assert_eq!(value, json!({ "original_prompt": "a b", "simplified_prompt": "b a" }));
    }
}
