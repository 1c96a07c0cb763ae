use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// Placeholder substituted for an absent or blank `product_type`.
pub const DEFAULT_PRODUCT_TYPE: &str = "General";
/// Placeholder substituted for an absent or blank `target_audience`.
pub const DEFAULT_TARGET_AUDIENCE: &str = "General consumers";
/// Placeholder substituted for an absent or blank `features`.
pub const DEFAULT_FEATURES: &str = "Not specified";
/// Placeholder substituted for an absent or blank `tone`.
pub const DEFAULT_TONE: &str = "Professional and engaging";

/// One description request. Only `product_name` is required; the accessor
/// methods resolve every optional field to its documented placeholder so
/// downstream templates never interpolate an empty string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GenerationRequest {
    pub product_name: String,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub target_audience: Option<String>,
    #[serde(default)]
    pub features: Option<String>,
    #[serde(default)]
    pub tone: Option<String>,
}

impl GenerationRequest {
    pub fn named(product_name: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            product_type: None,
            target_audience: None,
            features: None,
            tone: None,
        }
    }

    pub fn product_type(&self) -> &str {
        field_or(&self.product_type, DEFAULT_PRODUCT_TYPE)
    }

    pub fn target_audience(&self) -> &str {
        field_or(&self.target_audience, DEFAULT_TARGET_AUDIENCE)
    }

    pub fn features(&self) -> &str {
        field_or(&self.features, DEFAULT_FEATURES)
    }

    pub fn tone(&self) -> &str {
        field_or(&self.tone, DEFAULT_TONE)
    }

    /// First whitespace-delimited token of the product name, used by the
    /// acceptance check. `None` when the name is blank.
    pub fn name_token(&self) -> Option<&str> {
        self.product_name.split_whitespace().next()
    }
}

fn field_or<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(default)
}

/// Which stage of the pipeline produced the final text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    Backend(&'static str),
    Fallback,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Backend(id) => id,
            Provenance::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Provenance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Final pipeline output. `attempts` records every backend the sequencer
/// touched, in order, for observability.
#[derive(Debug, Clone, Serialize)]
pub struct DescriptionResult {
    pub description: String,
    pub source: Provenance,
    pub attempts: Vec<AttemptReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttemptReport {
    pub backend: String,
    pub elapsed_ms: u128,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub outcome: AttemptOutcome,
}

impl AttemptReport {
    pub fn new(backend: &str, elapsed_ms: u128, outcome: AttemptOutcome) -> Self {
        Self {
            backend: backend.to_string(),
            elapsed_ms,
            timestamp: Utc::now(),
            outcome,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Accepted,
    Rejected { reason: String },
    Failed { error: String },
    TimedOut,
    Skipped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_cover_absent_fields() {
        let request = GenerationRequest::named("Aurora Lamp");
        assert_eq!(request.product_type(), DEFAULT_PRODUCT_TYPE);
        assert_eq!(request.target_audience(), DEFAULT_TARGET_AUDIENCE);
        assert_eq!(request.features(), DEFAULT_FEATURES);
        assert_eq!(request.tone(), DEFAULT_TONE);
    }

    #[test]
    fn placeholders_cover_blank_fields() {
        let request = GenerationRequest {
            product_type: Some("   ".to_string()),
            tone: Some(String::new()),
            ..GenerationRequest::named("Aurora Lamp")
        };
        assert_eq!(request.product_type(), DEFAULT_PRODUCT_TYPE);
        assert_eq!(request.tone(), DEFAULT_TONE);
    }

    #[test]
    fn explicit_fields_win_over_placeholders() {
        let request = GenerationRequest {
            tone: Some("Playful".to_string()),
            ..GenerationRequest::named("Aurora Lamp")
        };
        assert_eq!(request.tone(), "Playful");
    }

    #[test]
    fn name_token_takes_first_word() {
        let request = GenerationRequest::named("  Aurora Lamp Mini ");
        assert_eq!(request.name_token(), Some("Aurora"));
        assert_eq!(GenerationRequest::named("   ").name_token(), None);
    }

    #[test]
    fn provenance_serializes_as_plain_string() {
        let backend = serde_json::to_value(Provenance::Backend("flan-t5-base")).unwrap();
        assert_eq!(backend, serde_json::json!("flan-t5-base"));
        let fallback = serde_json::to_value(Provenance::Fallback).unwrap();
        assert_eq!(fallback, serde_json::json!("fallback"));
    }
}
