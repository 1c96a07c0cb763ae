use super::{GenError, SamplingParams, TextGeneration};
use crate::http::build_client;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct HfConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl HfConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("HF_INFERENCE_BASE_URL")
                .unwrap_or_else(|_| "https://router.huggingface.co/hf-inference/models".into()),
            api_key: std::env::var("HUGGINGFACE_API_KEY").ok(),
        }
    }
}

pub struct HfClient {
    http: Client,
    config: HfConfig,
}

impl HfClient {
    pub fn new(config: HfConfig) -> Self {
        Self {
            http: build_client(),
            config,
        }
    }
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: &'a SamplingParams,
}

impl TextGeneration for HfClient {
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        params: &SamplingParams,
    ) -> Result<String, GenError> {
        let Some(key) = self.config.api_key.as_deref() else {
            return Err(GenError::MissingApiKey);
        };

        let base = self.config.base_url.trim_end_matches('/');
        let body = InferenceRequest {
            inputs: prompt,
            parameters: params,
        };

        let response = self
            .http
            .post(format!("{base}/{model}"))
            .bearer_auth(key)
            .json(&body)
            .send()
            .await
            .map_err(|err| GenError::Http(err.to_string()))?;

        if !response.status().is_success() {
            return Err(GenError::Http(format!("HTTP {}", response.status())));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|err| GenError::InvalidResponse(err.to_string()))?;

        extract_generated_text(&payload)
            .ok_or_else(|| GenError::InvalidResponse("missing generated_text".into()))
    }
}

/// Hosted models answer either `[{"generated_text": ...}]` or a bare object
/// with the same key, depending on the model family.
fn extract_generated_text(payload: &Value) -> Option<String> {
    let candidate = match payload {
        Value::Array(items) => items.first()?.get("generated_text"),
        Value::Object(_) => payload.get("generated_text"),
        _ => None,
    }?;
    candidate.as_str().map(|text| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_text_from_array_payload() {
        let payload = json!([{ "generated_text": "A fine lamp." }]);
        assert_eq!(
            extract_generated_text(&payload),
            Some("A fine lamp.".to_string())
        );
    }

    #[test]
    fn extracts_text_from_object_payload() {
        let payload = json!({ "generated_text": "A fine lamp." });
        assert_eq!(
            extract_generated_text(&payload),
            Some("A fine lamp.".to_string())
        );
    }

    #[test]
    fn rejects_malformed_payloads() {
        assert_eq!(extract_generated_text(&json!([])), None);
        assert_eq!(extract_generated_text(&json!("just a string")), None);
        assert_eq!(extract_generated_text(&json!({ "error": "loading" })), None);
        assert_eq!(
            extract_generated_text(&json!([{ "generated_text": 42 }])),
            None
        );
    }

    #[test]
    fn sampling_params_omit_unset_options() {
        let params = SamplingParams {
            max_new_tokens: 200,
            temperature: 0.7,
            top_p: None,
            do_sample: true,
            return_full_text: None,
        };
        let value = serde_json::to_value(params).unwrap();
        assert!(value.get("top_p").is_none());
        assert!(value.get("return_full_text").is_none());
        assert_eq!(value["max_new_tokens"], json!(200));
    }
}
