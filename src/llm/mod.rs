pub mod huggingface;

pub use huggingface::{HfClient, HfConfig};

use serde::Serialize;
use serde_with::skip_serializing_none;
use std::future::Future;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("missing api key")]
    MissingApiKey,
    #[error("http error: {0}")]
    Http(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Sampling knobs forwarded verbatim to the hosted model. Optional fields are
/// omitted from the wire payload because some backends reject unknown keys.
#[skip_serializing_none]
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SamplingParams {
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_p: Option<f32>,
    pub do_sample: bool,
    pub return_full_text: Option<bool>,
}

/// One completion call against a hosted text-generation model. The sequencer
/// only depends on this trait, so tests swap in scripted stubs.
pub trait TextGeneration: Send + Sync {
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        params: &SamplingParams,
    ) -> impl Future<Output = Result<String, GenError>> + Send;
}
