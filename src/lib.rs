pub mod http;
pub mod llm;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod store;
pub mod text;

pub use models::{DescriptionResult, GenerationRequest, Provenance};
pub use pipeline::{Pipeline, PipelineConfig, PipelineError};
