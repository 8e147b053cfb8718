pub mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::request::ModelRequest;
use crate::response::GroundingChunk;

/// One call to the hosted model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InferenceCall {
    pub model: String,
    #[serde(flatten)]
    pub request: ModelRequest,
}

impl InferenceCall {
    pub fn new(model: impl Into<String>, request: ModelRequest) -> Self {
        Self {
            model: model.into(),
            request,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// What came back from the model, before any interpretation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct InferenceOutput {
    /// Raw text answer, expected to be JSON matching the request schema.
    pub text: Option<String>,
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

impl InferenceOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn with_grounding(mut self, chunks: Vec<GroundingChunk>) -> Self {
        self.grounding_chunks = chunks;
        self
    }
}

/// The external inference service. Implementations perform a single
/// call-and-wait: no retries, no streaming.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    async fn generate(&self, call: &InferenceCall) -> Result<InferenceOutput>;

    /// Name used in logs and metrics.
    fn name(&self) -> &str;
}
