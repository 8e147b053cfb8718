pub mod prompts;
pub mod schema;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{AnalysisRequest, Language, ToolSelector};

/// Everything the inference call needs apart from the model identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelRequest {
    pub instruction: String,
    pub prompt: String,
    pub schema: Value,
    pub use_search_grounding: bool,
}

/// Build the model request for one scan.
pub fn build_request(tool: ToolSelector, input: &str, language: Language) -> ModelRequest {
    ModelRequest {
        instruction: prompts::persona_instruction(tool, language),
        prompt: prompts::input_prompt(tool, input),
        schema: schema::response_schema(language),
        use_search_grounding: uses_search_grounding(tool),
    }
}

impl From<&AnalysisRequest> for ModelRequest {
    fn from(request: &AnalysisRequest) -> Self {
        build_request(request.tool, &request.raw_input, request.language)
    }
}

/// Only fact-checking is augmented with live web search.
pub fn uses_search_grounding(tool: ToolSelector) -> bool {
    matches!(tool, ToolSelector::FakeNews)
}
