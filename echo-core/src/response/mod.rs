pub mod grounding;

pub use grounding::{GroundingChunk, WebChunk};

use serde::{Deserialize, Deserializer};

use crate::error::{AnalysisError, Result};
use crate::model::{AnalysisResult, Language, Source, Status, ToolSelector};

/// The verdict as the model writes it. Every field defaults so that a
/// schema-incomplete answer still yields a result; explicit nulls count as
/// missing. A `tool` field, if the model echoes one, is ignored.
#[derive(Debug, Deserialize)]
struct ModelVerdict {
    #[serde(default, deserialize_with = "null_as_default")]
    status: Status,
    #[serde(default, deserialize_with = "null_as_default")]
    judgment: String,
    #[serde(default, deserialize_with = "null_as_default")]
    confidence: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    explanation: String,
    #[serde(default, deserialize_with = "null_as_default")]
    sources: Vec<Source>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Turn the model's raw text output into a result attributed to `tool`.
///
/// For fact-checks, citations from search grounding are appended after the
/// sources the model declared itself.
pub fn normalize(
    raw_text: &str,
    grounding_chunks: &[GroundingChunk],
    tool: ToolSelector,
    language: Language,
) -> Result<AnalysisResult> {
    // Only a missing text part means "no verdict"; whitespace is malformed.
    let body = if raw_text.is_empty() { "{}" } else { raw_text };

    let verdict: ModelVerdict = serde_json::from_str(body)
        .map_err(|e| AnalysisError::MalformedResponse(e.to_string()))?;

    let mut sources = verdict.sources;
    if tool == ToolSelector::FakeNews && !grounding_chunks.is_empty() {
        sources.extend(grounding::sources_from_chunks(grounding_chunks, language));
    }

    Ok(AnalysisResult {
        request_id: None,
        tool,
        status: verdict.status,
        judgment: verdict.judgment,
        confidence: verdict.confidence,
        explanation: verdict.explanation,
        sources,
    })
}
