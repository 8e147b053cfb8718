/// Search-grounding citations returned alongside fact-check answers

use serde::{Deserialize, Serialize};

use crate::model::{Language, Source};

/// URI given to citations that carry none; such entries never reach a result.
pub const PLACEHOLDER_URI: &str = "#";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GroundingChunk {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<WebChunk>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct WebChunk {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl GroundingChunk {
    pub fn web(title: Option<&str>, uri: Option<&str>) -> Self {
        Self {
            web: Some(WebChunk {
                uri: uri.map(str::to_string),
                title: title.map(str::to_string),
            }),
        }
    }

    fn title(&self) -> Option<&str> {
        self.web
            .as_ref()
            .and_then(|w| w.title.as_deref())
            .filter(|t| !t.is_empty())
    }

    fn uri(&self) -> Option<&str> {
        self.web
            .as_ref()
            .and_then(|w| w.uri.as_deref())
            .filter(|u| !u.is_empty())
    }

    /// Citation for this chunk, with placeholders where fields are missing.
    pub fn to_source(&self, language: Language) -> Source {
        Source {
            title: self
                .title()
                .unwrap_or_else(|| placeholder_title(language))
                .to_string(),
            uri: self.uri().unwrap_or(PLACEHOLDER_URI).to_string(),
        }
    }
}

pub fn placeholder_title(language: Language) -> &'static str {
    match language {
        Language::Ar => "مصدر خارجي",
        Language::En => "External Source",
    }
}

/// Sources derived from grounding chunks, in chunk order, with entries that
/// have no usable URI dropped.
pub fn sources_from_chunks(chunks: &[GroundingChunk], language: Language) -> Vec<Source> {
    chunks
        .iter()
        .map(|chunk| chunk.to_source(language))
        .filter(|source| source.uri != PLACEHOLDER_URI && !source.uri.is_empty())
        .collect()
}
