pub mod status;

pub use status::Status;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::AnalysisError;

/// The three analysis tools offered to the user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ToolSelector {
    #[serde(rename = "deepfake")]
    Deepfake,
    #[serde(rename = "malware")]
    Malware,
    #[serde(rename = "fake_news")]
    FakeNews,
}

impl ToolSelector {
    pub const ALL: [ToolSelector; 3] = [
        ToolSelector::Deepfake,
        ToolSelector::Malware,
        ToolSelector::FakeNews,
    ];

    /// Identifier used on the wire and inside prompts.
    pub fn id(&self) -> &'static str {
        match self {
            ToolSelector::Deepfake => "deepfake",
            ToolSelector::Malware => "malware",
            ToolSelector::FakeNews => "fake_news",
        }
    }

    pub fn title(&self, language: Language) -> &'static str {
        match (self, language) {
            (ToolSelector::Deepfake, Language::En) => "Deepfake Detection",
            (ToolSelector::Deepfake, Language::Ar) => "كشف التزييف العميق",
            (ToolSelector::Malware, Language::En) => "Malware Scan",
            (ToolSelector::Malware, Language::Ar) => "فحص البرمجيات الخبيثة",
            (ToolSelector::FakeNews, Language::En) => "Fake News Check",
            (ToolSelector::FakeNews, Language::Ar) => "التحقق من الأخبار الزائفة",
        }
    }
}

impl fmt::Display for ToolSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ToolSelector {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "deepfake" => Ok(ToolSelector::Deepfake),
            "malware" => Ok(ToolSelector::Malware),
            "fake_news" => Ok(ToolSelector::FakeNews),
            other => Err(AnalysisError::InvalidInput(format!("unknown tool: {}", other))),
        }
    }
}

/// UI language. Affects generated text only, never control flow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[serde(rename = "ar")]
    Ar,
    #[default]
    #[serde(rename = "en")]
    En,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Ar => "ar",
            Language::En => "en",
        }
    }

    /// Name of the language as written into model instructions.
    pub fn target_name(&self) -> &'static str {
        match self {
            Language::Ar => "Arabic",
            Language::En => "English",
        }
    }

    pub fn is_rtl(&self) -> bool {
        matches!(self, Language::Ar)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ar" => Ok(Language::Ar),
            "en" => Ok(Language::En),
            other => Err(AnalysisError::InvalidInput(format!("unsupported language: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Source {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub uri: String,
}

impl Source {
    pub fn new(title: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            uri: uri.into(),
        }
    }
}

/// A single user-initiated scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub id: Uuid,
    pub tool: ToolSelector,
    pub raw_input: String,
    pub language: Language,
}

impl AnalysisRequest {
    pub fn new(tool: ToolSelector, raw_input: impl Into<String>, language: Language) -> Self {
        Self {
            id: Uuid::new_v4(),
            tool,
            raw_input: raw_input.into(),
            language,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Uuid>,
    pub tool: ToolSelector,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub judgment: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub sources: Vec<Source>,
}

impl AnalysisResult {
    pub fn with_request_id(mut self, id: Uuid) -> Self {
        self.request_id = Some(id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_ids_parse_back() {
        for tool in ToolSelector::ALL {
            assert_eq!(tool.id().parse::<ToolSelector>().unwrap(), tool);
        }
        assert!("phishing".parse::<ToolSelector>().is_err());
    }

    #[test]
    fn test_tool_serializes_as_wire_id() {
        let json = serde_json::to_string(&ToolSelector::FakeNews).unwrap();
        assert_eq!(json, "\"fake_news\"");
    }

    #[test]
    fn test_language_names() {
        assert_eq!(Language::Ar.target_name(), "Arabic");
        assert_eq!(Language::En.target_name(), "English");
        assert!(Language::Ar.is_rtl());
        assert_eq!("ar".parse::<Language>().unwrap(), Language::Ar);
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_partial_result_deserializes_with_defaults() {
        let result: AnalysisResult =
            serde_json::from_str(r#"{"tool":"deepfake","status":"safe"}"#).unwrap();
        assert_eq!(result.tool, ToolSelector::Deepfake);
        assert_eq!(result.status, Status::Safe);
        assert!(result.judgment.is_empty());
        assert_eq!(result.confidence, 0.0);
        assert!(result.explanation.is_empty());
        assert!(result.sources.is_empty());
    }

    #[test]
    fn test_requests_get_distinct_ids() {
        let a = AnalysisRequest::new(ToolSelector::Malware, "x", Language::En);
        let b = AnalysisRequest::new(ToolSelector::Malware, "x", Language::En);
        assert_ne!(a.id, b.id);
    }
}
