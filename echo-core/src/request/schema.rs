/// Structured-output schema sent with every analysis request

use serde_json::{json, Value};

use crate::model::Language;

/// Fields the model must always return.
pub const REQUIRED_FIELDS: [&str; 4] = ["status", "judgment", "confidence", "explanation"];

/// Response schema in the Gemini OpenAPI subset. Only the language named in
/// the field descriptions varies between calls.
pub fn response_schema(language: Language) -> Value {
    let target = language.target_name();
    json!({
        "type": "OBJECT",
        "properties": {
            "status": {
                "type": "STRING",
                "enum": ["safe", "warning", "danger"],
                "description": "Must be 'safe', 'warning', or 'danger'."
            },
            "judgment": {
                "type": "STRING",
                "description": format!("A short conclusive verdict in {}.", target)
            },
            "confidence": {
                "type": "NUMBER",
                "description": "Numerical percentage from 0 to 100."
            },
            "explanation": {
                "type": "STRING",
                "description": format!(
                    "Detailed analysis report in {}. Use bullet points and clear sections.",
                    target
                )
            },
            "sources": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "uri": { "type": "STRING" }
                    }
                }
            }
        },
        "required": REQUIRED_FIELDS
    })
}
