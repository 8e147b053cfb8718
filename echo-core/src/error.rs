use thiserror::Error;
use reqwest::Error as ReqwestError;
use serde_json::Error as JsonError;
use std::io::Error as IoError;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] JsonError),

    #[error("IO error: {0}")]
    Io(#[from] IoError),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("Inference API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AnalysisError {
    /// True for failures of the inference call itself, as opposed to
    /// failures in what it returned.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AnalysisError::Network(_)
                | AnalysisError::Api { .. }
                | AnalysisError::RateLimitExceeded(_)
                | AnalysisError::Authentication(_)
        )
    }

    /// Short stable label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::Network(_) => "network",
            AnalysisError::Serialization(_) => "serialization",
            AnalysisError::Io(_) => "io",
            AnalysisError::MalformedResponse(_) => "malformed_response",
            AnalysisError::Api { .. } => "api",
            AnalysisError::RateLimitExceeded(_) => "rate_limited",
            AnalysisError::Authentication(_) => "authentication",
            AnalysisError::InvalidConfig(_) => "invalid_config",
            AnalysisError::InvalidInput(_) => "invalid_input",
            AnalysisError::Metrics(_) => "metrics",
            AnalysisError::Unknown(_) => "unknown",
        }
    }
}

impl From<anyhow::Error> for AnalysisError {
    fn from(err: anyhow::Error) -> Self {
        AnalysisError::Unknown(format!("{:#}", err))
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_classification() {
        assert!(AnalysisError::RateLimitExceeded("quota".into()).is_transport());
        assert!(AnalysisError::Api { status: 500, message: "boom".into() }.is_transport());
        assert!(!AnalysisError::MalformedResponse("eof".into()).is_transport());
        assert!(!AnalysisError::InvalidInput("empty".into()).is_transport());
    }

    #[test]
    fn test_anyhow_conversion_keeps_context() {
        let err = anyhow::anyhow!("inner").context("outer");
        let converted: AnalysisError = err.into();
        let message = converted.to_string();
        assert!(message.contains("outer"));
        assert!(message.contains("inner"));
    }
}
