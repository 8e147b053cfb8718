pub mod model;
pub mod request;
pub mod response;
pub mod inference;
pub mod analyzer;
pub mod presentation;
pub mod config;
pub mod error;
pub mod observability;
pub mod security;

pub use analyzer::Analyzer;
pub use config::AppConfig;
pub use error::{AnalysisError, Result};
pub use model::{AnalysisRequest, AnalysisResult, Language, Source, Status, ToolSelector};
pub use presentation::render_report;
pub use request::build_request;
pub use response::normalize;
