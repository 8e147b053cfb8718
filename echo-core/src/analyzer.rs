//! The UI-facing entry point: one scan in, one verdict out.

use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;

use crate::config::AppConfig;
use crate::error::Result;
use crate::inference::{GeminiClient, InferenceBackend, InferenceCall, TokenUsage};
use crate::log_scan;
use crate::model::{AnalysisRequest, AnalysisResult, Language, ToolSelector};
use crate::observability::{MetricsCollector, RequestMetrics};
use crate::request::ModelRequest;
use crate::response::{grounding, normalize};
use crate::security::validate_input;

/// Runs scans against an inference backend.
///
/// Holds no per-request state, so one `Analyzer` can serve concurrent
/// scans; every result carries the id of the request that produced it.
#[derive(Clone)]
pub struct Analyzer {
    backend: Arc<dyn InferenceBackend>,
    model: String,
    max_input_chars: usize,
    metrics: Option<MetricsCollector>,
}

/// Holds one slot of the in-flight gauge; released on drop so a cancelled
/// scan does not leak it.
struct InFlight<'a>(Option<&'a MetricsCollector>);

impl<'a> InFlight<'a> {
    fn enter(metrics: Option<&'a MetricsCollector>) -> Self {
        if let Some(metrics) = metrics {
            metrics.increment_active();
        }
        Self(metrics)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Some(metrics) = self.0 {
            metrics.decrement_active();
        }
    }
}

struct Completed {
    result: AnalysisResult,
    usage: Option<TokenUsage>,
    grounding_sources: usize,
}

impl Analyzer {
    pub fn new(backend: Arc<dyn InferenceBackend>, config: &AppConfig) -> Self {
        Self {
            backend,
            model: config.gemini.model.clone(),
            max_input_chars: config.analysis.max_input_chars,
            metrics: None,
        }
    }

    /// Analyzer backed by a `GeminiClient` built from `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        let client = GeminiClient::new(&config.gemini)?;
        Ok(Self::new(Arc::new(client), config))
    }

    pub fn with_metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn metrics(&self) -> Option<&MetricsCollector> {
        self.metrics.as_ref()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn analyze(
        &self,
        tool: ToolSelector,
        input: &str,
        language: Language,
    ) -> Result<AnalysisResult> {
        let request = AnalysisRequest::new(tool, input, language);
        self.analyze_request(&request).await
    }

    pub async fn analyze_request(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        if let Err(e) = validate_input(&request.raw_input, self.max_input_chars) {
            log_scan!(
                warn,
                request.tool,
                request_id = %request.id,
                error = %e,
                "Rejected scan input"
            );
            return Err(e.into());
        }

        let started_at = Utc::now();
        let timer = Instant::now();

        let in_flight = InFlight::enter(self.metrics.as_ref());
        let outcome = self.run(request).await;
        drop(in_flight);

        let duration_ms = timer.elapsed().as_millis() as u64;
        let record = RequestMetrics {
            request_id: request.id,
            tool: request.tool,
            started_at,
            duration_ms,
            tokens_input: outcome.as_ref().ok().and_then(|c| c.usage).map(|u| u.input_tokens),
            tokens_output: outcome.as_ref().ok().and_then(|c| c.usage).map(|u| u.output_tokens),
            grounding_sources: outcome.as_ref().map(|c| c.grounding_sources).unwrap_or(0),
            success: outcome.is_ok(),
            error: outcome.as_ref().err().map(|e| e.kind().to_string()),
        };
        if let Some(metrics) = &self.metrics {
            metrics.record_request(&record);
        }

        match outcome {
            Ok(completed) => {
                log_scan!(
                    info,
                    request.tool,
                    request_id = %request.id,
                    language = %request.language,
                    backend = self.backend.name(),
                    status = %completed.result.status,
                    confidence = completed.result.confidence,
                    sources = completed.result.sources.len(),
                    grounding_sources = completed.grounding_sources,
                    duration_ms,
                    "Scan completed"
                );
                Ok(completed.result)
            }
            Err(e) => {
                log_scan!(
                    error,
                    request.tool,
                    request_id = %request.id,
                    language = %request.language,
                    backend = self.backend.name(),
                    error = %e,
                    kind = e.kind(),
                    duration_ms,
                    "Scan failed"
                );
                Err(e)
            }
        }
    }

    async fn run(&self, request: &AnalysisRequest) -> Result<Completed> {
        let call = InferenceCall::new(self.model.clone(), ModelRequest::from(request));
        let output = self.backend.generate(&call).await?;

        let result = normalize(
            output.text.as_deref().unwrap_or_default(),
            &output.grounding_chunks,
            request.tool,
            request.language,
        )?
        .with_request_id(request.id);

        let grounding_sources = if request.tool == ToolSelector::FakeNews {
            grounding::sources_from_chunks(&output.grounding_chunks, request.language).len()
        } else {
            0
        };

        Ok(Completed {
            result,
            usage: output.usage,
            grounding_sources,
        })
    }
}
