use chrono::{DateTime, Utc};
use prometheus::{
    CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{AnalysisError, Result};
use crate::model::ToolSelector;

/// Outcome of one scan, as recorded for metrics and structured logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestMetrics {
    pub request_id: Uuid,
    pub tool: ToolSelector,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub tokens_input: Option<u32>,
    pub tokens_output: Option<u32>,
    pub grounding_sources: usize,
    pub success: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolStats {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub grounding_sources: u64,
}

#[derive(Clone)]
pub struct MetricsCollector {
    registry: Arc<Registry>,
    request_counter: CounterVec,
    request_duration: HistogramVec,
    error_counter: CounterVec,
    tokens_input: CounterVec,
    tokens_output: CounterVec,
    grounding_sources: CounterVec,
    active_requests: Gauge,
}

impl MetricsCollector {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let request_counter = CounterVec::new(
            Opts::new("echo_scans_total", "Total number of scans")
                .const_label("component", "analyzer"),
            &["tool"],
        )?;

        let request_duration = HistogramVec::new(
            HistogramOpts::new("echo_scan_duration_seconds", "Scan duration in seconds")
                .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 40.0, 80.0]),
            &["tool"],
        )?;

        let error_counter = CounterVec::new(
            Opts::new("echo_scan_errors_total", "Total number of failed scans"),
            &["tool", "kind"],
        )?;

        let tokens_input = CounterVec::new(
            Opts::new("echo_tokens_input_total", "Total prompt tokens"),
            &["tool"],
        )?;

        let tokens_output = CounterVec::new(
            Opts::new("echo_tokens_output_total", "Total response tokens"),
            &["tool"],
        )?;

        let grounding_sources = CounterVec::new(
            Opts::new(
                "echo_grounding_sources_total",
                "Citations appended from search grounding",
            ),
            &["tool"],
        )?;

        let active_requests = Gauge::with_opts(Opts::new(
            "echo_active_scans",
            "Number of scans awaiting the model",
        ))?;

        registry.register(Box::new(request_counter.clone()))?;
        registry.register(Box::new(request_duration.clone()))?;
        registry.register(Box::new(error_counter.clone()))?;
        registry.register(Box::new(tokens_input.clone()))?;
        registry.register(Box::new(tokens_output.clone()))?;
        registry.register(Box::new(grounding_sources.clone()))?;
        registry.register(Box::new(active_requests.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            request_counter,
            request_duration,
            error_counter,
            tokens_input,
            tokens_output,
            grounding_sources,
            active_requests,
        })
    }

    pub fn record_request(&self, metrics: &RequestMetrics) {
        let tool = metrics.tool.id();

        self.request_counter.with_label_values(&[tool]).inc();
        self.request_duration
            .with_label_values(&[tool])
            .observe(metrics.duration_ms as f64 / 1000.0);

        if let Some(tokens) = metrics.tokens_input {
            self.tokens_input.with_label_values(&[tool]).inc_by(tokens as f64);
        }

        if let Some(tokens) = metrics.tokens_output {
            self.tokens_output.with_label_values(&[tool]).inc_by(tokens as f64);
        }

        if metrics.grounding_sources > 0 {
            self.grounding_sources
                .with_label_values(&[tool])
                .inc_by(metrics.grounding_sources as f64);
        }

        if !metrics.success {
            let kind = metrics.error.as_deref().unwrap_or("unknown");
            self.error_counter.with_label_values(&[tool, kind]).inc();
        }
    }

    pub fn increment_active(&self) {
        self.active_requests.inc();
    }

    pub fn decrement_active(&self) {
        self.active_requests.dec();
    }

    pub fn active(&self) -> f64 {
        self.active_requests.get()
    }

    /// Prometheus text exposition of every collected metric.
    pub fn export(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| AnalysisError::Unknown(e.to_string()))
    }

    pub fn get_stats(&self, tool: ToolSelector) -> ToolStats {
        let label = tool.id();
        let total = self.request_counter.with_label_values(&[label]).get() as u64;

        let failed: f64 = self
            .registry
            .gather()
            .iter()
            .filter(|family| family.get_name() == "echo_scan_errors_total")
            .flat_map(|family| family.get_metric().iter())
            .filter(|metric| {
                metric
                    .get_label()
                    .iter()
                    .any(|pair| pair.get_name() == "tool" && pair.get_value() == label)
            })
            .map(|metric| metric.get_counter().get_value())
            .sum();
        let failed = failed as u64;

        ToolStats {
            total_requests: total,
            successful_requests: total.saturating_sub(failed),
            failed_requests: failed,
            grounding_sources: self.grounding_sources.with_label_values(&[label]).get() as u64,
        }
    }
}
