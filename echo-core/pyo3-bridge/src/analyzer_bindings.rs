use pyo3::exceptions::{
    PyConnectionError, PyIOError, PyPermissionError, PyRuntimeError, PyValueError,
};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};
use pyo3_asyncio::tokio::future_into_py;
use std::sync::Arc;

use echo_core::error::AnalysisError;
use echo_core::observability::{setup_logging, MetricsCollector};
use echo_core::presentation::{status_display, ReportView};
use echo_core::{Analyzer, AnalysisResult, AppConfig, Language, ToolSelector};

fn to_py_err(err: AnalysisError) -> PyErr {
    match err {
        AnalysisError::Network(e) => PyConnectionError::new_err(format!("Network error: {}", e)),
        AnalysisError::Io(e) => PyIOError::new_err(format!("IO error: {}", e)),
        AnalysisError::Authentication(msg) => {
            PyPermissionError::new_err(format!("Authentication failed: {}", msg))
        }
        e @ (AnalysisError::InvalidInput(_)
        | AnalysisError::InvalidConfig(_)
        | AnalysisError::MalformedResponse(_)
        | AnalysisError::Serialization(_)) => PyValueError::new_err(e.to_string()),
        other => PyRuntimeError::new_err(other.to_string()),
    }
}

fn result_to_dict<'p>(
    py: Python<'p>,
    result: &AnalysisResult,
    language: Language,
) -> PyResult<&'p PyDict> {
    let dict = PyDict::new(py);
    dict.set_item("request_id", result.request_id.map(|id| id.to_string()))?;
    dict.set_item("tool", result.tool.id())?;
    dict.set_item("status", result.status.as_str())?;
    dict.set_item("judgment", &result.judgment)?;
    dict.set_item("confidence", result.confidence)?;
    dict.set_item("explanation", &result.explanation)?;

    let sources = PyList::empty(py);
    for source in &result.sources {
        let item = PyDict::new(py);
        item.set_item("title", &source.title)?;
        item.set_item("uri", &source.uri)?;
        sources.append(item)?;
    }
    dict.set_item("sources", sources)?;

    let display = status_display(&result.status);
    let display_dict = PyDict::new(py);
    display_dict.set_item("label", display.label(language))?;
    display_dict.set_item("icon", display.icon)?;
    display_dict.set_item("color", format!("{:?}", display.color).to_lowercase())?;
    dict.set_item("display", display_dict)?;

    Ok(dict)
}

fn parse_args(tool: &str, lang: &str) -> PyResult<(ToolSelector, Language)> {
    let tool = tool.parse::<ToolSelector>().map_err(to_py_err)?;
    let language = lang.parse::<Language>().map_err(to_py_err)?;
    Ok((tool, language))
}

#[pyclass]
pub struct PyAnalyzer {
    inner: Arc<Analyzer>,
    runtime: tokio::runtime::Runtime,
}

#[pymethods]
impl PyAnalyzer {
    /// Build from a TOML file, or from the environment when no path is given.
    #[new]
    #[pyo3(signature = (config_path=None))]
    fn new(config_path: Option<String>) -> PyResult<Self> {
        let config = match config_path {
            Some(path) => AppConfig::from_file(path),
            None => AppConfig::from_env(),
        }
        .map_err(to_py_err)?;

        setup_logging(&config.logging);

        let metrics = MetricsCollector::new().map_err(to_py_err)?;
        let analyzer = Analyzer::from_config(&config)
            .map_err(to_py_err)?
            .with_metrics(metrics);

        let runtime = tokio::runtime::Runtime::new().map_err(|e| {
            PyRuntimeError::new_err(format!("Failed to create runtime: {}", e))
        })?;

        Ok(Self {
            inner: Arc::new(analyzer),
            runtime,
        })
    }

    /// Run one scan, blocking without holding the GIL.
    fn analyze<'p>(
        &self,
        py: Python<'p>,
        tool: &str,
        input: String,
        lang: &str,
    ) -> PyResult<&'p PyDict> {
        let (tool, language) = parse_args(tool, lang)?;
        let analyzer = Arc::clone(&self.inner);

        let result = py
            .allow_threads(|| {
                self.runtime
                    .block_on(async move { analyzer.analyze(tool, &input, language).await })
            })
            .map_err(to_py_err)?;

        result_to_dict(py, &result, language)
    }

    /// Awaitable variant of `analyze` for asyncio callers.
    fn analyze_async<'p>(
        &self,
        py: Python<'p>,
        tool: &str,
        input: String,
        lang: &str,
    ) -> PyResult<&'p PyAny> {
        let (tool, language) = parse_args(tool, lang)?;
        let analyzer = Arc::clone(&self.inner);

        future_into_py(py, async move {
            let result = analyzer
                .analyze(tool, &input, language)
                .await
                .map_err(to_py_err)?;
            Python::with_gil(|py| {
                result_to_dict(py, &result, language).map(|dict| dict.to_object(py))
            })
        })
    }

    /// Plain-text report for a result dict as returned by `analyze`.
    #[pyo3(signature = (result, lang="en"))]
    fn render(&self, py: Python, result: &PyDict, lang: &str) -> PyResult<String> {
        let language = lang.parse::<Language>().map_err(to_py_err)?;
        let json: String = py
            .import("json")?
            .call_method1("dumps", (result,))?
            .extract()?;
        let result: AnalysisResult = serde_json::from_str(&json)
            .map_err(|e| PyValueError::new_err(format!("Invalid result: {}", e)))?;
        Ok(ReportView::new(&result, language).render())
    }

    /// Prometheus text exposition of scan metrics.
    fn metrics(&self) -> PyResult<String> {
        match self.inner.metrics() {
            Some(metrics) => metrics.export().map_err(to_py_err),
            None => Ok(String::new()),
        }
    }
}
