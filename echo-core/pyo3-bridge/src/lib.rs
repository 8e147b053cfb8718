use pyo3::prelude::*;

mod analyzer_bindings;

use analyzer_bindings::PyAnalyzer;

#[pymodule]
fn pyo3_bridge(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<PyAnalyzer>()?;
    m.add("TOOLS", echo_core::ToolSelector::ALL.map(|t| t.id()).to_vec())?;
    m.add("LANGUAGES", vec!["ar", "en"])?;
    Ok(())
}
