// core/src/py/mod.rs
//
// PyO3-binding (feature `python`): JSON inn, annotert JSON ut.
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

use crate::engine::annotate_records;
use crate::storage::parse_records;
use crate::types::ScoringMode;

fn score_json(records_json: &str, mode: &str) -> Result<String, String> {
    let mode: ScoringMode = mode.parse().map_err(|e| format!("{e}"))?;
    let records = parse_records(records_json).map_err(|e| format!("parse error: {e}"))?;
    let annotated = annotate_records(&records, mode).map_err(|e| e.to_string())?;
    serde_json::to_string(&annotated).map_err(|e| e.to_string())
}

#[pyfunction]
#[pyo3(signature = (records_json, mode = "batch"))]
fn score_records_json(records_json: &str, mode: &str) -> PyResult<String> {
    score_json(records_json, mode).map_err(PyValueError::new_err)
}

#[pymodule]
fn equiscore_core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(score_records_json, m)?)?;
    Ok(())
}
