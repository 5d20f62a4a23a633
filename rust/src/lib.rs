//! Rust implementation of the hanzi curriculum ordering algorithms.
//!
//! Turns a bucket/frequency-sorted backlog of characters and words into a
//! teaching order where every unit follows its structural components, then
//! tags each emitted unit for output.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::prelude::*;

pub mod backlog;
pub mod classify;
mod config;
pub mod logging;
mod models;
pub mod scheduler;

pub use backlog::{build_backlog, BacklogKey};
pub use classify::{classify, FrequencyBand, TaggedUnit};
pub use config::{ClassifyConfig, ScheduleConfig};
pub use models::{BucketTag, LookupStore, Unit, UnitKey};
pub use scheduler::{schedule, ScheduleError, ScheduleResult};

/// Order merged source lists into the scheduler's backlog.
///
/// Applies delay overrides, fills missing ranks and word decompositions,
/// then sorts by (bucket, frequency rank with unranked last, form).
#[pyfunction]
#[pyo3(name = "build_backlog")]
fn py_build_backlog(sources: Vec<Unit>, lookups: PyRef<'_, LookupStore>) -> Vec<Unit> {
    build_backlog(sources, &lookups)
}

/// Compute the curriculum order for a sorted backlog.
///
/// # Arguments
/// * `backlog` - Units in backlog order (see `build_backlog`)
/// * `lookups` - Decomposition, frequency and baseline tables
/// * `config` - Heuristic switches; defaults when omitted
///
/// # Returns
/// * List of units in emission order
///
/// # Raises
/// * ValueError if a unit or component has an empty or malformed form
#[pyfunction]
#[pyo3(name = "schedule", signature = (backlog, lookups, config=None))]
fn py_schedule(
    backlog: Vec<Unit>,
    lookups: PyRef<'_, LookupStore>,
    config: Option<ScheduleConfig>,
) -> PyResult<Vec<Unit>> {
    let config = config.unwrap_or_default();

    match schedule(backlog, &lookups, &config) {
        Ok(result) => Ok(result.ordered),
        Err(e) => Err(pyo3::exceptions::PyValueError::new_err(e.to_string())),
    }
}

/// Tag scheduled units for output, dropping rarely reused structural characters.
#[pyfunction]
#[pyo3(name = "classify", signature = (ordered, lookups, config=None))]
fn py_classify(
    ordered: Vec<Unit>,
    lookups: PyRef<'_, LookupStore>,
    config: Option<ClassifyConfig>,
) -> Vec<TaggedUnit> {
    let config = config.unwrap_or_default();
    classify(&ordered, &lookups, &config)
}

/// The hanzi_order.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Core data types
    m.add_class::<BucketTag>()?;
    m.add_class::<Unit>()?;
    m.add_class::<LookupStore>()?;
    m.add_class::<TaggedUnit>()?;

    // Config types
    m.add_class::<ScheduleConfig>()?;
    m.add_class::<ClassifyConfig>()?;

    // Algorithms
    m.add_function(wrap_pyfunction!(py_build_backlog, m)?)?;
    m.add_function(wrap_pyfunction!(py_schedule, m)?)?;
    m.add_function(wrap_pyfunction!(py_classify, m)?)?;

    Ok(())
}
