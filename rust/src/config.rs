//! Configuration types for the scheduling system.

use pyo3::prelude::*;

/// Configuration for a scheduling run.
#[pyclass]
#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    #[pyo3(get, set)]
    pub verbosity: u8,
    /// Run the ASAP and ALAP passes as a `rayon::join` fork before slack.
    #[pyo3(get, set)]
    pub parallel_bounds: bool,
    /// Tick cap for list scheduling (None = derived from total latency)
    #[pyo3(get, set)]
    pub max_ticks: Option<u64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            verbosity: 0,
            parallel_bounds: true,
            max_ticks: None,
        }
    }
}

#[pymethods]
impl SchedulerConfig {
    #[new]
    #[pyo3(signature = (verbosity=None, parallel_bounds=None, max_ticks=None))]
    fn new(verbosity: Option<u8>, parallel_bounds: Option<bool>, max_ticks: Option<u64>) -> Self {
        let defaults = Self::default();
        Self {
            verbosity: verbosity.unwrap_or(defaults.verbosity),
            parallel_bounds: parallel_bounds.unwrap_or(defaults.parallel_bounds),
            max_ticks: max_ticks.or(defaults.max_ticks),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "SchedulerConfig(verbosity={}, parallel_bounds={}, max_ticks={:?})",
            self.verbosity, self.parallel_bounds, self.max_ticks
        )
    }
}
