//! Result types exposed to Python and report writers.

use pyo3::prelude::*;
use std::collections::BTreeMap;

use crate::graph::OperationId;
use crate::io::report;

// Note: We use std BTreeMap here so results convert to ordered Python dicts

/// Ready, start and finish tick of one operation in the list schedule.
///
/// `finish` is the last tick the operation occupies its resource, so
/// `finish = start + latency - 1`.
#[pyclass]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduleEntry {
    #[pyo3(get, set)]
    pub ready: i64,
    #[pyo3(get, set)]
    pub start: i64,
    #[pyo3(get, set)]
    pub finish: i64,
}

#[pymethods]
impl ScheduleEntry {
    #[new]
    pub fn new(ready: i64, start: i64, finish: i64) -> Self {
        Self {
            ready,
            start,
            finish,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "ScheduleEntry(ready={}, start={}, finish={})",
            self.ready, self.start, self.finish
        )
    }
}

/// Everything one scheduling run produces.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScheduleReport {
    #[pyo3(get)]
    pub critical_path: Vec<OperationId>,
    #[pyo3(get)]
    pub critical_path_length: i64,
    #[pyo3(get)]
    pub asap: BTreeMap<OperationId, i64>,
    #[pyo3(get)]
    pub alap: BTreeMap<OperationId, i64>,
    #[pyo3(get)]
    pub slack: BTreeMap<OperationId, i64>,
    #[pyo3(get)]
    pub list_schedule: BTreeMap<OperationId, ScheduleEntry>,
    /// One past the latest finish tick over all operations.
    #[pyo3(get)]
    pub makespan: i64,
    /// One past the finish tick of the last critical-path operation.
    ///
    /// Smaller than `makespan` when resource contention delays work off the
    /// critical path past the critical path's own completion.
    #[pyo3(get)]
    pub critical_path_makespan: Option<i64>,
}

#[pymethods]
impl ScheduleReport {
    /// ASAP schedule as `Node k: t=v` lines.
    pub fn format_asap(&self) -> String {
        report::format_schedule(&self.asap, self.critical_path_length)
    }

    /// ALAP schedule as `Node k: t=v` lines.
    pub fn format_alap(&self) -> String {
        report::format_schedule(&self.alap, self.critical_path_length)
    }

    pub fn format_slack(&self) -> String {
        report::format_slack(&self.slack)
    }

    pub fn format_list_schedule(&self) -> String {
        report::format_list_schedule(&self.list_schedule, self.makespan)
    }

    fn __repr__(&self) -> String {
        format!(
            "ScheduleReport(operations={}, critical_path_length={}, makespan={})",
            self.list_schedule.len(),
            self.critical_path_length,
            self.makespan
        )
    }
}
