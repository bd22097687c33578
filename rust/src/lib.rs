//! Rust implementation of the opsched operation scheduler.
//!
//! Statically schedules operations connected by precedence constraints, each
//! with a per-type latency and a per-type number of execution resources. The
//! pipeline computes the critical path, ASAP/ALAP bounds, slack, and a
//! resource-constrained list schedule that dispatches least-slack first.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::prelude::*;
use std::collections::HashMap;

pub mod bounds;
mod config;
pub mod critical_path;
mod error;
pub mod graph;
mod interner;
pub mod io;
pub mod logging;
mod models;
pub mod problem;
pub mod scheduler;
pub mod slack;

pub use bounds::{compute_bounds, Bounds, StartTimes};
pub use config::SchedulerConfig;
pub use critical_path::{find_critical_path, CriticalPath};
pub use error::{LoadError, ParseError, SchedulerError};
pub use graph::{DependencyGraph, GraphIndex, OperationId};
pub use interner::{TypeId, TypeInterner};
pub use models::{ScheduleEntry, ScheduleReport};
pub use problem::{ResourceTable, SchedulingProblem, TimingTable};
pub use scheduler::{ListSchedule, ListScheduler, OperationScheduler};
pub use slack::{compute_slack, Slack};

fn to_py_err(e: impl std::fmt::Display) -> PyErr {
    pyo3::exceptions::PyValueError::new_err(e.to_string())
}

/// Run the full scheduling pipeline.
///
/// # Arguments
/// * `operations` - Dict mapping operation ID to operation type
/// * `edges` - List of (from, to) precedence pairs
/// * `timing` - Dict mapping operation type to latency in cycles
/// * `resources` - Dict mapping operation type to number of parallel units
/// * `config` - Scheduler configuration (defaults if omitted)
///
/// # Returns
/// * ScheduleReport with critical path, ASAP, ALAP, slack and list schedule
///
/// # Raises
/// * ValueError on missing types, zero latency or capacity, or cycles
#[pyfunction]
#[pyo3(signature = (operations, edges, timing, resources, config=None))]
fn run_scheduler(
    operations: HashMap<OperationId, String>,
    edges: Vec<(OperationId, OperationId)>,
    timing: HashMap<String, u32>,
    resources: HashMap<String, u32>,
    config: Option<SchedulerConfig>,
) -> PyResult<ScheduleReport> {
    let graph = DependencyGraph::from_edges(operations.keys().copied(), edges);
    let problem = SchedulingProblem::new(graph, &operations, &timing, &resources).map_err(to_py_err)?;
    OperationScheduler::new(problem, config.unwrap_or_default())
        .run()
        .map_err(to_py_err)
}

/// Parse the textual graph, timing and constraints formats and schedule them.
///
/// # Raises
/// * ValueError on malformed text or invalid input
#[pyfunction]
#[pyo3(signature = (graph_text, timing_text, constraints_text, config=None))]
fn schedule_from_text(
    graph_text: &str,
    timing_text: &str,
    constraints_text: &str,
    config: Option<SchedulerConfig>,
) -> PyResult<ScheduleReport> {
    let problem = io::load_problem(graph_text, timing_text, constraints_text).map_err(to_py_err)?;
    OperationScheduler::new(problem, config.unwrap_or_default())
        .run()
        .map_err(to_py_err)
}

/// Render a dependency graph as Graphviz DOT text.
#[pyfunction]
fn graph_to_dot(operations: Vec<OperationId>, edges: Vec<(OperationId, OperationId)>) -> String {
    io::to_dot(&DependencyGraph::from_edges(operations, edges))
}

/// The opsched.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Data types
    m.add_class::<ScheduleEntry>()?;
    m.add_class::<ScheduleReport>()?;

    // Config types
    m.add_class::<SchedulerConfig>()?;

    // Algorithms
    m.add_function(wrap_pyfunction!(run_scheduler, m)?)?;
    m.add_function(wrap_pyfunction!(schedule_from_text, m)?)?;
    m.add_function(wrap_pyfunction!(graph_to_dot, m)?)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAPH: &str = "5\n1,[3],MUL\n2,[3],MUL\n3,[5],ADD\n4,[5],MUL\n5,[],ADD\n";
    const TIMING: &str = "MUL 3\nADD 1\n";
    const CONSTRAINTS: &str = "MUL 1\nADD 1\n";

    #[test]
    fn test_text_pipeline() {
        let problem = io::load_problem(GRAPH, TIMING, CONSTRAINTS).unwrap();
        let report = OperationScheduler::new(problem, SchedulerConfig::default())
            .run()
            .unwrap();

        assert_eq!(report.critical_path, vec![1, 3, 5]);
        assert_eq!(report.critical_path_length, 5);
        assert_eq!(report.slack[&4], 1);

        // One MUL unit serialises 1, 2 and 4; 4 has the most slack and goes last.
        assert_eq!(report.list_schedule[&1], ScheduleEntry::new(0, 0, 2));
        assert_eq!(report.list_schedule[&2], ScheduleEntry::new(0, 3, 5));
        assert_eq!(report.list_schedule[&4], ScheduleEntry::new(0, 6, 8));
        assert_eq!(report.list_schedule[&3], ScheduleEntry::new(6, 6, 6));
        assert_eq!(report.list_schedule[&5], ScheduleEntry::new(9, 9, 9));
        assert_eq!(report.makespan, 10);
        assert_eq!(report.critical_path_makespan, Some(10));
    }

    #[test]
    fn test_graph_to_dot() {
        assert_eq!(
            graph_to_dot(vec![1, 2], vec![(1, 2)]),
            "digraph G {\n  1;\n  2;\n  1 -> 2;\n}\n"
        );
    }
}
