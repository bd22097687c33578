//! Human-readable reports and Graphviz export.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::graph::{DependencyGraph, OperationId};
use crate::models::{ScheduleEntry, ScheduleReport};

/// `Node k: t=v` per operation, then `Finished t=<critical path length>`.
pub fn format_schedule(times: &BTreeMap<OperationId, i64>, critical_path_length: i64) -> String {
    let mut out: String = times
        .iter()
        .map(|(id, t)| format!("Node {id}: t={t}\n"))
        .collect();
    out.push_str(&format!("Finished t={critical_path_length}\n"));
    out
}

/// `Node k: slack=v` per operation.
pub fn format_slack(slack: &BTreeMap<OperationId, i64>) -> String {
    slack
        .iter()
        .map(|(id, s)| format!("Node {id}: slack={s}\n"))
        .collect()
}

/// Ready/start/finish per operation, then `Finished t=<makespan>`.
pub fn format_list_schedule(entries: &BTreeMap<OperationId, ScheduleEntry>, makespan: i64) -> String {
    let mut out: String = entries
        .iter()
        .map(|(id, e)| {
            format!(
                "Node {id}: Ready t={}; Running t={}; Finished t={}\n",
                e.ready, e.start, e.finish
            )
        })
        .collect();
    out.push_str(&format!("Finished t={makespan}\n"));
    out
}

/// Graphviz digraph of every vertex and edge.
pub fn to_dot(graph: &DependencyGraph) -> String {
    let mut out = String::from("digraph G {\n");
    for id in graph.vertices() {
        out.push_str(&format!("  {id};\n"));
    }
    for (from, to) in graph.edges() {
        out.push_str(&format!("  {from} -> {to};\n"));
    }
    out.push_str("}\n");
    out
}

/// Write `asap.txt`, `alap.txt`, `slack.txt`, `list_scheduling.txt` and
/// `graph.dot` into `dir`.
pub fn write_reports(dir: &Path, graph: &DependencyGraph, report: &ScheduleReport) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join("asap.txt"), report.format_asap())?;
    fs::write(dir.join("alap.txt"), report.format_alap())?;
    fs::write(dir.join("slack.txt"), report.format_slack())?;
    fs::write(dir.join("list_scheduling.txt"), report.format_list_schedule())?;
    fs::write(dir.join("graph.dot"), to_dot(graph))?;
    Ok(())
}
