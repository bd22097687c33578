//! Readers for the textual graph, timing and constraint formats.
//!
//! Graph text: the first line holds the operation count N, followed by N
//! lines of `id,[child child ...],TYPE`. Timing and constraint text are
//! whitespace-separated `TYPE NUMBER` pairs.

use std::collections::HashMap;

use crate::error::{LoadError, ParseError};
use crate::graph::{DependencyGraph, OperationId};
use crate::problem::SchedulingProblem;

/// Graph plus the type of each operation, as read from graph text.
#[derive(Clone, Debug, Default)]
pub struct GraphInput {
    pub graph: DependencyGraph,
    pub operation_types: HashMap<OperationId, String>,
}

/// Parse graph text.
///
/// Blank lines are skipped. Lines after the N declared operations are
/// ignored. Children that are never declared still become vertices, and
/// are reported as missing a type when the problem is validated.
pub fn parse_graph(text: &str) -> Result<GraphInput, ParseError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let Some((count_line, count_text)) = lines.next() else {
        return Ok(GraphInput::default());
    };
    let expected: usize = count_text
        .parse()
        .map_err(|_| ParseError::syntax(count_line, format!("invalid operation count {count_text:?}")))?;

    let mut declared: Vec<(OperationId, Vec<OperationId>)> = Vec::with_capacity(expected);
    let mut operation_types: HashMap<OperationId, String> = HashMap::with_capacity(expected);

    for (line_no, line) in lines.take(expected) {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let &[id_text, children_text, op_type] = fields.as_slice() else {
            return Err(ParseError::syntax(
                line_no,
                format!("expected `id,[children],TYPE`, got {} fields", fields.len()),
            ));
        };

        let id = parse_id(line_no, id_text)?;
        let children = children_text
            .trim_matches(|c: char| c == '[' || c == ']')
            .split_whitespace()
            .map(|child| parse_id(line_no, child))
            .collect::<Result<Vec<_>, _>>()?;
        if op_type.is_empty() {
            return Err(ParseError::syntax(line_no, "missing operation type"));
        }

        operation_types.insert(id, op_type.to_string());
        declared.push((id, children));
    }

    if declared.len() < expected {
        return Err(ParseError::TruncatedGraph {
            expected,
            found: declared.len(),
        });
    }

    let graph = DependencyGraph::from_edges(
        declared.iter().map(|(id, _)| *id),
        declared
            .iter()
            .flat_map(|(id, children)| children.iter().map(move |&c| (*id, c))),
    );

    Ok(GraphInput {
        graph,
        operation_types,
    })
}

fn parse_id(line: usize, text: &str) -> Result<OperationId, ParseError> {
    text.parse()
        .map_err(|_| ParseError::syntax(line, format!("invalid operation id {text:?}")))
}

/// Parse a `TYPE NUMBER` table (timing or constraints).
///
/// Pairs may span lines; a later entry for the same type replaces an earlier one.
pub fn parse_table(text: &str) -> Result<HashMap<String, u32>, ParseError> {
    let tokens: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .flat_map(|(i, line)| line.split_whitespace().map(move |t| (i + 1, t)))
        .collect();

    let mut table = HashMap::with_capacity(tokens.len() / 2);
    for pair in tokens.chunks(2) {
        let &[(_, name), (line, number)] = pair else {
            let (line, name) = pair[0];
            return Err(ParseError::syntax(line, format!("{name:?} has no value")));
        };
        let value: u32 = number
            .parse()
            .map_err(|_| ParseError::syntax(line, format!("invalid value {number:?} for {name:?}")))?;
        table.insert(name.to_string(), value);
    }

    Ok(table)
}

/// Parse all three inputs and validate them into a [`SchedulingProblem`].
pub fn load_problem(
    graph_text: &str,
    timing_text: &str,
    constraints_text: &str,
) -> Result<SchedulingProblem, LoadError> {
    let input = parse_graph(graph_text).map_err(LoadError::Graph)?;
    let timing = parse_table(timing_text).map_err(LoadError::Timing)?;
    let resources = parse_table(constraints_text).map_err(LoadError::Constraints)?;

    Ok(SchedulingProblem::new(
        input.graph,
        &input.operation_types,
        &timing,
        &resources,
    )?)
}
