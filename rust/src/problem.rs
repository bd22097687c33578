//! Validated scheduling input.
//!
//! A [`SchedulingProblem`] bundles the dependency graph with operation types,
//! latencies and resource capacities. All input checks happen in
//! [`SchedulingProblem::new`], before any algorithm runs; afterwards the
//! problem is immutable and shared read-only by every phase.

use rustc_hash::FxHashMap;
use std::collections::HashMap;

use crate::error::SchedulerError;
use crate::graph::{DependencyGraph, GraphIndex, OperationId};
use crate::interner::{TypeId, TypeInterner};

/// Operation type -> latency in cycles.
pub type TimingTable = HashMap<String, u32>;

/// Operation type -> number of parallel execution resources.
pub type ResourceTable = HashMap<String, u32>;

/// Immutable, validated input for every scheduling phase.
#[derive(Clone, Debug)]
pub struct SchedulingProblem {
    graph: DependencyGraph,
    index: GraphIndex,
    types: TypeInterner,
    /// Type of each vertex, indexed by graph position.
    op_types: Vec<TypeId>,
    /// Latency of each vertex, indexed by graph position.
    latencies: Vec<i64>,
    /// Capacity of each interned type, indexed by type ID.
    capacities: Vec<u32>,
    /// Topological order of graph positions.
    topo_order: Vec<usize>,
}

impl SchedulingProblem {
    /// Validate and freeze scheduling input.
    ///
    /// Checks run in this order and the first failure is returned:
    /// every vertex has a type, every referenced type has a timing entry and a
    /// resource entry, no referenced type has zero latency or zero capacity,
    /// and the graph is acyclic. Types listed in the tables but never used by
    /// an operation are ignored.
    pub fn new(
        graph: DependencyGraph,
        operation_types: &HashMap<OperationId, String>,
        timing: &TimingTable,
        resources: &ResourceTable,
    ) -> Result<Self, SchedulerError> {
        let index = GraphIndex::build(&graph);

        let mut names: Vec<&str> = Vec::with_capacity(index.len());
        for &id in index.ids() {
            let op_type = operation_types
                .get(&id)
                .ok_or(SchedulerError::MissingOperationType { id })?;
            names.push(op_type.as_str());
        }

        let types = TypeInterner::from_sorted(names.iter().copied());
        let op_types: Vec<TypeId> = names
            .iter()
            .filter_map(|name| types.get(name))
            .collect();

        let mut type_latency: Vec<u32> = Vec::with_capacity(types.len());
        let mut capacities: Vec<u32> = Vec::with_capacity(types.len());
        for type_id in 0..types.len() as TypeId {
            let name = types.resolve(type_id).unwrap_or_default();
            let latency = *timing
                .get(name)
                .ok_or_else(|| SchedulerError::UnknownOperationType {
                    op_type: name.to_string(),
                    table: "timing",
                })?;
            let capacity = *resources
                .get(name)
                .ok_or_else(|| SchedulerError::UnknownOperationType {
                    op_type: name.to_string(),
                    table: "resource",
                })?;
            type_latency.push(latency);
            capacities.push(capacity);
        }

        if let Some(type_id) = type_latency.iter().position(|&l| l == 0) {
            return Err(SchedulerError::ZeroLatency {
                op_type: types.resolve(type_id as TypeId).unwrap_or_default().to_string(),
            });
        }

        let mut demand: FxHashMap<TypeId, usize> = FxHashMap::default();
        for &type_id in &op_types {
            *demand.entry(type_id).or_default() += 1;
        }
        if let Some(type_id) = capacities.iter().position(|&c| c == 0) {
            let type_id = type_id as TypeId;
            return Err(SchedulerError::ResourceStarvation {
                op_type: types.resolve(type_id).unwrap_or_default().to_string(),
                pending: demand.get(&type_id).copied().unwrap_or_default(),
            });
        }

        let topo_order = index.topological_order()?;

        let latencies = op_types
            .iter()
            .map(|&t| i64::from(type_latency[t as usize]))
            .collect();

        Ok(Self {
            graph,
            index,
            types,
            op_types,
            latencies,
            capacities,
            topo_order,
        })
    }

    /// The graph this problem was built from.
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Frozen adjacency with contiguous positions.
    pub fn index(&self) -> &GraphIndex {
        &self.index
    }

    /// Interned operation types referenced by the graph.
    pub fn types(&self) -> &TypeInterner {
        &self.types
    }

    /// Latency per graph position.
    pub fn latencies(&self) -> &[i64] {
        &self.latencies
    }

    /// Latency of the operation at `pos`.
    #[inline]
    pub fn latency(&self, pos: usize) -> i64 {
        self.latencies[pos]
    }

    /// Interned type of the operation at `pos`.
    #[inline]
    pub fn op_type(&self, pos: usize) -> TypeId {
        self.op_types[pos]
    }

    /// Name of the type of the operation at `pos`.
    pub fn op_type_name(&self, pos: usize) -> &str {
        self.types.resolve(self.op_types[pos]).unwrap_or_default()
    }

    /// Capacity per interned type.
    pub fn capacities(&self) -> &[u32] {
        &self.capacities
    }

    /// Graph positions in topological order.
    pub fn topological_order(&self) -> &[usize] {
        &self.topo_order
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(pairs: &[(OperationId, &str)]) -> HashMap<OperationId, String> {
        pairs.iter().map(|&(id, t)| (id, t.to_string())).collect()
    }

    fn table(pairs: &[(&str, u32)]) -> HashMap<String, u32> {
        pairs.iter().map(|&(t, n)| (t.to_string(), n)).collect()
    }

    fn chain() -> DependencyGraph {
        DependencyGraph::from_edges([1, 2, 3], [(1, 2), (2, 3)])
    }

    #[test]
    fn test_valid_problem() {
        let problem = SchedulingProblem::new(
            chain(),
            &types(&[(1, "ADD"), (2, "MUL"), (3, "ADD")]),
            &table(&[("ADD", 2), ("MUL", 3), ("DIV", 9)]),
            &table(&[("ADD", 1), ("MUL", 1), ("DIV", 0)]),
        )
        .unwrap();

        assert_eq!(problem.len(), 3);
        assert_eq!(problem.latencies(), &[2, 3, 2]);
        assert_eq!(problem.op_type_name(1), "MUL");
        // Unreferenced DIV is not interned, so its zero capacity is harmless.
        assert_eq!(problem.types().len(), 2);
        assert_eq!(problem.topological_order(), &[0, 1, 2]);
    }

    #[test]
    fn test_missing_operation_type() {
        let err = SchedulingProblem::new(
            chain(),
            &types(&[(1, "ADD"), (3, "ADD")]),
            &table(&[("ADD", 1)]),
            &table(&[("ADD", 1)]),
        )
        .unwrap_err();

        assert_eq!(err, SchedulerError::MissingOperationType { id: 2 });
    }

    #[test]
    fn test_missing_timing_entry() {
        let err = SchedulingProblem::new(
            chain(),
            &types(&[(1, "ADD"), (2, "MUL"), (3, "ADD")]),
            &table(&[("ADD", 1)]),
            &table(&[("ADD", 1), ("MUL", 1)]),
        )
        .unwrap_err();

        assert_eq!(
            err,
            SchedulerError::UnknownOperationType {
                op_type: "MUL".to_string(),
                table: "timing"
            }
        );
    }

    #[test]
    fn test_missing_resource_entry() {
        let err = SchedulingProblem::new(
            chain(),
            &types(&[(1, "ADD"), (2, "MUL"), (3, "ADD")]),
            &table(&[("ADD", 1), ("MUL", 1)]),
            &table(&[("MUL", 1)]),
        )
        .unwrap_err();

        assert_eq!(
            err,
            SchedulerError::UnknownOperationType {
                op_type: "ADD".to_string(),
                table: "resource"
            }
        );
    }

    #[test]
    fn test_zero_latency_rejected() {
        let err = SchedulingProblem::new(
            chain(),
            &types(&[(1, "ADD"), (2, "NOP"), (3, "ADD")]),
            &table(&[("ADD", 1), ("NOP", 0)]),
            &table(&[("ADD", 1), ("NOP", 1)]),
        )
        .unwrap_err();

        assert_eq!(
            err,
            SchedulerError::ZeroLatency {
                op_type: "NOP".to_string()
            }
        );
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = SchedulingProblem::new(
            chain(),
            &types(&[(1, "ADD"), (2, "MUL"), (3, "ADD")]),
            &table(&[("ADD", 1), ("MUL", 1)]),
            &table(&[("ADD", 0), ("MUL", 1)]),
        )
        .unwrap_err();

        assert_eq!(
            err,
            SchedulerError::ResourceStarvation {
                op_type: "ADD".to_string(),
                pending: 2
            }
        );
    }

    #[test]
    fn test_cycle_rejected() {
        let graph = DependencyGraph::from_edges([1, 2], [(1, 2), (2, 1)]);
        let err = SchedulingProblem::new(
            graph,
            &types(&[(1, "ADD"), (2, "ADD")]),
            &table(&[("ADD", 1)]),
            &table(&[("ADD", 1)]),
        )
        .unwrap_err();

        assert_eq!(
            err,
            SchedulerError::CyclicGraph {
                unresolved: vec![1, 2]
            }
        );
    }

    #[test]
    fn test_empty_problem() {
        let problem = SchedulingProblem::new(
            DependencyGraph::new(),
            &HashMap::new(),
            &TimingTable::new(),
            &ResourceTable::new(),
        )
        .unwrap();

        assert!(problem.is_empty());
    }
}
