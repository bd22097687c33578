//! Dependency graph between operations.
//!
//! [`DependencyGraph`] is the mutable, label-keyed builder. Once construction
//! is finished it is frozen into a [`GraphIndex`], which stores vertices at
//! contiguous positions together with forward and reverse adjacency so the
//! scheduling passes never rescan the edge set.

use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

use crate::error::SchedulerError;

/// Unique identifier of an operation (graph vertex).
pub type OperationId = u32;

/// Directed graph where an edge `a -> b` means `a` must finish before `b` starts.
///
/// The graph must be acyclic. Nothing here checks that; use
/// [`GraphIndex::topological_order`] to reject cycles.
#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    adjacency: FxHashMap<OperationId, FxHashSet<OperationId>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a vertex list and an edge list.
    pub fn from_edges(
        vertices: impl IntoIterator<Item = OperationId>,
        edges: impl IntoIterator<Item = (OperationId, OperationId)>,
    ) -> Self {
        let mut graph = Self::new();
        for v in vertices {
            graph.add_vertex(v);
        }
        for (from, to) in edges {
            graph.add_edge(from, to);
        }
        graph
    }

    /// Add a vertex. Re-adding an existing vertex clears its outgoing edges.
    pub fn add_vertex(&mut self, id: OperationId) {
        self.adjacency.insert(id, FxHashSet::default());
    }

    /// Add the edge `from -> to`.
    ///
    /// Endpoints that are not yet vertices are created with no outgoing edges,
    /// so the vertex set is always closed under the edge set.
    pub fn add_edge(&mut self, from: OperationId, to: OperationId) {
        self.adjacency.entry(to).or_default();
        self.adjacency.entry(from).or_default().insert(to);
    }

    /// All vertices in ascending order.
    pub fn vertices(&self) -> Vec<OperationId> {
        let mut ids: Vec<OperationId> = self.adjacency.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// All edges as `(from, to)` pairs in ascending order.
    pub fn edges(&self) -> Vec<(OperationId, OperationId)> {
        let mut edges: Vec<(OperationId, OperationId)> = self
            .adjacency
            .iter()
            .flat_map(|(&from, children)| children.iter().map(move |&to| (from, to)))
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Children of `id` in ascending order. Empty when `id` is not a vertex.
    pub fn children(&self, id: OperationId) -> Vec<OperationId> {
        let mut children: Vec<OperationId> = self
            .adjacency
            .get(&id)
            .map(|c| c.iter().copied().collect())
            .unwrap_or_default();
        children.sort_unstable();
        children
    }

    /// Parents of `id` in ascending order.
    ///
    /// This scans every edge (O(V+E)). Callers that need parents repeatedly
    /// should build a [`GraphIndex`] once instead.
    pub fn parents(&self, id: OperationId) -> Vec<OperationId> {
        let mut parents: Vec<OperationId> = self
            .adjacency
            .iter()
            .filter(|(_, children)| children.contains(&id))
            .map(|(&parent, _)| parent)
            .collect();
        parents.sort_unstable();
        parents
    }

    /// Vertices with no incoming edge, in ascending order.
    pub fn sources(&self) -> Vec<OperationId> {
        let targets: FxHashSet<OperationId> =
            self.adjacency.values().flatten().copied().collect();
        self.vertices()
            .into_iter()
            .filter(|v| !targets.contains(v))
            .collect()
    }

    /// Vertices with no outgoing edge, in ascending order.
    pub fn sinks(&self) -> Vec<OperationId> {
        self.vertices()
            .into_iter()
            .filter(|v| self.adjacency.get(v).map_or(true, |c| c.is_empty()))
            .collect()
    }

    pub fn contains(&self, id: OperationId) -> bool {
        self.adjacency.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }
}

/// Frozen view of a [`DependencyGraph`] with contiguous vertex positions.
///
/// Positions follow ascending [`OperationId`] order, so iterating positions
/// in order is the same as iterating ids in order.
#[derive(Clone, Debug, Default)]
pub struct GraphIndex {
    ids: Vec<OperationId>,
    positions: FxHashMap<OperationId, usize>,
    children: Vec<Vec<usize>>,
    parents: Vec<Vec<usize>>,
}

impl GraphIndex {
    /// Build the index, computing reverse adjacency once.
    pub fn build(graph: &DependencyGraph) -> Self {
        let ids = graph.vertices();
        let positions: FxHashMap<OperationId, usize> =
            ids.iter().enumerate().map(|(pos, &id)| (id, pos)).collect();

        let n = ids.len();
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut parents: Vec<Vec<usize>> = vec![Vec::new(); n];

        for (from, to) in graph.edges() {
            let (Some(&f), Some(&t)) = (positions.get(&from), positions.get(&to)) else {
                continue;
            };
            children[f].push(t);
            parents[t].push(f);
        }

        Self {
            ids,
            positions,
            children,
            parents,
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Operation id stored at `pos`.
    #[inline]
    pub fn id(&self, pos: usize) -> OperationId {
        self.ids[pos]
    }

    /// All operation ids in position order.
    pub fn ids(&self) -> &[OperationId] {
        &self.ids
    }

    /// Position of an operation id, if present.
    #[inline]
    pub fn position(&self, id: OperationId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// Child positions of `pos`, ascending.
    #[inline]
    pub fn children(&self, pos: usize) -> &[usize] {
        &self.children[pos]
    }

    /// Parent positions of `pos`, ascending.
    #[inline]
    pub fn parents(&self, pos: usize) -> &[usize] {
        &self.parents[pos]
    }

    /// Positions with no parents.
    pub fn sources(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len()).filter(|&pos| self.parents[pos].is_empty())
    }

    /// Positions with no children.
    pub fn sinks(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len()).filter(|&pos| self.children[pos].is_empty())
    }

    /// Topological order of positions using Kahn's algorithm.
    ///
    /// Among vertices that become available together, lower positions come
    /// first. Fails with [`SchedulerError::CyclicGraph`] naming every vertex
    /// that could not be ordered.
    pub fn topological_order(&self) -> Result<Vec<usize>, SchedulerError> {
        let n = self.len();
        let mut in_degree: Vec<usize> = self.parents.iter().map(Vec::len).collect();
        let mut queue: VecDeque<usize> = (0..n).filter(|&pos| in_degree[pos] == 0).collect();
        let mut order: Vec<usize> = Vec::with_capacity(n);

        while let Some(pos) = queue.pop_front() {
            order.push(pos);
            for &child in &self.children[pos] {
                in_degree[child] -= 1;
                if in_degree[child] == 0 {
                    queue.push_back(child);
                }
            }
        }

        if order.len() != n {
            let unresolved = (0..n)
                .filter(|&pos| in_degree[pos] > 0)
                .map(|pos| self.ids[pos])
                .collect();
            return Err(SchedulerError::CyclicGraph { unresolved });
        }

        Ok(order)
    }
}
