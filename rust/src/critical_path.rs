//! Critical path search.
//!
//! The critical path is the source-to-sink path with the largest sum of
//! operation latencies. It is a lower bound on the makespan of any schedule
//! and fixes the horizon the ALAP pass works back from.

use crate::graph::{GraphIndex, OperationId};

/// Longest latency-weighted path through the graph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CriticalPath {
    /// Operations from a source to a sink.
    pub path: Vec<OperationId>,
    /// Sum of the latencies of every operation on `path`.
    pub length: i64,
}

impl CriticalPath {
    /// Last operation of the path, if any.
    pub fn sink(&self) -> Option<OperationId> {
        self.path.last().copied()
    }
}

/// Find the critical path with a reverse-topological dynamic program.
///
/// For every vertex the longest suffix (its own latency plus the longest
/// suffix among its children) is computed once, giving O(V+E) time.
///
/// Ties are broken by lowest [`OperationId`]: at each branch the lowest child
/// among equally long suffixes is followed, and among equally long paths the
/// one starting at the lowest source wins. A non-empty graph always produces
/// a non-empty path, even if every latency is zero. An empty graph produces
/// an empty path of length 0.
///
/// `topo_order` must be a topological order of `index` and `latencies` is
/// indexed by graph position.
pub fn find_critical_path(index: &GraphIndex, latencies: &[i64], topo_order: &[usize]) -> CriticalPath {
    let n = index.len();
    let mut suffix: Vec<i64> = vec![0; n];
    let mut next: Vec<Option<usize>> = vec![None; n];

    for &pos in topo_order.iter().rev() {
        let mut best: Option<usize> = None;
        for &child in index.children(pos) {
            // Children are in ascending position order, so strict `>` keeps the lowest id.
            if best.map_or(true, |b| suffix[child] > suffix[b]) {
                best = Some(child);
            }
        }
        suffix[pos] = latencies[pos] + best.map_or(0, |b| suffix[b]);
        next[pos] = best;
    }

    let mut start: Option<usize> = None;
    for source in index.sources() {
        if start.map_or(true, |s| suffix[source] > suffix[s]) {
            start = Some(source);
        }
    }

    let Some(start) = start else {
        return CriticalPath::default();
    };

    let mut path = Vec::new();
    let mut cursor = Some(start);
    while let Some(pos) = cursor {
        path.push(index.id(pos));
        cursor = next[pos];
    }

    CriticalPath {
        path,
        length: suffix[start],
    }
}
