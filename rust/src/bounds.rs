//! ASAP and ALAP bound propagation.
//!
//! Both schedules ignore resource limits. They are computed by wavefront
//! passes over the set of still-unscheduled vertices: in each pass, any vertex
//! whose required neighbours (parents for ASAP, children for ALAP) are all
//! scheduled gets its start time. Every pass must schedule at least one
//! vertex, so at most V passes run; a pass that makes no progress means the
//! remaining vertices sit on a cycle.

use std::collections::BTreeMap;

use crate::error::SchedulerError;
use crate::graph::{GraphIndex, OperationId};
use crate::problem::SchedulingProblem;
use crate::{log_changes, log_debug};

/// Start time per operation.
pub type StartTimes = BTreeMap<OperationId, i64>;

/// ASAP and ALAP start times over the same vertex set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bounds {
    pub asap: StartTimes,
    pub alap: StartTimes,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    /// Walk from sources along edges (ASAP).
    Forward,
    /// Walk from sinks against edges (ALAP).
    Backward,
}

impl Direction {
    fn label(self) -> &'static str {
        match self {
            Direction::Forward => "ASAP",
            Direction::Backward => "ALAP",
        }
    }

    /// Vertices that must be scheduled before `pos` in this direction.
    fn required<'a>(self, index: &'a GraphIndex, pos: usize) -> &'a [usize] {
        match self {
            Direction::Forward => index.parents(pos),
            Direction::Backward => index.children(pos),
        }
    }
}

/// Shared wavefront loop. `seed` gives the start of a vertex with no required
/// neighbours; `combine` derives a start from the (fully known) neighbours.
fn wavefront(
    index: &GraphIndex,
    direction: Direction,
    verbosity: u8,
    seed: impl Fn(usize) -> i64,
    combine: impl Fn(usize, &[Option<i64>]) -> i64,
) -> Result<StartTimes, SchedulerError> {
    let n = index.len();
    let mut start: Vec<Option<i64>> = vec![None; n];
    let mut remaining: Vec<usize> = Vec::with_capacity(n);

    for pos in 0..n {
        if direction.required(index, pos).is_empty() {
            start[pos] = Some(seed(pos));
        } else {
            remaining.push(pos);
        }
    }

    let mut pass = 0usize;
    while !remaining.is_empty() {
        pass += 1;
        let before = remaining.len();

        remaining.retain(|&pos| {
            let ready = direction
                .required(index, pos)
                .iter()
                .all(|&other| start[other].is_some());
            if ready {
                let value = combine(pos, start.as_slice());
                start[pos] = Some(value);
            }
            !ready
        });

        log_debug!(
            verbosity,
            "  {} pass {}: scheduled {}, {} remaining",
            direction.label(),
            pass,
            before - remaining.len(),
            remaining.len()
        );

        if remaining.len() == before {
            return Err(SchedulerError::CyclicGraph {
                unresolved: remaining.iter().map(|&pos| index.id(pos)).collect(),
            });
        }
    }

    Ok(start
        .into_iter()
        .enumerate()
        .filter_map(|(pos, s)| s.map(|s| (index.id(pos), s)))
        .collect())
}

/// Earliest start of every operation.
///
/// Sources start at 0; any other operation starts at the latest finish among
/// its parents (`start(p) + latency(p)`).
pub fn asap(index: &GraphIndex, latencies: &[i64], verbosity: u8) -> Result<StartTimes, SchedulerError> {
    wavefront(
        index,
        Direction::Forward,
        verbosity,
        |_| 0,
        |pos, start| {
            index
                .parents(pos)
                .iter()
                .filter_map(|&p| start[p].map(|s| s + latencies[p]))
                .max()
                .unwrap_or(0)
        },
    )
}

/// Latest start of every operation that still meets `critical_path_length`.
///
/// Sinks start at `critical_path_length - latency`; any other operation
/// starts at the earliest child start minus its own latency.
pub fn alap(
    index: &GraphIndex,
    latencies: &[i64],
    critical_path_length: i64,
    verbosity: u8,
) -> Result<StartTimes, SchedulerError> {
    wavefront(
        index,
        Direction::Backward,
        verbosity,
        |pos| critical_path_length - latencies[pos],
        |pos, start| {
            let earliest_child = index
                .children(pos)
                .iter()
                .filter_map(|&c| start[c])
                .min()
                .unwrap_or(critical_path_length);
            earliest_child - latencies[pos]
        },
    )
}

/// Compute ASAP and ALAP for a validated problem.
///
/// With `parallel` set the two passes run as a `rayon::join` fork and both
/// finish before this returns; the ASAP error is reported first if both fail.
pub fn compute_bounds(
    problem: &SchedulingProblem,
    critical_path_length: i64,
    parallel: bool,
    verbosity: u8,
) -> Result<Bounds, SchedulerError> {
    let index = problem.index();
    let latencies = problem.latencies();

    let (asap_result, alap_result) = if parallel {
        rayon::join(
            || asap(index, latencies, verbosity),
            || alap(index, latencies, critical_path_length, verbosity),
        )
    } else {
        (
            asap(index, latencies, verbosity),
            alap(index, latencies, critical_path_length, verbosity),
        )
    };

    let bounds = Bounds {
        asap: asap_result?,
        alap: alap_result?,
    };

    log_changes!(
        verbosity,
        "Bounds: {} operations, horizon t={}",
        bounds.asap.len(),
        critical_path_length
    );

    Ok(bounds)
}
