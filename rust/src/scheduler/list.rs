//! Resource-constrained list scheduling.
//!
//! A discrete-time simulation. Each tick runs four steps in order:
//! 1. mark operations whose parents have all finished as ready,
//! 2. dispatch ready operations to free resources, least slack first,
//! 3. mark operations whose last busy tick is now as finished and free their
//!    resource (visible to dispatch from the next tick on),
//! 4. drop finished operations from the active set.

use std::collections::BTreeMap;

use crate::critical_path::CriticalPath;
use crate::error::SchedulerError;
use crate::graph::OperationId;
use crate::models::ScheduleEntry;
use crate::problem::SchedulingProblem;
use crate::slack::Slack;
use crate::{log_changes, log_checks, log_debug};

use super::resource_pool::ResourcePool;
use super::state::OperationState;

/// Result of list scheduling.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListSchedule {
    pub entries: BTreeMap<OperationId, ScheduleEntry>,
    /// One past the latest finish tick (0 when there are no operations).
    pub makespan: i64,
}

impl ListSchedule {
    /// One past the finish tick of the critical path's last operation.
    ///
    /// This equals `makespan` only when contention never delays the critical
    /// path relative to the rest of the graph.
    pub fn critical_path_makespan(&self, critical_path: &CriticalPath) -> Option<i64> {
        let sink = critical_path.sink()?;
        self.entries.get(&sink).map(|e| e.finish + 1)
    }
}

/// Greedy list scheduler using slack as dispatch priority.
pub struct ListScheduler<'a> {
    problem: &'a SchedulingProblem,
    slack: &'a Slack,
    verbosity: u8,
    max_ticks: u64,
}

impl<'a> ListScheduler<'a> {
    /// Create a scheduler with the default tick cap.
    pub fn new(problem: &'a SchedulingProblem, slack: &'a Slack, verbosity: u8) -> Self {
        Self {
            problem,
            slack,
            verbosity,
            max_ticks: Self::default_tick_limit(problem),
        }
    }

    /// Override the tick cap.
    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    /// Tick cap no valid problem can reach.
    ///
    /// While work remains, every tick has at least one operation holding a
    /// resource, so the simulation ends within the sum of all latencies.
    pub fn default_tick_limit(problem: &SchedulingProblem) -> u64 {
        let total: i64 = problem.latencies().iter().sum();
        total.unsigned_abs() + problem.len() as u64 + 1
    }

    /// Run the simulation to completion.
    pub fn run(&self) -> Result<ListSchedule, SchedulerError> {
        let problem = self.problem;
        let index = problem.index();
        let n = problem.len();
        let verbosity = self.verbosity;

        let priority: Vec<i64> = index
            .ids()
            .iter()
            .map(|id| match self.slack.get(id) {
                Some(&s) => s,
                None => panic!("operation {id} has no slack"),
            })
            .collect();

        let mut ops: Vec<OperationState> = vec![OperationState::default(); n];
        let mut active: Vec<usize> = (0..n).collect();
        let mut pool = ResourcePool::new(problem.capacities());
        let mut time: i64 = 0;

        while !active.is_empty() {
            if time.unsigned_abs() >= self.max_ticks {
                return Err(SchedulerError::TickLimitExceeded {
                    limit: self.max_ticks,
                });
            }

            log_debug!(verbosity, "Tick {}: {} active", time, active.len());

            for &pos in &active {
                if ops[pos].ready.is_none()
                    && index.parents(pos).iter().all(|&p| ops[p].is_finished())
                {
                    ops[pos].ready = Some(time);
                    log_checks!(verbosity, "  Operation {} ready at {}", index.id(pos), time);
                }
            }

            self.dispatch(time, &active, &priority, &mut ops, &mut pool);

            for &pos in &active {
                if ops[pos].finish.is_none() && ops[pos].due(problem.latency(pos)) == Some(time) {
                    ops[pos].finish = Some(time);
                    pool.release(problem.op_type(pos));
                    log_changes!(verbosity, "  Operation {} finished at {}", index.id(pos), time);
                }
            }

            active.retain(|&pos| !ops[pos].is_finished());
            time += 1;
        }

        let entries: BTreeMap<OperationId, ScheduleEntry> = ops
            .iter()
            .enumerate()
            .filter_map(|(pos, state)| state.entry().map(|e| (index.id(pos), e)))
            .collect();
        let makespan = entries.values().map(|e| e.finish + 1).max().unwrap_or(0);

        log_changes!(verbosity, "List schedule: makespan t={}", makespan);

        Ok(ListSchedule { entries, makespan })
    }

    /// Dispatch every waiting operation that can get a resource this tick.
    ///
    /// Per type, candidates are taken in ascending (slack, id) order until the
    /// type runs out of free units. Types draw from separate pools, so the
    /// order in which types are visited does not affect the outcome.
    fn dispatch(
        &self,
        time: i64,
        active: &[usize],
        priority: &[i64],
        ops: &mut [OperationState],
        pool: &mut ResourcePool,
    ) {
        let problem = self.problem;
        let mut waiting: Vec<Vec<usize>> = vec![Vec::new(); problem.types().len()];
        for &pos in active {
            if ops[pos].is_waiting() {
                waiting[problem.op_type(pos) as usize].push(pos);
            }
        }

        for (op_type, mut candidates) in waiting.into_iter().enumerate() {
            if candidates.is_empty() {
                continue;
            }
            candidates.sort_unstable_by_key(|&pos| (priority[pos], pos));

            let op_type = op_type as u32;
            log_checks!(
                self.verbosity,
                "  {} waiting for {} ({} free)",
                candidates.len(),
                problem.types().resolve(op_type).unwrap_or_default(),
                pool.available(op_type)
            );

            for pos in candidates {
                if !pool.try_acquire(op_type) {
                    break;
                }
                ops[pos].start = Some(time);
                log_changes!(
                    self.verbosity,
                    "  Dispatched operation {} ({}) at {} with slack {}",
                    problem.index().id(pos),
                    problem.op_type_name(pos),
                    time,
                    priority[pos]
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::compute_bounds;
    use crate::critical_path::find_critical_path;
    use crate::graph::DependencyGraph;
    use crate::slack::compute_slack;
    use std::collections::HashMap;

    struct Fixture {
        problem: SchedulingProblem,
        critical_path: CriticalPath,
        slack: Slack,
    }

    fn fixture(
        nodes: &[(OperationId, &str)],
        edges: &[(OperationId, OperationId)],
        types: &[(&str, u32, u32)],
    ) -> Fixture {
        let graph = DependencyGraph::from_edges(nodes.iter().map(|&(id, _)| id), edges.iter().copied());
        let op_types: HashMap<OperationId, String> =
            nodes.iter().map(|&(id, t)| (id, t.to_string())).collect();
        let timing: HashMap<String, u32> = types.iter().map(|&(t, l, _)| (t.to_string(), l)).collect();
        let resources: HashMap<String, u32> =
            types.iter().map(|&(t, _, c)| (t.to_string(), c)).collect();
        let problem = SchedulingProblem::new(graph, &op_types, &timing, &resources).unwrap();

        let critical_path = find_critical_path(
            problem.index(),
            problem.latencies(),
            problem.topological_order(),
        );
        let bounds = compute_bounds(&problem, critical_path.length, false, 0).unwrap();
        let slack = compute_slack(&bounds.asap, &bounds.alap);
        Fixture {
            problem,
            critical_path,
            slack,
        }
    }

    fn entry(ready: i64, start: i64, finish: i64) -> ScheduleEntry {
        ScheduleEntry::new(ready, start, finish)
    }

    #[test]
    fn test_chain() {
        let f = fixture(
            &[(1, "A"), (2, "B"), (3, "C")],
            &[(1, 2), (2, 3)],
            &[("A", 2, 1), ("B", 3, 1), ("C", 4, 1)],
        );
        let schedule = ListScheduler::new(&f.problem, &f.slack, 0).run().unwrap();

        assert_eq!(schedule.entries[&1], entry(0, 0, 1));
        assert_eq!(schedule.entries[&2], entry(2, 2, 4));
        assert_eq!(schedule.entries[&3], entry(5, 5, 8));
        assert_eq!(schedule.makespan, 9);
        assert_eq!(schedule.critical_path_makespan(&f.critical_path), Some(9));
    }

    #[test]
    fn test_lower_slack_dispatched_first() {
        // 1 and 2 share one X unit. 2 feeds the long chain, so it has zero
        // slack and wins even though 1 has the lower id.
        let f = fixture(
            &[(1, "X"), (2, "X"), (3, "Y")],
            &[(2, 3)],
            &[("X", 1, 1), ("Y", 5, 1)],
        );
        assert_eq!(f.slack[&1], 5);
        assert_eq!(f.slack[&2], 0);

        let schedule = ListScheduler::new(&f.problem, &f.slack, 0).run().unwrap();

        assert_eq!(schedule.entries[&2], entry(0, 0, 0));
        assert_eq!(schedule.entries[&1], entry(0, 1, 1));
        assert_eq!(schedule.entries[&3], entry(1, 1, 5));
        assert_eq!(schedule.makespan, 6);
    }

    #[test]
    fn test_equal_slack_tie_breaks_on_lowest_id() {
        let f = fixture(&[(4, "X"), (9, "X")], &[], &[("X", 2, 1)]);
        let schedule = ListScheduler::new(&f.problem, &f.slack, 0).run().unwrap();

        assert_eq!(schedule.entries[&4], entry(0, 0, 1));
        assert_eq!(schedule.entries[&9], entry(0, 2, 3));
        assert_eq!(schedule.makespan, 4);
    }

    #[test]
    fn test_capacity_freed_visible_next_tick() {
        // Both latency-1 ops on one unit: the second cannot reuse the unit
        // freed in tick 0 until tick 1.
        let f = fixture(&[(1, "X"), (2, "X")], &[], &[("X", 1, 1)]);
        let schedule = ListScheduler::new(&f.problem, &f.slack, 0).run().unwrap();

        assert_eq!(schedule.entries[&1], entry(0, 0, 0));
        assert_eq!(schedule.entries[&2], entry(0, 1, 1));
    }

    #[test]
    fn test_parallel_units() {
        let f = fixture(
            &[(1, "X"), (2, "X"), (3, "X"), (4, "Y")],
            &[(1, 4), (2, 4), (3, 4)],
            &[("X", 2, 2), ("Y", 1, 1)],
        );
        let schedule = ListScheduler::new(&f.problem, &f.slack, 0).run().unwrap();

        assert_eq!(schedule.entries[&1].start, 0);
        assert_eq!(schedule.entries[&2].start, 0);
        assert_eq!(schedule.entries[&3].start, 2);
        assert_eq!(schedule.entries[&4], entry(4, 4, 4));
        assert_eq!(schedule.makespan, 5);
    }

    #[test]
    fn test_contention_delays_past_critical_path() {
        // Critical path is 1 -> 2 (length 4) but three X ops share one unit.
        let f = fixture(
            &[(1, "X"), (2, "Y"), (3, "X"), (4, "X")],
            &[(1, 2)],
            &[("X", 2, 1), ("Y", 2, 1)],
        );
        let schedule = ListScheduler::new(&f.problem, &f.slack, 0).run().unwrap();

        assert_eq!(f.critical_path.path, vec![1, 2]);
        assert_eq!(schedule.critical_path_makespan(&f.critical_path), Some(4));
        assert_eq!(schedule.makespan, 6);
    }

    #[test]
    fn test_finish_invariant() {
        let f = fixture(
            &[(1, "A"), (2, "B"), (3, "A"), (4, "B"), (5, "A")],
            &[(1, 2), (1, 3), (2, 5), (3, 4), (4, 5)],
            &[("A", 2, 1), ("B", 3, 1)],
        );
        let schedule = ListScheduler::new(&f.problem, &f.slack, 0).run().unwrap();

        for (pos, &id) in f.problem.index().ids().iter().enumerate() {
            let e = schedule.entries[&id];
            assert_eq!(e.finish, e.start + f.problem.latency(pos) - 1);
            assert!(e.ready <= e.start);
            for &parent in f.problem.index().parents(pos) {
                let p = schedule.entries[&f.problem.index().id(parent)];
                assert!(p.finish < e.ready);
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let f = fixture(
            &[(1, "A"), (2, "A"), (3, "A"), (4, "B"), (5, "B")],
            &[(1, 4), (2, 4), (3, 5)],
            &[("A", 1, 1), ("B", 2, 1)],
        );
        let first = ListScheduler::new(&f.problem, &f.slack, 0).run().unwrap();
        for _ in 0..5 {
            assert_eq!(ListScheduler::new(&f.problem, &f.slack, 0).run().unwrap(), first);
        }
    }

    #[test]
    fn test_tick_limit() {
        let f = fixture(&[(1, "A")], &[], &[("A", 10, 1)]);
        let err = ListScheduler::new(&f.problem, &f.slack, 0)
            .with_max_ticks(3)
            .run()
            .unwrap_err();

        assert_eq!(err, SchedulerError::TickLimitExceeded { limit: 3 });
    }

    #[test]
    fn test_empty_problem() {
        let f = fixture(&[], &[], &[]);
        let schedule = ListScheduler::new(&f.problem, &f.slack, 0).run().unwrap();

        assert!(schedule.entries.is_empty());
        assert_eq!(schedule.makespan, 0);
        assert_eq!(schedule.critical_path_makespan(&f.critical_path), None);
    }
}
