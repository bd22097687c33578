//! Scheduling pipeline: critical path, bounds, slack, list schedule.

use crate::bounds::{compute_bounds, Bounds};
use crate::config::SchedulerConfig;
use crate::critical_path::{find_critical_path, CriticalPath};
use crate::error::SchedulerError;
use crate::log_changes;
use crate::models::ScheduleReport;
use crate::problem::SchedulingProblem;
use crate::slack::{compute_slack, Slack};

use super::list::{ListSchedule, ListScheduler};

/// Runs every scheduling phase over one validated problem.
///
/// The problem is never mutated, so one scheduler can be run any number of
/// times and separate schedulers can run concurrently.
pub struct OperationScheduler {
    problem: SchedulingProblem,
    config: SchedulerConfig,
}

impl OperationScheduler {
    pub fn new(problem: SchedulingProblem, config: SchedulerConfig) -> Self {
        Self { problem, config }
    }

    pub fn problem(&self) -> &SchedulingProblem {
        &self.problem
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Longest latency-weighted path through the graph.
    pub fn critical_path(&self) -> CriticalPath {
        let critical_path = find_critical_path(
            self.problem.index(),
            self.problem.latencies(),
            self.problem.topological_order(),
        );
        log_changes!(
            self.config.verbosity,
            "Critical path: {:?} (length {})",
            critical_path.path,
            critical_path.length
        );
        critical_path
    }

    /// ASAP and ALAP schedules against the given critical path length.
    pub fn bounds(&self, critical_path_length: i64) -> Result<Bounds, SchedulerError> {
        compute_bounds(
            &self.problem,
            critical_path_length,
            self.config.parallel_bounds,
            self.config.verbosity,
        )
    }

    /// Resource-constrained schedule prioritised by `slack`.
    pub fn list_schedule(&self, slack: &Slack) -> Result<ListSchedule, SchedulerError> {
        let scheduler = ListScheduler::new(&self.problem, slack, self.config.verbosity);
        match self.config.max_ticks {
            Some(limit) => scheduler.with_max_ticks(limit).run(),
            None => scheduler.run(),
        }
    }

    /// Run the whole pipeline.
    pub fn run(&self) -> Result<ScheduleReport, SchedulerError> {
        let critical_path = self.critical_path();
        let bounds = self.bounds(critical_path.length)?;
        let slack = compute_slack(&bounds.asap, &bounds.alap);
        let schedule = self.list_schedule(&slack)?;

        let critical_path_makespan = schedule.critical_path_makespan(&critical_path);
        if let Some(cp_makespan) = critical_path_makespan {
            if cp_makespan < schedule.makespan {
                log_changes!(
                    self.config.verbosity,
                    "Resource contention extends makespan from t={} to t={}",
                    cp_makespan,
                    schedule.makespan
                );
            }
        }

        Ok(ScheduleReport {
            critical_path: critical_path.path,
            critical_path_length: critical_path.length,
            asap: bounds.asap,
            alap: bounds.alap,
            slack,
            list_schedule: schedule.entries,
            makespan: schedule.makespan,
            critical_path_makespan,
        })
    }
}
