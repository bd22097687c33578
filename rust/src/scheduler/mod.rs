//! Scheduler module for resource-constrained list scheduling.
//!
//! This module provides the list-scheduling simulation and the pipeline that
//! feeds it critical path, ASAP/ALAP bounds and slack.

mod list;
mod pipeline;
mod resource_pool;
mod state;

pub use list::{ListSchedule, ListScheduler};
pub use pipeline::OperationScheduler;
pub use resource_pool::ResourcePool;
pub use state::OperationState;
