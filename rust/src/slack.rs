//! Per-operation scheduling freedom.

use std::collections::BTreeMap;

use crate::bounds::StartTimes;
use crate::graph::OperationId;

/// Slack per operation: `alap - asap`.
pub type Slack = BTreeMap<OperationId, i64>;

/// Compute `alap(v) - asap(v)` for every operation.
///
/// # Panics
/// If the two schedules do not cover the same operations. Both come from the
/// same validated problem, so a mismatch is a bug in the caller.
pub fn compute_slack(asap: &StartTimes, alap: &StartTimes) -> Slack {
    assert_eq!(
        asap.len(),
        alap.len(),
        "ASAP and ALAP schedules cover different operations"
    );

    asap.iter()
        .map(|(&id, &early)| {
            let Some(&late) = alap.get(&id) else {
                panic!("operation {id} has an ASAP start but no ALAP start");
            };
            (id, late - early)
        })
        .collect()
}
