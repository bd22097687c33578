//! Per-operation simulation state for list scheduling.

use crate::models::ScheduleEntry;

/// Progress of one operation through the list-scheduling simulation.
///
/// Each field stays `None` until the matching event happens and is never
/// changed afterwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OperationState {
    /// Tick at which every parent had finished.
    pub ready: Option<i64>,
    /// Tick at which the operation was dispatched to a resource.
    pub start: Option<i64>,
    /// Last tick the operation held its resource.
    pub finish: Option<i64>,
}

impl OperationState {
    /// Ready but not yet dispatched.
    #[inline]
    pub fn is_waiting(&self) -> bool {
        self.ready.is_some() && self.start.is_none()
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finish.is_some()
    }

    /// Tick at which a dispatched operation will finish.
    #[inline]
    pub fn due(&self, latency: i64) -> Option<i64> {
        self.start.map(|start| start + latency - 1)
    }

    /// Completed entry, once all three events have happened.
    pub fn entry(&self) -> Option<ScheduleEntry> {
        Some(ScheduleEntry {
            ready: self.ready?,
            start: self.start?,
            finish: self.finish?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut state = OperationState::default();
        assert!(!state.is_waiting());
        assert_eq!(state.due(3), None);
        assert_eq!(state.entry(), None);

        state.ready = Some(2);
        assert!(state.is_waiting());

        state.start = Some(4);
        assert!(!state.is_waiting());
        assert_eq!(state.due(3), Some(6));

        state.finish = Some(6);
        assert!(state.is_finished());
        assert_eq!(state.entry(), Some(ScheduleEntry::new(2, 4, 6)));
    }
}
