use replaycore::session::BoundaryRecord;
use serde::Serialize;
use std::sync::{PoisonError, RwLock};

/// Boundary records currently offered by the feed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FeedSnapshot {
    pub revision: u64,
    pub boundaries: Vec<BoundaryRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedStatus {
    pub revision: u64,
    pub records: usize,
    pub lanes: usize,
}

#[derive(Debug, Default)]
pub struct FeedState {
    inner: RwLock<FeedSnapshot>,
}

impl FeedState {
    pub fn new(boundaries: Vec<BoundaryRecord>) -> Self {
        Self {
            inner: RwLock::new(FeedSnapshot {
                revision: 1,
                boundaries,
            }),
        }
    }

    /// Replaces the offered records and returns the new revision.
    pub fn publish(&self, boundaries: Vec<BoundaryRecord>) -> u64 {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        guard.revision += 1;
        guard.boundaries = boundaries;
        log::info!(
            "boundary feed revision {} with {} records",
            guard.revision,
            guard.boundaries.len()
        );
        guard.revision
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn status(&self) -> FeedStatus {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        FeedStatus {
            revision: guard.revision,
            records: guard.boundaries.len(),
            lanes: guard
                .boundaries
                .iter()
                .map(|record| record.lanes.len())
                .max()
                .unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use replaycore::session::Timestamp;

    #[test]
    fn publish_bumps_revision() {
        let state = FeedState::new(Vec::new());
        assert_eq!(state.status().revision, 1);
        let revision = state.publish(vec![BoundaryRecord::new(Timestamp::from_millis(0), Vec::new())]);
        assert_eq!(revision, 2);
        assert_eq!(state.snapshot().boundaries.len(), 1);
        assert_eq!(state.status().records, 1);
    }
}
