use crate::session::{BoundaryRecord, Timestamp};
use crate::telemetry::log::LogManager;
use crate::timeline::frame::TimeFrame;

/// Joins frames with the queue-boundary record in force at their tick.
pub struct BoundarySynchronizer {
    logger: LogManager,
}

impl BoundarySynchronizer {
    pub fn new() -> Self {
        Self {
            logger: LogManager::new("boundary-sync"),
        }
    }

    /// Returns the frames with `boundary` filled from `boundaries`, which may
    /// arrive in any order.
    pub fn synchronize(
        &self,
        frames: Vec<TimeFrame>,
        boundaries: &[BoundaryRecord],
    ) -> Vec<TimeFrame> {
        let mut sorted: Vec<&BoundaryRecord> = boundaries.iter().collect();
        sorted.sort_by_key(|record| record.time);
        let times: Vec<Timestamp> = sorted.iter().map(|record| record.time).collect();

        let mut joined = 0usize;
        let frames: Vec<TimeFrame> = frames
            .into_iter()
            .map(|frame| {
                let boundary = select_boundary(&times, frame.time).map(|i| sorted[i].clone());
                joined += usize::from(boundary.is_some());
                TimeFrame { boundary, ..frame }
            })
            .collect();

        self.logger.record(&format!(
            "attached boundaries to {}/{} frames from {} records",
            joined,
            frames.len(),
            sorted.len()
        ));
        frames
    }
}

impl Default for BoundarySynchronizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Index into ascending `times` of the boundary effective at `tick`: the
/// first record at or after the tick, or the last record when every record
/// precedes it.
pub fn select_boundary(times: &[Timestamp], tick: Timestamp) -> Option<usize> {
    let last = times.len().checked_sub(1)?;
    let at_or_after = times.partition_point(|time| *time < tick);
    Some(if at_or_after > last { last } else { at_or_after })
}
