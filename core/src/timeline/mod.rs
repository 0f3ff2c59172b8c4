//! Temporal pipeline: resampling, boundary joins and spatial bounds.

pub mod bounds;
pub mod frame;
pub mod resample;
pub mod sync;

pub use bounds::{BoundsCalculator, GridBounds};
pub use frame::{PlotPoint, TimeFrame};
pub use resample::Resampler;
pub use sync::BoundarySynchronizer;

use crate::prelude::ReplayConfig;
use crate::session::{BoundaryRecord, Session};

/// Frame sequence of a session together with its derived grid bounds.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    pub frames: Vec<TimeFrame>,
    pub bounds: GridBounds,
}

impl Timeline {
    /// Runs the full pipeline. Cheap enough at session scale to be repeated
    /// whenever the session or the boundary feed changes.
    pub fn build(session: &Session, boundaries: &[BoundaryRecord], config: &ReplayConfig) -> Self {
        let frames = Resampler::new(config.step_ms)
            .with_max_frames(config.max_frames)
            .resample(&session.objects);
        let frames = BoundarySynchronizer::new().synchronize(frames, boundaries);
        let bounds = BoundsCalculator::new(config.padding, config.bounds_mode).compute(&frames);
        Self { frames, bounds }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame(&self, index: usize) -> Option<&TimeFrame> {
        self.frames.get(index)
    }
}
