use serde::Serialize;

use crate::math::Extent;
use crate::prelude::BoundsMode;
use crate::telemetry::log::LogManager;
use crate::timeline::frame::TimeFrame;

/// World-space rectangle the viewport fits to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl GridBounds {
    pub const DEFAULT_HALF_SPAN: f32 = 100.0;

    pub fn new(min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Bounds used when no finite point is available.
    pub fn fallback(mode: BoundsMode) -> Self {
        let span = Self::DEFAULT_HALF_SPAN;
        match mode {
            BoundsMode::Symmetric => Self::new(-span, span, -span, span),
            BoundsMode::LaneLocked { min_y, max_y } => Self::new(-span, span, min_y, max_y),
        }
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn is_finite(&self) -> bool {
        [self.min_x, self.max_x, self.min_y, self.max_y]
            .iter()
            .all(|value| value.is_finite())
    }
}

impl Default for GridBounds {
    fn default() -> Self {
        Self::fallback(BoundsMode::Symmetric)
    }
}

/// Derives padded grid bounds from every plotted point of a frame sequence.
pub struct BoundsCalculator {
    padding: f32,
    mode: BoundsMode,
    logger: LogManager,
}

impl BoundsCalculator {
    pub fn new(padding: f32, mode: BoundsMode) -> Self {
        let padding = if padding.is_finite() { padding.max(0.0) } else { 0.0 };
        Self {
            padding,
            mode,
            logger: LogManager::new("bounds"),
        }
    }

    pub fn compute(&self, frames: &[TimeFrame]) -> GridBounds {
        let mut xs = Extent::empty();
        let mut ys = Extent::empty();
        for point in frames.iter().flat_map(|frame| &frame.points) {
            if point.is_finite() {
                xs.include(point.x);
                ys.include(point.y);
            }
        }

        let x_range = xs.padded(self.padding);
        let y_range = match self.mode {
            BoundsMode::Symmetric => ys.padded(self.padding),
            BoundsMode::LaneLocked { min_y, max_y } => {
                ys.range().map(|_| (min_y, max_y))
            }
        };

        let bounds = match (x_range, y_range) {
            (Some((min_x, max_x)), Some((min_y, max_y))) => {
                GridBounds::new(min_x, max_x, min_y, max_y)
            }
            _ => {
                self.logger
                    .record("no finite points; using default grid bounds");
                GridBounds::fallback(self.mode)
            }
        };
        // Guards against overflow to infinity for extreme coordinates.
        if bounds.is_finite() {
            bounds
        } else {
            self.logger.warn("grid bounds overflowed; using defaults");
            GridBounds::fallback(self.mode)
        }
    }
}
