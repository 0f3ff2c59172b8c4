use serde::{Deserialize, Serialize};

use crate::timeline::GridBounds;

pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 2.0;

/// A position on the drawing surface, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn translate(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl std::ops::Sub for ScreenPoint {
    type Output = ScreenPoint;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Pixel dimensions of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl CanvasSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// World-to-screen mapping for one render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTransform {
    pub min_x: f32,
    pub min_y: f32,
    pub final_scale: f32,
    pub offset: ScreenPoint,
}

impl ScreenTransform {
    pub fn to_screen(&self, x: f32, y: f32) -> ScreenPoint {
        ScreenPoint::new(
            (x - self.min_x) * self.final_scale + self.offset.x,
            (y - self.min_y) * self.final_scale + self.offset.y,
        )
    }

    pub fn to_world(&self, point: ScreenPoint) -> Option<(f32, f32)> {
        if self.final_scale == 0.0 || !self.final_scale.is_finite() {
            return None;
        }
        Some((
            (point.x - self.offset.x) / self.final_scale + self.min_x,
            (point.y - self.offset.y) / self.final_scale + self.min_y,
        ))
    }

    /// Converts a world distance to pixels.
    pub fn length(&self, world: f32) -> f32 {
        world * self.final_scale
    }
}

/// User zoom and pan state. Independent of the frame content.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    scale: f32,
    offset: ScreenPoint,
    drag_start: Option<ScreenPoint>,
}

impl Viewport {
    pub fn new() -> Self {
        Self {
            scale: 1.0,
            offset: ScreenPoint::default(),
            drag_start: None,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn offset(&self) -> ScreenPoint {
        self.offset
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_start.is_some()
    }

    /// Sets the zoom multiplier, clamped to `[0.1, 2.0]` at one decimal.
    pub fn set_scale(&mut self, scale: f32) {
        if !scale.is_finite() {
            return;
        }
        let rounded = (scale.clamp(MIN_SCALE, MAX_SCALE) * 10.0).round() / 10.0;
        self.scale = rounded;
    }

    pub fn pointer_down(&mut self, position: ScreenPoint) {
        self.drag_start = Some(position - self.offset);
    }

    /// Returns true when the move panned the view.
    pub fn pointer_move(&mut self, position: ScreenPoint) -> bool {
        match self.drag_start {
            Some(start) => {
                self.offset = position - start;
                true
            }
            None => false,
        }
    }

    pub fn pointer_up(&mut self) {
        self.drag_start = None;
    }

    /// Leaving the surface ends a drag like releasing the button does.
    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    pub fn reset_pan(&mut self) {
        self.offset = ScreenPoint::default();
        self.drag_start = None;
    }

    /// Fits `bounds` into `canvas` preserving aspect ratio, then applies zoom
    /// and pan.
    pub fn transform(&self, canvas: CanvasSize, bounds: &GridBounds) -> ScreenTransform {
        let span = |value: f32| if value > 0.0 && value.is_finite() { value } else { 1.0 };
        let scale_x = canvas.width / span(bounds.width());
        let scale_y = canvas.height / span(bounds.height());
        ScreenTransform {
            min_x: bounds.min_x,
            min_y: bounds.min_y,
            final_scale: scale_x.min(scale_y) * self.scale,
            offset: self.offset,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}
