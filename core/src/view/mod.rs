//! Interactive state: the pan/zoom viewport and the playback clock.

pub mod playback;
pub mod viewport;

pub use playback::{PlaybackController, PlaybackState, TickOutcome};
pub use viewport::{CanvasSize, ScreenPoint, ScreenTransform, Viewport};
