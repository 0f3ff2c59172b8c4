//! Scene drawing: styles, the abstract drawing surface and the renderer.

pub mod scene;
pub mod style;
pub mod surface;

pub use scene::{DrawStep, RenderSummary, SceneInput, SceneRenderer};
pub use style::{Rgba, StrokeStyle, TextAlign, TextStyle};
pub use surface::{CommandKind, DrawCommand, DrawSurface, RecordingSurface};
