//! Playback and rendering core for recorded traffic-radar sessions.
//!
//! A session of irregular radar readings is resampled onto a uniform frame
//! grid, joined with the externally computed queue-boundary feed, and
//! replayed through a pannable, zoomable scene painted onto any
//! [`render::DrawSurface`].

pub mod engine;
pub mod math;
pub mod prelude;
pub mod render;
pub mod session;
pub mod telemetry;
pub mod timeline;
pub mod view;

pub use engine::ReplayEngine;
pub use prelude::{ReplayConfig, ReplayError, ReplayResult};
