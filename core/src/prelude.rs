use serde::{Deserialize, Serialize};

use crate::session::SessionError;

/// Default resampling step and playback cadence, in milliseconds.
pub const DEFAULT_STEP_MS: i64 = 100;
pub const DEFAULT_CADENCE_MS: u64 = 100;
/// Upper bound on resampled frames; ten hours at the default step.
pub const DEFAULT_MAX_FRAMES: usize = 360_000;
/// World units added on every side of the data extent.
pub const DEFAULT_PADDING: f32 = 50.0;
/// Vehicle footprint used when the radar did not report one.
pub const DEFAULT_OBJECT_LENGTH: f32 = 4.5;
pub const DEFAULT_OBJECT_WIDTH: f32 = 2.0;

/// How the Y extent of the grid bounds is derived.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoundsMode {
    /// Both X and Y extents come from the data.
    #[default]
    Symmetric,
    /// X comes from the data, Y is pinned to the known lane corridor.
    LaneLocked { min_y: f32, max_y: f32 },
}

impl BoundsMode {
    pub fn lane_locked() -> Self {
        BoundsMode::LaneLocked {
            min_y: -15.0,
            max_y: 15.0,
        }
    }
}

/// Optional overlay layers of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerFlags {
    pub grid: bool,
    pub sub_grid: bool,
    pub road: bool,
    pub boundaries: bool,
    pub trajectories: bool,
    pub labels: bool,
}

impl Default for LayerFlags {
    fn default() -> Self {
        Self {
            grid: true,
            sub_grid: false,
            road: true,
            boundaries: true,
            trajectories: true,
            labels: true,
        }
    }
}

/// World-space anchors for the static decorations of the road scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub layers: LayerFlags,
    pub cross_road_x: f32,
    pub cross_road_width: f32,
    pub traffic_light: (f32, f32),
    pub ruler_origin: (f32, f32),
    pub ruler_length: f32,
    /// Lane width assumed when a lane carries no width of its own.
    pub lane_width: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            layers: LayerFlags::default(),
            cross_road_x: 0.0,
            cross_road_width: 12.0,
            traffic_light: (-4.0, -12.0),
            ruler_origin: (-90.0, -90.0),
            ruler_length: 20.0,
            lane_width: 3.5,
        }
    }
}

/// Shared configuration of the replay pipeline and scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    pub step_ms: i64,
    pub max_frames: usize,
    pub cadence_ms: u64,
    pub padding: f32,
    pub bounds_mode: BoundsMode,
    pub default_length: f32,
    pub default_width: f32,
    pub scene: SceneConfig,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            step_ms: DEFAULT_STEP_MS,
            max_frames: DEFAULT_MAX_FRAMES,
            cadence_ms: DEFAULT_CADENCE_MS,
            padding: DEFAULT_PADDING,
            bounds_mode: BoundsMode::Symmetric,
            default_length: DEFAULT_OBJECT_LENGTH,
            default_width: DEFAULT_OBJECT_WIDTH,
            scene: SceneConfig::default(),
        }
    }
}

/// Failure of a single drawing step or of the drawing surface itself.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),
    #[error("non-finite coordinate in {0}")]
    NonFinite(&'static str),
    #[error("draw call rejected: {0}")]
    Rejected(String),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Common error type for the replay engine.
#[derive(thiserror::Error, Debug)]
pub enum ReplayError {
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("session: {0}")]
    Session(#[from] SessionError),
}

pub type ReplayResult<T> = Result<T, ReplayError>;
