use anyhow::Context;
use replaycore::view::CanvasSize;
use replaycore::ReplayConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use crate::generator::profile::GeneratorConfig;

/// Pixel size of the headless drawing surface.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl CanvasConfig {
    pub fn size(&self) -> CanvasSize {
        CanvasSize::new(self.width, self.height)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub replay: ReplayConfig,
    pub canvas: CanvasConfig,
    pub generator: GeneratorConfig,
    /// Address the boundary feed listens on.
    pub feed_address: SocketAddr,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            replay: ReplayConfig::default(),
            canvas: CanvasConfig::default(),
            generator: GeneratorConfig::default(),
            feed_address: SocketAddr::from(([127, 0, 0, 1], 9000)),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use replaycore::prelude::BoundsMode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"replay:\n  step_ms: 250\ncanvas:\n  width: 1024\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.replay.step_ms, 250);
        assert_eq!(cfg.replay.cadence_ms, 100);
        assert_eq!(cfg.canvas.width, 1024.0);
        assert_eq!(cfg.canvas.height, 600.0);
        assert_eq!(cfg.feed_address.port(), 9000);
    }

    #[test]
    fn bounds_mode_and_layers_are_configurable() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"replay:\n  bounds_mode:\n    kind: lane_locked\n    min_y: -10\n    max_y: 10\n  scene:\n    layers:\n      sub_grid: true\n      labels: false\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(
            cfg.replay.bounds_mode,
            BoundsMode::LaneLocked {
                min_y: -10.0,
                max_y: 10.0
            }
        );
        assert!(cfg.replay.scene.layers.sub_grid);
        assert!(!cfg.replay.scene.layers.labels);
        assert!(cfg.replay.scene.layers.grid);
    }

    #[test]
    fn unreadable_config_reports_path() {
        let err = WorkflowConfig::load("/nonexistent/replay.yaml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/replay.yaml"));
    }
}
