use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use replaycore::render::RecordingSurface;
use replaycore::session::{BoundaryRecord, Session};
use replaycore::telemetry::Metrics;
use replaycore::timeline::GridBounds;
use replaycore::ReplayEngine;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Outcome of rendering one frame headlessly.
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    pub index: usize,
    pub time: String,
    pub draw_calls: usize,
    pub glyphs: usize,
    pub trajectories: usize,
    pub queue_bands: usize,
    pub failed_steps: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowResult {
    pub readings: usize,
    pub samples: usize,
    pub vehicles: usize,
    pub frames: usize,
    pub joined_frames: usize,
    pub boundary_records: usize,
    pub max_skew_ms: i64,
    pub bounds: [f32; 4],
    pub frame: Option<FrameReport>,
    pub frames_built: usize,
    pub draw_failures: usize,
}

impl fmt::Display for WorkflowResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "readings {} (samples {}, vehicles {}) -> frames {}, joined {}/{} with {} boundary records",
            self.readings,
            self.samples,
            self.vehicles,
            self.frames,
            self.joined_frames,
            self.frames,
            self.boundary_records
        )?;
        write!(
            f,
            "bounds x [{}, {}] y [{}, {}], max resample skew {}ms",
            self.bounds[0], self.bounds[1], self.bounds[2], self.bounds[3], self.max_skew_ms
        )?;
        if let Some(frame) = &self.frame {
            write!(
                f,
                "\nframe {} @ {}: {} draw calls, {} vehicles, {} trails, {} queue bands",
                frame.index,
                frame.time,
                frame.draw_calls,
                frame.glyphs,
                frame.trajectories,
                frame.queue_bands
            )?;
            if !frame.failed_steps.is_empty() {
                write!(f, ", failed steps {:?}", frame.failed_steps)?;
            }
        }
        Ok(())
    }
}

/// Runs the replay pipeline without a window.
#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn execute(
        &self,
        session: Session,
        boundaries: Vec<BoundaryRecord>,
        render_frame: Option<usize>,
    ) -> anyhow::Result<WorkflowResult> {
        let readings = session.objects.len();
        let samples = session.sample_count();
        let vehicles = session
            .objects
            .iter()
            .flat_map(|reading| &reading.samples)
            .map(|sample| sample.obj_id)
            .collect::<HashSet<_>>()
            .len();
        let boundary_records = boundaries.len();

        let mut engine = ReplayEngine::new(self.config.replay.clone());
        engine.load_session(session);
        engine.set_boundaries(boundaries);

        let frame = match render_frame {
            Some(index) => {
                let canvas = self.config.canvas;
                let mut surface = RecordingSurface::new(canvas.width, canvas.height);
                Some(self.render(&mut engine, &mut surface, index)?)
            }
            None => None,
        };

        let GridBounds {
            min_x,
            max_x,
            min_y,
            max_y,
        } = engine.bounds();
        let Metrics {
            frames_built,
            draw_failures,
            ..
        } = engine.metrics().snapshot();

        Ok(WorkflowResult {
            readings,
            samples,
            vehicles,
            frames: engine.frames().len(),
            joined_frames: engine
                .frames()
                .iter()
                .filter(|frame| frame.boundary.is_some())
                .count(),
            boundary_records,
            max_skew_ms: engine
                .frames()
                .iter()
                .map(|frame| frame.skew_ms())
                .max()
                .unwrap_or(0),
            bounds: [min_x, max_x, min_y, max_y],
            frame,
            frames_built,
            draw_failures,
        })
    }

    fn render(
        &self,
        engine: &mut ReplayEngine,
        surface: &mut RecordingSurface,
        index: usize,
    ) -> anyhow::Result<FrameReport> {
        engine.scrub(index);
        let summary = engine
            .present(surface)
            .with_context(|| format!("rendering frame {}", index))?;
        Ok(FrameReport {
            index: engine.current_index(),
            time: engine.current_time_label(),
            draw_calls: surface.commands.len(),
            glyphs: summary.glyphs,
            trajectories: summary.trajectories,
            queue_bands: summary.queue_bands,
            failed_steps: summary
                .failures
                .iter()
                .map(|(step, err)| format!("{:?}: {}", step, err))
                .collect(),
        })
    }
}
