use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::prelude::{ReplayConfig, ReplayError, ReplayResult};
use crate::render::{DrawSurface, RenderSummary, SceneInput, SceneRenderer};
use crate::session::{parse_boundaries, BoundaryRecord, Session};
use crate::telemetry::{LogManager, MetricsRecorder};
use crate::timeline::{GridBounds, TimeFrame, Timeline};
use crate::view::{CanvasSize, PlaybackController, ScreenPoint, TickOutcome, Viewport};

/// Owns a loaded session and everything derived from it. The frame
/// sequence and bounds are rebuilt whenever the session or the boundary
/// feed changes; user interaction only touches the viewport and playback.
pub struct ReplayEngine {
    config: ReplayConfig,
    session: Session,
    boundaries: Vec<BoundaryRecord>,
    timeline: Timeline,
    viewport: Viewport,
    playback: PlaybackController,
    renderer: SceneRenderer,
    metrics: Arc<MetricsRecorder>,
    fault: Option<String>,
    logger: LogManager,
}

impl ReplayEngine {
    pub fn new(config: ReplayConfig) -> Self {
        let metrics = Arc::new(MetricsRecorder::new());
        let mut engine = Self {
            renderer: SceneRenderer::new(&config, metrics.clone()),
            playback: PlaybackController::new(Duration::from_millis(config.cadence_ms)),
            timeline: Timeline::default(),
            config,
            session: Session::default(),
            boundaries: Vec::new(),
            viewport: Viewport::new(),
            metrics,
            fault: None,
            logger: LogManager::new("engine"),
        };
        engine.rebuild();
        engine
    }

    pub fn config(&self) -> &ReplayConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Replaces the session. Playback stops and rewinds to the first frame.
    pub fn load_session(&mut self, session: Session) {
        self.session = session;
        self.playback.scrub(0);
        self.rebuild();
    }

    /// Parses and loads a session export. On error the current session is kept.
    pub fn load_session_json(&mut self, text: &str) -> ReplayResult<()> {
        let session = Session::from_json(text)?;
        self.load_session(session);
        Ok(())
    }

    /// Replaces the boundary feed, keeping the current frame index.
    pub fn set_boundaries(&mut self, boundaries: Vec<BoundaryRecord>) {
        self.boundaries = boundaries;
        self.rebuild();
    }

    pub fn load_boundaries_json(&mut self, text: &str) -> ReplayResult<()> {
        let boundaries = parse_boundaries(text)?;
        self.set_boundaries(boundaries);
        Ok(())
    }

    fn rebuild(&mut self) {
        self.timeline = Timeline::build(&self.session, &self.boundaries, &self.config);
        self.playback.set_frame_count(self.timeline.len());
        self.metrics.record_frames(self.timeline.len());

        let bounds = self.timeline.bounds;
        self.logger.record(&format!(
            "{} frames from {} samples, {} boundary records; bounds x [{}, {}] y [{}, {}]",
            self.timeline.len(),
            self.session.sample_count(),
            self.boundaries.len(),
            bounds.min_x,
            bounds.max_x,
            bounds.min_y,
            bounds.max_y
        ));
    }

    pub fn frames(&self) -> &[TimeFrame] {
        &self.timeline.frames
    }

    pub fn bounds(&self) -> GridBounds {
        self.timeline.bounds
    }

    pub fn current_index(&self) -> usize {
        self.playback.current_index()
    }

    pub fn current_frame(&self) -> Option<&TimeFrame> {
        self.timeline.frame(self.playback.current_index())
    }

    /// Clock time of the current frame, or a placeholder without data.
    pub fn current_time_label(&self) -> String {
        self.current_frame()
            .map(|frame| frame.time.clock_label())
            .unwrap_or_else(|| "--:--:--".into())
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    pub fn playback(&self) -> &PlaybackController {
        &self.playback
    }

    /// Play/pause. Refused while the drawing surface is faulted.
    pub fn toggle_play(&mut self, now: Instant) -> ReplayResult<bool> {
        if let Some(reason) = &self.fault {
            return Err(ReplayError::SurfaceUnavailable(reason.clone()));
        }
        Ok(self.playback.toggle(now))
    }

    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        self.playback.tick(now)
    }

    pub fn scrub(&mut self, index: usize) {
        self.playback.scrub(index);
    }

    pub fn reset(&mut self) {
        self.playback.reset();
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_zoom(&mut self, scale: f32) {
        self.viewport.set_scale(scale);
    }

    pub fn pointer_down(&mut self, position: ScreenPoint) {
        self.viewport.pointer_down(position);
    }

    pub fn pointer_move(&mut self, position: ScreenPoint) -> bool {
        self.viewport.pointer_move(position)
    }

    pub fn pointer_up(&mut self) {
        self.viewport.pointer_up();
    }

    pub fn pointer_leave(&mut self) {
        self.viewport.pointer_leave();
    }

    pub fn reset_pan(&mut self) {
        self.viewport.reset_pan();
    }

    /// World coordinates under `position` on a canvas of `canvas` pixels,
    /// using the same mapping as [`ReplayEngine::render`].
    pub fn world_at(&self, position: ScreenPoint, canvas: CanvasSize) -> Option<(f32, f32)> {
        self.viewport
            .transform(canvas, &self.timeline.bounds)
            .to_world(position)
    }

    /// Paints the current frame. Reads one consistent snapshot of frames,
    /// index and viewport; fails only when the surface cannot be acquired.
    pub fn render<S: DrawSurface + ?Sized>(&self, surface: &mut S) -> ReplayResult<RenderSummary> {
        let canvas = surface
            .acquire()
            .map_err(|err| ReplayError::SurfaceUnavailable(err.to_string()))?;
        let bounds = self.timeline.bounds;
        let input = SceneInput {
            frames: &self.timeline.frames,
            index: self.playback.current_index(),
            bounds,
            transform: self.viewport.transform(canvas, &bounds),
            lanes: &self.session.road_sensor_lanes,
        };
        Ok(self.renderer.render(surface, canvas, &input))
    }

    /// Renders and keeps the fault state in step with the outcome.
    pub fn present<S: DrawSurface + ?Sized>(
        &mut self,
        surface: &mut S,
    ) -> ReplayResult<RenderSummary> {
        let result = self.render(surface);
        match &result {
            Ok(_) => self.fault = None,
            Err(err) => self.note_render_failure(err),
        }
        result
    }

    /// Enters the faulted state after a surface failure: playback stops and
    /// refuses to start until a render succeeds again.
    pub fn note_render_failure(&mut self, err: &ReplayError) {
        if let ReplayError::SurfaceUnavailable(reason) = err {
            if self.fault.is_none() {
                self.logger.warn(&format!("drawing surface unavailable: {}", reason));
            }
            self.playback.stop();
            self.fault = Some(reason.clone());
        }
    }

    pub fn fault(&self) -> Option<&str> {
        self.fault.as_deref()
    }

    /// Called by hosts that learn out of band that the surface is usable again.
    pub fn clear_fault(&mut self) {
        if self.fault.take().is_some() {
            self.logger.record("drawing surface restored");
        }
    }

    pub fn metrics(&self) -> Arc<MetricsRecorder> {
        self.metrics.clone()
    }
}

impl Default for ReplayEngine {
    fn default() -> Self {
        Self::new(ReplayConfig::default())
    }
}
