use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::math::geometry::{grid_lines, oriented_rect};
use crate::prelude::{RenderError, RenderResult, ReplayConfig, SceneConfig};
use crate::render::style::{Rgba, StrokeStyle, TextStyle};
use crate::render::surface::DrawSurface;
use crate::session::LaneGeometry;
use crate::telemetry::{LogManager, MetricsRecorder};
use crate::timeline::{GridBounds, TimeFrame};
use crate::view::{CanvasSize, ScreenPoint, ScreenTransform};

const BACKGROUND: Rgba = Rgba::rgb(0.05, 0.05, 0.07);
const GRID_LINE: Rgba = Rgba::rgb(0.2, 0.2, 0.24);
const SUB_GRID_LINE: Rgba = Rgba::rgb(0.12, 0.12, 0.15);
const AXIS_LINE: Rgba = Rgba::rgb(0.55, 0.55, 0.62);
const LABEL: Rgba = Rgba::rgb(0.6, 0.6, 0.66);
const ROAD_BED: Rgba = Rgba::rgb(0.17, 0.17, 0.19);
const LANE_MARK: Rgba = Rgba::rgb(0.85, 0.85, 0.85);
const QUEUE_BAND: Rgba = Rgba::rgb(0.95, 0.55, 0.2);
const QUEUE_START: Rgba = Rgba::rgb(0.3, 0.85, 0.4);
const QUEUE_END: Rgba = Rgba::rgb(0.9, 0.25, 0.25);
const LIGHT_HOUSING: Rgba = Rgba::rgb(0.1, 0.1, 0.1);

const TRAJECTORY_ALPHA: f32 = 0.3;
const TRAJECTORY_WIDTH: f32 = 2.0;
/// Pixel offset of the identity label from the vehicle center.
const LABEL_OFFSET: (f32, f32) = (8.0, 4.0);

/// Everything one render pass reads, captured together so a pass never
/// mixes an old frame index with a new viewport.
pub struct SceneInput<'a> {
    pub frames: &'a [TimeFrame],
    pub index: usize,
    pub bounds: GridBounds,
    pub transform: ScreenTransform,
    pub lanes: &'a [LaneGeometry],
}

impl SceneInput<'_> {
    pub fn current(&self) -> Option<&TimeFrame> {
        self.frames.get(self.index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawStep {
    Clear,
    Grid,
    Road,
    QueueOverlay,
    Trajectories,
    Glyphs,
    Placeholder,
}

/// What a render pass drew and which steps were skipped.
#[derive(Debug, Clone, Default)]
pub struct RenderSummary {
    pub failures: Vec<(DrawStep, RenderError)>,
    pub queue_bands: usize,
    pub trajectories: usize,
    pub glyphs: usize,
}

impl RenderSummary {
    pub fn failed(&self, step: DrawStep) -> bool {
        self.failures.iter().any(|(failed, _)| *failed == step)
    }
}

/// Paints one frame of the road scene onto a [`DrawSurface`].
pub struct SceneRenderer {
    scene: SceneConfig,
    default_length: f32,
    default_width: f32,
    metrics: Arc<MetricsRecorder>,
    logger: LogManager,
}

impl SceneRenderer {
    pub fn new(config: &ReplayConfig, metrics: Arc<MetricsRecorder>) -> Self {
        Self {
            scene: config.scene.clone(),
            default_length: config.default_length,
            default_width: config.default_width,
            metrics,
            logger: LogManager::new("scene"),
        }
    }

    /// Runs every enabled drawing step back to front. A failing step is
    /// logged and skipped; the remaining steps still run.
    pub fn render<S: DrawSurface + ?Sized>(
        &self,
        surface: &mut S,
        canvas: CanvasSize,
        input: &SceneInput<'_>,
    ) -> RenderSummary {
        let mut summary = RenderSummary::default();
        let layers = self.scene.layers;

        let cleared = surface.clear(BACKGROUND);
        self.isolate(DrawStep::Clear, cleared, &mut summary);

        if layers.grid {
            let grid = self.draw_grid(surface, canvas, input);
            self.isolate(DrawStep::Grid, grid, &mut summary);
        }
        if layers.road {
            let road = self.draw_road(surface, input);
            self.isolate(DrawStep::Road, road, &mut summary);
        }

        match input.current() {
            Some(frame) => {
                if layers.boundaries {
                    let queues = self.draw_queues(surface, frame, input);
                    let drawn = self.isolate(DrawStep::QueueOverlay, queues, &mut summary);
                    summary.queue_bands = drawn.unwrap_or(0);
                }
                if layers.trajectories {
                    let trails = self.draw_trajectories(surface, frame, input);
                    let drawn = self.isolate(DrawStep::Trajectories, trails, &mut summary);
                    summary.trajectories = drawn.unwrap_or(0);
                }
                let glyphs = self.draw_glyphs(surface, frame, input);
                let drawn = self.isolate(DrawStep::Glyphs, glyphs, &mut summary);
                summary.glyphs = drawn.unwrap_or(0);
            }
            None => {
                let placeholder = self.draw_placeholder(surface, canvas);
                self.isolate(DrawStep::Placeholder, placeholder, &mut summary);
            }
        }

        self.metrics.record_scene();
        summary
    }

    fn isolate<T>(
        &self,
        step: DrawStep,
        result: RenderResult<T>,
        summary: &mut RenderSummary,
    ) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.logger
                    .warn(&format!("{:?} step skipped: {}", step, err));
                self.metrics.record_draw_failure();
                summary.failures.push((step, err));
                None
            }
        }
    }

    fn draw_grid<S: DrawSurface + ?Sized>(
        &self,
        surface: &mut S,
        canvas: CanvasSize,
        input: &SceneInput<'_>,
    ) -> RenderResult<()> {
        let bounds = input.bounds;
        let t = input.transform;
        let step_x = bounds.width() / 10.0;
        let step_y = bounds.height() / 10.0;

        let vertical = |x: f32| {
            let sx = t.to_screen(x, 0.0).x;
            [ScreenPoint::new(sx, 0.0), ScreenPoint::new(sx, canvas.height)]
        };
        let horizontal = |y: f32| {
            let sy = t.to_screen(0.0, y).y;
            [ScreenPoint::new(0.0, sy), ScreenPoint::new(canvas.width, sy)]
        };

        if self.scene.layers.sub_grid {
            let fine = StrokeStyle::solid(SUB_GRID_LINE, 0.5);
            for x in grid_lines(bounds.min_x, bounds.max_x, step_x / 5.0) {
                surface.stroke_polyline(&vertical(x), &fine)?;
            }
            for y in grid_lines(bounds.min_y, bounds.max_y, step_y / 5.0) {
                surface.stroke_polyline(&horizontal(y), &fine)?;
            }
        }

        let line = StrokeStyle::solid(GRID_LINE, 0.5);
        let label = TextStyle::plain(LABEL, 10.0);
        for x in grid_lines(bounds.min_x, bounds.max_x, step_x) {
            let segment = vertical(x);
            surface.stroke_polyline(&segment, &line)?;
            if self.scene.layers.labels {
                let at = ScreenPoint::new(segment[0].x - 15.0, canvas.height - 5.0);
                surface.fill_text(at, &format!("{:.0}", x), &label)?;
            }
        }
        for y in grid_lines(bounds.min_y, bounds.max_y, step_y) {
            let segment = horizontal(y);
            surface.stroke_polyline(&segment, &line)?;
            if self.scene.layers.labels {
                let at = ScreenPoint::new(5.0, segment[0].y + 5.0);
                surface.fill_text(at, &format!("{:.0}", y), &label)?;
            }
        }

        let axis = StrokeStyle::solid(AXIS_LINE, 1.0);
        surface.stroke_polyline(&horizontal(0.0), &axis)?;
        surface.stroke_polyline(&vertical(0.0), &axis)?;
        Ok(())
    }

    fn draw_road<S: DrawSurface + ?Sized>(
        &self,
        surface: &mut S,
        input: &SceneInput<'_>,
    ) -> RenderResult<()> {
        let scene = &self.scene;
        let bounds = input.bounds;
        let t = input.transform;

        if let Some((low, high)) = LaneGeometry::corridor(input.lanes, scene.lane_width) {
            surface.fill_rect(
                t.to_screen(bounds.min_x, low),
                CanvasSize::new(t.length(bounds.width()), t.length(high - low)),
                ROAD_BED,
            )?;
        }

        let half = scene.cross_road_width / 2.0;
        surface.fill_rect(
            t.to_screen(scene.cross_road_x - half, bounds.min_y),
            CanvasSize::new(t.length(scene.cross_road_width), t.length(bounds.height())),
            ROAD_BED,
        )?;

        let marking = StrokeStyle::dashed(LANE_MARK.with_alpha(0.6), 1.0, 12.0, 8.0);
        let lane_label = TextStyle::plain(LABEL, 11.0);
        for lane in input.lanes.iter().filter(|lane| lane.offset.is_finite()) {
            let start = t.to_screen(bounds.min_x, lane.offset);
            let end = t.to_screen(bounds.max_x, lane.offset);
            surface.stroke_polyline(&[start, end], &marking)?;
            if scene.layers.labels {
                surface.fill_text(
                    start.translate(6.0, -4.0),
                    &format!("Lane {}", lane.index),
                    &lane_label,
                )?;
            }
        }

        self.draw_traffic_light(surface, t)?;
        self.draw_ruler(surface, t)
    }

    fn draw_traffic_light<S: DrawSurface + ?Sized>(
        &self,
        surface: &mut S,
        t: ScreenTransform,
    ) -> RenderResult<()> {
        let (x, y) = self.scene.traffic_light;
        let anchor = t.to_screen(x, y);
        let (width, height) = (12.0, 32.0);
        surface.fill_rect(
            anchor.translate(-width / 2.0, -height / 2.0),
            CanvasSize::new(width, height),
            LIGHT_HOUSING,
        )?;
        let lamps = [
            (-10.0, Rgba::rgb(0.95, 0.2, 0.2)),
            (0.0, Rgba::rgb(0.35, 0.3, 0.1)),
            (10.0, Rgba::rgb(0.1, 0.3, 0.12)),
        ];
        for (dy, color) in lamps {
            surface.fill_circle(anchor.translate(0.0, dy), 4.0, color)?;
        }
        Ok(())
    }

    fn draw_ruler<S: DrawSurface + ?Sized>(
        &self,
        surface: &mut S,
        t: ScreenTransform,
    ) -> RenderResult<()> {
        let (x, y) = self.scene.ruler_origin;
        let length = self.scene.ruler_length;
        let start = t.to_screen(x, y);
        let end = t.to_screen(x + length, y);
        let style = StrokeStyle::solid(LANE_MARK, 1.5);

        surface.stroke_polyline(&[start, end], &style)?;
        for tick in [start, end] {
            surface.stroke_polyline(&[tick.translate(0.0, -4.0), tick.translate(0.0, 4.0)], &style)?;
        }
        if self.scene.layers.labels {
            let middle = ScreenPoint::new((start.x + end.x) / 2.0, start.y - 8.0);
            surface.fill_text(
                middle,
                &format!("{} m", length),
                &TextStyle::plain(LANE_MARK, 11.0).centered(),
            )?;
        }
        Ok(())
    }

    /// Returns the number of queue bands drawn.
    fn draw_queues<S: DrawSurface + ?Sized>(
        &self,
        surface: &mut S,
        frame: &TimeFrame,
        input: &SceneInput<'_>,
    ) -> RenderResult<usize> {
        let Some(boundary) = &frame.boundary else {
            return Ok(0);
        };
        let t = input.transform;
        let mut drawn = 0;

        for queue in &boundary.lanes {
            let Some((start_id, end_id)) = queue.bounding_ids() else {
                continue;
            };
            let (Some(start), Some(end)) = (frame.point(start_id), frame.point(end_id)) else {
                continue;
            };
            if !(start.is_finite() && end.is_finite()) {
                continue;
            }

            let (center, width) = input
                .lanes
                .iter()
                .find(|lane| lane.index == queue.lane_id && lane.offset.is_finite())
                .map(|lane| (lane.offset, lane.effective_width(self.scene.lane_width)))
                .unwrap_or(((start.y + end.y) / 2.0, self.scene.lane_width));
            let (low_x, high_x) = (start.x.min(end.x), start.x.max(end.x));

            surface.fill_rect(
                t.to_screen(low_x, center - width / 2.0),
                CanvasSize::new(t.length(high_x - low_x), t.length(width)),
                QUEUE_BAND.with_alpha(0.3),
            )?;
            surface.fill_circle(t.to_screen(start.x, start.y), 6.0, QUEUE_START)?;
            surface.fill_circle(t.to_screen(end.x, end.y), 6.0, QUEUE_END)?;
            if self.scene.layers.labels {
                let above = t.to_screen((low_x + high_x) / 2.0, center - width / 2.0);
                surface.fill_text(
                    above.translate(0.0, -4.0),
                    &format!("queue {:.1} m", queue.queue_length),
                    &TextStyle::plain(QUEUE_BAND, 11.0).centered(),
                )?;
            }
            drawn += 1;
        }
        Ok(drawn)
    }

    /// Returns the number of trails drawn.
    fn draw_trajectories<S: DrawSurface + ?Sized>(
        &self,
        surface: &mut S,
        frame: &TimeFrame,
        input: &SceneInput<'_>,
    ) -> RenderResult<usize> {
        let t = input.transform;
        let mut trails: HashMap<u64, Vec<ScreenPoint>> = frame
            .points
            .iter()
            .map(|point| (point.obj_id, Vec::new()))
            .collect();

        let history = &input.frames[..=input.index.min(input.frames.len() - 1)];
        for point in history.iter().flat_map(|past| &past.points) {
            if let Some(trail) = trails.get_mut(&point.obj_id) {
                if point.is_finite() {
                    trail.push(t.to_screen(point.x, point.y));
                }
            }
        }

        let mut drawn = HashSet::new();
        for point in &frame.points {
            let Some(trail) = trails.get(&point.obj_id) else {
                continue;
            };
            if trail.len() < 2 || !drawn.insert(point.obj_id) {
                continue;
            }
            let style = StrokeStyle::solid(
                Rgba::for_speed(point.speed, TRAJECTORY_ALPHA),
                TRAJECTORY_WIDTH,
            );
            surface.stroke_polyline(trail, &style)?;
        }
        Ok(drawn.len())
    }

    /// Returns the number of vehicles drawn.
    fn draw_glyphs<S: DrawSurface + ?Sized>(
        &self,
        surface: &mut S,
        frame: &TimeFrame,
        input: &SceneInput<'_>,
    ) -> RenderResult<usize> {
        let t = input.transform;
        let label = TextStyle::plain(Rgba::WHITE, 12.0).shadowed(Rgba::BLACK.with_alpha(0.5));
        let mut drawn = 0;

        for point in frame.points.iter().filter(|point| point.is_finite()) {
            let (length, width) = point.footprint(self.default_length, self.default_width);
            let center = t.to_screen(point.x, point.y);
            let corners = oriented_rect(
                (center.x, center.y),
                t.length(length),
                t.length(width),
                -point.heading,
            )
            .map(|(x, y)| ScreenPoint::new(x, y));

            surface.fill_polygon(&corners, Rgba::for_speed(point.speed, 1.0))?;
            if self.scene.layers.labels {
                surface.fill_text(
                    center.translate(LABEL_OFFSET.0, LABEL_OFFSET.1),
                    &format!("ID: {}", point.obj_id),
                    &label,
                )?;
            }
            drawn += 1;
        }
        Ok(drawn)
    }

    fn draw_placeholder<S: DrawSurface + ?Sized>(
        &self,
        surface: &mut S,
        canvas: CanvasSize,
    ) -> RenderResult<()> {
        surface.fill_text(
            ScreenPoint::new(canvas.width / 2.0, canvas.height / 2.0),
            "No data to visualize",
            &TextStyle::plain(LABEL, 16.0).centered(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::surface::{CommandKind, DrawCommand, RecordingSurface};
    use crate::session::{BoundaryRecord, DetectionSample, LaneQueue, Timestamp};
    use crate::timeline::PlotPoint;
    use crate::view::Viewport;
    use approx::assert_abs_diff_eq;

    const CANVAS: CanvasSize = CanvasSize::new(800.0, 600.0);

    fn point(obj_id: u64, x: f32, y: f32, heading: f32) -> PlotPoint {
        PlotPoint::from(&DetectionSample::new(obj_id, x, y, 5.0, heading, Timestamp::default()))
    }

    fn frame(millis: i64, points: Vec<PlotPoint>) -> TimeFrame {
        let time = Timestamp::from_millis(millis);
        TimeFrame {
            time,
            source_time: time,
            points,
            boundary: None,
        }
    }

    fn renderer(config: ReplayConfig) -> (SceneRenderer, Arc<MetricsRecorder>) {
        let metrics = Arc::new(MetricsRecorder::new());
        (SceneRenderer::new(&config, metrics.clone()), metrics)
    }

    fn render(
        renderer: &SceneRenderer,
        surface: &mut RecordingSurface,
        frames: &[TimeFrame],
        index: usize,
        lanes: &[LaneGeometry],
    ) -> RenderSummary {
        let bounds = GridBounds::default();
        let input = SceneInput {
            frames,
            index,
            bounds,
            transform: Viewport::new().transform(CANVAS, &bounds),
            lanes,
        };
        renderer.render(surface, CANVAS, &input)
    }

    fn polygons(surface: &RecordingSurface) -> Vec<&Vec<ScreenPoint>> {
        surface
            .commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Polygon { points, .. } => Some(points),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn empty_sequence_renders_grid_and_placeholder() {
        let (renderer, metrics) = renderer(ReplayConfig::default());
        let mut surface = RecordingSurface::new(800.0, 600.0);
        let summary = render(&renderer, &mut surface, &[], 0, &[]);

        assert!(summary.failures.is_empty());
        assert_eq!(summary.glyphs, 0);
        assert!(surface.texts().any(|text| text == "No data to visualize"));
        assert!(surface.count(CommandKind::Polyline) > 20);
        assert_eq!(metrics.snapshot().scenes_rendered, 1);
    }

    #[test]
    fn glyph_is_sized_from_default_footprint() {
        let (renderer, _) = renderer(ReplayConfig::default());
        let mut surface = RecordingSurface::new(800.0, 600.0);
        let frames = vec![frame(0, vec![point(1, 0.0, 0.0, 0.0)])];
        render(&renderer, &mut surface, &frames, 0, &[]);

        let glyph = polygons(&surface)[0];
        assert_abs_diff_eq!(glyph[0].x, 300.0 - 6.75, epsilon = 1e-3);
        assert_abs_diff_eq!(glyph[0].y, 300.0 - 3.0, epsilon = 1e-3);
        assert_abs_diff_eq!(glyph[2].x, 300.0 + 6.75, epsilon = 1e-3);
        assert!(surface.texts().any(|text| text == "ID: 1"));
    }

    #[test]
    fn heading_rotates_glyph() {
        let (renderer, _) = renderer(ReplayConfig::default());
        let mut surface = RecordingSurface::new(800.0, 600.0);
        let frames = vec![frame(0, vec![point(1, 0.0, 0.0, 90.0)])];
        render(&renderer, &mut surface, &frames, 0, &[]);

        let glyph = polygons(&surface)[0];
        let xs: Vec<f32> = glyph.iter().map(|p| p.x).collect();
        let span = xs.iter().cloned().fold(f32::MIN, f32::max)
            - xs.iter().cloned().fold(f32::MAX, f32::min);
        assert_abs_diff_eq!(span, 6.0, epsilon = 1e-3);
    }

    #[test]
    fn trails_need_two_positions() {
        let (renderer, _) = renderer(ReplayConfig::default());
        let mut surface = RecordingSurface::new(800.0, 600.0);
        let mut braking = point(1, 4.0, 0.0, 0.0);
        braking.speed = 12.0;
        let frames = vec![
            frame(0, vec![point(1, 0.0, 0.0, 0.0)]),
            frame(100, vec![point(1, 2.0, 0.0, 0.0)]),
            frame(200, vec![braking.clone(), point(2, 9.0, 3.0, 0.0)]),
            frame(300, vec![point(1, 6.0, 0.0, 0.0)]),
        ];
        let summary = render(&renderer, &mut surface, &frames, 2, &[]);
        assert_eq!(summary.trajectories, 1);
        assert_eq!(summary.glyphs, 2);

        let (trail, style) = surface
            .commands
            .iter()
            .find_map(|command| match command {
                DrawCommand::Polyline { points, style } if style.color.a == TRAJECTORY_ALPHA => {
                    Some((points, style))
                }
                _ => None,
            })
            .unwrap();
        assert_eq!(trail.len(), 3);
        assert_eq!(style.color, Rgba::for_speed(braking.speed, TRAJECTORY_ALPHA));
        assert_ne!(style.color, Rgba::for_speed(5.0, TRAJECTORY_ALPHA));
    }

    #[test]
    fn queue_band_requires_both_vehicles() {
        let (renderer, _) = renderer(ReplayConfig::default());
        let mut surface = RecordingSurface::new(800.0, 600.0);
        let mut current = frame(0, vec![point(1, -10.0, 0.0, 0.0), point(2, 20.0, 0.5, 0.0)]);
        current.boundary = Some(BoundaryRecord::new(
            Timestamp::default(),
            vec![
                LaneQueue {
                    lane_id: 0,
                    car_start_id: Some(1),
                    car_end_id: Some(2),
                    queue_length: 30.0,
                    ..Default::default()
                },
                LaneQueue {
                    lane_id: 1,
                    car_start_id: Some(1),
                    car_end_id: Some(99),
                    ..Default::default()
                },
                LaneQueue {
                    lane_id: 2,
                    car_start_id: None,
                    car_end_id: Some(2),
                    ..Default::default()
                },
            ],
        ));
        let lanes = vec![LaneGeometry::new(0, 0.0, 3.5)];
        let summary = render(&renderer, &mut surface, &[current], 0, &lanes);

        assert!(summary.failures.is_empty());
        assert_eq!(summary.queue_bands, 1);
        assert!(surface.texts().any(|text| text == "queue 30.0 m"));
    }

    #[test]
    fn failing_step_does_not_abort_the_scene() {
        let (renderer, metrics) = renderer(ReplayConfig::default());
        let mut surface = RecordingSurface::new(800.0, 600.0).rejecting(CommandKind::Polyline);
        let frames = vec![
            frame(0, vec![point(1, 0.0, 0.0, 0.0)]),
            frame(100, vec![point(1, 2.0, 0.0, 0.0), point(2, 5.0, 5.0, 0.0)]),
        ];
        let summary = render(&renderer, &mut surface, &frames, 1, &[]);

        assert!(summary.failed(DrawStep::Grid));
        assert!(summary.failed(DrawStep::Trajectories));
        assert!(!summary.failed(DrawStep::Glyphs));
        assert_eq!(summary.glyphs, 2);
        assert_eq!(polygons(&surface).len(), 2);
        assert_eq!(metrics.snapshot().draw_failures, summary.failures.len());
    }

    #[test]
    fn disabled_layers_are_skipped() {
        let mut config = ReplayConfig::default();
        config.scene.layers.trajectories = false;
        config.scene.layers.grid = false;
        config.scene.layers.road = false;
        config.scene.layers.labels = false;
        let (renderer, _) = renderer(config);
        let mut surface = RecordingSurface::new(800.0, 600.0);
        let frames = vec![
            frame(0, vec![point(1, 0.0, 0.0, 0.0)]),
            frame(100, vec![point(1, 2.0, 0.0, 0.0)]),
        ];
        let summary = render(&renderer, &mut surface, &frames, 1, &[]);

        assert_eq!(summary.trajectories, 0);
        assert_eq!(surface.count(CommandKind::Polyline), 0);
        assert_eq!(surface.count(CommandKind::Text), 0);
        assert_eq!(summary.glyphs, 1);
    }

    #[test]
    fn nan_vehicles_are_not_drawn() {
        let (renderer, _) = renderer(ReplayConfig::default());
        let mut surface = RecordingSurface::new(800.0, 600.0);
        let frames = vec![frame(0, vec![point(1, f32::NAN, 0.0, 0.0), point(2, 1.0, 1.0, 0.0)])];
        let summary = render(&renderer, &mut surface, &frames, 0, &[]);
        assert!(summary.failures.is_empty());
        assert_eq!(summary.glyphs, 1);
    }

    #[test]
    fn lanes_get_centerlines_and_labels() {
        let (renderer, _) = renderer(ReplayConfig::default());
        let mut surface = RecordingSurface::new(800.0, 600.0);
        let lanes = vec![LaneGeometry::new(0, -1.75, 3.5), LaneGeometry::new(1, 1.75, 3.5)];
        let summary = render(&renderer, &mut surface, &[], 0, &lanes);
        assert!(!summary.failed(DrawStep::Road));
        assert!(surface.texts().any(|text| text == "Lane 0"));
        assert!(surface.texts().any(|text| text == "Lane 1"));
        assert!(surface.texts().any(|text| text == "20 m"));
    }
}
