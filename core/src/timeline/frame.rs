use serde::Serialize;

use crate::session::{BoundaryRecord, DetectionSample, Timestamp};

/// Snapshot of one tracked vehicle inside a frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotPoint {
    pub obj_id: u64,
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub heading: f32,
    pub lane: i32,
    pub obj_class: i32,
    pub length: Option<f32>,
    pub width: Option<f32>,
}

impl PlotPoint {
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Physical `(length, width)`, falling back to the supplied defaults for
    /// dimensions the radar did not report.
    pub fn footprint(&self, default_length: f32, default_width: f32) -> (f32, f32) {
        let usable = |value: Option<f32>| value.filter(|v| v.is_finite() && *v > 0.0);
        (
            usable(self.length).unwrap_or(default_length),
            usable(self.width).unwrap_or(default_width),
        )
    }
}

impl From<&DetectionSample> for PlotPoint {
    fn from(sample: &DetectionSample) -> Self {
        Self {
            obj_id: sample.obj_id,
            x: sample.x,
            y: sample.y,
            speed: sample.speed,
            heading: sample.heading,
            lane: sample.lane,
            obj_class: sample.obj_class,
            length: sample.length,
            width: sample.width,
        }
    }
}

/// One tick of the uniform playback grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeFrame {
    pub time: Timestamp,
    /// Capture time of the reading the points were taken from.
    pub source_time: Timestamp,
    pub points: Vec<PlotPoint>,
    pub boundary: Option<BoundaryRecord>,
}

impl TimeFrame {
    pub fn point(&self, obj_id: u64) -> Option<&PlotPoint> {
        self.points.iter().find(|point| point.obj_id == obj_id)
    }

    /// Distance between the tick and the reading that fills it.
    pub fn skew_ms(&self) -> i64 {
        (self.source_time - self.time).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footprint_replaces_missing_and_broken_dimensions() {
        let sample = DetectionSample::new(1, 0.0, 0.0, 0.0, 0.0, Timestamp::default());
        let mut point = PlotPoint::from(&sample);
        assert_eq!(point.footprint(4.5, 2.0), (4.5, 2.0));
        point.length = Some(6.0);
        point.width = Some(-1.0);
        assert_eq!(point.footprint(4.5, 2.0), (6.0, 2.0));
    }
}
