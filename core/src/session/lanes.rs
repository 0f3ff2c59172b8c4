use serde::{Deserialize, Serialize};

/// Static lane layout reported by the sensor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneGeometry {
    #[serde(rename = "lane_index")]
    pub index: i32,
    /// Lateral offset of the lane centerline, in world meters.
    #[serde(rename = "center", default)]
    pub offset: f32,
    #[serde(default)]
    pub width: f32,
}

impl LaneGeometry {
    pub fn new(index: i32, offset: f32, width: f32) -> Self {
        Self {
            index,
            offset,
            width,
        }
    }

    /// Width to draw with, substituting `fallback` for missing or broken values.
    pub fn effective_width(&self, fallback: f32) -> f32 {
        if self.width.is_finite() && self.width > 0.0 {
            self.width
        } else {
            fallback
        }
    }

    /// Lateral span `(low, high)` covered by all lanes together.
    pub fn corridor(lanes: &[LaneGeometry], fallback_width: f32) -> Option<(f32, f32)> {
        lanes
            .iter()
            .filter(|lane| lane.offset.is_finite())
            .map(|lane| {
                let half = lane.effective_width(fallback_width) / 2.0;
                (lane.offset - half, lane.offset + half)
            })
            .reduce(|(low, high), (l, h)| (low.min(l), high.max(h)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corridor_spans_outer_lane_edges() {
        let lanes = vec![
            LaneGeometry::new(0, -3.5, 3.5),
            LaneGeometry::new(1, 0.0, 0.0),
            LaneGeometry::new(2, 3.5, 4.0),
        ];
        assert_eq!(LaneGeometry::corridor(&lanes, 3.0), Some((-5.25, 5.5)));
        assert_eq!(LaneGeometry::corridor(&[], 3.0), None);
    }

    #[test]
    fn reads_sensor_lane_fields() {
        let json = r#"{"lane_index": 1, "center": 2.5, "width": 3.75, "active": true}"#;
        let lane: LaneGeometry = serde_json::from_str(json).unwrap();
        assert_eq!(lane, LaneGeometry::new(1, 2.5, 3.75));
    }
}
