use serde::{Deserialize, Deserializer, Serialize};

use super::Timestamp;

/// One radar detection as exported by the sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionSample {
    pub obj_id: u64,
    #[serde(rename = "point_x", default = "missing_coordinate", deserialize_with = "coordinate")]
    pub x: f32,
    #[serde(rename = "point_y", default = "missing_coordinate", deserialize_with = "coordinate")]
    pub y: f32,
    #[serde(rename = "obj_speed", default)]
    pub speed: f32,
    #[serde(default)]
    pub heading: f32,
    #[serde(default)]
    pub lane: i32,
    #[serde(default)]
    pub obj_class: i32,
    #[serde(rename = "obj_length", default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f32>,
    #[serde(rename = "obj_width", default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    pub time: Timestamp,
}

fn missing_coordinate() -> f32 {
    f32::NAN
}

fn coordinate<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
    Ok(Option::<f32>::deserialize(deserializer)?.unwrap_or(f32::NAN))
}

impl DetectionSample {
    pub fn new(obj_id: u64, x: f32, y: f32, speed: f32, heading: f32, time: Timestamp) -> Self {
        Self {
            obj_id,
            x,
            y,
            speed,
            heading,
            lane: 0,
            obj_class: 0,
            length: None,
            width: None,
            time,
        }
    }

    pub fn with_lane(mut self, lane: i32) -> Self {
        self.lane = lane;
        self
    }

    pub fn with_dimensions(mut self, length: f32, width: f32) -> Self {
        self.length = Some(length);
        self.width = Some(width);
        self
    }

    pub fn with_class(mut self, obj_class: i32) -> Self {
        self.obj_class = obj_class;
        self
    }
}

/// A batch of detections captured at one instant.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Reading {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "rows_data", default)]
    pub samples: Vec<DetectionSample>,
}

impl Reading {
    pub fn new(name: impl Into<String>, samples: Vec<DetectionSample>) -> Self {
        Self {
            name: name.into(),
            samples,
        }
    }

    /// Capture time of the batch, taken from its first sample.
    pub fn time(&self) -> Option<Timestamp> {
        self.samples.first().map(|sample| sample.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_reads_radar_field_names() {
        let json = r#"{
            "obj_id": 17, "point_x": 12.5, "point_y": -3.0, "obj_speed": 8.0,
            "heading": 90.0, "lane": 2, "obj_class": 1, "obj_length": 5.1,
            "obj_width": 1.9, "time": "2025-03-20T14:20:00.100", "quality": 3
        }"#;
        let sample: DetectionSample = serde_json::from_str(json).unwrap();
        assert_eq!(sample.obj_id, 17);
        assert_eq!(sample.x, 12.5);
        assert_eq!(sample.lane, 2);
        assert_eq!(sample.length, Some(5.1));
    }

    #[test]
    fn null_coordinates_become_nan() {
        let json = r#"{"obj_id": 1, "point_x": null, "time": 0}"#;
        let sample: DetectionSample = serde_json::from_str(json).unwrap();
        assert!(sample.x.is_nan());
        assert!(sample.y.is_nan());
        assert_eq!(sample.width, None);
    }

    #[test]
    fn reading_time_comes_from_first_sample() {
        let reading = Reading::new(
            "batch",
            vec![
                DetectionSample::new(1, 0.0, 0.0, 0.0, 0.0, Timestamp::from_millis(40)),
                DetectionSample::new(2, 0.0, 0.0, 0.0, 0.0, Timestamp::from_millis(90)),
            ],
        );
        assert_eq!(reading.time(), Some(Timestamp::from_millis(40)));
        assert_eq!(Reading::default().time(), None);
    }
}
