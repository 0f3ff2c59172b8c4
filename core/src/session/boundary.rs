use serde::{Deserialize, Serialize};

use super::Timestamp;

/// Queue metrics of one lane, computed upstream.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LaneQueue {
    pub lane_id: i32,
    pub car_start_id: Option<u64>,
    pub car_end_id: Option<u64>,
    pub queue_length: f32,
    pub queue_duration: f32,
    pub flow_speed: f32,
    pub delay: f32,
}

impl LaneQueue {
    /// Vehicle identities delimiting the queue, when both ends are known.
    pub fn bounding_ids(&self) -> Option<(u64, u64)> {
        Some((self.car_start_id?, self.car_end_id?))
    }
}

/// Per-lane queue state effective from `time` onwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub time: Timestamp,
    #[serde(default)]
    pub lanes: Vec<LaneQueue>,
}

impl BoundaryRecord {
    pub fn new(time: Timestamp, lanes: Vec<LaneQueue>) -> Self {
        Self {
            id: None,
            time,
            lanes,
        }
    }

    pub fn lane(&self, lane_id: i32) -> Option<&LaneQueue> {
        self.lanes.iter().find(|lane| lane.lane_id == lane_id)
    }
}
