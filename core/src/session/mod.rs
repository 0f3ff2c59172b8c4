//! In-memory model of an uploaded radar session and its boundary feed.

pub mod boundary;
pub mod detection;
pub mod lanes;
pub mod timestamp;

pub use boundary::{BoundaryRecord, LaneQueue};
pub use detection::{DetectionSample, Reading};
pub use lanes::LaneGeometry;
pub use timestamp::Timestamp;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unrecognised timestamp {0:?}")]
    Timestamp(String),
    #[error("reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

fn read_file(path: &Path) -> Result<String, SessionError> {
    fs::read_to_string(path).map_err(|source| SessionError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// A recorded session: radar readings plus the lane layout they refer to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub objects: Vec<Reading>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub road_sensor_lanes: Vec<LaneGeometry>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Session {
    pub fn new(objects: Vec<Reading>, road_sensor_lanes: Vec<LaneGeometry>) -> Self {
        Self {
            objects,
            road_sensor_lanes,
        }
    }

    pub fn from_json(text: &str) -> Result<Self, SessionError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, SessionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SessionError> {
        Self::from_json(&read_file(path.as_ref())?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SessionError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?).map_err(|source| SessionError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// True when there is nothing to animate.
    pub fn is_empty(&self) -> bool {
        self.objects.iter().all(|reading| reading.samples.is_empty())
    }

    pub fn sample_count(&self) -> usize {
        self.objects.iter().map(|reading| reading.samples.len()).sum()
    }
}

/// Parses the boundary feed, a JSON array of boundary records.
pub fn parse_boundaries(text: &str) -> Result<Vec<BoundaryRecord>, SessionError> {
    Ok(serde_json::from_str(text)?)
}

pub fn load_boundaries<P: AsRef<Path>>(path: P) -> Result<Vec<BoundaryRecord>, SessionError> {
    parse_boundaries(&read_file(path.as_ref())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_tolerates_null_and_missing_collections() {
        let session = Session::from_json(r#"{"objects": null, "sensor_ip": "10.0.0.2"}"#).unwrap();
        assert!(session.is_empty());
        assert!(session.road_sensor_lanes.is_empty());
    }

    #[test]
    fn session_reads_radar_export() {
        let json = r#"{
            "objects": [
                {"name": "r1", "protocol_version": "2", "rows": 1, "rows_data": [
                    {"obj_id": 3, "point_x": 1.0, "point_y": 2.0, "obj_speed": 5.0,
                     "heading": 0.0, "lane": 1, "time": "2025-03-20T14:20:00.000"}
                ]}
            ],
            "road_sensor_lanes": [{"lane_index": 1, "center": 0.0, "width": 3.5}]
        }"#;
        let session = Session::from_json(json).unwrap();
        assert_eq!(session.sample_count(), 1);
        assert_eq!(session.road_sensor_lanes.len(), 1);
        let again = Session::from_json(&session.to_json().unwrap()).unwrap();
        assert_eq!(again.objects, session.objects);
    }

    #[test]
    fn session_files_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let session = Session::new(
            vec![Reading::new(
                "r1",
                vec![DetectionSample::new(4, 1.0, 2.0, 3.0, 90.0, Timestamp::from_millis(5))],
            )],
            vec![LaneGeometry::new(0, 0.0, 3.5)],
        );
        session.save(&path).unwrap();
        let loaded = Session::load(&path).unwrap();
        assert_eq!(loaded.objects, session.objects);

        let missing = Session::load(dir.path().join("absent.json"));
        assert!(matches!(missing, Err(SessionError::Io { .. })));
    }

    #[test]
    fn boundary_files_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, br#"[{"time": "2025-03-20T14:20:00Z"}]"#).unwrap();
        let records = load_boundaries(file.path()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn boundary_feed_parses_as_array() {
        let records = parse_boundaries(r#"[{"time": 0, "lanes": []}, {"time": 50}]"#).unwrap();
        assert_eq!(records.len(), 2);
        assert!(parse_boundaries("{").is_err());
    }
}
