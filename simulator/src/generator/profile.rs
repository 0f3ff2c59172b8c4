use anyhow::ensure;
use rand::{rngs::StdRng, Rng, SeedableRng};
use replaycore::session::{
    BoundaryRecord, DetectionSample, LaneGeometry, LaneQueue, Reading, Session, Timestamp,
};
use serde::{Deserialize, Serialize};

/// 2025-03-20T14:20:00Z
const DEFAULT_START_MS: i64 = 1_742_480_400_000;
const TRUCK_CLASS: i32 = 2;
const CAR_CLASS: i32 = 1;

/// Configuration for generating a synthetic traffic session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub seed: u64,
    pub vehicles: usize,
    pub lanes: usize,
    pub lane_width: f32,
    pub start: Timestamp,
    pub duration_ms: i64,
    /// Nominal spacing of radar readings; actual capture times are jittered.
    pub reading_interval_ms: i64,
    pub jitter_ms: i64,
    pub boundary_interval_ms: i64,
    pub min_speed: f32,
    pub max_speed: f32,
    pub truck_ratio: f32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            vehicles: 12,
            lanes: 3,
            lane_width: 3.5,
            start: Timestamp::from_millis(DEFAULT_START_MS),
            duration_ms: 20_000,
            reading_interval_ms: 100,
            jitter_ms: 35,
            boundary_interval_ms: 1_000,
            min_speed: 3.0,
            max_speed: 14.0,
            truck_ratio: 0.15,
        }
    }
}

/// A generated session with a matching boundary feed.
pub struct SyntheticSession {
    pub session: Session,
    pub boundaries: Vec<BoundaryRecord>,
}

struct Vehicle {
    id: u64,
    lane: usize,
    start_x: f32,
    y: f32,
    speed: f32,
    length: f32,
    width: f32,
    class: i32,
}

impl Vehicle {
    fn x_at(&self, elapsed_ms: i64) -> f32 {
        self.start_x + self.speed * elapsed_ms as f32 / 1000.0
    }
}

fn lane_layout(config: &GeneratorConfig) -> Vec<LaneGeometry> {
    let middle = (config.lanes as f32 - 1.0) / 2.0;
    (0..config.lanes)
        .map(|index| {
            LaneGeometry::new(
                index as i32,
                (index as f32 - middle) * config.lane_width,
                config.lane_width,
            )
        })
        .collect()
}

fn spawn_vehicles(config: &GeneratorConfig, lanes: &[LaneGeometry], rng: &mut StdRng) -> Vec<Vehicle> {
    (0..config.vehicles)
        .map(|n| {
            let lane = rng.gen_range(0..lanes.len());
            let truck = rng.gen_bool(config.truck_ratio.clamp(0.0, 1.0) as f64);
            let (length, width, class) = if truck {
                (rng.gen_range(8.0..12.0), 2.5, TRUCK_CLASS)
            } else {
                (rng.gen_range(4.0..5.2), rng.gen_range(1.7..2.0), CAR_CLASS)
            };
            Vehicle {
                id: n as u64 + 1,
                lane,
                start_x: rng.gen_range(-95.0..-10.0),
                y: lanes[lane].offset + rng.gen_range(-0.3..0.3),
                speed: rng.gen_range(config.min_speed..=config.max_speed),
                length,
                width,
                class,
            }
        })
        .collect()
}

fn reading_at(vehicles: &[Vehicle], elapsed_ms: i64, time: Timestamp, index: usize) -> Reading {
    let samples = vehicles
        .iter()
        .map(|vehicle| {
            DetectionSample::new(
                vehicle.id,
                vehicle.x_at(elapsed_ms),
                vehicle.y,
                vehicle.speed,
                0.0,
                time,
            )
            .with_lane(vehicle.lane as i32)
            .with_dimensions(vehicle.length, vehicle.width)
            .with_class(vehicle.class)
        })
        .collect();
    Reading::new(format!("reading-{:05}", index), samples)
}

/// Scripted queue feed: per lane, the rearmost and frontmost vehicle.
fn boundary_at(vehicles: &[Vehicle], lanes: usize, elapsed_ms: i64, time: Timestamp) -> BoundaryRecord {
    let queues = (0..lanes)
        .filter_map(|lane| {
            let mut members: Vec<&Vehicle> = vehicles.iter().filter(|v| v.lane == lane).collect();
            members.sort_by(|a, b| a.x_at(elapsed_ms).total_cmp(&b.x_at(elapsed_ms)));
            let (first, last) = (members.first()?, members.last()?);
            let length = last.x_at(elapsed_ms) - first.x_at(elapsed_ms);
            let flow = members.iter().map(|v| v.speed).sum::<f32>() / members.len() as f32;
            Some(LaneQueue {
                lane_id: lane as i32,
                car_start_id: Some(first.id),
                car_end_id: Some(last.id),
                queue_length: length,
                queue_duration: elapsed_ms as f32 / 1000.0,
                flow_speed: flow,
                delay: 0.0,
            })
        })
        .collect();
    BoundaryRecord::new(time, queues)
}

pub fn build_session(config: &GeneratorConfig) -> anyhow::Result<SyntheticSession> {
    ensure!(config.lanes > 0, "generator needs at least one lane");
    ensure!(config.reading_interval_ms > 0, "reading interval must be positive");
    ensure!(
        config.min_speed <= config.max_speed,
        "min_speed {} exceeds max_speed {}",
        config.min_speed,
        config.max_speed
    );

    let mut rng = StdRng::seed_from_u64(config.seed);
    let lanes = lane_layout(config);
    let vehicles = spawn_vehicles(config, &lanes, &mut rng);

    let jitter = config.jitter_ms.clamp(0, config.reading_interval_ms / 2);
    let mut objects = Vec::new();
    let mut elapsed = 0;
    while elapsed <= config.duration_ms {
        let captured = (elapsed + rng.gen_range(-jitter..=jitter)).max(0);
        let time = config.start.offset(captured);
        objects.push(reading_at(&vehicles, captured, time, objects.len()));
        elapsed += config.reading_interval_ms;
    }

    let mut boundaries = Vec::new();
    if config.boundary_interval_ms > 0 {
        let mut elapsed = 0;
        while elapsed <= config.duration_ms {
            let time = config.start.offset(elapsed);
            boundaries.push(boundary_at(&vehicles, lanes.len(), elapsed, time));
            elapsed += config.boundary_interval_ms;
        }
    }

    log::info!(
        "synthesized {} readings of {} vehicles on {} lanes, {} boundary records",
        objects.len(),
        vehicles.len(),
        lanes.len(),
        boundaries.len()
    );
    Ok(SyntheticSession {
        session: Session::new(objects, lanes),
        boundaries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_is_deterministic_per_seed() {
        let config = GeneratorConfig {
            seed: 7,
            duration_ms: 2_000,
            ..Default::default()
        };
        let first = build_session(&config).unwrap();
        let second = build_session(&config).unwrap();
        assert_eq!(first.session.objects, second.session.objects);
        assert_eq!(first.session.objects.len(), 21);
        assert_eq!(first.boundaries.len(), 3);
    }

    #[test]
    fn capture_times_are_jittered_but_bounded() {
        let config = GeneratorConfig {
            duration_ms: 5_000,
            ..Default::default()
        };
        let synthetic = build_session(&config).unwrap();
        for (k, reading) in synthetic.session.objects.iter().enumerate() {
            let nominal = config.start.offset(k as i64 * config.reading_interval_ms);
            let time = reading.time().unwrap();
            assert!((time - nominal).abs() <= config.jitter_ms);
        }
    }

    #[test]
    fn lanes_are_centered_on_the_road_axis() {
        let config = GeneratorConfig {
            lanes: 2,
            ..Default::default()
        };
        let synthetic = build_session(&config).unwrap();
        let offsets: Vec<f32> = synthetic
            .session
            .road_sensor_lanes
            .iter()
            .map(|lane| lane.offset)
            .collect();
        assert_eq!(offsets, vec![-1.75, 1.75]);
    }

    #[test]
    fn queue_ids_refer_to_vehicles_in_the_lane() {
        let synthetic = build_session(&GeneratorConfig::default()).unwrap();
        let reading = &synthetic.session.objects[0];
        for queue in &synthetic.boundaries[0].lanes {
            let (start, end) = queue.bounding_ids().unwrap();
            for id in [start, end] {
                let sample = reading.samples.iter().find(|s| s.obj_id == id).unwrap();
                assert_eq!(sample.lane, queue.lane_id);
            }
        }
    }

    #[test]
    fn rejects_inverted_speed_range() {
        let config = GeneratorConfig {
            min_speed: 10.0,
            max_speed: 2.0,
            ..Default::default()
        };
        assert!(build_session(&config).is_err());
    }
}
