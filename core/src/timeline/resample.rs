use crate::prelude::DEFAULT_MAX_FRAMES;
use crate::session::{Reading, Timestamp};
use crate::telemetry::log::LogManager;
use crate::timeline::frame::{PlotPoint, TimeFrame};

/// Rebuilds irregular radar readings as frames on a fixed-cadence grid.
pub struct Resampler {
    step_ms: i64,
    max_frames: usize,
    logger: LogManager,
}

impl Resampler {
    pub fn new(step_ms: i64) -> Self {
        Self {
            step_ms: step_ms.max(1),
            max_frames: DEFAULT_MAX_FRAMES,
            logger: LogManager::new("resampler"),
        }
    }

    /// Caps the frame count; spans needing more ticks are truncated.
    pub fn with_max_frames(mut self, max_frames: usize) -> Self {
        self.max_frames = max_frames.max(1);
        self
    }

    pub fn step_ms(&self) -> i64 {
        self.step_ms
    }

    /// Emits one frame per tick from the earliest to the latest capture
    /// time, each filled with the reading nearest to its tick.
    pub fn resample(&self, readings: &[Reading]) -> Vec<TimeFrame> {
        let mut stamped: Vec<(Timestamp, &Reading)> = readings
            .iter()
            .filter_map(|reading| reading.time().map(|time| (time, reading)))
            .collect();

        let skipped = readings.len() - stamped.len();
        if skipped > 0 {
            self.logger
                .warn(&format!("skipped {} readings without samples", skipped));
        }
        if stamped.is_empty() {
            self.logger.record("no readings to resample");
            return Vec::new();
        }

        // Stable sort keeps upload order among readings sharing a capture time.
        stamped.sort_by_key(|(time, _)| *time);
        let times: Vec<Timestamp> = stamped.iter().map(|(time, _)| *time).collect();
        let min_time = times[0];
        let max_time = times[times.len() - 1];
        let tick_count = self.tick_count(min_time, max_time);

        let mut frames = Vec::with_capacity(tick_count);
        for k in 0..tick_count {
            let tick = min_time.offset(k as i64 * self.step_ms);
            let Some(index) = nearest_reading(&times, tick) else {
                continue;
            };
            let (source_time, reading) = stamped[index];
            let points = reading.samples.iter().map(PlotPoint::from).collect();
            frames.push(TimeFrame {
                time: tick,
                source_time,
                points,
                boundary: None,
            });
        }

        self.logger.record(&format!(
            "resampled {} readings into {} frames ({} .. {}, step {}ms)",
            stamped.len(),
            frames.len(),
            min_time,
            max_time,
            self.step_ms
        ));
        frames
    }

    fn tick_count(&self, min_time: Timestamp, max_time: Timestamp) -> usize {
        let needed = max_time
            .as_millis()
            .checked_sub(min_time.as_millis())
            .and_then(|span| (span / self.step_ms).checked_add(1))
            .and_then(|ticks| usize::try_from(ticks).ok());
        match needed {
            Some(ticks) if ticks <= self.max_frames => ticks,
            _ => {
                self.logger.warn(&format!(
                    "capture span {} .. {} exceeds {} frames at step {}ms; truncating",
                    min_time, max_time, self.max_frames, self.step_ms
                ));
                self.max_frames
            }
        }
    }
}

/// Index into ascending `times` of the capture time closest to `tick`.
///
/// Equal distances resolve to the earlier position in sorted order, and a
/// run of identical capture times resolves to its first member.
pub fn nearest_reading(times: &[Timestamp], tick: Timestamp) -> Option<usize> {
    let last = times.len().checked_sub(1)?;
    let after = times.partition_point(|time| *time < tick);
    let first_of_run = |index: usize| times.partition_point(|time| *time < times[index]);

    if after == 0 {
        return Some(0);
    }
    if after > last {
        return Some(first_of_run(last));
    }
    let before = after - 1;
    if tick - times[before] <= times[after] - tick {
        Some(first_of_run(before))
    } else {
        Some(after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::DetectionSample;
    use proptest::prelude::*;

    fn reading_at(millis: i64, obj_id: u64) -> Reading {
        let time = Timestamp::from_millis(millis);
        Reading::new(
            format!("r{millis}"),
            vec![DetectionSample::new(obj_id, millis as f32, 0.0, 1.0, 0.0, time)],
        )
    }

    fn linear_nearest(times: &[Timestamp], tick: Timestamp) -> Option<usize> {
        let mut best: Option<(usize, i64)> = None;
        for (index, time) in times.iter().enumerate() {
            let distance = (*time - tick).abs();
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((index, distance));
            }
        }
        best.map(|(index, _)| index)
    }

    #[test]
    fn frame_count_follows_span_and_step() {
        let readings = vec![reading_at(1_000, 1), reading_at(1_430, 2), reading_at(1_250, 3)];
        let frames = Resampler::new(100).resample(&readings);
        assert_eq!(frames.len(), 430 / 100 + 1);
        for (k, frame) in frames.iter().enumerate() {
            assert_eq!(frame.time.as_millis(), 1_000 + 100 * k as i64);
        }
    }

    #[test]
    fn equidistant_tick_takes_earlier_reading() {
        let readings = vec![reading_at(200, 2), reading_at(0, 1)];
        let frames = Resampler::new(100).resample(&readings);
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[1].points[0].obj_id, 1);
        assert_eq!(frames[1].source_time.as_millis(), 0);
        assert_eq!(frames[2].points[0].obj_id, 2);
    }

    #[test]
    fn identical_capture_times_keep_upload_order() {
        let readings = vec![reading_at(0, 7), reading_at(0, 8), reading_at(300, 9)];
        let frames = Resampler::new(100).resample(&readings);
        assert_eq!(frames[0].points[0].obj_id, 7);
        assert_eq!(frames[1].points[0].obj_id, 7);
        assert_eq!(frames[3].points[0].obj_id, 9);
    }

    #[test]
    fn empty_and_sampleless_readings_yield_no_frames() {
        let resampler = Resampler::new(100);
        assert!(resampler.resample(&[]).is_empty());
        assert!(resampler.resample(&[Reading::default()]).is_empty());
    }

    #[test]
    fn points_are_copied_verbatim() {
        let time = Timestamp::from_millis(0);
        let sample = DetectionSample::new(42, 3.5, -1.25, 12.0, 270.0, time)
            .with_lane(2)
            .with_dimensions(5.0, 1.8);
        let frames = Resampler::new(100).resample(&[Reading::new("only", vec![sample.clone()])]);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].points[0], PlotPoint::from(&sample));
    }

    #[test]
    fn extreme_capture_span_is_truncated_to_frame_cap() {
        let session = crate::session::Session::from_json(
            r#"{"objects": [
                {"name": "a", "rows_data": [
                    {"obj_id": 1, "point_x": 0, "point_y": 0, "time": -9223372036854775808}
                ]},
                {"name": "b", "rows_data": [
                    {"obj_id": 2, "point_x": 5, "point_y": 0, "time": 9223372036854775807}
                ]}
            ]}"#,
        )
        .unwrap();
        let frames = Resampler::new(100)
            .with_max_frames(50)
            .resample(&session.objects);
        assert_eq!(frames.len(), 50);
        assert_eq!(frames[0].time.as_millis(), i64::MIN);
        assert_eq!(frames[49].time.as_millis(), i64::MIN + 49 * 100);
        assert!(frames.iter().all(|frame| frame.points[0].obj_id == 1));
    }

    #[test]
    fn mixed_epoch_and_iso_times_stay_within_default_cap() {
        let readings = vec![reading_at(0, 1), reading_at(1_742_480_400_000, 2)];
        let frames = Resampler::new(100).resample(&readings);
        assert_eq!(frames.len(), DEFAULT_MAX_FRAMES);
    }

    #[test]
    fn non_positive_step_is_clamped() {
        assert_eq!(Resampler::new(0).step_ms(), 1);
    }

    proptest! {
        #[test]
        fn indexed_lookup_matches_linear_scan(
            raw in proptest::collection::vec(0i64..2_000, 1..40),
            tick in -100i64..2_100,
        ) {
            let mut raw = raw;
            raw.sort_unstable();
            let times: Vec<Timestamp> = raw.into_iter().map(Timestamp::from_millis).collect();
            let tick = Timestamp::from_millis(tick);
            prop_assert_eq!(nearest_reading(&times, tick), linear_nearest(&times, tick));
        }
    }
}
