use std::sync::Mutex;

/// Counters shared by the pipeline and the scene renderer.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metrics {
    pub frames_built: usize,
    pub scenes_rendered: usize,
    pub draw_failures: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    pub fn record_frames(&self, count: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.frames_built += count;
        }
    }

    pub fn record_scene(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.scenes_rendered += 1;
        }
    }

    pub fn record_draw_failure(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.draw_failures += 1;
        }
    }

    pub fn snapshot(&self) -> Metrics {
        self.inner
            .lock()
            .map(|metrics| *metrics)
            .unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let recorder = MetricsRecorder::new();
        recorder.record_frames(12);
        recorder.record_scene();
        recorder.record_draw_failure();
        recorder.record_draw_failure();
        assert_eq!(
            recorder.snapshot(),
            Metrics {
                frames_built: 12,
                scenes_rendered: 1,
                draw_failures: 2,
            }
        );
    }
}
