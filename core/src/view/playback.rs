use std::time::{Duration, Instant};

use crate::telemetry::log::LogManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing { last_advance: Instant },
}

/// Result of feeding one refresh tick to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing; nothing changed.
    Idle,
    /// Playing, but the cadence has not elapsed yet.
    Waiting,
    Advanced(usize),
    /// The last frame was passed: playback stopped and rewound to 0.
    Finished,
}

/// Stopped/playing state machine advancing the frame index at a fixed
/// wall-clock cadence.
pub struct PlaybackController {
    state: PlaybackState,
    current_index: usize,
    frame_count: usize,
    cadence: Duration,
    logger: LogManager,
}

impl PlaybackController {
    pub fn new(cadence: Duration) -> Self {
        Self {
            state: PlaybackState::Stopped,
            current_index: 0,
            frame_count: 0,
            cadence,
            logger: LogManager::new("playback"),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.state, PlaybackState::Playing { .. })
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn cadence(&self) -> Duration {
        self.cadence
    }

    /// Adopts a new frame sequence length, keeping the index in range.
    pub fn set_frame_count(&mut self, frame_count: usize) {
        self.frame_count = frame_count;
        if frame_count == 0 {
            self.current_index = 0;
            self.stop();
        } else if self.current_index >= frame_count {
            self.current_index = frame_count - 1;
        }
    }

    /// Starts playback; refused when there is nothing to play.
    pub fn play(&mut self, now: Instant) -> bool {
        if self.frame_count == 0 {
            self.logger.detail("play ignored: no frames");
            return false;
        }
        if !self.is_playing() {
            self.state = PlaybackState::Playing { last_advance: now };
            self.logger
                .detail(&format!("playing from frame {}", self.current_index));
        }
        true
    }

    /// Stops playback, leaving the index where it is. Any refresh tick that
    /// arrives afterwards is ignored.
    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
    }

    /// Play/pause toggle. Returns whether playback is running afterwards.
    pub fn toggle(&mut self, now: Instant) -> bool {
        if self.is_playing() {
            self.stop();
            false
        } else {
            self.play(now)
        }
    }

    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        let PlaybackState::Playing { last_advance } = self.state else {
            return TickOutcome::Idle;
        };
        if now.saturating_duration_since(last_advance) < self.cadence {
            return TickOutcome::Waiting;
        }

        let next = self.current_index + 1;
        if next >= self.frame_count {
            self.state = PlaybackState::Stopped;
            self.current_index = 0;
            self.logger.detail("reached last frame; rewound to start");
            return TickOutcome::Finished;
        }
        self.current_index = next;
        self.state = PlaybackState::Playing { last_advance: now };
        TickOutcome::Advanced(next)
    }

    /// Jumps to `index` (clamped to the sequence) and stops playback.
    pub fn scrub(&mut self, index: usize) {
        self.stop();
        self.current_index = index.min(self.frame_count.saturating_sub(1));
    }

    /// Rewinds to the first frame without touching the play state.
    pub fn reset(&mut self) {
        self.current_index = 0;
    }
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new(Duration::from_millis(crate::prelude::DEFAULT_CADENCE_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(frames: usize) -> PlaybackController {
        let mut controller = PlaybackController::default();
        controller.set_frame_count(frames);
        controller
    }

    #[test]
    fn plays_to_the_end_then_stops_at_zero() {
        let start = Instant::now();
        let mut playback = controller(5);
        assert!(playback.toggle(start));

        let mut advanced = Vec::new();
        let mut outcome = TickOutcome::Waiting;
        for step in 1..=40u64 {
            outcome = playback.tick(start + Duration::from_millis(step * 16));
            if let TickOutcome::Advanced(index) = outcome {
                advanced.push(index);
            }
            if outcome == TickOutcome::Finished {
                break;
            }
        }
        assert_eq!(advanced, vec![1, 2, 3, 4]);
        assert_eq!(outcome, TickOutcome::Finished);
        assert!(!playback.is_playing());
        assert_eq!(playback.current_index(), 0);
    }

    #[test]
    fn cadence_is_measured_from_last_advance() {
        let start = Instant::now();
        let mut playback = controller(10);
        playback.play(start);
        assert_eq!(playback.tick(start + Duration::from_millis(99)), TickOutcome::Waiting);
        assert_eq!(
            playback.tick(start + Duration::from_millis(130)),
            TickOutcome::Advanced(1)
        );
        assert_eq!(playback.tick(start + Duration::from_millis(200)), TickOutcome::Waiting);
        assert_eq!(
            playback.tick(start + Duration::from_millis(230)),
            TickOutcome::Advanced(2)
        );
    }

    #[test]
    fn a_long_stall_advances_a_single_frame() {
        let start = Instant::now();
        let mut playback = controller(10);
        playback.play(start);
        assert_eq!(
            playback.tick(start + Duration::from_secs(3)),
            TickOutcome::Advanced(1)
        );
    }

    #[test]
    fn scrub_while_playing_stops_at_exact_index() {
        let start = Instant::now();
        let mut playback = controller(8);
        playback.play(start);
        playback.scrub(6);
        assert!(!playback.is_playing());
        assert_eq!(playback.current_index(), 6);
        playback.scrub(50);
        assert_eq!(playback.current_index(), 7);
    }

    #[test]
    fn ticks_after_stop_are_ignored() {
        let start = Instant::now();
        let mut playback = controller(8);
        playback.play(start);
        playback.toggle(start);
        assert_eq!(playback.tick(start + Duration::from_secs(1)), TickOutcome::Idle);
        assert_eq!(playback.current_index(), 0);
    }

    #[test]
    fn reset_keeps_play_state() {
        let start = Instant::now();
        let mut playback = controller(8);
        playback.scrub(4);
        playback.play(start);
        playback.reset();
        assert!(playback.is_playing());
        assert_eq!(playback.current_index(), 0);
    }

    #[test]
    fn empty_sequence_refuses_to_play() {
        let mut playback = controller(0);
        assert!(!playback.toggle(Instant::now()));
        assert_eq!(playback.state(), PlaybackState::Stopped);
    }

    #[test]
    fn shrinking_sequence_clamps_index() {
        let mut playback = controller(10);
        playback.scrub(9);
        playback.set_frame_count(4);
        assert_eq!(playback.current_index(), 3);
        playback.set_frame_count(0);
        assert_eq!(playback.current_index(), 0);
    }
}
