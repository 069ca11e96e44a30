//! Time management utilities
//!
//! Gameplay timers are stepped explicitly with the frame delta so a whole
//! simulation can be replayed deterministically. Wall-clock measurement is
//! only used for frame statistics.

use std::time::Instant;

/// Countdown stepped by the simulation clock
///
/// A countdown is "running" while it has time left. Starting it again simply
/// overwrites the remaining time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Countdown {
    remaining: f32,
    duration: f32,
}

impl Countdown {
    /// Create an idle countdown
    pub const fn idle() -> Self {
        Self { remaining: 0.0, duration: 0.0 }
    }

    /// Create a countdown that is already running
    pub fn started(duration: f32) -> Self {
        let mut countdown = Self::idle();
        countdown.start(duration);
        countdown
    }

    /// Start (or restart) the countdown
    pub fn start(&mut self, duration: f32) {
        let duration = duration.max(0.0);
        self.remaining = duration;
        self.duration = duration;
    }

    /// Stop the countdown immediately
    pub fn cancel(&mut self) {
        self.remaining = 0.0;
    }

    /// Advance by `delta_time` seconds.
    ///
    /// Returns `true` only on the tick where the countdown reaches zero.
    pub fn tick(&mut self, delta_time: f32) -> bool {
        if self.remaining <= 0.0 {
            return false;
        }
        self.remaining = (self.remaining - delta_time).max(0.0);
        self.remaining <= 0.0
    }

    /// Whether time is left
    pub fn is_running(&self) -> bool {
        self.remaining > 0.0
    }

    /// Remaining time in seconds
    pub const fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Duration the countdown was last started with
    pub const fn duration(&self) -> f32 {
        self.duration
    }

    /// Elapsed fraction in `0.0..=1.0` (1.0 when idle)
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            1.0 - self.remaining / self.duration
        }
    }
}

/// Wall-clock frame statistics
pub struct FrameTimer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTimer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Update the timer (should be called once per frame)
    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Get the time since the last frame in seconds
    pub const fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    pub const fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average frames per second since timer creation
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_countdown_fires_once() {
        let mut countdown = Countdown::started(0.1);
        assert!(!countdown.tick(0.05));
        assert!(countdown.tick(0.05));
        assert!(!countdown.tick(0.05));
        assert!(!countdown.is_running());
    }

    #[test]
    fn test_countdown_restart_overwrites() {
        let mut countdown = Countdown::started(1.0);
        countdown.tick(0.5);
        countdown.start(0.2);
        assert_relative_eq!(countdown.remaining(), 0.2);
        assert_relative_eq!(countdown.duration(), 0.2);
    }

    #[test]
    fn test_countdown_progress() {
        let mut countdown = Countdown::started(2.0);
        countdown.tick(0.5);
        assert_relative_eq!(countdown.progress(), 0.25);
        assert_relative_eq!(Countdown::idle().progress(), 1.0);
    }

    #[test]
    fn test_frame_timer_counts_frames() {
        let mut timer = FrameTimer::new();
        timer.update();
        timer.update();
        assert_eq!(timer.frame_count(), 2);
        assert!(timer.total_time() >= 0.0);
    }
}
