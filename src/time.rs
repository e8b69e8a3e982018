//! Frame clock.
//!
//! The shading stage only needs a monotonically increasing elapsed time. The
//! delta and FPS values are kept for the control panel readout.

use std::time::{Duration, Instant};

/// Time tracking for the frame loop.
#[derive(Debug)]
pub struct Time {
    /// When the first frame was seen. `None` until the first `update`.
    start: Option<Instant>,
    /// When the last frame occurred.
    last_frame: Option<Instant>,
    /// Total elapsed time in seconds (cached for fast access).
    elapsed_secs: f32,
    /// Time since last frame in seconds.
    delta_secs: f32,
    /// Total frames since start.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Time of last FPS calculation.
    fps_update_time: Option<Instant>,
    /// How often to update FPS calculation.
    fps_update_interval: Duration,
}

impl Time {
    pub fn new() -> Self {
        Self {
            start: None,
            last_frame: None,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: None,
            fps_update_interval: Duration::from_millis(500),
        }
    }

    /// Update timing values. Call once per frame.
    ///
    /// Returns `(elapsed_time, delta_time)` for convenience.
    pub fn update(&mut self) -> (f32, f32) {
        self.update_at(Instant::now())
    }

    /// Same as [`update`](Self::update) with an explicit timestamp.
    ///
    /// Timestamps earlier than the previous frame count as a zero delta, so
    /// elapsed time never goes backwards.
    pub fn update_at(&mut self, now: Instant) -> (f32, f32) {
        let start = *self.start.get_or_insert(now);
        let last = self.last_frame.unwrap_or(now);
        let fps_since = *self.fps_update_time.get_or_insert(now);

        self.delta_secs = now.saturating_duration_since(last).as_secs_f32();
        self.elapsed_secs = self
            .elapsed_secs
            .max(now.saturating_duration_since(start).as_secs_f32());
        self.last_frame = Some(last.max(now));
        self.frame_count += 1;

        let fps_elapsed = now.saturating_duration_since(fps_since);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = Some(now);
        }

        (self.elapsed_secs, self.delta_secs)
    }

    /// Total elapsed time in seconds since the first frame.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Time since last frame in seconds (delta time).
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Calculated frames per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_new() {
        let time = Time::new();
        assert_eq!(time.frame(), 0);
        assert_eq!(time.elapsed(), 0.0);
    }

    #[test]
    fn test_first_frame_starts_at_zero() {
        let mut time = Time::new();
        let t0 = Instant::now();
        let (elapsed, delta) = time.update_at(t0);
        assert_eq!(elapsed, 0.0);
        assert_eq!(delta, 0.0);
        assert_eq!(time.frame(), 1);
    }

    #[test]
    fn test_elapsed_monotonic() {
        let mut time = Time::new();
        let t0 = Instant::now();
        time.update_at(t0);

        let (e1, d1) = time.update_at(t0 + Duration::from_millis(100));
        assert!((e1 - 0.1).abs() < 1e-4);
        assert!((d1 - 0.1).abs() < 1e-4);

        // Out-of-order timestamp does not rewind the clock
        let (e2, d2) = time.update_at(t0 + Duration::from_millis(50));
        assert_eq!(e2, e1);
        assert_eq!(d2, 0.0);
    }

    #[test]
    fn test_fps_estimate() {
        let mut time = Time::new();
        let t0 = Instant::now();
        time.update_at(t0);
        for i in 1..=60 {
            time.update_at(t0 + Duration::from_micros(i * 16_667));
        }
        assert!((time.fps() - 60.0).abs() < 2.0);
    }
}
