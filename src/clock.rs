//! Frame-rate limiter
//!
//! Produces the measured inter-frame `dt` for the simulation and sleeps out
//! the rest of each frame to hold the target rate.

use std::time::{Duration, Instant};

use crate::consts::{MAX_FRAME_DT, TARGET_FPS};

#[derive(Debug)]
pub struct FrameLimiter {
    target: Duration,
    last: Instant,
    // FPS tracking over the last 60 frames
    frame_times: [f32; 60],
    frame_index: usize,
    frames: u64,
}

impl Default for FrameLimiter {
    fn default() -> Self {
        Self::new(TARGET_FPS)
    }
}

impl FrameLimiter {
    pub fn new(target_fps: f32) -> Self {
        // Tiny rates overflow the period to infinity
        let period = 1.0 / target_fps;
        let period = if target_fps.is_finite() && target_fps > 0.0 && period.is_finite() {
            period
        } else {
            1.0 / TARGET_FPS
        };
        Self {
            target: Duration::from_secs_f32(period),
            last: Instant::now(),
            frame_times: [0.0; 60],
            frame_index: 0,
            frames: 0,
        }
    }

    /// Block until the next frame is due and return the measured dt (seconds)
    pub fn wait_next(&mut self) -> f32 {
        let elapsed = self.last.elapsed();
        if elapsed < self.target {
            std::thread::sleep(self.target - elapsed);
        }
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        self.record(dt);
        clamp_dt(dt)
    }

    fn record(&mut self, dt: f32) {
        self.frame_times[self.frame_index] = dt;
        self.frame_index = (self.frame_index + 1) % self.frame_times.len();
        self.frames += 1;
    }

    /// Average frames per second over the recorded window
    pub fn fps(&self) -> f32 {
        let count = (self.frames as usize).min(self.frame_times.len());
        if count == 0 {
            return 0.0;
        }
        let total: f32 = self.frame_times[..count].iter().sum();
        if total > 0.0 { count as f32 / total } else { 0.0 }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// Clamp a measured dt into the range the simulation accepts
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_DT)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_dt() {
        assert_eq!(clamp_dt(0.5), MAX_FRAME_DT);
        assert_eq!(clamp_dt(-1.0), 0.0);
        assert_eq!(clamp_dt(f32::NAN), 0.0);
        assert_eq!(clamp_dt(0.016), 0.016);
    }

    #[test]
    fn test_bad_target_falls_back_to_default_rate() {
        let default = FrameLimiter::default().target;
        for fps in [0.0, -30.0, f32::NAN, f32::INFINITY, 1e-39] {
            assert_eq!(FrameLimiter::new(fps).target, default);
        }
    }

    #[test]
    fn test_wait_next_holds_target_rate() {
        let mut limiter = FrameLimiter::new(200.0);
        let dt = limiter.wait_next();
        assert!(dt >= 0.004);
        assert!(dt <= MAX_FRAME_DT);
        assert_eq!(limiter.frames(), 1);
        assert!(limiter.fps() > 0.0);
    }
}
