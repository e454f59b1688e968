//! Camera follow controller
//!
//! Computes the world-to-screen offset from the player's position with
//! independent horizontal/vertical smoothing and a vertical deadzone.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::CameraTuning;
use crate::{clamp_range, smoothing_alpha};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Current offset (top-left of the view in world space)
    pub x: f32,
    pub y: f32,
    pub target_x: f32,
    pub target_y: f32,
    pub smoothing_h: f32,
    pub smoothing_v: f32,
    pub vertical_deadzone: f32,
    pub viewport: Vec2,
    world_width: f32,
    min_y: f32,
    max_y: f32,
}

impl Camera {
    pub fn new(tuning: &CameraTuning, world_width: f32, y_range: (f32, f32)) -> Self {
        Self {
            x: 0.0,
            y: y_range.0,
            target_x: 0.0,
            target_y: y_range.0,
            smoothing_h: tuning.smoothing_h,
            smoothing_v: tuning.smoothing_v,
            vertical_deadzone: tuning.vertical_deadzone.max(0.0),
            viewport: Vec2::new(tuning.viewport_width, tuning.viewport_height),
            world_width,
            min_y: y_range.0,
            max_y: y_range.1.max(y_range.0),
        }
    }

    /// Largest horizontal offset (0 when the world is narrower than the view)
    pub fn max_x(&self) -> f32 {
        (self.world_width - self.viewport.x).max(0.0)
    }

    pub fn y_range(&self) -> (f32, f32) {
        (self.min_y, self.max_y)
    }

    fn targets_for(&self, focus: Vec2) -> (f32, f32) {
        (
            focus.x - self.viewport.x * 0.5,
            focus.y - self.viewport.y * 0.5,
        )
    }

    /// Jump straight to `focus` (level start, respawn)
    pub fn snap_to(&mut self, focus: Vec2) {
        let (tx, ty) = self.targets_for(focus);
        self.target_x = tx;
        self.target_y = ty;
        self.x = clamp_range(tx, 0.0, self.max_x());
        self.y = clamp_range(ty, self.min_y, self.max_y);
    }

    /// Follow `focus` (player center) and return the new offset
    pub fn update(&mut self, focus: Vec2, dt: f32) -> Vec2 {
        let (tx, ty) = self.targets_for(focus);
        self.target_x = tx;
        self.target_y = ty;

        self.x += (tx - self.x) * smoothing_alpha(self.smoothing_h, dt);

        // Small vertical jitter inside the deadzone is ignored
        if (ty - self.y).abs() > self.vertical_deadzone {
            self.y += (ty - self.y) * smoothing_alpha(self.smoothing_v, dt);
        }

        self.x = clamp_range(self.x, 0.0, self.max_x());
        self.y = clamp_range(self.y, self.min_y, self.max_y);
        self.offset()
    }

    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// World position to screen position
    pub fn world_to_screen(&self, p: Vec2) -> Vec2 {
        p - self.offset()
    }
}
