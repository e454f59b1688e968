//! Ridgeline - A side-scrolling platformer simulation core
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (physics, collisions, projectiles, camera, game state)
//! - `audio`: Fire-and-forget audio cue boundary
//! - `clock`: Frame-rate limiter for the frame loop
//! - `settings`: Data-driven tuning and preferences

pub mod audio;
pub mod clock;
pub mod error;
pub mod settings;
pub mod sim;

pub use audio::{AudioCue, AudioSink};
pub use error::{LevelError, SimError};
pub use settings::{Difficulty, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Target frame rate for the frame limiter
    pub const TARGET_FPS: f32 = 60.0;
    /// Largest dt handed to the simulation (prevents spiral of death after a stall)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Player movement
    pub const GRAVITY: f32 = 1800.0; // pixels/s²
    pub const WALK_SPEED: f32 = 240.0; // pixels/s
    pub const JUMP_VELOCITY: f32 = -720.0; // pixels/s (negative = up)

    /// Vertical distance within which a bottom edge counts as touching a platform top
    pub const LANDING_TOLERANCE: f32 = 6.0;
    /// Horizontal overlap required before a platform can support an entity
    pub const EDGE_MARGIN: f32 = 4.0;

    /// Player body
    pub const PLAYER_WIDTH: f32 = 30.0;
    pub const PLAYER_HEIGHT: f32 = 48.0;
    pub const PLAYER_MAX_HEALTH: i32 = 5;
    /// Invulnerability window after taking contact damage (seconds)
    pub const HURT_INVULNERABILITY: f32 = 1.0;
    /// Upward hop speed applied on contact damage
    pub const KNOCKBACK_SPEED: f32 = 320.0;
    /// Horizontal push away from the enemy on contact damage
    pub const KNOCKBACK_DISTANCE: f32 = 16.0;

    /// Viewport defaults
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 600.0;
    /// Camera smoothing fraction per 60 Hz frame
    pub const CAMERA_SMOOTHING_H: f32 = 0.1;
    pub const CAMERA_SMOOTHING_V: f32 = 0.05;
    pub const CAMERA_VERTICAL_DEADZONE: f32 = 40.0;

    /// Projectiles are culled once this far outside the world rect
    pub const PROJECTILE_BOUNDS_MARGIN: f32 = 400.0;
    /// Gap between the owner's bounding box and a freshly spawned projectile
    pub const PROJECTILE_SPAWN_GAP: f32 = 2.0;

    /// Dialogue typing speed (characters per second)
    pub const REVEAL_RATE: f32 = 30.0;
    /// Extra reach around an interactable's rect for the interact action
    pub const INTERACT_RADIUS: f32 = 24.0;

    /// Maximum diagnostics retained by the frame loop
    pub const MAX_DIAGNOSTICS: usize = 64;
}

/// Frame-rate independent smoothing factor.
///
/// `fraction` is the share of the remaining distance covered in one 60 Hz
/// frame; the result covers the same share per unit time at any `dt`.
#[inline]
pub fn smoothing_alpha(fraction: f32, dt: f32) -> f32 {
    let fraction = fraction.clamp(0.0, 1.0);
    1.0 - (1.0 - fraction).powf(dt * consts::TARGET_FPS)
}

/// Clamp that tolerates an inverted range (returns `min` when `max < min`)
#[inline]
pub fn clamp_range(value: f32, min: f32, max: f32) -> f32 {
    if max < min {
        min
    } else {
        value.clamp(min, max)
    }
}

/// True when both components are finite
#[inline]
pub fn is_finite_vec(v: Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}
