//! Entity physics
//!
//! Gravity plus direct horizontal velocity for the controllable character,
//! and kinematic patrol for enemies. Integration is per-second, so results do
//! not depend on the frame rate.

use super::collision::{self, Landing};
use super::entity::{Entity, Facing};
use super::level::Level;
use crate::error::SimError;
use crate::is_finite_vec;
use crate::settings::PhysicsTuning;

/// Movement intent for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Intent {
    pub move_left: bool,
    pub move_right: bool,
    /// Jump was pressed this frame
    pub jump_pressed: bool,
}

impl Intent {
    /// -1, 0 or +1
    pub fn direction(&self) -> f32 {
        match (self.move_left, self.move_right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// What happened to the player during a step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub jumped: bool,
    /// Walked off a support this frame
    pub lost_support: bool,
    pub landing: Option<Landing>,
}

pub fn validate_dt(dt: f32) -> Result<(), SimError> {
    if dt.is_finite() && dt >= 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidTimestep { dt })
    }
}

/// Advance the player by `dt` and resolve it against the level.
///
/// On failure the entity is restored to its state before the call.
pub fn step_player(
    player: &mut Entity,
    intent: &Intent,
    dt: f32,
    level: &Level,
    tuning: &PhysicsTuning,
) -> Result<StepReport, SimError> {
    validate_dt(dt)?;
    let snapshot = (player.pos, player.vel, player.on_ground);
    let mut report = StepReport::default();

    // Horizontal: direct velocity from intent, no acceleration ramp
    let dir = intent.direction();
    player.vel.x = dir * tuning.walk_speed;
    if dir < 0.0 {
        player.facing = Facing::Left;
    } else if dir > 0.0 {
        player.facing = Facing::Right;
    }

    let old_x = player.pos.x;
    player.pos.x += player.vel.x * dt;
    let max_x = (level.width - player.size.x).max(0.0);
    player.pos.x = player.pos.x.clamp(0.0, max_x);

    // Walking off an edge drops support before gravity integrates
    if player.pos.x != old_x {
        report.lost_support = collision::recheck_support(player, level, tuning);
    }

    if intent.jump_pressed && player.on_ground {
        player.vel.y = tuning.jump_velocity;
        player.on_ground = false;
        report.jumped = true;
    }

    player.vel.y += tuning.gravity * dt;
    player.pos.y += player.vel.y * dt;

    if !is_finite_vec(player.pos) || !is_finite_vec(player.vel) {
        (player.pos, player.vel, player.on_ground) = snapshot;
        return Err(SimError::NonFiniteState { id: player.id });
    }

    report.landing = collision::resolve_platforms(player, level, dt, tuning);
    Ok(report)
}

/// Walk an enemy along its patrol, turning around at each bound
pub fn step_patrol(enemy: &mut Entity, dt: f32) {
    let Some(patrol) = enemy.patrol else {
        enemy.vel.x = 0.0;
        return;
    };
    let (min_x, max_x) = if patrol.min_x <= patrol.max_x {
        (patrol.min_x, patrol.max_x)
    } else {
        (patrol.max_x, patrol.min_x)
    };

    enemy.vel.x = patrol.speed * enemy.facing.sign();
    enemy.pos.x += enemy.vel.x * dt;
    if enemy.pos.x <= min_x {
        enemy.pos.x = min_x;
        enemy.facing = Facing::Right;
    } else if enemy.pos.x >= max_x {
        enemy.pos.x = max_x;
        enemy.facing = Facing::Left;
    }
}
