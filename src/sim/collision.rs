//! Collision detection and response
//!
//! Player vs the platform catalog (landing rule with a baseline fallback),
//! projectiles vs opposing-faction entities, and player vs enemy contact.
//! Everything here is a pure function of current positions; the only state
//! produced is the transient hit list handed back to the caller.

use super::entity::Entity;
use super::geom::Rect;
use super::level::Level;
use super::projectile::ProjectileSystem;
use crate::consts::{HURT_INVULNERABILITY, KNOCKBACK_DISTANCE, KNOCKBACK_SPEED};
use crate::settings::PhysicsTuning;

/// What an entity is standing on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Support {
    /// Index into the platform catalog (iteration order)
    Platform(usize),
    /// The implicit full-width ground line
    Baseline,
}

/// Result of resolving an entity against the level geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Landing {
    pub support: Support,
    /// The entity was airborne before this resolve
    pub touched_down: bool,
}

/// Landing rule for a single platform.
///
/// Accepted when the entity is falling or resting, its bottom edge sits within
/// the tolerance window around the platform top (the window also covers the
/// distance fallen this frame, so a fast fall cannot tunnel through), and the
/// horizontal overlap exceeds the edge margin.
pub fn accepts_landing(body: &Rect, vy: f32, dt: f32, top_rect: &Rect, tuning: &PhysicsTuning) -> bool {
    if vy < 0.0 {
        return false;
    }
    let top = top_rect.top();
    let bottom = body.bottom();
    let prev_bottom = bottom - vy * dt.max(0.0);
    let within_window =
        bottom >= top - tuning.landing_tolerance && prev_bottom <= top + tuning.landing_tolerance;
    within_window && body.horizontal_overlap(top_rect) > tuning.edge_margin
}

/// First accepted support in catalog order, falling back to the baseline
pub fn find_support(entity: &Entity, level: &Level, dt: f32, tuning: &PhysicsTuning) -> Option<Support> {
    let body = entity.rect();
    let vy = entity.vel.y;
    // Overlapping candidates: the first one in authoring order wins
    if let Some(index) = level
        .catalog
        .iter()
        .position(|p| accepts_landing(&body, vy, dt, &p.rect, tuning))
    {
        return Some(Support::Platform(index));
    }

    let bottom = body.bottom();
    let on_or_below = vy >= 0.0 && bottom >= level.baseline - tuning.landing_tolerance;
    if on_or_below || bottom > level.baseline {
        return Some(Support::Baseline);
    }
    None
}

fn support_top(level: &Level, support: Support) -> f32 {
    match support {
        Support::Platform(index) => level
            .catalog
            .iter()
            .nth(index)
            .map(|p| p.rect.top())
            .unwrap_or(level.baseline),
        Support::Baseline => level.baseline,
    }
}

/// Re-derive `on_ground` from the landing rule. On acceptance the entity's
/// bottom is snapped to the support top and `vy` is zeroed.
pub fn resolve_platforms(
    entity: &mut Entity,
    level: &Level,
    dt: f32,
    tuning: &PhysicsTuning,
) -> Option<Landing> {
    let was_on_ground = entity.on_ground;
    match find_support(entity, level, dt, tuning) {
        Some(support) => {
            entity.pos.y = support_top(level, support) - entity.size.y;
            entity.vel.y = 0.0;
            entity.on_ground = true;
            Some(Landing {
                support,
                touched_down: !was_on_ground,
            })
        }
        None => {
            entity.on_ground = false;
            None
        }
    }
}

/// Horizontal support check for a grounded entity that just moved sideways.
/// Clears `on_ground` when nothing is under the new horizontal extent.
/// Returns true if support was lost.
pub fn recheck_support(entity: &mut Entity, level: &Level, tuning: &PhysicsTuning) -> bool {
    if !entity.on_ground {
        return false;
    }
    let body = entity.rect();
    let bottom = body.bottom();
    let touching = |top: f32| (bottom - top).abs() <= tuning.landing_tolerance;

    let on_platform = level
        .catalog
        .iter()
        .any(|p| touching(p.rect.top()) && body.horizontal_overlap(&p.rect) > tuning.edge_margin);
    if on_platform || touching(level.baseline) || bottom > level.baseline {
        return false;
    }
    entity.on_ground = false;
    true
}

/// A projectile hit registered this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub projectile_id: u32,
    pub target_id: u32,
    pub damage: i32,
    pub defeated: bool,
}

/// Test each active projectile against living targets of the opposing faction.
/// A projectile stops at its first overlap: damage is applied, the projectile
/// is deactivated, and later targets are not tested. `adjust` scales the
/// damage before it is applied.
pub fn resolve_projectile_hits(
    projectiles: &mut ProjectileSystem,
    targets: &mut [Entity],
    adjust: impl Fn(i32) -> i32,
) -> Vec<Hit> {
    let mut hits = Vec::new();
    for projectile in projectiles.iter_mut() {
        let target = targets.iter_mut().find(|t| {
            t.is_alive()
                && projectile.owner_faction.opposes(t.faction)
                && projectile.rect.overlaps(&t.rect())
        });
        if let Some(target) = target {
            let damage = adjust(projectile.damage);
            let defeated = target.take_damage(damage);
            projectile.active = false;
            hits.push(Hit {
                projectile_id: projectile.id,
                target_id: target.id,
                damage,
                defeated,
            });
        }
    }
    hits
}

/// Contact damage taken by the player this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactHit {
    pub enemy_id: u32,
    pub damage: i32,
    pub defeated: bool,
}

/// Player vs living enemies. At most one contact hit per invulnerability window.
/// Knockback never pushes the player outside `[0, world_width - width]`.
pub fn resolve_contact(
    player: &mut Entity,
    enemies: &[Entity],
    world_width: f32,
    adjust: impl Fn(i32) -> i32,
) -> Option<ContactHit> {
    if !player.is_alive() || player.invulnerable > 0.0 {
        return None;
    }
    let body = player.rect();
    let enemy = enemies
        .iter()
        .find(|e| e.is_alive() && e.contact_damage > 0 && body.overlaps(&e.rect()))?;

    let damage = adjust(enemy.contact_damage);
    let defeated = player.take_damage(damage);
    player.invulnerable = HURT_INVULNERABILITY;

    // Knock the player away from the enemy with a small hop
    let away = if player.center().x < enemy.center().x { -1.0 } else { 1.0 };
    let max_x = (world_width - player.size.x).max(0.0);
    player.pos.x = (player.pos.x + away * KNOCKBACK_DISTANCE).clamp(0.0, max_x);
    player.vel.y = -KNOCKBACK_SPEED;
    player.on_ground = false;

    Some(ContactHit {
        enemy_id: enemy.id,
        damage,
        defeated,
    })
}
