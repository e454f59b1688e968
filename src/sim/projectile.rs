//! Projectile system
//!
//! Short-lived horizontal shots (thrown stones, staff bolts). Projectiles are
//! spawned in front of their owner, advanced every frame, and culled in the
//! same frame they become inactive.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, Faction};
use super::geom::Rect;
use crate::consts::{PROJECTILE_BOUNDS_MARGIN, PROJECTILE_SPAWN_GAP};

/// Projectile types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectileKind {
    /// Thrown stone
    Stone,
    /// Magic staff bolt
    StaffBolt,
    /// Enemy spit / arrow
    EnemyShot,
}

/// Fixed per-kind parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindSpec {
    pub speed: f32,
    pub damage: i32,
    pub lifetime: f32,
    pub size: Vec2,
}

impl ProjectileKind {
    pub fn spec(&self) -> KindSpec {
        match self {
            ProjectileKind::Stone => KindSpec {
                speed: 420.0,
                damage: 1,
                lifetime: 1.2,
                size: Vec2::new(10.0, 10.0),
            },
            ProjectileKind::StaffBolt => KindSpec {
                speed: 560.0,
                damage: 2,
                lifetime: 3.0,
                size: Vec2::new(18.0, 8.0),
            },
            ProjectileKind::EnemyShot => KindSpec {
                speed: 260.0,
                damage: 1,
                lifetime: 2.5,
                size: Vec2::new(12.0, 6.0),
            },
        }
    }

    pub fn sprite(&self) -> &'static str {
        match self {
            ProjectileKind::Stone => "stone",
            ProjectileKind::StaffBolt => "staff_bolt",
            ProjectileKind::EnemyShot => "enemy_shot",
        }
    }
}

/// A projectile entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub kind: ProjectileKind,
    pub rect: Rect,
    pub velocity_x: f32,
    pub lifetime_remaining: f32,
    pub damage: i32,
    pub active: bool,
    pub owner_faction: Faction,
    pub owner_id: u32,
}

impl Projectile {
    /// Integrate position and lifetime; deactivate on expiry or leaving `bounds`
    pub fn advance(&mut self, dt: f32, bounds: &Rect) {
        if !self.active {
            return;
        }
        self.rect.x += self.velocity_x * dt;
        self.lifetime_remaining -= dt;
        if self.lifetime_remaining <= 0.0 || !self.rect.overlaps(bounds) {
            self.active = false;
        }
    }
}

/// Outcome of a spawn request. Refusals are normal gameplay, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum FireOutcome {
    Spawned { id: u32 },
    OnCooldown,
    NotCapable,
}

impl FireOutcome {
    pub fn spawned(&self) -> bool {
        matches!(self, FireOutcome::Spawned { .. })
    }
}

/// Owns every live projectile for the level
#[derive(Debug, Clone)]
pub struct ProjectileSystem {
    projectiles: Vec<Projectile>,
    /// Culling bounds (world rect grown by a generous margin)
    bounds: Rect,
    next_id: u32,
}

impl ProjectileSystem {
    pub fn new(bounds: Rect) -> Self {
        Self {
            projectiles: Vec::new(),
            bounds,
            next_id: 1,
        }
    }

    /// Culling bounds for a world of the given size
    pub fn for_world(width: f32, height: f32) -> Self {
        Self::new(Rect::new(0.0, 0.0, width, height).inflate(PROJECTILE_BOUNDS_MARGIN))
    }

    /// Fire `kind` from `owner`. Honors the owner's cooldown and capability set;
    /// on success the owner's cooldown is restarted.
    pub fn spawn(&mut self, kind: ProjectileKind, owner: &mut Entity) -> FireOutcome {
        let Some(cooldown) = owner.ranged_cooldown(kind) else {
            log::debug!("entity {} cannot fire {:?}", owner.id, kind);
            return FireOutcome::NotCapable;
        };
        if owner.fire_cooldown > 0.0 {
            log::debug!(
                "entity {} fire refused, {:.2}s cooldown left",
                owner.id,
                owner.fire_cooldown
            );
            return FireOutcome::OnCooldown;
        }

        let spec = kind.spec();
        let body = owner.rect();
        let sign = owner.facing.sign();
        // In front of the owner, vertically centered on the body
        let x = if sign > 0.0 {
            body.right() + PROJECTILE_SPAWN_GAP
        } else {
            body.left() - PROJECTILE_SPAWN_GAP - spec.size.x
        };
        let y = body.center().y - spec.size.y * 0.5;

        let id = self.next_id;
        self.next_id += 1;
        self.projectiles.push(Projectile {
            id,
            kind,
            rect: Rect::new(x, y, spec.size.x, spec.size.y),
            velocity_x: spec.speed * sign,
            lifetime_remaining: spec.lifetime,
            damage: spec.damage,
            active: true,
            owner_faction: owner.faction,
            owner_id: owner.id,
        });
        owner.fire_cooldown = cooldown;
        FireOutcome::Spawned { id }
    }

    /// Advance every active projectile by `dt`
    pub fn advance_all(&mut self, dt: f32) {
        let bounds = self.bounds;
        for p in &mut self.projectiles {
            p.advance(dt, &bounds);
        }
    }

    /// Drop inactive projectiles; returns how many were removed
    pub fn cull_inactive(&mut self) -> usize {
        let before = self.projectiles.len();
        self.projectiles.retain(|p| p.active);
        before - self.projectiles.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter().filter(|p| p.active)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Projectile> {
        self.projectiles.iter_mut().filter(|p| p.active)
    }

    pub fn get(&self, id: u32) -> Option<&Projectile> {
        self.projectiles.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }
}
