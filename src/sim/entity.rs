//! Entities (player and enemies), transient buffs and capabilities

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use super::projectile::ProjectileKind;

/// Horizontal facing direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// +1 for right, -1 for left
    #[inline]
    pub fn sign(&self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn flipped(&self) -> Facing {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

/// Side an entity (or its projectiles) fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    Player,
    Enemy,
}

impl Faction {
    pub fn opposes(&self, other: Faction) -> bool {
        *self != other
    }
}

/// Buff types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuffKind {
    /// Raises effective max health by `magnitude`
    MaxHealthBoost,
    /// Grants the staff bolt ranged attack
    RangedAttack,
}

/// A timed modifier. Alters derived stats only, never base stats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Buff {
    pub kind: BuffKind,
    /// Seconds left before expiry
    pub remaining: f32,
    pub magnitude: f32,
}

/// Something an entity can do, checked by presence in its set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// May fire `kind`, at most once per `cooldown` seconds
    FireRanged { kind: ProjectileKind, cooldown: f32 },
}

/// Staff bolt cooldown while the ranged-attack buff is active
pub const STAFF_COOLDOWN: f32 = 0.45;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Capabilities(Vec<Capability>);

impl Capabilities {
    pub fn grant(&mut self, cap: Capability) {
        if !self.0.contains(&cap) {
            self.0.push(cap);
        }
    }

    /// Cooldown of the fire capability for `kind`, if present
    pub fn fire_cooldown(&self, kind: ProjectileKind) -> Option<f32> {
        self.0.iter().find_map(|cap| match *cap {
            Capability::FireRanged { kind: k, cooldown } if k == kind => Some(cooldown),
            _ => None,
        })
    }
}

/// Horizontal patrol between two x bounds (left edge of the body)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Patrol {
    pub min_x: f32,
    pub max_x: f32,
    pub speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityRole {
    Player,
    Enemy,
}

/// A player or enemy body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub role: EntityRole,
    pub faction: Faction,
    /// Sprite tag for the renderer
    pub sprite: String,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub on_ground: bool,
    pub health: i32,
    /// Base max health (buffs never change this)
    pub max_health: i32,
    pub facing: Facing,
    pub buffs: Vec<Buff>,
    pub capabilities: Capabilities,
    /// Seconds until the next ranged spawn is allowed
    pub fire_cooldown: f32,
    /// Seconds of remaining invulnerability after a contact hit
    pub invulnerable: f32,
    /// Damage dealt to the opposing faction on touch
    pub contact_damage: i32,
    pub patrol: Option<Patrol>,
    pub defeated: bool,
}

impl Entity {
    pub fn new(id: u32, role: EntityRole, pos: Vec2, size: Vec2, max_health: i32) -> Self {
        let faction = match role {
            EntityRole::Player => Faction::Player,
            EntityRole::Enemy => Faction::Enemy,
        };
        Self {
            id,
            role,
            faction,
            sprite: match role {
                EntityRole::Player => "player".to_string(),
                EntityRole::Enemy => "enemy".to_string(),
            },
            pos,
            size,
            vel: Vec2::ZERO,
            on_ground: false,
            health: max_health,
            max_health,
            facing: Facing::Right,
            buffs: Vec::new(),
            capabilities: Capabilities::default(),
            fire_cooldown: 0.0,
            invulnerable: 0.0,
            contact_damage: 0,
            patrol: None,
            defeated: false,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn is_alive(&self) -> bool {
        !self.defeated && self.health > 0
    }

    /// Max health including active buffs
    pub fn effective_max_health(&self) -> i32 {
        let bonus: f32 = self
            .buffs
            .iter()
            .filter(|b| b.kind == BuffKind::MaxHealthBoost)
            .map(|b| b.magnitude)
            .sum();
        self.max_health + bonus.round() as i32
    }

    pub fn has_buff(&self, kind: BuffKind) -> bool {
        self.buffs.iter().any(|b| b.kind == kind)
    }

    /// Apply a buff. Re-applying a kind refreshes its timer and keeps the
    /// larger magnitude.
    pub fn apply_buff(&mut self, kind: BuffKind, duration: f32, magnitude: f32) {
        let before = self.effective_max_health();
        if let Some(existing) = self.buffs.iter_mut().find(|b| b.kind == kind) {
            existing.remaining = existing.remaining.max(duration);
            existing.magnitude = existing.magnitude.max(magnitude);
        } else {
            self.buffs.push(Buff {
                kind,
                remaining: duration,
                magnitude,
            });
        }
        if kind == BuffKind::MaxHealthBoost {
            // Heal by however much the ceiling rose
            let gained = self.effective_max_health() - before;
            self.health = (self.health + gained.max(0)).min(self.effective_max_health());
        }
    }

    /// Count buffs down; returns the kinds that expired this call.
    /// Current health is clamped to the lowered ceiling on expiry.
    pub fn tick_buffs(&mut self, dt: f32) -> Vec<BuffKind> {
        let mut expired = Vec::new();
        for buff in &mut self.buffs {
            buff.remaining -= dt;
            if buff.remaining <= 0.0 {
                expired.push(buff.kind);
            }
        }
        if !expired.is_empty() {
            self.buffs.retain(|b| b.remaining > 0.0);
            self.health = self.health.min(self.effective_max_health());
        }
        expired
    }

    /// Count down fire cooldown and invulnerability
    pub fn tick_timers(&mut self, dt: f32) {
        self.fire_cooldown = (self.fire_cooldown - dt).max(0.0);
        self.invulnerable = (self.invulnerable - dt).max(0.0);
    }

    /// Cooldown for firing `kind`, if this entity may fire it right now.
    /// Base capabilities first, then capabilities granted by active buffs.
    pub fn ranged_cooldown(&self, kind: ProjectileKind) -> Option<f32> {
        self.capabilities.fire_cooldown(kind).or_else(|| {
            (kind == ProjectileKind::StaffBolt && self.has_buff(BuffKind::RangedAttack))
                .then_some(STAFF_COOLDOWN)
        })
    }

    /// Apply damage; returns true if this hit defeated the entity
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if self.defeated {
            return false;
        }
        self.health -= amount;
        if self.health <= 0 {
            self.defeated = true;
            return true;
        }
        false
    }
}
