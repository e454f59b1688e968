//! Game state and core simulation types
//!
//! `GameState` is the top-level mode; `World` holds everything that is
//! (re)initialized from the level when play starts.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::entity::{Capability, Entity, EntityRole};
use super::geom::Rect;
use super::inventory::{Inventory, ItemKind};
use super::level::Level;
use super::projectile::{ProjectileKind, ProjectileSystem};
use crate::consts::*;
use crate::settings::Settings;

/// Top-level game mode. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameState {
    /// Title menu
    #[default]
    Menu,
    /// Conversation overlay (simulation frozen)
    Dialogue,
    /// Active gameplay
    Playing,
    /// Inventory overlay (simulation frozen)
    Inventory,
    /// Game is paused
    Paused,
    /// Player died
    GameOver,
}

impl GameState {
    pub const ALL: [GameState; 6] = [
        GameState::Menu,
        GameState::Dialogue,
        GameState::Playing,
        GameState::Inventory,
        GameState::Paused,
        GameState::GameOver,
    ];

    /// Legal transition table
    pub fn can_transition_to(self, to: GameState) -> bool {
        use GameState::*;
        matches!(
            (self, to),
            (Menu, Playing)
                | (Playing, Dialogue)
                | (Playing, Inventory)
                | (Playing, Paused)
                | (Playing, GameOver)
                | (Dialogue, Playing)
                | (Inventory, Playing)
                | (Paused, Playing)
                | (GameOver, Menu)
                | (GameOver, Playing)
        )
    }

    /// The physics/collision/camera pass runs only here
    pub fn runs_simulation(self) -> bool {
        self == GameState::Playing
    }

    /// The frozen world stays visible beneath these states
    pub fn shows_world(self) -> bool {
        self != GameState::Menu
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameState::Menu => "menu",
            GameState::Dialogue => "dialogue",
            GameState::Playing => "playing",
            GameState::Inventory => "inventory",
            GameState::Paused => "paused",
            GameState::GameOver => "game_over",
        }
    }
}

/// Non-fatal problems recorded by the frame loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// Dialogue choice or entry pointing at a node that does not exist
    MissingDialogueNode,
    /// Interact target without a usable conversation
    MissingConversation,
    /// A subsystem failed and was skipped for the frame
    SubsystemFailure,
    /// Stored state contradicted the active mode
    InconsistentState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub frame: u64,
    pub kind: DiagnosticKind,
    pub message: String,
}

/// Bounded diagnostic ring (oldest dropped first)
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: VecDeque<Diagnostic>,
}

impl Diagnostics {
    pub fn record(&mut self, frame: u64, kind: DiagnosticKind, message: impl Into<String>) {
        let message = message.into();
        log::warn!("[frame {}] {:?}: {}", frame, kind, message);
        if self.entries.len() == MAX_DIAGNOSTICS {
            self.entries.pop_front();
        }
        self.entries.push_back(Diagnostic {
            frame,
            kind,
            message,
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }
}

/// Talkable character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Npc {
    pub id: u32,
    pub name: String,
    pub rect: Rect,
    pub conversation: Option<String>,
}

/// Collectible item lying in the level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub rect: Rect,
    pub item: ItemKind,
    pub store: bool,
}

/// Pickup body size
pub const PICKUP_SIZE: f32 = 20.0;
/// Player stone throw cooldown
pub const STONE_COOLDOWN: f32 = 0.35;
/// Enemy shot cooldown
pub const ENEMY_SHOT_COOLDOWN: f32 = 1.6;

/// Everything built from the level when play (re)starts
#[derive(Debug, Clone)]
pub struct World {
    pub player: Entity,
    /// Living enemies (defeated ones are removed within the frame)
    pub enemies: Vec<Entity>,
    pub npcs: Vec<Npc>,
    pub pickups: Vec<Pickup>,
    pub projectiles: ProjectileSystem,
    pub camera: Camera,
    pub inventory: Inventory,
}

impl World {
    pub fn from_level(level: &Level, settings: &Settings) -> Self {
        let mut next_id = 1;
        let mut alloc = || {
            let id = next_id;
            next_id += 1;
            id
        };

        let mut player = Entity::new(
            alloc(),
            EntityRole::Player,
            level.player_spawn,
            Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            settings.player_max_health(),
        );
        player.capabilities.grant(Capability::FireRanged {
            kind: ProjectileKind::Stone,
            cooldown: STONE_COOLDOWN,
        });

        let enemies = level
            .enemies
            .iter()
            .map(|spawn| {
                let mut e = Entity::new(
                    alloc(),
                    EntityRole::Enemy,
                    Vec2::new(spawn.x, spawn.y),
                    Vec2::new(spawn.size.0, spawn.size.1),
                    spawn.health.max(1),
                );
                e.sprite = spawn.sprite.clone();
                e.facing = spawn.facing;
                e.contact_damage = spawn.contact_damage.max(0);
                e.patrol = spawn.patrol;
                if spawn.ranged {
                    e.capabilities.grant(Capability::FireRanged {
                        kind: ProjectileKind::EnemyShot,
                        cooldown: ENEMY_SHOT_COOLDOWN,
                    });
                }
                e
            })
            .collect();

        let npcs = level
            .npcs
            .iter()
            .map(|spawn| Npc {
                id: alloc(),
                name: spawn.name.clone(),
                rect: Rect::new(spawn.x, spawn.y, spawn.width, spawn.height),
                conversation: spawn.conversation.clone(),
            })
            .collect();

        let pickups = level
            .pickups
            .iter()
            .map(|spawn| Pickup {
                id: alloc(),
                rect: Rect::new(spawn.x, spawn.y, PICKUP_SIZE, PICKUP_SIZE),
                item: spawn.item,
                store: spawn.store,
            })
            .collect();

        let mut camera = Camera::new(
            &settings.camera,
            level.width,
            level.camera_y_range(settings.camera.viewport_height),
        );
        camera.snap_to(player.center());

        Self {
            player,
            enemies,
            npcs,
            pickups,
            projectiles: ProjectileSystem::for_world(level.width, level.height),
            camera,
            inventory: Inventory::default(),
        }
    }

    pub fn enemy(&self, id: u32) -> Option<&Entity> {
        self.enemies.iter().find(|e| e.id == id)
    }

    /// First NPC whose interaction zone touches the player
    pub fn npc_in_reach(&self) -> Option<&Npc> {
        let body = self.player.rect();
        self.npcs
            .iter()
            .find(|npc| npc.rect.inflate(INTERACT_RADIUS).overlaps(&body))
    }
}
