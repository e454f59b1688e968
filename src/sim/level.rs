//! Level data boundary
//!
//! An external loader hands the core plain level data (JSON text). The core
//! turns it into an immutable `Level`: platform catalog, world size, baseline
//! ground line, camera range and initial placements.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Facing, Patrol};
use super::inventory::ItemKind;
use super::platform::{PlatformCatalog, PlatformRecord};
use crate::error::LevelError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub x: f32,
    pub y: f32,
}

fn default_enemy_size() -> (f32, f32) {
    (32.0, 32.0)
}

fn default_enemy_health() -> i32 {
    2
}

fn default_contact_damage() -> i32 {
    1
}

fn default_enemy_sprite() -> String {
    "slime".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_enemy_size")]
    pub size: (f32, f32),
    #[serde(default = "default_enemy_health")]
    pub health: i32,
    #[serde(default = "default_contact_damage")]
    pub contact_damage: i32,
    #[serde(default = "default_enemy_sprite")]
    pub sprite: String,
    #[serde(default)]
    pub facing: Facing,
    #[serde(default)]
    pub patrol: Option<Patrol>,
    /// Fires enemy shots at the player
    #[serde(default)]
    pub ranged: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpcSpawn {
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub conversation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupSpawn {
    pub x: f32,
    pub y: f32,
    pub item: ItemKind,
    /// Store in the inventory instead of applying on touch
    #[serde(default)]
    pub store: bool,
}

/// Level as handed over by the loader
#[derive(Debug, Clone, Deserialize)]
pub struct LevelData {
    #[serde(default)]
    pub name: String,
    pub width: f32,
    pub height: f32,
    /// Implicit full-width ground line (defaults to the level height)
    #[serde(default)]
    pub baseline: Option<f32>,
    /// Authored camera vertical range (top edge of the view)
    #[serde(default)]
    pub camera_y_range: Option<(f32, f32)>,
    #[serde(default)]
    pub platforms: Vec<PlatformRecord>,
    pub player_spawn: SpawnPoint,
    #[serde(default)]
    pub enemies: Vec<EnemySpawn>,
    #[serde(default)]
    pub npcs: Vec<NpcSpawn>,
    #[serde(default)]
    pub pickups: Vec<PickupSpawn>,
}

impl LevelData {
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Immutable per-level data
#[derive(Debug, Clone)]
pub struct Level {
    pub name: String,
    pub width: f32,
    pub height: f32,
    pub baseline: f32,
    pub catalog: PlatformCatalog,
    camera_y_range: Option<(f32, f32)>,
    pub player_spawn: Vec2,
    pub enemies: Vec<EnemySpawn>,
    pub npcs: Vec<NpcSpawn>,
    pub pickups: Vec<PickupSpawn>,
}

impl Level {
    pub fn from_data(data: LevelData) -> Result<Self, LevelError> {
        if !(data.width > 0.0 && data.height > 0.0) {
            return Err(LevelError::InvalidDimensions {
                width: data.width,
                height: data.height,
            });
        }
        let (catalog, skipped) = PlatformCatalog::from_records(data.platforms);
        if skipped > 0 {
            log::warn!("Level '{}': skipped {} malformed platforms", data.name, skipped);
        }
        let baseline = data.baseline.unwrap_or(data.height);
        log::info!(
            "Level '{}' loaded: {}x{}, {} platforms, {} enemies",
            data.name,
            data.width,
            data.height,
            catalog.len(),
            data.enemies.len()
        );
        Ok(Self {
            name: data.name,
            width: data.width,
            height: data.height,
            baseline,
            catalog,
            camera_y_range: data.camera_y_range,
            player_spawn: Vec2::new(data.player_spawn.x, data.player_spawn.y),
            enemies: data.enemies,
            npcs: data.npcs,
            pickups: data.pickups,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        Self::from_data(LevelData::from_json(json)?)
    }

    /// Built-in demo level
    pub fn demo() -> Result<Self, LevelError> {
        Self::from_json(DEMO_LEVEL_JSON)
    }

    /// Vertical camera range for a viewport of `viewport_height`.
    /// Defaults to a range that reaches the highest platform tier and stops
    /// the view at the level floor.
    pub fn camera_y_range(&self, viewport_height: f32) -> (f32, f32) {
        if let Some((min, max)) = self.camera_y_range {
            return (min, max.max(min));
        }
        let top = self
            .catalog
            .highest_top()
            .map(|t| (t - 100.0).min(0.0))
            .unwrap_or(0.0);
        let bottom = (self.baseline.max(self.height) - viewport_height).max(top);
        (top, bottom)
    }
}

/// Demo level; platforms mix structured and loose records
pub const DEMO_LEVEL_JSON: &str = r#"{
    "name": "Mossy Ridge",
    "width": 3200,
    "height": 900,
    "baseline": 860,
    "player_spawn": { "x": 80, "y": 780 },
    "platforms": [
        { "x": 300, "y": 740, "width": 160, "height": 20, "material": "wood" },
        { "x": 560, "y": 640, "width": 140, "height": 20, "material": "stone" },
        { "x": 820, "y": 560, "w": 180, "h": 24, "type": "grass" },
        { "x": "1100", "y": "480", "w": "120", "h": "20", "type": "brick" },
        { "x": 1400, "y": 620, "width": 300, "height": 20, "material": "grass" },
        { "x": 1850, "y": 520, "width": 160, "height": 20, "material": "wood" },
        { "x": 2200, "y": 420, "w": 200, "h": 20, "material": "stone" },
        { "x": 2600, "y": 700, "width": 400, "height": 20, "material": "grass" }
    ],
    "enemies": [
        { "x": 1450, "y": 588, "patrol": { "min_x": 1400, "max_x": 1668, "speed": 60 } },
        { "x": 2000, "y": 828, "sprite": "archer", "facing": "left", "ranged": true, "health": 3 },
        { "x": 2700, "y": 668, "patrol": { "min_x": 2600, "max_x": 2968, "speed": 90 }, "health": 4 }
    ],
    "npcs": [
        { "name": "Hermit", "x": 200, "y": 812, "width": 32, "height": 48, "conversation": "hermit" },
        { "name": "Signpost", "x": 1150, "y": 432, "width": 24, "height": 48 }
    ],
    "pickups": [
        { "x": 610, "y": 610, "item": "health_tonic" },
        { "x": 1140, "y": 450, "item": "staff", "store": true }
    ]
}"#;
