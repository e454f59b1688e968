//! Render boundary
//!
//! Plain-data snapshot of one frame for an external renderer. The core never
//! draws; it only says where things are and what they look like.

use glam::Vec2;
use serde::Serialize;

use super::dialogue::{DialogueContent, DialogueRuntime};
use super::entity::{BuffKind, Entity, Facing};
use super::geom::Rect;
use super::inventory::ItemKind;
use super::level::Level;
use super::state::{GameState, World};

// ============================================================================
// VIEW TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformView {
    pub rect: Rect,
    /// 0xRRGGBB
    pub color: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpriteView {
    pub tag: String,
    /// World-space bounding box
    pub rect: Rect,
    pub facing: Facing,
    /// Blink while invulnerable
    pub flashing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuffView {
    pub kind: BuffKind,
    pub remaining: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudView {
    pub health: i32,
    pub max_health: i32,
    pub buffs: Vec<BuffView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialogueView {
    pub speaker: String,
    /// Revealed prefix only
    pub text: String,
    pub choices: Vec<String>,
    pub selected: usize,
    pub awaiting_input: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryView {
    pub items: Vec<ItemKind>,
    pub selected: usize,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    pub state: GameState,
    pub camera_offset: Vec2,
    pub platforms: Vec<PlatformView>,
    pub sprites: Vec<SpriteView>,
    pub hud: Option<HudView>,
    pub dialogue: Option<DialogueView>,
    pub inventory: Option<InventoryView>,
}

// ============================================================================
// CAPTURE
// ============================================================================

fn entity_sprite(e: &Entity) -> SpriteView {
    SpriteView {
        tag: e.sprite.clone(),
        rect: e.rect(),
        facing: e.facing,
        flashing: e.invulnerable > 0.0,
    }
}

impl RenderFrame {
    /// Snapshot of the world under `state`. The menu shows no world; every
    /// other state draws the (possibly frozen) world with its overlay on top.
    pub fn capture(
        state: GameState,
        level: &Level,
        world: &World,
        dialogue: &DialogueRuntime,
        content: &DialogueContent,
    ) -> Self {
        if !state.shows_world() {
            return Self {
                state,
                camera_offset: Vec2::ZERO,
                platforms: Vec::new(),
                sprites: Vec::new(),
                hud: None,
                dialogue: None,
                inventory: None,
            };
        }

        let platforms = level
            .catalog
            .iter()
            .map(|p| PlatformView {
                rect: p.rect,
                color: p.material.color(),
            })
            .collect();

        // Back to front: npcs, pickups, enemies, player, projectiles
        let sprites: Vec<SpriteView> = world
            .npcs
            .iter()
            .map(|npc| SpriteView {
                tag: npc.name.to_lowercase(),
                rect: npc.rect,
                facing: Facing::Left,
                flashing: false,
            })
            .chain(world.pickups.iter().map(|p| SpriteView {
                tag: p.item.as_str().to_string(),
                rect: p.rect,
                facing: Facing::Right,
                flashing: false,
            }))
            .chain(world.enemies.iter().filter(|e| e.is_alive()).map(entity_sprite))
            .chain(std::iter::once(entity_sprite(&world.player)))
            .chain(world.projectiles.iter().map(|p| SpriteView {
                tag: p.kind.sprite().to_string(),
                rect: p.rect,
                facing: if p.velocity_x < 0.0 {
                    Facing::Left
                } else {
                    Facing::Right
                },
                flashing: false,
            }))
            .collect();

        let player = &world.player;
        let hud = HudView {
            health: player.health.max(0),
            max_health: player.effective_max_health(),
            buffs: player
                .buffs
                .iter()
                .map(|b| BuffView {
                    kind: b.kind,
                    remaining: b.remaining,
                })
                .collect(),
        };

        let dialogue = (state == GameState::Dialogue)
            .then(|| Self::dialogue_view(dialogue, content))
            .flatten();

        let inventory = (state == GameState::Inventory).then(|| InventoryView {
            items: world.inventory.items().to_vec(),
            selected: world.inventory.selected(),
        });

        Self {
            state,
            camera_offset: world.camera.offset(),
            platforms,
            sprites,
            hud: Some(hud),
            dialogue,
            inventory,
        }
    }

    fn dialogue_view(runtime: &DialogueRuntime, content: &DialogueContent) -> Option<DialogueView> {
        if !runtime.active {
            return None;
        }
        let node = content.node(runtime.current_node.as_deref()?)?;
        Some(DialogueView {
            speaker: node.speaker.clone(),
            text: runtime.visible_text(content).unwrap_or_default().to_string(),
            choices: node.choices.iter().map(|c| c.label.clone()).collect(),
            selected: runtime.selected_choice,
            awaiting_input: runtime.awaiting_input(),
        })
    }

    /// Sprite by tag (first match)
    pub fn sprite(&self, tag: &str) -> Option<&SpriteView> {
        self.sprites.iter().find(|s| s.tag == tag)
    }
}
