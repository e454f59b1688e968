//! Frame-driven simulation module
//!
//! All gameplay logic lives here. This module stays free of I/O:
//! - `dt` is the measured frame interval; math is per-second, never per-frame
//! - Stable iteration order (catalog and spawn order)
//! - No rendering, audio playback or file access

pub mod camera;
pub mod collision;
pub mod dialogue;
pub mod entity;
pub mod geom;
pub mod input;
pub mod inventory;
pub mod level;
pub mod physics;
pub mod platform;
pub mod projectile;
pub mod render;
pub mod state;
pub mod tick;

pub use camera::Camera;
pub use collision::{Landing, Support, resolve_platforms};
pub use dialogue::{DialogueContent, DialoguePhase, DialogueRuntime, DialogueSignal, EndReason};
pub use entity::{Buff, BuffKind, Capability, Entity, EntityRole, Faction, Facing};
pub use geom::Rect;
pub use input::{Action, Edge, InputEvent, InputState};
pub use inventory::{Inventory, ItemKind};
pub use level::{Level, LevelData};
pub use physics::{Intent, step_player};
pub use platform::{Material, Platform, PlatformCatalog, PlatformRecord};
pub use projectile::{FireOutcome, Projectile, ProjectileKind, ProjectileSystem};
pub use render::RenderFrame;
pub use state::{Diagnostic, DiagnosticKind, GameState, World};
pub use tick::Game;
