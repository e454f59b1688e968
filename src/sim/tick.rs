//! Frame loop driver
//!
//! One `tick` = input collection, exactly one state-appropriate update pass,
//! in that order. Rendering reads the result through `render_frame`. Subsystem
//! failures are caught here, recorded, and skipped for the frame.

use super::collision;
use super::dialogue::{DialogueContent, DialogueRuntime, DialogueSignal, EndReason};
use super::entity::Entity;
use super::input::{Action, Edge, InputEvent, InputState};
use super::level::Level;
use super::physics::{self, Intent};
use super::projectile::ProjectileKind;
use super::render::RenderFrame;
use super::state::{DiagnosticKind, Diagnostics, GameState, World};
use crate::audio::{AudioCue, AudioSink, CueQueue};
use crate::consts::*;
use crate::error::SimError;
use crate::settings::Settings;

/// Horizontal reach of an enemy's ranged attack
pub const ENEMY_SIGHT_RANGE: f32 = 420.0;
/// Max vertical distance between centers for an enemy to take the shot
pub const ENEMY_SIGHT_HEIGHT: f32 = 40.0;

/// Requests raised by edge handlers and consumed by the next Playing pass
#[derive(Debug, Clone, Copy, Default)]
struct Pending {
    jump: bool,
    fire: bool,
}

/// The whole game: active state, level, world and the frame bookkeeping
pub struct Game {
    state: GameState,
    settings: Settings,
    level: Level,
    content: DialogueContent,
    world: World,
    dialogue: DialogueRuntime,
    input: InputState,
    pending: Pending,
    cues: CueQueue,
    diagnostics: Diagnostics,
    frame: u64,
}

type Handler = fn(&mut Game);

/// (active state, action, edge) -> handler. Anything not listed is ignored.
static DISPATCH: &[(GameState, Action, Edge, Handler)] = &[
    (GameState::Menu, Action::Confirm, Edge::Pressed, start_level),
    (GameState::Playing, Action::Jump, Edge::Pressed, request_jump),
    (GameState::Playing, Action::FireRanged, Edge::Pressed, request_fire),
    (GameState::Playing, Action::FireRanged, Edge::Held, request_fire),
    (GameState::Playing, Action::Interact, Edge::Pressed, interact),
    (GameState::Playing, Action::ToggleInventory, Edge::Pressed, open_inventory),
    (GameState::Playing, Action::TogglePause, Edge::Pressed, pause),
    (GameState::Paused, Action::TogglePause, Edge::Pressed, resume),
    (GameState::Inventory, Action::ToggleInventory, Edge::Pressed, resume),
    (GameState::Inventory, Action::MoveLeft, Edge::Pressed, inventory_prev),
    (GameState::Inventory, Action::MoveRight, Edge::Pressed, inventory_next),
    (GameState::Inventory, Action::Confirm, Edge::Pressed, use_selected_item),
    (GameState::Dialogue, Action::Confirm, Edge::Pressed, dialogue_confirm),
    (GameState::Dialogue, Action::Cancel, Edge::Pressed, dialogue_cancel),
    (GameState::Dialogue, Action::MoveLeft, Edge::Pressed, choice_prev),
    (GameState::Dialogue, Action::MoveRight, Edge::Pressed, choice_next),
    (GameState::GameOver, Action::Confirm, Edge::Pressed, start_level),
    (GameState::GameOver, Action::Cancel, Edge::Pressed, return_to_menu),
];

// ============================================================================
// HANDLERS
// ============================================================================

fn start_level(game: &mut Game) {
    game.go(GameState::Playing);
}

fn request_jump(game: &mut Game) {
    game.pending.jump = true;
}

fn request_fire(game: &mut Game) {
    game.pending.fire = true;
}

fn pause(game: &mut Game) {
    game.go(GameState::Paused);
}

fn open_inventory(game: &mut Game) {
    game.go(GameState::Inventory);
}

fn resume(game: &mut Game) {
    game.go(GameState::Playing);
}

fn return_to_menu(game: &mut Game) {
    game.go(GameState::Menu);
}

fn inventory_prev(game: &mut Game) {
    game.world.inventory.select_prev();
}

fn inventory_next(game: &mut Game) {
    game.world.inventory.select_next();
}

fn use_selected_item(game: &mut Game) {
    let Some(item) = game.world.inventory.take_selected() else {
        return;
    };
    let (kind, duration, magnitude) = item.effect();
    game.world.player.apply_buff(kind, duration, magnitude);
    log::info!("used {} ({:?} for {:.0}s)", item.as_str(), kind, duration);
}

fn interact(game: &mut Game) {
    let Some(npc) = game.world.npc_in_reach() else {
        return;
    };
    let name = npc.name.clone();
    let Some(conversation) = npc.conversation.clone() else {
        game.record(
            DiagnosticKind::MissingConversation,
            format!("{} has no conversation attached", name),
        );
        return;
    };
    if game.content.entry(&conversation).is_none() {
        game.record(
            DiagnosticKind::MissingConversation,
            format!("{} refers to unknown conversation `{}`", name, conversation),
        );
        return;
    }

    match game.dialogue.start(&game.content, &conversation) {
        DialogueSignal::Advanced(node) => {
            log::debug!("{} opens conversation `{}` at `{}`", name, conversation, node);
            game.go(GameState::Dialogue);
        }
        DialogueSignal::Ended(EndReason::MissingNode(node)) => {
            game.record(
                DiagnosticKind::MissingDialogueNode,
                format!("conversation `{}` starts at unknown node `{}`", conversation, node),
            );
        }
        _ => {}
    }
}

fn dialogue_confirm(game: &mut Game) {
    let signal = game.dialogue.confirm(&game.content);
    game.on_dialogue_signal(signal);
}

fn dialogue_cancel(game: &mut Game) {
    let signal = game.dialogue.cancel();
    game.on_dialogue_signal(signal);
}

fn choice_prev(game: &mut Game) {
    game.dialogue.select_choice(&game.content, -1);
}

fn choice_next(game: &mut Game) {
    game.dialogue.select_choice(&game.content, 1);
}

// ============================================================================
// GAME
// ============================================================================

impl Game {
    /// New game sitting in the menu. The world is built from `level` right
    /// away and rebuilt every time play (re)starts.
    pub fn new(level: Level, content: DialogueContent, settings: Settings) -> Self {
        let world = World::from_level(&level, &settings);
        Self {
            state: GameState::default(),
            settings,
            level,
            content,
            world,
            dialogue: DialogueRuntime::default(),
            input: InputState::default(),
            pending: Pending::default(),
            cues: CueQueue::default(),
            diagnostics: Diagnostics::default(),
            frame: 0,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Direct world access for hosts and tests that stage a situation
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn dialogue(&self) -> &DialogueRuntime {
        &self.dialogue
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Cues emitted by the last tick
    pub fn cues(&self) -> &[AudioCue] {
        self.cues.as_slice()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Move to `to` if the transition table allows it.
    ///
    /// Entering `Playing` from `Menu` or `GameOver` rebuilds the world.
    pub fn transition(&mut self, to: GameState) -> Result<(), SimError> {
        let from = self.state;
        if !from.can_transition_to(to) {
            return Err(SimError::IllegalTransition { from, to });
        }
        log::info!("state {} -> {}", from.as_str(), to.as_str());
        self.state = to;
        self.pending = Pending::default();

        if from == GameState::Dialogue {
            self.dialogue = DialogueRuntime::default();
        }
        if to == GameState::Playing && matches!(from, GameState::Menu | GameState::GameOver) {
            self.reset_world();
        }
        Ok(())
    }

    fn go(&mut self, to: GameState) {
        if let Err(err) = self.transition(to) {
            self.record(DiagnosticKind::InconsistentState, err.to_string());
        }
    }

    fn reset_world(&mut self) {
        self.world = World::from_level(&self.level, &self.settings);
        log::info!(
            "level '{}' initialised: {} platforms, {} enemies",
            self.level.name,
            self.level.catalog.len(),
            self.world.enemies.len()
        );
    }

    fn record(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.diagnostics.record(self.frame, kind, message);
    }

    /// Advance one frame.
    ///
    /// Events are applied in order. Once one of them changes the state, the
    /// rest only update held-action state; they are not dispatched against the
    /// new state until the next frame.
    pub fn tick(&mut self, events: &[InputEvent], dt: f32) {
        self.frame += 1;
        self.cues.clear();

        let entry_state = self.state;
        for event in events {
            self.input.apply(event);
            if self.state == entry_state {
                self.dispatch(event);
            }
        }

        let dt = match physics::validate_dt(dt) {
            Ok(()) => dt.min(MAX_FRAME_DT),
            Err(err) => {
                self.record(DiagnosticKind::SubsystemFailure, err.to_string());
                return;
            }
        };

        if self.state.runs_simulation() {
            self.update_playing(dt);
        } else if self.state == GameState::Dialogue {
            self.update_dialogue(dt);
        }
    }

    fn dispatch(&mut self, event: &InputEvent) {
        let state = self.state;
        let handler = DISPATCH
            .iter()
            .find(|(s, action, edge, _)| *s == state && *action == event.action && *edge == event.edge)
            .map(|row| row.3);
        if let Some(handler) = handler {
            handler(self);
        }
    }

    fn on_dialogue_signal(&mut self, signal: DialogueSignal) {
        match signal {
            DialogueSignal::Skipped => self.cues.push(AudioCue::TypingStop),
            DialogueSignal::Advanced(node) => log::debug!("dialogue advanced to `{}`", node),
            DialogueSignal::Ended(reason) => {
                if let EndReason::MissingNode(node) = &reason {
                    self.record(
                        DiagnosticKind::MissingDialogueNode,
                        format!("dialogue choice points at unknown node `{}`", node),
                    );
                }
                log::info!("dialogue ended: {:?}", reason);
                self.go(GameState::Playing);
            }
        }
    }

    fn update_dialogue(&mut self, dt: f32) {
        if !self.dialogue.active {
            // Never stall in Dialogue with nothing to show
            self.record(
                DiagnosticKind::InconsistentState,
                "dialogue state without an active conversation",
            );
            self.go(GameState::Playing);
            return;
        }
        let report = self.dialogue.update(dt, self.settings.dialogue.reveal_rate);
        if report.revealed_more {
            self.cues.push(AudioCue::TypingTick);
        }
        if report.finished {
            self.cues.push(AudioCue::TypingStop);
        }
    }

    fn update_playing(&mut self, dt: f32) {
        let pending = std::mem::take(&mut self.pending);
        let settings = &self.settings;
        let world = &mut self.world;

        // Timers and buffs
        world.player.tick_timers(dt);
        for kind in world.player.tick_buffs(dt) {
            log::info!("buff {:?} expired", kind);
        }
        for enemy in &mut world.enemies {
            enemy.tick_timers(dt);
        }

        // Player physics
        let intent = Intent {
            move_left: self.input.is_down(Action::MoveLeft),
            move_right: self.input.is_down(Action::MoveRight),
            jump_pressed: pending.jump,
        };
        match physics::step_player(&mut world.player, &intent, dt, &self.level, &settings.physics) {
            Ok(report) => {
                if report.landing.is_some_and(|l| l.touched_down) {
                    self.cues.push(AudioCue::Land);
                }
            }
            Err(err) => self
                .diagnostics
                .record(self.frame, DiagnosticKind::SubsystemFailure, err.to_string()),
        }

        // Enemies move before anything is fired so shots and hits see this
        // frame's positions
        for enemy in &mut world.enemies {
            physics::step_patrol(enemy, dt);
        }
        for enemy in &mut world.enemies {
            if !enemy_takes_shot(enemy, &world.player) {
                continue;
            }
            if world.projectiles.spawn(ProjectileKind::EnemyShot, enemy).spawned() {
                self.cues.push(AudioCue::Shoot);
            }
        }

        if pending.fire {
            let kind = if world.player.ranged_cooldown(ProjectileKind::StaffBolt).is_some() {
                ProjectileKind::StaffBolt
            } else {
                ProjectileKind::Stone
            };
            if world.projectiles.spawn(kind, &mut world.player).spawned() {
                self.cues.push(AudioCue::Shoot);
            }
        }

        // Projectiles
        world.projectiles.advance_all(dt);
        let enemy_hits = collision::resolve_projectile_hits(&mut world.projectiles, &mut world.enemies, |d| d);
        let player_hits = collision::resolve_projectile_hits(
            &mut world.projectiles,
            std::slice::from_mut(&mut world.player),
            |d| settings.scale_damage_taken(d),
        );
        for hit in enemy_hits.iter().chain(&player_hits) {
            self.cues.push(AudioCue::Hit);
            log::debug!(
                "projectile {} hit entity {} for {}",
                hit.projectile_id,
                hit.target_id,
                hit.damage
            );
        }
        world.projectiles.cull_inactive();

        world.enemies.retain(|e| {
            if !e.is_alive() {
                log::info!("enemy {} ({}) defeated", e.id, e.sprite);
            }
            e.is_alive()
        });

        // Contact damage
        let contact = collision::resolve_contact(
            &mut world.player,
            &world.enemies,
            self.level.width,
            |d| settings.scale_damage_taken(d),
        );
        if let Some(contact) = contact {
            self.cues.push(AudioCue::Hit);
            log::debug!("touched enemy {} for {}", contact.enemy_id, contact.damage);
        }

        // Pickups
        let body = world.player.rect();
        let player = &mut world.player;
        let inventory = &mut world.inventory;
        world.pickups.retain(|pickup| {
            if !pickup.rect.overlaps(&body) {
                return true;
            }
            if pickup.store {
                inventory.add(pickup.item);
                log::info!("stored {}", pickup.item.as_str());
            } else {
                let (kind, duration, magnitude) = pickup.item.effect();
                player.apply_buff(kind, duration, magnitude);
                log::info!("picked up {}", pickup.item.as_str());
            }
            false
        });

        world.camera.update(world.player.center(), dt);

        if !world.player.is_alive() {
            log::info!("player defeated at frame {}", self.frame);
            self.go(GameState::GameOver);
        }
    }

    /// Snapshot for the renderer
    pub fn render_frame(&self) -> RenderFrame {
        RenderFrame::capture(self.state, &self.level, &self.world, &self.dialogue, &self.content)
    }

    /// Hand this frame's cues to the audio collaborator
    pub fn flush_audio(&mut self, sink: &mut dyn AudioSink) {
        self.cues.flush(sink, &self.settings.audio);
    }
}

/// Ranged enemies shoot along their facing when the player is in a band in
/// front of them. A stationary shooter turns round to face the player.
fn enemy_takes_shot(enemy: &mut Entity, player: &Entity) -> bool {
    if enemy.ranged_cooldown(ProjectileKind::EnemyShot).is_none() || !player.is_alive() {
        return false;
    }
    let delta = player.center() - enemy.center();
    if delta.x.abs() > ENEMY_SIGHT_RANGE || delta.y.abs() > ENEMY_SIGHT_HEIGHT {
        return false;
    }
    if delta.x * enemy.facing.sign() < 0.0 {
        if enemy.patrol.is_some() {
            return false;
        }
        enemy.facing = enemy.facing.flipped();
    }
    enemy.fire_cooldown <= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::LogAudio;
    use crate::sim::dialogue::DialoguePhase;
    use crate::sim::entity::{BuffKind, Facing};
    use crate::sim::geom::Rect;
    use crate::sim::inventory::ItemKind;
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn game() -> Game {
        Game::new(
            Level::demo().expect("demo level"),
            DialogueContent::demo().expect("demo dialogue"),
            Settings::default(),
        )
    }

    fn playing() -> Game {
        let mut g = game();
        g.tick(&[InputEvent::pressed(Action::Confirm)], DT);
        assert_eq!(g.state(), GameState::Playing);
        g
    }

    fn press(g: &mut Game, action: Action) {
        g.tick(&[InputEvent::pressed(action)], DT);
    }

    #[test]
    fn test_starts_in_menu_and_confirm_starts_play() {
        let mut g = game();
        assert_eq!(g.state(), GameState::Menu);
        // Other inputs do nothing in the menu
        press(&mut g, Action::Jump);
        press(&mut g, Action::TogglePause);
        assert_eq!(g.state(), GameState::Menu);
        press(&mut g, Action::Confirm);
        assert_eq!(g.state(), GameState::Playing);
    }

    #[test]
    fn test_transition_rejects_illegal_edge() {
        let mut g = game();
        let err = g.transition(GameState::Paused).unwrap_err();
        assert_eq!(
            err,
            SimError::IllegalTransition {
                from: GameState::Menu,
                to: GameState::Paused
            }
        );
        assert_eq!(g.state(), GameState::Menu);
    }

    #[test]
    fn test_pause_freezes_world() {
        let mut g = playing();
        g.tick(&[InputEvent::pressed(Action::MoveRight)], DT);
        press(&mut g, Action::TogglePause);
        assert_eq!(g.state(), GameState::Paused);
        let frozen = g.world().player.pos;
        for _ in 0..30 {
            g.tick(&[InputEvent::held(Action::MoveRight)], DT);
        }
        assert_eq!(g.world().player.pos, frozen);
        // Frozen world is still rendered under the overlay
        assert!(g.render_frame().sprite("player").is_some());

        press(&mut g, Action::TogglePause);
        assert_eq!(g.state(), GameState::Playing);
        g.tick(&[], DT);
        assert!(g.world().player.pos.x > frozen.x);
    }

    #[test]
    fn test_inventory_freezes_world() {
        let mut g = playing();
        press(&mut g, Action::FireRanged);
        assert_eq!(g.world().projectiles.len(), 1);
        press(&mut g, Action::ToggleInventory);
        assert_eq!(g.state(), GameState::Inventory);

        let player = g.world().player.pos;
        let enemies: Vec<Vec2> = g.world().enemies.iter().map(|e| e.pos).collect();
        let shots: Vec<Rect> = g.world().projectiles.iter().map(|p| p.rect).collect();
        let camera = g.world().camera.offset();
        for _ in 0..30 {
            g.tick(&[InputEvent::held(Action::MoveRight)], DT);
        }
        let world = g.world();
        assert_eq!(world.player.pos, player);
        assert_eq!(world.enemies.iter().map(|e| e.pos).collect::<Vec<_>>(), enemies);
        assert_eq!(world.projectiles.iter().map(|p| p.rect).collect::<Vec<_>>(), shots);
        assert_eq!(world.camera.offset(), camera);
    }

    #[test]
    fn test_events_after_transition_are_not_dispatched() {
        let mut g = playing();
        // The second toggle would resume if it were dispatched
        g.tick(
            &[
                InputEvent::pressed(Action::TogglePause),
                InputEvent::pressed(Action::TogglePause),
            ],
            DT,
        );
        assert_eq!(g.state(), GameState::Paused);
    }

    #[test]
    fn test_jump_and_land_cue() {
        let mut g = playing();
        // The spawn point is above the ground line
        for _ in 0..60 {
            if g.world().player.on_ground {
                break;
            }
            g.tick(&[], DT);
        }
        assert!(g.world().player.on_ground);
        press(&mut g, Action::Jump);
        assert!(g.world().player.vel.y < 0.0);
        let mut landed = false;
        for _ in 0..120 {
            g.tick(&[], DT);
            if g.cues().contains(&AudioCue::Land) {
                landed = true;
                break;
            }
        }
        assert!(landed);
        assert!(g.world().player.on_ground);
    }

    #[test]
    fn test_fire_spawns_stone_with_cooldown() {
        let mut g = playing();
        press(&mut g, Action::FireRanged);
        assert!(g.cues().contains(&AudioCue::Shoot));
        assert_eq!(g.world().projectiles.iter().count(), 1);
        assert_eq!(
            g.world().projectiles.iter().next().map(|p| p.kind),
            Some(ProjectileKind::Stone)
        );
        // Held fire is refused while the cooldown runs
        g.tick(&[InputEvent::held(Action::FireRanged)], DT);
        assert!(!g.cues().contains(&AudioCue::Shoot));
        assert_eq!(g.world().projectiles.iter().count(), 1);
    }

    #[test]
    fn test_staff_buff_switches_to_bolts() {
        let mut g = playing();
        g.world_mut().player.apply_buff(BuffKind::RangedAttack, 5.0, 1.0);
        press(&mut g, Action::FireRanged);
        assert_eq!(
            g.world().projectiles.iter().next().map(|p| p.kind),
            Some(ProjectileKind::StaffBolt)
        );
    }

    #[test]
    fn test_interact_without_conversation_records_diagnostic() {
        let mut g = playing();
        let signpost = g.world().npcs[1].rect;
        let player = &mut g.world_mut().player;
        player.pos = Vec2::new(signpost.x, signpost.bottom() - player.size.y);
        player.vel = Vec2::ZERO;
        press(&mut g, Action::Interact);
        assert_eq!(g.state(), GameState::Playing);
        assert_eq!(g.diagnostics().count(DiagnosticKind::MissingConversation), 1);
    }

    #[test]
    fn test_dialogue_typing_and_exit() {
        let mut g = playing();
        g.world_mut().player.pos = Vec2::new(180.0, 812.0);
        press(&mut g, Action::Interact);
        assert_eq!(g.state(), GameState::Dialogue);
        assert!(g.dialogue().typing());

        let before = g.world().player.pos;
        g.tick(&[InputEvent::held(Action::MoveRight)], DT);
        assert_eq!(g.world().player.pos, before);
        assert!(g.cues().is_empty() || g.cues().contains(&AudioCue::TypingTick));

        // Skip typing, then leave via cancel
        press(&mut g, Action::Confirm);
        assert!(g.dialogue().awaiting_input());
        assert!(g.cues().contains(&AudioCue::TypingStop));
        press(&mut g, Action::Cancel);
        assert_eq!(g.state(), GameState::Playing);
        assert_eq!(g.dialogue().phase, DialoguePhase::Ended);
    }

    #[test]
    fn test_dialogue_without_runtime_exits() {
        let mut g = playing();
        g.world_mut().player.pos = Vec2::new(180.0, 812.0);
        press(&mut g, Action::Interact);
        assert_eq!(g.state(), GameState::Dialogue);
        g.dialogue = DialogueRuntime::default();
        g.tick(&[], DT);
        assert_eq!(g.state(), GameState::Playing);
        assert_eq!(g.diagnostics().count(DiagnosticKind::InconsistentState), 1);
    }

    #[test]
    fn test_inventory_use_applies_buff() {
        let mut g = playing();
        g.world_mut().inventory.add(ItemKind::HealthTonic);
        press(&mut g, Action::ToggleInventory);
        assert_eq!(g.state(), GameState::Inventory);
        assert!(g.render_frame().inventory.is_some());
        press(&mut g, Action::Confirm);
        assert!(g.world().inventory.is_empty());
        assert_eq!(g.world().player.effective_max_health(), PLAYER_MAX_HEALTH + 3);
        press(&mut g, Action::ToggleInventory);
        assert_eq!(g.state(), GameState::Playing);
    }

    #[test]
    fn test_touching_pickup_applies_or_stores() {
        let mut g = playing();
        let tonic = g.world().pickups[0].rect;
        g.world_mut().player.pos = Vec2::new(tonic.x, tonic.y);
        g.tick(&[], DT);
        assert!(g.world().player.has_buff(BuffKind::MaxHealthBoost));
        assert_eq!(g.world().pickups.len(), 1);

        let staff = g.world().pickups[0].rect;
        g.world_mut().player.pos = Vec2::new(staff.x, staff.y);
        g.tick(&[], DT);
        assert!(g.world().pickups.is_empty());
        assert_eq!(g.world().inventory.items(), &[ItemKind::Staff]);
        assert!(!g.world().player.has_buff(BuffKind::RangedAttack));
    }

    #[test]
    fn test_death_goes_to_game_over_and_restart_rebuilds() {
        let mut g = playing();
        g.world_mut().player.health = 1;
        let slime = g.world().enemies[0].rect();
        g.world_mut().player.pos = Vec2::new(slime.x, slime.y);
        g.tick(&[], DT);
        assert_eq!(g.state(), GameState::GameOver);

        // No automatic way out
        for _ in 0..10 {
            g.tick(&[], DT);
        }
        assert_eq!(g.state(), GameState::GameOver);

        press(&mut g, Action::Confirm);
        assert_eq!(g.state(), GameState::Playing);
        assert_eq!(g.world().player.health, PLAYER_MAX_HEALTH);
        assert_eq!(g.world().enemies.len(), 3);
    }

    #[test]
    fn test_game_over_cancel_returns_to_menu() {
        let mut g = playing();
        g.transition(GameState::GameOver).expect("legal");
        press(&mut g, Action::Cancel);
        assert_eq!(g.state(), GameState::Menu);
    }

    #[test]
    fn test_invalid_dt_is_recorded_and_skipped() {
        let mut g = playing();
        let before = g.world().player.pos;
        g.tick(&[], f32::NAN);
        g.tick(&[], -1.0);
        assert_eq!(g.world().player.pos, before);
        assert_eq!(g.diagnostics().count(DiagnosticKind::SubsystemFailure), 2);
    }

    #[test]
    fn test_archer_turns_and_fires() {
        let mut g = playing();
        let archer = g.world().enemies[1].clone();
        assert_eq!(archer.facing, Facing::Left);
        // Stand level with the archer on its right
        let player = &mut g.world_mut().player;
        player.pos = Vec2::new(archer.pos.x + 200.0, archer.bottom() - player.size.y);
        g.tick(&[], DT);
        let archer = g.world().enemy(archer.id).expect("archer alive");
        assert_eq!(archer.facing, Facing::Right);
        assert!(g
            .world()
            .projectiles
            .iter()
            .any(|p| p.kind == ProjectileKind::EnemyShot && p.owner_id == archer.id));
    }

    #[test]
    fn test_flush_audio_drains_cues() {
        let mut g = playing();
        press(&mut g, Action::FireRanged);
        let mut sink = LogAudio::default();
        g.flush_audio(&mut sink);
        assert_eq!(sink.played, 1);
        assert!(g.cues().is_empty());
    }
}
