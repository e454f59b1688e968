//! Property tests for the simulation core

use std::collections::HashMap;

use glam::Vec2;
use proptest::prelude::*;

use ridgeline::settings::{CameraTuning, PhysicsTuning};
use ridgeline::sim::dialogue::{DialogueContent, DialogueNode, DialogueRuntime};
use ridgeline::sim::{
    Action, BuffKind, Camera, Capability, DiagnosticKind, Edge, Entity, EntityRole, Facing,
    FireOutcome, Game, GameState, InputEvent, Level, Material, Platform, PlatformCatalog,
    ProjectileKind, ProjectileSystem, Rect, resolve_platforms,
};
use ridgeline::Settings;

fn level_with_ledge() -> Level {
    let mut level = Level::from_json(
        r#"{ "width": 1000, "height": 800, "player_spawn": { "x": 0, "y": 0 } }"#,
    )
    .expect("level");
    level.catalog = PlatformCatalog::new(vec![Platform::new(300.0, 580.0, 120.0, 20.0, Material::Stone)]);
    level
}

fn kind_strategy() -> impl Strategy<Value = ProjectileKind> {
    prop_oneof![
        Just(ProjectileKind::Stone),
        Just(ProjectileKind::StaffBolt),
        Just(ProjectileKind::EnemyShot),
    ]
}

fn event_strategy() -> impl Strategy<Value = InputEvent> {
    let action = (0..Action::ALL.len()).prop_map(|i| Action::ALL[i]);
    let edge = prop_oneof![Just(Edge::Pressed), Just(Edge::Held), Just(Edge::Released)];
    (action, edge).prop_map(|(action, edge)| InputEvent { action, edge })
}

proptest! {
    #[test]
    fn landing_is_idempotent(
        x in 276.0f32..414.0,
        offset in -5.9f32..5.9,
        vy in 0.0f32..300.0,
    ) {
        let level = level_with_ledge();
        let tuning = PhysicsTuning::default();
        let dt = 1.0 / 60.0;
        let mut e = Entity::new(1, EntityRole::Player, Vec2::ZERO, Vec2::new(30.0, 48.0), 5);
        e.pos = Vec2::new(x, 580.0 + offset - 48.0);
        e.vel.y = vy;

        let first = resolve_platforms(&mut e, &level, dt, &tuning);
        prop_assert!(first.is_some());
        prop_assert!(e.on_ground);
        prop_assert_eq!(e.vel.y, 0.0);
        prop_assert_eq!(e.bottom(), 580.0);

        let (pos, vel) = (e.pos, e.vel);
        let second = resolve_platforms(&mut e, &level, dt, &tuning);
        prop_assert!(second.is_some_and(|l| !l.touched_down));
        prop_assert_eq!(e.pos, pos);
        prop_assert_eq!(e.vel, vel);
        prop_assert!(e.on_ground);
    }

    #[test]
    fn projectiles_never_outlive_their_lifetime(
        kind in kind_strategy(),
        dt in 0.001f32..0.1,
        left in any::<bool>(),
    ) {
        let mut sys = ProjectileSystem::new(Rect::new(-1.0e7, -1.0e7, 2.0e7, 2.0e7));
        let mut owner = Entity::new(1, EntityRole::Player, Vec2::new(0.0, 0.0), Vec2::new(30.0, 48.0), 5);
        owner.facing = if left { Facing::Left } else { Facing::Right };
        owner.capabilities.grant(Capability::FireRanged { kind, cooldown: 0.1 });

        let FireOutcome::Spawned { id } = sys.spawn(kind, &mut owner) else {
            return Err(TestCaseError::fail("spawn refused"));
        };
        let bound = (kind.spec().lifetime / dt).ceil() as u32 + 1;
        let mut frames = 0;
        while sys.get(id).is_some_and(|p| p.active) {
            sys.advance_all(dt);
            frames += 1;
            prop_assert!(frames <= bound, "alive after {} frames (bound {})", frames, bound);
        }
    }

    #[test]
    fn camera_stays_inside_world(
        world_width in 100.0f32..6000.0,
        min_y in -500.0f32..200.0,
        span in 0.0f32..800.0,
        steps in prop::collection::vec((-2000.0f32..8000.0, -2000.0f32..3000.0, 0.0f32..0.1), 1..40),
    ) {
        let mut camera = Camera::new(&CameraTuning::default(), world_width, (min_y, min_y + span));
        let (lo, hi) = camera.y_range();
        for (x, y, dt) in steps {
            let offset = camera.update(Vec2::new(x, y), dt);
            prop_assert!(offset.x >= 0.0 && offset.x <= camera.max_x());
            prop_assert!(offset.y >= lo && offset.y <= hi);
        }
    }

    #[test]
    fn transitions_follow_the_table(targets in prop::collection::vec(0..GameState::ALL.len(), 1..60)) {
        let mut game = Game::new(
            Level::demo().expect("demo level"),
            DialogueContent::demo().expect("demo dialogue"),
            Settings::default(),
        );
        for index in targets {
            let from = game.state();
            let to = GameState::ALL[index];
            let result = game.transition(to);
            prop_assert_eq!(result.is_ok(), from.can_transition_to(to));
            prop_assert_eq!(game.state(), if result.is_ok() { to } else { from });
        }
    }

    #[test]
    fn input_never_requests_an_illegal_transition(
        frames in prop::collection::vec(prop::collection::vec(event_strategy(), 0..4), 1..120),
    ) {
        let mut game = Game::new(
            Level::demo().expect("demo level"),
            DialogueContent::demo().expect("demo dialogue"),
            Settings::default(),
        );
        for events in frames {
            game.tick(&events, 1.0 / 60.0);
            prop_assert!(GameState::ALL.contains(&game.state()));
        }
        prop_assert_eq!(game.diagnostics().count(DiagnosticKind::InconsistentState), 0);
    }

    #[test]
    fn typing_completes_exactly_once(
        len in 1usize..200,
        rate in 1.0f32..120.0,
        dt in 0.005f32..0.05,
    ) {
        let mut content = DialogueContent {
            conversations: HashMap::new(),
            nodes: HashMap::new(),
        };
        content.conversations.insert("c".into(), "n".into());
        content.nodes.insert(
            "n".into(),
            DialogueNode { speaker: "S".into(), text: "x".repeat(len), choices: Vec::new() },
        );
        let mut runtime = DialogueRuntime::default();
        let _ = runtime.start(&content, "c");

        let mut elapsed = 0.0f64;
        let mut finished = 0;
        let mut last = 0;
        // Run well past the expected finish time
        let frames = ((len as f32 / rate) / dt).ceil() as usize + 10;
        for _ in 0..frames {
            let report = runtime.update(dt, rate);
            elapsed += f64::from(dt);
            if report.finished {
                finished += 1;
            }
            prop_assert!(runtime.revealed_char_count <= len);
            prop_assert!(runtime.revealed_char_count >= last);
            last = runtime.revealed_char_count;

            let owed = elapsed * f64::from(rate);
            if owed >= len as f64 - 1e-9 {
                prop_assert_eq!(runtime.revealed_char_count, len);
            } else if owed < len as f64 - 1e-3 {
                prop_assert!(runtime.revealed_char_count < len);
            }
        }
        prop_assert_eq!(finished, 1);
        prop_assert_eq!(runtime.revealed_char_count, len);
    }
}

#[test]
fn buffed_entity_keeps_health_within_ceiling() {
    let mut e = Entity::new(1, EntityRole::Player, Vec2::ZERO, Vec2::new(30.0, 48.0), 5);
    e.apply_buff(BuffKind::MaxHealthBoost, 1.0, 3.0);
    assert_eq!(e.health, 8);
    e.tick_buffs(2.0);
    assert_eq!(e.health, 5);
    assert_eq!(e.effective_max_health(), 5);
}
