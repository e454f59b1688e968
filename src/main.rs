//! Ridgeline entry point
//!
//! Headless scripted session: loads the built-in level and dialogue, drives the
//! frame loop with a canned input script and logs what happened.
//! Pass `--fast` to skip the frame limiter and use a fixed 60 Hz dt.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use ridgeline::audio::LogAudio;
    use ridgeline::clock::FrameLimiter;
    use ridgeline::consts::TARGET_FPS;
    use ridgeline::sim::{Action, DialogueContent, Edge, Game, InputEvent, Level};
    use ridgeline::{LevelError, Settings};

    /// Total frames to run
    const SESSION_FRAMES: u64 = 600;

    /// (frame, action, edge)
    const SCRIPT: &[(u64, &str, &str)] = &[
        (1, "confirm", "press"),
        (20, "move_right", "press"),
        (45, "jump", "press"),
        (70, "fire_ranged", "press"),
        (100, "move_right", "release"),
        (110, "toggle_pause", "press"),
        (140, "toggle_pause", "press"),
        (150, "toggle_inventory", "press"),
        (160, "toggle_inventory", "press"),
        (170, "move_left", "press"),
        (230, "move_left", "release"),
        (232, "interact", "press"),
        (240, "confirm", "press"),
        (260, "move_right", "press"),
        (261, "move_right", "release"),
        (262, "confirm", "press"),
        (320, "confirm", "press"),
        (330, "cancel", "press"),
        (340, "move_right", "press"),
    ];

    fn parse_edge(name: &str) -> Option<Edge> {
        match name {
            "press" => Some(Edge::Pressed),
            "hold" => Some(Edge::Held),
            "release" => Some(Edge::Released),
            _ => None,
        }
    }

    fn events_for(frame: u64) -> Vec<InputEvent> {
        SCRIPT
            .iter()
            .filter(|(f, _, _)| *f == frame)
            .filter_map(|(_, action, edge)| {
                let event = Action::from_name(action)
                    .zip(parse_edge(edge))
                    .map(|(action, edge)| InputEvent { action, edge });
                if event.is_none() {
                    log::warn!("bad script entry at frame {}: {} {}", frame, action, edge);
                }
                event
            })
            .collect()
    }

    pub fn run(fast: bool) -> Result<(), LevelError> {
        let level = Level::demo()?;
        let content = DialogueContent::demo()?;
        for problem in content.validate() {
            log::warn!("{}", problem);
        }
        log::info!(
            "loaded '{}' ({}x{}, {} platforms)",
            level.name,
            level.width,
            level.height,
            level.catalog.len()
        );

        let mut game = Game::new(level, content, Settings::default());
        let mut limiter = FrameLimiter::default();
        let mut audio = LogAudio::default();

        for frame in 1..=SESSION_FRAMES {
            let dt = if fast {
                1.0 / TARGET_FPS
            } else {
                limiter.wait_next()
            };
            game.tick(&events_for(frame), dt);
            game.flush_audio(&mut audio);

            if frame % 60 == 0 {
                let view = game.render_frame();
                let player = &game.world().player;
                log::info!(
                    "frame {} [{}] player ({:.0}, {:.0}) hp {}/{} camera ({:.0}, {:.0}) sprites {}",
                    frame,
                    game.state().as_str(),
                    player.pos.x,
                    player.pos.y,
                    player.health,
                    player.effective_max_health(),
                    view.camera_offset.x,
                    view.camera_offset.y,
                    view.sprites.len()
                );
            }
        }

        if !fast {
            log::info!("average fps {:.1}", limiter.fps());
        }
        log::info!(
            "session over in {} after {} frames: {} cues, {} diagnostics",
            game.state().as_str(),
            game.frame(),
            audio.played,
            game.diagnostics().len()
        );
        for diag in game.diagnostics().iter() {
            log::info!("  [frame {}] {:?}: {}", diag.frame, diag.kind, diag.message);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Ridgeline (headless) starting...");

    let fast = std::env::args().any(|arg| arg == "--fast");
    if let Err(err) = headless::run(fast) {
        log::error!("failed to start: {}", err);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser host; the library is embedded by the caller
}
