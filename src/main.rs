//! Tanks entry point
//!
//! Runs the game loop headless for a fixed time with a scripted patrol,
//! then prints a JSON snapshot of the final state.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use tanks::consts::*;
    use tanks::game::Frontend;
    use tanks::platform::{HeadlessDisplay, OpenFieldFactory, ScriptedInput};
    use tanks::settings::SETTINGS_PATH_ENV;
    use tanks::sim::{Rect, TickInput};
    use tanks::{Game, Settings};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Tanks (headless) starting...");

    let mut settings = match std::env::var(SETTINGS_PATH_ENV) {
        Ok(path) => Settings::load_or_default(path),
        Err(_) => Settings::default(),
    };
    settings.apply_env();

    let display = HeadlessDisplay::new();
    let stats = display.stats();
    let frontend = Frontend::new(Box::new(display), Box::new(ScriptedInput::new(patrol())));

    // Base sits bottom centre, as on every stage
    let base_size = 2.0 * SCALED_TILE_SIZE;
    let base = Rect::new(12.0 * SCALED_TILE_SIZE, HEIGHT - base_size, base_size, base_size);
    let levels = Arc::new(OpenFieldFactory::new(Vec::new(), Some(base)));

    let run_secs = settings.run_secs;
    let game = Game::new(settings, frontend, levels);
    if let Err(e) = game.start() {
        log::error!("{e}");
        std::process::exit(1);
    }
    thread::sleep(Duration::from_secs(run_secs));
    game.stop();

    log::info!(
        "Drew {} frames ({} sprites), last title {:?}",
        stats.frames(),
        stats.sprites(),
        stats.title()
    );
    match serde_json::to_string_pretty(&game.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize snapshot: {e}"),
    }

    /// Sweep right then left along the bottom row, stepping up to fire
    /// north and back down the next tick
    fn patrol() -> Vec<TickInput> {
        let leg = |right: bool| TickInput {
            left: !right,
            right,
            ..Default::default()
        };
        let fire = TickInput {
            up: true,
            fire: true,
            ..Default::default()
        };
        let back = TickInput {
            down: true,
            ..Default::default()
        };
        let mut script = Vec::new();
        for right in [true, false] {
            for step in 0..90 {
                script.push(match step % 15 {
                    0 => fire.clone(),
                    1 => back.clone(),
                    _ => leg(right),
                });
            }
        }
        script
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
