//! Loop thread behaviour with headless collaborators

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tanks::consts::*;
use tanks::game::Frontend;
use tanks::platform::{DisplayStats, HeadlessDisplay, ManualClock, OpenFieldFactory, ScriptedInput};
use tanks::{Game, Settings};

fn headless_game() -> (Game, Arc<DisplayStats>) {
    let display = HeadlessDisplay::new();
    let stats = display.stats();
    let frontend = Frontend::new(Box::new(display), Box::new(ScriptedInput::new(Vec::new())));
    let game = Game::new(
        Settings::default(),
        frontend,
        Arc::new(OpenFieldFactory::default()),
    );
    (game, stats)
}

/// Poll `cond` until it holds or two seconds pass
fn wait_for(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    cond()
}

#[test]
fn test_loop_ticks_and_renders() {
    let (game, stats) = headless_game();
    game.start().unwrap();
    assert!(wait_for(|| game.snapshot().time_ticks > 5 && stats.frames() > 0));
    game.stop();

    let snapshot = game.snapshot();
    assert!(snapshot.enemies >= 1);
    assert!(snapshot.spawn_budget < SPAWN_BUDGET);
}

#[test]
fn test_start_and_stop_are_idempotent() {
    let (game, _stats) = headless_game();
    game.start().unwrap();
    game.start().unwrap();
    assert!(game.is_running());

    game.stop();
    game.stop();
    assert!(!game.is_running());

    // Ticks stop with the thread
    let ticks = game.snapshot().time_ticks;
    thread::sleep(Duration::from_millis(50));
    assert_eq!(game.snapshot().time_ticks, ticks);

    // The frontend comes back, so the loop can run again
    game.start().unwrap();
    assert!(wait_for(|| game.snapshot().time_ticks > ticks));
}

#[test]
fn test_game_over_overlay_is_drawn() {
    let (game, stats) = headless_game();
    game.start().unwrap();
    assert!(wait_for(|| stats.frames() > 0));
    assert_eq!(stats.game_over_draws(), 0);

    game.set_game_over();
    assert!(wait_for(|| stats.game_over_draws() > 0));
    assert!(game.snapshot().game_over);
}

#[test]
fn test_title_reports_counters() {
    let (game, stats) = headless_game();
    game.start().unwrap();
    assert!(wait_for(|| stats.title().starts_with("Tanks || Fps: ")));
}

#[test]
fn test_freeze_follows_shared_clock() {
    let display = HeadlessDisplay::new();
    let frontend = Frontend::new(Box::new(display), Box::new(ScriptedInput::new(Vec::new())));
    let clock = Arc::new(ManualClock::new(1_000));
    let game = Game::new(
        Settings::default(),
        frontend,
        Arc::new(OpenFieldFactory::default()),
    )
    .with_clock(clock.clone());

    game.freeze_enemies();
    game.start().unwrap();
    let ticks = game.snapshot().time_ticks;
    assert!(wait_for(|| game.snapshot().time_ticks > ticks + 10));
    assert!(game.snapshot().frozen);

    clock.advance(FREEZE_TIME_MS + 1);
    assert!(wait_for(|| !game.snapshot().frozen));
}

#[test]
fn test_ui_operations_while_running() {
    let (game, _stats) = headless_game();
    game.start().unwrap();
    assert!(wait_for(|| !game.enemies().is_empty()));

    // One lock for both, no spawn in between
    let all_dead = game.with_state(|state| {
        state.detonate_enemies();
        state.enemies().iter().all(|e| !e.is_alive())
    });
    assert!(all_dead);
    game.detonate_enemies();

    game.reset();
    let snapshot = game.snapshot();
    assert_eq!(snapshot.stage, 1);
    assert!(!snapshot.game_over);
    assert!(game.enemy_count() <= SPAWN_BUDGET);

    drop(game);
}
