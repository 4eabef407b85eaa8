//! Game loop
//!
//! A dedicated thread runs the fixed-timestep loop: accumulate elapsed time
//! in update intervals, run one tick per whole interval, render once if any
//! tick ran and otherwise sleep briefly. Counters go to the display title
//! once per second.
//!
//! The UI side talks to the running simulation through [`Game`], which
//! shares the [`GameState`] behind a mutex. Every operation locks it, so UI
//! calls never interleave with a tick.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::consts::UPDATE_INTERVAL_NS;
use crate::error::LoopError;
use crate::platform::{Clock, Display, InputSource, LevelFactory, SystemClock};
use crate::renderer::render_frame;
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, StateSnapshot, Tank, tick};

/// Work due for one pass of the loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FramePlan {
    /// Ticks to run now
    pub updates: u32,
    /// Ticks beyond the first, i.e. the loop fell behind
    pub lagged: u32,
    /// Whether a frame should be drawn afterwards
    pub render: bool,
}

/// Fixed-timestep accumulator
///
/// A tick is due only while more than one full interval is banked, so an
/// exact interval stays in the accumulator until the next pass.
#[derive(Debug, Default)]
pub struct Pacer {
    delta: f64,
}

impl Pacer {
    pub fn advance(&mut self, elapsed: Duration) -> FramePlan {
        self.delta += elapsed.as_nanos() as f64 / UPDATE_INTERVAL_NS;

        let mut plan = FramePlan::default();
        while self.delta > 1.0 {
            self.delta -= 1.0;
            plan.updates += 1;
            if plan.render {
                plan.lagged += 1;
            } else {
                plan.render = true;
            }
        }
        plan
    }
}

/// Per-second loop statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameCounters {
    pub fps: u32,
    pub upd: u32,
    pub updl: u32,
    elapsed: Duration,
}

impl FrameCounters {
    /// Count one loop pass. Once a second has accumulated, returns the
    /// finished window and starts a new one.
    pub fn record(&mut self, plan: &FramePlan, elapsed: Duration) -> Option<FrameCounters> {
        self.upd += plan.updates;
        self.updl += plan.lagged;
        if plan.render {
            self.fps += 1;
        }
        self.elapsed += elapsed;

        if self.elapsed >= Duration::from_secs(1) {
            let report = *self;
            *self = Self::default();
            Some(report)
        } else {
            None
        }
    }

    pub fn title(&self, prefix: &str) -> String {
        format!(
            "{prefix} || Fps: {} | Upd: {} | Updl: {}",
            self.fps, self.upd, self.updl
        )
    }
}

/// Collaborators owned by the loop thread while it runs
pub struct Frontend {
    pub display: Box<dyn Display>,
    pub input: Box<dyn InputSource>,
}

impl Frontend {
    pub fn new(display: Box<dyn Display>, input: Box<dyn InputSource>) -> Self {
        Self { display, input }
    }
}

struct LoopControl {
    handle: Option<JoinHandle<Frontend>>,
    /// Parked here whenever the loop is not running
    frontend: Option<Frontend>,
}

/// Everything the loop thread needs besides the frontend
struct LoopContext {
    state: Arc<Mutex<GameState>>,
    running: Arc<AtomicBool>,
    clock: Arc<dyn Clock>,
    idle: Duration,
    title: String,
    show_counters: bool,
}

/// A game session with its loop thread
pub struct Game {
    state: Arc<Mutex<GameState>>,
    running: Arc<AtomicBool>,
    clock: Arc<dyn Clock>,
    settings: Settings,
    control: Mutex<LoopControl>,
}

impl Game {
    pub fn new(settings: Settings, frontend: Frontend, levels: Arc<dyn LevelFactory>) -> Self {
        let state = GameState::new(settings.seed, levels);
        Self {
            state: Arc::new(Mutex::new(state)),
            running: Arc::new(AtomicBool::new(false)),
            clock: Arc::new(SystemClock::new()),
            settings,
            control: Mutex::new(LoopControl {
                handle: None,
                frontend: Some(frontend),
            }),
        }
    }

    /// Replace the wall clock (freeze timing and the win delay read it)
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Start the loop thread. Does nothing if it is already running.
    pub fn start(&self) -> Result<(), LoopError> {
        let mut control = lock(&self.control);
        if control.handle.is_some() {
            log::debug!("Game loop already running");
            return Ok(());
        }
        let frontend = control.frontend.take().ok_or(LoopError::FrontendLost)?;

        self.running.store(true, Ordering::SeqCst);
        let ctx = LoopContext {
            state: Arc::clone(&self.state),
            running: Arc::clone(&self.running),
            clock: Arc::clone(&self.clock),
            idle: Duration::from_millis(self.settings.idle_ms),
            title: self.settings.title.clone(),
            show_counters: self.settings.show_counters,
        };
        let spawned = thread::Builder::new()
            .name("game-loop".to_string())
            .spawn(move || run_loop(ctx, frontend));

        match spawned {
            Ok(handle) => {
                control.handle = Some(handle);
                log::info!("Game loop started");
                Ok(())
            }
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                Err(LoopError::Spawn(e))
            }
        }
    }

    /// Stop the loop thread and wait for it. Does nothing if it is not running.
    pub fn stop(&self) {
        let mut control = lock(&self.control);
        let Some(handle) = control.handle.take() else {
            return;
        };
        self.running.store(false, Ordering::SeqCst);
        match handle.join() {
            Ok(frontend) => {
                control.frontend = Some(frontend);
                log::info!("Game loop stopped");
            }
            Err(_) => log::error!("Game loop thread panicked; display and input are gone"),
        }
    }

    pub fn is_running(&self) -> bool {
        lock(&self.control).handle.is_some()
    }

    /// Hold enemies still for the freeze period, starting now
    pub fn freeze_enemies(&self) {
        let now = self.clock.now_ms();
        self.lock_state().freeze_enemies(now);
    }

    pub fn detonate_enemies(&self) {
        self.lock_state().detonate_enemies();
    }

    pub fn set_game_over(&self) {
        self.lock_state().set_game_over();
    }

    /// Start over at stage 1 with a fresh player
    pub fn reset(&self) {
        self.lock_state().reset();
    }

    /// Copy of the current enemy list
    pub fn enemies(&self) -> Vec<Tank> {
        self.lock_state().enemies().to_vec()
    }

    /// Enemies this stage may still spawn
    pub fn enemy_count(&self) -> u32 {
        self.lock_state().enemy_count()
    }

    pub fn snapshot(&self) -> StateSnapshot {
        self.lock_state().snapshot()
    }

    /// Run `f` with exclusive access to the state, between ticks
    pub fn with_state<R>(&self, f: impl FnOnce(&mut GameState) -> R) -> R {
        f(&mut self.lock_state())
    }

    fn lock_state(&self) -> MutexGuard<'_, GameState> {
        lock(&self.state)
    }
}

impl Drop for Game {
    fn drop(&mut self) {
        self.stop();
    }
}

/// A panicked tick must not take the UI side down with it
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn run_loop(ctx: LoopContext, mut frontend: Frontend) -> Frontend {
    let mut pacer = Pacer::default();
    let mut counters = FrameCounters::default();
    let mut last = Instant::now();

    while ctx.running.load(Ordering::SeqCst) {
        let now = Instant::now();
        let elapsed = now.duration_since(last);
        last = now;

        let plan = pacer.advance(elapsed);
        if plan.render {
            let mut state = lock(&ctx.state);
            for _ in 0..plan.updates {
                let input = frontend.input.snapshot();
                tick(&mut state, &input, ctx.clock.now_ms());
            }
            for event in state.drain_events() {
                log_event(&event);
            }
            render_frame(&state, frontend.display.as_mut());
        } else {
            thread::sleep(ctx.idle);
        }

        if let Some(report) = counters.record(&plan, elapsed) {
            if ctx.show_counters {
                frontend.display.set_title(&report.title(&ctx.title));
            }
        }
    }
    frontend
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::EnemySpawned { .. } | GameEvent::EnemyDestroyed { .. } => {
            log::trace!("{event:?}");
        }
        _ => log::debug!("{event:?}"),
    }
}
