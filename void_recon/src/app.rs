//! Top-level application state machine.
//!
//! `AppState` owns the hand tracker, the action router, the game world and
//! the sound player. It applies landmark frames, dispatches UI actions and
//! advances the world each render frame.
//!
//! ```text
//!  Menu ──start-game──▶ Starting ──countdown──▶ Playing ──last life──▶ GameOver
//!   ▲                     │  ▲                   │  ▲                    │
//!   │                     ▼  │ resume            ▼  │ resume             │ restart
//!   └──── quit-game ───── Paused ◀──── pause ────┘  │                    ▼
//!                                                   └──────────────── Starting
//! ```

use std::sync::Arc;
use std::time::Instant;

use glam::Vec3;
use hand_intent::{
    ActionRouter, Cursor, GesturePolicy, HandTracker, LandmarkFrame, RouteMode, RouterEvent,
    TrackerConfig, UiRegistry,
};
use parking_lot::Mutex;
use tracing::{debug, info, warn};
use void_world::{ControlMode, Difficulty, GameWorld, NullListener, WorldConfig, WorldListener};

use crate::config::AppConfig;
use crate::error::{AppError, SourceError};
use crate::layout::{self, Button, MenuChoices};
use crate::sound::{SoundCue, SoundPlayer};
use crate::source::{LandmarkFeed, LandmarkSource, SimPointer, SimPointerState};
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════════════
// Phase and UiAction
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Menu,
    /// Countdown before targets start flying.
    Starting,
    Playing,
    Paused,
    GameOver,
}

/// Everything a menu button, gesture or key can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    SetDifficulty(Difficulty),
    SetMode(ControlMode),
    SetStyle(GesturePolicy),
    StartGame,
    Restart,
    PauseGame,
    ResumeGame,
    QuitGame,
    ToggleHandClick,
    ToggleSound,
}

impl UiAction {
    /// Parse a region's `(action, value)` pair.
    pub fn parse(action: &str, value: Option<&str>) -> Result<Self, String> {
        let need = || value.ok_or_else(|| format!("action '{action}' needs a value"));
        Ok(match action {
            "set-difficulty"    => UiAction::SetDifficulty(need()?.parse()?),
            "set-mode"          => UiAction::SetMode(need()?.parse()?),
            "set-style"         => UiAction::SetStyle(need()?.parse()?),
            "start-game"        => UiAction::StartGame,
            "restart"           => UiAction::Restart,
            "pause-game"        => UiAction::PauseGame,
            "resume-game"       => UiAction::ResumeGame,
            "quit-game"         => UiAction::QuitGame,
            "toggle-hand-click" => UiAction::ToggleHandClick,
            "toggle-sound"      => UiAction::ToggleSound,
            other => return Err(format!("unknown action '{other}'")),
        })
    }

    /// Honoured while a round is counting down or running.
    pub fn allowed_in_round(self) -> bool {
        matches!(self, UiAction::PauseGame | UiAction::ResumeGame | UiAction::QuitGame)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Per-frame view data
// ════════════════════════════════════════════════════════════════════════════

/// One hand's cursor as the visualizer draws it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorView {
    pub cursor: Cursor,
    pub active: bool,
    pub slot:   usize,
}

/// Floating "+points" label at a hit position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScorePopup {
    pub position: Vec3,
    pub points:   u32,
    pub born_ms:  u64,
}

pub const POPUP_MS: u64 = 900;

/// How long the screen flashes red after a target escapes.
pub const MISS_FLASH_MS: u64 = 400;

/// Collects world callbacks for one update and voices them.
struct FrameEvents<'a> {
    sound:     &'a SoundPlayer,
    popups:    &'a mut Vec<ScorePopup>,
    now_ms:    u64,
    missed:    bool,
    game_over: Option<u64>,
}

impl<'a> FrameEvents<'a> {
    fn new(sound: &'a SoundPlayer, popups: &'a mut Vec<ScorePopup>, now_ms: u64) -> Self {
        FrameEvents { sound, popups, now_ms, missed: false, game_over: None }
    }
}

impl WorldListener for FrameEvents<'_> {
    fn on_score(&mut self, position: Vec3, points: u32) {
        self.sound.play(SoundCue::Explosion);
        self.popups.push(ScorePopup { position, points, born_ms: self.now_ms });
    }

    fn on_miss(&mut self, _lives_left: u32) {
        self.sound.play(SoundCue::Miss);
        self.missed = true;
    }

    fn on_game_over(&mut self, final_score: u64) {
        self.sound.play(SoundCue::GameOver);
        self.game_over = Some(final_score);
    }

    fn on_fire(&mut self, _x: f32, _y: f32) {
        self.sound.play(SoundCue::Laser);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    cfg:              AppConfig,
    phase:            Phase,
    countdown_end_ms: u64,

    // ── input pipeline ────────────────────────────────────────────────────
    tracker:          HandTracker,
    router:           ActionRouter,
    buttons:          Vec<Button>,
    registry:         UiRegistry,
    cursors:          Vec<CursorView>,
    viewport:         (f32, f32),

    // ── simulation ────────────────────────────────────────────────────────
    world:            GameWorld,
    popups:           Vec<ScorePopup>,
    miss_flash_until: u64,
    best_score:       u64,

    // ── outputs ───────────────────────────────────────────────────────────
    sound:            SoundPlayer,
    source_error:     Option<SourceError>,
}

impl AppState {
    pub fn new(cfg: AppConfig, sound: SoundPlayer) -> Self {
        let viewport = (cfg.window_width as f32, cfg.window_height as f32);
        let world_cfg = WorldConfig {
            difficulty: cfg.difficulty,
            mode:       cfg.mode,
            aspect:     Some(viewport.0 / viewport.1),
        };
        let world = match cfg.seed {
            Some(seed) => GameWorld::with_seed(world_cfg, seed),
            None       => GameWorld::new(world_cfg),
        };
        let tracker = HandTracker::new(TrackerConfig {
            policy:             cfg.style,
            smoothing:          cfg.smoothing,
            stale_after_frames: cfg.stale_after_frames,
        });
        let mut router = ActionRouter::new();
        router.set_clicks_enabled(cfg.hand_clicks);

        let mut app = AppState {
            cfg,
            phase:            Phase::Menu,
            countdown_end_ms: 0,
            tracker,
            router,
            buttons:          Vec::new(),
            registry:         UiRegistry::new(),
            cursors:          Vec::new(),
            viewport,
            world,
            popups:           Vec::new(),
            miss_flash_until: 0,
            best_score:       0,
            sound,
            source_error:     None,
        };
        app.rebuild_layout();
        app
    }

    // ── phase helpers ─────────────────────────────────────────────────────

    /// Counting down or playing: menus are hidden and triggers go to the world.
    pub fn in_round(&self) -> bool {
        matches!(self.phase, Phase::Starting | Phase::Playing)
    }

    fn set_phase(&mut self, next: Phase) {
        if next != self.phase {
            info!(from = ?self.phase, to = ?next, "phase");
            self.phase = next;
            self.rebuild_layout();
        }
    }

    fn rebuild_layout(&mut self) {
        let choices = MenuChoices {
            difficulty:  self.cfg.difficulty,
            mode:        self.cfg.mode,
            style:       self.tracker.policy(),
            hand_clicks: self.router.clicks_enabled(),
            sound:       self.sound.is_enabled(),
        };
        self.buttons = layout::buttons(self.phase, &choices, self.viewport.0, self.viewport.1);
        self.registry = layout::registry(&self.buttons);
    }

    /// Hands the landmark source should track right now.
    pub fn max_hands(&self) -> usize {
        if self.in_round() && self.cfg.mode == ControlMode::TwoHands { 2 } else { 1 }
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 || (width, height) == self.viewport {
            return;
        }
        self.viewport = (width, height);
        self.world.set_aspect(width / height);
        self.rebuild_layout();
    }

    // ── UI actions ────────────────────────────────────────────────────────

    /// Parse and apply a dispatched `(action, value)`; bad input is logged.
    pub fn dispatch(&mut self, action: &str, value: Option<&str>, now_ms: u64) {
        match UiAction::parse(action, value) {
            Ok(a)    => self.handle_action(a, now_ms),
            Err(why) => warn!(action, ?value, "ignoring UI action: {}", why),
        }
    }

    pub fn handle_action(&mut self, action: UiAction, now_ms: u64) {
        if self.in_round() && !action.allowed_in_round() {
            debug!(?action, phase = ?self.phase, "action ignored during round");
            return;
        }

        match action {
            UiAction::SetDifficulty(d) => {
                self.cfg.difficulty = d;
                self.world.configure(d, self.cfg.mode, &mut NullListener);
            }
            UiAction::SetMode(m) => {
                self.cfg.mode = m;
                self.world.configure(self.cfg.difficulty, m, &mut NullListener);
            }
            UiAction::SetStyle(p) => {
                self.cfg.style = p;
                self.tracker.set_policy(p);
            }
            UiAction::StartGame | UiAction::Restart => self.begin_round(now_ms),
            UiAction::PauseGame => {
                if self.in_round() {
                    self.world.set_active(false);
                    self.set_phase(Phase::Paused);
                }
            }
            UiAction::ResumeGame => {
                if self.phase == Phase::Paused {
                    self.world.set_active(true);
                    self.set_phase(Phase::Playing);
                }
            }
            UiAction::QuitGame => {
                self.world.reset(now_ms, &mut NullListener);
                self.popups.clear();
                self.miss_flash_until = 0;
                self.set_phase(Phase::Menu);
            }
            UiAction::ToggleHandClick => {
                let on = !self.router.clicks_enabled();
                self.router.set_clicks_enabled(on);
                self.cfg.hand_clicks = on;
            }
            UiAction::ToggleSound => {
                let on = !self.sound.is_enabled();
                self.sound.set_enabled(on);
            }
        }
        self.rebuild_layout();
    }

    /// Keyboard pause key: pause a round, resume a paused one.
    pub fn toggle_pause(&mut self, now_ms: u64) {
        match self.phase {
            Phase::Starting | Phase::Playing => self.handle_action(UiAction::PauseGame, now_ms),
            Phase::Paused => self.handle_action(UiAction::ResumeGame, now_ms),
            Phase::Menu | Phase::GameOver => {}
        }
    }

    fn begin_round(&mut self, now_ms: u64) {
        self.world.reset(now_ms, &mut NullListener);
        self.popups.clear();
        self.miss_flash_until = 0;
        self.countdown_end_ms = now_ms + self.cfg.countdown_ms();
        info!(
            difficulty = %self.cfg.difficulty,
            mode = %self.cfg.mode,
            style = %self.tracker.policy(),
            "round starting"
        );
        self.set_phase(Phase::Starting);
    }

    fn finish_round(&mut self, final_score: u64) {
        self.best_score = self.best_score.max(final_score);
        info!(score = final_score, best = self.best_score, "round over");
        self.set_phase(Phase::GameOver);
    }

    // ── per-frame input ───────────────────────────────────────────────────

    /// Run one landmark frame through tracker and router.
    pub fn apply_frame(&mut self, frame: &LandmarkFrame, now_ms: u64) {
        let updates = self.tracker.process(frame, self.phase == Phase::Playing);
        self.cursors = updates
            .iter()
            .map(|u| CursorView { cursor: u.cursor, active: u.active, slot: u.slot })
            .collect();

        let mode = if self.in_round() { RouteMode::Gameplay } else { RouteMode::Ui };
        let routed = self.router.route(&updates, mode, &self.registry, self.viewport);

        for event in routed.events {
            match event {
                RouterEvent::HoverEntered { .. } => self.sound.play(SoundCue::Hover),
                RouterEvent::Dispatch { action, value } => {
                    self.sound.play(SoundCue::Click);
                    self.dispatch(&action, value.as_deref(), now_ms);
                }
                RouterEvent::Pause => {
                    if self.phase == Phase::Playing {
                        info!("open-palm pause");
                        self.handle_action(UiAction::PauseGame, now_ms);
                    }
                }
            }
        }

        // Routing may have paused the round; the world ignores shots then.
        if mode == RouteMode::Gameplay {
            let mut events = FrameEvents::new(&self.sound, &mut self.popups, now_ms);
            self.world.apply_triggers(&routed.triggers, now_ms, &mut events);
            if let Some(score) = events.game_over {
                self.finish_round(score);
            }
        }
    }

    // ── per-frame tick ────────────────────────────────────────────────────

    pub fn tick(&mut self, now_ms: u64, dt: f32) {
        if self.phase == Phase::Starting && now_ms >= self.countdown_end_ms {
            self.world.set_active(true);
            self.sound.play(SoundCue::Start);
            self.set_phase(Phase::Playing);
        }

        let mut events = FrameEvents::new(&self.sound, &mut self.popups, now_ms);
        self.world.tick(now_ms, dt, &mut events);
        let (missed, game_over) = (events.missed, events.game_over);
        if missed {
            self.miss_flash_until = now_ms + MISS_FLASH_MS;
        }
        if let Some(score) = game_over {
            self.finish_round(score);
        }

        self.popups.retain(|p| now_ms.saturating_sub(p.born_ms) < POPUP_MS);
    }

    // ── source status ─────────────────────────────────────────────────────

    pub fn report_source_error(&mut self, err: SourceError) {
        warn!("hand tracking stopped: {} (press R to retry)", err);
        self.tracker.clear();
        self.cursors.clear();
        self.source_error = Some(err);
    }

    pub fn clear_source_error(&mut self) { self.source_error = None; }

    // ── accessors for the render loop ─────────────────────────────────────

    pub fn phase(&self)          -> Phase                 { self.phase }
    pub fn world(&self)          -> &GameWorld            { &self.world }
    pub fn cursors(&self)        -> &[CursorView]         { &self.cursors }
    pub fn buttons(&self)        -> &[Button]             { &self.buttons }
    pub fn highlighted(&self)    -> Option<&str>          { self.router.highlighted() }
    pub fn popups(&self)         -> &[ScorePopup]         { &self.popups }
    pub fn best_score(&self)     -> u64                   { self.best_score }
    pub fn policy(&self)         -> GesturePolicy         { self.tracker.policy() }
    pub fn source_error(&self)   -> Option<&SourceError>  { self.source_error.as_ref() }
    pub fn sound_enabled(&self)  -> bool                  { self.sound.is_enabled() }
    pub fn config(&self)         -> &AppConfig            { &self.cfg }
    pub fn viewport(&self)       -> (f32, f32)            { self.viewport }

    /// Red flash after an escaped target.
    pub fn miss_flash_active(&self, now_ms: u64) -> bool { now_ms < self.miss_flash_until }

    /// Whole seconds left on the countdown, rounded up.
    pub fn countdown_secs(&self, now_ms: u64) -> Option<u64> {
        (self.phase == Phase::Starting)
            .then(|| self.countdown_end_ms.saturating_sub(now_ms).div_ceil(1000))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

#[cfg(not(feature = "leap"))]
fn source_factory(cfg: &AppConfig, pointer: &SimPointer) -> impl Fn() -> Box<dyn LandmarkSource> + 'static {
    use crate::source::SimLandmarkSource;
    let pointer = Arc::clone(pointer);
    let rate = cfg.sim_rate_hz;
    move || -> Box<dyn LandmarkSource> { Box::new(SimLandmarkSource::new(Arc::clone(&pointer), rate)) }
}

#[cfg(feature = "leap")]
fn source_factory(_cfg: &AppConfig, _pointer: &SimPointer) -> impl Fn() -> Box<dyn LandmarkSource> + 'static {
    use crate::source::LeapLandmarkSource;
    || -> Box<dyn LandmarkSource> { Box::new(LeapLandmarkSource::new()) }
}

/// Longest step fed to the world; a stalled window should not teleport targets.
const MAX_FRAME_SECS: f32 = 0.1;

/// Run the full application.
///
/// Creates the window, the landmark feed (pointer simulation by default,
/// LeapMotion with `--features leap`) and the sound thread, then drives the
/// input/update/render loop at ~60 fps.
pub fn run(cfg: AppConfig) -> Result<(), AppError> {
    let pointer: SimPointer = Arc::new(Mutex::new(SimPointerState {
        policy: cfg.style,
        ..SimPointerState::default()
    }));
    let mut feed = LandmarkFeed::new(source_factory(&cfg, &pointer));
    feed.start();

    let mut vis = Visualizer::new(cfg.window_width, cfg.window_height)?;
    let sound = SoundPlayer::spawn(&cfg.sound);
    let mut app = AppState::new(cfg, sound);

    let clock = Instant::now();
    let mut last_ms = 0u64;

    while vis.is_open() {
        // 1. Window input → simulated pointer + shortcut keys
        let input = vis.poll_input(&pointer);
        if input.close {
            break;
        }
        let now_ms = clock.elapsed().as_millis() as u64;
        let dt = ((now_ms - last_ms) as f32 / 1000.0).min(MAX_FRAME_SECS);
        last_ms = now_ms;

        app.set_viewport(vis.width() as f32, vis.height() as f32);
        if input.retry_feed {
            info!("restarting landmark feed");
            feed.stop();
            app.clear_source_error();
            feed.start();
        }
        if input.toggle_pause {
            app.toggle_pause(now_ms);
        }
        if input.leave_round {
            app.handle_action(UiAction::QuitGame, now_ms);
        }
        if input.toggle_sound {
            app.handle_action(UiAction::ToggleSound, now_ms);
        }

        // 2. Every landmark frame since the last render
        pointer.lock().policy = app.policy();
        feed.set_max_hands(app.max_hands());
        let polled = feed.poll();
        if polled.frames.len() > 1 {
            debug!(frames = polled.frames.len(), "catching up on landmark frames");
        }
        for frame in &polled.frames {
            app.apply_frame(frame, now_ms);
        }
        if let Some(err) = polled.error {
            app.report_source_error(err);
        }

        // 3. Simulation
        app.tick(now_ms, dt);

        // 4. Render
        vis.render(&app, now_ms);
    }

    feed.stop();
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_intent::landmarks::THUMB_TIP;
    use hand_intent::{HandObservation, HandSketch};

    fn make_app() -> AppState {
        let cfg = AppConfig { seed: Some(3), ..AppConfig::default() };
        AppState::new(cfg, SoundPlayer::silent())
    }

    /// A hand whose thumb tip puts the cursor at screen pixel `(px, py)`.
    fn hand_at(app: &AppState, px: f32, py: f32, sketch: HandSketch) -> LandmarkFrame {
        let (w, h) = app.viewport();
        let points = sketch.place(THUMB_TIP, 1.0 - px / w, py / h);
        LandmarkFrame { sequence: 0, hands: vec![HandObservation::new(Some("Right"), points)] }
    }

    fn button_centre(app: &AppState, id: &str) -> (f32, f32) {
        let b = app.buttons().iter().find(|b| b.region.id() == id).unwrap();
        let r = b.region.bounds;
        (r.x + r.w / 2.0, r.y + r.h / 2.0)
    }

    fn click(app: &mut AppState, id: &str, now_ms: u64) {
        let (x, y) = button_centre(app, id);
        let open = HandSketch::relaxed(0.18);
        let idle = hand_at(app, x, y, open);
        let pinch = hand_at(app, x, y, open.pinching());
        // Let the smoothed cursor arrive before pinching.
        for _ in 0..30 {
            app.apply_frame(&idle, now_ms);
        }
        app.apply_frame(&pinch, now_ms);
        app.apply_frame(&idle, now_ms);
    }

    #[test]
    fn parse_actions() {
        assert_eq!(UiAction::parse("set-difficulty", Some("hard")), Ok(UiAction::SetDifficulty(Difficulty::Hard)));
        assert_eq!(UiAction::parse("set-style", Some("gun")), Ok(UiAction::SetStyle(GesturePolicy::Gun)));
        assert_eq!(UiAction::parse("start-game", None), Ok(UiAction::StartGame));
        assert!(UiAction::parse("set-mode", None).is_err());
        assert!(UiAction::parse("set-mode", Some("three-hands")).is_err());
        assert!(UiAction::parse("self-destruct", None).is_err());
    }

    #[test]
    fn pinch_on_start_begins_countdown() {
        let mut app = make_app();
        click(&mut app, "start-game", 1_000);
        assert_eq!(app.phase(), Phase::Starting);
        assert_eq!(app.countdown_secs(1_000), Some(8));
        assert_eq!(app.countdown_secs(8_500), Some(1));
        app.tick(8_999, 0.016);
        assert_eq!(app.phase(), Phase::Starting);
        app.tick(9_000, 0.016);
        assert_eq!(app.phase(), Phase::Playing);
        assert!(app.world().is_running());
    }

    #[test]
    fn menu_choice_reconfigures_world() {
        let mut app = make_app();
        click(&mut app, "set-difficulty:hard", 0);
        click(&mut app, "set-mode:two-hands", 0);
        assert_eq!(app.world().difficulty(), Difficulty::Hard);
        assert_eq!(app.world().mode(), ControlMode::TwoHands);
        assert!(app.buttons().iter().any(|b| b.region.id() == "set-difficulty:hard" && b.selected));
    }

    #[test]
    fn disabled_hand_clicks_do_nothing() {
        let mut app = make_app();
        app.handle_action(UiAction::ToggleHandClick, 0);
        click(&mut app, "start-game", 0);
        assert_eq!(app.phase(), Phase::Menu);
        assert_eq!(app.highlighted(), None);
    }

    #[test]
    fn settings_locked_during_round() {
        let mut app = make_app();
        app.handle_action(UiAction::StartGame, 0);
        app.handle_action(UiAction::SetDifficulty(Difficulty::Hard), 0);
        app.handle_action(UiAction::SetStyle(GesturePolicy::Gun), 0);
        assert_eq!(app.world().difficulty(), Difficulty::Easy);
        assert_eq!(app.policy(), GesturePolicy::Pinch);
        app.handle_action(UiAction::PauseGame, 10);
        assert_eq!(app.phase(), Phase::Paused);
    }

    #[test]
    fn pause_and_resume() {
        let mut app = make_app();
        app.handle_action(UiAction::StartGame, 0);
        app.tick(8_000, 0.016);
        app.toggle_pause(8_100);
        assert_eq!(app.phase(), Phase::Paused);
        assert!(!app.world().is_running());
        app.toggle_pause(8_200);
        assert_eq!(app.phase(), Phase::Playing);
        assert!(app.world().is_running());
    }

    #[test]
    fn open_palm_pauses_play() {
        let mut app = make_app();
        app.handle_action(UiAction::StartGame, 0);
        app.tick(8_000, 0.016);
        let palm = hand_at(&app, 640.0, 360.0, HandSketch::relaxed(0.18).open_palm());
        for i in 0..20 {
            app.apply_frame(&palm, 8_000 + i * 33);
        }
        assert_eq!(app.phase(), Phase::Paused);
    }

    #[test]
    fn open_palm_in_menu_does_not_pause() {
        let mut app = make_app();
        let palm = hand_at(&app, 10.0, 10.0, HandSketch::relaxed(0.18).open_palm());
        for i in 0..40 {
            app.apply_frame(&palm, i * 33);
        }
        assert_eq!(app.phase(), Phase::Menu);
    }

    #[test]
    fn two_hands_tracked_only_in_round() {
        let mut app = make_app();
        app.handle_action(UiAction::SetMode(ControlMode::TwoHands), 0);
        assert_eq!(app.max_hands(), 1);
        app.handle_action(UiAction::StartGame, 0);
        assert_eq!(app.max_hands(), 2);
        app.handle_action(UiAction::PauseGame, 0);
        assert_eq!(app.max_hands(), 1);
    }

    #[test]
    fn unattended_round_reaches_game_over_and_restarts() {
        let mut app = make_app();
        app.handle_action(UiAction::StartGame, 0);
        let mut now = 0;
        while app.phase() != Phase::GameOver && now < 120_000 {
            now += 16;
            app.tick(now, 0.016);
        }
        assert_eq!(app.phase(), Phase::GameOver);
        assert!(app.buttons().iter().any(|b| b.region.action == "restart"));

        click(&mut app, "restart", now);
        assert_eq!(app.phase(), Phase::Starting);
        assert_eq!(app.world().session().lives(), 3);
        assert!(!app.miss_flash_active(now));
    }

    #[test]
    fn escaped_target_flashes_for_a_moment() {
        let mut app = make_app();
        app.handle_action(UiAction::StartGame, 0);
        let mut now = 8_000;
        app.tick(now, 0.016);
        assert!(!app.miss_flash_active(now));

        while app.world().session().lives() == 3 {
            now += 16;
            app.tick(now, 0.016);
            assert!(now < 120_000, "no target ever escaped");
        }
        let missed_at = now;
        assert!(app.miss_flash_active(missed_at));
        assert!(app.miss_flash_active(missed_at + MISS_FLASH_MS - 1));
        assert!(!app.miss_flash_active(missed_at + MISS_FLASH_MS));
    }

    #[test]
    fn shot_during_play_scores() {
        let mut app = make_app();
        app.handle_action(UiAction::StartGame, 0);
        let mut now = 8_000;
        app.tick(now, 0.016);
        while app.world().targets().is_empty() {
            now += 16;
            app.tick(now, 0.016);
        }
        let (_, t) = app.world().targets().iter().next().unwrap();
        let (sx, sy, _) = app.world().camera().project(t.position).unwrap();
        let (w, h) = app.viewport();
        let (px, py) = (sx * w, sy * h);

        // Settle the smoothed cursor on the target before pinching.
        let open = HandSketch::relaxed(0.18);
        let idle = hand_at(&app, px, py, open);
        let fire = hand_at(&app, px, py, open.pinching());
        for _ in 0..30 {
            app.apply_frame(&idle, now);
        }
        app.apply_frame(&fire, now);

        assert_eq!(app.world().session().score(), 115);
        assert_eq!(app.popups().len(), 1);
    }

    #[test]
    fn quit_returns_to_clean_menu() {
        let mut app = make_app();
        app.handle_action(UiAction::StartGame, 0);
        app.tick(8_000, 0.016);
        app.handle_action(UiAction::QuitGame, 9_000);
        assert_eq!(app.phase(), Phase::Menu);
        assert!(app.world().targets().is_empty());
        assert!(!app.world().is_running());
    }

    #[test]
    fn source_error_clears_cursors() {
        let mut app = make_app();
        let frame = hand_at(&app, 100.0, 100.0, HandSketch::relaxed(0.18));
        app.apply_frame(&frame, 0);
        assert_eq!(app.cursors().len(), 1);
        app.report_source_error(SourceError::Unavailable("no camera".into()));
        assert!(app.cursors().is_empty());
        assert!(app.source_error().is_some());
        app.clear_source_error();
        assert!(app.source_error().is_none());
    }
}
