//! Software-rendered visualizer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │ SCORE 1230   COMBO x3                       EASY   LIVES ■ ■ □       │
//! │                                                                      │
//! │             ◎            (targets, projected and depth sorted)       │
//! │                    ·:·  +115                                         │
//! │       ◎                           ✚ cursor (one per tracked hand)    │
//! │                                                                      │
//! │   [menu / countdown / pause / game-over overlay when not playing]    │
//! │ status / key legend                                                  │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Mouse and keyboard also drive the simulated landmark source through the
//! shared [`SimPointer`].

use std::time::Duration;

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::app::{AppState, CursorView, Phase, POPUP_MS};
use crate::error::AppError;
use crate::layout::Button;
use crate::source::SimPointer;

// ════════════════════════════════════════════════════════════════════════════
// Palette and sizes
// ════════════════════════════════════════════════════════════════════════════

const BG_TOP:          u32 = 0xFF05060F;
const BG_BOTTOM:       u32 = 0xFF141A3A;
const STAR_COLOR:      u32 = 0xFF8890B0;
const TARGET_FILL:     u32 = 0xFFE0355A;
const TARGET_RIM:      u32 = 0xFFFFC2D0;
const PARTICLE_COLOR:  u32 = 0xFFFFB347;
const POPUP_COLOR:     u32 = 0xFFFFE066;
const HUD_COLOR:       u32 = 0xFFEEEEEE;
const DIM_TEXT:        u32 = 0xFF888888;
const BUTTON_BG:       u32 = 0xFF0F3460;
const BUTTON_SELECTED: u32 = 0xFF1F6F8B;
const BUTTON_HOVER:    u32 = 0xFFFFD700;
const CURSOR_IDLE:     u32 = 0xFF66E0FF;
const CURSOR_ACTIVE:   u32 = 0xFFFF4060;
const ERROR_BG:        u32 = 0xFF6A1020;
const SLOWMO_TINT:     u32 = 0xFF3050A0;
const MISS_FLASH:      u32 = 0xFFC01020;

/// World-space radius of a scale-1 target.
const TARGET_RADIUS:   f32 = 5.0;
const STAR_COUNT:      usize = 160;

// ════════════════════════════════════════════════════════════════════════════
// Window input
// ════════════════════════════════════════════════════════════════════════════

/// Shortcut keys seen this frame. Pointer movement goes straight into the
/// [`SimPointer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowInput {
    /// Q pressed or the window is closing.
    pub close:        bool,
    /// R: restart the landmark feed.
    pub retry_feed:   bool,
    /// P: pause or resume.
    pub toggle_pause: bool,
    /// Escape: abandon the round.
    pub leave_round:  bool,
    /// M: mute or unmute.
    pub toggle_sound: bool,
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    buf:    Vec<u32>,
    w:      usize,
    h:      usize,
    stars:  Vec<(f32, f32)>,
}

impl Visualizer {
    pub fn new(width: usize, height: usize) -> Result<Self, AppError> {
        let mut window = Window::new(
            "Void Recon: hands-free target gallery",
            width, height,
            WindowOptions {
                resize: true,
                ..WindowOptions::default()
            },
        ).map_err(|e| AppError::Window(e.to_string()))?;

        window.limit_update_rate(Some(Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf:   vec![BG_TOP; width * height],
            w:     width,
            h:     height,
            stars: star_field(STAR_COUNT),
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    pub fn width(&self)  -> usize { self.w }
    pub fn height(&self) -> usize { self.h }

    /// Read mouse and keyboard, update the simulated pointer, report keys.
    pub fn poll_input(&mut self, pointer: &SimPointer) -> WindowInput {
        if !self.window.is_open() {
            return WindowInput { close: true, ..WindowInput::default() };
        }

        let (w, h) = self.window.get_size();
        if (w, h) != (self.w, self.h) && w > 0 && h > 0 {
            self.w = w;
            self.h = h;
            self.buf = vec![BG_TOP; w * h];
        }

        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);
        let input = WindowInput {
            close:        one_shot(Key::Q),
            retry_feed:   one_shot(Key::R),
            toggle_pause: one_shot(Key::P),
            leave_round:  one_shot(Key::Escape),
            toggle_sound: one_shot(Key::M),
        };

        let mouse = self.window.get_mouse_pos(MouseMode::Discard);
        let trigger = self.window.get_mouse_down(MouseButton::Left)
                   || self.window.is_key_down(Key::Space);
        let second = self.window.get_mouse_down(MouseButton::Right)
                  || self.window.is_key_down(Key::J);
        let palm = self.window.is_key_down(Key::H);

        let mut st = pointer.lock();
        st.visible = mouse.is_some();
        if let Some((mx, my)) = mouse {
            st.x = (mx / self.w as f32).clamp(0.0, 1.0);
            st.y = (my / self.h as f32).clamp(0.0, 1.0);
        }
        st.trigger = trigger;
        st.second_trigger = second;
        st.palm = palm;

        input
    }

    /// Render one frame.
    pub fn render(&mut self, app: &AppState, now_ms: u64) {
        self.draw_background(app.world().slow_motion_active(now_ms));

        // ── World ─────────────────────────────────────────────────────────
        self.draw_targets(app);
        self.draw_particles(app);
        self.draw_popups(app, now_ms);
        if app.miss_flash_active(now_ms) {
            self.tint(MISS_FLASH, 0.3);
        }

        // ── Overlays per phase ────────────────────────────────────────────
        match app.phase() {
            Phase::Menu => {
                self.draw_title("VOID RECON", 0.16);
                self.draw_centered("DIFFICULTY", 0.27, 2, DIM_TEXT);
                self.draw_centered("PLAYERS", 0.39, 2, DIM_TEXT);
                self.draw_centered("SHOOTING STYLE", 0.51, 2, DIM_TEXT);
            }
            Phase::Starting => {
                if let Some(secs) = app.countdown_secs(now_ms) {
                    self.draw_centered(&secs.to_string(), 0.42, 12, HUD_COLOR);
                }
                self.draw_centered(style_hint(app), 0.62, 2, DIM_TEXT);
                self.draw_hud(app);
            }
            Phase::Playing => self.draw_hud(app),
            Phase::Paused => {
                self.shade(0.55);
                self.draw_title("PAUSED", 0.32);
                self.draw_hud(app);
            }
            Phase::GameOver => {
                self.shade(0.55);
                self.draw_title("GAME OVER", 0.30);
                let score = app.world().session().score();
                self.draw_centered(&format!("SCORE {score}"), 0.44, 3, HUD_COLOR);
                self.draw_centered(&format!("BEST {}", app.best_score()), 0.51, 2, DIM_TEXT);
            }
        }

        self.draw_buttons(app.buttons(), app.highlighted());
        for c in app.cursors() {
            self.draw_cursor(c);
        }

        // ── Status line ───────────────────────────────────────────────────
        if let Some(err) = app.source_error() {
            let bar_h = 24;
            self.fill_rect(0, 0, self.w, bar_h, ERROR_BG);
            self.draw_text(&format!("HAND TRACKING OFF: {err}  (R = RETRY)"), 8, 6, 2, HUD_COLOR);
        }
        let sound = if app.sound_enabled() { "ON" } else { "OFF" };
        let legend = format!(
            "MOUSE=AIM  CLICK/SPACE=FIRE  RMB/J=2ND HAND  H=PALM  P=PAUSE  ESC=MENU  M=SOUND {sound}  R=RETRY  Q=QUIT"
        );
        self.draw_text(&legend, 8, self.h.saturating_sub(10), 1, DIM_TEXT);

        self.window.update_with_buffer(&self.buf, self.w, self.h).ok();
    }

    // ── Background ────────────────────────────────────────────────────────

    fn draw_background(&mut self, slow_motion: bool) {
        let bottom = if slow_motion { SLOWMO_TINT } else { BG_BOTTOM };
        for row in 0..self.h {
            let color = blend(BG_TOP, bottom, row as f32 / self.h.max(1) as f32);
            self.buf[row * self.w..(row + 1) * self.w].fill(color);
        }
        for i in 0..self.stars.len() {
            let (sx, sy) = self.stars[i];
            self.set_pixel((sx * self.w as f32) as usize, (sy * self.h as f32) as usize, STAR_COLOR);
        }
    }

    // ── Entities ──────────────────────────────────────────────────────────

    fn draw_targets(&mut self, app: &AppState) {
        let cam = app.world().camera();
        let mut visible: Vec<_> = app
            .world()
            .targets()
            .iter()
            .filter_map(|(_, t)| cam.project(t.position).map(|p| (p, t.scale, t.rotation.z)))
            .collect();
        // Far to near.
        visible.sort_by(|a, b| b.0 .2.total_cmp(&a.0 .2));

        for ((sx, sy, depth), scale, spin) in visible {
            let r = cam.screen_fraction(TARGET_RADIUS * scale, depth) * self.h as f32;
            let (cx, cy) = (sx * self.w as f32, sy * self.h as f32);
            let fade = (1.0 - depth / 140.0).clamp(0.25, 1.0);
            let fill = blend(BG_TOP, TARGET_FILL, fade);
            self.fill_circle(cx, cy, r, fill);
            self.draw_ring(cx, cy, r, TARGET_RIM);
            self.draw_ring(cx, cy, r * 0.55, TARGET_RIM);
            // Spokes show the spin.
            for k in 0..3 {
                let a = spin + k as f32 * std::f32::consts::TAU / 3.0;
                self.draw_line(cx, cy, cx + a.cos() * r, cy + a.sin() * r, TARGET_RIM);
            }
        }
    }

    fn draw_particles(&mut self, app: &AppState) {
        let cam = app.world().camera();
        let dots: Vec<_> = app
            .world()
            .particles()
            .iter()
            .filter_map(|(_, p)| cam.project(p.position).map(|s| (s, p.size(), p.opacity())))
            .collect();
        for ((sx, sy, depth), size, opacity) in dots {
            let r = (cam.screen_fraction(size, depth) * self.h as f32).max(1.0);
            let color = blend(BG_TOP, PARTICLE_COLOR, opacity);
            self.fill_circle(sx * self.w as f32, sy * self.h as f32, r, color);
        }
    }

    fn draw_popups(&mut self, app: &AppState, now_ms: u64) {
        let cam = app.world().camera();
        for p in app.popups() {
            let Some((sx, sy, _)) = cam.project(p.position) else { continue };
            let age = now_ms.saturating_sub(p.born_ms) as f32 / POPUP_MS as f32;
            let x = (sx * self.w as f32) as usize;
            let y = (sy * self.h as f32 - age * 40.0).max(0.0) as usize;
            let color = blend(POPUP_COLOR, BG_TOP, age);
            self.draw_text(&format!("+{}", p.points), x, y, 3, color);
        }
    }

    // ── HUD and overlays ──────────────────────────────────────────────────

    fn draw_hud(&mut self, app: &AppState) {
        let s = app.world().session();
        self.draw_text(&format!("SCORE {}", s.score()), 16, 14, 3, HUD_COLOR);
        if s.combo() > 1 {
            self.draw_text(&format!("COMBO X{}", s.combo()), 16, 40, 2, POPUP_COLOR);
        }

        let right = self.w.saturating_sub(16);
        let diff = app.world().difficulty().as_str().to_uppercase();
        self.draw_text(&diff, right.saturating_sub(280), 14, 3, DIM_TEXT);
        for i in 0..void_world::session::STARTING_LIVES as usize {
            let x = right.saturating_sub(22 * (i + 1));
            if (i as u32) < s.lives() {
                self.fill_rect(x, 14, 16, 16, CURSOR_ACTIVE);
            } else {
                self.draw_border(x, 14, 16, 16, DIM_TEXT);
            }
        }
    }

    fn draw_buttons(&mut self, buttons: &[Button], hovered: Option<&str>) {
        for b in buttons {
            let r = b.region.bounds;
            let (x, y, w, h) = (r.x as usize, r.y as usize, r.w as usize, r.h as usize);
            let bg = if b.selected { BUTTON_SELECTED } else { BUTTON_BG };
            self.fill_rect(x, y, w, h, bg);
            let id = b.region.id();
            if hovered == Some(id.as_str()) {
                self.draw_border(x, y, w, h, BUTTON_HOVER);
                self.draw_border(x + 1, y + 1, w.saturating_sub(2), h.saturating_sub(2), BUTTON_HOVER);
            } else {
                self.draw_border(x, y, w, h, DIM_TEXT);
            }
            let scale = 2;
            let tw = text_width(&b.label, scale);
            self.draw_text(&b.label, x + w.saturating_sub(tw) / 2, y + h.saturating_sub(5 * scale) / 2, scale, HUD_COLOR);
        }
    }

    fn draw_cursor(&mut self, c: &CursorView) {
        let (x, y) = c.cursor.to_pixels(self.w as f32, self.h as f32);
        let color = if c.active { CURSOR_ACTIVE } else { CURSOR_IDLE };
        let r = if c.active { 10.0 } else { 14.0 };
        self.draw_ring(x, y, r, color);
        self.draw_line(x - r - 6.0, y, x - r + 4.0, y, color);
        self.draw_line(x + r - 4.0, y, x + r + 6.0, y, color);
        self.draw_line(x, y - r - 6.0, x, y - r + 4.0, color);
        self.draw_line(x, y + r - 4.0, x, y + r + 6.0, color);
        self.draw_text(&(c.slot + 1).to_string(), (x + r + 4.0) as usize, (y + r + 4.0) as usize, 1, color);
    }

    fn draw_title(&mut self, text: &str, fy: f32) {
        self.draw_centered(text, fy, 6, HUD_COLOR);
    }

    fn draw_centered(&mut self, text: &str, fy: f32, scale: usize, color: u32) {
        let x = self.w.saturating_sub(text_width(text, scale)) / 2;
        let y = (fy * self.h as f32) as usize;
        self.draw_text(text, x, y, scale, color);
    }

    /// Darken the whole frame toward black.
    fn shade(&mut self, amount: f32) {
        self.tint(0xFF000000, amount);
    }

    fn tint(&mut self, color: u32, amount: f32) {
        for px in self.buf.iter_mut() {
            *px = blend(*px, color, amount);
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y+h).min(self.h) {
            for col in x..(x+w).min(self.w) {
                self.buf[row * self.w + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 { return; }
        for col in x..(x+w).min(self.w) {
            self.set_pixel(col, y, color);
            self.set_pixel(col, y + h - 1, color);
        }
        for row in y..(y+h).min(self.h) {
            self.set_pixel(x, row, color);
            self.set_pixel(x + w - 1, row, color);
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.w && y < self.h {
            self.buf[y * self.w + x] = color;
        }
    }

    fn set_pixel_f(&mut self, x: f32, y: f32, color: u32) {
        if x >= 0.0 && y >= 0.0 {
            self.set_pixel(x as usize, y as usize, color);
        }
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: u32) {
        let r = r.min(self.w.max(self.h) as f32);
        let y0 = (cy - r).max(0.0) as usize;
        let y1 = ((cy + r).max(0.0) as usize).min(self.h.saturating_sub(1));
        for y in y0..=y1 {
            let dy = y as f32 + 0.5 - cy;
            let half = (r * r - dy * dy).max(0.0).sqrt();
            let x0 = (cx - half).max(0.0) as usize;
            let x1 = (cx + half).max(0.0) as usize;
            if x1 > x0 {
                self.fill_rect(x0, y, x1 - x0, 1, color);
            }
        }
    }

    fn draw_ring(&mut self, cx: f32, cy: f32, r: f32, color: u32) {
        let steps = ((r * 6.0) as usize).clamp(12, 720);
        for i in 0..steps {
            let a = i as f32 / steps as f32 * std::f32::consts::TAU;
            self.set_pixel_f(cx + a.cos() * r, cy + a.sin() * r, color);
        }
    }

    fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: u32) {
        let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().clamp(1.0, 4096.0) as usize;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            self.set_pixel_f(x0 + (x1 - x0) * t, y0 + (y1 - y0) * t, color);
        }
    }

    /// Minimal bitmap font, 3×5 glyphs blown up by `scale`.
    fn draw_text(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32) {
        let scale = scale.max(1);
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.fill_rect(cx + col * scale, y + row * scale, scale, scale, color);
                    }
                }
            }
            cx += 4 * scale; // 3 wide + 1 gap
            if cx + 4 * scale > self.w { break; }
        }
    }
}

fn text_width(text: &str, scale: usize) -> usize {
    (text.chars().count() * 4).saturating_sub(1) * scale.max(1)
}

fn style_hint(app: &AppState) -> &'static str {
    match app.policy() {
        hand_intent::GesturePolicy::Pinch => "PINCH THUMB AND INDEX TO FIRE",
        hand_intent::GesturePolicy::Tap   => "TAP THUMB TO INDEX TO FIRE",
        hand_intent::GesturePolicy::Gun   => "MAKE A GUN, FLICK THE MIDDLE FINGER UP TO FIRE",
    }
}

/// Fixed pseudo-random star positions, 0.0–1.0 on both axes.
fn star_field(n: usize) -> Vec<(f32, f32)> {
    let mut s: u32 = 0x9E37_79B9;
    let mut next = move || {
        s ^= s << 13;
        s ^= s >> 17;
        s ^= s << 5;
        s as f32 / u32::MAX as f32
    };
    (0..n).map(|_| (next(), next())).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0-t) + cb as f32 * t) as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar,br) << 16) | (lerp(ag,bg) << 8) | lerp(ab,bb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 0.0), 0xFF000000);
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 1.0), 0xFFFFFFFF);
        assert_eq!(blend(0xFF000000, 0xFF00FF00, 2.0), 0xFF00FF00);
    }

    #[test]
    fn text_width_counts_gaps() {
        assert_eq!(text_width("", 2), 0);
        assert_eq!(text_width("AB", 1), 7);
        assert_eq!(text_width("AB", 3), 21);
    }

    #[test]
    fn stars_stay_on_screen() {
        let stars = star_field(64);
        assert_eq!(stars.len(), 64);
        assert!(stars.iter().all(|&(x, y)| (0.0..=1.0).contains(&x) && (0.0..=1.0).contains(&y)));
    }
}
