//! Menu and overlay buttons for each phase.
//!
//! Buttons are rebuilt whenever the phase, a menu choice or the window size
//! changes; the same list feeds the router's [`UiRegistry`] and the
//! visualizer.

use hand_intent::{GesturePolicy, Rect, UiRegion, UiRegistry};
use void_world::{ControlMode, Difficulty};

use crate::app::Phase;

#[derive(Clone, Debug, PartialEq)]
pub struct Button {
    pub region:   UiRegion,
    pub label:    String,
    /// Current choice in its group; drawn filled.
    pub selected: bool,
}

/// Menu selections shown as toggled buttons.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MenuChoices {
    pub difficulty:  Difficulty,
    pub mode:        ControlMode,
    pub style:       GesturePolicy,
    pub hand_clicks: bool,
    pub sound:       bool,
}

struct Item {
    action:   &'static str,
    value:    Option<&'static str>,
    label:    String,
    selected: bool,
}

fn item(action: &'static str, value: Option<&'static str>, label: &str, selected: bool) -> Item {
    Item { action, value, label: label.to_string(), selected }
}

fn on_off(on: bool) -> &'static str { if on { "ON" } else { "OFF" } }

/// Lay `items` out as one centred row at `y_frac` of the height.
fn row(out: &mut Vec<Button>, items: Vec<Item>, y_frac: f32, width_frac: f32, w: f32, h: f32) {
    let n = items.len() as f32;
    let bw = w * width_frac;
    let bh = h * 0.075;
    let gap = w * 0.02;
    let total = n * bw + (n - 1.0) * gap;
    let mut x = (w - total) / 2.0;
    let y = h * y_frac - bh / 2.0;

    for it in items {
        out.push(Button {
            region:   UiRegion::new(Rect::new(x, y, bw, bh), it.action, it.value),
            label:    it.label,
            selected: it.selected,
        });
        x += bw + gap;
    }
}

pub fn buttons(phase: Phase, c: &MenuChoices, w: f32, h: f32) -> Vec<Button> {
    let mut out = Vec::new();
    match phase {
        Phase::Menu => {
            let d = c.difficulty;
            row(&mut out, vec![
                item("set-difficulty", Some("easy"),   "EASY",   d == Difficulty::Easy),
                item("set-difficulty", Some("medium"), "MEDIUM", d == Difficulty::Medium),
                item("set-difficulty", Some("hard"),   "HARD",   d == Difficulty::Hard),
            ], 0.32, 0.16, w, h);
            row(&mut out, vec![
                item("set-mode", Some("one-hand"),  "ONE HAND",  c.mode == ControlMode::OneHand),
                item("set-mode", Some("two-hands"), "TWO HANDS", c.mode == ControlMode::TwoHands),
            ], 0.44, 0.2, w, h);
            row(&mut out, vec![
                item("set-style", Some("pinch"), "PINCH", c.style == GesturePolicy::Pinch),
                item("set-style", Some("gun"),   "GUN",   c.style == GesturePolicy::Gun),
                item("set-style", Some("tap"),   "TAP",   c.style == GesturePolicy::Tap),
            ], 0.56, 0.16, w, h);
            row(&mut out, vec![item("start-game", None, "START", false)], 0.70, 0.3, w, h);
            row(&mut out, vec![
                item("toggle-hand-click", None, &format!("HAND CLICK {}", on_off(c.hand_clicks)), c.hand_clicks),
                item("toggle-sound", None, &format!("SOUND {}", on_off(c.sound)), c.sound),
            ], 0.84, 0.2, w, h);
        }
        Phase::Paused => {
            row(&mut out, vec![item("resume-game", None, "RESUME", false)], 0.50, 0.25, w, h);
            row(&mut out, vec![item("quit-game", None, "QUIT TO MENU", false)], 0.64, 0.25, w, h);
        }
        Phase::GameOver => {
            row(&mut out, vec![item("restart", None, "PLAY AGAIN", false)], 0.62, 0.25, w, h);
            row(&mut out, vec![item("quit-game", None, "MENU", false)], 0.76, 0.25, w, h);
        }
        Phase::Starting | Phase::Playing => {}
    }
    out
}

pub fn registry(buttons: &[Button]) -> UiRegistry {
    let mut reg = UiRegistry::new();
    for b in buttons {
        reg.register(b.region.clone());
    }
    reg
}
