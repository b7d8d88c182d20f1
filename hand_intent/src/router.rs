//! Action routing: hand updates → UI actions or world triggers.
//!
//! Outside of gameplay the cursor is hit-tested against the interactive
//! regions the UI layer registered for this frame; a fresh action edge over
//! a region dispatches that region's `(action, value)`. During gameplay the
//! router instead emits one [`TriggerEvent`] per hand per frame and leaves
//! edge detection to the world engine.

use tracing::debug;

use crate::tracker::HandUpdate;

// ════════════════════════════════════════════════════════════════════════════
// UI registry
// ════════════════════════════════════════════════════════════════════════════

/// Axis-aligned rectangle in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self { Rect { x, y, w, h } }

    /// Edges are inclusive.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }
}

/// One clickable area and the action it stands for.
#[derive(Clone, Debug, PartialEq)]
pub struct UiRegion {
    pub bounds: Rect,
    pub action: String,
    pub value:  Option<String>,
}

impl UiRegion {
    pub fn new(bounds: Rect, action: &str, value: Option<&str>) -> Self {
        UiRegion {
            bounds,
            action: action.to_string(),
            value:  value.map(str::to_string),
        }
    }

    /// Identity used for hover edge detection.
    pub fn id(&self) -> String {
        match &self.value {
            Some(v) => format!("{}:{}", self.action, v),
            None    => self.action.clone(),
        }
    }
}

/// Regions in registration order. The UI layer rebuilds it whenever its
/// layout changes.
#[derive(Clone, Debug, Default)]
pub struct UiRegistry {
    regions: Vec<UiRegion>,
}

impl UiRegistry {
    pub fn new() -> Self { Self::default() }

    pub fn register(&mut self, region: UiRegion) { self.regions.push(region); }

    pub fn clear(&mut self) { self.regions.clear(); }

    pub fn regions(&self) -> &[UiRegion] { &self.regions }

    pub fn len(&self) -> usize { self.regions.len() }
    pub fn is_empty(&self) -> bool { self.regions.is_empty() }

    /// First region containing the point.
    pub fn hit(&self, px: f32, py: f32) -> Option<&UiRegion> {
        self.regions.iter().find(|r| r.bounds.contains(px, py))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Router outputs
// ════════════════════════════════════════════════════════════════════════════

/// Per-hand fire signal handed to the world engine every gameplay frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerEvent {
    /// Normalized screen position, 0.0–1.0.
    pub x:       f32,
    pub y:       f32,
    pub active:  bool,
    pub hand_id: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RouterEvent {
    /// The cursor moved onto a different region.
    HoverEntered { region: String },
    /// A gesture click landed on a region.
    Dispatch { action: String, value: Option<String> },
    /// Open-palm hold completed.
    Pause,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteMode {
    /// Menus, pause screen, game over.
    Ui,
    /// A round is running (or counting down).
    Gameplay,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Routed {
    pub events:   Vec<RouterEvent>,
    pub triggers: Vec<TriggerEvent>,
}

// ════════════════════════════════════════════════════════════════════════════
// ActionRouter
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct ActionRouter {
    hovered:        Option<String>,
    clicks_enabled: bool,
}

impl Default for ActionRouter {
    fn default() -> Self {
        ActionRouter { hovered: None, clicks_enabled: true }
    }
}

impl ActionRouter {
    pub fn new() -> Self { Self::default() }

    pub fn clicks_enabled(&self) -> bool { self.clicks_enabled }

    pub fn set_clicks_enabled(&mut self, on: bool) { self.clicks_enabled = on; }

    /// Region the cursor is over, tracked whether or not clicks are enabled.
    pub fn hovered(&self) -> Option<&str> { self.hovered.as_deref() }

    /// Region the UI should highlight; none while gesture clicks are off.
    pub fn highlighted(&self) -> Option<&str> {
        if self.clicks_enabled { self.hovered() } else { None }
    }

    /// Route one frame's hand updates.
    ///
    /// `viewport` is the UI surface size in pixels.
    pub fn route(
        &mut self,
        updates:  &[HandUpdate],
        mode:     RouteMode,
        registry: &UiRegistry,
        viewport: (f32, f32),
    ) -> Routed {
        let mut out = Routed::default();

        if updates.iter().any(|u| u.pause_requested) {
            out.events.push(RouterEvent::Pause);
        }

        match mode {
            RouteMode::Gameplay => {
                self.hovered = None;
                out.triggers = updates
                    .iter()
                    .map(|u| {
                        let (x, y) = u.cursor.normalized();
                        TriggerEvent { x, y, active: u.active, hand_id: u.slot }
                    })
                    .collect();
            }
            RouteMode::Ui => self.route_ui(updates, registry, viewport, &mut out),
        }
        out
    }

    fn route_ui(
        &mut self,
        updates:  &[HandUpdate],
        registry: &UiRegistry,
        viewport: (f32, f32),
        out:      &mut Routed,
    ) {
        // Hover follows the first hand over a region; every hand can click.
        let mut first_hover: Option<String> = None;

        for u in updates {
            let (px, py) = u.cursor.to_pixels(viewport.0, viewport.1);
            let Some(region) = registry.hit(px, py) else { continue };

            if first_hover.is_none() {
                let id = region.id();
                if self.hovered.as_deref() != Some(id.as_str()) {
                    debug!(region = %id, "hover entered");
                    out.events.push(RouterEvent::HoverEntered { region: id.clone() });
                }
                first_hover = Some(id);
            }

            if u.just_started && self.clicks_enabled {
                debug!(action = %region.action, value = ?region.value, "dispatch");
                out.events.push(RouterEvent::Dispatch {
                    action: region.action.clone(),
                    value:  region.value.clone(),
                });
            }
        }

        self.hovered = first_hover;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
