//! End-to-end rounds driven the way the application drives the world.

use glam::Vec3;
use hand_intent::landmarks::THUMB_TIP;
use hand_intent::{
    ActionRouter, HandObservation, HandSketch, HandTracker, LandmarkFrame, RouteMode, TrackerConfig,
    TriggerEvent, UiRegistry,
};
use void_world::{
    ControlMode, Difficulty, EntityKind, GameWorld, Target, WorldConfig, WorldListener, WorldState,
};

#[derive(Default)]
struct Tally {
    points:    u32,
    misses:    u32,
    game_over: u32,
    shots:     u32,
    spawned:   usize,
    removed:   usize,
}

impl WorldListener for Tally {
    fn on_score(&mut self, _p: Vec3, points: u32) { self.points += points; }
    fn on_miss(&mut self, _lives: u32) { self.misses += 1; }
    fn on_game_over(&mut self, _score: u64) { self.game_over += 1; }
    fn on_fire(&mut self, _x: f32, _y: f32) { self.shots += 1; }
    fn spawned(&mut self, _h: void_world::EntityHandle, k: EntityKind) {
        if k == EntityKind::Target { self.spawned += 1; }
    }
    fn removed(&mut self, _h: void_world::EntityHandle, k: EntityKind) {
        if k == EntityKind::Target { self.removed += 1; }
    }
}

const FRAME_MS: u64 = 16;
const FRAME_SECS: f32 = 0.016;

fn easy_world(seed: u64) -> GameWorld {
    let cfg = WorldConfig { difficulty: Difficulty::Easy, mode: ControlMode::OneHand, aspect: Some(16.0 / 9.0) };
    let mut w = GameWorld::with_seed(cfg, seed);
    w.reset(0, &mut Tally::default());
    w.set_active(true);
    w
}

#[test]
fn aiming_at_spawned_target_scores() {
    let mut w = easy_world(42);
    let mut tally = Tally::default();

    let mut now = 0;
    while w.targets().is_empty() {
        now += FRAME_MS;
        w.tick(now, FRAME_SECS, &mut tally);
    }
    assert!(now >= 1200);

    let (_, target) = w.targets().iter().next().unwrap();
    let (sx, sy, _) = w.camera().project(target.position).unwrap();

    w.apply_triggers(&[TriggerEvent { x: sx, y: sy, active: false, hand_id: 0 }], now, &mut tally);
    w.apply_triggers(&[TriggerEvent { x: sx, y: sy, active: true, hand_id: 0 }], now, &mut tally);

    assert_eq!(tally.points, 115);
    assert_eq!(w.session().combo(), 1);
    assert!(w.targets().is_empty());
    assert!(!w.particles().is_empty());
}

#[test]
fn unattended_round_ends_after_three_misses() {
    let mut w = easy_world(9);
    let mut tally = Tally::default();

    let mut now = 0;
    // Easy targets need at most 3.3 s to arrive plus 1.2 s between spawns.
    while now < 60_000 && w.state() == WorldState::Running {
        now += FRAME_MS;
        w.tick(now, FRAME_SECS, &mut tally);
    }

    assert_eq!(w.state(), WorldState::Idle);
    assert_eq!(tally.misses, 3);
    assert_eq!(tally.game_over, 1);
    assert!(w.session().is_over());
    assert_eq!(tally.spawned, tally.removed);

    // Finished rounds do not resume until reset.
    w.set_active(true);
    assert_eq!(w.state(), WorldState::Idle);
    w.reset(now, &mut tally);
    w.set_active(true);
    assert_eq!(w.state(), WorldState::Running);
    assert_eq!(w.session().lives(), 3);
}

#[test]
fn visual_centre_hits_regardless_of_depth() {
    // Same on-screen size: twice as far, twice as big.
    for (z, scale) in [(-10.0, 0.5), (-70.0, 1.0), (-190.0, 2.0)] {
        let mut w = easy_world(1);
        let mut tally = Tally::default();
        let pos = Vec3::new(12.0, -6.0, z);
        w.insert_target(Target::stationary(pos, scale), &mut tally);
        let (sx, sy, _) = w.camera().project(pos).unwrap();
        assert!(w.fire(sx, sy, 0, &mut tally).is_some(), "missed target at z = {z}");
    }
}

#[test]
fn hit_tolerance_never_shrinks_with_distance() {
    // Angular tolerance (radius / distance) for equal apparent size.
    let near = void_world::world::hit_radius(60.0, 0.5) / 60.0;
    let far = void_world::world::hit_radius(240.0, 2.0) / 240.0;
    assert!(far >= near);
}

#[test]
fn two_hand_round_spawns_pairs_and_both_hands_fire() {
    let cfg = WorldConfig { mode: ControlMode::TwoHands, ..WorldConfig::default() };
    let mut w = GameWorld::with_seed(cfg, 5);
    let mut tally = Tally::default();
    w.set_active(true);
    w.tick(2_000, 0.0, &mut tally);
    assert_eq!(w.targets().len(), 2);

    let aims: Vec<(f32, f32)> = w
        .targets()
        .iter()
        .filter_map(|(_, t)| w.camera().project(t.position))
        .map(|(x, y, _)| (x, y))
        .collect();
    let batch: Vec<TriggerEvent> = aims
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| TriggerEvent { x, y, active: true, hand_id: i })
        .collect();
    w.apply_triggers(&batch, 2_000, &mut tally);

    assert!(w.targets().is_empty());
    assert_eq!(tally.points, 115 + 130);
    assert!(w.slow_motion_active(2_000));
}

#[test]
fn hit_rearms_spawn_timer() {
    let mut w = easy_world(3);
    let mut tally = Tally::default();
    let pos = Vec3::new(0.0, 0.0, -30.0);
    w.insert_target(Target::stationary(pos, 1.0), &mut tally);

    let (sx, sy, _) = w.camera().project(pos).unwrap();
    assert!(w.fire(sx, sy, 5_000, &mut tally).is_some());
    assert_eq!(tally.points, 115);

    w.tick(6_199, 0.0, &mut tally);
    assert!(w.targets().is_empty());
    w.tick(6_200, 0.0, &mut tally);
    assert_eq!(w.targets().len(), 1);
}

#[test]
fn held_pinch_through_a_dropped_frame_fires_once() {
    let mut w = easy_world(4);
    let mut tally = Tally::default();
    let mut tracker = HandTracker::new(TrackerConfig::default());
    let mut router = ActionRouter::new();
    let registry = UiRegistry::new();

    let pinch = LandmarkFrame {
        sequence: 0,
        hands: vec![HandObservation::new(
            Some("Right"),
            HandSketch::relaxed(0.18).pinching().place(THUMB_TIP, 0.5, 0.5),
        )],
    };
    let empty = LandmarkFrame::default();

    let mut edges = 0;
    for (i, frame) in [&pinch, &pinch, &empty, &pinch, &pinch].into_iter().enumerate() {
        let updates = tracker.process(frame, true);
        edges += updates.iter().filter(|u| u.just_started).count();
        let routed = router.route(&updates, RouteMode::Gameplay, &registry, (1280.0, 720.0));
        w.apply_triggers(&routed.triggers, i as u64 * FRAME_MS, &mut tally);
    }

    assert_eq!(edges, 1);
    assert_eq!(tally.shots, 1);
}
