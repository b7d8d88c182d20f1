//! Landmark sources: real hardware or a pointer-driven simulation.
//!
//! Every source implements [`LandmarkSource`]. [`LandmarkFeed`] runs one on
//! its own thread and hands frames to the render thread over an `mpsc`
//! channel, so consumers don't need to know whether the hands came from a
//! LeapMotion controller or the mouse.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use hand_intent::{GesturePolicy, HandObservation, HandSketch, LandmarkFrame};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::error::SourceError;

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSource trait — unified interface for hw and sim
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can produce landmark frames.
pub trait LandmarkSource: Send + 'static {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Acquire the device. Runs on the feed thread before the first frame.
    fn open(&mut self) -> Result<(), SourceError> { Ok(()) }

    /// Wait for and return the next frame, or `None` when this cycle
    /// produced nothing. Should return within roughly one cycle.
    fn next_frame(&mut self, max_hands: usize) -> Result<Option<LandmarkFrame>, SourceError>;
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkFeed — the source thread and its channel
// ════════════════════════════════════════════════════════════════════════════

enum FeedMessage {
    Frame(LandmarkFrame),
    Failed(SourceError),
}

/// What one [`LandmarkFeed::poll`] found.
#[derive(Debug, Default)]
pub struct FeedPoll {
    /// Every frame received since the last poll, oldest first. Gestures
    /// depend on consecutive frames, so none are dropped.
    pub frames: Vec<LandmarkFrame>,
    /// Set once when the source gave up.
    pub error:  Option<SourceError>,
}

struct Worker {
    stop:   Arc<AtomicBool>,
    handle: JoinHandle<()>,
    rx:     Receiver<FeedMessage>,
}

type SourceFactory = Box<dyn Fn() -> Box<dyn LandmarkSource>>;

/// Lifecycle wrapper around a source thread.
///
/// `start` and `stop` are idempotent; each `start` builds a fresh source
/// from the factory so a failed device can be retried.
pub struct LandmarkFeed {
    factory:   SourceFactory,
    max_hands: Arc<AtomicUsize>,
    worker:    Option<Worker>,
}

impl LandmarkFeed {
    pub fn new(factory: impl Fn() -> Box<dyn LandmarkSource> + 'static) -> Self {
        LandmarkFeed {
            factory:   Box::new(factory),
            max_hands: Arc::new(AtomicUsize::new(1)),
            worker:    None,
        }
    }

    pub fn is_running(&self) -> bool { self.worker.is_some() }

    pub fn start(&mut self) {
        if self.worker.is_some() {
            return;
        }
        let source = (self.factory)();
        info!(source = source.name(), "starting landmark feed");

        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let handle = {
            let stop = Arc::clone(&stop);
            let max_hands = Arc::clone(&self.max_hands);
            thread::spawn(move || feed_thread(source, tx, stop, max_hands))
        };
        self.worker = Some(Worker { stop, handle, rx });
    }

    /// Stop the thread and wait for it. Frames still queued are dropped.
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else { return };
        worker.stop.store(true, Ordering::Release);
        drop(worker.rx);
        if worker.handle.join().is_err() {
            warn!("landmark thread panicked");
        }
        info!("landmark feed stopped");
    }

    /// Hands to track from the next frame on.
    pub fn set_max_hands(&self, n: usize) {
        let n = n.max(1);
        if self.max_hands.swap(n, Ordering::AcqRel) != n {
            debug!(max_hands = n, "max tracked hands changed");
        }
    }

    pub fn max_hands(&self) -> usize { self.max_hands.load(Ordering::Acquire) }

    /// Drain the channel without blocking.
    pub fn poll(&mut self) -> FeedPoll {
        let mut out = FeedPoll::default();
        let mut finished = false;

        if let Some(worker) = &self.worker {
            loop {
                match worker.rx.try_recv() {
                    Ok(FeedMessage::Frame(f)) => out.frames.push(f),
                    Ok(FeedMessage::Failed(e)) => {
                        out.error = Some(e);
                        finished = true;
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        finished = true;
                        break;
                    }
                }
            }
        }

        if finished {
            self.stop();
        }
        out
    }
}

impl Drop for LandmarkFeed {
    fn drop(&mut self) { self.stop(); }
}

fn feed_thread(
    mut source: Box<dyn LandmarkSource>,
    tx:         Sender<FeedMessage>,
    stop:       Arc<AtomicBool>,
    max_hands:  Arc<AtomicUsize>,
) {
    if let Err(e) = source.open() {
        warn!(source = source.name(), "cannot open landmark source: {}", e);
        let _ = tx.send(FeedMessage::Failed(e));
        return;
    }

    while !stop.load(Ordering::Acquire) {
        match source.next_frame(max_hands.load(Ordering::Acquire)) {
            Ok(Some(frame)) => {
                if tx.send(FeedMessage::Frame(frame)).is_err() {
                    return;
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!(source = source.name(), "landmark source failed: {}", e);
                let _ = tx.send(FeedMessage::Failed(e));
                return;
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimLandmarkSource — mouse/keyboard simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Pointer state written by the window and read by the simulated source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimPointerState {
    /// Screen position, 0.0–1.0.
    pub x:              f32,
    pub y:              f32,
    /// False while the pointer is outside the window: no hands reported.
    pub visible:        bool,
    /// Primary hand fires (pinch closed / gun flicked).
    pub trigger:        bool,
    /// Primary hand shows an open palm.
    pub palm:           bool,
    /// Secondary (mirrored) hand fires; only reported in two-hand tracking.
    pub second_trigger: bool,
    /// Shape the simulated hand should make when firing.
    pub policy:         GesturePolicy,
}

impl Default for SimPointerState {
    fn default() -> Self {
        SimPointerState {
            x:              0.5,
            y:              0.5,
            visible:        true,
            trigger:        false,
            palm:           false,
            second_trigger: false,
            policy:         GesturePolicy::Pinch,
        }
    }
}

pub type SimPointer = Arc<Mutex<SimPointerState>>;

/// Hand scale that maps 1:1 to the screen (no far-hand amplification).
pub const SIM_HAND_SCALE: f32 = 0.18;
/// Middle-tip jump used for a simulated gun flick.
const SIM_FLICK_LIFT: f32 = -0.05;

/// Synthesizes 21-point hands from [`SimPointerState`] at a fixed rate.
pub struct SimLandmarkSource {
    pointer:     SimPointer,
    period:      Duration,
    sequence:    u64,
    prev_fire:   [bool; 2],
}

impl SimLandmarkSource {
    pub fn new(pointer: SimPointer, rate_hz: u32) -> Self {
        SimLandmarkSource {
            pointer,
            period:    Duration::from_secs_f64(1.0 / f64::from(rate_hz.max(1))),
            sequence:  0,
            prev_fire: [false; 2],
        }
    }

    /// Build the frame for one pointer snapshot.
    pub fn frame_for(&mut self, st: &SimPointerState, max_hands: usize) -> LandmarkFrame {
        let seq = self.sequence;
        self.sequence += 1;

        let mut hands = Vec::new();
        if st.visible {
            // Image x is mirrored relative to the screen.
            hands.push(self.hand(0, "Right", st, st.trigger, 1.0 - st.x, st.y));
            if max_hands >= 2 {
                hands.push(self.hand(1, "Left", st, st.second_trigger, st.x, st.y));
            }
        } else {
            self.prev_fire = [false; 2];
        }
        LandmarkFrame { sequence: seq, hands }
    }

    fn hand(
        &mut self,
        slot:    usize,
        label:   &str,
        st:      &SimPointerState,
        fire:    bool,
        img_x:   f32,
        img_y:   f32,
    ) -> HandObservation {
        let base = HandSketch::relaxed(SIM_HAND_SCALE);
        let sketch = if slot == 0 && st.palm {
            base.open_palm()
        } else {
            match st.policy {
                GesturePolicy::Pinch | GesturePolicy::Tap if fire => base.pinching(),
                GesturePolicy::Pinch | GesturePolicy::Tap => base,
                GesturePolicy::Gun => {
                    // One upward jump per press; holding does not auto-fire.
                    let flick = fire && !self.prev_fire[slot];
                    base.gun().with_middle_lift(if flick { SIM_FLICK_LIFT } else { 0.0 })
                }
            }
        };
        self.prev_fire[slot] = fire;
        let points = sketch.place(st.policy.tracking_index(), img_x, img_y);
        HandObservation::new(Some(label), points)
    }
}

impl LandmarkSource for SimLandmarkSource {
    fn name(&self) -> &'static str { "simulated" }

    fn next_frame(&mut self, max_hands: usize) -> Result<Option<LandmarkFrame>, SourceError> {
        thread::sleep(self.period);
        let st = *self.pointer.lock();
        Ok(Some(self.frame_for(&st, max_hands)))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapLandmarkSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Landmark source backed by a LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
/// Joint positions (mm, y up) are projected onto a normalized image plane
/// over the interaction box below, then laid out in the usual 21-point
/// order: wrist, thumb CMC→tip, then MCP→tip for each finger.
#[cfg(feature = "leap")]
pub struct LeapLandmarkSource {
    connection: Option<leaprs::Connection>,
    sequence:   u64,
}

#[cfg(feature = "leap")]
impl LeapLandmarkSource {
    /// Interaction box, mm: x is ±X_HALF, y runs from Y_MIN to Y_MIN + Y_SPAN.
    const X_HALF: f32 = 200.0;
    const Y_MIN:  f32 = 80.0;
    const Y_SPAN: f32 = 320.0;

    pub fn new() -> Self {
        LeapLandmarkSource { connection: None, sequence: 0 }
    }

    fn project(x: f32, y: f32, z: f32) -> hand_intent::Landmark {
        // Mirror x so the cursor mapper's own mirror lands it back on the
        // side of the user's hand.
        let nx = 1.0 - (x + Self::X_HALF) / (2.0 * Self::X_HALF);
        let ny = 1.0 - (y - Self::Y_MIN) / Self::Y_SPAN;
        hand_intent::Landmark::new(nx, ny, z / Self::Y_SPAN)
    }
}

#[cfg(feature = "leap")]
impl LandmarkSource for LeapLandmarkSource {
    fn name(&self) -> &'static str { "leapmotion" }

    fn open(&mut self) -> Result<(), SourceError> {
        use leaprs::*;
        let mut connection = Connection::create(ConnectionConfig::default())
            .map_err(|e| SourceError::Unavailable(format!("LeapC connection: {:?}", e)))?;
        connection
            .open()
            .map_err(|e| SourceError::Unavailable(format!("LeapMotion device: {:?}", e)))?;
        self.connection = Some(connection);
        Ok(())
    }

    fn next_frame(&mut self, max_hands: usize) -> Result<Option<LandmarkFrame>, SourceError> {
        use leaprs::*;
        let Some(connection) = self.connection.as_mut() else {
            return Err(SourceError::Unavailable("LeapMotion connection not open".into()));
        };
        let msg = match connection.poll(100) {
            Ok(m)  => m,
            Err(_) => return Ok(None),
        };
        let Event::Tracking(frame) = msg.event() else { return Ok(None) };

        let mut hands = Vec::new();
        for hand in frame.hands() {
            if hands.len() >= max_hands {
                break;
            }
            let digits: Vec<_> = hand.digits().collect();
            if digits.len() < 5 {
                continue;
            }
            let mut points = Vec::with_capacity(hand_intent::landmarks::LANDMARK_COUNT);
            // Base of the middle metacarpal stands in for the wrist.
            let w = digits[2].metacarpal().prev_joint();
            points.push(Self::project(w.x, w.y, w.z));
            for d in &digits {
                for j in [
                    d.metacarpal().next_joint(),
                    d.proximal().next_joint(),
                    d.intermediate().next_joint(),
                    d.distal().next_joint(),
                ] {
                    points.push(Self::project(j.x, j.y, j.z));
                }
            }
            let label = if hand.hand_type() == HandType::Left { "Left" } else { "Right" };
            hands.push(HandObservation::new(Some(label), points));
        }

        let seq = self.sequence;
        self.sequence += 1;
        Ok(Some(LandmarkFrame { sequence: seq, hands }))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use hand_intent::{HandTracker, TrackerConfig};
    use std::time::Instant;

    fn sim(policy: GesturePolicy) -> (SimLandmarkSource, SimPointerState) {
        let pointer = Arc::new(Mutex::new(SimPointerState::default()));
        (SimLandmarkSource::new(pointer, 30), SimPointerState { policy, ..SimPointerState::default() })
    }

    #[test]
    fn sim_cursor_lands_under_pointer() {
        let (mut src, mut st) = sim(GesturePolicy::Pinch);
        st.x = 0.8;
        st.y = 0.3;
        let mut tracker = HandTracker::new(TrackerConfig::default());
        let ups = tracker.process(&src.frame_for(&st, 1), false);
        assert_relative_eq!(ups[0].cursor.x, 80.0, epsilon = 1e-3);
        assert_relative_eq!(ups[0].cursor.y, 30.0, epsilon = 1e-3);
    }

    #[test]
    fn sim_pinch_fires_once_per_press() {
        let (mut src, mut st) = sim(GesturePolicy::Pinch);
        let mut tracker = HandTracker::new(TrackerConfig::default());
        let mut edges = 0;
        for fire in [false, true, true, true, false, true] {
            st.trigger = fire;
            edges += tracker.process(&src.frame_for(&st, 1), false).iter().filter(|u| u.just_started).count();
        }
        assert_eq!(edges, 2);
    }

    #[test]
    fn sim_gun_flicks_once_per_press() {
        let (mut src, mut st) = sim(GesturePolicy::Gun);
        let mut tracker = HandTracker::new(TrackerConfig { policy: GesturePolicy::Gun, ..TrackerConfig::default() });
        let mut edges = 0;
        for fire in [false, true, true, false, false, true, true] {
            st.trigger = fire;
            edges += tracker.process(&src.frame_for(&st, 1), false).iter().filter(|u| u.just_started).count();
        }
        assert_eq!(edges, 2);
    }

    #[test]
    fn second_hand_only_when_allowed() {
        let (mut src, st) = sim(GesturePolicy::Pinch);
        assert_eq!(src.frame_for(&st, 1).hands.len(), 1);
        assert_eq!(src.frame_for(&st, 2).hands.len(), 2);
        let hidden = SimPointerState { visible: false, ..st };
        assert!(src.frame_for(&hidden, 2).hands.is_empty());
    }

    #[test]
    fn sequence_numbers_increase() {
        let (mut src, st) = sim(GesturePolicy::Pinch);
        let a = src.frame_for(&st, 1).sequence;
        let b = src.frame_for(&st, 1).sequence;
        assert!(b > a);
    }

    // ── feed lifecycle ───────────────────────────────────────────────────────

    struct Counting {
        hands_seen: Arc<AtomicUsize>,
    }

    impl LandmarkSource for Counting {
        fn name(&self) -> &'static str { "counting" }
        fn next_frame(&mut self, max_hands: usize) -> Result<Option<LandmarkFrame>, SourceError> {
            thread::sleep(Duration::from_millis(2));
            self.hands_seen.store(max_hands, Ordering::Release);
            Ok(Some(LandmarkFrame::default()))
        }
    }

    struct Refusing;

    impl LandmarkSource for Refusing {
        fn name(&self) -> &'static str { "refusing" }
        fn open(&mut self) -> Result<(), SourceError> {
            Err(SourceError::PermissionDenied("camera".into()))
        }
        fn next_frame(&mut self, _: usize) -> Result<Option<LandmarkFrame>, SourceError> {
            Ok(None)
        }
    }

    fn poll_until(feed: &mut LandmarkFeed, mut done: impl FnMut(&FeedPoll) -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if done(&feed.poll()) {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let seen = Arc::new(AtomicUsize::new(0));
        let s = Arc::clone(&seen);
        let mut feed = LandmarkFeed::new(move || Box::new(Counting { hands_seen: Arc::clone(&s) }));
        feed.stop();
        feed.start();
        feed.start();
        assert!(feed.is_running());
        assert!(poll_until(&mut feed, |p| !p.frames.is_empty()));
        feed.stop();
        feed.stop();
        assert!(!feed.is_running());
        assert!(feed.poll().frames.is_empty());
    }

    /// Replays a fixed script, then reports nothing.
    struct Scripted {
        frames: std::vec::IntoIter<LandmarkFrame>,
    }

    impl LandmarkSource for Scripted {
        fn name(&self) -> &'static str { "scripted" }
        fn next_frame(&mut self, _: usize) -> Result<Option<LandmarkFrame>, SourceError> {
            let next = self.frames.next();
            if next.is_none() {
                thread::sleep(Duration::from_millis(2));
            }
            Ok(next)
        }
    }

    #[test]
    fn poll_returns_every_queued_frame_in_order() {
        let mut feed = LandmarkFeed::new(|| {
            let frames: Vec<_> = (0..5).map(|i| LandmarkFrame { sequence: i, hands: vec![] }).collect();
            Box::new(Scripted { frames: frames.into_iter() })
        });
        feed.start();
        // Let the whole script queue up before the first poll.
        thread::sleep(Duration::from_millis(50));
        let mut seqs = Vec::new();
        assert!(poll_until(&mut feed, |p| {
            seqs.extend(p.frames.iter().map(|f| f.sequence));
            seqs.len() >= 5
        }));
        assert_eq!(seqs, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn gun_flick_survives_a_batched_poll() {
        let (mut src, mut st) = sim(GesturePolicy::Gun);
        let mut script = Vec::new();
        for fire in [false, true, false] {
            st.trigger = fire;
            script.push(src.frame_for(&st, 1));
        }
        let mut feed = LandmarkFeed::new(move || Box::new(Scripted { frames: script.clone().into_iter() }));
        feed.start();
        thread::sleep(Duration::from_millis(50));

        let mut tracker = HandTracker::new(TrackerConfig { policy: GesturePolicy::Gun, ..TrackerConfig::default() });
        let mut applied = 0;
        let mut edges = 0;
        assert!(poll_until(&mut feed, |p| {
            for f in &p.frames {
                applied += 1;
                edges += tracker.process(f, false).iter().filter(|u| u.just_started).count();
            }
            applied >= 3
        }));
        assert_eq!(edges, 1);
    }

    #[test]
    fn max_hands_reaches_worker() {
        let seen = Arc::new(AtomicUsize::new(0));
        let s = Arc::clone(&seen);
        let mut feed = LandmarkFeed::new(move || Box::new(Counting { hands_seen: Arc::clone(&s) }));
        feed.start();
        feed.set_max_hands(2);
        assert!(poll_until(&mut feed, |_| seen.load(Ordering::Acquire) == 2));
    }

    #[test]
    fn open_failure_surfaces_once_and_stops() {
        let mut feed = LandmarkFeed::new(|| Box::new(Refusing));
        feed.start();
        let mut error = None;
        assert!(poll_until(&mut feed, |p| {
            error = p.error.clone();
            error.is_some()
        }));
        assert_eq!(error, Some(SourceError::PermissionDenied("camera".into())));
        assert!(!feed.is_running());
        assert!(feed.poll().error.is_none());
    }
}
