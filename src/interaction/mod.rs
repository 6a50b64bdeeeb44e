//! Per-frame interaction state machines.
//!
//! Two variants map gestures to control signals: [`carousel`] for the
//! neural/globe-carousel experience and [`overwatch`] for the map globe.
//! Both share the classifier, the tracking primitives below, and the frame
//! ingestion prologue. Each tracked quantity owns a dedicated previous-state
//! slot that resets to null whenever its gating gesture drops, so
//! re-acquiring a gesture can never apply a stale delta.

pub mod carousel;
pub mod overwatch;

use rand::rngs::SmallRng;
use rand::Rng;

use crate::audio::{Cue, CueSink};
use crate::gesture::{classify, Gesture};
use crate::landmark::{FaceFrame, HandFrame, Handedness};
use crate::store::{HandUiUpdate, Store};

/// Everything the engine consumes for one processed frame. `now` is seconds
/// on the caller's non-decreasing clock; the engine keeps no clock of its own.
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    pub left: Option<HandFrame>,
    pub right: Option<HandFrame>,
    pub face: Option<FaceFrame>,
    pub now: f64,
}

impl FrameInput {
    /// A frame with no detections: hands released, face lost.
    pub fn empty(now: f64) -> Self {
        Self {
            now,
            ..Default::default()
        }
    }

    /// Sort detector output into labeled slots. A duplicate label keeps the
    /// last detection (no multi-instance tracking per side).
    pub fn from_detection(
        hands: impl IntoIterator<Item = HandFrame>,
        face: Option<FaceFrame>,
        now: f64,
    ) -> Self {
        let mut input = Self::empty(now);
        input.face = face;
        for hand in hands {
            match hand.handedness {
                Handedness::Left => input.left = Some(hand),
                Handedness::Right => input.right = Some(hand),
            }
        }
        input
    }
}

/// Previous-position slot for one tracked 2-D quantity.
///
/// "Tracking active" is exactly `prev.is_some()`; callers reset on gate loss.
#[derive(Debug, Default)]
pub struct PointTracker {
    prev: Option<(f32, f32)>,
}

impl PointTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `current` and return the frame-to-frame delta, or `None` on
    /// the first frame after (re-)acquisition.
    pub fn advance(&mut self, current: (f32, f32)) -> Option<(f32, f32)> {
        let delta = self
            .prev
            .map(|(px, py)| (current.0 - px, current.1 - py));
        self.prev = Some(current);
        delta
    }

    /// Record `current` and return the previous raw point. Used where the
    /// policy needs the prior position itself rather than a delta.
    pub fn replace(&mut self, current: (f32, f32)) -> Option<(f32, f32)> {
        self.prev.replace(current)
    }

    pub fn reset(&mut self) {
        self.prev = None;
    }

    pub fn is_tracking(&self) -> bool {
        self.prev.is_some()
    }
}

/// Previous-value slot for one tracked scalar (two-hand span).
#[derive(Debug, Default)]
pub struct SpanTracker {
    prev: Option<f32>,
}

impl SpanTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, current: f32) -> Option<f32> {
        let delta = self.prev.map(|p| current - p);
        self.prev = Some(current);
        delta
    }

    pub fn reset(&mut self) {
        self.prev = None;
    }

    pub fn is_tracking(&self) -> bool {
        self.prev.is_some()
    }
}

/// Minimum-interval gate for repeated discrete events. Until the first
/// event fires it is always ready, whatever the session clock starts at.
#[derive(Debug, Default)]
pub struct Cooldown {
    last: Option<f64>,
}

impl Cooldown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ready(&self, now: f64, interval: f64) -> bool {
        match self.last {
            Some(last) => now - last > interval,
            None => true,
        }
    }

    pub fn fire(&mut self, now: f64) {
        self.last = Some(now);
    }
}

/// Probability per frame of a pulse while a qualifying gesture is held.
/// Deliberately stochastic rather than timer-driven, for organic cadence.
const PULSE_PROBABILITY: f32 = 0.1;
/// Minimum seconds after the last discrete navigation event before pulses.
const PULSE_HOLDOFF: f64 = 0.5;

/// Shared prologue for both variants: classify hands, mirror them into the
/// store (tracking data, gestures, hand-UI cursors), and play cues on
/// gesture edges. Returns the per-hand labels for this frame.
pub(crate) fn ingest_hands(
    input: &FrameInput,
    prev_left: Gesture,
    prev_right: Gesture,
    store: &mut Store,
    audio: &mut dyn CueSink,
) -> (Gesture, Gesture) {
    store.set_face_landmarks(input.face.clone());

    let left_gesture = input.left.as_ref().map(classify).unwrap_or(Gesture::Idle);
    let right_gesture = input.right.as_ref().map(classify).unwrap_or(Gesture::Idle);

    match &input.left {
        Some(hand) => {
            let palm = hand.palm();
            store.update_hand_ui(
                Handedness::Left,
                HandUiUpdate::visible_at(palm.x, palm.y, left_gesture),
            );
        }
        None => store.update_hand_ui(Handedness::Left, HandUiUpdate::hidden()),
    }
    match &input.right {
        Some(hand) => {
            let palm = hand.palm();
            store.update_hand_ui(
                Handedness::Right,
                HandUiUpdate::visible_at(palm.x, palm.y, right_gesture),
            );
        }
        None => store.update_hand_ui(Handedness::Right, HandUiUpdate::hidden()),
    }

    cue_on_edge(prev_left, left_gesture, audio);
    cue_on_edge(prev_right, right_gesture, audio);

    store.set_hands(input.left.clone(), input.right.clone());
    store.set_gestures(left_gesture, right_gesture);

    (left_gesture, right_gesture)
}

/// Grab edges get the heavier "engage" cue, any other non-idle edge the
/// lighter "select". Sustained gestures stay silent.
fn cue_on_edge(prev: Gesture, current: Gesture, audio: &mut dyn CueSink) {
    if current != prev && current != Gesture::Idle {
        if current == Gesture::Grab {
            audio.play(Cue::Engage);
        } else {
            audio.play(Cue::Select);
        }
    }
}

/// Right-preferred single-hand selection for swipe/pan style gestures.
pub(crate) fn primary_hand<'a>(
    input: &'a FrameInput,
    left_gesture: Gesture,
    right_gesture: Gesture,
) -> Option<(&'a HandFrame, Gesture)> {
    if let Some(hand) = &input.right {
        return Some((hand, right_gesture));
    }
    input.left.as_ref().map(|hand| (hand, left_gesture))
}

/// Stochastic rate-limited pulse shared by both variants: while a palm is
/// open and the navigation holdoff has elapsed, each frame independently
/// has a small chance of firing.
pub(crate) fn maybe_pulse(
    rng: &mut SmallRng,
    left_gesture: Gesture,
    right_gesture: Gesture,
    nav_cooldown: &Cooldown,
    now: f64,
    store: &mut Store,
) {
    let palm_held = left_gesture == Gesture::PalmOpen || right_gesture == Gesture::PalmOpen;
    if palm_held && nav_cooldown.ready(now, PULSE_HOLDOFF) && rng.gen::<f32>() < PULSE_PROBABILITY {
        store.trigger_pulse(now);
    }
}
