//! Carousel variant: gestures drive the reactor/globe scene carousel and
//! the neuron ball.
//!
//! Gesture table:
//! - two hands, any gesture: index-tip span scales the globe
//! - open palm (right-preferred): horizontal swipe changes scene
//! - grab (one or two hands): rotates the globe and slides the ball
//! - left-hand victory edge: cycles theme
//! - open palm held after the swipe holdoff: stochastic pulse

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::audio::{Cue, CueSink};
use crate::gesture::Gesture;
use crate::landmark::INDEX_TIP;
use crate::store::{Point3, Store, Vec2};

use super::{
    ingest_hands, maybe_pulse, primary_hand, Cooldown, FrameInput, PointTracker, SpanTracker,
};

/// Two-hand span change below this is jitter, not intent.
const SCALE_DEADZONE: f32 = 0.01;
const SCALE_GAIN: f32 = 0.8;
const SCALE_MIN: f32 = 0.2;
const SCALE_MAX: f32 = 2.0;

/// Per-frame horizontal palm travel that counts as a swipe.
const SWIPE_THRESHOLD: f32 = 0.15;
/// Seconds between scene changes.
const SWIPE_COOLDOWN: f64 = 1.0;

const ROTATION_GAIN: f32 = 8.0;
/// Horizontal sensitivity for the neuron ball.
const BALL_GAIN: f32 = 0.4;

/// Per-frame reducer for the carousel experience. Owns all retained
/// interaction state; created at processor start, discarded at teardown.
pub struct CarouselInteraction {
    swipe_pos: PointTracker,
    grab_pos: PointTracker,
    pinch_span: SpanTracker,
    prev_left: Gesture,
    prev_right: Gesture,
    swipe_cooldown: Cooldown,
    rng: SmallRng,
}

impl CarouselInteraction {
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    /// Deterministic construction for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    fn with_rng(rng: SmallRng) -> Self {
        Self {
            swipe_pos: PointTracker::new(),
            grab_pos: PointTracker::new(),
            pinch_span: SpanTracker::new(),
            prev_left: Gesture::Idle,
            prev_right: Gesture::Idle,
            swipe_cooldown: Cooldown::new(),
            rng,
        }
    }

    /// Process one captured frame. Never panics on malformed input; a frame
    /// without usable hands only releases tracking state.
    pub fn process_frame(&mut self, input: &FrameInput, store: &mut Store, audio: &mut dyn CueSink) {
        let now = input.now;
        let (left_gesture, right_gesture) =
            ingest_hands(input, self.prev_left, self.prev_right, store, audio);

        // 1. Two-hand scale: any gesture pair, gated only on both hands
        //    being present; span between the index tips.
        if let (Some(left), Some(right)) = (&input.left, &input.right) {
            let span = left.get(INDEX_TIP).distance(right.get(INDEX_TIP));
            if let Some(delta) = self.pinch_span.advance(span) {
                if delta.abs() > SCALE_DEADZONE {
                    let scale = (store.state().globe_scale + delta * SCALE_GAIN)
                        .clamp(SCALE_MIN, SCALE_MAX);
                    if scale.is_finite() {
                        store.set_globe_scale(scale);
                    }
                }
            }
        } else {
            self.pinch_span.reset();
        }

        // 2. Swipe scene navigation on an open palm, right hand preferred.
        let swipe = primary_hand(input, left_gesture, right_gesture);
        if let Some((hand, Gesture::PalmOpen)) = swipe {
            let palm = hand.palm();
            if let Some((dx, _)) = self.swipe_pos.advance((palm.x, palm.y)) {
                if dx.abs() > SWIPE_THRESHOLD && self.swipe_cooldown.ready(now, SWIPE_COOLDOWN) {
                    // Mirrored camera: rightward palm travel goes back.
                    if dx > 0.0 {
                        store.prev_scene();
                    } else {
                        store.next_scene();
                    }
                    audio.play(Cue::Hover);
                    self.swipe_cooldown.fire(now);
                }
            }
        } else {
            self.swipe_pos.reset();
        }

        // 3. Grab rotation + ball movement, averaged over grabbing hands.
        let mut grabbing = Vec::new();
        if right_gesture == Gesture::Grab {
            if let Some(hand) = &input.right {
                grabbing.push(hand);
            }
        }
        if left_gesture == Gesture::Grab {
            if let Some(hand) = &input.left {
                grabbing.push(hand);
            }
        }

        if !grabbing.is_empty() {
            let n = grabbing.len() as f32;
            let centroid = grabbing.iter().fold((0.0f32, 0.0f32), |acc, hand| {
                let palm = hand.palm();
                (acc.0 + palm.x / n, acc.1 + palm.y / n)
            });

            if let Some((dx, dy)) = self.grab_pos.advance(centroid) {
                let rot = store.state().globe_rotation;
                let rotation = Vec2 {
                    x: rot.x + dy * ROTATION_GAIN,
                    y: rot.y + dx * ROTATION_GAIN,
                };
                if rotation.x.is_finite() && rotation.y.is_finite() {
                    store.set_globe_rotation(rotation);
                }

                let neuron = store.state().neuron_position;
                let x = (neuron.x + dx * BALL_GAIN).clamp(0.0, 1.0);
                if x.is_finite() {
                    store.set_neuron_position(Point3 { x, ..neuron });
                }
            }
        } else {
            self.grab_pos.reset();
        }

        // 4. Theme cycling on the left-hand victory edge.
        if left_gesture == Gesture::Victory && self.prev_left != Gesture::Victory {
            store.cycle_theme();
            audio.play(Cue::Select);
        }

        // 5. Pulse while a palm is held open and no recent swipe.
        maybe_pulse(
            &mut self.rng,
            left_gesture,
            right_gesture,
            &self.swipe_cooldown,
            now,
            store,
        );

        self.prev_left = left_gesture;
        self.prev_right = right_gesture;
    }
}

impl Default for CarouselInteraction {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::MemoryCues;
    use crate::gesture::fixtures::{as_left, fist_hand, nan_hand, open_hand, victory_hand};
    use crate::landmark::HandFrame;
    use crate::store::SCENE_COUNT;

    fn two_hands(left: HandFrame, right: HandFrame, now: f64) -> FrameInput {
        FrameInput::from_detection(vec![as_left(left), right], None, now)
    }

    fn one_right(hand: HandFrame, now: f64) -> FrameInput {
        FrameInput::from_detection(vec![hand], None, now)
    }

    /// Two fists whose index tips sit `span` apart horizontally.
    fn fists_with_span(span: f32, now: f64) -> FrameInput {
        two_hands(
            fist_hand((0.5 - span / 2.0, 0.5)),
            fist_hand((0.5 + span / 2.0, 0.5)),
            now,
        )
    }

    #[test]
    fn test_two_hand_spread_grows_scale() {
        let mut proc = CarouselInteraction::with_seed(7);
        let mut store = Store::new();
        let mut audio = MemoryCues::default();

        proc.process_frame(&fists_with_span(0.30, 0.0), &mut store, &mut audio);
        let before = store.state().globe_scale;
        proc.process_frame(&fists_with_span(0.35, 0.033), &mut store, &mut audio);

        assert!(store.state().globe_scale > before);
    }

    #[test]
    fn test_scale_clamped_at_max() {
        let mut proc = CarouselInteraction::with_seed(7);
        let mut store = Store::new();
        let mut audio = MemoryCues::default();

        let mut span = 0.1;
        for i in 0..40 {
            proc.process_frame(&fists_with_span(span, i as f64 * 0.033), &mut store, &mut audio);
            span += 0.2;
            assert!(store.state().globe_scale <= SCALE_MAX);
        }
        assert_eq!(store.state().globe_scale, SCALE_MAX);
    }

    #[test]
    fn test_shrinking_span_decreases_monotonically() {
        let mut proc = CarouselInteraction::with_seed(7);
        let mut store = Store::new();
        let mut audio = MemoryCues::default();

        let mut span = 0.9;
        let mut prev_scale = store.state().globe_scale;
        for i in 0..4 {
            proc.process_frame(&fists_with_span(span, i as f64 * 0.033), &mut store, &mut audio);
            if i > 0 {
                assert!(store.state().globe_scale < prev_scale);
            }
            prev_scale = store.state().globe_scale;
            span -= 0.1;
        }
    }

    #[test]
    fn test_scale_clamped_at_floor() {
        let mut proc = CarouselInteraction::with_seed(7);
        let mut store = Store::new();
        let mut audio = MemoryCues::default();

        // One continuous shrink bottoms out at span zero, so repeat the
        // gesture: release, re-acquire wide, shrink again.
        let mut now = 0.0;
        for _ in 0..4 {
            for span in [0.9, 0.6, 0.3, 0.0] {
                proc.process_frame(&fists_with_span(span, now), &mut store, &mut audio);
                assert!(store.state().globe_scale >= SCALE_MIN);
                now += 0.033;
            }
            proc.process_frame(&one_right(fist_hand((0.5, 0.5)), now), &mut store, &mut audio);
            now += 0.033;
        }
        assert_eq!(store.state().globe_scale, SCALE_MIN);
    }

    #[test]
    fn test_hand_drop_resets_span_no_stale_delta() {
        let mut proc = CarouselInteraction::with_seed(7);
        let mut store = Store::new();
        let mut audio = MemoryCues::default();

        proc.process_frame(&fists_with_span(0.8, 0.0), &mut store, &mut audio);
        // Drop to one hand: span slot must go null.
        proc.process_frame(&one_right(fist_hand((0.5, 0.5)), 0.033), &mut store, &mut audio);
        let scale = store.state().globe_scale;
        // Re-acquire with a very different span: first frame only primes.
        proc.process_frame(&fists_with_span(0.2, 0.066), &mut store, &mut audio);
        assert_eq!(store.state().globe_scale, scale);
    }

    #[test]
    fn test_swipe_fires_once_then_cooldown() {
        let mut proc = CarouselInteraction::with_seed(7);
        let mut store = Store::new();
        let mut audio = MemoryCues::default();
        assert_eq!(store.state().active_scene, 0);

        proc.process_frame(&one_right(open_hand((0.8, 0.5)), 2.0), &mut store, &mut audio);
        // Leftward travel beyond threshold advances the scene.
        proc.process_frame(&one_right(open_hand((0.6, 0.5)), 2.033), &mut store, &mut audio);
        assert_eq!(store.state().active_scene, 1);
        assert!(audio.played.contains(&Cue::Hover));

        // A second big swipe 200 ms later is inside the 1 s cooldown.
        proc.process_frame(&one_right(open_hand((0.4, 0.5)), 2.2), &mut store, &mut audio);
        assert_eq!(store.state().active_scene, 1);

        // After the cooldown it fires again.
        proc.process_frame(&one_right(open_hand((0.8, 0.5)), 3.5), &mut store, &mut audio);
        assert_eq!(store.state().active_scene, 0);
    }

    #[test]
    fn test_first_swipe_at_session_start_fires() {
        let mut proc = CarouselInteraction::with_seed(7);
        let mut store = Store::new();
        let mut audio = MemoryCues::default();

        // A session clock starting near zero: no event has fired yet, so
        // the cooldown must not suppress the very first swipe.
        proc.process_frame(&one_right(open_hand((0.8, 0.5)), 0.1), &mut store, &mut audio);
        proc.process_frame(&one_right(open_hand((0.5, 0.5)), 0.133), &mut store, &mut audio);
        assert_eq!(store.state().active_scene, 1);
    }

    #[test]
    fn test_swipe_direction_sign() {
        let mut proc = CarouselInteraction::with_seed(7);
        let mut store = Store::new();
        let mut audio = MemoryCues::default();

        proc.process_frame(&one_right(open_hand((0.3, 0.5)), 2.0), &mut store, &mut audio);
        // Rightward travel goes to the previous scene (mirrored feed).
        proc.process_frame(&one_right(open_hand((0.6, 0.5)), 2.033), &mut store, &mut audio);
        assert_eq!(store.state().active_scene, SCENE_COUNT - 1);
    }

    #[test]
    fn test_grab_rotates_and_moves_ball() {
        let mut proc = CarouselInteraction::with_seed(7);
        let mut store = Store::new();
        let mut audio = MemoryCues::default();

        proc.process_frame(&one_right(fist_hand((0.5, 0.5)), 0.0), &mut store, &mut audio);
        proc.process_frame(&one_right(fist_hand((0.6, 0.45)), 0.033), &mut store, &mut audio);

        let rot = store.state().globe_rotation;
        assert!((rot.y - 0.1 * ROTATION_GAIN).abs() < 1e-4);
        assert!((rot.x + 0.05 * ROTATION_GAIN).abs() < 1e-4);

        let ball = store.state().neuron_position;
        assert!((ball.x - (0.5 + 0.1 * BALL_GAIN)).abs() < 1e-4);
        assert_eq!(ball.y, 0.5);
    }

    #[test]
    fn test_two_grabbing_hands_average_centroid() {
        let mut proc = CarouselInteraction::with_seed(7);
        let mut store = Store::new();
        let mut audio = MemoryCues::default();

        proc.process_frame(
            &two_hands(fist_hand((0.3, 0.5)), fist_hand((0.7, 0.5)), 0.0),
            &mut store,
            &mut audio,
        );
        // Both hands shift +0.1 in x; centroid delta is +0.1.
        proc.process_frame(
            &two_hands(fist_hand((0.4, 0.5)), fist_hand((0.8, 0.5)), 0.033),
            &mut store,
            &mut audio,
        );
        assert!((store.state().globe_rotation.y - 0.1 * ROTATION_GAIN).abs() < 1e-4);
    }

    #[test]
    fn test_ball_clamped_to_unit_range() {
        let mut proc = CarouselInteraction::with_seed(7);
        let mut store = Store::new();
        let mut audio = MemoryCues::default();

        let mut x = 0.1;
        for i in 0..20 {
            proc.process_frame(&one_right(fist_hand((x, 0.5)), i as f64 * 0.033), &mut store, &mut audio);
            x = (x + 0.04).min(0.95);
            let ball_x = store.state().neuron_position.x;
            assert!((0.0..=1.0).contains(&ball_x));
        }
    }

    #[test]
    fn test_nan_grab_frame_writes_no_signals() {
        let mut proc = CarouselInteraction::with_seed(7);
        let mut store = Store::new();
        let mut audio = MemoryCues::default();

        // Prime grab tracking with a finite frame, then feed a detection
        // where every coordinate is NaN. The deltas it produces must be
        // dropped before reaching the store.
        proc.process_frame(&one_right(fist_hand((0.5, 0.5)), 0.0), &mut store, &mut audio);
        proc.process_frame(&one_right(nan_hand(), 0.033), &mut store, &mut audio);

        let state = store.state();
        assert_eq!(state.globe_rotation, Vec2::default());
        assert_eq!(state.neuron_position.x, 0.5);
        assert_eq!(state.globe_scale, 1.5);
    }

    #[test]
    fn test_nan_span_leaves_scale_untouched() {
        let mut proc = CarouselInteraction::with_seed(7);
        let mut store = Store::new();
        let mut audio = MemoryCues::default();

        proc.process_frame(&fists_with_span(0.4, 0.0), &mut store, &mut audio);
        let scale = store.state().globe_scale;
        proc.process_frame(
            &two_hands(nan_hand(), nan_hand(), 0.033),
            &mut store,
            &mut audio,
        );
        assert_eq!(store.state().globe_scale, scale);
    }

    #[test]
    fn test_grab_release_resets_tracking() {
        let mut proc = CarouselInteraction::with_seed(7);
        let mut store = Store::new();
        let mut audio = MemoryCues::default();

        proc.process_frame(&one_right(fist_hand((0.2, 0.5)), 0.0), &mut store, &mut audio);
        proc.process_frame(&FrameInput::empty(0.033), &mut store, &mut audio);
        // Re-acquire far away: no rotation jump on the priming frame.
        proc.process_frame(&one_right(fist_hand((0.9, 0.9)), 0.066), &mut store, &mut audio);
        assert_eq!(store.state().globe_rotation, Vec2::default());
    }

    #[test]
    fn test_theme_cycle_is_edge_triggered() {
        let mut proc = CarouselInteraction::with_seed(7);
        let mut store = Store::new();
        let mut audio = MemoryCues::default();
        let start_theme = store.state().theme;

        // Held for 10 consecutive frames: exactly one cycle.
        for i in 0..10 {
            let input = FrameInput::from_detection(
                vec![as_left(victory_hand((0.4, 0.5)))],
                None,
                i as f64 * 0.033,
            );
            proc.process_frame(&input, &mut store, &mut audio);
        }
        assert_eq!(store.state().theme, start_theme.next());

        // Release and re-trigger: one more cycle.
        proc.process_frame(&FrameInput::empty(1.0), &mut store, &mut audio);
        let input = FrameInput::from_detection(vec![as_left(victory_hand((0.4, 0.5)))], None, 1.1);
        proc.process_frame(&input, &mut store, &mut audio);
        assert_eq!(store.state().theme, start_theme.next().next());
    }

    #[test]
    fn test_right_hand_victory_does_not_cycle_theme() {
        let mut proc = CarouselInteraction::with_seed(7);
        let mut store = Store::new();
        let mut audio = MemoryCues::default();
        let start_theme = store.state().theme;

        proc.process_frame(&one_right(victory_hand((0.5, 0.5)), 0.0), &mut store, &mut audio);
        assert_eq!(store.state().theme, start_theme);
    }

    #[test]
    fn test_pulse_fires_while_palm_held() {
        let mut proc = CarouselInteraction::with_seed(42);
        let mut store = Store::new();
        let mut audio = MemoryCues::default();

        // Holding an open palm without moving: swipes never fire, pulses do
        // (10% per frame; 200 frames make a miss astronomically unlikely).
        let mut last_pulse = store.state().pulse_trigger;
        let mut edges = 0;
        for i in 0..200 {
            let now = 1.0 + i as f64 * 0.033;
            proc.process_frame(&one_right(open_hand((0.5, 0.5)), now), &mut store, &mut audio);
            if store.state().pulse_trigger > last_pulse {
                edges += 1;
                last_pulse = store.state().pulse_trigger;
            }
        }
        assert!(edges > 0);
        assert!(edges < 200);
    }

    #[test]
    fn test_pulse_suppressed_right_after_swipe() {
        let mut proc = CarouselInteraction::with_seed(42);
        let mut store = Store::new();
        let mut audio = MemoryCues::default();

        proc.process_frame(&one_right(open_hand((0.8, 0.5)), 2.0), &mut store, &mut audio);
        proc.process_frame(&one_right(open_hand((0.5, 0.5)), 2.033), &mut store, &mut audio);
        assert_eq!(store.state().active_scene, 1);

        // Within the 500 ms holdoff after the swipe no pulse can fire.
        let pulse_before = store.state().pulse_trigger;
        for i in 0..12 {
            let now = 2.05 + i as f64 * 0.033;
            proc.process_frame(&one_right(open_hand((0.5, 0.5)), now), &mut store, &mut audio);
        }
        assert_eq!(store.state().pulse_trigger, pulse_before);
    }
}
