//! Overwatch variant: gestures drive the map globe camera and time flow.
//!
//! Gesture table:
//! - both hands pinched: index-tip span scales (zooms) the globe
//! - open palm (right-preferred): pans the map center, zoom-attenuated
//! - victory (either hand, right-preferred): rotates the globe
//! - left-hand grab edge: cycles theme
//! - right-hand point: circular index motion adjusts time speed
//! - open palm held: stochastic pulse

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::audio::{Cue, CueSink};
use crate::gesture::Gesture;
use crate::landmark::{INDEX_TIP, WRIST};
use crate::store::{GeoPoint, Store, Vec2};

use super::{
    ingest_hands, maybe_pulse, primary_hand, Cooldown, FrameInput, PointTracker, SpanTracker,
};

const SCALE_DEADZONE: f32 = 0.01;
const SCALE_GAIN: f32 = 2.0;
const SCALE_MIN: f32 = 0.5;
const SCALE_MAX: f32 = 3.0;

/// Per-axis palm travel below this is jitter, not a pan.
const PAN_DEADZONE: f32 = 0.005;
/// Zoom level past which pan sensitivity is heavily dampened for
/// street-level precision.
const PAN_PRECISION_ZOOM: f32 = 2.0;
const LAT_MIN: f32 = -85.0;
const LAT_MAX: f32 = 85.0;

const ROTATION_GAIN: f32 = 2.0;

/// Cross-product magnitude below which circular motion is noise.
const TIME_CROSS_THRESHOLD: f32 = 0.005;
const TIME_SPEED_GAIN: f32 = 50.0;
const TIME_SPEED_MIN: f32 = 0.1;
const TIME_SPEED_MAX: f32 = 5.0;

/// Per-frame reducer for the overwatch/map experience.
pub struct OverwatchInteraction {
    pan_pos: PointTracker,
    rotate_pos: PointTracker,
    pinch_span: SpanTracker,
    /// Previous index-tip position for the circular time gesture.
    time_tip: PointTracker,
    prev_left: Gesture,
    prev_right: Gesture,
    /// This variant has no swipe navigation, so the cooldown never fires
    /// and the shared pulse holdoff is always satisfied.
    nav_cooldown: Cooldown,
    rng: SmallRng,
}

impl OverwatchInteraction {
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    /// Deterministic construction for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    fn with_rng(rng: SmallRng) -> Self {
        Self {
            pan_pos: PointTracker::new(),
            rotate_pos: PointTracker::new(),
            pinch_span: SpanTracker::new(),
            time_tip: PointTracker::new(),
            prev_left: Gesture::Idle,
            prev_right: Gesture::Idle,
            nav_cooldown: Cooldown::new(),
            rng,
        }
    }

    /// Process one captured frame. Never panics on malformed input.
    pub fn process_frame(&mut self, input: &FrameInput, store: &mut Store, audio: &mut dyn CueSink) {
        let now = input.now;
        let (left_gesture, right_gesture) =
            ingest_hands(input, self.prev_left, self.prev_right, store, audio);

        // 1. Scale, gated on both hands showing a pinch.
        let both_pinching = left_gesture == Gesture::Pinch && right_gesture == Gesture::Pinch;
        match (&input.left, &input.right) {
            (Some(left), Some(right)) if both_pinching => {
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
            }
            _ => self.pinch_span.reset(),
        }

        // 2. Pan on an open palm, right hand preferred. Sensitivity falls
        //    with zoom so a palm sweep covers continents zoomed out and
        //    streets zoomed in.
        let pan = primary_hand(input, left_gesture, right_gesture);
        if let Some((hand, Gesture::PalmOpen)) = pan {
            let palm = hand.palm();
            if let Some((dx, dy)) = self.pan_pos.advance((palm.x, palm.y)) {
                if dx.abs() > PAN_DEADZONE || dy.abs() > PAN_DEADZONE {
                    let scale = store.state().globe_scale;
                    let mut sensitivity = (0.5 / scale) * 15.0;
                    if scale > PAN_PRECISION_ZOOM {
                        sensitivity /= scale * 20.0;
                    }

                    let center = store.state().globe_center;
                    let lat = (center.lat - dy * sensitivity).clamp(LAT_MIN, LAT_MAX);
                    let lng = center.lng - dx * sensitivity;
                    if lat.is_finite() && lng.is_finite() {
                        store.set_globe_center(GeoPoint { lat, lng });
                    }
                }
            }
        } else {
            self.pan_pos.reset();
        }

        // 3. Rotation with a victory hand, right preferred.
        let rotating_hand = if right_gesture == Gesture::Victory {
            input.right.as_ref()
        } else if left_gesture == Gesture::Victory {
            input.left.as_ref()
        } else {
            None
        };

        if let Some(hand) = rotating_hand {
            let palm = hand.palm();
            if let Some((dx, dy)) = self.rotate_pos.advance((palm.x, palm.y)) {
                let rot = store.state().globe_rotation;
                let rotation = Vec2 {
                    x: rot.x + dy * ROTATION_GAIN,
                    y: rot.y + dx * ROTATION_GAIN,
                };
                if rotation.x.is_finite() && rotation.y.is_finite() {
                    store.set_globe_rotation(rotation);
                }
            }
        } else {
            self.rotate_pos.reset();
        }

        // 4. Theme cycling on the left-hand grab edge.
        if left_gesture == Gesture::Grab && self.prev_left != Gesture::Grab {
            store.cycle_theme();
            audio.play(Cue::Select);
        }

        // 5. Pulse while a palm is held open.
        maybe_pulse(
            &mut self.rng,
            left_gesture,
            right_gesture,
            &self.nav_cooldown,
            now,
            store,
        );

        // 6. Time control: circular motion of the right index finger. The
        //    2-D cross product of the previous and current wrist-to-tip
        //    vectors gives rotation direction and magnitude (in mirrored
        //    screen coordinates positive cross is clockwise).
        match (&input.right, right_gesture) {
            (Some(hand), Gesture::Point) => {
                let tip = hand.get(INDEX_TIP);
                let wrist = hand.get(WRIST);
                let vx = tip.x - wrist.x;
                let vy = tip.y - wrist.y;

                if let Some((prev_tip_x, prev_tip_y)) = self.time_tip.replace((tip.x, tip.y)) {
                    // Previous vector against the current wrist; good enough
                    // for a fast circular gesture.
                    let pvx = prev_tip_x - wrist.x;
                    let pvy = prev_tip_y - wrist.y;
                    let cross = pvx * vy - pvy * vx;

                    if cross.is_finite() && cross.abs() > TIME_CROSS_THRESHOLD {
                        store.set_is_manipulating_time(true);
                        let speed = (store.state().time_speed + cross * TIME_SPEED_GAIN)
                            .clamp(TIME_SPEED_MIN, TIME_SPEED_MAX);
                        if speed.is_finite() {
                            store.set_time_speed(speed);
                        }
                    } else {
                        store.set_is_manipulating_time(false);
                    }
                }
            }
            _ => {
                store.set_is_manipulating_time(false);
                self.time_tip.reset();
            }
        }

        self.prev_left = left_gesture;
        self.prev_right = right_gesture;
    }
}

impl Default for OverwatchInteraction {
    fn default() -> Self {
        Self::new()
    }
}
