//! Shared reactive store.
//!
//! Single source of truth between the interaction engine (writer) and the
//! render layer (readers). The store is an explicit object passed by handle;
//! every mutation notifies subscribers synchronously. It performs no
//! clamping of continuous signals — callers clamp to their variant's range
//! before writing. Scene and theme arithmetic is modular and can never
//! escape the valid range.

use crate::gesture::Gesture;
use crate::landmark::{FaceFrame, HandFrame, Handedness};

/// Number of scenes in the carousel.
pub const SCENE_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f32,
    pub lng: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Visual theme, cycled in a fixed wrapping order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Cyber,
    Solar,
    Matrix,
    Frost,
}

const THEME_ORDER: [Theme; 4] = [Theme::Cyber, Theme::Solar, Theme::Matrix, Theme::Frost];

impl Theme {
    pub fn next(self) -> Theme {
        let idx = THEME_ORDER.iter().position(|&t| t == self).unwrap_or(0);
        THEME_ORDER[(idx + 1) % THEME_ORDER.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SystemStatus {
    #[default]
    Nominal,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThreatLevel {
    #[default]
    Minimal,
    Low,
    Medium,
    High,
}

/// HUD status block, written by non-gesture UI and read by overlays.
#[derive(Debug, Clone, PartialEq)]
pub struct HudState {
    pub system_status: SystemStatus,
    pub power_level: f32,
    pub threat_level: ThreatLevel,
    pub message: String,
}

impl Default for HudState {
    fn default() -> Self {
        Self {
            system_status: SystemStatus::Nominal,
            power_level: 100.0,
            threat_level: ThreatLevel::Minimal,
            message: "INITIALIZING SYSTEMS...".to_string(),
        }
    }
}

/// Partial HUD update, merged field-by-field.
#[derive(Debug, Clone, Default)]
pub struct HudUpdate {
    pub system_status: Option<SystemStatus>,
    pub power_level: Option<f32>,
    pub threat_level: Option<ThreatLevel>,
    pub message: Option<String>,
}

/// Per-hand cursor overlay state: a projection of the latest frame,
/// not an independent source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HandUi {
    pub visible: bool,
    pub x: f32,
    pub y: f32,
    pub gesture: Gesture,
}

/// Partial hand-UI update, merged field-by-field.
#[derive(Debug, Clone, Copy, Default)]
pub struct HandUiUpdate {
    pub visible: Option<bool>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub gesture: Option<Gesture>,
}

impl HandUiUpdate {
    pub fn hidden() -> Self {
        Self {
            visible: Some(false),
            ..Default::default()
        }
    }

    pub fn visible_at(x: f32, y: f32, gesture: Gesture) -> Self {
        Self {
            visible: Some(true),
            x: Some(x),
            y: Some(y),
            gesture: Some(gesture),
        }
    }
}

/// Complete store state. Readers get a shared reference; all writes go
/// through [`Store`] setters.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreState {
    // Tracking data
    pub face_landmarks: Option<FaceFrame>,
    pub left_hand: Option<HandFrame>,
    pub right_hand: Option<HandFrame>,

    // Recognized gestures
    pub left_gesture: Gesture,
    pub right_gesture: Gesture,

    // Globe / scene signals
    pub globe_rotation: Vec2,
    pub globe_center: GeoPoint,
    pub globe_scale: f32,
    pub active_scene: usize,

    pub hud: HudState,
    pub left_hand_ui: HandUi,
    pub right_hand_ui: HandUi,

    // Neural signals
    pub theme: Theme,
    /// Timestamp of the last pulse. Consumers detect a new pulse by strict
    /// inequality against the last value they observed.
    pub pulse_trigger: f64,
    pub neuron_position: Point3,

    // Overwatch signals
    pub time_speed: f32,
    pub is_manipulating_time: bool,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            face_landmarks: None,
            left_hand: None,
            right_hand: None,
            left_gesture: Gesture::Idle,
            right_gesture: Gesture::Idle,
            globe_rotation: Vec2::default(),
            // Mumbai
            globe_center: GeoPoint {
                lat: 19.0760,
                lng: 72.8777,
            },
            globe_scale: 1.5,
            active_scene: 0,
            hud: HudState::default(),
            left_hand_ui: HandUi::default(),
            right_hand_ui: HandUi::default(),
            theme: Theme::Cyber,
            pulse_trigger: 0.0,
            neuron_position: Point3 {
                x: 0.5,
                y: 0.5,
                z: 0.0,
            },
            time_speed: 1.0,
            is_manipulating_time: false,
        }
    }
}

type Listener = Box<dyn FnMut(&StoreState)>;

/// The shared store: state plus synchronous subscribers.
#[derive(Default)]
pub struct Store {
    state: StoreState,
    listeners: Vec<Listener>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    /// Register a listener invoked after every mutation, synchronously with
    /// the writer call.
    pub fn subscribe(&mut self, listener: impl FnMut(&StoreState) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&mut self) {
        let state = &self.state;
        for listener in &mut self.listeners {
            listener(state);
        }
    }

    pub fn set_face_landmarks(&mut self, face: Option<FaceFrame>) {
        self.state.face_landmarks = face;
        self.notify();
    }

    pub fn set_hands(&mut self, left: Option<HandFrame>, right: Option<HandFrame>) {
        self.state.left_hand = left;
        self.state.right_hand = right;
        self.notify();
    }

    pub fn set_gestures(&mut self, left: Gesture, right: Gesture) {
        self.state.left_gesture = left;
        self.state.right_gesture = right;
        self.notify();
    }

    pub fn set_globe_rotation(&mut self, rotation: Vec2) {
        self.state.globe_rotation = rotation;
        self.notify();
    }

    pub fn set_globe_center(&mut self, center: GeoPoint) {
        self.state.globe_center = center;
        self.notify();
    }

    pub fn set_globe_scale(&mut self, scale: f32) {
        self.state.globe_scale = scale;
        self.notify();
    }

    pub fn next_scene(&mut self) {
        self.state.active_scene = (self.state.active_scene + 1) % SCENE_COUNT;
        self.notify();
    }

    pub fn prev_scene(&mut self) {
        self.state.active_scene = (self.state.active_scene + SCENE_COUNT - 1) % SCENE_COUNT;
        self.notify();
    }

    pub fn update_hud(&mut self, update: HudUpdate) {
        let hud = &mut self.state.hud;
        if let Some(s) = update.system_status {
            hud.system_status = s;
        }
        if let Some(p) = update.power_level {
            hud.power_level = p;
        }
        if let Some(t) = update.threat_level {
            hud.threat_level = t;
        }
        if let Some(m) = update.message {
            hud.message = m;
        }
        self.notify();
    }

    pub fn update_hand_ui(&mut self, hand: Handedness, update: HandUiUpdate) {
        let ui = match hand {
            Handedness::Left => &mut self.state.left_hand_ui,
            Handedness::Right => &mut self.state.right_hand_ui,
        };
        if let Some(v) = update.visible {
            ui.visible = v;
        }
        if let Some(x) = update.x {
            ui.x = x;
        }
        if let Some(y) = update.y {
            ui.y = y;
        }
        if let Some(g) = update.gesture {
            ui.gesture = g;
        }
        self.notify();
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.state.theme = theme;
        self.notify();
    }

    pub fn cycle_theme(&mut self) {
        self.state.theme = self.state.theme.next();
        self.notify();
    }

    /// Record a pulse at `now` (seconds). `now` must come from a
    /// non-decreasing clock so the trigger only ever moves forward.
    pub fn trigger_pulse(&mut self, now: f64) {
        self.state.pulse_trigger = now;
        self.notify();
    }

    pub fn set_neuron_position(&mut self, pos: Point3) {
        self.state.neuron_position = pos;
        self.notify();
    }

    pub fn set_time_speed(&mut self, speed: f32) {
        self.state.time_speed = speed;
        self.notify();
    }

    pub fn set_is_manipulating_time(&mut self, manipulating: bool) {
        self.state.is_manipulating_time = manipulating;
        self.notify();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_scene_wraps_forward() {
        let mut store = Store::new();
        for _ in 0..SCENE_COUNT {
            store.next_scene();
        }
        assert_eq!(store.state().active_scene, 0);
    }

    #[test]
    fn test_scene_wraps_backward() {
        let mut store = Store::new();
        store.prev_scene();
        assert_eq!(store.state().active_scene, SCENE_COUNT - 1);
        store.prev_scene();
        assert_eq!(store.state().active_scene, SCENE_COUNT - 2);
    }

    #[test]
    fn test_scene_always_in_range() {
        let mut store = Store::new();
        for i in 0..23 {
            if i % 3 == 0 {
                store.prev_scene();
            } else {
                store.next_scene();
            }
            assert!(store.state().active_scene < SCENE_COUNT);
        }
    }

    #[test]
    fn test_theme_cycle_wraps() {
        let mut store = Store::new();
        assert_eq!(store.state().theme, Theme::Cyber);
        store.cycle_theme();
        assert_eq!(store.state().theme, Theme::Solar);
        store.cycle_theme();
        store.cycle_theme();
        store.cycle_theme();
        assert_eq!(store.state().theme, Theme::Cyber);
    }

    #[test]
    fn test_hand_ui_partial_merge() {
        let mut store = Store::new();
        store.update_hand_ui(
            Handedness::Left,
            HandUiUpdate::visible_at(0.3, 0.6, Gesture::Grab),
        );
        // Hiding must not clobber the last known position.
        store.update_hand_ui(Handedness::Left, HandUiUpdate::hidden());
        let ui = store.state().left_hand_ui;
        assert!(!ui.visible);
        assert_eq!(ui.x, 0.3);
        assert_eq!(ui.y, 0.6);
        assert_eq!(ui.gesture, Gesture::Grab);
    }

    #[test]
    fn test_hud_partial_merge() {
        let mut store = Store::new();
        store.update_hud(HudUpdate {
            power_level: Some(42.0),
            ..Default::default()
        });
        let hud = &store.state().hud;
        assert_eq!(hud.power_level, 42.0);
        assert_eq!(hud.system_status, SystemStatus::Nominal);
        assert_eq!(hud.message, "INITIALIZING SYSTEMS...");
    }

    #[test]
    fn test_subscriber_notified_synchronously() {
        let mut store = Store::new();
        let seen = Rc::new(Cell::new(0usize));
        let seen_by_listener = Rc::clone(&seen);
        store.subscribe(move |state| {
            seen_by_listener.set(state.active_scene);
        });
        store.next_scene();
        assert_eq!(seen.get(), 1);
        store.next_scene();
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn test_pulse_edge_detected_by_strict_inequality() {
        let mut store = Store::new();
        let mut last_seen = store.state().pulse_trigger;

        store.trigger_pulse(10.5);
        let mut edges = 0;
        for _ in 0..3 {
            // Consumer polls repeatedly; only the first poll sees an edge.
            if store.state().pulse_trigger > last_seen {
                edges += 1;
                last_seen = store.state().pulse_trigger;
            }
        }
        assert_eq!(edges, 1);

        store.trigger_pulse(11.0);
        assert!(store.state().pulse_trigger > last_seen);
    }
}
