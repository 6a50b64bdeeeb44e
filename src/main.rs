use anyhow::Result;
use std::io::{self, Write};

use handwave::audio::{CueSink, NullCues, OscCuePlayer};
use handwave::config::Config;
use handwave::gesture::Gesture;
use handwave::interaction::carousel::CarouselInteraction;
use handwave::interaction::overwatch::OverwatchInteraction;
use handwave::interaction::FrameInput;
use handwave::landmark::{
    HandFrame, Handedness, LandmarkPoint, HAND_LANDMARK_COUNT, INDEX_PIP, INDEX_TIP, MIDDLE_PIP,
    MIDDLE_TIP, PALM_CENTER, PINKY_PIP, PINKY_TIP, RING_PIP, RING_TIP, THUMB_TIP, WRIST,
};
use handwave::store::{GeoPoint, Store};

const CONFIG_PATH: &str = "config.toml";
const FRAME_DT: f64 = 1.0 / 30.0;

enum Variant {
    Carousel(CarouselInteraction),
    Overwatch(OverwatchInteraction),
}

impl Variant {
    fn process(&mut self, input: &FrameInput, store: &mut Store, audio: &mut dyn CueSink) {
        match self {
            Variant::Carousel(v) => v.process_frame(input, store, audio),
            Variant::Overwatch(v) => v.process_frame(input, store, audio),
        }
    }
}

/// Synthesize a plausible hand frame for the demo. Fingers extend upward
/// from the palm; curled tips pull back below the PIP joints.
fn synth_hand(
    handedness: Handedness,
    palm: (f32, f32),
    index: bool,
    middle: bool,
    ring: bool,
    pinky: bool,
    pinch: bool,
) -> HandFrame {
    let (px, py) = palm;
    let mut points = [LandmarkPoint::default(); HAND_LANDMARK_COUNT];
    points[WRIST] = LandmarkPoint::new(px, py + 0.2);
    points[PALM_CENTER] = LandmarkPoint::new(px, py);

    let fingers = [
        (INDEX_TIP, INDEX_PIP, -0.06, index),
        (MIDDLE_TIP, MIDDLE_PIP, -0.02, middle),
        (RING_TIP, RING_PIP, 0.02, ring),
        (PINKY_TIP, PINKY_PIP, 0.06, pinky),
    ];
    for (tip, pip, dx, ext) in fingers {
        points[pip] = LandmarkPoint::new(px + dx, py - 0.05);
        let tip_y = if ext { py - 0.15 } else { py + 0.1 };
        points[tip] = LandmarkPoint::new(px + dx, tip_y);
    }

    points[THUMB_TIP] = if pinch {
        let it = points[INDEX_TIP];
        LandmarkPoint::new(it.x + 0.01, it.y)
    } else {
        LandmarkPoint::new(px - 0.2, py)
    };
    HandFrame::new(handedness, points)
}

fn main() -> Result<()> {
    let config = Config::load_or_default(CONFIG_PATH);

    println!("=== Handwave Demo ({}) ===", env!("GIT_VERSION"));
    println!("Variant: {}", config.app.variant);
    println!("Target FPS: {}", config.app.target_fps);
    println!(
        "Audio cues: {}",
        if config.audio.enabled {
            config.audio.addr.as_str()
        } else {
            "off"
        }
    );
    println!();
    println!("Commands:");
    println!("  open dx dy    - open right palm, move by (dx, dy) over one frame");
    println!("  grab dx dy    - grab with the right fist, drag by (dx, dy)");
    println!("  pinch d       - both hands pinching at index-tip span d");
    println!("  victory       - flash a victory sign on the left hand");
    println!("  point c       - right index point, rotated by c radians");
    println!("  idle          - one empty frame (hands released)");
    println!("  s             - show store state");
    println!("  q             - quit");
    println!();

    let mut audio: Box<dyn CueSink> = if config.audio.enabled {
        Box::new(OscCuePlayer::new(&config.audio.addr)?)
    } else {
        Box::new(NullCues)
    };

    let mut store = Store::new();
    store.set_globe_center(GeoPoint {
        lat: config.globe.lat,
        lng: config.globe.lng,
    });
    store.set_globe_scale(config.globe.scale);

    let mut last_pulse = store.state().pulse_trigger;

    let mut variant = match config.app.variant.as_str() {
        "overwatch" => Variant::Overwatch(OverwatchInteraction::new()),
        _ => Variant::Carousel(CarouselInteraction::new()),
    };

    // Virtual detector state advanced by commands.
    let mut now = 0.0_f64;
    let mut palm = (0.5_f32, 0.5_f32);
    let mut point_angle = 0.0_f32;

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        let parts: Vec<&str> = line.trim().split_whitespace().collect();

        if parts.is_empty() {
            continue;
        }

        let input = match parts[0] {
            "open" if parts.len() == 3 => {
                let dx: f32 = parts[1].parse()?;
                let dy: f32 = parts[2].parse()?;
                palm = (palm.0 + dx, palm.1 + dy);
                let hand = synth_hand(Handedness::Right, palm, true, true, true, true, false);
                Some(FrameInput::from_detection(vec![hand], None, now))
            }
            "grab" if parts.len() == 3 => {
                let dx: f32 = parts[1].parse()?;
                let dy: f32 = parts[2].parse()?;
                palm = (palm.0 + dx, palm.1 + dy);
                let hand = synth_hand(Handedness::Right, palm, false, false, false, false, false);
                Some(FrameInput::from_detection(vec![hand], None, now))
            }
            "pinch" if parts.len() == 2 => {
                let span: f32 = parts[1].parse()?;
                let left = synth_hand(
                    Handedness::Left,
                    (0.5 - span / 2.0, 0.5),
                    true,
                    true,
                    true,
                    true,
                    true,
                );
                let right = synth_hand(
                    Handedness::Right,
                    (0.5 + span / 2.0, 0.5),
                    true,
                    true,
                    true,
                    true,
                    true,
                );
                Some(FrameInput::from_detection(vec![left, right], None, now))
            }
            "victory" => {
                let hand = synth_hand(Handedness::Left, (0.4, 0.5), true, true, false, false, false);
                Some(FrameInput::from_detection(vec![hand], None, now))
            }
            "point" if parts.len() == 2 => {
                let c: f32 = parts[1].parse()?;
                point_angle += c;
                let mut hand =
                    synth_hand(Handedness::Right, palm, true, false, false, false, false);
                let wrist = *hand.get(WRIST);
                hand.points[INDEX_TIP] = LandmarkPoint::new(
                    wrist.x + 0.2 * point_angle.cos(),
                    wrist.y + 0.2 * point_angle.sin(),
                );
                Some(FrameInput::from_detection(vec![hand], None, now))
            }
            "idle" => Some(FrameInput::empty(now)),
            "s" => {
                let state = store.state();
                println!("Scene: {}  Theme: {:?}", state.active_scene, state.theme);
                println!(
                    "Globe: rotation=({:.3}, {:.3}) center=({:.3}, {:.3}) scale={:.3}",
                    state.globe_rotation.x,
                    state.globe_rotation.y,
                    state.globe_center.lat,
                    state.globe_center.lng,
                    state.globe_scale
                );
                println!(
                    "Neuron: ({:.3}, {:.3}, {:.3})  Time speed: {:.2}{}",
                    state.neuron_position.x,
                    state.neuron_position.y,
                    state.neuron_position.z,
                    state.time_speed,
                    if state.is_manipulating_time {
                        " (manipulating)"
                    } else {
                        ""
                    }
                );
                println!(
                    "Gestures: left={} right={}",
                    state.left_gesture.as_str(),
                    state.right_gesture.as_str()
                );
                None
            }
            "q" => {
                println!("Bye");
                break;
            }
            _ => {
                println!("Unknown command: {}", parts[0]);
                None
            }
        };

        if let Some(input) = input {
            variant.process(&input, &mut store, audio.as_mut());
            now += FRAME_DT;

            let state = store.state();
            if state.pulse_trigger > last_pulse {
                last_pulse = state.pulse_trigger;
                println!("* pulse at t={:.2}s", last_pulse);
            }
            let left = state.left_gesture;
            let right = state.right_gesture;
            if left != Gesture::Idle || right != Gesture::Idle {
                println!(
                    "frame t={:.2}s  left={} right={}",
                    now,
                    left.as_str(),
                    right.as_str()
                );
            }
        }
    }

    Ok(())
}
