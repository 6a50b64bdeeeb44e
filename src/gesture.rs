//! Per-frame gesture classification.
//!
//! Pure geometry over one hand's 21 landmarks, no retained state. A finger
//! counts as extended when its tip lies farther from the wrist than its PIP
//! joint; thumb participation is only through the pinch distance.

use crate::landmark::{
    HandFrame, INDEX_PIP, INDEX_TIP, MIDDLE_PIP, MIDDLE_TIP, PINKY_PIP, PINKY_TIP, RING_PIP,
    RING_TIP, THUMB_TIP, WRIST,
};

/// Thumb-tip to index-tip distance below which the hand reads as a pinch.
const PINCH_THRESHOLD: f32 = 0.05;

/// Discrete gesture label, exactly one per hand per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Pinch,
    Grab,
    PalmOpen,
    Point,
    Victory,
}

impl Gesture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gesture::Idle => "IDLE",
            Gesture::Pinch => "PINCH",
            Gesture::Grab => "GRAB",
            Gesture::PalmOpen => "PALM_OPEN",
            Gesture::Point => "POINT",
            Gesture::Victory => "VICTORY",
        }
    }
}

/// Classify one hand frame into a gesture label.
///
/// Decision order matters: pinch wins over everything, then full-open,
/// full-curl, index-only, index+middle. Ambiguous partial extensions
/// (e.g. ring only) intentionally fall through to `Idle`.
pub fn classify(hand: &HandFrame) -> Gesture {
    let wrist = hand.get(WRIST);

    let extended = |tip: usize, pip: usize| -> bool {
        hand.get(tip).distance(wrist) > hand.get(pip).distance(wrist)
    };

    let index_ext = extended(INDEX_TIP, INDEX_PIP);
    let middle_ext = extended(MIDDLE_TIP, MIDDLE_PIP);
    let ring_ext = extended(RING_TIP, RING_PIP);
    let pinky_ext = extended(PINKY_TIP, PINKY_PIP);

    let pinch_dist = hand.get(THUMB_TIP).distance(hand.get(INDEX_TIP));

    if pinch_dist < PINCH_THRESHOLD {
        return Gesture::Pinch;
    }
    if index_ext && middle_ext && ring_ext && pinky_ext {
        return Gesture::PalmOpen;
    }
    if !index_ext && !middle_ext && !ring_ext && !pinky_ext {
        return Gesture::Grab;
    }
    if index_ext && !middle_ext && !ring_ext && !pinky_ext {
        return Gesture::Point;
    }
    if index_ext && middle_ext && !ring_ext && !pinky_ext {
        return Gesture::Victory;
    }
    Gesture::Idle
}
