//! Hand and face landmark types.
//!
//! Landmarks arrive from an external detector as normalized image-space
//! coordinates (x, y in 0..1, z relative depth). The engine only reads them.

/// MediaPipe hand landmark indices (21 points per hand).
pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_PIP: usize = 6;
pub const INDEX_TIP: usize = 8;
/// Middle-finger MCP knuckle, the most stable palm-center point.
pub const PALM_CENTER: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_TIP: usize = 12;
pub const RING_PIP: usize = 14;
pub const RING_TIP: usize = 16;
pub const PINKY_PIP: usize = 18;
pub const PINKY_TIP: usize = 20;

pub const HAND_LANDMARK_COUNT: usize = 21;

/// Face mesh landmark count (refined model).
pub const FACE_LANDMARK_COUNT: usize = 468;

/// Single tracked point in normalized image space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LandmarkPoint {
    pub x: f32,
    pub y: f32,
    /// Relative depth, unused by gesture classification.
    pub z: f32,
}

impl LandmarkPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Planar distance to another point (z is detector-relative and ignored).
    pub fn distance(&self, other: &LandmarkPoint) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Which side the detector labeled this hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handedness {
    Left,
    Right,
}

/// One detected hand: exactly 21 landmarks plus its side label.
#[derive(Debug, Clone, PartialEq)]
pub struct HandFrame {
    pub handedness: Handedness,
    pub points: [LandmarkPoint; HAND_LANDMARK_COUNT],
}

impl HandFrame {
    pub fn new(handedness: Handedness, points: [LandmarkPoint; HAND_LANDMARK_COUNT]) -> Self {
        Self { handedness, points }
    }

    /// Build from a detector point list; fewer than 21 points means the
    /// detection is unusable and the hand counts as absent this frame.
    pub fn from_points(handedness: Handedness, points: &[LandmarkPoint]) -> Option<Self> {
        if points.len() < HAND_LANDMARK_COUNT {
            return None;
        }
        let mut arr = [LandmarkPoint::default(); HAND_LANDMARK_COUNT];
        arr.copy_from_slice(&points[..HAND_LANDMARK_COUNT]);
        Some(Self::new(handedness, arr))
    }

    pub fn get(&self, index: usize) -> &LandmarkPoint {
        &self.points[index]
    }

    /// Palm-center position used as the tracked point for positional gestures.
    pub fn palm(&self) -> LandmarkPoint {
        self.points[PALM_CENTER]
    }
}

/// One detected face (468 mesh points). Stored for HUD rendering only.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceFrame {
    pub points: Vec<LandmarkPoint>,
}

impl FaceFrame {
    pub fn from_points(points: Vec<LandmarkPoint>) -> Option<Self> {
        if points.len() < FACE_LANDMARK_COUNT {
            return None;
        }
        Some(Self { points })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_planar() {
        let a = LandmarkPoint { x: 0.0, y: 0.0, z: 5.0 };
        let b = LandmarkPoint { x: 3.0, y: 4.0, z: -5.0 };
        assert!((a.distance(&b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_hand_frame_rejects_short_input() {
        let points = vec![LandmarkPoint::default(); 20];
        assert!(HandFrame::from_points(Handedness::Left, &points).is_none());
    }

    #[test]
    fn test_hand_frame_accepts_full_input() {
        let points = vec![LandmarkPoint::new(0.5, 0.5); HAND_LANDMARK_COUNT];
        let hand = HandFrame::from_points(Handedness::Right, &points).unwrap();
        assert_eq!(hand.handedness, Handedness::Right);
        assert_eq!(hand.palm().x, 0.5);
    }

    #[test]
    fn test_face_frame_rejects_short_input() {
        let points = vec![LandmarkPoint::default(); 100];
        assert!(FaceFrame::from_points(points).is_none());
    }
}
