//! Pose landmark model
//!
//! Mirrors the 33-point MediaPipe pose topology that the external pose
//! engine reports per frame. The extraction adapter in [`extractor`] turns a
//! frame's landmark set into the three ordered points the angle calculation
//! needs.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LandmarkError;
use crate::geometry::Point2D;

pub mod extractor;

pub use extractor::{LandmarkExtractor, LandmarkTriple};

/// Number of landmarks in the pose model
pub const POSE_LANDMARK_COUNT: usize = 33;

/// Pose landmark identifiers, discriminant = MediaPipe index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum LandmarkId {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl LandmarkId {
    /// All landmarks in index order
    pub const ALL: [LandmarkId; POSE_LANDMARK_COUNT] = [
        LandmarkId::Nose,
        LandmarkId::LeftEyeInner,
        LandmarkId::LeftEye,
        LandmarkId::LeftEyeOuter,
        LandmarkId::RightEyeInner,
        LandmarkId::RightEye,
        LandmarkId::RightEyeOuter,
        LandmarkId::LeftEar,
        LandmarkId::RightEar,
        LandmarkId::MouthLeft,
        LandmarkId::MouthRight,
        LandmarkId::LeftShoulder,
        LandmarkId::RightShoulder,
        LandmarkId::LeftElbow,
        LandmarkId::RightElbow,
        LandmarkId::LeftWrist,
        LandmarkId::RightWrist,
        LandmarkId::LeftPinky,
        LandmarkId::RightPinky,
        LandmarkId::LeftIndex,
        LandmarkId::RightIndex,
        LandmarkId::LeftThumb,
        LandmarkId::RightThumb,
        LandmarkId::LeftHip,
        LandmarkId::RightHip,
        LandmarkId::LeftKnee,
        LandmarkId::RightKnee,
        LandmarkId::LeftAnkle,
        LandmarkId::RightAnkle,
        LandmarkId::LeftHeel,
        LandmarkId::RightHeel,
        LandmarkId::LeftFootIndex,
        LandmarkId::RightFootIndex,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<LandmarkId> {
        Self::ALL.get(index).copied()
    }

    /// Upper snake case name as used by the pose engine
    pub fn name(self) -> &'static str {
        match self {
            LandmarkId::Nose => "NOSE",
            LandmarkId::LeftEyeInner => "LEFT_EYE_INNER",
            LandmarkId::LeftEye => "LEFT_EYE",
            LandmarkId::LeftEyeOuter => "LEFT_EYE_OUTER",
            LandmarkId::RightEyeInner => "RIGHT_EYE_INNER",
            LandmarkId::RightEye => "RIGHT_EYE",
            LandmarkId::RightEyeOuter => "RIGHT_EYE_OUTER",
            LandmarkId::LeftEar => "LEFT_EAR",
            LandmarkId::RightEar => "RIGHT_EAR",
            LandmarkId::MouthLeft => "MOUTH_LEFT",
            LandmarkId::MouthRight => "MOUTH_RIGHT",
            LandmarkId::LeftShoulder => "LEFT_SHOULDER",
            LandmarkId::RightShoulder => "RIGHT_SHOULDER",
            LandmarkId::LeftElbow => "LEFT_ELBOW",
            LandmarkId::RightElbow => "RIGHT_ELBOW",
            LandmarkId::LeftWrist => "LEFT_WRIST",
            LandmarkId::RightWrist => "RIGHT_WRIST",
            LandmarkId::LeftPinky => "LEFT_PINKY",
            LandmarkId::RightPinky => "RIGHT_PINKY",
            LandmarkId::LeftIndex => "LEFT_INDEX",
            LandmarkId::RightIndex => "RIGHT_INDEX",
            LandmarkId::LeftThumb => "LEFT_THUMB",
            LandmarkId::RightThumb => "RIGHT_THUMB",
            LandmarkId::LeftHip => "LEFT_HIP",
            LandmarkId::RightHip => "RIGHT_HIP",
            LandmarkId::LeftKnee => "LEFT_KNEE",
            LandmarkId::RightKnee => "RIGHT_KNEE",
            LandmarkId::LeftAnkle => "LEFT_ANKLE",
            LandmarkId::RightAnkle => "RIGHT_ANKLE",
            LandmarkId::LeftHeel => "LEFT_HEEL",
            LandmarkId::RightHeel => "RIGHT_HEEL",
            LandmarkId::LeftFootIndex => "LEFT_FOOT_INDEX",
            LandmarkId::RightFootIndex => "RIGHT_FOOT_INDEX",
        }
    }
}

impl fmt::Display for LandmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which side of the body an exercise is tracked on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Left,
    Right,
    /// Midpoint of the left and right landmarks
    Both,
}

/// A paired (left/right) body joint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BodyJoint {
    Shoulder,
    Elbow,
    Wrist,
    Hip,
    Knee,
    Ankle,
    Heel,
    FootIndex,
}

impl BodyJoint {
    pub fn left(self) -> LandmarkId {
        match self {
            BodyJoint::Shoulder => LandmarkId::LeftShoulder,
            BodyJoint::Elbow => LandmarkId::LeftElbow,
            BodyJoint::Wrist => LandmarkId::LeftWrist,
            BodyJoint::Hip => LandmarkId::LeftHip,
            BodyJoint::Knee => LandmarkId::LeftKnee,
            BodyJoint::Ankle => LandmarkId::LeftAnkle,
            BodyJoint::Heel => LandmarkId::LeftHeel,
            BodyJoint::FootIndex => LandmarkId::LeftFootIndex,
        }
    }

    pub fn right(self) -> LandmarkId {
        match self {
            BodyJoint::Shoulder => LandmarkId::RightShoulder,
            BodyJoint::Elbow => LandmarkId::RightElbow,
            BodyJoint::Wrist => LandmarkId::RightWrist,
            BodyJoint::Hip => LandmarkId::RightHip,
            BodyJoint::Knee => LandmarkId::RightKnee,
            BodyJoint::Ankle => LandmarkId::RightAnkle,
            BodyJoint::Heel => LandmarkId::RightHeel,
            BodyJoint::FootIndex => LandmarkId::RightFootIndex,
        }
    }

    /// Neighbouring joints when this joint is the middle of a limb chain
    pub fn limb_neighbours(self) -> Option<(BodyJoint, BodyJoint)> {
        match self {
            BodyJoint::Elbow => Some((BodyJoint::Shoulder, BodyJoint::Wrist)),
            BodyJoint::Knee => Some((BodyJoint::Hip, BodyJoint::Ankle)),
            _ => None,
        }
    }
}

/// One detected landmark in normalized coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    /// Detection visibility reported by the pose engine (0-1)
    #[serde(default = "default_visibility")]
    pub visibility: f64,
}

fn default_visibility() -> f64 {
    1.0
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            visibility: default_visibility(),
        }
    }

    pub fn with_visibility(mut self, visibility: f64) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn position(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }
}

/// Landmark set for a single frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoseFrame {
    landmarks: BTreeMap<LandmarkId, Landmark>,
}

impl PoseFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the engine's indexed list (index = [`LandmarkId`] discriminant)
    pub fn from_landmark_list(landmarks: &[Landmark]) -> Result<Self, LandmarkError> {
        if landmarks.len() != POSE_LANDMARK_COUNT {
            return Err(LandmarkError::InvalidLandmarkCount {
                expected: POSE_LANDMARK_COUNT,
                actual: landmarks.len(),
            });
        }

        Ok(Self {
            landmarks: LandmarkId::ALL
                .iter()
                .copied()
                .zip(landmarks.iter().copied())
                .collect(),
        })
    }

    pub fn with_landmark(mut self, id: LandmarkId, landmark: Landmark) -> Self {
        self.insert(id, landmark);
        self
    }

    pub fn insert(&mut self, id: LandmarkId, landmark: Landmark) {
        self.landmarks.insert(id, landmark);
    }

    pub fn get(&self, id: LandmarkId) -> Option<&Landmark> {
        self.landmarks.get(&id)
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip() {
        for (idx, id) in LandmarkId::ALL.iter().enumerate() {
            assert_eq!(id.index(), idx);
            assert_eq!(LandmarkId::from_index(idx), Some(*id));
        }
        assert_eq!(LandmarkId::from_index(POSE_LANDMARK_COUNT), None);
        assert_eq!(LandmarkId::RightKnee.index(), 26);
    }

    #[test]
    fn test_name_matches_serde() {
        for id in LandmarkId::ALL {
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.name()));
        }
    }

    #[test]
    fn test_joint_sides() {
        assert_eq!(BodyJoint::Knee.left(), LandmarkId::LeftKnee);
        assert_eq!(BodyJoint::Knee.right(), LandmarkId::RightKnee);
        assert_eq!(
            BodyJoint::Knee.limb_neighbours(),
            Some((BodyJoint::Hip, BodyJoint::Ankle))
        );
        assert_eq!(BodyJoint::Hip.limb_neighbours(), None);
    }

    #[test]
    fn test_pose_frame_from_landmark_list() {
        let list: Vec<Landmark> = (0..POSE_LANDMARK_COUNT)
            .map(|i| Landmark::new(i as f64 / 100.0, 0.5))
            .collect();
        let frame = PoseFrame::from_landmark_list(&list).unwrap();
        assert_eq!(frame.len(), POSE_LANDMARK_COUNT);
        assert_eq!(frame.get(LandmarkId::RightKnee).unwrap().x, 0.26);

        let err = PoseFrame::from_landmark_list(&list[..10]).unwrap_err();
        assert_eq!(
            err,
            LandmarkError::InvalidLandmarkCount {
                expected: 33,
                actual: 10
            }
        );
    }

    #[test]
    fn test_pose_frame_json_uses_landmark_names() {
        let json = r#"{"RIGHT_HIP": {"x": 0.5, "y": 0.3}, "RIGHT_KNEE": {"x": 0.5, "y": 0.5, "visibility": 0.4}}"#;
        let frame: PoseFrame = serde_json::from_str(json).unwrap();
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.get(LandmarkId::RightHip).unwrap().visibility, 1.0);
        assert_eq!(frame.get(LandmarkId::RightKnee).unwrap().visibility, 0.4);
        assert!(frame.get(LandmarkId::RightAnkle).is_none());
    }
}
