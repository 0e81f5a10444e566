//! Deterministic synthetic pose sessions.
//!
//! Generates a leg (or arm) moving between an extended and a flexed angle
//! for a fixed number of reps. A seeded RNG adds angle jitter and frame
//! dropouts so runs are reproducible across machines.

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::exercise::{ExerciseConfig, ExerciseType};
use crate::landmarks::{Landmark, PoseFrame};

use super::PoseRecording;

const DEFAULT_SEED: u64 = 0x5EED_0F_4EE5;

/// Segment length in normalized image units
const SEGMENT_LENGTH: f64 = 0.2;
const LANDMARK_VISIBILITY: f64 = 0.95;

/// Generated angles are clamped to [0, 180], so wider noise adds nothing
const MAX_JITTER_DEG: f64 = 180.0;

/// Parameters for a generated exercise session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticMotion {
    pub exercise: ExerciseType,
    pub reps: u32,
    pub seed: u64,
    /// Probability that a frame reports no pose
    pub dropout: f64,
    /// Uniform angle noise amplitude in degrees
    pub jitter_deg: f64,
    pub extended_angle: f64,
    pub flexed_angle: f64,
    /// Frames held at each extreme
    pub hold_frames: usize,
    /// Frames spent moving between extremes
    pub transition_frames: usize,
    pub fps: f64,
}

impl Default for SyntheticMotion {
    fn default() -> Self {
        Self {
            exercise: ExerciseType::KneeFlexion,
            reps: 3,
            seed: DEFAULT_SEED,
            dropout: 0.0,
            jitter_deg: 2.0,
            extended_angle: 178.0,
            flexed_angle: 90.0,
            hold_frames: 12,
            transition_frames: 15,
            fps: 30.0,
        }
    }
}

impl SyntheticMotion {
    pub fn new(reps: u32) -> Self {
        Self {
            reps,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_dropout(mut self, dropout: f64) -> Self {
        self.dropout = sanitize_dropout(dropout);
        self
    }

    /// Noise amplitude, capped at 180 degrees
    pub fn with_jitter(mut self, jitter_deg: f64) -> Self {
        self.jitter_deg = sanitize_jitter(jitter_deg);
        self
    }

    /// Noise-free angle sequence, one value per frame
    pub fn angle_profile(&self) -> Vec<f64> {
        let mut angles = Vec::new();
        let hold = |angles: &mut Vec<f64>, angle: f64| {
            angles.extend(std::iter::repeat(angle).take(self.hold_frames));
        };

        hold(&mut angles, self.extended_angle);
        for _ in 0..self.reps {
            self.push_transition(&mut angles, self.extended_angle, self.flexed_angle);
            hold(&mut angles, self.flexed_angle);
            self.push_transition(&mut angles, self.flexed_angle, self.extended_angle);
            hold(&mut angles, self.extended_angle);
        }
        angles
    }

    // Cosine ease between the two extremes
    fn push_transition(&self, angles: &mut Vec<f64>, from: f64, to: f64) {
        let steps = self.transition_frames.max(1);
        for step in 1..=steps {
            let t = step as f64 / steps as f64;
            let eased = 0.5 - 0.5 * (std::f64::consts::PI * t).cos();
            angles.push(from + (to - from) * eased);
        }
    }

    /// Generate pose frames for the configured exercise
    pub fn frames(&self, config: &ExerciseConfig) -> Vec<Option<PoseFrame>> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        // Public fields may bypass the builders
        let dropout = sanitize_dropout(self.dropout);
        let jitter = sanitize_jitter(self.jitter_deg);

        self.angle_profile()
            .into_iter()
            .map(|angle| {
                let noise = if jitter > 0.0 {
                    rng.gen_range(-jitter..=jitter)
                } else {
                    0.0
                };
                if rng.gen_bool(dropout) {
                    None
                } else {
                    Some(limb_frame(config, (angle + noise).clamp(0.0, 180.0)))
                }
            })
            .collect()
    }

    /// Package the generated frames as a replayable recording
    pub fn recording(&self, config: &ExerciseConfig) -> PoseRecording {
        PoseRecording {
            exercise: self.exercise,
            fps: self.fps,
            frames: self.frames(config),
            commands: Vec::new(),
        }
    }
}

fn sanitize_dropout(dropout: f64) -> f64 {
    if dropout.is_finite() {
        dropout.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn sanitize_jitter(jitter_deg: f64) -> f64 {
    if jitter_deg.is_finite() {
        jitter_deg.abs().min(MAX_JITTER_DEG)
    } else {
        0.0
    }
}

/// Pose with both limbs bent to `angle_deg` at the vertex joint.
///
/// The proximal joint sits straight above the vertex; the distal joint
/// swings forward as the limb flexes.
pub fn limb_frame(config: &ExerciseConfig, angle_deg: f64) -> PoseFrame {
    let theta = angle_deg.to_radians();
    let [proximal, vertex, distal] = config.joints;
    let mut frame = PoseFrame::new();

    for (joint_x, ids) in [
        (0.45, [proximal.left(), vertex.left(), distal.left()]),
        (0.55, [proximal.right(), vertex.right(), distal.right()]),
    ] {
        let vertex_y = 0.5;
        let points = [
            (joint_x, vertex_y - SEGMENT_LENGTH),
            (joint_x, vertex_y),
            (
                joint_x + SEGMENT_LENGTH * theta.sin(),
                vertex_y - SEGMENT_LENGTH * theta.cos(),
            ),
        ];
        for (id, (x, y)) in ids.into_iter().zip(points) {
            frame.insert(id, Landmark::new(x, y).with_visibility(LANDMARK_VISIBILITY));
        }
    }

    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{LandmarkExtractor, LandmarkId};

    #[test]
    fn test_profile_shape() {
        let motion = SyntheticMotion::new(2);
        let profile = motion.angle_profile();
        // hold + reps * (transition + hold + transition + hold)
        assert_eq!(profile.len(), 12 + 2 * (15 + 12 + 15 + 12));
        assert_eq!(profile[0], 178.0);
        assert_eq!(profile[12 + 14], 90.0);
        assert_eq!(*profile.last().unwrap(), 178.0);
    }

    #[test]
    fn test_frames_are_deterministic() {
        let config = ExerciseConfig::knee_flexion();
        let motion = SyntheticMotion::new(2).with_seed(7).with_dropout(0.2);
        assert_eq!(motion.frames(&config), motion.frames(&config));

        let other = SyntheticMotion::new(2).with_seed(8).with_dropout(0.2);
        assert_ne!(motion.frames(&config), other.frames(&config));
    }

    #[test]
    fn test_dropout_bounds() {
        let config = ExerciseConfig::knee_flexion();
        let none = SyntheticMotion::new(1).with_dropout(0.0).frames(&config);
        assert!(none.iter().all(Option::is_some));

        let all = SyntheticMotion::new(1).with_dropout(5.0).frames(&config);
        assert!(all.iter().all(Option::is_none));
    }

    #[test]
    fn test_extreme_noise_settings_do_not_panic() {
        let config = ExerciseConfig::knee_flexion();

        let motion = SyntheticMotion::new(1).with_jitter(1e308);
        assert_eq!(motion.jitter_deg, 180.0);
        let frames = motion.frames(&config);
        assert_eq!(frames.len(), motion.angle_profile().len());

        let mut raw = SyntheticMotion::new(1);
        raw.jitter_deg = f64::MAX;
        raw.dropout = f64::NAN;
        let frames = raw.frames(&config);
        assert!(frames.iter().all(Option::is_some));
    }

    #[test]
    fn test_limb_frame_measures_requested_angle() {
        let config = ExerciseConfig::knee_flexion();
        let frame = limb_frame(&config, 120.0);
        assert!(frame.get(LandmarkId::LeftKnee).is_some());

        let triple = LandmarkExtractor::default().extract(&frame, &config).unwrap();
        let angle = triple.angle().degrees_or_default();
        assert!((angle - 120.0).abs() < 1e-9);
    }
}
