// Landmark extraction adapter
//
// Resolves an exercise's three configured joints against one frame's
// landmark set. Single-side exercises read `LEFT_<JOINT>` / `RIGHT_<JOINT>`
// directly; bilateral exercises average the left and right landmarks. Any
// joint that cannot be resolved makes the whole frame unavailable.

use crate::error::{ConfigError, LandmarkError};
use crate::exercise::ExerciseConfig;
use crate::geometry::{compute_angle, JointAngle, Point2D};
use crate::landmarks::{BodyJoint, LandmarkId, PoseFrame, Side};

/// Default visibility gate, matches the pose engine's detection confidence
pub const DEFAULT_MIN_VISIBILITY: f64 = 0.5;

/// The three ordered points feeding the angle calculation
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LandmarkTriple {
    pub proximal: Point2D,
    pub vertex: Point2D,
    pub distal: Point2D,
}

impl LandmarkTriple {
    pub fn new(proximal: Point2D, vertex: Point2D, distal: Point2D) -> Self {
        Self {
            proximal,
            vertex,
            distal,
        }
    }

    /// Angle at the vertex joint
    pub fn angle(&self) -> JointAngle {
        compute_angle(self.proximal, self.vertex, self.distal)
    }
}

/// Turns per-frame landmark sets into [`LandmarkTriple`]s
#[derive(Debug, Clone)]
pub struct LandmarkExtractor {
    min_visibility: f64,
    fallback_estimation: bool,
}

impl LandmarkExtractor {
    /// Create an extractor gating landmarks at `min_visibility` (0-1)
    pub fn new(min_visibility: f64) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&min_visibility) {
            return Err(ConfigError::InvalidVisibility {
                value: min_visibility,
            });
        }
        Ok(Self {
            min_visibility,
            fallback_estimation: false,
        })
    }

    /// Estimate a hidden limb midpoint (knee, elbow) from its neighbours
    ///
    /// The estimate sits on the straight line between the neighbours, so it
    /// always reads as a fully extended joint.
    pub fn with_fallback_estimation(mut self, enabled: bool) -> Self {
        self.fallback_estimation = enabled;
        self
    }

    pub fn min_visibility(&self) -> f64 {
        self.min_visibility
    }

    pub fn fallback_estimation(&self) -> bool {
        self.fallback_estimation
    }

    /// Extract (proximal, vertex, distal) in the config's joint order
    pub fn extract(
        &self,
        frame: &PoseFrame,
        config: &ExerciseConfig,
    ) -> Result<LandmarkTriple, LandmarkError> {
        let [proximal, vertex, distal] = config.joints;

        let proximal = self.resolve(frame, proximal, config.side)?;
        let vertex = match self.resolve(frame, vertex, config.side) {
            Ok(point) => point,
            Err(err) if self.fallback_estimation => {
                let estimate = self.estimate_midpoint(frame, vertex, config.side);
                match estimate {
                    Some(point) => {
                        log::info!("[Landmarks] Using fallback landmarks for {}", config.name);
                        point
                    }
                    None => return Err(err),
                }
            }
            Err(err) => return Err(err),
        };
        let distal = self.resolve(frame, distal, config.side)?;

        Ok(LandmarkTriple::new(proximal, vertex, distal))
    }

    fn resolve(
        &self,
        frame: &PoseFrame,
        joint: BodyJoint,
        side: Side,
    ) -> Result<Point2D, LandmarkError> {
        match side {
            Side::Left => self.lookup(frame, joint.left()),
            Side::Right => self.lookup(frame, joint.right()),
            Side::Both => {
                let left = self.lookup(frame, joint.left())?;
                let right = self.lookup(frame, joint.right())?;
                Ok(left.midpoint(&right))
            }
        }
    }

    fn lookup(&self, frame: &PoseFrame, id: LandmarkId) -> Result<Point2D, LandmarkError> {
        let landmark = frame
            .get(id)
            .ok_or(LandmarkError::Missing { landmark: id })?;

        // NaN visibility never passes the gate
        if landmark.visibility.is_nan() || landmark.visibility < self.min_visibility {
            return Err(LandmarkError::LowVisibility {
                landmark: id,
                visibility: landmark.visibility,
                min: self.min_visibility,
            });
        }

        Ok(landmark.position())
    }

    fn estimate_midpoint(&self, frame: &PoseFrame, joint: BodyJoint, side: Side) -> Option<Point2D> {
        let (upper, lower) = joint.limb_neighbours()?;
        let upper = self.resolve(frame, upper, side).ok()?;
        let lower = self.resolve(frame, lower, side).ok()?;
        Some(upper.midpoint(&lower))
    }
}

impl Default for LandmarkExtractor {
    fn default() -> Self {
        Self {
            min_visibility: DEFAULT_MIN_VISIBILITY,
            fallback_estimation: false,
        }
    }
}
