//! Joint-angle geometry
//!
//! Computes the angle at a vertex landmark from its two flanking landmarks
//! and provides the bounded moving average used to smooth the per-frame
//! angle stream (see [`smoothing`]).

use serde::{Deserialize, Serialize};

pub mod smoothing;

pub use smoothing::{AngleHistory, DEFAULT_HISTORY_CAPACITY};

/// Rays shorter than this are treated as zero-length.
const MIN_RAY_LENGTH: f64 = 1e-9;

/// A 2-D point in normalized frame coordinates (0-1 on both axes)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point halfway between `self` and `other`
    pub fn midpoint(&self, other: &Point2D) -> Point2D {
        Point2D {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Convert to pixel coordinates for a frame of the given size
    pub fn to_pixels(&self, width: u32, height: u32) -> (i32, i32) {
        (
            (self.x * width as f64) as i32,
            (self.y * height as f64) as i32,
        )
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Result of an angle computation
///
/// `Degenerate` covers coincident points (a zero-length ray has no
/// direction) and non-finite coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JointAngle {
    /// Angle in degrees, always within [0, 180]
    Degrees(f64),
    /// No stable angle exists for these points
    Degenerate,
}

impl JointAngle {
    pub fn is_degenerate(&self) -> bool {
        matches!(self, JointAngle::Degenerate)
    }

    /// Scalar angle for the tracker; degenerate input becomes 0.0
    ///
    /// The 0.0 fallback is reported as a warning and otherwise flows through
    /// as an ordinary (low) angle sample.
    pub fn degrees_or_default(&self) -> f64 {
        match self {
            JointAngle::Degrees(degrees) => *degrees,
            JointAngle::Degenerate => {
                log::warn!("[Geometry] Degenerate joint angle, using 0.0");
                0.0
            }
        }
    }
}

/// Calculate the angle at `vertex` formed by `proximal` and `distal`
///
/// Uses the difference of the two rays' `atan2` headings, then folds reflex
/// results so the output is orientation independent:
/// - 180° = fully straight (e.g. leg extended)
/// - 90° = right angle at the joint
pub fn compute_angle(proximal: Point2D, vertex: Point2D, distal: Point2D) -> JointAngle {
    if !(proximal.is_finite() && vertex.is_finite() && distal.is_finite()) {
        return JointAngle::Degenerate;
    }

    let to_distal = (distal.x - vertex.x, distal.y - vertex.y);
    let to_proximal = (proximal.x - vertex.x, proximal.y - vertex.y);

    if to_distal.0.hypot(to_distal.1) < MIN_RAY_LENGTH
        || to_proximal.0.hypot(to_proximal.1) < MIN_RAY_LENGTH
    {
        return JointAngle::Degenerate;
    }

    let radians = to_distal.1.atan2(to_distal.0) - to_proximal.1.atan2(to_proximal.0);
    let mut degrees = radians.abs().to_degrees();

    if degrees > 180.0 {
        degrees = 360.0 - degrees;
    }

    JointAngle::Degrees(degrees)
}
