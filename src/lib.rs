// Rep Tracker Core - joint-angle repetition counting
// Pose landmarks in, smoothed angles and rep counts out

// Module declarations
pub mod config;
pub mod error;
pub mod exercise;
pub mod fixtures;
pub mod geometry;
pub mod landmarks;
pub mod session;

// Re-exports for convenience
pub use config::AppConfig;
pub use error::{ConfigError, ErrorCode, LandmarkError};
pub use exercise::{ExerciseConfig, ExerciseRegistry, ExerciseStats, ExerciseTracker, Stage};
pub use geometry::{compute_angle, AngleHistory, JointAngle, Point2D};
pub use landmarks::{LandmarkExtractor, LandmarkTriple, PoseFrame};
pub use session::{SessionCommand, SessionEvent, TrackingSession};
