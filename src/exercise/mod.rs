// Exercise module - repetition counting
//
// This module provides three components:
// 1. ExerciseConfig / ExerciseRegistry: immutable per-exercise parameters
// 2. ExerciseState: counter, stage and smoothing history
// 3. ExerciseTracker: the hysteresis state machine driving ExerciseState
//
// Per frame:
// 1. Adapter yields a landmark triple (or the frame is skipped)
// 2. Angle at the vertex joint is computed
// 3. ExerciseTracker::update smooths it and advances the stage/counter

pub mod config;
pub mod state;
pub mod tracker;

pub use config::{ExerciseConfig, ExerciseRegistry, ExerciseType};
pub use state::{ExerciseState, Stage};
pub use tracker::{ExerciseStats, ExerciseTracker};
