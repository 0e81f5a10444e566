// ExerciseState - mutable core of a tracking session
//
// Owned exclusively by one ExerciseTracker. Mutated only by the tracker's
// update and reset operations.

use serde::{Deserialize, Serialize};

use crate::geometry::{AngleHistory, DEFAULT_HISTORY_CAPACITY};

/// Qualitative joint position derived from the smoothed angle
///
/// Serializes to the display names used by renderers: `READY` before the
/// first classification, then `EXTENDED` / `FLEXED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Stage {
    /// No threshold crossed yet this session
    #[default]
    #[serde(rename = "READY")]
    Unset,
    #[serde(rename = "EXTENDED")]
    Extended,
    #[serde(rename = "FLEXED")]
    Flexed,
}

impl Stage {
    /// Get human-readable name for display
    pub fn display_name(&self) -> &'static str {
        match self {
            Stage::Unset => "READY",
            Stage::Extended => "EXTENDED",
            Stage::Flexed => "FLEXED",
        }
    }
}

/// Counter, stage and smoothing window of one tracker
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseState {
    /// Completed repetitions since construction or the last reset
    pub counter: u32,
    pub stage: Stage,
    /// Most recent raw angle samples (bounded, oldest evicted first)
    pub angle_history: AngleHistory,
    /// Latest smoothed angle in degrees
    pub current_angle: f64,
}

impl ExerciseState {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            counter: 0,
            stage: Stage::Unset,
            angle_history: AngleHistory::new(history_capacity),
            current_angle: 0.0,
        }
    }
}

impl Default for ExerciseState {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_display_names() {
        assert_eq!(Stage::Unset.display_name(), "READY");
        assert_eq!(Stage::Extended.display_name(), "EXTENDED");
        assert_eq!(Stage::Flexed.display_name(), "FLEXED");
    }

    #[test]
    fn test_stage_serializes_as_display_name() {
        assert_eq!(serde_json::to_string(&Stage::Unset).unwrap(), "\"READY\"");
        let stage: Stage = serde_json::from_str("\"FLEXED\"").unwrap();
        assert_eq!(stage, Stage::Flexed);
    }

    #[test]
    fn test_new_state_is_empty() {
        let state = ExerciseState::new(5);
        assert_eq!(state.counter, 0);
        assert_eq!(state.stage, Stage::Unset);
        assert!(state.angle_history.is_empty());
        assert_eq!(state.angle_history.capacity(), 5);
        assert_eq!(state.current_angle, 0.0);
    }

    #[test]
    fn test_default_state_uses_default_window() {
        let state = ExerciseState::default();
        assert_eq!(state, ExerciseState::new(DEFAULT_HISTORY_CAPACITY));
        assert_eq!(state.angle_history.capacity(), 10);
    }
}
