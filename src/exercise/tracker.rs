//! ExerciseTracker - repetition counting state machine
//!
//! Consumes one raw joint angle per frame, smooths it through a bounded
//! moving average, and applies two thresholds with a dead band between them:
//!
//! - smoothed > extended_threshold: stage becomes EXTENDED (from any stage)
//! - smoothed < flexed_threshold while EXTENDED: stage becomes FLEXED, +1 rep
//! - anything else: no change
//!
//! A rep is counted on entry into FLEXED from EXTENDED only, so a session
//! that starts already flexed gets no free count and lingering below the
//! flexed threshold cannot count twice.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::exercise::config::ExerciseConfig;
use crate::exercise::state::{ExerciseState, Stage};
use crate::geometry::DEFAULT_HISTORY_CAPACITY;

/// Statistics snapshot for display
///
/// Field names follow the renderer-facing record (`exerciseName`,
/// `currentAngle`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseStats {
    pub exercise_name: String,
    pub counter: u32,
    pub stage: Stage,
    /// Latest smoothed angle
    pub current_angle: f64,
    /// Mean of the samples currently in the smoothing window (0.0 if empty)
    pub average_angle: f64,
    pub extended_threshold: f64,
    pub flexed_threshold: f64,
}

/// Rep counter for a single configured exercise
#[derive(Debug, Clone)]
pub struct ExerciseTracker {
    config: ExerciseConfig,
    state: ExerciseState,
}

impl ExerciseTracker {
    /// Create a tracker with the default 10-sample smoothing window
    pub fn new(config: ExerciseConfig) -> Result<Self, ConfigError> {
        Self::with_history_capacity(config, DEFAULT_HISTORY_CAPACITY)
    }

    /// Create a tracker with a custom smoothing window
    ///
    /// # Returns
    /// * `Err(ConfigError)` - thresholds violate the hysteresis invariant or
    ///   `history_capacity` is zero
    pub fn with_history_capacity(
        config: ExerciseConfig,
        history_capacity: usize,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if history_capacity == 0 {
            return Err(ConfigError::InvalidHistoryCapacity {
                capacity: history_capacity,
            });
        }

        info!(
            "Initialized tracker for {} (extended > {}, flexed < {}, window {})",
            config.name, config.extended_threshold, config.flexed_threshold, history_capacity
        );

        Ok(Self {
            config,
            state: ExerciseState::new(history_capacity),
        })
    }

    /// Feed one raw angle sample
    ///
    /// Never fails. A non-finite sample is replaced by 0.0 and handled like
    /// any other low angle.
    ///
    /// # Returns
    /// `true` iff this sample completed a repetition
    pub fn update(&mut self, raw_angle: f64) -> bool {
        let sample = if raw_angle.is_finite() {
            raw_angle
        } else {
            warn!(
                "{}: non-finite angle sample {}, using 0.0",
                self.config.name, raw_angle
            );
            0.0
        };

        let smoothed = self.state.angle_history.smooth(sample);
        self.state.current_angle = smoothed;

        if smoothed > self.config.extended_threshold {
            self.state.stage = Stage::Extended;
            false
        } else if smoothed < self.config.flexed_threshold && self.state.stage == Stage::Extended {
            self.state.stage = Stage::Flexed;
            self.state.counter += 1;
            info!("{} Rep: {}", self.config.name, self.state.counter);
            true
        } else {
            false
        }
    }

    /// Re-zero the session: counter, stage, history and current angle
    pub fn reset(&mut self) {
        self.state.counter = 0;
        self.state.stage = Stage::Unset;
        self.state.angle_history.clear();
        self.state.current_angle = 0.0;

        info!("{} counter reset", self.config.name);
    }

    pub fn stats(&self) -> ExerciseStats {
        ExerciseStats {
            exercise_name: self.config.name.clone(),
            counter: self.state.counter,
            stage: self.state.stage,
            current_angle: self.state.current_angle,
            average_angle: self.state.angle_history.average(),
            extended_threshold: self.config.extended_threshold,
            flexed_threshold: self.config.flexed_threshold,
        }
    }

    /// Stage text for display, `READY` before the first classification
    pub fn display_stage(&self) -> &'static str {
        self.state.stage.display_name()
    }

    pub fn counter(&self) -> u32 {
        self.state.counter
    }

    pub fn stage(&self) -> Stage {
        self.state.stage
    }

    pub fn current_angle(&self) -> f64 {
        self.state.current_angle
    }

    pub fn state(&self) -> &ExerciseState {
        &self.state
    }

    pub fn config(&self) -> &ExerciseConfig {
        &self.config
    }
}
