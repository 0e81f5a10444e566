//! Configuration management for tracking parameters
//!
//! This module provides runtime configuration loading from JSON files so
//! thresholds, smoothing window and landmark gating can be tuned without
//! recompiling. Missing or malformed files fall back to defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::exercise::{ExerciseConfig, ExerciseRegistry, ExerciseTracker, ExerciseType};
use crate::geometry::DEFAULT_HISTORY_CAPACITY;
use crate::landmarks::extractor::DEFAULT_MIN_VISIBILITY;
use crate::landmarks::{LandmarkExtractor, Side};

/// Default config location for desktop runs
pub const DEFAULT_CONFIG_PATH: &str = "assets/rep_config.json";

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub exercise: ExerciseSettings,
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub landmarks: LandmarkConfig,
}

/// Which exercise to track, plus optional overrides of its registry entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseSettings {
    pub kind: ExerciseType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flexed_threshold: Option<f64>,
}

impl Default for ExerciseSettings {
    fn default() -> Self {
        Self {
            kind: ExerciseType::KneeFlexion,
            side: None,
            extended_threshold: None,
            flexed_threshold: None,
        }
    }
}

/// Repetition tracker parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Moving-average window in frames
    pub history_capacity: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

/// Landmark extraction parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandmarkConfig {
    /// Landmarks reported below this visibility count as unavailable
    pub min_visibility: f64,
    /// Estimate a hidden knee/elbow from its neighbours
    #[serde(default)]
    pub fallback_estimation: bool,
}

impl Default for LandmarkConfig {
    fn default() -> Self {
        Self {
            min_visibility: DEFAULT_MIN_VISIBILITY,
            fallback_estimation: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The parsed configuration, or defaults if the file doesn't exist or the
    /// JSON is invalid
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load configuration from the default desktop location
    pub fn load() -> Self {
        Self::load_from_file(DEFAULT_CONFIG_PATH)
    }

    /// Resolve the exercise config from the registry and apply overrides
    pub fn exercise_config(&self, registry: &ExerciseRegistry) -> Result<ExerciseConfig, ConfigError> {
        let mut config = registry.get(self.exercise.kind)?.clone();
        if let Some(side) = self.exercise.side {
            config.side = side;
        }
        if let Some(extended) = self.exercise.extended_threshold {
            config.extended_threshold = extended;
        }
        if let Some(flexed) = self.exercise.flexed_threshold {
            config.flexed_threshold = flexed;
        }
        config.validate()?;
        Ok(config)
    }

    /// Build a tracker for the configured exercise
    pub fn build_tracker(&self, registry: &ExerciseRegistry) -> Result<ExerciseTracker, ConfigError> {
        let config = self.exercise_config(registry)?;
        ExerciseTracker::with_history_capacity(config, self.tracker.history_capacity)
    }

    /// Build the landmark adapter
    pub fn build_extractor(&self) -> Result<LandmarkExtractor, ConfigError> {
        Ok(LandmarkExtractor::new(self.landmarks.min_visibility)?
            .with_fallback_estimation(self.landmarks.fallback_estimation))
    }
}
