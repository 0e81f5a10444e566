// ExerciseConfig - threshold and joint parameters for one exercise
//
// Configurations are built once at startup from an explicit registry and
// handed to the tracker by value. The tracker never mutates them.
//
// Hysteresis requires extended_threshold > flexed_threshold: the angle range
// between the two is the dead band where no stage transition happens.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::landmarks::{BodyJoint, Side};

/// Supported exercise types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    KneeFlexion,
}

impl ExerciseType {
    pub const ALL: [ExerciseType; 1] = [ExerciseType::KneeFlexion];

    /// Identifier used in config files and on the command line
    pub fn key(&self) -> &'static str {
        match self {
            ExerciseType::KneeFlexion => "knee_flexion",
        }
    }
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ExerciseType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "kneeflexion" => Ok(ExerciseType::KneeFlexion),
            _ => Err(ConfigError::UnknownExercise {
                exercise: s.to_string(),
            }),
        }
    }
}

/// Immutable exercise parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseConfig {
    /// Display name
    pub name: String,
    /// Joints in (proximal, vertex, distal) order; the angle is measured at the vertex
    pub joints: [BodyJoint; 3],
    /// Smoothed angle above this (degrees) means EXTENDED
    pub extended_threshold: f64,
    /// Smoothed angle below this (degrees) completes a rep from EXTENDED
    pub flexed_threshold: f64,
    #[serde(default = "default_side")]
    pub side: Side,
}

fn default_side() -> Side {
    Side::Right
}

impl ExerciseConfig {
    /// Knee flexion: hip-knee-ankle angle, right leg
    ///
    /// Extended above 170°, flexed below 108°.
    pub fn knee_flexion() -> Self {
        Self {
            name: "Knee Flexion".to_string(),
            joints: [BodyJoint::Hip, BodyJoint::Knee, BodyJoint::Ankle],
            extended_threshold: 170.0,
            flexed_threshold: 108.0,
            side: Side::Right,
        }
    }

    /// Check the threshold invariants
    ///
    /// # Validation
    /// - Both thresholds finite and within [0, 180]
    /// - extended_threshold strictly greater than flexed_threshold
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::validate_threshold("extended_threshold", self.extended_threshold)?;
        Self::validate_threshold("flexed_threshold", self.flexed_threshold)?;

        if self.extended_threshold <= self.flexed_threshold {
            return Err(ConfigError::InvalidThresholds {
                extended: self.extended_threshold,
                flexed: self.flexed_threshold,
            });
        }

        Ok(())
    }

    fn validate_threshold(name: &str, value: f64) -> Result<(), ConfigError> {
        if !value.is_finite() || !(0.0..=180.0).contains(&value) {
            return Err(ConfigError::ThresholdOutOfRange {
                name: name.to_string(),
                value,
            });
        }
        Ok(())
    }
}

/// Lookup table of exercise configurations
///
/// Constructed at startup and passed to whoever builds trackers; there is
/// no process-wide registry.
#[derive(Debug, Clone, Default)]
pub struct ExerciseRegistry {
    configs: HashMap<ExerciseType, ExerciseConfig>,
}

impl ExerciseRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the predefined exercises
    pub fn builtin() -> Self {
        let mut configs = HashMap::new();
        configs.insert(ExerciseType::KneeFlexion, ExerciseConfig::knee_flexion());
        Self { configs }
    }

    /// Register (or replace) an exercise after validating it
    pub fn insert(
        &mut self,
        exercise: ExerciseType,
        config: ExerciseConfig,
    ) -> Result<(), ConfigError> {
        config.validate()?;
        self.configs.insert(exercise, config);
        Ok(())
    }

    pub fn get(&self, exercise: ExerciseType) -> Result<&ExerciseConfig, ConfigError> {
        self.configs
            .get(&exercise)
            .ok_or_else(|| ConfigError::UnknownExercise {
                exercise: exercise.key().to_string(),
            })
    }

    /// Registered exercises in a stable order
    pub fn entries(&self) -> Vec<(ExerciseType, &ExerciseConfig)> {
        let mut entries: Vec<_> = self
            .configs
            .iter()
            .map(|(exercise, config)| (*exercise, config))
            .collect();
        entries.sort_by_key(|(exercise, _)| exercise.key());
        entries
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}
