//! Fixture utilities for the deterministic CLI harness.
//!
//! This module discovers recorded pose sessions, parses optional
//! expectation JSON, and replays frames through a `TrackingSession` so
//! rep counting can be checked without a camera or pose engine.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::exercise::{ExerciseRegistry, ExerciseStats, ExerciseType, Stage};
use crate::landmarks::PoseFrame;
use crate::session::{SessionCommand, SessionEvent, TrackingSession};

pub mod synthetic;

pub use synthetic::SyntheticMotion;

/// Default location for fixture JSON assets.
pub const DEFAULT_FIXTURE_ROOT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures");

const EXPECT_SUFFIX: &str = ".expect.json";

/// Metadata describing an available fixture.
#[derive(Clone, Debug)]
pub struct FixtureMetadata {
    pub name: String,
    pub path: PathBuf,
    pub expect_path: Option<PathBuf>,
}

/// Recorded pose session as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseRecording {
    pub exercise: ExerciseType,
    #[serde(default = "default_fps")]
    pub fps: f64,
    /// One entry per captured frame; `null` when no person was detected
    pub frames: Vec<Option<PoseFrame>>,
    #[serde(default)]
    pub commands: Vec<ScheduledCommand>,
}

fn default_fps() -> f64 {
    30.0
}

/// Host command injected before the given frame is processed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledCommand {
    pub frame: u64,
    pub command: SessionCommand,
}

/// Loaded fixture data.
pub struct FixtureData {
    pub metadata: FixtureMetadata,
    pub recording: PoseRecording,
    pub expectations: Option<FixtureExpectations>,
}

impl FixtureData {
    /// Wrap an in-memory recording (synthetic runs, tests)
    pub fn from_recording(name: impl Into<String>, recording: PoseRecording) -> Self {
        let name = name.into();
        Self {
            metadata: FixtureMetadata {
                path: PathBuf::from(format!("{name}.json")),
                name,
                expect_path: None,
            },
            recording,
            expectations: None,
        }
    }
}

/// JSON expectation schema for fixture verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureExpectations {
    pub fixture: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub final_counter: u32,
    #[serde(default)]
    pub final_stage: Option<Stage>,
    /// Frame index at which each rep should complete
    #[serde(default)]
    pub rep_frames: Option<Vec<u64>>,
    #[serde(default = "default_tolerance")]
    pub tolerance_frames: u64,
}

fn default_tolerance() -> u64 {
    2
}

impl FixtureExpectations {
    pub fn verify(&self, report: &FixtureReport) -> std::result::Result<(), ExpectationDiff> {
        let mut failures = Vec::new();

        if report.final_stats.counter != self.final_counter {
            failures.push(ExpectationFailure::new(
                "final_counter",
                self.final_counter,
                report.final_stats.counter,
            ));
        }

        if let Some(stage) = self.final_stage {
            if report.final_stats.stage != stage {
                failures.push(ExpectationFailure::new(
                    "final_stage",
                    stage,
                    report.final_stats.stage,
                ));
            }
        }

        if let Some(rep_frames) = &self.rep_frames {
            for (idx, expected) in rep_frames.iter().enumerate() {
                match report.reps.get(idx) {
                    Some(rep) => {
                        if rep.frame_index.abs_diff(*expected) > self.tolerance_frames {
                            failures.push(ExpectationFailure::new(
                                format!("reps[{idx}].frame_index"),
                                expected,
                                rep.frame_index,
                            ));
                        }
                    }
                    None => failures.push(ExpectationFailure::new(
                        format!("reps[{idx}]"),
                        expected,
                        serde_json::Value::Null,
                    )),
                }
            }

            for (idx, rep) in report.reps.iter().enumerate().skip(rep_frames.len()) {
                failures.push(ExpectationFailure::new(
                    format!("reps[{idx}]"),
                    serde_json::Value::Null,
                    rep.frame_index,
                ));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ExpectationDiff { failures })
        }
    }
}

/// Outcome of comparing actual results with expectations.
#[derive(Debug)]
pub struct ExpectationDiff {
    pub failures: Vec<ExpectationFailure>,
}

impl ExpectationDiff {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "failures": self.failures })
    }
}

/// Detailed diff entry for a single failure.
#[derive(Debug, Clone, Serialize)]
pub struct ExpectationFailure {
    pub field: String,
    pub expected: serde_json::Value,
    pub actual: serde_json::Value,
}

impl ExpectationFailure {
    fn new(field: impl Into<String>, expected: impl Serialize, actual: impl Serialize) -> Self {
        Self {
            field: field.into(),
            expected: serde_json::to_value(expected).unwrap_or_default(),
            actual: serde_json::to_value(actual).unwrap_or_default(),
        }
    }
}

/// A completed repetition observed during replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepRecord {
    pub frame_index: u64,
    pub counter: u32,
    /// Smoothed angle when the rep completed
    pub angle: f64,
    pub timestamp_ms: u64,
}

/// Summary emitted by the replay harness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureReport {
    pub fixture: String,
    pub exercise: ExerciseType,
    pub fps: f64,
    pub frame_count: usize,
    pub processed_frames: u64,
    pub skipped_frames: u64,
    pub reps: Vec<RepRecord>,
    pub final_stats: ExerciseStats,
}

/// Catalog responsible for discovering fixtures on disk.
pub struct FixtureCatalog {
    root: PathBuf,
}

impl FixtureCatalog {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List all fixtures by their metadata.
    pub fn discover(&self) -> Result<Vec<FixtureMetadata>> {
        let mut fixtures = Vec::new();
        if !self.root.exists() {
            return Ok(fixtures);
        }

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            let is_json = path.extension().and_then(|ext| ext.to_str()) == Some("json");
            let is_expectation = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(EXPECT_SUFFIX));
            if is_json && !is_expectation {
                fixtures.push(self.metadata_for_path(&path)?);
            }
        }

        fixtures.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(fixtures)
    }

    /// Load fixture frames + expectations for provided name or path.
    pub fn load(&self, fixture: &str, override_expect: Option<PathBuf>) -> Result<FixtureData> {
        let path = self.resolve_fixture_path(fixture)?;
        let metadata = self.metadata_for_path(&path)?;

        let json = fs::read_to_string(&path)
            .with_context(|| format!("reading fixture {}", path.display()))?;
        let recording: PoseRecording =
            serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))?;

        let expectation_path = override_expect.or(metadata.expect_path.clone());
        let expectations = match expectation_path {
            Some(path) => {
                let json = fs::read_to_string(&path)
                    .with_context(|| format!("reading expectation {}", path.display()))?;
                Some(
                    serde_json::from_str(&json)
                        .with_context(|| format!("parsing {}", path.display()))?,
                )
            }
            None => None,
        };

        tracing::debug!(
            "[Fixtures] Loaded {} ({} frames)",
            metadata.name,
            recording.frames.len()
        );

        Ok(FixtureData {
            metadata,
            recording,
            expectations,
        })
    }

    fn resolve_fixture_path(&self, fixture: &str) -> Result<PathBuf> {
        let as_path = Path::new(fixture);
        if as_path.is_file() {
            return Ok(as_path.to_path_buf());
        }

        let candidate = self.root.join(format!("{fixture}.json"));
        if candidate.exists() {
            Ok(candidate)
        } else {
            Err(anyhow!(
                "Fixture '{fixture}' not found in {}",
                self.root.display()
            ))
        }
    }

    fn metadata_for_path(&self, path: &Path) -> Result<FixtureMetadata> {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| anyhow!("Invalid fixture name for {}", path.display()))?
            .to_string();
        let expect_path = path.with_file_name(format!("{name}{EXPECT_SUFFIX}"));
        Ok(FixtureMetadata {
            name,
            path: path.to_path_buf(),
            expect_path: expect_path.exists().then_some(expect_path),
        })
    }
}

impl Default for FixtureCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_FIXTURE_ROOT)
    }
}

/// Replays recorded frames through a fresh tracking session.
pub struct FixtureProcessor {
    app_config: AppConfig,
    registry: ExerciseRegistry,
}

impl FixtureProcessor {
    pub fn new(app_config: AppConfig, registry: ExerciseRegistry) -> Self {
        Self {
            app_config,
            registry,
        }
    }

    pub fn run(&self, data: &FixtureData) -> Result<FixtureReport> {
        self.run_with_events(data).map(|(report, _)| report)
    }

    /// Replay and also return every session event in order
    pub fn run_with_events(&self, data: &FixtureData) -> Result<(FixtureReport, Vec<SessionEvent>)> {
        let recording = &data.recording;
        if !(recording.fps.is_finite() && recording.fps > 0.0) {
            return Err(anyhow!(
                "Fixture {} has invalid fps {}",
                data.metadata.name,
                recording.fps
            ));
        }

        let mut config = self.app_config.clone();
        config.exercise.kind = recording.exercise;
        let mut session = TrackingSession::from_config(&config, &self.registry)
            .with_context(|| format!("building session for {}", data.metadata.name))?;

        let mut commands = recording.commands.clone();
        commands.sort_by_key(|scheduled| scheduled.frame);
        let mut pending = commands.into_iter().peekable();

        let mut events = Vec::new();
        let mut reps = Vec::new();

        let mut stopped = false;

        'frames: for (idx, frame) in recording.frames.iter().enumerate() {
            let frame_index = idx as u64;
            while let Some(scheduled) = pending.next_if(|scheduled| scheduled.frame <= frame_index) {
                let result = session.apply(scheduled.command);
                events.extend(result.event);
                if !result.keep_running {
                    tracing::info!("[Fixtures] Replay stopped at frame {}", frame_index);
                    stopped = true;
                    break 'frames;
                }
            }

            let outcome = session.process_frame(frame.as_ref());
            if outcome.rep_completed {
                reps.push(RepRecord {
                    frame_index,
                    counter: outcome.stats.counter,
                    angle: outcome.stats.current_angle,
                    timestamp_ms: frame_timestamp_ms(frame_index, recording.fps),
                });
            }
            events.extend(outcome.events);
        }

        // Commands scheduled past the last frame run after it
        if !stopped {
            for scheduled in pending {
                let result = session.apply(scheduled.command);
                events.extend(result.event);
                if !result.keep_running {
                    break;
                }
            }
        }

        let report = FixtureReport {
            fixture: data.metadata.name.clone(),
            exercise: recording.exercise,
            fps: recording.fps,
            frame_count: recording.frames.len(),
            processed_frames: session.frames_processed(),
            skipped_frames: session.frames_skipped(),
            reps,
            final_stats: session.stats(),
        };

        tracing::info!(
            "[Fixtures] {}: {} reps over {} frames ({} skipped)",
            report.fixture,
            report.final_stats.counter,
            report.processed_frames,
            report.skipped_frames
        );

        Ok((report, events))
    }
}

fn frame_timestamp_ms(frame_index: u64, fps: f64) -> u64 {
    ((frame_index as f64 / fps) * 1000.0).round().max(0.0) as u64
}

#[cfg(test)]
mod tests;
