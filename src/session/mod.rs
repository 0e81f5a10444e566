// Session module - frame-by-frame orchestration
//
// A TrackingSession stands where the capture/render loop would: for each
// frame it calls the landmark adapter, computes the joint angle, feeds the
// tracker, and reports what a renderer needs (angle at the joint, stage,
// counter) together with the events raised on that frame.
//
// Strictly sequential: one frame at a time, at most one tracker update per
// frame. Hosts reading stats from another thread must synchronize.

use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::error::{log_config_error, log_landmark_error, ConfigError, LandmarkError};
use crate::exercise::{ExerciseRegistry, ExerciseStats, ExerciseTracker};
use crate::geometry::Point2D;
use crate::landmarks::{LandmarkExtractor, PoseFrame};

pub mod events;

pub use events::SessionEvent;

/// Control commands from the host (keyboard in an interactive app)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionCommand {
    Quit,
    Reset,
    ShowStats,
}

impl SessionCommand {
    /// Map a key press: `q` quit, `r` reset, `s` show stats
    pub fn from_key(key: char) -> Option<SessionCommand> {
        match key {
            'q' => Some(SessionCommand::Quit),
            'r' => Some(SessionCommand::Reset),
            's' => Some(SessionCommand::ShowStats),
            _ => None,
        }
    }
}

/// Result of applying a [`SessionCommand`]
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResult {
    /// false once the host should stop its frame loop
    pub keep_running: bool,
    pub event: Option<SessionEvent>,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameOutcome {
    pub frame_index: u64,
    /// Unsmoothed angle measured on this frame, if landmarks were available
    pub raw_angle: Option<f64>,
    /// Vertex joint position for drawing the angle label
    pub joint_position: Option<Point2D>,
    pub rep_completed: bool,
    pub stats: ExerciseStats,
    pub events: Vec<SessionEvent>,
}

/// Drives one exercise tracker from a stream of pose frames
#[derive(Debug)]
pub struct TrackingSession {
    extractor: LandmarkExtractor,
    tracker: ExerciseTracker,
    next_frame: u64,
    skipped_frames: u64,
}

impl TrackingSession {
    pub fn new(extractor: LandmarkExtractor, tracker: ExerciseTracker) -> Self {
        Self {
            extractor,
            tracker,
            next_frame: 0,
            skipped_frames: 0,
        }
    }

    /// Build extractor and tracker from application config
    pub fn from_config(config: &AppConfig, registry: &ExerciseRegistry) -> Result<Self, ConfigError> {
        let built = config
            .build_extractor()
            .and_then(|extractor| Ok((extractor, config.build_tracker(registry)?)));
        let (extractor, tracker) = match built {
            Ok(parts) => parts,
            Err(err) => {
                log_config_error(&err, "TrackingSession::from_config");
                return Err(err);
            }
        };
        tracing::info!(
            "[Session] Starting {} tracking ({:?} side)",
            tracker.config().name,
            tracker.config().side
        );
        Ok(Self::new(extractor, tracker))
    }

    /// Process one frame; `None` means the pose engine found no person
    pub fn process_frame(&mut self, frame: Option<&PoseFrame>) -> FrameOutcome {
        let frame_index = self.next_frame;
        self.next_frame += 1;

        let triple = match frame {
            Some(frame) => self.extractor.extract(frame, self.tracker.config()),
            None => Err(LandmarkError::NoPose),
        };

        let triple = match triple {
            Ok(triple) => triple,
            Err(reason) => {
                self.skipped_frames += 1;
                log_landmark_error(&reason, "TrackingSession::process_frame");
                return FrameOutcome {
                    frame_index,
                    raw_angle: None,
                    joint_position: None,
                    rep_completed: false,
                    stats: self.tracker.stats(),
                    events: vec![SessionEvent::FrameSkipped {
                        frame_index,
                        reason,
                    }],
                };
            }
        };

        let mut events = Vec::new();
        let angle = triple.angle();
        if angle.is_degenerate() {
            events.push(SessionEvent::DegenerateAngle { frame_index });
        }
        let raw_angle = angle.degrees_or_default();

        let before = self.tracker.stage();
        let rep_completed = self.tracker.update(raw_angle);
        let after = self.tracker.stage();

        if before != after {
            events.push(SessionEvent::StageChanged {
                frame_index,
                from: before,
                to: after,
            });
        }
        if rep_completed {
            events.push(SessionEvent::RepCompleted {
                frame_index,
                counter: self.tracker.counter(),
                angle: self.tracker.current_angle(),
            });
        }

        FrameOutcome {
            frame_index,
            raw_angle: Some(raw_angle),
            joint_position: Some(triple.vertex),
            rep_completed,
            stats: self.tracker.stats(),
            events,
        }
    }

    /// Apply a host command between frames
    pub fn apply(&mut self, command: SessionCommand) -> CommandResult {
        match command {
            SessionCommand::Quit => {
                tracing::info!("[Session] Quit requested");
                CommandResult {
                    keep_running: false,
                    event: None,
                }
            }
            SessionCommand::Reset => {
                let previous_counter = self.tracker.counter();
                self.tracker.reset();
                CommandResult {
                    keep_running: true,
                    event: Some(SessionEvent::CounterReset {
                        frame_index: self.next_frame,
                        previous_counter,
                    }),
                }
            }
            SessionCommand::ShowStats => {
                tracing::info!("[Session] Current stats: {:?}", self.tracker.stats());
                CommandResult {
                    keep_running: true,
                    event: None,
                }
            }
        }
    }

    pub fn stats(&self) -> ExerciseStats {
        self.tracker.stats()
    }

    pub fn tracker(&self) -> &ExerciseTracker {
        &self.tracker
    }

    /// Frames seen so far, skipped ones included
    pub fn frames_processed(&self) -> u64 {
        self.next_frame
    }

    pub fn frames_skipped(&self) -> u64 {
        self.skipped_frames
    }
}
