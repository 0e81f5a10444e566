//! Session event types describing what happened on each processed frame.
//!
//! Events are serde-tagged so the CLI can stream them as JSON lines.

use serde::{Deserialize, Serialize};

use crate::error::LandmarkError;
use crate::exercise::Stage;

/// Per-frame session events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Smoothed angle moved the tracker to a new stage
    StageChanged {
        frame_index: u64,
        from: Stage,
        to: Stage,
    },
    /// EXTENDED -> FLEXED transition counted a repetition
    RepCompleted {
        frame_index: u64,
        counter: u32,
        /// Smoothed angle at the moment of counting
        angle: f64,
    },
    /// Landmarks unavailable; tracker state left untouched
    FrameSkipped {
        frame_index: u64,
        reason: LandmarkError,
    },
    /// Landmarks resolved but the angle was degenerate (fed as 0.0)
    DegenerateAngle { frame_index: u64 },
    /// Counter re-zeroed by a reset command
    CounterReset {
        frame_index: u64,
        previous_counter: u32,
    },
}

impl SessionEvent {
    pub fn frame_index(&self) -> u64 {
        match self {
            SessionEvent::StageChanged { frame_index, .. }
            | SessionEvent::RepCompleted { frame_index, .. }
            | SessionEvent::FrameSkipped { frame_index, .. }
            | SessionEvent::DegenerateAngle { frame_index }
            | SessionEvent::CounterReset { frame_index, .. } => *frame_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::LandmarkId;

    #[test]
    fn test_rep_event_json_shape() {
        let event = SessionEvent::RepCompleted {
            frame_index: 42,
            counter: 3,
            angle: 104.5,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "rep_completed");
        assert_eq!(json["payload"]["counter"], 3);
        assert_eq!(json["payload"]["frame_index"], 42);
    }

    #[test]
    fn test_skip_event_carries_reason() {
        let event = SessionEvent::FrameSkipped {
            frame_index: 7,
            reason: LandmarkError::Missing {
                landmark: LandmarkId::RightKnee,
            },
        };
        let json = serde_json::to_string(&event).unwrap();
        let parsed: SessionEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
        assert_eq!(parsed.frame_index(), 7);
    }

    #[test]
    fn test_stage_change_uses_display_names() {
        let event = SessionEvent::StageChanged {
            frame_index: 0,
            from: Stage::Unset,
            to: Stage::Extended,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["payload"]["from"], "READY");
        assert_eq!(json["payload"]["to"], "EXTENDED");
    }
}
