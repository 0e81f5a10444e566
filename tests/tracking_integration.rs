//! Integration tests for the landmark → angle → tracker pipeline
//!
//! These tests drive the public API the way a capture loop would:
//! - Pose frames through a `TrackingSession`
//! - Config overrides (side, fallback estimation) from JSON
//! - Shipped fixtures replayed against their expectation files

use rep_tracker::config::AppConfig;
use rep_tracker::exercise::{ExerciseConfig, ExerciseRegistry, Stage};
use rep_tracker::fixtures::synthetic::limb_frame;
use rep_tracker::fixtures::{FixtureCatalog, FixtureProcessor};
use rep_tracker::landmarks::{Landmark, LandmarkId, PoseFrame};
use rep_tracker::{compute_angle, ErrorCode, LandmarkError, Point2D, SessionEvent, TrackingSession};

fn session_with(json: &str) -> TrackingSession {
    let config: AppConfig = serde_json::from_str(json).expect("valid config JSON");
    TrackingSession::from_config(&config, &ExerciseRegistry::builtin()).expect("valid session")
}

fn drive(session: &mut TrackingSession, angles: &[(f64, usize)]) -> u32 {
    let knee = ExerciseConfig::knee_flexion();
    let mut reps = 0;
    for &(angle, frames) in angles {
        for _ in 0..frames {
            if session.process_frame(Some(&limb_frame(&knee, angle))).rep_completed {
                reps += 1;
            }
        }
    }
    reps
}

/// Thresholds 170/108: extended near 175, flexed at 100, two cycles
#[test]
fn test_two_cycle_scenario() {
    let mut session = session_with("{}");
    assert_eq!(drive(&mut session, &[(175.0, 10)]), 0);
    assert_eq!(session.stats().stage, Stage::Extended);

    assert_eq!(drive(&mut session, &[(100.0, 10)]), 1);
    assert_eq!(session.stats().stage, Stage::Flexed);

    assert_eq!(drive(&mut session, &[(175.0, 10)]), 0);
    assert_eq!(session.stats().stage, Stage::Extended);
    assert_eq!(session.stats().counter, 1);

    assert_eq!(drive(&mut session, &[(100.0, 10)]), 1);
    assert_eq!(session.stats().counter, 2);
}

#[test]
fn test_angle_reference_values() {
    let right = compute_angle(
        Point2D::new(1.0, 0.0),
        Point2D::new(0.0, 0.0),
        Point2D::new(0.0, 1.0),
    );
    assert!((right.degrees_or_default() - 90.0).abs() < 1e-9);

    let straight = compute_angle(
        Point2D::new(1.0, 0.0),
        Point2D::new(0.0, 0.0),
        Point2D::new(-1.0, 0.0),
    );
    assert!((straight.degrees_or_default() - 180.0).abs() < 1e-9);
}

#[test]
fn test_left_side_override() {
    let mut session = session_with(r#"{"exercise": {"kind": "knee_flexion", "side": "LEFT"}}"#);
    let frame = PoseFrame::new()
        .with_landmark(LandmarkId::LeftHip, Landmark::new(0.4, 0.3))
        .with_landmark(LandmarkId::LeftKnee, Landmark::new(0.4, 0.5))
        .with_landmark(LandmarkId::LeftAnkle, Landmark::new(0.4, 0.7));
    let outcome = session.process_frame(Some(&frame));
    assert!((outcome.raw_angle.unwrap() - 180.0).abs() < 1e-9);
    assert_eq!(outcome.stats.stage, Stage::Extended);
}

#[test]
fn test_hidden_knee_needs_fallback() {
    let knee = ExerciseConfig::knee_flexion();
    let mut frame = limb_frame(&knee, 178.0);
    frame.insert(
        LandmarkId::RightKnee,
        Landmark::new(0.55, 0.5).with_visibility(0.1),
    );

    let mut strict = session_with("{}");
    let outcome = strict.process_frame(Some(&frame));
    assert_eq!(outcome.raw_angle, None);
    match &outcome.events[0] {
        SessionEvent::FrameSkipped { reason, .. } => {
            assert!(matches!(reason, LandmarkError::LowVisibility { .. }));
            assert_eq!(reason.code(), 4003);
        }
        other => panic!("unexpected event {other:?}"),
    }

    let mut lenient = session_with(r#"{"landmarks": {"min_visibility": 0.5, "fallback_estimation": true}}"#);
    let outcome = lenient.process_frame(Some(&frame));
    assert!(outcome.raw_angle.is_some());
    assert_eq!(outcome.stats.stage, Stage::Extended);
}

#[test]
fn test_shipped_fixtures_meet_expectations() {
    let catalog = FixtureCatalog::default();
    let processor = FixtureProcessor::new(AppConfig::default(), ExerciseRegistry::builtin());

    let fixtures = catalog.discover().expect("fixture directory readable");
    assert!(fixtures.len() >= 3);

    for metadata in fixtures {
        let data = catalog.load(&metadata.name, None).expect("fixture loads");
        let report = processor.run(&data).expect("fixture replays");
        let expectations = data.expectations.expect("every shipped fixture has expectations");
        assert_eq!(expectations.fixture, metadata.name);
        let exercise = data.recording.exercise.key().replace('_', " ");
        let notes = expectations.notes.as_deref().unwrap_or_default();
        assert!(
            notes.to_lowercase().contains(&exercise),
            "{} notes should describe {exercise}: {notes}",
            metadata.name
        );
        if let Err(diff) = expectations.verify(&report) {
            panic!("{} failed: {}", metadata.name, diff.to_json());
        }
    }
}
