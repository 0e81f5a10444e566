use super::*;
use crate::error::LandmarkError;
use crate::exercise::ExerciseConfig;

fn processor() -> FixtureProcessor {
    FixtureProcessor::new(AppConfig::default(), ExerciseRegistry::builtin())
}

fn clean_recording(reps: u32) -> PoseRecording {
    SyntheticMotion::new(reps)
        .with_jitter(0.0)
        .recording(&ExerciseConfig::knee_flexion())
}

fn scratch_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("rep-fixtures-{label}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn replay_counts_synthetic_reps() {
    let data = FixtureData::from_recording("clean", clean_recording(3));
    let report = processor().run(&data).unwrap();

    assert_eq!(report.fixture, "clean");
    assert_eq!(report.final_stats.counter, 3);
    assert_eq!(report.final_stats.stage, Stage::Extended);
    assert_eq!(report.reps.len(), 3);
    assert_eq!(report.skipped_frames, 0);
    assert_eq!(report.processed_frames, report.frame_count as u64);
    let counters: Vec<u32> = report.reps.iter().map(|rep| rep.counter).collect();
    assert_eq!(counters, vec![1, 2, 3]);
    assert!(report.reps.iter().all(|rep| rep.angle < 108.0));
}

#[test]
fn replay_skips_missing_frames() {
    let mut recording = clean_recording(1);
    recording.frames[3] = None;
    recording.frames[4] = Some(PoseFrame::new());
    let data = FixtureData::from_recording("gaps", recording);

    let (report, events) = processor().run_with_events(&data).unwrap();
    assert_eq!(report.skipped_frames, 2);
    assert_eq!(report.final_stats.counter, 1);
    assert!(events.contains(&SessionEvent::FrameSkipped {
        frame_index: 3,
        reason: LandmarkError::NoPose,
    }));
}

#[test]
fn scheduled_reset_and_quit() {
    let mut recording = clean_recording(2);
    let total = recording.frames.len() as u64;
    // Reset once the first rep has landed, quit before the end
    recording.commands = vec![
        ScheduledCommand {
            frame: 60,
            command: SessionCommand::Reset,
        },
        ScheduledCommand {
            frame: total - 5,
            command: SessionCommand::Quit,
        },
    ];
    let data = FixtureData::from_recording("commands", recording);

    let (report, events) = processor().run_with_events(&data).unwrap();
    assert_eq!(report.processed_frames, total - 5);
    assert!(events.contains(&SessionEvent::CounterReset {
        frame_index: 60,
        previous_counter: 1,
    }));
    assert_eq!(report.reps.len(), 2);
    assert_eq!(report.final_stats.counter, 1);
}

#[test]
fn commands_after_last_frame_still_apply() {
    let mut recording = clean_recording(1);
    let total = recording.frames.len() as u64;
    recording.commands = vec![
        ScheduledCommand {
            frame: total,
            command: SessionCommand::Reset,
        },
        ScheduledCommand {
            frame: total + 3,
            command: SessionCommand::Quit,
        },
        ScheduledCommand {
            frame: total + 5,
            command: SessionCommand::Reset,
        },
    ];
    let data = FixtureData::from_recording("trailing", recording);

    let (report, events) = processor().run_with_events(&data).unwrap();
    assert_eq!(report.processed_frames, total);
    assert_eq!(report.reps.len(), 1);
    assert_eq!(report.final_stats.counter, 0);
    assert_eq!(report.final_stats.stage, Stage::Unset);

    let resets: Vec<&SessionEvent> = events
        .iter()
        .filter(|event| matches!(event, SessionEvent::CounterReset { .. }))
        .collect();
    assert_eq!(
        resets,
        vec![&SessionEvent::CounterReset {
            frame_index: total,
            previous_counter: 1,
        }]
    );
}

#[test]
fn expectations_pass_and_fail() {
    let data = FixtureData::from_recording("clean", clean_recording(2));
    let report = processor().run(&data).unwrap();
    let rep_frames: Vec<u64> = report.reps.iter().map(|rep| rep.frame_index).collect();

    let matching = FixtureExpectations {
        fixture: "clean".into(),
        notes: None,
        final_counter: 2,
        final_stage: Some(Stage::Extended),
        rep_frames: Some(rep_frames.iter().map(|frame| frame + 1).collect()),
        tolerance_frames: 2,
    };
    assert!(matching.verify(&report).is_ok());

    let wrong = FixtureExpectations {
        final_counter: 3,
        final_stage: Some(Stage::Flexed),
        rep_frames: Some(vec![rep_frames[0] + 10]),
        ..matching
    };
    let diff = wrong.verify(&report).unwrap_err();
    let fields: Vec<&str> = diff.failures.iter().map(|f| f.field.as_str()).collect();
    assert_eq!(
        fields,
        vec!["final_counter", "final_stage", "reps[0].frame_index", "reps[1]"]
    );
    assert_eq!(diff.to_json()["failures"][1]["expected"], "FLEXED");
}

#[test]
fn catalog_discovers_and_loads() {
    let dir = scratch_dir("catalog");
    let recording = clean_recording(1);
    fs::write(
        dir.join("one_rep.json"),
        serde_json::to_string(&recording).unwrap(),
    )
    .unwrap();
    fs::write(
        dir.join("one_rep.expect.json"),
        r#"{"fixture": "one_rep", "final_counter": 1}"#,
    )
    .unwrap();
    fs::write(dir.join("notes.txt"), "ignored").unwrap();

    let catalog = FixtureCatalog::new(&dir);
    let fixtures = catalog.discover().unwrap();
    assert_eq!(fixtures.len(), 1);
    assert_eq!(fixtures[0].name, "one_rep");
    assert!(fixtures[0].expect_path.is_some());

    let data = catalog.load("one_rep", None).unwrap();
    let expectations = data.expectations.as_ref().unwrap();
    assert_eq!(expectations.tolerance_frames, 2);

    let report = processor().run(&data).unwrap();
    assert!(expectations.verify(&report).is_ok());

    assert!(catalog.load("missing", None).is_err());
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn recording_parses_null_frames_and_commands() {
    let json = r#"{
        "exercise": "knee_flexion",
        "frames": [null, {"RIGHT_HIP": {"x": 0.5, "y": 0.3}}],
        "commands": [{"frame": 1, "command": "show_stats"}]
    }"#;
    let recording: PoseRecording = serde_json::from_str(json).unwrap();
    assert_eq!(recording.fps, 30.0);
    assert!(recording.frames[0].is_none());
    assert_eq!(recording.frames[1].as_ref().unwrap().len(), 1);
    assert_eq!(recording.commands[0].command, SessionCommand::ShowStats);
}

#[test]
fn invalid_fps_is_rejected() {
    let mut recording = clean_recording(1);
    recording.fps = 0.0;
    let data = FixtureData::from_recording("bad", recording);
    assert!(processor().run(&data).is_err());
}
