//! End-to-end tests of the frame pipeline through a workout session

mod test_helpers;

use std::sync::{Arc, Mutex};
use test_helpers::{hidden_frame, plank_frame, pushup_frame, squat_frame};
use workout_pose_engine::config::Config;
use workout_pose_engine::{
    Callbacks, EngineEvent, ExerciseKind, Phase, PostureStatus, SessionStats, Severity, WorkoutSession,
};

/// Feed push-up frames 200 ms apart, collecting every event
fn run_pushups(session: &mut WorkoutSession, start_ms: u64, angles: &[f64]) -> Vec<EngineEvent> {
    angles
        .iter()
        .enumerate()
        .flat_map(|(i, &deg)| session.process_frame(&pushup_frame(start_ms + i as u64 * 200, deg)))
        .collect()
}

#[test]
fn test_single_pushup_counts_once() {
    let mut session = WorkoutSession::new(ExerciseKind::PushUps);
    let events = run_pushups(&mut session, 0, &[170.0, 100.0, 90.0, 95.0, 150.0, 160.0]);

    assert_eq!(
        events,
        vec![
            EngineEvent::PostureChanged { correct: true },
            EngineEvent::RepCountChanged { count: 1 },
        ]
    );
    assert_eq!(session.phase(), Phase::Up);
    assert_eq!(
        session.stats(),
        SessionStats {
            count: 1,
            time_sec: 0,
            posture_correct: true
        }
    );
}

#[test]
fn test_hovering_in_the_band_does_not_count() {
    let mut session = WorkoutSession::new(ExerciseKind::PushUps);
    run_pushups(&mut session, 0, &[170.0, 120.0, 130.0, 110.0, 140.0, 120.0]);
    assert_eq!(session.stats().count, 0);
    assert_eq!(session.phase(), Phase::Up);
}

#[test]
fn test_several_reps() {
    let mut session = WorkoutSession::new(ExerciseKind::PushUps);
    let cycle = [170.0, 90.0, 90.0, 170.0];
    let angles: Vec<f64> = cycle.iter().copied().cycle().take(cycle.len() * 3).collect();
    let events = run_pushups(&mut session, 0, &angles);

    let counts: Vec<u32> = events
        .iter()
        .filter_map(|event| match event {
            EngineEvent::RepCountChanged { count } => Some(*count),
            _ => None,
        })
        .collect();
    assert_eq!(counts, vec![1, 2, 3]);
}

#[test]
fn test_too_fast_rep_is_ignored() {
    let mut session = WorkoutSession::new(ExerciseKind::PushUps);
    session.process_frame(&pushup_frame(0, 170.0));
    session.process_frame(&pushup_frame(100, 90.0));
    // Back up 50 ms after reaching the bottom
    session.process_frame(&pushup_frame(150, 170.0));
    assert_eq!(session.stats().count, 0);
    assert_eq!(session.phase(), Phase::Down);

    session.process_frame(&pushup_frame(500, 170.0));
    assert_eq!(session.stats().count, 1);
}

#[test]
fn test_duplicate_and_stale_frames_are_dropped() {
    let mut session = WorkoutSession::new(ExerciseKind::PushUps);
    session.process_frame(&pushup_frame(1000, 170.0));
    assert!(!session.process_frame(&pushup_frame(1200, 170.0)).is_empty());

    // Same timestamp again, then an older one
    assert!(session.process_frame(&pushup_frame(1200, 90.0)).is_empty());
    assert!(session.process_frame(&pushup_frame(800, 90.0)).is_empty());
    assert_eq!(session.phase(), Phase::Up);
}

#[test]
fn test_hidden_frames_change_nothing() {
    let mut session = WorkoutSession::new(ExerciseKind::PushUps);
    run_pushups(&mut session, 0, &[170.0, 90.0]);
    for i in 0..10 {
        assert!(session.process_frame(&hidden_frame(1000 + i * 100)).is_empty());
    }
    assert_eq!(session.phase(), Phase::Down);
    assert_eq!(session.posture_status(), PostureStatus::Correct);

    // Tracking resumes mid-rep
    session.process_frame(&pushup_frame(3000, 170.0));
    assert_eq!(session.stats().count, 1);
}

#[test]
fn test_switching_exercise_resets_everything() {
    let mut session = WorkoutSession::new(ExerciseKind::Squats);
    session.set_exercise_mode("pushups").unwrap();
    run_pushups(&mut session, 0, &[170.0, 90.0, 90.0, 170.0]);
    assert_eq!(session.stats().count, 1);

    session.set_exercise_mode("plank").unwrap();
    assert_eq!(session.exercise(), ExerciseKind::Plank);
    assert_eq!(
        session.stats(),
        SessionStats {
            count: 0,
            time_sec: 0,
            posture_correct: false
        }
    );
    assert_eq!(session.phase(), Phase::Unknown);
    assert_eq!(session.posture_status(), PostureStatus::Unknown);
}

fn assert_fresh(session: &WorkoutSession) {
    assert_eq!(
        session.stats(),
        SessionStats {
            count: 0,
            time_sec: 0,
            posture_correct: false
        }
    );
    assert_eq!(session.held_secs(), 0.0);
    assert_eq!(session.phase(), Phase::Unknown);
    assert_eq!(session.posture_status(), PostureStatus::Unknown);
}

/// Hold an aligned plank from `start_ms` for 1.5 s of credited time
fn hold_plank(session: &mut WorkoutSession, start_ms: u64) {
    for i in 0..=15 {
        session.process_frame(&plank_frame(start_ms + i * 100, 0.5));
    }
    assert_eq!(session.posture_status(), PostureStatus::Correct);
    assert!((session.held_secs() - 1.5).abs() < 1e-6);
    assert_eq!(session.stats().time_sec, 2);
}

#[test]
fn test_squat_progress_cleared_on_switch_to_plank() {
    let mut session = WorkoutSession::new(ExerciseKind::Squats);
    for (t, deep) in [(0, false), (200, true), (400, true), (800, false), (1000, false)] {
        session.process_frame(&squat_frame(t, deep));
    }
    assert_eq!(session.stats().count, 1);
    assert_eq!(session.phase(), Phase::Up);
    assert_eq!(session.posture_status(), PostureStatus::Correct);

    session.set_exercise_mode("plank").unwrap();
    assert_eq!(session.exercise(), ExerciseKind::Plank);
    assert_fresh(&session);

    // The plank timer starts from zero on the new exercise
    session.process_frame(&plank_frame(1200, 0.5));
    assert_eq!(session.held_secs(), 0.0);
}

#[test]
fn test_plank_hold_cleared_on_switch() {
    let mut session = WorkoutSession::new(ExerciseKind::Plank);
    hold_plank(&mut session, 0);

    session.set_exercise_mode("squats").unwrap();
    assert_eq!(session.exercise(), ExerciseKind::Squats);
    assert_fresh(&session);
}

#[test]
fn test_plank_hold_cleared_on_reset() {
    let mut session = WorkoutSession::new(ExerciseKind::Plank);
    hold_plank(&mut session, 0);

    session.reset_counter();
    assert_eq!(session.exercise(), ExerciseKind::Plank);
    assert_fresh(&session);

    // No time is carried over from before the reset
    hold_plank(&mut session, 5000);
}

#[test]
fn test_reset_counter_emits_fresh_events() {
    let mut session = WorkoutSession::new(ExerciseKind::PushUps);
    run_pushups(&mut session, 0, &[170.0, 90.0, 90.0, 170.0]);
    assert_eq!(session.stats().count, 1);
    session.reset_counter();
    assert_eq!(session.stats().count, 0);

    // After a reset the same values are reported again
    let events = run_pushups(&mut session, 2000, &[170.0, 90.0, 90.0, 170.0]);
    assert!(events.contains(&EngineEvent::PostureChanged { correct: true }));
    assert!(events.contains(&EngineEvent::RepCountChanged { count: 1 }));
}

#[test]
fn test_callbacks_follow_event_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let (reps, posture) = (Arc::clone(&log), Arc::clone(&log));

    let mut session = WorkoutSession::new(ExerciseKind::PushUps);
    session.subscribe(Box::new(
        Callbacks::new()
            .on_rep_count(move |count| reps.lock().unwrap().push(format!("rep {count}")))
            .on_posture_change(move |correct, frame| {
                posture
                    .lock()
                    .unwrap()
                    .push(format!("posture {correct} @{}", frame.timestamp_ms));
            }),
    ));
    run_pushups(&mut session, 0, &[170.0, 100.0, 90.0, 95.0, 150.0, 160.0]);

    assert_eq!(*log.lock().unwrap(), vec!["posture true @200", "rep 1"]);
}

#[test]
fn test_plank_timer_runs_only_while_correct() {
    let mut session = WorkoutSession::new(ExerciseKind::Plank);
    let mut events = Vec::new();

    // Aligned for a second; correct from the second frame on
    for i in 0..=10 {
        events.extend(session.process_frame(&plank_frame(i * 100, 0.5)));
    }
    assert!((session.held_secs() - 1.0).abs() < 1e-6);
    assert_eq!(session.stats().time_sec, 1);

    // Sagging: the first two bad frames still count as correct
    for i in 11..=30 {
        events.extend(session.process_frame(&plank_frame(i * 100, 0.58)));
    }
    assert_eq!(session.posture_status(), PostureStatus::Incorrect);
    assert!((session.held_secs() - 1.2).abs() < 1e-6);

    let feedback: Vec<&EngineEvent> = events
        .iter()
        .filter(|event| matches!(event, EngineEvent::Feedback(_)))
        .collect();
    assert_eq!(feedback.len(), 1);
    if let EngineEvent::Feedback(fb) = feedback[0] {
        assert_eq!(fb.severity, Severity::Danger);
    }
    assert!(events.contains(&EngineEvent::PostureChanged { correct: false }));
    assert!(events.contains(&EngineEvent::TimeUpdated { seconds: 1 }));
    assert_eq!(session.stats().count, 0);
}

#[test]
fn test_plank_timer_caps_tracking_gaps() {
    let mut session = WorkoutSession::new(ExerciseKind::Plank);
    session.process_frame(&plank_frame(0, 0.5));
    session.process_frame(&plank_frame(100, 0.5));
    // Ten seconds without a frame
    session.process_frame(&plank_frame(10_100, 0.5));
    assert!((session.held_secs() - 1.1).abs() < 1e-6);
}

#[test]
fn test_feedback_can_be_disabled() {
    let mut config = Config::default();
    config.session.feedback_enabled = false;
    let mut session = WorkoutSession::with_config(ExerciseKind::Plank, &config).unwrap();

    let events: Vec<EngineEvent> = (0..10)
        .flat_map(|i| session.process_frame(&plank_frame(i * 100, 0.58)))
        .collect();
    assert_eq!(events, vec![EngineEvent::PostureChanged { correct: false }]);
}

#[test]
fn test_smoothing_filter_absorbs_single_frame_dip() {
    let mut config = Config::default();
    config.smoothing.filter = "median:3".to_string();
    let mut session = WorkoutSession::with_config(ExerciseKind::PushUps, &config).unwrap();

    run_pushups(&mut session, 0, &[170.0, 170.0, 80.0, 170.0, 170.0, 170.0]);
    assert_eq!(session.stats().count, 0);
}
