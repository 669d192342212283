//! End-to-end tests: sample loading, classification, smoothing and counting.

mod common;

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use approx::assert_relative_eq;
use common::{build_store, exercise_labels, generate_pose, init_logging, to_csv_line, Pose};
use pose_classification::{
    mirror_x, ClassifierConfig, ExercisePhase, FrameReport, PoseClassifier,
    PoseClassifierProcessor, PoseSample, PoseSampleStore, ProcessorConfig, SessionState,
};

const FRAME_MS: u64 = 33;

fn run_frames(
    processor: &PoseClassifierProcessor,
    mut session: SessionState,
    labels: &[&str],
) -> (SessionState, Vec<FrameReport>) {
    let mut reports = Vec::with_capacity(labels.len());
    for (i, label) in labels.iter().enumerate() {
        let landmarks = generate_pose(Pose::from_label(label), 0);
        let timestamp = Duration::from_millis(i as u64 * FRAME_MS);
        let (next, report) = processor.process_frame(session, &landmarks, timestamp);
        session = next;
        reports.push(report);
    }
    (session, reports)
}

// =============================================================================
// CLASSIFICATION
// =============================================================================

#[test]
fn test_one_sample_per_label_picks_up() {
    init_logging();

    let samples = Pose::ALL
        .iter()
        .map(|&kind| PoseSample::new(kind.label(), kind.label(), &generate_pose(kind, 0)).unwrap())
        .collect();
    let store = Arc::new(PoseSampleStore::from_samples(samples).unwrap());
    let classifier = PoseClassifier::new(Arc::clone(&store));

    // Every sample votes once; the nearest one decides the tie.
    for kind in Pose::ALL {
        let result = classifier.classify(&generate_pose(kind, 0));
        assert_eq!(result.len(), 4);
        assert_eq!(result.max_confidence_class(), Some(kind.label()), "{kind:?}");
        assert_relative_eq!(result.class_confidence(kind.label()), 1.0);
    }

    let config = ClassifierConfig::default().with_top_k(30, 1);
    let nearest_only = PoseClassifier::with_config(store, config).unwrap();
    let result = nearest_only.classify(&generate_pose(Pose::ArmsUp, 0));
    assert_eq!(result.len(), 1);
    assert_eq!(result.max_confidence_class(), Some("up"));
}

#[test]
fn test_each_pose_classified_with_full_confidence() {
    init_logging();
    let classifier = PoseClassifier::new(build_store(12));

    for kind in Pose::ALL {
        let result = classifier.classify(&generate_pose(kind, 0));
        assert_eq!(result.max_confidence_class(), Some(kind.label()), "{kind:?}");
        assert_relative_eq!(result.class_confidence(kind.label()), 10.0);
    }
}

#[test]
fn test_mirror_invariance() {
    let classifier = PoseClassifier::new(build_store(12));

    for kind in Pose::ALL {
        let pose = generate_pose(kind, 20);
        assert_eq!(classifier.classify(&pose), classifier.classify(&mirror_x(&pose)));
    }
}

#[test]
fn test_empty_and_invalid_queries() {
    init_logging();
    let classifier = PoseClassifier::new(build_store(3));

    assert!(classifier.classify(&[]).is_empty());

    let mut truncated = generate_pose(Pose::Standing, 0);
    truncated.truncate(20);
    assert!(classifier.classify(&truncated).is_empty());

    let mut nan = generate_pose(Pose::Standing, 0);
    nan[5].x = f32::NAN;
    assert!(classifier.classify(&nan).is_empty());
}

#[test]
fn test_confidences_bounded_by_range() {
    let store = build_store(4);
    let config = ClassifierConfig::default().with_top_k(8, 6);
    let classifier = PoseClassifier::with_config(store, config).unwrap();
    assert_eq!(classifier.confidence_range(), 6);

    for kind in Pose::ALL {
        let result = classifier.classify(&generate_pose(kind, 30));
        let total: f32 = result.iter().map(|(_, c)| c).sum();
        assert_relative_eq!(total, 6.0);
        assert!(result.iter().all(|(_, c)| c.fract() == 0.0 && c <= 6.0));
    }
}

// =============================================================================
// SAMPLE FILES
// =============================================================================

#[test]
fn test_malformed_lines_are_skipped() {
    init_logging();

    let good_up = to_csv_line("up_1", "up", &generate_pose(Pose::ArmsUp, 1), ',');
    let good_down = to_csv_line("down_1", "down", &generate_pose(Pose::Standing, 1), ',');

    let mut too_long = good_up.clone();
    too_long.push_str(",0.5");
    let too_short = good_up.rsplitn(2, ',').nth(1).unwrap().to_string();
    let unparsable = good_down.replacen(",down,", ",down,abc,", 1);
    let unparsable = unparsable.rsplitn(2, ',').nth(1).unwrap().to_string();

    let text = [good_up, too_long, too_short, unparsable, good_down].join("\n");
    let store = PoseSampleStore::from_csv_str(&text).unwrap();

    assert_eq!(store.len(), 2);
    assert_eq!(store.class_names(), vec!["up", "down"]);
}

#[test]
fn test_load_from_file_and_custom_separator() {
    let lines: Vec<String> = Pose::ALL
        .iter()
        .map(|&kind| to_csv_line(kind.label(), kind.label(), &generate_pose(kind, 2), ','))
        .collect();

    let path = std::env::temp_dir().join(format!("pose_samples_{}.csv", std::process::id()));
    {
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "{}", lines.join("\n")).unwrap();
    }
    let store = PoseSampleStore::from_path(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(store.len(), 4);

    let semicolons = lines.join("\n").replace(',', ";");
    let store = PoseSampleStore::from_reader(semicolons.as_bytes(), ';').unwrap();
    assert_eq!(store.len(), 4);
    assert_eq!(store.samples()[2].class_name(), "t3");
}

// =============================================================================
// STREAM PROCESSING
// =============================================================================

#[test]
fn test_exercise_cycles_counted() {
    init_logging();
    let processor = PoseClassifierProcessor::new(build_store(12), ProcessorConfig::default()).unwrap();

    let labels = exercise_labels(2, 12);
    let (session, reports) = run_frames(&processor, processor.new_session(), &labels);

    // Phase machine: one repetition per full cycle, three timed phases each.
    let phase = session.phase();
    assert_eq!(phase.phase(), ExercisePhase::Down);
    assert_eq!(phase.rep_count(), 2);
    assert_eq!(phase.durations().len(), 6);
    for d in phase.durations() {
        assert_relative_eq!(*d, 12.0 * FRAME_MS as f64 / 1000.0, epsilon = 1e-9);
    }
    assert!(phase.quality() > 0.4 && phase.quality() < 0.7);

    // Hysteresis counters: every class left twice.
    for counter in session.rep_counters() {
        assert_eq!(counter.num_repeats(), 2, "{}", counter.class_name());
    }
    assert_eq!(session.last_rep_message(), Some("t2 : 2 reps"));

    let last = reports.last().unwrap();
    let lines = last.lines();
    assert_eq!(lines[0], "t2 : 2 reps");
    assert_eq!(lines[1], "down : 1.00 confidence");
    assert_eq!(lines[2], "phase reps : 2");
    assert!(lines[3].starts_with("quality : "));
    assert_eq!(lines.len(), 4 + 6);
    assert_eq!(lines[9], "phase 6 duration: 0.40 s");
}

#[test]
fn test_abandoned_cycle_not_counted() {
    let processor = PoseClassifierProcessor::new(build_store(12), ProcessorConfig::default()).unwrap();

    let mut labels = vec!["down"; 12];
    for label in ["up", "t3", "down"] {
        labels.extend(std::iter::repeat(label).take(12));
    }
    let (session, _) = run_frames(&processor, processor.new_session(), &labels);

    assert_eq!(session.phase().rep_count(), 0);
    assert!(session.phase().durations().is_empty());
}

#[test]
fn test_gap_resets_smoothing() {
    let processor = PoseClassifierProcessor::new(build_store(12), ProcessorConfig::default()).unwrap();
    let (session, _) = run_frames(&processor, processor.new_session(), &["up"; 10]);

    // 500 ms later the window starts over, so a single frame decides.
    let (_, report) = processor.process_frame(
        session,
        &generate_pose(Pose::Squat, 0),
        Duration::from_millis(10 * FRAME_MS + 500),
    );
    let best = report.best_class.unwrap();
    assert_eq!(best.class_name, "t2");
    assert_relative_eq!(best.confidence, 1.0);
    assert_eq!(report.classification.len(), 1);
}

#[test]
fn test_no_pose_frames_keep_last_message() {
    let processor = PoseClassifierProcessor::new(build_store(12), ProcessorConfig::default()).unwrap();
    let labels = exercise_labels(1, 12);
    let (session, _) = run_frames(&processor, processor.new_session(), &labels);

    // The next frame on schedule has no pose: still smoothed, no class line.
    let next = Duration::from_millis(labels.len() as u64 * FRAME_MS);
    let (session, report) = processor.process_frame(session, &[], next);
    assert_eq!(report.lines(), vec!["t2 : 1 reps"]);
    assert!(!report.classification.is_empty());
    assert_eq!(session.phase().rep_count(), 1);
}

#[test]
fn test_single_image_mode_reports_best_class_only() {
    let processor =
        PoseClassifierProcessor::new(build_store(12), ProcessorConfig::single_image()).unwrap();
    let (_, reports) = run_frames(&processor, processor.new_session(), &["t3", "up"]);

    assert_eq!(reports[0].lines(), vec!["t3 : 1.00 confidence"]);
    assert_eq!(reports[1].lines(), vec!["up : 1.00 confidence"]);
}

#[cfg(feature = "serde")]
#[test]
fn test_serde_round_trip() {
    let config = ProcessorConfig::default().with_rep_classes(["up"]);
    let json = serde_json::to_string(&config).unwrap();
    let parsed: ProcessorConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);

    let processor = PoseClassifierProcessor::new(build_store(12), ProcessorConfig::default()).unwrap();
    let (_, reports) = run_frames(&processor, processor.new_session(), &exercise_labels(1, 12));
    let report = reports.last().unwrap();

    let json = serde_json::to_string(report).unwrap();
    let parsed: FrameReport = serde_json::from_str(&json).unwrap();
    assert_eq!(&parsed, report);
}
