//! Frame processing on the background worker thread.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{build_store, exercise_labels, generate_pose, init_logging, Pose};
use pose_classification::{FrameReport, FrameWorker, PoseClassifierProcessor, ProcessorConfig};

const TIMEOUT: Duration = Duration::from_secs(10);

fn processor() -> Arc<PoseClassifierProcessor> {
    Arc::new(PoseClassifierProcessor::new(build_store(12), ProcessorConfig::default()).unwrap())
}

fn frames(labels: &[&str]) -> Vec<(Vec<pose_classification::math::Point3D>, Duration)> {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            (
                generate_pose(Pose::from_label(label), 0),
                Duration::from_millis(i as u64 * 33),
            )
        })
        .collect()
}

#[test]
fn test_worker_matches_inline_processing() {
    init_logging();
    let processor = processor();
    let frames = frames(&exercise_labels(1, 12));

    let mut session = processor.new_session();
    let mut expected: Vec<FrameReport> = Vec::new();
    for (landmarks, timestamp) in &frames {
        let (next, report) = processor.process_frame(session, landmarks, *timestamp);
        session = next;
        expected.push(report);
    }

    let worker = FrameWorker::spawn(Arc::clone(&processor)).unwrap();
    for (landmarks, timestamp) in frames {
        worker.submit(landmarks, timestamp).unwrap();
    }
    let received: Vec<FrameReport> = (0..expected.len())
        .map(|_| worker.recv_timeout(TIMEOUT).unwrap())
        .collect();
    worker.shutdown().unwrap();

    assert_eq!(received, expected);
    let last = received.last().unwrap();
    assert_eq!(last.phase.as_ref().unwrap().rep_count, 1);
}

#[test]
fn test_reset_session_starts_over() {
    let worker = FrameWorker::spawn(processor()).unwrap();

    for (landmarks, timestamp) in frames(&exercise_labels(1, 12)) {
        worker.submit(landmarks, timestamp).unwrap();
    }
    worker.reset_session().unwrap();
    worker
        .submit(generate_pose(Pose::Standing, 0), Duration::from_secs(60))
        .unwrap();

    let reports: Vec<FrameReport> = (0..61)
        .map(|_| worker.recv_timeout(TIMEOUT).unwrap())
        .collect();

    assert_eq!(reports[59].phase.as_ref().unwrap().rep_count, 1);
    let fresh = &reports[60];
    assert_eq!(fresh.phase.as_ref().unwrap().rep_count, 0);
    assert!(fresh.rep_message.is_none());
}

#[test]
fn test_no_pose_frames_flow_through() {
    let worker = FrameWorker::spawn(processor()).unwrap();
    worker.submit(Vec::new(), Duration::ZERO).unwrap();
    let report = worker.recv_timeout(TIMEOUT).unwrap();
    assert!(report.best_class.is_none());
    assert!(report.lines().is_empty());
}
