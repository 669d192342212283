//! Background frame processing.
//!
//! [`FrameWorker`] owns one tracking session on a dedicated thread. Frames
//! are queued over a channel and processed strictly in arrival order, so the
//! caller's thread never blocks on classification. Reports come back on a
//! second channel in the same order.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{error, info};

use crate::error::{PoseError, Result};
use crate::math::vector::Point3D;
use crate::processor::{FrameReport, PoseClassifierProcessor};

enum FrameCommand {
    Process {
        landmarks: Vec<Point3D>,
        timestamp: Duration,
    },
    ResetSession,
    Shutdown,
}

/// Single-session frame processor running on its own thread.
pub struct FrameWorker {
    sender: mpsc::Sender<FrameCommand>,
    reports: mpsc::Receiver<FrameReport>,
    worker: Option<JoinHandle<()>>,
}

impl FrameWorker {
    /// Start a worker thread with a fresh session.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::Io`] if the thread cannot be spawned.
    pub fn spawn(processor: Arc<PoseClassifierProcessor>) -> Result<Self> {
        let (command_tx, command_rx) = mpsc::channel::<FrameCommand>();
        let (report_tx, report_rx) = mpsc::channel::<FrameReport>();

        let worker = thread::Builder::new()
            .name("pose-classifier".into())
            .spawn(move || {
                let mut session = processor.new_session();

                while let Ok(command) = command_rx.recv() {
                    match command {
                        FrameCommand::Process {
                            landmarks,
                            timestamp,
                        } => {
                            let (next, report) =
                                processor.process_frame(session, &landmarks, timestamp);
                            session = next;
                            if report_tx.send(report).is_err() {
                                error!("Frame report receiver dropped");
                                break;
                            }
                        }
                        FrameCommand::ResetSession => {
                            session = processor.new_session();
                        }
                        FrameCommand::Shutdown => break,
                    }
                }

                info!("Pose classifier thread shutting down");
            })?;

        info!("Pose classifier thread started");

        Ok(Self {
            sender: command_tx,
            reports: report_rx,
            worker: Some(worker),
        })
    }

    /// Queue a frame. An empty `landmarks` means no pose was detected.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::WorkerUnavailable`] if the worker has stopped.
    pub fn submit(&self, landmarks: Vec<Point3D>, timestamp: Duration) -> Result<()> {
        self.send(FrameCommand::Process {
            landmarks,
            timestamp,
        })
    }

    /// Discard the session state; later frames start a new session.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::WorkerUnavailable`] if the worker has stopped.
    pub fn reset_session(&self) -> Result<()> {
        self.send(FrameCommand::ResetSession)
    }

    fn send(&self, command: FrameCommand) -> Result<()> {
        self.sender
            .send(command)
            .map_err(|err| PoseError::worker_unavailable(format!("failed to send frame: {err}")))
    }

    /// Block until the next report arrives.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::WorkerUnavailable`] if the worker has stopped.
    pub fn recv(&self) -> Result<FrameReport> {
        self.reports
            .recv()
            .map_err(|_| PoseError::worker_unavailable("worker thread terminated"))
    }

    /// Wait up to `timeout` for the next report.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::WorkerUnavailable`] on timeout or if the worker
    /// has stopped.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<FrameReport> {
        self.reports
            .recv_timeout(timeout)
            .map_err(|err| PoseError::worker_unavailable(err.to_string()))
    }

    /// Next report if one is ready.
    #[must_use]
    pub fn try_recv(&self) -> Option<FrameReport> {
        self.reports.try_recv().ok()
    }

    /// Stop the worker after it drains queued frames and wait for it.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::WorkerUnavailable`] if the thread panicked.
    pub fn shutdown(mut self) -> Result<()> {
        self.stop()
    }

    fn stop(&mut self) -> Result<()> {
        let Some(handle) = self.worker.take() else {
            return Ok(());
        };
        if let Err(err) = self.sender.send(FrameCommand::Shutdown) {
            error!("Failed to send shutdown to pose classifier thread: {err}");
        }
        handle
            .join()
            .map_err(|_| PoseError::worker_unavailable("pose classifier thread panicked"))
    }
}

impl Drop for FrameWorker {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            error!("Failed to join pose classifier thread: {err}");
        }
    }
}
