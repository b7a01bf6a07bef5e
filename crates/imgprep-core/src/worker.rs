//! Runs the non-interactive pipeline off the host thread.

use std::sync::mpsc;
use std::thread::JoinHandle;

use tracing::{debug, warn};

use crate::compress::CancelToken;
use crate::error::{PrepError, Result};
use crate::file::ImageFile;
use crate::pipeline::{process_with, ProcessedImage};
use crate::widget::WidgetConfig;

/// Messages sent from the worker thread back to the host.
#[derive(Debug)]
pub enum JobEvent {
    Attempt { attempt: u32, quality: f32, bytes: u64 },
    Finished(Result<ProcessedImage>),
}

/// Handle to one background processing run.
pub struct ProcessingJob {
    rx: mpsc::Receiver<JobEvent>,
    cancel: CancelToken,
    handle: Option<JoinHandle<()>>,
    finished: bool,
}

/// Start processing `file` on a named worker thread.
pub fn spawn_process(file: ImageFile, config: WidgetConfig) -> Result<ProcessingJob> {
    let (tx, rx) = mpsc::channel();
    let cancel = CancelToken::new();
    let token = cancel.clone();

    let handle = std::thread::Builder::new()
        .name("imgprep-worker".into())
        .spawn(move || {
            let reporter = |attempt: u32, quality: f32, bytes: u64| {
                let _ = tx.send(JobEvent::Attempt {
                    attempt,
                    quality,
                    bytes,
                });
            };
            let outcome = process_with(file, &config, &reporter, &token);
            let _ = tx.send(JobEvent::Finished(outcome));
        })?;

    debug!("Worker spawned");
    Ok(ProcessingJob {
        rx,
        cancel,
        handle: Some(handle),
        finished: false,
    })
}

impl ProcessingJob {
    /// Ask the worker to stop at its next attempt boundary.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Next pending event without blocking.
    pub fn try_next(&mut self) -> Option<JobEvent> {
        if self.finished {
            return None;
        }
        match self.rx.try_recv() {
            Ok(event) => Some(self.track(event)),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => Some(self.lost()),
        }
    }

    /// Block until the next event arrives.
    pub fn next_blocking(&mut self) -> Option<JobEvent> {
        if self.finished {
            return None;
        }
        match self.rx.recv() {
            Ok(event) => Some(self.track(event)),
            Err(_) => Some(self.lost()),
        }
    }

    /// Block until the job finishes, discarding attempt events.
    pub fn wait(mut self) -> Result<ProcessedImage> {
        while let Some(event) = self.next_blocking() {
            if let JobEvent::Finished(outcome) = event {
                return outcome;
            }
        }
        Err(PrepError::InvalidState("job already finished".into()))
    }

    fn track(&mut self, event: JobEvent) -> JobEvent {
        if matches!(event, JobEvent::Finished(_)) {
            self.finished = true;
            self.join();
        }
        event
    }

    fn lost(&mut self) -> JobEvent {
        warn!("Worker exited without a result");
        self.finished = true;
        self.join();
        JobEvent::Finished(Err(PrepError::InvalidState(
            "worker exited without a result".into(),
        )))
    }

    fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Worker thread panicked");
            }
        }
    }
}
