use tracing::{debug, info, warn};

use crate::compress::{compress_with, AttemptReporter, CancelToken};
use crate::cropper::{Cropper, SourceImage};
use crate::error::{PrepError, Result};
use crate::file::ImageFile;
use crate::pipeline::{auto_crop, validate_file, ProcessedImage};
use crate::worker::{spawn_process, JobEvent, ProcessingJob};

use super::config::WidgetConfig;
use super::input::BoundInput;
use super::observer::{NoOpObserver, WidgetObserver};
use super::state::SessionState;

/// What a user selection led to.
#[derive(Debug)]
pub enum Selection {
    /// The cropper is open and waits for pointer input and confirmation.
    Editing,
    /// The auto path finished and the result was committed.
    Processed(ProcessedImage),
    /// The file is the widget's own committed output; nothing was done.
    AlreadyProcessed,
}

/// Forwards compression attempts to the widget observer.
struct ObserverReporter<'a>(&'a dyn WidgetObserver);

impl AttemptReporter for ObserverReporter<'_> {
    fn on_attempt(&self, attempt: u32, quality: f32, bytes: u64) {
        self.0.on_attempt(attempt, quality, bytes);
    }
}

/// One bound input and the session that feeds it.
///
/// User selections enter through [`on_user_select`](Self::on_user_select) or
/// [`submit`](Self::submit). Results leave only through
/// [`commit_result`](Self::commit_result), so writing the output back never
/// looks like a new selection.
pub struct ImageWidget {
    config: WidgetConfig,
    state: SessionState,
    input: BoundInput,
    cropper: Cropper,
    cancel: CancelToken,
    job: Option<ProcessingJob>,
    last_error: Option<String>,
    observer: Box<dyn WidgetObserver>,
}

impl ImageWidget {
    pub fn new(field_name: impl Into<String>, config: WidgetConfig) -> Result<Self> {
        config.validate()?;
        let cropper = Cropper::new(config.crop.clone())?;
        Ok(Self {
            config,
            state: SessionState::Idle,
            input: BoundInput::new(field_name),
            cropper,
            cancel: CancelToken::new(),
            job: None,
            last_error: None,
            observer: Box::new(NoOpObserver),
        })
    }

    pub fn with_observer(mut self, observer: impl WidgetObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn input(&self) -> &BoundInput {
        &self.input
    }

    /// Message of the most recent failure, cleared by the next selection.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn cropper(&self) -> &Cropper {
        &self.cropper
    }

    /// Pointer events go straight to the cropper while editing.
    pub fn cropper_mut(&mut self) -> &mut Cropper {
        &mut self.cropper
    }

    /// Token for the current session. Cancelling it stops compression at the
    /// next attempt boundary.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_busy() || self.job.is_some()
    }

    /// Handle a file the user picked or dropped.
    ///
    /// Validation happens first. Interactive widgets then open the cropper;
    /// the rest run the auto-crop path to completion and commit the result.
    pub fn on_user_select(&mut self, file: ImageFile) -> Result<Selection> {
        self.begin(&file)?;
        if self.is_own_output(&file) {
            debug!(name = %file.name, "Selection is the committed output, skipping");
            return Ok(Selection::AlreadyProcessed);
        }
        self.start_session();

        self.transition(SessionState::Validating);
        if let Err(e) = validate_file(&file, &self.config.allowed_types, self.config.max_source_bytes) {
            return Err(self.fail(e));
        }

        if self.config.interactive {
            if let Err(e) = self.cropper.open(file) {
                return Err(self.fail(e));
            }
            self.transition(SessionState::Editing);
            return Ok(Selection::Editing);
        }

        self.transition(SessionState::AutoProcessing);
        match self.run_auto(file) {
            Ok(processed) => {
                self.commit_result(processed.clone());
                Ok(Selection::Processed(processed))
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Like [`on_user_select`](Self::on_user_select) on the auto path, but
    /// processing runs on a worker thread. Drive it with
    /// [`poll`](Self::poll) or [`wait`](Self::wait).
    ///
    /// Only non-interactive widgets can submit; interactive ones get
    /// `InvalidState` and must go through the cropper. Returns `false` when
    /// `file` is the committed output and no job was started.
    pub fn submit(&mut self, file: ImageFile) -> Result<bool> {
        self.begin(&file)?;
        if self.config.interactive {
            let e = PrepError::InvalidState(
                "interactive widgets cannot process in the background".into(),
            );
            self.observer.on_error(&e);
            return Err(e);
        }
        if self.is_own_output(&file) {
            debug!(name = %file.name, "Submission is the committed output, skipping");
            return Ok(false);
        }
        self.start_session();

        self.transition(SessionState::Validating);
        if let Err(e) = validate_file(&file, &self.config.allowed_types, self.config.max_source_bytes) {
            return Err(self.fail(e));
        }

        self.transition(SessionState::AutoProcessing);
        match spawn_process(file, self.config.clone()) {
            Ok(job) => {
                self.cancel = job.cancel_token();
                self.job = Some(job);
                Ok(true)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Drain pending worker events. Returns the outcome once the job ends.
    pub fn poll(&mut self) -> Option<Result<ProcessedImage>> {
        loop {
            let event = self.job.as_mut()?.try_next()?;
            if let Some(outcome) = self.handle_event(event) {
                return Some(outcome);
            }
        }
    }

    /// Block until the background job ends.
    pub fn wait(&mut self) -> Option<Result<ProcessedImage>> {
        loop {
            let event = self.job.as_mut()?.next_blocking()?;
            if let Some(outcome) = self.handle_event(event) {
                return Some(outcome);
            }
        }
    }

    /// Compress the current crop and commit it.
    pub fn confirm_crop(&mut self) -> Result<ProcessedImage> {
        if self.state != SessionState::Editing {
            return Err(PrepError::InvalidState(format!(
                "cannot confirm a crop while {}",
                self.state
            )));
        }

        self.transition(SessionState::Compressing);
        let reporter = ObserverReporter(self.observer.as_ref());
        let outcome = self
            .cropper
            .confirm(&self.config.compression, &reporter, &self.cancel);
        self.cropper.close();

        match outcome {
            Ok(result) => {
                let processed = ProcessedImage::from(result);
                self.commit_result(processed.clone());
                Ok(processed)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Dismiss the cropper. The bound input is left as it was.
    pub fn cancel_crop(&mut self) -> bool {
        if self.state != SessionState::Editing {
            return false;
        }
        self.cropper.cancel();
        self.cropper.close();
        self.transition(SessionState::Idle);
        self.observer.on_cancel();
        true
    }

    /// Write `processed` into the bound input.
    ///
    /// This is the only path that mutates the input. Selections that match the
    /// committed file afterwards are recognised and skipped.
    pub fn commit_result(&mut self, processed: ProcessedImage) {
        if let Some(job) = self.job.take() {
            job.cancel();
        }
        if !self.state.can_transition_to(SessionState::Done) {
            self.cropper.close();
            self.transition(SessionState::Idle);
        }
        info!(
            field = self.input.field_name(),
            name = %processed.file.name,
            stats = %processed.stats,
            "Committed"
        );
        self.input.replace(processed);
        self.transition(SessionState::Done);
        if let Some(current) = self.input.current() {
            self.observer.on_success(current);
        }
    }

    /// Abort whatever is running and return to `Idle`. The bound input keeps
    /// its last committed file.
    pub fn reset(&mut self) {
        let active = self.state != SessionState::Idle || self.job.is_some();
        self.cancel.cancel();
        if let Some(job) = self.job.take() {
            job.cancel();
        }
        self.cropper.close();
        self.last_error = None;
        self.transition(SessionState::Idle);
        if active {
            self.observer.on_cancel();
        }
    }

    fn begin(&mut self, file: &ImageFile) -> Result<()> {
        if self.is_busy() {
            warn!(name = %file.name, state = %self.state, "Selection rejected, session busy");
            let e = PrepError::SessionBusy;
            self.observer.on_error(&e);
            return Err(e);
        }
        Ok(())
    }

    fn start_session(&mut self) {
        if self.state == SessionState::Editing {
            self.cropper.cancel();
            self.observer.on_cancel();
        }
        self.cropper.close();
        if self.state != SessionState::Idle {
            self.transition(SessionState::Idle);
        }
        self.cancel = CancelToken::new();
        self.last_error = None;
    }

    fn is_own_output(&self, file: &ImageFile) -> bool {
        self.input
            .current()
            .is_some_and(|p| p.file.name == file.name && p.file.bytes == file.bytes)
    }

    fn run_auto(&mut self, file: ImageFile) -> Result<ProcessedImage> {
        let source = SourceImage::decode(file)?;
        let rendered = auto_crop(&source, &self.config.crop)?;
        if self.cancel.is_cancelled() {
            return Err(PrepError::Cancelled);
        }

        self.transition(SessionState::Compressing);
        let reporter = ObserverReporter(self.observer.as_ref());
        let result = compress_with(
            &rendered,
            &source.file,
            &self.config.compression,
            &reporter,
            &self.cancel,
        )?;
        Ok(result.into())
    }

    fn handle_event(&mut self, event: JobEvent) -> Option<Result<ProcessedImage>> {
        match event {
            JobEvent::Attempt {
                attempt,
                quality,
                bytes,
            } => {
                if self.state == SessionState::AutoProcessing {
                    self.transition(SessionState::Compressing);
                }
                self.observer.on_attempt(attempt, quality, bytes);
                None
            }
            JobEvent::Finished(outcome) => {
                self.job = None;
                Some(match outcome {
                    Ok(processed) => {
                        self.commit_result(processed.clone());
                        Ok(processed)
                    }
                    Err(e) => Err(self.fail(e)),
                })
            }
        }
    }

    /// Record a failure and report it. Cancellation returns to `Idle`.
    fn fail(&mut self, error: PrepError) -> PrepError {
        self.cropper.close();
        if matches!(error, PrepError::Cancelled) {
            info!(field = self.input.field_name(), "Session cancelled");
            self.transition(SessionState::Idle);
            self.observer.on_cancel();
        } else {
            warn!(field = self.input.field_name(), error = %error, "Session failed");
            self.last_error = Some(error.to_string());
            self.transition(SessionState::Errored);
            self.observer.on_error(&error);
        }
        error
    }

    fn transition(&mut self, next: SessionState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        if self.state != next {
            debug!(from = %self.state, to = %next, "Session state");
            self.observer.on_state_change(self.state, next);
            self.state = next;
        }
    }
}
