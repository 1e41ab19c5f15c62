use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};

use tracing::{debug, error, info, trace, warn};

use super::models::{DraftLimits, DraftSeed, RenderDraft, SubmissionState};
use super::reducer::{DraftAction, reduce};
use crate::core::clamp::FieldInput;
use crate::core::params::JobRequest;
use crate::error::{Error, Result};
use crate::io::{CompositionDirectory, FileExistence, RenderJobClient};
use crate::types::{Codec, ImageFormat, RenderMode};

pub const OVERWRITE_WARNING: &str = "Will be overwritten";

/// Callbacks into whatever hosts the composer.
pub trait ComposerHost {
    /// A submission started; hosts usually reveal the render queue here.
    fn select_renders_panel(&self) {}
    /// The job was accepted and the composer should be dismissed.
    fn close_composer(&self);
}

/// Cleared when the composer is torn down; results arriving afterwards are dropped.
#[derive(Clone, Debug)]
pub struct CancellationToken {
    live: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self {
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn cancel(&self) {
        self.live.store(false, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        !self.live.load(Ordering::SeqCst)
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
enum SubmissionOutcome {
    Succeeded,
    Failed(String),
}

/// Collaborators shared with the composer.
#[derive(Clone)]
pub struct ComposerDeps {
    pub client: Arc<dyn RenderJobClient>,
    pub compositions: Arc<dyn CompositionDirectory>,
    pub files: Arc<dyn FileExistence>,
}

/// Interactive job composer: owns one draft and submits it at most once at a time.
///
/// Submissions run on a background thread; the host calls [`JobComposer::poll`]
/// from its event loop (or [`JobComposer::wait`]) to apply the outcome.
pub struct JobComposer {
    composition_id: String,
    draft: RenderDraft,
    limits: DraftLimits,
    deps: ComposerDeps,
    host: Box<dyn ComposerHost>,
    completion_receiver: Option<Receiver<SubmissionOutcome>>,
    token: CancellationToken,
}

impl JobComposer {
    pub fn open(seed: DraftSeed, deps: ComposerDeps, host: Box<dyn ComposerHost>) -> Result<Self> {
        let duration = deps
            .compositions
            .duration_in_frames(&seed.composition_id)
            .ok_or_else(|| Error::UnknownComposition {
                id: seed.composition_id.clone(),
            })?;
        let limits = DraftLimits {
            duration_in_frames: duration,
            min_concurrency: seed.min_concurrency,
            max_concurrency: seed.max_concurrency,
        };
        let draft = RenderDraft::from_seed(&seed, &limits);
        debug!(
            "Opened composer for {} ({} frames, mode {})",
            seed.composition_id, duration, draft.mode
        );

        Ok(Self {
            composition_id: seed.composition_id,
            draft,
            limits,
            deps,
            host,
            completion_receiver: None,
            token: CancellationToken::new(),
        })
    }

    pub fn composition_id(&self) -> &str {
        &self.composition_id
    }

    pub fn draft(&self) -> &RenderDraft {
        &self.draft
    }

    pub fn limits(&self) -> DraftLimits {
        self.limits
    }

    pub fn state(&self) -> SubmissionState {
        self.draft.submission
    }

    pub fn is_live(&self) -> bool {
        !self.token.is_cancelled()
    }

    fn dispatch(&mut self, action: DraftAction) {
        if !self.is_live() {
            trace!("Composer closed, ignoring {:?}", action);
            return;
        }
        self.draft = reduce(&self.draft, action, &self.limits);
    }

    /// Re-read the composition duration and re-clamp the frame against it.
    pub fn refresh_duration(&mut self) -> u32 {
        match self.deps.compositions.duration_in_frames(&self.composition_id) {
            Some(duration) if duration != self.limits.duration_in_frames => {
                debug!(
                    "Duration of {} changed: {} -> {}",
                    self.composition_id, self.limits.duration_in_frames, duration
                );
                self.limits.duration_in_frames = duration;
                self.dispatch(DraftAction::DurationChanged);
            }
            Some(_) => {}
            None => warn!(
                "Composition {} disappeared, keeping last known duration",
                self.composition_id
            ),
        }
        self.limits.duration_in_frames
    }

    pub fn set_mode(&mut self, mode: RenderMode) {
        self.refresh_duration();
        self.dispatch(DraftAction::SetMode(mode));
    }

    pub fn set_image_format(&mut self, format: ImageFormat) {
        self.dispatch(DraftAction::SetImageFormat(format));
    }

    pub fn set_codec(&mut self, codec: Codec) {
        self.dispatch(DraftAction::SetCodec(codec));
    }

    pub fn set_out_name(&mut self, name: impl Into<String>) {
        self.dispatch(DraftAction::SetOutName(name.into()));
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.dispatch(DraftAction::SetVerbose(verbose));
    }

    pub fn set_quality(&mut self, raw: impl Into<FieldInput<i64>>) {
        self.dispatch(DraftAction::SetQuality(raw.into()));
    }

    pub fn set_scale(&mut self, raw: impl Into<FieldInput<f64>>) {
        self.dispatch(DraftAction::SetScale(raw.into()));
    }

    pub fn set_frame(&mut self, raw: impl Into<FieldInput<i64>>) {
        self.refresh_duration();
        self.dispatch(DraftAction::SetFrame(raw.into()));
    }

    pub fn set_concurrency(&mut self, raw: impl Into<FieldInput<i64>>) {
        self.dispatch(DraftAction::SetConcurrency(raw.into()));
    }

    /// Current frame, re-clamped against the live composition duration.
    pub fn frame(&mut self) -> u32 {
        self.refresh_duration();
        self.draft.frame
    }

    pub fn file_exists(&self) -> bool {
        self.deps.files.exists(&self.draft.out_name)
    }

    /// Non-blocking warning shown next to the output name.
    pub fn overwrite_warning(&self) -> Option<&'static str> {
        self.file_exists().then_some(OVERWRITE_WARNING)
    }

    /// Start a submission. Returns false when one is already in flight or the
    /// composer is closed.
    pub fn submit(&mut self) -> bool {
        if !self.is_live() {
            debug!("Composer closed, ignoring submit");
            return false;
        }
        if self.draft.is_submitting() {
            debug!("Submission already in progress, ignoring request");
            return false;
        }

        self.refresh_duration();
        self.host.select_renders_panel();
        self.dispatch(DraftAction::SubmitStarted);

        let request = self.draft.to_request(&self.composition_id, &self.limits);
        info!(
            "Submitting {} job for {} -> {}",
            request.mode(),
            request.composition_id(),
            request.out_name()
        );

        let client = Arc::clone(&self.deps.client);
        let token = self.token.clone();
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || {
            trace!("Submission thread started");
            let result = match request {
                JobRequest::Still(params) => client.add_still_render_job(params),
                JobRequest::Video(params) => client.add_video_render_job(params),
            };
            if token.is_cancelled() {
                debug!("Composer closed before submission finished, dropping result");
                return;
            }
            let outcome = match result {
                Ok(()) => SubmissionOutcome::Succeeded,
                Err(e) => {
                    error!("Render job submission failed: {}", e);
                    SubmissionOutcome::Failed(e.to_string())
                }
            };
            let _ = tx.send(outcome);
        });

        self.completion_receiver = Some(rx);
        true
    }

    /// Apply a finished submission if one is ready. Never blocks.
    pub fn poll(&mut self) -> Option<SubmissionState> {
        if !self.is_live() {
            return None;
        }
        let outcome = match self.completion_receiver.as_ref()?.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => {
                SubmissionOutcome::Failed("submission worker exited without a result".into())
            }
        };
        Some(self.apply(outcome))
    }

    /// Block until the in-flight submission finishes and apply it.
    pub fn wait(&mut self) -> Option<SubmissionState> {
        if !self.is_live() {
            return None;
        }
        let outcome = match self.completion_receiver.as_ref()?.recv() {
            Ok(outcome) => outcome,
            Err(_) => SubmissionOutcome::Failed("submission worker exited without a result".into()),
        };
        Some(self.apply(outcome))
    }

    fn apply(&mut self, outcome: SubmissionOutcome) -> SubmissionState {
        self.completion_receiver = None;
        match outcome {
            SubmissionOutcome::Succeeded => {
                self.dispatch(DraftAction::SubmitSucceeded);
                info!("Render job for {} queued", self.composition_id);
                self.host.close_composer();
                self.teardown();
            }
            SubmissionOutcome::Failed(message) => {
                self.dispatch(DraftAction::SubmitFailed(message));
            }
        }
        self.draft.submission
    }

    /// Close the composer. Pending results are discarded when they arrive.
    pub fn teardown(&mut self) {
        if self.is_live() {
            trace!("Tearing down composer for {}", self.composition_id);
        }
        self.token.cancel();
        self.completion_receiver = None;
    }
}

impl Drop for JobComposer {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
