//! Pure state transitions of a [`RenderDraft`].
//!
//! `reduce` never fails: out-of-domain numbers are clamped, unparsable text is
//! ignored, and actions that make no sense in the current state return the draft
//! unchanged.
use tracing::trace;

use super::models::{DraftLimits, RenderDraft, SubmissionState};
use crate::core::clamp::{FieldInput, apply_concurrency, apply_frame, apply_quality, apply_scale};
use crate::core::naming;
use crate::types::{Codec, ImageFormat, RenderMode};

#[derive(Clone, Debug, PartialEq)]
pub enum DraftAction {
    SetMode(RenderMode),
    /// Image format of the active mode
    SetImageFormat(ImageFormat),
    SetCodec(Codec),
    SetOutName(String),
    SetQuality(FieldInput<i64>),
    SetScale(FieldInput<f64>),
    SetFrame(FieldInput<i64>),
    SetConcurrency(FieldInput<i64>),
    SetVerbose(bool),
    /// The composition duration was re-read; `limits` carries the new value
    DurationChanged,
    SubmitStarted,
    SubmitSucceeded,
    SubmitFailed(String),
}

fn rename_for(draft: &mut RenderDraft) {
    draft.out_name = naming::with_suffix(&draft.out_name, draft.expected_suffix());
}

pub fn reduce(draft: &RenderDraft, action: DraftAction, limits: &DraftLimits) -> RenderDraft {
    let mut next = draft.clone();
    trace!("reduce {:?}", action);

    match action {
        DraftAction::SetMode(mode) => {
            if mode == RenderMode::Video && !limits.supports_video() {
                return next;
            }
            next.mode = mode;
            rename_for(&mut next);
        }
        DraftAction::SetImageFormat(format) => match next.mode {
            RenderMode::Still => {
                next.still_image_format = format;
                rename_for(&mut next);
            }
            // video output extension follows the codec, not the frame format
            RenderMode::Video => next.video_image_format = format,
        },
        DraftAction::SetCodec(codec) => {
            next.codec = codec;
            if next.mode == RenderMode::Video {
                rename_for(&mut next);
            }
        }
        DraftAction::SetOutName(name) => next.out_name = name,
        DraftAction::SetQuality(input) => next.quality = apply_quality(next.quality, &input),
        DraftAction::SetScale(input) => next.scale = apply_scale(next.scale, &input),
        DraftAction::SetFrame(input) => {
            next.frame = apply_frame(next.frame, &input, limits.duration_in_frames)
        }
        DraftAction::SetConcurrency(input) => {
            next.concurrency = apply_concurrency(
                next.concurrency,
                &input,
                limits.min_concurrency,
                limits.max_concurrency,
            )
        }
        DraftAction::SetVerbose(verbose) => next.verbose = verbose,
        DraftAction::DurationChanged => {
            next.frame = apply_frame(
                next.frame,
                &FieldInput::Value(next.frame as i64),
                limits.duration_in_frames,
            );
            if next.mode == RenderMode::Video && !limits.supports_video() {
                next.mode = RenderMode::Still;
                rename_for(&mut next);
            }
        }
        DraftAction::SubmitStarted => {
            if next.submission != SubmissionState::Load {
                next.submission = SubmissionState::Load;
                next.last_error = None;
            }
        }
        DraftAction::SubmitSucceeded => {
            if next.submission == SubmissionState::Load {
                next.submission = SubmissionState::Success;
            }
        }
        DraftAction::SubmitFailed(message) => {
            if next.submission == SubmissionState::Load {
                next.submission = SubmissionState::Error;
                next.last_error = Some(message);
            }
        }
    }

    next
}
