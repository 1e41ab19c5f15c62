//! Interactive render job composer.
//!
//! `models` holds the draft and its bounds, `reducer` the pure transitions, and
//! `processing` the [`JobComposer`] that owns a draft, talks to the collaborators
//! and runs the single in-flight submission.
pub mod models;
pub mod processing;
pub mod reducer;

pub use models::{DraftLimits, DraftSeed, RenderDraft, SubmissionState};
pub use processing::{
    CancellationToken, ComposerDeps, ComposerHost, JobComposer, OVERWRITE_WARNING,
};
pub use reducer::{DraftAction, reduce};
