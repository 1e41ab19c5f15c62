use serde::{Deserialize, Serialize};

use crate::core::clamp::{
    DEFAULT_QUALITY, clamp_concurrency, clamp_frame, clamp_quality, clamp_scale,
};
use crate::core::naming;
use crate::core::params::{JobRequest, StillJobParams, VideoJobParams};
use crate::types::{Codec, ImageFormat, RenderMode};

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionState {
    Idle,
    Load,
    Success,
    Error,
}

/// Externally owned bounds the draft is clamped against.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct DraftLimits {
    pub duration_in_frames: u32,
    pub min_concurrency: u32,
    pub max_concurrency: u32,
}

impl DraftLimits {
    pub fn supports_video(&self) -> bool {
        self.duration_in_frames >= 2
    }
}

/// Initial values supplied by whoever opens the composer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DraftSeed {
    pub composition_id: String,
    pub initial_frame: u32,
    pub initial_image_format: ImageFormat,
    pub initial_quality: Option<u8>,
    pub initial_scale: f64,
    pub initial_verbose: bool,
    pub initial_out_name: String,
    pub initial_mode: RenderMode,
    pub initial_codec: Codec,
    pub initial_concurrency: u32,
    pub min_concurrency: u32,
    pub max_concurrency: u32,
}

impl DraftSeed {
    /// Seed with the usual defaults for `composition_id`.
    pub fn for_composition(composition_id: impl Into<String>, mode: RenderMode) -> Self {
        let composition_id = composition_id.into();
        let suffix = naming::suffix_for(mode, ImageFormat::Png, Codec::H264);
        Self {
            initial_out_name: naming::default_out_name(&composition_id, suffix),
            composition_id,
            initial_frame: 0,
            initial_image_format: ImageFormat::Png,
            initial_quality: None,
            initial_scale: 1.0,
            initial_verbose: false,
            initial_mode: mode,
            initial_codec: Codec::H264,
            initial_concurrency: 1,
            min_concurrency: 1,
            max_concurrency: 8,
        }
    }
}

/// In-progress render job configuration, one per open composer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderDraft {
    pub mode: RenderMode,
    pub out_name: String,
    pub still_image_format: ImageFormat,
    pub video_image_format: ImageFormat,
    pub codec: Codec,
    pub quality: u8,
    pub scale: f64,
    pub frame: u32,
    pub concurrency: u32,
    pub verbose: bool,
    pub submission: SubmissionState,
    pub last_error: Option<String>,
}

impl RenderDraft {
    pub fn from_seed(seed: &DraftSeed, limits: &DraftLimits) -> Self {
        let mode = if limits.supports_video() {
            seed.initial_mode
        } else {
            RenderMode::Still
        };
        Self {
            mode,
            out_name: seed.initial_out_name.clone(),
            still_image_format: seed.initial_image_format,
            video_image_format: ImageFormat::Jpeg,
            codec: seed.initial_codec,
            quality: clamp_quality(seed.initial_quality.unwrap_or(DEFAULT_QUALITY) as i64),
            scale: if seed.initial_scale.is_finite() {
                clamp_scale(seed.initial_scale)
            } else {
                1.0
            },
            frame: clamp_frame(seed.initial_frame as i64, limits.duration_in_frames),
            concurrency: clamp_concurrency(
                seed.initial_concurrency as i64,
                limits.min_concurrency,
                limits.max_concurrency,
            ),
            verbose: seed.initial_verbose,
            submission: SubmissionState::Idle,
            last_error: None,
        }
    }

    /// Image format of the active mode.
    pub fn image_format(&self) -> ImageFormat {
        match self.mode {
            RenderMode::Still => self.still_image_format,
            RenderMode::Video => self.video_image_format,
        }
    }

    /// Quality is only meaningful for JPEG output.
    pub fn effective_quality(&self) -> Option<u8> {
        match self.image_format() {
            ImageFormat::Jpeg => Some(self.quality),
            ImageFormat::Png => None,
        }
    }

    pub fn expected_suffix(&self) -> &'static str {
        naming::suffix_for(self.mode, self.still_image_format, self.codec)
    }

    pub fn is_submitting(&self) -> bool {
        self.submission == SubmissionState::Load
    }

    /// Snapshot of the draft as a job request.
    pub fn to_request(&self, composition_id: &str, limits: &DraftLimits) -> JobRequest {
        match self.mode {
            RenderMode::Still => JobRequest::Still(StillJobParams {
                composition_id: composition_id.to_string(),
                out_name: self.out_name.clone(),
                image_format: self.still_image_format,
                quality: self.effective_quality(),
                frame: clamp_frame(self.frame as i64, limits.duration_in_frames),
                scale: self.scale,
                verbose: self.verbose,
            }),
            RenderMode::Video => JobRequest::Video(VideoJobParams {
                composition_id: composition_id.to_string(),
                out_name: self.out_name.clone(),
                image_format: self.video_image_format,
                quality: self.effective_quality(),
                scale: self.scale,
                verbose: self.verbose,
                codec: self.codec,
                concurrency: clamp_concurrency(
                    self.concurrency as i64,
                    limits.min_concurrency,
                    limits.max_concurrency,
                ),
            }),
        }
    }
}
