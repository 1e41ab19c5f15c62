use serde::{Deserialize, Serialize};

use crate::types::{Codec, ImageFormat, RenderMode};

/// A composition as listed by a serve URL or the local composition directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Composition {
    pub id: String,
    pub duration_in_frames: u32,
    #[serde(default)]
    pub fps: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl Composition {
    pub fn new(id: impl Into<String>, duration_in_frames: u32) -> Self {
        Self {
            id: id.into(),
            duration_in_frames,
            fps: None,
            width: None,
            height: None,
        }
    }

    /// Compositions shorter than two frames can only be rendered as stills.
    pub fn supports_video(&self) -> bool {
        self.duration_in_frames >= 2
    }
}

/// Parameters of a still render job handed to the render engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StillJobParams {
    pub composition_id: String,
    pub out_name: String,
    pub image_format: ImageFormat,
    /// Only present for JPEG output
    pub quality: Option<u8>,
    pub frame: u32,
    pub scale: f64,
    pub verbose: bool,
}

/// Parameters of a video render job handed to the render engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoJobParams {
    pub composition_id: String,
    pub out_name: String,
    pub image_format: ImageFormat,
    /// Only present for JPEG frames
    pub quality: Option<u8>,
    pub scale: f64,
    pub verbose: bool,
    pub codec: Codec,
    pub concurrency: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JobRequest {
    Still(StillJobParams),
    Video(VideoJobParams),
}

impl JobRequest {
    pub fn mode(&self) -> RenderMode {
        match self {
            JobRequest::Still(_) => RenderMode::Still,
            JobRequest::Video(_) => RenderMode::Video,
        }
    }

    pub fn composition_id(&self) -> &str {
        match self {
            JobRequest::Still(p) => &p.composition_id,
            JobRequest::Video(p) => &p.composition_id,
        }
    }

    pub fn out_name(&self) -> &str {
        match self {
            JobRequest::Still(p) => &p.out_name,
            JobRequest::Video(p) => &p.out_name,
        }
    }
}
