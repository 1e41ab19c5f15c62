//! Shared types and enums used across rendr.
//! Includes `RenderMode`, `ImageFormat`, `Codec` (with canonical file extensions)
//! and the output `Privacy` levels accepted by the render service.
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    Still,
    Video,
}

impl std::fmt::Display for RenderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderMode::Still => write!(f, "still"),
            RenderMode::Video => write!(f, "video"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Codecs accepted for video jobs, in the order they are offered to the user.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum Codec {
    #[serde(rename = "h264")]
    H264,
    #[serde(rename = "h265")]
    H265,
    #[serde(rename = "vp8")]
    Vp8,
    #[serde(rename = "vp9")]
    Vp9,
    #[serde(rename = "mp3")]
    Mp3,
    #[serde(rename = "aac")]
    Aac,
    #[serde(rename = "wav")]
    Wav,
    #[serde(rename = "prores")]
    ProRes,
    #[serde(rename = "h264-mkv")]
    H264Mkv,
    #[serde(rename = "gif")]
    Gif,
}

impl Codec {
    pub const ALL: [Codec; 10] = [
        Codec::H264,
        Codec::H265,
        Codec::Vp8,
        Codec::Vp9,
        Codec::Mp3,
        Codec::Aac,
        Codec::Wav,
        Codec::ProRes,
        Codec::H264Mkv,
        Codec::Gif,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Codec::H264 => "h264",
            Codec::H265 => "h265",
            Codec::Vp8 => "vp8",
            Codec::Vp9 => "vp9",
            Codec::Mp3 => "mp3",
            Codec::Aac => "aac",
            Codec::Wav => "wav",
            Codec::ProRes => "prores",
            Codec::H264Mkv => "h264-mkv",
            Codec::Gif => "gif",
        }
    }

    /// Canonical file extension of the container this codec renders into.
    pub fn file_extension(self) -> &'static str {
        match self {
            Codec::H264 | Codec::H265 => "mp4",
            Codec::Vp8 | Codec::Vp9 => "webm",
            Codec::Mp3 => "mp3",
            Codec::Aac => "aac",
            Codec::Wav => "wav",
            Codec::ProRes => "mov",
            Codec::H264Mkv => "mkv",
            Codec::Gif => "gif",
        }
    }
}

// Manual implementation for ValueEnum since "h264-mkv" does not follow the derive naming
impl clap::ValueEnum for Codec {
    fn value_variants<'a>() -> &'a [Self] {
        &Codec::ALL
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.as_str()))
    }
}

impl std::fmt::Display for Codec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Access level of the rendered output object in the output bucket.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    Public,
    Private,
}

impl Privacy {
    pub const ALL: [Privacy; 2] = [Privacy::Public, Privacy::Private];

    pub fn as_str(self) -> &'static str {
        match self {
            Privacy::Public => "public",
            Privacy::Private => "private",
        }
    }
}

impl std::fmt::Display for Privacy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
