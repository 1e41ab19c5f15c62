//! Output-name helpers. The extension of an output name follows the active
//! image format (still) or codec (video).
use crate::types::{Codec, ImageFormat, RenderMode};

/// Byte index of the extension dot in the last path segment, if any.
///
/// A dot that starts the file name (`.env`) is not an extension separator.
fn extension_dot(name: &str) -> Option<usize> {
    let segment_start = name.rfind(['/', '\\']).map(|i| i + 1).unwrap_or(0);
    name[segment_start..]
        .rfind('.')
        .filter(|&i| i > 0)
        .map(|i| segment_start + i)
}

/// Name without its extension.
pub fn stem(name: &str) -> &str {
    match extension_dot(name) {
        Some(dot) => &name[..dot],
        None => name,
    }
}

/// Replace the extension of `name` with `suffix`, appending one if none exists.
pub fn with_suffix(name: &str, suffix: &str) -> String {
    format!("{}.{}", stem(name), suffix)
}

pub fn has_suffix(name: &str, suffix: &str) -> bool {
    extension_dot(name)
        .map(|dot| &name[dot + 1..] == suffix)
        .unwrap_or(false)
}

/// Extension the output should carry for the given mode.
pub fn suffix_for(mode: RenderMode, image_format: ImageFormat, codec: Codec) -> &'static str {
    match mode {
        RenderMode::Still => image_format.extension(),
        RenderMode::Video => codec.file_extension(),
    }
}

/// Default output location for a composition, e.g. `out/intro.mp4`.
pub fn default_out_name(composition_id: &str, suffix: &str) -> String {
    format!("out/{composition_id}.{suffix}")
}
