//! Render argument resolution for the cloud render commands.
//!
//! Turns loosely specified command input (site name or serve URL, optional
//! composition id, optional service flags) into a fully resolved
//! [`ResolvedRenderArgs`], or fails on the first step that cannot be resolved.
use serde::{Deserialize, Serialize};

use crate::types::Privacy;

pub mod pipeline;
pub mod privacy;
pub mod serve_url;

pub use pipeline::{ArgumentResolver, Collaborators};
pub use privacy::resolve_privacy;
pub use serve_url::{convert_to_serve_url, is_http_url, validate_serve_url};

/// Unresolved command input: positionals plus the render flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderInput {
    /// `<serve-url-or-site-name> [composition-id] [output-location]`
    pub positional: Vec<String>,
    pub out_name: Option<String>,
    pub privacy: Option<String>,
    pub output_bucket: Option<String>,
    pub cloud_run_url: Option<String>,
    pub service_name: Option<String>,
}

impl RenderInput {
    /// Positional argument `index`, treating empty strings as absent.
    pub fn positional(&self, index: usize) -> Option<&str> {
        self.positional
            .get(index)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// Where the render request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TargetService {
    /// Explicit `--cloud-run-url`
    #[serde(rename_all = "camelCase")]
    Url { cloud_run_url: String },
    /// Named service, either given or picked from the compatible services
    #[serde(rename_all = "camelCase")]
    Named {
        service_name: String,
        cloud_run_url: String,
    },
}

impl TargetService {
    pub fn cloud_run_url(&self) -> &str {
        match self {
            TargetService::Url { cloud_run_url } => cloud_run_url,
            TargetService::Named { cloud_run_url, .. } => cloud_run_url,
        }
    }

    pub fn service_name(&self) -> Option<&str> {
        match self {
            TargetService::Url { .. } => None,
            TargetService::Named { service_name, .. } => Some(service_name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedRenderArgs {
    pub serve_url: String,
    pub target_service: TargetService,
    pub composition_id: String,
    pub out_name: Option<String>,
    pub output_bucket: String,
    pub privacy: Privacy,
    pub download_name: Option<String>,
}
