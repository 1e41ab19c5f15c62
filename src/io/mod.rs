//! I/O layer: contracts of the external collaborators and their local bindings.
//!
//! The render engine, cloud bucket/service APIs and composition listing live outside
//! this crate; they are reached only through the traits below. `local` binds the cloud
//! side to a JSON state file, `fs` answers file-existence queries from disk and
//! `picker` asks the user to choose a composition on the terminal.
use serde::{Deserialize, Serialize};

use crate::core::params::{Composition, StillJobParams, VideoJobParams};
use crate::error::Result;

pub mod fs;
pub mod local;
pub mod picker;

pub use fs::FsFileExistence;
pub use local::{CloudState, LocalCloud};
pub use picker::TerminalPicker;

/// Render engine client accepting new jobs.
pub trait RenderJobClient: Send + Sync {
    fn add_still_render_job(&self, params: StillJobParams) -> Result<()>;
    fn add_video_render_job(&self, params: VideoJobParams) -> Result<()>;
}

/// Authoritative source of composition durations.
pub trait CompositionDirectory: Send + Sync {
    fn composition(&self, composition_id: &str) -> Option<Composition>;

    fn duration_in_frames(&self, composition_id: &str) -> Option<u32> {
        self.composition(composition_id)
            .map(|c| c.duration_in_frames)
    }
}

impl CompositionDirectory for Vec<Composition> {
    fn composition(&self, composition_id: &str) -> Option<Composition> {
        self.iter().find(|c| c.id == composition_id).cloned()
    }
}

pub trait FileExistence: Send + Sync {
    fn exists(&self, path: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketInfo {
    pub bucket_name: String,
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    pub service_name: String,
    pub uri: String,
}

pub trait BucketProvisioner {
    fn get_or_create_bucket(&self, region: &str) -> Result<BucketInfo>;
}

pub trait ServiceDirectory {
    fn get_services(&self, region: &str, compatible_only: bool) -> Result<Vec<ServiceInfo>>;
    fn get_service_info(&self, service_name: &str, region: &str) -> Result<ServiceInfo>;
}

pub trait CompositionSource {
    fn get_compositions(&self, serve_url: &str) -> Result<Vec<Composition>>;
}

/// Interactive choice of one composition; returns the chosen id.
pub trait CompositionPicker {
    fn select_composition(&self, compositions: &[Composition]) -> Result<String>;
}
