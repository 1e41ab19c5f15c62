//! File-backed stand-in for the cloud bucket, service and site APIs.
//!
//! State lives in one JSON document. Reads load it lazily; the only write is bucket
//! creation, which replaces the file atomically through a temp file in the same
//! directory.
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::{
    BucketInfo, BucketProvisioner, CompositionSource, ServiceDirectory, ServiceInfo,
};
use crate::config::BUCKET_PREFIX;
use crate::core::params::Composition;
use crate::error::{Error, Result};

/// Version deployed services must report to count as compatible.
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    pub service_name: String,
    pub region: String,
    pub uri: String,
    pub version: String,
}

impl ServiceRecord {
    pub fn is_compatible(&self) -> bool {
        self.version == SERVICE_VERSION
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudState {
    #[serde(default)]
    pub buckets: Vec<BucketInfo>,
    #[serde(default)]
    pub services: Vec<ServiceRecord>,
    /// Compositions available per serve URL
    #[serde(default)]
    pub sites: BTreeMap<String, Vec<Composition>>,
}

pub struct LocalCloud {
    path: PathBuf,
    state: Mutex<Option<CloudState>>,
}

impl LocalCloud {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Result<CloudState> {
        if !path.exists() {
            debug!("No cloud state at {:?}, starting empty", path);
            return Ok(CloudState::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, state: &CloudState) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(serde_json::to_string_pretty(state)?.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        debug!("Saved cloud state to {:?}", self.path);
        Ok(())
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut CloudState) -> Result<T>) -> Result<T> {
        let mut guard = self
            .state
            .lock()
            .map_err(|e| Error::external(format!("cloud state lock poisoned: {e}")))?;
        if guard.is_none() {
            *guard = Some(Self::load(&self.path)?);
        }
        match guard.as_mut() {
            Some(state) => f(state),
            None => Err(Error::external("cloud state unavailable")),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> Result<CloudState> {
        self.with_state(|state| Ok(state.clone()))
    }
}

/// `rendrcloudrun-` followed by ten random hex digits.
fn generate_bucket_name() -> String {
    format!("{BUCKET_PREFIX}{}", &Uuid::new_v4().simple().to_string()[..10])
}

impl BucketProvisioner for LocalCloud {
    fn get_or_create_bucket(&self, region: &str) -> Result<BucketInfo> {
        let (bucket, created) = self.with_state(|state| {
            let matching: Vec<BucketInfo> = state
                .buckets
                .iter()
                .filter(|b| b.region == region && b.bucket_name.starts_with(BUCKET_PREFIX))
                .cloned()
                .collect();

            match matching.as_slice() {
                [] => {
                    let bucket = BucketInfo {
                        bucket_name: generate_bucket_name(),
                        region: region.to_string(),
                    };
                    state.buckets.push(bucket.clone());
                    Ok((bucket, true))
                }
                [bucket] => Ok((bucket.clone(), false)),
                many => Err(Error::AmbiguousBucket {
                    count: many.len(),
                    prefix: BUCKET_PREFIX.to_string(),
                    region: region.to_string(),
                }),
            }
        })?;

        if created {
            let state = self.state()?;
            self.save(&state)?;
            info!("Created bucket {} in {}", bucket.bucket_name, region);
        } else {
            debug!("Using existing bucket {}", bucket.bucket_name);
        }
        Ok(bucket)
    }
}

impl ServiceDirectory for LocalCloud {
    fn get_services(&self, region: &str, compatible_only: bool) -> Result<Vec<ServiceInfo>> {
        self.with_state(|state| {
            Ok(state
                .services
                .iter()
                .filter(|s| s.region == region)
                .filter(|s| !compatible_only || s.is_compatible())
                .map(|s| ServiceInfo {
                    service_name: s.service_name.clone(),
                    uri: s.uri.clone(),
                })
                .collect())
        })
    }

    fn get_service_info(&self, service_name: &str, region: &str) -> Result<ServiceInfo> {
        self.with_state(|state| {
            state
                .services
                .iter()
                .find(|s| s.service_name == service_name && s.region == region)
                .map(|s| ServiceInfo {
                    service_name: s.service_name.clone(),
                    uri: s.uri.clone(),
                })
                .ok_or_else(|| Error::ServiceNotFound {
                    service_name: service_name.to_string(),
                    region: region.to_string(),
                })
        })
    }
}

impl CompositionSource for LocalCloud {
    fn get_compositions(&self, serve_url: &str) -> Result<Vec<Composition>> {
        self.with_state(|state| {
            state.sites.get(serve_url).cloned().ok_or_else(|| {
                Error::External(format!("Could not fetch compositions from {serve_url}"))
            })
        })
    }
}
