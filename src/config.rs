//! Cloud configuration: region and local state file.
//!
//! Values are layered: explicit overrides (CLI flags) win over a JSON config file,
//! which wins over the environment, which wins over built-in defaults.
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::Privacy;

pub const BINARY_NAME: &str = "rendr";
pub const SERVICES_COMMAND: &str = "services";
pub const DEPLOY_SUBCOMMAND: &str = "deploy";
pub const DEFAULT_OUTPUT_PRIVACY: Privacy = Privacy::Public;
pub const BUCKET_PREFIX: &str = "rendrcloudrun-";

pub const DEFAULT_REGION: &str = "us-east1";
pub const DEFAULT_STATE_FILE: &str = ".rendr/cloud.json";

pub const REGION_ENV: &str = "RENDR_GCP_REGION";
pub const STATE_FILE_ENV: &str = "RENDR_STATE_FILE";

pub const CLOUD_RUN_REGIONS: &[&str] = &[
    "asia-east1",
    "asia-east2",
    "asia-northeast1",
    "asia-northeast2",
    "asia-northeast3",
    "asia-south1",
    "asia-south2",
    "asia-southeast1",
    "asia-southeast2",
    "australia-southeast1",
    "australia-southeast2",
    "europe-central2",
    "europe-north1",
    "europe-southwest1",
    "europe-west1",
    "europe-west2",
    "europe-west3",
    "europe-west4",
    "europe-west6",
    "europe-west8",
    "europe-west9",
    "me-west1",
    "northamerica-northeast1",
    "northamerica-northeast2",
    "southamerica-east1",
    "southamerica-west1",
    "us-central1",
    "us-east1",
    "us-east4",
    "us-east5",
    "us-south1",
    "us-west1",
    "us-west2",
    "us-west3",
    "us-west4",
];

pub fn validate_region(region: &str) -> Result<()> {
    if CLOUD_RUN_REGIONS.contains(&region) {
        Ok(())
    } else {
        Err(Error::InvalidRegion {
            region: region.to_string(),
            allowed: CLOUD_RUN_REGIONS.join(", "),
        })
    }
}

/// Partial configuration as read from a config file or the environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigLayer {
    pub region: Option<String>,
    pub state_file: Option<PathBuf>,
}

impl ConfigLayer {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let layer: ConfigLayer = serde_json::from_str(&content)?;
        debug!("Loaded config layer from {:?}", path);
        Ok(layer)
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            region: non_empty(REGION_ENV),
            state_file: non_empty(STATE_FILE_ENV).map(PathBuf::from),
        }
    }

    /// Fill unset fields from `lower`.
    pub fn or(self, lower: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            region: self.region.or(lower.region),
            state_file: self.state_file.or(lower.state_file),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudConfig {
    pub region: String,
    pub state_file: PathBuf,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
        }
    }
}

impl CloudConfig {
    /// Resolve layers highest-precedence first and validate the region.
    pub fn resolve(layers: impl IntoIterator<Item = ConfigLayer>) -> Result<Self> {
        let merged = layers
            .into_iter()
            .fold(ConfigLayer::default(), |acc, layer| acc.or(layer));
        let defaults = CloudConfig::default();
        let config = CloudConfig {
            region: merged.region.unwrap_or(defaults.region),
            state_file: merged.state_file.unwrap_or(defaults.state_file),
        };
        validate_region(&config.region)?;
        debug!(
            "Cloud config: region={}, state_file={:?}",
            config.region, config.state_file
        );
        Ok(config)
    }
}
