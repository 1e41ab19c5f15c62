use clap::ValueEnum;

use crate::config::DEFAULT_OUTPUT_PRIVACY;
use crate::error::{Error, Result};
use crate::types::Privacy;

/// Parse a privacy flag, falling back to the default when unset.
pub fn resolve_privacy(raw: Option<&str>) -> Result<Privacy> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_OUTPUT_PRIVACY);
    };
    Privacy::from_str(raw, false).map_err(|_| Error::InvalidPrivacy {
        value: raw.to_string(),
        allowed: Privacy::ALL
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    })
}
