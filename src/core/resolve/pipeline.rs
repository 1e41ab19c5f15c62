use tracing::{debug, info};

use super::serve_url::{convert_to_serve_url, is_http_url, validate_serve_url};
use super::{RenderInput, ResolvedRenderArgs, TargetService, resolve_privacy};
use crate::error::{Error, Result};
use crate::io::{BucketProvisioner, CompositionPicker, CompositionSource, ServiceDirectory};

/// Flag value, with an empty string counting as unset.
fn non_empty(flag: &Option<String>) -> Option<&str> {
    flag.as_deref().filter(|s| !s.is_empty())
}

/// External lookups the resolver may perform.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub buckets: &'a dyn BucketProvisioner,
    pub services: &'a dyn ServiceDirectory,
    pub compositions: &'a dyn CompositionSource,
    pub picker: &'a dyn CompositionPicker,
}

/// One resolution run. Steps execute strictly in order and the first failure ends
/// the run; the bucket is looked up at most once per run.
pub struct ArgumentResolver<'a> {
    region: String,
    deps: Collaborators<'a>,
    bucket: Option<String>,
}

impl<'a> ArgumentResolver<'a> {
    pub fn new(region: impl Into<String>, deps: Collaborators<'a>) -> Self {
        Self {
            region: region.into(),
            deps,
            bucket: None,
        }
    }

    fn bucket(&mut self) -> Result<String> {
        if let Some(bucket) = &self.bucket {
            return Ok(bucket.clone());
        }
        let bucket = self.deps.buckets.get_or_create_bucket(&self.region)?.bucket_name;
        self.bucket = Some(bucket.clone());
        Ok(bucket)
    }

    fn resolve_serve_url(&mut self, subcommand: &str, input: &RenderInput) -> Result<String> {
        let Some(raw) = input.positional(0) else {
            return Err(Error::MissingServeUrl {
                subcommand: subcommand.to_string(),
            });
        };

        if is_http_url(raw) {
            return Ok(raw.to_string());
        }

        debug!("Site name passed, constructing serve url...");
        let bucket = self.bucket()?;
        Ok(convert_to_serve_url(raw, &bucket))
    }

    fn resolve_composition(&self, serve_url: &str, input: &RenderInput) -> Result<String> {
        if let Some(id) = input.positional(1) {
            return Ok(id.to_string());
        }

        info!("No compositions passed. Fetching compositions for {}...", serve_url);
        validate_serve_url(serve_url)?;
        let comps = self.deps.compositions.get_compositions(serve_url)?;
        if comps.is_empty() {
            return Err(Error::NoCompositions {
                serve_url: serve_url.to_string(),
            });
        }
        self.deps.picker.select_composition(&comps)
    }

    fn resolve_target_service(&self, input: &RenderInput) -> Result<TargetService> {
        match (non_empty(&input.cloud_run_url), non_empty(&input.service_name)) {
            (Some(_), Some(_)) => Err(Error::ConflictingServiceFlags),
            (Some(url), None) => Ok(TargetService::Url {
                cloud_run_url: url.to_string(),
            }),
            (None, Some(name)) => {
                let info = self.deps.services.get_service_info(name, &self.region)?;
                Ok(TargetService::Named {
                    service_name: name.to_string(),
                    cloud_run_url: info.uri,
                })
            }
            (None, None) => {
                let services = self.deps.services.get_services(&self.region, true)?;
                // first listed service wins; callers wanting another must name it
                let Some(first) = services.into_iter().next() else {
                    return Err(Error::NoCompatibleServices {
                        region: self.region.clone(),
                    });
                };
                debug!("Selected service {} ({})", first.service_name, first.uri);
                Ok(TargetService::Named {
                    service_name: first.service_name,
                    cloud_run_url: first.uri,
                })
            }
        }
    }

    pub fn resolve(mut self, subcommand: &str, input: &RenderInput) -> Result<ResolvedRenderArgs> {
        let serve_url = self.resolve_serve_url(subcommand, input)?;
        let composition_id = self.resolve_composition(&serve_url, input)?;

        let out_name = input.out_name.clone();
        let download_name = input.positional(2).map(str::to_string);
        let privacy = resolve_privacy(input.privacy.as_deref())?;

        let output_bucket = match non_empty(&input.output_bucket) {
            Some(bucket) => bucket.to_string(),
            None => self.bucket()?,
        };

        let target_service = self.resolve_target_service(input)?;

        info!(
            "Resolved {} of {} on {}",
            composition_id,
            serve_url,
            target_service.cloud_run_url()
        );
        Ok(ResolvedRenderArgs {
            serve_url,
            target_service,
            composition_id,
            out_name,
            output_bucket,
            privacy,
            download_name,
        })
    }
}
