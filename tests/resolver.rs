use std::cell::{Cell, RefCell};
use std::io::Cursor;

use rendr::config::BUCKET_PREFIX;
use rendr::core::resolve::{ArgumentResolver, Collaborators};
use rendr::io::local::{CloudState, SERVICE_VERSION, ServiceRecord};
use rendr::io::{
    BucketInfo, BucketProvisioner, CompositionPicker, CompositionSource, ServiceDirectory,
    ServiceInfo,
};
use rendr::{
    CloudConfig, Composition, Error, Privacy, RenderInput, TargetService, TerminalPicker,
    resolve_render_args,
};

#[derive(Default)]
struct FakeCloud {
    bucket_calls: Cell<usize>,
    service_calls: Cell<usize>,
    services: Vec<ServiceInfo>,
    compositions: Vec<Composition>,
    fetched: RefCell<Vec<String>>,
}

impl BucketProvisioner for FakeCloud {
    fn get_or_create_bucket(&self, region: &str) -> rendr::Result<BucketInfo> {
        self.bucket_calls.set(self.bucket_calls.get() + 1);
        Ok(BucketInfo {
            bucket_name: format!("{BUCKET_PREFIX}abc123"),
            region: region.to_string(),
        })
    }
}

impl ServiceDirectory for FakeCloud {
    fn get_services(&self, _region: &str, compatible_only: bool) -> rendr::Result<Vec<ServiceInfo>> {
        assert!(compatible_only);
        self.service_calls.set(self.service_calls.get() + 1);
        Ok(self.services.clone())
    }

    fn get_service_info(&self, service_name: &str, region: &str) -> rendr::Result<ServiceInfo> {
        self.service_calls.set(self.service_calls.get() + 1);
        self.services
            .iter()
            .find(|s| s.service_name == service_name)
            .cloned()
            .ok_or_else(|| Error::ServiceNotFound {
                service_name: service_name.to_string(),
                region: region.to_string(),
            })
    }
}

impl CompositionSource for FakeCloud {
    fn get_compositions(&self, serve_url: &str) -> rendr::Result<Vec<Composition>> {
        self.fetched.borrow_mut().push(serve_url.to_string());
        Ok(self.compositions.clone())
    }
}

/// Picks the last composition offered.
struct LastPicker {
    calls: Cell<usize>,
}

impl CompositionPicker for LastPicker {
    fn select_composition(&self, compositions: &[Composition]) -> rendr::Result<String> {
        self.calls.set(self.calls.get() + 1);
        compositions
            .last()
            .map(|c| c.id.clone())
            .ok_or_else(|| Error::external("nothing to pick"))
    }
}

fn picker() -> LastPicker {
    LastPicker {
        calls: Cell::new(0),
    }
}

fn service(name: &str) -> ServiceInfo {
    ServiceInfo {
        service_name: name.to_string(),
        uri: format!("https://{name}-xyz.a.run.app"),
    }
}

fn input(positional: &[&str]) -> RenderInput {
    RenderInput {
        positional: positional.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    }
}

fn resolve(
    cloud: &FakeCloud,
    picker: &LastPicker,
    subcommand: &str,
    input: &RenderInput,
) -> rendr::Result<rendr::ResolvedRenderArgs> {
    let collaborators = Collaborators {
        buckets: cloud,
        services: cloud,
        compositions: cloud,
        picker,
    };
    ArgumentResolver::new("us-east1", collaborators).resolve(subcommand, input)
}

#[test]
fn site_name_resolves_through_bucket_and_picker() {
    let cloud = FakeCloud {
        services: vec![service("render-a"), service("render-b")],
        compositions: vec![Composition::new("intro", 90), Composition::new("outro", 60)],
        ..Default::default()
    };
    let picker = picker();

    let resolved = resolve(&cloud, &picker, "render", &input(&["myproject"])).unwrap();

    let expected_url =
        "https://storage.googleapis.com/rendrcloudrun-abc123/sites/myproject/index.html";
    assert_eq!(resolved.serve_url, expected_url);
    assert_eq!(cloud.fetched.borrow().as_slice(), [expected_url.to_string()]);
    assert_eq!(picker.calls.get(), 1);
    assert_eq!(resolved.composition_id, "outro");
    // bucket is looked up once for the serve URL and reused for the output
    assert_eq!(cloud.bucket_calls.get(), 1);
    assert_eq!(resolved.output_bucket, "rendrcloudrun-abc123");
    assert_eq!(resolved.privacy, Privacy::Public);
    assert_eq!(
        resolved.target_service,
        TargetService::Named {
            service_name: "render-a".into(),
            cloud_run_url: "https://render-a-xyz.a.run.app".into(),
        }
    );
}

#[test]
fn both_service_flags_fail_before_service_lookup() {
    let cloud = FakeCloud {
        services: vec![service("render-a")],
        ..Default::default()
    };
    let mut request = input(&["https://example.com/site", "intro"]);
    request.cloud_run_url = Some("https://render-a-xyz.a.run.app".into());
    request.service_name = Some("render-a".into());

    let err = resolve(&cloud, &picker(), "render", &request).unwrap_err();
    assert!(matches!(err, Error::ConflictingServiceFlags));
    assert!(err.is_usage());
    assert_eq!(err.exit_code(), 1);
    assert_eq!(cloud.service_calls.get(), 0);
}

#[test]
fn no_compatible_services_points_at_deploy() {
    let cloud = FakeCloud::default();
    let err = resolve(
        &cloud,
        &picker(),
        "render",
        &input(&["https://example.com/site", "intro"]),
    )
    .unwrap_err();

    assert!(matches!(err, Error::NoCompatibleServices { .. }));
    assert!(err.to_string().contains("No compatible services found"));
    assert!(
        err.remediation()
            .iter()
            .any(|line| line.trim() == "rendr services deploy")
    );
}

#[test]
fn named_service_uses_service_info() {
    let cloud = FakeCloud {
        services: vec![service("render-a"), service("render-b")],
        ..Default::default()
    };
    let mut request = input(&["https://example.com/site", "intro", "local/out.mp4"]);
    request.service_name = Some("render-b".into());
    request.output_bucket = Some("my-outputs".into());
    request.privacy = Some("private".into());
    request.out_name = Some("final.mp4".into());

    let resolved = resolve(&cloud, &picker(), "render", &request).unwrap();
    assert_eq!(resolved.target_service.service_name(), Some("render-b"));
    assert_eq!(
        resolved.target_service.cloud_run_url(),
        "https://render-b-xyz.a.run.app"
    );
    assert_eq!(resolved.output_bucket, "my-outputs");
    assert_eq!(resolved.privacy, Privacy::Private);
    assert_eq!(resolved.out_name.as_deref(), Some("final.mp4"));
    assert_eq!(resolved.download_name.as_deref(), Some("local/out.mp4"));
    // URL serve input and explicit output bucket never touch the bucket API
    assert_eq!(cloud.bucket_calls.get(), 0);
}

#[test]
fn direct_cloud_run_url_skips_service_lookup() {
    let cloud = FakeCloud::default();
    let mut request = input(&["https://example.com/site", "intro"]);
    request.cloud_run_url = Some("https://custom.a.run.app".into());

    let resolved = resolve(&cloud, &picker(), "still", &request).unwrap();
    assert_eq!(
        resolved.target_service,
        TargetService::Url {
            cloud_run_url: "https://custom.a.run.app".into()
        }
    );
    assert_eq!(cloud.service_calls.get(), 0);
}

#[test]
fn empty_cloud_run_url_counts_as_absent() {
    let cloud = FakeCloud {
        services: vec![service("render-a"), service("render-b")],
        ..Default::default()
    };
    let mut request = input(&["https://example.com/site", "intro"]);
    request.cloud_run_url = Some(String::new());

    let resolved = resolve(&cloud, &picker(), "render", &request).unwrap();
    assert_eq!(resolved.target_service.service_name(), Some("render-a"));
    assert_eq!(
        resolved.target_service.cloud_run_url(),
        "https://render-a-xyz.a.run.app"
    );
}

#[test]
fn empty_flag_beside_service_name_is_not_a_conflict() {
    let cloud = FakeCloud {
        services: vec![service("render-a"), service("render-b")],
        ..Default::default()
    };
    let mut request = input(&["https://example.com/site", "intro"]);
    request.cloud_run_url = Some(String::new());
    request.service_name = Some("render-b".into());

    let resolved = resolve(&cloud, &picker(), "render", &request).unwrap();
    assert_eq!(
        resolved.target_service,
        TargetService::Named {
            service_name: "render-b".into(),
            cloud_run_url: "https://render-b-xyz.a.run.app".into(),
        }
    );

    // and an empty service name next to a real URL uses the URL
    request.cloud_run_url = Some("https://custom.a.run.app".into());
    request.service_name = Some(String::new());
    let resolved = resolve(&cloud, &picker(), "render", &request).unwrap();
    assert_eq!(
        resolved.target_service,
        TargetService::Url {
            cloud_run_url: "https://custom.a.run.app".into()
        }
    );
}

#[test]
fn missing_serve_url_prints_usage() {
    let cloud = FakeCloud::default();
    let err = resolve(&cloud, &picker(), "still", &input(&[])).unwrap_err();

    assert_eq!(err.to_string(), "No serve URL passed.");
    assert!(
        err.remediation()
            .contains(&"rendr still <serve-url> <composition-id> [output-location]".to_string())
    );
    assert_eq!(cloud.bucket_calls.get(), 0);
}

#[test]
fn invalid_privacy_is_fatal() {
    let cloud = FakeCloud {
        services: vec![service("render-a")],
        ..Default::default()
    };
    let mut request = input(&["https://example.com/site", "intro"]);
    request.privacy = Some("secret".into());

    let err = resolve(&cloud, &picker(), "render", &request).unwrap_err();
    assert!(matches!(err, Error::InvalidPrivacy { ref value, .. } if value == "secret"));
    assert_eq!(cloud.service_calls.get(), 0);
}

#[test]
fn empty_site_listing_is_fatal() {
    let cloud = FakeCloud::default();
    let picker = picker();
    let err = resolve(&cloud, &picker, "render", &input(&["https://example.com/site"])).unwrap_err();
    assert!(matches!(err, Error::NoCompositions { .. }));
    assert_eq!(picker.calls.get(), 0);
}

#[test]
fn malformed_serve_url_rejected_before_fetch() {
    let cloud = FakeCloud::default();
    let err = resolve(&cloud, &picker(), "render", &input(&["https://"])).unwrap_err();
    assert!(matches!(err, Error::InvalidServeUrl { .. }));
    assert!(cloud.fetched.borrow().is_empty());
}

#[test]
fn local_cloud_state_drives_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let state_file = dir.path().join("cloud.json");
    let serve_url = "https://storage.googleapis.com/rendrcloudrun-local/sites/myproject/index.html";

    let mut state = CloudState::default();
    state.buckets.push(BucketInfo {
        bucket_name: "rendrcloudrun-local".into(),
        region: "europe-west1".into(),
    });
    state.services.push(ServiceRecord {
        service_name: "stale".into(),
        region: "europe-west1".into(),
        uri: "https://stale.a.run.app".into(),
        version: "0.0.0".into(),
    });
    state.services.push(ServiceRecord {
        service_name: "current".into(),
        region: "europe-west1".into(),
        uri: "https://current.a.run.app".into(),
        version: SERVICE_VERSION.into(),
    });
    state.sites.insert(
        serve_url.into(),
        vec![Composition::new("intro", 90), Composition::new("logo", 1)],
    );
    std::fs::write(&state_file, serde_json::to_string(&state).unwrap()).unwrap();

    let config = CloudConfig {
        region: "europe-west1".into(),
        state_file,
    };
    let mut prompt = Vec::new();
    let terminal = TerminalPicker::new(Cursor::new(b"2\n".to_vec()), &mut prompt);

    let resolved =
        resolve_render_args(&config, "still", &input(&["myproject"]), &terminal).unwrap();
    drop(terminal);

    assert_eq!(resolved.serve_url, serve_url);
    assert_eq!(resolved.composition_id, "logo");
    assert_eq!(resolved.output_bucket, "rendrcloudrun-local");
    assert_eq!(resolved.target_service.service_name(), Some("current"));

    let prompt = String::from_utf8(prompt).unwrap();
    assert!(prompt.contains("1) intro"));
    assert!(prompt.contains("2) logo"));
}
