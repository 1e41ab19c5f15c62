#![allow(deprecated)]

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin;
use predicates::prelude::*;
use tempfile::TempDir;

use rendr::io::local::{CloudState, SERVICE_VERSION, ServiceRecord};

fn rendr_cmd(state_file: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin("rendr"));
    cmd.env("RENDR_STATE_FILE", state_file.as_os_str())
        .env_remove("RENDR_GCP_REGION")
        .env_remove("RUST_LOG");
    cmd
}

fn write_state(path: &Path, region: &str) {
    let mut state = CloudState::default();
    state.services.push(ServiceRecord {
        service_name: "rendr-render".into(),
        region: region.into(),
        uri: "https://rendr-render-abc.a.run.app".into(),
        version: SERVICE_VERSION.into(),
    });
    fs::write(path, serde_json::to_string_pretty(&state).unwrap()).unwrap();
}

#[test]
fn missing_serve_url_exits_with_usage() {
    let temp = TempDir::new().unwrap();
    rendr_cmd(&temp.path().join("cloud.json"))
        .args(["render"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No serve URL passed."))
        .stderr(predicate::str::contains(
            "rendr render <serve-url> <composition-id> [output-location]",
        ));
}

#[test]
fn conflicting_service_flags_exit_1() {
    let temp = TempDir::new().unwrap();
    let state_file = temp.path().join("cloud.json");
    write_state(&state_file, "us-east1");

    rendr_cmd(&state_file)
        .args([
            "render",
            "https://example.com/site",
            "intro",
            "--cloud-run-url",
            "https://rendr-render-abc.a.run.app",
            "--service-name",
            "rendr-render",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Both a Cloud Run URL and a Service Name was provided. Specify only one.",
        ));
}

#[test]
fn no_services_suggests_deploy() {
    let temp = TempDir::new().unwrap();
    rendr_cmd(&temp.path().join("cloud.json"))
        .args(["still", "https://example.com/site", "intro"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No compatible services found"))
        .stderr(predicate::str::contains("rendr services deploy"));
}

#[test]
fn invalid_privacy_exit_1() {
    let temp = TempDir::new().unwrap();
    let state_file = temp.path().join("cloud.json");
    write_state(&state_file, "us-east1");

    rendr_cmd(&state_file)
        .args(["render", "https://example.com/site", "intro", "--privacy", "secret"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid privacy setting: secret"));
}

#[test]
fn unknown_region_is_rejected() {
    let temp = TempDir::new().unwrap();
    rendr_cmd(&temp.path().join("cloud.json"))
        .args(["render", "https://example.com/site", "intro", "--region", "mars-north1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid region: mars-north1"));
}

#[test]
fn missing_config_file_is_reported() {
    let temp = TempDir::new().unwrap();
    rendr_cmd(&temp.path().join("cloud.json"))
        .args(["render", "https://example.com/site", "intro", "--config"])
        .arg(temp.path().join("nope.json"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn resolved_request_printed_as_json() {
    let temp = TempDir::new().unwrap();
    let state_file = temp.path().join("cloud.json");
    write_state(&state_file, "us-east1");

    rendr_cmd(&state_file)
        .args([
            "render",
            "https://example.com/site",
            "intro",
            "renders/intro.mp4",
            "--privacy",
            "private",
            "--json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"compositionId\": \"intro\""))
        .stdout(predicate::str::contains("\"privacy\": \"private\""))
        .stdout(predicate::str::contains("\"downloadName\": \"renders/intro.mp4\""))
        .stdout(predicate::str::contains("https://rendr-render-abc.a.run.app"));

    // the output bucket was created and persisted on first use
    let state: CloudState =
        serde_json::from_str(&fs::read_to_string(&state_file).unwrap()).unwrap();
    assert_eq!(state.buckets.len(), 1);
    assert!(state.buckets[0].bucket_name.starts_with("rendrcloudrun-"));
}

#[test]
fn config_file_region_applies() {
    let temp = TempDir::new().unwrap();
    let state_file = temp.path().join("cloud.json");
    write_state(&state_file, "europe-west1");
    let config = temp.path().join("rendr.json");
    fs::write(&config, r#"{ "region": "europe-west1" }"#).unwrap();

    rendr_cmd(&state_file)
        .args(["render", "https://example.com/site", "intro", "--config"])
        .arg(&config)
        .args(["--output-bucket", "my-outputs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Service:        rendr-render"))
        .stdout(predicate::str::contains("Output bucket:  my-outputs"))
        .stdout(predicate::str::contains("Privacy:        public"));
}
