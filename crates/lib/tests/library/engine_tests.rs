use bootstrap_lib::engine::{Engine, EngineState, Outcome};
use bootstrap_lib::platform::Environment;
use bootstrap_lib::platform::arch::ProcessorArchitecture;
use bootstrap_lib::platform::os::OperatingSystem;
use bootstrap_lib::session::{Sequence, Session, SessionOptions, UiLevel};
use serde_json::json;
use tempfile::TempDir;

use super::common::{LocalHost, marker_component, touch, write_config};

fn env() -> Environment {
  Environment::new(Some(OperatingSystem::Win10), ProcessorArchitecture::current(), 1033)
}

fn options(config: std::path::PathBuf, sequence: Sequence) -> SessionOptions {
  SessionOptions {
    config_path: Some(config),
    sequence,
    ui_level: UiLevel::Silent,
    ..Default::default()
  }
}

#[test]
fn install_then_uninstall_with_real_commands() {
  let dir = TempDir::new().unwrap();
  let a = dir.path().join("a.installed");
  let b = dir.path().join("b.installed");
  let config = write_config(
    &dir,
    "setup.json",
    &json!({
      "version": "1.0",
      "configurations": [{
        "type": "install",
        "components": [marker_component("a", &a), marker_component("b", &b)]
      }]
    }),
  );

  let mut engine = Engine::new(LocalHost::new(&dir), Session::new(options(config.clone(), Sequence::Install)), env());
  let summary = engine.run().unwrap();
  assert_eq!(summary.outcome, Outcome::Completed);
  assert_eq!(summary.exit_code, 0);
  assert!(a.is_file());
  assert!(b.is_file());

  let mut engine = Engine::new(LocalHost::new(&dir), Session::new(options(config, Sequence::Uninstall)), env());
  let summary = engine.run().unwrap();
  assert_eq!(summary.outcome, Outcome::Completed);
  assert!(!a.exists());
  assert!(!b.exists());
}

#[test]
fn failing_command_sets_exit_code() {
  let dir = TempDir::new().unwrap();
  let config = write_config(
    &dir,
    "setup.json",
    &json!({
      "configurations": [{
        "type": "install",
        "components": [{
          "id": "broken",
          "install": { "full": "exit 7" },
          "install_checks": [{ "type": "file", "path": dir.path().join("never") }]
        }]
      }]
    }),
  );

  let mut engine = Engine::new(LocalHost::new(&dir), Session::new(options(config, Sequence::Install)), env());
  let summary = engine.run().unwrap();

  assert_eq!(summary.outcome, Outcome::Failed);
  assert_eq!(summary.exit_code, 7);
  assert_eq!(engine.state(), EngineState::Error);
}

#[test]
fn reboot_code_persists_resume_marker() {
  let dir = TempDir::new().unwrap();
  let config = write_config(
    &dir,
    "setup.json",
    &json!({
      "configurations": [{
        "type": "install",
        "must_reboot_required": true,
        "components": [{
          "id": "driver",
          "install": { "full": "exit 3010" },
          "install_checks": [{ "type": "file", "path": dir.path().join("driver") }]
        }]
      }]
    }),
  );
  let options = SessionOptions {
    program: "bootstrap".into(),
    restart_args: vec!["run".to_string(), "--silent".to_string()],
    ..options(config, Sequence::Install)
  };

  let mut engine = Engine::new(LocalHost::new(&dir), Session::new(options), env());
  let summary = engine.run().unwrap();

  assert_eq!(summary.outcome, Outcome::Reboot);
  assert_eq!(summary.exit_code, 3010);
  let host = engine.into_host();
  assert_eq!(host.reboots, 1);
  let marker = host.resume.load().unwrap().unwrap();
  assert_eq!(marker.command_line, vec!["bootstrap", "run", "--silent", "--reboot"]);
}

#[test]
fn component_download_lands_next_to_configuration() {
  let dir = TempDir::new().unwrap();
  let payload = dir.path().join("payload.src");
  std::fs::write(&payload, b"payload").unwrap();
  let done = dir.path().join("done");

  let config = write_config(
    &dir,
    "setup.json",
    &json!({
      "configurations": [{
        "type": "install",
        "components": [{
          "id": "pkg",
          "install": { "full": touch(&done) },
          "install_checks": [{ "type": "file", "path": done }],
          "download": {
            "caption": "payload",
            "files": [{ "source_url": payload, "destination_path": "cache/payload.bin" }]
          }
        }]
      }]
    }),
  );

  let mut engine = Engine::new(LocalHost::new(&dir), Session::new(options(config, Sequence::Install)), env());
  let summary = engine.run().unwrap();

  assert_eq!(summary.outcome, Outcome::Completed);
  assert_eq!(std::fs::read(dir.path().join("cache/payload.bin")).unwrap(), b"payload");
  assert!(done.is_file());
}
