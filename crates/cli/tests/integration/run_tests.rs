//! Run command integration tests.

use std::path::Path;

use predicates::prelude::*;
use serde_json::json;

use bootstrap_lib::consts::EXIT_REBOOT_REQUIRED;

use super::common::{TestEnv, exit_status, remove_command, touch_command};

#[test]
fn quiet_run_succeeds() {
  let env = TestEnv::from_fixture("simple.json");

  env.run(&["--quiet"]).assert().success().stdout(predicate::str::is_empty());
}

#[test]
fn run_reports_commands_and_result() {
  let env = TestEnv::from_fixture("simple.json");

  env
    .run(&[])
    .assert()
    .success()
    .stdout(predicate::str::contains("exit 0"))
    .stdout(predicate::str::contains("Setup finished"));
}

#[test]
fn failing_component_sets_exit_code() {
  let env = TestEnv::from_fixture("failing.json");

  env.run(&["--quiet"]).assert().code(7);
}

#[test]
fn failing_component_reports_error_code() {
  let env = TestEnv::from_fixture("failing.json");

  env
    .run(&[])
    .assert()
    .code(7)
    .stderr(predicate::str::contains("finished with error 7"));
}

#[test]
fn reboot_request_writes_resume_marker() {
  let env = TestEnv::from_fixture("reboot.json");

  env
    .run(&["--quiet", "--no-reboot"])
    .assert()
    .code(exit_status(EXIT_REBOOT_REQUIRED));

  let marker = env.resume_marker().expect("resume marker written");
  let command_line: Vec<&str> = marker["command_line"]
    .as_array()
    .unwrap()
    .iter()
    .map(|v| v.as_str().unwrap())
    .collect();
  assert_eq!(command_line.last(), Some(&"--reboot"));
  assert!(command_line.contains(&"--quiet"));
  assert!(command_line.contains(&"run"));
}

#[test]
fn resume_marker_holds_absolute_config_path() {
  let env = TestEnv::from_fixture("reboot.json");

  env
    .bootstrap_cmd()
    .current_dir(env.temp.path())
    .args(["run", "--config", "setup.json", "--quiet", "--no-reboot"])
    .assert()
    .code(exit_status(EXIT_REBOOT_REQUIRED));

  let marker = env.resume_marker().expect("resume marker written");
  let command_line: Vec<&str> = marker["command_line"]
    .as_array()
    .unwrap()
    .iter()
    .map(|v| v.as_str().unwrap())
    .collect();
  let config = command_line
    .iter()
    .position(|a| *a == "--config")
    .map(|i| command_line[i + 1])
    .unwrap();
  assert_eq!(Path::new(config), dunce::canonicalize(&env.config_path).unwrap());
}

#[test]
fn no_run_on_reboot_skips_marker() {
  let env = TestEnv::from_fixture("reboot.json");

  env
    .run(&["--quiet", "--no-reboot", "--no-run-on-reboot"])
    .assert()
    .code(exit_status(EXIT_REBOOT_REQUIRED));

  assert!(env.resume_marker().is_none());
}

#[test]
fn resumed_run_clears_marker() {
  let env = TestEnv::from_fixture("simple.json");
  std::fs::write(
    env.data_path().join("resume.json"),
    r#"{ "command_line": ["bootstrap", "run", "--reboot"] }"#,
  )
  .unwrap();

  env.run(&["--quiet", "--reboot"]).assert().success();

  assert!(env.resume_marker().is_none());
}

#[test]
fn already_installed_closes_without_running() {
  let env = TestEnv::from_fixture("installed.json");

  env
    .run(&[])
    .assert()
    .success()
    .stdout(predicate::str::contains("exit 5").not());
}

#[test]
fn version_mismatch_aborts() {
  let env = TestEnv::from_fixture("future.json");

  env
    .run(&["--quiet"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("9.9"));
}

#[test]
fn no_applicable_configuration_fails() {
  let env = TestEnv::from_fixture("platforms.json");

  env
    .run(&["--quiet", "--os", "win7"])
    .assert()
    .code(1)
    .stderr(predicate::str::contains("no configuration applies"));
}

#[test]
fn install_then_uninstall_via_marker_file() {
  let env = TestEnv::empty();
  let marker = env.path("app.installed");
  env.write_config(&json!({
    "configurations": [{
      "type": "install",
      "components": [{
        "id": "app",
        "display_name": "App",
        "install": { "full": touch_command(&marker) },
        "uninstall": { "full": remove_command(&marker) },
        "install_checks": [{ "type": "file", "path": marker }]
      }]
    }]
  }));

  env.run(&["--quiet"]).assert().success();
  assert!(marker.is_file());

  env.run(&["--quiet", "--uninstall"]).assert().success();
  assert!(!marker.exists());
}

#[test]
fn control_override_expands_into_command() {
  let env = TestEnv::empty();
  let target = env.path("from-control");
  env.write_config(&json!({
    "configurations": [{
      "type": "install",
      "controls": [{ "type": "edit", "id": "target", "text": "unused" }],
      "components": [{
        "id": "app",
        "install": { "full": touch_command(Path::new("[target]")) },
        "install_checks": [{ "type": "file", "path": target }]
      }]
    }]
  }));

  env
    .run(&["--quiet", "--control", &format!("target={}", target.display())])
    .assert()
    .success();
  assert!(target.is_file());
}

#[test]
fn every_configuration_runs_without_a_terminal() {
  let env = TestEnv::empty();
  let runtime = env.path("runtime.installed");
  let app = env.path("app.installed");
  let configuration = |id: &str, marker: &Path| {
    json!({
      "type": "install",
      "supports_uninstall": false,
      "components": [{
        "id": id,
        "install": { "full": touch_command(marker) },
        "install_checks": [{ "type": "file", "path": marker }]
      }]
    })
  };
  env.write_config(&json!({
    "configurations": [configuration("runtime", &runtime), configuration("app", &app)]
  }));

  env.run(&[]).assert().success().stdout(predicate::str::contains("Setup finished"));
  assert!(runtime.is_file());
  assert!(app.is_file());
}
