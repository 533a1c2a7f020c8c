//! Plan command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn plan_lists_components() {
  let env = TestEnv::from_fixture("simple.json");

  env
    .plan(&[])
    .assert()
    .success()
    .stdout(predicate::str::contains("Simple Setup"))
    .stdout(predicate::str::contains("[x] Runtime"));
}

#[test]
fn plan_switches_to_uninstall_when_installed() {
  let env = TestEnv::from_fixture("installed.json");

  env
    .plan(&[])
    .assert()
    .success()
    .stdout(predicate::str::contains("Sequence: uninstall"))
    .stdout(predicate::str::contains("[x] Runtime (Installed)"));
}

#[test]
fn plan_picks_configuration_for_os() {
  let env = TestEnv::from_fixture("platforms.json");

  env
    .plan(&["--os", "win10"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Modern Setup"))
    .stdout(predicate::str::contains("Legacy Setup").not());
}

#[test]
fn plan_filters_components_by_locale() {
  let env = TestEnv::from_fixture("platforms.json");

  env
    .plan(&["--os", "winXP", "--lcid", "1031"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Legacy Setup"))
    .stdout(predicate::str::contains("German Language Pack"));

  env
    .plan(&["--os", "winXP", "--lcid", "1033"])
    .assert()
    .success()
    .stdout(predicate::str::contains("German Language Pack").not());
}

#[test]
fn plan_json_output() {
  let env = TestEnv::from_fixture("platforms.json");

  let output = env.plan(&["--os", "win11", "--json"]).output().unwrap();
  assert!(output.status.success());

  let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(value["environment"]["os"], "win11");
  let configs = value["configurations"].as_array().unwrap();
  assert_eq!(configs.len(), 1);
  assert_eq!(configs[0]["caption"], "Modern Setup");
  assert_eq!(configs[0]["sequence"], "install");
  assert_eq!(configs[0]["components"][0]["id"], "modern");
}

#[test]
fn plan_without_applicable_configuration_fails() {
  let env = TestEnv::from_fixture("platforms.json");

  env
    .plan(&["--os", "win7"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("no configuration applies"));
}

#[test]
fn plan_uninstall_of_missing_components() {
  let env = TestEnv::from_fixture("simple.json");

  env
    .plan(&["--uninstall", "--json"])
    .assert()
    .success()
    .stdout(predicate::str::contains("\"all_satisfied\": true"));
}
