use std::collections::BTreeMap;

use bootstrap_lib::config::{ConfigError, ConfigurationEntry, parse_str, resolve_controls};
use bootstrap_lib::platform::Environment;
use bootstrap_lib::platform::arch::ProcessorArchitecture;
use bootstrap_lib::platform::os::OperatingSystem;
use bootstrap_lib::session::{Sequence, UiLevel};

const SETUP: &str = r#"{
  "version": "1.0",
  "lcid_type": "system",
  "configurations": [
    {
      "type": "install",
      "os_filter_min": "win7",
      "processor_architecture_filter": "x64,arm64",
      "dialog_caption": "Example Setup",
      "auto_start": true,
      "controls": [
        { "type": "label", "text": "Pick a folder" },
        { "type": "browse", "id": "dir", "text": "C:\\Example" },
        { "type": "checkbox", "id": "shortcut", "checked_value": "yes", "unchecked_value": "no" }
      ],
      "components": [
        {
          "id": "runtime",
          "display_name": "Example Runtime",
          "install": { "full": "runtime.exe", "silent": "runtime.exe /q" },
          "reboot_exit_codes": [3010, 1641],
          "install_checks": [{ "type": "env", "name": "EXAMPLE_RUNTIME" }]
        },
        {
          "id": "app",
          "install": { "full": "app.msi INSTALLDIR=[dir] SHORTCUT=[shortcut]" },
          "required_install": false,
          "install_check_mode": "any",
          "install_checks": [
            { "type": "file", "path": "/opt/example/app" },
            { "type": "command", "command": "example --version" }
          ]
        }
      ]
    },
    {
      "type": "reference",
      "lcid_filter": "1031",
      "filename": "de.json",
      "download": { "caption": "German", "files": [{ "source_url": "https://example.com/de.json", "destination_path": "de.json" }] }
    }
  ]
}"#;

fn windows10() -> Environment {
  Environment::new(Some(OperatingSystem::Win10), Some(ProcessorArchitecture::X64), 1033)
}

#[test]
fn parses_full_document() {
  let setup = parse_str(SETUP, "setup.json").unwrap();
  assert_eq!(setup.version.as_deref(), Some("1.0"));
  assert_eq!(setup.configurations.len(), 2);

  let ConfigurationEntry::Install(config) = &setup.configurations[0] else {
    panic!("expected an install configuration");
  };
  assert!(config.auto_start);
  assert_eq!(config.controls.len(), 3);
  assert_eq!(config.components[0].name(), "Example Runtime");
  assert_eq!(config.components[0].install.for_level(UiLevel::Silent), "runtime.exe /q");
  assert_eq!(config.components[0].install.for_level(UiLevel::Basic), "runtime.exe");
  assert!(config.components[1].supports(Sequence::Uninstall));
  assert!(!config.components[1].is_required(Sequence::Install));

  assert!(matches!(&setup.configurations[1], ConfigurationEntry::Reference(r) if r.filename.ends_with("de.json")));
}

#[test]
fn filters_select_entries_for_the_machine() {
  let setup = parse_str(SETUP, "setup.json").unwrap();
  let env = windows10();

  assert!(setup.configurations[0].filter().applies(&env).unwrap());
  assert!(!setup.configurations[1].filter().applies(&env).unwrap());

  let german_xp = Environment::new(Some(OperatingSystem::WinXp), Some(ProcessorArchitecture::X86), 1031);
  assert!(!setup.configurations[0].filter().applies(&german_xp).unwrap());
  assert!(setup.configurations[1].filter().applies(&german_xp).unwrap());
}

#[test]
fn controls_resolve_with_overrides() {
  let setup = parse_str(SETUP, "setup.json").unwrap();
  let ConfigurationEntry::Install(config) = &setup.configurations[0] else {
    panic!("expected an install configuration");
  };

  let mut overrides = BTreeMap::new();
  overrides.insert("shortcut".to_string(), "yes".to_string());
  let controls = resolve_controls(&config.controls, &overrides, &windows10()).unwrap();

  assert_eq!(
    controls.expand(&config.components[1].install.full),
    "app.msi INSTALLDIR=C:\\Example SHORTCUT=yes"
  );

  overrides.insert("shortcut".to_string(), "maybe".to_string());
  assert!(matches!(
    resolve_controls(&config.controls, &overrides, &windows10()),
    Err(ConfigError::InvalidControlValue { .. })
  ));
}

#[test]
fn rejects_malformed_documents() {
  assert!(matches!(
    parse_str("{ not json", "broken.json"),
    Err(ConfigError::Parse { .. })
  ));

  let duplicate = r#"{
    "configurations": [{
      "type": "install",
      "components": [{ "id": "a" }, { "id": "a" }]
    }]
  }"#;
  assert!(matches!(
    parse_str(duplicate, "dup.json"),
    Err(ConfigError::DuplicateComponent(id)) if id == "a"
  ));
}

#[test]
fn conflicting_filter_is_reported() {
  let conflicting = r#"{
    "configurations": [{ "type": "install", "os_filter": "win10", "os_filter_min": "win7" }]
  }"#;
  let setup = parse_str(conflicting, "conflict.json").unwrap();
  assert!(setup.configurations[0].filter().applies(&windows10()).is_err());
}
