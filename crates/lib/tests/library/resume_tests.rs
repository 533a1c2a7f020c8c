use bootstrap_lib::resume::{ResumeMarker, ResumeStore};
use serial_test::serial;
use tempfile::TempDir;

#[test]
fn marker_survives_a_new_store() {
  let dir = TempDir::new().unwrap();
  let marker = ResumeMarker {
    command_line: vec!["bootstrap".to_string(), "run".to_string(), "--reboot".to_string()],
  };

  ResumeStore::new(dir.path().join("state")).save(&marker).unwrap();

  let store = ResumeStore::new(dir.path().join("state"));
  assert_eq!(store.load().unwrap(), Some(marker));
  assert!(store.clear().unwrap());
  assert_eq!(store.load().unwrap(), None);
  assert!(!store.clear().unwrap());
}

#[test]
#[serial]
fn default_store_follows_data_dir_override() {
  let dir = TempDir::new().unwrap();
  temp_env::with_var(
    bootstrap_lib::consts::DATA_DIR_ENV,
    Some(dir.path().as_os_str()),
    || {
      let store = ResumeStore::default_store();
      assert!(store.path().starts_with(dir.path()));
    },
  );
}
