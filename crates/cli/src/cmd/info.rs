use anyhow::Result;
use bootstrap_lib::platform::arch::ProcessorArchitecture;
use bootstrap_lib::platform::lcid::{self, Lcid, LcidType};
use bootstrap_lib::platform::os::{self, OperatingSystem};
use bootstrap_lib::platform::{self, paths};
use bootstrap_lib::resume::ResumeStore;
use serde_json::json;

use crate::output::{print_json, print_stat};

const LCID_TYPES: [LcidType; 5] = [
  LcidType::UserExe,
  LcidType::System,
  LcidType::User,
  LcidType::MuiSystem,
  LcidType::MuiUser,
];

fn os_description(os: Option<OperatingSystem>) -> String {
  match os {
    Some(os) => format!("{} ({}, family {})", os.name(), os.code(), os.family().code()),
    None => "not a recognised Windows release".to_string(),
  }
}

fn lcid_description(lcid: Option<Lcid>) -> String {
  lcid.map(|l| l.to_string()).unwrap_or_else(|| "unknown".to_string())
}

pub fn cmd_info(as_json: bool) -> Result<()> {
  let os = os::detect();
  let arch = ProcessorArchitecture::current();
  let store = ResumeStore::default_store();

  if as_json {
    let lcids: serde_json::Map<String, serde_json::Value> = LCID_TYPES
      .iter()
      .map(|t| (t.as_str().to_string(), json!(lcid::detect(*t))))
      .collect();
    return print_json(&json!({
      "os": os.map(|os| os.code()),
      "os_name": os.map(|os| os.name()),
      "arch": arch.map(|a| a.as_str()),
      "lcid": lcids,
      "elevation_supported": platform::is_elevation_supported(),
      "user_admin": platform::is_user_admin(),
      "elevated": platform::is_elevated(),
      "data_dir": paths::data_dir(),
      "resume_marker": store.path(),
    }));
  }

  println!("System:");
  print_stat("OS", &os_description(os));
  print_stat("Architecture", arch.map(|a| a.as_str()).unwrap_or("unknown"));
  for lcid_type in LCID_TYPES {
    print_stat(&format!("LCID ({})", lcid_type), &lcid_description(lcid::detect(lcid_type)));
  }
  println!("Privileges:");
  print_stat("Elevation supported", &platform::is_elevation_supported().to_string());
  print_stat("Administrator", &platform::is_user_admin().to_string());
  print_stat("Elevated", &platform::is_elevated().to_string());
  println!("Paths:");
  print_stat("Data", &paths::data_dir().display().to_string());
  print_stat("Resume marker", &store.path().display().to_string());

  Ok(())
}
