//! Implementation of the `bootstrap resume` command: show or drop the
//! command line stored for the run after a reboot.

use anyhow::{Context, Result};
use bootstrap_lib::resume::ResumeStore;

use crate::output::{print_info, print_stat, print_success};

pub fn cmd_resume(clear: bool) -> Result<()> {
  let store = ResumeStore::default_store();

  if clear {
    if store.clear().context("Failed to clear the resume marker")? {
      print_success("Resume marker cleared.");
    } else {
      print_info("No resume marker.");
    }
    return Ok(());
  }

  match store.load().context("Failed to read the resume marker")? {
    Some(marker) => {
      println!("Pending resume:");
      print_stat("Command", &marker.command_line.join(" "));
      print_stat("Path", &store.path().display().to_string());
    }
    None => print_info("No resume marker."),
  }

  Ok(())
}
