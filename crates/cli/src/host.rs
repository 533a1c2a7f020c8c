//! The terminal host: prompts on stderr, real processes, the platform's
//! privilege and reboot facilities and the resume marker in the data
//! directory.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::process::Command;

use bootstrap_lib::component::{ComponentDef, ComponentState, PortableInstallCheck};
use bootstrap_lib::config::{ConfigSource, DownloadDialog, InstallConfiguration};
use bootstrap_lib::consts::BUNDLED_CONFIG_NAME;
use bootstrap_lib::download;
use bootstrap_lib::engine::{
  CommandRequest, CommandRunner, ExecuteError, Frontend, InstallCheck, LanguageSelection, MessageKind, SystemControl,
  SystemError,
};
use bootstrap_lib::platform::lcid::{self, Lcid, LcidType};
use bootstrap_lib::platform::{self, elevation, paths};
use bootstrap_lib::process::ShellRunner;
use bootstrap_lib::resume::{ResumeMarker, ResumeStore};
use bootstrap_lib::session::{Sequence, UiLevel};
use tracing::{debug, error, info, warn};

use crate::output::{self, format_bytes, print_error, print_info, print_success, print_warning, symbols};
use crate::prompts;

pub struct TerminalHost {
  ui_level: UiLevel,
  /// Relative download destinations resolve against this directory.
  base_dir: PathBuf,
  lcid_override: Option<Lcid>,
  program: PathBuf,
  interactive: bool,
  presentations: usize,
  runner: ShellRunner,
  resume: ResumeStore,
}

impl TerminalHost {
  pub fn new(ui_level: UiLevel, base_dir: PathBuf, lcid_override: Option<Lcid>, program: PathBuf) -> Self {
    Self {
      ui_level,
      base_dir,
      lcid_override,
      program,
      interactive: !ui_level.is_silent() && prompts::is_interactive(),
      presentations: 0,
      runner: ShellRunner,
      resume: ResumeStore::default_store(),
    }
  }

  /// Never ask anything, take the defaults.
  pub fn non_interactive(mut self) -> Self {
    self.interactive = false;
    self
  }

  fn ask_components(
    &self,
    sequence: Sequence,
    components: &[ComponentState],
  ) -> anyhow::Result<Option<BTreeSet<String>>> {
    let mut checked: Vec<bool> = components.iter().map(|c| c.checked).collect();
    let toggleable: Vec<usize> = components
      .iter()
      .enumerate()
      .filter(|(_, c)| c.visible && !c.disabled)
      .map(|(i, _)| i)
      .collect();

    loop {
      println!();
      println!("Components to {}:", sequence);
      for (i, component) in components.iter().enumerate() {
        if !component.visible {
          continue;
        }
        let number = toggleable.iter().position(|t| *t == i).map(|n| n + 1);
        let shown = ComponentState {
          checked: checked[i],
          ..component.clone()
        };
        println!("{}", output::component_row(number, &shown));
      }

      let prompt = format!("Numbers to toggle, Enter to {}, q to close:", sequence);
      let Some(input) = prompts::read_line(&prompt)? else {
        return Ok(None);
      };
      if input.eq_ignore_ascii_case("q") {
        return Ok(None);
      }
      if input.is_empty() {
        return Ok(Some(selected(components, &checked)));
      }

      match prompts::parse_numbers(&input, toggleable.len()) {
        Some(numbers) => {
          for n in numbers {
            let i = toggleable[n - 1];
            checked[i] = !checked[i];
          }
        }
        None => print_warning(&format!("Enter numbers between 1 and {}.", toggleable.len())),
      }
    }
  }
}

fn selected(components: &[ComponentState], checked: &[bool]) -> BTreeSet<String> {
  components
    .iter()
    .zip(checked)
    .filter(|(_, checked)| **checked)
    .map(|(c, _)| c.id.clone())
    .collect()
}

impl Frontend for TerminalHost {
  fn embedded_configuration(&self) -> Option<ConfigSource> {
    let path = paths::exe_dir()?.join(BUNDLED_CONFIG_NAME);
    debug!(path = %path.display(), "looking for bundled configuration");
    path.is_file().then_some(ConfigSource::File(path))
  }

  fn select_language(&mut self, languages: &[String]) -> LanguageSelection {
    if !self.interactive {
      return LanguageSelection::NotSelected;
    }
    match prompts::choose("Select a language:", languages) {
      Ok(Some(i)) => LanguageSelection::Selected(languages[i].clone()),
      Ok(None) => LanguageSelection::Cancel,
      Err(err) => {
        warn!(error = %err, "language prompt failed");
        LanguageSelection::NotSelected
      }
    }
  }

  fn on_version_error(&mut self, version: &str, source: &str) -> bool {
    print_warning(&format!(
      "{} was written for configuration version {}, this is {}.",
      source,
      version,
      bootstrap_lib::consts::CONFIG_FORMAT_VERSION
    ));
    !self.confirm("Continue anyway?", false)
  }

  fn show_message(&mut self, kind: MessageKind, text: &str) {
    match kind {
      MessageKind::Info if self.ui_level.is_silent() => info!(message = %text, "message"),
      MessageKind::Info => print_info(text),
      MessageKind::Warning => print_warning(text),
      MessageKind::Error => print_error(text),
    }
  }

  fn confirm(&mut self, text: &str, default: bool) -> bool {
    if !self.interactive {
      return default;
    }
    prompts::confirm(text, default).unwrap_or_else(|err| {
      warn!(error = %err, "prompt failed, using default answer");
      default
    })
  }

  fn begin_configuration(&mut self, config: &InstallConfiguration) {
    self.presentations = 0;
    debug!(caption = %config.dialog_caption, "configuration started");
  }

  fn choose_components(&mut self, sequence: Sequence, components: &[ComponentState]) -> Option<BTreeSet<String>> {
    self.presentations += 1;
    if !self.interactive {
      // without a terminal the evaluated selection runs once per configuration
      if self.presentations > 1 {
        return None;
      }
      return Some(components.iter().filter(|c| c.checked).map(|c| c.id.clone()).collect());
    }

    self.ask_components(sequence, components).unwrap_or_else(|err| {
      error!(error = %err, "component prompt failed");
      None
    })
  }

  fn run_download(&mut self, dialog: &DownloadDialog) -> bool {
    if !self.ui_level.is_silent() && !dialog.caption.is_empty() {
      print_info(&format!("Downloading {}", dialog.caption));
    }

    match download::run_download(dialog, &self.base_dir) {
      Ok(paths) => {
        for path in paths {
          let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
          debug!(path = %path.display(), size = %format_bytes(size), "downloaded");
          if !self.ui_level.is_silent() {
            println!("  {} {} ({})", symbols::ARROW, path.display(), format_bytes(size));
          }
        }
        true
      }
      Err(err) => {
        print_error(&format!("Download failed: {}", err));
        false
      }
    }
  }

  fn hide(&mut self) {
    debug!("hiding while the completion command runs");
  }
}

impl InstallCheck for TerminalHost {
  fn is_installed(&self, component: &ComponentDef) -> bool {
    PortableInstallCheck.is_installed(component)
  }
}

impl CommandRunner for TerminalHost {
  fn execute(&mut self, request: &CommandRequest) -> Result<Option<i32>, ExecuteError> {
    if !self.ui_level.is_silent() {
      println!("{} {}", symbols::ARROW, request.command);
    }
    self.runner.execute(request)
  }
}

impl SystemControl for TerminalHost {
  fn is_elevation_supported(&self) -> bool {
    platform::is_elevation_supported()
  }

  fn is_user_admin(&self) -> bool {
    platform::is_user_admin()
  }

  fn is_elevated(&self) -> bool {
    platform::is_elevated()
  }

  fn detect_lcid(&self, lcid_type: LcidType) -> Option<Lcid> {
    self.lcid_override.or_else(|| lcid::detect(lcid_type))
  }

  fn restart_elevated(&mut self, args: &[String]) -> Result<bool, SystemError> {
    elevation::restart_elevated(&self.program, args).map_err(SystemError::Elevation)
  }

  fn reboot(&mut self) -> Result<(), SystemError> {
    print_warning("Rebooting now.");
    let mut cmd = reboot_command();
    let status = cmd.status().map_err(|e| SystemError::Reboot(e.to_string()))?;
    if !status.success() {
      return Err(SystemError::Reboot(format!("shutdown exited with {}", status)));
    }
    Ok(())
  }

  fn write_resume_marker(&mut self, marker: &ResumeMarker) -> Result<(), SystemError> {
    self.resume.save(marker)?;
    if !self.ui_level.is_silent() {
      print_success(&format!("The setup continues after reboot: {}", marker.command_line.join(" ")));
    }
    Ok(())
  }

  fn clear_resume_marker(&mut self) -> Result<(), SystemError> {
    if self.resume.clear()? {
      debug!(path = %self.resume.path().display(), "cleared resume marker");
    }
    Ok(())
  }
}

#[cfg(windows)]
fn reboot_command() -> Command {
  let mut cmd = Command::new("shutdown");
  cmd.args(["/r", "/t", "0"]);
  cmd
}

#[cfg(not(windows))]
fn reboot_command() -> Command {
  let mut cmd = Command::new("shutdown");
  cmd.args(["-r", "now"]);
  cmd
}
