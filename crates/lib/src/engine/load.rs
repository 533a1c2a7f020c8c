use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::{Engine, EngineError, EngineState, Host, LanguageSelection};
use crate::config::{ConfigSource, ConfigurationEntry, InstallConfiguration, SetupConfig, load_source};
use crate::consts::{CONFIG_FORMAT_VERSION, MAX_REFERENCE_DEPTH};

impl<H: Host> Engine<H> {
  /// Load the configuration from the explicit path or the embedded source.
  /// Returns it with the directory relative reference paths resolve against.
  pub(super) fn load_setup(&mut self) -> Result<(SetupConfig, PathBuf), EngineError> {
    self.set_state(EngineState::Loading);

    let source = match &self.session.options.config_path {
      Some(path) => {
        if !path.is_file() {
          return Err(EngineError::MissingConfiguration(path.clone()));
        }
        ConfigSource::File(path.clone())
      }
      None => self.host.embedded_configuration().ok_or(EngineError::NoConfiguration)?,
    };

    let base_dir = match &source {
      ConfigSource::File(path) => path.parent().map(Path::to_path_buf).unwrap_or_default(),
      ConfigSource::Inline { .. } => std::env::current_dir().unwrap_or_default(),
    };

    let setup = self.load_checked(&source)?;

    self.session.lcid_type = self.session.options.lcid_type.unwrap_or(setup.lcid_type);
    if let Some(lcid) = self.host.detect_lcid(self.session.lcid_type) {
      self.env.lcid = lcid;
    }
    info!(environment = %self.env, lcid_type = %self.session.lcid_type, "target environment");

    Ok((setup, base_dir))
  }

  /// Load a source and check its format version.
  fn load_checked(&mut self, source: &ConfigSource) -> Result<SetupConfig, EngineError> {
    let setup = load_source(source)?;

    if let Some(version) = &setup.version
      && version != CONFIG_FORMAT_VERSION
    {
      warn!(version = %version, expected = CONFIG_FORMAT_VERSION, source = %source, "configuration version mismatch");
      if self.host.on_version_error(version, &source.to_string()) {
        return Err(EngineError::VersionMismatch {
          version: version.clone(),
          expected: CONFIG_FORMAT_VERSION.to_string(),
        });
      }
    }

    Ok(setup)
  }

  pub(super) fn select_language(&mut self, setup: &SetupConfig) -> LanguageSelection {
    let languages = setup.languages();
    if languages.len() > 1 && setup.show_language_selector && !self.session.is_silent() {
      return self.host.select_language(&languages);
    }
    LanguageSelection::NotSelected
  }

  /// Install configurations that apply, in order, with reference
  /// configurations downloaded and expanded in place.
  pub(super) fn resolve_configurations(
    &mut self,
    entries: &[ConfigurationEntry],
    language: Option<&str>,
    base_dir: &Path,
    depth: usize,
  ) -> Result<Vec<InstallConfiguration>, EngineError> {
    let mut resolved = Vec::new();

    for entry in entries {
      if !self.entry_applies(entry, language)? {
        debug!(language = %entry.language(), "skipping configuration, does not apply");
        continue;
      }

      match entry {
        ConfigurationEntry::Install(config) => resolved.push(config.as_ref().clone()),
        ConfigurationEntry::Reference(reference) => {
          if depth >= MAX_REFERENCE_DEPTH {
            return Err(EngineError::ReferenceDepth(MAX_REFERENCE_DEPTH));
          }

          info!(filename = %reference.filename.display(), "downloading reference configuration");
          if !self.host.run_download(&reference.download) {
            return Err(EngineError::ReferenceDownload(reference.filename.clone()));
          }

          let path = base_dir.join(&reference.filename);
          let nested = self.load_checked(&ConfigSource::File(path.clone()))?;
          let nested_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
          resolved.extend(self.resolve_configurations(&nested.configurations, language, &nested_dir, depth + 1)?);
        }
      }
    }

    Ok(resolved)
  }

  /// With a selected language, entries of other languages are skipped and the
  /// locale filter is not consulted.
  fn entry_applies(&self, entry: &ConfigurationEntry, language: Option<&str>) -> Result<bool, EngineError> {
    match language {
      Some(language) => {
        if !entry.language().is_empty() && entry.language() != language {
          return Ok(false);
        }
        let mut filter = entry.filter().clone();
        filter.lcid_filter.clear();
        Ok(filter.applies(&self.env)?)
      }
      None => Ok(entry.filter().applies(&self.env)?),
    }
  }
}
