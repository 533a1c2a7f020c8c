use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use super::ConfigError;
use super::types::{ConfigurationEntry, SetupConfig};

/// Where a configuration document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
  File(PathBuf),
  /// Content already in memory, `name` is used in messages.
  Inline { name: String, content: String },
}

impl fmt::Display for ConfigSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigSource::File(path) => write!(f, "{}", path.display()),
      ConfigSource::Inline { name, .. } => write!(f, "{}", name),
    }
  }
}

/// Read and parse a configuration.
pub fn load_source(source: &ConfigSource) -> Result<SetupConfig, ConfigError> {
  match source {
    ConfigSource::File(path) => {
      info!(path = %path.display(), "loading configuration");
      let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
      })?;
      parse_str(&content, &path.display().to_string())
    }
    ConfigSource::Inline { name, content } => {
      info!(name = %name, "loading embedded configuration");
      parse_str(content, name)
    }
  }
}

/// Parse a configuration document and check its structure.
pub fn parse_str(content: &str, name: &str) -> Result<SetupConfig, ConfigError> {
  let config: SetupConfig = serde_json::from_str(content).map_err(|source| ConfigError::Parse {
    name: name.to_string(),
    source,
  })?;

  for entry in &config.configurations {
    if let ConfigurationEntry::Install(install) = entry {
      let mut seen = BTreeSet::new();
      for component in &install.components {
        if !seen.insert(component.id.as_str()) {
          return Err(ConfigError::DuplicateComponent(component.id.clone()));
        }
      }
    }
  }

  debug!(
    name = %name,
    version = ?config.version,
    configurations = config.configurations.len(),
    "parsed configuration"
  );
  Ok(config)
}
