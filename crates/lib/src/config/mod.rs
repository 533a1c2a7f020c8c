//! Configuration documents.
//!
//! A configuration file is JSON. The root [`SetupConfig`] lists configuration
//! entries; each entry is either an [`InstallConfiguration`] with its
//! components and controls, or a [`ReferenceConfiguration`] that is
//! downloaded and loaded in its place.

pub mod control;
mod load;
mod types;

use std::path::PathBuf;

use thiserror::Error;

use crate::filter::FilterError;
use crate::session::Sequence;

pub use control::{Control, ResolvedControls, resolve_controls};
pub use load::{ConfigSource, load_source, parse_str};
pub use types::{
  CommandSet, ConfigurationEntry, DownloadDialog, DownloadFile, InstallConfiguration, ReferenceConfiguration,
  SetupConfig,
};

/// Errors in configuration content.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read configuration {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse configuration {name}: {source}")]
  Parse {
    name: String,
    #[source]
    source: serde_json::Error,
  },

  #[error(transparent)]
  Filter(#[from] FilterError),

  #[error("duplicate component id '{0}'")]
  DuplicateComponent(String),

  #[error("invalid {id} value '{value}', should be one of '{checked}' or '{unchecked}'")]
  InvalidControlValue {
    id: String,
    value: String,
    checked: String,
    unchecked: String,
  },

  #[error("configuration supports neither install nor uninstall")]
  NoSequence,

  #[error("configuration doesn't support {0}")]
  SequenceNotSupported(Sequence),
}
