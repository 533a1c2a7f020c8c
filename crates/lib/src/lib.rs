//! bootstrap-lib: the engine behind the `bootstrap` installer.
//!
//! A configuration describes install configurations, each a list of
//! components with commands and install checks. The [`engine::Engine`]
//! picks the configurations that apply to this machine, evaluates which
//! components are present and runs the install or uninstall sequence:
//! - `config`: typed configuration documents and user controls
//! - `filter`: operating system, architecture and locale filters
//! - `component`: component definitions and install checks
//! - `engine`: the sequence state machine and its host traits
//! - `resume`: the marker that continues a run after a reboot

pub mod component;
pub mod config;
pub mod consts;
pub mod download;
pub mod engine;
pub mod filter;
pub mod platform;
pub mod process;
pub mod resume;
pub mod session;
pub mod util;
