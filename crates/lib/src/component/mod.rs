//! The component model: declarations, install checks and evaluated state.

pub mod check;
mod types;

pub use check::{CheckMode, InstallCheckDef, PortableInstallCheck};
pub use types::{ComponentDef, ComponentState, ExitDisposition};
