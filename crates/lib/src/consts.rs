//! Shared constants.

/// Application name, used for data directories.
pub const APP_NAME: &str = "bootstrap";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "BOOTSTRAP_DATA_DIR";

/// Configuration format version understood by this engine.
pub const CONFIG_FORMAT_VERSION: &str = "1.0";

/// File name of the configuration bundled next to the executable.
pub const BUNDLED_CONFIG_NAME: &str = "configuration.json";

/// Exit code recorded when a reboot is required to finish (`ERROR_SUCCESS_REBOOT_REQUIRED`).
pub const EXIT_REBOOT_REQUIRED: i32 = 3010;

/// Exit code recorded when the run handed over to an elevated instance.
pub const EXIT_ELEVATED_RESTART: i32 = -3;

/// Exit code recorded for a component that could not be started or downloaded.
pub const EXIT_COMPONENT_FAILED: i32 = -1;

/// Maximum nesting of reference configurations.
pub const MAX_REFERENCE_DEPTH: usize = 10;

/// Flag added when restarting elevated so the new instance starts at once.
pub const AUTOSTART_FLAG: &str = "--autostart";

/// Flag added to the resume command line.
pub const RESUME_FLAG: &str = "--reboot";
