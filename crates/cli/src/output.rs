//! CLI output formatting utilities.
//!
//! Colored status lines, the component table and human-readable sizes and
//! durations.

use std::time::Duration;

use anyhow::Context;
use bootstrap_lib::component::ComponentState;
use owo_colors::{OwoColorize, Stream};

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
  pub const CHECKED: &str = "[x]";
  pub const UNCHECKED: &str = "[ ]";
}

pub fn format_bytes(bytes: u64) -> String {
  const KB: u64 = 1024;
  const MB: u64 = KB * 1024;
  const GB: u64 = MB * 1024;

  if bytes >= GB {
    format!("{:.1} GB", bytes as f64 / GB as f64)
  } else if bytes >= MB {
    format!("{:.1} MB", bytes as f64 / MB as f64)
  } else if bytes >= KB {
    format!("{:.1} KB", bytes as f64 / KB as f64)
  } else {
    format!("{} B", bytes)
  }
}

pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  let millis = duration.subsec_millis();

  if secs >= 60 {
    let mins = secs / 60;
    let remaining_secs = secs % 60;
    format!("{}m {}s", mins, remaining_secs)
  } else if secs > 0 {
    format!("{}.{:02}s", secs, millis / 10)
  } else {
    format!("{}ms", millis)
  }
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

/// One table row for a component. `number` is shown for rows the user may
/// toggle.
pub fn component_row(number: Option<usize>, component: &ComponentState) -> String {
  let mark = if component.checked {
    symbols::CHECKED
  } else {
    symbols::UNCHECKED
  };
  let number = number.map(|n| format!("{:>3}.", n)).unwrap_or_else(|| "    ".to_string());

  let mut flags = Vec::new();
  if component.required {
    flags.push("required");
  }
  if !component.visible {
    flags.push("hidden");
  }
  let flags = if flags.is_empty() {
    String::new()
  } else {
    format!(" ({})", flags.join(", "))
  };

  format!("{} {} {}{}", number, mark, component.description, flags)
}

pub fn print_components(components: &[ComponentState]) {
  for component in components {
    let row = component_row(None, component);
    if component.disabled {
      println!("{}", row.if_supports_color(Stream::Stdout, |s| s.dimmed()));
    } else {
      println!("{}", row);
    }
  }
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}
