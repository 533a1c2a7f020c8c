use std::io::{self, IsTerminal, Write};

use anyhow::Result;

/// Whether questions can be asked on this terminal.
pub fn is_interactive() -> bool {
  io::stdin().is_terminal() && io::stderr().is_terminal()
}

/// Print `prompt` and read one trimmed line. `None` at end of input.
pub fn read_line(prompt: &str) -> Result<Option<String>> {
  write!(io::stderr(), "{} ", prompt)?;
  io::stderr().flush()?;

  let mut input = String::new();
  if io::stdin().read_line(&mut input)? == 0 {
    return Ok(None);
  }
  Ok(Some(input.trim().to_string()))
}

/// Yes/No question. An empty answer takes `default`.
pub fn confirm(message: &str, default: bool) -> Result<bool> {
  if !is_interactive() {
    return Ok(default);
  }

  let hint = if default { "[Y/n]" } else { "[y/N]" };
  let Some(input) = read_line(&format!("{} {}", message, hint))? else {
    return Ok(default);
  };

  Ok(parse_answer(&input).unwrap_or(default))
}

fn parse_answer(input: &str) -> Option<bool> {
  match input.to_ascii_lowercase().as_str() {
    "y" | "yes" => Some(true),
    "n" | "no" => Some(false),
    _ => None,
  }
}

/// Pick one of `items` by number. `None` when the user quits.
pub fn choose(title: &str, items: &[String]) -> Result<Option<usize>> {
  eprintln!("{}", title);
  for (i, item) in items.iter().enumerate() {
    eprintln!("  {}. {}", i + 1, item);
  }

  loop {
    let Some(input) = read_line("Number (q to quit):")? else {
      return Ok(None);
    };
    if input.eq_ignore_ascii_case("q") {
      return Ok(None);
    }
    match input.parse::<usize>() {
      Ok(n) if (1..=items.len()).contains(&n) => return Ok(Some(n - 1)),
      _ => eprintln!("Enter a number between 1 and {}.", items.len()),
    }
  }
}

/// Parse a whitespace or comma separated list of 1-based numbers, each at
/// most `max`.
pub fn parse_numbers(input: &str, max: usize) -> Option<Vec<usize>> {
  input
    .split(|c: char| c == ',' || c.is_whitespace())
    .filter(|t| !t.is_empty())
    .map(|t| t.parse::<usize>().ok().filter(|n| (1..=max).contains(n)))
    .collect()
}
