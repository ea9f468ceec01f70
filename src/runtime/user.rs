//! User interaction operations (numbered selection prompts).

use anyhow::{Result, bail};

use super::RealRuntime;

use std::io::{self, BufRead, Write};

/// One line of a selection prompt.
///
/// Entries that are not selectable are printed as-is and act as headings or
/// separators.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub label: String,
    pub selectable: bool,
}

impl Choice {
    pub fn option(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            selectable: true,
        }
    }

    pub fn heading(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            selectable: false,
        }
    }
}

/// Core, testable implementation that reads from any BufRead and writes to any Write.
/// Selectable entries are numbered from 1; the user is asked again on invalid input.
pub(crate) fn select_with_io<R: BufRead, W: Write>(
    prompt: &str,
    choices: &[Choice],
    input: &mut R,
    output: &mut W,
) -> Result<usize> {
    let selectable: Vec<usize> = choices
        .iter()
        .enumerate()
        .filter(|(_, c)| c.selectable)
        .map(|(i, _)| i)
        .collect();

    if selectable.is_empty() {
        bail!("Nothing to select");
    }

    writeln!(output, "{}", prompt)?;
    let mut number = 0;
    for choice in choices {
        if choice.selectable {
            number += 1;
            writeln!(output, "  {:>2}) {}", number, choice.label)?;
        } else {
            writeln!(output, "      {}", choice.label)?;
        }
    }

    loop {
        write!(output, "Enter a number [1-{}]: ", selectable.len())?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("No selection made");
        }

        match line.trim().parse::<usize>() {
            Ok(n) if (1..=selectable.len()).contains(&n) => return Ok(selectable[n - 1]),
            _ => writeln!(output, "Invalid choice: {}", line.trim())?,
        }
    }
}

impl RealRuntime {
    pub(crate) fn select_impl(&self, prompt: &str, choices: &[Choice]) -> Result<usize> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut stdin_lock = stdin.lock();
        select_with_io(prompt, choices, &mut stdin_lock, &mut stdout)
    }
}
