//! Line-oriented console used by the interactive menu.

use std::io::{self, BufRead, Write};

use thiserror::Error;

/// Input ended while the session was waiting for an answer.
#[derive(Debug, Error)]
#[error("end of input")]
pub struct EndOfInput;

pub trait Console {
  /// Show `prompt` and read one line without its terminator. `None` at end
  /// of input.
  fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

  fn write_line(&mut self, line: &str) -> io::Result<()>;

  /// Like [`Console::read_line`], but end of input is an [`EndOfInput`]
  /// error.
  fn ask(&mut self, prompt: &str) -> anyhow::Result<String> {
    self.read_line(prompt)?.ok_or_else(|| EndOfInput.into())
  }
}

/// Stdin / stdout.
pub struct StdConsole {
  stdin:  io::StdinLock<'static>,
  stdout: io::Stdout,
}

impl StdConsole {
  pub fn new() -> Self {
    Self { stdin: io::stdin().lock(), stdout: io::stdout() }
  }
}

impl Console for StdConsole {
  fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
    write!(self.stdout, "{prompt}")?;
    self.stdout.flush()?;

    let mut line = String::new();
    if self.stdin.read_line(&mut line)? == 0 {
      return Ok(None);
    }
    Ok(Some(
      line
        .trim_end_matches('\n')
        .trim_end_matches('\r')
        .to_owned(),
    ))
  }

  fn write_line(&mut self, line: &str) -> io::Result<()> {
    writeln!(self.stdout, "{line}")
  }
}

/// Pre-recorded answers; everything written is kept for inspection.
#[cfg(test)]
#[derive(Default)]
pub struct ScriptedConsole {
  answers: std::collections::VecDeque<String>,
  pub output: Vec<String>,
}

#[cfg(test)]
impl ScriptedConsole {
  pub fn new(answers: &[&str]) -> Self {
    Self {
      answers: answers.iter().map(|a| a.to_string()).collect(),
      output:  Vec::new(),
    }
  }

  pub fn printed(&self, needle: &str) -> bool {
    self.output.iter().any(|line| line.contains(needle))
  }
}

#[cfg(test)]
impl Console for ScriptedConsole {
  fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
    self.output.push(prompt.to_owned());
    Ok(self.answers.pop_front())
  }

  fn write_line(&mut self, line: &str) -> io::Result<()> {
    self.output.push(line.to_owned());
    Ok(())
  }
}
