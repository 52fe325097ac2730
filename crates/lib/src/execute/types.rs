//! Types for external command execution.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while running an external command.
#[derive(Debug, Error)]
pub enum ExecuteError {
  /// The program could not be started at all.
  #[error("failed to spawn {program}: {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },

  /// Command exited unsuccessfully. `code` is `None` when killed by a signal.
  #[error("command failed with exit code {code:?}: {cmd}")]
  CmdFailed { cmd: String, code: Option<i32> },
}

/// An external command together with everything it needs to run.
///
/// The child inherits the parent environment; `env` lists the additions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
  pub program: PathBuf,
  pub args: Vec<String>,
  pub cwd: Option<PathBuf>,
  pub env: BTreeMap<String, String>,
}

impl CommandSpec {
  pub fn new(program: impl Into<PathBuf>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: None,
      env: BTreeMap::new(),
    }
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }

  pub fn current_dir(mut self, dir: &Path) -> Self {
    self.cwd = Some(dir.to_path_buf());
    self
  }

  pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.env.insert(key.into(), value.into());
    self
  }

  pub fn envs(mut self, vars: BTreeMap<String, String>) -> Self {
    self.env.extend(vars);
    self
  }

  /// Shell-like rendering for logs. Arguments containing spaces are double-quoted.
  pub fn display(&self) -> String {
    let mut rendered = quote(&self.program.to_string_lossy());
    for arg in &self.args {
      rendered.push(' ');
      rendered.push_str(&quote(arg));
    }
    rendered
  }
}

impl fmt::Display for CommandSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.display())
  }
}

fn quote(s: &str) -> String {
  if s.is_empty() || s.contains(char::is_whitespace) {
    format!("\"{}\"", s)
  } else {
    s.to_string()
  }
}
