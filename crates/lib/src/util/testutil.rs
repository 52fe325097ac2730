//! Test utilities for multibuild-lib.
//!
//! Cross-platform shell helpers and a [`CommandRunner`] that records what it was asked to
//! run instead of spawning anything.

use std::path::Path;
use std::sync::Mutex;

use crate::execute::{CommandRunner, CommandSpec, ExecuteError};

/// Returns the shell command and args to execute a shell script.
#[cfg(unix)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("/bin/sh", vec!["-c".to_string(), script.to_string()])
}

#[cfg(windows)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), script.to_string()])
}

/// Runner that records every command and pretends to be the toolchain.
///
/// When a command's program ends in `emmake` (the build step), the configured artifact
/// files are written into the command's working directory, mirroring what a real build
/// leaves behind. `fail_on` makes the n-th call (0-based) exit with code 1.
#[derive(Default)]
pub struct RecordingRunner {
  pub calls: Mutex<Vec<CommandSpec>>,
  pub artifacts: Vec<String>,
  pub fail_on: Option<usize>,
}

impl RecordingRunner {
  pub fn producing(artifacts: &[&str]) -> Self {
    Self {
      artifacts: artifacts.iter().map(|s| s.to_string()).collect(),
      ..Default::default()
    }
  }

  pub fn failing_on(mut self, call: usize) -> Self {
    self.fail_on = Some(call);
    self
  }

  pub fn calls(&self) -> Vec<CommandSpec> {
    self.calls.lock().unwrap().clone()
  }
}

impl CommandRunner for RecordingRunner {
  async fn run(&self, spec: &CommandSpec) -> Result<(), ExecuteError> {
    let index = {
      let mut calls = self.calls.lock().unwrap();
      calls.push(spec.clone());
      calls.len() - 1
    };

    if self.fail_on == Some(index) {
      return Err(ExecuteError::CmdFailed {
        cmd: spec.display(),
        code: Some(1),
      });
    }

    let is_build = spec
      .program
      .file_stem()
      .is_some_and(|stem| stem.to_string_lossy() == "emmake");

    if is_build {
      if let Some(cwd) = &spec.cwd {
        for artifact in &self.artifacts {
          let path = cwd.join(artifact);
          if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
          }
          std::fs::write(&path, artifact.as_bytes()).unwrap();
        }
      }
    }

    Ok(())
  }
}

/// Lists the file names directly inside `dir`, sorted.
pub fn file_names(dir: &Path) -> Vec<String> {
  let mut names: Vec<String> = std::fs::read_dir(dir)
    .unwrap()
    .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
    .collect();
  names.sort();
  names
}
