//! Spawning real processes.

use tokio::process::Command;
use tracing::{debug, info};

use super::CommandRunner;
use super::types::{CommandSpec, ExecuteError};

/// Runs commands as child processes with inherited stdio.
///
/// The toolchain's own output streams straight to the console. Each call blocks (awaits)
/// until the child exits; there is no timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
  async fn run(&self, spec: &CommandSpec) -> Result<(), ExecuteError> {
    info!(cmd = %spec, "executing command");

    let mut command = Command::new(&spec.program);
    command.args(&spec.args).envs(&spec.env);

    if let Some(cwd) = &spec.cwd {
      command.current_dir(cwd);
    }

    debug!(cwd = ?spec.cwd, env = ?spec.env, "spawning process");

    let status = command.status().await.map_err(|source| ExecuteError::Spawn {
      program: spec.program.to_string_lossy().into_owned(),
      source,
    })?;

    if !status.success() {
      return Err(ExecuteError::CmdFailed {
        cmd: spec.to_string(),
        code: status.code(),
      });
    }

    Ok(())
  }
}
