//! External command execution.
//!
//! Commands are described by a [`CommandSpec`] and handed to a [`CommandRunner`]. The
//! runner only reports whether the command succeeded; output is not captured.

pub mod cmd;
pub mod types;

pub use cmd::SystemRunner;
pub use types::{CommandSpec, ExecuteError};

/// Something that can run a [`CommandSpec`] to completion.
///
/// [`SystemRunner`] spawns real processes. Tests substitute a recording runner.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
  /// Runs the command and waits for it. A non-zero exit is an error.
  async fn run(&self, spec: &CommandSpec) -> Result<(), ExecuteError>;
}
