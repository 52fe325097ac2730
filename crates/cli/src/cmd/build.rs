//! Implementation of the default `multibuild` command.
//!
//! Resolves the configuration, then builds each selected mode through the toolchain and
//! prints a summary of the copied artifacts.

use anyhow::{Context, Result};
use tracing::debug;

use multibuild_lib::orchestrate::{self, RunOptions};
use multibuild_lib::{BuildConfig, BuildMode, ConfigOverrides, MODES, SystemRunner};

use crate::output::{OutputFormat, print_json, print_run_header, print_summary};

/// Modes to build: all of them, or the requested subset in declared order.
pub fn select_modes(only: &[BuildMode]) -> Vec<BuildMode> {
  MODES
    .into_iter()
    .filter(|mode| only.is_empty() || only.contains(mode))
    .collect()
}

/// Execute a build run.
///
/// Configuration errors surface before anything is created on disk. Any toolchain failure
/// aborts the remaining modes.
pub fn cmd_build(overrides: ConfigOverrides, only: &[BuildMode], options: RunOptions, format: OutputFormat) -> Result<()> {
  let config = BuildConfig::from_env(overrides)?;
  let modes = select_modes(only);

  if !format.is_json() {
    print_run_header(modes.len(), &config.output_dir);
  }

  let rt = tokio::runtime::Builder::new_current_thread()
    .enable_all()
    .build()
    .context("Failed to create async runtime")?;

  let summary = rt
    .block_on(orchestrate::run(&config, &SystemRunner, &modes, &options))
    .context("Build failed")?;

  debug!(modes = summary.modes.len(), "run finished");

  if format.is_json() {
    print_json(&summary)?;
  } else {
    print_summary(&summary);
  }

  Ok(())
}
