//! The per-mode build loop.
//!
//! Modes run strictly one after another. For each one the build directory is prepared,
//! the toolchain configures and builds into it, and the produced artifacts are copied to
//! the output directory. The first failure ends the run; whatever earlier modes copied
//! stays where it is.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::artifacts::{ArtifactError, ClaimedDestinations, CopiedArtifact, collect_artifacts};
use crate::config::BuildConfig;
use crate::execute::{CommandRunner, ExecuteError};
use crate::mode::{BuildMode, BuildType};
use crate::toolchain::{build_command, configure_command};

/// Errors that end a build run.
#[derive(Debug, Error)]
pub enum BuildError {
  #[error("{step} failed for mode {mode}: {source}")]
  Command {
    mode: &'static str,
    step: &'static str,
    #[source]
    source: ExecuteError,
  },

  #[error("{action} {path} (mode {mode}): {source}")]
  Io {
    mode: &'static str,
    action: &'static str,
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("{first} and {second} would both be copied to {dest} (mode {mode})")]
  DuplicateArtifact {
    mode: &'static str,
    dest: PathBuf,
    first: PathBuf,
    second: PathBuf,
  },
}

/// Options controlling a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
  /// Remove existing build directories before building into them.
  pub rebuild: bool,
  /// Log the commands that would run without touching the filesystem or spawning anything.
  pub dry_run: bool,
}

/// What happened for one mode.
#[derive(Debug, Clone, Serialize)]
pub struct ModeReport {
  pub mode: &'static str,
  pub build_type: BuildType,
  pub build_dir: PathBuf,
  pub commands: Vec<String>,
  pub artifacts: Vec<CopiedArtifact>,
  pub elapsed_ms: u64,
}

impl ModeReport {
  pub fn elapsed(&self) -> Duration {
    Duration::from_millis(self.elapsed_ms)
  }
}

/// Outcome of a complete run.
#[derive(Debug, Clone, Serialize)]
pub struct BuildSummary {
  pub output_dir: PathBuf,
  pub dry_run: bool,
  pub modes: Vec<ModeReport>,
}

impl BuildSummary {
  pub fn artifact_count(&self) -> usize {
    self.modes.iter().map(|m| m.artifacts.len()).sum()
  }

  pub fn total_bytes(&self) -> u64 {
    self.modes.iter().flat_map(|m| &m.artifacts).map(|a| a.bytes).sum()
  }
}

/// Builds every mode in `modes`, in order.
pub async fn run<R: CommandRunner>(
  config: &BuildConfig,
  runner: &R,
  modes: &[BuildMode],
  options: &RunOptions,
) -> Result<BuildSummary, BuildError> {
  info!(
    modes = modes.len(),
    rebuild = options.rebuild,
    dry_run = options.dry_run,
    "starting build run"
  );

  let mut claimed = ClaimedDestinations::default();
  let mut reports = Vec::with_capacity(modes.len());
  for mode in modes {
    reports.push(build_mode(config, runner, mode, options, &mut claimed).await?);
  }

  let summary = BuildSummary {
    output_dir: config.output_dir.clone(),
    dry_run: options.dry_run,
    modes: reports,
  };

  info!(
    artifacts = summary.artifact_count(),
    output = %summary.output_dir.display(),
    "build run complete"
  );

  Ok(summary)
}

async fn build_mode<R: CommandRunner>(
  config: &BuildConfig,
  runner: &R,
  mode: &BuildMode,
  options: &RunOptions,
  claimed: &mut ClaimedDestinations,
) -> Result<ModeReport, BuildError> {
  let started = Instant::now();
  let label = mode.label();
  let build_dir = mode.build_dir(&config.build_root);
  let configure = configure_command(config, mode);
  let build = build_command(config, mode);

  info!(mode = %mode, dir = %build_dir.display(), "building mode");

  let mut report = ModeReport {
    mode: label,
    build_type: mode.build_type,
    build_dir: build_dir.clone(),
    commands: vec![configure.display(), build.display()],
    artifacts: Vec::new(),
    elapsed_ms: 0,
  };

  if options.dry_run {
    for cmd in [&configure, &build] {
      info!(mode = label, cmd = %cmd, "would run");
    }
    return Ok(report);
  }

  prepare_build_dir(mode, &build_dir, options.rebuild)?;

  runner
    .run(&configure)
    .await
    .map_err(|source| BuildError::Command {
      mode: label,
      step: "configure",
      source,
    })?;

  runner.run(&build).await.map_err(|source| BuildError::Command {
    mode: label,
    step: "build",
    source,
  })?;

  report.artifacts =
    collect_artifacts(mode, &build_dir, &config.output_dir, claimed).map_err(|err| match err {
      ArtifactError::Duplicate { dest, first, second } => BuildError::DuplicateArtifact {
        mode: label,
        dest,
        first,
        second,
      },
      ArtifactError::Io(source) => BuildError::Io {
        mode: label,
        action: "Failed to collect artifacts from",
        path: build_dir.clone(),
        source,
      },
    })?;

  if report.artifacts.is_empty() {
    warn!(mode = label, dir = %build_dir.display(), "build produced no artifacts");
  }

  report.elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
  info!(mode = label, artifacts = report.artifacts.len(), "mode complete");

  Ok(report)
}

/// Purges the build directory when rebuilding, then makes sure it exists.
fn prepare_build_dir(mode: &BuildMode, build_dir: &Path, rebuild: bool) -> Result<(), BuildError> {
  let io_err = |action: &'static str| {
    let path = build_dir.to_path_buf();
    move |source: io::Error| BuildError::Io {
      mode: mode.label(),
      action,
      path,
      source,
    }
  };

  if rebuild && build_dir.exists() {
    warn!(dir = %build_dir.display(), "removing build directory for rebuild");
    std::fs::remove_dir_all(build_dir).map_err(io_err("Failed to remove"))?;
  }

  if !build_dir.exists() {
    debug!(dir = %build_dir.display(), "creating build directory");
    std::fs::create_dir_all(build_dir).map_err(io_err("Failed to create"))?;
  }

  Ok(())
}
