//! Build configuration.
//!
//! Everything the orchestrator reads from the process environment is captured here once,
//! before any work starts. Child processes receive their extra variables from
//! [`BuildConfig::child_env`] instead of the parent environment being modified.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::consts::{BUILD_ROOT_ENV, DEFAULT_OUTPUT_SUBDIR, OUTPUT_DIR_ENV, SOURCE_ROOT_ENV, TOOLCHAIN_ENV};
use crate::util::path::{absolutize, to_forward_slashes};

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("{var} is not set; point it at the root of the Emscripten toolchain")]
  MissingToolchain { var: &'static str },

  #[error("Failed to determine current directory: {0}")]
  CurrentDir(#[source] io::Error),
}

/// Locations of the sibling source roots, relative to the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLayout {
  pub physx_root: PathBuf,
  pub pxshared_root: PathBuf,
  pub nvsimd_include: PathBuf,
  pub nvtoolsext_include: PathBuf,
  /// Directory holding the top-level CMakeLists.txt for the HTML5 target.
  pub cmake_project: PathBuf,
  pub cmake_modules: PathBuf,
}

impl Default for SourceLayout {
  fn default() -> Self {
    Self {
      physx_root: PathBuf::from("PhysX_3.4"),
      pxshared_root: PathBuf::from("PxShared"),
      nvsimd_include: PathBuf::from("PxShared/src/NvSimd"),
      nvtoolsext_include: PathBuf::from("PhysX_3.4/externals/nvToolsExt/1/include"),
      cmake_project: PathBuf::from("PhysX_3.4/Source/compiler/cmake/html5"),
      cmake_modules: PathBuf::from("Externals/CMakeModules"),
    }
  }
}

/// Values supplied on the command line. They win over the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
  pub source_root: Option<PathBuf>,
  pub build_root: Option<PathBuf>,
  pub output_dir: Option<PathBuf>,
  pub verbose: bool,
}

#[derive(Debug, Clone)]
pub struct BuildConfig {
  pub toolchain_root: PathBuf,
  pub source_root: PathBuf,
  pub layout: SourceLayout,
  /// Parent of the per-mode build directories.
  pub build_root: PathBuf,
  pub output_dir: PathBuf,
  /// Ask the build driver for full command lines.
  pub verbose: bool,
}

impl BuildConfig {
  /// Resolves the configuration from overrides and the process environment.
  ///
  /// Fails with [`ConfigError::MissingToolchain`] when `EMSCRIPTEN` is unset or empty.
  /// Nothing on disk is touched here.
  pub fn from_env(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
    let toolchain_root = match std::env::var_os(TOOLCHAIN_ENV) {
      Some(value) if !value.is_empty() => PathBuf::from(value),
      _ => return Err(ConfigError::MissingToolchain { var: TOOLCHAIN_ENV }),
    };

    let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;

    let source_root = overrides
      .source_root
      .or_else(|| env_path(SOURCE_ROOT_ENV))
      .map(|p| absolutize(&cwd, &p))
      .unwrap_or_else(|| cwd.clone());

    let build_root = overrides
      .build_root
      .or_else(|| env_path(BUILD_ROOT_ENV))
      .map(|p| absolutize(&cwd, &p))
      .unwrap_or_else(|| source_root.clone());

    let output_dir = overrides
      .output_dir
      .or_else(|| env_path(OUTPUT_DIR_ENV))
      .map(|p| absolutize(&cwd, &p))
      .unwrap_or_else(|| source_root.join(DEFAULT_OUTPUT_SUBDIR));

    let config = Self {
      toolchain_root: absolutize(&cwd, &toolchain_root),
      source_root,
      layout: SourceLayout::default(),
      build_root,
      output_dir,
      verbose: overrides.verbose,
    };

    debug!(
      toolchain = %config.toolchain_root.display(),
      source_root = %config.source_root.display(),
      build_root = %config.build_root.display(),
      output_dir = %config.output_dir.display(),
      "resolved build configuration"
    );

    Ok(config)
  }

  /// Absolute path of a location inside the source root.
  pub fn source_path(&self, relative: &Path) -> PathBuf {
    self.source_root.join(relative)
  }

  /// Variables added to the environment of every toolchain process.
  pub fn child_env(&self) -> BTreeMap<String, String> {
    BTreeMap::from([
      ("GW_DEPS_ROOT".to_string(), to_forward_slashes(&self.source_root)),
      (
        "CMAKE_MODULE_PATH".to_string(),
        to_forward_slashes(&self.source_path(&self.layout.cmake_modules)),
      ),
    ])
  }
}

fn env_path(var: &str) -> Option<PathBuf> {
  std::env::var_os(var).filter(|v| !v.is_empty()).map(PathBuf::from)
}
