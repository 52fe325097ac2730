//! Build modes.
//!
//! A build mode pairs the optimization flag handed to the compiler with the CMake build
//! type. The flag string doubles as the fragment that keeps build directories and copied
//! artifacts of different modes apart.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::consts::BUILD_DIR_PREFIX;

/// CMake build type of a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BuildType {
  Debug,
  Release,
  MinSizeRel,
}

impl BuildType {
  /// Returns the value passed as `CMAKE_BUILD_TYPE`.
  pub fn as_str(&self) -> &'static str {
    match self {
      BuildType::Debug => "Debug",
      BuildType::Release => "Release",
      BuildType::MinSizeRel => "MinSizeRel",
    }
  }

  pub fn is_debug(&self) -> bool {
    matches!(self, BuildType::Debug)
  }
}

impl fmt::Display for BuildType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// One (optimization flag, build type) configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BuildMode {
  pub flag: &'static str,
  pub build_type: BuildType,
}

/// Every mode, in the order they are built.
pub const MODES: [BuildMode; 4] = [
  BuildMode::new("", BuildType::Debug),
  BuildMode::new("-O2", BuildType::Release),
  BuildMode::new("-O3", BuildType::Release),
  BuildMode::new("-Oz", BuildType::MinSizeRel),
];

impl BuildMode {
  pub const fn new(flag: &'static str, build_type: BuildType) -> Self {
    Self { flag, build_type }
  }

  /// Short human name: `debug` for the unoptimized mode, otherwise the flag without its dash.
  pub fn label(&self) -> &'static str {
    if self.flag.is_empty() {
      "debug"
    } else {
      self.flag.trim_start_matches('-')
    }
  }

  /// Looks up a mode in [`MODES`] by its label (case-insensitive).
  pub fn parse(label: &str) -> Option<Self> {
    MODES.into_iter().find(|mode| mode.label().eq_ignore_ascii_case(label))
  }

  /// Name of this mode's build directory.
  pub fn dir_name(&self) -> String {
    format!("{}{}", BUILD_DIR_PREFIX, self.flag)
  }

  pub fn build_dir(&self, build_root: &Path) -> PathBuf {
    build_root.join(self.dir_name())
  }

  /// Destination file name for an artifact: the flag is spliced in before the extension.
  ///
  /// `PhysX3.bc` becomes `PhysX3-O2.bc`. Names without an extension get the flag appended.
  pub fn artifact_name(&self, file_name: &str) -> String {
    match file_name.rsplit_once('.') {
      Some((stem, ext)) if !stem.is_empty() => format!("{}{}.{}", stem, self.flag, ext),
      _ => format!("{}{}", file_name, self.flag),
    }
  }
}

impl fmt::Display for BuildMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ({})", self.label(), self.build_type)
  }
}
