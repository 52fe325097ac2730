//! multibuild-lib: core types and logic for multibuild
//!
//! This crate drives a native source tree through an Emscripten-style toolchain once per
//! build mode and gathers the resulting objects into one place:
//! - `BuildMode`: one (optimization flag, build type) configuration
//! - `BuildConfig`: toolchain and directory locations resolved from the environment
//! - `CommandSpec` / `CommandRunner`: explicit process spawning
//! - `orchestrate::run`: the sequential per-mode build loop

pub mod artifacts;
pub mod config;
pub mod consts;
pub mod execute;
pub mod mode;
pub mod orchestrate;
pub mod toolchain;
pub mod util;

pub use config::{BuildConfig, ConfigError, ConfigOverrides, SourceLayout};
pub use execute::{CommandRunner, CommandSpec, ExecuteError, SystemRunner};
pub use mode::{BuildMode, BuildType, MODES};
pub use orchestrate::{BuildError, BuildSummary, ModeReport, RunOptions};
