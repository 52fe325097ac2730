//! Composes the toolchain invocations for a build mode.
//!
//! Two commands are run per mode, both from inside the mode's build directory:
//! `emcmake cmake <project> ...` to configure and `emmake make` to build.

use std::path::{Path, PathBuf};

use crate::config::BuildConfig;
use crate::consts::{CMAKE_GENERATOR, TARGET_PLATFORM};
use crate::execute::CommandSpec;
use crate::mode::BuildMode;
use crate::util::path::to_forward_slashes;

/// Warnings the physics sources trip under clang that are not worth fixing in vendored code.
const SUPPRESSED_WARNINGS: &[&str] = &[
  "-Wno-warn-absolute-paths",
  "-Wno-reorder",
  "-Wno-c++11-narrowing",
  "-Wno-invalid-offsetof",
  "-Wno-unused-private-field",
];

#[cfg(windows)]
const WRAPPER_EXT: &str = ".bat";
#[cfg(not(windows))]
const WRAPPER_EXT: &str = "";

/// Path of a toolchain wrapper script such as `emcmake`.
pub fn wrapper(toolchain_root: &Path, name: &str) -> PathBuf {
  toolchain_root.join(format!("{}{}", name, WRAPPER_EXT))
}

/// Compiler flags for a mode: optimization flag, warning suppressions, then the
/// debug/release define.
pub fn compiler_flags(mode: &BuildMode) -> String {
  let mut flags: Vec<&str> = Vec::with_capacity(SUPPRESSED_WARNINGS.len() + 2);
  if !mode.flag.is_empty() {
    flags.push(mode.flag);
  }
  flags.extend_from_slice(SUPPRESSED_WARNINGS);
  flags.push(if mode.build_type.is_debug() { "-D_DEBUG" } else { "-DNDEBUG" });
  flags.join(" ")
}

fn define(name: &str, value: impl AsRef<str>) -> String {
  format!("-D{}={}", name, value.as_ref())
}

/// The configure step for `mode`.
pub fn configure_command(config: &BuildConfig, mode: &BuildMode) -> CommandSpec {
  let layout = &config.layout;
  let src = |rel: &Path| to_forward_slashes(&config.source_path(rel));
  let flags = compiler_flags(mode);
  let build_dir = mode.build_dir(&config.build_root);

  CommandSpec::new(wrapper(&config.toolchain_root, "emcmake"))
    .arg("cmake")
    .arg(src(&layout.cmake_project))
    .args(["-G", CMAKE_GENERATOR])
    .arg(define("TARGET_BUILD_PLATFORM", TARGET_PLATFORM))
    .arg(define("PHYSX_ROOT_DIR", src(&layout.physx_root)))
    .arg(define("PXSHARED_ROOT_DIR", src(&layout.pxshared_root)))
    .arg(define("NVSIMD_INCLUDE_DIR", src(&layout.nvsimd_include)))
    .arg(define("NVTOOLSEXT_INCLUDE_DIRS", src(&layout.nvtoolsext_include)))
    .arg(define("EMSCRIPTEN_GENERATE_BITCODE_STATIC_LIBRARIES", "ON"))
    .arg(define("CMAKE_C_FLAGS", &flags))
    .arg(define("CMAKE_CXX_FLAGS", &flags))
    .arg(define("CMAKE_BUILD_TYPE", mode.build_type.as_str()))
    .current_dir(&build_dir)
    .envs(config.child_env())
}

/// The build step for `mode`, run against the directory `configure_command` populated.
pub fn build_command(config: &BuildConfig, mode: &BuildMode) -> CommandSpec {
  let mut spec = CommandSpec::new(wrapper(&config.toolchain_root, "emmake")).arg("make");
  if config.verbose {
    spec = spec.arg("VERBOSE=1");
  }
  spec
    .current_dir(&mode.build_dir(&config.build_root))
    .envs(config.child_env())
}
