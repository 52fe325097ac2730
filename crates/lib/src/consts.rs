/// Environment variable naming the root of the Emscripten toolchain.
pub const TOOLCHAIN_ENV: &str = "EMSCRIPTEN";

pub const SOURCE_ROOT_ENV: &str = "MULTIBUILD_SOURCE_ROOT";
pub const BUILD_ROOT_ENV: &str = "MULTIBUILD_BUILD_ROOT";
pub const OUTPUT_DIR_ENV: &str = "MULTIBUILD_OUTPUT_DIR";

/// Build directories are named `<prefix><flag>`, e.g. `build-html5-O2`.
pub const BUILD_DIR_PREFIX: &str = "build-html5";

/// Suffix of the intermediate objects the toolchain leaves behind.
pub const ARTIFACT_SUFFIX: &str = "bc";

/// Subdirectories of a build directory that may hold artifacts, besides the directory itself.
pub const ARTIFACT_SUBDIRS: &[&str] = &["PhysX", "PxShared", "lib"];

/// Default output location relative to the source root.
pub const DEFAULT_OUTPUT_SUBDIR: &str = "Lib/HTML5";

pub const TARGET_PLATFORM: &str = "html5";
pub const CMAKE_GENERATOR: &str = "Unix Makefiles";
