//! CLI smoke tests for multibuild.
//!
//! The toolchain is replaced by small shell scripts named `emcmake` and `emmake` in a
//! temporary directory pointed to by `EMSCRIPTEN`.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serial_test::serial;
use tempfile::TempDir;

/// Get a Command for the multibuild binary with a clean environment for our variables.
fn multibuild_cmd() -> Command {
  let mut cmd = cargo_bin_cmd!("multibuild");
  cmd
    .env_remove("EMSCRIPTEN")
    .env_remove("MULTIBUILD_SOURCE_ROOT")
    .env_remove("MULTIBUILD_BUILD_ROOT")
    .env_remove("MULTIBUILD_OUTPUT_DIR")
    .env_remove("RUST_LOG");
  cmd
}

fn file_names(dir: &Path) -> Vec<String> {
  let mut names: Vec<String> = std::fs::read_dir(dir)
    .unwrap()
    .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
    .collect();
  names.sort();
  names
}

/// Configure step that always succeeds.
const CONFIGURE_OK: &str = "#!/bin/sh\nexit 0\n";

/// Build step that leaves two bitcode files behind, one in a known subdirectory.
const BUILD_OK: &str = "#!/bin/sh\nmkdir -p PhysX\nprintf 'core' > PhysX3.bc\nprintf 'foundation' > PhysX/PxFoundation.bc\n";

/// Isolated workspace with a fake toolchain.
struct TestEnv {
  temp: TempDir,
}

impl TestEnv {
  fn new(configure: &str, build: &str) -> Self {
    let temp = TempDir::new().unwrap();
    let env = Self { temp };
    std::fs::create_dir_all(env.toolchain()).unwrap();
    std::fs::create_dir_all(env.source()).unwrap();
    env.write_script("emcmake", configure);
    env.write_script("emmake", build);
    env
  }

  #[cfg(unix)]
  fn write_script(&self, name: &str, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    let path = self.toolchain().join(name);
    std::fs::write(&path, body).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
  }

  #[cfg(not(unix))]
  fn write_script(&self, _name: &str, _body: &str) {}

  fn toolchain(&self) -> PathBuf {
    self.temp.path().join("emsdk")
  }

  fn source(&self) -> PathBuf {
    self.temp.path().join("src")
  }

  fn output(&self) -> PathBuf {
    self.source().join("Lib").join("HTML5")
  }

  fn cmd(&self) -> Command {
    let mut cmd = multibuild_cmd();
    cmd
      .env("EMSCRIPTEN", self.toolchain())
      .arg("--source-root")
      .arg(self.source());
    cmd
  }
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_works() {
  multibuild_cmd()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"))
    .stdout(predicate::str::contains("rebuild"));
}

#[test]
fn version_flag_works() {
  multibuild_cmd()
    .arg("--version")
    .assert()
    .success()
    .stdout(predicate::str::contains("multibuild"));
}

#[test]
fn unknown_directive_is_rejected() {
  multibuild_cmd().arg("clean").assert().failure();
}

#[test]
fn unknown_mode_is_rejected() {
  multibuild_cmd()
    .args(["--only", "O1"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("unknown mode"));
}

// =============================================================================
// Preconditions
// =============================================================================

#[test]
#[serial]
fn missing_toolchain_fails_without_touching_disk() {
  let temp = TempDir::new().unwrap();

  multibuild_cmd()
    .current_dir(temp.path())
    .arg("rebuild")
    .assert()
    .failure()
    .stderr(predicate::str::contains("EMSCRIPTEN"));

  assert!(file_names(temp.path()).is_empty());
}

// =============================================================================
// Build runs
// =============================================================================

#[cfg(unix)]
#[test]
#[serial]
fn full_run_produces_four_variants_per_artifact() {
  let env = TestEnv::new(CONFIGURE_OK, BUILD_OK);

  env
    .cmd()
    .assert()
    .success()
    .stdout(predicate::str::contains("Copied 8 artifact(s)"));

  assert_eq!(
    file_names(&env.source())
      .into_iter()
      .filter(|n| n.starts_with("build-html5"))
      .collect::<Vec<_>>(),
    vec!["build-html5", "build-html5-O2", "build-html5-O3", "build-html5-Oz"]
  );
  assert_eq!(
    file_names(&env.output()),
    vec![
      "PhysX3-O2.bc",
      "PhysX3-O3.bc",
      "PhysX3-Oz.bc",
      "PhysX3.bc",
      "PxFoundation-O2.bc",
      "PxFoundation-O3.bc",
      "PxFoundation-Oz.bc",
      "PxFoundation.bc",
    ]
  );
}

#[cfg(unix)]
#[test]
#[serial]
fn configure_failure_aborts_remaining_modes() {
  let env = TestEnv::new("#!/bin/sh\nexit 3\n", BUILD_OK);

  env
    .cmd()
    .assert()
    .failure()
    .stderr(predicate::str::contains("configure failed for mode debug"));

  assert!(env.source().join("build-html5").is_dir());
  assert!(!env.source().join("build-html5-O2").exists());
  assert!(!env.output().exists());
}

#[cfg(unix)]
#[test]
#[serial]
fn build_failure_in_later_mode_keeps_earlier_artifacts() {
  // Fails only inside the -O3 build directory.
  let build = format!(
    "#!/bin/sh\ncase \"$(pwd)\" in *-O3) exit 2 ;; esac\n{}",
    BUILD_OK.trim_start_matches("#!/bin/sh\n")
  );
  let env = TestEnv::new(CONFIGURE_OK, &build);

  env
    .cmd()
    .assert()
    .failure()
    .stderr(predicate::str::contains("build failed for mode O3"));

  assert!(!env.source().join("build-html5-Oz").exists());
  assert_eq!(
    file_names(&env.output()),
    vec!["PhysX3-O2.bc", "PhysX3.bc", "PxFoundation-O2.bc", "PxFoundation.bc"]
  );
}

#[cfg(unix)]
#[test]
#[serial]
fn same_artifact_name_in_two_locations_fails() {
  let build = "#!/bin/sh\nmkdir -p PhysX\nprintf 'top' > PhysX3.bc\nprintf 'nested' > PhysX/PhysX3.bc\n";
  let env = TestEnv::new(CONFIGURE_OK, build);

  env
    .cmd()
    .assert()
    .failure()
    .stderr(predicate::str::contains("would both be copied"))
    .stderr(predicate::str::contains("PhysX3.bc"));

  assert!(!env.output().exists());
  assert!(!env.source().join("build-html5-O2").exists());
}

#[cfg(unix)]
#[test]
#[serial]
fn rebuild_directive_purges_stale_files() {
  let env = TestEnv::new(CONFIGURE_OK, BUILD_OK);
  let stale = env.source().join("build-html5-Oz").join("stale.o");
  std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
  std::fs::write(&stale, "old").unwrap();

  env.cmd().args(["--only", "Oz", "rebuild"]).assert().success();

  assert!(!stale.exists());
  assert!(env.source().join("build-html5-Oz").join("PhysX3.bc").exists());
}

#[cfg(unix)]
#[test]
#[serial]
fn verbose_directive_reaches_build_driver() {
  let build = "#!/bin/sh\nprintf '%s' \"$*\" > args.txt\n";
  let env = TestEnv::new(CONFIGURE_OK, build);

  env.cmd().args(["verbose", "--only", "debug"]).assert().success();

  let args = std::fs::read_to_string(env.source().join("build-html5").join("args.txt")).unwrap();
  assert_eq!(args, "make VERBOSE=1");
}

#[cfg(unix)]
#[test]
#[serial]
fn toolchain_sees_dependency_paths() {
  let configure = "#!/bin/sh\nprintf '%s\\n%s' \"$GW_DEPS_ROOT\" \"$CMAKE_MODULE_PATH\" > env.txt\n";
  let env = TestEnv::new(configure, BUILD_OK);

  env.cmd().args(["--only", "O2"]).assert().success();

  let written = std::fs::read_to_string(env.source().join("build-html5-O2").join("env.txt")).unwrap();
  let source = env.source().to_string_lossy().into_owned();
  assert_eq!(written, format!("{source}\n{source}/Externals/CMakeModules"));
}

#[cfg(unix)]
#[test]
#[serial]
fn dry_run_lists_commands_and_builds_nothing() {
  let env = TestEnv::new(CONFIGURE_OK, BUILD_OK);

  env
    .cmd()
    .arg("--dry-run")
    .assert()
    .success()
    .stdout(predicate::str::contains("emcmake cmake"))
    .stdout(predicate::str::contains("-DCMAKE_BUILD_TYPE=MinSizeRel"));

  assert!(file_names(&env.source()).is_empty());
}

#[cfg(unix)]
#[test]
#[serial]
fn json_summary_is_machine_readable() {
  let env = TestEnv::new(CONFIGURE_OK, BUILD_OK);

  let output = env.cmd().args(["--only", "O3", "--output", "json"]).output().unwrap();
  assert!(output.status.success());

  let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(summary["modes"][0]["mode"], "O3");
  assert_eq!(summary["modes"][0]["build_type"], "Release");
  assert_eq!(summary["modes"][0]["artifacts"].as_array().unwrap().len(), 2);
}
