//! Path helpers for arguments handed to the toolchain.

use std::path::{Component, Path, PathBuf};

/// Renders a path with `/` separators, as CMake and the toolchain's shell wrappers expect.
///
/// Verbatim Windows prefixes (`\\?\C:\...`) are stripped first.
pub fn to_forward_slashes(path: &Path) -> String {
  dunce::simplified(path).to_string_lossy().replace('\\', "/")
}

/// Lexically normalizes a path: drops `.` components and resolves `..` without touching
/// the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
  let mut normalized = PathBuf::new();
  for component in path.components() {
    match component {
      Component::ParentDir => {
        normalized.pop();
      }
      Component::CurDir => {}
      _ => normalized.push(component),
    }
  }
  normalized
}

/// Joins `path` onto `base` unless it is already absolute, then normalizes.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
  if path.is_absolute() {
    normalize(path)
  } else {
    normalize(&base.join(path))
  }
}
