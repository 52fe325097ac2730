//! Locating build outputs and copying them into the shared output directory.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

use crate::consts::{ARTIFACT_SUBDIRS, ARTIFACT_SUFFIX};
use crate::mode::BuildMode;

#[derive(Debug, Error)]
pub enum ArtifactError {
  #[error(transparent)]
  Io(#[from] io::Error),

  /// Two artifacts map to the same file in the output directory.
  #[error("{first} and {second} would both be copied to {dest}")]
  Duplicate {
    dest: PathBuf,
    first: PathBuf,
    second: PathBuf,
  },
}

/// One artifact copied into the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopiedArtifact {
  pub source: PathBuf,
  pub dest: PathBuf,
  pub bytes: u64,
}

/// Output files written during one run, each mapped to the artifact copied there.
///
/// Shared across modes so a later mode cannot overwrite what an earlier one produced.
#[derive(Debug, Default)]
pub struct ClaimedDestinations {
  claimed: HashMap<PathBuf, PathBuf>,
}

impl ClaimedDestinations {
  pub fn source_of(&self, dest: &Path) -> Option<&Path> {
    self.claimed.get(dest).map(PathBuf::as_path)
  }

  pub fn len(&self) -> usize {
    self.claimed.len()
  }

  pub fn is_empty(&self) -> bool {
    self.claimed.is_empty()
  }
}

fn is_artifact(path: &Path) -> bool {
  path.extension().is_some_and(|ext| ext == ARTIFACT_SUFFIX)
}

/// Finds the artifacts a build left in `build_dir`.
///
/// Only the directory itself and the fixed candidate subdirectories are scanned, one level
/// deep. Candidates that don't exist are skipped. Symlinked artifacts count. The result
/// is sorted.
pub fn find_artifacts(build_dir: &Path) -> io::Result<Vec<PathBuf>> {
  let mut found = Vec::new();

  let candidates = std::iter::once(build_dir.to_path_buf()).chain(ARTIFACT_SUBDIRS.iter().map(|d| build_dir.join(d)));

  for dir in candidates {
    if !dir.is_dir() {
      continue;
    }
    for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
      let entry = entry.map_err(io::Error::other)?;
      // `path().is_file()` follows links, unlike the entry's own file type.
      if entry.path().is_file() && is_artifact(entry.path()) {
        found.push(entry.into_path());
      }
    }
  }

  found.sort();
  Ok(found)
}

/// Copies every artifact of `build_dir` into `output_dir`, splicing the mode's flag into
/// each file name.
///
/// Destinations are checked before anything is copied: if two artifacts of this mode, or
/// an artifact of this mode and one already in `claimed`, map to the same file, nothing
/// is copied and [`ArtifactError::Duplicate`] is returned. Files left in `output_dir` by
/// earlier runs are overwritten.
pub fn collect_artifacts(
  mode: &BuildMode,
  build_dir: &Path,
  output_dir: &Path,
  claimed: &mut ClaimedDestinations,
) -> Result<Vec<CopiedArtifact>, ArtifactError> {
  let mut planned: Vec<(PathBuf, PathBuf)> = Vec::new();
  let mut this_mode: HashMap<PathBuf, PathBuf> = HashMap::new();

  for source in find_artifacts(build_dir)? {
    let Some(file_name) = source.file_name() else {
      continue;
    };
    let dest = output_dir.join(mode.artifact_name(&file_name.to_string_lossy()));

    let earlier = this_mode.get(&dest).or_else(|| claimed.claimed.get(&dest));
    if let Some(first) = earlier {
      return Err(ArtifactError::Duplicate {
        dest,
        first: first.clone(),
        second: source,
      });
    }

    this_mode.insert(dest.clone(), source.clone());
    planned.push((source, dest));
  }

  std::fs::create_dir_all(output_dir)?;

  let mut copied = Vec::with_capacity(planned.len());
  for (source, dest) in planned {
    let bytes = std::fs::copy(&source, &dest)?;
    debug!(source = %source.display(), dest = %dest.display(), bytes, "copied artifact");
    copied.push(CopiedArtifact { source, dest, bytes });
  }

  claimed.claimed.extend(this_mode);
  Ok(copied)
}
