//! Terminal rendering of build runs.
//!
//! Text lines are composed by the `*_line` helpers without color so they can be checked in
//! tests; the `print_*` functions add the colored marker and write them out. Results go to
//! stdout, failures to stderr.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

use multibuild_lib::artifacts::CopiedArtifact;
use multibuild_lib::orchestrate::{BuildSummary, ModeReport};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

/// Outcome marker shown in front of a mode line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
  Built,
  Empty,
  Planned,
  Failed,
}

impl Marker {
  fn symbol(self) -> &'static str {
    match self {
      Marker::Built => "✓",
      Marker::Empty => "⚠",
      Marker::Planned => "•",
      Marker::Failed => "✗",
    }
  }

  fn for_report(report: &ModeReport, dry_run: bool) -> Self {
    if dry_run {
      Marker::Planned
    } else if report.artifacts.is_empty() {
      Marker::Empty
    } else {
      Marker::Built
    }
  }
}

fn marked(marker: Marker, stream: Stream, text: &str) -> String {
  let symbol = marker.symbol();
  let symbol = match marker {
    Marker::Built => symbol.if_supports_color(stream, |s| s.green()).to_string(),
    Marker::Empty => symbol.if_supports_color(stream, |s| s.yellow()).to_string(),
    Marker::Planned => symbol.if_supports_color(stream, |s| s.blue()).to_string(),
    Marker::Failed => symbol.if_supports_color(stream, |s| s.red()).to_string(),
  };
  format!("{} {}", symbol, text)
}

/// Byte count in binary units with one decimal, e.g. `1.5 KiB`.
pub fn human_size(bytes: u64) -> String {
  const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

  if bytes < 1024 {
    return format!("{} B", bytes);
  }
  let mut value = bytes as f64 / 1024.0;
  let mut unit = 0;
  while value >= 1024.0 && unit + 1 < UNITS.len() {
    value /= 1024.0;
    unit += 1;
  }
  format!("{:.1} {}", value, UNITS[unit])
}

/// Wall time of a mode: milliseconds under a second, then seconds, then minutes.
pub fn elapsed_label(elapsed: Duration) -> String {
  let secs = elapsed.as_secs();
  if secs == 0 {
    format!("{}ms", elapsed.as_millis())
  } else if secs < 60 {
    let tenths = format!("{:.1}", elapsed.as_secs_f64());
    format!("{}s", tenths.strip_suffix(".0").unwrap_or(&tenths))
  } else {
    format!("{}m{:02}s", secs / 60, secs % 60)
  }
}

/// Heading of a mode, e.g. `O2 (Release): 3 artifact(s) in 4.2s`.
pub fn mode_line(report: &ModeReport, dry_run: bool) -> String {
  if dry_run {
    return format!("{} ({}) in {}", report.mode, report.build_type, report.build_dir.display());
  }
  match report.artifacts.len() {
    0 => format!("{} ({}): no artifacts produced", report.mode, report.build_type),
    n => format!(
      "{} ({}): {} artifact(s) in {}",
      report.mode,
      report.build_type,
      n,
      elapsed_label(report.elapsed())
    ),
  }
}

/// `PhysX/PhysX3.bc → PhysX3-O2.bc`: source relative to the build directory, destination
/// by file name.
pub fn artifact_line(build_dir: &Path, artifact: &CopiedArtifact) -> String {
  let from = artifact.source.strip_prefix(build_dir).unwrap_or(&artifact.source);
  let to = artifact
    .dest
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_default();
  format!("{} → {}", from.display(), to)
}

/// Closing line of a run.
pub fn footer_line(summary: &BuildSummary) -> String {
  if summary.dry_run {
    return format!("Dry run: {} mode(s) planned, nothing was built", summary.modes.len());
  }
  format!(
    "Copied {} artifact(s) ({}) to {}",
    summary.artifact_count(),
    human_size(summary.total_bytes()),
    summary.output_dir.display()
  )
}

pub fn print_run_header(mode_count: usize, output_dir: &Path) {
  println!(
    "{}",
    marked(
      Marker::Planned,
      Stream::Stdout,
      &format!("Building {} mode(s) into {}", mode_count, output_dir.display())
    )
  );
}

/// Prints one mode: its heading, then the planned commands (dry run) or copied artifacts.
pub fn print_mode_report(report: &ModeReport, dry_run: bool) {
  let marker = Marker::for_report(report, dry_run);
  println!("{}", marked(marker, Stream::Stdout, &mode_line(report, dry_run)));

  if dry_run {
    for cmd in &report.commands {
      println!("    {} {}", "$".if_supports_color(Stream::Stdout, |s| s.dimmed()), cmd);
    }
    return;
  }
  for artifact in &report.artifacts {
    println!("    {}", artifact_line(&report.build_dir, artifact));
  }
}

pub fn print_summary(summary: &BuildSummary) {
  println!();
  for report in &summary.modes {
    print_mode_report(report, summary.dry_run);
  }
  println!();

  let marker = if summary.dry_run { Marker::Planned } else { Marker::Built };
  println!("{}", marked(marker, Stream::Stdout, &footer_line(summary)));
}

pub fn print_failure(err: &anyhow::Error) {
  let text = format!("{:#}", err);
  eprintln!(
    "{}",
    marked(
      Marker::Failed,
      Stream::Stderr,
      &text.if_supports_color(Stream::Stderr, |s| s.red()).to_string()
    )
  );
}

pub fn print_json(summary: &BuildSummary) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(summary).context("Failed to serialize build summary")?;
  println!("{}", json);
  Ok(())
}
