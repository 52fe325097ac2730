mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use multibuild_lib::orchestrate::RunOptions;
use multibuild_lib::{BuildMode, ConfigOverrides};

use crate::cmd::cmd_build;
use crate::output::{OutputFormat, print_failure};

/// Presence-based words accepted anywhere on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Directive {
  /// Remove existing build directories before building
  Rebuild,
  /// Ask the build driver for full command lines
  Verbose,
}

/// multibuild - build a native tree once per optimization mode with Emscripten
#[derive(Parser)]
#[command(name = "multibuild")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Directives: `rebuild` and/or `verbose`
  #[arg(value_enum)]
  directives: Vec<Directive>,

  /// Root of the physics source tree [env: MULTIBUILD_SOURCE_ROOT, default: current directory]
  #[arg(long)]
  source_root: Option<PathBuf>,

  /// Parent directory of the per-mode build directories [env: MULTIBUILD_BUILD_ROOT]
  #[arg(long)]
  build_root: Option<PathBuf>,

  /// Directory receiving renamed artifacts [env: MULTIBUILD_OUTPUT_DIR]
  #[arg(long)]
  output_dir: Option<PathBuf>,

  /// Only build the given mode (debug, O2, O3, Oz); may be repeated
  #[arg(long = "only", value_name = "MODE", value_parser = parse_mode)]
  only: Vec<BuildMode>,

  /// Print the commands that would run without building anything
  #[arg(long)]
  dry_run: bool,

  /// Output format for the summary
  #[arg(short, long, value_enum, default_value_t)]
  output: OutputFormat,

  /// Log level used when RUST_LOG is not set
  #[arg(long, default_value_t = Level::INFO)]
  log_level: Level,
}

impl Cli {
  fn has(&self, directive: Directive) -> bool {
    self.directives.contains(&directive)
  }
}

fn parse_mode(s: &str) -> Result<BuildMode, String> {
  BuildMode::parse(s).ok_or_else(|| format!("unknown mode '{}' (expected debug, O2, O3 or Oz)", s))
}

fn init_logging(level: Level) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_logging(cli.log_level);

  let overrides = ConfigOverrides {
    source_root: cli.source_root.clone(),
    build_root: cli.build_root.clone(),
    output_dir: cli.output_dir.clone(),
    verbose: cli.has(Directive::Verbose),
  };
  let options = RunOptions {
    rebuild: cli.has(Directive::Rebuild),
    dry_run: cli.dry_run,
  };

  match cmd_build(overrides, &cli.only, options, cli.output) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_failure(&err);
      ExitCode::FAILURE
    }
  }
}
