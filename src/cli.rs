//! CLI module - Command-line interface definitions and handlers

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::core::config::{self, AmalgamConfig};
use crate::core::error::AmalgamError;
use crate::core::model::{ItemError, Kind, ResultItem, ResultSet};
use crate::core::render::{OutputFormat, RenderConfig, Renderer};

/// amalgamate - fold a split header/implementation library into headers.
#[derive(Parser, Debug)]
#[command(name = "amalgamate")]
#[command(
    author,
    version,
    about,
    long_about = r#"amalgamate turns a header/implementation-split C++ library into a
header-only style tree, in place.

Passes:
- rewrite: every `#include "<ns>/path"` or `#include <<ns>/path>` becomes a
  quote-delimited include relative to the including file
- amalgamate: every foo.cpp with a sibling foo.hpp is appended to foo.hpp inside
  an include guard and an implementation toggle, then deleted

Run it against a clean checkout. A failed run leaves the tree half-converted;
discard it and start again. Running twice is not supported.

Examples:
    amalgamate
    amalgamate --root vendor/catch2 run
    amalgamate --dry-run --format md
    amalgamate --namespace doctest --toggle-macro DOCTEST_CONFIG_IMPLEMENT rewrite
"#
)]
pub struct Cli {
    /// Root directory of the library tree.
    #[arg(
        long,
        global = true,
        env = "AMALGAMATE_ROOT",
        default_value = config::DEFAULT_ROOT,
        value_name = "ROOT",
        long_help = "Root directory of the library tree (defaults to ./catch2).\n\n\
Include paths under the namespace are resolved against this directory, and all\n\
paths in results are relative to it."
    )]
    pub root: PathBuf,

    /// Include namespace to rewrite.
    #[arg(long, global = true, default_value = config::DEFAULT_NAMESPACE, value_name = "NS")]
    pub namespace: String,

    /// Implementation file extension.
    #[arg(long, global = true, default_value = config::DEFAULT_SOURCE_EXT, value_name = "EXT")]
    pub source_ext: String,

    /// Header file extension.
    #[arg(long, global = true, default_value = config::DEFAULT_HEADER_EXT, value_name = "EXT")]
    pub header_ext: String,

    /// Macro gating merged implementation content.
    #[arg(
        long,
        global = true,
        value_name = "MACRO",
        long_help = "Macro that must be defined for merged implementation content to compile.\n\n\
Defaults to <NAMESPACE>_IMPLEMENTATION, e.g. CATCH2_IMPLEMENTATION."
    )]
    pub toggle_macro: Option<String>,

    /// Attribution token for generated comments.
    #[arg(long, global = true, default_value = config::DEFAULT_TAG, value_name = "TAG")]
    pub tag: String,

    /// Output format (jsonl/json/md).
    #[arg(
        long,
        global = true,
        default_value = "jsonl",
        value_name = "FORMAT",
        long_help = "Select the output format for the ResultSet.\n\n\
Supported values:\n\
- jsonl (default)\n\
- json\n\
- md (markdown)"
    )]
    pub format: String,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Report what would change without writing or deleting anything.
    #[arg(
        long,
        global = true,
        long_help = "Compute and report every change without touching the tree.\n\n\
Note: with `run`, the amalgamate pass then sees includes that were not rewritten."
    )]
    pub dry_run: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (errors only on stderr, no summary).
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (per-file diagnostics on stderr).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Rewrite library includes to relative paths.
    Rewrite,

    /// Merge each implementation file into its same-named header.
    Amalgamate,

    /// Rewrite, then amalgamate (the default).
    Run,
}

impl Cli {
    /// Pipeline configuration from the flags
    pub fn amalgam_config(&self) -> AmalgamConfig {
        AmalgamConfig {
            namespace: self.namespace.clone(),
            source_ext: self.source_ext.clone(),
            header_ext: self.header_ext.clone(),
            toggle_macro: self
                .toggle_macro
                .clone()
                .unwrap_or_else(|| config::default_toggle_macro(&self.namespace)),
            guard_suffix: config::DEFAULT_GUARD_SUFFIX.to_string(),
            tag: self.tag.clone(),
            dry_run: self.dry_run,
        }
    }

    fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}

/// Install the stderr tracing subscriber; RUST_LOG wins over flags
fn init_logging(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Run the CLI command
pub fn run(cli: Cli) -> Result<()> {
    init_logging(&cli);
    if cli.no_color {
        colored::control::set_override(false);
    }

    let format: OutputFormat = cli.format.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let renderer = Renderer::with_config(RenderConfig::with_pretty(format, cli.pretty));
    let config = cli.amalgam_config();
    let command = cli.command.unwrap_or(Commands::Run);

    match execute(command, &cli.root, &config) {
        Ok(results) => {
            print_results(&renderer, &results);
            if !cli.quiet {
                print_summary(command, &results, config.dry_run);
            }
            Ok(())
        }
        Err(err) => {
            let mut results = ResultSet::new();
            results.push(ResultItem::error(ItemError::from(&err)));
            print_results(&renderer, &results);
            Err(err).with_context(|| format!("{:?} failed on {}", command, cli.root.display()))
        }
    }
}

fn execute(
    command: Commands,
    root: &Path,
    config: &AmalgamConfig,
) -> std::result::Result<ResultSet, AmalgamError> {
    match command {
        Commands::Rewrite => crate::flows::rewrite::rewrite_includes(root, config),
        Commands::Amalgamate => crate::flows::amalgamate::amalgamate(root, config),
        Commands::Run => crate::flows::pipeline::run_pipeline(root, config),
    }
}

fn print_results(renderer: &Renderer, results: &ResultSet) {
    let output = renderer.render(results);
    if !output.is_empty() {
        println!("{}", output);
    }
}

fn print_summary(command: Commands, results: &ResultSet, dry_run: bool) {
    let label = match command {
        Commands::Rewrite => "rewrite",
        Commands::Amalgamate => "amalgamate",
        Commands::Run => "run",
    };
    let prefix = if dry_run {
        format!("{} (dry run)", label).yellow()
    } else {
        label.green()
    };

    eprintln!(
        "{}: {} file(s) rewritten, {} header(s) amalgamated, {} source(s) without header",
        prefix.bold(),
        results.count(Kind::Rewrite),
        results.count(Kind::Amalgamate),
        results.count(Kind::Skip)
    );
}
