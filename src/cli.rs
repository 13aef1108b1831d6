//! Command-line interface definition and argument parsing.
//!
//! This module defines all command-line arguments, options, and their validation
//! using the [clap](https://docs.rs/clap/) library. It provides structured access
//! to user input and handles argument conflicts and defaults.
//!
//! Helper methods on [`Cli`] accept a [`FileConfig`] reference so that config-file
//! values act as defaults that CLI arguments can override (layered config).

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};

use repo_du::config::file::{FileConfig, expand_tilde};
use repo_du::config::{DuOptions, OutputOptions};
use repo_du::usage::DEFAULT_BLOCK_SIZE;

/// Command-line arguments selecting which entries are emitted.
#[derive(Parser)]
struct SelectionArgs {
    /// Show all files, not just directories
    ///
    /// When enabled, every individual file gets its own output entry in
    /// addition to the per-directory aggregates.
    #[arg(short = 'a', long)]
    all: bool,

    /// Show only entries N or fewer levels below the given path
    ///
    /// --max-depth=0 is the same as --summarize. The full tree is always
    /// walked regardless; this only limits what is printed.
    #[arg(short = 'd', long, value_name = "N")]
    max_depth: Option<usize>,

    /// Display only a total for the given path
    #[arg(short = 's', long)]
    summarize: bool,
}

/// Command-line arguments controlling how the tree is walked.
#[derive(Parser)]
struct ScanningArgs {
    /// Count only tracked entries
    ///
    /// Restricts the walk to entries not excluded by ignore rules
    /// (`.gitignore`, `.ignore`).
    #[arg(long)]
    tracked_only: bool,

    /// Exclude hidden files and directories from the walk
    #[arg(long)]
    skip_hidden: bool,

    /// Show entries that were skipped because they could not be read
    ///
    /// When enabled, unreadable files and directories encountered during the
    /// walk are reported to stderr. They never contribute usage either way.
    #[arg(short = 'v', long)]
    verbose: bool,
}

/// Command-line arguments controlling how values are rendered.
#[derive(Parser)]
struct OutputArgs {
    /// Show sizes in human readable format (e.g., 1.0K 234M 2.0G)
    ///
    /// Values are scaled by powers of the block size with upward rounding,
    /// so usage is never under-reported. Implies counting in raw bytes.
    #[arg(short = 'H', long)]
    human_readable: bool,

    /// Scale sizes by SIZE bytes before printing them
    ///
    /// Defaults to 1024 bytes per block, matching GNU du.
    #[arg(short = 'B', long, value_name = "SIZE", value_parser = clap::value_parser!(u64).range(1..))]
    block_size: Option<u64>,

    /// Output results as a single JSON object for scripting/piping
    ///
    /// When enabled, all human-readable output (progress spinner, colors)
    /// is suppressed and a single JSON document is printed to stdout.
    #[arg(long)]
    json: bool,
}

/// Top-level subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Inspect or initialise the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Subcommands for `config`.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration (file values + defaults for unset keys)
    Show,
    /// Write a default config.toml if none exists yet
    Init,
    /// Print the path to the config file
    Path,
}

/// Main command-line interface structure.
///
/// Helper methods accept a [`FileConfig`] reference so that config-file values
/// act as defaults when the corresponding CLI argument is not provided.
#[derive(Parser)]
#[command(name = "repo-du")]
#[command(about = "Report apparent disk usage of a directory tree, du-style")]
#[command(version)]
pub struct Cli {
    /// Subcommand (e.g. `config`)
    #[command(subcommand)]
    pub subcommand: Option<Commands>,

    /// Path to the directory to report usage for
    ///
    /// Defaults to the current directory if not specified.
    path: Option<PathBuf>,

    /// Selection options
    #[command(flatten)]
    selection: SelectionArgs,

    /// Scanning options
    #[command(flatten)]
    scanning: ScanningArgs,

    /// Output options
    #[command(flatten)]
    output: OutputArgs,
}

impl Cli {
    /// Whether `--json` structured output mode is enabled.
    #[must_use]
    pub fn json(&self, config: &FileConfig) -> bool {
        self.output.json || config.output.json.unwrap_or(false)
    }

    /// Whether `--json` was passed on the command line itself.
    ///
    /// Used before the config file has been loaded, to decide whether
    /// config-load warnings may be printed.
    #[must_use]
    pub const fn json_flag(&self) -> bool {
        self.output.json
    }

    /// Resolve the query path from CLI args, config file, or default.
    ///
    /// Priority: CLI argument > config file `path` > current directory (`.`).
    /// Tilde expansion is applied to paths originating from the config file.
    #[must_use]
    pub fn path(&self, config: &FileConfig) -> PathBuf {
        if let Some(ref path) = self.path {
            return path.clone();
        }

        if let Some(ref path) = config.path {
            return expand_tilde(path);
        }

        PathBuf::from(".")
    }

    /// Whether to report skipped entries to stderr.
    #[must_use]
    pub fn verbose(&self, config: &FileConfig) -> bool {
        self.scanning.verbose || config.scanning.verbose.unwrap_or(false)
    }

    /// Extract aggregation options from CLI args and config file.
    ///
    /// `--summarize` forces a maximum depth of 0, overriding `--max-depth`,
    /// matching the behavior of the classic tool. In human-readable mode the
    /// aggregation block size is forced to 1 byte so the formatter operates
    /// on raw byte counts.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured block size is invalid. No
    /// traversal work is performed before this validation.
    pub fn du_options(&self, config: &FileConfig) -> Result<DuOptions> {
        let block_size = self.resolved_block_size(config)?;

        let max_depth = if self.selection.summarize {
            Some(0)
        } else {
            self.selection.max_depth
        };

        Ok(DuOptions {
            include_files: self.selection.all,
            tracked_only: self.scanning.tracked_only
                || config.scanning.tracked_only.unwrap_or(false),
            include_hidden: !(self.scanning.skip_hidden
                || config.scanning.skip_hidden.unwrap_or(false)),
            max_depth,
            block_size: if self.human_readable(config) {
                1
            } else {
                block_size
            },
        })
    }

    /// Extract rendering options from CLI args and config file.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured block size is invalid.
    pub fn output_options(&self, config: &FileConfig) -> Result<OutputOptions> {
        Ok(OutputOptions {
            human_readable: self.human_readable(config),
            json: self.json(config),
            unit_base: self.resolved_block_size(config)?,
        })
    }

    /// Whether human-readable rendering is requested (CLI flag or config).
    fn human_readable(&self, config: &FileConfig) -> bool {
        self.output.human_readable || config.output.human_readable.unwrap_or(false)
    }

    /// Block size merged from CLI and config, validated.
    ///
    /// The CLI parser already rejects 0, but the config file value is only
    /// checked here, before any traversal begins.
    fn resolved_block_size(&self, config: &FileConfig) -> Result<u64> {
        let block_size = self
            .output
            .block_size
            .or(config.output.block_size)
            .unwrap_or(DEFAULT_BLOCK_SIZE);

        if block_size == 0 {
            bail!("block size must be at least 1 byte");
        }

        Ok(block_size)
    }
}
