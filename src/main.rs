//! # repo-du
//!
//! A du-style CLI tool reporting apparent disk usage of a directory tree.
//!
//! Sizes are apparent sizes (logical byte lengths) rounded up to whole
//! blocks, matching the numbers printed by `du --apparent-size`. Output can
//! be limited by depth, extended to individual files, restricted to tracked
//! (non-ignored) entries, and rendered human-readable or as JSON.
//!
//! ## Usage
//!
//! ```bash
//! # Per-directory usage of the current tree, grand total last
//! repo-du
//!
//! # Only a total, human readable
//! repo-du --summarize --human-readable
//!
//! # Everything two levels deep, files included
//! repo-du --all --max-depth 2 data_dir
//! ```

mod cli;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use repo_du::{
    Aggregator,
    config::FileConfig,
    filtering::{filter_depth, order_entries},
    format::format_entry,
    fs::{FileSystem, OsFileSystem},
    output::JsonOutput,
};
use std::process::exit;

use cli::{Cli, Commands, ConfigCommand};

/// Entry point for the repo-du application.
///
/// This function handles all errors gracefully by calling [`inner_main`] and
/// printing any errors to stderr before exiting with a non-zero status code.
fn main() {
    if let Err(err) = inner_main() {
        eprintln!("Error: {err}");

        exit(1);
    }
}

/// Main application logic that can return errors.
///
/// This function orchestrates the full pipeline: parse arguments, walk and
/// aggregate the tree, filter by depth, order the result, and print it.
///
/// # Errors
///
/// Returns errors from option validation, the tree walk (e.g. a missing
/// root path), or JSON serialization.
fn inner_main() -> Result<()> {
    let args = Cli::parse();

    if let Some(Commands::Config { command }) = &args.subcommand {
        return handle_config_command(command);
    }

    let file_config = load_config(args.json_flag());

    let du_options = args.du_options(&file_config)?;
    let output_options = args.output_options(&file_config)?;
    let os_path = args.path(&file_config);

    let fs = OsFileSystem::new().with_verbose(args.verbose(&file_config));
    let root = fs.normalize(&os_path);

    let progress = make_spinner(output_options.json);
    let aggregator = Aggregator::new(&fs, du_options.clone());
    let result = aggregator.aggregate(&root);
    progress.finish_and_clear();

    let usage = result?;
    let usage = filter_depth(usage, &root, du_options.max_depth);
    let entries = order_entries(usage, &root);

    if output_options.json {
        let output = JsonOutput::from_entries(&entries, &root, du_options.block_size);
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for (path, usage) in &entries {
            println!(
                "{}",
                format_entry(
                    path,
                    *usage,
                    output_options.human_readable,
                    output_options.unit_base
                )
            );
        }
    }

    Ok(())
}

/// Build the walk spinner, hidden in JSON mode (indicatif already hides
/// itself on a non-TTY stderr).
fn make_spinner(json_mode: bool) -> ProgressBar {
    if json_mode {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message("Scanning...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

// ── Config subcommand ────────────────────────────────────────────────

/// Default config file template written by `config init`.
const CONFIG_TEMPLATE: &str = r#"# repo-du configuration
# All values shown are their defaults. Uncomment and change as needed.

# Default path to report on (defaults to the current directory when not set)
# path = "."

[scanning]
# Count only entries not excluded by ignore rules (.gitignore, .ignore)
# tracked_only = false

# Exclude hidden files and directories from the walk
# skip_hidden = false

# Report unreadable, skipped entries to stderr
# verbose = false

[output]
# Render sizes with unit suffixes (1.0K, 234M, 2.0G)
# human_readable = false

# Bytes per block (GNU du convention)
# block_size = 1024

# Emit a single JSON document instead of plain lines
# json = false
"#;

/// Dispatch a `config` subcommand.
fn handle_config_command(cmd: &ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Path => match FileConfig::config_path() {
            Some(path) => println!("{}", path.display()),
            None => anyhow::bail!("Could not determine the config directory on this platform"),
        },
        ConfigCommand::Show => show_config()?,
        ConfigCommand::Init => init_config()?,
    }
    Ok(())
}

/// Print the effective configuration (file values merged with defaults).
fn show_config() -> Result<()> {
    let path = FileConfig::config_path();

    let (file_exists, config) = match &path {
        Some(p) if p.exists() => (true, FileConfig::load()?),
        _ => (false, FileConfig::default()),
    };

    match &path {
        Some(p) if file_exists => println!("Config file: {} (found)", p.display()),
        Some(p) => println!(
            "Config file: {} (not found - showing defaults)",
            p.display()
        ),
        None => println!("Config file: (cannot determine path on this platform)"),
    }

    println!();
    println!("{}", format_config(&config));
    Ok(())
}

/// Format a [`FileConfig`] as a human-readable table, showing defaults for `None` fields.
fn format_config(config: &FileConfig) -> String {
    fn show_bool(val: Option<bool>, default: bool) -> String {
        val.map_or_else(|| format!("{default}  (default)"), |v| v.to_string())
    }
    fn show_u64(val: Option<u64>, default: u64) -> String {
        val.map_or_else(|| format!("{default}  (default)"), |v| v.to_string())
    }

    let path_str = config.path.as_ref().map_or_else(
        || "\".\"  (default)".to_string(),
        |p| format!("\"{}\"", p.display()),
    );

    format!(
        "\
path          = {path}

[scanning]
tracked_only  = {tracked_only}
skip_hidden   = {skip_hidden}
verbose       = {verbose}

[output]
human_readable = {human_readable}
block_size     = {block_size}
json           = {json}",
        path = path_str,
        tracked_only = show_bool(config.scanning.tracked_only, false),
        skip_hidden = show_bool(config.scanning.skip_hidden, false),
        verbose = show_bool(config.scanning.verbose, false),
        human_readable = show_bool(config.output.human_readable, false),
        block_size = show_u64(config.output.block_size, 1024),
        json = show_bool(config.output.json, false),
    )
}

/// Write a default config template to the config file path if it does not exist yet.
fn init_config() -> Result<()> {
    let Some(path) = FileConfig::config_path() else {
        anyhow::bail!("Could not determine the config directory on this platform");
    };

    if path.exists() {
        println!("Config file already exists at: {}", path.display());
        println!("Remove it first if you want to regenerate it.");
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {e}",
                parent.display()
            )
        })?;
    }

    std::fs::write(&path, CONFIG_TEMPLATE)
        .map_err(|e| anyhow::anyhow!("Failed to write config file {}: {e}", path.display()))?;

    println!("Config file written to: {}", path.display());
    Ok(())
}

/// Load the configuration file, falling back to defaults on failure.
fn load_config(json_mode: bool) -> FileConfig {
    match FileConfig::load() {
        Ok(config) => config,
        Err(e) => {
            if !json_mode {
                eprintln!("{} {e}", "Warning: Failed to load config file:".yellow());
            }
            FileConfig::default()
        }
    }
}
