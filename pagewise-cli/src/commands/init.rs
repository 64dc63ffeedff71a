use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use pagewise::config::Config;

use crate::output;

#[derive(Args)]
pub struct InitArgs {
    /// Service the configuration belongs to
    #[arg(long, value_name = "NAME", default_value = "pagewise")]
    service: String,

    /// Write to this path instead of the XDG config directory
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

pub fn execute(args: InitArgs) -> Result<()> {
    let path = match args.output {
        Some(path) => path,
        None => Config::create_config_dir(&args.service)
            .context("Failed to create config directory")?
            .join("config.toml"),
    };

    if !write_config(&path, &args.service, args.force)? {
        output::warning(&format!("Config file already exists at: {}", path.display()));
        println!("Use --force to overwrite");
        return Ok(());
    }

    output::success(&format!("Generated config file: {}", path.display()));
    println!("\n{}:", "Override any value with".bold());
    println!("  export PAGEWISE_PAGING__PAGE_SIZE=50");
    println!("  export PAGEWISE_SERVICE__LOG_LEVEL=debug");

    Ok(())
}

/// Write the default configuration unless a file is already there
///
/// Returns `false` and leaves an existing file untouched when `force` is not
/// set.
fn write_config(path: &Path, service: &str, force: bool) -> Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    write_default_config(path, service)?;
    Ok(true)
}

/// Render the default configuration for `service` as TOML and write it
fn write_default_config(path: &Path, service: &str) -> Result<()> {
    let mut config = Config::default();
    config.service.name = service.to_string();

    let rendered = toml::to_string_pretty(&config).context("Failed to render configuration")?;
    fs::write(path, rendered)
        .with_context(|| format!("Failed to write config file {}", path.display()))
}
