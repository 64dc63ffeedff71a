use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use pagewise::config::Config;

use crate::Cli;

pub mod defaults;
pub mod init;
pub mod resolve;

/// Load configuration from an explicit file, or from the standard search
/// paths when none is given
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            if !path.is_file() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Config::load_from(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))
        }
        None => Config::load().context("Failed to load configuration"),
    }
}

/// Print completions for `shell` to stdout
pub fn completions(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
