use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::output;

#[derive(Args)]
pub struct DefaultsArgs {
    /// Config file to load instead of the standard search paths
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print as TOML instead of JSON
    #[arg(long)]
    toml: bool,
}

pub fn execute(args: DefaultsArgs) -> Result<()> {
    let config = super::load_config(args.config.as_deref())?;

    if args.toml {
        let rendered = toml::to_string_pretty(&config).context("Failed to render configuration")?;
        print!("{rendered}");
        return Ok(());
    }

    output::json(&config)
}
