use clap::{Parser, Subcommand};
use colored::Colorize;

mod commands;
mod output;

use commands::defaults::DefaultsArgs;
use commands::init::InitArgs;
use commands::resolve::ResolveArgs;

/// pagewise - inspect how list requests are paged
#[derive(Parser)]
#[command(name = "pagewise")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a raw query string into a canonical request and page window
    Resolve(ResolveArgs),
    /// Print the effective configuration
    Defaults(DefaultsArgs),
    /// Write a default config file to the recommended location
    Init(InitArgs),
    /// Print shell completions to stdout
    Completions {
        /// Shell to generate completions for
        #[arg(value_name = "SHELL")]
        shell: clap_complete::Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Resolve(args) => commands::resolve::execute(args),
        Commands::Defaults(args) => commands::defaults::execute(args),
        Commands::Init(args) => commands::init::execute(args),
        Commands::Completions { shell } => commands::completions(shell),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);

            if let Some(source) = e.source() {
                eprintln!("\n{} {}", "Caused by:".yellow(), source);
            }

            std::process::exit(1);
        }
    }
}
