//! arch-gov CLI tool.
//!
//! Usage:
//! ```bash
//! arch-gov resolve [OPTIONS] <ARCH_ID>
//! arch-gov check [OPTIONS]
//! arch-gov list
//! arch-gov init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod registry_source;

/// Architecture governance: declarative rule registries with inheritance
/// and mixins, resolved into per-architecture rule sets
#[derive(Parser)]
#[command(name = "arch-gov")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a registry file, or a directory of registry YAML files
    #[arg(short, long, global = true)]
    registry: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one architecture into its flattened rule set
    Resolve {
        /// Architecture id (e.g. domain.service.payment)
        arch_id: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Exit non-zero when any conflict is warning or above
        #[arg(long)]
        strict: bool,
    },

    /// Resolve every architecture and report errors and conflicts
    Check {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Exit non-zero when any conflict is warning or above
        #[arg(long)]
        strict: bool,
    },

    /// List architectures and mixins in the registry
    List,

    /// Initialize a starter registry file
    Init {
        /// Overwrite existing registry file
        #[arg(long)]
        force: bool,
    },
}

/// Output format for resolution results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// YAML output.
    Yaml,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Resolve {
            arch_id,
            format,
            strict,
        } => commands::resolve::run(&arch_id, format, strict, cli.registry.as_deref()),
        Commands::Check { format, strict } => {
            commands::check::run(format, strict, cli.registry.as_deref())
        }
        Commands::List => commands::list::run(cli.registry.as_deref()),
        Commands::Init { force } => commands::init::run(force),
    }
}
