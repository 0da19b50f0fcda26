//! mmdoc CLI - Mermaid diagram maintenance for markdown docs.
//!
//! Provides commands for:
//! - `extract`: Write mermaid blocks to `.mmd` files and render them to PNG
//! - `rewrite`: Replace mermaid blocks with rendered images and folded sources

mod commands;
mod error;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ExtractArgs, RewriteArgs};
use output::Output;

/// mmdoc - Mermaid diagram extraction and doc rewriting.
#[derive(Parser)]
#[command(name = "mmdoc", version, about)]
struct Cli {
    /// Path to configuration file (default: auto-discover mmdoc.toml).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract mermaid blocks and render them to PNG.
    Extract(ExtractArgs),
    /// Replace mermaid blocks with rendered images.
    Rewrite(RewriteArgs),
}

fn main() {
    let cli = Cli::parse();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Commands::Extract(args) => args.execute(config_path),
        Commands::Rewrite(args) => args.execute(config_path),
    };

    if let Err(err) = result {
        let output = Output::new(std::env::current_dir().unwrap_or_default());
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
