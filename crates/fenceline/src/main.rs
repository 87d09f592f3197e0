//! fenceline CLI - syntax and line highlighting for MDX code fences.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

use commands::highlight::HighlightArgs;

#[derive(Parser)]
#[command(name = "fenceline")]
#[command(about = "Render MDX code fences with syntax and line highlighting")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to fenceline.toml config file
    #[arg(short, long, default_value = "fenceline.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Highlight a single code snippet
    Highlight(HighlightArgs),

    /// Build every post in the content directory
    Build {
        /// Output directory (defaults to config or "public")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip CSS minification
        #[arg(long)]
        no_minify: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so highlighted output can be piped
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let file_config = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Highlight(args) => {
            commands::highlight::run(args, &file_config, &mut std::io::stdout().lock())?;
        }
        Commands::Build { output, no_minify } => {
            let minify = if no_minify { Some(false) } else { None };
            commands::build::run(file_config, output, minify)?;
        }
    }

    Ok(())
}
