//! cutsplit CLI
//!
//! Stitches together the cuts defined in an EDL file, or carves a video
//! into pieces at given split points, using lossless ffmpeg stream copy.
//!
//! # Usage
//!
//! ```bash
//! cutsplit cut --edl take.edl --input stream.mp4 --output highlights.mp4
//! cutsplit split --splits points.txt --input stream.mp4 --output-base part.mp4
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use cutsplit::cli::{commands, Cli, Commands};

/// Main entry point for the cutsplit CLI application
fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Parse command line arguments
    let cli = Cli::parse();

    // Execute the requested command
    match cli.command {
        Commands::Cut(args) => {
            info!("Executing cut command");
            commands::cut(args)?;
        }
        Commands::Split(args) => {
            info!("Executing split command");
            commands::split(args)?;
        }
    }

    Ok(())
}
