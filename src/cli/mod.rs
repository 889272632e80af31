//! CLI module for cutsplit
//!
//! This module handles command-line argument parsing and command execution.

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// cutsplit — EDL-driven lossless video cutter and splitter
///
/// Takes a video file and stitches together the cuts defined in an EDL
/// file, or carves a video into pieces at the timestamps in a split file.
/// All cutting is ffmpeg stream copy; nothing is re-encoded.
#[derive(Parser)]
#[command(name = "cutsplit")]
#[command(about = "EDL-driven lossless video cutter and splitter")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Extract the ranges in an EDL file and join them into one video
    Cut(args::CutArgs),
    /// Carve a video into pieces at the split points in a file
    Split(args::SplitArgs),
}
