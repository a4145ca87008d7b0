// src/cli.rs
//! CLI definitions for larder
//!
//! This module contains the command-line interface definitions using
//! clap. The actual command implementations are in the `commands`
//! module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "larder")]
#[command(version)]
#[command(about = "Package header-only libraries from versioned source archives", long_about = None)]
pub struct Cli {
    /// Recipe directory
    #[arg(long, global = true)]
    pub recipes: Option<PathBuf>,

    /// Archive cache directory
    #[arg(long, global = true)]
    pub cache: Option<PathBuf>,

    /// Output root for assembled packages
    #[arg(long, global = true)]
    pub output: Option<PathBuf>,

    /// Mirror base URL for vendor:// sources
    #[arg(long, global = true)]
    pub mirror: Option<String>,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List recipes and their versions
    List,

    /// Show a recipe's metadata
    Show {
        /// Package name
        name: String,

        /// Specific version (default: latest)
        #[arg(short, long)]
        version: Option<String>,
    },

    /// Download and verify a source archive into the cache
    Fetch {
        /// Package name
        name: String,

        /// Specific version (default: latest)
        #[arg(short, long)]
        version: Option<String>,
    },

    /// Fetch, verify, extract, and assemble the output package
    Package {
        /// Package name
        name: String,

        /// Specific version (default: latest)
        #[arg(short, long)]
        version: Option<String>,
    },

    /// Re-verify a cached archive against the recipe checksum
    Verify {
        /// Package name
        name: String,

        /// Specific version (default: latest)
        #[arg(short, long)]
        version: Option<String>,
    },

    /// Remove all cached archives
    Clean,
}
