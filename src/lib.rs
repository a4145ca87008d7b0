// src/lib.rs

//! Larder: a packaging tool for header-only libraries
//!
//! A recipe names a package and version, pins a SHA-256 checksum, and
//! lists candidate source URLs (internal mirror first, public fallback
//! second). Packaging fetches the archive, verifies it against the
//! pinned checksum, extracts it into staging, and copies every file
//! matching the install rules (headers, by default) into the output
//! package's `include/<name>` directory.
//!
//! The pipeline is sequential and idempotent: verification happens
//! before extraction, assembly stages into a fresh directory and swaps
//! it in, and re-running a recipe reproduces the same header set.

pub mod checksum;
pub mod cli;
pub mod commands;
pub mod config;
mod error;
pub mod package;
pub mod recipe;
pub mod registry;
pub mod source;

pub use checksum::Checksum;
pub use config::Config;
pub use error::{Error, Result};
pub use package::{AssemblyReport, Extraction, PackageResult, Packager};
pub use recipe::{InstallRule, Recipe, parse_recipe, parse_recipe_file, validate_recipe};
pub use registry::Registry;
pub use source::{ArchiveCache, Fetcher};
