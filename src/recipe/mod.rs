// src/recipe/mod.rs

//! Recipes for packaging header-only libraries
//!
//! A recipe describes how to obtain and repackage one versioned
//! artifact:
//! - Package metadata (name, version, license, topics)
//! - An ordered list of candidate source URLs and the archive checksum
//! - Install rules: which files to copy out of the extracted tree
//!
//! # Example Recipe
//!
//! ```toml
//! [package]
//! name = "iptools"
//! version = "0.3.2"
//! license = "https://github.com/hoxnox/iptools/blob/master/LICENSE"
//! topics = ["net"]
//!
//! [source]
//! urls = [
//!     "vendor://hoxnox/iptools/iptools-%(version)s.tar.gz",
//!     "https://github.com/hoxnox/iptools/archive/%(version)s.tar.gz",
//! ]
//! checksum = "sha256:f1f5c0afdef75a7fb91582ba7e5908d6b8cca143befb59e49691cdeed3337aae"
//!
//! [[install]]
//! pattern = "*.hpp"
//! src = "include/iptools"
//! dst = "include/iptools"
//! ```

mod format;
pub mod parser;

pub use format::{InstallRule, PackageSection, Recipe, SourceSection};
pub use parser::{parse_recipe, parse_recipe_file, validate_recipe};
