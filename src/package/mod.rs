// src/package/mod.rs

//! Package assembly: extraction and header copying
//!
//! The [`Packager`] drives the whole pipeline for one recipe:
//! fetch (with checksum verification), extract into staging, resolve
//! the archive root, then copy matching files into the output package.
//! Verification happens on the archive bytes before extraction, so an
//! integrity failure aborts before any file is copied.

mod assemble;
mod extract;

pub use assemble::{AssemblyReport, assemble};
pub use extract::{Extraction, extract};

use crate::error::Result;
use crate::recipe::Recipe;
use crate::source::Fetcher;
use std::path::PathBuf;
use tracing::info;

/// Result of packaging one recipe
#[derive(Debug)]
pub struct PackageResult {
    /// Final package directory
    pub package_dir: PathBuf,
    /// What was copied
    pub report: AssemblyReport,
}

/// Runs the fetch, extract, assemble pipeline
pub struct Packager {
    fetcher: Fetcher,
    output_root: PathBuf,
}

impl Packager {
    /// Create a packager writing packages under `output_root`
    pub fn new(fetcher: Fetcher, output_root: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            output_root: output_root.into(),
        }
    }

    /// Package directory for a recipe: `<output>/<name>/<version>`
    pub fn package_dir(&self, recipe: &Recipe) -> PathBuf {
        self.output_root
            .join(&recipe.package.name)
            .join(&recipe.package.version)
    }

    /// Run the full pipeline for one recipe
    pub fn package(&self, recipe: &Recipe) -> Result<PackageResult> {
        info!(
            "Packaging {} {}",
            recipe.package.name, recipe.package.version
        );

        let archive = self.fetcher.fetch(recipe)?;
        let extraction = extract(&archive)?;
        let root = extraction.resolve_root(&recipe.root_dir())?;

        let package_dir = self.package_dir(recipe);
        let report = assemble(&root, &recipe.install_rules(), &package_dir)?;

        info!(
            "Packaged {} {}: {} files in {}",
            recipe.package.name,
            recipe.package.version,
            report.total(),
            package_dir.display()
        );

        Ok(PackageResult {
            package_dir,
            report,
        })
    }
}
