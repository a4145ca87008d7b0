// src/commands.rs

//! Command implementations for the larder CLI
//!
//! Each function backs one subcommand defined in `cli`. They print
//! user-facing output and return the crate error type; the binary maps
//! failures through anyhow.

use crate::checksum::{Checksum, verify_file};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::package::Packager;
use crate::registry::Registry;
use crate::source::{ArchiveCache, Fetcher};
use tracing::info;

fn registry(config: &Config) -> Result<Registry> {
    Registry::load(&config.recipe_dir)
}

fn fetcher(config: &Config) -> Result<Fetcher> {
    let cache = ArchiveCache::open(&config.cache_dir)?;
    let fetcher = Fetcher::new(cache, config.mirror_base_url()?)?;
    Ok(fetcher.with_progress(true))
}

/// List every recipe, grouped by package
pub fn list(config: &Config) -> Result<()> {
    let registry = registry(config)?;

    if registry.is_empty() {
        println!("No recipes in {}", config.recipe_dir.display());
        return Ok(());
    }

    for name in registry.names() {
        let versions: Vec<String> = registry
            .versions(name)
            .iter()
            .map(|r| r.package.version.clone())
            .collect();
        println!("{}: {}", name, versions.join(", "));
    }

    Ok(())
}

/// Print a recipe's metadata
pub fn show(config: &Config, name: &str, version: Option<&str>) -> Result<()> {
    let registry = registry(config)?;
    let recipe = registry.find(name, version)?;

    println!("name:     {}", recipe.package.name);
    println!("version:  {}", recipe.package.version);
    if let Some(summary) = &recipe.package.summary {
        println!("summary:  {}", summary);
    }
    if let Some(license) = &recipe.package.license {
        println!("license:  {}", license);
    }
    if let Some(homepage) = &recipe.package.homepage {
        println!("homepage: {}", homepage);
    }
    if !recipe.package.topics.is_empty() {
        println!("topics:   {}", recipe.package.topics.join(", "));
    }
    println!("checksum: {}", recipe.source.checksum);
    println!("sources:");
    for url in recipe.source_urls() {
        println!("  {}", url);
    }
    println!("install:");
    for rule in recipe.install_rules() {
        println!("  {} from {} to {}", rule.pattern, rule.src, rule.dst);
    }

    Ok(())
}

/// Download and verify a recipe's archive into the cache
pub fn fetch(config: &Config, name: &str, version: Option<&str>) -> Result<()> {
    let registry = registry(config)?;
    let recipe = registry.find(name, version)?;

    let path = fetcher(config)?.fetch(recipe)?;
    println!(
        "Fetched {} {} -> {}",
        recipe.package.name,
        recipe.package.version,
        path.display()
    );

    Ok(())
}

/// Run the full packaging pipeline for a recipe
pub fn package(config: &Config, name: &str, version: Option<&str>) -> Result<()> {
    let registry = registry(config)?;
    let recipe = registry.find(name, version)?;

    let packager = Packager::new(fetcher(config)?, config.package_root());
    let result = packager.package(recipe)?;

    println!(
        "Packaged {} {} ({}): {} files",
        recipe.package.name,
        recipe.package.version,
        config.namespace(),
        result.report.total()
    );
    for file in &result.report.files {
        println!("  {}", file.display());
    }
    println!("-> {}", result.package_dir.display());

    Ok(())
}

/// Re-verify a cached archive against the recipe checksum
pub fn verify(config: &Config, name: &str, version: Option<&str>) -> Result<()> {
    let registry = registry(config)?;
    let recipe = registry.find(name, version)?;
    let expected = Checksum::parse(&recipe.source.checksum)?;

    let cache = ArchiveCache::open(&config.cache_dir)?;
    let path = cache.entry_path(&expected);
    if !path.exists() {
        return Err(Error::NotFound(format!(
            "archive for {} {} is not cached; run fetch first",
            recipe.package.name, recipe.package.version
        )));
    }

    verify_file(&path, &expected)?;
    println!(
        "OK {} {} ({})",
        recipe.package.name,
        recipe.package.version,
        expected.to_prefixed_string()
    );

    Ok(())
}

/// Empty the archive cache
pub fn clean(config: &Config) -> Result<()> {
    let cache = ArchiveCache::open(&config.cache_dir)?;
    let removed = cache.clean()?;
    info!("Removed {} cached archives", removed);
    println!("Removed {} cached archives from {}", removed, config.cache_dir.display());

    Ok(())
}
