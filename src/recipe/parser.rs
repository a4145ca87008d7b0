// src/recipe/parser.rs

//! Recipe file parsing and validation

use crate::checksum::Checksum;
use crate::error::{Error, Result};
use crate::recipe::format::Recipe;
use std::path::Path;

/// Parse a recipe from a TOML string
pub fn parse_recipe(content: &str) -> Result<Recipe> {
    toml::from_str(content).map_err(|e| Error::Parse(format!("invalid recipe: {}", e)))
}

/// Parse a recipe from a file
pub fn parse_recipe_file(path: &Path) -> Result<Recipe> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Parse(format!("failed to read recipe {}: {}", path.display(), e))
    })?;

    parse_recipe(&content)
}

/// Validate a recipe for completeness and correctness
///
/// Hard failures return an error; style issues come back as warnings.
pub fn validate_recipe(recipe: &Recipe) -> Result<Vec<String>> {
    let mut warnings = Vec::new();

    if recipe.package.name.is_empty() {
        return Err(Error::Parse("recipe package name cannot be empty".to_string()));
    }
    if semver::Version::parse(&recipe.package.version).is_err() {
        return Err(Error::Parse(format!(
            "invalid package version '{}': expected a dotted semantic triplet",
            recipe.package.version
        )));
    }

    // One checksum per version, sha256 only
    Checksum::parse(&recipe.source.checksum)?;

    if recipe.source.urls.is_empty() {
        return Err(Error::Parse("recipe must declare at least one source URL".to_string()));
    }

    for rule in recipe.install_rules() {
        glob::Pattern::new(&rule.pattern).map_err(|e| {
            Error::Parse(format!("invalid install pattern '{}': {}", rule.pattern, e))
        })?;
        if rule.src.is_empty() || rule.dst.is_empty() {
            return Err(Error::Parse(
                "install rule src and dst directories cannot be empty".to_string(),
            ));
        }
        if Path::new(&rule.src).is_absolute() || Path::new(&rule.dst).is_absolute() {
            return Err(Error::Parse(
                "install rule src and dst directories must be relative".to_string(),
            ));
        }
    }

    if recipe.package.summary.is_none() {
        warnings.push("missing package summary".to_string());
    }
    if recipe.package.license.is_none() {
        warnings.push("missing package license".to_string());
    }
    if recipe.source.urls.len() == 1 {
        warnings.push("single source URL: no mirror fallback".to_string());
    }

    Ok(warnings)
}
