// src/registry.rs

//! Recipe registry: a directory of per-version recipe files
//!
//! The registry scans a directory for `*.toml` recipes and indexes them
//! by package name. Multiple successive versions of the same package
//! coexist as separate files; lookups without an explicit version pick
//! the semver-latest one.

use crate::error::{Error, Result};
use crate::recipe::{Recipe, parse_recipe_file, validate_recipe};
use semver::Version;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// An in-memory index of recipes keyed by package name
pub struct Registry {
    packages: BTreeMap<String, Vec<(Version, Recipe)>>,
}

impl Registry {
    /// Load every recipe under a directory
    ///
    /// Recipes must validate; two recipes for the same (name, version)
    /// pair are rejected. Validation warnings are logged, not fatal.
    pub fn load(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(Error::NotFound(format!(
                "recipe directory {} does not exist",
                dir.display()
            )));
        }

        let mut packages: BTreeMap<String, Vec<(Version, Recipe)>> = BTreeMap::new();

        for entry in WalkDir::new(dir)
            .max_depth(2)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.path().extension().and_then(|e| e.to_str()) != Some("toml") {
                continue;
            }

            let recipe = parse_recipe_file(entry.path())?;
            let warnings = validate_recipe(&recipe).map_err(|e| {
                Error::Parse(format!("{}: {}", entry.path().display(), e))
            })?;
            for warning in warnings {
                warn!("{}: {}", entry.path().display(), warning);
            }

            // validate_recipe guarantees the version parses
            let version = Version::parse(&recipe.package.version)
                .map_err(|e| Error::Parse(format!("invalid version: {}", e)))?;

            let versions = packages.entry(recipe.package.name.clone()).or_default();
            if versions.iter().any(|(v, _)| *v == version) {
                return Err(Error::Parse(format!(
                    "duplicate recipe for {} {}",
                    recipe.package.name, version
                )));
            }

            debug!(
                "Loaded recipe {} {} from {}",
                recipe.package.name,
                version,
                entry.path().display()
            );
            versions.push((version, recipe));
        }

        for versions in packages.values_mut() {
            versions.sort_by(|(a, _), (b, _)| a.cmp(b));
        }

        Ok(Self { packages })
    }

    /// Package names in the registry, sorted
    pub fn names(&self) -> Vec<&str> {
        self.packages.keys().map(String::as_str).collect()
    }

    /// All recipes for a package, oldest version first
    pub fn versions(&self, name: &str) -> Vec<&Recipe> {
        self.packages
            .get(name)
            .map(|v| v.iter().map(|(_, r)| r).collect())
            .unwrap_or_default()
    }

    /// Find a recipe by name and optional version
    ///
    /// Without a version, the semver-latest recipe is returned.
    pub fn find(&self, name: &str, version: Option<&str>) -> Result<&Recipe> {
        let versions = self
            .packages
            .get(name)
            .ok_or_else(|| Error::NotFound(format!("no recipe for package '{}'", name)))?;

        match version {
            Some(requested) => {
                let wanted = Version::parse(requested).map_err(|e| {
                    Error::Parse(format!("invalid version '{}': {}", requested, e))
                })?;
                versions
                    .iter()
                    .find(|(v, _)| *v == wanted)
                    .map(|(_, r)| r)
                    .ok_or_else(|| {
                        Error::NotFound(format!("no recipe for {} {}", name, requested))
                    })
            }
            None => versions
                .last()
                .map(|(_, r)| r)
                .ok_or_else(|| Error::NotFound(format!("no recipe for package '{}'", name))),
        }
    }

    /// Total number of recipes
    pub fn len(&self) -> usize {
        self.packages.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD_SUM: &str =
        "sha256:f1f5c0afdef75a7fb91582ba7e5908d6b8cca143befb59e49691cdeed3337aae";

    fn write_recipe(dir: &Path, name: &str, version: &str) {
        let content = format!(
            r#"
[package]
name = "{name}"
version = "{version}"
summary = "test"
license = "MIT"

[source]
urls = [
    "vendor://test/{name}/{name}-%(version)s.tar.gz",
    "https://example.com/{name}-%(version)s.tar.gz",
]
checksum = "{GOOD_SUM}"
"#
        );
        std::fs::write(dir.join(format!("{name}-{version}.toml")), content).unwrap();
    }

    #[test]
    fn test_load_and_list() {
        let dir = tempfile::tempdir().unwrap();
        write_recipe(dir.path(), "iptools", "0.3.2");
        write_recipe(dir.path(), "iptools", "0.4.4");
        write_recipe(dir.path(), "other", "1.0.0");

        let registry = Registry::load(dir.path()).unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.names(), vec!["iptools", "other"]);
        assert_eq!(registry.versions("iptools").len(), 2);
    }

    #[test]
    fn test_find_latest_by_semver() {
        let dir = tempfile::tempdir().unwrap();
        // Written out of order; 0.10.0 is newer than 0.9.0 under semver
        // even though it sorts lower lexically.
        write_recipe(dir.path(), "iptools", "0.9.0");
        write_recipe(dir.path(), "iptools", "0.10.0");
        write_recipe(dir.path(), "iptools", "0.3.2");

        let registry = Registry::load(dir.path()).unwrap();
        let latest = registry.find("iptools", None).unwrap();
        assert_eq!(latest.package.version, "0.10.0");
    }

    #[test]
    fn test_find_specific_version() {
        let dir = tempfile::tempdir().unwrap();
        write_recipe(dir.path(), "iptools", "0.3.2");
        write_recipe(dir.path(), "iptools", "0.4.4");

        let registry = Registry::load(dir.path()).unwrap();
        let recipe = registry.find("iptools", Some("0.3.2")).unwrap();
        assert_eq!(recipe.package.version, "0.3.2");

        assert!(matches!(
            registry.find("iptools", Some("9.9.9")),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            registry.find("missing", None),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_duplicate_version_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_recipe(dir.path(), "iptools", "0.3.2");

        // Same (name, version) under a different filename
        let content = std::fs::read_to_string(dir.path().join("iptools-0.3.2.toml")).unwrap();
        std::fs::write(dir.path().join("iptools-dup.toml"), content).unwrap();

        assert!(matches!(Registry::load(dir.path()), Err(Error::Parse(_))));
    }

    #[test]
    fn test_missing_directory() {
        assert!(matches!(
            Registry::load(Path::new("/nonexistent/recipes")),
            Err(Error::NotFound(_))
        ));
    }
}
