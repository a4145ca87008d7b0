// src/recipe/format.rs

//! Recipe file format definitions
//!
//! Recipes are TOML files, one per package version. URLs and directory
//! names support `%(name)s` and `%(version)s` substitution.

use serde::{Deserialize, Serialize};

/// A complete recipe for packaging one versioned artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Package metadata
    pub package: PackageSection,

    /// Source candidates and archive checksum
    pub source: SourceSection,

    /// File copy rules (optional; defaults to headers under
    /// `include/<name>`)
    #[serde(default, rename = "install")]
    pub install: Vec<InstallRule>,
}

impl Recipe {
    /// Substitute variables in a string
    ///
    /// Replaces `%(name)s` and `%(version)s` with their values from
    /// the package section.
    pub fn substitute(&self, template: &str) -> String {
        template
            .replace("%(name)s", &self.package.name)
            .replace("%(version)s", &self.package.version)
    }

    /// Candidate source URLs in fallback order, substituted
    pub fn source_urls(&self) -> Vec<String> {
        self.source.urls.iter().map(|u| self.substitute(u)).collect()
    }

    /// Directory name at the root of the extracted archive
    ///
    /// Defaults to `<name>-<version>`; the archive must contain this
    /// directory, which ties the recipe version to the version embedded
    /// in the archive.
    pub fn root_dir(&self) -> String {
        match &self.source.root_dir {
            Some(dir) => self.substitute(dir),
            None => format!("{}-{}", self.package.name, self.package.version),
        }
    }

    /// Install rules with variables substituted
    ///
    /// When the recipe declares no rules, the header-only default
    /// applies: `*.hpp` from `include/<name>` to `include/<name>`.
    pub fn install_rules(&self) -> Vec<InstallRule> {
        if self.install.is_empty() {
            let include_dir = format!("include/{}", self.package.name);
            return vec![InstallRule {
                pattern: default_pattern(),
                src: include_dir.clone(),
                dst: include_dir,
            }];
        }

        self.install
            .iter()
            .map(|rule| InstallRule {
                pattern: self.substitute(&rule.pattern),
                src: self.substitute(&rule.src),
                dst: self.substitute(&rule.dst),
            })
            .collect()
    }

    /// Filename for the archive, taken from the last segment of the
    /// first candidate URL
    pub fn archive_filename(&self) -> String {
        self.source_urls()
            .first()
            .and_then(|u| u.rsplit('/').next().map(str::to_string))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("{}-{}.tar.gz", self.package.name, self.package.version))
    }
}

/// Package metadata section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSection {
    /// Package name
    pub name: String,

    /// Package version (dotted semantic triplet)
    pub version: String,

    /// Short description
    #[serde(default)]
    pub summary: Option<String>,

    /// License identifier or URL
    #[serde(default)]
    pub license: Option<String>,

    /// Homepage URL
    #[serde(default)]
    pub homepage: Option<String>,

    /// Topic tags
    #[serde(default)]
    pub topics: Vec<String>,
}

/// Source candidates section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSection {
    /// Ordered candidate URLs: internal mirror scheme first, public
    /// fallback second
    ///
    /// Supports `vendor://`, `https://`, `http://`, and `file://`
    /// locations.
    pub urls: Vec<String>,

    /// Checksum for the archive (`sha256:...`), one per version
    pub checksum: String,

    /// Directory name at the archive root, if it differs from
    /// `%(name)s-%(version)s`
    #[serde(default)]
    pub root_dir: Option<String>,
}

/// A single file copy rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallRule {
    /// Glob pattern matched against file names (default `*.hpp`)
    #[serde(default = "default_pattern")]
    pub pattern: String,

    /// Source directory inside the extracted tree
    pub src: String,

    /// Destination directory inside the output package
    pub dst: String,
}

fn default_pattern() -> String {
    "*.hpp".to_string()
}
