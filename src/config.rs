// src/config.rs

//! Tool configuration
//!
//! Settings come from three layers, later ones winning: built-in
//! defaults, an optional TOML config file, and environment variables
//! (`LARDER_USER`, `LARDER_CHANNEL`, `LARDER_MIRROR`). Packages are
//! published under a `<user>/<channel>` namespace in the output tree.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory of recipe files
    #[serde(default = "default_recipe_dir")]
    pub recipe_dir: PathBuf,

    /// Directory for cached source archives
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Root directory for assembled packages
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Base URL that `vendor://` source candidates resolve against
    #[serde(default)]
    pub mirror_base: Option<String>,

    /// Publishing namespace user
    #[serde(default = "default_user")]
    pub user: String,

    /// Publishing namespace channel
    #[serde(default = "default_channel")]
    pub channel: String,
}

fn default_recipe_dir() -> PathBuf {
    PathBuf::from("recipes")
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("larder/archives")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("packages")
}

fn default_user() -> String {
    "local".to_string()
}

fn default_channel() -> String {
    "testing".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recipe_dir: default_recipe_dir(),
            cache_dir: default_cache_dir(),
            output_dir: default_output_dir(),
            mirror_base: None,
            user: default_user(),
            channel: default_channel(),
        }
    }
}

impl Config {
    /// Load configuration from an optional TOML file
    ///
    /// With no path, or a path that does not exist, defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) if p.exists() => {
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content)
                    .map_err(|e| Error::Parse(format!("invalid config {}: {}", p.display(), e)))
            }
            Some(p) => Err(Error::NotFound(format!(
                "config file {} does not exist",
                p.display()
            ))),
            None => Ok(Self::default()),
        }
    }

    /// Overlay settings from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Overlay settings from an environment lookup
    pub fn apply_env_from<F>(&mut self, get: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(user) = get("LARDER_USER") {
            self.user = user;
        }
        if let Some(channel) = get("LARDER_CHANNEL") {
            self.channel = channel;
        }
        if let Some(mirror) = get("LARDER_MIRROR") {
            self.mirror_base = Some(mirror);
        }
    }

    /// The `user/channel` namespace packages are published under
    pub fn namespace(&self) -> String {
        format!("{}/{}", self.user, self.channel)
    }

    /// Output root including the namespace:
    /// `<output_dir>/<user>/<channel>`
    pub fn package_root(&self) -> PathBuf {
        self.output_dir.join(&self.user).join(&self.channel)
    }

    /// Parsed mirror base URL, if one is configured
    pub fn mirror_base_url(&self) -> Result<Option<Url>> {
        match &self.mirror_base {
            Some(raw) => Url::parse(raw)
                .map(Some)
                .map_err(|e| Error::Parse(format!("invalid mirror base URL {}: {}", raw, e))),
            None => Ok(None),
        }
    }
}
