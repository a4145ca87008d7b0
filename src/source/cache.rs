// src/source/cache.rs

//! Checksum-keyed archive cache
//!
//! Verified archives are stored under `<cache>/sha256-<hex>.tar.gz`.
//! Downloads stage into a `.part` file and are renamed in only after
//! verification, so the cache never holds an unverified archive. Cache
//! hits are re-verified before reuse; a corrupt entry is discarded.

use crate::checksum::{Checksum, verify_file};
use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub struct ArchiveCache {
    dir: PathBuf,
}

impl ArchiveCache {
    /// Open (and create if needed) a cache directory
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Cache entry path for a checksum
    pub fn entry_path(&self, checksum: &Checksum) -> PathBuf {
        self.dir.join(format!("sha256-{}.tar.gz", checksum.as_hex()))
    }

    /// Staging path for an in-flight download of this entry
    pub fn part_path(&self, checksum: &Checksum) -> PathBuf {
        self.dir.join(format!("sha256-{}.tar.gz.part", checksum.as_hex()))
    }

    /// Look up a cached archive, re-verifying it before reuse
    ///
    /// A cached file that no longer matches its checksum is removed and
    /// treated as a miss.
    pub fn lookup(&self, checksum: &Checksum) -> Result<Option<PathBuf>> {
        let path = self.entry_path(checksum);
        if !path.exists() {
            return Ok(None);
        }

        match verify_file(&path, checksum) {
            Ok(()) => {
                debug!("Using cached archive: {}", path.display());
                Ok(Some(path))
            }
            Err(_) => {
                warn!("Cached archive failed verification, discarding: {}", path.display());
                fs::remove_file(&path)?;
                Ok(None)
            }
        }
    }

    /// Promote a verified staging file into the cache
    pub fn commit(&self, part: &Path, checksum: &Checksum) -> Result<PathBuf> {
        let path = self.entry_path(checksum);
        fs::rename(part, &path)?;
        Ok(path)
    }

    /// Remove every cached archive, returning how many were removed
    pub fn clean(&self) -> Result<usize> {
        let mut removed = 0;
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                fs::remove_file(entry.path())?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
