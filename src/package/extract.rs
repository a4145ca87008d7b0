// src/package/extract.rs

//! Archive extraction into a staging directory
//!
//! Archives are gzip-compressed tarballs. Extraction unpacks into a
//! fresh temporary directory; member paths must be relative and free of
//! `..` components. The extracted tree is expected to contain the
//! recipe's root directory (`<name>-<version>` by default), which ties
//! the recipe version to the version embedded in the archive.

use crate::error::{Error, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::path::{Component, Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// An extracted archive, rooted in a temporary staging directory
///
/// The staging directory is removed when this value is dropped.
pub struct Extraction {
    staging: TempDir,
}

impl Extraction {
    /// The staging directory holding the extracted tree
    pub fn path(&self) -> &Path {
        self.staging.path()
    }

    /// Resolve the expected archive root directory
    ///
    /// Fails when the directory is absent, which is how a recipe whose
    /// version does not match the archive's embedded directory name is
    /// caught before any file is copied.
    pub fn resolve_root(&self, root_dir: &str) -> Result<PathBuf> {
        let root = self.staging.path().join(root_dir);
        if root.is_dir() {
            return Ok(root);
        }

        let found: Vec<String> = std::fs::read_dir(self.staging.path())?
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();

        Err(Error::NotFound(format!(
            "archive does not contain expected directory '{}' (found: {})",
            root_dir,
            if found.is_empty() {
                "nothing".to_string()
            } else {
                found.join(", ")
            }
        )))
    }
}

/// Extract a tar.gz archive into a fresh staging directory
pub fn extract(archive: &Path) -> Result<Extraction> {
    let file = File::open(archive)?;
    let mut tar = tar::Archive::new(GzDecoder::new(file));
    let staging = TempDir::new()?;

    let entries = tar
        .entries()
        .map_err(|e| Error::Format(format!("cannot read archive: {}", e)))?;

    let mut unpacked = 0usize;
    for entry in entries {
        let mut entry =
            entry.map_err(|e| Error::Format(format!("corrupt archive entry: {}", e)))?;

        let path = entry
            .path()
            .map_err(|e| Error::Format(format!("invalid entry path: {}", e)))?
            .into_owned();

        if path.is_absolute()
            || path
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            return Err(Error::Format(format!(
                "archive entry escapes extraction root: {}",
                path.display()
            )));
        }

        entry
            .unpack_in(staging.path())
            .map_err(|e| Error::Format(format!("failed to unpack {}: {}", path.display(), e)))?;
        unpacked += 1;
    }

    debug!(
        "Extracted {} entries from {} into {}",
        unpacked,
        archive.display(),
        staging.path().display()
    );

    Ok(Extraction { staging })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    /// Build a tar.gz archive from (path, contents) pairs
    fn build_archive(dest: &Path, files: &[(&str, &[u8])]) {
        let file = File::create(dest).unwrap();
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(encoder);

        for (path, contents) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(contents.len() as u64);
            header.set_mode(0o644);
            // Write the name bytes directly: `append_data` rejects `..`
            // components, but these fixtures must be able to contain them.
            header.as_gnu_mut().unwrap().name[..path.len()]
                .clone_from_slice(path.as_bytes());
            header.set_cksum();
            builder.append(&header, *contents).unwrap();
        }

        builder.into_inner().unwrap().finish().unwrap().flush().unwrap();
    }

    #[test]
    fn test_extract_and_resolve_root() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("iptools-0.3.2.tar.gz");
        build_archive(
            &archive,
            &[
                ("iptools-0.3.2/include/iptools/cidr.hpp", b"// cidr"),
                ("iptools-0.3.2/README.md", b"readme"),
            ],
        );

        let extraction = extract(&archive).unwrap();
        let root = extraction.resolve_root("iptools-0.3.2").unwrap();

        assert!(root.join("include/iptools/cidr.hpp").is_file());
        assert!(root.join("README.md").is_file());
    }

    #[test]
    fn test_root_mismatch_is_caught() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("iptools.tar.gz");
        build_archive(&archive, &[("iptools-0.9.9/include/iptools/cidr.hpp", b"x")]);

        let extraction = extract(&archive).unwrap();
        let err = extraction.resolve_root("iptools-0.3.2").unwrap_err();

        assert!(matches!(err, Error::NotFound(_)));
        assert!(err.to_string().contains("iptools-0.9.9"));
    }

    #[test]
    fn test_malformed_gzip_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("bad.tar.gz");
        std::fs::write(&archive, b"this is not gzip data").unwrap();

        assert!(matches!(extract(&archive), Err(Error::Format(_))));
    }

    #[test]
    fn test_traversal_entry_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("evil.tar.gz");
        build_archive(&archive, &[("../outside.hpp", b"escape")]);

        assert!(matches!(extract(&archive), Err(Error::Format(_))));
    }
}
