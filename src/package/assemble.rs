// src/package/assemble.rs

//! Package assembly: copy matching files into the output package
//!
//! Each install rule walks one directory of the extracted tree and
//! copies every regular file whose name matches the rule's glob pattern
//! into the rule's destination. Assembly stages into a fresh sibling
//! directory and swaps it in as the last step, so repeated runs are
//! idempotent and a failed run never leaves a partial package behind.

use crate::error::{Error, Result};
use crate::recipe::InstallRule;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// What an assembly run produced
#[derive(Debug)]
pub struct AssemblyReport {
    /// Copied files, relative to the package directory, sorted
    pub files: Vec<PathBuf>,
    /// Files copied per rule, in rule order: (pattern, count)
    pub rule_counts: Vec<(String, usize)>,
}

impl AssemblyReport {
    pub fn total(&self) -> usize {
        self.files.len()
    }
}

/// Assemble the output package from an extracted tree
///
/// `root` is the resolved archive root directory; `output` is the final
/// package directory, replaced wholesale on success.
pub fn assemble(root: &Path, rules: &[InstallRule], output: &Path) -> Result<AssemblyReport> {
    let parent = output
        .parent()
        .ok_or_else(|| Error::Parse(format!("invalid output directory: {}", output.display())))?;
    fs::create_dir_all(parent)?;

    // Staged next to the output so the final rename stays on one filesystem
    let staging = tempfile::Builder::new()
        .prefix(".larder-stage-")
        .tempdir_in(parent)?;

    let mut files = Vec::new();
    let mut rule_counts = Vec::new();

    for rule in rules {
        let src_dir = root.join(&rule.src);
        if !src_dir.is_dir() {
            return Err(Error::NotFound(format!(
                "source directory '{}' not present in archive",
                rule.src
            )));
        }

        let pattern = glob::Pattern::new(&rule.pattern).map_err(|e| {
            Error::Parse(format!("invalid install pattern '{}': {}", rule.pattern, e))
        })?;

        let mut copied = 0usize;
        for entry in WalkDir::new(&src_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if !pattern.matches(&name) {
                continue;
            }

            // Position under the destination mirrors the position under src
            let rel = entry
                .path()
                .strip_prefix(&src_dir)
                .expect("walked entry is under src_dir");
            let dest = staging.path().join(&rule.dst).join(rel);
            if let Some(dir) = dest.parent() {
                fs::create_dir_all(dir)?;
            }
            fs::copy(entry.path(), &dest)?;

            debug!("Copied {} -> {}", entry.path().display(), dest.display());
            files.push(PathBuf::from(&rule.dst).join(rel));
            copied += 1;
        }

        rule_counts.push((rule.pattern.clone(), copied));
    }

    files.sort();

    // Swap the staged tree into place
    if output.exists() {
        fs::remove_dir_all(output)?;
    }
    let staged = staging.into_path();
    fs::rename(&staged, output)?;

    info!(
        "Assembled {} files into {}",
        files.len(),
        output.display()
    );

    Ok(AssemblyReport { files, rule_counts })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(pattern: &str, src: &str, dst: &str) -> InstallRule {
        InstallRule {
            pattern: pattern.to_string(),
            src: src.to_string(),
            dst: dst.to_string(),
        }
    }

    fn populate_tree(root: &Path) {
        let include = root.join("include/iptools");
        fs::create_dir_all(&include).unwrap();
        fs::create_dir_all(root.join("test")).unwrap();
        fs::write(include.join("cidr.hpp"), "// cidr").unwrap();
        fs::write(include.join("lpfst.hpp"), "// lpfst").unwrap();
        fs::write(include.join("notes.txt"), "not a header").unwrap();
        fs::write(root.join("test/test.cpp"), "int main() {}").unwrap();
    }

    #[test]
    fn test_copies_exactly_matching_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("iptools-0.3.2");
        populate_tree(&root);
        let output = dir.path().join("out/iptools/0.3.2");

        let rules = [rule("*.hpp", "include/iptools", "include/iptools")];
        let report = assemble(&root, &rules, &output).unwrap();

        assert_eq!(report.total(), 2);
        assert_eq!(report.rule_counts, vec![("*.hpp".to_string(), 2)]);
        assert!(output.join("include/iptools/cidr.hpp").is_file());
        assert!(output.join("include/iptools/lpfst.hpp").is_file());
        assert!(!output.join("include/iptools/notes.txt").exists());
        assert!(!output.join("test").exists());
    }

    #[test]
    fn test_preserves_subdirectory_layout() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("pkg-1.0.0");
        let nested = root.join("include/pkg/detail");
        fs::create_dir_all(&nested).unwrap();
        fs::write(root.join("include/pkg/api.hpp"), "a").unwrap();
        fs::write(nested.join("impl.hpp"), "b").unwrap();

        let output = dir.path().join("out");
        let rules = [rule("*.hpp", "include/pkg", "include/pkg")];
        let report = assemble(&root, &rules, &output).unwrap();

        assert_eq!(report.total(), 2);
        assert!(output.join("include/pkg/detail/impl.hpp").is_file());
    }

    #[test]
    fn test_rerun_is_idempotent_and_replaces_stale_output() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("iptools-0.3.2");
        populate_tree(&root);
        let output = dir.path().join("out");
        let rules = [rule("*.hpp", "include/iptools", "include/iptools")];

        let first = assemble(&root, &rules, &output).unwrap();

        // A file from an older run must not survive the swap
        fs::write(output.join("include/iptools/stale.hpp"), "old").unwrap();

        let second = assemble(&root, &rules, &output).unwrap();
        assert_eq!(first.files, second.files);
        assert!(!output.join("include/iptools/stale.hpp").exists());
    }

    #[test]
    fn test_missing_source_dir_aborts_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("iptools-0.3.2");
        fs::create_dir_all(&root).unwrap();
        let output = dir.path().join("out");

        let rules = [rule("*.hpp", "include/iptools", "include/iptools")];
        let err = assemble(&root, &rules, &output).unwrap_err();

        assert!(matches!(err, Error::NotFound(_)));
        assert!(!output.exists());
    }

    #[test]
    fn test_multiple_rules_counted_separately() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("pkg-1.0.0");
        fs::create_dir_all(root.join("include/pkg")).unwrap();
        fs::create_dir_all(root.join("docs")).unwrap();
        fs::write(root.join("include/pkg/a.hpp"), "a").unwrap();
        fs::write(root.join("docs/guide.md"), "g").unwrap();

        let output = dir.path().join("out");
        let rules = [
            rule("*.hpp", "include/pkg", "include/pkg"),
            rule("*.md", "docs", "share/doc/pkg"),
        ];
        let report = assemble(&root, &rules, &output).unwrap();

        assert_eq!(report.rule_counts, vec![
            ("*.hpp".to_string(), 1),
            ("*.md".to_string(), 1),
        ]);
        assert!(output.join("share/doc/pkg/guide.md").is_file());
    }
}
