// tests/common/mod.rs

//! Shared fixtures for integration tests.
//!
//! Tests build real tar.gz archives on the fly, pin their actual
//! checksums in generated recipes, and serve them to the fetcher over
//! `file://` URLs so the whole pipeline runs without a network.

use flate2::Compression;
use flate2::write::GzEncoder;
use larder::Config;
use larder::checksum::sha256_file;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use url::Url;
use walkdir::WalkDir;

/// Build a gzip-compressed tarball at `dest` from (path, contents)
/// pairs and return its `sha256:` prefixed checksum.
pub fn build_archive(dest: &Path, files: &[(String, &[u8])]) -> String {
    let file = File::create(dest).unwrap();
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for (path, contents) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, path, *contents).unwrap();
    }

    builder
        .into_inner()
        .unwrap()
        .finish()
        .unwrap()
        .flush()
        .unwrap();

    sha256_file(dest).unwrap().to_prefixed_string()
}

/// Build the standard iptools-style source archive: headers under
/// `<name>-<version>/include/<name>/`, plus files that must never be
/// packaged (a text file next to the headers, tests, a README).
pub fn build_header_archive(dest: &Path, name: &str, version: &str, headers: &[&str]) -> String {
    let root = format!("{}-{}", name, version);
    let mut files: Vec<(String, &[u8])> = headers
        .iter()
        .map(|h| (format!("{}/include/{}/{}", root, name, h), &b"// header\n"[..]))
        .collect();

    files.push((format!("{}/include/{}/notes.txt", root, name), b"not a header\n"));
    files.push((format!("{}/test/test.cpp", root), b"int main() { return 0; }\n"));
    files.push((format!("{}/README.md", root), b"readme\n"));

    build_archive(dest, &files)
}

/// Write a recipe file into the config's recipe directory.
pub fn write_recipe(
    config: &Config,
    name: &str,
    version: &str,
    urls: &[String],
    checksum: &str,
) {
    let url_list = urls
        .iter()
        .map(|u| format!("    \"{}\",", u))
        .collect::<Vec<_>>()
        .join("\n");

    let content = format!(
        r#"
[package]
name = "{name}"
version = "{version}"
summary = "Header only library of IP utilities"
license = "MIT"

[source]
urls = [
{url_list}
]
checksum = "{checksum}"
"#
    );

    fs::write(
        config.recipe_dir.join(format!("{name}-{version}.toml")),
        content,
    )
    .unwrap();
}

/// A config rooted in a temp directory, with the recipe dir created.
pub fn test_config(base: &Path) -> Config {
    let mut config = Config::default();
    config.recipe_dir = base.join("recipes");
    config.cache_dir = base.join("cache");
    config.output_dir = base.join("packages");
    fs::create_dir_all(&config.recipe_dir).unwrap();
    config
}

/// `file://` URL for a local path.
pub fn file_url(path: &Path) -> String {
    Url::from_file_path(path).unwrap().to_string()
}

/// Every regular file under `root`, as sorted root-relative paths.
pub fn list_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
        .collect();
    files.sort();
    files
}
