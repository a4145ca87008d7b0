// src/source/fetch.rs

//! Archive fetching with ordered candidate fallback
//!
//! Candidates are tried strictly in recipe order. A candidate that
//! cannot be reached, or that downloads but fails checksum
//! verification, is recorded and the next one is tried; there are no
//! per-candidate retries. When every candidate fails, the error lists
//! each attempted location with its failure.

use crate::checksum::{Checksum, Hasher};
use crate::error::{Error, Result};
use crate::recipe::Recipe;
use crate::source::ArchiveCache;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Default timeout for HTTP requests (30 seconds)
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Buffer size for streaming downloads (8 KB)
const STREAM_BUFFER_SIZE: usize = 8192;

/// A resolved source candidate
enum Candidate {
    Http(Url),
    Local(PathBuf),
}

impl std::fmt::Display for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Candidate::Http(url) => write!(f, "{}", url),
            Candidate::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Retrieves recipe archives into the cache
pub struct Fetcher {
    client: Client,
    cache: ArchiveCache,
    mirror_base: Option<Url>,
    show_progress: bool,
}

impl Fetcher {
    /// Create a fetcher
    ///
    /// `mirror_base` is the base URL that `vendor://` candidates are
    /// rewritten against; without one those candidates are skipped.
    pub fn new(cache: ArchiveCache, mirror_base: Option<Url>) -> Result<Self> {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::Download(format!("failed to create HTTP client: {}", e)))?;

        let mirror_base = mirror_base.map(normalize_base);

        Ok(Self {
            client,
            cache,
            mirror_base,
            show_progress: false,
        })
    }

    /// Show download progress bars
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Fetch the recipe's archive, returning its path in the cache
    ///
    /// The cache is consulted first; on a miss, candidates are tried in
    /// order until one passes verification.
    pub fn fetch(&self, recipe: &Recipe) -> Result<PathBuf> {
        let expected = Checksum::parse(&recipe.source.checksum)?;

        if let Some(cached) = self.cache.lookup(&expected)? {
            return Ok(cached);
        }

        let mut attempts = Vec::new();

        for raw in recipe.source_urls() {
            let candidate = match self.resolve(&raw)? {
                Some(c) => c,
                None => {
                    debug!("Skipping {} (no mirror configured)", raw);
                    attempts.push(format!("{}: skipped, no mirror configured", raw));
                    continue;
                }
            };

            info!("Fetching {} from {}", recipe.archive_filename(), candidate);
            match self.try_candidate(&candidate, &expected) {
                Ok(path) => return Ok(path),
                Err(e) => {
                    warn!("Candidate {} failed: {}", candidate, e);
                    attempts.push(format!("{}: {}", candidate, e));
                }
            }
        }

        Err(Error::Download(format!(
            "no source candidate for {} {} succeeded:\n  {}",
            recipe.package.name,
            recipe.package.version,
            attempts.join("\n  ")
        )))
    }

    /// Resolve a recipe URL into a concrete candidate
    ///
    /// `vendor://` locations need a configured mirror base and resolve
    /// to `None` without one.
    fn resolve(&self, raw: &str) -> Result<Option<Candidate>> {
        if let Some(rest) = raw.strip_prefix("vendor://") {
            let base = match &self.mirror_base {
                Some(b) => b,
                None => return Ok(None),
            };
            let url = base.join(rest).map_err(|e| {
                Error::Parse(format!("cannot resolve mirror URL for {}: {}", raw, e))
            })?;
            return Ok(Some(Candidate::Http(url)));
        }

        let url = Url::parse(raw)
            .map_err(|e| Error::Parse(format!("invalid source URL {}: {}", raw, e)))?;

        match url.scheme() {
            "http" | "https" => Ok(Some(Candidate::Http(url))),
            "file" => {
                let path = url.to_file_path().map_err(|_| {
                    Error::Parse(format!("invalid file URL: {}", raw))
                })?;
                Ok(Some(Candidate::Local(path)))
            }
            other => Err(Error::Parse(format!(
                "unsupported URL scheme '{}' in {}",
                other, raw
            ))),
        }
    }

    /// Download one candidate into the cache staging file, hashing
    /// while streaming, and promote it on a checksum match
    fn try_candidate(&self, candidate: &Candidate, expected: &Checksum) -> Result<PathBuf> {
        let part = self.cache.part_path(expected);

        let result = match candidate {
            Candidate::Http(url) => self.download_http(url, &part, expected),
            Candidate::Local(path) => {
                let mut file = File::open(path)?;
                self.stream_to_part(&mut file, &part, None)
            }
        };

        let actual = match result {
            Ok(sum) => sum,
            Err(e) => {
                let _ = fs::remove_file(&part);
                return Err(e);
            }
        };

        if actual != *expected {
            fs::remove_file(&part)?;
            return Err(Error::ChecksumMismatch {
                expected: expected.to_prefixed_string(),
                actual: actual.to_prefixed_string(),
            });
        }

        self.cache.commit(&part, expected)
    }

    fn download_http(&self, url: &Url, part: &std::path::Path, expected: &Checksum) -> Result<Checksum> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| Error::Download(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Download(format!("HTTP {}", response.status())));
        }

        let total = response.content_length().unwrap_or(0);
        let pb = self.progress_bar(total, expected);

        let mut response = response;
        let sum = self.stream_to_part(&mut response, part, Some(&pb))?;
        pb.finish_and_clear();
        Ok(sum)
    }

    /// Stream a reader to the staging file, returning the digest of the
    /// bytes written
    fn stream_to_part<R: Read>(
        &self,
        reader: &mut R,
        part: &std::path::Path,
        progress: Option<&ProgressBar>,
    ) -> Result<Checksum> {
        let mut file = File::create(part)?;
        let mut hasher = Hasher::new();
        let mut buffer = [0u8; STREAM_BUFFER_SIZE];
        let mut written: u64 = 0;

        loop {
            let n = reader
                .read(&mut buffer)
                .map_err(|e| Error::Download(format!("failed to read source: {}", e)))?;
            if n == 0 {
                break;
            }
            file.write_all(&buffer[..n])?;
            hasher.update(&buffer[..n]);
            written += n as u64;
            if let Some(pb) = progress {
                pb.set_position(written);
            }
        }

        file.flush()?;
        Ok(hasher.finalize())
    }

    fn progress_bar(&self, total: u64, expected: &Checksum) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = if total > 0 {
            let pb = ProgressBar::new(total);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:30.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}) {msg}")
                    .expect("Invalid progress bar template")
                    .progress_chars("#>-"),
            );
            pb
        } else {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {bytes} ({bytes_per_sec}) {msg}")
                    .expect("Invalid spinner template"),
            );
            pb
        };
        pb.set_message(format!("sha256:{}", &expected.as_hex()[..12]));
        pb
    }
}

/// Ensure the mirror base path ends with `/` so `Url::join` appends
/// instead of replacing the last segment
fn normalize_base(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}
