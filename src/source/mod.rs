// src/source/mod.rs

//! Source retrieval: candidate resolution, download, verification, cache
//!
//! Given a recipe, retrieval tries each candidate URL in order (internal
//! mirror scheme first, public fallback second) until one yields an
//! archive matching the pinned checksum. Verified archives land in a
//! checksum-keyed cache and are reused on later runs.

mod cache;
mod fetch;

pub use cache::ArchiveCache;
pub use fetch::Fetcher;
