//! Build and search configuration.
//!
//! A small JSON file overrides the defaults; every field is optional. The
//! interesting knob is `allowed_domains`, which swaps the crawl scope without
//! touching code. `flush_limit` mostly matters for tests, which shrink it to
//! force multi-partial builds on tiny corpora.

use crate::urls::DEFAULT_ALLOWED_DOMAINS;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Accepted documents between partial-index flushes.
pub const DEFAULT_FLUSH_LIMIT: usize = 5000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory walked recursively for per-page `.json` records.
    pub data_dir: PathBuf,
    /// Root under which all index artifacts are written.
    pub output_dir: PathBuf,
    /// Host suffixes (optionally `host/path-prefix`) accepted by the URL
    /// validator.
    pub allowed_domains: Vec<String>,
    /// Accepted documents between partial-index flushes.
    pub flush_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("."),
            allowed_domains: DEFAULT_ALLOWED_DOMAINS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            flush_limit: DEFAULT_FLUSH_LIMIT,
        }
    }
}

impl Config {
    /// Read a config file, failing loudly on unreadable or invalid JSON.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("invalid config JSON in {}", path.display()))
    }

    /// Config from an optional `--config` argument, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn layout(&self) -> IndexLayout {
        IndexLayout::under(&self.output_dir)
    }
}

/// Where every artifact of one build lives.
///
/// Derived from a single root so the builder can stage a complete layout in a
/// scratch directory and swap it in wholesale.
#[derive(Debug, Clone)]
pub struct IndexLayout {
    pub root: PathBuf,
    pub partial_dir: PathBuf,
    pub final_index_dir: PathBuf,
    pub doc_map: PathBuf,
    pub title_map: PathBuf,
    pub heading_map: PathBuf,
    pub idf: PathBuf,
    pub doc_stats: PathBuf,
    pub analytics: PathBuf,
}

impl IndexLayout {
    pub fn under(root: &Path) -> Self {
        IndexLayout {
            root: root.to_path_buf(),
            partial_dir: root.join("partial_indices"),
            final_index_dir: root.join("final_index"),
            doc_map: root.join("doc_map.json"),
            title_map: root.join("title_map.json"),
            heading_map: root.join("heading_map.json"),
            idf: root.join("idf.json"),
            doc_stats: root.join("doc_stats.json"),
            analytics: root.join("analytics.txt"),
        }
    }

    /// The artifacts swapped into place when a build commits, i.e. everything
    /// except the transient partial directory.
    pub fn committed_artifacts(&self) -> [&Path; 7] {
        [
            &self.final_index_dir,
            &self.doc_map,
            &self.title_map,
            &self.heading_map,
            &self.idf,
            &self.doc_stats,
            &self.analytics,
        ]
    }
}
