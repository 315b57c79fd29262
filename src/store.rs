// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Read-only access to a built index.
//!
//! The auxiliary tables (doc map, title map, heading map, idf, doc stats) are
//! small and load eagerly when the store opens. Posting shards are the bulk of
//! the index, so they load lazily: the first query touching a `t...` term pays
//! for parsing `index_t.json`, everything after hits the in-store cache. The
//! cache lives inside the store value, not in module state, so two stores in
//! one process never see each other's data.
//!
//! A missing shard file is not an error; it reads as an empty shard and every
//! term in it resolves to `df = 0`. Opening fails only when the auxiliary
//! tables themselves are unreadable, which means there is no index here at
//! all.

use crate::config::IndexLayout;
use crate::types::{DocId, DocTable, PostingList, Shard};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Which prefix shard a term lives in: one per letter plus a catch-all for
/// terms starting with a digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShardKey {
    Letter(u8),
    Other,
}

impl ShardKey {
    pub fn for_term(term: &str) -> ShardKey {
        match term.bytes().next() {
            Some(b) if b.is_ascii_alphabetic() => ShardKey::Letter(b.to_ascii_lowercase()),
            _ => ShardKey::Other,
        }
    }

    /// All 27 shard keys in file order, for builders that write every shard.
    pub fn all() -> impl Iterator<Item = ShardKey> {
        (b'a'..=b'z')
            .map(ShardKey::Letter)
            .chain(std::iter::once(ShardKey::Other))
    }

    pub fn file_name(self) -> String {
        match self {
            ShardKey::Letter(b) => format!("index_{}.json", b as char),
            ShardKey::Other => "index_other.json".to_string(),
        }
    }
}

/// Corpus-level counters persisted beside the maps.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DocStats {
    pub doc_count: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON in {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The opened, immutable index. Only the shard cache mutates after open, and
/// only to fill in lazily.
pub struct IndexStore {
    final_index_dir: PathBuf,
    doc_map: DocTable,
    title_map: DocTable,
    heading_map: DocTable,
    idf: HashMap<String, f64>,
    total_docs: usize,
    shards: HashMap<ShardKey, Shard>,
}

impl IndexStore {
    /// Open an index at `layout`, loading every auxiliary table.
    pub fn open(layout: &IndexLayout) -> Result<Self, StoreError> {
        let doc_map: DocTable = read_json(&layout.doc_map)?;
        let title_map: DocTable = read_json(&layout.title_map)?;
        let heading_map: DocTable = read_json(&layout.heading_map)?;
        let idf: HashMap<String, f64> = read_json(&layout.idf)?;
        let stats: DocStats = read_json(&layout.doc_stats)?;

        debug!(
            docs = stats.doc_count,
            terms = idf.len(),
            "opened index store"
        );

        Ok(IndexStore {
            final_index_dir: layout.final_index_dir.clone(),
            doc_map,
            title_map,
            heading_map,
            idf,
            total_docs: stats.doc_count,
            shards: HashMap::new(),
        })
    }

    pub fn total_docs(&self) -> usize {
        self.total_docs
    }

    pub fn doc_map(&self) -> &DocTable {
        &self.doc_map
    }

    pub fn url(&self, doc_id: DocId) -> Option<&str> {
        self.doc_map.get(&doc_id).map(String::as_str)
    }

    /// Lowercased title, empty if the page had none.
    pub fn title(&self, doc_id: DocId) -> &str {
        self.title_map.get(&doc_id).map_or("", String::as_str)
    }

    /// Flat lowercased heading string, empty if the page had none.
    pub fn headings(&self, doc_id: DocId) -> &str {
        self.heading_map.get(&doc_id).map_or("", String::as_str)
    }

    /// `ln(N / df)` for an indexed term, 0.0 for anything else.
    pub fn idf(&self, term: &str) -> f64 {
        self.idf.get(term).copied().unwrap_or(0.0)
    }

    /// Load the shard for `term` and return its posting list with the
    /// document frequency. `df == 0` signals an absent term.
    pub fn load_postings(&mut self, term: &str) -> (Option<&PostingList>, usize) {
        self.ensure_shard(term);
        let list = self.shards[&ShardKey::for_term(term)].get(term);
        let df = list.map_or(0, PostingList::len);
        (list, df)
    }

    /// Make sure the shard holding `term` is cached. Split out from
    /// [`Self::postings`] so a query can warm every needed shard first and
    /// then hold borrowed posting lists for several terms at once.
    pub fn ensure_shard(&mut self, term: &str) {
        let key = ShardKey::for_term(term);
        if self.shards.contains_key(&key) {
            return;
        }
        let shard = self.read_shard(key);
        self.shards.insert(key, shard);
    }

    /// Posting list for a term whose shard was already warmed, if indexed.
    pub fn postings(&self, term: &str) -> Option<&PostingList> {
        self.shards
            .get(&ShardKey::for_term(term))
            .and_then(|shard| shard.get(term))
    }

    fn read_shard(&self, key: ShardKey) -> Shard {
        let path = self.final_index_dir.join(key.file_name());
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) => {
                debug!(path = %path.display(), %err, "shard unavailable, treating as empty");
                return Shard::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(shard) => shard,
            Err(err) => {
                warn!(path = %path.display(), %err, "unparseable shard, treating as empty");
                Shard::new()
            }
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let raw = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}
