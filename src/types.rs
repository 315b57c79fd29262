// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks of the index.
//!
//! These types define how terms, documents, and positions fit together, and
//! they double as the on-disk schema: every persisted artifact is one of the
//! aliases below serialized through serde_json. Doc ids are 32-bit integers in
//! memory but decimal strings in JSON (that is just how JSON object keys work),
//! so a store that keys by string round-trips them without loss.
//!
//! # Invariants (the stuff that breaks if you ignore it)
//!
//! - **Posting**: positions are strictly ascending and unique. The merge step
//!   re-sorts and dedups after concatenating across partial files, so a posting
//!   read back from a final shard always satisfies this.
//!
//! - **PostingList**: keyed by `DocId`; `df` of a term is exactly the key count
//!   of its posting list. There is no cached `df` field to drift out of sync.
//!
//! - Every `DocId` appearing in any posting list has an entry in the doc map.
//!   The build pipeline only inserts into the maps after a document clears
//!   every rejection filter.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Type-safe document identifier.
///
/// The value is the first 32 bits of the MD5 of the normalized URL, so it is
/// stable across builds and across machines. Prevents accidentally passing a
/// token position where a document id is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct DocId(pub u32);

impl DocId {
    /// Get the underlying value.
    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for DocId {
    fn from(id: u32) -> Self {
        DocId(id)
    }
}

impl std::fmt::Display for DocId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// All occurrences of one term in one document.
///
/// Positions are 0-based indices into the document's stem stream, strictly
/// ascending. Term frequency is just the length, which is why there is no
/// separate `tf` field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub positions: Vec<u32>,
}

impl Posting {
    /// Term frequency: how many times the term occurs in the document.
    #[inline]
    pub fn tf(&self) -> usize {
        self.positions.len()
    }

    /// Whether the term occurs at `position`. Binary search over the sorted
    /// position list.
    #[inline]
    pub fn has_position(&self, position: u32) -> bool {
        self.positions.binary_search(&position).is_ok()
    }
}

/// All postings for a term, keyed by document id.
///
/// `BTreeMap` rather than `HashMap` so serialization order is deterministic;
/// re-running a build on the same corpus must produce byte-identical shards.
pub type PostingList = BTreeMap<DocId, Posting>;

/// One prefix shard of the final index: term → posting list.
pub type Shard = BTreeMap<String, PostingList>;

/// Doc-keyed auxiliary table (doc map, title map, heading map).
pub type DocTable = BTreeMap<DocId, String>;

/// A single ranked search result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub url: String,
    pub score: f64,
}

/// Why a document was skipped during ingestion.
///
/// Every per-document failure mode is a value, not an exception: the build
/// loop tallies these and moves on. Only output I/O aborts a build.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Reject {
    #[error("unreadable or malformed JSON record")]
    MalformedJson,
    #[error("url failed validation: {0}")]
    InvalidUrl(String),
    #[error("doc id already assigned (url dup or hash collision)")]
    DuplicateId,
    #[error("exact duplicate of previously indexed content")]
    DuplicateContent,
    #[error("near-duplicate of previously indexed content")]
    NearDuplicate,
    #[error("main text shorter than {0} tokens")]
    TooShort(usize),
    #[error("no extractable content")]
    ContentExtractionFailed,
}
