// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Duplicate and low-value content filtering.
//!
//! Three gates, cheapest first: a minimum-length check, an exact MD5 match
//! against everything accepted so far, and a Jaccard similarity scan over the
//! shingle sets of previously accepted documents. Crawled university sites are
//! heavy on mirrored pages and boilerplate stubs; without these gates the same
//! page indexed under four aliases would dominate every ranking it appears in.
//!
//! The Jaccard scan is exact and O(accepted docs) per document, which is fine
//! up to corpora in the low hundreds of thousands. A MinHash/LSH approximation
//! would trade that for constant-time lookups at a small recall cost; the
//! exact scan is canonical here.

use crate::types::Reject;
use std::collections::HashSet;

/// Similarity above this is a near-duplicate.
pub const NEAR_DUPLICATE_THRESHOLD: f64 = 0.9;

/// Documents with fewer whitespace tokens of main text than this are noise.
pub const MIN_MAIN_TEXT_TOKENS: usize = 5;

/// Rolling memory of accepted content, owned by one build pass.
#[derive(Default)]
pub struct DuplicateDetector {
    seen_hashes: HashSet<[u8; 16]>,
    seen_shingles: Vec<HashSet<String>>,
}

impl DuplicateDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the gates over extracted main text. On success the text's hash and
    /// shingle set are remembered for future comparisons.
    ///
    /// The hash is recorded as soon as the exact gate passes, so a page whose
    /// twin was rejected as a near-duplicate still registers as an exact
    /// duplicate rather than re-running the similarity scan.
    pub fn check_and_remember(&mut self, main_text: &str) -> Result<(), Reject> {
        if main_text.split_whitespace().count() < MIN_MAIN_TEXT_TOKENS {
            return Err(Reject::TooShort(MIN_MAIN_TEXT_TOKENS));
        }

        let digest = md5::compute(main_text.as_bytes());
        if !self.seen_hashes.insert(digest.0) {
            return Err(Reject::DuplicateContent);
        }

        let shingles = shingle_set(main_text);
        if self
            .seen_shingles
            .iter()
            .any(|prev| jaccard(&shingles, prev) > NEAR_DUPLICATE_THRESHOLD)
        {
            return Err(Reject::NearDuplicate);
        }
        self.seen_shingles.push(shingles);

        Ok(())
    }
}

/// Shingles are just the set of lowercase whitespace-separated tokens.
fn shingle_set(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        // Both empty; unreachable behind the length gate.
        return 0.0;
    }
    intersection as f64 / union as f64
}
