// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The math behind result ranking.
//!
//! A candidate document's score is TF-IDF plus a stack of boosts: URL hits,
//! title hits, heading hits, and a phrase bonus, all multiplied by coverage
//! (the fraction of query terms the document actually contains). The boost
//! constants are deliberately far apart. A strict phrase match (1000) beats
//! any pile of title matches (100 each), and a title match beats any
//! plausible TF-IDF contribution, which for normalized term frequencies tops
//! out near the idf sum.
//!
//! Phrase detection comes in two strengths. Strict: the query stems appear at
//! consecutive positions. Proximity: all stems fall inside a window of span
//! ≤ 4, used only when no candidate in the whole result set strict-matches.
//! Proximity scanning merges every position list, so documents with huge
//! lists are skipped past a cap to bound the cost.

use crate::store::IndexStore;
use crate::types::{DocId, PostingList};
use std::collections::HashMap;

/// Bonus per query term found in the lowercased URL.
pub const URL_SUBSTRING_BOOST: f64 = 2.0;

/// Extra bonus when the term also matches the URL with original casing.
pub const URL_RAW_BOOST: f64 = 1.0;

/// Bonus per query term found in the page title. Dominates URL and TF-IDF
/// contributions so a title hit reliably floats the page.
pub const TITLE_MATCH_BOOST: f64 = 100.0;

/// Bonus per query term found in the flat heading string. The heading map
/// stores one lowercased string for all first-tier headings, so this is the
/// single h1-level weight.
pub const HEADING_MATCH_BOOST: f64 = 50.0;

/// Bonus when the query appears as a consecutive phrase.
pub const STRICT_PHRASE_BOOST: f64 = 1000.0;

/// Bonus for the weaker windowed phrase match.
pub const PROXIMITY_PHRASE_BOOST: f64 = 50.0;

/// Maximum span (last position minus first) for a proximity window.
pub const PROXIMITY_WINDOW: u32 = 4;

/// Proximity scanning skips documents where any term's position list exceeds
/// this many entries.
pub const PROXIMITY_POSITION_CAP: usize = 2000;

/// Applied to every score when phrase matches are a mixed signal, i.e. the
/// phrase-matching fraction of candidates is strictly between these bounds.
pub const MIXED_INTENT_DAMPING: f64 = 0.85;
pub const MIXED_INTENT_LOW: f64 = 0.1;
pub const MIXED_INTENT_HIGH: f64 = 0.9;

/// Results returned per query.
pub const TOP_K: usize = 5;

/// Postings for the query's terms, borrowed from a warmed store.
pub type TermPostings<'a> = HashMap<&'a str, &'a PostingList>;

/// Does the document contain the query stems at consecutive positions?
///
/// Anchors on each position of the first term and checks that term `i` occurs
/// exactly `i` places later. A single-term query trivially phrase-matches any
/// document containing it.
pub fn strict_phrase(terms: &[String], doc_id: DocId, postings: &TermPostings<'_>) -> bool {
    let mut lists = Vec::with_capacity(terms.len());
    for term in terms {
        match postings.get(term.as_str()).and_then(|pl| pl.get(&doc_id)) {
            Some(posting) => lists.push(posting),
            None => return false,
        }
    }
    let Some((first, rest)) = lists.split_first() else {
        return false;
    };

    first.positions.iter().any(|&anchor| {
        rest.iter()
            .enumerate()
            .all(|(i, posting)| posting.has_position(anchor + i as u32 + 1))
    })
}

/// Do all query stems land inside one small window?
///
/// Merges every term's positions into one sorted list and slides a window of
/// `terms.len()` entries over it, accepting any window whose span is at most
/// [`PROXIMITY_WINDOW`]. Documents with an oversized position list are
/// skipped outright.
pub fn proximity_phrase(terms: &[String], doc_id: DocId, postings: &TermPostings<'_>) -> bool {
    let mut lists = Vec::with_capacity(terms.len());
    for term in terms {
        match postings.get(term.as_str()).and_then(|pl| pl.get(&doc_id)) {
            Some(posting) => lists.push(posting),
            None => return false,
        }
    }
    if lists.is_empty() || lists.iter().any(|p| p.tf() > PROXIMITY_POSITION_CAP) {
        return false;
    }

    let mut all_positions: Vec<u32> = lists
        .iter()
        .flat_map(|p| p.positions.iter().copied())
        .collect();
    all_positions.sort_unstable();

    let width = terms.len();
    all_positions
        .windows(width)
        .any(|w| w[width - 1] - w[0] <= PROXIMITY_WINDOW)
}

/// Score one candidate document.
///
/// `phrase_boost` is decided by the caller (strict vs proximity vs none is a
/// result-set-wide decision, not a per-document one); `coverage` is the
/// fraction of query terms present in this document and multiplies the whole
/// sum.
pub fn score_document(
    store: &IndexStore,
    doc_id: DocId,
    terms: &[String],
    postings: &TermPostings<'_>,
    phrase_boost: f64,
    coverage: f64,
) -> f64 {
    let per_term_tf = |term: &str| {
        postings
            .get(term)
            .and_then(|pl| pl.get(&doc_id))
            .map(|posting| posting.tf())
    };

    let doc_len: usize = terms.iter().filter_map(|t| per_term_tf(t)).sum();

    let mut tfidf = 0.0;
    if doc_len > 0 {
        for term in terms {
            if let Some(tf) = per_term_tf(term) {
                tfidf += (tf as f64 / doc_len as f64) * store.idf(term);
            }
        }
    }

    let url = store.url(doc_id).unwrap_or("");
    let url_lower = url.to_lowercase();
    let mut url_boost = 0.0;
    for term in terms {
        if url_lower.contains(term.as_str()) {
            url_boost += URL_SUBSTRING_BOOST;
        }
        if url.contains(term.as_str()) {
            url_boost += URL_RAW_BOOST;
        }
    }
    url_boost -= url.matches('/').count() as f64;

    let title = store.title(doc_id);
    let headings = store.headings(doc_id);
    let mut field_boost = 0.0;
    for term in terms {
        if title.contains(term.as_str()) {
            field_boost += TITLE_MATCH_BOOST;
        }
        if headings.contains(term.as_str()) {
            field_boost += HEADING_MATCH_BOOST;
        }
    }

    (tfidf + url_boost + field_boost + phrase_boost) * coverage
}
