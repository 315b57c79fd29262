// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query planning: from a raw query string to ranked hits.
//!
//! The plan is fixed and small:
//!
//! 1. Analyze the query with the same stemmer the index was built with.
//! 2. Warm and fetch the posting list for each stem. Absent stems are
//!    dropped, not fatal; a query survives any subset of its terms missing.
//! 3. Union the posting keys into a candidate set, tracking per-document
//!    coverage (how many query terms the document contains).
//! 4. Phrase detection. Full-coverage candidates are tested for a strict
//!    consecutive-position match; only if *no* candidate strict-matches does
//!    the planner fall back to windowed proximity matching. The choice is
//!    result-set-wide so strict and proximity bonuses never mix in one
//!    ranking.
//! 5. Score every candidate (TF-IDF + boosts, × coverage), damping the whole
//!    set when phrase matches are a mixed signal.
//! 6. Sort score-descending with ascending doc id as the tiebreak, truncate
//!    to `k`, resolve URLs.
//!
//! Nothing here returns an error: an unanswerable query is an empty vector.

use crate::analysis::Analyzer;
use crate::scoring::{
    self, TermPostings, MIXED_INTENT_DAMPING, MIXED_INTENT_HIGH, MIXED_INTENT_LOW,
    PROXIMITY_PHRASE_BOOST, STRICT_PHRASE_BOOST,
};
use crate::store::IndexStore;
use crate::types::{DocId, SearchHit};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Evaluate `query` against the store and return the top `k` hits.
pub fn run_query(
    store: &mut IndexStore,
    analyzer: &Analyzer,
    query: &str,
    k: usize,
) -> Vec<SearchHit> {
    let terms = analyzer.analyze_query(query);
    if terms.is_empty() {
        return Vec::new();
    }

    for term in &terms {
        store.ensure_shard(term);
    }

    let store = &*store;
    let mut postings = TermPostings::new();
    for term in &terms {
        if let Some(list) = store.postings(term) {
            postings.insert(term.as_str(), list);
        }
    }
    if postings.is_empty() {
        debug!(?terms, "no query term is indexed");
        return Vec::new();
    }

    // Candidate union with per-document term counts.
    let mut term_hits: HashMap<DocId, usize> = HashMap::new();
    for term in &terms {
        if let Some(list) = postings.get(term.as_str()) {
            for doc_id in list.keys() {
                *term_hits.entry(*doc_id).or_default() += 1;
            }
        }
    }

    let full_coverage: Vec<DocId> = term_hits
        .iter()
        .filter(|(_, hits)| **hits == terms.len())
        .map(|(doc_id, _)| *doc_id)
        .collect();

    let strict_matches: HashSet<DocId> = full_coverage
        .iter()
        .copied()
        .filter(|doc_id| scoring::strict_phrase(&terms, *doc_id, &postings))
        .collect();

    let (phrase_docs, phrase_boost) = if strict_matches.is_empty() {
        let proximity: HashSet<DocId> = full_coverage
            .iter()
            .copied()
            .filter(|doc_id| scoring::proximity_phrase(&terms, *doc_id, &postings))
            .collect();
        (proximity, PROXIMITY_PHRASE_BOOST)
    } else {
        (strict_matches, STRICT_PHRASE_BOOST)
    };

    let total_terms = terms.len() as f64;
    let mut hits: Vec<SearchHit> = term_hits
        .iter()
        .map(|(&doc_id, &contained)| {
            let coverage = contained as f64 / total_terms;
            let boost = if phrase_docs.contains(&doc_id) {
                phrase_boost
            } else {
                0.0
            };
            let score = scoring::score_document(store, doc_id, &terms, &postings, boost, coverage);
            SearchHit {
                doc_id,
                url: store.url(doc_id).unwrap_or("").to_string(),
                score,
            }
        })
        .collect();

    // A middling phrase-match rate means the query intent is ambiguous;
    // dampen everything rather than guess.
    let phrase_fraction = phrase_docs.len() as f64 / term_hits.len() as f64;
    if phrase_fraction > MIXED_INTENT_LOW && phrase_fraction < MIXED_INTENT_HIGH {
        for hit in &mut hits {
            hit.score *= MIXED_INTENT_DAMPING;
        }
    }

    hits.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.doc_id.cmp(&b.doc_id))
    });
    hits.truncate(k);

    debug!(
        query,
        candidates = term_hits.len(),
        phrase_matches = phrase_docs.len(),
        returned = hits.len(),
        "query evaluated"
    );

    hits
}
