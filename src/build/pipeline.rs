// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Per-document ingestion: one crawled page in, an accepted document or a
//! [`Reject`] out.
//!
//! The gauntlet runs cheapest-first: JSON shape, URL policy, id collision,
//! content extraction, duplicate filters, and finally analysis. Nothing in
//! here panics or aborts a build; every failure mode is a `Reject` value the
//! build loop tallies and walks past.

use crate::analysis::Analyzer;
use crate::dedup::DuplicateDetector;
use crate::types::{DocId, Reject};
use crate::urls;
use serde::Deserialize;

/// One crawled page as the crawler wrote it. Unknown fields (encoding and
/// friends) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct PageRecord {
    pub url: String,
    pub content: String,
}

/// A page that cleared every filter, carrying everything the index builder
/// needs: identity, display metadata, and the positional stem stream.
#[derive(Debug, Clone)]
pub struct AcceptedDoc {
    pub doc_id: DocId,
    pub url: String,
    pub title: String,
    pub headings: String,
    pub stems: Vec<String>,
}

/// Run one raw record through the full pipeline.
///
/// `is_known_id` lets the caller own the id collision check, since the doc
/// map accumulator lives in the build loop. Ids collide when the same
/// normalized URL appears twice or, astronomically rarely, when two URLs
/// share an MD5 prefix; either way the later document loses.
pub fn ingest_record(
    raw: &str,
    analyzer: &Analyzer,
    dedup: &mut DuplicateDetector,
    allowed_domains: &[String],
    is_known_id: impl Fn(DocId) -> bool,
) -> Result<AcceptedDoc, Reject> {
    let record: PageRecord = serde_json::from_str(raw).map_err(|_| Reject::MalformedJson)?;

    if !urls::is_valid(&record.url, allowed_domains) {
        return Err(Reject::InvalidUrl(record.url));
    }
    let url = urls::normalize(&record.url);
    let doc_id = urls::stable_id(&url);
    if is_known_id(doc_id) {
        return Err(Reject::DuplicateId);
    }

    let page = analyzer
        .extract(&record.content)
        .ok_or(Reject::ContentExtractionFailed)?;

    dedup.check_and_remember(&page.main_text)?;

    let stems = analyzer.analyze(&page.main_text);

    Ok(AcceptedDoc {
        doc_id,
        url,
        title: page.title,
        headings: page.headings,
        stems,
    })
}
