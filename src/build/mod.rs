// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Build pipeline: a directory of crawled pages in, a complete index on disk
//! out.
//!
//! The build is a single streaming pass with bounded memory. Accepted
//! documents accumulate positional postings in an in-memory map; every
//! `flush_limit` documents the map is serialized to a numbered partial file
//! and cleared. After the walk, the partials are merged (concatenating
//! position lists per term/doc pair, then re-sorting and deduping), split
//! into 27 prefix shards, and written out together with the auxiliary maps,
//! the idf table, and an analytics summary.
//!
//! Outputs are staged under a scratch directory and swapped into place only
//! after everything is written, so an interrupted build never leaves a
//! half-index pretending to be complete. Per-document failures never abort
//! the build; output I/O failures always do.

pub mod pipeline;

use crate::analysis::Analyzer;
use crate::config::{Config, IndexLayout};
use crate::dedup::DuplicateDetector;
use crate::store::{DocStats, ShardKey};
use crate::types::{DocId, DocTable, Posting, PostingList, Reject, Shard};
use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

pub use pipeline::{ingest_record, AcceptedDoc, PageRecord};

/// Positions accumulated in memory before they become [`Posting`]s.
type IndexAccumulator = HashMap<String, BTreeMap<DocId, Vec<u32>>>;

/// Skip tallies per rejection class, reported at the end of a build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RejectCounts {
    pub malformed: usize,
    pub invalid_url: usize,
    pub duplicate_id: usize,
    pub duplicate_content: usize,
    pub near_duplicate: usize,
    pub too_short: usize,
    pub extraction_failed: usize,
}

impl RejectCounts {
    fn record(&mut self, reject: &Reject) {
        match reject {
            Reject::MalformedJson => self.malformed += 1,
            Reject::InvalidUrl(_) => self.invalid_url += 1,
            Reject::DuplicateId => self.duplicate_id += 1,
            Reject::DuplicateContent => self.duplicate_content += 1,
            Reject::NearDuplicate => self.near_duplicate += 1,
            Reject::TooShort(_) => self.too_short += 1,
            Reject::ContentExtractionFailed => self.extraction_failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.malformed
            + self.invalid_url
            + self.duplicate_id
            + self.duplicate_content
            + self.near_duplicate
            + self.too_short
            + self.extraction_failed
    }
}

/// What a finished build looked like.
#[derive(Debug, Clone)]
pub struct BuildStats {
    pub docs_indexed: usize,
    pub unique_terms: usize,
    pub index_size_kb: u64,
    pub rejects: RejectCounts,
}

/// Run a full index build per `config`.
pub fn run_build(config: &Config) -> anyhow::Result<BuildStats> {
    let started = Instant::now();
    let layout = config.layout();
    let flush_limit = config.flush_limit.max(1);

    // Stage all committed artifacts; partials are transient and live at their
    // documented path directly.
    let staging_root = layout.root.join(".staging");
    let staged = IndexLayout::under(&staging_root);
    if staging_root.exists() {
        fs::remove_dir_all(&staging_root)
            .with_context(|| format!("failed to clear stale staging dir {}", staging_root.display()))?;
    }
    fs::create_dir_all(&staged.final_index_dir)
        .with_context(|| format!("failed to create {}", staged.final_index_dir.display()))?;
    clear_partials(&layout.partial_dir)?;
    fs::create_dir_all(&layout.partial_dir)
        .with_context(|| format!("failed to create {}", layout.partial_dir.display()))?;

    let analyzer = Analyzer::new();
    let mut dedup = DuplicateDetector::new();
    let mut accumulator = IndexAccumulator::new();
    let mut doc_map = DocTable::new();
    let mut title_map = DocTable::new();
    let mut heading_map = DocTable::new();
    let mut rejects = RejectCounts::default();
    let mut doc_count = 0usize;
    let mut flush_id = 0usize;

    let progress = ProgressBar::new_spinner().with_style(
        ProgressStyle::with_template("{spinner:.cyan} {prefix:<10} {pos} docs {msg}").unwrap(),
    );
    progress.set_prefix("Indexing");

    info!(data_dir = %config.data_dir.display(), "starting index build");

    for entry in walkdir::WalkDir::new(&config.data_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        if !entry.path().extension().is_some_and(|ext| ext == "json") {
            continue;
        }

        let raw = match fs::read_to_string(entry.path()) {
            Ok(raw) => raw,
            Err(err) => {
                debug!(path = %entry.path().display(), %err, "unreadable record");
                rejects.record(&Reject::MalformedJson);
                continue;
            }
        };

        let accepted = match ingest_record(
            &raw,
            &analyzer,
            &mut dedup,
            &config.allowed_domains,
            |id| doc_map.contains_key(&id),
        ) {
            Ok(doc) => doc,
            Err(reject) => {
                debug!(path = %entry.path().display(), %reject, "skipping record");
                rejects.record(&reject);
                continue;
            }
        };

        for (position, stem) in accepted.stems.iter().enumerate() {
            accumulator
                .entry(stem.clone())
                .or_default()
                .entry(accepted.doc_id)
                .or_default()
                .push(position as u32);
        }
        doc_map.insert(accepted.doc_id, accepted.url);
        title_map.insert(accepted.doc_id, accepted.title);
        heading_map.insert(accepted.doc_id, accepted.headings);

        doc_count += 1;
        progress.inc(1);

        if doc_count % flush_limit == 0 {
            flush_partial(&mut accumulator, flush_id, &layout.partial_dir)?;
            flush_id += 1;
            progress.set_message(format!("({flush_id} partials)"));
        }
    }

    if !accumulator.is_empty() {
        flush_partial(&mut accumulator, flush_id, &layout.partial_dir)?;
    }
    progress.finish_with_message("walk complete");

    let merged = merge_partials(&layout.partial_dir)?;
    let unique_terms = merged.len();
    info!(docs = doc_count, terms = unique_terms, "merged partial indices");

    let idf: BTreeMap<String, f64> = merged
        .iter()
        .map(|(term, list)| (term.clone(), (doc_count as f64 / list.len() as f64).ln()))
        .collect();

    write_json(&staged.idf, &idf)?;
    write_json(&staged.doc_map, &doc_map)?;
    write_json(&staged.title_map, &title_map)?;
    write_json(&staged.heading_map, &heading_map)?;
    write_json(&staged.doc_stats, &DocStats { doc_count })?;

    write_shards(&staged.final_index_dir, merged)?;

    let index_size_kb = dir_size(&staged.final_index_dir)? / 1024;
    let analytics = format!(
        "Documents indexed: {doc_count}\nUnique tokens: {unique_terms}\nIndex size on disk: {index_size_kb} KB\n"
    );
    fs::write(&staged.analytics, analytics)
        .with_context(|| format!("failed to write {}", staged.analytics.display()))?;

    clear_partials(&layout.partial_dir)?;
    commit_outputs(&staged, &layout)?;
    fs::remove_dir_all(&staging_root).ok();

    let stats = BuildStats {
        docs_indexed: doc_count,
        unique_terms,
        index_size_kb,
        rejects,
    };
    info!(
        docs = stats.docs_indexed,
        terms = stats.unique_terms,
        size_kb = stats.index_size_kb,
        skipped = stats.rejects.total(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "index build complete"
    );

    Ok(stats)
}

/// Serialize the accumulator as one partial index file and clear it.
///
/// Partial files use the same `term → doc → {positions}` shape as final
/// shards, just unsharded.
fn flush_partial(
    accumulator: &mut IndexAccumulator,
    flush_id: usize,
    partial_dir: &Path,
) -> anyhow::Result<PathBuf> {
    let as_postings: Shard = accumulator
        .drain()
        .map(|(term, docs)| {
            let list: PostingList = docs
                .into_iter()
                .map(|(doc_id, positions)| (doc_id, Posting { positions }))
                .collect();
            (term, list)
        })
        .collect();

    let path = partial_dir.join(format!("partial_{flush_id}.json"));
    write_json(&path, &as_postings)?;
    debug!(path = %path.display(), terms = as_postings.len(), "flushed partial index");
    Ok(path)
}

/// Fold every partial file back into one accumulator.
///
/// Position lists for the same (term, doc) pair are concatenated, then sorted
/// and deduped; partials come from disjoint document batches, so this is a
/// no-op reorder in the common case but still guards the strictly-ascending
/// posting invariant.
fn merge_partials(partial_dir: &Path) -> anyhow::Result<BTreeMap<String, PostingList>> {
    let mut files: Vec<PathBuf> = fs::read_dir(partial_dir)
        .with_context(|| format!("failed to list {}", partial_dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();

    let mut merged: HashMap<String, BTreeMap<DocId, Vec<u32>>> = HashMap::new();
    for path in files {
        let raw =
            fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))?;
        let partial: Shard = serde_json::from_str(&raw)
            .with_context(|| format!("corrupt partial index {}", path.display()))?;

        for (term, list) in partial {
            let entry = merged.entry(term).or_default();
            for (doc_id, posting) in list {
                entry.entry(doc_id).or_default().extend(posting.positions);
            }
        }
    }

    Ok(merged
        .into_iter()
        .map(|(term, docs)| {
            let list: PostingList = docs
                .into_iter()
                .map(|(doc_id, mut positions)| {
                    positions.sort_unstable();
                    positions.dedup();
                    (doc_id, Posting { positions })
                })
                .collect();
            (term, list)
        })
        .collect())
}

/// Bucket terms by first character and write all 27 shard files.
fn write_shards(final_index_dir: &Path, merged: BTreeMap<String, PostingList>) -> anyhow::Result<()> {
    let mut shards: HashMap<ShardKey, Shard> =
        ShardKey::all().map(|key| (key, Shard::new())).collect();
    for (term, list) in merged {
        let key = ShardKey::for_term(&term);
        shards
            .get_mut(&key)
            .expect("every shard key is preinitialized")
            .insert(term, list);
    }

    for (key, shard) in shards {
        write_json(&final_index_dir.join(key.file_name()), &shard)?;
    }
    Ok(())
}

/// Swap staged artifacts over the live layout, replacing whatever a previous
/// build left there.
fn commit_outputs(staged: &IndexLayout, live: &IndexLayout) -> anyhow::Result<()> {
    for (from, to) in staged
        .committed_artifacts()
        .into_iter()
        .zip(live.committed_artifacts())
    {
        if to.is_dir() {
            fs::remove_dir_all(to)
                .with_context(|| format!("failed to remove old {}", to.display()))?;
        } else if to.exists() {
            fs::remove_file(to).with_context(|| format!("failed to remove old {}", to.display()))?;
        }
        fs::rename(from, to)
            .with_context(|| format!("failed to move {} into place", to.display()))?;
    }
    Ok(())
}

fn clear_partials(partial_dir: &Path) -> anyhow::Result<()> {
    if partial_dir.exists() {
        fs::remove_dir_all(partial_dir)
            .with_context(|| format!("failed to clear {}", partial_dir.display()))?;
    }
    Ok(())
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let json =
        serde_json::to_string(value).with_context(|| format!("failed to encode {}", path.display()))?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

fn dir_size(dir: &Path) -> anyhow::Result<u64> {
    let mut total = 0;
    for entry in fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))? {
        let entry = entry?;
        total += entry.metadata()?.len();
    }
    Ok(total)
}
