//! Positional inverted-index search over crawled HTML corpora.
//!
//! This crate turns a directory of per-page JSON records (URL + raw HTML)
//! into a prefix-sharded positional index on disk, and answers free-text
//! queries with TF-IDF ranked URLs. Builds are batch and streaming with
//! bounded memory; the query path opens the finished index read-only.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐   ┌───────────┐   ┌────────────┐
//! │ analysis   │   │ urls      │   │ dedup      │
//! │ (extract,  │   │ (validate,│   │ (exact +   │
//! │  tokenize, │   │  normalize│   │  jaccard)  │
//! │  stem)     │   │  stable_id│   │            │
//! └─────┬──────┘   └─────┬─────┘   └─────┬──────┘
//!       └────────────────┼───────────────┘
//!                        ▼
//!                  ┌───────────┐    flush/merge/shard    ┌───────────┐
//!                  │ build     │────────────────────────▶│ on-disk   │
//!                  │ (pipeline)│                         │ layout    │
//!                  └───────────┘                         └─────┬─────┘
//!                                                              ▼
//!                  ┌───────────┐   ┌───────────┐         ┌───────────┐
//!                  │ engine    │──▶│ query     │────────▶│ store     │
//!                  │ (driver)  │   │ + scoring │         │ (lazy     │
//!                  └───────────┘   └───────────┘         │  shards)  │
//!                                                        └───────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use crawldex::{run_build, Config, SearchEngine};
//!
//! let config = Config::default();
//! run_build(&config)?;
//!
//! let mut engine = SearchEngine::open(&config.layout())?;
//! for hit in engine.search("machine learning") {
//!     println!("{} ({:.1})", hit.url, hit.score);
//! }
//! ```

pub mod analysis;
pub mod build;
pub mod config;
pub mod dedup;
pub mod engine;
pub mod query;
pub mod scoring;
pub mod store;
pub mod types;
pub mod urls;

// Re-exports for the public API
pub use analysis::{Analyzer, ExtractedPage};
pub use build::{run_build, BuildStats, RejectCounts};
pub use config::{Config, IndexLayout};
pub use dedup::DuplicateDetector;
pub use engine::SearchEngine;
pub use query::run_query;
pub use store::{DocStats, IndexStore, ShardKey, StoreError};
pub use types::{DocId, DocTable, Posting, PostingList, Reject, SearchHit, Shard};
