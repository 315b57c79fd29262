//! Shared test utilities and fixtures.

#![allow(dead_code)]

use crawldex::{run_build, BuildStats, Config, IndexLayout, SearchEngine};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A built index rooted in a temp directory, with its corpus beside it.
pub struct BuiltIndex {
    pub temp: TempDir,
    pub config: Config,
    pub stats: BuildStats,
}

impl BuiltIndex {
    pub fn layout(&self) -> IndexLayout {
        self.config.layout()
    }

    pub fn engine(&self) -> SearchEngine {
        SearchEngine::open(&self.layout()).expect("built index should open")
    }
}

/// A page record JSON string wrapping `body_html` in a minimal document.
pub fn page(url: &str, body_html: &str) -> String {
    serde_json::json!({
        "url": url,
        "content": format!("<html><body>{body_html}</body></html>"),
    })
    .to_string()
}

/// A page record with full control over the HTML document.
pub fn raw_page(url: &str, html: &str) -> String {
    serde_json::json!({ "url": url, "content": html }).to_string()
}

/// Write records into `dir` as `page_<i>.json`.
pub fn write_records(dir: &Path, records: &[String]) {
    fs::create_dir_all(dir).unwrap();
    for (i, record) in records.iter().enumerate() {
        fs::write(dir.join(format!("page_{i:03}.json")), record).unwrap();
    }
}

/// Build an index over `records` with the given flush limit.
pub fn build_records_with_flush_limit(records: &[String], flush_limit: usize) -> BuiltIndex {
    let temp = TempDir::new().expect("temp dir");
    let data_dir = temp.path().join("data");
    let output_dir = temp.path().join("out");
    write_records(&data_dir, records);
    fs::create_dir_all(&output_dir).unwrap();

    let config = Config {
        data_dir,
        output_dir,
        flush_limit,
        ..Config::default()
    };
    let stats = run_build(&config).expect("build should succeed");

    BuiltIndex {
        temp,
        config,
        stats,
    }
}

/// Build an index over `(url, body_html)` pairs with the default flush limit.
pub fn build_corpus(pages: &[(&str, &str)]) -> BuiltIndex {
    let records: Vec<String> = pages.iter().map(|(url, body)| page(url, body)).collect();
    build_records_with_flush_limit(&records, 5000)
}

/// Ordered result URLs for a query.
pub fn result_urls(engine: &mut SearchEngine, query: &str) -> Vec<String> {
    engine
        .search(query)
        .into_iter()
        .map(|hit| hit.url)
        .collect()
}
