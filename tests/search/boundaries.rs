//! Degenerate queries and partial-index conditions.

use crate::common::{build_corpus, result_urls};
use crawldex::SearchEngine;
use std::fs;

const PAGES: [(&str, &str); 2] = [
    (
        "http://ics.uci.edu/ml",
        "machine learning seminars run weekly during the academic year",
    ),
    (
        "http://ics.uci.edu/zoo",
        "zebra genome datasets hosted for comparative biology research",
    ),
];

#[test]
fn stop_word_only_query_returns_nothing() {
    let built = build_corpus(&PAGES);
    let mut engine = built.engine();

    assert!(engine.search("the of and").is_empty());
    assert!(engine.search("").is_empty());
    assert!(engine.search("   ").is_empty());
}

#[test]
fn unknown_term_query_returns_nothing() {
    let built = build_corpus(&PAGES);
    let mut engine = built.engine();

    assert!(engine.search("xylophone").is_empty());
}

#[test]
fn absent_term_does_not_kill_the_query() {
    let built = build_corpus(&PAGES);
    let mut engine = built.engine();

    // "machine" is indexed, "xylophone" is not; partial coverage still wins.
    let urls = result_urls(&mut engine, "machine xylophone");
    assert_eq!(urls, vec!["http://ics.uci.edu/ml"]);
}

#[test]
fn missing_shard_file_reads_as_unindexed() {
    let built = build_corpus(&PAGES);
    fs::remove_file(built.layout().final_index_dir.join("index_z.json")).unwrap();

    let mut engine = built.engine();
    assert!(engine.search("zebra").is_empty());
    // Other shards are unaffected
    assert_eq!(engine.search("machine").len(), 1);
}

#[test]
fn opening_a_missing_index_fails() {
    let temp = tempfile::TempDir::new().unwrap();
    let layout = crawldex::IndexLayout::under(temp.path());
    assert!(SearchEngine::open(&layout).is_err());
}

#[test]
fn hits_carry_urls_and_finite_scores() {
    let built = build_corpus(&PAGES);
    let mut engine = built.engine();

    for hit in engine.search("research machine") {
        assert!(hit.url.starts_with("http://"));
        assert!(hit.score.is_finite());
    }
}
