//! Ranking behavior: coverage, phrase boosts, and field boosts.

use crate::common::{build_corpus, build_records_with_flush_limit, raw_page, result_urls};

#[test]
fn full_coverage_ranks_above_partial_coverage() {
    let built = build_corpus(&[
        (
            "http://ics.uci.edu/a",
            "machine learning research happens here daily",
        ),
        (
            "http://ics.uci.edu/b",
            "machine shop safety training with drill presses",
        ),
    ]);
    let mut engine = built.engine();

    let hits = engine.search("machine learning");
    assert_eq!(hits.len(), 2);
    assert!(hits[0].url.ends_with("/a"));
    assert!(hits[1].url.ends_with("/b"));
    assert!(hits[0].score > hits[1].score);
}

#[test]
fn consecutive_phrase_earns_the_strict_boost() {
    let built = build_corpus(&[
        (
            "http://ics.uci.edu/mswe",
            "apply to the master of software engineering program this winter",
        ),
        (
            "http://ics.uci.edu/scattered",
            "software quality is the engineering goal every master practices daily",
        ),
    ]);
    let mut engine = built.engine();

    // Stop words vanish from both query and documents, so "master of
    // software engineering" indexes as consecutive stems on the first page.
    let hits = engine.search("master of software engineering");
    assert_eq!(hits.len(), 2);
    assert!(hits[0].url.ends_with("/mswe"));

    // Both documents contain all three stems (coverage 1.0); the gap between
    // them is the strict phrase boost, give or take the smaller boosts.
    assert!(hits[0].score - hits[1].score > 800.0);
}

#[test]
fn stop_words_do_not_change_the_ranking() {
    let built = build_corpus(&[
        ("http://ics.uci.edu/acm1", "acm chapter hosts programming contests yearly"),
        ("http://ics.uci.edu/acm2", "our acm student members meet on tuesdays"),
        ("http://ics.uci.edu/other", "campus parking regulations updated for fall"),
    ]);
    let mut engine = built.engine();

    assert_eq!(result_urls(&mut engine, "the ACM"), result_urls(&mut engine, "ACM"));
}

#[test]
fn title_match_outranks_body_match() {
    let records = vec![
        raw_page(
            "http://ics.uci.edu/gradcs",
            "<html><head><title>Graduate admissions</title></head>\
             <body><p>admissions deadlines and forms for the upcoming cycle</p></body></html>",
        ),
        raw_page(
            "http://ics.uci.edu/blog",
            "<html><head><title>Department blog</title></head>\
             <body><p>admissions season opened again this week folks</p></body></html>",
        ),
    ];
    let built = build_records_with_flush_limit(&records, 5000);
    let mut engine = built.engine();

    let hits = engine.search("admissions");
    assert_eq!(hits.len(), 2);
    assert!(hits[0].url.ends_with("/gradcs"));
}

#[test]
fn heading_match_boosts_a_page() {
    let records = vec![
        raw_page(
            "http://ics.uci.edu/with-heading",
            "<html><body><h1>Robotics laboratory</h1>\
             <p>general information about our facilities and access</p></body></html>",
        ),
        raw_page(
            "http://ics.uci.edu/plain",
            "<html><body><p>the robotics group also maintains equipment lists</p></body></html>",
        ),
    ];
    let built = build_records_with_flush_limit(&records, 5000);
    let mut engine = built.engine();

    let hits = engine.search("robotics");
    assert_eq!(hits.len(), 2);
    assert!(hits[0].url.ends_with("/with-heading"));
}

#[test]
fn results_are_capped_at_five() {
    let pages: Vec<(String, String)> = (0..8)
        .map(|i| {
            (
                format!("http://ics.uci.edu/page{i}"),
                format!("shared keyword plus unique filler number{i} padding words"),
            )
        })
        .collect();
    let borrowed: Vec<(&str, &str)> = pages
        .iter()
        .map(|(u, b)| (u.as_str(), b.as_str()))
        .collect();
    let built = build_corpus(&borrowed);
    let mut engine = built.engine();

    assert_eq!(engine.search("keyword").len(), 5);
    assert_eq!(engine.search_top("keyword", 8).len(), 8);
}

#[test]
fn tied_scores_break_by_ascending_doc_id() {
    // Two pages with identical scoring inputs except their URLs hash apart.
    let built = build_corpus(&[
        ("http://ics.uci.edu/tie1", "unique subject matter aaa bbb ccc"),
        ("http://ics.uci.edu/tie2", "unique subject matter ddd eee fff"),
    ]);
    let mut engine = built.engine();

    let hits = engine.search("subject");
    assert_eq!(hits.len(), 2);
    assert!(hits[0].doc_id < hits[1].doc_id);
}
