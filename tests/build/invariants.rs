//! Structural invariants of a finished index.

use crate::common::{build_corpus, build_records_with_flush_limit, page};
use crawldex::{Analyzer, DocTable, Shard, ShardKey};
use std::collections::BTreeSet;
use std::fs;

const PAGES: [(&str, &str); 3] = [
    (
        "http://ics.uci.edu/ml",
        "machine learning research groups study neural models and machine translation",
    ),
    (
        "http://ics.uci.edu/sys",
        "distributed systems research focuses on consensus protocols and storage",
    ),
    (
        "http://ics.uci.edu/stats",
        "statistics courses cover inference probability and experimental design",
    ),
];

fn load_all_shards(built: &crate::common::BuiltIndex) -> Shard {
    let mut all = Shard::new();
    for key in ShardKey::all() {
        let path = built.layout().final_index_dir.join(key.file_name());
        let shard: Shard = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        all.extend(shard);
    }
    all
}

#[test]
fn positions_are_strictly_ascending_and_unique() {
    let built = build_corpus(&PAGES);
    for (term, list) in load_all_shards(&built) {
        for (doc_id, posting) in list {
            assert!(
                posting.positions.windows(2).all(|w| w[0] < w[1]),
                "positions not strictly ascending for ({term}, {doc_id})"
            );
        }
    }
}

#[test]
fn positions_partition_the_token_stream() {
    let built = build_corpus(&PAGES);
    let shards = load_all_shards(&built);
    let doc_map: DocTable =
        serde_json::from_str(&fs::read_to_string(built.layout().doc_map).unwrap()).unwrap();

    let analyzer = Analyzer::new();
    for (url, body) in PAGES {
        let (doc_id, _) = doc_map
            .iter()
            .find(|(_, mapped)| mapped.as_str() == url)
            .expect("page in doc map");

        let expected = analyzer.analyze(body);

        let mut seen_positions = BTreeSet::new();
        for list in shards.values() {
            if let Some(posting) = list.get(doc_id) {
                for &position in &posting.positions {
                    assert!(
                        seen_positions.insert(position),
                        "position {position} assigned to two terms in {url}"
                    );
                }
            }
        }

        let expected_range: BTreeSet<u32> = (0..expected.len() as u32).collect();
        assert_eq!(seen_positions, expected_range, "gap in positions for {url}");
    }
}

#[test]
fn every_posting_doc_id_is_in_the_doc_map() {
    let built = build_corpus(&PAGES);
    let doc_map: DocTable =
        serde_json::from_str(&fs::read_to_string(built.layout().doc_map).unwrap()).unwrap();

    for (term, list) in load_all_shards(&built) {
        for doc_id in list.keys() {
            assert!(
                doc_map.contains_key(doc_id),
                "posting for {term} references unmapped doc {doc_id}"
            );
        }
    }
}

#[test]
fn rebuilds_are_byte_identical() {
    let records: Vec<String> = PAGES.iter().map(|(url, body)| page(url, body)).collect();
    let first = build_records_with_flush_limit(&records, 5000);
    let second = build_records_with_flush_limit(&records, 5000);

    for artifact in ["doc_map.json", "title_map.json", "idf.json", "doc_stats.json"] {
        let a = fs::read(first.config.output_dir.join(artifact)).unwrap();
        let b = fs::read(second.config.output_dir.join(artifact)).unwrap();
        assert_eq!(a, b, "{artifact} differs between identical builds");
    }
    for key in ShardKey::all() {
        let a = fs::read(first.layout().final_index_dir.join(key.file_name())).unwrap();
        let b = fs::read(second.layout().final_index_dir.join(key.file_name())).unwrap();
        assert_eq!(a, b, "{} differs between identical builds", key.file_name());
    }
}

#[test]
fn flush_boundary_does_not_change_the_merged_index() {
    let records: Vec<String> = PAGES.iter().map(|(url, body)| page(url, body)).collect();
    let one_per_flush = build_records_with_flush_limit(&records, 1);
    let single_flush = build_records_with_flush_limit(&records, 100);

    assert_eq!(
        load_all_shards(&one_per_flush),
        load_all_shards(&single_flush)
    );
}
