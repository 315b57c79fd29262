//! Corpus-level laws: flush-limit independence and analyzer/position
//! agreement.

use crate::common::{build_records_with_flush_limit, page};
use crawldex::{Analyzer, DocTable, Shard, ShardKey};
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::fs;

fn corpus_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    let word = proptest::string::string_regex("[a-z]{3,7}").unwrap();
    let body = prop::collection::vec(word, 6..20).prop_map(|words| words.join(" "));
    prop::collection::vec(body, 2..5).prop_map(|bodies| {
        bodies
            .into_iter()
            .enumerate()
            .map(|(i, body)| (format!("http://ics.uci.edu/page{i}"), body))
            .collect()
    })
}

fn all_terms(built: &crate::common::BuiltIndex) -> Shard {
    let mut all = Shard::new();
    for key in ShardKey::all() {
        let path = built.layout().final_index_dir.join(key.file_name());
        let shard: Shard = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        all.extend(shard);
    }
    all
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn top_k_is_invariant_to_the_flush_limit(corpus in corpus_strategy()) {
        let records: Vec<String> = corpus
            .iter()
            .map(|(url, body)| page(url, body))
            .collect();

        let tiny_flushes = build_records_with_flush_limit(&records, 1);
        let one_flush = build_records_with_flush_limit(&records, 1000);

        let mut engine_a = tiny_flushes.engine();
        let mut engine_b = one_flush.engine();

        // Query with a term drawn from every document
        for (_, body) in &corpus {
            let query = body.split_whitespace().next().unwrap();
            prop_assert_eq!(engine_a.search(query), engine_b.search(query));
        }
    }

    #[test]
    fn positions_partition_every_accepted_document(corpus in corpus_strategy()) {
        let records: Vec<String> = corpus
            .iter()
            .map(|(url, body)| page(url, body))
            .collect();
        let built = build_records_with_flush_limit(&records, 2);

        let doc_map: DocTable =
            serde_json::from_str(&fs::read_to_string(built.layout().doc_map).unwrap()).unwrap();
        let terms = all_terms(&built);
        let analyzer = Analyzer::new();

        for (doc_id, url) in &doc_map {
            let (_, body) = corpus
                .iter()
                .find(|(u, _)| u == url)
                .expect("accepted doc came from the corpus");
            let stem_count = analyzer.analyze(body).len() as u32;

            let mut positions = BTreeSet::new();
            for list in terms.values() {
                if let Some(posting) = list.get(doc_id) {
                    for &p in &posting.positions {
                        prop_assert!(positions.insert(p), "duplicate position {p}");
                    }
                }
            }
            let expected: BTreeSet<u32> = (0..stem_count).collect();
            prop_assert_eq!(positions, expected);
        }
    }
}
