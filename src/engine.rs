// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The search driver: owns an opened store and turns query strings into
//! ranked hits.
//!
//! This is deliberately thin. All ranking logic lives in [`crate::query`] and
//! [`crate::scoring`]; the engine just ties a store and an analyzer together
//! so callers get a single value with a single method. Opening is the only
//! fallible step; queries themselves never fail, they return empty.

use crate::analysis::Analyzer;
use crate::config::IndexLayout;
use crate::query;
use crate::scoring::TOP_K;
use crate::store::{IndexStore, StoreError};
use crate::types::SearchHit;

pub struct SearchEngine {
    store: IndexStore,
    analyzer: Analyzer,
}

impl SearchEngine {
    /// Open the index at `layout`. Fails when the auxiliary tables are
    /// missing or unreadable, i.e. when no build has completed there.
    pub fn open(layout: &IndexLayout) -> Result<Self, StoreError> {
        Ok(SearchEngine {
            store: IndexStore::open(layout)?,
            analyzer: Analyzer::new(),
        })
    }

    /// Top results for a free-text query, default result count.
    pub fn search(&mut self, query: &str) -> Vec<SearchHit> {
        self.search_top(query, TOP_K)
    }

    /// Top `k` results for a free-text query.
    pub fn search_top(&mut self, query: &str, k: usize) -> Vec<SearchHit> {
        query::run_query(&mut self.store, &self.analyzer, query, k)
    }

    pub fn store(&self) -> &IndexStore {
        &self.store
    }
}
