// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Text analysis: HTML → visible text → stemmed token stream.
//!
//! Everything that touches a query or a document funnels through here, and the
//! document path and the query path share one stemmer and one stop-word list.
//! That symmetry is not a nicety, it is the whole mechanism: a query term can
//! only ever match an indexed term because both went through the identical
//! lowercase → filter → stem transformation.
//!
//! Content extraction strips the structural noise tags (header, footer, nav,
//! aside, script, style) and then prefers the `<main>` region, falling back to
//! `<div id="main">` and finally `<body>`. Titles and first-tier headings are
//! pulled from the unstripped document so a page whose `<h1>` sits inside a
//! header banner still gets heading text.

use rust_stemmers::{Algorithm, Stemmer};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

/// Words too common to index. Filtered from both documents and queries.
pub const STOP_WORDS: [&str; 10] = ["a", "an", "the", "of", "on", "in", "for", "and", "to", "with"];

/// Tokens shorter than this never make it into the index.
const MIN_TOKEN_LEN: usize = 2;

static NOISE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("header, footer, nav, aside, script, style").unwrap());
static MAIN_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("main").unwrap());
static MAIN_DIV_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div#main").unwrap());
static BODY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").unwrap());
static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());
static H1_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").unwrap());

/// Check if a word is a stop word.
#[inline]
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// The searchable pieces of one HTML page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    /// Contents of the first `<title>`, lowercased. Empty if the page has none.
    pub title: String,
    /// All `<h1>` texts, lowercased and space-joined into one flat string.
    pub headings: String,
    /// Visible text of the main content region, noise tags removed.
    pub main_text: String,
}

/// Shared analyzer for both index-time and query-time text processing.
///
/// Holds the stemmer so it is created once per build or per search session,
/// not once per document.
pub struct Analyzer {
    stemmer: Stemmer,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    pub fn new() -> Self {
        Analyzer {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    /// Stem a single lowercase token.
    #[inline]
    pub fn stem(&self, token: &str) -> String {
        self.stemmer.stem(token).into_owned()
    }

    /// Parse raw HTML and pull out title, headings, and main text.
    ///
    /// Returns `None` when the document has no recognizable content region at
    /// all; callers treat that as a rejection, not an error.
    pub fn extract(&self, raw_html: &str) -> Option<ExtractedPage> {
        let document = Html::parse_document(raw_html);

        let title = document
            .select(&TITLE_SELECTOR)
            .next()
            .map(|el| collapse_text(el))
            .unwrap_or_default()
            .to_lowercase();

        let headings = document
            .select(&H1_SELECTOR)
            .map(|el| collapse_text(el))
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        let main_text = extract_main_text(document)?;

        Some(ExtractedPage {
            title,
            headings,
            main_text,
        })
    }

    /// Tokenize visible text: lowercase, split into maximal `[a-z0-9]+` runs,
    /// drop all-digit tokens, single characters, and stop words.
    ///
    /// Output order matches input order; the index builder assigns positions
    /// by enumeration over this sequence.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let mut tokens = Vec::new();
        let mut current = String::new();

        for ch in lowered.chars() {
            if ch.is_ascii_alphanumeric() {
                current.push(ch);
            } else if !current.is_empty() {
                push_if_indexable(&mut tokens, std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            push_if_indexable(&mut tokens, current);
        }

        tokens
    }

    /// Full index-time analysis: tokenize then stem. Position `i` in the
    /// returned vector is the position recorded in the posting for stem `i`.
    pub fn analyze(&self, main_text: &str) -> Vec<String> {
        self.tokenize(main_text)
            .iter()
            .map(|t| self.stem(t))
            .collect()
    }

    /// Query-time analysis: lowercase, whitespace-split, drop stop words,
    /// stem. Deliberately the same filter + stem chain as the document path.
    pub fn analyze_query(&self, query: &str) -> Vec<String> {
        query
            .to_lowercase()
            .split_whitespace()
            .filter(|t| !is_stop_word(t))
            .map(|t| self.stem(t))
            .collect()
    }
}

fn push_if_indexable(tokens: &mut Vec<String>, token: String) {
    if token.len() < MIN_TOKEN_LEN {
        return;
    }
    if token.bytes().all(|b| b.is_ascii_digit()) {
        return;
    }
    if is_stop_word(&token) {
        return;
    }
    tokens.push(token);
}

/// Visible text of an element with children joined by single spaces and
/// internal whitespace collapsed.
fn collapse_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Remove noise subtrees, then take the text of the preferred content region:
/// `<main>`, else `<div id="main">`, else `<body>`.
fn extract_main_text(mut document: Html) -> Option<String> {
    let noise: Vec<_> = document.select(&NOISE_SELECTOR).map(|el| el.id()).collect();
    for id in noise {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }

    let region = document
        .select(&MAIN_SELECTOR)
        .next()
        .or_else(|| document.select(&MAIN_DIV_SELECTOR).next())
        .or_else(|| document.select(&BODY_SELECTOR).next())?;

    Some(collapse_text(region))
}
