// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! crawldex CLI: build and query disk-resident search indexes.
//!
//! ```bash
//! # Build an index from crawled page records
//! crawldex build --config crawldex.json
//!
//! # One-shot query
//! crawldex search --query "machine learning"
//!
//! # Interactive prompt
//! crawldex search
//! ```
//!
//! Logging goes to stderr and respects `RUST_LOG`; results go to stdout.

use anyhow::Context;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use crawldex::{run_build, Config, SearchEngine, SearchHit};

mod cli;
use cli::{Cli, Commands};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("❌ {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Build => {
            let stats = run_build(&config)?;
            println!(
                "Indexed {} documents ({} unique tokens, {} KB, {} skipped)",
                stats.docs_indexed,
                stats.unique_terms,
                stats.index_size_kb,
                stats.rejects.total()
            );
        }
        Commands::Search { query, limit } => {
            let mut engine = SearchEngine::open(&config.layout())
                .context("no readable index at the configured output dir; run `crawldex build` first")?;

            match query {
                Some(q) => run_one_query(&mut engine, &q, limit),
                None => interactive_loop(&mut engine, limit)?,
            }
        }
    }

    Ok(())
}

fn run_one_query(engine: &mut SearchEngine, query: &str, limit: usize) {
    let started = Instant::now();
    let hits = engine.search_top(query, limit);
    let elapsed = started.elapsed();

    print_hits(&hits);
    eprintln!("Query processed in {:.2} ms", elapsed.as_secs_f64() * 1000.0);
}

fn interactive_loop(engine: &mut SearchEngine, limit: usize) -> anyhow::Result<()> {
    println!("Type 'exit' or 'q' to quit.");

    let stdin = io::stdin();
    loop {
        print!("Search: ");
        io::stdout().flush().context("stdout unavailable")?;

        let Some(line) = stdin.lock().lines().next() else {
            break;
        };
        let query = line.context("stdin unavailable")?;
        let query = query.trim();
        if query.is_empty() {
            continue;
        }
        if matches!(query.to_lowercase().as_str(), "exit" | "q") {
            break;
        }

        run_one_query(engine, query, limit);
    }

    Ok(())
}

fn print_hits(hits: &[SearchHit]) {
    if hits.is_empty() {
        println!("No documents matched.");
        return;
    }
    for (rank, hit) in hits.iter().enumerate() {
        println!("{}. {}", rank + 1, hit.url);
    }
}
