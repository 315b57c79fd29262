// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the crawldex command-line interface.
//!
//! Two subcommands: `build` walks the crawl data directory and writes the
//! sharded index, `search` queries a built index either one-shot via
//! `--query` or through an interactive prompt.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "crawldex",
    about = "Positional inverted-index search over crawled HTML corpora",
    version
)]
pub struct Cli {
    /// Path to a JSON config file overriding the built-in defaults
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the index from a directory of crawled page records
    Build,

    /// Query a built index
    Search {
        /// Run a single query and exit; omit for an interactive prompt
        #[arg(short, long)]
        query: Option<String>,

        /// Maximum number of results to return
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },
}
