// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - generate: crawl one or more sites and print their llms.txt
// - stream:   crawl one site and print progress as server-sent events
//
// --max-concurrent is global, so it can go before or after the subcommand,
// and it falls back to the LLMSTXT_MAX_CONCURRENT environment variable.
// =============================================================================

use clap::{Parser, Subcommand};

use crate::gate::DEFAULT_MAX_CONCURRENT;

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "llmstxt-generator",
    version = "0.1.0",
    about = "Generate llms.txt files by crawling websites",
    long_about = "llmstxt-generator discovers the pages of a website (sitemap first, links as a fallback), \
                  groups them into sections and prints an llms.txt index for language models."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Maximum number of sites crawled at the same time
    #[arg(
        long,
        global = true,
        env = "LLMSTXT_MAX_CONCURRENT",
        default_value_t = DEFAULT_MAX_CONCURRENT,
        value_parser = clap::value_parser!(usize)
    )]
    pub max_concurrent: usize,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl websites and print an llms.txt for each
    ///
    /// Example: llmstxt-generator generate https://example.com https://docs.rs
    Generate {
        /// Website URLs (e.g., https://example.com)
        #[arg(required = true)]
        urls: Vec<String>,

        /// Output a JSON array instead of plain llms.txt text
        #[arg(long)]
        json: bool,
    },

    /// Crawl one website, printing progress events as they happen
    ///
    /// Each event is written as a server-sent-event frame:
    ///   event: progress
    ///   data: {"type":"progress","currentURL":"...","done":3,"total":12}
    Stream {
        /// Website URL (e.g., https://example.com)
        url: String,
    },
}


// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does `global = true` do?
//    - The flag is accepted on every subcommand, not just the top level
//    - `llmstxt-generator --max-concurrent 2 generate ...` and
//      `llmstxt-generator generate ... --max-concurrent 2` both work
//
// 2. Where do default values come from?
//    - An explicit flag wins, then the environment variable, then
//      default_value_t
//
// 3. Why Vec<String> for urls?
//    - clap collects every remaining positional argument into the Vec
//    - `required = true` makes an empty list a usage error
// -----------------------------------------------------------------------------
