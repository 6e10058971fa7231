// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (to stderr, so stdout only carries results)
// 2. Parse command-line arguments using clap
// 3. Wire Ctrl-C to a CancellationToken shared by every crawl
// 4. Dispatch to the appropriate subcommand handler
// 5. Exit with proper code (0 = success, 1 = a site failed, 2 = error)
//
// Rust concepts used:
// - async/await: crawls wait on the network and on timers
// - Arc: lets a spawned task share the Generator with the main task
// - mpsc channel: the stream subcommand receives progress events from a
//   background task while it is still crawling
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli;      // src/cli.rs - command-line parsing
mod crawl;    // src/crawl/ - page discovery and fetching
mod error;    // src/error.rs - typed errors for the library code
mod gate;     // src/gate.rs - limit on concurrent generations
mod generate; // src/generate/ - crawl -> structure -> format, plus streaming
mod site;     // src/site/ - section grouping and llms.txt formatting

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser; // Parser trait enables the parse() method
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use crawl::{validate_site_url, Crawler};
use gate::ConcurrencyGate;
use generate::{Generator, ProgressEvent};
use site::LlmsTxt;

// How many progress events may queue up before the crawl waits for stdout
const EVENT_BUFFER: usize = 32;

#[tokio::main]
async fn main() {
    init_logging();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // If an unexpected error occurred, print it and exit with code 2
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr; RUST_LOG picks the level (default: info)
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// This is the main application logic
// Returns:
//   Ok(0) = every site produced an llms.txt
//   Ok(1) = at least one site failed (or was cancelled)
//   Ok(2) = bad input
//   Err = unexpected error
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    let gate = ConcurrencyGate::new(cli.max_concurrent);
    let crawler = Crawler::new().context("failed to build HTTP client")?;
    let generator = Arc::new(Generator::new(crawler, LlmsTxt));

    match cli.command {
        Commands::Generate { urls, json } => {
            handle_generate(&generator, &gate, &urls, json, &cancel).await
        }
        Commands::Stream { url } => handle_stream(generator, gate, url, cancel).await,
    }
}

// Cancels `cancel` the first time Ctrl-C is pressed
fn cancel_on_ctrl_c(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling in-flight crawls");
            cancel.cancel();
        }
    });
}

// One entry of the --json output
#[derive(Debug, Serialize)]
struct SiteReport<'a> {
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    llms_txt: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

// Handles the 'generate' subcommand
// Parameters:
//   urls: website URLs, all validated before any crawling starts
//   json: whether to output JSON format
async fn handle_generate(
    generator: &Generator,
    gate: &ConcurrencyGate,
    urls: &[String],
    json: bool,
    cancel: &CancellationToken,
) -> Result<i32> {
    // Reject the whole run if any URL is unusable
    for url in urls {
        if let Err(e) = validate_site_url(url) {
            eprintln!("Error: {}", e);
            return Ok(2);
        }
    }

    info!(sites = urls.len(), max_concurrent = gate.capacity(), "generating");

    // Every site starts at once; the gate decides how many actually crawl.
    // buffered() keeps the results in the same order as the arguments.
    let results: Vec<error::Result<String>> = stream::iter(urls)
        .map(|url| generate_site(generator, gate, url, cancel))
        .buffered(urls.len().max(1))
        .collect()
        .await;

    print_results(urls, &results, json)?;

    let failed = results.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

// Waits for a gate slot, then generates; the slot is freed on return
async fn generate_site(
    generator: &Generator,
    gate: &ConcurrencyGate,
    url: &str,
    cancel: &CancellationToken,
) -> error::Result<String> {
    debug!(url, free_slots = gate.available(), "waiting for a slot");
    let _permit = gate.acquire(cancel).await?;
    generator.generate(url, cancel).await
}

// Prints results either as plain llms.txt text or as a JSON array
fn print_results(urls: &[String], results: &[error::Result<String>], json: bool) -> Result<()> {
    if json {
        let reports: Vec<SiteReport> = urls
            .iter()
            .zip(results)
            .map(|(url, result)| match result {
                Ok(text) => SiteReport {
                    url,
                    llms_txt: Some(text),
                    error: None,
                },
                Err(e) => SiteReport {
                    url,
                    llms_txt: None,
                    error: Some(e.to_string()),
                },
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    let several = urls.len() > 1;
    for (i, (url, result)) in urls.iter().zip(results).enumerate() {
        match result {
            Ok(text) => {
                if several {
                    if i > 0 {
                        println!();
                    }
                    println!("==> {} <==", url);
                }
                print!("{}", text);
            }
            Err(e) => eprintln!("Error: {}: {}", url, e),
        }
    }
    Ok(())
}

// Handles the 'stream' subcommand
//
// The crawl runs in a background task and sends events into a channel;
// this task prints each one as soon as it arrives:
//
//   event: discovered
//   data: {"type":"discovered","urls":[...],"total":12}
//
async fn handle_stream(
    generator: Arc<Generator>,
    gate: ConcurrencyGate,
    url: String,
    cancel: CancellationToken,
) -> Result<i32> {
    let (tx, mut rx) = mpsc::channel(EVENT_BUFFER);

    let task = tokio::spawn(async move {
        let permit = match gate.acquire(&cancel).await {
            Ok(permit) => permit,
            Err(e) => {
                let _ = tx.send(ProgressEvent::Error { error: e.to_string() }).await;
                return;
            }
        };
        generator.generate_stream(&url, tx, &cancel).await;
        drop(permit);
    });

    let mut finished = false;
    while let Some(event) = rx.recv().await {
        print_frame(&event)?;
        if event.is_terminal() {
            finished = matches!(event, ProgressEvent::Done { .. });
            break;
        }
    }

    task.await.context("stream task failed")?;

    if finished {
        Ok(0)
    } else {
        Ok(1)
    }
}

// Writes one server-sent-event frame and flushes it right away
fn print_frame(event: &ProgressEvent) -> Result<()> {
    let data = serde_json::to_string(event)?;
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "event: {}\ndata: {}\n\n", event.kind(), data)?;
    stdout.flush()?;
    Ok(())
}
