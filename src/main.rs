//! pufflog - an offline-first daily inhaler usage tracker.
//!
//! Dose counts are kept per calendar day in a durable local ledger, and a
//! fixed static-asset bundle is mirrored into a versioned local cache so
//! the companion page keeps working without a network.

mod app;
mod cache;
mod config;
mod export;
mod ledger;
mod models;
mod utils;

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Set up logging with environment-based filter
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn usage() {
    eprintln!("Usage: pufflog <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  show [date]          Show the dose count for a day (default today)");
    eprintln!("  inc [date]           Record one more dose");
    eprintln!("  dec [date]           Remove one dose (never below zero)");
    eprintln!("  set <date> <count>   Set the dose count for a day");
    eprintln!("  reset [date]         Reset a day's count to zero");
    eprintln!("  delete <date>        Remove a day's entry");
    eprintln!("  list                 Show the full history, most recent first");
    eprintln!("  export [path]        Write the history as CSV (default asthma-usage.csv)");
    eprintln!("  sync                 Install the offline asset bundle");
    eprintln!("  fetch <path>         Fetch an asset, cache-first, to stdout");
    eprintln!("  config [base-url]    Show or set the asset base URL");
    eprintln!();
    eprintln!("Dates are ISO format: YYYY-MM-DD");
}

/// Parse an optional ISO date argument, defaulting to today
fn date_arg(args: &[String], idx: usize) -> Result<NaiveDate> {
    match args.get(idx) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("Invalid date (expected YYYY-MM-DD): {}", raw)),
        None => Ok(App::today()),
    }
}

fn required_arg<'a>(args: &'a [String], idx: usize, name: &str) -> Result<&'a str> {
    args.get(idx)
        .map(String::as_str)
        .ok_or_else(|| anyhow::anyhow!("Missing required argument: {}", name))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let mut app = App::new()?;

    match args.get(1).map(String::as_str) {
        None => {
            app.show(App::today());
            app.list();
        }
        Some("show") => app.show(date_arg(&args, 2)?),
        Some("inc") => app.increment(date_arg(&args, 2)?)?,
        Some("dec") => app.decrement(date_arg(&args, 2)?)?,
        Some("set") => {
            let date = required_arg(&args, 2, "date")?
                .parse()
                .context("Invalid date (expected YYYY-MM-DD)")?;
            let doses = required_arg(&args, 3, "count")?
                .parse()
                .context("Invalid count (expected a non-negative integer)")?;
            app.set(date, doses)?;
        }
        Some("reset") => app.reset(date_arg(&args, 2)?)?,
        Some("delete") => {
            let date = required_arg(&args, 2, "date")?
                .parse()
                .context("Invalid date (expected YYYY-MM-DD)")?;
            app.delete(date)?;
        }
        Some("list") => app.list(),
        Some("export") => app.export(args.get(2).map(|p| Path::new(p)))?,
        Some("sync") => app.sync().await?,
        Some("fetch") => app.fetch(required_arg(&args, 2, "path")?).await?,
        Some("config") => match args.get(2) {
            Some(url) => app.set_base_url(url)?,
            None => app.show_config(),
        },
        Some("help") | Some("--help") => usage(),
        Some(other) => {
            eprintln!("Unknown command: {}", other);
            usage();
            std::process::exit(2);
        }
    }

    Ok(())
}
