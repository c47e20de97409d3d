//! dlcache - walk a few URLs through a small slot cache and show the hits

mod walk;

use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use dlcache::SlotCache;
use dlfetch::{FetchConfig, HttpFetcher, DEFAULT_RETRY_DELAY};
use tracing::{info, warn};

use crate::walk::{Walk, WalkOptions};

const FREEBSD_PORTS: &str = "https://people.freebsd.org/~crees/removed_ports/index.xml";
const GOOGLE: &str = "https://google.com";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// URLs to cache, in order
    #[arg(default_values = [FREEBSD_PORTS, GOOGLE])]
    urls: Vec<String>,

    /// Cache capacity (number of slots, max 1000)
    #[arg(short, long, default_value_t = 2)]
    capacity: usize,

    /// Characters of each document to print
    #[arg(short, long, default_value_t = 30)]
    preview: usize,

    /// Reads per URL (the first one fetches)
    #[arg(short, long, default_value_t = 2)]
    reads: usize,

    /// Request timeout in seconds
    #[arg(short, long, default_value_t = 30)]
    timeout: u64,

    /// Extra attempts for transient fetch failures
    #[arg(long, default_value_t = 0)]
    retries: u32,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    info!("Starting dlcache v{}", env!("CARGO_PKG_VERSION"));
    info!("Cache capacity: {}", args.capacity);
    info!("Fetch timeout: {}s, retries: {}", args.timeout, args.retries);

    let config = FetchConfig::default()
        .with_timeout(Duration::from_secs(args.timeout))
        .with_retries(args.retries, DEFAULT_RETRY_DELAY);
    let fetcher = HttpFetcher::new(config)?;

    let options = WalkOptions {
        preview: args.preview,
        reads: args.reads,
    };
    let mut out = io::stdout().lock();
    let mut walk = Walk::new(&mut out, options);

    walk.stamp("About to make the cache")?;
    let mut cache = SlotCache::new(args.capacity, fetcher)?;

    let summary = walk.run(&mut cache, &args.urls)?;

    if summary.failures > 0 {
        warn!("{} URL(s) could not be fetched", summary.failures);
    }
    info!(
        "Done: {} reads, {} evictions",
        summary.reads,
        summary.evicted.len()
    );

    Ok(())
}
