//! Limitless market-data inspection CLI
//!
//! Commands:
//! - `search`: free-text market search with ranked candidates
//! - `resolve`: resolve a query to its single best slug
//! - `slugs`: refresh the local index and filter the bulk listing
//! - `categories`: list category identifiers and counts
//! - `category`: list markets in a category
//! - `show`: fetch the full record (and position ids) for a slug
//! - `login`: exchange a signed message for a session token
//! - `ping`: API connectivity test
//!
//! # Usage
//! ```bash
//! lmx search "1hr BTC" --limit 5 --threshold 0.5
//! lmx resolve "1hr BTC"
//! lmx slugs --ticker BTC --contains 1hr
//! lmx categories
//! lmx category crypto --limit 20 --sort-by volume
//! lmx show btc-1hr-above-65000 --out market.json
//! lmx login --address 0x... --signature 0x... --message "..." --client-mode eoa
//! ```

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};

use limitless_client::resolve::{DetailFetcher, MarketIndex, MarketResolver, ResolverConfig};
use limitless_client::rest::{ApiClient, ClientMode, LoginRequest, SortBy};
use limitless_client::API_BASE;

#[derive(Parser)]
#[command(name = "lmx")]
#[command(about = "Limitless market-data inspection CLI")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// API base URL override
    #[arg(long, default_value = API_BASE, global = true)]
    base_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Free-text market search with ranked candidates
    Search {
        /// Search query (e.g. "1hr BTC")
        query: String,

        /// Maximum candidates to return
        #[arg(long, default_value = "10")]
        limit: u32,

        /// Minimum relevance score in [0, 1]
        #[arg(long, default_value = "0.5")]
        threshold: f64,

        /// Disable the bulk-listing fallback on an empty search
        #[arg(long, default_value = "false")]
        no_fallback: bool,

        /// Output file for candidate JSON (optional, defaults to stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Resolve a query to its single best slug
    Resolve {
        /// Search query
        query: String,

        /// Minimum relevance score in [0, 1]
        #[arg(long, default_value = "0.5")]
        threshold: f64,
    },

    /// Refresh the local index and filter the bulk listing
    Slugs {
        /// Keep only entries with this exact ticker
        #[arg(long)]
        ticker: Option<String>,

        /// Keep only entries whose slug contains this substring
        #[arg(long)]
        contains: Option<String>,

        /// Keep only entries with a deadline at or after this time (ISO 8601)
        #[arg(long)]
        due_after: Option<String>,

        /// Keep only entries with a deadline before this time (ISO 8601)
        #[arg(long)]
        due_before: Option<String>,

        /// Output file for listing JSON (optional, defaults to stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// List category identifiers and counts
    Categories,

    /// List markets in a category
    Category {
        /// Category identifier (see `categories`)
        id: String,

        /// Maximum markets to return
        #[arg(long, default_value = "20")]
        limit: u32,

        /// Sort order: volume, liquidity, deadline
        #[arg(long)]
        sort_by: Option<String>,

        /// Keep only slugs containing this substring (repeatable)
        #[arg(long)]
        filter: Vec<String>,
    },

    /// Fetch the full record for a slug
    Show {
        /// Market slug
        slug: String,

        /// Output file for market JSON (optional, defaults to stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Exchange a signed message for a session token
    Login {
        /// Account address
        #[arg(long)]
        address: String,

        /// Pre-computed signature over the login message
        #[arg(long)]
        signature: String,

        /// The signed login message
        #[arg(long)]
        message: String,

        /// Client mode: eoa or smart-wallet
        #[arg(long, default_value = "eoa")]
        client_mode: String,
    },

    /// API connectivity test
    Ping,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt().with_env_filter(env_filter).with_target(false).init();

    let client = ApiClient::with_base_url(&cli.base_url)?;

    match cli.command {
        Commands::Search { query, limit, threshold, no_fallback, out } => {
            run_search(client, query, limit, threshold, no_fallback, out).await
        }
        Commands::Resolve { query, threshold } => run_resolve(client, query, threshold).await,
        Commands::Slugs { ticker, contains, due_after, due_before, out } => {
            run_slugs(client, ticker, contains, due_after, due_before, out).await
        }
        Commands::Categories => run_categories(client).await,
        Commands::Category { id, limit, sort_by, filter } => {
            run_category(client, id, limit, sort_by, filter).await
        }
        Commands::Show { slug, out } => run_show(client, slug, out).await,
        Commands::Login { address, signature, message, client_mode } => {
            run_login(client, address, signature, message, client_mode).await
        }
        Commands::Ping => run_ping(client).await,
    }
}

async fn write_or_print(json: &str, out: Option<PathBuf>) -> Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&path, json).await?;
            info!("Output written to: {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

async fn run_search(
    client: ApiClient,
    query: String,
    limit: u32,
    threshold: f64,
    no_fallback: bool,
    out: Option<PathBuf>,
) -> Result<()> {
    info!("=== Market Search ===");
    info!("Query: {}", query);
    info!("Limit: {}, threshold: {}", limit, threshold);

    let config = ResolverConfig {
        limit,
        similarity_threshold: threshold,
        fallback_to_index: !no_fallback,
    };
    let resolver = MarketResolver::with_config(client, config);
    let results = resolver.resolve(&query).await?;

    if results.is_empty() {
        info!("No market found for '{}'", query);
    } else {
        for (i, r) in results.iter().enumerate() {
            info!("  [{}] {:.3}  {}  ({})", i, r.score, r.slug, r.title);
        }
    }

    let json = serde_json::to_string_pretty(&results)?;
    write_or_print(&json, out).await
}

async fn run_resolve(client: ApiClient, query: String, threshold: f64) -> Result<()> {
    let config = ResolverConfig {
        similarity_threshold: threshold,
        ..ResolverConfig::default()
    };
    let resolver = MarketResolver::with_config(client, config);

    match resolver.best_match(&query).await? {
        Some(best) => {
            info!("Resolved '{}' -> {} (score {:.3})", query, best.slug, best.score);
            println!("{}", best.slug);
            Ok(())
        }
        None => {
            warn!("No market found for '{}'", query);
            anyhow::bail!("no market found for '{}'", query)
        }
    }
}

async fn run_slugs(
    client: ApiClient,
    ticker: Option<String>,
    contains: Option<String>,
    due_after: Option<String>,
    due_before: Option<String>,
    out: Option<PathBuf>,
) -> Result<()> {
    info!("=== Active Market Listing ===");

    let index = MarketIndex::new();
    let count = index.refresh(&client).await?;
    info!("Fetched {} active market(s)", count);

    let after = parse_time(due_after.as_deref())?;
    let before = parse_time(due_before.as_deref())?;

    let entries = index.filter(|s| {
        if let Some(t) = &ticker {
            if &s.ticker != t {
                return false;
            }
        }
        if let Some(needle) = &contains {
            if !s.slug.contains(needle.as_str()) {
                return false;
            }
        }
        if after.is_some() || before.is_some() {
            let Some(deadline) = s.deadline_timestamp() else {
                return false;
            };
            if let Some(from) = after {
                if deadline < from {
                    return false;
                }
            }
            if let Some(to) = before {
                if deadline >= to {
                    return false;
                }
            }
        }
        true
    });

    info!("{} entr(ies) after filtering", entries.len());
    for e in &entries {
        info!("  {}  ticker={}  deadline={}", e.slug, e.ticker, e.deadline.as_deref().unwrap_or("-"));
    }

    let json = serde_json::to_string_pretty(&entries)?;
    write_or_print(&json, out).await
}

fn parse_time(raw: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    match raw {
        Some(s) => {
            let dt = DateTime::parse_from_rfc3339(s)
                .map_err(|e| anyhow::anyhow!("invalid time '{}': {}", s, e))?;
            Ok(Some(dt.with_timezone(&Utc)))
        }
        None => Ok(None),
    }
}

async fn run_categories(client: ApiClient) -> Result<()> {
    info!("=== Categories ===");
    let categories = client.category_counts().await?;

    for c in &categories {
        info!("  {:<16} {:>5}  {}", c.id, c.count, c.name);
    }
    println!("{}", serde_json::to_string_pretty(&categories)?);
    Ok(())
}

async fn run_category(
    client: ApiClient,
    id: String,
    limit: u32,
    sort_by: Option<String>,
    filters: Vec<String>,
) -> Result<()> {
    info!("=== Category: {} ===", id);

    let sort = match sort_by.as_deref() {
        Some(s) => Some(
            SortBy::from_str(s)
                .ok_or_else(|| anyhow::anyhow!("unknown sort order '{}'; use volume, liquidity or deadline", s))?,
        ),
        None => None,
    };

    let markets = client.markets_in_category(&id, limit, sort).await?;
    info!("{} market(s)", markets.len());

    let filter_refs: Vec<&str> = filters.iter().map(String::as_str).collect();
    for m in &markets {
        if !filter_refs.iter().all(|f| m.slug.contains(f)) {
            continue;
        }
        info!(
            "  {}  status={}  volume={}",
            m.slug,
            m.status,
            m.volume.as_deref().unwrap_or("-")
        );
        println!("{}", m.slug);
    }
    Ok(())
}

async fn run_show(client: ApiClient, slug: String, out: Option<PathBuf>) -> Result<()> {
    info!("=== Market Detail ===");

    let fetcher = DetailFetcher::new(client);
    let market = match fetcher.fetch(&slug).await? {
        Some(m) => m,
        None => {
            warn!("No market found for slug '{}'", slug);
            anyhow::bail!("no market found for slug '{}'", slug);
        }
    };

    info!("Slug: {}", market.slug);
    info!("Title: {}", market.title);
    info!("Ticker: {}", market.ticker);
    info!("Status: {}", market.status);
    info!("Strike: {}", market.strike_price.as_deref().unwrap_or("-"));
    info!("Deadline: {}", market.deadline.as_deref().unwrap_or("-"));
    info!("Volume: {}", market.volume.as_deref().unwrap_or("-"));
    info!("Liquidity: {}", market.liquidity.as_deref().unwrap_or("-"));
    info!("Position IDs:");
    info!("  [0] YES: {}", market.yes_position_id().unwrap_or("-"));
    info!("  [1] NO:  {}", market.no_position_id().unwrap_or("-"));

    if market.is_past_deadline(Utc::now()) {
        warn!("Market is past its deadline; this record is stale");
    }

    let json = serde_json::to_string_pretty(&market)?;
    write_or_print(&json, out).await
}

async fn run_login(
    client: ApiClient,
    address: String,
    signature: String,
    message: String,
    client_mode: String,
) -> Result<()> {
    info!("=== Login ===");

    let mode = ClientMode::from_str(&client_mode)
        .ok_or_else(|| anyhow::anyhow!("unknown client mode '{}'; use eoa or smart-wallet", client_mode))?;

    let request = LoginRequest { client: mode, address, signature, message };
    let token = client.login(&request).await?;

    // Debug impl redacts the token body
    info!("Login OK: {:?}", token);
    Ok(())
}

async fn run_ping(client: ApiClient) -> Result<()> {
    client.test_connectivity().await?;
    info!("Connectivity: OK");
    Ok(())
}
