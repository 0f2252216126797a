//! Topic-Spider main entry point
//!
//! This is the command-line interface for the Topic-Spider corpus collector.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use topic_spider::config::{load_config_with_hash, Config};
use topic_spider::crawler::Coordinator;
use topic_spider::output::{self, print_statistics, CrawlReport, CrawlStatistics};
use tracing_subscriber::EnvFilter;

/// Topic-Spider: a search-driven corpus collector
///
/// Topic-Spider asks the configured search engines about a query, follows
/// every result link, and collects the plain text of each page into a
/// corpus for topic modeling.
#[derive(Parser, Debug)]
#[command(name = "topic-spider")]
#[command(version)]
#[command(about = "A search-driven corpus collector", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Search query to collect documents for
    #[arg(value_name = "QUERY")]
    query: String,

    /// Maximum number of content pages to process (overrides config)
    #[arg(short, long, value_name = "N")]
    max_results: Option<usize>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the discovery URLs without crawling
    #[arg(long)]
    dry_run: bool,

    /// Write the corpus as JSON to this path (overrides config)
    #[arg(long, value_name = "PATH")]
    corpus: Option<String>,

    /// Write a markdown crawl report to this path (overrides config)
    #[arg(long, value_name = "PATH")]
    report: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let max_results = cli.max_results.unwrap_or(config.crawler.max_results);

    if cli.dry_run {
        handle_dry_run(&config, &cli.query, max_results)?;
    } else {
        handle_crawl(&cli, &config, config_hash, max_results).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("topic_spider=info,warn"),
            1 => EnvFilter::new("topic_spider=debug,info"),
            2 => EnvFilter::new("topic_spider=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be fetched
fn handle_dry_run(config: &Config, query: &str, max_results: usize) -> anyhow::Result<()> {
    println!("=== Topic-Spider Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Discovery workers: {}", config.crawler.discovery_workers);
    println!("  Content workers: {}", config.crawler.content_workers);
    println!(
        "  Fetch timeouts: {}ms discovery, {}ms content",
        config.crawler.discovery_fetch_timeout, config.crawler.content_fetch_timeout
    );
    println!(
        "  Drain timeouts: {}ms discovery, {}ms content",
        config.crawler.discovery_drain_timeout, config.crawler.content_drain_timeout
    );
    println!("  Max results: {}", max_results);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    let coordinator = Coordinator::new(config)?;
    let tasks = coordinator.discovery_tasks(query);

    println!("\nDiscovery URLs ({}):", tasks.len());
    for task in &tasks {
        println!("  - [{}] {}", task.engine, task.url);
    }

    println!("\n✓ Configuration is valid");
    if tasks.is_empty() {
        println!("✗ No usable search engine; a crawl would fail");
    } else {
        println!(
            "✓ Would query {} search engine(s) for '{}'",
            tasks.len(),
            query
        );
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    cli: &Cli,
    config: &Config,
    config_hash: String,
    max_results: usize,
) -> anyhow::Result<()> {
    let mut coordinator = Coordinator::new(config)?;

    let outcome = match coordinator.crawl(&cli.query, max_results).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    let report = CrawlReport::from_outcome(outcome, max_results, Some(config_hash));

    if !cli.quiet {
        print_statistics(&CrawlStatistics::from_report(&report));
    }

    let handlers = output::handlers(&config.output, cli.report.as_deref(), cli.corpus.as_deref());
    for written in output::write_outputs(&handlers, &report)? {
        tracing::info!("{}", written);
    }

    Ok(())
}
