//! Command-line front end for the URL registry.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL (generated code, default validity)
//! url-registry create https://example.com/long/path
//!
//! # Shorten with a custom code valid for two hours
//! url-registry create https://example.com --code promo24 --validity 120
//!
//! # Shorten every request in a JSON array file
//! url-registry batch requests.json
//!
//! # Resolve a code and record a click
//! url-registry resolve promo24 --source email
//!
//! # Analytics
//! url-registry stats promo24
//! url-registry summary --json
//!
//! # Maintenance
//! url-registry sweep
//! url-registry delete url_1700000000000_k3j9x2
//! url-registry clear --yes
//! ```
//!
//! # Environment Variables
//!
//! See [`url_registry::config`] for the full list. `.env` files are loaded
//! automatically.

use url_registry::application::services::{AnalyticsService, RegistryService};
use url_registry::bootstrap;
use url_registry::config;
use url_registry::domain::entities::{ClickContext, CreateUrlRequest, UrlRecord};
use url_registry::infrastructure::persistence::BlobRecordStore;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// URL registry with expiring short codes and click analytics.
#[derive(Parser)]
#[command(name = "url-registry")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shorten a URL
    Create {
        /// Absolute http(s) URL to shorten
        url: String,

        /// Validity in minutes (defaults to DEFAULT_VALIDITY_MINUTES)
        #[arg(short, long, allow_negative_numbers = true)]
        validity: Option<i64>,

        /// Custom short code (3-20 letters or digits)
        #[arg(short, long)]
        code: Option<String>,
    },

    /// Shorten every request in a JSON array file
    Batch {
        /// File containing `[{"originalUrl": ..., "validityMinutes": ..., "customShortCode": ...}]`
        file: PathBuf,
    },

    /// Resolve a short code and record a click
    Resolve {
        code: String,

        /// Traffic source to record
        #[arg(short, long, default_value = "direct")]
        source: String,

        #[arg(long)]
        user_agent: Option<String>,

        #[arg(long)]
        ip: Option<String>,
    },

    /// List all stored URLs
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show analytics for one short code
    Stats {
        code: String,

        #[arg(long)]
        json: bool,
    },

    /// Show collection-wide statistics
    Summary {
        #[arg(long)]
        json: bool,
    },

    /// Delete a URL by record id
    Delete {
        id: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Remove every expired URL
    Sweep,

    /// Remove all URLs
    Clear {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

type Registry = RegistryService<BlobRecordStore>;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Invalid configuration")?;
    bootstrap::init_tracing(&config);
    config.print_summary();

    let store = bootstrap::open_store(&config).await?;
    let registry = RegistryService::new(Arc::clone(&store), config.registry_settings());
    let analytics = AnalyticsService::new(store);

    match cli.command {
        Commands::Create { url, validity, code } => {
            let mut request = CreateUrlRequest::new(url);
            request.validity_minutes = validity;
            request.custom_short_code = code;
            create(&registry, request).await?
        }
        Commands::Batch { file } => batch(&registry, file).await?,
        Commands::Resolve {
            code,
            source,
            user_agent,
            ip,
        } => {
            let context = ClickContext {
                source,
                user_agent,
                ip,
            };
            resolve(&registry, &code, context).await?
        }
        Commands::List { json } => list(&registry, json).await?,
        Commands::Stats { code, json } => stats(&analytics, &code, json).await?,
        Commands::Summary { json } => summary(&analytics, json).await?,
        Commands::Delete { id, yes } => delete(&registry, &id, yes).await?,
        Commands::Sweep => sweep(&registry).await?,
        Commands::Clear { yes } => clear(&registry, yes).await?,
    }

    Ok(())
}

async fn create(registry: &Registry, request: CreateUrlRequest) -> Result<()> {
    let record = registry.create(request).await?;

    println!("{}", "✅ URL shortened".green().bold());
    print_record_details(registry, &record);

    Ok(())
}

/// Creates every request from a JSON file and reports both buckets.
///
/// Exits successfully even when some requests fail; each failure is listed
/// with its reason.
async fn batch(registry: &Registry, file: PathBuf) -> Result<()> {
    let raw = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let requests: Vec<CreateUrlRequest> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of requests", file.display()))?;

    println!(
        "{}",
        format!("📦 Creating {} URLs", requests.len()).bright_blue().bold()
    );
    println!();

    let outcome = registry.create_batch(requests).await;

    for record in &outcome.successful {
        println!(
            "  {} {} → {}",
            "✔".green(),
            registry.build_public_url(&record.short_code).cyan(),
            record.original_url
        );
    }
    for failure in &outcome.failed {
        println!(
            "  {} {} ({})",
            "✘".red(),
            failure.request.original_url,
            failure.error.to_string().red()
        );
    }

    println!();
    println!(
        "  Successful: {}  Failed: {}",
        outcome.successful.len().to_string().bright_green().bold(),
        outcome.failed.len().to_string().bright_red().bold()
    );
    println!();

    Ok(())
}

async fn resolve(registry: &Registry, code: &str, context: ClickContext) -> Result<()> {
    let record = registry.resolve(code, context).await?;
    println!("{}", record.original_url);
    Ok(())
}

/// Lists all records with liveness computed for now.
///
/// # Output Format
///
/// ```text
/// 📋 Shortened URLs
///
///   Code       Clicks  Expires              Status   Original URL
///   ─────────────────────────────────────────────────────────────────────
///   promo24    12      2024-01-15 12:30     ACTIVE   https://example.com
/// ```
async fn list(registry: &Registry, json: bool) -> Result<()> {
    let records = registry.list().await?;

    if json {
        return print_json(&records);
    }

    println!("{}", "📋 Shortened URLs".bright_blue().bold());
    println!();

    if records.is_empty() {
        println!("{}", "  No URLs found".yellow());
        println!();
        println!(
            "  Create one with: {} create <url>",
            "url-registry".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<22} {:<7} {:<20} {:<8} {}",
        "Code".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Expires".bright_white().bold(),
        "Status".bright_white().bold(),
        "Original URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(90).bright_black());

    for record in &records {
        let status = if record.is_active {
            "ACTIVE".green()
        } else {
            "EXPIRED".red()
        };

        println!(
            "  {:<22} {:<7} {:<20} {:<8} {}",
            record.short_code.cyan(),
            record.total_clicks(),
            record
                .expires_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            status,
            record.original_url
        );
    }

    println!();
    println!(
        "  Total: {}",
        records.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn stats(analytics: &AnalyticsService<BlobRecordStore>, code: &str, json: bool) -> Result<()> {
    let report = analytics.analytics_for(code).await?;

    if json {
        return print_json(&report);
    }

    println!("{}", format!("📊 Analytics for {}", code).bright_blue().bold());
    println!();
    println!(
        "  Total clicks: {}",
        report.total_clicks.to_string().bright_green().bold()
    );
    println!();

    print_ranking("Top sources", &report.top_sources);
    print_ranking("Top locations", &report.top_locations);

    let busy_hours: Vec<_> = report
        .clicks_by_hour
        .iter()
        .filter(|bucket| bucket.count > 0)
        .collect();
    if !busy_hours.is_empty() {
        println!("  {}", "Clicks by hour (UTC)".bright_white().bold());
        for bucket in busy_hours {
            println!("    {:02}:00  {}", bucket.hour, bucket.count);
        }
        println!();
    }

    if !report.recent_clicks.is_empty() {
        println!("  {}", "Recent clicks".bright_white().bold());
        for click in &report.recent_clicks {
            println!(
                "    {}  {:<12} {}",
                click
                    .timestamp
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
                    .bright_black(),
                click.source.cyan(),
                click.location
            );
        }
        println!();
    }

    Ok(())
}

async fn summary(analytics: &AnalyticsService<BlobRecordStore>, json: bool) -> Result<()> {
    let summary = analytics.summarize(Utc::now()).await?;

    if json {
        return print_json(&summary);
    }

    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();
    println!(
        "  URLs:          {}",
        summary.total_urls.to_string().bright_green().bold()
    );
    println!(
        "  Active:        {}",
        summary.active_urls.to_string().bright_green().bold()
    );
    println!(
        "  Expired:       {}",
        summary.expired_urls.to_string().bright_red().bold()
    );
    println!(
        "  Clicks:        {}",
        summary.total_clicks.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

async fn delete(registry: &Registry, id: &str, skip_confirm: bool) -> Result<()> {
    if !skip_confirm && !confirm(&format!("Delete URL {}?", id))? {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    if registry.delete(id).await? {
        println!("{}", "✅ URL deleted".green().bold());
    } else {
        println!("{}", format!("⚠️  No URL with id {}", id).yellow());
    }

    Ok(())
}

async fn sweep(registry: &Registry) -> Result<()> {
    let removed = registry.sweep_expired(Utc::now()).await?;
    println!(
        "{} {}",
        "🧹 Expired URLs removed:".bright_blue(),
        removed.to_string().bright_white().bold()
    );
    Ok(())
}

async fn clear(registry: &Registry, skip_confirm: bool) -> Result<()> {
    if !skip_confirm && !confirm("Remove ALL URLs and their clicks?")? {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    let removed = registry.clear().await?;
    println!(
        "{} {}",
        "✅ URLs removed:".green().bold(),
        removed.to_string().bright_white().bold()
    );
    Ok(())
}

fn print_record_details(registry: &Registry, record: &UrlRecord) {
    println!();
    println!(
        "  Short URL: {}",
        registry
            .build_public_url(&record.short_code)
            .bright_yellow()
            .bold()
    );
    println!("  Original:  {}", record.original_url);
    println!("  Id:        {}", record.id.bright_black());
    println!(
        "  Expires:   {} ({} min)",
        record.expires_at.format("%Y-%m-%d %H:%M:%S UTC"),
        record.validity_minutes
    );
    println!();
}

fn print_ranking(title: &str, entries: &[(String, usize)]) {
    if entries.is_empty() {
        return;
    }

    println!("  {}", title.bright_white().bold());
    for (value, count) in entries {
        println!("    {:<24} {}", value.cyan(), count);
    }
    println!();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render JSON")?;
    println!("{}", rendered);
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?;
    Ok(confirmed)
}
