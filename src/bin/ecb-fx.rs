//! ecb-fx CLI - Historical ECB exchange rates from the command line
//!
//! ## Example Usage
//!
//! ```bash
//! # USD-based rates for EUR and CAD on 2023-10-01 (closest published day)
//! ecb-fx rates USD -t EUR,CAD,USD --date 2023-10-01
//!
//! # Every currency, today, failing on the first unconvertible one
//! ecb-fx rates EUR --strict --json
//!
//! # Inspect or drop the cached table
//! ecb-fx cache info
//! ecb-fx cache clear
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use ecb_fx::data::fx::{CachedRateTableProvider, EcbRateTableProvider};
use ecb_fx::{ExchangeRates, FxConfig, FxError};
use std::path::{Path, PathBuf};
use std::process;

/// ecb-fx: historical exchange rates from the European Central Bank
#[derive(Parser)]
#[command(name = "ecb-fx")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Historical ECB exchange rates for any base currency", long_about = None)]
struct Cli {
    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show rates relative to a base currency
    Rates {
        /// Base currency (e.g. USD)
        #[arg(value_name = "BASE")]
        base: String,

        /// Target currencies, all published ones when omitted
        #[arg(short = 't', long = "to", value_delimiter = ',')]
        targets: Vec<String>,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short = 'd', long)]
        date: Option<String>,

        /// Maximum distance in days to the closest published date (exclusive)
        #[arg(short = 'w', long)]
        within_days: Option<u32>,

        /// Fail on the first currency that cannot be converted
        #[arg(long)]
        strict: bool,

        /// Fail if the base currency has no rate on the matched date
        #[arg(long)]
        require_base: bool,

        /// Always download, ignoring the cache file
        #[arg(long)]
        no_cache: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Manage the cached rate table
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Show cache location and freshness
    Info,

    /// Delete the cache file
    Clear,
}

fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => dirs::home_dir().map(|home| home.join(".ecb-fx").join("config.toml")),
    }
}

fn load_config(explicit: Option<&Path>) -> Result<FxConfig, FxError> {
    let config = match config_path(explicit) {
        Some(path) if path.exists() => FxConfig::from_file(&path)?,
        Some(path) if explicit.is_some() => {
            return Err(FxError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )))
        }
        _ => FxConfig::default(),
    };

    let config = config.with_env_overrides();
    config.validate()?;
    Ok(config)
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(1);
        }
    };

    if cli.verbose {
        println!("{} v{}", "ecb-fx".cyan().bold(), env!("CARGO_PKG_VERSION"));
        println!("Source: {}", config.source_url.dimmed());
    }

    let result = match cli.command {
        Commands::Rates {
            base,
            targets,
            date,
            within_days,
            strict,
            require_base,
            no_cache,
            json,
        } => show_rates(RatesConfig {
            base,
            targets,
            date,
            within_days,
            strict,
            require_base,
            no_cache,
            json,
            config,
        }),

        Commands::Cache { action } => handle_cache_action(action, &config),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

struct RatesConfig {
    base: String,
    targets: Vec<String>,
    date: Option<String>,
    within_days: Option<u32>,
    strict: bool,
    require_base: bool,
    no_cache: bool,
    json: bool,
    config: FxConfig,
}

fn show_rates(cfg: RatesConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = cfg.config;
    if cfg.no_cache {
        config.cache = false;
    }
    if let Some(days) = cfg.within_days {
        config.within_days = days;
    }
    if cfg.strict {
        config.continue_on_error = false;
    }

    let mut query = config.query(&cfg.base).require_base(cfg.require_base);
    if !cfg.targets.is_empty() {
        query = query.targets(&cfg.targets);
    }
    if let Some(date) = &cfg.date {
        query = query.on_str(date)?;
    }

    let resolved = ExchangeRates::from_config(&config)?.detailed_rates(&query)?;
    let rates = &resolved.rates;

    if cfg.json {
        println!("{}", serde_json::to_string_pretty(rates)?);
        return Ok(());
    }

    let header = if resolved.matched == resolved.requested {
        format!("Rates for 1 {} on {}", query.base_currency, resolved.matched)
    } else {
        format!(
            "Rates for 1 {} on {} (closest to {})",
            query.base_currency, resolved.matched, resolved.requested
        )
    };
    println!("{}", header.cyan().bold());
    if rates.is_empty() {
        println!("  {}", "No currency could be converted".yellow());
    }
    for (currency, rate) in rates {
        println!("  {} {:>16.6}", format!("{:<4}", currency).bold(), rate);
    }
    Ok(())
}

fn handle_cache_action(action: CacheAction, config: &FxConfig) -> Result<(), Box<dyn std::error::Error>> {
    let ecb = EcbRateTableProvider::with_url(&config.source_url, config.timeout())?;
    let cache = CachedRateTableProvider::with_path(ecb, &config.cache_file, config.cache_ttl());

    match action {
        CacheAction::Info => {
            println!("{}", "Cache".bold());
            println!("{}", "=====".dimmed());
            println!("  {} {}", "File:".bold(), cache.path().display());
            println!("  {} {}s", "TTL:".bold(), cache.ttl().as_secs());
            match cache.age() {
                Some(age) => {
                    let status = if cache.is_fresh() {
                        "fresh".green()
                    } else {
                        "stale".yellow()
                    };
                    println!("  {} {}s ({})", "Age:".bold(), age.as_secs(), status);
                }
                None => println!("  {} {}", "Age:".bold(), "no cache file".dimmed()),
            }
            if !config.cache {
                println!("  {} {}", "Note:".bold(), "caching is disabled in the configuration".dimmed());
            }
        }
        CacheAction::Clear => {
            if cache.clear()? {
                println!("{} Removed {}", "✓".green().bold(), cache.path().display());
            } else {
                println!("Nothing to remove at {}", cache.path().display());
            }
        }
    }
    Ok(())
}
