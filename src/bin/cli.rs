//! gh-watch CLI
//!
//! Fetches configured feeds, prints repositories not seen before, and records
//! skip/zap decisions.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use gh_watch::{
    error::Result,
    models::{Config, Decision, RepoId},
    pipeline::{self, WatchOptions},
    presenter,
    sources::{self, CodeSearchChecker, LicenseChecker},
    storage::{LocalStorage, StateStore, local::CONFIG_FILE},
    utils::http,
};

/// gh-watch - GitHub discovery feed watcher
#[derive(Parser, Debug)]
#[command(name = "gh-watch", version, about = "Watch GitHub discovery feeds")]
struct Cli {
    /// Path to storage directory containing config and state files
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch due feeds and print repositories not seen before
    Run {
        /// Fetch every feed regardless of its interval
        #[arg(short, long)]
        force: bool,
    },

    /// Mark repositories as skipped
    Skip {
        /// Repository ids (owner/name)
        #[arg(required = true)]
        ids: Vec<RepoId>,
    },

    /// Mark repositories as zapped
    Zap {
        /// Repository ids (owner/name)
        #[arg(required = true)]
        ids: Vec<RepoId>,
    },

    /// List recorded decisions
    Decisions,

    /// Validate configuration file
    Validate,

    /// Show storage and fetch info
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.storage_dir.join(CONFIG_FILE);
    let config = Config::load_or_default(&config_path);
    let storage = LocalStorage::new(&cli.storage_dir);

    log::debug!("Using storage directory {}", cli.storage_dir.display());

    match cli.command {
        Command::Run { force } => {
            config.validate()?;
            if config.fetches.is_empty() {
                log::warn!("No fetches configured in {}", config_path.display());
            }

            let client = http::create_client(&config.http)?;
            let sources = sources::build_sources(&config, &client);
            let checker = config
                .license
                .enabled
                .then(|| CodeSearchChecker::new(client.clone(), config.http.github_token.clone()));
            let options = WatchOptions {
                force,
                license: checker.as_ref().map(|c| c as &dyn LicenseChecker),
            };
            let report = pipeline::run_watch(&config, &storage, &sources, options).await?;

            presenter::write_output(
                &mut std::io::stdout().lock(),
                &presenter::render(&report.delta),
            )?;
        }

        Command::Skip { ids } => {
            let changed = pipeline::mark(&storage, &ids, Decision::Skipped).await?;
            log::info!("{} decision(s) recorded", changed);
        }

        Command::Zap { ids } => {
            let changed = pipeline::mark(&storage, &ids, Decision::Zapped).await?;
            log::info!("{} decision(s) recorded", changed);
        }

        Command::Decisions => {
            let decisions = storage.load_decisions().await?;
            let mut listing = String::new();
            for (id, decision) in decisions.iter() {
                let _ = writeln!(listing, "{:<8} {}", decision.as_str(), id);
            }
            presenter::write_output(&mut std::io::stdout().lock(), &listing)?;
            log::info!(
                "{} skipped, {} zapped",
                decisions.count(Decision::Skipped),
                decisions.count(Decision::Zapped)
            );
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = Config::load(&config_path).and_then(|c| c.validate()) {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK ({} fetches)", config.fetches.len());
        }

        Command::Info => {
            let state = storage.load().await?;
            log::info!("Storage directory: {}", cli.storage_dir.display());
            log::info!("Seen repositories: {}", state.cache.len());
            log::info!(
                "Decisions: {} skipped, {} zapped",
                state.decisions.count(Decision::Skipped),
                state.decisions.count(Decision::Zapped)
            );
            for fetch in &config.fetches {
                let last = state
                    .fetch_log
                    .last_fetched(&fetch.key)
                    .map_or_else(|| "never".to_string(), |t| t.to_rfc3339());
                log::info!("Fetch '{}': last fetched {}", fetch.key, last);
            }
        }
    }

    Ok(())
}
