//! Creature Catalog CLI
//!
//! Loads creatures from the public catalog API and prints them as cards.

use std::path::PathBuf;

use catalog::{
    error::Result,
    models::{ApiShape, Config, CreatureRecord, SortCriterion, ViewState},
    pipeline::{CatalogSession, LoadOutcome},
    services::HttpSource,
};
use clap::{Args, Parser, Subcommand};

/// catalog - Creature Catalog Explorer
#[derive(Parser, Debug)]
#[command(name = "catalog", version, about = "Searchable, sortable creature catalog")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load creatures page by page from the per-identifier endpoint
    Browse {
        /// Number of batches to load (at least 1)
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Load every creature from the bulk endpoint
    Bulk {
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Search the catalog listing by name
    Search {
        /// Name or part of a name
        name: String,

        /// Sort order: none, name or level
        #[arg(long, default_value = "none")]
        sort: SortCriterion,

        /// Print JSON instead of cards
        #[arg(long)]
        json: bool,
    },

    /// Validate the configuration file
    Validate,
}

/// View options shared by the loading commands.
#[derive(Args, Debug)]
struct ViewArgs {
    /// Only show creatures whose name contains this text
    #[arg(short, long, default_value = "")]
    search: String,

    /// Sort order: none, name or level
    #[arg(long, default_value = "none")]
    sort: SortCriterion,

    /// Print JSON instead of cards
    #[arg(long)]
    json: bool,
}

/// Initialize logging; RUST_LOG overrides `level`.
fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn render(rows: &[CreatureRecord], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No creatures match.");
        return Ok(());
    }

    for record in rows {
        let id = record.id.map(|id| format!("#{id:<5}")).unwrap_or_else(|| "      ".to_string());
        println!(
            "{id} {:<28} Level: {}",
            record.name,
            record.current_level().unwrap_or("-")
        );
        if let Some(image) = &record.image {
            println!("       {image}");
        }
    }
    println!("{} creatures", rows.len());
    Ok(())
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = Config::load(&cli.config);
    let level = match (&loaded, cli.verbose) {
        (_, true) => "debug".to_string(),
        (Ok(config), false) => config.logging.level.clone(),
        (Err(_), false) => "info".to_string(),
    };
    init_logging(&level);

    let mut config = loaded.unwrap_or_else(|e| {
        log::warn!(
            "Config load failed from {}: {}. Using defaults.",
            cli.config.display(),
            e
        );
        Config::default()
    });

    match cli.command {
        Command::Browse { pages, view } => {
            config.api.shape = ApiShape::PerId;
            let session = CatalogSession::new(HttpSource::new(&config.api)?, &config);

            session.load_initial().await?;
            for _ in 1..pages {
                if session.load_more().await == LoadOutcome::Exhausted {
                    break;
                }
            }

            let state = session.snapshot();
            log::info!(
                "Loaded {} creatures (next #{}, more: {})",
                state.records.len(),
                state.cursor,
                state.has_more
            );
            let rows = session.view(&ViewState::new(view.search, view.sort));
            render(&rows, view.json)?;
        }

        Command::Bulk { view } => {
            config.api.shape = ApiShape::Bulk;
            let session = CatalogSession::new(HttpSource::new(&config.api)?, &config);

            if let Err(e) = session.load_initial().await {
                log::error!("Could not load the catalog: {e}. Run the command again to reload.");
                return Err(e);
            }

            let rows = session.view(&ViewState::new(view.search, view.sort));
            render(&rows, view.json)?;
        }

        Command::Search { name, sort, json } => {
            let session = CatalogSession::new(HttpSource::new(&config.api)?, &config);
            session.search_remote(&name).await?;

            let rows = session.view(&ViewState::new(name, sort));
            render(&rows, json)?;
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
        }
    }

    Ok(())
}
