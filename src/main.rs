//! launchdeck CLI - terminal front end for the offline-first cache.
//!
//! Every read command serves from the local cache; only `refresh` touches
//! the network.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use futures::StreamExt;
use serde::Serialize;

use launchdeck::{AppConfig, CacheEntity, Catalog, Repository};

#[derive(Parser)]
#[command(name = "launchdeck")]
#[command(version)]
#[command(about = "Offline-first SpaceX data client")]
#[command(long_about = r#"
launchdeck mirrors SpaceX launch, vehicle, and facility data into a local
SQLite cache and serves all reads from it.

Examples:
  launchdeck refresh --all           # Sync every entity type
  launchdeck refresh launches        # Sync one entity type
  launchdeck list rockets            # Print the cached rockets
  launchdeck show cores <id>         # Print one cached core
  launchdeck watch launches          # Follow cache changes live
  launchdeck status                  # Last successful refresh per table
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch from the API and atomically replace the local cache
    Refresh {
        /// Entity type to refresh
        entity: Option<EntityArg>,

        /// Refresh every entity type
        #[arg(short, long)]
        all: bool,
    },

    /// Print the cached collection as JSON
    List {
        /// Entity type to list
        entity: EntityArg,
    },

    /// Print one cached entity by its upstream id
    Show {
        /// Entity type to look in
        entity: EntityArg,

        /// Upstream id of the entity
        id: String,
    },

    /// Follow the cached collection, printing each new snapshot
    Watch {
        /// Entity type to watch
        entity: EntityArg,
    },

    /// Last successful refresh per table
    Status,

    /// Drop every cached row
    Clear,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EntityArg {
    Launches,
    Rockets,
    Capsules,
    Cores,
    Crew,
    Ships,
    Dragons,
    Landpads,
    Launchpads,
    Payloads,
}

/// Run `$body` against the repository selected by `$entity`.
macro_rules! on_repo {
    ($catalog:expr, $entity:expr, |$repo:ident| $body:expr) => {
        match $entity {
            EntityArg::Launches => {
                let $repo = $catalog.launches();
                $body
            }
            EntityArg::Rockets => {
                let $repo = $catalog.rockets();
                $body
            }
            EntityArg::Capsules => {
                let $repo = $catalog.capsules();
                $body
            }
            EntityArg::Cores => {
                let $repo = $catalog.cores();
                $body
            }
            EntityArg::Crew => {
                let $repo = $catalog.crew();
                $body
            }
            EntityArg::Ships => {
                let $repo = $catalog.ships();
                $body
            }
            EntityArg::Dragons => {
                let $repo = $catalog.dragons();
                $body
            }
            EntityArg::Landpads => {
                let $repo = $catalog.landpads();
                $body
            }
            EntityArg::Launchpads => {
                let $repo = $catalog.launchpads();
                $body
            }
            EntityArg::Payloads => {
                let $repo = $catalog.payloads();
                $body
            }
        }
    };
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::load();
    let catalog = Catalog::new(&config).context("failed to open the local cache")?;

    match cli.command {
        Commands::Refresh { entity, all } => match (entity, all) {
            (Some(entity), false) => on_repo!(catalog, entity, |repo| refresh_one(repo).await)?,
            (None, _) | (_, true) => refresh_all(&catalog).await?,
        },
        Commands::List { entity } => on_repo!(catalog, entity, |repo| print_list(repo).await)?,
        Commands::Show { entity, id } => {
            on_repo!(catalog, entity, |repo| print_one(repo, &id).await)?
        }
        Commands::Watch { entity } => on_repo!(catalog, entity, |repo| watch(repo).await)?,
        Commands::Status => print_status(&catalog).await?,
        Commands::Clear => {
            catalog.clear_cache().await?;
            println!("cache cleared");
        }
    }

    Ok(())
}

async fn refresh_one<E: CacheEntity>(repo: &Repository<E>) -> Result<()> {
    repo.refresh()
        .await
        .with_context(|| format!("refresh of {} failed", E::TABLE.name()))?;
    let count = repo.get_all().await?.len();
    println!("{}: {count} rows", E::TABLE.name());
    Ok(())
}

async fn refresh_all(catalog: &Catalog) -> Result<()> {
    let report = catalog.refresh_all().await;
    for table in &report.refreshed {
        println!("{}: ok", table.name());
    }
    for (table, err) in &report.failed {
        eprintln!("{}: {err}", table.name());
    }
    if !report.all_ok() {
        anyhow::bail!("{} of 10 refreshes failed", report.failed.len());
    }
    Ok(())
}

async fn print_list<E: CacheEntity + Serialize>(repo: &Repository<E>) -> Result<()> {
    let items = repo.get_all().await?;
    println!("{}", serde_json::to_string_pretty(&items)?);
    Ok(())
}

async fn print_one<E: CacheEntity + Serialize>(repo: &Repository<E>, id: &str) -> Result<()> {
    match repo.get_by_id(id).await? {
        Some(item) => println!("{}", serde_json::to_string_pretty(&item)?),
        None => println!("{}: no cached entity with id {id}", E::TABLE.name()),
    }
    Ok(())
}

async fn watch<E: CacheEntity>(repo: &Repository<E>) -> Result<()> {
    let mut stream = Box::pin(repo.observe());
    while let Some(snapshot) = stream.next().await {
        match snapshot {
            Ok(items) => println!("{}: {} rows cached", E::TABLE.name(), items.len()),
            Err(err) => eprintln!("{}: read failed: {err}", E::TABLE.name()),
        }
    }
    Ok(())
}

async fn print_status(catalog: &Catalog) -> Result<()> {
    for (table, last) in catalog.status().await? {
        match last {
            Some(at) => println!("{:<12} {}", table.name(), at.format("%Y-%m-%d %H:%M:%S UTC")),
            None => println!("{:<12} never refreshed", table.name()),
        }
    }
    Ok(())
}
