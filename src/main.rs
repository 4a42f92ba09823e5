use std::sync::Arc;

use clap::Parser;
use tracing::error;

use matchvault_db::SharedDatabase;
use matchvault_riot_api::client::LolApiClient;
use matchvault_riot_api::rate_limit::RateGovernor;
use matchvault_shared::Region;
use matchvault_sync::{SyncCoordinator, SyncRequest};

mod cli;
mod config;
mod error;
mod export;
mod logging;

use cli::{Cli, Command, DbAction, ExportTarget};
use config::Config;
use error::AppError;

#[tokio::main]
async fn main() {
    logging::init();

    if let Err(err) = run().await {
        error!("{err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Command::Fetch {
            riot_id,
            matches,
            queue,
            all_participants,
            force_update,
            timeline,
        } => {
            let region: Region = cli.region.parse().map_err(AppError::InvalidRegion)?;
            let (game_name, tag_line) = riot_id
                .split_once('#')
                .ok_or_else(|| AppError::InvalidRiotId(riot_id.clone()))?;

            tracing::info!("🔄 starting sync for {riot_id} in {region}");

            let config = Config::from_env()?;
            let db = open_database().await?;

            let governor = Arc::new(RateGovernor::riot_default(
                config.rate_limit_per_second.get() as usize,
            ));
            let client = Arc::new(LolApiClient::with_governor(
                config.riot_api_key.clone(),
                governor,
            ));
            client.start_metrics_logging();

            let mut coordinator =
                SyncCoordinator::new(client, db.clone()).with_workers(config.sync_workers);
            if let Some(limit) = config.sync_timeout {
                coordinator = coordinator.with_deadline(limit);
            }

            let summary = coordinator
                .sync(SyncRequest {
                    game_name: game_name.to_string(),
                    tag_line: tag_line.to_string(),
                    region,
                    count: matches,
                    queue,
                    all_participants,
                    force: force_update,
                    with_timeline: timeline,
                })
                .await?;

            println!(
                "Fetched {} matches ({} skipped, {} failed)",
                summary.fetched,
                summary.skipped,
                summary.failed.len()
            );
            for failed in &summary.failed {
                println!(
                    "  {}: {} ({})",
                    failed.match_id, failed.message, failed.kind
                );
            }
        }

        Command::Db { action } => handle_db(action).await?,

        Command::Export { target } => {
            let db = open_database().await?;
            match target {
                ExportTarget::All { output_dir } => {
                    let written = export::export_all(&db, &output_dir).await?;
                    println!("Exported {} tables to {output_dir}", written.len());
                }
                ExportTarget::Table { table, output_dir } => {
                    let path = export::export_table(&db, &table, &output_dir).await?;
                    println!("Exported {table} to {}", path.display());
                }
                ExportTarget::Match {
                    match_id,
                    output_dir,
                } => {
                    let path = export::export_match(&db, &match_id, &output_dir).await?;
                    println!("Exported {match_id} to {}", path.display());
                }
            }
        }
    }

    Ok(())
}

async fn open_database() -> Result<SharedDatabase, AppError> {
    let db = SharedDatabase::new_from_env()?;
    db.init().await;
    Ok(db)
}

async fn handle_db(action: DbAction) -> Result<(), AppError> {
    match action {
        DbAction::Init => {
            open_database().await?;
            println!("Database initialized.");
        }
        DbAction::Stats => {
            let db = open_database().await?;
            let counts = db.counts().await?;
            println!("=== Database statistics ===");
            println!("Players:      {}", counts.players);
            println!("Matches:      {}", counts.matches);
            println!("Teams:        {}", counts.teams);
            println!("Participants: {}", counts.participants);
            println!("Timelines:    {}", counts.timelines);
        }
        DbAction::Reset { yes } => {
            if !yes {
                println!("Refusing to reset without --yes (this deletes all data).");
                return Ok(());
            }
            let db = open_database().await?;
            db.reset().await?;
            println!("Database reset complete.");
        }
    }
    Ok(())
}
