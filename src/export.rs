//! CSV export of the stored tables.
//!
//! Reads go through the store's query surface only; nothing here touches
//! SQL. One file per table, or one file per match for the joined view.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use matchvault_db::SharedDatabase;
use matchvault_shared::QueueType;
use matchvault_shared::traits::{MatchStore, PlayerStore};

use crate::error::AppError;

pub const TABLES: [&str; 5] = ["players", "matches", "teams", "participants", "timelines"];

pub async fn export_all(db: &SharedDatabase, output_dir: &str) -> Result<Vec<PathBuf>, AppError> {
    let mut written = Vec::new();
    for table in TABLES {
        written.push(export_table(db, table, output_dir).await?);
    }
    Ok(written)
}

pub async fn export_table(
    db: &SharedDatabase,
    table: &str,
    output_dir: &str,
) -> Result<PathBuf, AppError> {
    fs::create_dir_all(output_dir)?;
    let path = Path::new(output_dir).join(format!("{table}.csv"));
    let mut writer = csv::Writer::from_path(&path)?;

    match table {
        "players" => {
            writer.write_record([
                "puuid",
                "region",
                "game_name",
                "tag_line",
                "rank_tier",
                "rank_division",
                "league_points",
            ])?;
            for p in db.list_players().await? {
                writer.write_record([
                    p.puuid,
                    p.region.to_string(),
                    p.game_name,
                    p.tag_line,
                    p.rank_tier.unwrap_or_default(),
                    p.rank_division.unwrap_or_default(),
                    p.league_points.map(|n| n.to_string()).unwrap_or_default(),
                ])?;
            }
        }
        "matches" => {
            writer.write_record([
                "match_id",
                "region",
                "queue_id",
                "queue_type",
                "game_creation",
                "game_duration",
                "game_version",
                "participant_count",
                "fetched_at",
            ])?;
            for m in db.list_matches().await? {
                writer.write_record([
                    m.match_id.clone(),
                    m.region.to_string(),
                    m.queue_id.to_string(),
                    QueueType::from(m.queue_id).as_str().to_string(),
                    m.game_creation.to_string(),
                    m.game_duration.to_string(),
                    m.game_version.clone().unwrap_or_default(),
                    m.participant_count.to_string(),
                    m.fetched_at.to_string(),
                ])?;
            }
        }
        "teams" => {
            writer.write_record([
                "match_id",
                "team_id",
                "win",
                "first_blood",
                "first_tower",
                "first_baron",
                "first_dragon",
                "champion_kills",
                "tower_kills",
                "inhibitor_kills",
                "baron_kills",
                "dragon_kills",
                "rift_herald_kills",
            ])?;
            for (match_id, t) in db.team_rows().await? {
                let o = &t.objectives;
                writer.write_record([
                    match_id,
                    t.team_id.to_string(),
                    t.win.to_string(),
                    o.champion.first.to_string(),
                    o.tower.first.to_string(),
                    o.baron.first.to_string(),
                    o.dragon.first.to_string(),
                    o.champion.kills.to_string(),
                    o.tower.kills.to_string(),
                    o.inhibitor.kills.to_string(),
                    o.baron.kills.to_string(),
                    o.dragon.kills.to_string(),
                    o.rift_herald.kills.to_string(),
                ])?;
            }
        }
        "participants" => {
            writer.write_record([
                "match_id",
                "participant_id",
                "team_id",
                "puuid",
                "riot_id",
                "champion",
                "level",
                "kills",
                "deaths",
                "assists",
                "gold_earned",
                "creep_score",
                "damage_to_champions",
                "vision_score",
                "position",
                "win",
            ])?;
            for (match_id, p) in db.participant_rows().await? {
                writer.write_record([
                    match_id,
                    p.participant_id.to_string(),
                    p.team_id.to_string(),
                    p.puuid.clone(),
                    format!("{}#{}", p.riot_id_game_name, p.riot_id_tagline),
                    p.champion_name.clone(),
                    p.champ_level.to_string(),
                    p.kills.to_string(),
                    p.deaths.to_string(),
                    p.assists.to_string(),
                    p.gold_earned.to_string(),
                    p.creep_score().to_string(),
                    p.damage_to_champions.to_string(),
                    p.vision_score.to_string(),
                    p.team_position.clone(),
                    p.win.to_string(),
                ])?;
            }
        }
        "timelines" => {
            writer.write_record(["match_id", "frame_interval_ms", "frame_count"])?;
            for (match_id, interval, frames) in db.timeline_rows().await? {
                writer.write_record([
                    match_id,
                    interval.map(|n| n.to_string()).unwrap_or_default(),
                    frames.to_string(),
                ])?;
            }
        }
        other => return Err(AppError::UnknownTable(other.to_string())),
    }

    writer.flush()?;
    info!("exported {} to {}", table, path.display());
    Ok(path)
}

/// One CSV per match: participant rows joined with match and team facts.
pub async fn export_match(
    db: &SharedDatabase,
    match_id: &str,
    output_dir: &str,
) -> Result<PathBuf, AppError> {
    let bundle = db
        .match_bundle(match_id)
        .await?
        .ok_or_else(|| AppError::MatchNotStored(match_id.to_string()))?;

    fs::create_dir_all(output_dir)?;
    let path = Path::new(output_dir).join(format!("{match_id}.csv"));
    let mut writer = csv::Writer::from_path(&path)?;

    writer.write_record([
        "match_id",
        "queue_type",
        "game_duration",
        "participant_id",
        "riot_id",
        "champion",
        "kills",
        "deaths",
        "assists",
        "kda",
        "gold_earned",
        "creep_score",
        "damage_to_champions",
        "vision_score",
        "position",
        "team_id",
        "team_win",
    ])?;

    let m = &bundle.match_data;
    for p in &bundle.participants {
        let team_win = bundle
            .teams
            .iter()
            .find(|t| t.team_id == p.team_id)
            .map(|t| t.win)
            .unwrap_or(p.win);
        writer.write_record([
            m.match_id.clone(),
            m.queue_type().as_str().to_string(),
            m.formatted_duration(),
            p.participant_id.to_string(),
            format!("{}#{}", p.riot_id_game_name, p.riot_id_tagline),
            p.champion_name.clone(),
            p.kills.to_string(),
            p.deaths.to_string(),
            p.assists.to_string(),
            format!("{:.2}", p.kda()),
            p.gold_earned.to_string(),
            p.creep_score().to_string(),
            p.damage_to_champions.to_string(),
            p.vision_score.to_string(),
            p.team_position.clone(),
            p.team_id.to_string(),
            team_win.to_string(),
        ])?;
    }

    writer.flush()?;
    info!("exported match {} to {}", match_id, path.display());
    Ok(path)
}
