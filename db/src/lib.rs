//! SQLite based storage layer for the match archive.
//!
//! This crate defines [`SharedDatabase`], a thread-safe wrapper around one
//! SQLite connection, and implements the store traits the sync pipeline
//! writes through. Every match write is one transaction: a match and its
//! dependent team/participant/timeline rows land or roll back together.

use std::collections::HashSet;
use std::env;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info};

use matchvault_shared::lol_match::{
    Match, MatchRecord, Participant, Team, TeamObjectives, Timeline,
};
use matchvault_shared::traits::{MatchStore, PlayerStore, StoreError, StoreFull};
use matchvault_shared::{Player, Region};

mod schema;

// Re-exported so binary crates can match on SQLite errors without carrying
// the dependency themselves.
pub use rusqlite;

/// Thread-safe wrapper around a SQLite database connection used across
/// async tasks.
#[derive(Debug, Clone)]
pub struct SharedDatabase {
    conn: Arc<Mutex<Connection>>,
    init_once: Arc<OnceCell<()>>,
}

/// Row counts per table, for the `db stats` surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub players: u64,
    pub matches: u64,
    pub teams: u64,
    pub participants: u64,
    pub timelines: u64,
}

impl SharedDatabase {
    /// Create a new database at the given path.
    pub fn new(path: impl AsRef<Path>) -> rusqlite::Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self::from_connection(conn))
    }

    /// Create a new database from the given connection.
    pub fn from_connection(conn: Connection) -> Self {
        info!("opening SQLite connection");
        Self {
            conn: Arc::new(Mutex::new(conn)),
            init_once: Arc::new(OnceCell::new()),
        }
    }

    /// In-memory database, used by tests and dry runs.
    pub fn in_memory() -> rusqlite::Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self::from_connection(conn))
    }

    /// Create a new database using the `DB_PATH` environment variable as
    /// the containing directory.
    pub fn new_from_env() -> rusqlite::Result<Self> {
        let db_dir = env::var("DB_PATH").unwrap_or_else(|_| "./".to_string());

        // Expand '~' to the user's home directory
        let db_dir = if db_dir == "~" || db_dir.starts_with("~/") {
            if let Ok(home) = env::var("HOME") {
                format!("{}{}", home, &db_dir[1..])
            } else {
                db_dir
            }
        } else {
            db_dir
        };

        let mut db_path = std::path::PathBuf::from(db_dir);
        db_path.push("matchvault.db3");
        Self::new(db_path)
    }

    /// Initialize the schema. Idempotent, runs once per instance.
    pub async fn init(&self) {
        let _ = self
            .init_once
            .get_or_init(|| async {
                info!("initializing schema");
                let db = self.conn.lock().await;
                schema::init(&db).expect("failed to initialize database schema");
                debug!("database ready");
            })
            .await;
    }

    /// Drop every table and recreate the schema. Destructive.
    pub async fn reset(&self) -> Result<(), StoreError> {
        let db = self.conn.lock().await;
        schema::drop_all(&db)?;
        schema::init(&db)?;
        Ok(())
    }

    pub async fn counts(&self) -> Result<TableCounts, StoreError> {
        let db = self.conn.lock().await;
        let count = |table: &str| -> rusqlite::Result<u64> {
            db.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get(0)
            })
        };
        Ok(TableCounts {
            players: count("players")?,
            matches: count("matches")?,
            teams: count("teams")?,
            participants: count("participants")?,
            timelines: count("timelines")?,
        })
    }

    /// Every team row joined with its match id, for table export.
    pub async fn team_rows(&self) -> Result<Vec<(String, Team)>, StoreError> {
        let db = self.conn.lock().await;
        let mut stmt = db.prepare(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams ORDER BY match_id, team_id"
        ))?;
        let rows = stmt.query_map([], team_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Every participant row joined with its match id, for table export.
    pub async fn participant_rows(&self) -> Result<Vec<(String, Participant)>, StoreError> {
        let db = self.conn.lock().await;
        let mut stmt = db.prepare(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants ORDER BY match_id, participant_id"
        ))?;
        let rows = stmt.query_map([], participant_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Timeline summaries (match id, frame interval, frame count).
    pub async fn timeline_rows(&self) -> Result<Vec<(String, Option<u64>, usize)>, StoreError> {
        let db = self.conn.lock().await;
        let mut stmt =
            db.prepare("SELECT match_id, frame_interval, frames FROM timelines ORDER BY match_id")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<u64>>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;
        let mut out = Vec::new();
        for row in rows {
            let (match_id, interval, frames) = row?;
            let frames: serde_json::Value = serde_json::from_str(&frames)?;
            out.push((match_id, interval, frames.as_array().map_or(0, Vec::len)));
        }
        Ok(out)
    }
}

#[async_trait]
impl PlayerStore for SharedDatabase {
    async fn upsert_player(&self, player: &Player) -> Result<(), StoreError> {
        let db = self.conn.lock().await;
        db.execute(
            "INSERT INTO players
                (puuid, region, game_name, tag_line, rank_tier, rank_division, league_points)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ON CONFLICT(puuid) DO UPDATE SET
                    region = excluded.region,
                    game_name = excluded.game_name,
                    tag_line = excluded.tag_line,
                    rank_tier = excluded.rank_tier,
                    rank_division = excluded.rank_division,
                    league_points = excluded.league_points",
            params![
                player.puuid,
                player.region.as_str(),
                player.game_name,
                player.tag_line,
                player.rank_tier,
                player.rank_division,
                player.league_points,
            ],
        )?;
        Ok(())
    }

    async fn get_player(&self, puuid: &str) -> Result<Option<Player>, StoreError> {
        let db = self.conn.lock().await;
        db.query_row(
            &format!("SELECT {PLAYER_COLUMNS} FROM players WHERE puuid = ?1"),
            [puuid],
            player_from_row,
        )
        .optional()
        .map_err(Into::into)
    }

    async fn list_players(&self) -> Result<Vec<Player>, StoreError> {
        let db = self.conn.lock().await;
        let mut stmt = db.prepare(&format!(
            "SELECT {PLAYER_COLUMNS} FROM players ORDER BY game_name, tag_line"
        ))?;
        let rows = stmt.query_map([], player_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

#[async_trait]
impl MatchStore for SharedDatabase {
    async fn upsert_match(&self, record: &MatchRecord) -> Result<(), StoreError> {
        let mut db = self.conn.lock().await;
        let tx = db.transaction()?;
        let m = &record.match_data;

        // Dependents are replaced wholesale so a forced refresh is
        // all-or-nothing; no row of the prior version survives a commit.
        tx.execute("DELETE FROM timelines WHERE match_id = ?1", [&m.match_id])?;
        tx.execute(
            "DELETE FROM participants WHERE match_id = ?1",
            [&m.match_id],
        )?;
        tx.execute("DELETE FROM teams WHERE match_id = ?1", [&m.match_id])?;

        tx.execute(
            "INSERT INTO matches
                (match_id, region, queue_id, game_creation, game_duration,
                 game_version, participant_count, fetched_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                ON CONFLICT(match_id) DO UPDATE SET
                    region = excluded.region,
                    queue_id = excluded.queue_id,
                    game_creation = excluded.game_creation,
                    game_duration = excluded.game_duration,
                    game_version = excluded.game_version,
                    participant_count = excluded.participant_count,
                    fetched_at = excluded.fetched_at",
            params![
                m.match_id,
                m.region.as_str(),
                m.queue_id,
                m.game_creation,
                m.game_duration,
                m.game_version,
                m.participant_count,
                m.fetched_at,
            ],
        )?;

        for team in &record.teams {
            let o = &team.objectives;
            tx.execute(
                "INSERT INTO teams
                    (match_id, team_id, win,
                     first_blood, first_tower, first_inhibitor,
                     first_baron, first_dragon, first_rift_herald,
                     champion_kills, tower_kills, inhibitor_kills,
                     baron_kills, dragon_kills, rift_herald_kills, bans)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
                params![
                    m.match_id,
                    team.team_id,
                    team.win,
                    o.champion.first,
                    o.tower.first,
                    o.inhibitor.first,
                    o.baron.first,
                    o.dragon.first,
                    o.rift_herald.first,
                    o.champion.kills,
                    o.tower.kills,
                    o.inhibitor.kills,
                    o.baron.kills,
                    o.dragon.kills,
                    o.rift_herald.kills,
                    serde_json::to_string(&team.bans)?,
                ],
            )?;
        }

        for p in &record.participants {
            // A minimal player row keeps the participant -> player reference
            // valid without clobbering richer rows written at resolve time.
            tx.execute(
                "INSERT OR IGNORE INTO players (puuid, region, game_name, tag_line)
                    VALUES (?1, ?2, ?3, ?4)",
                params![p.puuid, m.region.as_str(), p.riot_id_game_name, p.riot_id_tagline],
            )?;
            tx.execute(
                "INSERT INTO participants
                    (match_id, participant_id, team_id, puuid,
                     riot_id_game_name, riot_id_tagline,
                     champion_id, champion_name, champ_level,
                     kills, deaths, assists, gold_earned,
                     total_minions_killed, neutral_minions_killed,
                     damage_to_champions, vision_score, team_position, win)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                            ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
                params![
                    m.match_id,
                    p.participant_id,
                    p.team_id,
                    p.puuid,
                    p.riot_id_game_name,
                    p.riot_id_tagline,
                    p.champion_id,
                    p.champion_name,
                    p.champ_level,
                    p.kills,
                    p.deaths,
                    p.assists,
                    p.gold_earned,
                    p.total_minions_killed,
                    p.neutral_minions_killed,
                    p.damage_to_champions,
                    p.vision_score,
                    p.team_position,
                    p.win,
                ],
            )?;
        }

        if let Some(timeline) = &record.timeline {
            tx.execute(
                "INSERT INTO timelines (match_id, frame_interval, frames)
                    VALUES (?1, ?2, ?3)",
                params![
                    m.match_id,
                    timeline.frame_interval,
                    serde_json::to_string(&timeline.frames)?,
                ],
            )?;
        }

        tx.commit()?;
        debug!(match_id = %m.match_id, "match stored");
        Ok(())
    }

    async fn has_complete_match(&self, match_id: &str) -> Result<bool, StoreError> {
        let db = self.conn.lock().await;
        is_complete(&db, match_id).map_err(Into::into)
    }

    async fn complete_match_ids(&self, ids: &[String]) -> Result<HashSet<String>, StoreError> {
        let db = self.conn.lock().await;
        let mut complete = HashSet::new();
        for id in ids {
            if is_complete(&db, id)? {
                complete.insert(id.clone());
            }
        }
        Ok(complete)
    }

    async fn list_matches(&self) -> Result<Vec<Match>, StoreError> {
        let db = self.conn.lock().await;
        let mut stmt = db.prepare(&format!(
            "SELECT {MATCH_COLUMNS} FROM matches ORDER BY game_creation DESC"
        ))?;
        let rows = stmt.query_map([], match_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    async fn match_bundle(&self, match_id: &str) -> Result<Option<MatchRecord>, StoreError> {
        let db = self.conn.lock().await;

        let match_data = db
            .query_row(
                &format!("SELECT {MATCH_COLUMNS} FROM matches WHERE match_id = ?1"),
                [match_id],
                match_from_row,
            )
            .optional()?;
        let Some(match_data) = match_data else {
            return Ok(None);
        };

        let mut stmt = db.prepare(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams WHERE match_id = ?1 ORDER BY team_id"
        ))?;
        let teams = stmt
            .query_map([match_id], team_from_row)?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|(_, team)| team)
            .collect();

        let mut stmt = db.prepare(&format!(
            "SELECT {PARTICIPANT_COLUMNS} FROM participants
                WHERE match_id = ?1 ORDER BY participant_id"
        ))?;
        let participants = stmt
            .query_map([match_id], participant_from_row)?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|(_, participant)| participant)
            .collect();

        let timeline = db
            .query_row(
                "SELECT frame_interval, frames FROM timelines WHERE match_id = ?1",
                [match_id],
                |row| Ok((row.get::<_, Option<u64>>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;
        let timeline = match timeline {
            Some((frame_interval, frames)) => Some(Timeline {
                frame_interval,
                frames: serde_json::from_str(&frames)?,
            }),
            None => None,
        };

        Ok(Some(MatchRecord {
            match_data,
            teams,
            participants,
            timeline,
        }))
    }
}

impl StoreFull for SharedDatabase {}

const PLAYER_COLUMNS: &str =
    "puuid, region, game_name, tag_line, rank_tier, rank_division, league_points";

const MATCH_COLUMNS: &str = "match_id, region, queue_id, game_creation, game_duration, \
     game_version, participant_count, fetched_at";

const TEAM_COLUMNS: &str = "match_id, team_id, win, first_blood, first_tower, first_inhibitor, \
     first_baron, first_dragon, first_rift_herald, champion_kills, tower_kills, \
     inhibitor_kills, baron_kills, dragon_kills, rift_herald_kills, bans";

const PARTICIPANT_COLUMNS: &str =
    "match_id, participant_id, team_id, puuid, riot_id_game_name, riot_id_tagline, \
     champion_id, champion_name, champ_level, kills, deaths, assists, gold_earned, \
     total_minions_killed, neutral_minions_killed, damage_to_champions, vision_score, \
     team_position, win";

/// A match is complete when its row exists and the stored participant rows
/// reach the count the remote detail reported.
fn is_complete(db: &Connection, match_id: &str) -> rusqlite::Result<bool> {
    let counts: Option<(u32, u32)> = db
        .query_row(
            "SELECT m.participant_count,
                    (SELECT COUNT(*) FROM participants p WHERE p.match_id = m.match_id)
                FROM matches m WHERE m.match_id = ?1",
            [match_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;
    Ok(counts.is_some_and(|(expected, stored)| expected > 0 && stored == expected))
}

fn parse_region(idx: usize, value: String) -> rusqlite::Result<Region> {
    value.parse().map_err(|e: String| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, e.into())
    })
}

fn parse_json(idx: usize, value: &str) -> rusqlite::Result<serde_json::Value> {
    serde_json::from_str(value).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn player_from_row(row: &Row) -> rusqlite::Result<Player> {
    Ok(Player {
        puuid: row.get(0)?,
        region: parse_region(1, row.get(1)?)?,
        game_name: row.get(2)?,
        tag_line: row.get(3)?,
        rank_tier: row.get(4)?,
        rank_division: row.get(5)?,
        league_points: row.get(6)?,
    })
}

fn match_from_row(row: &Row) -> rusqlite::Result<Match> {
    Ok(Match {
        match_id: row.get(0)?,
        region: parse_region(1, row.get(1)?)?,
        queue_id: row.get(2)?,
        game_creation: row.get(3)?,
        game_duration: row.get(4)?,
        game_version: row.get(5)?,
        participant_count: row.get(6)?,
        fetched_at: row.get(7)?,
    })
}

fn team_from_row(row: &Row) -> rusqlite::Result<(String, Team)> {
    let bans: String = row.get(15)?;
    let bans = parse_json(15, &bans)?;
    let bans = serde_json::from_value(bans).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(15, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let stat = |first: usize, kills: usize| -> rusqlite::Result<_> {
        Ok(matchvault_shared::lol_match::ObjectiveStat {
            first: row.get(first)?,
            kills: row.get(kills)?,
        })
    };
    Ok((
        row.get(0)?,
        Team {
            team_id: row.get(1)?,
            win: row.get(2)?,
            objectives: TeamObjectives {
                champion: stat(3, 9)?,
                tower: stat(4, 10)?,
                inhibitor: stat(5, 11)?,
                baron: stat(6, 12)?,
                dragon: stat(7, 13)?,
                rift_herald: stat(8, 14)?,
            },
            bans,
        },
    ))
}

fn participant_from_row(row: &Row) -> rusqlite::Result<(String, Participant)> {
    Ok((
        row.get(0)?,
        Participant {
            participant_id: row.get(1)?,
            team_id: row.get(2)?,
            puuid: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            riot_id_game_name: row.get(4)?,
            riot_id_tagline: row.get(5)?,
            champion_id: row.get(6)?,
            champion_name: row.get(7)?,
            champ_level: row.get(8)?,
            kills: row.get(9)?,
            deaths: row.get(10)?,
            assists: row.get(11)?,
            gold_earned: row.get(12)?,
            total_minions_killed: row.get(13)?,
            neutral_minions_killed: row.get(14)?,
            damage_to_champions: row.get(15)?,
            vision_score: row.get(16)?,
            team_position: row.get(17)?,
            win: row.get(18)?,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use matchvault_shared::lol_match::{Ban, ObjectiveStat};

    async fn database() -> SharedDatabase {
        let db = SharedDatabase::in_memory().expect("in-memory database");
        db.init().await;
        db
    }

    fn participant(puuid: &str, ordinal: u16, team_id: u16, marker: &str) -> Participant {
        Participant {
            participant_id: ordinal,
            team_id,
            puuid: puuid.into(),
            riot_id_game_name: format!("Player{ordinal}"),
            riot_id_tagline: "TAG".into(),
            champion_id: 100 + u32::from(ordinal),
            champion_name: format!("Champ-{marker}"),
            champ_level: 14,
            kills: 3,
            deaths: 4,
            assists: 5,
            gold_earned: 10_500,
            total_minions_killed: 160,
            neutral_minions_killed: 20,
            damage_to_champions: 18_000,
            vision_score: 22,
            team_position: "MIDDLE".into(),
            win: team_id == 100,
        }
    }

    fn team(team_id: u16, marker: &str) -> Team {
        Team {
            team_id,
            win: team_id == 100,
            objectives: TeamObjectives {
                champion: ObjectiveStat {
                    first: team_id == 100,
                    kills: 20,
                },
                dragon: ObjectiveStat {
                    first: false,
                    kills: 3,
                },
                ..Default::default()
            },
            bans: vec![Ban {
                champion_id: if marker == "v1" { 53 } else { 412 },
                pick_turn: 1,
            }],
        }
    }

    fn record(match_id: &str, participants: u16, marker: &str) -> MatchRecord {
        let participants: Vec<Participant> = (1..=participants)
            .map(|n| {
                let team_id = if n % 2 == 0 { 200 } else { 100 };
                participant(&format!("puuid-{n}"), n, team_id, marker)
            })
            .collect();
        MatchRecord {
            match_data: Match {
                match_id: match_id.into(),
                region: Region::Euw,
                queue_id: 420,
                game_creation: 1_700_000_000_000,
                game_duration: 1_841,
                game_version: Some(format!("14.3-{marker}")),
                participant_count: participants.len() as u32,
                fetched_at: 1_700_000_100,
            },
            teams: vec![team(100, marker), team(200, marker)],
            participants,
            timeline: Some(Timeline {
                frame_interval: Some(60_000),
                frames: serde_json::json!([{ "timestamp": 0, "marker": marker }]),
            }),
        }
    }

    #[tokio::test]
    async fn upsert_match_is_idempotent() {
        let db = database().await;
        let rec = record("EUW1_1", 10, "v1");

        db.upsert_match(&rec).await.unwrap();
        db.upsert_match(&rec).await.unwrap();

        let counts = db.counts().await.unwrap();
        assert_eq!(counts.matches, 1);
        assert_eq!(counts.teams, 2);
        assert_eq!(counts.participants, 10);
        assert_eq!(counts.timelines, 1);
        assert!(db.has_complete_match("EUW1_1").await.unwrap());
    }

    #[tokio::test]
    async fn forced_reupsert_replaces_dependents_entirely() {
        let db = database().await;
        db.upsert_match(&record("EUW1_1", 10, "v1")).await.unwrap();
        db.upsert_match(&record("EUW1_1", 10, "v2")).await.unwrap();

        let bundle = db.match_bundle("EUW1_1").await.unwrap().unwrap();
        assert_eq!(bundle.match_data.game_version.as_deref(), Some("14.3-v2"));
        assert_eq!(bundle.participants.len(), 10);
        // Every dependent row carries the new marker; nothing of the prior
        // version survived.
        assert!(bundle
            .participants
            .iter()
            .all(|p| p.champion_name == "Champ-v2"));
        assert!(bundle.teams.iter().all(|t| t.bans[0].champion_id == 412));
        assert_eq!(
            bundle.timeline.unwrap().frames[0]["marker"],
            serde_json::json!("v2")
        );

        let counts = db.counts().await.unwrap();
        assert_eq!(counts.teams, 2);
        assert_eq!(counts.participants, 10);
        assert_eq!(counts.timelines, 1);
    }

    #[tokio::test]
    async fn failed_upsert_leaves_no_partial_rows() {
        let db = database().await;
        let mut rec = record("EUW1_2", 4, "v1");
        // Duplicate ordinal violates the participant primary key midway
        // through the write.
        rec.participants[3].participant_id = 1;

        let res = db.upsert_match(&rec).await;
        assert!(res.is_err());

        let counts = db.counts().await.unwrap();
        assert_eq!(counts.matches, 0);
        assert_eq!(counts.teams, 0);
        assert_eq!(counts.participants, 0);
        assert_eq!(counts.timelines, 0);
        assert!(!db.has_complete_match("EUW1_2").await.unwrap());
    }

    #[tokio::test]
    async fn partial_participant_set_counts_as_incomplete() {
        let db = database().await;
        let mut rec = record("EUW1_3", 10, "v1");
        rec.participants.truncate(1);
        rec.timeline = None;

        db.upsert_match(&rec).await.unwrap();

        assert!(!db.has_complete_match("EUW1_3").await.unwrap());
        let complete = db
            .complete_match_ids(&["EUW1_3".to_string()])
            .await
            .unwrap();
        assert!(complete.is_empty());
    }

    #[tokio::test]
    async fn complete_match_ids_filters_batch() {
        let db = database().await;
        db.upsert_match(&record("EUW1_10", 10, "v1")).await.unwrap();
        db.upsert_match(&record("EUW1_11", 10, "v1")).await.unwrap();

        let ids: Vec<String> = vec![
            "EUW1_12".into(), // never stored
            "EUW1_10".into(),
            "EUW1_11".into(),
        ];
        let complete = db.complete_match_ids(&ids).await.unwrap();

        assert_eq!(complete.len(), 2);
        assert!(complete.contains("EUW1_10"));
        assert!(complete.contains("EUW1_11"));
    }

    #[tokio::test]
    async fn player_upsert_keeps_one_row_per_puuid() {
        let db = database().await;
        let mut player = Player {
            puuid: "puuid-a".into(),
            game_name: "Chalop".into(),
            tag_line: "3012".into(),
            region: Region::Euw,
            rank_tier: None,
            rank_division: None,
            league_points: None,
        };

        db.upsert_player(&player).await.unwrap();
        player.rank_tier = Some("EMERALD".into());
        player.rank_division = Some("II".into());
        player.league_points = Some(43);
        db.upsert_player(&player).await.unwrap();

        let players = db.list_players().await.unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].rank_tier.as_deref(), Some("EMERALD"));
        assert_eq!(players[0].league_points, Some(43));
    }

    #[tokio::test]
    async fn match_write_upgrades_placeholder_players_only() {
        let db = database().await;
        let player = Player {
            puuid: "puuid-1".into(),
            game_name: "Known".into(),
            tag_line: "EUW".into(),
            region: Region::Euw,
            rank_tier: Some("GOLD".into()),
            rank_division: Some("I".into()),
            league_points: Some(99),
        };
        db.upsert_player(&player).await.unwrap();

        db.upsert_match(&record("EUW1_5", 10, "v1")).await.unwrap();

        // The tracked player's row is untouched by the minimal inserts, the
        // other nine participants got placeholder rows.
        let stored = db.get_player("puuid-1").await.unwrap().unwrap();
        assert_eq!(stored.game_name, "Known");
        assert_eq!(stored.rank_tier.as_deref(), Some("GOLD"));
        assert_eq!(db.counts().await.unwrap().players, 10);
    }

    #[tokio::test]
    async fn reset_empties_every_table() {
        let db = database().await;
        db.upsert_match(&record("EUW1_1", 10, "v1")).await.unwrap();

        db.reset().await.unwrap();

        assert_eq!(db.counts().await.unwrap(), TableCounts::default());
    }
}
