//! Schema bootstrap for the match archive.
//!
//! Dependent tables reference `matches` with ON DELETE CASCADE; participant
//! rows additionally reference their team and, when known, a player row.

use rusqlite::Connection;

pub fn init(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS players (
            puuid TEXT PRIMARY KEY,
            region TEXT NOT NULL,
            game_name TEXT NOT NULL,
            tag_line TEXT NOT NULL,
            rank_tier TEXT,
            rank_division TEXT,
            league_points INTEGER
        );

        CREATE TABLE IF NOT EXISTS matches (
            match_id TEXT PRIMARY KEY,
            region TEXT NOT NULL,
            queue_id INTEGER NOT NULL,
            game_creation INTEGER NOT NULL,
            game_duration INTEGER NOT NULL,
            game_version TEXT,
            participant_count INTEGER NOT NULL,
            fetched_at INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS teams (
            match_id TEXT NOT NULL REFERENCES matches(match_id) ON DELETE CASCADE,
            team_id INTEGER NOT NULL,
            win INTEGER NOT NULL,
            first_blood INTEGER NOT NULL,
            first_tower INTEGER NOT NULL,
            first_inhibitor INTEGER NOT NULL,
            first_baron INTEGER NOT NULL,
            first_dragon INTEGER NOT NULL,
            first_rift_herald INTEGER NOT NULL,
            champion_kills INTEGER NOT NULL,
            tower_kills INTEGER NOT NULL,
            inhibitor_kills INTEGER NOT NULL,
            baron_kills INTEGER NOT NULL,
            dragon_kills INTEGER NOT NULL,
            rift_herald_kills INTEGER NOT NULL,
            bans TEXT NOT NULL,
            PRIMARY KEY (match_id, team_id)
        );

        CREATE TABLE IF NOT EXISTS participants (
            match_id TEXT NOT NULL REFERENCES matches(match_id) ON DELETE CASCADE,
            participant_id INTEGER NOT NULL,
            team_id INTEGER NOT NULL,
            puuid TEXT REFERENCES players(puuid),
            riot_id_game_name TEXT NOT NULL,
            riot_id_tagline TEXT NOT NULL,
            champion_id INTEGER NOT NULL,
            champion_name TEXT NOT NULL,
            champ_level INTEGER NOT NULL,
            kills INTEGER NOT NULL,
            deaths INTEGER NOT NULL,
            assists INTEGER NOT NULL,
            gold_earned INTEGER NOT NULL,
            total_minions_killed INTEGER NOT NULL,
            neutral_minions_killed INTEGER NOT NULL,
            damage_to_champions INTEGER NOT NULL,
            vision_score INTEGER NOT NULL,
            team_position TEXT NOT NULL,
            win INTEGER NOT NULL,
            PRIMARY KEY (match_id, participant_id),
            FOREIGN KEY (match_id, team_id) REFERENCES teams(match_id, team_id)
        );

        CREATE TABLE IF NOT EXISTS timelines (
            match_id TEXT PRIMARY KEY REFERENCES matches(match_id) ON DELETE CASCADE,
            frame_interval INTEGER,
            frames TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS ix_matches_queue_creation
            ON matches(queue_id, game_creation);
        CREATE INDEX IF NOT EXISTS ix_participants_puuid
            ON participants(puuid);",
    )
}

pub fn drop_all(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "DROP TABLE IF EXISTS timelines;
        DROP TABLE IF EXISTS participants;
        DROP TABLE IF EXISTS teams;
        DROP TABLE IF EXISTS matches;
        DROP TABLE IF EXISTS players;",
    )
}
