//! Trait seams between the pipeline's components.
//!
//! The API traits are implemented by the HTTP client and mocked in tests;
//! the store traits are implemented by the SQLite layer.

use std::collections::HashSet;
use std::error::Error as ErrorT;

use async_trait::async_trait;

use crate::errors::ApiResult;
use crate::lol_match::{Match, MatchRecord, Timeline};
use crate::{Account, LeagueEntry, Player, Region};

pub mod api {
    use super::*;

    /// Riot Account-V1: resolve a riot id into an opaque player id.
    #[async_trait]
    pub trait AccountApi: Send + Sync {
        async fn get_account_by_riot_id(
            &self,
            game_name: &str,
            tag_line: &str,
            region: Region,
        ) -> ApiResult<Account>;
    }

    /// Riot Match-V5: list recent match ids and fetch match details.
    #[async_trait]
    pub trait MatchApi: Send + Sync {
        /// Most-recent-first match ids for a player, capped at `count`
        /// (the API maximum is 100), optionally filtered to one queue.
        async fn get_match_ids(
            &self,
            puuid: &str,
            region: Region,
            count: u8,
            queue: Option<u16>,
        ) -> ApiResult<Vec<String>>;

        async fn get_match(&self, match_id: &str, region: Region) -> ApiResult<MatchRecord>;
    }

    /// Riot Match-V5 timeline endpoint.
    #[async_trait]
    pub trait TimelineApi: Send + Sync {
        async fn get_timeline(&self, match_id: &str, region: Region) -> ApiResult<Timeline>;
    }

    /// Riot League-V4: ranked ladder entries for a player.
    #[async_trait]
    pub trait LeagueApi: Send + Sync {
        async fn get_leagues(&self, puuid: &str, region: Region) -> ApiResult<Vec<LeagueEntry>>;
    }

    /// Everything the sync pipeline needs from the remote side.
    pub trait LolApiFull: AccountApi + MatchApi + TimelineApi + LeagueApi {}
}

pub type StoreError = Box<dyn ErrorT + Send + Sync>;

#[async_trait]
pub trait PlayerStore: Send + Sync {
    /// Insert or update a player by natural key. Independent of match
    /// writes: a player referenced by many matches is stored once.
    async fn upsert_player(&self, player: &Player) -> Result<(), StoreError>;

    async fn get_player(&self, puuid: &str) -> Result<Option<Player>, StoreError>;

    async fn list_players(&self) -> Result<Vec<Player>, StoreError>;
}

#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Persist a match and all its dependent rows atomically. An existing
    /// match id has its dependent rows replaced wholesale in the same
    /// transaction; any failure rolls the whole call back.
    async fn upsert_match(&self, record: &MatchRecord) -> Result<(), StoreError>;

    /// Whether a match row exists with its full participant set stored.
    async fn has_complete_match(&self, match_id: &str) -> Result<bool, StoreError>;

    /// The subset of `ids` that are completely stored, resolved in one
    /// batched query for the planner.
    async fn complete_match_ids(&self, ids: &[String]) -> Result<HashSet<String>, StoreError>;

    async fn list_matches(&self) -> Result<Vec<Match>, StoreError>;

    /// A match with all its dependent rows, for export and inspection.
    async fn match_bundle(&self, match_id: &str) -> Result<Option<MatchRecord>, StoreError>;
}

/// Full storage surface consumed by the sync coordinator.
pub trait StoreFull: PlayerStore + MatchStore {}
