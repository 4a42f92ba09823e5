use async_trait::async_trait;
use serde::Deserialize;

use matchvault_shared::errors::ApiResult;
use matchvault_shared::traits::api::LeagueApi;
use matchvault_shared::{LeagueEntry, Region};

use crate::client::{LolApiClient, decode};

/// Representation of a league entry response.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LeagueEntryDto {
    pub queue_type: String,
    #[serde(default)]
    pub tier: String,
    #[serde(default)]
    pub rank: String,
    pub league_points: u16,
    pub wins: u16,
    pub losses: u16,
}

impl From<LeagueEntryDto> for LeagueEntry {
    fn from(value: LeagueEntryDto) -> Self {
        Self {
            queue_type: value.queue_type,
            tier: value.tier,
            rank: value.rank,
            league_points: value.league_points,
            wins: value.wins,
            losses: value.losses,
        }
    }
}

#[async_trait]
impl LeagueApi for LolApiClient {
    async fn get_leagues(&self, puuid: &str, region: Region) -> ApiResult<Vec<LeagueEntry>> {
        tracing::trace!("get_leagues {} in {}", puuid, region);

        let path = format!(
            "{}/lol/league/v4/entries/by-puuid/{}",
            self.platform_base(region),
            puuid
        );

        let body = self.request(path).await?;
        let dtos: Vec<LeagueEntryDto> = decode(&body)?;
        Ok(dtos.into_iter().map(Into::into).collect())
    }
}
