use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::Deserialize;

use matchvault_shared::Region;
use matchvault_shared::errors::ApiResult;
use matchvault_shared::lol_match::{
    Ban, Match, MatchRecord, ObjectiveStat, Participant, Team, TeamObjectives,
};
use matchvault_shared::traits::api::MatchApi;

use crate::client::{LolApiClient, decode};

/// Representation of the match data response.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MatchDto {
    pub metadata: MetadataDto,
    pub info: InfoDto,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MetadataDto {
    pub match_id: String,
}

/// Representation of the match info data response.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InfoDto {
    pub game_creation: i64,
    pub game_duration: u64,
    pub game_version: Option<String>,
    pub queue_id: u16,
    pub participants: Vec<ParticipantDto>,
    #[serde(default)]
    pub teams: Vec<TeamDto>,
}

/// Representation of the participant data response.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantDto {
    pub puuid: String,
    pub participant_id: Option<u16>,
    pub team_id: u16,
    #[serde(default)]
    pub riot_id_game_name: String,
    #[serde(default)]
    pub riot_id_tagline: String,
    pub champion_id: u32,
    pub champion_name: String,
    #[serde(default)]
    pub champ_level: u16,
    pub kills: u16,
    pub deaths: u16,
    pub assists: u16,
    #[serde(default)]
    pub gold_earned: u32,
    #[serde(default)]
    pub total_minions_killed: u32,
    #[serde(default)]
    pub neutral_minions_killed: u32,
    #[serde(default)]
    pub total_damage_dealt_to_champions: u32,
    #[serde(default)]
    pub vision_score: u32,
    #[serde(default)]
    pub team_position: String,
    pub win: bool,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TeamDto {
    pub team_id: u16,
    pub win: bool,
    #[serde(default)]
    pub objectives: ObjectivesDto,
    #[serde(default)]
    pub bans: Vec<BanDto>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ObjectivesDto {
    #[serde(default)]
    pub champion: ObjectiveDto,
    #[serde(default)]
    pub tower: ObjectiveDto,
    #[serde(default)]
    pub inhibitor: ObjectiveDto,
    #[serde(default)]
    pub baron: ObjectiveDto,
    #[serde(default)]
    pub dragon: ObjectiveDto,
    #[serde(default)]
    pub rift_herald: ObjectiveDto,
}

#[derive(Deserialize, Debug, Clone, Copy, Default)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveDto {
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub kills: u32,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BanDto {
    pub champion_id: i32,
    pub pick_turn: u8,
}

impl MatchDto {
    /// Turn the raw detail into the domain record persisted by the store.
    pub fn into_record(self, region: Region, fetched_at: i64) -> MatchRecord {
        let MatchDto { metadata, info } = self;
        let participant_count = info.participants.len() as u32;

        let participants = info
            .participants
            .into_iter()
            .enumerate()
            .map(|(idx, p)| p.into_participant(idx as u16 + 1))
            .collect();
        let teams = info.teams.into_iter().map(Team::from).collect();

        MatchRecord {
            match_data: Match {
                match_id: metadata.match_id,
                region,
                queue_id: info.queue_id,
                game_creation: info.game_creation,
                game_duration: info.game_duration,
                game_version: info.game_version,
                participant_count,
                fetched_at,
            },
            teams,
            participants,
            timeline: None,
        }
    }
}

impl ParticipantDto {
    /// `fallback_ordinal` covers payloads missing `participantId`; ordinals
    /// then follow the listing order, 1-based.
    fn into_participant(self, fallback_ordinal: u16) -> Participant {
        Participant {
            participant_id: self.participant_id.unwrap_or(fallback_ordinal),
            team_id: self.team_id,
            puuid: self.puuid,
            riot_id_game_name: self.riot_id_game_name,
            riot_id_tagline: self.riot_id_tagline,
            champion_id: self.champion_id,
            champion_name: self.champion_name,
            champ_level: self.champ_level,
            kills: self.kills,
            deaths: self.deaths,
            assists: self.assists,
            gold_earned: self.gold_earned,
            total_minions_killed: self.total_minions_killed,
            neutral_minions_killed: self.neutral_minions_killed,
            damage_to_champions: self.total_damage_dealt_to_champions,
            vision_score: self.vision_score,
            team_position: self.team_position,
            win: self.win,
        }
    }
}

impl From<TeamDto> for Team {
    fn from(value: TeamDto) -> Self {
        Self {
            team_id: value.team_id,
            win: value.win,
            objectives: value.objectives.into(),
            bans: value
                .bans
                .into_iter()
                .map(|b| Ban {
                    champion_id: b.champion_id,
                    pick_turn: b.pick_turn,
                })
                .collect(),
        }
    }
}

impl From<ObjectivesDto> for TeamObjectives {
    fn from(value: ObjectivesDto) -> Self {
        let stat = |o: ObjectiveDto| ObjectiveStat {
            first: o.first,
            kills: o.kills,
        };
        Self {
            champion: stat(value.champion),
            tower: stat(value.tower),
            inhibitor: stat(value.inhibitor),
            baron: stat(value.baron),
            dragon: stat(value.dragon),
            rift_herald: stat(value.rift_herald),
        }
    }
}

#[async_trait]
impl MatchApi for LolApiClient {
    async fn get_match_ids(
        &self,
        puuid: &str,
        region: Region,
        count: u8,
        queue: Option<u16>,
    ) -> ApiResult<Vec<String>> {
        tracing::trace!("get_match_ids for {} in {}", puuid, region);

        let count = count.clamp(1, 100);
        let mut path = format!(
            "{}/lol/match/v5/matches/by-puuid/{}/ids?start=0&count={}",
            self.regional_base(region),
            puuid,
            count
        );
        if let Some(queue) = queue {
            path.push_str(&format!("&queue={queue}"));
        }

        let body = self.request(path).await?;
        decode(&body)
    }

    async fn get_match(&self, match_id: &str, region: Region) -> ApiResult<MatchRecord> {
        tracing::trace!("get_match {} in {}", match_id, region);

        let path = format!(
            "{}/lol/match/v5/matches/{}",
            self.regional_base(region),
            match_id
        );

        let body = self.request(path).await?;
        let dto: MatchDto = decode(&body)?;
        Ok(dto.into_record(region, unix_now()))
    }
}

pub(crate) fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_secs() as i64
}
