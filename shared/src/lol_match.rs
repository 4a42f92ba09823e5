//! Domain shapes for one fetched match and its dependent rows.

use serde::{Deserialize, Serialize};

use crate::Region;

/// Game-level facts for one completed match. Immutable once fetched, but a
/// forced refresh overwrites the row wholesale.
#[derive(Debug, Clone)]
pub struct Match {
    pub match_id: String,
    pub region: Region,
    pub queue_id: u16,
    /// Game creation, milliseconds since the epoch.
    pub game_creation: i64,
    /// Game duration in seconds.
    pub game_duration: u64,
    pub game_version: Option<String>,
    /// Participant count the remote detail reported. The stored participant
    /// set is only complete when it reaches this number.
    pub participant_count: u32,
    /// When the raw detail was fetched, seconds since the epoch.
    pub fetched_at: i64,
}

impl Match {
    pub fn queue_type(&self) -> crate::QueueType {
        self.queue_id.into()
    }

    pub fn formatted_duration(&self) -> String {
        let minutes = self.game_duration / 60;
        let seconds = self.game_duration % 60;
        format!("{minutes:02}:{seconds:02}")
    }
}

/// Objective tally for one team, `first` flag plus total kills.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ObjectiveStat {
    pub first: bool,
    pub kills: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamObjectives {
    pub champion: ObjectiveStat,
    pub tower: ObjectiveStat,
    pub inhibitor: ObjectiveStat,
    pub baron: ObjectiveStat,
    pub dragon: ObjectiveStat,
    pub rift_herald: ObjectiveStat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ban {
    pub champion_id: i32,
    pub pick_turn: u8,
}

/// One side of a match. Owned by its match row and replaced with it.
#[derive(Debug, Clone)]
pub struct Team {
    /// 100 for blue side, 200 for red side.
    pub team_id: u16,
    pub win: bool,
    pub objectives: TeamObjectives,
    pub bans: Vec<Ban>,
}

/// One player's performance row within a match.
#[derive(Debug, Clone)]
pub struct Participant {
    /// Ordinal within the match, 1-10.
    pub participant_id: u16,
    pub team_id: u16,
    pub puuid: String,
    pub riot_id_game_name: String,
    pub riot_id_tagline: String,
    pub champion_id: u32,
    pub champion_name: String,
    pub champ_level: u16,
    pub kills: u16,
    pub deaths: u16,
    pub assists: u16,
    pub gold_earned: u32,
    pub total_minions_killed: u32,
    pub neutral_minions_killed: u32,
    pub damage_to_champions: u32,
    pub vision_score: u32,
    pub team_position: String,
    pub win: bool,
}

impl Participant {
    pub fn kda(&self) -> f64 {
        if self.deaths == 0 {
            f64::from(self.kills + self.assists)
        } else {
            f64::from(self.kills + self.assists) / f64::from(self.deaths)
        }
    }

    pub fn creep_score(&self) -> u32 {
        self.total_minions_killed + self.neutral_minions_killed
    }

    pub fn normalized_role(&self) -> &'static str {
        match self.team_position.as_str() {
            "TOP" => "Top",
            "JUNGLE" => "Jungle",
            "MIDDLE" => "Mid",
            "BOTTOM" => "AD Carry",
            "UTILITY" => "Support",
            _ => "",
        }
    }
}

/// Frame-by-frame event sequence for a match. Fetched only on request; the
/// raw frames are kept as JSON the way the API hands them out.
#[derive(Debug, Clone)]
pub struct Timeline {
    /// Milliseconds between frames, when the API reports it.
    pub frame_interval: Option<u64>,
    pub frames: serde_json::Value,
}

impl Timeline {
    pub fn frame_count(&self) -> usize {
        self.frames.as_array().map_or(0, Vec::len)
    }
}

/// A match and every dependent row belonging to it, persisted as one atomic
/// unit of work.
#[derive(Debug, Clone)]
pub struct MatchRecord {
    pub match_data: Match,
    pub teams: Vec<Team>,
    pub participants: Vec<Participant>,
    pub timeline: Option<Timeline>,
}

impl MatchRecord {
    /// Whether the participant set covers everyone the detail reported.
    pub fn is_full(&self) -> bool {
        self.participants.len() as u32 == self.match_data.participant_count
    }

    pub fn participant(&self, puuid: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.puuid == puuid)
    }

    /// Drop every participant row except the given player's. Match and team
    /// facts are unaffected; the record stops being full.
    pub fn retain_participant(&mut self, puuid: &str) {
        self.participants.retain(|p| p.puuid == puuid);
    }
}
