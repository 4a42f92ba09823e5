//! Shared domain types for matchvault components.
//!
//! Everything the fetch pipeline and the storage layer agree on lives here:
//! regions, queue kinds, player/match/team/participant shapes and the trait
//! seams between the API client, the planner and the store.

use std::fmt;
use std::str::FromStr;

pub mod errors;
pub mod lol_match;
pub mod traits;

/// Platform a player belongs to. Carries both routing hosts used by the
/// Riot API: the platform host (league-v4 style endpoints) and the regional
/// host (account-v1 and match-v5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Na,
    Br,
    Lan,
    Las,
    Oce,
    Euw,
    Eune,
    Tr,
    Ru,
    Jp,
    Kr,
    Ph,
    Sg,
    Th,
    Tw,
    Vn,
}

impl Region {
    /// Platform routing value as the API spells it, e.g. `na1`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Na => "na1",
            Region::Br => "br1",
            Region::Lan => "la1",
            Region::Las => "la2",
            Region::Oce => "oc1",
            Region::Euw => "euw1",
            Region::Eune => "eun1",
            Region::Tr => "tr1",
            Region::Ru => "ru",
            Region::Jp => "jp1",
            Region::Kr => "kr",
            Region::Ph => "ph2",
            Region::Sg => "sg2",
            Region::Th => "th2",
            Region::Tw => "tw2",
            Region::Vn => "vn2",
        }
    }

    /// Host serving platform-scoped endpoints (league-v4).
    pub fn platform_host(&self) -> String {
        format!("{}.api.riotgames.com", self.as_str())
    }

    /// Host serving regionally-routed endpoints (account-v1, match-v5).
    pub fn regional_host(&self) -> String {
        let route = match self {
            Region::Na | Region::Br | Region::Lan | Region::Las | Region::Oce => "americas",
            Region::Euw | Region::Eune | Region::Tr | Region::Ru => "europe",
            Region::Jp | Region::Kr => "asia",
            Region::Ph | Region::Sg | Region::Th | Region::Tw | Region::Vn => "sea",
        };
        format!("{route}.api.riotgames.com")
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = String;

    /// Accepts both platform ids (`na1`) and the short aliases users type
    /// (`na`, `euw`, `oce`, ...).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "na" | "na1" => Ok(Region::Na),
            "br" | "br1" => Ok(Region::Br),
            "lan" | "la1" => Ok(Region::Lan),
            "las" | "la2" => Ok(Region::Las),
            "oce" | "oc1" => Ok(Region::Oce),
            "euw" | "euw1" => Ok(Region::Euw),
            "eune" | "eun1" => Ok(Region::Eune),
            "tr" | "tr1" => Ok(Region::Tr),
            "ru" => Ok(Region::Ru),
            "jp" | "jp1" => Ok(Region::Jp),
            "kr" => Ok(Region::Kr),
            "ph" | "ph2" => Ok(Region::Ph),
            "sg" | "sg2" => Ok(Region::Sg),
            "th" | "th2" => Ok(Region::Th),
            "tw" | "tw2" => Ok(Region::Tw),
            "vn" | "vn2" => Ok(Region::Vn),
            other => Err(format!("unknown region: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueType {
    /// Ranked Solo/Duo
    SoloDuo,
    /// Ranked Flex
    Flex,
    /// 5v5 Normal Draft Pick
    NormalDraft,
    /// 5v5 Normal Blind Pick
    NormalBlind,
    /// Howling Abyss ARAM
    Aram,
    Unhandled,
}

impl From<u16> for QueueType {
    fn from(value: u16) -> Self {
        match value {
            400 => Self::NormalDraft,
            420 => Self::SoloDuo,
            430 => Self::NormalBlind,
            440 => Self::Flex,
            450 => Self::Aram,
            _ => Self::Unhandled,
        }
    }
}

impl QueueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueType::SoloDuo => "RANKED_SOLO_5x5",
            QueueType::Flex => "RANKED_FLEX_SR",
            QueueType::NormalDraft => "NORMAL_DRAFT_PICK",
            QueueType::NormalBlind => "NORMAL_BLIND_PICK",
            QueueType::Aram => "ARAM",
            QueueType::Unhandled => "UNHANDLED",
        }
    }
}

/// Identity returned by the account endpoint.
#[derive(Debug, Clone)]
pub struct Account {
    pub puuid: String,
    pub game_name: String,
    pub tag_line: String,
}

/// One ranked ladder entry for a player.
#[derive(Debug, Clone)]
pub struct LeagueEntry {
    pub queue_type: String,
    pub tier: String,
    pub rank: String,
    pub league_points: u16,
    pub wins: u16,
    pub losses: u16,
}

impl LeagueEntry {
    pub fn is_ranked_solo_duo(&self) -> bool {
        self.queue_type == "RANKED_SOLO_5x5"
    }
}

/// A player row as stored locally: resolved identity plus the rank metadata
/// last seen for them.
#[derive(Debug, Clone)]
pub struct Player {
    pub puuid: String,
    pub game_name: String,
    pub tag_line: String,
    pub region: Region,
    pub rank_tier: Option<String>,
    pub rank_division: Option<String>,
    pub league_points: Option<u16>,
}

impl Player {
    /// Combine a resolved account with its solo-queue ladder entry, if any.
    pub fn from_account(account: Account, region: Region, leagues: &[LeagueEntry]) -> Self {
        let solo = leagues.iter().find(|l| l.is_ranked_solo_duo());
        Self {
            puuid: account.puuid,
            game_name: account.game_name,
            tag_line: account.tag_line,
            region,
            rank_tier: solo.map(|l| l.tier.clone()),
            rank_division: solo.map(|l| l.rank.clone()),
            league_points: solo.map(|l| l.league_points),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_type_and_region_conversions() {
        let q = QueueType::from(420u16);
        assert!(matches!(q, QueueType::SoloDuo));
        assert_eq!(q.as_str(), "RANKED_SOLO_5x5");
        assert!(matches!(QueueType::from(999u16), QueueType::Unhandled));

        assert_eq!(Region::Euw.platform_host(), "euw1.api.riotgames.com");
        assert_eq!(Region::Na.regional_host(), "americas.api.riotgames.com");
        assert_eq!(Region::Kr.regional_host(), "asia.api.riotgames.com");
        assert_eq!(Region::Vn.regional_host(), "sea.api.riotgames.com");
        assert_eq!("euw".parse::<Region>().unwrap(), Region::Euw);
        assert_eq!("EUW1".parse::<Region>().unwrap(), Region::Euw);
        assert!("narnia".parse::<Region>().is_err());
    }

    #[test]
    fn player_picks_solo_queue_rank() {
        let account = Account {
            puuid: "p".into(),
            game_name: "Name".into(),
            tag_line: "TAG".into(),
        };
        let leagues = vec![
            LeagueEntry {
                queue_type: "RANKED_FLEX_SR".into(),
                tier: "GOLD".into(),
                rank: "II".into(),
                league_points: 10,
                wins: 1,
                losses: 1,
            },
            LeagueEntry {
                queue_type: "RANKED_SOLO_5x5".into(),
                tier: "PLATINUM".into(),
                rank: "IV".into(),
                league_points: 55,
                wins: 30,
                losses: 28,
            },
        ];

        let player = Player::from_account(account, Region::Euw, &leagues);

        assert_eq!(player.rank_tier.as_deref(), Some("PLATINUM"));
        assert_eq!(player.rank_division.as_deref(), Some("IV"));
        assert_eq!(player.league_points, Some(55));
    }
}
