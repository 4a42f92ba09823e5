use async_trait::async_trait;
use serde::Deserialize;

use matchvault_shared::Region;
use matchvault_shared::errors::ApiResult;
use matchvault_shared::lol_match::Timeline;
use matchvault_shared::traits::api::TimelineApi;

use crate::client::{LolApiClient, decode};

/// Representation of the match timeline response. Frames are kept as raw
/// JSON; the store persists them verbatim.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TimelineDto {
    pub info: TimelineInfoDto,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TimelineInfoDto {
    #[serde(default)]
    pub frame_interval: Option<u64>,
    #[serde(default)]
    pub frames: Vec<serde_json::Value>,
}

impl From<TimelineDto> for Timeline {
    fn from(value: TimelineDto) -> Self {
        Self {
            frame_interval: value.info.frame_interval,
            frames: serde_json::Value::Array(value.info.frames),
        }
    }
}

#[async_trait]
impl TimelineApi for LolApiClient {
    async fn get_timeline(&self, match_id: &str, region: Region) -> ApiResult<Timeline> {
        tracing::trace!("get_timeline {} in {}", match_id, region);

        let path = format!(
            "{}/lol/match/v5/matches/{}/timeline",
            self.regional_base(region),
            match_id
        );

        let body = self.request(path).await?;
        let dto: TimelineDto = decode(&body)?;
        Ok(dto.into())
    }
}
