use async_trait::async_trait;
use serde::Deserialize;
use urlencoding::encode;

use matchvault_shared::errors::ApiResult;
use matchvault_shared::traits::api::AccountApi;
use matchvault_shared::{Account, Region};

use crate::client::{LolApiClient, decode};

/// Representation of the account data response.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub puuid: String,
    pub game_name: Option<String>,
    pub tag_line: Option<String>,
}

#[async_trait]
impl AccountApi for LolApiClient {
    async fn get_account_by_riot_id(
        &self,
        game_name: &str,
        tag_line: &str,
        region: Region,
    ) -> ApiResult<Account> {
        tracing::trace!("get_account_by_riot_id {}#{}", game_name, tag_line);
        let path = format!(
            "{}/riot/account/v1/accounts/by-riot-id/{}/{}",
            self.regional_base(region),
            encode(game_name),
            encode(tag_line)
        );

        let body = self.request(path).await?;
        let dto: AccountDto = decode(&body)?;
        Ok(Account {
            puuid: dto.puuid,
            game_name: dto.game_name.unwrap_or_else(|| game_name.to_string()),
            tag_line: dto.tag_line.unwrap_or_else(|| tag_line.to_string()),
        })
    }
}
