use std::env;

use dotenv::dotenv;

use matchvault_riot_api::client::LolApiClient;
use matchvault_shared::Region;
use matchvault_shared::traits::api::{AccountApi, MatchApi};

fn api_key() -> String {
    dotenv().ok();
    env::var("RIOT_API_KEY").expect("RIOT_API_KEY not set")
}

#[tokio::test]
#[ignore = "API Key required"]
async fn resolve_and_fetch_recent_matches_works() {
    let client = LolApiClient::new(api_key());

    let account = client
        .get_account_by_riot_id("Chalop", "3012", Region::Euw)
        .await
        .unwrap();
    assert!(!account.puuid.is_empty());

    let ids = client
        .get_match_ids(&account.puuid, Region::Euw, 5, None)
        .await
        .unwrap();

    if let Some(id) = ids.first() {
        let record = client.get_match(id, Region::Euw).await.unwrap();
        assert_eq!(record.participants.len() as u32, record.match_data.participant_count);
    }
}
