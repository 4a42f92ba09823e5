use std::time::Duration;

use httpmock::Method::GET;
use httpmock::MockServer;
use serde_json::json;

use matchvault_riot_api::client::LolApiClient;
use matchvault_shared::Region;
use matchvault_shared::errors::ApiError;
use matchvault_shared::traits::api::{AccountApi, MatchApi, TimelineApi};

fn client_for(server: &MockServer) -> LolApiClient {
    LolApiClient::new("TEST_KEY".to_string()).with_base_url(server.base_url())
}

#[tokio::test]
async fn account_lookup_hits_expected_route() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/riot/account/v1/accounts/by-riot-id/Chalop/3012")
                .header("x-riot-token", "TEST_KEY");
            then.status(200).json_body(json!({
                "puuid": "puuid-a",
                "gameName": "Chalop",
                "tagLine": "3012"
            }));
        })
        .await;

    let client = client_for(&server);
    let account = client
        .get_account_by_riot_id("Chalop", "3012", Region::Euw)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(account.puuid, "puuid-a");
    assert_eq!(account.game_name, "Chalop");
    assert_eq!(account.tag_line, "3012");
}

#[tokio::test]
async fn match_id_listing_passes_count_and_queue_filter() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/lol/match/v5/matches/by-puuid/puuid-a/ids")
                .query_param("start", "0")
                .query_param("count", "30")
                .query_param("queue", "420");
            then.status(200)
                .json_body(json!(["EUW1_3", "EUW1_2", "EUW1_1"]));
        })
        .await;

    let client = client_for(&server);
    let ids = client
        .get_match_ids("puuid-a", Region::Euw, 30, Some(420))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(ids, vec!["EUW1_3", "EUW1_2", "EUW1_1"]);
}

#[tokio::test]
async fn not_found_is_terminal_without_retry() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(404);
        })
        .await;

    let client = client_for(&server);
    let res = client
        .get_account_by_riot_id("Ghost", "0000", Region::Na)
        .await;

    assert!(matches!(res, Err(ApiError::NotFound)));
    assert_eq!(mock.hits_async().await, 1);
}

#[tokio::test]
async fn unexpected_client_error_is_terminal() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(403);
        })
        .await;

    let client = client_for(&server);
    let res = client.get_match("EUW1_1", Region::Euw).await;

    assert!(matches!(res, Err(ApiError::UnexpectedStatus(403))));
    assert_eq!(mock.hits_async().await, 1);
}

#[tokio::test]
async fn rate_limited_call_retries_after_server_hint() {
    let server = MockServer::start_async().await;
    let mut limited = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/lol/match/v5/matches/by-puuid/puuid-a/ids");
            then.status(429).header("retry-after", "2");
        })
        .await;

    let client = client_for(&server);
    let started = std::time::Instant::now();
    let call = tokio::spawn(async move {
        client.get_match_ids("puuid-a", Region::Euw, 10, None).await
    });

    // Once the 429 has been served the client sleeps for the server's
    // suggested two seconds; swap in a healthy response for the retry.
    while limited.hits_async().await < 1 {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    limited.delete_async().await;
    let ok = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/lol/match/v5/matches/by-puuid/puuid-a/ids");
            then.status(200).json_body(json!(["EUW1_9"]));
        })
        .await;

    let ids = call.await.unwrap().unwrap();

    assert_eq!(ids, vec!["EUW1_9"]);
    assert_eq!(ok.hits_async().await, 1);
    assert!(started.elapsed() >= Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn persistent_rate_limiting_exhausts_the_attempt_budget() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(429).header("retry-after", "1");
        })
        .await;

    let client = client_for(&server);
    let res = client.get_match("EUW1_1", Region::Euw).await;

    assert!(matches!(res, Err(ApiError::RateLimited { attempts: 5 })));
    assert_eq!(mock.hits_async().await, 5);
}

#[tokio::test(start_paused = true)]
async fn server_errors_retry_with_a_smaller_budget() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(503);
        })
        .await;

    let client = client_for(&server);
    let res = client.get_match("EUW1_1", Region::Euw).await;

    match res {
        Err(ApiError::Transient { status, .. }) => assert_eq!(status, Some(503)),
        other => panic!("expected transient failure, got {other:?}"),
    }
    assert_eq!(mock.hits_async().await, 3);
}

#[tokio::test]
async fn malformed_payload_is_a_decode_failure() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(200).body("{ definitely not a match }");
        })
        .await;

    let client = client_for(&server);
    let res = client.get_match("EUW1_1", Region::Euw).await;

    assert!(matches!(res, Err(ApiError::Decode(_))));
    assert_eq!(mock.hits_async().await, 1);
}

#[tokio::test]
async fn timeline_decodes_frames() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/lol/match/v5/matches/EUW1_1/timeline");
            then.status(200).json_body(json!({
                "info": {
                    "frameInterval": 60000,
                    "frames": [ { "timestamp": 0, "events": [] } ]
                }
            }));
        })
        .await;

    let client = client_for(&server);
    let timeline = client.get_timeline("EUW1_1", Region::Euw).await.unwrap();

    assert_eq!(timeline.frame_interval, Some(60000));
    assert_eq!(timeline.frame_count(), 1);
}
