//! Top-level orchestration of one sync call.

use std::sync::Arc;
use std::time::Duration;

use futures::{StreamExt, stream};
use tokio::time::timeout;
use tracing::{info, warn};

use matchvault_shared::traits::StoreFull;
use matchvault_shared::traits::api::LolApiFull;
use matchvault_shared::{Player, Region};

use crate::planner::SyncPlanner;
use crate::{FailedMatch, FailureKind, SyncError, SyncSummary};

const DEFAULT_WORKERS: usize = 4;

/// Parameters of one sync call, as the CLI hands them over.
#[derive(Debug, Clone)]
pub struct SyncRequest {
    pub game_name: String,
    pub tag_line: String,
    pub region: Region,
    /// Number of recent matches to consider, 1 to 100.
    pub count: u8,
    /// Restrict the listing to one queue id (e.g. 420 for Ranked Solo/Duo).
    pub queue: Option<u16>,
    /// Store every participant of each match instead of only the queried
    /// player's row.
    pub all_participants: bool,
    /// Re-fetch matches that are already completely stored.
    pub force: bool,
    /// Also fetch and store each match's timeline.
    pub with_timeline: bool,
}

/// Composes client, planner and store into one sync operation.
///
/// Matches of the work list are processed by a bounded worker pool; every
/// worker shares the one client, so the rate governor stays the single
/// authority over the request budget.
pub struct SyncCoordinator<A, S> {
    api: Arc<A>,
    store: S,
    workers: usize,
    deadline: Option<Duration>,
}

impl<A, S> SyncCoordinator<A, S>
where
    A: LolApiFull + Send + Sync + 'static,
    S: StoreFull + Clone + Send + Sync + 'static,
{
    pub fn new(api: Arc<A>, store: S) -> Self {
        Self {
            api,
            store,
            workers: DEFAULT_WORKERS,
            deadline: None,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Bound the whole sync call; exceeding the deadline cancels remaining
    /// work. In-flight transactions commit or roll back on their own terms.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub async fn sync(&self, request: SyncRequest) -> Result<SyncSummary, SyncError> {
        match self.deadline {
            Some(limit) => timeout(limit, self.run(request))
                .await
                .map_err(|_| SyncError::DeadlineExceeded(limit))?,
            None => self.run(request).await,
        }
    }

    async fn run(&self, request: SyncRequest) -> Result<SyncSummary, SyncError> {
        // No player, no work: identity failures are fatal to the call.
        let account = self
            .api
            .get_account_by_riot_id(&request.game_name, &request.tag_line, request.region)
            .await
            .map_err(|source| SyncError::Identity {
                game_name: request.game_name.clone(),
                tag_line: request.tag_line.clone(),
                source,
            })?;
        info!(
            puuid = %account.puuid,
            "resolved {}#{}", account.game_name, account.tag_line
        );

        // Rank metadata is enrichment; an unranked player or a flaky league
        // endpoint must not sink the sync.
        let leagues = match self.api.get_leagues(&account.puuid, request.region).await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(error = %err, "league lookup failed, storing player without rank");
                Vec::new()
            }
        };
        let player = Player::from_account(account.clone(), request.region, &leagues);
        self.store
            .upsert_player(&player)
            .await
            .map_err(SyncError::Store)?;

        let candidates = self
            .api
            .get_match_ids(
                &account.puuid,
                request.region,
                request.count.clamp(1, 100),
                request.queue,
            )
            .await
            .map_err(SyncError::Listing)?;

        let work = SyncPlanner::new(&self.store)
            .plan(&candidates, request.force)
            .await
            .map_err(SyncError::Store)?;
        let skipped = candidates.len() - work.len();
        info!(
            candidates = candidates.len(),
            work = work.len(),
            skipped,
            "work list planned"
        );

        let region = request.region;
        let all_participants = request.all_participants;
        let with_timeline = request.with_timeline;
        let results: Vec<Result<(), FailedMatch>> = stream::iter(work)
            .map(|match_id| {
                let api = Arc::clone(&self.api);
                let store = self.store.clone();
                let puuid = account.puuid.clone();
                async move {
                    Self::process_match(
                        api,
                        store,
                        match_id,
                        region,
                        &puuid,
                        all_participants,
                        with_timeline,
                    )
                    .await
                }
            })
            .buffer_unordered(self.workers)
            .collect()
            .await;

        let mut summary = SyncSummary {
            skipped,
            ..Default::default()
        };
        for result in results {
            match result {
                Ok(()) => summary.fetched += 1,
                Err(failed) => {
                    warn!(
                        match_id = %failed.match_id,
                        kind = %failed.kind,
                        "match failed: {}", failed.message
                    );
                    summary.failed.push(failed);
                }
            }
        }
        info!(
            fetched = summary.fetched,
            skipped = summary.skipped,
            failed = summary.failed.len(),
            "sync finished"
        );
        Ok(summary)
    }

    /// Fetch and persist one match. Failures are returned, not propagated:
    /// one bad match id never aborts the rest of the work list.
    async fn process_match(
        api: Arc<A>,
        store: S,
        match_id: String,
        region: Region,
        puuid: &str,
        all_participants: bool,
        with_timeline: bool,
    ) -> Result<(), FailedMatch> {
        let mut record = api
            .get_match(&match_id, region)
            .await
            .map_err(|e| FailedMatch::from_api(&match_id, &e))?;

        if !all_participants {
            // The record keeps the reported participant count, so the match
            // stays incomplete for planning until a full fetch stores it.
            record.retain_participant(puuid);
        }

        if with_timeline {
            match api.get_timeline(&match_id, region).await {
                Ok(timeline) => record.timeline = Some(timeline),
                Err(err) => {
                    warn!(%match_id, error = %err, "timeline fetch failed, storing match without it");
                }
            }
        }

        store.upsert_match(&record).await.map_err(|e| FailedMatch {
            match_id: match_id.clone(),
            kind: FailureKind::Persistence,
            message: e.to_string(),
        })?;
        Ok(())
    }
}
