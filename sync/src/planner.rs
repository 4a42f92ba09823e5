//! Decides which of the listed match ids still need fetching.

use matchvault_shared::traits::{MatchStore, StoreError};
use tracing::debug;

/// Turns the remote listing into a work list by consulting the store.
pub struct SyncPlanner<'a, S> {
    store: &'a S,
}

impl<'a, S: MatchStore> SyncPlanner<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Filter `candidates` down to the ids that still need fetching.
    ///
    /// Candidates arrive most-recent-first from the listing and keep that
    /// order, so recovery from a partial failure re-prioritizes the newest
    /// matches. With `force` every candidate stays in, regardless of what
    /// the store already holds; otherwise completely stored matches drop
    /// out. Completeness is resolved with one batched store query.
    pub async fn plan(&self, candidates: &[String], force: bool) -> Result<Vec<String>, StoreError> {
        if force {
            return Ok(candidates.to_vec());
        }

        let complete = self.store.complete_match_ids(candidates).await?;
        let work: Vec<String> = candidates
            .iter()
            .filter(|id| !complete.contains(*id))
            .cloned()
            .collect();

        debug!(
            candidates = candidates.len(),
            complete = complete.len(),
            work = work.len(),
            "plan ready"
        );
        Ok(work)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    use async_trait::async_trait;
    use matchvault_shared::lol_match::{Match, MatchRecord};

    /// Store stub that considers a fixed id set complete.
    struct FixedStore {
        complete: HashSet<String>,
    }

    #[async_trait]
    impl MatchStore for FixedStore {
        async fn upsert_match(&self, _record: &MatchRecord) -> Result<(), StoreError> {
            unimplemented!("planner never writes")
        }

        async fn has_complete_match(&self, match_id: &str) -> Result<bool, StoreError> {
            Ok(self.complete.contains(match_id))
        }

        async fn complete_match_ids(
            &self,
            ids: &[String],
        ) -> Result<HashSet<String>, StoreError> {
            Ok(ids
                .iter()
                .filter(|id| self.complete.contains(*id))
                .cloned()
                .collect())
        }

        async fn list_matches(&self) -> Result<Vec<Match>, StoreError> {
            Ok(Vec::new())
        }

        async fn match_bundle(&self, _match_id: &str) -> Result<Option<MatchRecord>, StoreError> {
            Ok(None)
        }
    }

    fn candidates(n: usize) -> Vec<String> {
        // Most-recent-first, the way the listing endpoint returns them.
        (0..n).map(|i| format!("NA1_{}", 1000 - i)).collect()
    }

    #[tokio::test]
    async fn complete_ids_are_skipped_in_order() {
        let ids = candidates(30);
        // Every third id is already fully stored.
        let complete: HashSet<String> = ids.iter().step_by(3).cloned().collect();
        let store = FixedStore {
            complete: complete.clone(),
        };

        let work = SyncPlanner::new(&store).plan(&ids, false).await.unwrap();

        assert_eq!(work.len(), 20);
        let expected: Vec<String> = ids
            .iter()
            .filter(|id| !complete.contains(*id))
            .cloned()
            .collect();
        assert_eq!(work, expected);
    }

    #[tokio::test]
    async fn force_keeps_every_candidate() {
        let ids = candidates(10);
        let store = FixedStore {
            complete: ids.iter().cloned().collect(),
        };

        let work = SyncPlanner::new(&store).plan(&ids, true).await.unwrap();

        assert_eq!(work, ids);
    }

    #[tokio::test]
    async fn empty_listing_plans_no_work() {
        let store = FixedStore {
            complete: HashSet::new(),
        };

        let work = SyncPlanner::new(&store).plan(&[], false).await.unwrap();

        assert!(work.is_empty());
    }
}
