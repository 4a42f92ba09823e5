//! Dual-window request budget gate.
//!
//! Riot enforces two independent budgets per key: a short burst window and a
//! long sustained window (20 requests / 1 s and 100 requests / 2 min for
//! development keys). A permit is granted only when both windows have room;
//! budgets regenerate purely by time passing, permits are never handed back.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{Instant, sleep_until};

pub const DEFAULT_PER_SECOND: usize = 20;
pub const DEFAULT_PER_TWO_MINUTES: usize = 100;

#[derive(Debug)]
struct Window {
    capacity: usize,
    period: Duration,
    grants: VecDeque<Instant>,
}

impl Window {
    fn new(capacity: usize, period: Duration) -> Self {
        Self {
            capacity,
            period,
            grants: VecDeque::with_capacity(capacity),
        }
    }

    fn prune(&mut self, now: Instant) {
        while self
            .grants
            .front()
            .is_some_and(|&t| now.duration_since(t) >= self.period)
        {
            self.grants.pop_front();
        }
    }

    fn has_room(&self) -> bool {
        self.grants.len() < self.capacity
    }

    /// When the oldest grant leaves the window. Only meaningful while full.
    fn next_expiry(&self) -> Option<Instant> {
        self.grants.front().map(|&t| t + self.period)
    }
}

/// Shared permit gate enforcing both request-budget windows.
///
/// Safe for any number of concurrent callers; a caller suspends in
/// [`acquire`](Self::acquire) until the binding window frees a slot.
#[derive(Debug)]
pub struct RateGovernor {
    windows: Mutex<[Window; 2]>,
}

impl RateGovernor {
    pub fn new(short: (usize, Duration), long: (usize, Duration)) -> Self {
        Self {
            windows: Mutex::new([
                Window::new(short.0, short.1),
                Window::new(long.0, long.1),
            ]),
        }
    }

    /// Governor matching Riot's development-key limits, with the per-second
    /// cap overridable from configuration.
    pub fn riot_default(per_second: usize) -> Self {
        Self::new(
            (per_second, Duration::from_secs(1)),
            (DEFAULT_PER_TWO_MINUTES, Duration::from_secs(120)),
        )
    }

    /// Wait until both windows have budget, then record the permit in both.
    ///
    /// Returns `true` if the caller had to wait for budget, for metrics.
    pub async fn acquire(&self) -> bool {
        let mut waited = false;
        loop {
            let wake = {
                let mut windows = self.windows.lock().await;
                let now = Instant::now();
                for window in windows.iter_mut() {
                    window.prune(now);
                }
                if windows.iter().all(Window::has_room) {
                    for window in windows.iter_mut() {
                        window.grants.push_back(now);
                    }
                    return waited;
                }
                windows
                    .iter()
                    .filter(|w| !w.has_room())
                    .filter_map(Window::next_expiry)
                    .min()
                    .unwrap_or(now)
            };
            waited = true;
            sleep_until(wake).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn grants_within_budget_are_immediate() {
        let governor = RateGovernor::riot_default(20);
        let start = Instant::now();

        for _ in 0..20 {
            assert!(!governor.acquire().await);
        }

        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn short_window_blocks_twenty_first_permit() {
        let governor = RateGovernor::riot_default(20);

        for _ in 0..20 {
            governor.acquire().await;
        }

        let start = Instant::now();
        assert!(governor.acquire().await);
        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn long_window_caps_sustained_throughput() {
        let governor = RateGovernor::riot_default(20);
        let start = Instant::now();

        for _ in 0..100 {
            governor.acquire().await;
        }
        // 100 permits at 20/s: the short window paced these over ~4s.
        assert!(start.elapsed() < Duration::from_secs(120));

        governor.acquire().await;
        // The 101st permit had to wait for the very first grant to leave
        // the two-minute window.
        assert!(start.elapsed() >= Duration::from_secs(120));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_never_overflow_either_window() {
        let governor = Arc::new(RateGovernor::new(
            (5, Duration::from_secs(1)),
            (12, Duration::from_secs(10)),
        ));

        let mut handles = Vec::new();
        for _ in 0..30 {
            let governor = Arc::clone(&governor);
            handles.push(tokio::spawn(async move {
                governor.acquire().await;
                Instant::now()
            }));
        }

        let mut grants = Vec::new();
        for handle in handles {
            grants.push(handle.await.expect("acquire task"));
        }
        grants.sort();

        // No 1-second span may contain more than 5 grants, and no 10-second
        // span more than 12.
        for pair in grants.windows(6) {
            assert!(pair[5].duration_since(pair[0]) >= Duration::from_secs(1));
        }
        for pair in grants.windows(13) {
            assert!(pair[12].duration_since(pair[0]) >= Duration::from_secs(10));
        }
    }
}
