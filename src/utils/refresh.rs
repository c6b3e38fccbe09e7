use crate::api::events_api::EventsApiClient;
use crate::models::Event;
use crate::utils::transform::{transform_events, SyntheticEdgeModel};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::MissedTickBehavior;

/// The working event collection shared between the refresh loop and the
/// request handlers
pub type SharedEvents = Arc<RwLock<Vec<Event>>>;

/// Fixed polling cadence; failures wait for the next tick, no backoff
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Gatekeeper for the periodic re-fetch: Idle -> Fetching -> (apply |
/// discard) -> Idle.
///
/// Two guards beyond the timer itself: `in_flight` stops a new fetch from
/// being issued while one is outstanding (an elapsed tick is skipped, not
/// queued), and `epoch` makes disabling discard any fetch that was started
/// while enabled but completes afterwards. Clearing the timer alone would
/// leave that stale-response race open.
pub struct RefreshCoordinator {
    enabled: AtomicBool,
    in_flight: AtomicBool,
    epoch: AtomicU64,
}

impl Default for RefreshCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshCoordinator {
    /// Starts disabled; nothing polls until the user turns auto-refresh on
    pub fn new() -> Self {
        Self {
            enabled: AtomicBool::new(false),
            in_flight: AtomicBool::new(false),
            epoch: AtomicU64::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn enable(&self) {
        self.enabled.store(true, Ordering::SeqCst);
    }

    /// Stop future fetches and invalidate any fetch currently in flight
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::SeqCst);
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }

    pub fn set_enabled(&self, enabled: bool) {
        if enabled {
            self.enable();
        } else {
            self.disable();
        }
    }

    /// Try to move Idle -> Fetching. Returns the epoch token to hand back to
    /// `finish_fetch`, or `None` when disabled or already Fetching.
    pub fn begin_fetch(&self) -> Option<u64> {
        if !self.enabled.load(Ordering::SeqCst) {
            return None;
        }
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return None;
        }
        Some(self.epoch.load(Ordering::SeqCst))
    }

    /// Move Fetching -> Idle. Returns whether the fetched result may be
    /// applied: still enabled and no disable happened since `begin_fetch`.
    pub fn finish_fetch(&self, epoch_token: u64) -> bool {
        self.in_flight.store(false, Ordering::SeqCst);
        self.enabled.load(Ordering::SeqCst)
            && self.epoch.load(Ordering::SeqCst) == epoch_token
    }
}

/// Polling loop: every 30 seconds, when enabled and not already fetching,
/// re-fetch the current sport filter's events and wholesale-replace the
/// shared collection. Local follow toggles made between refreshes are
/// overwritten; the backend is the source of truth for the followed flag.
/// A failed fetch keeps the previous collection and waits for the next tick.
pub async fn run(
    coordinator: Arc<RefreshCoordinator>,
    client: Arc<EventsApiClient>,
    sport: Arc<RwLock<String>>,
    token: Option<String>,
    events: SharedEvents,
) {
    let mut interval = tokio::time::interval(REFRESH_INTERVAL);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick fires immediately; swallow it so enabling auto-refresh
    // does not double-fetch right after the initial page load.
    interval.tick().await;

    loop {
        interval.tick().await;

        let Some(epoch_token) = coordinator.begin_fetch() else {
            continue;
        };

        let current_sport = sport.read().await.clone();
        let result = client
            .fetch_events(&current_sport, false, token.as_deref())
            .await;

        match result {
            Ok(raws) => {
                let refreshed = transform_events(&raws, &SyntheticEdgeModel);
                if coordinator.finish_fetch(epoch_token) {
                    let mut guard = events.write().await;
                    *guard = refreshed;
                    tracing::debug!(sport = %current_sport, count = guard.len(), "refreshed events");
                } else {
                    tracing::debug!(sport = %current_sport, "auto-refresh disabled mid-fetch, result discarded");
                }
            }
            Err(e) => {
                coordinator.finish_fetch(epoch_token);
                tracing::error!(sport = %current_sport, error = %e, "refresh fetch failed, keeping previous events");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn event(id: &str) -> Event {
        Event {
            id: id.to_string(),
            home_team: "Home".to_string(),
            away_team: "Away".to_string(),
            start_time: Utc.with_ymd_and_hms(2025, 11, 2, 18, 0, 0).unwrap(),
            markets: vec![],
            is_followed: false,
        }
    }

    #[test]
    fn disabled_coordinator_never_starts_a_fetch() {
        let coordinator = RefreshCoordinator::new();
        assert!(coordinator.begin_fetch().is_none());
    }

    #[test]
    fn fetch_completes_and_may_be_applied_while_enabled() {
        let coordinator = RefreshCoordinator::new();
        coordinator.enable();

        let token = coordinator.begin_fetch().expect("enabled and idle");
        assert!(coordinator.finish_fetch(token));
    }

    #[test]
    fn overlapping_fetch_is_skipped() {
        let coordinator = RefreshCoordinator::new();
        coordinator.enable();

        let token = coordinator.begin_fetch().expect("first fetch starts");
        assert!(
            coordinator.begin_fetch().is_none(),
            "tick elapsing mid-fetch must be skipped"
        );

        assert!(coordinator.finish_fetch(token));
        assert!(coordinator.begin_fetch().is_some(), "idle again after finish");
    }

    #[test]
    fn disable_mid_flight_discards_the_result() {
        let coordinator = RefreshCoordinator::new();
        coordinator.enable();

        let token = coordinator.begin_fetch().expect("fetch starts while enabled");
        coordinator.disable();

        assert!(
            !coordinator.finish_fetch(token),
            "a fetch finishing after disable must not be applied"
        );
    }

    #[test]
    fn reenabling_does_not_resurrect_a_stale_fetch() {
        let coordinator = RefreshCoordinator::new();
        coordinator.enable();

        let token = coordinator.begin_fetch().unwrap();
        coordinator.disable();
        coordinator.enable();

        // Epoch moved on; the pre-disable fetch stays dead.
        assert!(!coordinator.finish_fetch(token));
    }

    #[tokio::test]
    async fn stale_result_leaves_shared_events_untouched() {
        let coordinator = RefreshCoordinator::new();
        coordinator.enable();
        let events: SharedEvents = Arc::new(RwLock::new(vec![event("old")]));

        let token = coordinator.begin_fetch().unwrap();
        let fetched = vec![event("new")];
        coordinator.disable();

        // Mirrors the apply branch in `run`.
        if coordinator.finish_fetch(token) {
            *events.write().await = fetched;
        }

        let guard = events.read().await;
        assert_eq!(guard.len(), 1);
        assert_eq!(guard[0].id, "old");
    }
}
