use std::sync::Arc;
use std::time::Duration;

use jobwatch_core::{render_message, FilterConfig, Normalizer};
use watch_logging::{get_cycle, set_cycle, watch_debug, watch_info, watch_warn};

use crate::dispatch::Dispatcher;
use crate::fetch::PageFetcher;
use crate::state::WatchState;

/// Poll target and cadence for the watch loop.
#[derive(Debug, Clone)]
pub struct WatchSettings {
    pub portal_url: String,
    pub interval: Duration,
}

impl WatchSettings {
    pub fn new(portal_url: impl Into<String>) -> Self {
        Self {
            portal_url: portal_url.into(),
            interval: Duration::from_secs(30),
        }
    }
}

/// Drives fetch -> normalize -> filter -> advance -> dispatch on a fixed
/// period for the life of the process.
pub struct PollScheduler {
    settings: WatchSettings,
    fetcher: Arc<dyn PageFetcher>,
    normalizer: Normalizer,
    filter: FilterConfig,
    state: Arc<WatchState>,
    dispatcher: Dispatcher,
}

impl PollScheduler {
    pub fn new(
        settings: WatchSettings,
        fetcher: Arc<dyn PageFetcher>,
        normalizer: Normalizer,
        filter: FilterConfig,
        state: Arc<WatchState>,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            settings,
            fetcher,
            normalizer,
            filter,
            state,
            dispatcher,
        }
    }

    /// Runs the loop forever. A paused tick skips the cycle body but keeps
    /// the cadence; there is no backoff, the fixed interval is the only
    /// retry mechanism.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.settings.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let mut cycle: u64 = 0;
        watch_info!("watch loop started for {}", self.settings.portal_url);
        loop {
            ticker.tick().await;
            cycle += 1;
            set_cycle(cycle);
            if self.state.is_paused() {
                watch_debug!("cycle {}: paused, skipping", get_cycle());
                continue;
            }
            self.run_cycle().await;
        }
    }

    /// One full poll cycle. A fetch failure aborts the cycle with no state
    /// transition and no notification; the next tick retries on schedule.
    pub async fn run_cycle(&self) {
        let text = match self.fetcher.fetch_text(&self.settings.portal_url).await {
            Ok(text) => text,
            Err(err) => {
                watch_warn!("fetch failed: {}: {}", err.kind, err.message);
                return;
            }
        };

        let page = self.normalizer.normalize(&text);
        if page.found.is_empty() {
            watch_debug!("cycle {}: no postcodes on page", get_cycle());
        } else {
            watch_debug!(
                "cycle {}: postcodes on page: {}",
                get_cycle(),
                page.found.to_list_string()
            );
        }

        let outcome = self.filter.apply(&page);
        if let Some(alert) = self.state.advance(outcome) {
            let message = render_message(&alert, &self.settings.portal_url);
            self.dispatcher.dispatch(&message, &self.state).await;
        }
    }
}
