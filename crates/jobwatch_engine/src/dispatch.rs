use std::sync::Arc;

use watch_logging::{watch_info, watch_warn};

use crate::sink::NotificationSink;
use crate::state::WatchState;

/// Wall-clock source for alert records, injected so tests stay deterministic.
pub type UtcNow = Arc<dyn Fn() -> String + Send + Sync>;

/// Fans one decided message out to every configured sink, best effort.
///
/// After the delivery attempts the message is appended to the alert log
/// exactly once, whether or not any sink succeeded: the log records
/// "decided to alert", not "successfully delivered".
pub struct Dispatcher {
    sinks: Vec<Arc<dyn NotificationSink>>,
    now_utc: UtcNow,
}

impl Dispatcher {
    pub fn new(sinks: Vec<Arc<dyn NotificationSink>>) -> Self {
        Self {
            sinks,
            now_utc: Arc::new(|| chrono::Utc::now().to_rfc3339()),
        }
    }

    /// Replaces the wall-clock source. Used by tests.
    pub fn with_clock(mut self, now_utc: UtcNow) -> Self {
        self.now_utc = now_utc;
        self
    }

    pub async fn dispatch(&self, message: &str, state: &WatchState) {
        for sink in &self.sinks {
            match sink.deliver(message).await {
                Ok(()) => watch_info!("{} alert sent", sink.name()),
                Err(err) => watch_warn!("{} delivery failed: {err}", sink.name()),
            }
        }
        state.push_alert((self.now_utc)(), message.to_string());
    }
}
