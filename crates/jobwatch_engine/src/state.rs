use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use jobwatch_core::{Alert, AlertLog, AlertRecord, ScanOutcome, Snapshot, TrackerState};

/// The single synchronized owner of everything shared between the poll
/// loop and the control surface: the tracker snapshot, the pause flag and
/// the alert history. Neither side touches any of the three except through
/// these methods.
#[derive(Debug, Default)]
pub struct WatchState {
    tracker: Mutex<TrackerState>,
    paused: AtomicBool,
    alerts: Mutex<AlertLog>,
}

impl WatchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one cycle's scan outcome to the tracker and returns the
    /// alert to dispatch, if the transition produced one.
    pub fn advance(&self, outcome: ScanOutcome) -> Option<Alert> {
        let mut guard = self.tracker.lock().expect("lock tracker state");
        let state = std::mem::take(&mut *guard);
        let (next, alert) = jobwatch_core::advance(state, outcome);
        *guard = next;
        alert
    }

    /// Read-only copy of the active snapshot for status display.
    pub fn current_snapshot(&self) -> Snapshot {
        self.tracker.lock().expect("lock tracker state").active().clone()
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    /// Flips the pause flag and returns the new value.
    pub fn toggle_pause(&self) -> bool {
        !self.paused.fetch_xor(true, Ordering::Relaxed)
    }

    pub fn push_alert(&self, timestamp: String, message: String) {
        self.alerts
            .lock()
            .expect("lock alert log")
            .append(AlertRecord { timestamp, message });
    }

    /// Alert history in insertion order, oldest first.
    pub fn alert_history(&self) -> Vec<AlertRecord> {
        self.alerts.lock().expect("lock alert log").list()
    }
}
