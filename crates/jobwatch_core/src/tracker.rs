use crate::{ScanOutcome, Snapshot};

/// The tracker's mutable state: the currently active snapshot.
///
/// An empty snapshot means no job condition is active (Idle).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrackerState {
    active: Snapshot,
}

impl TrackerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        !self.active.is_empty()
    }

    pub fn active(&self) -> &Snapshot {
        &self.active
    }
}

/// A decision to notify, produced by [`advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    /// Jobs are available for these postcodes.
    JobsFound(Snapshot),
    /// The page had no recognizable structure; notify cautiously.
    UndetectedChange,
}

/// Pure transition function: applies one cycle's scan outcome to the
/// tracker state and returns the alert to dispatch, if any.
///
/// Level-triggered with reminders: while jobs persist the same alert fires
/// again every cycle instead of deduplicating on change. Keyword
/// suppression freezes the current state; only the banner or an empty
/// filtered set clears it.
pub fn advance(state: TrackerState, outcome: ScanOutcome) -> (TrackerState, Option<Alert>) {
    match outcome {
        ScanOutcome::Cleared => (TrackerState::default(), None),
        ScanOutcome::Suppressed => (state, None),
        ScanOutcome::Unparsed => (state, Some(Alert::UndetectedChange)),
        ScanOutcome::Jobs(filtered) => {
            if filtered.is_empty() {
                (TrackerState::default(), None)
            } else {
                let alert = Alert::JobsFound(filtered.clone());
                (TrackerState { active: filtered }, Some(alert))
            }
        }
    }
}

/// Renders the single outgoing message for an alert.
///
/// Deterministic: the postcode list is sorted and comma-joined, and there
/// is always exactly one message per notifying cycle.
pub fn render_message(alert: &Alert, portal_url: &str) -> String {
    match alert {
        Alert::JobsFound(snapshot) => format!(
            "New jobs found: {}\nCheck the portal: {portal_url}",
            snapshot.to_list_string()
        ),
        Alert::UndetectedChange => {
            format!("Page changed but no postcodes could be parsed. Check the portal: {portal_url}")
        }
    }
}
