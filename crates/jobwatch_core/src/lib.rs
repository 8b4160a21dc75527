//! Jobwatch core: pure availability state machine and page filtering.
mod alert_log;
mod filter;
mod normalize;
mod postcode;
mod tracker;

pub use alert_log::{AlertLog, AlertRecord, MAX_ALERT_RECORDS};
pub use filter::{FilterConfig, ScanOutcome};
pub use normalize::{NormalizedPage, Normalizer};
pub use postcode::{Postcode, Snapshot};
pub use tracker::{advance, render_message, Alert, TrackerState};
