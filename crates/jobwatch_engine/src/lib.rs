//! Jobwatch engine: IO pipeline and scheduling around the core state machine.
mod dispatch;
mod extract;
mod fetch;
mod scheduler;
mod sink;
mod state;
mod types;

pub use dispatch::{Dispatcher, UtcNow};
pub use extract::page_text;
pub use fetch::{FetchSettings, PageFetcher, ReqwestPageFetcher};
pub use scheduler::{PollScheduler, WatchSettings};
pub use sink::{MailApiSettings, MailApiSink, NotificationSink, TelegramSink};
pub use state::WatchState;
pub use types::{FetchError, FetchFailure, SinkError};
