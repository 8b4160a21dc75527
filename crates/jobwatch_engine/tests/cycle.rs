use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;
use jobwatch_core::{FilterConfig, Normalizer, Postcode};
use jobwatch_engine::{
    Dispatcher, FetchError, FetchFailure, NotificationSink, PageFetcher, PollScheduler,
    SinkError, WatchSettings, WatchState,
};
use pretty_assertions::assert_eq;

const PORTAL: &str = "https://portal.example.com/jobs";
const CLOCK: &str = "2026-08-05T12:00:00+00:00";

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(watch_logging::initialize_for_tests);
}

/// Serves a pre-scripted sequence of pages, one per cycle.
struct ScriptedFetcher {
    pages: Mutex<VecDeque<Result<String, FetchError>>>,
}

impl ScriptedFetcher {
    fn new(pages: Vec<Result<String, FetchError>>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
        }
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch_text(&self, _url: &str) -> Result<String, FetchError> {
        self.pages.lock().unwrap().pop_front().expect("scripted page")
    }
}

/// Counts fetches and always reports the "no jobs" banner.
#[derive(Default)]
struct CountingFetcher {
    calls: AtomicUsize,
}

#[async_trait]
impl PageFetcher for CountingFetcher {
    async fn fetch_text(&self, _url: &str) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok("NO JOBS AVAILABLE TODAY".to_string())
    }
}

/// Records delivered messages; optionally fails every delivery.
struct RecordingSink {
    sent: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl RecordingSink {
    fn new(fail: bool) -> (Arc<Self>, Arc<Mutex<Vec<String>>>) {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::new(Self {
            sent: sent.clone(),
            fail,
        });
        (sink, sent)
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    fn name(&self) -> &'static str {
        if self.fail {
            "flaky"
        } else {
            "recording"
        }
    }

    async fn deliver(&self, message: &str) -> Result<(), SinkError> {
        self.sent.lock().unwrap().push(message.to_string());
        if self.fail {
            Err(SinkError::Transport("wire down".to_string()))
        } else {
            Ok(())
        }
    }
}

fn filter(no_jobs: &str, ignored_postcodes: &[&str]) -> FilterConfig {
    FilterConfig::new(
        no_jobs,
        ignored_postcodes.iter().copied(),
        std::iter::empty::<&str>(),
    )
}

fn scheduler(
    pages: Vec<Result<String, FetchError>>,
    filter: FilterConfig,
    sinks: Vec<Arc<dyn NotificationSink>>,
    state: Arc<WatchState>,
) -> PollScheduler {
    PollScheduler::new(
        WatchSettings::new(PORTAL),
        Arc::new(ScriptedFetcher::new(pages)),
        Normalizer::new(),
        filter,
        state,
        Dispatcher::new(sinks).with_clock(Arc::new(|| CLOCK.to_string())),
    )
}

#[tokio::test]
async fn reminder_renotifies_and_logs_each_cycle() {
    init_logging();
    let state = Arc::new(WatchState::new());
    let (sink, sent) = RecordingSink::new(false);
    let pages = vec![
        Ok("Job available at NE1 1AA".to_string()),
        Ok("Job available at NE1 1AA".to_string()),
    ];
    let scheduler = scheduler(pages, filter("no jobs available", &[]), vec![sink], state.clone());

    scheduler.run_cycle().await;
    scheduler.run_cycle().await;

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], sent[1]);
    assert_eq!(
        sent[0],
        format!("New jobs found: NE1 1AA\nCheck the portal: {PORTAL}")
    );

    let history = state.alert_history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].message, history[1].message);
    assert_eq!(history[0].timestamp, CLOCK);
    assert!(state.current_snapshot().contains(&Postcode::new("NE1 1AA")));
}

#[tokio::test]
async fn banner_page_clears_active_state() {
    init_logging();
    let state = Arc::new(WatchState::new());
    let (sink, sent) = RecordingSink::new(false);
    let pages = vec![
        Ok("Job available at NE27 0BT".to_string()),
        Ok("No jobs available today".to_string()),
    ];
    let scheduler = scheduler(pages, filter("no jobs available", &[]), vec![sink], state.clone());

    scheduler.run_cycle().await;
    assert!(!state.current_snapshot().is_empty());

    scheduler.run_cycle().await;
    assert!(state.current_snapshot().is_empty());
    assert_eq!(sent.lock().unwrap().len(), 1);
    assert_eq!(state.alert_history().len(), 1);
}

#[tokio::test]
async fn fetch_failure_leaves_state_untouched() {
    init_logging();
    let state = Arc::new(WatchState::new());
    let (sink, sent) = RecordingSink::new(false);
    let pages = vec![
        Ok("Job available at NE1 1AA".to_string()),
        Err(FetchError {
            kind: FetchFailure::Network,
            message: "connection reset".to_string(),
        }),
    ];
    let scheduler = scheduler(pages, filter("no jobs available", &[]), vec![sink], state.clone());

    scheduler.run_cycle().await;
    scheduler.run_cycle().await;

    // The failed cycle neither transitioned nor notified.
    assert!(state.current_snapshot().contains(&Postcode::new("NE1 1AA")));
    assert_eq!(sent.lock().unwrap().len(), 1);
    assert_eq!(state.alert_history().len(), 1);
}

#[tokio::test]
async fn failing_sink_does_not_block_others_or_the_log() {
    init_logging();
    let state = Arc::new(WatchState::new());
    let (flaky, flaky_sent) = RecordingSink::new(true);
    let (healthy, healthy_sent) = RecordingSink::new(false);
    let pages = vec![Ok("Job available at NE1 1AA".to_string())];
    let scheduler = scheduler(
        pages,
        filter("no jobs available", &[]),
        vec![flaky, healthy],
        state.clone(),
    );

    scheduler.run_cycle().await;

    assert_eq!(flaky_sent.lock().unwrap().len(), 1);
    assert_eq!(healthy_sent.lock().unwrap().len(), 1);
    // Exactly one record per notifying cycle, delivered or not.
    assert_eq!(state.alert_history().len(), 1);
}

#[tokio::test]
async fn unparsed_page_sends_generic_alert() {
    init_logging();
    let state = Arc::new(WatchState::new());
    let (sink, sent) = RecordingSink::new(false);
    let pages = vec![Ok("The portal layout changed entirely".to_string())];
    let scheduler = scheduler(pages, filter("no jobs available", &[]), vec![sink], state.clone());

    scheduler.run_cycle().await;

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].contains("no postcodes could be parsed"));
    assert!(sent[0].contains(PORTAL));
    assert!(state.current_snapshot().is_empty());
}

#[tokio::test]
async fn ignored_only_page_clears_previous_state() {
    init_logging();
    let state = Arc::new(WatchState::new());
    let (sink, sent) = RecordingSink::new(false);
    let pages = vec![
        Ok("Job available at NE27 0BT".to_string()),
        Ok("Job available at NE1 1AA".to_string()),
    ];
    let scheduler = scheduler(
        pages,
        filter("no jobs available", &["NE1 1AA"]),
        vec![sink],
        state.clone(),
    );

    scheduler.run_cycle().await;
    scheduler.run_cycle().await;

    // Every postcode on the second page was ignored: back to idle, one alert.
    assert!(state.current_snapshot().is_empty());
    assert_eq!(sent.lock().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn paused_loop_skips_cycles_but_keeps_ticking() {
    init_logging();
    let fetcher = Arc::new(CountingFetcher::default());
    let state = Arc::new(WatchState::new());
    assert!(state.toggle_pause());

    let scheduler = PollScheduler::new(
        WatchSettings::new(PORTAL),
        fetcher.clone(),
        Normalizer::new(),
        filter("no jobs available", &[]),
        state.clone(),
        Dispatcher::new(Vec::new()),
    );
    tokio::spawn(scheduler.run());

    tokio::time::sleep(Duration::from_secs(95)).await;
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);

    // Unpausing resumes fetching on the same cadence.
    assert!(!state.toggle_pause());
    tokio::time::sleep(Duration::from_secs(65)).await;
    assert!(fetcher.calls.load(Ordering::SeqCst) >= 1);
}

#[tokio::test(start_paused = true)]
async fn loop_polls_on_the_configured_interval() {
    init_logging();
    let fetcher = Arc::new(CountingFetcher::default());
    let state = Arc::new(WatchState::new());

    let scheduler = PollScheduler::new(
        WatchSettings::new(PORTAL),
        fetcher.clone(),
        Normalizer::new(),
        filter("no jobs available", &[]),
        state,
        Dispatcher::new(Vec::new()),
    );
    tokio::spawn(scheduler.run());

    tokio::time::sleep(Duration::from_secs(95)).await;
    let calls = fetcher.calls.load(Ordering::SeqCst);
    assert!((3..=4).contains(&calls), "calls = {calls}");
}
