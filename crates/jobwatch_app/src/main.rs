mod config;
mod logging;
mod routes;

use std::sync::Arc;

use anyhow::Context;
use jobwatch_core::{FilterConfig, Normalizer};
use jobwatch_engine::{
    Dispatcher, FetchSettings, MailApiSink, NotificationSink, PollScheduler, ReqwestPageFetcher,
    TelegramSink, WatchSettings, WatchState,
};
use watch_logging::{watch_info, watch_warn};

use crate::config::Config;
use crate::logging::{initialize, LogDestination};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    initialize(LogDestination::Terminal);

    let config = Config::from_env().context("failed to load configuration")?;
    watch_info!(
        "watching {} every {}s",
        config.portal_url,
        config.poll_interval.as_secs()
    );

    let filter = FilterConfig::new(
        &config.no_jobs_text,
        &config.ignored_postcodes,
        &config.ignored_services,
    );
    let state = Arc::new(WatchState::new());

    let mut sinks: Vec<Arc<dyn NotificationSink>> = Vec::new();
    if let Some(mail) = config.mail.clone() {
        sinks.push(Arc::new(MailApiSink::new(mail)));
        watch_info!("email sink configured");
    }
    if let Some(telegram) = config.telegram.clone() {
        watch_info!("telegram sink configured for {} chat(s)", telegram.chat_ids.len());
        sinks.push(Arc::new(TelegramSink::new(
            telegram.bot_token,
            telegram.chat_ids,
        )));
    }
    if sinks.is_empty() {
        watch_warn!("no notification sinks configured; alerts only reach the log");
    }

    let settings = WatchSettings {
        portal_url: config.portal_url.clone(),
        interval: config.poll_interval,
    };
    let scheduler = PollScheduler::new(
        settings,
        Arc::new(ReqwestPageFetcher::new(FetchSettings::default())),
        Normalizer::new(),
        filter,
        state.clone(),
        Dispatcher::new(sinks),
    );
    tokio::spawn(scheduler.run());

    let app = routes::router(state);
    let addr = format!("0.0.0.0:{}", config.port);
    watch_info!("control surface listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("failed to bind control surface")?;
    axum::serve(listener, app)
        .await
        .context("control surface server error")?;
    Ok(())
}
