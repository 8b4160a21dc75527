use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::routing::{get, post};
use axum::Router;
use jobwatch_engine::WatchState;

/// Builds the control surface router. Handlers only ever go through
/// [`WatchState`]'s synchronized methods; the poll loop owns everything else.
pub fn router(state: Arc<WatchState>) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/alerts", get(alerts))
        .route("/pause", post(toggle_pause))
        .with_state(state)
}

async fn status(State(state): State<Arc<WatchState>>) -> String {
    let snapshot = state.current_snapshot();
    let active = if snapshot.is_empty() {
        "none".to_string()
    } else {
        snapshot.to_list_string()
    };
    format!(
        "jobwatch is running\npaused: {}\nactive postcodes: {active}\n",
        state.is_paused()
    )
}

async fn alerts(State(state): State<Arc<WatchState>>) -> Html<String> {
    let history = state.alert_history();
    let listing = if history.is_empty() {
        "<p>No alerts yet.</p>".to_string()
    } else {
        let mut items = String::new();
        for record in history {
            items.push_str(&format!(
                "<li><strong>{}</strong>: {}</li>\n",
                escape(&record.timestamp),
                escape(&record.message)
            ));
        }
        format!("<ul>\n{items}</ul>")
    };
    Html(format!(
        "<html><head><title>Recent Alerts</title></head>\n\
         <body><h2>Recent Job Alerts</h2>\n{listing}\n</body></html>"
    ))
}

async fn toggle_pause(State(state): State<Arc<WatchState>>) -> String {
    let paused = state.toggle_pause();
    format!("paused: {paused}\n")
}

/// Minimal HTML escaping; alert messages embed page-derived text.
fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
