use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::{header::COOKIE, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use market_edge::api::events_api::{ApiConfig, EventsApiClient};
use market_edge::load_board;
use market_edge::models::Event;
use market_edge::utils::filters::{filter_events_default, FilterOptions};
use market_edge::utils::follow::toggle_follow;
use market_edge::utils::refresh::{self, RefreshCoordinator, SharedEvents};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::services::ServeDir;

// Custom filters for formatting
mod filters {
    use chrono::{DateTime, Utc};

    pub fn format_odds(odds: &i32) -> ::askama::Result<String> {
        Ok(format!("{:+}", odds))
    }

    pub fn format_point(value: &f64) -> ::askama::Result<String> {
        Ok(format!("{:+.1}", value))
    }

    pub fn format_edge(value: &f64) -> ::askama::Result<String> {
        Ok(format!("{:.2}%", value))
    }

    pub fn format_start(dt: &DateTime<Utc>) -> ::askama::Result<String> {
        Ok(dt.format("%a %b %-d, %H:%M UTC").to_string())
    }
}

#[derive(Template)]
#[template(path = "board.html")]
struct BoardTemplate {
    sport: String,
    sports: Vec<String>,
    events: Vec<Event>,
    edge_only: bool,
    live_only: bool,
    auto_refresh: bool,
}

struct HtmlTemplate<T>(T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render template: {}", err),
            )
                .into_response(),
        }
    }
}

#[derive(Clone)]
struct AppState {
    client: Arc<EventsApiClient>,
    events: SharedEvents,
    sports: Arc<RwLock<Vec<String>>>,
    sport: Arc<RwLock<String>>,
    coordinator: Arc<RefreshCoordinator>,
}

/// Pull the bearer token out of the `access_token` cookie; it is forwarded
/// to the backend opaquely, never decoded
fn parse_cookie(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|part| {
        let (name, value) = part.trim().split_once('=')?;
        (name == "access_token").then(|| value.to_string())
    })
}

/// Whether a page view should hit the backend again. Switching sport always
/// reloads; otherwise every view reloads unless the auto-refresh loop is
/// already keeping the shared collection warm.
fn should_reload(sport_changed: bool, auto_refresh: bool) -> bool {
    sport_changed || !auto_refresh
}

/// The follow state the backend should be told about, or `None` when the id
/// is not on the board (mirrors `toggle_follow`'s silent no-op: no backend
/// call for an event the client has never seen)
fn desired_follow_state(events: &[Event], id: &str) -> Option<bool> {
    events
        .iter()
        .find(|event| event.id == id)
        .map(|event| !event.is_followed)
}

#[derive(Debug, Deserialize)]
struct BoardQuery {
    sport: Option<String>,
    #[serde(default)]
    edge_only: bool,
    #[serde(default)]
    live_only: bool,
}

async fn board(
    State(state): State<AppState>,
    Query(query): Query<BoardQuery>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let token = parse_cookie(&headers);

    let current = state.sport.read().await.clone();
    let requested = query
        .sport
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| current.clone());

    if should_reload(requested != current, state.coordinator.is_enabled()) {
        let board = load_board(&state.client, &requested, false, token.as_deref()).await;
        *state.sports.write().await = board.sports;
        *state.events.write().await = board.events;
        *state.sport.write().await = requested;
    }

    let options = FilterOptions {
        edge_only: query.edge_only,
        live_only: query.live_only,
    };

    let events = filter_events_default(&*state.events.read().await, &options);

    let template = BoardTemplate {
        sport: state.sport.read().await.clone(),
        sports: state.sports.read().await.clone(),
        events,
        edge_only: query.edge_only,
        live_only: query.live_only,
        auto_refresh: state.coordinator.is_enabled(),
    };

    HtmlTemplate(template).into_response()
}

async fn follow(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    // Optimistic local flip first; the backend call is fired without being
    // awaited relative to the UI update.
    let desired = {
        let mut guard = state.events.write().await;
        let desired = desired_follow_state(&guard, &event_id);
        if desired.is_some() {
            *guard = toggle_follow(std::mem::take(&mut *guard), &event_id);
        }
        desired
    };

    match (desired, parse_cookie(&headers)) {
        (Some(follow), Some(token)) => {
            let client = state.client.clone();
            let id = event_id.clone();
            tokio::spawn(async move {
                // No rollback on failure: the local toggle stands until the
                // next refresh re-asserts server truth.
                if let Err(e) = client.set_follow(&id, follow, &token).await {
                    tracing::error!(event_id = %id, error = %e, "follow request failed");
                }
            });
        }
        (Some(_), None) => {
            tracing::warn!(event_id = %event_id, "no access token, follow not sent to backend");
        }
        (None, _) => {
            tracing::warn!(event_id = %event_id, "follow for unknown event id ignored");
        }
    }

    Redirect::to("/")
}

#[derive(Debug, Deserialize)]
struct RefreshQuery {
    #[serde(default)]
    enabled: bool,
}

async fn set_refresh(
    State(state): State<AppState>,
    Query(query): Query<RefreshQuery>,
) -> impl IntoResponse {
    state.coordinator.set_enabled(query.enabled);
    tracing::info!(enabled = query.enabled, "auto-refresh toggled");
    Redirect::to("/")
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let client = Arc::new(EventsApiClient::new(ApiConfig::from_env()));
    let token = std::env::var("API_TOKEN").ok();

    println!("Fetching initial odds board...");
    let initial = load_board(&client, "all", false, token.as_deref()).await;
    println!(
        "Loaded {} event(s) across {} sport(s)",
        initial.events.len(),
        initial.sports.len()
    );

    let state = AppState {
        client: client.clone(),
        events: Arc::new(RwLock::new(initial.events)),
        sports: Arc::new(RwLock::new(initial.sports)),
        sport: Arc::new(RwLock::new(initial.sport)),
        coordinator: Arc::new(RefreshCoordinator::new()),
    };

    // Background polling loop; inert until auto-refresh is enabled
    tokio::spawn(refresh::run(
        state.coordinator.clone(),
        client,
        state.sport.clone(),
        token,
        state.events.clone(),
    ));

    println!("\nStarting web server at http://127.0.0.1:3000");
    println!("Press Ctrl+C to stop\n");

    let app = Router::new()
        .nest_service("/static", ServeDir::new("static"))
        .route("/", get(board))
        .route("/events/:id/follow", post(follow))
        .route("/refresh", post(set_refresh))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000")
        .await
        .unwrap();

    axum::serve(listener, app).await.unwrap();
}
