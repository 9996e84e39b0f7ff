mod config;
mod page;
mod tracker;
mod waypoints;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use pilot_shared::config::ViewerConfig;
use pilot_shared::models::{PositionReport, Waypoint, DEFAULT_POSITION_PATH, STATUS_PATH, WAYPOINTS_PATH};
use serde::Serialize;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing_subscriber::EnvFilter;

use config::ServerConfig;
use tracker::simulator::FlightSimulator;
use tracker::PositionStore;

#[derive(Clone)]
struct AppState {
    store: Arc<PositionStore>,
    waypoints: Arc<Vec<Waypoint>>,
    viewer: Arc<ViewerConfig>,
    dist_dir: PathBuf,
    simulated: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport {
    has_position: bool,
    updated_at: Option<DateTime<Utc>>,
    simulated: bool,
}

async fn get_position(State(state): State<AppState>) -> Response {
    let no_store = [(header::CACHE_CONTROL, "no-store")];
    match state.store.current() {
        Some(fix) => (no_store, Json(fix.report)).into_response(),
        // No fix yet: the viewer reads an empty body as "no position".
        None => (no_store, StatusCode::OK).into_response(),
    }
}

async fn put_position(
    State(state): State<AppState>,
    Json(report): Json<PositionReport>,
) -> Response {
    match state.store.update(report) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::debug!(error = %e, "Rejected position update");
            (StatusCode::UNPROCESSABLE_ENTITY, e).into_response()
        }
    }
}

async fn delete_position(State(state): State<AppState>) -> StatusCode {
    if state.store.clear() {
        tracing::debug!("Cleared current position");
    }
    StatusCode::NO_CONTENT
}

async fn get_waypoints(State(state): State<AppState>) -> Json<Vec<Waypoint>> {
    Json(state.waypoints.as_ref().clone())
}

async fn get_status(State(state): State<AppState>) -> Json<StatusReport> {
    let fix = state.store.current();
    Json(StatusReport {
        has_position: fix.is_some(),
        updated_at: fix.map(|f| f.updated_at),
        simulated: state.simulated,
    })
}

async fn serve_viewer(State(state): State<AppState>) -> Html<String> {
    // Serve the built frontend when present, otherwise a bare page.
    let template = std::fs::read_to_string(state.dist_dir.join("index.html")).ok();
    Html(page::render_viewer_page(template.as_deref(), &state.viewer))
}

/// Build a cache-controlled static file router.
///
/// Separated so tests can exercise the caching layer with arbitrary directories.
fn cached_static_router(dir: &Path, cache_header: &'static str) -> Router {
    let layer = SetResponseHeaderLayer::overriding(
        header::CACHE_CONTROL,
        HeaderValue::from_static(cache_header),
    );
    Router::new()
        .fallback_service(ServeDir::new(dir))
        .layer(layer)
}

const CACHE_IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// Route serving the position store. A local `positionUrl` is served where
/// the viewer polls it; an absolute one belongs to another host, so the
/// store stays on the default path.
fn position_route(viewer: &ViewerConfig) -> String {
    if config::is_local_path(&viewer.position_url) {
        viewer.position_url.clone()
    } else {
        DEFAULT_POSITION_PATH.to_string()
    }
}

/// Build the full application router.
fn build_app(state: AppState) -> Router {
    // Static file routers are stateless, merge them before adding app state
    let static_files = Router::new()
        .nest(
            "/dist",
            cached_static_router(&state.dist_dir, CACHE_IMMUTABLE),
        )
        .nest(
            "/assets",
            cached_static_router(&state.dist_dir.join("assets"), CACHE_IMMUTABLE),
        );

    Router::new()
        .route("/", get(serve_viewer))
        .route("/pilot", get(serve_viewer))
        .route(
            &position_route(&state.viewer),
            get(get_position).put(put_position).delete(delete_position),
        )
        .route(WAYPOINTS_PATH, get(get_waypoints))
        .route(STATUS_PATH, get(get_status))
        .with_state(state)
        .merge(static_files)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    let waypoints = match &config.waypoints_file {
        Some(path) => match waypoints::load(path) {
            Ok(w) => w,
            Err(e) => {
                tracing::error!(error = %e, "Could not load waypoints");
                std::process::exit(1);
            }
        },
        None => Vec::new(),
    };

    let store = PositionStore::new();
    if let Some(sim) = &config.simulation {
        FlightSimulator::new(config.viewer.center, sim).spawn(store.clone());
    }

    let state = AppState {
        store,
        waypoints: Arc::new(waypoints),
        viewer: Arc::new(config.viewer.clone()),
        dist_dir: config.dist_dir.clone(),
        simulated: config.simulation.is_some(),
    };
    let app = build_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "Could not bind listener");
            std::process::exit(1);
        }
    };
    tracing::info!("Viewer running at http://localhost:{}/pilot", config.port);
    tracing::info!(
        "Position endpoint at http://localhost:{}{}",
        config.port,
        position_route(&config.viewer)
    );
    if !config::is_local_path(&config.viewer.position_url) {
        tracing::info!(
            url = %config.viewer.position_url,
            "Viewer polls a position endpoint on another host"
        );
    }

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "Server stopped");
        std::process::exit(1);
    }
}
