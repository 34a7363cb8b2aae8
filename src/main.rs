use axum::{
  extract::{Query, State, WebSocketUpgrade},
  http::{Method, StatusCode},
  response::IntoResponse,
  routing::get,
  Json, Router,
};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing_subscriber::EnvFilter;

mod assets;
mod config;
mod game;
mod protocol;
mod runtime;
mod settings;
mod shared;
mod storage;

use assets::AssetCatalog;
use config::ServerConfig;
use runtime::GameHost;
use settings::GameSettings;
use storage::{LeaderboardEntry, Store, StoreCommand, LEADERBOARD_SIZE};

pub struct AppState {
  config: ServerConfig,
  store: Store,
  writer: mpsc::UnboundedSender<StoreCommand>,
  assets: Arc<AssetCatalog>,
  hosts: DashMap<String, Arc<GameHost>>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
  ok: bool,
  #[serde(rename = "activeGames")]
  active_games: usize,
  #[serde(rename = "assetProgress")]
  asset_progress: f64,
}

#[derive(Debug, Serialize)]
struct LeaderboardResponse {
  scores: Vec<LeaderboardEntry>,
}

#[derive(Debug, Deserialize)]
struct LeaderboardQuery {
  limit: Option<i64>,
}

#[derive(Debug, Serialize)]
struct HighScoreResponse {
  #[serde(rename = "highScore")]
  high_score: i64,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
  ok: bool,
  error: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let config = ServerConfig::from_env();

  // Fail closed: no assets, no games.
  let assets = AssetCatalog::load(&config.asset_source()).await?;
  let store = Store::connect(&config.database_url).await?;
  let writer = storage::spawn_writer(store.clone());

  let state = Arc::new(AppState {
    config: config.clone(),
    store,
    writer,
    assets: Arc::new(assets),
    hosts: DashMap::new(),
  });

  let cors = CorsLayer::new()
    .allow_origin(Any)
    .allow_methods([Method::GET, Method::PUT])
    .allow_headers(Any);

  let mut app: Router<Arc<AppState>> = Router::new()
    .route("/api/health", get(health))
    .route("/api/assets", get(assets_get))
    .route("/api/leaderboard", get(leaderboard_get))
    .route("/api/high-score", get(high_score_get))
    .route("/api/settings", get(settings_get).put(settings_put))
    .route("/api/game", get(ws_handler));

  if let Some(dir) = &config.assets_dir {
    app = app.nest_service("/assets", ServeDir::new(dir));
  }

  let app: Router = app.layer(cors).with_state(state);

  let address = format!("0.0.0.0:{}", config.port);
  tracing::info!("listening on {address}");

  let listener = tokio::net::TcpListener::bind(&address).await?;
  axum::serve(listener, app).await?;

  Ok(())
}

fn error_response(status: StatusCode, error: &str) -> axum::response::Response {
  (
    status,
    Json(ErrorResponse {
      ok: false,
      error: error.to_string(),
    }),
  )
    .into_response()
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthResponse {
    ok: true,
    active_games: state.hosts.len(),
    asset_progress: state.assets.progress(),
  })
}

async fn assets_get(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(state.assets.as_ref().clone())
}

async fn leaderboard_get(
  State(state): State<Arc<AppState>>,
  Query(params): Query<LeaderboardQuery>,
) -> impl IntoResponse {
  let limit = params.limit.unwrap_or(LEADERBOARD_SIZE);
  match state.store.leaderboard(limit).await {
    Ok(scores) => (StatusCode::OK, Json(LeaderboardResponse { scores })).into_response(),
    Err(error) => {
      tracing::warn!(?error, "leaderboard query failed");
      error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load leaderboard")
    }
  }
}

async fn high_score_get(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HighScoreResponse {
    high_score: state.store.high_score().await,
  })
}

async fn settings_get(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(state.store.load_settings().await)
}

async fn settings_put(
  State(state): State<Arc<AppState>>,
  payload: Result<Json<GameSettings>, axum::extract::rejection::JsonRejection>,
) -> impl IntoResponse {
  let Ok(Json(settings)) = payload else {
    return error_response(StatusCode::BAD_REQUEST, "Invalid settings");
  };
  let settings = settings.sanitized();
  if let Err(error) = state.store.save_settings(&settings).await {
    tracing::warn!(?error, "settings write failed");
    return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save settings");
  }
  (StatusCode::OK, Json(settings)).into_response()
}

async fn ws_handler(
  ws: WebSocketUpgrade,
  State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
  ws.on_upgrade(move |socket| runtime::socket::handle_socket(socket, state))
}
