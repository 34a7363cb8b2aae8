use crate::game::services::{GameRecord, ScoreSink};
use crate::settings::{GameSettings, SETTINGS_KEY};
use crate::shared::names::sanitize_player_name;
use anyhow::Context;
use serde::Serialize;
use sqlx::{sqlite::SqlitePoolOptions, Row, SqlitePool};
use std::path::PathBuf;
use tokio::sync::mpsc;

pub const HIGH_SCORE_KEY: &str = "snakeHighScore";
pub const LEADERBOARD_SIZE: i64 = 10;
const MAX_LEADERBOARD_LIMIT: i64 = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    #[serde(rename = "playerName")]
    pub player_name: String,
    pub score: i64,
    #[serde(rename = "aiCount")]
    pub ai_count: i64,
    #[serde(rename = "gameTime")]
    pub game_time: i64,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
}

/// Key-value bag plus the leaderboard table.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        ensure_db_dir(database_url)?;
        let in_memory = database_url.contains(":memory:");
        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { 5 })
            .connect(database_url)
            .await
            .with_context(|| format!("failed to open database {database_url}"))?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run migrations")?;
        Ok(Self { pool })
    }

    pub async fn get_value(&self, key: &str) -> anyhow::Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM kv WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to read {key}"))?;
        match row {
            Some(row) => Ok(Some(row.try_get("value")?)),
            None => Ok(None),
        }
    }

    pub async fn set_value(&self, key: &str, value: &str) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO kv (key, value) VALUES (?, ?) ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to write {key}"))?;
        Ok(())
    }

    /// Unreadable or corrupt settings are treated as absent.
    pub async fn load_settings(&self) -> GameSettings {
        match self.get_value(SETTINGS_KEY).await {
            Ok(Some(raw)) => GameSettings::from_json(&raw),
            Ok(None) => GameSettings::default(),
            Err(error) => {
                tracing::warn!(?error, "failed to load settings, using defaults");
                GameSettings::default()
            }
        }
    }

    pub async fn save_settings(&self, settings: &GameSettings) -> anyhow::Result<()> {
        let raw = serde_json::to_string(settings).context("failed to encode settings")?;
        self.set_value(SETTINGS_KEY, &raw).await
    }

    pub async fn high_score(&self) -> i64 {
        let raw = match self.get_value(HIGH_SCORE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return 0,
            Err(error) => {
                tracing::warn!(?error, "failed to load high score");
                return 0;
            }
        };
        match raw.trim().parse::<i64>() {
            Ok(score) if score >= 0 => score,
            _ => {
                tracing::warn!(raw, "stored high score unreadable, treating as absent");
                0
            }
        }
    }

    /// Only ever raises the stored record; a lower score from a stale session is ignored.
    pub async fn set_high_score(&self, score: i64) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO kv (key, value) VALUES (?, ?) ON CONFLICT(key) DO UPDATE SET value = \
             CAST(MAX(CAST(kv.value AS INTEGER), CAST(excluded.value AS INTEGER)) AS TEXT)",
        )
        .bind(HIGH_SCORE_KEY)
        .bind(score.max(0).to_string())
        .execute(&self.pool)
        .await
        .context("failed to write high score")?;
        Ok(())
    }

    pub async fn record_game(&self, record: &GameRecord, created_at: i64) -> anyhow::Result<()> {
        let name = sanitize_player_name(&record.player_name, "Player");
        sqlx::query(
            "INSERT INTO scores (id, name, score, ai_count, game_time, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(name)
        .bind(record.score.max(0))
        .bind(record.ai_count as i64)
        .bind(record.game_time_secs.max(0))
        .bind(created_at)
        .execute(&self.pool)
        .await
        .context("failed to record game")?;
        Ok(())
    }

    pub async fn leaderboard(&self, limit: i64) -> anyhow::Result<Vec<LeaderboardEntry>> {
        let rows = sqlx::query(
            "SELECT name, score, ai_count, game_time, created_at FROM scores ORDER BY score DESC, created_at ASC LIMIT ?",
        )
        .bind(limit.clamp(1, MAX_LEADERBOARD_LIMIT))
        .fetch_all(&self.pool)
        .await
        .context("failed to load leaderboard")?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                Some(LeaderboardEntry {
                    player_name: row.try_get("name").ok()?,
                    score: row.try_get("score").ok()?,
                    ai_count: row.try_get("ai_count").ok()?,
                    game_time: row.try_get("game_time").ok()?,
                    created_at: row.try_get("created_at").ok()?,
                })
            })
            .collect())
    }
}

fn ensure_db_dir(database_url: &str) -> anyhow::Result<()> {
    if database_url.contains(":memory:") {
        return Ok(());
    }
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"));
    let Some(path) = path else { return Ok(()) };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Ok(());
    }
    let db_path = PathBuf::from(path);
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    if !db_path.exists() {
        std::fs::File::create(&db_path)
            .with_context(|| format!("failed to create {}", db_path.display()))?;
    }
    Ok(())
}

#[derive(Debug)]
pub enum StoreCommand {
    HighScore(i64),
    Game(GameRecord),
}

/// Drains score writes from game sessions so the frame loop never waits on the database.
pub fn spawn_writer(store: Store) -> mpsc::UnboundedSender<StoreCommand> {
    let (tx, mut rx) = mpsc::unbounded_channel::<StoreCommand>();
    tokio::spawn(async move {
        while let Some(command) = rx.recv().await {
            let result = match &command {
                StoreCommand::HighScore(score) => store.set_high_score(*score).await,
                StoreCommand::Game(record) => store.record_game(record, crate::runtime::now_millis()).await,
            };
            if let Err(error) = result {
                tracing::warn!(?error, ?command, "store write failed");
            }
        }
    });
    tx
}

/// Score sink handed to a session: cached high score in, writes out through the writer task.
#[derive(Debug)]
pub struct StoreScores {
    high_score: i64,
    commands: mpsc::UnboundedSender<StoreCommand>,
}

impl StoreScores {
    pub fn new(high_score: i64, commands: mpsc::UnboundedSender<StoreCommand>) -> Self {
        Self {
            high_score,
            commands,
        }
    }
}

impl ScoreSink for StoreScores {
    fn high_score(&self) -> i64 {
        self.high_score
    }

    fn record_high_score(&mut self, score: i64) {
        self.high_score = self.high_score.max(score);
        if self.commands.send(StoreCommand::HighScore(score)).is_err() {
            tracing::warn!(score, "store writer gone, high score not saved");
        }
    }

    fn record_game(&mut self, record: GameRecord) {
        if self.commands.send(StoreCommand::Game(record)).is_err() {
            tracing::warn!("store writer gone, game not recorded");
        }
    }
}
