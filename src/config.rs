use crate::assets::AssetSource;
use crate::game::constants::FRAME_MS;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8787;
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = FRAME_MS as u64;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub database_url: String,
    pub assets_dir: Option<PathBuf>,
    pub frame_interval: Duration,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let database_url = lookup("DATABASE_URL")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| {
                let base = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
                let default_path = base.join("data").join("neon-snake.db");
                format!("sqlite://{}", default_path.display())
            });
        let assets_dir = lookup("ASSETS_DIR")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        let frame_interval_ms = lookup("FRAME_INTERVAL_MS")
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(DEFAULT_FRAME_INTERVAL_MS);
        Self {
            port,
            database_url,
            assets_dir,
            frame_interval: Duration::from_millis(frame_interval_ms),
        }
    }

    pub fn asset_source(&self) -> AssetSource {
        match &self.assets_dir {
            Some(dir) => AssetSource::Directory(dir.clone()),
            None => AssetSource::Placeholders,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config(&[]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.database_url.starts_with("sqlite://"));
        assert!(config.database_url.ends_with("neon-snake.db"));
        assert!(config.assets_dir.is_none());
        assert_eq!(config.frame_interval, Duration::from_millis(16));
        assert!(matches!(config.asset_source(), AssetSource::Placeholders));
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = config(&[("PORT", "http"), ("FRAME_INTERVAL_MS", "0"), ("ASSETS_DIR", " ")]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.frame_interval, Duration::from_millis(16));
        assert!(config.assets_dir.is_none());
    }

    #[test]
    fn explicit_values_win() {
        let config = config(&[
            ("PORT", "9000"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("ASSETS_DIR", "/srv/assets"),
        ]);
        assert_eq!(config.port, 9000);
        assert_eq!(config.database_url, "sqlite::memory:");
        assert!(matches!(config.asset_source(), AssetSource::Directory(_)));
    }
}
