use serde::{Deserialize, Serialize};

pub const SETTINGS_KEY: &str = "snakeGameSettings";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    #[serde(alias = "normal")]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn ai_speed_factor(self) -> f64 {
        match self {
            Difficulty::Easy => 0.8,
            Difficulty::Medium => 1.0,
            Difficulty::Hard => 1.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    #[serde(rename = "soundEnabled")]
    pub sound_enabled: bool,
    #[serde(rename = "musicVolume")]
    pub music_volume: f64,
    #[serde(rename = "sfxVolume")]
    pub sfx_volume: f64,
    pub difficulty: Difficulty,
    #[serde(rename = "periodicBoundaries")]
    pub periodic_boundaries: bool,
    /// Client-side preference; stored and echoed back, never read by the simulation.
    #[serde(rename = "touchControls")]
    pub touch_controls: bool,
    #[serde(rename = "particleEffects")]
    pub particle_effects: bool,
    /// Client-side preference, like `touch_controls`.
    #[serde(rename = "screenShake")]
    pub screen_shake: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            music_volume: 0.7,
            sfx_volume: 1.0,
            difficulty: Difficulty::Medium,
            periodic_boundaries: true,
            touch_controls: false,
            particle_effects: true,
            screen_shake: true,
        }
    }
}

impl GameSettings {
    /// Missing fields fall back individually; unreadable data falls back wholesale.
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<GameSettings>(raw) {
            Ok(settings) => settings.sanitized(),
            Err(error) => {
                tracing::warn!(%error, "stored settings unreadable, using defaults");
                Self::default()
            }
        }
    }

    pub fn sanitized(mut self) -> Self {
        self.music_volume = sanitize_volume(self.music_volume, 0.7);
        self.sfx_volume = sanitize_volume(self.sfx_volume, 1.0);
        self
    }
}

fn sanitize_volume(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        fallback
    }
}
