use crate::game::ai::BehaviorChoice;
use crate::game::services::SoundCue;
use crate::game::session::Phase;
use crate::game::types::{FrameSnapshot, Point};
use crate::settings::GameSettings;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
  #[serde(rename = "start")]
  Start {
    #[serde(rename = "aiCount")]
    ai_count: Option<usize>,
    behaviors: Option<Vec<BehaviorChoice>>,
    name: Option<String>,
  },
  #[serde(rename = "input")]
  Input {
    #[serde(rename = "turnLeft", default)]
    turn_left: bool,
    #[serde(rename = "turnRight", default)]
    turn_right: bool,
    #[serde(default)]
    boost: bool,
    /// Touch direction; when present it replaces the turn flags.
    direction: Option<Point>,
  },
  #[serde(rename = "pause")]
  Pause,
  #[serde(rename = "resume")]
  Resume,
  #[serde(rename = "restart")]
  Restart,
  #[serde(rename = "menu")]
  Menu,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
  #[serde(rename = "ready")]
  Ready {
    #[serde(rename = "highScore")]
    high_score: i64,
    settings: GameSettings,
    #[serde(rename = "assetProgress")]
    asset_progress: f64,
  },
  #[serde(rename = "frame")]
  Frame(FrameSnapshot),
  #[serde(rename = "phase")]
  Phase { phase: Phase },
  #[serde(rename = "sound")]
  Sound {
    cue: SoundCue,
    asset: &'static str,
    volume: f64,
  },
  #[serde(rename = "music")]
  Music { asset: &'static str, volume: f64 },
  #[serde(rename = "error")]
  Error { message: String },
}

pub fn decode_client_message(text: &str) -> Option<ClientMessage> {
  match serde_json::from_str::<ClientMessage>(text) {
    Ok(message) => Some(message),
    Err(error) => {
      tracing::debug!(%error, "ignoring malformed client message");
      None
    }
  }
}

pub fn encode_server_message(message: &ServerMessage) -> Option<String> {
  match serde_json::to_string(message) {
    Ok(text) => Some(text),
    Err(error) => {
      tracing::warn!(%error, "failed to encode server message");
      None
    }
  }
}
