use super::ai::BehaviorTag;
use super::food::FoodKind;
use super::power_up::PowerUpKind;
use super::session::Phase;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
  pub x: f64,
  pub y: f64,
}

impl Point {
  pub const fn new(x: f64, y: f64) -> Self {
    Self { x, y }
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
  pub pos: Point,
  pub radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryMode {
  Wrap,
  Walls,
}

#[derive(Debug, Clone, Copy)]
pub struct Arena {
  pub width: f64,
  pub height: f64,
  pub boundary: BoundaryMode,
}

#[derive(Debug, Clone, Serialize)]
pub struct SegmentSnapshot {
  pub x: f64,
  pub y: f64,
  pub radius: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SnakeSnapshot {
  pub id: u32,
  #[serde(rename = "isPlayer")]
  pub is_player: bool,
  pub behavior: Option<BehaviorTag>,
  pub color: String,
  #[serde(rename = "headColor")]
  pub head_color: String,
  pub heading: f64,
  pub invulnerable: bool,
  pub ghost: bool,
  pub segments: Vec<SegmentSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FoodSnapshot {
  pub id: u32,
  pub x: f64,
  pub y: f64,
  pub radius: f64,
  pub color: &'static str,
  pub kind: FoodKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct PowerUpSnapshot {
  pub id: u32,
  pub x: f64,
  pub y: f64,
  pub radius: f64,
  pub kind: PowerUpKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct RemainsSnapshot {
  pub id: u32,
  pub x: f64,
  pub y: f64,
  pub radius: f64,
  pub color: String,
  #[serde(rename = "scoreValue")]
  pub score_value: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticleSnapshot {
  pub x: f64,
  pub y: f64,
  pub alpha: f64,
  pub color: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivePowerUp {
  pub kind: PowerUpKind,
  #[serde(rename = "secondsLeft")]
  pub seconds_left: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AiScore {
  pub id: u32,
  pub behavior: BehaviorTag,
  pub color: String,
  pub score: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Hud {
  pub score: i64,
  #[serde(rename = "highScore")]
  pub high_score: i64,
  #[serde(rename = "activePowerUps")]
  pub active_power_ups: Vec<ActivePowerUp>,
  #[serde(rename = "aiScores")]
  pub ai_scores: Vec<AiScore>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot {
  pub phase: Phase,
  pub width: f64,
  pub height: f64,
  pub snakes: Vec<SnakeSnapshot>,
  pub food: Vec<FoodSnapshot>,
  #[serde(rename = "powerUps")]
  pub power_ups: Vec<PowerUpSnapshot>,
  pub remains: Vec<RemainsSnapshot>,
  pub particles: Vec<ParticleSnapshot>,
  pub hud: Hud,
}
