use super::ai::{self, BehaviorChoice, WorldView};
use super::constants::{
  AI_RESPAWN_DELAY_MS, ARENA_HEIGHT, ARENA_WIDTH, DEFAULT_AI_COUNT, FOOD_SCORE_PER_VALUE,
  FOOD_TOP_UP_MAX_MS, FOOD_TOP_UP_MIN_MS, INITIAL_FOOD, MAX_AI_COUNT, MAX_FRAME_DELTA_MS,
  MAX_FOOD, MIN_FOOD, PLAYER_BASE_SPEED, PLAYER_COLOR, PLAYER_HEAD_COLOR, PLAYER_START_LENGTH,
  POWER_UP_MAX_COUNT, POWER_UP_ROLL_INTERVAL_MS, POWER_UP_SPAWN_CHANCE,
};
use super::food::{Food, Remains};
use super::input::InputState;
use super::particles::{BurstSpec, ParticleBurst, GAME_OVER_BURST};
use super::power_up::{PowerUp, PowerUpKind};
use super::services::{GameRecord, Services, SoundCue};
use super::snake::{Controller, Snake, SnakeOptions};
use super::timers::DeferredQueue;
use super::types::{
  ActivePowerUp, AiScore, Arena, BoundaryMode, FoodSnapshot, FrameSnapshot, Hud, Point,
  PowerUpSnapshot, RemainsSnapshot,
};
use crate::settings::GameSettings;
use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;
use std::f64::consts::PI;

mod collision;
mod spawn;

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
  Menu,
  Playing,
  Paused,
  GameOver,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
  pub ai_count: usize,
  /// One entry per AI slot; missing slots behave as `mixed`.
  pub behaviors: Vec<BehaviorChoice>,
  pub player_name: String,
}

impl Default for GameConfig {
  fn default() -> Self {
    Self {
      ai_count: DEFAULT_AI_COUNT,
      behaviors: Vec::new(),
      player_name: "Player".to_string(),
    }
  }
}

impl GameConfig {
  pub fn sanitized(mut self) -> Self {
    self.ai_count = self.ai_count.clamp(1, MAX_AI_COUNT);
    self.behaviors.truncate(self.ai_count);
    self
  }

  fn behavior_for_slot(&self, slot: usize) -> BehaviorChoice {
    self
      .behaviors
      .get(slot)
      .copied()
      .unwrap_or(BehaviorChoice::Mixed)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeferredAction {
  RespawnAi,
}

/// Which live snake an interaction refers to. AI indices are only valid
/// until the next removal from `ais`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SnakeRef {
  Player,
  Ai(usize),
}

/// One single-player game: owns every live collection and advances them a frame at a time.
pub struct GameSession {
  settings: GameSettings,
  config: GameConfig,
  arena: Arena,
  services: Services,
  rng: StdRng,
  phase: Phase,
  next_id: u32,
  player: Option<Snake>,
  ais: Vec<Snake>,
  food: Vec<Food>,
  power_ups: Vec<PowerUp>,
  remains: Vec<Remains>,
  bursts: Vec<ParticleBurst>,
  score: i64,
  high_score: i64,
  hud: Hud,
  deferred: DeferredQueue<DeferredAction>,
  clock_ms: i64,
  last_tick_at: Option<i64>,
  next_food_top_up_at: i64,
  next_power_up_roll_at: i64,
}

impl GameSession {
  pub fn new(settings: GameSettings, services: Services, rng: StdRng) -> Self {
    let arena = Arena {
      width: ARENA_WIDTH,
      height: ARENA_HEIGHT,
      boundary: if settings.periodic_boundaries {
        BoundaryMode::Wrap
      } else {
        BoundaryMode::Walls
      },
    };
    let high_score = services.scores.high_score();
    Self {
      settings,
      config: GameConfig::default(),
      arena,
      services,
      rng,
      phase: Phase::Menu,
      next_id: 1,
      player: None,
      ais: Vec::new(),
      food: Vec::new(),
      power_ups: Vec::new(),
      remains: Vec::new(),
      bursts: Vec::new(),
      score: 0,
      high_score,
      hud: Hud {
        high_score,
        ..Hud::default()
      },
      deferred: DeferredQueue::default(),
      clock_ms: 0,
      last_tick_at: None,
      next_food_top_up_at: 0,
      next_power_up_roll_at: 0,
    }
  }

  pub fn phase(&self) -> Phase {
    self.phase
  }

  pub fn score(&self) -> i64 {
    self.score
  }

  pub fn high_score(&self) -> i64 {
    self.high_score
  }

  pub fn settings(&self) -> &GameSettings {
    &self.settings
  }

  pub fn player_heading(&self) -> Option<f64> {
    self.player.as_ref().map(|player| player.heading)
  }

  /// Menu or game over into a fresh round. Returns false when not allowed from the current phase.
  pub fn start(&mut self, config: GameConfig, now: i64) -> bool {
    if !matches!(self.phase, Phase::Menu | Phase::GameOver) {
      return false;
    }
    self.config = config.sanitized();
    self.reset_round(now);
    tracing::debug!(
      ai_count = self.config.ai_count,
      difficulty = ?self.settings.difficulty,
      "round started"
    );
    true
  }

  pub fn restart(&mut self, now: i64) -> bool {
    if self.phase != Phase::GameOver {
      return false;
    }
    self.reset_round(now);
    tracing::debug!("round restarted");
    true
  }

  pub fn pause(&mut self) -> bool {
    if self.phase != Phase::Playing {
      return false;
    }
    self.phase = Phase::Paused;
    self.deferred.invalidate();
    self.last_tick_at = None;
    tracing::debug!(clock_ms = self.clock_ms, timer_epoch = self.deferred.epoch(), "round paused");
    true
  }

  pub fn resume(&mut self, now: i64) -> bool {
    if self.phase != Phase::Paused {
      return false;
    }
    self.phase = Phase::Playing;
    self.last_tick_at = Some(now);
    let missing = self.config.ai_count.saturating_sub(self.ais.len());
    for _ in 0..missing {
      self
        .deferred
        .schedule(now, AI_RESPAWN_DELAY_MS, DeferredAction::RespawnAi);
    }
    tracing::debug!(missing_ai = missing, "round resumed");
    true
  }

  pub fn return_to_menu(&mut self) -> bool {
    if self.phase == Phase::Menu {
      return false;
    }
    self.phase = Phase::Menu;
    self.deferred.invalidate();
    self.clear_world();
    self.last_tick_at = None;
    tracing::debug!("returned to menu");
    true
  }

  fn reset_round(&mut self, now: i64) {
    self.deferred.invalidate();
    self.clear_world();
    self.score = 0;
    self.high_score = self.high_score.max(self.services.scores.high_score());
    self.clock_ms = 0;
    self.last_tick_at = Some(now);
    self.next_food_top_up_at = self.roll_food_top_up_delay();
    self.next_power_up_roll_at = POWER_UP_ROLL_INTERVAL_MS;

    let player_id = self.next_entity_id();
    self.player = Some(Snake::new(
      player_id,
      SnakeOptions {
        pos: Point::new(self.arena.width / 2.0, self.arena.height / 2.0),
        heading: -PI / 2.0,
        base_speed: PLAYER_BASE_SPEED,
        initial_length: PLAYER_START_LENGTH,
        color: PLAYER_COLOR.to_string(),
        head_color: PLAYER_HEAD_COLOR.to_string(),
        controller: Controller::Player,
      },
    ));

    for slot in 0..self.config.ai_count {
      let tag = self.config.behavior_for_slot(slot).resolve(&mut self.rng);
      self.spawn_ai(tag, spawn::AiPalette::Profile);
    }
    for _ in 0..INITIAL_FOOD {
      self.spawn_food();
    }

    self.phase = Phase::Playing;
    self.refresh_hud();
    if self.settings.sound_enabled {
      self.services.audio.play_music();
    }
  }

  fn clear_world(&mut self) {
    self.player = None;
    self.ais.clear();
    self.food.clear();
    self.power_ups.clear();
    self.remains.clear();
    self.bursts.clear();
  }

  /// Advances one frame. Returns the render handoff, or `None` when not playing.
  pub fn tick(&mut self, now: i64, input: InputState) -> Option<FrameSnapshot> {
    if self.phase != Phase::Playing {
      return None;
    }
    let delta = self
      .last_tick_at
      .map(|last| (now - last).clamp(0, MAX_FRAME_DELTA_MS))
      .unwrap_or(0);
    self.last_tick_at = Some(now);
    self.clock_ms += delta;

    self.fire_deferred(now);
    self.replenish();
    self.apply_input(input);
    self.update_entities();
    let frame = self.snapshot();
    self.resolve_collisions(now);
    if self.phase == Phase::Playing {
      self.steer_ais();
    }
    self.prune();
    self.refresh_hud();
    Some(frame)
  }

  fn fire_deferred(&mut self, now: i64) {
    for action in self.deferred.drain_due(now) {
      if self.phase != Phase::Playing {
        break;
      }
      match action {
        DeferredAction::RespawnAi => {
          if self.ais.len() >= self.config.ai_count {
            continue;
          }
          let tag = ai::BehaviorTag::random(&mut self.rng);
          let id = self.spawn_ai(tag, spawn::AiPalette::RandomNeon);
          tracing::debug!(snake_id = id, behavior = ?tag, "ai snake respawned");
        }
      }
    }
  }

  fn replenish(&mut self) {
    while self.food.len() < MIN_FOOD {
      self.spawn_food();
    }
    if self.clock_ms >= self.next_food_top_up_at {
      if self.food.len() < MAX_FOOD {
        self.spawn_food();
      }
      self.next_food_top_up_at = self.clock_ms + self.roll_food_top_up_delay();
    }
    if self.clock_ms >= self.next_power_up_roll_at {
      if self.power_ups.len() < POWER_UP_MAX_COUNT && self.rng.gen_bool(POWER_UP_SPAWN_CHANCE) {
        self.spawn_power_up();
      }
      self.next_power_up_roll_at = self.clock_ms + POWER_UP_ROLL_INTERVAL_MS;
    }
  }

  fn roll_food_top_up_delay(&mut self) -> i64 {
    self.rng.gen_range(FOOD_TOP_UP_MIN_MS..=FOOD_TOP_UP_MAX_MS)
  }

  fn apply_input(&mut self, input: InputState) {
    let Some(player) = self.player.as_mut() else { return };
    if input.turn_left {
      player.turn_left();
    }
    if input.turn_right {
      player.turn_right();
    }
    if input.boost {
      player.boost();
    } else {
      player.normal_speed();
    }
  }

  fn update_entities(&mut self) {
    let arena = self.arena;
    let clock = self.clock_ms;
    if let Some(player) = self.player.as_mut() {
      player.update(&arena, clock);
    }
    for snake in &mut self.ais {
      snake.update(&arena, clock);
    }
    for burst in &mut self.bursts {
      burst.update();
    }
  }

  fn steer_ais(&mut self) {
    let heads: Vec<(u32, Point)> = self
      .player
      .iter()
      .chain(self.ais.iter())
      .map(|snake| (snake.id, snake.head().pos))
      .collect();
    let view = WorldView {
      food: &self.food,
      power_ups: &self.power_ups,
      heads: &heads,
    };
    for snake in &mut self.ais {
      ai::steer(snake, &view);
    }
  }

  fn prune(&mut self) {
    self.bursts.retain(|burst| !burst.is_dead());
    let clock = self.clock_ms;
    self.remains.retain(|remains| !remains.is_expired(clock));
  }

  fn refresh_hud(&mut self) {
    let clock = self.clock_ms;
    let active_power_ups: Vec<ActivePowerUp> = self
      .player
      .as_ref()
      .map(|player| {
        PowerUpKind::ALL
          .iter()
          .filter_map(|kind| {
            player
              .power_up_remaining_ms(*kind, clock)
              .map(|remaining| ActivePowerUp {
                kind: *kind,
                seconds_left: (remaining + 999) / 1000,
              })
          })
          .collect()
      })
      .unwrap_or_default();
    let ai_scores: Vec<AiScore> = self
      .ais
      .iter()
      .filter_map(|snake| {
        snake.ai().map(|ai| AiScore {
          id: snake.id,
          behavior: ai.behavior,
          color: snake.color.clone(),
          score: ai.score,
        })
      })
      .collect();
    self.hud = Hud {
      score: self.score,
      high_score: self.high_score,
      active_power_ups,
      ai_scores,
    };
  }

  pub fn snapshot(&self) -> FrameSnapshot {
    let mut particles = Vec::new();
    for burst in &self.bursts {
      burst.snapshot(&mut particles);
    }
    FrameSnapshot {
      phase: self.phase,
      width: self.arena.width,
      height: self.arena.height,
      snakes: self
        .player
        .iter()
        .chain(self.ais.iter())
        .map(Snake::snapshot)
        .collect(),
      food: self
        .food
        .iter()
        .map(|food| FoodSnapshot {
          id: food.id,
          x: food.pos.x,
          y: food.pos.y,
          radius: food.radius,
          color: food.color,
          kind: food.kind,
        })
        .collect(),
      power_ups: self
        .power_ups
        .iter()
        .map(|power_up| PowerUpSnapshot {
          id: power_up.id,
          x: power_up.pos.x,
          y: power_up.pos.y,
          radius: power_up.radius,
          kind: power_up.kind,
        })
        .collect(),
      remains: self
        .remains
        .iter()
        .map(|remains| RemainsSnapshot {
          id: remains.id,
          x: remains.pos.x,
          y: remains.pos.y,
          radius: remains.radius,
          color: remains.color.clone(),
          score_value: remains.score_value,
        })
        .collect(),
      particles,
      hud: self.hud.clone(),
    }
  }

  fn game_over(&mut self) {
    self.phase = Phase::GameOver;
    self.deferred.invalidate();
    self.last_tick_at = None;
    if let Some(player) = self.player.take() {
      let origin = player.head().pos;
      self.burst(origin, &player.color, GAME_OVER_BURST);
    }
    self.play(SoundCue::GameOver);
    let record = GameRecord {
      player_name: self.config.player_name.clone(),
      score: self.score,
      ai_count: self.config.ai_count,
      game_time_secs: self.clock_ms / 1000,
    };
    tracing::debug!(score = record.score, game_time_secs = record.game_time_secs, "game over");
    self.services.scores.record_game(record);
  }

  fn award(&mut self, points: i64) {
    self.score += points;
    if self.score > self.high_score {
      self.high_score = self.score;
      self.services.scores.record_high_score(self.score);
    }
  }

  fn award_food(&mut self, value: usize) {
    self.award(value as i64 * FOOD_SCORE_PER_VALUE);
  }

  fn burst(&mut self, origin: Point, color: &str, spec: BurstSpec) {
    if !self.settings.particle_effects {
      return;
    }
    self
      .bursts
      .push(ParticleBurst::new(&mut self.rng, origin, color, spec));
  }

  fn play(&mut self, cue: SoundCue) {
    if self.settings.sound_enabled {
      self.services.audio.play(cue);
    }
  }

  fn next_entity_id(&mut self) -> u32 {
    let id = self.next_id;
    self.next_id = self.next_id.wrapping_add(1).max(1);
    id
  }

  fn snake_mut(&mut self, target: SnakeRef) -> Option<&mut Snake> {
    match target {
      SnakeRef::Player => self.player.as_mut(),
      SnakeRef::Ai(index) => self.ais.get_mut(index),
    }
  }

  fn live_snakes(&self) -> Vec<SnakeRef> {
    let mut refs = Vec::with_capacity(self.ais.len() + 1);
    if self.player.is_some() {
      refs.push(SnakeRef::Player);
    }
    refs.extend((0..self.ais.len()).map(SnakeRef::Ai));
    refs
  }
}
