use super::ai::AiController;
use super::constants::{
    AI_SCORE_PER_GROWTH, BODY_CONTACT_RADIUS_WEIGHT, BODY_RADIUS, BODY_RADIUS_MAX_SHRINK,
    BODY_RADIUS_SHRINK_PER_SEGMENT, BOOST_MULTIPLIER, HEAD_RADIUS, HISTORY_CAPACITY,
    SEGMENT_SPACING, SELF_COLLISION_RADIUS_WEIGHT, SELF_COLLISION_SKIP, SPEED_POWER_UP_MULTIPLIER,
    TURN_RATE,
};
use super::math::{add, clamp, distance, normalize_angle, velocity, wrap_coordinate};
use super::power_up::{PowerUp, PowerUpKind};
use super::types::{Arena, BoundaryMode, Point, Segment, SegmentSnapshot, SnakeSnapshot};
use std::collections::{BTreeMap, VecDeque};

/// Who steers a snake: input for the player, the decision module for everyone else.
#[derive(Debug, Clone)]
pub enum Controller {
    Player,
    Ai(AiController),
}

#[derive(Debug, Clone)]
pub struct SnakeOptions {
    pub pos: Point,
    pub heading: f64,
    pub base_speed: f64,
    pub initial_length: usize,
    pub color: String,
    pub head_color: String,
    pub controller: Controller,
}

#[derive(Debug, Clone)]
pub struct Snake {
    pub id: u32,
    pub segments: Vec<Segment>,
    pub heading: f64,
    pub base_speed: f64,
    pub speed: f64,
    pub turning_rate: f64,
    pub target_length: usize,
    pub history: VecDeque<Point>,
    pub active_power_ups: BTreeMap<PowerUpKind, i64>,
    pub boosting: bool,
    pub invulnerable: bool,
    pub ghost: bool,
    pub color: String,
    pub head_color: String,
    pub controller: Controller,
}

impl Snake {
    pub fn new(id: u32, options: SnakeOptions) -> Self {
        let base_speed = options.base_speed.max(0.0);
        let mut history = VecDeque::with_capacity(HISTORY_CAPACITY);
        for _ in 0..HISTORY_CAPACITY {
            history.push_back(options.pos);
        }
        let turning_rate = match &options.controller {
            Controller::Player => TURN_RATE,
            Controller::Ai(ai) => TURN_RATE * ai.profile().turn_rate,
        };
        let mut snake = Self {
            id,
            segments: vec![Segment {
                pos: options.pos,
                radius: HEAD_RADIUS,
            }],
            heading: normalize_angle(options.heading),
            base_speed,
            speed: base_speed,
            turning_rate,
            target_length: options.initial_length.max(1),
            history,
            active_power_ups: BTreeMap::new(),
            boosting: false,
            invulnerable: false,
            ghost: false,
            color: options.color,
            head_color: options.head_color,
            controller: options.controller,
        };
        snake.extend_to_target();
        snake
    }

    pub fn head(&self) -> &Segment {
        &self.segments[0]
    }

    pub fn is_player(&self) -> bool {
        matches!(self.controller, Controller::Player)
    }

    pub fn ai(&self) -> Option<&AiController> {
        match &self.controller {
            Controller::Ai(ai) => Some(ai),
            Controller::Player => None,
        }
    }

    pub fn ai_mut(&mut self) -> Option<&mut AiController> {
        match &mut self.controller {
            Controller::Ai(ai) => Some(ai),
            Controller::Player => None,
        }
    }

    pub fn score(&self) -> i64 {
        self.ai().map(|ai| ai.score).unwrap_or(0)
    }

    /// Shielded snakes neither die nor present a solid body.
    pub fn is_protected(&self) -> bool {
        self.invulnerable || self.ghost
    }

    pub fn turn_left(&mut self) {
        self.heading = normalize_angle(self.heading - self.turning_rate);
    }

    pub fn turn_right(&mut self) {
        self.heading = normalize_angle(self.heading + self.turning_rate);
    }

    pub fn boost(&mut self) {
        self.boosting = true;
        self.recompute_speed();
    }

    pub fn normal_speed(&mut self) {
        self.boosting = false;
        self.recompute_speed();
    }

    fn recompute_speed(&mut self) {
        let mut multiplier = 1.0;
        if self.boosting {
            multiplier *= BOOST_MULTIPLIER;
        }
        if self.active_power_ups.contains_key(&PowerUpKind::Speed) {
            multiplier *= SPEED_POWER_UP_MULTIPLIER;
        }
        self.speed = self.base_speed * multiplier;
    }

    pub fn update(&mut self, arena: &Arena, now: i64) {
        self.expire_power_ups(now);

        let moved = add(self.segments[0].pos, velocity(self.heading, self.speed));
        let head = match arena.boundary {
            BoundaryMode::Wrap => Point {
                x: wrap_coordinate(moved.x, arena.width),
                y: wrap_coordinate(moved.y, arena.height),
            },
            BoundaryMode::Walls => Point {
                x: clamp(moved.x, 0.0, arena.width),
                y: clamp(moved.y, 0.0, arena.height),
            },
        };

        self.history.push_front(head);
        while self.history.len() > HISTORY_CAPACITY {
            self.history.pop_back();
        }
        self.segments[0].pos = head;

        for index in 1..self.segments.len() {
            self.segments[index].pos = self.trail_position(index);
        }

        self.grow(0);
    }

    fn trail_position(&self, index: usize) -> Point {
        let history_index = (index * SEGMENT_SPACING).min(self.history.len().saturating_sub(1));
        self.history
            .get(history_index)
            .copied()
            .unwrap_or(self.segments[0].pos)
    }

    pub fn grow(&mut self, amount: usize) {
        self.target_length += amount;
        if let Some(ai) = self.ai_mut() {
            ai.score += amount as i64 * AI_SCORE_PER_GROWTH;
        }
        self.extend_to_target();
    }

    fn extend_to_target(&mut self) {
        while self.segments.len() < self.target_length {
            let index = self.segments.len();
            let shrink = (index as f64 * BODY_RADIUS_SHRINK_PER_SEGMENT).min(BODY_RADIUS_MAX_SHRINK);
            let pos = self.trail_position(index);
            self.segments.push(Segment {
                pos,
                radius: BODY_RADIUS - shrink,
            });
        }
    }

    pub fn check_self_collision(&self) -> bool {
        if self.is_protected() {
            return false;
        }
        let head = self.head();
        self.segments.iter().skip(SELF_COLLISION_SKIP).any(|segment| {
            distance(head.pos, segment.pos)
                < head.radius + segment.radius * SELF_COLLISION_RADIUS_WEIGHT
        })
    }

    /// Tests an outside point (usually another head) against this body, head excluded.
    pub fn check_collision_with_point(&self, point: Point, radius: f64) -> bool {
        if self.is_protected() {
            return false;
        }
        self.segments.iter().skip(1).any(|segment| {
            distance(point, segment.pos) < radius + segment.radius * BODY_CONTACT_RADIUS_WEIGHT
        })
    }

    pub fn collect_power_up(&mut self, power_up: &PowerUp, now: i64) {
        self.active_power_ups
            .insert(power_up.kind, now + power_up.duration_ms);
        self.apply_effect(power_up.kind);
    }

    fn apply_effect(&mut self, kind: PowerUpKind) {
        match kind {
            PowerUpKind::Speed => self.recompute_speed(),
            PowerUpKind::Invulnerability => self.invulnerable = true,
            PowerUpKind::Ghost => self.ghost = true,
        }
    }

    fn revert_effect(&mut self, kind: PowerUpKind) {
        match kind {
            PowerUpKind::Speed => self.recompute_speed(),
            PowerUpKind::Invulnerability => self.invulnerable = false,
            PowerUpKind::Ghost => self.ghost = false,
        }
    }

    pub fn expire_power_ups(&mut self, now: i64) {
        let expired: Vec<PowerUpKind> = self
            .active_power_ups
            .iter()
            .filter(|(_, expires_at)| now >= **expires_at)
            .map(|(kind, _)| *kind)
            .collect();
        for kind in expired {
            self.active_power_ups.remove(&kind);
            self.revert_effect(kind);
        }
    }

    pub fn power_up_remaining_ms(&self, kind: PowerUpKind, now: i64) -> Option<i64> {
        self.active_power_ups
            .get(&kind)
            .map(|expires_at| expires_at - now)
            .filter(|remaining| *remaining > 0)
    }

    pub fn snapshot(&self) -> SnakeSnapshot {
        SnakeSnapshot {
            id: self.id,
            is_player: self.is_player(),
            behavior: self.ai().map(|ai| ai.behavior),
            color: self.color.clone(),
            head_color: self.head_color.clone(),
            heading: self.heading,
            invulnerable: self.invulnerable,
            ghost: self.ghost,
            segments: self
                .segments
                .iter()
                .map(|segment| SegmentSnapshot {
                    x: segment.pos.x,
                    y: segment.pos.y,
                    radius: segment.radius,
                })
                .collect(),
        }
    }
}
