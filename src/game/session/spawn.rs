use super::*;
use crate::game::ai::{AiController, BehaviorTag};
use crate::game::constants::{
    AI_BASE_SPEED_MAX, AI_BASE_SPEED_MIN, AI_EDGE_INSET, AI_HEAD_COLOR, AI_START_LENGTH,
    FOOD_CLEARANCE, MAX_SPAWN_ATTEMPTS, NEON_COLORS, POWER_UP_CLEARANCE, SPAWN_MARGIN,
};
use crate::game::food::FoodKind;
use crate::game::math::distance;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum AiPalette {
    /// Colors of the behavior profile, used for round-start snakes.
    Profile,
    /// A random neon body, used for respawns.
    RandomNeon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Clearance {
    Heads,
    Segments,
}

impl GameSession {
    pub(super) fn spawn_food(&mut self) {
        let pos = self.find_clear_position(FOOD_CLEARANCE, Clearance::Segments);
        let kind = FoodKind::random(&mut self.rng);
        let id = self.next_entity_id();
        self.food.push(Food::new(id, pos, kind));
    }

    pub(super) fn spawn_power_up(&mut self) {
        let pos = self.find_clear_position(POWER_UP_CLEARANCE, Clearance::Heads);
        let kind = PowerUpKind::random(&mut self.rng);
        let id = self.next_entity_id();
        self.power_ups.push(PowerUp::new(id, pos, kind));
    }

    /// Places an AI snake on a random arena edge, heading inward. Returns its id.
    pub(super) fn spawn_ai(&mut self, tag: BehaviorTag, palette: AiPalette) -> u32 {
        let (pos, heading) = self.random_edge_spawn();
        let profile = tag.profile();
        let (color, head_color) = match palette {
            AiPalette::Profile => (profile.color.to_string(), profile.head_color.to_string()),
            AiPalette::RandomNeon => {
                let color = NEON_COLORS[self.rng.gen_range(0..NEON_COLORS.len())];
                (color.to_string(), AI_HEAD_COLOR.to_string())
            }
        };
        let base_speed = self.rng.gen_range(AI_BASE_SPEED_MIN..AI_BASE_SPEED_MAX)
            * profile.speed
            * self.settings.difficulty.ai_speed_factor();
        let id = self.next_entity_id();
        self.ais.push(Snake::new(
            id,
            SnakeOptions {
                pos,
                heading,
                base_speed,
                initial_length: AI_START_LENGTH,
                color,
                head_color,
                controller: Controller::Ai(AiController::new(tag, Some(pos))),
            },
        ));
        id
    }

    fn random_edge_spawn(&mut self) -> (Point, f64) {
        let width = self.arena.width;
        let height = self.arena.height;
        let along_x = self.rng.gen_range(AI_EDGE_INSET..=(width - AI_EDGE_INSET));
        let along_y = self.rng.gen_range(AI_EDGE_INSET..=(height - AI_EDGE_INSET));
        match self.rng.gen_range(0..4) {
            0 => (Point::new(along_x, AI_EDGE_INSET), PI / 2.0),
            1 => (Point::new(width - AI_EDGE_INSET, along_y), PI),
            2 => (Point::new(along_x, height - AI_EDGE_INSET), -PI / 2.0),
            _ => (Point::new(AI_EDGE_INSET, along_y), 0.0),
        }
    }

    fn random_point(&mut self) -> Point {
        Point::new(
            self.rng
                .gen_range(SPAWN_MARGIN..=(self.arena.width - SPAWN_MARGIN)),
            self.rng
                .gen_range(SPAWN_MARGIN..=(self.arena.height - SPAWN_MARGIN)),
        )
    }

    /// Rejection sampling; after the last attempt the candidate is accepted as is.
    fn find_clear_position(&mut self, clearance: f64, check: Clearance) -> Point {
        let mut candidate = Point::default();
        for _ in 0..MAX_SPAWN_ATTEMPTS {
            candidate = self.random_point();
            if self.is_clear(candidate, clearance, check) {
                return candidate;
            }
        }
        tracing::debug!(
            x = candidate.x,
            y = candidate.y,
            clearance,
            "spawn attempts exhausted, accepting last candidate"
        );
        candidate
    }

    fn is_clear(&self, candidate: Point, clearance: f64, check: Clearance) -> bool {
        self.player
            .iter()
            .chain(self.ais.iter())
            .all(|snake| match check {
                Clearance::Heads => distance(snake.head().pos, candidate) > clearance,
                Clearance::Segments => snake
                    .segments
                    .iter()
                    .all(|segment| distance(segment.pos, candidate) > clearance),
            })
    }
}
