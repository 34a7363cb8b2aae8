use super::*;
use crate::game::constants::AI_KILL_BONUS;
use crate::game::math::circles_touch;
use crate::game::particles::{AI_FOOD_BURST, DEATH_BURST, FOOD_BURST, POWER_UP_BURST};

impl GameSession {
    /// Food, then snake contacts, then power-ups, then remains.
    pub(super) fn resolve_collisions(&mut self, now: i64) {
        self.resolve_food();
        self.resolve_snake_contacts(now);
        if self.phase != Phase::Playing {
            return;
        }
        self.resolve_power_ups();
        self.resolve_remains();
    }

    fn resolve_food(&mut self) {
        for eater in self.live_snakes() {
            let mut index = 0;
            while index < self.food.len() {
                let Some(snake) = self.snake_mut(eater) else { break };
                let head = *snake.head();
                let food = &self.food[index];
                if circles_touch(head.pos, head.radius, food.pos, food.radius) {
                    let food = self.food.remove(index);
                    self.eat_food(eater, food);
                } else {
                    index += 1;
                }
            }
        }
    }

    fn eat_food(&mut self, eater: SnakeRef, food: Food) {
        let Some(snake) = self.snake_mut(eater) else { return };
        snake.grow(food.value);
        let color = snake.color.clone();
        match eater {
            SnakeRef::Player => {
                self.award_food(food.value);
                self.burst(food.pos, food.color, FOOD_BURST);
            }
            SnakeRef::Ai(_) => self.burst(food.pos, &color, AI_FOOD_BURST),
        }
        self.spawn_food();
        self.play(SoundCue::Collect);
    }

    fn resolve_snake_contacts(&mut self, now: i64) {
        if let Some(player) = self.player.as_ref() {
            let head = *player.head();
            let hit_body = !player.is_protected()
                && self
                    .ais
                    .iter()
                    .any(|ai| ai.check_collision_with_point(head.pos, head.radius));
            if player.check_self_collision() || hit_body {
                tracing::debug!(player_id = player.id, hit_body, "player died");
                self.game_over();
                return;
            }
        }

        let mut doomed: Vec<(usize, bool)> = Vec::new();
        for (index, snake) in self.ais.iter().enumerate() {
            if snake.is_protected() {
                continue;
            }
            if snake.check_self_collision() {
                doomed.push((index, false));
                continue;
            }
            let head = *snake.head();
            let on_player = self
                .player
                .as_ref()
                .is_some_and(|player| player.check_collision_with_point(head.pos, head.radius));
            if on_player {
                doomed.push((index, true));
                continue;
            }
            for (other_index, other) in self.ais.iter().enumerate() {
                if other_index == index {
                    continue;
                }
                if other.check_collision_with_point(head.pos, head.radius) {
                    doomed.push((index, false));
                    break;
                }
            }
        }

        for (index, killed_by_player) in doomed.into_iter().rev() {
            self.destroy_ai(index, killed_by_player, now);
        }
    }

    /// Removes an AI snake, leaves remains worth its score, and schedules a replacement.
    pub(super) fn destroy_ai(&mut self, index: usize, killed_by_player: bool, now: i64) {
        if index >= self.ais.len() {
            return;
        }
        let snake = self.ais.remove(index);
        let origin = snake.head().pos;
        let score = snake.score();
        self.burst(origin, &snake.color, DEATH_BURST);
        let remains_id = self.next_entity_id();
        self.remains.push(Remains::new(
            remains_id,
            origin,
            snake.color.clone(),
            score,
            self.clock_ms,
        ));
        self.play(SoundCue::Collision);
        if killed_by_player {
            self.award(AI_KILL_BONUS);
        }
        self.deferred
            .schedule(now, AI_RESPAWN_DELAY_MS, DeferredAction::RespawnAi);
        tracing::debug!(
            snake_id = snake.id,
            behavior = ?snake.ai().map(|ai| ai.behavior),
            score,
            killed_by_player,
            pending_respawns = self.deferred.len(),
            "ai snake destroyed"
        );
    }

    fn resolve_power_ups(&mut self) {
        let clock = self.clock_ms;
        for collector in self.live_snakes() {
            let mut index = 0;
            while index < self.power_ups.len() {
                let Some(snake) = self.snake_mut(collector) else { break };
                let head = *snake.head();
                let power_up = &self.power_ups[index];
                if !circles_touch(head.pos, head.radius, power_up.pos, power_up.radius) {
                    index += 1;
                    continue;
                }
                let power_up = self.power_ups.remove(index);
                if let Some(snake) = self.snake_mut(collector) {
                    snake.collect_power_up(&power_up, clock);
                }
                self.burst(power_up.pos, power_up.kind.color(), POWER_UP_BURST);
                self.play(SoundCue::PowerUp);
            }
        }
    }

    /// Remains are eaten by the player only.
    fn resolve_remains(&mut self) {
        let Some(player) = self.player.as_ref() else { return };
        let head = *player.head();
        let mut index = 0;
        while index < self.remains.len() {
            let remains = &self.remains[index];
            if !circles_touch(head.pos, head.radius, remains.pos, remains.radius) {
                index += 1;
                continue;
            }
            let remains = self.remains.remove(index);
            if let Some(player) = self.player.as_mut() {
                player.grow(remains.growth());
            }
            self.award(remains.score_value);
            self.burst(remains.pos, &remains.color, FOOD_BURST);
            self.play(SoundCue::Collect);
        }
    }
}
