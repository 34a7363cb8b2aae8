use super::constants::{
    AI_AVOID_RADIUS, AI_BOOST_DISTANCE, AI_HUNT_RADIUS, AI_HUNT_THRESHOLD, AI_POWER_UP_ATTRACTION,
    AI_TURN_DEADBAND,
};
use super::food::Food;
use super::math::{add, angle_delta, bearing, distance, sub};
use super::power_up::PowerUp;
use super::snake::Snake;
use super::types::Point;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BehaviorTag {
    Hunter,
    Survivor,
    Collector,
    Territorial,
    Aggressive,
    Passive,
}

/// Tunables for one behavior tag. The steering loop is shared; only these vary.
#[derive(Debug)]
pub struct BehaviorProfile {
    pub name: &'static str,
    pub color: &'static str,
    pub head_color: &'static str,
    pub speed: f64,
    pub turn_rate: f64,
    pub aggressiveness: f64,
    pub food_priority: f64,
    pub territory_radius: f64,
    pub deadband: f64,
}

const HUNTER: BehaviorProfile = BehaviorProfile {
    name: "Hunter",
    color: "#ff4444",
    head_color: "#ff0000",
    speed: 1.2,
    turn_rate: 1.1,
    aggressiveness: 0.8,
    food_priority: 0.4,
    territory_radius: 0.0,
    deadband: AI_TURN_DEADBAND,
};

const SURVIVOR: BehaviorProfile = BehaviorProfile {
    name: "Survivor",
    color: "#44ff44",
    head_color: "#00ff00",
    speed: 1.0,
    turn_rate: 1.2,
    aggressiveness: 0.2,
    food_priority: 0.6,
    territory_radius: 0.0,
    deadband: AI_TURN_DEADBAND,
};

const COLLECTOR: BehaviorProfile = BehaviorProfile {
    name: "Collector",
    color: "#4444ff",
    head_color: "#0000ff",
    speed: 1.1,
    turn_rate: 1.0,
    aggressiveness: 0.3,
    food_priority: 0.9,
    territory_radius: 0.0,
    deadband: AI_TURN_DEADBAND,
};

const TERRITORIAL: BehaviorProfile = BehaviorProfile {
    name: "Territorial",
    color: "#ffff44",
    head_color: "#ffff00",
    speed: 1.0,
    turn_rate: 1.0,
    aggressiveness: 0.6,
    food_priority: 0.7,
    territory_radius: 150.0,
    deadband: AI_TURN_DEADBAND,
};

const AGGRESSIVE: BehaviorProfile = BehaviorProfile {
    name: "Aggressive",
    color: "#ff44ff",
    head_color: "#ff00ff",
    speed: 1.3,
    turn_rate: 1.2,
    aggressiveness: 1.5,
    food_priority: 0.3,
    territory_radius: 0.0,
    deadband: AI_TURN_DEADBAND * 0.5,
};

const PASSIVE: BehaviorProfile = BehaviorProfile {
    name: "Passive",
    color: "#44ffff",
    head_color: "#00ffff",
    speed: 0.9,
    turn_rate: 0.9,
    aggressiveness: 0.1,
    food_priority: 0.8,
    territory_radius: 0.0,
    deadband: AI_TURN_DEADBAND * 1.5,
};

impl BehaviorTag {
    pub const ALL: [BehaviorTag; 6] = [
        BehaviorTag::Hunter,
        BehaviorTag::Survivor,
        BehaviorTag::Collector,
        BehaviorTag::Territorial,
        BehaviorTag::Aggressive,
        BehaviorTag::Passive,
    ];

    pub fn profile(self) -> &'static BehaviorProfile {
        match self {
            BehaviorTag::Hunter => &HUNTER,
            BehaviorTag::Survivor => &SURVIVOR,
            BehaviorTag::Collector => &COLLECTOR,
            BehaviorTag::Territorial => &TERRITORIAL,
            BehaviorTag::Aggressive => &AGGRESSIVE,
            BehaviorTag::Passive => &PASSIVE,
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// A configured slot: a fixed tag, or `mixed` for a random one at spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BehaviorChoice {
    Hunter,
    Survivor,
    Collector,
    Territorial,
    Aggressive,
    Passive,
    Mixed,
}

impl BehaviorChoice {
    pub fn resolve<R: Rng + ?Sized>(self, rng: &mut R) -> BehaviorTag {
        match self {
            BehaviorChoice::Hunter => BehaviorTag::Hunter,
            BehaviorChoice::Survivor => BehaviorTag::Survivor,
            BehaviorChoice::Collector => BehaviorTag::Collector,
            BehaviorChoice::Territorial => BehaviorTag::Territorial,
            BehaviorChoice::Aggressive => BehaviorTag::Aggressive,
            BehaviorChoice::Passive => BehaviorTag::Passive,
            BehaviorChoice::Mixed => BehaviorTag::random(rng),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AiController {
    pub behavior: BehaviorTag,
    pub territory_center: Option<Point>,
    pub score: i64,
}

impl AiController {
    pub fn new(behavior: BehaviorTag, spawn_point: Option<Point>) -> Self {
        let territory_center = if behavior.profile().territory_radius > 0.0 {
            spawn_point
        } else {
            None
        };
        Self {
            behavior,
            territory_center,
            score: 0,
        }
    }

    pub fn profile(&self) -> &'static BehaviorProfile {
        self.behavior.profile()
    }
}

/// Read-only view of everything an AI snake may react to this frame.
#[derive(Debug, Clone, Copy)]
pub struct WorldView<'a> {
    pub food: &'a [Food],
    pub power_ups: &'a [PowerUp],
    pub heads: &'a [(u32, Point)],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Food,
    PowerUp,
    Prey,
    Retreat,
    Territory,
}

#[derive(Debug, Clone, Copy)]
pub struct Target {
    pub pos: Point,
    pub distance: f64,
    pub kind: TargetKind,
}

pub fn choose_target(snake: &Snake, view: &WorldView) -> Option<Target> {
    let ai = snake.ai()?;
    let profile = ai.profile();
    let head = snake.head().pos;

    if profile.aggressiveness < AI_HUNT_THRESHOLD {
        let threat = view
            .heads
            .iter()
            .filter(|(id, _)| *id != snake.id)
            .map(|(_, pos)| (*pos, distance(head, *pos)))
            .filter(|(_, dist)| *dist < AI_AVOID_RADIUS)
            .min_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((threat_pos, dist)) = threat {
            return Some(Target {
                pos: add(head, sub(head, threat_pos)),
                distance: dist,
                kind: TargetKind::Retreat,
            });
        }
    }

    let territory = ai
        .territory_center
        .filter(|_| profile.territory_radius > 0.0)
        .map(|center| (center, profile.territory_radius));
    if let Some((center, radius)) = territory {
        let dist = distance(head, center);
        if dist > radius {
            return Some(Target {
                pos: center,
                distance: dist,
                kind: TargetKind::Territory,
            });
        }
    }
    let in_territory = |pos: Point| match territory {
        Some((center, radius)) => distance(pos, center) < radius,
        None => true,
    };

    let mut best: Option<(Target, f64)> = None;
    let mut consider = |pos: Point, kind: TargetKind, weight: f64| {
        let dist = distance(head, pos);
        let effective = dist * weight;
        match best {
            Some((_, best_effective)) if effective >= best_effective => {}
            _ => {
                best = Some((
                    Target {
                        pos,
                        distance: dist,
                        kind,
                    },
                    effective,
                ))
            }
        }
    };

    for food in view.food.iter().filter(|food| in_territory(food.pos)) {
        consider(food.pos, TargetKind::Food, 1.0);
    }
    for power_up in view.power_ups.iter().filter(|power_up| in_territory(power_up.pos)) {
        consider(power_up.pos, TargetKind::PowerUp, AI_POWER_UP_ATTRACTION);
    }
    if profile.aggressiveness >= AI_HUNT_THRESHOLD {
        let prey_weight = profile.food_priority / profile.aggressiveness;
        for (_, pos) in view
            .heads
            .iter()
            .filter(|(id, _)| *id != snake.id)
            .filter(|(_, pos)| distance(head, *pos) < AI_HUNT_RADIUS && in_territory(*pos))
        {
            consider(*pos, TargetKind::Prey, prey_weight);
        }
    }

    best.map(|(target, _)| target)
}

pub fn steer(snake: &mut Snake, view: &WorldView) {
    let Some(profile) = snake.ai().map(|ai| ai.profile()) else { return };
    let Some(target) = choose_target(snake, view) else {
        snake.normal_speed();
        return;
    };

    let desired = bearing(snake.head().pos, target.pos);
    let diff = angle_delta(snake.heading, desired);
    if diff > profile.deadband {
        snake.turn_right();
    } else if diff < -profile.deadband {
        snake.turn_left();
    }

    let wants_boost = match target.kind {
        TargetKind::PowerUp | TargetKind::Retreat => true,
        TargetKind::Prey => profile.aggressiveness >= 1.0 || target.distance > AI_BOOST_DISTANCE,
        TargetKind::Food | TargetKind::Territory => target.distance > AI_BOOST_DISTANCE,
    };
    if wants_boost {
        snake.boost();
    } else {
        snake.normal_speed();
    }
}
