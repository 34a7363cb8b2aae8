use super::constants::{
    GHOST_POWER_UP_MS, INVULNERABILITY_POWER_UP_MS, POWER_UP_RADIUS, SPEED_POWER_UP_MS,
};
use super::types::Point;
use rand::Rng;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerUpKind {
    Speed,
    Invulnerability,
    Ghost,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::Speed,
        PowerUpKind::Invulnerability,
        PowerUpKind::Ghost,
    ];

    pub fn duration_ms(self) -> i64 {
        match self {
            PowerUpKind::Speed => SPEED_POWER_UP_MS,
            PowerUpKind::Invulnerability => INVULNERABILITY_POWER_UP_MS,
            PowerUpKind::Ghost => GHOST_POWER_UP_MS,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            PowerUpKind::Speed => "#ff0",
            PowerUpKind::Invulnerability => "#f0f",
            PowerUpKind::Ghost => "#0ff",
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

#[derive(Debug, Clone)]
pub struct PowerUp {
    pub id: u32,
    pub pos: Point,
    pub radius: f64,
    pub kind: PowerUpKind,
    pub duration_ms: i64,
}

impl PowerUp {
    pub fn new(id: u32, pos: Point, kind: PowerUpKind) -> Self {
        Self {
            id,
            pos,
            radius: POWER_UP_RADIUS,
            kind,
            duration_ms: kind.duration_ms(),
        }
    }
}
