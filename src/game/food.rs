use super::constants::{
    REGULAR_FOOD_RADIUS, REGULAR_FOOD_VALUE, REMAINS_GROWTH_DIVISOR, REMAINS_LIFETIME_MS,
    REMAINS_RADIUS, SPECIAL_FOOD_CHANCE, SPECIAL_FOOD_RADIUS, SPECIAL_FOOD_VALUE,
};
use super::types::Point;
use rand::Rng;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodKind {
    Regular,
    Special,
}

impl FoodKind {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen::<f64>() < SPECIAL_FOOD_CHANCE {
            FoodKind::Special
        } else {
            FoodKind::Regular
        }
    }
}

#[derive(Debug, Clone)]
pub struct Food {
    pub id: u32,
    pub pos: Point,
    pub radius: f64,
    pub color: &'static str,
    pub kind: FoodKind,
    pub value: usize,
}

impl Food {
    pub fn new(id: u32, pos: Point, kind: FoodKind) -> Self {
        let (radius, color, value) = match kind {
            FoodKind::Regular => (REGULAR_FOOD_RADIUS, "#0ff", REGULAR_FOOD_VALUE),
            FoodKind::Special => (SPECIAL_FOOD_RADIUS, "#f0f", SPECIAL_FOOD_VALUE),
        };
        Self {
            id,
            pos,
            radius,
            color,
            kind,
            value,
        }
    }
}

/// High-value food left where an AI snake died.
#[derive(Debug, Clone)]
pub struct Remains {
    pub id: u32,
    pub pos: Point,
    pub radius: f64,
    pub color: String,
    pub score_value: i64,
    pub expires_at: i64,
}

impl Remains {
    pub fn new(id: u32, pos: Point, color: String, score_value: i64, now: i64) -> Self {
        Self {
            id,
            pos,
            radius: REMAINS_RADIUS,
            color,
            score_value: score_value.max(0),
            expires_at: now + REMAINS_LIFETIME_MS,
        }
    }

    pub fn growth(&self) -> usize {
        (self.score_value as f64 / REMAINS_GROWTH_DIVISOR).ceil() as usize
    }

    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn special_food_is_worth_more_than_regular() {
        let regular = Food::new(1, Point::new(0.0, 0.0), FoodKind::Regular);
        let special = Food::new(2, Point::new(0.0, 0.0), FoodKind::Special);
        assert_eq!(regular.value, 1);
        assert_eq!(special.value, 3);
        assert!(special.radius > regular.radius);
    }

    #[test]
    fn remains_growth_rounds_up() {
        let remains = Remains::new(1, Point::new(0.0, 0.0), "#0f0".to_string(), 30, 0);
        assert_eq!(remains.growth(), 2);
        let remains = Remains::new(2, Point::new(0.0, 0.0), "#0f0".to_string(), 40, 0);
        assert_eq!(remains.growth(), 2);
        let empty = Remains::new(3, Point::new(0.0, 0.0), "#0f0".to_string(), 0, 0);
        assert_eq!(empty.growth(), 0);
    }

    #[test]
    fn remains_expire_after_lifetime() {
        let remains = Remains::new(1, Point::new(0.0, 0.0), "#0f0".to_string(), 10, 1000);
        assert!(!remains.is_expired(1000 + REMAINS_LIFETIME_MS - 1));
        assert!(remains.is_expired(1000 + REMAINS_LIFETIME_MS));
    }
}
