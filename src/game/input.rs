use super::constants::TOUCH_DEADBAND;
use super::math::angle_delta;
use super::types::Point;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub turn_left: bool,
    pub turn_right: bool,
    pub boost: bool,
}

pub fn parse_direction(value: Point) -> Option<Point> {
    if !value.x.is_finite() || !value.y.is_finite() {
        return None;
    }
    if value.x == 0.0 && value.y == 0.0 {
        return None;
    }
    Some(value)
}

/// Folds a touch direction into the same turn signals the keyboard produces.
pub fn resolve_touch(direction: Option<Point>, heading: f64, boost: bool) -> InputState {
    let mut input = InputState {
        turn_left: false,
        turn_right: false,
        boost,
    };
    let Some(direction) = direction.and_then(parse_direction) else {
        return input;
    };
    let target = direction.y.atan2(direction.x);
    let diff = angle_delta(heading, target);
    if diff > TOUCH_DEADBAND {
        input.turn_right = true;
    } else if diff < -TOUCH_DEADBAND {
        input.turn_left = true;
    }
    input
}
