use super::types::Point;
use std::f64::consts::PI;

pub fn distance(a: Point, b: Point) -> f64 {
  (a.x - b.x).hypot(a.y - b.y)
}

pub fn bearing(from: Point, to: Point) -> f64 {
  (to.y - from.y).atan2(to.x - from.x)
}

/// Signed difference `to - from` folded into [-PI, PI].
pub fn angle_delta(from: f64, to: f64) -> f64 {
  let diff = to - from;
  diff.sin().atan2(diff.cos())
}

pub fn normalize_angle(angle: f64) -> f64 {
  let wrapped = angle.rem_euclid(PI * 2.0);
  if wrapped > PI {
    wrapped - PI * 2.0
  } else {
    wrapped
  }
}

pub fn velocity(angle: f64, speed: f64) -> Point {
  Point {
    x: angle.cos() * speed,
    y: angle.sin() * speed,
  }
}

pub fn add(a: Point, b: Point) -> Point {
  Point {
    x: a.x + b.x,
    y: a.y + b.y,
  }
}

pub fn sub(a: Point, b: Point) -> Point {
  Point {
    x: a.x - b.x,
    y: a.y - b.y,
  }
}

pub fn circles_touch(a: Point, a_radius: f64, b: Point, b_radius: f64) -> bool {
  distance(a, b) < a_radius + b_radius
}

/// Periodic boundary: leaving one edge re-enters at the opposite edge.
pub fn wrap_coordinate(value: f64, max: f64) -> f64 {
  if value < 0.0 {
    max
  } else if value > max {
    0.0
  } else {
    value
  }
}

pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
  value.min(max).max(min)
}
