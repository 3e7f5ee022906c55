//! Planar geometry in the game's coordinate frame.
//!
//! Headings are degrees with 0 along +x and 90 along +y. All bearings are
//! produced by [`direction`] and all headings by [`normalize_heading`], so the
//! quadrant handling lives in exactly one place.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::FULL_CIRCLE_DEG;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Integer heading in `[0, 360)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "f64", into = "u16")]
pub struct Heading(u16);

impl Heading {
    pub fn new(degrees: f64) -> Self {
        normalize_heading(degrees)
    }

    pub fn degrees(self) -> u16 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }

    /// Rotates by `delta` degrees, positive toward +y (counter-clockwise).
    pub fn rotated(self, delta: i32) -> Self {
        Self((i32::from(self.0) + delta).rem_euclid(FULL_CIRCLE_DEG) as u16)
    }

    pub fn reversed(self) -> Self {
        self.rotated(180)
    }
}

impl From<f64> for Heading {
    fn from(value: f64) -> Self {
        normalize_heading(value)
    }
}

impl From<Heading> for u16 {
    fn from(value: Heading) -> Self {
        value.0
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rounds to the nearest integer (ties to even) and wraps into `[0, 360)`.
pub fn normalize_heading(heading: f64) -> Heading {
    let rounded = (heading + f64::from(FULL_CIRCLE_DEG)).round_ties_even() as i64;
    Heading(rounded.rem_euclid(i64::from(FULL_CIRCLE_DEG)) as u16)
}

/// Bearing from `from` to `to` in `[0, 360)`.
///
/// Coincident points have no bearing; callers must not ask for one (the
/// result is 270 in that case).
pub fn direction(from: Position, to: Position) -> f64 {
    let dx = to.x - from.x;
    let dy = to.y - from.y;

    if dx == 0.0 {
        return if dy > 0.0 { 90.0 } else { 270.0 };
    }
    if dy == 0.0 {
        return if dx > 0.0 { 0.0 } else { 180.0 };
    }

    // atan covers (-90, 90); fold it onto the quadrant of (dx, dy).
    let d = (dy / dx).atan().to_degrees();
    match (dx >= 0.0, dy >= 0.0) {
        (true, true) => d,
        (true, false) => 360.0 + d,
        (false, true) => 90.0 + (90.0 + d),
        (false, false) => 180.0 + d,
    }
}

pub fn distance(from: Position, to: Position) -> f64 {
    (to.x - from.x).hypot(to.y - from.y)
}

/// Smallest angle between two headings, in `[0, 180]`.
pub fn angular_difference(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs();
    diff.min(f64::from(FULL_CIRCLE_DEG) - diff)
}

/// Point reached by travelling `length` from `start` along `heading` degrees.
pub fn project(start: Position, heading: f64, length: f64) -> Position {
    let radians = heading.to_radians();
    Position {
        x: start.x + radians.cos() * length,
        y: start.y + radians.sin() * length,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn normalize_wraps_and_rounds() {
        assert_eq!(normalize_heading(0.0).degrees(), 0);
        assert_eq!(normalize_heading(360.0).degrees(), 0);
        assert_eq!(normalize_heading(-20.0).degrees(), 340);
        assert_eq!(normalize_heading(-740.0).degrees(), 340);
        assert_eq!(normalize_heading(359.6).degrees(), 0);
        assert_eq!(normalize_heading(441.93).degrees(), 82);
        // ties go to the even neighbour
        assert_eq!(normalize_heading(0.5).degrees(), 0);
        assert_eq!(normalize_heading(1.5).degrees(), 2);
    }

    #[test]
    fn normalize_is_idempotent() {
        let mut h = -1000.0;
        while h < 1000.0 {
            let once = normalize_heading(h);
            assert!(once.degrees() < 360, "h={h}");
            assert_eq!(normalize_heading(once.as_f64()), once, "h={h}");
            h += 7.3;
        }
    }

    #[test]
    fn direction_covers_axes_and_quadrants() {
        let o = Position::new(0.0, 0.0);
        assert_eq!(direction(o, Position::new(1.0, 0.0)), 0.0);
        assert_eq!(direction(o, Position::new(0.0, 1.0)), 90.0);
        assert_eq!(direction(o, Position::new(-1.0, 0.0)), 180.0);
        assert_eq!(direction(o, Position::new(0.0, -1.0)), 270.0);
        assert_abs_diff_eq!(direction(o, Position::new(1.0, 1.0)), 45.0, epsilon = 1e-9);
        assert_abs_diff_eq!(direction(o, Position::new(-1.0, 1.0)), 135.0, epsilon = 1e-9);
        assert_abs_diff_eq!(direction(o, Position::new(-1.0, -1.0)), 225.0, epsilon = 1e-9);
        assert_abs_diff_eq!(direction(o, Position::new(1.0, -1.0)), 315.0, epsilon = 1e-9);
    }

    #[test]
    fn direction_agrees_with_project() {
        let start = Position::new(-37.5, 12.25);
        for heading in (0..360).step_by(7) {
            for length in [0.5, 5.0, 14.18, 250.0] {
                let end = project(start, f64::from(heading), length);
                let back = direction(start, end);
                assert!(
                    angular_difference(back, f64::from(heading)) < 1.0,
                    "heading={heading} length={length} back={back}"
                );
            }
        }
    }

    #[test]
    fn angular_difference_is_symmetric_and_bounded() {
        assert_eq!(angular_difference(10.0, 350.0), 20.0);
        assert_eq!(angular_difference(350.0, 10.0), 20.0);
        assert_eq!(angular_difference(0.0, 180.0), 180.0);
        assert_eq!(angular_difference(123.0, 123.0), 0.0);
        for a in (0..360).step_by(13) {
            for b in (0..360).step_by(17) {
                let d = angular_difference(f64::from(a), f64::from(b));
                assert!((0.0..=180.0).contains(&d));
                assert_eq!(d, angular_difference(f64::from(b), f64::from(a)));
            }
        }
    }

    #[test]
    fn distance_is_euclidean() {
        assert_abs_diff_eq!(
            distance(Position::new(1.0, 2.0), Position::new(4.0, 6.0)),
            5.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn heading_rotation_wraps() {
        assert_eq!(Heading::new(350.0).rotated(20).degrees(), 10);
        assert_eq!(Heading::new(10.0).rotated(-20).degrees(), 350);
        assert_eq!(Heading::new(90.0).reversed().degrees(), 270);
    }

    #[test]
    fn heading_deserializes_through_normalization() {
        let h: Heading = serde_json::from_str("-90").expect("heading");
        assert_eq!(h.degrees(), 270);
        assert_eq!(serde_json::to_string(&h).expect("json"), "270");
    }
}
