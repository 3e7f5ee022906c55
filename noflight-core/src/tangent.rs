//! External tangents between two turning circles of equal radius.
//!
//! With equal radii the two external tangent lines are parallel to the line of
//! centers, so the touching points on the first circle sit at +-90 degrees
//! from the center-to-center bearing. Crossing (internal) tangents are not
//! considered.

use serde::{Deserialize, Serialize};

use crate::constants::{TANGENT_ADJACENT_TOLERANCE, U_LOOP_THRESHOLD_DEG};
use crate::geometry::{angular_difference, direction, normalize_heading, project, Heading, Position};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TangentPair {
    /// Bearing from the first circle's center to the second's, which is also
    /// the bearing of both tangent lines.
    pub bearing: f64,
    pub points: [Position; 2],
}

/// How [`select_ideal_tangent_point`] arrived at its answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TangentChoice {
    /// Start and end headings differ by more than 90 degrees; the less
    /// aligned point is used so the route loops out instead of crossing
    /// itself.
    UTurnFarther,
    /// A candidate is on top of the aircraft, i.e. no turn is needed.
    Adjacent,
    /// The candidate needing the least initial turning.
    Nearest,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectedTangent {
    pub point: Position,
    pub choice: TangentChoice,
}

pub fn find_tangent_points(from_center: Position, to_center: Position, radius: f64) -> TangentPair {
    let bearing = direction(from_center, to_center);
    let points = [
        project(from_center, normalize_heading(bearing + 90.0).as_f64(), radius),
        project(from_center, normalize_heading(bearing + 270.0).as_f64(), radius),
    ];
    tracing::debug!(bearing, first = %points[0], second = %points[1], "tangent points");
    TangentPair { bearing, points }
}

/// Picks the tangent point to leave (or enter) a circle through.
pub fn select_ideal_tangent_point(
    start_pos: Position,
    start_heading: Heading,
    end_heading: Heading,
    pair: &TangentPair,
) -> SelectedTangent {
    let [first, second] = pair.points;
    let turn_to = |point: Position| {
        angular_difference(start_heading.as_f64(), direction(start_pos, point))
    };
    let (nearest, farther) = if turn_to(first) <= turn_to(second) {
        (first, second)
    } else {
        (second, first)
    };

    if angular_difference(start_heading.as_f64(), end_heading.as_f64()) > U_LOOP_THRESHOLD_DEG {
        return SelectedTangent {
            point: farther,
            choice: TangentChoice::UTurnFarther,
        };
    }

    let adjacent = |point: Position| {
        (start_pos.x - point.x).abs() < TANGENT_ADJACENT_TOLERANCE
            && (start_pos.y - point.y).abs() < TANGENT_ADJACENT_TOLERANCE
    };
    if let Some(point) = [first, second].into_iter().find(|point| adjacent(*point)) {
        return SelectedTangent {
            point,
            choice: TangentChoice::Adjacent,
        };
    }

    SelectedTangent {
        point: nearest,
        choice: TangentChoice::Nearest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TURN_R;
    use approx::assert_abs_diff_eq;

    #[test]
    fn tangent_points_are_perpendicular_to_center_line() {
        let pair = find_tangent_points(Position::new(0.0, 0.0), Position::new(100.0, 0.0), TURN_R);
        assert_eq!(pair.bearing, 0.0);
        assert_abs_diff_eq!(pair.points[0].x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pair.points[0].y, TURN_R, epsilon = 1e-9);
        assert_abs_diff_eq!(pair.points[1].x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pair.points[1].y, -TURN_R, epsilon = 1e-9);
    }

    #[test]
    fn nearest_point_wins_for_small_heading_changes() {
        // Aircraft heading north-east, well away from both candidates.
        let pair = TangentPair {
            bearing: 0.0,
            points: [Position::new(50.0, 60.0), Position::new(50.0, -60.0)],
        };
        let selected = select_ideal_tangent_point(
            Position::new(0.0, 0.0),
            Heading::new(45.0),
            Heading::new(0.0),
            &pair,
        );
        assert_eq!(selected.choice, TangentChoice::Nearest);
        assert_eq!(selected.point, Position::new(50.0, 60.0));
    }

    #[test]
    fn adjacent_point_beats_angular_heuristic() {
        let pair = TangentPair {
            bearing: 0.0,
            points: [Position::new(20.0, 5.0), Position::new(1.5, -2.0)],
        };
        let selected = select_ideal_tangent_point(
            Position::new(0.0, 0.0),
            Heading::new(10.0),
            Heading::new(0.0),
            &pair,
        );
        assert_eq!(selected.choice, TangentChoice::Adjacent);
        assert_eq!(selected.point, Position::new(1.5, -2.0));
    }

    #[test]
    fn reversal_takes_the_farther_point() {
        let pair = TangentPair {
            bearing: 0.0,
            points: [Position::new(50.0, 60.0), Position::new(50.0, -60.0)],
        };
        let selected = select_ideal_tangent_point(
            Position::new(0.0, 0.0),
            Heading::new(45.0),
            Heading::new(180.0),
            &pair,
        );
        assert_eq!(selected.choice, TangentChoice::UTurnFarther);
        assert_eq!(selected.point, Position::new(50.0, -60.0));
    }

    #[test]
    fn exactly_ninety_degrees_is_not_a_reversal() {
        let pair = TangentPair {
            bearing: 0.0,
            points: [Position::new(50.0, 60.0), Position::new(50.0, -60.0)],
        };
        let selected = select_ideal_tangent_point(
            Position::new(0.0, 0.0),
            Heading::new(45.0),
            Heading::new(135.0),
            &pair,
        );
        assert_eq!(selected.choice, TangentChoice::Nearest);
    }
}
