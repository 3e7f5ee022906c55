use serde::{Deserialize, Serialize};

use crate::constants::{FULL_CIRCLE_DEG, HEADING_TOLERANCE_DEG, TURN_STEP_DEG};
use crate::geometry::{
    angular_difference, direction, normalize_heading, project, Heading, Position,
};

/// Rotational sense of a turn. The discriminant is the sign applied to heading
/// deltas: left turns increase the heading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnSide {
    Right = -1,
    Straight = 0,
    Left = 1,
}

impl TurnSide {
    pub fn sign(self) -> i32 {
        self as i32
    }

    pub fn negate(self) -> Self {
        match self {
            Self::Right => Self::Left,
            Self::Straight => Self::Straight,
            Self::Left => Self::Right,
        }
    }

    /// A turning circle has to sit on some side even when no turn is needed;
    /// straight flight uses the left one.
    pub fn resolve(self) -> Self {
        match self {
            Self::Straight => Self::Left,
            side => side,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnCircle {
    pub center: Position,
    /// Always `Left` or `Right`.
    pub side: TurnSide,
}

/// Which way to turn from `start_heading` to head for `end_pos`.
///
/// Only the straight-line bearing is considered, not whether the turn radius
/// lets the aircraft actually make it, so this is a heuristic.
///
/// The left half-plane is measured as `(bearing - heading) mod 360`, not by
/// comparing raw degrees, so headings of 180 or more still see targets just
/// past north on their left.
pub fn turn_side(
    start_pos: Position,
    start_heading: Heading,
    end_pos: Position,
    end_heading: Heading,
) -> TurnSide {
    let bearing = normalize_heading(direction(start_pos, end_pos));

    if start_heading == end_heading && start_heading == bearing {
        return TurnSide::Straight;
    }

    let left_offset = (i32::from(bearing.degrees()) - i32::from(start_heading.degrees()))
        .rem_euclid(FULL_CIRCLE_DEG);
    if left_offset > 0 && left_offset < FULL_CIRCLE_DEG / 2 {
        TurnSide::Left
    } else {
        TurnSide::Right
    }
}

/// Circle of `radius` tangent to the pose `(start_pos, start_heading)` on the
/// side chosen by [`turn_side`].
pub fn turn_circle(
    start_pos: Position,
    start_heading: Heading,
    end_pos: Position,
    end_heading: Heading,
    radius: f64,
) -> TurnCircle {
    let side = turn_side(start_pos, start_heading, end_pos, end_heading).resolve();
    let center = project(
        start_pos,
        start_heading.rotated(90 * side.sign()).as_f64(),
        radius,
    );
    tracing::debug!(%start_pos, %start_heading, ?side, %center, "turn circle");
    TurnCircle { center, side }
}

/// Absolute headings to command, one per tick, to turn from `start` to `end`
/// in the direction of `side`.
///
/// Every entry but the last is a full `TURN_STEP_DEG` step; the last carries
/// the remainder. A turn of zero degrees yields nothing.
pub fn discretize_turn(start: Heading, end: Heading, side: TurnSide) -> Vec<Heading> {
    let side = side.resolve();
    let (start_deg, end_deg) = (i32::from(start.degrees()), i32::from(end.degrees()));
    let total = match side {
        TurnSide::Right => (start_deg - end_deg).rem_euclid(FULL_CIRCLE_DEG),
        _ => (end_deg - start_deg).rem_euclid(FULL_CIRCLE_DEG),
    };

    let full_steps = total / TURN_STEP_DEG;
    let mut headings = Vec::with_capacity(full_steps as usize + 1);
    let mut current = start;
    for _ in 0..full_steps {
        current = current.rotated(TURN_STEP_DEG * side.sign());
        headings.push(current);
    }

    let last = current.rotated((total % TURN_STEP_DEG) * side.sign());
    if angular_difference(current.as_f64(), last.as_f64()) >= HEADING_TOLERANCE_DEG {
        headings.push(last);
    }
    headings
}
