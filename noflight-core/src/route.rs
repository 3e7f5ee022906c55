//! Turn, cruise, turn.
//!
//! A route leaves the start pose on a turning circle, flies the straight
//! tangent leg to a second circle around the destination, and turns onto the
//! destination heading there. The destination circle is found by solving the
//! problem backwards (flying out of the airport on the reversed heading), so
//! its turn direction is flipped when the forward commands are generated.

use serde::{Deserialize, Serialize};

use crate::constants::{CRUISE_STEP, HEADING_TOLERANCE_DEG};
use crate::geometry::{
    angular_difference, direction, distance, normalize_heading, Heading, Position,
};
use crate::tangent::{find_tangent_points, select_ideal_tangent_point, SelectedTangent};
use crate::turn::{discretize_turn, turn_circle, TurnCircle};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Position,
    pub heading: Heading,
}

impl Pose {
    pub fn new(position: Position, heading: Heading) -> Self {
        Self { position, heading }
    }

    /// The same place, facing the other way.
    pub fn reversed(self) -> Self {
        Self {
            position: self.position,
            heading: self.heading.reversed(),
        }
    }
}

/// What to do on one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStep {
    Head(Heading),
    Cruise,
}

impl RouteStep {
    pub fn heading(self) -> Option<Heading> {
        match self {
            Self::Head(heading) => Some(heading),
            Self::Cruise => None,
        }
    }
}

/// Intermediate geometry kept alongside a plan for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteGeometry {
    pub start_circle: TurnCircle,
    /// Solved in the reversed direction; its side is the mirrored one.
    pub end_circle: TurnCircle,
    pub exit_tangent: SelectedTangent,
    pub entry_tangent: SelectedTangent,
    pub tangent_bearing: f64,
    pub leg_bearing: f64,
    pub cruise_heading: Heading,
    pub cruise_length: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoutePlan {
    steps: Vec<RouteStep>,
    start_turn_len: usize,
    cruise_ticks: usize,
    geometry: Option<RouteGeometry>,
}

impl RoutePlan {
    /// Wraps an already discretized step list. Sections are read back as the
    /// leading commands, the cruise run after them, and everything else.
    pub fn from_steps(steps: Vec<RouteStep>) -> Self {
        let start_turn_len = steps
            .iter()
            .take_while(|step| matches!(step, RouteStep::Head(_)))
            .count();
        let cruise_ticks = steps[start_turn_len..]
            .iter()
            .take_while(|step| matches!(step, RouteStep::Cruise))
            .count();
        Self {
            steps,
            start_turn_len,
            cruise_ticks,
            geometry: None,
        }
    }

    pub fn steps(&self) -> &[RouteStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, tick: usize) -> Option<RouteStep> {
        self.steps.get(tick).copied()
    }

    pub fn start_turn(&self) -> &[RouteStep] {
        &self.steps[..self.start_turn_len]
    }

    pub fn cruise_ticks(&self) -> usize {
        self.cruise_ticks
    }

    pub fn end_turn(&self) -> &[RouteStep] {
        &self.steps[self.start_turn_len + self.cruise_ticks..]
    }

    /// Present for plans built by [`plan_route`].
    pub fn geometry(&self) -> Option<&RouteGeometry> {
        self.geometry.as_ref()
    }

    /// Number of ticks that carry a heading command.
    pub fn command_ticks(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| matches!(step, RouteStep::Head(_)))
            .count()
    }
}

/// Plans a route from `start` to `end` with turns of `radius`.
///
/// `start` and `end` must not share a position.
pub fn plan_route(start: Pose, end: Pose, radius: f64) -> RoutePlan {
    let start_circle = turn_circle(
        start.position,
        start.heading,
        end.position,
        end.heading,
        radius,
    );
    let (end_out, start_in) = (end.reversed(), start.reversed());
    let end_circle = turn_circle(
        end_out.position,
        end_out.heading,
        start_in.position,
        start_in.heading,
        radius,
    );

    let exit_pair = find_tangent_points(start_circle.center, end_circle.center, radius);
    let exit_tangent =
        select_ideal_tangent_point(start.position, start.heading, end.heading, &exit_pair);
    let entry_pair = find_tangent_points(end_circle.center, start_circle.center, radius);
    let entry_tangent = select_ideal_tangent_point(
        end_out.position,
        end_out.heading,
        start_in.heading,
        &entry_pair,
    );

    // When the two selections do not sit on a common tangent line, fly the
    // line that actually joins them.
    let leg_bearing = direction(exit_tangent.point, entry_tangent.point);
    let cruise_bearing =
        if angular_difference(leg_bearing, exit_pair.bearing) >= HEADING_TOLERANCE_DEG {
            leg_bearing
        } else {
            exit_pair.bearing
        };
    let cruise_heading = normalize_heading(cruise_bearing);

    let start_turn = discretize_turn(start.heading, cruise_heading, start_circle.side);
    let end_turn = discretize_turn(cruise_heading, end.heading, end_circle.side.negate());

    let cruise_length = distance(exit_tangent.point, entry_tangent.point);
    let cruise_ticks = (cruise_length / CRUISE_STEP).floor() as usize;

    tracing::debug!(
        start_side = ?start_circle.side,
        end_side = ?end_circle.side,
        exit = ?exit_tangent.choice,
        entry = ?entry_tangent.choice,
        %cruise_heading,
        cruise_length,
        start_turn = start_turn.len(),
        end_turn = end_turn.len(),
        "route planned"
    );

    let mut steps = Vec::with_capacity(start_turn.len() + cruise_ticks + end_turn.len());
    steps.extend(start_turn.iter().copied().map(RouteStep::Head));
    steps.extend(std::iter::repeat(RouteStep::Cruise).take(cruise_ticks));
    steps.extend(end_turn.iter().copied().map(RouteStep::Head));

    RoutePlan {
        steps,
        start_turn_len: start_turn.len(),
        cruise_ticks,
        geometry: Some(RouteGeometry {
            start_circle,
            end_circle,
            exit_tangent,
            entry_tangent,
            tangent_bearing: exit_pair.bearing,
            leg_bearing,
            cruise_heading,
            cruise_length,
        }),
    }
}
