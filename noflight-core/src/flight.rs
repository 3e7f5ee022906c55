//! Offline replay of a plan through the game's motion model: each tick the
//! aircraft turns toward its commanded heading by at most `max_turn_deg`, then
//! moves `speed` units straight ahead. Collisions are not modelled.

use serde::{Deserialize, Serialize};

use crate::constants::{CRUISE_STEP, FULL_CIRCLE_DEG, TURN_STEP_DEG};
use crate::geometry::{distance, project, Heading, Position};
use crate::route::{Pose, RoutePlan};
use crate::snapshot::{Aircraft, Airport};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlightModel {
    pub max_turn_deg: i32,
    pub speed: f64,
}

impl Default for FlightModel {
    fn default() -> Self {
        Self {
            max_turn_deg: TURN_STEP_DEG,
            speed: CRUISE_STEP,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlightState {
    pub position: Position,
    pub heading: Heading,
    /// Last commanded heading; the aircraft keeps turning until it gets there.
    pub target: Heading,
}

impl FlightState {
    pub fn at(pose: Pose) -> Self {
        Self {
            position: pose.position,
            heading: pose.heading,
            target: pose.heading,
        }
    }
}

impl FlightModel {
    /// Uses the aircraft's own speed when the snapshot carries one.
    pub fn for_aircraft(aircraft: &Aircraft) -> Self {
        let speed = if aircraft.speed > 0.0 {
            aircraft.speed
        } else {
            CRUISE_STEP
        };
        Self {
            speed,
            ..Self::default()
        }
    }

    pub fn step(&self, state: FlightState, command: Option<Heading>) -> FlightState {
        let target = command.unwrap_or(state.target);
        let mut delta = (i32::from(target.degrees()) - i32::from(state.heading.degrees()))
            .rem_euclid(FULL_CIRCLE_DEG);
        if delta > FULL_CIRCLE_DEG / 2 {
            delta -= FULL_CIRCLE_DEG;
        }
        let heading = state
            .heading
            .rotated(delta.clamp(-self.max_turn_deg, self.max_turn_deg));
        FlightState {
            position: project(state.position, heading.as_f64(), self.speed),
            heading,
            target,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlightOutcome {
    pub ticks: usize,
    pub final_position: Position,
    pub final_heading: Heading,
    pub closest_approach: f64,
    /// Tick index after which the aircraft was inside the landing radius on
    /// the runway heading.
    pub landed_at: Option<usize>,
}

impl FlightOutcome {
    pub fn landed(&self) -> bool {
        self.landed_at.is_some()
    }
}

/// Flies `plan` from `start` and reports how close it got to `airport`.
/// Stops at touchdown or when the plan runs out.
pub fn fly_plan(
    start: Pose,
    plan: &RoutePlan,
    model: &FlightModel,
    airport: &Airport,
) -> FlightOutcome {
    let runway = airport.pose();
    let mut state = FlightState::at(start);
    let mut closest_approach = distance(state.position, runway.position);
    let mut landed_at = None;
    let mut ticks = 0;

    for (tick, step) in plan.steps().iter().enumerate() {
        state = model.step(state, step.heading());
        ticks = tick + 1;

        let remaining = distance(state.position, runway.position);
        closest_approach = closest_approach.min(remaining);
        if remaining <= airport.landing_radius && state.heading == runway.heading {
            landed_at = Some(tick);
            break;
        }
    }

    FlightOutcome {
        ticks,
        final_position: state.position,
        final_heading: state.heading,
        closest_approach,
        landed_at,
    }
}
