//! Plans every aircraft once, then hands out one tick of commands per call.

use core::fmt;
use std::collections::VecDeque;

use crate::constants::TURN_R;
use crate::error::ScheduleError;
use crate::geometry::Heading;
use crate::route::{plan_route, RoutePlan, RouteStep};
use crate::snapshot::GameState;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Head { aircraft_id: String, heading: Heading },
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Head {
                aircraft_id,
                heading,
            } => write!(f, "HEAD {aircraft_id} {heading}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AircraftPlan {
    pub aircraft_id: String,
    pub route: RoutePlan,
}

/// Plans a route for every aircraft whose destination names a known airport.
/// Aircraft without one get no plan and therefore never receive commands.
pub fn plan_aircraft(state: &GameState, radius: f64) -> Vec<AircraftPlan> {
    let mut plans = Vec::with_capacity(state.aircrafts.len());
    for aircraft in &state.aircrafts {
        let Some(airport) = state.airport(&aircraft.destination) else {
            tracing::warn!(
                aircraft = %aircraft.id,
                destination = %aircraft.destination,
                "no airport matches destination; aircraft left unplanned"
            );
            continue;
        };
        let route = plan_route(aircraft.pose(), airport.pose(), radius);
        tracing::debug!(
            aircraft = %aircraft.id,
            airport = %airport.name,
            ticks = route.len(),
            "aircraft planned"
        );
        plans.push(AircraftPlan {
            aircraft_id: aircraft.id.clone(),
            route,
        });
    }
    plans
}

/// Folds per-aircraft plans into per-tick command batches. The result is as
/// long as the longest plan; cruise ticks contribute nothing.
pub fn merge_plans(plans: &[AircraftPlan]) -> Vec<Vec<Command>> {
    let ticks = plans.iter().map(|plan| plan.route.len()).max().unwrap_or(0);
    let mut batches: Vec<Vec<Command>> = vec![Vec::new(); ticks];
    for plan in plans {
        for (tick, step) in plan.route.steps().iter().enumerate() {
            if let RouteStep::Head(heading) = step {
                batches[tick].push(Command::Head {
                    aircraft_id: plan.aircraft_id.clone(),
                    heading: *heading,
                });
            }
        }
    }
    batches
}

/// One per game session. The first snapshot fixes the plan; later snapshots
/// are not consulted, so drift between plan and game is never corrected.
#[derive(Clone, Debug)]
pub struct Scheduler {
    radius: f64,
    planned: bool,
    plans: Vec<AircraftPlan>,
    batches: VecDeque<Vec<Command>>,
    served: usize,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::with_radius(TURN_R)
    }

    pub fn with_radius(radius: f64) -> Self {
        Self {
            radius,
            planned: false,
            plans: Vec::new(),
            batches: VecDeque::new(),
            served: 0,
        }
    }

    /// A scheduler whose plan is already fixed.
    pub fn from_plans(plans: Vec<AircraftPlan>) -> Self {
        let batches = merge_plans(&plans).into();
        Self {
            radius: TURN_R,
            planned: true,
            plans,
            batches,
            served: 0,
        }
    }

    pub fn is_planned(&self) -> bool {
        self.planned
    }

    /// Plans from `state` unless a plan already exists.
    pub fn plan(&mut self, state: &GameState) {
        if self.planned {
            return;
        }
        self.plans = plan_aircraft(state, self.radius);
        self.batches = merge_plans(&self.plans).into();
        self.planned = true;
        tracing::info!(
            aircraft = state.aircrafts.len(),
            planned = self.plans.len(),
            ticks = self.batches.len(),
            "flight plan computed"
        );
    }

    /// Commands for the current tick. Plans on the first call.
    pub fn next_batch(&mut self, state: &GameState) -> Result<Vec<Command>, ScheduleError> {
        self.plan(state);
        self.pop_batch()
    }

    pub fn next_command_strings(
        &mut self,
        state: &GameState,
    ) -> Result<Vec<String>, ScheduleError> {
        Ok(self
            .next_batch(state)?
            .iter()
            .map(Command::to_string)
            .collect())
    }

    /// Hands out the next planned tick without consulting a snapshot.
    pub fn pop_batch(&mut self) -> Result<Vec<Command>, ScheduleError> {
        let batch = self.batches.pop_front().ok_or(ScheduleError::Exhausted {
            served: self.served,
        })?;
        self.served += 1;
        Ok(batch)
    }

    pub fn plans(&self) -> &[AircraftPlan] {
        &self.plans
    }

    /// Ticks still to be handed out.
    pub fn remaining(&self) -> usize {
        self.batches.len()
    }

    pub fn served(&self) -> usize {
        self.served
    }

    pub fn pending_batches(&self) -> impl Iterator<Item = &[Command]> {
        self.batches.iter().map(Vec::as_slice)
    }
}
