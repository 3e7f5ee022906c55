use crate::protocol::{decode_incoming, Incoming};
use anyhow::{anyhow, Context, Result};
use noflight_core::flight::{fly_plan, FlightModel, FlightOutcome};
use noflight_core::{GameState, RoutePlan, ScheduleError, Scheduler};
use serde::Serialize;
use std::path::Path;

#[derive(Clone, Debug, Serialize)]
pub struct AircraftReport {
    pub aircraft_id: String,
    pub destination: String,
    pub plan_ticks: usize,
    pub command_ticks: usize,
    pub cruise_ticks: usize,
    pub flight: FlightOutcome,
    pub route: RoutePlan,
}

#[derive(Clone, Debug, Serialize)]
pub struct SolveArtifact {
    pub aircraft: usize,
    pub unplanned: Vec<String>,
    pub ticks: usize,
    pub reports: Vec<AircraftReport>,
    /// One entry per tick, in wire format.
    pub batches: Vec<Vec<String>>,
}

impl SolveArtifact {
    pub fn landed(&self) -> usize {
        self.reports.iter().filter(|r| r.flight.landed()).count()
    }

    /// Largest closest-approach distance over all planned aircraft.
    pub fn worst_closest_approach(&self) -> Option<f64> {
        self.reports
            .iter()
            .map(|r| r.flight.closest_approach)
            .max_by(f64::total_cmp)
    }
}

/// Accepts either a bare game state or a captured `game-instance` message.
pub fn parse_game_state(text: &str) -> Result<GameState> {
    let trimmed = text.trim_start();
    if trimmed.starts_with('[') {
        match decode_incoming(trimmed)? {
            Incoming::GameInstance(instance) => instance.state(),
            Incoming::Other { action, .. } => {
                Err(anyhow!("expected a game-instance message, got '{action}'"))
            }
        }
    } else {
        serde_json::from_str(trimmed).context("invalid game state json")
    }
}

pub fn load_game_state(path: &Path) -> Result<GameState> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed reading {}", path.display()))?;
    parse_game_state(&text).with_context(|| format!("failed parsing {}", path.display()))
}

/// Plans `state` as the first snapshot of a session would, then replays
/// every plan through the flight model.
pub fn solve_snapshot(state: &GameState) -> SolveArtifact {
    let mut scheduler = Scheduler::new();
    scheduler.plan(state);

    let mut batches = Vec::with_capacity(scheduler.remaining());
    loop {
        match scheduler.pop_batch() {
            Ok(batch) => batches.push(batch.iter().map(ToString::to_string).collect()),
            Err(ScheduleError::Exhausted { .. }) => break,
        }
    }

    let mut reports = Vec::with_capacity(scheduler.plans().len());
    for plan in scheduler.plans() {
        let Some(aircraft) = state.aircrafts.iter().find(|a| a.id == plan.aircraft_id) else {
            continue;
        };
        let Some(airport) = state.airport(&aircraft.destination) else {
            continue;
        };
        let flight = fly_plan(
            aircraft.pose(),
            &plan.route,
            &FlightModel::for_aircraft(aircraft),
            airport,
        );
        if !flight.landed() {
            tracing::warn!(
                aircraft = %aircraft.id,
                closest = flight.closest_approach,
                "replayed plan does not land"
            );
        }
        reports.push(AircraftReport {
            aircraft_id: plan.aircraft_id.clone(),
            destination: aircraft.destination.clone(),
            plan_ticks: plan.route.len(),
            command_ticks: plan.route.command_ticks(),
            cruise_ticks: plan.route.cruise_ticks(),
            flight,
            route: plan.route.clone(),
        });
    }

    let unplanned = state
        .aircrafts
        .iter()
        .filter(|a| !scheduler.plans().iter().any(|p| p.aircraft_id == a.id))
        .map(|a| a.id.clone())
        .collect();

    SolveArtifact {
        aircraft: state.aircrafts.len(),
        unplanned,
        ticks: batches.len(),
        reports,
        batches,
    }
}
