use noflight_core::constants::{CRUISE_STEP, TURN_R};
use noflight_core::flight::{fly_plan, FlightModel};
use noflight_core::geometry::angular_difference;
use noflight_core::tangent::TangentChoice;
use noflight_core::turn::discretize_turn;
use noflight_core::{GameState, Heading, RouteStep, ScheduleError, Scheduler};

fn level(airport_direction: i32) -> GameState {
    let json = format!(
        r#"{{"bbox":[{{"x":-180,"y":-180}},{{"x":180,"y":180}}],
            "aircrafts":[{{"id":"1","name":"1","position":{{"x":-100,"y":0}},"direction":0,"speed":5,"collisionRadius":20,"destination":"A"}}],
            "airports":[{{"name":"A","position":{{"x":100,"y":0}},"direction":{airport_direction},"landingRadius":10}}]}}"#
    );
    serde_json::from_str(&json).expect("level json")
}

fn drain(scheduler: &mut Scheduler, state: &GameState) -> Vec<Vec<String>> {
    let mut ticks = Vec::new();
    loop {
        match scheduler.next_command_strings(state) {
            Ok(batch) => ticks.push(batch),
            Err(ScheduleError::Exhausted { served }) => {
                assert_eq!(served, ticks.len());
                return ticks;
            }
        }
    }
}

#[test]
fn straight_in_level_is_pure_cruise() {
    let state = level(0);
    let mut scheduler = Scheduler::new();
    let ticks = drain(&mut scheduler, &state);

    assert_eq!(ticks.len(), (200.0 / CRUISE_STEP) as usize);
    assert!(ticks.iter().all(Vec::is_empty));
}

#[test]
fn reversal_level_takes_far_tangents_and_turns_in_steps() {
    let state = level(180);
    let mut scheduler = Scheduler::new();
    scheduler.plan(&state);

    let route = scheduler.plans()[0].route.clone();
    let geometry = route.geometry().expect("planned geometry");
    assert_eq!(geometry.exit_tangent.choice, TangentChoice::UTurnFarther);
    assert_eq!(geometry.entry_tangent.choice, TangentChoice::UTurnFarther);

    let mut previous = 0.0;
    for step in route.steps() {
        if let RouteStep::Head(heading) = step {
            assert!(angular_difference(previous, heading.as_f64()) <= 20.0);
            previous = heading.as_f64();
        }
    }
    assert_eq!(previous, 180.0);

    let expected_cruise = (geometry.cruise_length / CRUISE_STEP).floor() as usize;
    assert_eq!(route.cruise_ticks(), expected_cruise);
    assert_eq!(
        route.start_turn().len(),
        discretize_turn(
            Heading::new(0.0),
            geometry.cruise_heading,
            geometry.start_circle.side
        )
        .len()
    );
    assert_eq!(
        route.end_turn().len(),
        discretize_turn(
            geometry.cruise_heading,
            Heading::new(180.0),
            geometry.end_circle.side.negate()
        )
        .len()
    );

    let ticks = drain(&mut scheduler, &state);
    assert_eq!(ticks.len(), route.len());
    assert_eq!(ticks[0], vec!["HEAD 1 340".to_string()]);
}

#[test]
fn two_aircraft_share_tick_batches() {
    let json = r#"{"aircrafts":[
        {"id":"north","position":{"x":-100,"y":80},"direction":0,"speed":5,"destination":"N"},
        {"id":"south","position":{"x":-100,"y":-80},"direction":90,"speed":5,"destination":"S"}],
      "airports":[
        {"name":"N","position":{"x":60,"y":80},"direction":0,"landingRadius":10},
        {"name":"S","position":{"x":100,"y":-80},"direction":0,"landingRadius":10}]}"#;
    let state: GameState = serde_json::from_str(json).expect("level json");
    let mut scheduler = Scheduler::new();
    scheduler.plan(&state);

    let lengths: Vec<usize> = scheduler.plans().iter().map(|plan| plan.route.len()).collect();
    let longest = lengths.iter().copied().max().expect("two plans");
    let ticks = drain(&mut scheduler, &state);
    assert_eq!(ticks.len(), longest);

    for (tick, batch) in ticks.iter().enumerate() {
        for (plan_idx, id) in ["north", "south"].iter().enumerate() {
            let has_command = batch.iter().any(|c| c.starts_with(&format!("HEAD {id} ")));
            // Past the end of a plan the aircraft contributes nothing.
            let planned = tick < lengths[plan_idx]
                && scheduler.plans()[plan_idx]
                    .route
                    .get(tick)
                    .and_then(RouteStep::heading)
                    .is_some();
            assert_eq!(has_command, planned, "tick={tick} aircraft={id}");
        }
    }
}

#[test]
fn straight_in_plan_flies_onto_the_runway() {
    let state = level(0);
    let mut scheduler = Scheduler::with_radius(TURN_R);
    scheduler.plan(&state);
    let aircraft = &state.aircrafts[0];
    let airport = state.airport(&aircraft.destination).expect("airport");
    let outcome = fly_plan(
        aircraft.pose(),
        &scheduler.plans()[0].route,
        &FlightModel::for_aircraft(aircraft),
        airport,
    );
    assert!(outcome.landed());
}
