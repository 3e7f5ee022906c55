//! Game-state snapshot as delivered once per tick by the game backend.

use serde::{Deserialize, Serialize};

use crate::geometry::{Heading, Position};
use crate::route::Pose;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Playfield corners. Not used for planning.
    #[serde(default)]
    pub bbox: Vec<Position>,
    pub aircrafts: Vec<Aircraft>,
    pub airports: Vec<Airport>,
}

impl GameState {
    pub fn airport(&self, name: &str) -> Option<&Airport> {
        self.airports.iter().find(|airport| airport.name == name)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aircraft {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub position: Position,
    pub direction: f64,
    #[serde(default)]
    pub speed: f64,
    #[serde(default)]
    pub collision_radius: f64,
    pub destination: String,
}

impl Aircraft {
    pub fn pose(&self) -> Pose {
        Pose::new(self.position, Heading::new(self.direction))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Airport {
    pub name: String,
    pub position: Position,
    /// Heading an aircraft must land on.
    pub direction: f64,
    #[serde(default)]
    pub landing_radius: f64,
}

impl Airport {
    pub fn pose(&self) -> Pose {
        Pose::new(self.position, Heading::new(self.direction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVEL: &str = r#"{"bbox":[{"x":-180,"y":-180},{"x":180,"y":180}],"aircrafts":[{"id":"1","name":"1","position":{"x":-100,"y":0},"direction":0,"speed":5,"collisionRadius":20,"destination":"A"}],"airports":[{"name":"A","position":{"x":100,"y":0},"direction":0,"landingRadius":10}]}"#;

    #[test]
    fn parses_backend_game_state() {
        let state: GameState = serde_json::from_str(LEVEL).expect("game state");
        assert_eq!(state.bbox.len(), 2);
        assert_eq!(state.aircrafts[0].id, "1");
        assert_eq!(state.aircrafts[0].collision_radius, 20.0);
        assert_eq!(state.aircrafts[0].pose().position, Position::new(-100.0, 0.0));
        let airport = state.airport("A").expect("airport A");
        assert_eq!(airport.landing_radius, 10.0);
        assert_eq!(airport.pose().heading, Heading::new(0.0));
        assert!(state.airport("B").is_none());
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let broken = r#"{"aircrafts":[{"id":"1","position":{"x":0,"y":0},"direction":0}],"airports":[]}"#;
        assert!(serde_json::from_str::<GameState>(broken).is_err());
    }

    #[test]
    fn optional_fields_default() {
        let minimal = r#"{"aircrafts":[{"id":"7","position":{"x":1,"y":2},"direction":-90,"destination":"Z"}],"airports":[]}"#;
        let state: GameState = serde_json::from_str(minimal).expect("game state");
        assert!(state.bbox.is_empty());
        assert_eq!(state.aircrafts[0].speed, 0.0);
        assert_eq!(state.aircrafts[0].pose().heading.degrees(), 270);
    }
}
