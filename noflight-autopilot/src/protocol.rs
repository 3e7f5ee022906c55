//! Wire messages exchanged with the game backend. Every message is a JSON
//! array `[action, payload]`.

use anyhow::{Context, Result};
use noflight_core::GameState;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const ACTION_GAME_INSTANCE: &str = "game-instance";
pub const ACTION_SUB_GAME: &str = "sub-game";
pub const ACTION_RUN_COMMAND: &str = "run-command";
pub const STATUS_ONGOING: &str = "ONGOING";

/// Payload of a `game-instance` message, sent once per tick.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameInstance {
    pub entity_id: String,
    /// The game state arrives as a JSON document inside a string.
    pub game_state: String,
    /// Absent on some ticks; those are treated as still running.
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub score: f64,
}

fn default_status() -> String {
    STATUS_ONGOING.to_string()
}

impl GameInstance {
    pub fn is_ongoing(&self) -> bool {
        self.status == STATUS_ONGOING
    }

    pub fn state(&self) -> Result<GameState> {
        serde_json::from_str(&self.game_state)
            .with_context(|| format!("invalid gameState for game {}", self.entity_id))
    }
}

#[derive(Debug, Clone)]
pub enum Incoming {
    GameInstance(GameInstance),
    Other { action: String, payload: Value },
}

pub fn decode_incoming(raw: &str) -> Result<Incoming> {
    let (action, payload): (String, Value) =
        serde_json::from_str(raw).context("message is not an [action, payload] pair")?;
    if action == ACTION_GAME_INSTANCE {
        let instance = serde_json::from_value(payload)
            .context("invalid game-instance payload")?;
        Ok(Incoming::GameInstance(instance))
    } else {
        Ok(Incoming::Other { action, payload })
    }
}

#[derive(Serialize)]
struct SubGame<'a> {
    id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RunCommand<'a> {
    game_id: &'a str,
    payload: &'a [String],
}

pub fn encode_sub_game(game_id: &str) -> Result<String> {
    serde_json::to_string(&(ACTION_SUB_GAME, SubGame { id: game_id }))
        .context("failed to encode sub-game message")
}

pub fn encode_run_command(game_id: &str, commands: &[String]) -> Result<String> {
    serde_json::to_string(&(
        ACTION_RUN_COMMAND,
        RunCommand {
            game_id,
            payload: commands,
        },
    ))
    .context("failed to encode run-command message")
}

/// Builds a `game-instance` message around `state`; the inverse of what the
/// backend sends. Used to replay captured levels.
pub fn encode_game_instance(game_id: &str, state: &GameState, status: &str) -> Result<String> {
    let game_state = serde_json::to_string(state).context("failed to encode game state")?;
    let payload = serde_json::json!({
        "entityId": game_id,
        "gameState": game_state,
        "status": status,
        "reason": "",
        "score": 0,
    });
    serde_json::to_string(&(ACTION_GAME_INSTANCE, payload))
        .context("failed to encode game-instance message")
}
