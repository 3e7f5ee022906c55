use std::env;
use std::time::Duration;

pub const DEFAULT_FRONTEND_BASE: &str = "noflight.monad.fi";
pub const DEFAULT_BACKEND_BASE: &str = "noflight.monad.fi/backend";
// The backend drops commands that arrive on top of the tick broadcast.
pub const DEFAULT_COMMAND_DELAY_MS: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub frontend_base: String,
    pub backend_base: String,
    pub level_id: Option<String>,
    pub token: Option<String>,
    pub command_delay_ms: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source; `from_env` passes the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let frontend_base = read_string(&lookup, "NOFLIGHT_FRONTEND_BASE")
            .unwrap_or_else(|| DEFAULT_FRONTEND_BASE.to_string());
        let backend_base = read_string(&lookup, "NOFLIGHT_BACKEND_BASE")
            .unwrap_or_else(|| DEFAULT_BACKEND_BASE.to_string());

        let command_delay_ms = match read_string(&lookup, "COMMAND_DELAY_MS") {
            Some(raw) => raw.parse::<u64>().unwrap_or_else(|_| {
                tracing::warn!(
                    "COMMAND_DELAY_MS ({}) is not a number. Falling back to {}.",
                    raw,
                    DEFAULT_COMMAND_DELAY_MS
                );
                DEFAULT_COMMAND_DELAY_MS
            }),
            None => DEFAULT_COMMAND_DELAY_MS,
        };

        Self {
            frontend_base,
            backend_base,
            level_id: read_string(&lookup, "LEVEL_ID"),
            token: read_string(&lookup, "TOKEN"),
            command_delay_ms,
        }
    }

    pub fn command_delay(&self) -> Duration {
        Duration::from_millis(self.command_delay_ms)
    }

    /// Where a new game instance for `LEVEL_ID` is created (POST).
    pub fn create_game_url(&self) -> Option<String> {
        self.level_id
            .as_ref()
            .map(|level| format!("https://{}/api/levels/{level}", self.backend_base))
    }

    pub fn socket_url(&self) -> Option<String> {
        self.token
            .as_ref()
            .map(|token| format!("wss://{}/{token}/", self.backend_base))
    }

    /// `socket_url` with the token masked, for logs.
    pub fn redacted_socket_url(&self) -> Option<String> {
        self.token
            .as_ref()
            .map(|_| format!("wss://{}/<token>/", self.backend_base))
    }

    pub fn game_url(&self, game_id: &str) -> String {
        format!("https://{}/?id={game_id}", self.frontend_base)
    }
}

fn read_string<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
