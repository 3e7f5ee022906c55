//! One game session: subscribe, then answer every ongoing `game-instance`
//! tick with exactly one `run-command`.

use crate::protocol::{decode_incoming, encode_run_command, encode_sub_game, Incoming};
use anyhow::{Context, Result};
use noflight_core::Scheduler;
use std::io::{BufRead, Write};
use std::thread;
use std::time::Duration;

#[derive(Debug)]
pub struct Session {
    game_id: String,
    scheduler: Scheduler,
    ticks: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub game_id: String,
    pub ticks: usize,
    pub final_status: Option<String>,
}

impl Session {
    pub fn new(game_id: impl Into<String>) -> Self {
        Self::with_scheduler(game_id, Scheduler::new())
    }

    pub fn with_scheduler(game_id: impl Into<String>, scheduler: Scheduler) -> Self {
        Self {
            game_id: game_id.into(),
            scheduler,
            ticks: 0,
        }
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Ticks answered so far.
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    pub fn subscribe_message(&self) -> Result<String> {
        encode_sub_game(&self.game_id)
    }

    /// Returns the reply for one incoming message, if it needs one.
    pub fn handle_message(&mut self, raw: &str) -> Result<Option<String>> {
        Ok(self.handle(raw)?.reply)
    }

    fn handle(&mut self, raw: &str) -> Result<Handled> {
        let instance = match decode_incoming(raw)? {
            Incoming::GameInstance(instance) => instance,
            Incoming::Other { action, .. } => {
                tracing::debug!(%action, "ignoring message");
                return Ok(Handled::default());
            }
        };

        if instance.entity_id != self.game_id {
            tracing::warn!(
                expected = %self.game_id,
                received = %instance.entity_id,
                "game-instance for another game ignored"
            );
            return Ok(Handled::default());
        }

        if !instance.is_ongoing() {
            tracing::info!(
                game = %self.game_id,
                status = %instance.status,
                reason = %instance.reason,
                score = instance.score,
                ticks = self.ticks,
                "game finished"
            );
            return Ok(Handled {
                reply: None,
                finished: Some(instance.status),
            });
        }

        let state = instance.state()?;
        let commands = self
            .scheduler
            .next_command_strings(&state)
            .with_context(|| {
                format!("no commands for tick {} of game {}", self.ticks, self.game_id)
            })?;
        self.ticks += 1;
        tracing::debug!(tick = self.ticks, commands = ?commands, "tick answered");

        Ok(Handled {
            reply: Some(encode_run_command(&self.game_id, &commands)?),
            finished: None,
        })
    }

    /// Drives the session over line-delimited messages: writes the
    /// subscription first, then one reply per ongoing tick after `delay`.
    /// Returns once the game reports a final status or input ends.
    pub fn run<R, W>(&mut self, input: R, mut output: W, delay: Duration) -> Result<SessionSummary>
    where
        R: BufRead,
        W: Write,
    {
        writeln!(output, "{}", self.subscribe_message()?).context("failed writing subscription")?;
        output.flush().context("failed flushing output")?;
        tracing::info!(game = %self.game_id, "subscribed");

        let mut final_status = None;
        for line in input.lines() {
            let line = line.context("failed reading message")?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let handled = self.handle(line)?;
            if let Some(reply) = handled.reply {
                if !delay.is_zero() {
                    thread::sleep(delay);
                }
                writeln!(output, "{reply}").context("failed writing reply")?;
                output.flush().context("failed flushing output")?;
            }
            if handled.finished.is_some() {
                final_status = handled.finished;
                break;
            }
        }

        Ok(SessionSummary {
            game_id: self.game_id.clone(),
            ticks: self.ticks,
            final_status,
        })
    }
}

#[derive(Default)]
struct Handled {
    reply: Option<String>,
    finished: Option<String>,
}
