use std::time::Duration;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, instrument};

use crate::ai::{MoveSelector, WeightedGreedySelector};
use crate::config::Config;
use crate::error::{ConfigError, MoveError};
use crate::game::{self, GameState, HUMAN_PLAYER};
use crate::pacing::{ClockScheduler, Scheduler, Ticket};
use crate::types::{ComputerMove, Position};

/// Owns the one live [`GameState`] and runs human-vs-computer turns.
///
/// Every accepted move or reset bumps `generation`. A computer move is
/// scheduled against the generation current at the time and is dropped if
/// the game has moved on by the time it fires.
pub struct Session {
    state: GameState,
    generation: u64,
    config: Config,
    selector: Box<dyn MoveSelector>,
    rng: Box<dyn RngCore + Send>,
    scheduler: Box<dyn Scheduler>,
}

impl Session {
    /// Wall-clock pacing and the weighted greedy selector.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self::with_parts(
            config,
            Box::new(WeightedGreedySelector::new(config.thresholds())),
            Box::new(rng),
            Box::new(ClockScheduler::new()),
        ))
    }

    pub fn with_parts(
        config: Config,
        selector: Box<dyn MoveSelector>,
        rng: Box<dyn RngCore + Send>,
        scheduler: Box<dyn Scheduler>,
    ) -> Self {
        Self {
            state: GameState::new(),
            generation: 0,
            config,
            selector,
            rng,
            scheduler,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a computer move is waiting on the scheduler.
    pub fn has_pending_computer_move(&self) -> bool {
        self.scheduler.time_until_due().is_some()
    }

    pub fn time_until_computer_move(&self) -> Option<Duration> {
        self.scheduler.time_until_due()
    }

    /// Plays the human's move. On success the computer's reply is scheduled
    /// if it is now the computer's turn.
    #[instrument(level = "debug", skip(self), fields(generation = self.generation))]
    pub fn play(&mut self, pos: Position) -> Result<&GameState, MoveError> {
        let next = self.state.apply_move(HUMAN_PLAYER, pos)?;
        self.commit(next);
        Ok(&self.state)
    }

    /// Fires due computer moves. Returns the last move actually applied.
    #[instrument(level = "debug", skip(self), fields(generation = self.generation))]
    pub fn tick(&mut self) -> Option<ComputerMove> {
        let mut applied = None;
        for ticket in self.scheduler.take_due() {
            if ticket.generation != self.generation {
                debug!(
                    ticket = ticket.generation,
                    current = self.generation,
                    "discarding stale computer move"
                );
                continue;
            }

            match self
                .state
                .try_computer_turn(self.selector.as_ref(), self.rng.as_mut())
            {
                Ok((next, chosen)) => {
                    self.commit(next);
                    applied = Some(chosen);
                }
                Err(err) => debug!(%err, "computer move not applied"),
            }
        }
        applied
    }

    /// Starts a new game. Pending computer moves never reach it.
    #[instrument(level = "debug", skip(self), fields(generation = self.generation))]
    pub fn reset(&mut self) -> &GameState {
        self.scheduler.cancel_all();
        self.generation += 1;
        self.state = game::reset_game();
        &self.state
    }

    fn commit(&mut self, next: GameState) {
        self.state = next;
        self.generation += 1;
        if self.state.is_computer_turn() {
            let ticket = Ticket {
                generation: self.generation,
            };
            self.scheduler.schedule(ticket, self.config.computer_delay());
        }
    }

    #[cfg(test)]
    fn set_state_for_test(&mut self, state: GameState) {
        self.scheduler.cancel_all();
        self.commit(state);
    }
}
