//! Session state - everything the client knows about its own bot
//!
//! One `SessionState` lives for the whole connection. It is filled in by the
//! `welcome` message and then mutated by `begin` and `death`; informational
//! messages (`hit`, `detect`) never touch it.

use std::time::Duration;

use crate::types::{Begin, Welcome};

/// Mutable per-session record.
///
/// Invariant: `playing` implies `in_game && energy > 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub in_game: bool,
    pub playing: bool,
    pub energy: f64,
    pub max_energy: f64,
    pub heal: f64,
    pub turn_duration: Duration,
    pub turns_left: i64,
    pub turn_number: i64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            in_game: false,
            playing: false,
            energy: 0.0,
            max_energy: 0.0,
            heal: 0.0,
            turn_duration: Duration::ZERO,
            turns_left: 0,
            turn_number: 0,
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the match parameters from `welcome` and enter the game.
    pub fn apply_welcome(&mut self, welcome: &Welcome) {
        self.energy = welcome.energy;
        self.max_energy = welcome.energy;
        self.heal = welcome.heal;
        self.turn_duration = Duration::from_millis(welcome.turn_duration_ms);
        self.turns_left = welcome.turns_left;
        self.in_game = true;
    }

    /// Apply a `begin` message. Returns whether we are playing this turn.
    ///
    /// A turn number lower than the one already seen is ignored so that
    /// `turn_number` never decreases within a game.
    pub fn apply_begin(&mut self, begin: &Begin) -> bool {
        if begin.turn_number >= self.turn_number {
            self.turn_number = begin.turn_number;
        }
        self.energy = begin.energy;
        self.playing = self.in_game && self.energy > 0.0;
        self.playing
    }

    pub fn apply_death(&mut self) {
        self.playing = false;
    }

    /// Leave the game: no further spawn is requested.
    pub fn end_game(&mut self) {
        self.in_game = false;
        self.playing = false;
    }

    /// Energy as a fraction of the spawn energy (0 when unknown).
    pub fn energy_ratio(&self) -> f64 {
        if self.max_energy > 0.0 {
            self.energy / self.max_energy
        } else {
            0.0
        }
    }
}
