//! Core bot logic module - pure, deterministic, and testable
//!
//! This module contains everything the bot decides on its own: the state it
//! tracks about itself and the strategies that turn that state into commands.
//! It has **zero dependencies** on networking or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical command streams
//! - **Testable**: Strategies can be driven from a hand-built [`SessionState`]
//! - **Swappable**: Any [`Strategy`] can be plugged into the session loop
//!
//! # Module Structure
//!
//! - [`state`]: Per-session record (energy, turn number, in-game/playing flags)
//! - [`strategy`]: The [`Strategy`] trait plus the shipped random and idle bots
//! - [`rng`]: LCG used for decisions and generated player names
//!
//! # Example
//!
//! ```
//! use lobotomy_core::{RandomStrategy, SessionState, Strategy, TurnView};
//! use lobotomy_types::Welcome;
//!
//! let mut state = SessionState::new();
//! state.apply_welcome(&Welcome {
//!     energy: 100.0,
//!     heal: 0.5,
//!     turn_duration_ms: 10,
//!     turns_left: 500,
//! });
//!
//! let mut bot = RandomStrategy::new(12345);
//! let cmds = bot.decide(&TurnView::new(&state));
//! assert!(cmds.len() <= 3);
//! ```

pub mod rng;
pub mod state;
pub mod strategy;

pub use lobotomy_types as types;

// Re-export commonly used types for convenience
pub use rng::{random_bot_name, SimpleRng};
pub use state::SessionState;
pub use strategy::{
    IdleStrategy, RandomStrategy, Strategy, StrategyKind, TurnCommands, TurnView,
};
