//! Shared types module - protocol vocabulary and constants
//!
//! This module defines the plain data shared by the codec, the session state
//! machine and the strategies. Everything here is pure data with no external
//! dependencies, so it can be used from any context (bot logic, tests, tools).
//!
//! # Wire Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_HOST` | `localhost` | Game server host |
//! | `DEFAULT_PORT` | 1452 | Game server port |
//! | `BUF_SIZE` | 4096 | Read/write buffer size per direction |
//! | `INLINE_TURN_COMMANDS` | 3 | Turn commands stored without allocating |
//! | `BOT_NAME_PREFIX` | `Henk_` | Prefix of generated player names |
//!
//! # Commands
//!
//! Outbound actions are rendered as `<verb> <args...>`:
//!
//! | Verb | Arguments |
//! |------|-----------|
//! | `join` | name |
//! | `spawn` | - |
//! | `move` | angle, distance |
//! | `fire` | angle, distance, radius, charge |
//! | `scan` | radius |
//!
//! Angles are radians; distances, radii and charges are non-negative and should
//! stay within a fraction of the current energy. Nothing in this crate enforces
//! that; it is up to the strategy producing the command.
//!
//! # Examples
//!
//! ```
//! use lobotomy_types::{Command, Verb};
//!
//! let cmd = Command::Move { angle: 1.5, distance: 20.0 };
//! assert_eq!(cmd.verb(), Some(Verb::Move));
//! assert_eq!(cmd.to_string(), "move 1.5 20");
//!
//! assert_eq!(Verb::from_str("SCAN"), Some(Verb::Scan));
//! assert_eq!(Command::Spawn.to_string(), "spawn");
//! ```

use std::fmt;

/// Default game server host
pub const DEFAULT_HOST: &str = "localhost";

/// Default game server port
pub const DEFAULT_PORT: u16 = 1452;

/// Buffer size for each direction of the connection (bytes)
pub const BUF_SIZE: usize = 4096;

/// Commands per turn kept inline (one move, one fire, one scan); more spill to the heap
pub const INLINE_TURN_COMMANDS: usize = 3;

/// Prefix of generated player names (`Henk_12345`)
pub const BOT_NAME_PREFIX: &str = "Henk_";

/// Upper bound (inclusive) of the numeric suffix of generated player names
pub const BOT_NAME_SUFFIX_MAX: u32 = 1 << 16;


/// Verbs the client may send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Join,
    Spawn,
    Move,
    Fire,
    Scan,
}

impl Verb {
    /// Parse a verb from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use lobotomy_types::Verb;
    ///
    /// assert_eq!(Verb::from_str("move"), Some(Verb::Move));
    /// assert_eq!(Verb::from_str("Fire"), Some(Verb::Fire));
    /// assert_eq!(Verb::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "join" => Some(Verb::Join),
            "spawn" => Some(Verb::Spawn),
            "move" => Some(Verb::Move),
            "fire" => Some(Verb::Fire),
            "scan" => Some(Verb::Scan),
            _ => None,
        }
    }

    /// Wire spelling of the verb
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Join => "join",
            Verb::Spawn => "spawn",
            Verb::Move => "move",
            Verb::Fire => "fire",
            Verb::Scan => "scan",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outbound command
///
/// `Display` renders the wire form without a trailing newline; framing is the
/// codec's job. `Raw` is forwarded verbatim and never validated.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Join {
        name: String,
    },
    Spawn,
    Move {
        angle: f64,
        distance: f64,
    },
    Fire {
        angle: f64,
        distance: f64,
        radius: f64,
        charge: f64,
    },
    Scan {
        radius: f64,
    },
    Raw(String),
}

impl Command {
    /// Verb of this command, if it is one the protocol knows.
    pub fn verb(&self) -> Option<Verb> {
        match self {
            Command::Join { .. } => Some(Verb::Join),
            Command::Spawn => Some(Verb::Spawn),
            Command::Move { .. } => Some(Verb::Move),
            Command::Fire { .. } => Some(Verb::Fire),
            Command::Scan { .. } => Some(Verb::Scan),
            Command::Raw(line) => line.split_whitespace().next().and_then(Verb::from_str),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Join { name } => write!(f, "join {}", name),
            Command::Spawn => f.write_str("spawn"),
            Command::Move { angle, distance } => write!(f, "move {} {}", angle, distance),
            Command::Fire {
                angle,
                distance,
                radius,
                charge,
            } => write!(f, "fire {} {} {} {}", angle, distance, radius, charge),
            Command::Scan { radius } => write!(f, "scan {}", radius),
            Command::Raw(line) => f.write_str(line),
        }
    }
}

/// We were hit by another bot (`hit` message payload)
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub name: String,
    pub angle: f64,
    pub charge: f64,
}

/// Another bot showed up on our scan (`detect` message payload)
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub name: String,
    pub energy: f64,
    pub angle: f64,
    pub distance: f64,
}

/// Match parameters announced once after `join` (`welcome` message payload)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Welcome {
    pub energy: f64,
    pub heal: f64,
    /// Turn length in milliseconds
    pub turn_duration_ms: u64,
    pub turns_left: i64,
}

/// A turn starts with us alive on the field (`begin` message payload)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Begin {
    pub turn_number: i64,
    pub energy: f64,
}
