//! Client module - plays lobotomy over a TCP line protocol
//!
//! This module connects a bot to a lobotomy game server, joins a match and
//! plays it turn by turn, delegating every decision to a
//! [`Strategy`](crate::core::Strategy).
//!
//! # Protocol Overview
//!
//! The server speaks a **line-delimited, space-separated text protocol**:
//!
//! 1. **Join**: Client sends `join <name>`, server answers `welcome`
//! 2. **Spawn**: Client sends `spawn` to be put on the field
//! 3. **Pregame**: Server reports `hit`, `detect` and `death` events
//! 4. **Begin**: Server sends `begin <turn> <energy>`; with energy left we act
//! 5. **Act**: Client sends zero or more `move` / `fire` / `scan` commands
//! 6. **End**: Server sends one end-of-turn line; back to 3 (or 2 after dying)
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **join** `<name>`
//! - **spawn**
//! - **move** `<angle> <distance>`
//! - **fire** `<angle> <distance> <radius> <charge>`
//! - **scan** `<radius>`
//!
//! ## Server → Client
//!
//! - **welcome** `<energy> <heal> <turn_duration> <turns_left>`
//! - **begin** `<turn_number> <energy>`
//! - **hit** `<name> <angle> <charge>`
//! - **detect** `<name> <energy> <angle> <distance>`
//! - **death** `<turns>`
//! - **end**
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: join Henk_4711
//! Server -> Client: welcome 100 0.5 10 500
//! Client -> Server: spawn
//! Server -> Client: detect Henk_12 80 1.2 35
//! Server -> Client: begin 4 100
//! Client -> Server: fire 1.2 17.5 4 30
//! Client -> Server: scan 40
//! Server -> Client: end
//! Server -> Client: hit Henk_12 4.3 12
//! Server -> Client: begin 5 58
//! ```
//!
//! # Implementation
//!
//! - Uses **tokio** for the socket, driven as one sequential loop
//! - See [`protocol`] for the codec
//! - See [`transport`] for line framing and buffering
//! - See [`session`] for the state machine
//! - See [`config`] for environment variables
//!
//! # Testing
//!
//! Play against a hand-typed server with netcat:
//!
//! ```bash
//! nc -l 1452
//! ```

pub mod config;
pub mod error;
pub mod protocol;
pub mod runtime;
pub mod session;
pub mod transport;
pub mod wire_log;

pub use lobotomy_core as core;
pub use lobotomy_types as types;

// Re-export the main entry points for convenience
pub use config::ClientConfig;
pub use error::{ParseError, SessionError, TransportError};
pub use protocol::{encode, parse, FieldValue, Message};
pub use runtime::{run_client, Identity};
pub use session::{Phase, Session, SessionSummary};
pub use transport::{TcpTransport, Transport};
pub use wire_log::{Direction, WireLog, WireRecord};
