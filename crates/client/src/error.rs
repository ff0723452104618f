//! Error taxonomy for the client
//!
//! - [`ParseError`]: a line that does not match its command's schema
//! - [`TransportError`]: the connection closed or faulted
//! - [`SessionError`]: what ends a session; transport faults always land here,
//!   parse errors only when they happen during the welcome handshake

use std::io;

use thiserror::Error;

/// A received line could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty message")]
    Empty,
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("`{command}` is missing field `{field}`")]
    MissingField {
        command: &'static str,
        field: &'static str,
    },
    #[error("`{command}` field `{field}` has invalid value `{value}`")]
    InvalidField {
        command: &'static str,
        field: &'static str,
        value: String,
    },
    #[error("`{command}` has {extra} unexpected trailing field(s)")]
    TrailingFields { command: &'static str, extra: usize },
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection closed by peer")]
    ConnectionClosed,
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("connection closed by peer")]
    ConnectionClosed,
    #[error("i/o error: {0}")]
    Io(#[source] io::Error),
    #[error("malformed handshake message: {0}")]
    Parse(#[from] ParseError),
    #[error("protocol violation: expected `{expected}`, got `{got}`")]
    Protocol {
        expected: &'static str,
        got: &'static str,
    },
}

impl From<TransportError> for SessionError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::ConnectionClosed => SessionError::ConnectionClosed,
            TransportError::Io(e) => SessionError::Io(e),
        }
    }
}

impl SessionError {
    /// Whether the error is the peer hanging up rather than a fault.
    pub fn is_connection_closed(&self) -> bool {
        matches!(self, SessionError::ConnectionClosed)
    }
}
