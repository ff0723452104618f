//! lobotomy bot (workspace facade crate).
//!
//! Re-exports `lobotomy_bot::{client,core,types}` so the binary, tests and
//! benches share one import path while the implementation lives in dedicated
//! crates under `crates/`.

pub use lobotomy_client as client;
pub use lobotomy_core as core;
pub use lobotomy_types as types;
