//! Client runtime - wires configuration, connection and session together.

use tracing::{info, warn};

use crate::config::ClientConfig;
use crate::core::{random_bot_name, SimpleRng};
use crate::error::SessionError;
use crate::session::{Session, SessionSummary};
use crate::transport::TcpTransport;
use crate::wire_log::WireLog;

/// Seed, player name and strategy seed derived from a config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub seed: u32,
    pub name: String,
    pub strategy_seed: u32,
}

impl Identity {
    pub fn resolve(config: &ClientConfig) -> Self {
        let seed = config
            .seed
            .unwrap_or_else(|| SimpleRng::from_time().next_u32());
        let mut rng = SimpleRng::new(seed);
        let generated = random_bot_name(&mut rng);
        let name = config.name.clone().unwrap_or(generated);
        Self {
            seed,
            name,
            strategy_seed: rng.next_u32(),
        }
    }
}

/// Connect to the configured server and play one game.
///
/// A server hanging up after the welcome handshake ends the game normally
/// (`closed_by_server` is set); anything else is returned as an error.
pub async fn run_client(config: &ClientConfig) -> Result<SessionSummary, SessionError> {
    let identity = Identity::resolve(config);
    info!(
        host = %config.host,
        port = config.port,
        name = %identity.name,
        seed = identity.seed,
        strategy = config.strategy.as_str(),
        "starting bot"
    );

    let mut transport = TcpTransport::connect(&config.host, config.port).await?;
    if let Some(path) = config.wire_log.as_deref() {
        match WireLog::open(path).await {
            Ok(log) => transport = transport.with_wire_log(log),
            Err(e) => warn!(path, error = %e, "could not open wire transcript"),
        }
    }

    let strategy = config.strategy.build(identity.strategy_seed);
    let mut session =
        Session::new(transport, strategy, identity.name).with_max_turns(config.max_turns);
    match session.run().await {
        Err(e) if e.is_connection_closed() && session.state().in_game => {
            info!(name = session.name(), "server closed the connection");
            Ok(SessionSummary {
                closed_by_server: true,
                ..session.summary()
            })
        }
        other => other,
    }
}
