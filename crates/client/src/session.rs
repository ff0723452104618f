//! Session state machine
//!
//! Drives one game over one connection:
//!
//! ```text
//! Connecting --join--> AwaitingWelcome --welcome--> (in game)
//!   loop while in game:
//!     --spawn--> AwaitingSpawnAck --> Pregame (hit/detect/death/noise)* --begin-->
//!       while playing:
//!         Playing --commands--> TurnEnd --end--> Pregame ... --begin-->
//! --> Disconnected
//! ```
//!
//! The loop is strictly sequential: every line is written and flushed before
//! the next read, and exactly one end-of-turn line is consumed between a
//! turn's commands and anything sent for the following turn.
//!
//! Transport failures end the session in every phase. Parse failures end it
//! only while waiting for `welcome`; during the pregame phase they are logged
//! and skipped.

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info, warn};

use crate::core::{SessionState, Strategy, TurnView};
use crate::error::SessionError;
use crate::protocol::{parse, Message};
use crate::transport::Transport;
use crate::types::{Command, Detection, Hit};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Connecting,
    AwaitingWelcome,
    AwaitingSpawnAck,
    Pregame,
    Playing,
    TurnEnd,
    Disconnected,
}

/// Totals reported when a session ends gracefully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionSummary {
    pub turns_played: u64,
    pub last_turn: i64,
    pub deaths: u64,
    pub spawn_requests: u64,
    /// The server hung up while we were still in the game.
    pub closed_by_server: bool,
}

pub struct Session<R, W, S> {
    transport: Transport<R, W>,
    strategy: S,
    state: SessionState,
    phase: Phase,
    name: String,
    max_turns: Option<u64>,
    hits: Vec<Hit>,
    detections: Vec<Detection>,
    summary: SessionSummary,
}

impl<R, W, S> Session<R, W, S>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    S: Strategy,
{
    pub fn new(transport: Transport<R, W>, strategy: S, name: impl Into<String>) -> Self {
        Self {
            transport,
            strategy,
            state: SessionState::new(),
            phase: Phase::Connecting,
            name: name.into(),
            max_turns: None,
            hits: Vec::new(),
            detections: Vec::new(),
            summary: SessionSummary::default(),
        }
    }

    /// Leave the game after `max_turns` played turns (`None`: play until the
    /// server hangs up).
    pub fn with_max_turns(mut self, max_turns: Option<u64>) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn summary(&self) -> SessionSummary {
        self.summary
    }

    pub fn transport(&self) -> &Transport<R, W> {
        &self.transport
    }

    /// Play until the game ends or the connection fails.
    pub async fn run(&mut self) -> Result<SessionSummary, SessionError> {
        self.join().await?;
        self.await_welcome().await?;

        while self.state.in_game {
            self.request_spawn().await?;
            self.pregame().await?;

            while self.state.playing {
                self.play_turn().await?;
                if self.turn_limit_reached() {
                    info!(turns = self.summary.turns_played, "turn limit reached, leaving game");
                    self.state.end_game();
                    break;
                }
                self.pregame().await?;
            }
        }

        self.disconnect().await?;
        Ok(self.summary)
    }

    /// `Connecting -> AwaitingWelcome`: send `join <name>`.
    pub async fn join(&mut self) -> Result<(), SessionError> {
        info!(name = %self.name, "joining game");
        let join = Command::Join {
            name: self.name.clone(),
        };
        self.transport.write_line(&join.to_string()).await?;
        self.set_phase(Phase::AwaitingWelcome);
        Ok(())
    }

    /// Read the handshake reply. Anything but a well-formed `welcome` is fatal.
    pub async fn await_welcome(&mut self) -> Result<(), SessionError> {
        let line = self.transport.read_line().await?;
        let welcome = match parse(&line)? {
            Message::Welcome(welcome) => welcome,
            other => {
                return Err(SessionError::Protocol {
                    expected: "welcome",
                    got: other.command(),
                })
            }
        };

        self.state.apply_welcome(&welcome);
        info!(
            energy = welcome.energy,
            heal = welcome.heal,
            turn_duration_ms = welcome.turn_duration_ms,
            turns_left = welcome.turns_left,
            "welcome received"
        );
        Ok(())
    }

    /// Ask the server to put us on the field.
    pub async fn request_spawn(&mut self) -> Result<(), SessionError> {
        info!("requesting spawn");
        self.transport.write_line(&Command::Spawn.to_string()).await?;
        self.summary.spawn_requests += 1;
        self.set_phase(Phase::AwaitingSpawnAck);
        Ok(())
    }

    /// Consume messages until `begin`.
    ///
    /// Each read has three outcomes: a parsed message is dispatched, a parse
    /// error is logged and skipped, a transport error ends the session.
    pub async fn pregame(&mut self) -> Result<(), SessionError> {
        if self.phase != Phase::AwaitingSpawnAck {
            self.set_phase(Phase::Pregame);
        }
        self.hits.clear();
        self.detections.clear();

        loop {
            let line = self.transport.read_line().await?;
            if self.phase == Phase::AwaitingSpawnAck {
                self.set_phase(Phase::Pregame);
            }

            match parse(&line) {
                Ok(Message::Begin(begin)) => {
                    if begin.turn_number < self.state.turn_number {
                        warn!(
                            turn = begin.turn_number,
                            current = self.state.turn_number,
                            "turn number went backwards"
                        );
                    }
                    if self.state.apply_begin(&begin) {
                        self.set_phase(Phase::Playing);
                    } else {
                        debug!(turn = begin.turn_number, "turn begins without energy");
                    }
                    return Ok(());
                }
                Ok(Message::Death { turns }) => {
                    info!(turns, "we died");
                    self.state.apply_death();
                    self.summary.deaths += 1;
                }
                Ok(Message::Hit(hit)) => {
                    info!(by = %hit.name, angle = hit.angle, charge = hit.charge, "we were hit");
                    self.hits.push(hit);
                }
                Ok(Message::Detect(detection)) => {
                    info!(
                        name = %detection.name,
                        energy = detection.energy,
                        angle = detection.angle,
                        distance = detection.distance,
                        "detected bot"
                    );
                    self.detections.push(detection);
                }
                Ok(other) => {
                    debug!(command = other.command(), "ignoring message during pregame");
                }
                Err(e) => {
                    warn!(error = %e, line = %line, "pregame message parsing error");
                }
            }
        }
    }

    /// `Playing -> TurnEnd`: send the strategy's commands, then wait for the
    /// end-of-turn line.
    pub async fn play_turn(&mut self) -> Result<(), SessionError> {
        info!(
            turn = self.state.turn_number,
            energy = self.state.energy,
            energy_ratio = self.state.energy_ratio(),
            "let's play"
        );

        let view = TurnView {
            state: &self.state,
            hits: &self.hits,
            detections: &self.detections,
        };
        let cmds = self.strategy.decide(&view);
        for cmd in &cmds {
            self.transport.write_line(&cmd.to_string()).await?;
        }

        self.summary.turns_played += 1;
        self.summary.last_turn = self.state.turn_number;
        self.set_phase(Phase::TurnEnd);
        self.await_turn_end().await
    }

    /// Consume exactly one line as the end-of-turn marker.
    async fn await_turn_end(&mut self) -> Result<(), SessionError> {
        let line = self.transport.read_line().await?;
        match parse(&line) {
            Ok(Message::End) => {}
            Ok(other) => warn!(command = other.command(), "expected end of turn"),
            Err(e) => warn!(error = %e, line = %line, "unreadable end of turn"),
        }
        Ok(())
    }

    /// Shut the connection down after leaving the game.
    pub async fn disconnect(&mut self) -> Result<(), SessionError> {
        self.transport.shutdown().await?;
        self.set_phase(Phase::Disconnected);
        info!(
            turns_played = self.summary.turns_played,
            deaths = self.summary.deaths,
            "disconnected"
        );
        Ok(())
    }

    fn turn_limit_reached(&self) -> bool {
        self.max_turns
            .is_some_and(|max| self.summary.turns_played >= max)
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            debug!(from = ?self.phase, to = ?phase, "phase");
            self.phase = phase;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{IdleStrategy, TurnCommands};
    use crate::error::ParseError;
    use tokio_test::io::{Builder, Mock};

    /// Returns a fixed command list and records the energy it was shown.
    struct Scripted {
        cmds: Vec<Command>,
        seen: Vec<f64>,
        hits_seen: usize,
    }

    impl Scripted {
        fn new(cmds: Vec<Command>) -> Self {
            Self {
                cmds,
                seen: Vec::new(),
                hits_seen: 0,
            }
        }
    }

    impl Strategy for Scripted {
        fn decide(&mut self, turn: &TurnView<'_>) -> TurnCommands {
            self.seen.push(turn.energy());
            self.hits_seen += turn.hits.len();
            self.cmds.iter().cloned().collect()
        }
    }

    type MockSession<S> =
        Session<tokio::io::ReadHalf<Mock>, tokio::io::WriteHalf<Mock>, S>;

    fn session<S: Strategy>(mock: Mock, strategy: S) -> MockSession<S> {
        let (r, w) = tokio::io::split(mock);
        Session::new(Transport::new(r, w), strategy, "tester")
    }

    #[tokio::test]
    async fn test_welcome_sets_state() {
        let mock = Builder::new()
            .write(b"join tester\n")
            .read(b"welcome 100 0.5 10 500\n")
            .build();
        let mut s = session(mock, IdleStrategy);

        s.join().await.unwrap();
        s.await_welcome().await.unwrap();

        let st = s.state();
        assert!(st.in_game);
        assert_eq!(st.energy, 100.0);
        assert_eq!(st.max_energy, 100.0);
        assert_eq!(st.heal, 0.5);
        assert_eq!(st.turn_duration, std::time::Duration::from_millis(10));
        assert_eq!(st.turns_left, 500);
    }

    #[tokio::test]
    async fn test_non_welcome_handshake_is_fatal() {
        let mock = Builder::new().read(b"begin 1 100\n").build();
        let mut s = session(mock, IdleStrategy);

        let err = s.await_welcome().await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Protocol {
                expected: "welcome",
                got: "begin"
            }
        ));
        assert!(!s.state().in_game);
    }

    #[tokio::test]
    async fn test_garbage_handshake_is_fatal() {
        let mock = Builder::new().read(b"hello there\n").build();
        let mut s = session(mock, IdleStrategy);

        let err = s.await_welcome().await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Parse(ParseError::UnknownCommand(_))
        ));
    }

    #[tokio::test]
    async fn test_pregame_skips_noise_until_begin() {
        let mock = Builder::new()
            .read(b"welcome 100 0.5 10 500\n")
            .read(b"hit bob 1.5 20\n")
            .read(b"detect alice 80 0.3 12\n")
            .read(b"???\n")
            .read(b"hit broken\n")
            .read(b"end\n")
            .read(b"begin 2 90\n")
            .build();
        let mut s = session(mock, IdleStrategy);

        s.await_welcome().await.unwrap();
        s.pregame().await.unwrap();

        assert!(s.state().playing);
        assert_eq!(s.state().turn_number, 2);
        assert_eq!(s.state().energy, 90.0);
        assert_eq!(s.phase(), Phase::Playing);
        assert_eq!(s.hits.len(), 1);
        assert_eq!(s.detections.len(), 1);
    }

    #[tokio::test]
    async fn test_death_clears_playing_and_waits_for_begin() {
        let mock = Builder::new()
            .read(b"welcome 100 0.5 10 500\n")
            .read(b"death 3\n")
            .read(b"begin 5 0\n")
            .build();
        let mut s = session(mock, IdleStrategy);

        s.await_welcome().await.unwrap();
        s.pregame().await.unwrap();

        assert!(!s.state().playing);
        assert!(s.state().in_game);
        assert_eq!(s.summary().deaths, 1);
        assert_eq!(s.phase(), Phase::Pregame);
    }

    #[tokio::test]
    async fn test_play_turn_sends_commands_then_reads_end() {
        let mock = Builder::new()
            .read(b"welcome 100 0.5 10 500\n")
            .read(b"hit bob 1 2\nbegin 4 50\n")
            .write(b"move 1 2\n")
            .write(b"scan 3\n")
            .read(b"end\n")
            .build();
        let strategy = Scripted::new(vec![
            Command::Move {
                angle: 1.0,
                distance: 2.0,
            },
            Command::Scan { radius: 3.0 },
        ]);
        let mut s = session(mock, strategy);

        s.await_welcome().await.unwrap();
        s.pregame().await.unwrap();
        s.play_turn().await.unwrap();

        assert_eq!(s.strategy.seen, vec![50.0]);
        assert_eq!(s.strategy.hits_seen, 1);
        assert_eq!(s.phase(), Phase::TurnEnd);
        assert_eq!(s.summary().turns_played, 1);
        assert_eq!(s.summary().last_turn, 4);
    }

    #[tokio::test]
    async fn test_odd_end_of_turn_line_is_consumed() {
        let mock = Builder::new()
            .read(b"welcome 100 0.5 10 500\n")
            .read(b"begin 1 10\n")
            .read(b"tick 1\n")
            .read(b"begin 2 10\n")
            .build();
        let mut s = session(mock, IdleStrategy);

        s.await_welcome().await.unwrap();
        s.pregame().await.unwrap();
        s.play_turn().await.unwrap();
        s.pregame().await.unwrap();

        assert_eq!(s.state().turn_number, 2);
        assert_eq!(s.transport().lines_read(), 4);
    }

    #[tokio::test]
    async fn test_run_with_turn_limit_disconnects() {
        let mock = Builder::new()
            .write(b"join tester\n")
            .read(b"welcome 100 0.5 10 500\n")
            .write(b"spawn\n")
            .read(b"begin 1 100\n")
            .write(b"scan 1\n")
            .read(b"end\n")
            .read(b"begin 2 95\n")
            .write(b"scan 1\n")
            .read(b"end\n")
            .build();
        let strategy = Scripted::new(vec![Command::Scan { radius: 1.0 }]);
        let mut s = session(mock, strategy).with_max_turns(Some(2));

        let summary = s.run().await.unwrap();

        assert_eq!(summary.turns_played, 2);
        assert_eq!(summary.last_turn, 2);
        assert_eq!(summary.spawn_requests, 1);
        assert_eq!(s.phase(), Phase::Disconnected);
        assert!(!s.state().in_game);
        assert!(!s.state().playing);
    }

    #[tokio::test]
    async fn test_eof_mid_pregame_is_connection_closed() {
        let mock = Builder::new()
            .write(b"join tester\n")
            .read(b"welcome 100 0.5 10 500\n")
            .write(b"spawn\n")
            .read(b"hit bob 1 2\n")
            .build();
        let mut s = session(mock, IdleStrategy);

        let err = s.run().await.unwrap_err();
        assert!(err.is_connection_closed());
        assert_eq!(s.phase(), Phase::Pregame);
        assert_eq!(s.transport().lines_written(), 2);
    }
}
