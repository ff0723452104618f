//! Strategy module - what the bot does with its turn
//!
//! The session state machine calls [`Strategy::decide`] once per turn in
//! which we are alive and forwards every returned command verbatim, in order.
//! Strategies are trusted: the core does not check that arguments stay within
//! the energy budget.

use std::f64::consts::PI;

use smallvec::SmallVec;

use crate::rng::SimpleRng;
use crate::state::SessionState;
use crate::types::{Command, Detection, Hit, INLINE_TURN_COMMANDS};

/// Commands produced for a single turn. Any number is allowed; the usual
/// move/fire/scan set stays inline.
pub type TurnCommands = SmallVec<[Command; INLINE_TURN_COMMANDS]>;

/// Everything visible to a strategy when it is asked to act.
#[derive(Debug, Clone, Copy)]
pub struct TurnView<'a> {
    pub state: &'a SessionState,
    /// Hits reported since the previous turn.
    pub hits: &'a [Hit],
    /// Bots detected since the previous turn.
    pub detections: &'a [Detection],
}

impl<'a> TurnView<'a> {
    pub fn new(state: &'a SessionState) -> Self {
        Self {
            state,
            hits: &[],
            detections: &[],
        }
    }

    /// Energy budget for this turn.
    pub fn energy(&self) -> f64 {
        self.state.energy
    }
}

pub trait Strategy {
    fn decide(&mut self, turn: &TurnView<'_>) -> TurnCommands;
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn decide(&mut self, turn: &TurnView<'_>) -> TurnCommands {
        (**self).decide(turn)
    }
}

/// Selectable shipped strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Random,
    Idle,
}

impl StrategyKind {
    /// Parse strategy name (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "random" => Some(StrategyKind::Random),
            "idle" => Some(StrategyKind::Idle),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Random => "random",
            StrategyKind::Idle => "idle",
        }
    }

    /// Build the strategy, seeding it when it needs randomness.
    pub fn build(self, seed: u32) -> Box<dyn Strategy + Send> {
        match self {
            StrategyKind::Random => Box::new(RandomStrategy::new(seed)),
            StrategyKind::Idle => Box::new(IdleStrategy),
        }
    }
}

/// The reference bot: wander, shoot and scan at random.
///
/// Each action is taken with probability 1/2. With `E` the turn's energy:
/// - move: angle in [0, 2π), distance in [0, 0.4·E)
/// - fire: angle in [0, 2π), distance and radius in [0, 0.2·E), charge in [0, 0.4·E)
/// - scan: radius in [0, 0.4·E)
#[derive(Debug, Clone)]
pub struct RandomStrategy {
    rng: SimpleRng,
}

impl RandomStrategy {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
        }
    }

    fn angle(&mut self) -> f64 {
        self.rng.next_f64() * 2.0 * PI
    }

    fn fraction_of(&mut self, energy: f64, fraction: f64) -> f64 {
        self.rng.next_f64() * fraction * energy
    }
}

impl Strategy for RandomStrategy {
    fn decide(&mut self, turn: &TurnView<'_>) -> TurnCommands {
        let energy = turn.energy();
        let mut cmds = TurnCommands::new();

        if self.rng.next_bool() {
            let angle = self.angle();
            let distance = self.fraction_of(energy, 0.4);
            cmds.push(Command::Move { angle, distance });
        }

        if self.rng.next_bool() {
            let angle = self.angle();
            let distance = self.fraction_of(energy, 0.2);
            let radius = self.fraction_of(energy, 0.2);
            let charge = self.fraction_of(energy, 0.4);
            cmds.push(Command::Fire {
                angle,
                distance,
                radius,
                charge,
            });
        }

        if self.rng.next_bool() {
            let radius = self.fraction_of(energy, 0.4);
            cmds.push(Command::Scan { radius });
        }

        cmds
    }
}

/// Sits still and watches.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleStrategy;

impl Strategy for IdleStrategy {
    fn decide(&mut self, _turn: &TurnView<'_>) -> TurnCommands {
        TurnCommands::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Verb;

    fn state_with_energy(energy: f64) -> SessionState {
        SessionState {
            in_game: true,
            playing: energy > 0.0,
            energy,
            max_energy: 100.0,
            ..SessionState::default()
        }
    }

    #[test]
    fn test_random_strategy_stays_within_budget() {
        let state = state_with_energy(50.0);
        let view = TurnView::new(&state);
        let mut strategy = RandomStrategy::new(12345);

        for _ in 0..500 {
            for cmd in strategy.decide(&view) {
                match cmd {
                    Command::Move { angle, distance } => {
                        assert!((0.0..2.0 * PI).contains(&angle));
                        assert!((0.0..20.0).contains(&distance));
                    }
                    Command::Fire {
                        angle,
                        distance,
                        radius,
                        charge,
                    } => {
                        assert!((0.0..2.0 * PI).contains(&angle));
                        assert!((0.0..10.0).contains(&distance));
                        assert!((0.0..10.0).contains(&radius));
                        assert!((0.0..20.0).contains(&charge));
                    }
                    Command::Scan { radius } => {
                        assert!((0.0..20.0).contains(&radius));
                    }
                    other => panic!("unexpected command: {:?}", other),
                }
            }
        }
    }

    #[test]
    fn test_random_strategy_orders_move_fire_scan() {
        let state = state_with_energy(80.0);
        let view = TurnView::new(&state);
        let mut strategy = RandomStrategy::new(7);

        let mut saw_all_three = false;
        for _ in 0..200 {
            let verbs: Vec<Verb> = strategy
                .decide(&view)
                .iter()
                .filter_map(Command::verb)
                .collect();
            let mut sorted = verbs.clone();
            sorted.sort_by_key(|v| match v {
                Verb::Move => 0,
                Verb::Fire => 1,
                Verb::Scan => 2,
                _ => 3,
            });
            assert_eq!(verbs, sorted);
            saw_all_three |= verbs.len() == 3;
        }
        assert!(saw_all_three);
    }

    #[test]
    fn test_random_strategy_is_deterministic_per_seed() {
        let state = state_with_energy(30.0);
        let view = TurnView::new(&state);
        let mut a = RandomStrategy::new(42);
        let mut b = RandomStrategy::new(42);

        for _ in 0..50 {
            assert_eq!(a.decide(&view), b.decide(&view));
        }
    }

    #[test]
    fn test_idle_strategy_sends_nothing() {
        let state = state_with_energy(30.0);
        assert!(IdleStrategy.decide(&TurnView::new(&state)).is_empty());
    }

    struct Chatty(usize);

    impl Strategy for Chatty {
        fn decide(&mut self, turn: &TurnView<'_>) -> TurnCommands {
            (0..self.0)
                .map(|i| Command::Scan {
                    radius: turn.energy() / (i + 1) as f64,
                })
                .collect()
        }
    }

    #[test]
    fn test_turn_commands_grow_past_inline_capacity() {
        let state = state_with_energy(60.0);
        let cmds = Chatty(INLINE_TURN_COMMANDS * 3).decide(&TurnView::new(&state));

        assert_eq!(cmds.len(), 9);
        assert!(cmds.spilled());
        assert_eq!(cmds[0], Command::Scan { radius: 60.0 });
        assert_eq!(cmds[8], Command::Scan { radius: 60.0 / 9.0 });
    }

    #[test]
    fn test_strategy_kind_parse_and_build() {
        assert_eq!(StrategyKind::from_str("RANDOM"), Some(StrategyKind::Random));
        assert_eq!(StrategyKind::from_str("idle"), Some(StrategyKind::Idle));
        assert_eq!(StrategyKind::from_str("sniper"), None);

        let state = state_with_energy(30.0);
        let mut boxed = StrategyKind::Idle.build(1);
        assert!(boxed.decide(&TurnView::new(&state)).is_empty());
    }
}
