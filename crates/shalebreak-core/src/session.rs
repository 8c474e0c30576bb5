//! The game session: board, queue, bus, referee and turn clock in one
//! explicit context object.
//!
//! There is no process-wide state anywhere in this crate; every core
//! operation goes through a `Session`, so multiple independent games (and
//! isolated tests) coexist trivially.
//!
//! # The resolution loop
//!
//! [`Session::pump`] drives one step of the feedback loop:
//!
//! 1. Pop the next pending event through the phase state machine.
//! 2. Broadcast the consumed event on the bus — listeners run synchronously
//!    while the payload's coordinates are still valid.
//! 3. Apply the event's board effects (combat resolution, monster removal,
//!    item collection, turn bookkeeping for gestures).
//! 4. While the session is in the reffing phase, ask the referee for the
//!    next event and admit it.
//!
//! The external caller pumps once per animation-completion signal; the core
//! never self-schedules, sleeps, or runs anything in parallel. Once an
//! event is consumed and a transition found, the step always runs to
//! completion — cancellation is not modeled.

use std::fmt;

use tracing::{debug, warn};

use crate::board::{Board, Coordinate};
use crate::bus::EventBus;
use crate::combat;
use crate::input::Input;
use crate::phase::Phase;
use crate::queue::InputQueue;
use crate::referee::{Referee, TurnClock};
use crate::rules::{ConfigError, LevelConfig};
use crate::tile::{Combatant, Tile};
use crate::weapon::AttackKind;

/// One game session.
#[derive(Debug)]
pub struct Session {
    board: Board,
    queue: InputQueue,
    bus: EventBus,
    referee: Referee,
    clock: TurnClock,
    initial_phase: Phase,
}

impl Session {
    /// Creates a session for a level.
    ///
    /// # Errors
    ///
    /// Refuses to start when the level configuration has no valid win-rule
    /// mapping, or when the board has no player tile.
    pub fn new(config: &LevelConfig, board: Board) -> Result<Self, ConfigError> {
        if board.player().is_none() {
            return Err(ConfigError::NoPlayer);
        }
        let referee = Referee::for_level(config)?;
        let initial_phase = config.initial_phase();
        Ok(Self {
            board,
            queue: InputQueue::new(initial_phase),
            bus: EventBus::new(),
            referee,
            clock: TurnClock::new(),
            initial_phase,
        })
    }

    /// Forwards an event to the queue's admission filter.
    pub fn admit(&mut self, input: Input) -> bool {
        self.queue.admit(input)
    }

    /// Drives one step of the resolution loop.
    ///
    /// Returns the consumed event, or `None` when nothing was consumed
    /// (empty queue, or the head event was legal-but-ignored and has been
    /// discarded).
    pub fn pump(&mut self) -> Option<Input> {
        let popped = self.queue.pop()?;

        // Broadcast before applying board effects: listeners must be able
        // to read payload coordinates while they are still valid.
        self.bus.post(popped.input.clone());
        self.bus.send();

        self.apply(&popped.input);

        if self.queue.phase() == Phase::Reffing {
            let verdict = self.referee.evaluate(&self.board, &mut self.clock);
            debug!(verdict = %verdict, "referee verdict");
            self.queue.admit(verdict);
        }

        Some(popped.input)
    }

    /// Pumps until the pending queue drains, collecting the consumed
    /// events. This is the external caller's per-animation pump collapsed
    /// into one call, which is how tests drive a whole resolution pass.
    pub fn run_until_idle(&mut self) -> Vec<Input> {
        // A settled board always reaches reffing-finished; the budget only
        // exists so a corrupted board cannot spin forever.
        const PUMP_BUDGET: usize = 10_000;
        let mut consumed = Vec::new();
        let mut spins = 0;
        while !self.queue.pending().is_empty() {
            if spins == PUMP_BUDGET {
                warn!("pump budget exhausted with events still pending");
                break;
            }
            spins += 1;
            if let Some(input) = self.pump() {
                consumed.push(input);
            }
        }
        consumed
    }

    /// Restarts the session on a fresh board: clears queue and history,
    /// resets the clock, and returns to the level's initial phase. Bus
    /// listeners stay registered — external collaborators outlive rounds.
    pub fn restart(&mut self, board: Board) {
        self.board = board;
        self.queue.reset(self.initial_phase);
        self.clock = TurnClock::new();
    }

    /// The current board.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable board access for the excluded board-logic collaborator
    /// (match clearing, gravity, rotation).
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// The current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.queue.phase()
    }

    /// The input queue (pending, history, phase).
    #[must_use]
    pub const fn queue(&self) -> &InputQueue {
        &self.queue
    }

    /// The event bus, for listener registration.
    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// The turn clock.
    #[must_use]
    pub const fn clock(&self) -> &TurnClock {
        &self.clock
    }

    /// The referee.
    #[must_use]
    pub const fn referee(&self) -> &Referee {
        &self.referee
    }

    /// Applies one consumed event's board effects.
    fn apply(&mut self, input: &Input) {
        match input {
            // A consumed gesture starts the next turn.
            Input::Touch { .. } | Input::Rotate { .. } => {
                self.clock.advance();
                self.board.begin_turn();
            }
            Input::Attack {
                attacker, defender, ..
            } => self.apply_attack(*attacker, *defender),
            Input::MonsterDied { at } => {
                if self.board.get(*at).and_then(Tile::as_monster).is_some() {
                    self.board.set(*at, Tile::Empty);
                }
            }
            Input::CollectItem { item, at, .. } => {
                if self.board.get(*at).and_then(Tile::as_item) == Some(*item) {
                    let player = self
                        .board
                        .player()
                        .map(|(player_at, player)| (player_at, player.clone()));
                    if let Some((player_at, player)) = player {
                        let updated = combat::resolve_collection(&player, *item);
                        self.board.set(*at, Tile::Empty);
                        self.board.set(player_at, Tile::Player(updated));
                    }
                }
            }
            _ => {}
        }
    }

    /// Applies an attack: pure combat resolution plus the application-side
    /// weapon bookkeeping (limited durability, charge reset).
    fn apply_attack(&mut self, attacker_at: Coordinate, defender_at: Option<Coordinate>) {
        let Some(attacker) = self
            .board
            .get(attacker_at)
            .and_then(Tile::as_combatant)
            .cloned()
        else {
            return;
        };
        let defender = defender_at.and_then(|at| {
            self.board
                .get(at)
                .and_then(Tile::as_combatant)
                .cloned()
                .map(|combatant| (at, combatant))
        });

        let mut attacker_after = if let Some((defender_cell, defender)) = defender {
            let (attacker_after, defender_after) = combat::resolve(&attacker, &defender);
            self.write_back(defender_cell, defender_after);
            attacker_after
        } else {
            combat::resolve_whiff(&attacker)
        };

        attacker_after.weapon.spend_use();
        if attacker_after.weapon.kind == AttackKind::Charges {
            attacker_after.weapon.reset_charge();
        }
        self.write_back(attacker_at, attacker_after);
    }

    /// Overwrites the combat data at a cell, preserving the tile variant.
    fn write_back(&mut self, at: Coordinate, combatant: Combatant) {
        if let Some(slot) = self.board.get_mut(at).and_then(Tile::as_combatant_mut) {
            *slot = combatant;
        }
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "turn {} | {}", self.clock.turn(), self.queue)
    }
}
