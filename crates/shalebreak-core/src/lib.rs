//! # Shalebreak Core
//!
//! Turn-resolution core for Shalebreak, a grid-based match-and-combat
//! mining puzzle. After every board mutation this crate decides what
//! happens next: whose turn it is, who attacks whom, who dies, who wins or
//! loses, and which event the rest of the game must react to.
//!
//! ## Architecture
//!
//! Four components composed in a feedback loop:
//!
//! - [`bus::EventBus`] — many-to-many publish/subscribe with an explicit
//!   post/flush split; rendering, audio and UI observe state transitions
//!   without coupling to the rules.
//! - [`combat`] — pure resolvers for one attacker acting on one defender
//!   and for item collection.
//! - [`referee::Referee`] — a fixed-priority rule chain over board
//!   snapshots that always produces exactly one next event.
//! - [`queue::InputQueue`] + [`phase::Phase`] — the gated, history-tracked
//!   state machine that admits, filters and transitions on events.
//!
//! [`session::Session`] owns all of the above per game; there is no global
//! state.
//!
//! Everything runs single-threaded and synchronously on the caller's
//! thread; the presentation layer pumps the loop once per
//! animation-completion signal.
//!
//! ## Usage
//!
//! ```
//! use shalebreak_core::board::{Board, Coordinate};
//! use shalebreak_core::input::Input;
//! use shalebreak_core::rules::LevelConfig;
//! use shalebreak_core::session::Session;
//! use shalebreak_core::tile::Tile;
//!
//! let board = Board::from_text(
//!     ". P .
//!      . M .
//!      . . E",
//! ).unwrap();
//! let mut session = Session::new(&LevelConfig::standard(), board).unwrap();
//!
//! session.admit(Input::Touch { at: Coordinate::new(0, 1), tile: Tile::Empty });
//! let consumed = session.run_until_idle();
//! assert!(!consumed.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod board;
pub mod bus;
pub mod combat;
pub mod input;
pub mod phase;
pub mod queue;
pub mod referee;
pub mod rules;
pub mod session;
pub mod tile;
pub mod weapon;

pub use board::{Board, Coordinate, Direction, Directions};
pub use bus::EventBus;
pub use input::{Input, InputKind, LoseReason};
pub use phase::Phase;
pub use queue::InputQueue;
pub use referee::{Referee, TurnClock};
pub use rules::{ConfigError, LevelConfig, LevelKind, WinRule};
pub use session::Session;
pub use tile::{Combatant, ItemKind, RockKind, Tile};
pub use weapon::{AttackKind, Durability, Weapon};

#[cfg(test)]
mod tests;
