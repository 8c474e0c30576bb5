//! The event model: every externally or internally meaningful occurrence.
//!
//! [`Input`] is a closed tagged variant; each variant carries only the
//! payload needed to reconstruct the occurrence. Inputs are immutable once
//! constructed — the queue, bus and history all pass them by value or
//! shared reference, never mutate them.
//!
//! [`InputKind`] is the payload-free tag used to key bus registrations and
//! to compare occurrences by category.
//!
//! # Fuzzy equality
//!
//! Two inputs may be compared "loosely" with [`Input::fuzzy_eq`] when only
//! a subset of payload fields is semantically relevant: two touches at the
//! same coordinate are fuzzy-equal regardless of the tile payload, attacks
//! compare attacker/defender but not the covered path, and collect events
//! ignore the running total.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::Coordinate;
use crate::tile::{ItemKind, Tile};

/// Why a game was lost.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoseReason {
    /// No matchable cluster, no open descent, no attackable monster.
    NoMoreMoves,
    /// The player's hit points reached zero.
    PlayerDied,
}

impl LoseReason {
    /// The human-readable reason string carried to the presentation layer.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoMoreMoves => "no more moves",
            Self::PlayerDied => "player died",
        }
    }
}

impl fmt::Display for LoseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payload-free tag for an [`Input`] variant.
///
/// The bus registry is keyed by this tag; the ordering derive gives the
/// registry a deterministic iteration order for diagnostics.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[allow(missing_docs)]
pub enum InputKind {
    TouchBegan,
    Touch,
    Rotate,
    Attack,
    MonsterDied,
    BoardBuilt,
    BoardLoaded,
    CollectItem,
    CollectOffer,
    GameWon,
    GameLost,
    Play,
    Pause,
    PlayAgain,
    ReffingFinished,
    TutorialAdvanced,
    BossPhaseStarted,
    OutOfMovesConfirmed,
}

/// One meaningful occurrence, external or internal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Input {
    /// A press started on a cell and is being held.
    TouchBegan {
        /// Pressed cell.
        at: Coordinate,
    },
    /// A finalized tap/release on a cell.
    Touch {
        /// Touched cell.
        at: Coordinate,
        /// Tile occupying the cell when the gesture landed.
        tile: Tile,
    },
    /// A board-rotation gesture.
    Rotate {
        /// Rotation sense.
        clockwise: bool,
    },
    /// One combatant attacks another (or, for area weapons, nobody).
    Attack {
        /// Attacker's cell.
        attacker: Coordinate,
        /// Defender's cell; `None` for an area-of-effect whiff.
        defender: Option<Coordinate>,
        /// Every in-bounds cell the attack vector covers, for effect
        /// rendering. Read synchronously during delivery.
        path: Vec<Coordinate>,
    },
    /// A monster's hit points were found at or below zero.
    MonsterDied {
        /// The dead monster's cell.
        at: Coordinate,
    },
    /// A fresh board finished building.
    BoardBuilt {
        /// Side length of the new board.
        side: i32,
    },
    /// A saved board finished loading.
    BoardLoaded,
    /// The player collected the item directly below them.
    CollectItem {
        /// What was collected.
        item: ItemKind,
        /// Where it sat.
        at: Coordinate,
        /// The player's updated running total for the item's currency.
        total: u32,
    },
    /// The player accepted an offered bundle.
    CollectOffer {
        /// Offered item kind.
        item: ItemKind,
        /// Offered amount.
        amount: u32,
    },
    /// The level's win condition is satisfied.
    GameWon,
    /// The game is over.
    GameLost {
        /// Why.
        reason: LoseReason,
    },
    /// Resume from pause or leave the store.
    Play,
    /// Suspend play.
    Pause,
    /// Restart after a win or loss.
    PlayAgain,
    /// Resolution finished; control returns to the gesture loop.
    ReffingFinished {
        /// Whether a new turn began during this resolution.
        new_turn: bool,
    },
    /// The tutorial script advanced one step.
    TutorialAdvanced {
        /// Step just shown.
        step: u8,
        /// Whether that was the final step.
        last: bool,
    },
    /// A boss fight entered its next phase.
    BossPhaseStarted {
        /// New boss phase number.
        phase: u8,
    },
    /// The player acknowledged the out-of-moves dialog.
    OutOfMovesConfirmed,
}

impl Input {
    /// Returns this input's payload-free tag.
    #[must_use]
    pub const fn kind(&self) -> InputKind {
        match self {
            Self::TouchBegan { .. } => InputKind::TouchBegan,
            Self::Touch { .. } => InputKind::Touch,
            Self::Rotate { .. } => InputKind::Rotate,
            Self::Attack { .. } => InputKind::Attack,
            Self::MonsterDied { .. } => InputKind::MonsterDied,
            Self::BoardBuilt { .. } => InputKind::BoardBuilt,
            Self::BoardLoaded => InputKind::BoardLoaded,
            Self::CollectItem { .. } => InputKind::CollectItem,
            Self::CollectOffer { .. } => InputKind::CollectOffer,
            Self::GameWon => InputKind::GameWon,
            Self::GameLost { .. } => InputKind::GameLost,
            Self::Play => InputKind::Play,
            Self::Pause => InputKind::Pause,
            Self::PlayAgain => InputKind::PlayAgain,
            Self::ReffingFinished { .. } => InputKind::ReffingFinished,
            Self::TutorialAdvanced { .. } => InputKind::TutorialAdvanced,
            Self::BossPhaseStarted { .. } => InputKind::BossPhaseStarted,
            Self::OutOfMovesConfirmed => InputKind::OutOfMovesConfirmed,
        }
    }

    /// Relaxed comparison ignoring payload fields irrelevant to
    /// deduplication.
    ///
    /// Inputs of different kinds are never fuzzy-equal. Within a kind:
    /// touches compare coordinates only, attacks compare attacker and
    /// defender but not the covered path, collects compare item and cell
    /// but not the running total, and losses compare the reason. Variants
    /// with no dedup-relevant payload compare by kind alone.
    #[must_use]
    pub fn fuzzy_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::TouchBegan { at: a }, Self::TouchBegan { at: b })
            | (Self::Touch { at: a, .. }, Self::Touch { at: b, .. })
            | (Self::MonsterDied { at: a }, Self::MonsterDied { at: b }) => a == b,
            (
                Self::Attack {
                    attacker: a,
                    defender: ad,
                    ..
                },
                Self::Attack {
                    attacker: b,
                    defender: bd,
                    ..
                },
            ) => a == b && ad == bd,
            (
                Self::CollectItem {
                    item: a, at: a_at, ..
                },
                Self::CollectItem {
                    item: b, at: b_at, ..
                },
            ) => a == b && a_at == b_at,
            (Self::GameLost { reason: a }, Self::GameLost { reason: b }) => a == b,
            _ => self.kind() == other.kind(),
        }
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TouchBegan { at } => write!(f, "touch-began {at}"),
            Self::Touch { at, .. } => write!(f, "touch {at}"),
            Self::Rotate { clockwise } => {
                write!(f, "rotate {}", if *clockwise { "cw" } else { "ccw" })
            }
            Self::Attack {
                attacker, defender, ..
            } => match defender {
                Some(defender) => write!(f, "attack {attacker} -> {defender}"),
                None => write!(f, "attack {attacker} -> (whiff)"),
            },
            Self::MonsterDied { at } => write!(f, "monster-died {at}"),
            Self::BoardBuilt { side } => write!(f, "board-built {side}x{side}"),
            Self::BoardLoaded => write!(f, "board-loaded"),
            Self::CollectItem { item, at, total } => {
                write!(f, "collect {item} {at} (total {total})")
            }
            Self::CollectOffer { item, amount } => write!(f, "offer {amount} {item}"),
            Self::GameWon => write!(f, "game-won"),
            Self::GameLost { reason } => write!(f, "game-lost: {reason}"),
            Self::Play => write!(f, "play"),
            Self::Pause => write!(f, "pause"),
            Self::PlayAgain => write!(f, "play-again"),
            Self::ReffingFinished { new_turn } => {
                write!(f, "reffing-finished (new turn: {new_turn})")
            }
            Self::TutorialAdvanced { step, last } => {
                write!(f, "tutorial step {step}{}", if *last { " (last)" } else { "" })
            }
            Self::BossPhaseStarted { phase } => write!(f, "boss phase {phase}"),
            Self::OutOfMovesConfirmed => write!(f, "out-of-moves confirmed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::RockKind;

    #[test]
    fn kind_matches_variant() {
        let touch = Input::Touch {
            at: Coordinate::new(0, 0),
            tile: Tile::Empty,
        };
        assert_eq!(touch.kind(), InputKind::Touch);
        assert_eq!(Input::GameWon.kind(), InputKind::GameWon);
        assert_eq!(
            Input::ReffingFinished { new_turn: true }.kind(),
            InputKind::ReffingFinished
        );
    }

    #[test]
    fn touches_fuzzy_equal_by_coordinate_only() {
        let a = Input::Touch {
            at: Coordinate::new(1, 1),
            tile: Tile::Rock(RockKind::Dirt),
        };
        let b = Input::Touch {
            at: Coordinate::new(1, 1),
            tile: Tile::Rock(RockKind::Stone),
        };
        let c = Input::Touch {
            at: Coordinate::new(2, 1),
            tile: Tile::Rock(RockKind::Dirt),
        };
        assert!(a.fuzzy_eq(&b));
        assert!(!a.fuzzy_eq(&c));
        assert_ne!(a, b); // strict equality still sees the tile payload
    }

    #[test]
    fn attacks_fuzzy_ignore_path() {
        let a = Input::Attack {
            attacker: Coordinate::new(1, 1),
            defender: Some(Coordinate::new(2, 1)),
            path: vec![Coordinate::new(2, 1)],
        };
        let b = Input::Attack {
            attacker: Coordinate::new(1, 1),
            defender: Some(Coordinate::new(2, 1)),
            path: vec![],
        };
        assert!(a.fuzzy_eq(&b));
    }

    #[test]
    fn collects_fuzzy_ignore_total() {
        let a = Input::CollectItem {
            item: ItemKind::Gem,
            at: Coordinate::new(2, 2),
            total: 1,
        };
        let b = Input::CollectItem {
            item: ItemKind::Gem,
            at: Coordinate::new(2, 2),
            total: 9,
        };
        assert!(a.fuzzy_eq(&b));
    }

    #[test]
    fn different_kinds_never_fuzzy_equal() {
        let touch = Input::Touch {
            at: Coordinate::new(0, 0),
            tile: Tile::Empty,
        };
        let began = Input::TouchBegan {
            at: Coordinate::new(0, 0),
        };
        assert!(!touch.fuzzy_eq(&began));
    }

    #[test]
    fn lose_reasons_carry_distinct_strings() {
        assert_ne!(
            LoseReason::NoMoreMoves.as_str(),
            LoseReason::PlayerDied.as_str()
        );
        let lost = Input::GameLost {
            reason: LoseReason::NoMoreMoves,
        };
        assert_eq!(lost.to_string(), "game-lost: no more moves");
    }

    #[test]
    fn serialization_roundtrip() {
        let attack = Input::Attack {
            attacker: Coordinate::new(1, 1),
            defender: None,
            path: vec![Coordinate::new(0, 1), Coordinate::new(2, 1)],
        };
        let json = serde_json::to_string(&attack).unwrap();
        let back: Input = serde_json::from_str(&json).unwrap();
        assert_eq!(attack, back);
    }
}
