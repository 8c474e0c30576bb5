//! Game phases: admission predicates and the transition function.
//!
//! Exactly one phase is active at a time. The phase set is a closed enum
//! matched exhaustively in one place, so every transition is total and
//! reviewable here; there is no open dispatch.
//!
//! Two separate questions are answered per phase:
//!
//! - [`Phase::admits`] — may this event enter the pending queue at all?
//!   A pre-filter, not a transition; rejected events are dropped silently.
//! - [`Phase::transition`] — given an admitted event at the head of the
//!   queue, which phase comes next? `None` means the event is legal but
//!   currently ignored and is discarded without effect.
//!
//! Win and Lose are terminal apart from the explicit play-again restart
//! (and the out-of-moves store offer from Lose).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::input::{Input, InputKind};

/// The exclusive mode the whole session is in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the next player gesture.
    Playing,
    /// A press is held and not yet finalized.
    Pressed,
    /// Play suspended.
    Paused,
    /// The referee loop is resolving the last board mutation.
    Reffing,
    /// The level was won.
    Win,
    /// The level was lost.
    Lose,
    /// The store surface is up (out-of-moves offer flow).
    Store,
    /// The scripted tutorial intro is running.
    Tutorial,
}

impl Phase {
    /// Whether the game session has ended in this phase.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Win | Self::Lose)
    }

    /// Admission predicate: may `input` enter the pending queue while this
    /// phase is active?
    #[must_use]
    pub fn admits(self, input: &Input) -> bool {
        use InputKind as K;
        match self {
            Self::Playing => matches!(
                input.kind(),
                K::TouchBegan
                    | K::Touch
                    | K::Rotate
                    | K::Pause
                    | K::BoardBuilt
                    | K::BoardLoaded
                    | K::GameWon
                    | K::GameLost
            ),
            Self::Pressed => matches!(
                input.kind(),
                K::TouchBegan | K::Touch | K::Rotate | K::Pause
            ),
            Self::Paused => matches!(input.kind(), K::Play | K::PlayAgain),
            Self::Reffing => matches!(
                input.kind(),
                K::Attack
                    | K::MonsterDied
                    | K::CollectItem
                    | K::CollectOffer
                    | K::GameWon
                    | K::GameLost
                    | K::ReffingFinished
                    | K::BossPhaseStarted
            ),
            Self::Win => matches!(input.kind(), K::PlayAgain),
            Self::Lose => matches!(input.kind(), K::PlayAgain | K::OutOfMovesConfirmed),
            Self::Store => matches!(input.kind(), K::Play | K::PlayAgain | K::CollectOffer),
            Self::Tutorial => matches!(
                input.kind(),
                K::TutorialAdvanced | K::TouchBegan | K::Touch | K::Pause
            ),
        }
    }

    /// The successor phase for an admitted event, or `None` when the event
    /// is legal but currently ignored.
    ///
    /// A pure function of (phase, event); it mutates nothing.
    #[must_use]
    pub fn transition(self, input: &Input) -> Option<Self> {
        use InputKind as K;
        match (self, input.kind()) {
            // Gesture flow: a held press is its own phase, a finalized
            // touch or rotation hands the board to the referee.
            (Self::Playing, K::TouchBegan) => Some(Self::Pressed),
            (Self::Playing | Self::Pressed | Self::Tutorial, K::Touch)
            | (Self::Playing, K::Rotate) => Some(Self::Reffing),
            (Self::Pressed, K::TouchBegan) => Some(Self::Pressed),
            (Self::Pressed, K::Rotate) => Some(Self::Playing),
            (Self::Playing | Self::Pressed | Self::Tutorial, K::Pause) => Some(Self::Paused),

            // Board lifecycle: a rebuild completes in place; a load is
            // admitted for broadcast layers but drives no transition yet.
            (Self::Playing, K::BoardBuilt) => Some(Self::Playing),
            (Self::Playing, K::BoardLoaded) => None,

            // Referee verdicts.
            (
                Self::Reffing,
                K::Attack | K::MonsterDied | K::CollectItem | K::CollectOffer
                | K::BossPhaseStarted,
            ) => Some(Self::Reffing),
            (Self::Playing | Self::Reffing, K::GameWon) => Some(Self::Win),
            (Self::Playing | Self::Reffing, K::GameLost) => Some(Self::Lose),
            (Self::Reffing, K::ReffingFinished) => Some(Self::Playing),

            // Pause/restart flow.
            (Self::Paused, K::Play | K::PlayAgain) => Some(Self::Playing),
            (Self::Win | Self::Lose, K::PlayAgain) => Some(Self::Playing),

            // Out-of-moves offer flow.
            (Self::Lose, K::OutOfMovesConfirmed) => Some(Self::Store),
            (Self::Store, K::Play | K::PlayAgain) => Some(Self::Playing),
            (Self::Store, K::CollectOffer) => Some(Self::Store),

            // Tutorial script.
            (Self::Tutorial, K::TutorialAdvanced) => match input {
                Input::TutorialAdvanced { last: true, .. } => Some(Self::Playing),
                _ => Some(Self::Tutorial),
            },
            (Self::Tutorial, K::TouchBegan) => Some(Self::Tutorial),

            _ => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Playing => "playing",
            Self::Pressed => "pressed",
            Self::Paused => "paused",
            Self::Reffing => "reffing",
            Self::Win => "win",
            Self::Lose => "lose",
            Self::Store => "store",
            Self::Tutorial => "tutorial",
        };
        write!(f, "{name}")
    }
}
