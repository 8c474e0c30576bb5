//! Win rules and level configuration.
//!
//! A win rule is a stateless predicate over a board. Which rule a level
//! uses is a pure function of its configuration, resolved and validated
//! when the level loads — a misconfigured level refuses to start instead
//! of failing somewhere inside the turn loop.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{Board, Direction};
use crate::phase::Phase;
use crate::tile::ItemKind;

/// Level-configuration failures, reported at load time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A currency-threshold level was configured without a positive goal.
    #[error("currency-threshold level requires a positive coin goal")]
    MissingCurrencyGoal,
    /// The board supplied to the session has no player tile.
    #[error("board has no player tile")]
    NoPlayer,
}

/// The kind of level being played.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelKind {
    /// Dig to the exit.
    Standard,
    /// Tutorial: collect a gem.
    TutorialGems,
    /// Tutorial: bank a coin total.
    TutorialCurrency,
    /// Boss fight; exit opens like a standard level.
    Boss,
}

/// The win condition selected for a level.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinRule {
    /// The tile directly below the player is the exit.
    ExitReached,
    /// The player has picked up a gem.
    GemCollected,
    /// The player's coin total reached the goal.
    CurrencyThreshold {
        /// Coins required.
        goal: u32,
    },
}

impl WinRule {
    /// Whether the rule is satisfied on the given board.
    ///
    /// A board without a player satisfies nothing — that is a defensive
    /// "no applicable event", not an error.
    #[must_use]
    pub fn satisfied(&self, board: &Board) -> bool {
        let Some((at, player)) = board.player() else {
            return false;
        };
        match self {
            Self::ExitReached => board
                .get(at.step(Direction::South))
                .is_some_and(crate::tile::Tile::is_exit),
            Self::GemCollected => {
                player.carrying == Some(ItemKind::Gem) || player.gems > 0
            }
            Self::CurrencyThreshold { goal } => player.coins >= *goal,
        }
    }
}

/// Per-level configuration consumed by the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// What kind of level this is.
    pub kind: LevelKind,
    /// Coin goal for currency-threshold tutorials. Ignored elsewhere.
    pub currency_goal: Option<u32>,
}

impl LevelConfig {
    /// A standard dig-to-the-exit level.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            kind: LevelKind::Standard,
            currency_goal: None,
        }
    }

    /// The gem-collection tutorial.
    #[must_use]
    pub const fn tutorial_gems() -> Self {
        Self {
            kind: LevelKind::TutorialGems,
            currency_goal: None,
        }
    }

    /// The coin-total tutorial with the given goal.
    #[must_use]
    pub const fn tutorial_currency(goal: u32) -> Self {
        Self {
            kind: LevelKind::TutorialCurrency,
            currency_goal: Some(goal),
        }
    }

    /// A boss level.
    #[must_use]
    pub const fn boss() -> Self {
        Self {
            kind: LevelKind::Boss,
            currency_goal: None,
        }
    }

    /// Resolves the level's win rule.
    ///
    /// The mapping is total over well-formed configurations; a
    /// currency-threshold level without a positive goal is refused here,
    /// at load time.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingCurrencyGoal`] when a currency-threshold level
    /// has no positive goal.
    pub fn win_rule(&self) -> Result<WinRule, ConfigError> {
        match self.kind {
            LevelKind::Standard | LevelKind::Boss => Ok(WinRule::ExitReached),
            LevelKind::TutorialGems => Ok(WinRule::GemCollected),
            LevelKind::TutorialCurrency => match self.currency_goal {
                Some(goal) if goal > 0 => Ok(WinRule::CurrencyThreshold { goal }),
                _ => Err(ConfigError::MissingCurrencyGoal),
            },
        }
    }

    /// The phase the session starts in: tutorials open on the scripted
    /// intro, everything else goes straight to play.
    #[must_use]
    pub const fn initial_phase(&self) -> Phase {
        match self.kind {
            LevelKind::TutorialGems | LevelKind::TutorialCurrency => Phase::Tutorial,
            LevelKind::Standard | LevelKind::Boss => Phase::Playing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Coordinate;
    use crate::tile::Tile;

    #[test]
    fn standard_levels_use_exit_reached() {
        assert_eq!(
            LevelConfig::standard().win_rule(),
            Ok(WinRule::ExitReached)
        );
        assert_eq!(LevelConfig::boss().win_rule(), Ok(WinRule::ExitReached));
    }

    #[test]
    fn currency_tutorial_requires_positive_goal() {
        assert_eq!(
            LevelConfig::tutorial_currency(10).win_rule(),
            Ok(WinRule::CurrencyThreshold { goal: 10 })
        );
        assert_eq!(
            LevelConfig::tutorial_currency(0).win_rule(),
            Err(ConfigError::MissingCurrencyGoal)
        );
        let mut broken = LevelConfig::tutorial_currency(5);
        broken.currency_goal = None;
        assert_eq!(broken.win_rule(), Err(ConfigError::MissingCurrencyGoal));
    }

    #[test]
    fn exit_reached_when_exit_is_directly_below() {
        let board = Board::from_text(
            ". P .
             . E .
             . . .",
        )
        .unwrap();
        assert!(WinRule::ExitReached.satisfied(&board));

        let elsewhere = Board::from_text(
            ". P .
             . . .
             . . E",
        )
        .unwrap();
        assert!(!WinRule::ExitReached.satisfied(&elsewhere));
    }

    #[test]
    fn gem_rule_sees_carried_and_banked_gems() {
        let mut board = Board::from_text(
            "P .
             . .",
        )
        .unwrap();
        assert!(!WinRule::GemCollected.satisfied(&board));

        if let Some(player) = board
            .get_mut(Coordinate::new(0, 0))
            .and_then(Tile::as_player_mut)
        {
            player.gems = 1;
        }
        assert!(WinRule::GemCollected.satisfied(&board));
    }

    #[test]
    fn currency_rule_compares_against_goal() {
        let mut board = Board::from_text(
            "P .
             . .",
        )
        .unwrap();
        if let Some(player) = board
            .get_mut(Coordinate::new(0, 0))
            .and_then(Tile::as_player_mut)
        {
            player.coins = 9;
        }
        assert!(!WinRule::CurrencyThreshold { goal: 10 }.satisfied(&board));
        assert!(WinRule::CurrencyThreshold { goal: 9 }.satisfied(&board));
    }

    #[test]
    fn no_player_satisfies_nothing() {
        let board = Board::from_text(
            ". .
             . E",
        )
        .unwrap();
        assert!(!WinRule::ExitReached.satisfied(&board));
        assert!(!WinRule::GemCollected.satisfied(&board));
    }

    #[test]
    fn tutorials_start_in_tutorial_phase() {
        assert_eq!(LevelConfig::tutorial_gems().initial_phase(), Phase::Tutorial);
        assert_eq!(LevelConfig::standard().initial_phase(), Phase::Playing);
    }
}
