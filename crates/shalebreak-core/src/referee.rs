//! The referee: a priority-ordered rule engine over board snapshots.
//!
//! [`Referee::evaluate`] never returns "nothing" — when no higher-priority
//! condition holds it returns a turn-completion event carrying the new-turn
//! flag from the [`TurnClock`] collaborator.
//!
//! The evaluation order is fixed and must not be reordered; each rule's
//! precondition assumes every higher-priority condition was already found
//! false:
//!
//! 1. Win (delegated to the level's win rule)
//! 2. No legal moves left
//! 3. Player death
//! 4. Player attack
//! 5. Monster death (first one in row-major order, one per pass)
//! 6. Item collection
//! 7. Monster attack (first due monster in row-major order)
//! 8. Turn completion fallback
//!
//! Anomalies (no player, empty board) are defensive-guarded as "no
//! applicable event this pass" and fall through to lower rules, never to an
//! error.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::{Board, Coordinate, Direction};
use crate::input::{Input, LoseReason};
use crate::rules::{ConfigError, LevelConfig, WinRule};
use crate::tile::{Combatant, Tile};
use crate::weapon::{AttackKind, Weapon};

/// The turn-tracking collaborator.
///
/// Gestures advance the global turn counter and raise the new-turn flag;
/// the referee's fallback rule reports and clears the flag through
/// [`TurnClock::take_new_turn`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnClock {
    turn: u32,
    new_turn: bool,
}

impl TurnClock {
    /// Creates a clock at turn zero with no pending new-turn flag.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            turn: 0,
            new_turn: false,
        }
    }

    /// Starts the next turn: increments the counter and raises the flag.
    pub fn advance(&mut self) {
        self.turn += 1;
        self.new_turn = true;
    }

    /// The global turn counter.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Returns the new-turn flag and clears it.
    pub fn take_new_turn(&mut self) -> bool {
        std::mem::take(&mut self.new_turn)
    }
}

/// The rule engine. Holds the win rule selected by level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Referee {
    win: WinRule,
}

impl Referee {
    /// Creates a referee with an explicit win rule.
    #[must_use]
    pub const fn new(win: WinRule) -> Self {
        Self { win }
    }

    /// Creates a referee for a level configuration.
    ///
    /// # Errors
    ///
    /// Propagates the configuration error when the level has no valid
    /// win-rule mapping; the level must refuse to start.
    pub fn for_level(config: &LevelConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.win_rule()?))
    }

    /// The active win rule.
    #[must_use]
    pub const fn win_rule(&self) -> WinRule {
        self.win
    }

    /// Evaluates the board and returns exactly one next event.
    pub fn evaluate(&self, board: &Board, clock: &mut TurnClock) -> Input {
        // 1. Win.
        if self.win.satisfied(board) {
            debug!("verdict: game won");
            return Input::GameWon;
        }

        let player = board.player();

        if let Some((at, combatant)) = player {
            // 2. No legal action left anywhere.
            if !Self::any_move_left(board, at, combatant) {
                debug!("verdict: out of moves");
                return Input::GameLost {
                    reason: LoseReason::NoMoreMoves,
                };
            }

            // 3. Player death.
            if combatant.is_dead() {
                debug!(hp = combatant.hp, "verdict: player died");
                return Input::GameLost {
                    reason: LoseReason::PlayerDied,
                };
            }

            // 4. Player attack.
            if combatant.can_attack() && !combatant.weapon.is_broken() {
                if let Some(defender) = Self::first_live_target(board, at, &combatant.weapon) {
                    debug!(%at, %defender, "verdict: player attack");
                    return Input::Attack {
                        attacker: at,
                        defender: Some(defender),
                        path: combatant.weapon.covered(at, board),
                    };
                }
            }
        }

        // 5. Monster death. One per pass: each admitted event re-triggers
        // evaluation, so simultaneous deaths surface one at a time.
        if let Some((at, _)) = board.monsters().find(|(_, monster)| monster.is_dead()) {
            debug!(%at, "verdict: monster died");
            return Input::MonsterDied { at };
        }

        // 6. Item directly below the player.
        if let Some((at, combatant)) = player {
            let below = at.step(Direction::South);
            if let Some(item) = board.get(below).and_then(Tile::as_item) {
                debug!(%below, ?item, "verdict: collect item");
                return Input::CollectItem {
                    item,
                    at: below,
                    total: combatant.collected(item) + 1,
                };
            }
        }

        // 7. Monster attack.
        let player_at = player.map(|(at, _)| at);
        for (at, monster) in board.monsters() {
            if !monster.can_attack() || !monster.weapon.due_this_turn(clock.turn()) {
                continue;
            }
            let covered = monster.weapon.covered(at, board);
            if let Some(target) = player_at.filter(|p| covered.contains(p)) {
                debug!(%at, %target, "verdict: monster attack");
                return Input::Attack {
                    attacker: at,
                    defender: Some(target),
                    path: covered,
                };
            }
            if monster.weapon.kind == AttackKind::AreaOfEffect {
                // Area weapons still fire for effect with nobody in the
                // vector; other categories keep scanning.
                debug!(%at, "verdict: monster area attack (whiff)");
                return Input::Attack {
                    attacker: at,
                    defender: None,
                    path: covered,
                };
            }
        }

        // 8. Turn completion fallback.
        Input::ReffingFinished {
            new_turn: clock.take_new_turn(),
        }
    }

    /// Whether any further legal action exists for the player: a matchable
    /// cluster adjacent to them, an open tile toward the exit, or an
    /// in-range live monster target.
    ///
    /// "Open" means anything but rock: empty cells allow descent, and an
    /// item, exit, or monster in the way is itself a pending interaction.
    fn any_move_left(board: &Board, at: Coordinate, player: &Combatant) -> bool {
        if at.neighbors().iter().any(|n| board.cluster_size(*n) > 2) {
            return true;
        }
        if board
            .get(at.step(Direction::South))
            .is_some_and(|tile| !tile.is_rock())
        {
            return true;
        }
        Self::first_live_target(board, at, &player.weapon).is_some()
    }

    /// First live monster in the weapon's vector, scanning each direction
    /// outward.
    fn first_live_target(board: &Board, from: Coordinate, weapon: &Weapon) -> Option<Coordinate> {
        weapon.vector(from).find(|cell| {
            board
                .get(*cell)
                .and_then(Tile::as_monster)
                .is_some_and(|monster| !monster.is_dead())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat;
    use crate::tile::ItemKind;

    fn standard_referee() -> Referee {
        Referee::new(WinRule::ExitReached)
    }

    mod turn_clock_tests {
        use super::*;

        #[test]
        fn advance_raises_flag_once() {
            let mut clock = TurnClock::new();
            assert_eq!(clock.turn(), 0);
            assert!(!clock.take_new_turn());

            clock.advance();
            assert_eq!(clock.turn(), 1);
            assert!(clock.take_new_turn());
            assert!(!clock.take_new_turn()); // cleared by the read
        }
    }

    mod priority_tests {
        use super::*;

        #[test]
        fn win_beats_everything() {
            // Exit below the player, plus a live monster in pickaxe range.
            let board = Board::from_text(
                ". P .
                 . E .
                 . M d",
            )
            .unwrap();
            let mut clock = TurnClock::new();
            assert_eq!(
                standard_referee().evaluate(&board, &mut clock),
                Input::GameWon
            );
        }

        #[test]
        fn attack_beats_monster_death_and_collection() {
            // Dead monster earlier in scan order, item below the player,
            // and a live monster in the pickaxe's south vector.
            let mut board = Board::from_text(
                "M . .
                 . P .
                 d M d",
            )
            .unwrap();
            if let Some(dead) = board
                .get_mut(Coordinate::new(0, 0))
                .and_then(Tile::as_monster_mut)
            {
                dead.hp = 0;
            }
            board.set(Coordinate::new(2, 0), Tile::Item(ItemKind::Coin));

            let mut clock = TurnClock::new();
            let verdict = standard_referee().evaluate(&board, &mut clock);
            assert_eq!(
                verdict,
                Input::Attack {
                    attacker: Coordinate::new(1, 1),
                    defender: Some(Coordinate::new(2, 1)),
                    path: vec![Coordinate::new(2, 1)],
                }
            );
        }

        #[test]
        fn no_moves_is_checked_before_player_death() {
            // Player at full health but boxed in: no cluster over two, no
            // open descent, no monster in range.
            let board = Board::from_text(
                "d s d
                 s P s
                 d o d",
            )
            .unwrap();
            let mut clock = TurnClock::new();
            assert_eq!(
                standard_referee().evaluate(&board, &mut clock),
                Input::GameLost {
                    reason: LoseReason::NoMoreMoves
                }
            );
        }

        #[test]
        fn player_death_fires_when_moves_remain() {
            let mut board = Board::from_text(
                "d d d
                 . P .
                 . . .",
            )
            .unwrap();
            if let Some(player) = board
                .get_mut(Coordinate::new(1, 1))
                .and_then(Tile::as_player_mut)
            {
                player.hp = 0;
            }
            let mut clock = TurnClock::new();
            assert_eq!(
                standard_referee().evaluate(&board, &mut clock),
                Input::GameLost {
                    reason: LoseReason::PlayerDied
                }
            );
        }
    }

    mod scenario_tests {
        use super::*;

        #[test]
        fn pickaxe_attack_then_monster_death_across_passes() {
            let mut board = Board::from_text(
                ". . .
                 . P .
                 . M .",
            )
            .unwrap();
            if let Some(monster) = board
                .get_mut(Coordinate::new(2, 1))
                .and_then(Tile::as_monster_mut)
            {
                monster.hp = 1;
            }
            let referee = standard_referee();
            let mut clock = TurnClock::new();

            let verdict = referee.evaluate(&board, &mut clock);
            let Input::Attack {
                attacker,
                defender: Some(defender),
                ..
            } = verdict
            else {
                panic!("expected an attack, got {verdict:?}");
            };
            assert_eq!(attacker, Coordinate::new(1, 1));
            assert_eq!(defender, Coordinate::new(2, 1));

            // Apply the attack the way the session does, then re-evaluate.
            let player = board.get(attacker).and_then(Tile::as_player).unwrap().clone();
            let monster = board.get(defender).and_then(Tile::as_monster).unwrap().clone();
            let (player_after, monster_after) = combat::resolve(&player, &monster);
            board.set(attacker, Tile::Player(player_after));
            board.set(defender, Tile::Monster(monster_after));

            assert_eq!(
                referee.evaluate(&board, &mut clock),
                Input::MonsterDied {
                    at: Coordinate::new(2, 1)
                }
            );
        }

        #[test]
        fn one_monster_death_per_pass_in_row_major_order() {
            let mut board = Board::from_text(
                "M . M
                 . P .
                 . . .",
            )
            .unwrap();
            for at in [Coordinate::new(0, 0), Coordinate::new(0, 2)] {
                if let Some(monster) = board.get_mut(at).and_then(Tile::as_monster_mut) {
                    monster.hp = -1;
                }
            }
            let mut clock = TurnClock::new();
            let verdict = standard_referee().evaluate(&board, &mut clock);
            assert_eq!(
                verdict,
                Input::MonsterDied {
                    at: Coordinate::new(0, 0)
                }
            );

            // Clear the first and the next pass reports the second.
            board.set(Coordinate::new(0, 0), Tile::Empty);
            assert_eq!(
                standard_referee().evaluate(&board, &mut clock),
                Input::MonsterDied {
                    at: Coordinate::new(0, 2)
                }
            );
        }

        #[test]
        fn collection_reports_updated_running_total() {
            let mut board = Board::from_text(
                ". P .
                 . g .
                 . . .",
            )
            .unwrap();
            if let Some(player) = board
                .get_mut(Coordinate::new(0, 1))
                .and_then(Tile::as_player_mut)
            {
                player.gems = 2;
                player.attacks_made = 1; // keep rule 4 quiet
            }
            let mut clock = TurnClock::new();
            let verdict = standard_referee().evaluate(&board, &mut clock);
            assert_eq!(
                verdict,
                Input::CollectItem {
                    item: ItemKind::Gem,
                    at: Coordinate::new(1, 1),
                    total: 3,
                }
            );
        }
    }

    mod monster_attack_tests {
        use super::*;

        /// Player at (0,0) with spent attacks, a matchable dirt run for
        /// moves, and a monster slot at (1,0) striking north.
        fn ambush_board() -> Board {
            let mut board = Board::from_text(
                "P . . .
                 M d d d
                 . . . .
                 . . . .",
            )
            .unwrap();
            if let Some(player) = board
                .get_mut(Coordinate::new(0, 0))
                .and_then(Tile::as_player_mut)
            {
                player.attacks_made = 1;
            }
            board
        }

        #[test]
        fn melee_monster_strikes_the_player_above() {
            let board = ambush_board();
            let mut clock = TurnClock::new();
            let verdict = standard_referee().evaluate(&board, &mut clock);
            assert_eq!(
                verdict,
                Input::Attack {
                    attacker: Coordinate::new(1, 0),
                    defender: Some(Coordinate::new(0, 0)),
                    path: vec![Coordinate::new(0, 0)],
                }
            );
        }

        #[test]
        fn spent_monster_does_not_attack() {
            let mut board = ambush_board();
            if let Some(monster) = board
                .get_mut(Coordinate::new(1, 0))
                .and_then(Tile::as_monster_mut)
            {
                monster.attacks_made = 1;
            }
            let mut clock = TurnClock::new();
            assert_eq!(
                standard_referee().evaluate(&board, &mut clock),
                Input::ReffingFinished { new_turn: false }
            );
        }

        #[test]
        fn charges_monster_waits_for_full_accumulator() {
            let mut board = ambush_board();
            if let Some(monster) = board
                .get_mut(Coordinate::new(1, 0))
                .and_then(Tile::as_monster_mut)
            {
                monster.weapon = Weapon::ember_lance();
            }
            let mut clock = TurnClock::new();
            assert_eq!(
                standard_referee().evaluate(&board, &mut clock),
                Input::ReffingFinished { new_turn: false }
            );

            if let Some(monster) = board
                .get_mut(Coordinate::new(1, 0))
                .and_then(Tile::as_monster_mut)
            {
                monster.weapon.charge = 3;
            }
            let verdict = standard_referee().evaluate(&board, &mut clock);
            assert!(matches!(
                verdict,
                Input::Attack {
                    attacker,
                    defender: Some(_),
                    ..
                } if attacker == Coordinate::new(1, 0)
            ));
        }

        #[test]
        fn area_monster_whiffs_when_nobody_is_in_the_vector() {
            let mut board = Board::from_text(
                "P . . .
                 d d d .
                 . . . M
                 . . . .",
            )
            .unwrap();
            if let Some(player) = board
                .get_mut(Coordinate::new(0, 0))
                .and_then(Tile::as_player_mut)
            {
                player.attacks_made = 1;
            }
            if let Some(monster) = board
                .get_mut(Coordinate::new(2, 3))
                .and_then(Tile::as_monster_mut)
            {
                monster.weapon = Weapon::quake_maul();
            }
            let mut clock = TurnClock::new();
            clock.advance();
            clock.advance(); // turn 2 lands on the maul's cadence
            match standard_referee().evaluate(&board, &mut clock) {
                Input::Attack {
                    attacker,
                    defender: None,
                    path,
                } => {
                    assert_eq!(attacker, Coordinate::new(2, 3));
                    assert!(!path.is_empty());
                }
                other => panic!("expected a whiff attack, got {other:?}"),
            }
        }

        #[test]
        fn non_area_monster_out_of_reach_keeps_scanning() {
            // Same layout, but claws instead of an area weapon: the scan
            // passes the monster and falls through to turn completion.
            let mut board = Board::from_text(
                "P . . .
                 d d d .
                 . . . M
                 . . . .",
            )
            .unwrap();
            if let Some(player) = board
                .get_mut(Coordinate::new(0, 0))
                .and_then(Tile::as_player_mut)
            {
                player.attacks_made = 1;
            }
            let mut clock = TurnClock::new();
            assert_eq!(
                standard_referee().evaluate(&board, &mut clock),
                Input::ReffingFinished { new_turn: false }
            );
        }
    }

    mod fallback_tests {
        use super::*;

        #[test]
        fn fallback_reports_and_clears_the_new_turn_flag() {
            let board = Board::from_text(
                "P .
                 . .",
            )
            .unwrap();
            let mut clock = TurnClock::new();
            clock.advance();

            let referee = standard_referee();
            assert_eq!(
                referee.evaluate(&board, &mut clock),
                Input::ReffingFinished { new_turn: true }
            );
            assert_eq!(
                referee.evaluate(&board, &mut clock),
                Input::ReffingFinished { new_turn: false }
            );
        }

        #[test]
        fn empty_board_falls_through_to_turn_completion() {
            let board = Board::new(3).unwrap();
            let mut clock = TurnClock::new();
            assert_eq!(
                standard_referee().evaluate(&board, &mut clock),
                Input::ReffingFinished { new_turn: false }
            );
        }

        #[test]
        fn missing_win_rule_mapping_is_refused_at_load() {
            let config = LevelConfig::tutorial_currency(0);
            assert!(Referee::for_level(&config).is_err());
        }
    }
}
