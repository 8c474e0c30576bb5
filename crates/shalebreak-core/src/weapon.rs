//! Weapons and their derived attack vectors.
//!
//! A weapon is a range, a damage value, a non-empty set of cardinal attack
//! directions, an attack category, a durability, and a charge accumulator.
//! The derived attack vector is the direction set crossed with the inclusive
//! distance interval starting at 1 — an entity can never target its own
//! cell.
//!
//! # Example
//!
//! ```
//! use shalebreak_core::board::Coordinate;
//! use shalebreak_core::weapon::Weapon;
//!
//! let pickaxe = Weapon::pickaxe();
//! let covered: Vec<_> = pickaxe.vector(Coordinate::new(1, 1)).collect();
//! assert_eq!(covered, vec![Coordinate::new(2, 1)]);
//! ```

use serde::{Deserialize, Serialize};

use crate::board::{Board, Coordinate, Direction, Directions};

/// How a weapon's attacks are delivered and scheduled.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackKind {
    /// Adjacent strikes, due every turn.
    Melee,
    /// Distance strikes, due every turn.
    Ranged,
    /// Fires when the charge accumulator is full.
    Charges,
    /// Fires on a turn cadence and hits its whole vector, defender or not.
    AreaOfEffect,
    /// Fires on a turn cadence at a specific in-vector target.
    Targets,
}

/// Remaining weapon uses.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Durability {
    /// Never wears out.
    Unlimited,
    /// Breaks after the contained number of further uses.
    Limited(u32),
}

/// A combatant's equipped weapon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    /// Reach, in cells. Always at least 1.
    pub range: u32,
    /// Hit points removed per landed attack.
    pub damage: i32,
    /// Cardinal directions the weapon can strike in. Never empty.
    pub directions: Directions,
    /// Delivery/scheduling category.
    pub kind: AttackKind,
    /// Remaining uses.
    pub durability: Durability,
    /// Turns of charge required before a charges-kind weapon fires; also
    /// the attack cadence for targets/area-of-effect weapons.
    pub charge_time: u32,
    /// Accumulated charge.
    pub charge: u32,
}

impl Weapon {
    /// Creates an unlimited-durability weapon with no charge requirement.
    ///
    /// A zero range is clamped to 1 and an empty direction set widens to all
    /// four cardinals, so the attack-vector invariants hold for any input.
    #[must_use]
    pub fn new(kind: AttackKind, range: u32, damage: i32, directions: Directions) -> Self {
        Self {
            range: range.max(1),
            damage,
            directions: if directions.is_empty() {
                Directions::all()
            } else {
                directions
            },
            kind,
            durability: Durability::Unlimited,
            charge_time: 0,
            charge: 0,
        }
    }

    /// Limits the weapon to the given number of uses.
    #[must_use]
    pub const fn with_durability(mut self, uses: u32) -> Self {
        self.durability = Durability::Limited(uses);
        self
    }

    /// Sets the charge requirement / attack cadence.
    #[must_use]
    pub const fn with_charge_time(mut self, turns: u32) -> Self {
        self.charge_time = turns;
        self
    }

    /// The player's starting tool: melee, range 1, damage 1, south only.
    #[must_use]
    pub fn pickaxe() -> Self {
        Self::new(AttackKind::Melee, 1, 1, Directions::SOUTH)
    }

    /// Default monster claws: melee, range 1, damage 1, north only.
    #[must_use]
    pub fn claws() -> Self {
        Self::new(AttackKind::Melee, 1, 1, Directions::NORTH)
    }

    /// All-direction melee blade, damage 2.
    #[must_use]
    pub fn broadsword() -> Self {
        Self::new(AttackKind::Melee, 1, 2, Directions::all())
    }

    /// Ranged bolt thrower: range 3, damage 1, east/west.
    #[must_use]
    pub fn crossbow() -> Self {
        Self::new(
            AttackKind::Ranged,
            3,
            1,
            Directions::EAST | Directions::WEST,
        )
    }

    /// A charges-kind monster weapon: builds for three turns, then fires.
    #[must_use]
    pub fn ember_lance() -> Self {
        Self::new(AttackKind::Charges, 2, 2, Directions::NORTH).with_charge_time(3)
    }

    /// An area-of-effect monster weapon on a two-turn cadence.
    #[must_use]
    pub fn quake_maul() -> Self {
        Self::new(AttackKind::AreaOfEffect, 1, 1, Directions::all()).with_charge_time(2)
    }

    /// Whether a limited-durability weapon has no uses left.
    #[must_use]
    pub const fn is_broken(&self) -> bool {
        matches!(self.durability, Durability::Limited(0))
    }

    /// Consumes one use of a limited-durability weapon.
    pub fn spend_use(&mut self) {
        if let Durability::Limited(uses) = &mut self.durability {
            *uses = uses.saturating_sub(1);
        }
    }

    /// Accumulates one turn of charge, saturating at the requirement.
    pub fn tick_charge(&mut self) {
        if self.charge < self.charge_time {
            self.charge += 1;
        }
    }

    /// Whether the charge accumulator has reached the requirement.
    #[must_use]
    pub const fn charged(&self) -> bool {
        self.charge >= self.charge_time
    }

    /// Empties the charge accumulator.
    pub fn reset_charge(&mut self) {
        self.charge = 0;
    }

    /// Whether an attack by this weapon is due on the given global turn.
    ///
    /// Charges weapons wait on their accumulator; targets and area-of-effect
    /// weapons fire when the turn counter lands on their cadence; melee and
    /// ranged weapons are due every turn.
    #[must_use]
    pub const fn due_this_turn(&self, turn: u32) -> bool {
        match self.kind {
            AttackKind::Charges => self.charged(),
            AttackKind::Targets | AttackKind::AreaOfEffect => {
                self.charge_time > 0 && turn % self.charge_time == 0
            }
            AttackKind::Melee | AttackKind::Ranged => true,
        }
    }

    /// Iterates the attack vector from an origin: each contained direction
    /// scanned outward from distance 1 through the weapon's range.
    ///
    /// The origin cell itself is never produced. Cells may be out of board
    /// bounds; [`Weapon::covered`] clips them.
    #[must_use]
    pub fn vector(&self, origin: Coordinate) -> AttackVector {
        AttackVector {
            origin,
            directions: self.directions.iter_directions().collect(),
            range: self.range,
            dir_index: 0,
            steps: 0,
            cursor: origin,
        }
    }

    /// The in-bounds cells the attack vector covers on the given board.
    #[must_use]
    pub fn covered(&self, origin: Coordinate, board: &Board) -> Vec<Coordinate> {
        self.vector(origin)
            .filter(|at| board.in_bounds(*at))
            .collect()
    }
}

/// Iterator over the cells of a weapon's attack vector.
///
/// Produced by [`Weapon::vector`]. Yields each direction's cells outward
/// (distance 1 first) before moving to the next direction, in
/// north/south/east/west scan order.
#[derive(Debug, Clone)]
pub struct AttackVector {
    origin: Coordinate,
    directions: Vec<Direction>,
    range: u32,
    dir_index: usize,
    steps: u32,
    cursor: Coordinate,
}

impl Iterator for AttackVector {
    type Item = Coordinate;

    fn next(&mut self) -> Option<Coordinate> {
        loop {
            let direction = *self.directions.get(self.dir_index)?;
            if self.steps == self.range {
                self.dir_index += 1;
                self.steps = 0;
                self.cursor = self.origin;
                continue;
            }
            self.cursor = self.cursor.step(direction);
            self.steps += 1;
            return Some(self.cursor);
        }
    }
}
