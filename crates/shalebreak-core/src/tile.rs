//! Tile variants and the combat data carried by player and monster tiles.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::weapon::Weapon;

/// A matchable rock color. Clusters of three or more same-kind rock are the
/// player's dig moves.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RockKind {
    /// Soft brown filler.
    Dirt,
    /// Grey filler.
    Stone,
    /// Red filler.
    Clay,
    /// Glittering filler.
    Ore,
}

/// A collectible item, each kind its own currency category.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Tutorial/progression gem.
    Gem,
    /// Spendable coin.
    Coin,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gem => write!(f, "gem"),
            Self::Coin => write!(f, "coin"),
        }
    }
}

/// Combat data for a player or monster tile.
///
/// Hit points may go to zero or below transiently — that marks an entity as
/// "died this resolution pass" and the referee reports it on a later pass;
/// it is valid intermediate state, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    /// Current hit points.
    pub hp: i32,
    /// Attacks taken this turn.
    pub attacks_made: u32,
    /// Attacks allowed per turn. Constant, currently always 1.
    pub attacks_per_turn: u32,
    /// Equipped weapon.
    pub weapon: Weapon,
    /// Item currently carried, if any.
    pub carrying: Option<ItemKind>,
    /// Running gem total.
    pub gems: u32,
    /// Running coin total.
    pub coins: u32,
}

impl Combatant {
    /// Creates a combatant with full per-turn attack budget.
    #[must_use]
    pub const fn new(hp: i32, weapon: Weapon) -> Self {
        Self {
            hp,
            attacks_made: 0,
            attacks_per_turn: 1,
            weapon,
            carrying: None,
            gems: 0,
            coins: 0,
        }
    }

    /// The default player: 3 hp, pickaxe.
    #[must_use]
    pub fn player() -> Self {
        Self::new(3, Weapon::pickaxe())
    }

    /// A monster with the given hp and weapon.
    #[must_use]
    pub const fn monster(hp: i32, weapon: Weapon) -> Self {
        Self::new(hp, weapon)
    }

    /// Whether this combatant still has attack budget this turn.
    #[must_use]
    pub const fn can_attack(&self) -> bool {
        self.attacks_made < self.attacks_per_turn
    }

    /// Whether this combatant died this resolution pass.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    /// Running total for one currency category.
    #[must_use]
    pub const fn collected(&self, kind: ItemKind) -> u32 {
        match kind {
            ItemKind::Gem => self.gems,
            ItemKind::Coin => self.coins,
        }
    }
}

/// One board cell's content.
///
/// Exactly the player and monster variants carry combat data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Tile {
    /// An open cell.
    Empty,
    /// Matchable filler rock.
    Rock(RockKind),
    /// The player.
    Player(Combatant),
    /// A monster.
    Monster(Combatant),
    /// A collectible item.
    Item(ItemKind),
    /// The level exit.
    Exit,
}

impl Tile {
    /// Returns `true` for an open cell.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns `true` for rock of any kind.
    #[must_use]
    pub const fn is_rock(&self) -> bool {
        matches!(self, Self::Rock(_))
    }

    /// Returns the rock kind, if this is rock.
    #[must_use]
    pub const fn rock_kind(&self) -> Option<RockKind> {
        match self {
            Self::Rock(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Returns `true` for the exit.
    #[must_use]
    pub const fn is_exit(&self) -> bool {
        matches!(self, Self::Exit)
    }

    /// Returns the player's combat data, if this is the player.
    #[must_use]
    pub const fn as_player(&self) -> Option<&Combatant> {
        match self {
            Self::Player(combatant) => Some(combatant),
            _ => None,
        }
    }

    /// Returns mutable player combat data, if this is the player.
    #[must_use]
    pub fn as_player_mut(&mut self) -> Option<&mut Combatant> {
        match self {
            Self::Player(combatant) => Some(combatant),
            _ => None,
        }
    }

    /// Returns the monster's combat data, if this is a monster.
    #[must_use]
    pub const fn as_monster(&self) -> Option<&Combatant> {
        match self {
            Self::Monster(combatant) => Some(combatant),
            _ => None,
        }
    }

    /// Returns mutable monster combat data, if this is a monster.
    #[must_use]
    pub fn as_monster_mut(&mut self) -> Option<&mut Combatant> {
        match self {
            Self::Monster(combatant) => Some(combatant),
            _ => None,
        }
    }

    /// Returns combat data for either combatant variant.
    #[must_use]
    pub const fn as_combatant(&self) -> Option<&Combatant> {
        match self {
            Self::Player(combatant) | Self::Monster(combatant) => Some(combatant),
            _ => None,
        }
    }

    /// Returns mutable combat data for either combatant variant.
    #[must_use]
    pub fn as_combatant_mut(&mut self) -> Option<&mut Combatant> {
        match self {
            Self::Player(combatant) | Self::Monster(combatant) => Some(combatant),
            _ => None,
        }
    }

    /// Returns the item kind, if this is an item.
    #[must_use]
    pub const fn as_item(&self) -> Option<ItemKind> {
        match self {
            Self::Item(kind) => Some(*kind),
            _ => None,
        }
    }

    /// The one-character fixture glyph for this tile.
    ///
    /// Lossy for combatants: any player renders `P`, any monster `M`.
    #[must_use]
    pub const fn glyph(&self) -> char {
        match self {
            Self::Empty => '.',
            Self::Rock(RockKind::Dirt) => 'd',
            Self::Rock(RockKind::Stone) => 's',
            Self::Rock(RockKind::Clay) => 'y',
            Self::Rock(RockKind::Ore) => 'o',
            Self::Player(_) => 'P',
            Self::Monster(_) => 'M',
            Self::Item(ItemKind::Gem) => 'g',
            Self::Item(ItemKind::Coin) => '$',
            Self::Exit => 'E',
        }
    }

    /// Parses a fixture glyph. `P` and `M` produce default combatants.
    #[must_use]
    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '.' => Some(Self::Empty),
            'd' => Some(Self::Rock(RockKind::Dirt)),
            's' => Some(Self::Rock(RockKind::Stone)),
            'y' => Some(Self::Rock(RockKind::Clay)),
            'o' => Some(Self::Rock(RockKind::Ore)),
            'P' => Some(Self::Player(Combatant::player())),
            'M' => Some(Self::Monster(Combatant::monster(2, Weapon::claws()))),
            'g' => Some(Self::Item(ItemKind::Gem)),
            '$' => Some(Self::Item(ItemKind::Coin)),
            'E' => Some(Self::Exit),
            _ => None,
        }
    }
}
