//! Pure combat arithmetic.
//!
//! These functions compute the outcome of one attacker acting on one
//! defender, and of an entity collecting an item. They are total, never
//! panic, and touch no shared state — callers receive updated copies and
//! decide where to write them.
//!
//! Damage may drive hit points to zero or below; deciding death is the
//! referee's job on its next pass, not this module's.

use crate::tile::{Combatant, ItemKind};

/// Resolves one attack.
///
/// The attacker's per-turn attack counter increments by exactly one; every
/// other attacker field is unchanged. The defender's hit points decrease by
/// exactly the attacker's weapon damage; every other defender field is
/// unchanged. Neither computation reads the other's output, so evaluation
/// order is immaterial.
#[must_use]
pub fn resolve(attacker: &Combatant, defender: &Combatant) -> (Combatant, Combatant) {
    let mut attacker_after = attacker.clone();
    attacker_after.attacks_made += 1;

    let mut defender_after = defender.clone();
    defender_after.hp -= attacker.weapon.damage;

    (attacker_after, defender_after)
}

/// Resolves an attack that lands on nobody.
///
/// Area-of-effect weapons still spend their attack when the vector is
/// empty of targets; only the attacker's counter moves.
#[must_use]
pub fn resolve_whiff(attacker: &Combatant) -> Combatant {
    let mut attacker_after = attacker.clone();
    attacker_after.attacks_made += 1;
    attacker_after
}

/// Resolves an entity collecting an item.
///
/// Marks the entity as carrying the item and increments the matching
/// currency total. Hit points and combat counters are untouched.
#[must_use]
pub fn resolve_collection(entity: &Combatant, item: ItemKind) -> Combatant {
    let mut entity_after = entity.clone();
    entity_after.carrying = Some(item);
    match item {
        ItemKind::Gem => entity_after.gems += 1,
        ItemKind::Coin => entity_after.coins += 1,
    }
    entity_after
}
