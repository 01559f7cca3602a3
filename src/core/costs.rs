//! Cost system for activated abilities
//!
//! Costs are checked as a whole before anything is paid, then paid
//! together. A cost that cannot be paid in full is not paid at all.

use crate::core::{CardId, ManaCost, PlayerId};
use crate::game::GameState;
use serde::{Deserialize, Serialize};

/// A cost that must be paid to activate an ability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cost {
    /// Tap the source permanent ({T})
    Tap,

    /// Pay mana from the activating player's pool
    Mana(ManaCost),

    /// Pay life
    PayLife { amount: i32 },
}

impl Cost {
    /// Parse a cost string such as "T", "2 T", "1R" or "PayLife<2>"
    ///
    /// Components are space separated; unrecognised components and mana
    /// amounts too large to represent make the whole string invalid.
    pub fn parse_list(cost_str: &str) -> Option<Vec<Cost>> {
        let mut costs = Vec::new();
        let mut mana = ManaCost::new();

        for token in cost_str.split_whitespace() {
            if token == "T" || token == "Tap" {
                costs.push(Cost::Tap);
            } else if let Some(amount) = token
                .strip_prefix("PayLife<")
                .and_then(|rest| rest.strip_suffix('>'))
            {
                costs.push(Cost::PayLife {
                    amount: amount.parse().ok()?,
                });
            } else if token.chars().all(|c| c.is_ascii_digit() || "WUBRGC".contains(c)) {
                mana = mana.checked_add(&ManaCost::parse(token)?)?;
            } else {
                return None;
            }
        }

        if !mana.is_zero() {
            costs.push(Cost::Mana(mana));
        }
        Some(costs)
    }

    pub fn includes_tap(costs: &[Cost]) -> bool {
        costs.iter().any(|c| matches!(c, Cost::Tap))
    }

    /// Can `player` pay this cost for an ability of `source`?
    pub fn can_pay(&self, state: &GameState, player: PlayerId, source: CardId) -> bool {
        match self {
            Cost::Tap => state.cards.get(source).is_ok_and(|card| !card.tapped),
            Cost::Mana(mana) => state
                .players
                .get(player)
                .is_ok_and(|p| p.mana_pool.can_pay(mana)),
            // Paying life down to exactly 0 is allowed
            Cost::PayLife { amount } => state.players.get(player).is_ok_and(|p| p.life >= *amount),
        }
    }

    /// Pay this cost on a working copy of the state
    ///
    /// Returns false if the cost could not be paid; callers check
    /// `can_pay` for every cost first, so this is only a safety net.
    pub fn pay(&self, state: &mut GameState, player: PlayerId, source: CardId) -> bool {
        match self {
            Cost::Tap => match state.cards.get_mut(source) {
                Ok(card) if !card.tapped => {
                    card.tap();
                    true
                }
                _ => false,
            },
            Cost::Mana(mana) => match state.players.get_mut(player) {
                Ok(p) => match p.mana_pool.pay(mana) {
                    Some(remaining) => {
                        p.mana_pool = remaining;
                        true
                    }
                    None => false,
                },
                Err(_) => false,
            },
            Cost::PayLife { amount } => match state.players.get_mut(player) {
                Ok(p) if p.life >= *amount => {
                    p.lose_life(*amount);
                    true
                }
                _ => false,
            },
        }
    }
}
