//! Game zones (Library, Hand, Graveyard, Battlefield, etc.)

use crate::core::{CardId, GameEntity, PlayerId, ZoneId};
use serde::{Deserialize, Serialize};

/// Different zones where cards can exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Library,
    Hand,
    Battlefield,
    Graveyard,
    Exile,
    Stack,
}

impl Zone {
    /// Zones where the order of cards carries meaning
    pub fn is_ordered(&self) -> bool {
        matches!(self, Zone::Library | Zone::Stack)
    }
}

/// A zone containing cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardZone {
    pub id: ZoneId,

    pub zone_type: Zone,

    /// Owning player; `None` for the game-owned Stack
    pub owner: Option<PlayerId>,

    /// Cards in this zone. For Library and Stack the last element is the top.
    pub cards: Vec<CardId>,
}

impl CardZone {
    pub fn new(id: ZoneId, zone_type: Zone, owner: Option<PlayerId>) -> Self {
        CardZone {
            id,
            zone_type,
            owner,
            cards: Vec::new(),
        }
    }

    pub fn add(&mut self, card_id: CardId) {
        self.cards.push(card_id);
    }

    pub fn remove(&mut self, card_id: CardId) -> bool {
        if let Some(pos) = self.cards.iter().position(|&id| id == card_id) {
            // remove() rather than swap_remove(): iteration order stays
            // stable, which keeps trigger ordering deterministic.
            self.cards.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, card_id: CardId) -> bool {
        self.cards.contains(&card_id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Look at top card without removing it
    pub fn peek_top(&self) -> Option<CardId> {
        self.cards.last().copied()
    }

    /// Shuffle the zone (for Library)
    pub fn shuffle(&mut self, rng: &mut impl rand::Rng) {
        use rand::seq::SliceRandom;
        self.cards.shuffle(rng);
    }
}

impl GameEntity<CardZone> for CardZone {
    fn id(&self) -> ZoneId {
        self.id
    }

    fn name(&self) -> &str {
        match self.zone_type {
            Zone::Library => "Library",
            Zone::Hand => "Hand",
            Zone::Battlefield => "Battlefield",
            Zone::Graveyard => "Graveyard",
            Zone::Exile => "Exile",
            Zone::Stack => "Stack",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_card_zone() {
        let mut zone = CardZone::new(ZoneId::new(1), Zone::Hand, Some(PlayerId::new(0)));

        assert!(zone.is_empty());

        let card1 = CardId::new(10);
        let card2 = CardId::new(11);

        zone.add(card1);
        zone.add(card2);

        assert_eq!(zone.len(), 2);
        assert!(zone.contains(card1));

        assert!(zone.remove(card1));
        assert!(!zone.remove(card1));
        assert_eq!(zone.len(), 1);
        assert_eq!(zone.peek_top(), Some(card2));
        assert_eq!(zone.name(), "Hand");
    }

    #[test]
    fn test_seeded_shuffle_is_deterministic() {
        let mut a = CardZone::new(ZoneId::new(1), Zone::Library, Some(PlayerId::new(0)));
        for i in 0..20 {
            a.add(CardId::new(100 + i));
        }
        let mut b = a.clone();

        a.shuffle(&mut rand_chacha::ChaCha12Rng::seed_from_u64(7));
        b.shuffle(&mut rand_chacha::ChaCha12Rng::seed_from_u64(7));
        assert_eq!(a.cards, b.cards);
        assert!(Zone::Library.is_ordered());
        assert!(!Zone::Hand.is_ordered());
    }
}
