//! Card database for looking up card definitions
//!
//! The rules core only needs lookup by definition id; parsing card files
//! is left to whoever fills the database.

use crate::core::{CardDefinition, DefinitionId};
use crate::Result;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Card definitions keyed by definition id
#[derive(Debug, Clone, Default)]
pub struct CardDatabase {
    cards: FxHashMap<DefinitionId, Arc<CardDefinition>>,
}

impl CardDatabase {
    /// Create an empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON array of card definitions
    pub fn from_json(json: &str) -> Result<Self> {
        let definitions: Vec<CardDefinition> = serde_json::from_str(json)?;
        let mut db = CardDatabase::new();
        for def in definitions {
            db.add_card(def);
        }
        Ok(db)
    }

    /// Add a single card definition, replacing any with the same id
    pub fn add_card(&mut self, card_def: CardDefinition) {
        self.cards.insert(card_def.id.clone(), Arc::new(card_def));
    }

    pub fn with_card(mut self, card_def: CardDefinition) -> Self {
        self.add_card(card_def);
        self
    }

    pub fn get_card(&self, id: &DefinitionId) -> Option<&Arc<CardDefinition>> {
        self.cards.get(id)
    }

    pub fn contains(&self, id: &DefinitionId) -> bool {
        self.cards.contains_key(id)
    }

    /// Total number of cards in database
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MtgError;

    #[test]
    fn test_empty_database() {
        let db = CardDatabase::new();
        assert_eq!(db.len(), 0);
        assert!(db.is_empty());
        assert!(db.get_card(&DefinitionId::from("lightning_bolt")).is_none());
    }

    #[test]
    fn test_add_and_lookup() {
        let db = CardDatabase::new()
            .with_card(CardDefinition::land("forest", "Forest"))
            .with_card(CardDefinition::creature("grizzly_bears", "Grizzly Bears", 2, 2));

        assert_eq!(db.len(), 2);
        let bears = db.get_card(&DefinitionId::from("grizzly_bears")).unwrap();
        assert_eq!(bears.toughness, Some(2));
        assert!(db.contains(&DefinitionId::from("forest")));
    }

    #[test]
    fn test_from_json() {
        let db = CardDatabase::from_json(
            r#"[
                {"id": "forest", "name": "Forest", "types": ["Land"]},
                {"id": "prodigal", "name": "Prodigal Pyromancer", "types": ["Creature"],
                 "power": 1, "toughness": 1,
                 "abilities": [{"key": "ping", "params": {"amount": 1}}]}
            ]"#,
        )
        .unwrap();
        assert_eq!(db.len(), 2);
        assert!(db.get_card(&DefinitionId::from("forest")).unwrap().is_land());

        let err = CardDatabase::from_json("{not json").unwrap_err();
        assert!(matches!(err, MtgError::SerializationError(_)));
    }
}
