//! Card registry for catalog lookup.
//!
//! The `CardRegistry` holds the catalog a game draws its decks from. Cards
//! are stored behind `Arc` so every card object in every game shares one
//! template.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::definition::{Card, CardId};
use crate::core::{GameError, Result};

/// Registry of card definitions, looked up by id or by name.
///
/// ## Example
///
/// ```
/// use mtg_rules_engine::cards::{Card, CardRegistry};
/// use mtg_rules_engine::cards::attributes::CardType;
///
/// let mut registry = CardRegistry::new();
/// let id = registry.next_id();
/// registry.register(Card::new(id, "Forest", CardType::BasicLand)).unwrap();
///
/// assert_eq!(registry.get(id).unwrap().name, "Forest");
/// let deck = registry.deck(&[("Forest", 3)]).unwrap();
/// assert_eq!(deck.len(), 3);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, Arc<Card>>,
    by_name: FxHashMap<String, CardId>,
    next_id: u32,
}

impl CardRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve an unused card id.
    pub fn next_id(&mut self) -> CardId {
        while self.cards.contains_key(&CardId::new(self.next_id)) {
            self.next_id += 1;
        }
        let id = CardId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Register a card. Ids and names must both be unique.
    pub fn register(&mut self, card: Card) -> Result<CardId> {
        if self.cards.contains_key(&card.id) {
            return Err(GameError::Config(format!("{} already registered", card.id)));
        }
        if self.by_name.contains_key(&card.name) {
            return Err(GameError::Config(format!("{:?} already registered", card.name)));
        }
        let id = card.id;
        self.by_name.insert(card.name.clone(), id);
        self.cards.insert(id, Arc::new(card));
        Ok(id)
    }

    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Arc<Card>> {
        self.cards.get(&id)
    }

    pub fn get_by_name(&self, name: &str) -> Result<Arc<Card>> {
        self.by_name
            .get(name)
            .and_then(|id| self.cards.get(id))
            .cloned()
            .ok_or_else(|| GameError::UnknownCard(name.to_string()))
    }

    /// Build a deck list from `(name, copies)` pairs, in order.
    pub fn deck(&self, entries: &[(&str, usize)]) -> Result<Vec<Arc<Card>>> {
        let mut deck = Vec::new();
        for &(name, copies) in entries {
            let card = self.get_by_name(name)?;
            deck.extend(std::iter::repeat(card).take(copies));
        }
        Ok(deck)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Card>> {
        self.cards.values()
    }
}
