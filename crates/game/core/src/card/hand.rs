use super::{Card, CardError};

/// Cards offered to one side this turn, plus the once-per-turn gate.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CardHand {
    cards: Vec<Card>,
    can_use: bool,
}

impl CardHand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn can_use(&self) -> bool {
        self.can_use && !self.cards.is_empty()
    }

    /// Replaces the hand with a fresh draw and re-opens it.
    pub fn offer(&mut self, cards: Vec<Card>) {
        self.cards = cards;
        self.can_use = true;
    }

    /// Removes card `index` and closes the hand; the rest are discarded.
    pub fn take(&mut self, index: usize) -> Result<Card, CardError> {
        if !self.can_use {
            return Err(CardError::AlreadyUsed);
        }
        if self.cards.is_empty() {
            return Err(CardError::NoCards);
        }
        if index >= self.cards.len() {
            return Err(CardError::InvalidIndex {
                index,
                len: self.cards.len(),
            });
        }
        let card = self.cards.swap_remove(index);
        self.close();
        Ok(card)
    }

    /// Discards every card and blocks use until the next offer.
    pub fn close(&mut self) {
        self.cards.clear();
        self.can_use = false;
    }
}
