use rand::Rng;
use rand::seq::index;

use super::Card;

/// Fixed catalog cards are drawn from.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardPool {
    cards: Vec<Card>,
}

impl CardPool {
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&Card> {
        self.cards.iter().find(|card| card.name == name)
    }

    /// See [`draw_cards`].
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Vec<Card> {
        draw_cards(self, rng, count)
    }
}

impl FromIterator<Card> for CardPool {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Samples `min(count, pool size)` distinct cards from the full pool.
///
/// Draws are independent: nothing from a previous draw is excluded.
pub fn draw_cards<R: Rng + ?Sized>(pool: &CardPool, rng: &mut R, count: usize) -> Vec<Card> {
    let amount = count.min(pool.len());
    index::sample(rng, pool.len(), amount)
        .into_iter()
        .map(|i| pool.cards[i].clone())
        .collect()
}
