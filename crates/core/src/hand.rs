use crate::Card;

pub const BLACKJACK_TOTAL: i64 = 21;

/// Ordered cards plus derived scoring fields, re-derived on every
/// mutation so readers never see a stale total.
#[derive(Debug, Default, Clone)]
pub struct Hand {
    pub cards: Vec<Card>,
    pub total_value: i64,
    pub is_blackjack: bool,
    pub is_bust: bool,
    pub is_soft: bool,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
        self.recompute();
    }

    /// Empties the hand and returns the cards for discarding.
    pub fn clear(&mut self) -> Vec<Card> {
        let cards = std::mem::take(&mut self.cards);
        self.recompute();
        cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Aces count as 1; if the hard total is 11 or less and an ace is
    /// present, one ace is promoted to 11 (the soft total).
    fn recompute(&mut self) {
        let hard: i64 = self.cards.iter().map(|c| c.rank.value()).sum();
        let has_ace = self.cards.iter().any(|c| c.rank.value() == 1);

        self.is_soft = has_ace && hard <= 11;
        self.total_value = if self.is_soft { hard + 10 } else { hard };
        self.is_bust = hard > BLACKJACK_TOTAL;
        self.is_blackjack = self.cards.len() == 2 && self.total_value == BLACKJACK_TOTAL;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Rank, Suit};

    fn card(rank: Rank) -> Card {
        Card::new(Suit::Spades, rank)
    }

    #[test]
    fn ace_softens_until_it_would_bust() {
        let mut hand = Hand::new();
        hand.add_card(card(Rank::Ace));
        hand.add_card(card(Rank::Six));
        assert_eq!(hand.total_value, 17);
        assert!(hand.is_soft);

        hand.add_card(card(Rank::Ten));
        assert_eq!(hand.total_value, 17);
        assert!(!hand.is_soft);
        assert!(!hand.is_bust);
    }

    #[test]
    fn blackjack_requires_exactly_two_cards() {
        let mut hand = Hand::new();
        hand.add_card(card(Rank::Ace));
        hand.add_card(card(Rank::King));
        assert!(hand.is_blackjack);

        let mut drawn = Hand::new();
        drawn.add_card(card(Rank::Seven));
        drawn.add_card(card(Rank::Seven));
        drawn.add_card(card(Rank::Seven));
        assert_eq!(drawn.total_value, 21);
        assert!(!drawn.is_blackjack);
    }

    #[test]
    fn clear_resets_derived_fields() {
        let mut hand = Hand::new();
        hand.add_card(card(Rank::King));
        hand.add_card(card(Rank::Queen));
        hand.add_card(card(Rank::Five));
        assert!(hand.is_bust);

        let cards = hand.clear();
        assert_eq!(cards.len(), 3);
        assert_eq!(hand.total_value, 0);
        assert!(!hand.is_bust);
    }
}
