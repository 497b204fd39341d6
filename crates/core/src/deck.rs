use crate::{Card, GameRng, Rank, Suit, DECK_SIZE};

/// Draw pile shrinking below this between rounds forces a reset.
pub const RESHUFFLE_THRESHOLD: usize = 20;

#[derive(Debug, Default, Clone)]
pub struct Deck {
    pub draw: Vec<Card>,
    pub discard: Vec<Card>,
}

impl Deck {
    pub fn standard52() -> Self {
        let mut draw = Vec::with_capacity(DECK_SIZE);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                draw.push(Card::new(suit, rank));
            }
        }
        Self {
            draw,
            discard: Vec::new(),
        }
    }

    pub fn shuffle(&mut self, rng: &mut GameRng) {
        rng.shuffle(&mut self.draw);
    }

    /// Removes from the back of the draw pile. `None` on an empty pile;
    /// callers must check.
    pub fn deal(&mut self) -> Option<Card> {
        let card = self.draw.pop();
        if card.is_none() {
            log::error!("deck: deal from empty draw pile");
        }
        card
    }

    pub fn discard(&mut self, mut card: Card) {
        card.face_up = true;
        self.discard.push(card);
    }

    pub fn discard_all(&mut self, cards: impl IntoIterator<Item = Card>) {
        for card in cards {
            self.discard(card);
        }
    }

    /// Folds the discard pile back into the draw pile and shuffles, for
    /// mid-round exhaustion. Cards held in hands stay out.
    pub fn reshuffle_discard(&mut self, rng: &mut GameRng) {
        self.draw.append(&mut self.discard);
        self.shuffle(rng);
    }

    /// Regenerates all 52 cards and shuffles; prior contents are dropped.
    pub fn reset(&mut self, rng: &mut GameRng) {
        *self = Self::standard52();
        self.shuffle(rng);
    }

    pub fn is_empty(&self) -> bool {
        self.draw.is_empty()
    }

    pub fn draw_len(&self) -> usize {
        self.draw.len()
    }

    pub fn total_len(&self) -> usize {
        self.draw.len() + self.discard.len()
    }

    pub fn needs_reshuffle(&self) -> bool {
        self.draw.len() < RESHUFFLE_THRESHOLD
    }
}
