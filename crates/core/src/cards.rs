use serde::{Deserialize, Serialize};

pub const DECK_SIZE: usize = 52;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suit {
    Hearts,
    Diamonds,
    Spades,
    Clubs,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Spades, Suit::Clubs];

    pub fn index(self) -> u8 {
        match self {
            Suit::Hearts => 0,
            Suit::Diamonds => 1,
            Suit::Spades => 2,
            Suit::Clubs => 3,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Ordinal used in card ids: Ace=1 through King=13.
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    pub fn from_number(number: u8) -> Option<Self> {
        if (1..=13).contains(&number) {
            Some(Self::ALL[number as usize - 1])
        } else {
            None
        }
    }

    /// Blackjack value with aces counted low; the hand layer softens aces.
    pub fn value(self) -> i64 {
        match self {
            Rank::Ace => 1,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
            other => other.number() as i64,
        }
    }

    pub fn is_face(self) -> bool {
        matches!(self, Rank::Jack | Rank::Queen | Rank::King)
    }
}

/// Plain value type. Cards are copied freely; identity is `id` alone.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Card {
    pub id: u8,
    pub suit: Suit,
    pub rank: Rank,
    pub face_up: bool,
}

impl Card {
    pub fn new(suit: Suit, rank: Rank) -> Self {
        Self {
            id: card_id(suit, rank),
            suit,
            rank,
            face_up: true,
        }
    }

    pub fn face_down(suit: Suit, rank: Rank) -> Self {
        Self {
            face_up: false,
            ..Self::new(suit, rank)
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        let suit = Suit::from_index(id / 13)?;
        let rank = Rank::from_number(id % 13 + 1)?;
        Some(Self::new(suit, rank))
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Card {}

pub fn card_id(suit: Suit, rank: Rank) -> u8 {
    suit.index() * 13 + (rank.number() - 1)
}
