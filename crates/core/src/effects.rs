use crate::{StatKey, StatusKind, Tag};
use serde::{Deserialize, Serialize};

/// Who an effect lands on. `Owner` is the enemy for ability effects and
/// the player for trinket/tag effects; the executor resolves it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Target {
    Player,
    Owner,
    Enemy,
}

impl Target {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "player" => Some(Self::Player),
            "self" => Some(Self::Owner),
            "enemy" => Some(Self::Enemy),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Owner => "self",
            Self::Enemy => "enemy",
        }
    }
}

/// Card-selection strategies for tag grants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TagStrategy {
    Random,
    HighestUntagged,
    LowestUntagged,
    SuitHearts,
    SuitDiamonds,
    SuitClubs,
    SuitSpades,
    RankAces,
    RankFaceCards,
    AllCards,
}

impl TagStrategy {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "random" => Some(Self::Random),
            "highest_untagged" => Some(Self::HighestUntagged),
            "lowest_untagged" => Some(Self::LowestUntagged),
            "suit_hearts" => Some(Self::SuitHearts),
            "suit_diamonds" => Some(Self::SuitDiamonds),
            "suit_clubs" => Some(Self::SuitClubs),
            "suit_spades" => Some(Self::SuitSpades),
            "rank_aces" => Some(Self::RankAces),
            "rank_face_cards" => Some(Self::RankFaceCards),
            "all_cards" => Some(Self::AllCards),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::HighestUntagged => "highest_untagged",
            Self::LowestUntagged => "lowest_untagged",
            Self::SuitHearts => "suit_hearts",
            Self::SuitDiamonds => "suit_diamonds",
            Self::SuitClubs => "suit_clubs",
            Self::SuitSpades => "suit_spades",
            Self::RankAces => "rank_aces",
            Self::RankFaceCards => "rank_face_cards",
            Self::AllCards => "all_cards",
        }
    }
}

/// The closed effect vocabulary shared by abilities, trinket passives,
/// and card tags. Later effects in a list observe the mutations of
/// earlier ones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Effect {
    None,
    ApplyStatus {
        status: StatusKind,
        value: i64,
        duration: i64,
    },
    RemoveStatus {
        status: StatusKind,
    },
    Heal {
        amount: i64,
        target: Target,
    },
    Damage {
        amount: i64,
        target: Target,
    },
    ShuffleDeck,
    DiscardHand,
    ForceHit,
    RevealHole,
    Message {
        text: String,
    },
    AddChips {
        amount: i64,
    },
    AddChipsPercent {
        percent: i64,
    },
    LoseChips {
        amount: i64,
    },
    RefundChipsPercent {
        percent: i64,
    },
    AddDamageFlat {
        amount: i64,
    },
    DamageMultiplier {
        percent: i64,
    },
    AddTagToCards {
        tag: Tag,
        count: usize,
        strategy: TagStrategy,
    },
    BuffTagDamage {
        tag: Tag,
        amount: i64,
    },
    PushDamagePercent {
        percent: i64,
    },
    TrinketStack {
        stat: StatKey,
        delta: i64,
        max: i64,
        on_max: Option<Box<Effect>>,
    },
}

impl Effect {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::ApplyStatus { .. } => "apply_status",
            Self::RemoveStatus { .. } => "remove_status",
            Self::Heal { .. } => "heal",
            Self::Damage { .. } => "damage",
            Self::ShuffleDeck => "shuffle_deck",
            Self::DiscardHand => "discard_hand",
            Self::ForceHit => "force_hit",
            Self::RevealHole => "reveal_hole",
            Self::Message { .. } => "message",
            Self::AddChips { .. } => "add_chips",
            Self::AddChipsPercent { .. } => "add_chips_percent",
            Self::LoseChips { .. } => "lose_chips",
            Self::RefundChipsPercent { .. } => "refund_chips_percent",
            Self::AddDamageFlat { .. } => "add_damage_flat",
            Self::DamageMultiplier { .. } => "damage_multiplier",
            Self::AddTagToCards { .. } => "add_tag_to_cards",
            Self::BuffTagDamage { .. } => "buff_tag_damage",
            Self::PushDamagePercent { .. } => "push_damage_percent",
            Self::TrinketStack { .. } => "trinket_stack",
        }
    }
}
