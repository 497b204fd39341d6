use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PlayerAction {
    Hit,
    Stand,
    Double,
}

impl PlayerAction {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "hit" => Some(Self::Hit),
            "stand" => Some(Self::Stand),
            "double" => Some(Self::Double),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Hit => "hit",
            Self::Stand => "stand",
            Self::Double => "double",
        }
    }
}

/// Closed event vocabulary shared by abilities, trinket passives, and
/// card-tag hooks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum GameEvent {
    CombatStart,
    RoundStarted,
    BettingStarted,
    CardDrawn,
    PlayerHit,
    PlayerStand,
    PlayerDouble,
    PlayerBlackjack,
    PlayerBust,
    PlayerWin,
    PlayerLoss,
    PlayerPush,
    EnemyHeal,
    EnemyDamaged,
    RoundEnded,
}

impl GameEvent {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "combat_start" => Some(Self::CombatStart),
            "round_started" => Some(Self::RoundStarted),
            "betting_started" => Some(Self::BettingStarted),
            "card_drawn" => Some(Self::CardDrawn),
            "player_hit" => Some(Self::PlayerHit),
            "player_stand" => Some(Self::PlayerStand),
            "player_double" => Some(Self::PlayerDouble),
            "player_blackjack" => Some(Self::PlayerBlackjack),
            "player_bust" => Some(Self::PlayerBust),
            "player_win" => Some(Self::PlayerWin),
            "player_loss" => Some(Self::PlayerLoss),
            "player_push" => Some(Self::PlayerPush),
            "enemy_heal" => Some(Self::EnemyHeal),
            "enemy_damaged" => Some(Self::EnemyDamaged),
            "round_ended" => Some(Self::RoundEnded),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::CombatStart => "combat_start",
            Self::RoundStarted => "round_started",
            Self::BettingStarted => "betting_started",
            Self::CardDrawn => "card_drawn",
            Self::PlayerHit => "player_hit",
            Self::PlayerStand => "player_stand",
            Self::PlayerDouble => "player_double",
            Self::PlayerBlackjack => "player_blackjack",
            Self::PlayerBust => "player_bust",
            Self::PlayerWin => "player_win",
            Self::PlayerLoss => "player_loss",
            Self::PlayerPush => "player_push",
            Self::EnemyHeal => "enemy_heal",
            Self::EnemyDamaged => "enemy_damaged",
            Self::RoundEnded => "round_ended",
        }
    }

    /// The action event mirrored by `OnAction` triggers, if any.
    pub fn as_action(self) -> Option<PlayerAction> {
        match self {
            Self::PlayerHit => Some(PlayerAction::Hit),
            Self::PlayerStand => Some(PlayerAction::Stand),
            Self::PlayerDouble => Some(PlayerAction::Double),
            _ => None,
        }
    }
}

/// Who produced an executed effect; recorded so dispatch ordering is
/// observable and reproducible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectSource {
    Ability { index: usize, name: String },
    ClassTrinket { key: String },
    TrinketSlot { slot: usize, key: String, secondary: bool },
    CardTag { card_id: u8, tag: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectRecord {
    pub source: EffectSource,
    pub event: GameEvent,
    pub description: String,
}

/// Ordered log of executed effect side-effects for one context lifetime.
#[derive(Debug, Default)]
pub struct EffectLog {
    entries: Vec<EffectRecord>,
}

impl EffectLog {
    pub fn record(&mut self, source: EffectSource, event: GameEvent, description: String) {
        self.entries.push(EffectRecord {
            source,
            event,
            description,
        });
    }

    pub fn entries(&self) -> &[EffectRecord] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
