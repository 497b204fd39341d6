use crate::{Effect, GameEvent};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const TRINKET_SLOTS: usize = 6;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TrinketRarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
    Event,
    Class,
}

impl TrinketRarity {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "common" => Some(Self::Common),
            "uncommon" => Some(Self::Uncommon),
            "rare" => Some(Self::Rare),
            "legendary" => Some(Self::Legendary),
            "event" => Some(Self::Event),
            "class" => Some(Self::Class),
            _ => None,
        }
    }
}

/// Player combat-stat fields an affix or stack can feed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum StatKey {
    DamageFlat,
    DamagePercent,
    CritChance,
    CritBonus,
    WonChipsBonusPercent,
    LostChipsRefundPercent,
    PushDamagePercent,
    FlatChipsOnWin,
}

impl StatKey {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "damage_flat" => Some(Self::DamageFlat),
            "damage_bonus_percent" => Some(Self::DamagePercent),
            "crit_chance" => Some(Self::CritChance),
            "crit_bonus" => Some(Self::CritBonus),
            "won_chips_bonus_percent" => Some(Self::WonChipsBonusPercent),
            "lost_chips_refund_percent" => Some(Self::LostChipsRefundPercent),
            "push_damage_percent" => Some(Self::PushDamagePercent),
            "flat_chips_on_win" => Some(Self::FlatChipsOnWin),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::DamageFlat => "damage_flat",
            Self::DamagePercent => "damage_bonus_percent",
            Self::CritChance => "crit_chance",
            Self::CritBonus => "crit_bonus",
            Self::WonChipsBonusPercent => "won_chips_bonus_percent",
            Self::LostChipsRefundPercent => "lost_chips_refund_percent",
            Self::PushDamagePercent => "push_damage_percent",
            Self::FlatChipsOnWin => "flat_chips_on_win",
        }
    }
}

/// Rolled integer on an instance; summed into player combat stats.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Affix {
    pub stat_key: StatKey,
    pub value: i64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PassiveTrigger {
    /// Contributes on equip / stat aggregation rather than on an event.
    OnEquip,
    Event(GameEvent),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrinketPassive {
    pub trigger: PassiveTrigger,
    pub effect: Effect,
    /// Passive only fires while the owner's bet is at least this.
    pub bet_gte: Option<i64>,
}

impl TrinketPassive {
    pub fn matches(&self, event: GameEvent, bet: i64) -> bool {
        match self.trigger {
            PassiveTrigger::OnEquip => false,
            PassiveTrigger::Event(wanted) => {
                wanted == event && self.bet_gte.map(|min| bet >= min).unwrap_or(true)
            }
        }
    }

    /// Stat contribution for OnEquip passives whose effect maps onto a
    /// player stat. Event passives contribute through the dispatcher
    /// instead; the two paths must agree on the mapping below.
    pub fn stat_contribution(&self) -> Option<(StatKey, i64)> {
        if self.trigger != PassiveTrigger::OnEquip {
            return None;
        }
        match self.effect {
            Effect::AddDamageFlat { amount } => Some((StatKey::DamageFlat, amount)),
            Effect::DamageMultiplier { percent } => Some((StatKey::DamagePercent, percent)),
            Effect::AddChipsPercent { percent } => Some((StatKey::WonChipsBonusPercent, percent)),
            Effect::RefundChipsPercent { percent } => {
                Some((StatKey::LostChipsRefundPercent, percent))
            }
            Effect::PushDamagePercent { percent } => Some((StatKey::PushDamagePercent, percent)),
            Effect::AddChips { amount } => Some((StatKey::FlatChipsOnWin, amount)),
            _ => None,
        }
    }
}

/// Immutable, registry-owned template. Instances refer to it by key so
/// instance storage and the registry have independent lifetimes.
#[derive(Debug, Clone)]
pub struct TrinketTemplate {
    pub key: String,
    pub name: String,
    pub flavor: String,
    pub rarity: TrinketRarity,
    pub base_value: i64,
    pub primary: TrinketPassive,
    pub secondary: Option<TrinketPassive>,
    pub stack_max: Option<i64>,
    pub heal_punish_charges: i64,
}

#[derive(Debug, Default, Clone)]
pub struct TrinketRegistry {
    templates: BTreeMap<String, TrinketTemplate>,
}

impl TrinketRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registering a duplicate key is a config defect; the newer template
    /// is rejected so load order cannot silently change behavior.
    pub fn register(&mut self, template: TrinketTemplate) -> bool {
        if self.templates.contains_key(&template.key) {
            log::error!("trinkets: duplicate template key `{}`", template.key);
            return false;
        }
        self.templates.insert(template.key.clone(), template);
        true
    }

    pub fn get(&self, key: &str) -> Option<&TrinketTemplate> {
        self.templates.get(key)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }
}

#[derive(Debug, Clone)]
pub struct TrinketInstance {
    pub template_key: String,
    pub affixes: Vec<Affix>,
    pub stacks: i64,
    pub stack_value: i64,
    pub stack_stat: Option<StatKey>,
    pub heal_punish_charges: i64,
    // Per-instance lifetime counters, surfaced in the UI.
    pub damage_dealt: i64,
    pub bonus_chips: i64,
    pub refunded_chips: i64,
}

impl TrinketInstance {
    pub fn of(template: &TrinketTemplate) -> Self {
        Self {
            template_key: template.key.clone(),
            affixes: Vec::new(),
            stacks: 0,
            stack_value: 0,
            stack_stat: None,
            heal_punish_charges: template.heal_punish_charges,
            damage_dealt: 0,
            bonus_chips: 0,
            refunded_chips: 0,
        }
    }

    pub fn with_affixes(mut self, affixes: Vec<Affix>) -> Self {
        self.affixes = affixes;
        self
    }
}
