use crate::{Card, Effect, GameRng, Rank, TagStrategy, Target, DECK_SIZE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Closed tag vocabulary. Doubled is transient: it never survives a hand
/// reset. Everything else persists across combats.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tag {
    Cursed,
    Vampiric,
    Lucky,
    Jagged,
    Doubled,
    Gilded,
}

impl Tag {
    pub const ALL: [Tag; 6] = [
        Tag::Cursed,
        Tag::Vampiric,
        Tag::Lucky,
        Tag::Jagged,
        Tag::Doubled,
        Tag::Gilded,
    ];

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "cursed" => Some(Self::Cursed),
            "vampiric" => Some(Self::Vampiric),
            "lucky" => Some(Self::Lucky),
            "jagged" => Some(Self::Jagged),
            "doubled" => Some(Self::Doubled),
            "gilded" => Some(Self::Gilded),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Cursed => "cursed",
            Self::Vampiric => "vampiric",
            Self::Lucky => "lucky",
            Self::Jagged => "jagged",
            Self::Doubled => "doubled",
            Self::Gilded => "gilded",
        }
    }

    pub fn is_transient(self) -> bool {
        matches!(self, Self::Doubled)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TagTrigger {
    OnDraw,
    Passive,
}

impl TagTrigger {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "on_draw" => Some(Self::OnDraw),
            "passive" => Some(Self::Passive),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TagDef {
    pub tag: Tag,
    pub display_name: String,
    pub description: String,
    pub color: [u8; 3],
    pub trigger: TagTrigger,
    pub duration: Option<i64>,
    pub effects: Vec<Effect>,
}

/// Stat bonuses contributed by passive tags on participating cards,
/// added on top of trinket aggregation and never zeroed by it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassiveBonuses {
    pub damage_flat: i64,
    pub damage_percent: i64,
    pub won_chips_bonus_percent: i64,
    pub flat_chips_on_win: i64,
}

/// Process-wide per-card-id tag sets plus the tag metadata table.
#[derive(Debug, Clone)]
pub struct TagRegistry {
    cards: Vec<BTreeSet<Tag>>,
    defs: Vec<TagDef>,
}

impl Default for TagRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TagRegistry {
    pub fn new() -> Self {
        Self {
            cards: vec![BTreeSet::new(); DECK_SIZE],
            defs: builtin_defs(),
        }
    }

    /// Replaces the metadata for a tag; used by the config loader.
    pub fn install_def(&mut self, def: TagDef) {
        if let Some(existing) = self.defs.iter_mut().find(|d| d.tag == def.tag) {
            *existing = def;
        } else {
            self.defs.push(def);
        }
    }

    pub fn def(&self, tag: Tag) -> Option<&TagDef> {
        self.defs.iter().find(|d| d.tag == tag)
    }

    pub fn add_tag(&mut self, card_id: u8, tag: Tag) -> bool {
        match self.cards.get_mut(card_id as usize) {
            Some(set) => set.insert(tag),
            None => {
                log::error!("tags: add_tag on invalid card id {card_id}");
                false
            }
        }
    }

    pub fn remove_tag(&mut self, card_id: u8, tag: Tag) -> bool {
        match self.cards.get_mut(card_id as usize) {
            Some(set) => set.remove(&tag),
            None => {
                log::error!("tags: remove_tag on invalid card id {card_id}");
                false
            }
        }
    }

    pub fn remove_tag_everywhere(&mut self, tag: Tag) {
        for set in &mut self.cards {
            set.remove(&tag);
        }
    }

    pub fn has_tag(&self, card_id: u8, tag: Tag) -> bool {
        self.cards
            .get(card_id as usize)
            .map(|set| set.contains(&tag))
            .unwrap_or(false)
    }

    pub fn clear_tags(&mut self, card_id: u8) {
        if let Some(set) = self.cards.get_mut(card_id as usize) {
            set.clear();
        }
    }

    /// Drops transient tags everywhere; invoked on every hand reset so
    /// Doubled cannot leak across hands.
    pub fn clear_transient(&mut self) {
        for set in &mut self.cards {
            set.retain(|tag| !tag.is_transient());
        }
    }

    /// Tags on one card in canonical (enum) order.
    pub fn tags_for(&self, card_id: u8) -> Vec<Tag> {
        self.cards
            .get(card_id as usize)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Total copies of `tag` across all 52 card ids.
    pub fn tag_count(&self, tag: Tag) -> usize {
        self.cards.iter().filter(|set| set.contains(&tag)).count()
    }

    /// On-draw effect lists for a drawn card, in canonical tag order.
    pub fn on_draw_effects(&self, card_id: u8) -> Vec<(Tag, Vec<Effect>)> {
        self.tags_for(card_id)
            .into_iter()
            .filter_map(|tag| {
                let def = self.def(tag)?;
                if def.trigger == TagTrigger::OnDraw {
                    Some((tag, def.effects.clone()))
                } else {
                    None
                }
            })
            .collect()
    }

    /// Sums passive-tag stat bonuses over the given participating cards.
    pub fn passive_bonuses(&self, cards: &[Card]) -> PassiveBonuses {
        let mut bonuses = PassiveBonuses::default();
        for card in cards {
            for tag in self.tags_for(card.id) {
                let Some(def) = self.def(tag) else { continue };
                if def.trigger != TagTrigger::Passive {
                    continue;
                }
                for effect in &def.effects {
                    match effect {
                        Effect::AddDamageFlat { amount } => bonuses.damage_flat += amount,
                        Effect::DamageMultiplier { percent } => bonuses.damage_percent += percent,
                        Effect::AddChipsPercent { percent } => {
                            bonuses.won_chips_bonus_percent += percent
                        }
                        Effect::AddChips { amount } => bonuses.flat_chips_on_win += amount,
                        _ => {}
                    }
                }
            }
        }
        bonuses
    }
}

/// Defaults so the registry is usable before any config is loaded;
/// loaded tag files override these per tag.
fn builtin_defs() -> Vec<TagDef> {
    vec![
        TagDef {
            tag: Tag::Cursed,
            display_name: "Cursed".into(),
            description: "Drawing this card costs 10 chips.".into(),
            color: [140, 20, 160],
            trigger: TagTrigger::OnDraw,
            duration: None,
            effects: vec![Effect::LoseChips { amount: 10 }],
        },
        TagDef {
            tag: Tag::Vampiric,
            display_name: "Vampiric".into(),
            description: "Drawing this card bites the enemy for 5 and pays 5 chips.".into(),
            color: [180, 0, 40],
            trigger: TagTrigger::OnDraw,
            duration: None,
            effects: vec![
                Effect::Damage {
                    amount: 5,
                    target: Target::Enemy,
                },
                Effect::AddChips { amount: 5 },
            ],
        },
        TagDef {
            tag: Tag::Lucky,
            display_name: "Lucky".into(),
            description: "Wins with this card pay 10% more.".into(),
            color: [30, 180, 60],
            trigger: TagTrigger::Passive,
            duration: None,
            effects: vec![Effect::AddChipsPercent { percent: 10 }],
        },
        TagDef {
            tag: Tag::Jagged,
            display_name: "Jagged".into(),
            description: "Adds 2 flat damage while in a winning hand.".into(),
            color: [200, 120, 20],
            trigger: TagTrigger::Passive,
            duration: None,
            effects: vec![Effect::AddDamageFlat { amount: 2 }],
        },
        TagDef {
            tag: Tag::Doubled,
            display_name: "Doubled".into(),
            description: "Damage from this hand is increased; fades when the hand ends.".into(),
            color: [240, 220, 40],
            trigger: TagTrigger::Passive,
            duration: Some(1),
            effects: vec![Effect::DamageMultiplier { percent: 100 }],
        },
        TagDef {
            tag: Tag::Gilded,
            display_name: "Gilded".into(),
            description: "Wins with this card pay 3 extra chips.".into(),
            color: [230, 190, 90],
            trigger: TagTrigger::Passive,
            duration: None,
            effects: vec![Effect::AddChips { amount: 3 }],
        },
    ]
}

/// Resolves a tag-grant strategy to concrete card ids. `count` only
/// limits the Random/Highest/Lowest strategies; the structural ones
/// always return their full set.
pub fn select_cards(
    registry: &TagRegistry,
    tag: Tag,
    count: usize,
    strategy: TagStrategy,
    rng: &mut GameRng,
) -> Vec<u8> {
    let untagged = |reg: &TagRegistry| -> Vec<u8> {
        (0..DECK_SIZE as u8)
            .filter(|id| !reg.has_tag(*id, tag))
            .collect()
    };

    match strategy {
        TagStrategy::Random => {
            let mut pool = untagged(registry);
            rng.shuffle(&mut pool);
            pool.truncate(count);
            pool
        }
        TagStrategy::HighestUntagged => {
            let mut pool = untagged(registry);
            // Rank within suit descends with id; sort by rank number.
            pool.sort_by_key(|id| std::cmp::Reverse(id % 13));
            pool.truncate(count);
            pool
        }
        TagStrategy::LowestUntagged => {
            let mut pool = untagged(registry);
            pool.sort_by_key(|id| id % 13);
            pool.truncate(count);
            pool
        }
        TagStrategy::SuitHearts => suit_ids(0),
        TagStrategy::SuitDiamonds => suit_ids(1),
        TagStrategy::SuitSpades => suit_ids(2),
        TagStrategy::SuitClubs => suit_ids(3),
        TagStrategy::RankAces => rank_ids(Rank::Ace),
        TagStrategy::RankFaceCards => {
            let mut ids = rank_ids(Rank::Jack);
            ids.extend(rank_ids(Rank::Queen));
            ids.extend(rank_ids(Rank::King));
            ids.sort_unstable();
            ids
        }
        TagStrategy::AllCards => (0..DECK_SIZE as u8).collect(),
    }
}

fn suit_ids(suit_index: u8) -> Vec<u8> {
    (0..13).map(|r| suit_index * 13 + r).collect()
}

fn rank_ids(rank: Rank) -> Vec<u8> {
    (0..4).map(|s| s * 13 + rank.number() - 1).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_tags_clear_with_hands() {
        let mut registry = TagRegistry::new();
        registry.add_tag(3, Tag::Doubled);
        registry.add_tag(3, Tag::Cursed);
        registry.clear_transient();
        assert!(!registry.has_tag(3, Tag::Doubled));
        assert!(registry.has_tag(3, Tag::Cursed));
    }

    #[test]
    fn structural_strategies_cover_expected_ids() {
        let registry = TagRegistry::new();
        let mut rng = GameRng::from_seed(9);
        assert_eq!(
            select_cards(&registry, Tag::Lucky, 0, TagStrategy::AllCards, &mut rng).len(),
            52
        );
        assert_eq!(
            select_cards(&registry, Tag::Lucky, 0, TagStrategy::RankAces, &mut rng).len(),
            4
        );
        assert_eq!(
            select_cards(&registry, Tag::Lucky, 0, TagStrategy::RankFaceCards, &mut rng).len(),
            12
        );
    }
}
