use crate::{GameRng, Tag, TagStrategy};

pub const EVENT_REROLL_BASE_COST: i64 = 50;

/// Gate on an encounter choice. Locked choices stay visible with a
/// tooltip naming what is missing and by how much.
#[derive(Debug, Clone, PartialEq)]
pub enum Requirement {
    TagCount { tag: Tag, min: usize },
    Trinket { key: String },
    HpThreshold { min_fraction: f64 },
    SanityThreshold { min: i64 },
    ChipsThreshold { min: i64 },
}

/// Inputs a requirement is judged against, snapshotted by the caller.
#[derive(Debug, Clone, Copy)]
pub struct RequirementContext<'a> {
    pub tag_count: usize,
    pub has_trinket: bool,
    pub hp_fraction: Option<f64>,
    pub sanity: i64,
    pub chips: i64,
    pub trinket_key: &'a str,
}

impl Requirement {
    pub fn is_met(&self, ctx: &RequirementContext<'_>) -> bool {
        match self {
            Requirement::TagCount { min, .. } => ctx.tag_count >= *min,
            Requirement::Trinket { .. } => ctx.has_trinket,
            // Passes outside combat; there is no hp to judge.
            Requirement::HpThreshold { min_fraction } => {
                ctx.hp_fraction.map(|f| f >= *min_fraction).unwrap_or(true)
            }
            Requirement::SanityThreshold { min } => ctx.sanity >= *min,
            Requirement::ChipsThreshold { min } => ctx.chips >= *min,
        }
    }

    pub fn unmet_text(&self, ctx: &RequirementContext<'_>) -> String {
        match self {
            Requirement::TagCount { tag, min } => format!(
                "Requires {} cards tagged {} (you have {})",
                min,
                tag.keyword(),
                ctx.tag_count
            ),
            Requirement::Trinket { key } => format!("Requires the {key} trinket"),
            Requirement::HpThreshold { min_fraction } => {
                format!("Requires at least {:.0}% HP", min_fraction * 100.0)
            }
            Requirement::SanityThreshold { min } => format!(
                "Requires {} sanity (you have {})",
                min, ctx.sanity
            ),
            Requirement::ChipsThreshold { min } => format!(
                "Requires {} chips (you have {}, short {})",
                min,
                ctx.chips,
                min - ctx.chips
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventChoice {
    pub text: String,
    pub result_text: String,
    pub chips_delta: i64,
    pub sanity_delta: i64,
    pub tag_grants: Vec<(Tag, TagStrategy, usize)>,
    pub tag_removals: Vec<Tag>,
    pub requirement: Option<Requirement>,
    pub trinket_reward: Option<String>,
    pub hp_multiplier: Option<f64>,
}

impl EventChoice {
    pub fn new(text: impl Into<String>, result_text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            result_text: result_text.into(),
            chips_delta: 0,
            sanity_delta: 0,
            tag_grants: Vec::new(),
            tag_removals: Vec::new(),
            requirement: None,
            trinket_reward: None,
            hp_multiplier: None,
        }
    }
}

/// A between-combat choice node: title, flavor, and 2-4 choices.
#[derive(Debug, Clone)]
pub struct EventEncounter {
    pub title: String,
    pub description: String,
    pub choices: Vec<EventChoice>,
}

/// Weighted factory pool the event phase draws from.
pub struct EventPool {
    factories: Vec<fn() -> EventEncounter>,
    weights: Vec<i64>,
    total_weight: i64,
}

impl std::fmt::Debug for EventPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventPool")
            .field("events", &self.factories.len())
            .field("total_weight", &self.total_weight)
            .finish()
    }
}

impl Default for EventPool {
    fn default() -> Self {
        Self::new()
    }
}

impl EventPool {
    pub fn new() -> Self {
        Self {
            factories: Vec::new(),
            weights: Vec::new(),
            total_weight: 0,
        }
    }

    pub fn add(&mut self, factory: fn() -> EventEncounter, weight: i64) {
        if weight <= 0 {
            log::error!("event pool: rejecting non-positive weight {weight}");
            return;
        }
        self.factories.push(factory);
        self.weights.push(weight);
        self.total_weight += weight;
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    pub fn pick(&self, rng: &mut GameRng) -> Option<EventEncounter> {
        self.pick_index(rng).map(|idx| (self.factories[idx])())
    }

    /// Retries a handful of times to avoid repeating `last`; a one-event
    /// pool cannot avoid it.
    pub fn pick_avoiding(&self, last: Option<usize>, rng: &mut GameRng) -> Option<(usize, EventEncounter)> {
        if self.factories.is_empty() {
            return None;
        }
        if self.factories.len() == 1 {
            return Some((0, (self.factories[0])()));
        }
        for _ in 0..10 {
            if let Some(idx) = self.pick_index(rng) {
                if Some(idx) != last {
                    return Some((idx, (self.factories[idx])()));
                }
            }
        }
        self.pick_index(rng).map(|idx| (idx, (self.factories[idx])()))
    }

    fn pick_index(&self, rng: &mut GameRng) -> Option<usize> {
        if self.total_weight <= 0 {
            return None;
        }
        let roll = rng.int_in(0, self.total_weight - 1);
        let mut accumulated = 0;
        for (idx, weight) in self.weights.iter().enumerate() {
            accumulated += weight;
            if roll < accumulated {
                return Some(idx);
            }
        }
        None
    }
}

/// Reroll pricing for one event visit: each reroll doubles the cost;
/// leaving the event screen resets it.
#[derive(Debug, Clone)]
pub struct RerollEconomy {
    pub base_cost: i64,
    pub current_cost: i64,
    pub uses: u32,
}

impl Default for RerollEconomy {
    fn default() -> Self {
        Self {
            base_cost: EVENT_REROLL_BASE_COST,
            current_cost: EVENT_REROLL_BASE_COST,
            uses: 0,
        }
    }
}

impl RerollEconomy {
    pub fn spend(&mut self) {
        self.uses += 1;
        self.current_cost *= 2;
    }

    pub fn reset(&mut self) {
        self.current_cost = self.base_cost;
        self.uses = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy() -> EventEncounter {
        EventEncounter {
            title: "The Lever".into(),
            description: "A slot machine hums in the dark.".into(),
            choices: vec![
                EventChoice::new("Pull it", "It pays out."),
                EventChoice::new("Walk away", "You keep your chips."),
            ],
        }
    }

    #[test]
    fn weighted_pool_respects_total_weight() {
        let mut pool = EventPool::new();
        pool.add(dummy, 50);
        pool.add(dummy, 50);
        assert_eq!(pool.len(), 2);

        let mut rng = GameRng::from_seed(3);
        assert!(pool.pick(&mut rng).is_some());
    }

    #[test]
    fn single_event_pool_cannot_avoid_repeats() {
        let mut pool = EventPool::new();
        pool.add(dummy, 10);
        let mut rng = GameRng::from_seed(3);
        let (idx, _) = pool.pick_avoiding(Some(0), &mut rng).unwrap();
        assert_eq!(idx, 0);
    }

    #[test]
    fn reroll_cost_doubles_and_resets() {
        let mut economy = RerollEconomy::default();
        economy.spend();
        economy.spend();
        assert_eq!(economy.current_cost, EVENT_REROLL_BASE_COST * 4);
        assert_eq!(economy.uses, 2);
        economy.reset();
        assert_eq!(economy.current_cost, EVENT_REROLL_BASE_COST);
    }
}
