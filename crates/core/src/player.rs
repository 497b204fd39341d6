use crate::{
    Affix, GameError, GameRng, Hand, PassiveBonuses, StatKey, StatusManager, Tag, TrinketInstance,
    TrinketRegistry, TRINKET_SLOTS,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const STARTING_CHIPS: i64 = 500;

/// 0 is the dealer, 1 the human player.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u32);

pub const DEALER_ID: PlayerId = PlayerId(0);
pub const HUMAN_ID: PlayerId = PlayerId(1);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlayerClass {
    Degenerate,
    Dealer,
    Detective,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlayerState {
    Waiting,
    Betting,
    Playing,
    Stood,
    Busted,
    Blackjack,
}

/// Aggregated combat stats. The trinket-derived part is recomputed from
/// scratch whenever `combat_stats_dirty` is set; card-tag passive bonuses
/// are layered on top at damage time and never stored here.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CombatStats {
    pub damage_flat: i64,
    pub damage_percent: i64,
    pub crit_chance: i64,
    pub crit_bonus: i64,
    pub won_chips_bonus_percent: i64,
    pub lost_chips_refund_percent: i64,
    pub push_damage_percent: i64,
    pub flat_chips_on_win: i64,
}

impl CombatStats {
    pub fn merge(&mut self, other: &CombatStats) {
        self.damage_flat += other.damage_flat;
        self.damage_percent += other.damage_percent;
        self.crit_chance += other.crit_chance;
        self.crit_bonus += other.crit_bonus;
        self.won_chips_bonus_percent += other.won_chips_bonus_percent;
        self.lost_chips_refund_percent += other.lost_chips_refund_percent;
        self.push_damage_percent += other.push_damage_percent;
        self.flat_chips_on_win += other.flat_chips_on_win;
    }

    pub fn add(&mut self, key: StatKey, value: i64) {
        match key {
            StatKey::DamageFlat => self.damage_flat += value,
            StatKey::DamagePercent => self.damage_percent += value,
            StatKey::CritChance => self.crit_chance += value,
            StatKey::CritBonus => self.crit_bonus += value,
            StatKey::WonChipsBonusPercent => self.won_chips_bonus_percent += value,
            StatKey::LostChipsRefundPercent => self.lost_chips_refund_percent += value,
            StatKey::PushDamagePercent => self.push_damage_percent += value,
            StatKey::FlatChipsOnWin => self.flat_chips_on_win += value,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub chips: i64,
    /// Lags `chips` for animated chip counters; gameplay reads `chips`.
    pub display_chips: f64,
    pub current_bet: i64,
    pub last_bet: i64,
    pub sanity: i64,
    pub max_sanity: i64,
    pub hand: Hand,
    pub class: PlayerClass,
    pub is_dealer: bool,
    pub is_ai: bool,
    pub state: PlayerState,
    pub class_trinket: Option<TrinketInstance>,
    pub slots: [Option<TrinketInstance>; TRINKET_SLOTS],
    pub status: StatusManager,
    pub stats: CombatStats,
    pub combat_stats_dirty: bool,
    /// Per-combat damage bonuses granted by BuffTagDamage, keyed by tag.
    pub tag_damage_buffs: BTreeMap<Tag, i64>,
    /// Stat grants applied through the event path. Folded back into
    /// `stats` on every recompute; cleared when a new combat starts.
    pub granted_stats: CombatStats,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, is_dealer: bool) -> Self {
        Self {
            id,
            name: name.into(),
            chips: STARTING_CHIPS,
            display_chips: STARTING_CHIPS as f64,
            current_bet: 0,
            last_bet: 0,
            sanity: 100,
            max_sanity: 100,
            hand: Hand::new(),
            class: PlayerClass::Degenerate,
            is_dealer,
            is_ai: is_dealer,
            state: PlayerState::Waiting,
            class_trinket: None,
            slots: Default::default(),
            status: StatusManager::new(),
            stats: CombatStats::default(),
            combat_stats_dirty: false,
            tag_damage_buffs: BTreeMap::new(),
            granted_stats: CombatStats::default(),
        }
    }

    /// Debits the bet up front; a later win credits it back with profit.
    pub fn place_bet(&mut self, amount: i64) -> Result<(), GameError> {
        if amount <= 0 || amount > self.chips {
            log::error!(
                "player {}: invalid bet {amount} with {} chips",
                self.id.0,
                self.chips
            );
            return Err(GameError::InvalidBet {
                amount,
                chips: self.chips,
            });
        }
        self.chips -= amount;
        self.current_bet = amount;
        Ok(())
    }

    pub fn return_bet(&mut self) {
        self.chips += self.current_bet;
        self.last_bet = self.current_bet;
        self.current_bet = 0;
    }

    pub fn add_chips(&mut self, amount: i64) {
        self.chips = (self.chips + amount).max(0);
    }

    pub fn lose_chips(&mut self, amount: i64) {
        self.chips = (self.chips - amount.max(0)).max(0);
    }

    pub fn free_slot(&self) -> Option<usize> {
        self.slots.iter().position(|slot| slot.is_none())
    }

    pub fn equip_trinket(&mut self, instance: TrinketInstance) -> Result<usize, GameError> {
        let slot = self.free_slot().ok_or(GameError::NoFreeSlot)?;
        self.slots[slot] = Some(instance);
        self.combat_stats_dirty = true;
        Ok(slot)
    }

    pub fn occupied_slots(&self) -> impl Iterator<Item = (usize, &TrinketInstance)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|t| (idx, t)))
    }

    /// Universal damage pipeline: every damage source funnels through
    /// here so flat/percent/crit modifiers apply consistently.
    pub fn apply_damage_modifiers(
        &self,
        base_damage: i64,
        tag_bonuses: PassiveBonuses,
        rng: &mut GameRng,
    ) -> (i64, bool) {
        let flat = base_damage + self.stats.damage_flat + tag_bonuses.damage_flat;
        let percent = 100 + self.stats.damage_percent + tag_bonuses.damage_percent;
        let mut damage = flat * percent.max(0) / 100;

        let is_crit = self.stats.crit_chance > 0
            && rng.int_in(1, 100) <= self.stats.crit_chance.min(100);
        if is_crit {
            damage += damage * (100 + self.stats.crit_bonus).max(0) / 100;
        }
        (damage.max(0), is_crit)
    }
}

/// Recomputes the trinket-derived combat stats from the six slots plus
/// the class trinket: affixes, stack bonuses, and OnEquip stat passives.
/// Event-path grants are folded back in at the end, so a recompute never
/// wipes them.
pub fn aggregate_combat_stats(player: &mut Player, registry: &TrinketRegistry) {
    player.stats = CombatStats::default();

    let class_slot = player.class_trinket.clone();
    let slots: Vec<TrinketInstance> = class_slot
        .into_iter()
        .chain(player.slots.iter().flatten().cloned())
        .collect();

    for instance in &slots {
        let Some(template) = registry.get(&instance.template_key) else {
            log::error!(
                "trinkets: instance references unknown template `{}`",
                instance.template_key
            );
            continue;
        };

        for Affix { stat_key, value } in &instance.affixes {
            player.stats.add(*stat_key, *value);
        }
        if let Some(stat) = instance.stack_stat {
            player.stats.add(stat, instance.stacks * instance.stack_value);
        }
        if let Some((key, value)) = template.primary.stat_contribution() {
            player.stats.add(key, value);
        }
        if let Some((key, value)) = template
            .secondary
            .as_ref()
            .and_then(|p| p.stat_contribution())
        {
            player.stats.add(key, value);
        }
    }

    let granted = player.granted_stats;
    player.stats.merge(&granted);

    player.combat_stats_dirty = false;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bets_are_debited_up_front() {
        let mut player = Player::new(HUMAN_ID, "Morgan", false);
        player.chips = 100;
        player.place_bet(50).unwrap();
        assert_eq!(player.chips, 50);
        assert_eq!(player.current_bet, 50);

        player.return_bet();
        assert_eq!(player.chips, 100);
        assert_eq!(player.current_bet, 0);
        assert_eq!(player.last_bet, 50);
    }

    #[test]
    fn bet_above_chips_is_rejected_without_mutation() {
        let mut player = Player::new(HUMAN_ID, "Morgan", false);
        player.chips = 20;
        assert!(player.place_bet(50).is_err());
        assert_eq!(player.chips, 20);
        assert_eq!(player.current_bet, 0);
    }
}
