use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DamageSource {
    Turn,
    Tag,
    Trinket,
    Ability,
}

/// Run-wide counters surfaced by the stats screen.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct GlobalStats {
    pub cards_drawn: u64,
    pub damage_from_turns: u64,
    pub damage_from_tags: u64,
    pub damage_from_trinkets: u64,
    pub damage_from_abilities: u64,
    pub turns_played: u64,
    pub turns_won: u64,
    pub turns_lost: u64,
    pub turns_pushed: u64,
    pub combats_won: u64,
    pub chips_bet: u64,
    pub chips_won: u64,
    pub chips_lost: u64,
    pub chips_drained: u64,
    pub peak_chips: i64,
    pub peak_bet: i64,
}

impl GlobalStats {
    pub fn record_damage(&mut self, source: DamageSource, damage: i64) {
        if damage < 0 {
            log::warn!("stats: negative damage value, clamping to 0");
        }
        let damage = damage.max(0) as u64;
        match source {
            DamageSource::Turn => self.damage_from_turns += damage,
            DamageSource::Tag => self.damage_from_tags += damage,
            DamageSource::Trinket => self.damage_from_trinkets += damage,
            DamageSource::Ability => self.damage_from_abilities += damage,
        }
    }

    pub fn record_chips_bet(&mut self, amount: i64) {
        self.chips_bet += amount.max(0) as u64;
        self.peak_bet = self.peak_bet.max(amount);
    }

    pub fn record_chips_won(&mut self, amount: i64) {
        self.chips_won += amount.max(0) as u64;
    }

    pub fn record_chips_lost(&mut self, amount: i64) {
        self.chips_lost += amount.max(0) as u64;
    }

    pub fn record_chips_drained(&mut self, amount: i64) {
        self.chips_drained += amount.max(0) as u64;
    }

    pub fn update_chip_peak(&mut self, current: i64) {
        self.peak_chips = self.peak_chips.max(current);
    }

    pub fn average_bet(&self) -> i64 {
        if self.turns_played == 0 {
            return 0;
        }
        (self.chips_bet / self.turns_played) as i64
    }
}
