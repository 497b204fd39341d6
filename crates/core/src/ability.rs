use crate::{Effect, GameEvent, GameRng, PlayerAction};
use serde::{Deserialize, Serialize};

/// Trigger vocabulary for abilities and their per-combat scratch rules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Trigger {
    /// Always-on auras; handled by stat aggregation, never fires.
    Passive,
    OnEvent { event: GameEvent },
    /// Fires every `count` occurrences of `event`; residual is kept.
    Counter { event: GameEvent, count: u32 },
    /// One-shot on crossing `threshold` (fraction of max hp) downward.
    HpThreshold { threshold: f64, once: bool },
    Random { event: GameEvent, chance: f64 },
    OnAction { action: PlayerAction },
    /// Fires once per `segment_percent` band of max hp crossed downward.
    HpSegment { segment_percent: u32 },
    /// Fires each time cumulative damage taken crosses a multiple of
    /// `damage_threshold`.
    DamageAccumulator { damage_threshold: i64 },
}

#[derive(Debug, Clone)]
pub struct Ability {
    pub name: String,
    pub description: String,
    pub trigger: Trigger,
    pub effects: Vec<Effect>,
    pub cooldown_max: u32,
    pub cooldown_current: u32,
    pub has_triggered: bool,
    pub counter: u32,
    pub segments_triggered: u32,
    pub damage_marks: i64,
}

impl Ability {
    pub fn new(name: impl Into<String>, trigger: Trigger, effects: Vec<Effect>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            trigger,
            effects,
            cooldown_max: 0,
            cooldown_current: 0,
            has_triggered: false,
            counter: 0,
            segments_triggered: 0,
            damage_marks: 0,
        }
    }

    pub fn with_cooldown(mut self, cooldown: u32) -> Self {
        self.cooldown_max = cooldown;
        self
    }

    pub fn reset_combat_state(&mut self) {
        self.cooldown_current = 0;
        self.has_triggered = false;
        self.counter = 0;
        self.segments_triggered = 0;
        self.damage_marks = 0;
    }

    /// Once per round end.
    pub fn tick_cooldown(&mut self) {
        self.cooldown_current = self.cooldown_current.saturating_sub(1);
    }

    /// Decides whether this ability fires for `event`, updating trigger
    /// scratch state as a side effect. Cooldown gating applies uniformly;
    /// a firing ability rearms to `cooldown_max`.
    pub fn check_trigger(
        &mut self,
        event: GameEvent,
        hp_fraction: f64,
        total_damage_taken: i64,
        rng: &mut GameRng,
    ) -> bool {
        if self.cooldown_current > 0 {
            return false;
        }

        let fired = match &self.trigger {
            Trigger::Passive => false,
            Trigger::OnEvent { event: wanted } => event == *wanted,
            Trigger::Counter {
                event: wanted,
                count,
            } => {
                if event == *wanted {
                    self.counter += 1;
                    if self.counter >= *count {
                        self.counter = 0;
                        true
                    } else {
                        false
                    }
                } else {
                    false
                }
            }
            Trigger::HpThreshold { threshold, once } => {
                if hp_fraction <= *threshold && !(self.has_triggered && *once) {
                    self.has_triggered = true;
                    true
                } else {
                    false
                }
            }
            Trigger::Random {
                event: wanted,
                chance,
            } => event == *wanted && rng.float_in(0.0, 1.0) < *chance,
            Trigger::OnAction { action } => event.as_action() == Some(*action),
            Trigger::HpSegment { segment_percent } => {
                let segment_percent = (*segment_percent).max(1);
                let hp_percent = (hp_fraction * 100.0).clamp(0.0, 100.0) as u32;
                // Segment 0 is full health; crossing below each multiple of
                // segment_percent flips one bit, so healing back up and
                // re-crossing cannot refire.
                let crossed = (100 - hp_percent.min(99)) / segment_percent;
                let mut fired = false;
                for segment in 1..=crossed {
                    let bit = 1u32 << (segment.min(31));
                    if self.segments_triggered & bit == 0 {
                        self.segments_triggered |= bit;
                        fired = true;
                    }
                }
                fired
            }
            Trigger::DamageAccumulator { damage_threshold } => {
                let threshold = (*damage_threshold).max(1);
                let marks = total_damage_taken / threshold;
                if marks > self.damage_marks {
                    self.damage_marks = marks;
                    true
                } else {
                    false
                }
            }
        };

        if fired {
            self.cooldown_current = self.cooldown_max;
        }
        fired
    }
}
