use crate::GameRng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum StatusKind {
    ChipDrain,
    Tilt,
    Greed,
    Madness,
    ForcedAllIn,
    Escalation,
    NoAdjust,
    MinimumBet,
}

impl StatusKind {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "chip_drain" => Some(Self::ChipDrain),
            "tilt" => Some(Self::Tilt),
            "greed" => Some(Self::Greed),
            "madness" => Some(Self::Madness),
            "forced_all_in" => Some(Self::ForcedAllIn),
            "escalation" => Some(Self::Escalation),
            "no_adjust" => Some(Self::NoAdjust),
            "minimum_bet" => Some(Self::MinimumBet),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::ChipDrain => "chip_drain",
            Self::Tilt => "tilt",
            Self::Greed => "greed",
            Self::Madness => "madness",
            Self::ForcedAllIn => "forced_all_in",
            Self::Escalation => "escalation",
            Self::NoAdjust => "no_adjust",
            Self::MinimumBet => "minimum_bet",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusInstance {
    pub kind: StatusKind,
    pub value: i64,
    pub duration: i64,
    pub intensity: i64,
}

/// Per-player set of timed effects. Applying a kind that is already
/// active refreshes it; kinds never stack.
#[derive(Debug, Default, Clone)]
pub struct StatusManager {
    effects: Vec<StatusInstance>,
}

impl StatusManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, kind: StatusKind, value: i64, duration: i64) {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == kind) {
            existing.value = value;
            existing.duration = duration;
            return;
        }
        self.effects.push(StatusInstance {
            kind,
            value,
            duration,
            intensity: value,
        });
    }

    pub fn remove(&mut self, kind: StatusKind) {
        self.effects.retain(|e| e.kind != kind);
    }

    pub fn clear_all(&mut self) {
        self.effects.clear();
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn value_of(&self, kind: StatusKind) -> Option<i64> {
        self.effects.iter().find(|e| e.kind == kind).map(|e| e.value)
    }

    pub fn active(&self) -> &[StatusInstance] {
        &self.effects
    }

    /// Decrements durations and drops expired instances; once per round end.
    pub fn tick_durations(&mut self) {
        for effect in &mut self.effects {
            effect.duration -= 1;
        }
        self.effects.retain(|e| e.duration > 0);
    }

    /// Chips drained at round start by an active ChipDrain, clamped so the
    /// caller never goes negative.
    pub fn round_start_drain(&self, chips: i64) -> i64 {
        self.value_of(StatusKind::ChipDrain)
            .map(|v| v.min(chips).max(0))
            .unwrap_or(0)
    }

    pub fn minimum_bet(&self, base: i64) -> i64 {
        self.value_of(StatusKind::MinimumBet)
            .map(|v| base.max(v))
            .unwrap_or(base)
    }

    pub fn can_adjust_bet(&self) -> bool {
        !(self.has(StatusKind::NoAdjust)
            || self.has(StatusKind::ForcedAllIn)
            || self.has(StatusKind::Madness))
    }

    /// Rewrites the desired bet under active betting pressure.
    pub fn modify_bet(&self, desired: i64, chips: i64, last_bet: i64, rng: &mut GameRng) -> i64 {
        if self.has(StatusKind::ForcedAllIn) {
            return chips;
        }
        if self.has(StatusKind::Madness) {
            return rng.int_in(10, 100);
        }
        if self.has(StatusKind::Escalation) {
            return desired.max(last_bet + 1);
        }
        desired
    }

    /// Greed hard-caps the total payout at half the bet.
    pub fn modify_winnings(&self, base_winnings: i64, bet: i64) -> i64 {
        if self.has(StatusKind::Greed) {
            base_winnings.min(bet / 2)
        } else {
            base_winnings
        }
    }

    /// Tilt returns an additional loss equal to the base loss (the caller
    /// adds it on top, doubling the total).
    pub fn modify_losses(&self, base_loss: i64) -> i64 {
        if self.has(StatusKind::Tilt) {
            base_loss
        } else {
            0
        }
    }
}
