use crate::{Player, PlayerClass};

pub const BET_AMOUNT_MIN: i64 = 1;
pub const BET_AMOUNT_MED: i64 = 5;
pub const BET_AMOUNT_MAX: i64 = 10;

/// Sanity bands, highest first. Tier effects are cumulative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SanityTier {
    High,
    Medium,
    Low,
    VeryLow,
    Zero,
}

pub fn sanity_tier(player: &Player) -> SanityTier {
    if player.max_sanity <= 0 {
        return SanityTier::High;
    }
    let percent = player.sanity as f64 / player.max_sanity as f64;
    if percent <= 0.0 {
        SanityTier::Zero
    } else if percent <= 0.25 {
        SanityTier::VeryLow
    } else if percent <= 0.50 {
        SanityTier::Low
    } else if percent <= 0.75 {
        SanityTier::Medium
    } else {
        SanityTier::High
    }
}

/// One preset betting button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BetOption {
    pub amount: i64,
    pub enabled: bool,
}

/// The three preset bet buttons (min, med, max) after class-specific
/// sanity pressure is applied.
pub fn betting_options(player: &Player) -> [BetOption; 3] {
    let mut options = [
        BetOption {
            amount: BET_AMOUNT_MIN,
            enabled: true,
        },
        BetOption {
            amount: BET_AMOUNT_MED,
            enabled: true,
        },
        BetOption {
            amount: BET_AMOUNT_MAX,
            enabled: true,
        },
    ];
    let tier = sanity_tier(player);

    match player.class {
        PlayerClass::Degenerate => {
            if tier >= SanityTier::Medium {
                options[0].enabled = false;
            }
            if tier >= SanityTier::Low {
                options[2].amount = BET_AMOUNT_MAX * 2;
            }
            if tier >= SanityTier::VeryLow {
                options[1].enabled = false;
            }
            if tier == SanityTier::Zero {
                options[2].amount = BET_AMOUNT_MAX * 4;
            }
        }
        PlayerClass::Dealer => {
            if tier >= SanityTier::Medium {
                options[2].enabled = false;
            }
        }
        PlayerClass::Detective => {
            if tier >= SanityTier::Medium {
                options[0].enabled = false;
                options[2].enabled = false;
            }
        }
    }
    options
}
