use crate::PlayerId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("unknown player {0:?}")]
    UnknownPlayer(PlayerId),
    #[error("invalid bet {amount} (chips {chips})")]
    InvalidBet { amount: i64, chips: i64 },
    #[error("no free trinket slot")]
    NoFreeSlot,
    #[error("no enemy template at index {0}")]
    UnknownTemplate(usize),
}
