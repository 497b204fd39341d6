//! Gameplay kernel for a blackjack-as-combat roguelike: deck, hands,
//! betting, statuses, trinkets, card tags, enemy abilities, and the
//! event dispatcher tying them together.

pub mod ability;
pub mod cards;
pub mod console;
pub mod deck;
pub mod dispatch;
pub mod effects;
pub mod encounter;
pub mod enemy;
pub mod error;
pub mod events;
pub mod fx;
pub mod game;
pub mod hand;
pub mod player;
pub mod rng;
pub mod sanity;
pub mod stats;
pub mod status;
pub mod tags;
pub mod trinket;
pub mod tween;

pub use ability::*;
pub use cards::*;
pub use console::*;
pub use deck::*;
pub use dispatch::*;
pub use effects::*;
pub use encounter::*;
pub use enemy::*;
pub use error::*;
pub use events::*;
pub use fx::*;
pub use game::*;
pub use hand::*;
pub use player::*;
pub use rng::*;
pub use sanity::*;
pub use stats::*;
pub use status::*;
pub use tags::*;
pub use trinket::*;
pub use tween::*;
