//! Config and settings loading for the pontoon kernel.

pub mod load;
pub mod schema;
pub mod settings;

pub use load::*;
pub use settings::*;
