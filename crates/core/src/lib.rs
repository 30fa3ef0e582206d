//! wynnparse core - shared types, errors and the event bus

mod error;
mod types;
mod positions;
mod bus;
mod sinks;

pub use error::*;
pub use types::*;
pub use positions::*;
pub use bus::*;
pub use sinks::*;
