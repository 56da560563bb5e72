//! Shared types for the osu! API workspace

mod error;
mod secret;

pub use error::{Error, Result};
pub use secret::Secret;
