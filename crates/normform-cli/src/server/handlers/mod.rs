//! API request handlers.

mod health;
mod normalize;

pub use health::*;
pub use normalize::*;
