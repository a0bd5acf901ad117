//! HTTP surface for the normalizer.

pub mod app;
pub mod error;
pub mod handlers;
pub mod state;
