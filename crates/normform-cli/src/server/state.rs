//! Application state for the web server.

use std::time::Instant;

use normform::ParserConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Parser settings applied to every uploaded sample.
    pub parser: ParserConfig,
    /// Relation name used when a request does not supply one.
    pub relation_name: String,
    pub started_at: Instant,
}

impl AppState {
    /// Create new application state with default parser settings.
    pub fn new() -> Self {
        Self {
            parser: ParserConfig::default(),
            relation_name: "R".to_string(),
            started_at: Instant::now(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
