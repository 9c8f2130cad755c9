//! Configuration module for techtrawl
//!
//! Built-in defaults target the Factorio wiki; a TOML file can override any
//! subset of them. Validation runs before any network activity so that
//! caller-configuration mistakes (empty roots, negative delay, occupied
//! output path) abort the run instead of corrupting it.

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig, WikiConfig};

// Re-export parser functions
pub use parser::load_config;

// Re-export validation for callers that assemble Config in code
pub use validation::validate;
