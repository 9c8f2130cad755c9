//! Techtrawl: a polite Factorio research-tree mapper
//!
//! This crate crawls the Factorio wiki's research pages breadth-first from a
//! small set of roots, extracts structured infobox data from each page,
//! normalizes the URL-keyed graph into an internal-name-keyed graph, derives
//! inverse (unlocked-by) edges, and exports the result as JSONL.

pub mod config;
pub mod crawler;
pub mod graph;
pub mod output;
pub mod records;
pub mod url;

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for techtrawl operations
#[derive(Debug, Error)]
pub enum TrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Parse error for {url}: {message}")]
    Parse { url: String, message: String },

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("At least one root URL is required")]
    NoRoots,

    #[error(
        "Parsed reserved internal name {name:?} for page {url}. \
         The internal-name extraction likely matched an infobox label."
    )]
    ReservedInternalName { name: String, url: String },

    #[error("Output path is a directory: {0}")]
    OutputPathIsDirectory(PathBuf),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("URL must not be empty")]
    Empty,

    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Result type alias for techtrawl operations
pub type Result<T> = std::result::Result<T, TrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use records::{RawResearchRecord, TechRecord};
pub use url::{fallback_name_from_title, normalize_research_url};
