use serde::Deserialize;

/// Main configuration structure for techtrawl
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub wiki: WikiConfig,
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Target wiki and crawl roots
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WikiConfig {
    /// Base URL relative links are resolved against
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Root research pages the breadth-first crawl starts from
    pub roots: Vec<String>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Delay between page fetches, in seconds
    #[serde(rename = "delay-seconds")]
    pub delay_seconds: f64,

    /// Per-request timeout, in seconds
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the JSONL output file
    #[serde(rename = "jsonl-path")]
    pub jsonl_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wiki: WikiConfig::default(),
            crawler: CrawlerConfig::default(),
            user_agent: UserAgentConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://wiki.factorio.com".to_string(),
            roots: vec![
                "https://wiki.factorio.com/Electronics_(research)".to_string(),
                "https://wiki.factorio.com/Steam_power_(research)".to_string(),
            ],
        }
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            delay_seconds: 0.1,
            request_timeout_secs: 20,
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "FactorioTechTreeScraper".to_string(),
            crawler_version: "1.1".to_string(),
            contact_url: "https://wiki.factorio.com/".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            jsonl_path: "./data/tech_tree.jsonl".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header string
    pub fn header_value(&self) -> String {
        format!(
            "Mozilla/5.0 (compatible; {}/{}; +{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}
