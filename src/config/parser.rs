use std::path::Path;

use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;

/// Loads and parses a configuration file from the given path.
///
/// Any table or key omitted from the file keeps its built-in default, so a
/// config file only needs to name what it changes.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use techtrawl::config::load_config;
///
/// let config = load_config(Path::new("techtrawl.toml")).unwrap();
/// println!("Roots: {}", config.wiki.roots.len());
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let config: Config = toml::from_str(&content)?;

    validate(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[wiki]
base-url = "https://wiki.example.org"
roots = ["https://wiki.example.org/Alpha_(research)"]

[crawler]
delay-seconds = 0.25
request-timeout-secs = 10

[user-agent]
crawler-name = "TestScraper"
crawler-version = "0.1"
contact-url = "https://example.org/about"

[output]
jsonl-path = "./out/tree.jsonl"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.wiki.base_url, "https://wiki.example.org");
        assert_eq!(config.wiki.roots.len(), 1);
        assert_eq!(config.crawler.delay_seconds, 0.25);
        assert_eq!(config.user_agent.crawler_name, "TestScraper");
        assert_eq!(config.output.jsonl_path, "./out/tree.jsonl");
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let file = create_temp_config("[crawler]\ndelay-seconds = 1.5\n");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.delay_seconds, 1.5);
        assert_eq!(config.wiki.base_url, "https://wiki.factorio.com");
        assert_eq!(config.wiki.roots.len(), 2);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/techtrawl.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[crawler]\ndelay-seconds = -1.0\n");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }
}
