//! Environment-driven settings for the notes demo.

use std::env;
use std::time::Duration;

use crate::DemoError;
use notes_shared::NOTES_INDEX;

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default wait for newly indexed documents to become searchable.
const DEFAULT_REFRESH_WAIT_MS: u64 = 1000;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Settings for a demo run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    /// Search engine URL.
    pub opensearch_url: String,
    /// Collection the demo operates on.
    pub index_name: String,
    /// Pause between the bulk write and the final search.
    pub refresh_wait: Duration,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            opensearch_url: DEFAULT_OPENSEARCH_URL.to_string(),
            index_name: NOTES_INDEX.to_string(),
            refresh_wait: Duration::from_millis(DEFAULT_REFRESH_WAIT_MS),
            log_format: LogFormat::Text,
        }
    }
}

impl DemoConfig {
    /// Load settings from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_URL`: search engine URL (default: http://localhost:9200)
    /// - `NOTES_INDEX`: collection name (default: notes)
    /// - `NOTES_REFRESH_WAIT_MS`: wait before the final search (default: 1000)
    /// - `LOG_FORMAT`: `text` or `json` (default: text)
    pub fn from_env() -> Result<Self, DemoError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DemoError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let opensearch_url = lookup("OPENSEARCH_URL").unwrap_or(defaults.opensearch_url);

        let index_name = lookup("NOTES_INDEX").unwrap_or(defaults.index_name);
        if index_name.is_empty() || index_name != index_name.to_lowercase() {
            return Err(DemoError::config(format!(
                "NOTES_INDEX must be a non-empty lowercase name, got {:?}",
                index_name
            )));
        }

        let refresh_wait = match lookup("NOTES_REFRESH_WAIT_MS") {
            Some(raw) => {
                let ms = raw.parse::<u64>().map_err(|e| {
                    DemoError::config(format!("Invalid NOTES_REFRESH_WAIT_MS {:?}: {}", raw, e))
                })?;
                Duration::from_millis(ms)
            }
            None => defaults.refresh_wait,
        };

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(DemoError::config(format!(
                    "LOG_FORMAT must be text or json, got {:?}",
                    other
                )))
            }
        };

        Ok(Self {
            opensearch_url,
            index_name,
            refresh_wait,
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_match_fixed_demo() {
        let config = DemoConfig::from_lookup(|_| None).unwrap();

        assert_eq!(config.opensearch_url, "http://localhost:9200");
        assert_eq!(config.index_name, "notes");
        assert_eq!(config.refresh_wait, Duration::from_millis(1000));
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_overrides() {
        let config = DemoConfig::from_lookup(lookup_from(&[
            ("OPENSEARCH_URL", "http://search:9200"),
            ("NOTES_INDEX", "notes-dev"),
            ("NOTES_REFRESH_WAIT_MS", "250"),
            ("LOG_FORMAT", "json"),
        ]))
        .unwrap();

        assert_eq!(config.opensearch_url, "http://search:9200");
        assert_eq!(config.index_name, "notes-dev");
        assert_eq!(config.refresh_wait, Duration::from_millis(250));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_refresh_wait() {
        let result = DemoConfig::from_lookup(lookup_from(&[("NOTES_REFRESH_WAIT_MS", "soon")]));

        assert!(matches!(result, Err(DemoError::ConfigError(_))));
    }

    #[test]
    fn test_invalid_index_name() {
        let result = DemoConfig::from_lookup(lookup_from(&[("NOTES_INDEX", "Notes")]));
        assert!(matches!(result, Err(DemoError::ConfigError(_))));
    }

    #[test]
    fn test_invalid_log_format() {
        let result = DemoConfig::from_lookup(lookup_from(&[("LOG_FORMAT", "xml")]));
        assert!(matches!(result, Err(DemoError::ConfigError(_))));
    }
}
