use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::liveness::{DEFAULT_TIMEOUT, DEFAULT_TTL};

/// Runtime settings, read from the environment and then overridden by
/// command-line flags.
///
/// - `JOBHUB_DATA_FILE`: tracker file (default: `<data dir>/applications.json`)
/// - `JOBHUB_LINK_CACHE_FILE`: liveness results kept between runs
///   (default: `<data dir>/link_cache.json`)
/// - `JOBHUB_LINK_TTL_SECS`: how long a liveness result is reused
/// - `JOBHUB_PROBE_TIMEOUT_SECS`: per-request timeout of a liveness probe
/// - `JOBHUB_VISITOR_CSV_URL`: published spreadsheet CSV for the visitor counter
/// - `JOBHUB_API_KEY` / `OPENAI_API_KEY`: enables remote text generation
///
/// Malformed numbers are logged and replaced by their defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_file: PathBuf,
    pub link_cache_file: PathBuf,
    pub link_ttl: Duration,
    pub probe_timeout: Duration,
    pub visitor_csv_url: Option<String>,
    pub api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_file = non_blank("JOBHUB_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir().join("applications.json"));
        let link_cache_file = non_blank("JOBHUB_LINK_CACHE_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir().join("link_cache.json"));

        let link_ttl = seconds(&lookup, "JOBHUB_LINK_TTL_SECS", DEFAULT_TTL);
        let probe_timeout = seconds(&lookup, "JOBHUB_PROBE_TIMEOUT_SECS", DEFAULT_TIMEOUT);

        let visitor_csv_url = non_blank("JOBHUB_VISITOR_CSV_URL");
        let api_key = non_blank("JOBHUB_API_KEY").or_else(|| non_blank("OPENAI_API_KEY"));

        Self {
            data_file,
            link_cache_file,
            link_ttl,
            probe_timeout,
            visitor_csv_url,
            api_key,
        }
    }
}

fn seconds(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: Duration) -> Duration {
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<u64>() {
        Ok(secs) => Duration::from_secs(secs),
        Err(_) => {
            warn!(key, value = %raw, default_secs = default.as_secs(), "not a whole number of seconds, using the default");
            default
        }
    }
}

fn data_dir() -> PathBuf {
    // Use XDG data directory or fallback
    if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "jobhub") {
        proj_dirs.data_dir().to_path_buf()
    } else {
        PathBuf::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]);
        assert_eq!(config.link_ttl, DEFAULT_TTL);
        assert_eq!(config.probe_timeout, DEFAULT_TIMEOUT);
        assert!(config.data_file.ends_with("applications.json"));
        assert!(config.link_cache_file.ends_with("link_cache.json"));
        assert_eq!(config.link_cache_file.parent(), config.data_file.parent());
        assert!(config.api_key.is_none());
        assert!(config.visitor_csv_url.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("JOBHUB_DATA_FILE", "/tmp/apps.json"),
            ("JOBHUB_LINK_TTL_SECS", "86400"),
            ("JOBHUB_PROBE_TIMEOUT_SECS", " 2 "),
            ("OPENAI_API_KEY", "sk-fallback"),
            ("JOBHUB_LINK_CACHE_FILE", "/tmp/links.json"),
        ]);
        assert_eq!(config.data_file, PathBuf::from("/tmp/apps.json"));
        assert_eq!(config.link_ttl, Duration::from_secs(86400));
        assert_eq!(config.probe_timeout, Duration::from_secs(2));
        assert_eq!(config.api_key.as_deref(), Some("sk-fallback"));
        assert_eq!(config.link_cache_file, PathBuf::from("/tmp/links.json"));
    }

    #[test]
    fn test_own_key_wins_and_blank_is_ignored() {
        let config = load(&[("JOBHUB_API_KEY", "sk-own"), ("OPENAI_API_KEY", "sk-other")]);
        assert_eq!(config.api_key.as_deref(), Some("sk-own"));

        let config = load(&[("JOBHUB_API_KEY", " ")]);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_bad_number_falls_back_to_default() {
        let config = load(&[
            ("JOBHUB_LINK_TTL_SECS", "an hour"),
            ("JOBHUB_PROBE_TIMEOUT_SECS", "-1"),
            ("JOBHUB_DATA_FILE", "/tmp/apps.json"),
        ]);
        assert_eq!(config.link_ttl, DEFAULT_TTL);
        assert_eq!(config.probe_timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.data_file, PathBuf::from("/tmp/apps.json"));
    }
}
