use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

use crate::directory::Link;

pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeMethod {
    Head,
    Get,
}

/// Issues a single request and reports the HTTP status code.
pub trait Probe {
    fn status(&self, method: ProbeMethod, url: &str) -> Result<u16>;
}

pub struct HttpProbe {
    client: reqwest::blocking::Client,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

impl Probe for HttpProbe {
    fn status(&self, method: ProbeMethod, url: &str) -> Result<u16> {
        let request = match method {
            ProbeMethod::Head => self.client.head(url),
            ProbeMethod::Get => self.client.get(url),
        };
        let response = request
            .send()
            .with_context(|| format!("{method:?} {url} failed"))?;
        Ok(response.status().as_u16())
    }
}

/// One remembered probe result; `checked_at` is in Unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct CacheEntry {
    live: bool,
    checked_at: u64,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Memoized "does this URL answer 200" predicate.
///
/// A HEAD probe is tried first; anything other than 200 falls back to GET.
/// Errors count as "not live". Results are reused until they are older than
/// the TTL. With a cache file attached, results survive between runs.
pub struct LinkChecker<P: Probe> {
    probe: P,
    ttl: Duration,
    cache: Mutex<HashMap<String, CacheEntry>>,
    cache_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct LinkStatus {
    pub name: String,
    pub url: String,
    pub live: bool,
}

impl<P: Probe> LinkChecker<P> {
    pub fn new(probe: P, ttl: Duration) -> Self {
        Self {
            probe,
            ttl,
            cache: Mutex::new(HashMap::new()),
            cache_file: None,
        }
    }

    /// Seed the cache from `path` and write results back there.
    /// A missing or unreadable file starts an empty cache.
    pub fn with_cache_file(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = if path.exists() {
            match load_cache(&path) {
                Ok(entries) => {
                    debug!(path = %path.display(), count = entries.len(), "liveness cache loaded");
                    entries
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %format!("{e:#}"), "ignoring unreadable liveness cache");
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };
        self.cache = Mutex::new(entries);
        self.cache_file = Some(path);
        self
    }

    pub fn is_live(&self, url: &str) -> bool {
        if let Some(live) = self.cached(url) {
            debug!(url, live, "liveness cache hit");
            return live;
        }

        let live = self.probe_once(url);

        let mut cache = self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        cache.insert(
            url.to_string(),
            CacheEntry {
                live,
                checked_at: unix_now(),
            },
        );
        live
    }

    /// Forget every remembered result.
    pub fn clear(&self) {
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    fn is_fresh(&self, entry: &CacheEntry, now: u64) -> bool {
        Duration::from_secs(now.saturating_sub(entry.checked_at)) < self.ttl
    }

    fn cached(&self, url: &str) -> Option<bool> {
        let cache = self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let now = unix_now();
        cache
            .get(url)
            .filter(|entry| self.is_fresh(entry, now))
            .map(|entry| entry.live)
    }

    fn probe_once(&self, url: &str) -> bool {
        for method in [ProbeMethod::Head, ProbeMethod::Get] {
            match self.probe.status(method, url) {
                Ok(200) => return true,
                Ok(code) => debug!(url, ?method, code, "probe returned non-200"),
                Err(e) => debug!(url, ?method, error = %e, "probe failed"),
            }
        }
        false
    }

    /// Write the fresh entries to the cache file, if one is attached.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.cache_file else {
            return Ok(());
        };
        let now = unix_now();
        let json = {
            let cache = self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            let fresh: HashMap<&String, &CacheEntry> = cache
                .iter()
                .filter(|(_, entry)| self.is_fresh(entry, now))
                .collect();
            serde_json::to_string_pretty(&fresh).context("Failed to serialize liveness cache")?
        };
        write_cache(path, &json)
    }

    /// Check every link in order, then persist the cache.
    pub fn check_all(&self, links: &[Link]) -> Vec<LinkStatus> {
        let results = links
            .iter()
            .map(|link| LinkStatus {
                name: link.name.to_string(),
                url: link.url.to_string(),
                live: self.is_live(link.url),
            })
            .collect();
        if let Err(e) = self.save() {
            warn!(error = %format!("{e:#}"), "failed to save liveness cache");
        }
        results
    }
}

fn load_cache(path: &Path) -> Result<HashMap<String, CacheEntry>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

fn write_cache(path: &Path, json: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}
