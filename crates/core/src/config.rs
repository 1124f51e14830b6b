use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Env var selecting the active profile.
pub const PROFILE_ENV: &str = "INVENTORY_PROFILE";

const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
const DEFAULT_INDEX_NAME: &str = "inventoryIdx";
const DEFAULT_KEY_PREFIX: &str = "inventory:";
const DEFAULT_DATASET_PATH: &str = "data.json";

/// Load an env file into the process environment.
///
/// Returns `false` (and leaves the environment untouched) when the file is
/// missing or unreadable; variables already set are never overridden.
pub fn load_env_file(path: &Path) -> bool {
    match dotenvy::from_path(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "loaded env file");
            true
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "env file not loaded");
            false
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub redis: RedisConfig,
    pub dataset: DatasetConfig,
}

impl Config {
    /// Build config from environment variables (load the env file first).
    /// Profile is read from `INVENTORY_PROFILE`. When set (e.g. `STAGING`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or(PROFILE_ENV, "");
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            redis: RedisConfig::from_env_profiled(p),
            dataset: DatasetConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  redis:    url={}", self.redis.redacted_url());
        tracing::info!("  index:    name={}, prefix={}", self.redis.index_name, self.redis.key_prefix);
        tracing::info!("  dataset:  path={}", self.dataset.path.display());
    }

    /// Return a redacted view safe for printing (no secrets).
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "redis": {
                "url": self.redis.redacted_url(),
                "index_name": self.redis.index_name,
                "key_prefix": self.redis.key_prefix,
            },
            "dataset": { "path": self.dataset.path },
        })
    }
}

// ── Redis ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Server address as given; may omit the `redis://` scheme.
    pub url: String,
    /// Name of the search index built over the loaded documents.
    pub index_name: String,
    /// Key prefix shared by every loaded document and scoped by the index.
    pub key_prefix: String,
}

impl RedisConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            url: profiled_env_or(p, "REDIS_URL", DEFAULT_REDIS_URL),
            index_name: profiled_env_or(p, "INVENTORY_INDEX", DEFAULT_INDEX_NAME),
            key_prefix: profiled_env_or(p, "INVENTORY_KEY_PREFIX", DEFAULT_KEY_PREFIX),
        }
    }

    /// URL with a scheme, accepting bare `host:port` / `user:pass@host:port` forms.
    pub fn connection_url(&self) -> String {
        if self.url.contains("://") {
            self.url.clone()
        } else {
            format!("redis://{}", self.url)
        }
    }

    /// Connection URL with any password replaced by `***`.
    pub fn redacted_url(&self) -> String {
        let url = self.connection_url();
        let Some((scheme, rest)) = url.split_once("://") else {
            return url.clone();
        };
        let Some((userinfo, host)) = rest.rsplit_once('@') else {
            return url.clone();
        };
        match userinfo.split_once(':') {
            Some((user, _)) => format!("{}://{}:***@{}", scheme, user, host),
            None => format!("{}://***@{}", scheme, host),
        }
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_REDIS_URL.to_string(),
            index_name: DEFAULT_INDEX_NAME.to_string(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }
}

// ── Dataset ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub path: PathBuf,
}

impl DatasetConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            path: PathBuf::from(profiled_env_or(p, "INVENTORY_DATASET", DEFAULT_DATASET_PATH)),
        }
    }
}
