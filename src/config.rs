// Settings loading. The settings file is JSON and holds the API credentials
// plus the per-blog tagging rules; API base URLs come from the environment.

use crate::error::{Error, Result};
use crate::oauth::Credentials;
use crate::post::{BlogTags, SlugStyle};
use crate::spotify::{self, SpotifyCredentials};
use crate::tumblr;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const SETTINGS_ENV: &str = "SPOTUMBLR_SETTINGS";
const SETTINGS_FILE: &str = "settings.json";
const APP_DIR: &str = "spotumblr";

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    pub api: ApiSettings,
    #[serde(default = "default_blog")]
    pub default_blog: String,
    #[serde(default)]
    pub blog_tags: BlogTags,
    #[serde(default)]
    pub slug_style: SlugStyle,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ApiSettings {
    pub tumblr: Credentials,
    #[serde(default)]
    pub spotify: Option<SpotifyCredentials>,
}

fn default_blog() -> String {
    "onesongmayhem".to_string()
}

/// Base URLs of the remote APIs.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoints {
    pub tumblr: String,
    pub spotify: String,
    pub spotify_accounts: String,
}

impl Endpoints {
    /// Read `TUMBLR_API_URL`, `SPOTIFY_API_URL` and `SPOTIFY_ACCOUNTS_URL`,
    /// falling back to the public endpoints.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.into());
        Endpoints {
            tumblr: var("TUMBLR_API_URL", tumblr::DEFAULT_API_URL),
            spotify: var("SPOTIFY_API_URL", spotify::DEFAULT_API_URL),
            spotify_accounts: var("SPOTIFY_ACCOUNTS_URL", spotify::DEFAULT_ACCOUNTS_URL),
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(format!("invalid settings: {}", e)))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json(&data)
    }

    /// Load from `$SPOTUMBLR_SETTINGS`, `./settings.json` or the user config dir.
    pub fn load() -> Result<Self> {
        let path = match std::env::var_os(SETTINGS_ENV) {
            Some(p) => PathBuf::from(p),
            None => locate(&default_candidates()).ok_or_else(|| {
                Error::Config(format!(
                    "no {} found (set {} to point at one)",
                    SETTINGS_FILE, SETTINGS_ENV
                ))
            })?,
        };
        debug!(path = %path.display(), "loading settings");
        Self::from_file(&path)
    }
}

fn default_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(SETTINGS_FILE)];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join(APP_DIR).join(SETTINGS_FILE));
    }
    candidates
}

/// First candidate that exists on disk.
pub fn locate(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|p| p.is_file()).cloned()
}
