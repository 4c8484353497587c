// Spotify resolver: turns a track or album link into an audio post fragment.
// One metadata request per resolve; failures are handed straight back.

use crate::error::{Error, Result};
use crate::post::{PostFragment, PostType, SlugStyle};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::fmt;
use tracing::{debug, info};

pub const DEFAULT_API_URL: &str = "https://api.spotify.com";
pub const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";

/// Content presets offered in the prompt flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Track,
    Album,
}

impl Preset {
    pub const ALL: [Preset; 2] = [Preset::Track, Preset::Album];

    fn path(&self) -> &'static str {
        match self {
            Preset::Track => "tracks",
            Preset::Album => "albums",
        }
    }

    /// Prompt shown when asking for the link.
    pub fn url_prompt(&self) -> &'static str {
        match self {
            Preset::Track => "Spotify Track URL",
            Preset::Album => "Spotify Album URL",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Preset::Track => f.write_str("Spotify track"),
            Preset::Album => f.write_str("Spotify album"),
        }
    }
}

/// Client credentials for the Spotify Web API.
#[derive(Deserialize, Debug, Clone)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// The fields we read from a track or album response.
#[derive(Deserialize, Debug, Clone)]
pub struct Metadata {
    pub id: Option<String>,
    #[serde(rename = "name")]
    pub title: String,
    pub external_urls: ExternalUrls,
    pub artists: Vec<Artist>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ExternalUrls {
    pub spotify: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Artist {
    pub name: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Extract the Spotify identifier from a share link or a `spotify:` URI.
pub fn spotify_id(url: &str) -> Result<String> {
    let trimmed = url.trim();
    let without_suffix = trimmed
        .split(|c: char| c == '?' || c == '#')
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');
    let id = if without_suffix.starts_with("spotify:") {
        without_suffix.rsplit(':').next()
    } else {
        without_suffix.rsplit('/').next()
    };
    match id {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(Error::InvalidUrl(url.to_string())),
    }
}

/// Build the post fragment for the given metadata.
pub fn fragment_from(metadata: &Metadata, preset: Preset, slug_style: SlugStyle) -> Result<PostFragment> {
    let (primary, others) = metadata
        .artists
        .split_first()
        .ok_or_else(|| Error::Parse(format!("{} has no artists", metadata.title)))?;

    let mut tags = vec!["music".to_string()];
    if preset == Preset::Album {
        tags.push(metadata.title.clone());
    }
    tags.extend(metadata.artists.iter().map(|a| a.name.to_lowercase()));

    let mut parts = vec![primary.name.as_str(), metadata.title.as_str()];
    parts.extend(others.iter().map(|a| a.name.as_str()));
    let joined = parts.join("-").to_lowercase();
    let slug = match slug_style {
        SlugStyle::CollapseAll => joined.split_whitespace().collect::<Vec<_>>().join("-"),
        SlugStyle::FirstRunOnly => joined.replacen(' ', "-", 1),
    };

    Ok(PostFragment {
        post_type: PostType::Audio,
        external_url: metadata.external_urls.spotify.clone(),
        tags,
        slug: Some(slug),
        caption: None,
    })
}

/// Blocking client for the public Spotify Web API.
#[derive(Clone)]
pub struct SpotifyClient {
    client: Client,
    base_url: String,
    accounts_url: String,
    credentials: Option<SpotifyCredentials>,
    token: Option<String>,
    slug_style: SlugStyle,
}

impl SpotifyClient {
    pub fn new(
        base_url: impl Into<String>,
        accounts_url: impl Into<String>,
        credentials: Option<SpotifyCredentials>,
        slug_style: SlugStyle,
    ) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(SpotifyClient {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            accounts_url: accounts_url.into().trim_end_matches('/').to_string(),
            credentials,
            token: None,
            slug_style,
        })
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Exchange the configured client credentials for an access token.
    /// Without credentials this does nothing and requests go out anonymously.
    pub fn authorize(&mut self) -> Result<()> {
        let Some(creds) = &self.credentials else {
            debug!("no Spotify credentials configured, using anonymous requests");
            return Ok(());
        };
        let url = format!("{}/api/token", self.accounts_url);
        let res = self
            .client
            .post(&url)
            .basic_auth(&creds.client_id, Some(&creds.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()?;
        let status = res.status();
        let body = res.text()?;
        if !status.is_success() {
            return Err(Error::from_status(status, &body));
        }
        let token: TokenResponse = serde_json::from_str(&body)?;
        self.token = Some(token.access_token);
        info!("authorized against Spotify");
        Ok(())
    }

    /// Fetch the metadata for `id`.
    pub fn metadata(&self, id: &str, preset: Preset) -> Result<Metadata> {
        let url = format!("{}/v1/{}/{}", self.base_url, preset.path(), id);
        debug!(%url, "fetching Spotify metadata");
        let mut req = self.client.get(&url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let res = req.send()?;
        let status = res.status();
        let body = res.text()?;
        if !status.is_success() {
            return Err(Error::from_status(status, &body));
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Resolve a Spotify link into a post fragment.
    pub fn resolve(&self, url: &str, preset: Preset) -> Result<PostFragment> {
        let id = spotify_id(url)?;
        let metadata = self.metadata(&id, preset)?;
        let fragment = fragment_from(&metadata, preset, self.slug_style)?;
        info!(%id, title = %metadata.title, "resolved Spotify {}", preset.path());
        Ok(fragment)
    }
}
