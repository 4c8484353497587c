// Tumblr API client: lists the account's blogs and creates audio posts.
// Every request is signed with OAuth 1.0a.

use crate::error::{Error, Result};
use crate::oauth::{self, Credentials};
use crate::post::Post;
use crate::publish::Publisher;
use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use tracing::{debug, info};

pub const DEFAULT_API_URL: &str = "https://api.tumblr.com";

/// A blog owned by the authenticated user.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Blog {
    pub name: String,
    pub url: String,
}

#[derive(Deserialize)]
struct Envelope<T> {
    response: T,
}

#[derive(Deserialize)]
struct UserInfo {
    user: User,
}

#[derive(Deserialize)]
struct User {
    blogs: Vec<Blog>,
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    meta: Option<Meta>,
    #[serde(default)]
    response: Option<serde_json::Value>,
    #[serde(default)]
    errors: Vec<ApiError>,
}

#[derive(Deserialize)]
struct Meta {
    msg: String,
}

/// Entries of an `errors` list: plain strings on the legacy post endpoint,
/// objects elsewhere.
#[derive(Deserialize)]
#[serde(untagged)]
enum ApiError {
    Message(String),
    Detailed {
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        detail: Option<String>,
    },
}

impl ApiError {
    fn reason(self) -> Option<String> {
        match self {
            ApiError::Message(msg) => Some(msg),
            ApiError::Detailed { title, detail } => detail.or(title),
        }
    }
}

/// Blog identifier as expected in API paths: short names get the
/// `.tumblr.com` suffix, custom domains are kept.
pub fn blog_identifier(blog: &str) -> String {
    if blog.contains('.') {
        blog.to_string()
    } else {
        format!("{}.tumblr.com", blog)
    }
}

/// Human readable reason extracted from a Tumblr error body.
fn error_message(body: &str) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let nested: Vec<ApiError> = parsed
        .response
        .as_ref()
        .and_then(|r| r.get("errors"))
        .and_then(|e| serde_json::from_value(e.clone()).ok())
        .unwrap_or_default();
    let details: Vec<String> = parsed
        .errors
        .into_iter()
        .chain(nested)
        .filter_map(ApiError::reason)
        .collect();
    match (parsed.meta, details.is_empty()) {
        (Some(meta), true) => meta.msg,
        (Some(meta), false) => format!("{} ({})", meta.msg, details.join("; ")),
        (None, false) => details.join("; "),
        (None, true) if body.is_empty() => "no response body".to_string(),
        (None, true) => body.to_string(),
    }
}

/// Form fields of an audio post.
pub fn post_params(post: &Post) -> Vec<(String, String)> {
    let mut params = vec![
        ("type".to_string(), post.post_type.as_str().to_string()),
        ("state".to_string(), post.state.as_str().to_string()),
        ("caption".to_string(), post.caption.clone()),
        ("external_url".to_string(), post.external_url.clone()),
        ("tags".to_string(), post.tags.clone()),
    ];
    if let Some(slug) = &post.slug {
        params.push(("slug".to_string(), slug.clone()));
    }
    params
}

/// Blocking Tumblr v2 client.
#[derive(Clone)]
pub struct TumblrClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl TumblrClient {
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(TumblrClient {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// Blogs of the authenticated user (`GET /v2/user/info`).
    pub fn list_blogs(&self) -> Result<Vec<Blog>> {
        let url = format!("{}/v2/user/info", self.base_url);
        debug!(%url, "listing blogs");
        let auth = oauth::authorization_header(&self.credentials, "GET", &url, &[]);
        let res = self.client.get(&url).header(AUTHORIZATION, auth).send()?;
        let status = res.status();
        let body = res.text()?;
        if !status.is_success() {
            debug!(%status, "user info request failed");
            return Err(Error::Network(format!("{} - {}", status, error_message(&body))));
        }
        let info: Envelope<UserInfo> = serde_json::from_str(&body)?;
        Ok(info.response.user.blogs)
    }

    /// Create an audio post on `post.blog`.
    pub fn create_audio_post(&self, post: &Post) -> Result<()> {
        let url = format!(
            "{}/v2/blog/{}/post",
            self.base_url,
            blog_identifier(&post.blog)
        );
        let params = post_params(post);
        debug!(%url, "creating audio post");
        let auth = oauth::authorization_header(&self.credentials, "POST", &url, &params);
        let res = self
            .client
            .post(&url)
            .header(AUTHORIZATION, auth)
            .form(&params)
            .send()?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().unwrap_or_default();
            return Err(Error::Publish {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        info!(blog = %post.blog, "audio post created");
        Ok(())
    }
}

impl Publisher for TumblrClient {
    fn publish(&self, post: &Post) -> Result<()> {
        self.create_audio_post(post)
    }
}
