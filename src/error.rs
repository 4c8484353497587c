// Error kinds surfaced by the library. The UI converts them into
// `anyhow::Error` and decides whether to abort or just report.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Transport failure or a non-success status from Spotify or Tumblr.
    #[error("Network error: {0}")]
    Network(String),

    /// The response body did not have the shape we read from it.
    #[error("Unexpected response: {0}")]
    Parse(String),

    /// Tumblr refused to create the post.
    #[error("Tumblr rejected the post ({status}): {message}")]
    Publish { status: u16, message: String },

    /// Settings file missing, unreadable or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Could not find an identifier in {0:?}")]
    InvalidUrl(String),
}

impl Error {
    /// Build a network error from a non-success response.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        if body.is_empty() {
            Error::Network(format!("server answered {}", status))
        } else {
            Error::Network(format!("server answered {} - {}", status, body))
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Network(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_keep_the_body() {
        let err = Error::from_status(reqwest::StatusCode::NOT_FOUND, "{\"error\":\"missing\"}");
        assert!(matches!(err, Error::Network(_)));
        assert!(err.to_string().contains("404"));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn json_errors_are_parse_errors() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, Error::Parse(_)));
    }
}
