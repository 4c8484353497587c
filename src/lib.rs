// Library root
// -----------
// The binary (`main.rs`) wires these modules into the interactive flow.
//
// Module responsibilities:
// - `spotify`: resolves a track or album link into an audio post fragment.
// - `post`: post model, per-blog tags, slug cleanup and the composer.
// - `publish`: the publishing step behind the confirmation gate.
// - `tumblr` / `oauth`: signed calls to the Tumblr API.
// - `config`: settings file and API endpoints.
// - `ui`: the `dialoguer` prompt sequence.
pub mod config;
pub mod error;
pub mod oauth;
pub mod post;
pub mod publish;
pub mod spotify;
pub mod tumblr;
pub mod ui;

pub use error::{Error, Result};

/// Log filter used when `RUST_LOG` is not set. Failures reach the user
/// through the UI, so the library stays quiet below `warn`.
pub const DEFAULT_LOG_FILTER: &str = "spotumblr=warn";
