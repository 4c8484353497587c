// Entrypoint for the CLI application.
// - Keeps `main` small: load settings, build the API clients and hand them
//   to the prompt flow.
// - Logs go to stderr so they do not mix with the prompts.

use spotumblr::config::{Endpoints, Settings};
use spotumblr::spotify::SpotifyClient;
use spotumblr::tumblr::TumblrClient;
use spotumblr::ui;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(spotumblr::DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::load()?;
    let endpoints = Endpoints::from_env();

    let tumblr = TumblrClient::new(endpoints.tumblr, settings.api.tumblr.clone())?;
    let mut spotify = SpotifyClient::new(
        endpoints.spotify,
        endpoints.spotify_accounts,
        settings.api.spotify.clone(),
        settings.slug_style,
    )?;
    spotify.authorize()?;

    ui::run(&tumblr, &spotify, &settings)?;
    Ok(())
}
