// UI layer: the interactive prompt sequence built on `dialoguer`.
// Blog, preset, link, caption, then the confirmation gate and publishing.

use crate::config::Settings;
use crate::error::Error;
use crate::post::{compose, Answers, Post, PostFragment};
use crate::publish::{deliver, will_publish, Outcome};
use crate::spotify::{Preset, SpotifyClient};
use crate::tumblr::{Blog, TumblrClient};
use anyhow::Result;
use crossterm::style::Stylize;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::debug;

/// Run the whole flow once. Resolver and network errors abort it; a publish
/// failure is only reported.
pub fn run(tumblr: &TumblrClient, spotify: &SpotifyClient, settings: &Settings) -> Result<()> {
    let blogs = {
        let spinner = spinner("Fetching your blogs...")?;
        let blogs = tumblr.list_blogs();
        spinner.finish_and_clear();
        blogs?
    };
    if blogs.is_empty() {
        return Err(Error::Config("no blogs on this account".into()).into());
    }

    let blog = ask_blog(&blogs, &settings.default_blog)?;
    let preset = ask_preset()?;
    let url = ask_url(preset)?;
    let fragment = resolve(spotify, &url, preset)?;
    let caption = ask_caption(&fragment)?;

    let post = compose(
        Answers {
            blog,
            preset,
            fragment,
            caption,
        },
        &settings.blog_tags,
        settings.slug_style,
    );

    let confirmed = confirm(&post)?;
    if will_publish(&post, confirmed) {
        println!("posting...");
    }
    report(&deliver(&post, confirmed, tumblr));
    Ok(())
}

/// Question 1: pick the destination blog. Items show the blog URL; the value
/// is its short name.
fn ask_blog(blogs: &[Blog], default_blog: &str) -> Result<String> {
    let items: Vec<&str> = blogs.iter().map(|b| b.url.as_str()).collect();
    let selection = Select::new()
        .with_prompt("Which blog to post to?")
        .items(&items)
        .default(default_blog_index(blogs, default_blog))
        .interact()?;
    Ok(blogs[selection].name.clone())
}

/// Question 2: track or album.
fn ask_preset() -> Result<Preset> {
    let selection = Select::new()
        .with_prompt("What to post?")
        .items(&Preset::ALL)
        .default(0)
        .interact()?;
    Ok(Preset::ALL[selection])
}

/// Question 3: the Spotify link for the chosen preset.
fn ask_url(preset: Preset) -> Result<String> {
    let url: String = Input::new()
        .with_prompt(preset.url_prompt())
        .interact_text()?;
    Ok(url)
}

fn resolve(spotify: &SpotifyClient, url: &str, preset: Preset) -> Result<PostFragment> {
    let spinner = spinner("Looking it up on Spotify...")?;
    let resolved = spotify.resolve(url, preset);
    spinner.finish_and_clear();
    resolved.map_err(|e| {
        debug!(error = %e, %url, "could not resolve Spotify link");
        e.into()
    })
}

/// Question 4: optional caption, empty keeps the default.
fn ask_caption(fragment: &PostFragment) -> Result<String> {
    let caption: String = Input::new()
        .with_prompt("Post caption? (empty for default)")
        .default(caption_default(fragment))
        .allow_empty(true)
        .interact_text()?;
    Ok(caption)
}

/// Confirmation gate: show the post and ask, defaulting to no.
pub fn confirm(post: &Post) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(confirmation_prompt(post)?)
        .default(false)
        .interact()?;
    Ok(confirmed)
}

pub fn confirmation_prompt(post: &Post) -> Result<String> {
    Ok(format!(
        "What do you think?\n\n{}",
        serde_json::to_string_pretty(post)?
    ))
}

/// Cursor position for the blog list: the configured blog if present.
pub fn default_blog_index(blogs: &[Blog], default_blog: &str) -> usize {
    blogs
        .iter()
        .position(|b| b.name == default_blog)
        .unwrap_or(0)
}

/// Pre-filled caption: the fragment's caption when it has one.
pub fn caption_default(fragment: &PostFragment) -> String {
    fragment
        .caption
        .as_deref()
        .filter(|c| !c.is_empty())
        .unwrap_or_default()
        .to_string()
}

fn report(outcome: &Outcome) {
    match outcome {
        Outcome::Cancelled => println!("Cancelled..."),
        Outcome::Skipped => {}
        Outcome::Published => println!("{}", "Posted successfully!".green()),
        Outcome::Failed(cause) => eprintln!("{} {}", "Not posted..".red(), cause),
    }
}

fn spinner(message: &'static str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}
