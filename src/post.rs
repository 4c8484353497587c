// Post model and the composer that turns the prompt answers into the record
// sent to Tumblr.

use crate::spotify::Preset;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Tumblr post types. Only `Audio` is produced by the prompt flow.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    Text,
    Photo,
    Quote,
    Link,
    Chat,
    Audio,
    Video,
}

impl PostType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::Text => "text",
            PostType::Photo => "photo",
            PostType::Quote => "quote",
            PostType::Link => "link",
            PostType::Chat => "chat",
            PostType::Audio => "audio",
            PostType::Video => "video",
        }
    }
}

impl fmt::Display for PostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PostState {
    #[default]
    Published,
}

impl PostState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostState::Published => "published",
        }
    }
}

/// Partial post built by the resolver from Spotify metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct PostFragment {
    pub post_type: PostType,
    pub external_url: String,
    pub tags: Vec<String>,
    pub slug: Option<String>,
    pub caption: Option<String>,
}

/// Everything the prompt flow collected, consumed once by [`compose`].
#[derive(Debug, Clone)]
pub struct Answers {
    pub blog: String,
    pub preset: Preset,
    pub fragment: PostFragment,
    pub caption: String,
}

/// The post as shown for confirmation and sent to Tumblr. Tags are already
/// joined into a single comma separated string.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Post {
    pub blog: String,
    pub state: PostState,
    pub caption: String,
    #[serde(rename = "type")]
    pub post_type: PostType,
    pub external_url: String,
    pub tags: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

/// How whitespace inside a slug is turned into hyphens.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SlugStyle {
    /// Every whitespace run becomes a single `-`.
    #[default]
    CollapseAll,
    /// Only the first whitespace run is replaced. Matches slugs produced by
    /// the old script; not idempotent.
    FirstRunOnly,
}

/// Leading tag injected per destination blog.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct BlogTags(BTreeMap<String, String>);

impl BlogTags {
    pub fn new(map: BTreeMap<String, String>) -> Self {
        BlogTags(map)
    }

    pub fn leading_tag(&self, blog: &str) -> Option<&str> {
        self.0.get(blog).map(String::as_str)
    }
}

impl Default for BlogTags {
    fn default() -> Self {
        let mut map = BTreeMap::new();
        map.insert("onesongmayhem".to_string(), "1 song mayhem".to_string());
        map.insert("listhype".to_string(), "listhype".to_string());
        BlogTags(map)
    }
}

/// Trim the slug and replace whitespace with hyphens.
pub fn clean_slug(slug: &str, style: SlugStyle) -> String {
    match style {
        SlugStyle::CollapseAll => slug.split_whitespace().collect::<Vec<_>>().join("-"),
        SlugStyle::FirstRunOnly => {
            let trimmed = slug.trim();
            let Some(start) = trimmed.find(char::is_whitespace) else {
                return trimmed.to_string();
            };
            let rest = &trimmed[start..];
            let run_len = rest
                .find(|c: char| !c.is_whitespace())
                .unwrap_or(rest.len());
            format!("{}-{}", &trimmed[..start], &rest[run_len..])
        }
    }
}

/// Merge the answers with the per-blog tagging rules into the final post.
pub fn compose(answers: Answers, blog_tags: &BlogTags, slug_style: SlugStyle) -> Post {
    let Answers {
        blog,
        preset,
        fragment,
        caption: caption_override,
    } = answers;
    debug!(%blog, %preset, "composing post");

    let mut caption = fragment.caption.unwrap_or_default();
    if !caption_override.is_empty() {
        caption = caption_override;
    }

    let mut tags = fragment.tags;
    if let Some(tag) = blog_tags.leading_tag(&blog) {
        tags.insert(0, tag.to_string());
    }

    let slug = fragment.slug.map(|s| clean_slug(&s, slug_style));

    Post {
        blog,
        state: PostState::Published,
        caption,
        post_type: fragment.post_type,
        external_url: fragment.external_url,
        tags: tags.join(","),
        slug,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fragment() -> PostFragment {
        PostFragment {
            post_type: PostType::Audio,
            external_url: "https://open.spotify.com/track/abc".into(),
            tags: vec!["music".into(), "daft punk".into()],
            slug: Some("daft-punk-one-more-time".into()),
            caption: None,
        }
    }

    fn answers(blog: &str, caption: &str) -> Answers {
        Answers {
            blog: blog.into(),
            preset: Preset::Track,
            fragment: fragment(),
            caption: caption.into(),
        }
    }

    #[test]
    fn collapse_all_replaces_every_run() {
        assert_eq!(
            clean_slug("  daft punk-one   more\ttime ", SlugStyle::CollapseAll),
            "daft-punk-one-more-time"
        );
    }

    #[test]
    fn collapse_all_is_idempotent() {
        for input in ["a b  c", " x ", "already-clean", "", "tab\tand\nnewline"] {
            let once = clean_slug(input, SlugStyle::CollapseAll);
            assert_eq!(clean_slug(&once, SlugStyle::CollapseAll), once);
        }
    }

    #[test]
    fn first_run_only_leaves_later_runs() {
        assert_eq!(
            clean_slug(" daft  punk-one more time ", SlugStyle::FirstRunOnly),
            "daft-punk-one more time"
        );
        assert_eq!(clean_slug("clean", SlugStyle::FirstRunOnly), "clean");
    }

    #[test]
    fn mapped_blogs_get_one_leading_tag() {
        let tags = BlogTags::default();

        let post = compose(answers("onesongmayhem", ""), &tags, SlugStyle::CollapseAll);
        assert_eq!(post.tags, "1 song mayhem,music,daft punk");

        let post = compose(answers("listhype", ""), &tags, SlugStyle::CollapseAll);
        assert_eq!(post.tags, "listhype,music,daft punk");

        let post = compose(answers("someoneelse", ""), &tags, SlugStyle::CollapseAll);
        assert_eq!(post.tags, "music,daft punk");
    }

    #[test]
    fn album_answers_keep_the_album_tags() {
        let mut album = answers("listhype", "");
        album.preset = Preset::Album;
        album.fragment.tags = vec!["music".into(), "Discovery".into(), "daft punk".into()];
        let post = compose(album, &BlogTags::default(), SlugStyle::CollapseAll);
        assert_eq!(post.tags, "listhype,music,Discovery,daft punk");
    }

    #[test]
    fn custom_tag_table_is_used() {
        let mut map = BTreeMap::new();
        map.insert("newblog".to_string(), "new tag".to_string());
        let tags = BlogTags::new(map);

        let post = compose(answers("newblog", ""), &tags, SlugStyle::CollapseAll);
        assert_eq!(post.tags, "new tag,music,daft punk");
        let post = compose(answers("onesongmayhem", ""), &tags, SlugStyle::CollapseAll);
        assert_eq!(post.tags, "music,daft punk");
    }

    #[test]
    fn caption_override_wins_only_when_non_empty() {
        let tags = BlogTags::default();

        let post = compose(answers("listhype", ""), &tags, SlugStyle::CollapseAll);
        assert_eq!(post.caption, "");

        let mut with_default = answers("listhype", "");
        with_default.fragment.caption = Some("from spotify".into());
        let post = compose(with_default.clone(), &tags, SlugStyle::CollapseAll);
        assert_eq!(post.caption, "from spotify");

        with_default.caption = "mine".into();
        let post = compose(with_default, &tags, SlugStyle::CollapseAll);
        assert_eq!(post.caption, "mine");
    }

    #[test]
    fn composed_post_has_fixed_fields() {
        let post = compose(answers("onesongmayhem", ""), &BlogTags::default(), SlugStyle::CollapseAll);
        assert_eq!(post.blog, "onesongmayhem");
        assert_eq!(post.state, PostState::Published);
        assert_eq!(post.post_type, PostType::Audio);
        assert_eq!(post.slug.as_deref(), Some("daft-punk-one-more-time"));
    }

    #[test]
    fn serialized_post_uses_api_field_names() {
        let post = compose(answers("listhype", ""), &BlogTags::default(), SlugStyle::CollapseAll);
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["type"], "audio");
        assert_eq!(json["state"], "published");
        assert_eq!(json["tags"], "listhype,music,daft punk");

        let mut no_slug = post;
        no_slug.slug = None;
        let json = serde_json::to_value(&no_slug).unwrap();
        assert!(json.get("slug").is_none());
    }

    #[test]
    fn blog_tags_deserialize_from_a_plain_map() {
        let tags: BlogTags = serde_json::from_str(r#"{"myblog":"mine"}"#).unwrap();
        assert_eq!(tags.leading_tag("myblog"), Some("mine"));
        assert_eq!(tags.leading_tag("listhype"), None);
    }

    proptest! {
        #[test]
        fn clean_slug_is_idempotent(slug in "[a-z0-9 \t\n-]{0,40}|\\PC{0,40}") {
            let once = clean_slug(&slug, SlugStyle::CollapseAll);
            prop_assert_eq!(clean_slug(&once, SlugStyle::CollapseAll), once.clone());
            prop_assert_eq!(once.trim(), once.as_str());
        }

        #[test]
        fn unmapped_blogs_keep_the_fragment_tags(blog in "[a-z]{1,20}") {
            prop_assume!(blog != "onesongmayhem" && blog != "listhype");
            let post = compose(answers(&blog, ""), &BlogTags::default(), SlugStyle::CollapseAll);
            prop_assert_eq!(post.tags, "music,daft punk");
        }

        #[test]
        fn non_empty_caption_always_wins(caption in "\\PC{1,40}") {
            let mut with_default = answers("listhype", &caption);
            with_default.fragment.caption = Some("from spotify".into());
            let post = compose(with_default, &BlogTags::default(), SlugStyle::CollapseAll);
            prop_assert_eq!(post.caption, caption);
        }
    }
}
