// Publishing step that runs after the confirmation gate.

use crate::error::Result;
use crate::post::{Post, PostType};
use tracing::{debug, info};

/// Something that can create a post on a blog.
pub trait Publisher {
    fn publish(&self, post: &Post) -> Result<()>;
}

/// What happened to a composed post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The user declined the confirmation.
    Cancelled,
    /// Confirmed, but the post type is not one we publish.
    Skipped,
    Published,
    Failed(String),
}

/// Whether [`deliver`] would call the publisher.
pub fn will_publish(post: &Post, confirmed: bool) -> bool {
    confirmed && post.post_type == PostType::Audio
}

/// Hand a confirmed audio post to the publisher, exactly once.
pub fn deliver<P: Publisher + ?Sized>(post: &Post, confirmed: bool, publisher: &P) -> Outcome {
    if !confirmed {
        return Outcome::Cancelled;
    }
    if !will_publish(post, confirmed) {
        info!(post_type = %post.post_type, "not an audio post, nothing to publish");
        return Outcome::Skipped;
    }
    match publisher.publish(post) {
        Ok(()) => Outcome::Published,
        Err(e) => {
            debug!(error = %e, "publishing failed");
            Outcome::Failed(e.to_string())
        }
    }
}
