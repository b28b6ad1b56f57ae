//! Social platform channels (LinkedIn).
//!
//! [`CommentPoster`] is the seam the webhook handler posts replies through.

mod linkedin;

use async_trait::async_trait;

pub use linkedin::{organization_urn, LinkedInClient};

#[derive(Debug, thiserror::Error)]
pub enum PostingError {
    #[error("comment post request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("comment post rejected: {0}")]
    Api(String),
    #[error("comment post timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// Posts a reply comment on a platform thread.
#[async_trait]
pub trait CommentPoster: Send + Sync {
    /// `target` is the platform id of the post or comment thread (e.g. `urn:li:activity:123`).
    async fn post_comment(&self, target: &str, text: &str) -> Result<(), PostingError>;
}
