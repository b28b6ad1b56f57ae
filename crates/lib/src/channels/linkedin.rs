//! LinkedIn channel: create comments via the socialActions REST API.

use crate::channels::{CommentPoster, PostingError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const LINKEDIN_API_BASE: &str = "https://api.linkedin.com";
const RESTLI_PROTOCOL_VERSION: &str = "2.0.0";

/// Actor URN for an organization page.
pub fn organization_urn(organization_id: &str) -> String {
    format!("urn:li:organization:{}", organization_id)
}

#[derive(Debug, Serialize)]
struct CreateCommentRequest<'a> {
    actor: String,
    message: CommentMessage<'a>,
}

#[derive(Debug, Serialize)]
struct CommentMessage<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateCommentResponse {
    #[serde(default)]
    id: Option<String>,
}

/// LinkedIn client posting as a fixed organization.
pub struct LinkedInClient {
    api_base: String,
    access_token: String,
    organization_id: String,
    client: reqwest::Client,
}

impl LinkedInClient {
    pub fn new(api_base: Option<String>, access_token: String, organization_id: String) -> Self {
        let api_base = api_base
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| LINKEDIN_API_BASE.to_string());
        Self {
            api_base,
            access_token,
            organization_id,
            client: reqwest::Client::new(),
        }
    }

    fn comments_url(&self, target: &str) -> String {
        format!(
            "{}/v2/socialActions/{}/comments",
            self.api_base,
            urlencoding::encode(target)
        )
    }

    /// POST /v2/socialActions/{target}/comments as the configured organization.
    pub async fn create_comment(&self, target: &str, text: &str) -> Result<(), PostingError> {
        let url = self.comments_url(target);
        let body = CreateCommentRequest {
            actor: organization_urn(&self.organization_id),
            message: CommentMessage { text },
        };
        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .header("X-Restli-Protocol-Version", RESTLI_PROTOCOL_VERSION)
            .json(&body)
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(PostingError::Api(format!("{} {}", status, body)));
        }
        let created: Option<CreateCommentResponse> = res.json().await.ok();
        match created.and_then(|c| c.id) {
            Some(id) => log::info!("linkedin: reply posted on {} (comment {})", target, id),
            None => log::info!("linkedin: reply posted on {}", target),
        }
        Ok(())
    }
}

#[async_trait]
impl CommentPoster for LinkedInClient {
    async fn post_comment(&self, target: &str, text: &str) -> Result<(), PostingError> {
        self.create_comment(target, text).await
    }
}
