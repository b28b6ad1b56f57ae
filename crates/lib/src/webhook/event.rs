//! Webhook wire types: the inbound comment event, plus the challenge query and reply.

use serde::{Deserialize, Serialize};

/// Query string of `POST /webhook`. `challengeCode` selects the handshake path.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookQuery {
    #[serde(default)]
    pub challenge_code: Option<String>,
}

impl WebhookQuery {
    /// Challenge code when present and non-empty.
    pub fn challenge(&self) -> Option<&str> {
        self.challenge_code.as_deref().filter(|c| !c.is_empty())
    }
}

/// Handshake reply: `{ "challengeCode", "challengeResponse" }`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeReply {
    pub challenge_code: String,
    pub challenge_response: String,
}

/// Comment notification delivered by the platform.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentEvent {
    /// Commenter; only used for logging.
    #[serde(default)]
    pub actor: Option<String>,
    pub message: EventMessage,
    /// Target post or comment thread URN (reply is posted here).
    pub object: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventMessage {
    pub text: String,
}
