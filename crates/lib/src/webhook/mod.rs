//! Webhook endpoint: LinkedIn challenge handshake and comment auto-replies.
//!
//! One HTTP port serves `POST /webhook` and a `GET /` health probe. Each request is
//! handled independently; nothing is stored between deliveries.

mod challenge;
mod event;
mod handler;
mod server;

pub use challenge::{challenge_response, verify_challenge_response};
pub use event::{ChallengeReply, CommentEvent, EventMessage, WebhookQuery};
pub use handler::{process_comment, webhook, ProcessError, WebhookState};
pub use server::{build_router, run_server, serve};
