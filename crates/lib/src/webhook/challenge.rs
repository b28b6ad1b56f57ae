//! Webhook challenge responder: HMAC-SHA256 of the challenge code keyed by the app client secret.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn keyed(secret: &str, challenge: &str) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(challenge.as_bytes());
    mac
}

/// Lowercase hex HMAC-SHA256 of `challenge` keyed by `secret`.
pub fn challenge_response(challenge: &str, secret: &str) -> String {
    hex::encode(keyed(secret, challenge).finalize().into_bytes())
}

/// True if `candidate` (hex, either case) is the response for `challenge` under `secret`.
/// Comparison is constant-time.
pub fn verify_challenge_response(challenge: &str, secret: &str, candidate: &str) -> bool {
    let Ok(bytes) = hex::decode(candidate.trim()) else {
        return false;
    };
    keyed(secret, challenge).verify_slice(&bytes).is_ok()
}
