use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::error;

/// Requests older than this are treated as replays.
const MAX_REQUEST_AGE_SECS: u64 = 300;
/// Tolerated clock skew for timestamps from the future.
const MAX_CLOCK_SKEW_SECS: u64 = 60;

fn new_mac(signing_secret: &str, timestamp: &str, request_body: &str) -> Option<Hmac<Sha256>> {
    let mut mac = match Hmac::<Sha256>::new_from_slice(signing_secret.as_bytes()) {
        Ok(mac) => mac,
        Err(e) => {
            error!("Failed to create HMAC: {}", e);
            return None;
        }
    };
    mac.update(format!("v0:{timestamp}:{request_body}").as_bytes());
    Some(mac)
}

/// Check an event's `v0=` HMAC-SHA256 signature and its timestamp.
#[must_use]
pub fn verify_event_signature(
    request_body: &str,
    timestamp: &str,
    signature: &str,
    signing_secret: &str,
) -> bool {
    let Ok(ts) = timestamp.parse::<u64>() else {
        error!("Unparseable request timestamp '{}'", timestamp);
        return false;
    };
    let Ok(now) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return false;
    };
    let now_secs = now.as_secs();
    if now_secs.saturating_sub(ts) > MAX_REQUEST_AGE_SECS || ts > now_secs + MAX_CLOCK_SKEW_SECS {
        error!("Timestamp out of range, potential replay attack");
        return false;
    }

    let Some(received) = signature
        .strip_prefix("v0=")
        .and_then(|hex_sig| hex::decode(hex_sig).ok())
    else {
        error!("Malformed signature header");
        return false;
    };

    match new_mac(signing_secret, timestamp, request_body) {
        Some(mac) => {
            let valid = mac.verify_slice(&received).is_ok();
            if !valid {
                error!("Signature verification failed");
            }
            valid
        }
        None => false,
    }
}

/// Signature the hunt web application attaches to each event it sends.
#[must_use]
pub fn compute_signature(timestamp: &str, request_body: &str, signing_secret: &str) -> String {
    new_mac(signing_secret, timestamp, request_body).map_or_else(String::new, |mac| {
        format!("v0={}", hex::encode(mac.finalize().into_bytes()))
    })
}
