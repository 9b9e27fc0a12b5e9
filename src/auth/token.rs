//! Bearer credential inspection.
//!
//! The API issues JWTs whose claims segment carries `name`, `admin` and
//! `exp`. Everything here operates on either a full three-segment token or
//! a bare claims payload and never fails loudly: a credential that cannot
//! be decoded is simply treated as carrying no session.

use base64::engine::general_purpose;
use base64::Engine as _;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

/// Claims embedded in a credential issued by the auth endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub admin: Option<bool>,
    /// Unix timestamp (seconds). Absent on some legacy tokens.
    #[serde(default)]
    pub exp: Option<i64>,
}

/// Extract the claims segment from a credential.
///
/// A full JWT is `header.claims.signature`; a persisted cookie-style entry
/// may hold only the claims segment. Either form is accepted.
fn claims_segment(credential: &str) -> &str {
    let mut parts = credential.split('.');
    match (parts.next(), parts.next()) {
        (Some(_), Some(claims)) => claims,
        _ => credential,
    }
}

/// Decode base64 tolerating both the URL-safe alphabet JWTs use and the
/// standard alphabet, padded or not.
fn decode_segment(segment: &str) -> Option<Vec<u8>> {
    let engines = [
        general_purpose::URL_SAFE_NO_PAD,
        general_purpose::URL_SAFE,
        general_purpose::STANDARD_NO_PAD,
        general_purpose::STANDARD,
    ];
    for engine in engines {
        if let Ok(raw) = engine.decode(segment) {
            return Some(raw);
        }
    }
    None
}

/// Decode the claims carried by a credential.
///
/// Returns None for malformed input; callers treat that as "no session".
pub fn decode_claims(credential: &str) -> Option<Claims> {
    let raw = decode_segment(claims_segment(credential.trim()))?;
    serde_json::from_slice(&raw).ok()
}

/// Expiry timestamp of a credential, if it carries an `exp` claim.
pub fn expiration(credential: &str) -> Option<DateTime<Utc>> {
    let exp = decode_claims(credential)?.exp?;
    Utc.timestamp_opt(exp, 0).single()
}

/// Whether a credential is expired.
///
/// A credential with no readable expiry counts as expired: access is denied
/// rather than trusting an unexpiring or unreadable token.
pub fn is_expired(credential: &str) -> bool {
    match expiration(credential) {
        Some(exp) => exp < Utc::now(),
        None => true,
    }
}

/// Subject name (`name` claim) carried by a credential.
pub fn subject_name(credential: &str) -> Option<String> {
    decode_claims(credential)?.name
}
