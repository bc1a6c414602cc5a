//! Signed session tokens.
//!
//! The server keeps no session table. After a successful login or
//! registration it issues a token and stores it in an HTTP-only cookie:
//!
//! ```text
//! access-token={base64(claims_json)}.{base64(HMAC-SHA256(claims_json, secret))}
//! ```
//!
//! The claims carry the user id, the role checked by the admin guard and an
//! absolute expiry in unix seconds. Verification checks the HMAC before it
//! looks at the claims.

use fast32::base64::RFC4648_NOPAD as B64;
use serde::{Deserialize, Serialize};

use crate::objects::Role;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "access-token";

/// Default lifetime of a session (24 hours).
pub const DEFAULT_SESSION_MAX_AGE: i64 = 60 * 60 * 24;

/// Claims carried inside a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id.
    pub sub: i32,
    pub role: Role,
    /// Expiry as a unix timestamp (seconds).
    pub exp: i64,
}

impl SessionClaims {
    /// Claims for `user_id` that expire `max_age` seconds from now.
    pub fn new(user_id: i32, role: Role, max_age: i64) -> Self {
        let now = time::OffsetDateTime::now_utc().unix_timestamp();
        Self {
            sub: user_id,
            role,
            exp: now + max_age,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Errors produced while verifying a session token.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid token format")]
    InvalidFormat,
    #[error("invalid base64 encoding")]
    InvalidBase64,
    #[error("invalid claims: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid signature")]
    SignatureMismatch,
    #[error("session expired")]
    Expired,
}

impl From<ring::error::Unspecified> for SessionError {
    fn from(_: ring::error::Unspecified) -> Self {
        Self::SignatureMismatch
    }
}

fn hmac_key(key: &[u8]) -> ring::hmac::Key {
    ring::hmac::Key::new(ring::hmac::HMAC_SHA256, key)
}

/// Sign `claims` with `key` and return the cookie value.
pub fn issue(claims: &SessionClaims, key: &[u8]) -> Result<String, serde_json::Error> {
    let json = serde_json::to_vec(claims)?;
    let signature = ring::hmac::sign(&hmac_key(key), &json);
    Ok(format!(
        "{}.{}",
        B64.encode(&json),
        B64.encode(signature.as_ref())
    ))
}

/// Verify a token against `key` and the current time.
pub fn verify(token: &str, key: &[u8]) -> Result<SessionClaims, SessionError> {
    verify_at(token, key, time::OffsetDateTime::now_utc().unix_timestamp())
}

/// Verify a token against `key`, treating `now` as the current unix time.
pub fn verify_at(token: &str, key: &[u8], now: i64) -> Result<SessionClaims, SessionError> {
    let (payload, signature) = token.split_once('.').ok_or(SessionError::InvalidFormat)?;
    let json = B64
        .decode_str(payload)
        .map_err(|_| SessionError::InvalidBase64)?;
    let signature = B64
        .decode_str(signature)
        .map_err(|_| SessionError::InvalidBase64)?;

    ring::hmac::verify(&hmac_key(key), &json, &signature)?;

    let claims: SessionClaims = serde_json::from_slice(&json)?;
    if claims.exp <= now {
        return Err(SessionError::Expired);
    }
    Ok(claims)
}

// ---------------------------------------------------------------------------
// Cookie headers
// ---------------------------------------------------------------------------

/// `Set-Cookie` value that stores `token` for `max_age` seconds.
pub fn set_cookie(token: &str, max_age: i64, secure: bool) -> String {
    let mut cookie =
        format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_cookie(secure: bool) -> String {
    let mut cookie = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Find the value of cookie `name` in a `Cookie` request header.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8] = b"0123456789abcdef0123456789abcdef";

    #[test]
    fn test_issue_then_verify() {
        let claims = SessionClaims::new(7, Role::Customer, DEFAULT_SESSION_MAX_AGE);
        let token = issue(&claims, KEY).unwrap();
        let verified = verify(&token, KEY).unwrap();
        assert_eq!(verified, claims);
        assert!(!verified.is_admin());
    }

    #[test]
    fn test_wrong_key_is_rejected() {
        let claims = SessionClaims::new(7, Role::Admin, 60);
        let token = issue(&claims, KEY).unwrap();
        let err = verify(&token, b"another-secret-another-secret-xx").unwrap_err();
        assert!(matches!(err, SessionError::SignatureMismatch));
    }

    #[test]
    fn test_tampered_claims_are_rejected() {
        let claims = SessionClaims::new(7, Role::Customer, 60);
        let token = issue(&claims, KEY).unwrap();
        let (_, signature) = token.split_once('.').unwrap();

        let forged = SessionClaims {
            role: Role::Admin,
            ..claims
        };
        let forged_json = serde_json::to_vec(&forged).unwrap();
        let forged_token = format!("{}.{}", B64.encode(&forged_json), signature);

        let err = verify(&forged_token, KEY).unwrap_err();
        assert!(matches!(err, SessionError::SignatureMismatch));
    }

    #[test]
    fn test_expired_token() {
        let claims = SessionClaims {
            sub: 1,
            role: Role::Customer,
            exp: 1_000,
        };
        let token = issue(&claims, KEY).unwrap();
        assert!(verify_at(&token, KEY, 999).is_ok());
        assert!(matches!(
            verify_at(&token, KEY, 1_000),
            Err(SessionError::Expired)
        ));
    }

    #[test]
    fn test_malformed_tokens() {
        assert!(matches!(
            verify("no-dot-here", KEY),
            Err(SessionError::InvalidFormat)
        ));
        assert!(matches!(
            verify("***.***", KEY),
            Err(SessionError::InvalidBase64)
        ));
    }

    #[test]
    fn test_cookie_value() {
        let header = "theme=dark; access-token=abc.def; other=1";
        assert_eq!(cookie_value(header, SESSION_COOKIE), Some("abc.def"));
        assert_eq!(cookie_value(header, "theme"), Some("dark"));
        assert_eq!(cookie_value(header, "missing"), None);
        assert_eq!(cookie_value("", SESSION_COOKIE), None);
    }

    #[test]
    fn test_cookie_headers() {
        let set = set_cookie("abc.def", 86_400, false);
        assert!(set.starts_with("access-token=abc.def;"));
        assert!(set.contains("HttpOnly"));
        assert!(set.contains("Max-Age=86400"));
        assert!(!set.contains("Secure"));

        let cleared = clear_cookie(true);
        assert!(cleared.contains("Max-Age=0"));
        assert!(cleared.ends_with("; Secure"));
    }
}
