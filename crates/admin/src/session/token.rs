//! Access token payload decoding.
//!
//! The console never verifies the token signature: it only reads the payload
//! to decide whether to let the user in. The backend re-checks the token on
//! every request, which is the real authorization boundary.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use serde_json::{Map, Value};
use shopdesk_core::UserRole;
use thiserror::Error;

/// Claim names that may carry the subject id, in lookup order.
const SUBJECT_CLAIMS: [&str; 3] = ["user_id", "userId", "sub"];

/// Reasons a token is refused at login.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The token is not a `header.payload.signature` string with a JSON payload.
    #[error("malformed token: {0}")]
    Malformed(String),

    /// The token decoded fine but does not belong to an administrator.
    #[error("token role '{role}' is not admin")]
    NotAdmin {
        /// Role found in the payload (empty if absent).
        role: String,
    },
}

/// Identity claims read from a token payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// Account role.
    pub role: UserRole,
    /// Subject id, rendered as a string whatever its JSON type.
    pub user_id: String,
    /// `exp` claim (unix seconds), if present.
    pub expires_at: Option<i64>,
}

/// Decode the payload segment of `token` into its JSON object.
///
/// # Errors
///
/// Returns `TokenError::Malformed` if the token does not have three segments,
/// the payload is not base64, or it is not a JSON object.
pub fn decode_payload(token: &str) -> Result<Map<String, Value>, TokenError> {
    let mut segments = token.trim().split('.');
    let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_), None) if !payload.is_empty() => payload,
        _ => {
            return Err(TokenError::Malformed(
                "expected three dot-separated segments".to_string(),
            ));
        }
    };

    let payload = payload.trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD_NO_PAD.decode(payload))
        .map_err(|e| TokenError::Malformed(format!("payload is not base64: {e}")))?;

    match serde_json::from_slice(&bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(TokenError::Malformed(
            "payload is not a JSON object".to_string(),
        )),
        Err(e) => Err(TokenError::Malformed(format!(
            "payload is not JSON: {e}"
        ))),
    }
}

/// Decode `token` and require the `admin` role.
///
/// # Errors
///
/// Returns `TokenError::Malformed` if the payload cannot be decoded or lacks
/// a subject id, and `TokenError::NotAdmin` if the role is anything but
/// `admin`.
pub fn decode_admin_claims(token: &str) -> Result<TokenClaims, TokenError> {
    let claims = decode_payload(token)?;

    let role_name = claims
        .get("role")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let role = match role_name.parse::<UserRole>() {
        Ok(UserRole::Admin) => UserRole::Admin,
        _ => {
            return Err(TokenError::NotAdmin {
                role: role_name.to_string(),
            });
        }
    };

    let user_id = SUBJECT_CLAIMS
        .iter()
        .find_map(|name| match claims.get(*name) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
        .ok_or_else(|| TokenError::Malformed("payload has no subject id".to_string()))?;

    let expires_at = claims.get("exp").and_then(Value::as_i64);

    Ok(TokenClaims {
        role,
        user_id,
        expires_at,
    })
}

#[cfg(test)]
pub(crate) fn encode_test_token(payload: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{body}.signature")
}
