use crate::error::DecodeError;
use crate::model::TokenPayload;
use crate::services::api::AuthApi;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

/// URL-safe alphabet, padded or not: tokens in the wild come both ways.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Reads the claims of a session token without verifying its signature.
///
/// The result only decides what the page shows. Access control stays with
/// the server, which validates the token on every protected request.
pub fn decode_payload(token: &str) -> Result<TokenPayload, DecodeError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(DecodeError::Segments(segments.len()));
    }

    let bytes = URL_SAFE_LENIENT
        .decode(segments[1])
        .map_err(|e| DecodeError::Base64(e.to_string()))?;
    let value: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(|e| DecodeError::Json(e.to_string()))?;
    if !value.is_object() {
        return Err(DecodeError::NotAnObject);
    }
    serde_json::from_value(value).map_err(|e| DecodeError::Json(e.to_string()))
}

/// Works out what the current session may see.
pub struct CapabilityResolver;

impl CapabilityResolver {
    /// Claims of the token, or `None` when it cannot be decoded. A failure
    /// is logged and otherwise ignored.
    pub fn claims(token: &str) -> Option<TokenPayload> {
        match decode_payload(token) {
            Ok(payload) => Some(payload),
            Err(e) => {
                tracing::warn!(error = %e, "token payload unreadable, identity not shown");
                None
            }
        }
    }

    /// One round-trip to the capability endpoint. Any failure means "not admin".
    pub async fn check_admin_capability<A>(api: &A, token: &str) -> bool
    where
        A: AuthApi + ?Sized,
    {
        let is_admin = api.check_admin(token).await;
        tracing::debug!(is_admin, "admin capability settled");
        is_admin
    }
}
