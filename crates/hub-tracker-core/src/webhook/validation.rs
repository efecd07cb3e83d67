//! Webhook signature validation.
//!
//! GitHub signs each delivery with HMAC-SHA1 keyed by the webhook secret and
//! sends the result in the `X-Hub-Signature` header as `sha1=<lowercase hex>`.
//! The MAC is always computed over the raw body bytes as received; re-encoding
//! the JSON is not guaranteed to reproduce them.

use crate::error::WebhookError;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use subtle::ConstantTimeEq;

type HmacSha1 = Hmac<Sha1>;

/// Header carrying the body signature.
pub const SIGNATURE_HEADER: &str = "x-hub-signature";

/// Algorithm tag prefixed to the hex digest.
pub const SIGNATURE_PREFIX: &str = "sha1=";

/// Validates GitHub webhook signatures using HMAC-SHA1.
///
/// # Security
///
/// - Compares in constant time
/// - Never logs the secret or signature values
///
/// # Examples
///
/// ```rust
/// use hub_tracker_core::webhook::SignatureValidator;
///
/// let validator = SignatureValidator::new("It's a Secret to Everybody");
/// let body = br#"{"zen":"Design for failure."}"#;
///
/// let header = validator.sign(body).unwrap();
/// assert!(header.starts_with("sha1="));
/// assert!(validator.validate(body, Some(&header)).is_ok());
/// assert!(validator.validate(body, None).is_err());
/// ```
#[derive(Clone)]
pub struct SignatureValidator {
    secret: String,
}

impl SignatureValidator {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Compute the `X-Hub-Signature` value for `payload`.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::Hmac` when the MAC cannot be keyed with the secret.
    pub fn sign(&self, payload: &[u8]) -> Result<String, WebhookError> {
        let mut mac =
            HmacSha1::new_from_slice(self.secret.as_bytes()).map_err(|e| WebhookError::Hmac {
                message: format!("Failed to create HMAC instance: {}", e),
            })?;
        mac.update(payload);
        Ok(format!(
            "{}{}",
            SIGNATURE_PREFIX,
            hex::encode(mac.finalize().into_bytes())
        ))
    }

    /// Check `signature` against the MAC of `payload`.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::InvalidSignature` when the header is missing or
    /// differs from the expected value in any byte, and `WebhookError::Hmac`
    /// when the expected value cannot be computed.
    pub fn validate(&self, payload: &[u8], signature: Option<&str>) -> Result<(), WebhookError> {
        let provided = signature.ok_or(WebhookError::InvalidSignature)?;
        let expected = self.sign(payload)?;

        if constant_time_compare(expected.as_bytes(), provided.as_bytes()) {
            Ok(())
        } else {
            Err(WebhookError::InvalidSignature)
        }
    }
}

/// Compare two byte slices in constant time.
///
/// The length check leaks only the length, which is public for this format.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

// Security: Don't expose secrets in debug output
impl std::fmt::Debug for SignatureValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureValidator")
            .field("secret", &"<REDACTED>")
            .finish()
    }
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
