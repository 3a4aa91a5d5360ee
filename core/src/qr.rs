//! Signed, expiring QR token.
//!
//! A QR token is the JSON payload `{"code":…,"exp":…}` followed by `.` and
//! the Ed25519 signature over the exact JSON text. `exp` is a Unix
//! timestamp in milliseconds.

use crate::environment::Clock;
use crate::error::{CodecError, Result};
use crate::signature::{CodeSigner, CodeVerifier};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Content of a QR token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrPayload {
    /// Ticket code carried by the token.
    pub code: String,
    /// Expiry, Unix milliseconds.
    pub exp: i64,
}

impl QrPayload {
    /// Payload for `code` that expires `ttl` after `now`.
    ///
    /// The expiry saturates at the representable time range.
    #[must_use]
    pub fn expiring_in(code: impl Into<String>, now: DateTime<Utc>, ttl: Duration) -> Self {
        let expiry = now.checked_add_signed(ttl).unwrap_or(if ttl < Duration::zero() {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        });

        Self {
            code: code.into(),
            exp: expiry.timestamp_millis(),
        }
    }

    /// Returns `true` once `now` has reached the expiry.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp_millis()
    }
}

/// Why a QR token was refused.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum QrError {
    /// Token is empty.
    #[error("empty token")]
    EmptyToken,

    /// No `.` separator, or one of the halves is empty.
    #[error("malformed token")]
    MalformedToken,

    /// The payload half is not a valid JSON payload.
    #[error("invalid payload")]
    InvalidPayload,

    /// The signature does not verify against the payload text.
    #[error("invalid signature")]
    InvalidSignature,

    /// The token is past its expiry.
    #[error("expired token")]
    Expired,
}

/// Serialize and sign a payload.
///
/// # Errors
///
/// Returns [`CodecError::SerializationError`] if the payload cannot be
/// serialized.
pub fn issue_qr_token(payload: &QrPayload, signer: &CodeSigner) -> Result<String> {
    let text =
        serde_json::to_string(payload).map_err(|e| CodecError::SerializationError(e.to_string()))?;
    let signature = signer.sign(&text);
    Ok(format!("{text}.{signature}"))
}

/// Parse, authenticate and check the expiry of a QR token.
///
/// Checks run in order: emptiness, shape, JSON syntax, signature, expiry.
/// A payload whose `exp` is missing or not a number counts as expired, so
/// the signature is checked before any field is interpreted.
///
/// # Errors
///
/// Returns the first [`QrError`] that applies.
pub fn restore_qr_token(
    token: &str,
    verifier: &CodeVerifier,
    now: DateTime<Utc>,
) -> std::result::Result<QrPayload, QrError> {
    if token.is_empty() {
        return Err(QrError::EmptyToken);
    }

    let (text, signature) = token.rsplit_once('.').ok_or(QrError::MalformedToken)?;
    if text.is_empty() || signature.is_empty() {
        return Err(QrError::MalformedToken);
    }

    let value: Value = serde_json::from_str(text).map_err(|_| QrError::InvalidPayload)?;

    if !verifier.verify_encoded(text, signature) {
        return Err(QrError::InvalidSignature);
    }

    let exp = expiry_millis(&value, now).ok_or(QrError::Expired)?;
    let code = value
        .get("code")
        .and_then(Value::as_str)
        .ok_or(QrError::InvalidPayload)?;

    Ok(QrPayload {
        code: code.to_string(),
        exp,
    })
}

/// The `exp` field if it is a number strictly after `now`.
///
/// Any JSON number is accepted, including exponent notation.
fn expiry_millis(payload: &Value, now: DateTime<Utc>) -> Option<i64> {
    let exp = payload.get("exp")?;
    let now = now.timestamp_millis();

    if let Some(exp) = exp.as_i64() {
        return (exp > now).then_some(exp);
    }

    let exp = exp.as_f64()?;
    #[allow(clippy::cast_precision_loss)] // millisecond timestamps fit an f64 exactly
    let live = exp > now as f64;
    #[allow(clippy::cast_possible_truncation)] // saturating float to int conversion
    let exp = exp.floor() as i64;
    live.then_some(exp)
}

/// Returns `true` if the token restores at the clock's current time.
pub fn is_valid_qr_token(token: &str, verifier: &CodeVerifier, clock: &dyn Clock) -> bool {
    match restore_qr_token(token, verifier, clock.now()) {
        Ok(_) => true,
        Err(e) => {
            tracing::debug!(error = %e, "QR token rejected");
            false
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::SignerConfig;
    use ed25519_dalek::SigningKey;
    use ed25519_dalek::pkcs8::EncodePrivateKey;

    fn signer() -> CodeSigner {
        let der = SigningKey::from_bytes(&[9; 32]).to_pkcs8_der().unwrap();
        CodeSigner::initialize(&SignerConfig::new(der.as_bytes().to_vec())).unwrap()
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_735_689_600_000).unwrap()
    }

    #[test]
    fn test_payload_serializes_code_then_exp() {
        let payload = QrPayload {
            code: "ABC123".to_string(),
            exp: 42,
        };
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"code":"ABC123","exp":42}"#
        );
    }

    #[test]
    fn test_issue_then_restore() {
        let signer = signer();
        let payload = QrPayload::expiring_in("ABC123", now(), Duration::minutes(1));
        let token = issue_qr_token(&payload, &signer).unwrap();
        assert_eq!(restore_qr_token(&token, &signer.verifier(), now()), Ok(payload));
    }

    #[test]
    fn test_expiry_is_inclusive() {
        let signer = signer();
        let payload = QrPayload {
            code: "ABC123".to_string(),
            exp: now().timestamp_millis(),
        };
        let token = issue_qr_token(&payload, &signer).unwrap();
        assert_eq!(
            restore_qr_token(&token, &signer.verifier(), now()),
            Err(QrError::Expired)
        );
    }

    #[test]
    fn test_shape_errors() {
        let verifier = signer().verifier();
        assert_eq!(restore_qr_token("", &verifier, now()), Err(QrError::EmptyToken));
        assert_eq!(restore_qr_token("abc", &verifier, now()), Err(QrError::MalformedToken));
        assert_eq!(restore_qr_token(".sig", &verifier, now()), Err(QrError::MalformedToken));
        assert_eq!(restore_qr_token("{}.", &verifier, now()), Err(QrError::MalformedToken));
        assert_eq!(
            restore_qr_token("not json.sig", &verifier, now()),
            Err(QrError::InvalidPayload)
        );
    }

    #[test]
    fn test_tampered_payload_fails_signature() {
        let signer = signer();
        let payload = QrPayload::expiring_in("ABC123", now(), Duration::minutes(1));
        let token = issue_qr_token(&payload, &signer).unwrap();
        let tampered = token.replacen("ABC123", "ABC124", 1);
        assert_eq!(
            restore_qr_token(&tampered, &signer.verifier(), now()),
            Err(QrError::InvalidSignature)
        );
    }

    fn signed(text: &str, signer: &CodeSigner) -> String {
        format!("{text}.{}", signer.sign(text))
    }

    #[test]
    fn test_expiring_in_saturates_instead_of_overflowing() {
        let far = QrPayload::expiring_in("ABC123", now(), Duration::MAX);
        assert_eq!(far.exp, DateTime::<Utc>::MAX_UTC.timestamp_millis());
        assert!(!far.is_expired_at(now()));

        let past = QrPayload::expiring_in("ABC123", now(), Duration::MIN);
        assert_eq!(past.exp, DateTime::<Utc>::MIN_UTC.timestamp_millis());
        assert!(past.is_expired_at(now()));
    }

    #[test]
    fn test_signature_is_checked_before_payload_fields() {
        let signer = signer();
        let verifier = signer.verifier();
        let text = r#"{"code":"A","exp":"x"}"#;

        assert_eq!(
            restore_qr_token(&format!("{text}.AAAA"), &verifier, now()),
            Err(QrError::InvalidSignature)
        );
        assert_eq!(
            restore_qr_token(&signed(text, &signer), &verifier, now()),
            Err(QrError::Expired)
        );
        assert_eq!(
            restore_qr_token(&signed(r#"{"code":"A"}"#, &signer), &verifier, now()),
            Err(QrError::Expired)
        );
    }

    #[test]
    fn test_exponent_notation_expiry_is_accepted() {
        let signer = signer();
        let token = signed(r#"{"code":"A","exp":1.7e15}"#, &signer);
        assert_eq!(
            restore_qr_token(&token, &signer.verifier(), now()),
            Ok(QrPayload {
                code: "A".to_string(),
                exp: 1_700_000_000_000_000,
            })
        );

        let stale = signed(r#"{"code":"A","exp":1.7e12}"#, &signer);
        assert_eq!(
            restore_qr_token(&stale, &signer.verifier(), now()),
            Err(QrError::Expired)
        );
    }

    #[test]
    fn test_signed_payload_without_code_is_invalid() {
        let signer = signer();
        let token = signed(r#"{"code":7,"exp":9000000000000}"#, &signer);
        assert_eq!(
            restore_qr_token(&token, &signer.verifier(), now()),
            Err(QrError::InvalidPayload)
        );
    }
}
