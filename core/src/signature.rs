//! Ed25519 signatures over ticket codes.
//!
//! The issuing side holds a [`CodeSigner`] (PKCS#8 private key), the
//! verifying side a [`CodeVerifier`] (SPKI public key). Signatures travel as
//! URL-safe base64 without padding.

use crate::config::{SignerConfig, VerifierConfig, decode_base64};
use crate::error::{CodecError, Result};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use ed25519_dalek::pkcs8::{DecodePrivateKey, DecodePublicKey};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use std::fmt;
use std::str::FromStr;

/// Length of a raw Ed25519 signature.
pub const SIGNATURE_LEN: usize = Signature::BYTE_SIZE;

/// URL-safe decoder that accepts padded and unpadded input.
const URL_SAFE_INDIFFERENT: GeneralPurpose = GeneralPurpose::new(
    &base64::alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// An Ed25519 signature over a ticket code.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CodeSignature(Signature);

impl CodeSignature {
    /// Wrap raw signature bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidSignatureEncoding`] if `bytes` is not 64 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Signature::from_slice(bytes)
            .map(Self)
            .map_err(|_| CodecError::InvalidSignatureEncoding)
    }

    /// Raw signature bytes.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LEN] {
        self.0.to_bytes()
    }

    /// URL-safe, unpadded text form.
    #[must_use]
    pub fn to_base64url(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.0.to_bytes())
    }
}

impl FromStr for CodeSignature {
    type Err = CodecError;

    /// Parse the URL-safe text form. Padding is optional.
    fn from_str(text: &str) -> Result<Self> {
        let bytes = URL_SAFE_INDIFFERENT
            .decode(text.trim())
            .map_err(|_| CodecError::InvalidSignatureEncoding)?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Display for CodeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64url())
    }
}

impl fmt::Debug for CodeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CodeSignature").field(&self.to_base64url()).finish()
    }
}

/// Signs ticket codes with the issuing private key.
#[derive(Clone)]
pub struct CodeSigner {
    key: SigningKey,
}

impl CodeSigner {
    /// Import the private key from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidConfig`] if the key is not a PKCS#8 DER
    /// encoded Ed25519 private key.
    pub fn initialize(config: &SignerConfig) -> Result<Self> {
        let key = SigningKey::from_pkcs8_der(config.private_key_pkcs8()).map_err(|e| {
            CodecError::config(
                SignerConfig::PRIVATE_KEY_VAR,
                format!("not a PKCS#8 Ed25519 private key: {e}"),
            )
        })?;

        tracing::info!("Ticket code signer initialized");

        Ok(Self { key })
    }

    /// Sign the UTF-8 bytes of `code`.
    #[must_use]
    pub fn sign(&self, code: &str) -> CodeSignature {
        CodeSignature(self.key.sign(code.as_bytes()))
    }

    /// Verifier for the matching public key.
    #[must_use]
    pub fn verifier(&self) -> CodeVerifier {
        CodeVerifier {
            key: self.key.verifying_key(),
        }
    }
}

impl fmt::Debug for CodeSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeSigner").finish_non_exhaustive()
    }
}

/// Verifies ticket code signatures with the public key.
#[derive(Debug, Clone)]
pub struct CodeVerifier {
    key: VerifyingKey,
}

impl CodeVerifier {
    /// Import the public key from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidConfig`] if the key is not an SPKI DER
    /// encoded Ed25519 public key.
    pub fn initialize(config: &VerifierConfig) -> Result<Self> {
        let key = Self::import(config.public_key_spki())?;

        tracing::info!("Ticket code verifier initialized");

        Ok(Self { key })
    }

    fn import(spki: &[u8]) -> Result<VerifyingKey> {
        VerifyingKey::from_public_key_der(spki).map_err(|e| {
            CodecError::config(
                VerifierConfig::PUBLIC_KEY_VAR,
                format!("not an SPKI Ed25519 public key: {e}"),
            )
        })
    }

    /// Returns `true` if `signature` is a valid signature of `code`.
    #[must_use]
    pub fn verify(&self, code: &str, signature: &CodeSignature) -> bool {
        let valid = self.key.verify(code.as_bytes(), &signature.0).is_ok();
        if !valid {
            tracing::debug!("Ticket code signature rejected");
        }
        valid
    }

    /// Verify a signature given in its URL-safe text form.
    ///
    /// Undecodable signatures are reported as `false`.
    #[must_use]
    pub fn verify_encoded(&self, code: &str, signature: &str) -> bool {
        match signature.parse::<CodeSignature>() {
            Ok(signature) => self.verify(code, &signature),
            Err(_) => {
                tracing::debug!("Ticket code signature is not decodable");
                false
            }
        }
    }
}

/// Verify a code signature with a base64 SPKI public key.
///
/// Intended for third parties that only hold the public key text. Every
/// failure (bad key, bad signature text, wrong signature) is `false`.
///
/// # Examples
///
/// ```
/// use ticket_codec_core::signature::verify_code_signature;
///
/// assert!(!verify_code_signature("4Wc9Fq", "not-a-signature", "not-a-key"));
/// ```
#[must_use]
pub fn verify_code_signature(code: &str, signature: &str, public_key_spki_base64: &str) -> bool {
    let Ok(spki) = decode_base64(VerifierConfig::PUBLIC_KEY_VAR, public_key_spki_base64) else {
        return false;
    };
    let Ok(key) = CodeVerifier::import(&spki) else {
        return false;
    };
    CodeVerifier { key }.verify_encoded(code, signature)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE;
    use ed25519_dalek::pkcs8::{EncodePrivateKey, EncodePublicKey};

    fn padded_base64url(signature: &CodeSignature) -> String {
        URL_SAFE.encode(signature.to_bytes())
    }

    fn signer(seed: u8) -> CodeSigner {
        let key = SigningKey::from_bytes(&[seed; 32]);
        let der = key.to_pkcs8_der().unwrap();
        CodeSigner::initialize(&SignerConfig::new(der.as_bytes().to_vec())).unwrap()
    }

    #[test]
    fn test_sign_then_verify() {
        let signer = signer(1);
        let signature = signer.sign("4Wc9Fq");
        assert!(signer.verifier().verify("4Wc9Fq", &signature));
    }

    #[test]
    fn test_wrong_key_or_code_fails() {
        let signature = signer(1).sign("4Wc9Fq");
        assert!(!signer(2).verifier().verify("4Wc9Fq", &signature));
        assert!(!signer(1).verifier().verify("4Wc9Fqx", &signature));
    }

    #[test]
    fn test_text_form_is_unpadded_url_safe() {
        let text = signer(3).sign("code").to_base64url();
        assert_eq!(text.len(), 86);
        assert!(!text.contains('='));
        assert!(!text.contains('+'));
        assert!(!text.contains('/'));
    }

    #[test]
    fn test_padded_and_unpadded_text_parse_to_same_signature() {
        let signature = signer(4).sign("code");
        let padded = padded_base64url(&signature);
        assert!(padded.ends_with("=="));
        assert_eq!(padded.parse::<CodeSignature>().unwrap(), signature);
        assert_eq!(signature.to_string().parse::<CodeSignature>().unwrap(), signature);
    }

    #[test]
    fn test_malformed_signature_text_is_false() {
        let verifier = signer(5).verifier();
        assert!(!verifier.verify_encoded("code", ""));
        assert!(!verifier.verify_encoded("code", "!!!"));
        assert!(!verifier.verify_encoded("code", "AAAA"));
        assert_eq!(
            "AAAA".parse::<CodeSignature>().unwrap_err(),
            CodecError::InvalidSignatureEncoding
        );
    }

    #[test]
    fn test_verify_code_signature_with_base64_key() {
        use base64::engine::general_purpose::STANDARD;

        let key = SigningKey::from_bytes(&[6; 32]);
        let spki = key.verifying_key().to_public_key_der().unwrap();
        let public_key = STANDARD.encode(spki.as_bytes());
        let signer = signer(6);
        let signature = signer.sign("code").to_string();

        assert!(verify_code_signature("code", &signature, &public_key));
        assert!(!verify_code_signature("codex", &signature, &public_key));
        assert!(!verify_code_signature("code", &signature, "AAAA"));
        assert!(!verify_code_signature("code", &signature, "%%%"));
    }

    #[test]
    fn test_bad_key_material_is_config_error() {
        let err = CodeSigner::initialize(&SignerConfig::new(vec![1, 2, 3])).unwrap_err();
        assert!(err.is_config_error());
        let err = CodeVerifier::initialize(&VerifierConfig::new(vec![1, 2, 3])).unwrap_err();
        assert!(err.is_config_error());
    }
}
