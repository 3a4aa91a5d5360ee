//! Codec configuration.
//!
//! Key material is supplied by the application, normally from the
//! environment. The codec never reads the environment itself: load a config
//! here, then pass it to [`TicketCodec::initialize`](crate::TicketCodec::initialize),
//! [`CodeSigner::initialize`](crate::CodeSigner::initialize) or
//! [`CodeVerifier::initialize`](crate::CodeVerifier::initialize).

use crate::error::{CodecError, Result};
use base64::Engine;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use std::env;
use std::fmt;

/// Standard-alphabet decoder that accepts padded and unpadded input.
const STANDARD_INDIFFERENT: GeneralPurpose = GeneralPurpose::new(
    &base64::alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode base64 key material, ignoring whitespace and missing padding.
pub(crate) fn decode_base64(key: &'static str, text: &str) -> Result<Vec<u8>> {
    let compact: String = text.split_whitespace().collect();
    STANDARD_INDIFFERENT
        .decode(compact)
        .map_err(|e| CodecError::config(key, format!("invalid base64: {e}")))
}

/// Read one required variable through `lookup`.
fn require(lookup: &impl Fn(&str) -> Option<String>, key: &'static str) -> Result<String> {
    lookup(key).ok_or_else(|| CodecError::config(key, "environment variable is not set"))
}

/// Symmetric codec configuration: MAC key, cipher key and alphabet.
#[derive(Clone)]
pub struct CodecConfig {
    mac_key: Vec<u8>,
    cipher_key: Vec<u8>,
    alphabet: String,
}

impl CodecConfig {
    /// Variable holding the base64 MAC key.
    pub const MAC_KEY_VAR: &'static str = "TICKET_SIGNING_PRIVATE_KEY_MAC_BASE64";
    /// Variable holding the base64 cipher key.
    pub const CIPHER_KEY_VAR: &'static str = "TICKET_SIGNING_PRIVATE_KEY_CIPHER_BASE64";
    /// Variable holding the 58-symbol alphabet.
    pub const ALPHABET_VAR: &'static str = "BASE58_ALPHABET";

    /// Create a configuration from raw key bytes.
    #[must_use]
    pub fn new(mac_key: Vec<u8>, cipher_key: Vec<u8>, alphabet: impl Into<String>) -> Self {
        Self {
            mac_key,
            cipher_key,
            alphabet: alphabet.into(),
        }
    }

    /// Create a configuration from base64 encoded keys.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidConfig`] if either key is not valid base64.
    pub fn from_base64(mac_key: &str, cipher_key: &str, alphabet: &str) -> Result<Self> {
        Ok(Self::new(
            decode_base64(Self::MAC_KEY_VAR, mac_key)?,
            decode_base64(Self::CIPHER_KEY_VAR, cipher_key)?,
            alphabet.trim(),
        ))
    }

    /// Load configuration from environment variables.
    ///
    /// Reads:
    /// - `TICKET_SIGNING_PRIVATE_KEY_MAC_BASE64`
    /// - `TICKET_SIGNING_PRIVATE_KEY_CIPHER_BASE64`
    /// - `BASE58_ALPHABET`
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidConfig`] if a variable is missing or not
    /// valid base64.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`CodecConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Self::from_base64(
            &require(&lookup, Self::MAC_KEY_VAR)?,
            &require(&lookup, Self::CIPHER_KEY_VAR)?,
            &require(&lookup, Self::ALPHABET_VAR)?,
        )
    }

    /// Replace the alphabet.
    #[must_use]
    pub fn with_alphabet(mut self, alphabet: impl Into<String>) -> Self {
        self.alphabet = alphabet.into();
        self
    }

    /// Raw MAC key bytes.
    #[must_use]
    pub fn mac_key(&self) -> &[u8] {
        &self.mac_key
    }

    /// Raw cipher key bytes.
    #[must_use]
    pub fn cipher_key(&self) -> &[u8] {
        &self.cipher_key
    }

    /// Alphabet symbols, most significant digit value last.
    #[must_use]
    pub fn alphabet(&self) -> &str {
        &self.alphabet
    }
}

impl fmt::Debug for CodecConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecConfig")
            .field("mac_key", &"[REDACTED]")
            .field("cipher_key", &"[REDACTED]")
            .field("alphabet", &self.alphabet)
            .finish()
    }
}

/// Issuing-side configuration: the Ed25519 private key.
#[derive(Clone)]
pub struct SignerConfig {
    private_key_pkcs8: Vec<u8>,
}

impl SignerConfig {
    /// Variable holding the base64 PKCS#8 DER private key.
    pub const PRIVATE_KEY_VAR: &'static str = "TICKET_SIGNING_PRIVATE_KEY_Ed25519_BASE64";

    /// Create a configuration from PKCS#8 DER bytes.
    #[must_use]
    pub const fn new(private_key_pkcs8: Vec<u8>) -> Self {
        Self { private_key_pkcs8 }
    }

    /// Create a configuration from base64 PKCS#8 DER.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidConfig`] if the text is not valid base64.
    pub fn from_base64(private_key: &str) -> Result<Self> {
        decode_base64(Self::PRIVATE_KEY_VAR, private_key).map(Self::new)
    }

    /// Load `TICKET_SIGNING_PRIVATE_KEY_Ed25519_BASE64`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidConfig`] if the variable is missing or not
    /// valid base64.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`SignerConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Self::from_base64(&require(&lookup, Self::PRIVATE_KEY_VAR)?)
    }

    /// Raw PKCS#8 DER bytes.
    #[must_use]
    pub fn private_key_pkcs8(&self) -> &[u8] {
        &self.private_key_pkcs8
    }
}

impl fmt::Debug for SignerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignerConfig")
            .field("private_key_pkcs8", &"[REDACTED]")
            .finish()
    }
}

/// Verifying-side configuration: the Ed25519 public key.
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    public_key_spki: Vec<u8>,
}

impl VerifierConfig {
    /// Variable holding the base64 SPKI DER public key.
    pub const PUBLIC_KEY_VAR: &'static str = "TICKET_SIGNING_PUBLIC_KEY_Ed25519_BASE64";

    /// Create a configuration from SPKI DER bytes.
    #[must_use]
    pub const fn new(public_key_spki: Vec<u8>) -> Self {
        Self { public_key_spki }
    }

    /// Create a configuration from base64 SPKI DER.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidConfig`] if the text is not valid base64.
    pub fn from_base64(public_key: &str) -> Result<Self> {
        decode_base64(Self::PUBLIC_KEY_VAR, public_key).map(Self::new)
    }

    /// Load `TICKET_SIGNING_PUBLIC_KEY_Ed25519_BASE64`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidConfig`] if the variable is missing or not
    /// valid base64.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`VerifierConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Self::from_base64(&require(&lookup, Self::PUBLIC_KEY_VAR)?)
    }

    /// Raw SPKI DER bytes.
    #[must_use]
    pub fn public_key_spki(&self) -> &[u8] {
        &self.public_key_spki
    }
}
