//! Key material and sample records for tests.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ed25519_dalek::SigningKey;
use ed25519_dalek::pkcs8::{EncodePrivateKey, EncodePublicKey};
use rand::RngCore;
use rand::rngs::OsRng;
use ticket_codec_core::{
    CodeSigner, CodeVerifier, CodecConfig, SignerConfig, TicketCodec, TicketRecord, VerifierConfig,
};

/// Bitcoin-ordered Base58 alphabet.
pub const TEST_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// A full set of keys: MAC, cipher and an Ed25519 key pair.
#[derive(Clone)]
pub struct TestKeys {
    /// Raw HMAC key for the authenticator.
    pub mac_key: Vec<u8>,
    /// Raw HMAC key for the Feistel rounds.
    pub cipher_key: Vec<u8>,
    /// Ed25519 signing key.
    pub signing_key: SigningKey,
}

impl TestKeys {
    /// Fresh random keys.
    #[must_use]
    pub fn generate() -> Self {
        let mut mac_key = vec![0u8; 32];
        let mut cipher_key = vec![0u8; 32];
        OsRng.fill_bytes(&mut mac_key);
        OsRng.fill_bytes(&mut cipher_key);

        Self {
            mac_key,
            cipher_key,
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Deterministic keys derived from `seed`.
    #[must_use]
    pub fn from_seed(seed: u8) -> Self {
        Self {
            mac_key: vec![seed; 32],
            cipher_key: vec![seed.wrapping_add(1); 32],
            signing_key: SigningKey::from_bytes(&[seed.wrapping_add(2); 32]),
        }
    }

    /// MAC key as base64.
    #[must_use]
    pub fn mac_key_base64(&self) -> String {
        STANDARD.encode(&self.mac_key)
    }

    /// Cipher key as base64.
    #[must_use]
    pub fn cipher_key_base64(&self) -> String {
        STANDARD.encode(&self.cipher_key)
    }

    /// PKCS#8 DER private key as base64.
    ///
    /// # Panics
    ///
    /// Panics if the key cannot be DER encoded.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn private_key_base64(&self) -> String {
        let der = self
            .signing_key
            .to_pkcs8_der()
            .expect("Ed25519 key should encode as PKCS#8");
        STANDARD.encode(der.as_bytes())
    }

    /// SPKI DER public key as base64.
    ///
    /// # Panics
    ///
    /// Panics if the key cannot be DER encoded.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn public_key_base64(&self) -> String {
        let der = self
            .signing_key
            .verifying_key()
            .to_public_key_der()
            .expect("Ed25519 key should encode as SPKI");
        STANDARD.encode(der.as_bytes())
    }

    /// Environment variables as a deployment would set them.
    #[must_use]
    pub fn env_vars(&self) -> Vec<(&'static str, String)> {
        vec![
            (CodecConfig::MAC_KEY_VAR, self.mac_key_base64()),
            (CodecConfig::CIPHER_KEY_VAR, self.cipher_key_base64()),
            (CodecConfig::ALPHABET_VAR, TEST_ALPHABET.to_string()),
            (SignerConfig::PRIVATE_KEY_VAR, self.private_key_base64()),
            (VerifierConfig::PUBLIC_KEY_VAR, self.public_key_base64()),
        ]
    }

    /// Lookup over [`TestKeys::env_vars`], for the `from_lookup` loaders.
    #[must_use]
    pub fn lookup(&self) -> impl Fn(&str) -> Option<String> + use<> {
        let vars = self.env_vars();
        move |key| {
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.clone())
        }
    }

    /// Codec configuration with [`TEST_ALPHABET`].
    #[must_use]
    pub fn codec_config(&self) -> CodecConfig {
        CodecConfig::new(self.mac_key.clone(), self.cipher_key.clone(), TEST_ALPHABET)
    }

    /// Initialized codec.
    ///
    /// # Panics
    ///
    /// Panics if the keys are rejected.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn codec(&self) -> TicketCodec {
        TicketCodec::initialize(&self.codec_config()).expect("test keys should initialize a codec")
    }

    /// Initialized signer.
    ///
    /// # Panics
    ///
    /// Panics if the key is rejected.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn signer(&self) -> CodeSigner {
        let config = SignerConfig::from_base64(&self.private_key_base64())
            .expect("test private key should be valid base64");
        CodeSigner::initialize(&config).expect("test private key should import")
    }

    /// Initialized verifier.
    ///
    /// # Panics
    ///
    /// Panics if the key is rejected.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn verifier(&self) -> CodeVerifier {
        let config = VerifierConfig::from_base64(&self.public_key_base64())
            .expect("test public key should be valid base64");
        CodeVerifier::initialize(&config).expect("test public key should import")
    }
}

/// Record used across scenario tests: lowest affiliation, year 25.
#[must_use]
pub const fn sample_record() -> TicketRecord {
    TicketRecord {
        affiliation: 1101,
        relationship: 1,
        ticket_type: 2,
        performance: 3,
        schedule: 4,
        year: 25,
        serial: 5,
    }
}

/// Admission-only record (no performance, no schedule).
#[must_use]
pub const fn admission_only_record() -> TicketRecord {
    TicketRecord {
        affiliation: 2714,
        relationship: 0,
        ticket_type: 1,
        performance: 0,
        schedule: 0,
        year: 2025,
        serial: 0,
    }
}

/// Record with every field at its maximum.
#[must_use]
pub const fn max_record() -> TicketRecord {
    TicketRecord {
        affiliation: 4864,
        relationship: 7,
        ticket_type: 15,
        performance: 31,
        schedule: 63,
        year: 7,
        serial: 15,
    }
}

/// The record a decode of `record` is expected to yield (year mod 8).
#[must_use]
pub const fn normalized(record: TicketRecord) -> TicketRecord {
    TicketRecord {
        year: record.year % 8,
        ..record
    }
}
