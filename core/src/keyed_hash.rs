//! Keyed hash provider.
//!
//! Both the authenticator and the Feistel round function are built on a
//! keyed 256-bit digest. The [`KeyedHash`] trait is the seam; production
//! code uses [`HmacSha256Key`], tests may wrap it to observe calls.

use crate::error::{CodecError, Result};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;

/// Length of a keyed digest in bytes.
pub const DIGEST_LEN: usize = 32;

/// A 256-bit keyed digest.
pub type Digest = [u8; DIGEST_LEN];

/// A secret key bound to a keyed hash function.
///
/// Implementations hold already-imported key material and must be safe to
/// share across threads.
pub trait KeyedHash: Send + Sync {
    /// Compute the keyed digest of `message`.
    fn digest(&self, message: &[u8]) -> Digest;
}

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA-256 with a key imported once at construction.
#[derive(Clone)]
pub struct HmacSha256Key {
    /// Keyed state; cloned per call so the key schedule is computed once.
    mac: HmacSha256,
}

impl HmacSha256Key {
    /// Import raw key bytes.
    ///
    /// `name` identifies the key in configuration errors.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidConfig`] if the key is empty.
    pub fn new(name: &'static str, key: &[u8]) -> Result<Self> {
        if key.is_empty() {
            return Err(CodecError::config(name, "key must not be empty"));
        }

        let mac = HmacSha256::new_from_slice(key)
            .map_err(|e| CodecError::config(name, format!("failed to import HMAC key: {e}")))?;

        Ok(Self { mac })
    }
}

impl KeyedHash for HmacSha256Key {
    fn digest(&self, message: &[u8]) -> Digest {
        let mut mac = self.mac.clone();
        mac.update(message);
        mac.finalize().into_bytes().into()
    }
}

impl fmt::Debug for HmacSha256Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacSha256Key").finish_non_exhaustive()
    }
}
