//! Ticket code façade.
//!
//! ```text
//! generate: record ─pack─▶ payload ─tag─▶ payload‖tag ─encrypt─▶ block ─base58─▶ code
//! decode:   code ─base58─▶ block ─decrypt─▶ payload‖tag ─verify─▶ payload ─unpack─▶ record
//! ```
//!
//! A [`TicketCodec`] holds imported keys and an indexed alphabet. It is
//! immutable after [`TicketCodec::initialize`] and can be shared across
//! threads behind an `Arc`.

use crate::authenticator::Authenticator;
use crate::base58::Alphabet;
use crate::config::CodecConfig;
use crate::error::Result;
use crate::feistel::{Block, FeistelCipher};
use crate::keyed_hash::{HmacSha256Key, KeyedHash};
use crate::packing::{TicketRecord, pack, unpack};

/// Longest code that can carry a 46-bit block.
pub const MAX_CODE_LEN: usize = 8;

/// Prefix lengths tried by [`TicketCodec::decode_prefix`], longest first.
const PREFIX_LENGTHS: [usize; 4] = [8, 7, 6, 5];

/// Generates and decodes ticket codes.
#[derive(Debug, Clone)]
pub struct TicketCodec<H = HmacSha256Key> {
    authenticator: Authenticator<H>,
    cipher: FeistelCipher<H>,
    alphabet: Alphabet,
}

impl TicketCodec {
    /// Import keys and validate the alphabet.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidConfig`](crate::CodecError::InvalidConfig)
    /// if either key is empty or the alphabet is not 58 distinct symbols.
    pub fn initialize(config: &CodecConfig) -> Result<Self> {
        let mac_key = HmacSha256Key::new(CodecConfig::MAC_KEY_VAR, config.mac_key())?;
        let cipher_key = HmacSha256Key::new(CodecConfig::CIPHER_KEY_VAR, config.cipher_key())?;
        let alphabet = Alphabet::new(config.alphabet())?;

        tracing::info!("Ticket codec initialized");

        Ok(Self::from_parts(mac_key, cipher_key, alphabet))
    }
}

impl<H: KeyedHash> TicketCodec<H> {
    /// Assemble a codec from already-imported keys.
    pub const fn from_parts(mac_key: H, cipher_key: H, alphabet: Alphabet) -> Self {
        Self {
            authenticator: Authenticator::new(mac_key),
            cipher: FeistelCipher::new(cipher_key),
            alphabet,
        }
    }

    /// The configured alphabet.
    pub const fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Turn a record into its short code.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::FieldOutOfRange`](crate::CodecError::FieldOutOfRange)
    /// if any field does not fit.
    pub fn generate(&self, record: &TicketRecord) -> Result<String> {
        let payload = pack(record)?;
        let tag = self.authenticator.tag(payload);
        let block = self.cipher.encrypt(Block::authenticated(payload, tag));
        Ok(self.alphabet.encode(block.bits()))
    }

    /// Recover the record from a code.
    ///
    /// Returns `None` for anything that is not an authentic code. The reason
    /// is logged at debug level only.
    pub fn decode(&self, code: &str) -> Option<TicketRecord> {
        let length = code.chars().count();
        if length == 0 || length > MAX_CODE_LEN {
            tracing::debug!(length, reason = "length", "Ticket code rejected");
            return None;
        }

        let Some(value) = self.alphabet.decode(code) else {
            tracing::debug!(reason = "symbol", "Ticket code rejected");
            return None;
        };

        let Some(block) = Block::from_bits(value) else {
            tracing::debug!(reason = "width", "Ticket code rejected");
            return None;
        };

        let (payload, tag) = self.cipher.decrypt(block).split();
        if !self.authenticator.verify(payload, tag) {
            tracing::debug!(reason = "tag", "Ticket code rejected");
            return None;
        }

        Some(unpack(payload))
    }

    /// Locate a code at the start of a longer token.
    ///
    /// Tries prefixes of 8, 7, 6 and 5 symbols, skipping any that is not
    /// strictly shorter than `token`, and returns the first that decodes
    /// together with its length in symbols.
    pub fn decode_prefix(&self, token: &str) -> Option<(TicketRecord, usize)> {
        let total = token.chars().count();
        PREFIX_LENGTHS
            .into_iter()
            .filter(|&len| len < total)
            .find_map(|len| {
                let end = token.char_indices().nth(len).map_or(token.len(), |(i, _)| i);
                self.decode(&token[..end]).map(|record| (record, len))
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{CodecError, Field};

    const ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

    fn codec() -> TicketCodec {
        TicketCodec::initialize(&CodecConfig::new(vec![1; 32], vec![2; 32], ALPHABET)).unwrap()
    }

    fn record() -> TicketRecord {
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

    #[test]
    fn test_generate_then_decode() {
        let codec = codec();
        let code = codec.generate(&record()).unwrap();
        assert!(!code.is_empty());
        assert!(code.chars().count() <= MAX_CODE_LEN);
        assert!(code.chars().all(|c| codec.alphabet().contains(c)));
        assert_eq!(codec.decode(&code), Some(TicketRecord { year: 1, ..record() }));
    }

    #[test]
    fn test_generate_is_deterministic() {
        let codec = codec();
        assert_eq!(codec.generate(&record()).unwrap(), codec.generate(&record()).unwrap());
    }

    #[test]
    fn test_out_of_range_fails_generation() {
        let err = codec()
            .generate(&TicketRecord { ticket_type: 16, ..record() })
            .unwrap_err();
        assert!(matches!(
            err,
            CodecError::FieldOutOfRange { field: Field::TicketType, .. }
        ));
    }

    #[test]
    fn test_malformed_codes_are_none() {
        let codec = codec();
        assert_eq!(codec.decode(""), None);
        assert_eq!(codec.decode("0OIl"), None);
        assert_eq!(codec.decode("123456789"), None);
        // 2^46 is one past the largest block.
        assert_eq!(codec.decode(&codec.alphabet().encode(1 << 46)), None);
    }

    #[test]
    fn test_other_keys_do_not_decode() {
        let code = codec().generate(&record()).unwrap();
        let other =
            TicketCodec::initialize(&CodecConfig::new(vec![1; 32], vec![3; 32], ALPHABET)).unwrap();
        assert_ne!(other.decode(&code), Some(TicketRecord { year: 1, ..record() }));
    }

    #[test]
    fn test_decode_prefix_skips_full_length() {
        let codec = codec();
        let code = codec.generate(&record()).unwrap();
        // The whole token is never tried, only strictly shorter prefixes.
        let located = codec.decode_prefix(&code).map(|(_, len)| len);
        assert!(located.is_none_or(|len| len < code.chars().count()));

        // Longer prefixes include the '.' and cannot decode.
        let token = format!("{code}.suffix");
        let (decoded, len) = codec.decode_prefix(&token).unwrap();
        assert_eq!(len, code.chars().count());
        assert_eq!(decoded, TicketRecord { year: 1, ..record() });
    }

    #[test]
    fn test_empty_keys_are_rejected() {
        let err = TicketCodec::initialize(&CodecConfig::new(vec![], vec![2], ALPHABET)).unwrap_err();
        assert!(err.is_config_error());
        let err = TicketCodec::initialize(&CodecConfig::new(vec![1], vec![2], "abc")).unwrap_err();
        assert!(err.is_config_error());
    }
}
