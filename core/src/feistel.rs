//! 46-bit Feistel network keyed by the cipher key.
//!
//! This is format-preserving obfuscation: it makes the packed fields
//! unreadable without the key. Authenticity comes from the tag and the
//! Ed25519 signature, not from the cipher.
//!
//! ```text
//! block = L ‖ R                    (23 + 23 bits)
//! round i:  L, R = R, L ⊕ F(R, i)   i = 0..8
//! F(R, i) = top 23 bits of HMAC(cipher_key, i ‖ R)[0..4]
//! ```

use crate::authenticator::{TAG_BITS, TAG_MASK, Tag};
use crate::keyed_hash::KeyedHash;
use crate::packing::{PAYLOAD_BITS, Payload};

/// Width of a cipher block.
pub const BLOCK_BITS: u32 = PAYLOAD_BITS + TAG_BITS;

/// Width of one Feistel half.
pub const HALF_BITS: u32 = BLOCK_BITS / 2;

/// Number of Feistel rounds.
pub const ROUNDS: u8 = 8;

const HALF_MASK: u32 = (1 << HALF_BITS) - 1;
const BLOCK_MASK: u64 = (1 << BLOCK_BITS) - 1;

/// A 46-bit block: either an authenticated payload or its ciphertext.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Block(u64);

impl Block {
    /// Largest representable block.
    pub const MAX: Self = Self(BLOCK_MASK);

    /// Wrap raw bits, rejecting anything wider than 46 bits.
    #[must_use]
    pub const fn from_bits(bits: u64) -> Option<Self> {
        if bits > BLOCK_MASK { None } else { Some(Self(bits)) }
    }

    /// Raw block bits.
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Concatenate payload (high 36 bits) and tag (low 10 bits).
    #[must_use]
    pub const fn authenticated(payload: Payload, tag: Tag) -> Self {
        Self((payload.bits() << TAG_BITS) | tag.bits() as u64)
    }

    /// Split into payload and tag. Inverse of [`Block::authenticated`].
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // masked to TAG_BITS
    pub const fn split(self) -> (Payload, Tag) {
        (Payload(self.0 >> TAG_BITS), Tag((self.0 as u16) & TAG_MASK))
    }

    #[allow(clippy::cast_possible_truncation)] // both halves are masked to HALF_BITS
    const fn halves(self) -> (u32, u32) {
        ((self.0 >> HALF_BITS) as u32 & HALF_MASK, self.0 as u32 & HALF_MASK)
    }

    const fn join(left: u32, right: u32) -> Self {
        Self(((left as u64) << HALF_BITS) | right as u64)
    }
}

/// Feistel cipher over 46-bit blocks.
#[derive(Debug, Clone)]
pub struct FeistelCipher<H> {
    cipher_key: H,
}

impl<H: KeyedHash> FeistelCipher<H> {
    /// Create a cipher over the cipher key.
    pub const fn new(cipher_key: H) -> Self {
        Self { cipher_key }
    }

    /// Round function: `round ‖ right` as 5 bytes, top 23 bits of the first
    /// four digest bytes.
    fn round(&self, right: u32, round: u8) -> u32 {
        let mut message = [0u8; 5];
        message[0] = round;
        message[1..].copy_from_slice(&right.to_be_bytes());

        let digest = self.cipher_key.digest(&message);
        (u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]) >> 9) & HALF_MASK
    }

    /// Encrypt a block, rounds `0..ROUNDS` ascending.
    pub fn encrypt(&self, block: Block) -> Block {
        let (mut left, mut right) = block.halves();
        for i in 0..ROUNDS {
            let next_right = left ^ self.round(right, i);
            left = right;
            right = next_right;
        }
        Block::join(left, right)
    }

    /// Decrypt a block, rounds descending. Inverse of [`FeistelCipher::encrypt`].
    pub fn decrypt(&self, block: Block) -> Block {
        let (mut left, mut right) = block.halves();
        for i in (0..ROUNDS).rev() {
            let prev_left = right ^ self.round(left, i);
            right = left;
            left = prev_left;
        }
        Block::join(left, right)
    }
}
