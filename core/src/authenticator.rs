//! 10-bit authentication tag over the packed payload.

use crate::keyed_hash::KeyedHash;
use crate::packing::Payload;

/// Width of an authentication tag.
pub const TAG_BITS: u32 = 10;

/// Mask for the low [`TAG_BITS`] bits.
pub const TAG_MASK: u16 = (1 << TAG_BITS) - 1;

/// A 10-bit authentication tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag(pub(crate) u16);

impl Tag {
    /// Wrap raw bits, rejecting anything wider than 10 bits.
    #[must_use]
    pub const fn from_bits(bits: u16) -> Option<Self> {
        if bits > TAG_MASK { None } else { Some(Self(bits)) }
    }

    /// Raw tag bits.
    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }
}

/// Derives and checks payload tags with the MAC key.
#[derive(Debug, Clone)]
pub struct Authenticator<H> {
    mac_key: H,
}

impl<H: KeyedHash> Authenticator<H> {
    /// Create an authenticator over the MAC key.
    pub const fn new(mac_key: H) -> Self {
        Self { mac_key }
    }

    /// Compute the tag of a payload.
    ///
    /// The payload is hashed as a big-endian `u64`; the tag is the top 10
    /// bits of the first two digest bytes.
    pub fn tag(&self, payload: Payload) -> Tag {
        let digest = self.mac_key.digest(&payload.bits().to_be_bytes());
        Tag((u16::from_be_bytes([digest[0], digest[1]]) >> 6) & TAG_MASK)
    }

    /// Returns `true` if `tag` is the tag of `payload`.
    pub fn verify(&self, payload: Payload, tag: Tag) -> bool {
        let expected = self.tag(payload);
        constant_time_eq::constant_time_eq(&expected.0.to_be_bytes(), &tag.0.to_be_bytes())
    }
}
