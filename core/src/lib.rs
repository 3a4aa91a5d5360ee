//! # Ticket Codec Core
//!
//! Short, tamper-evident ticket codes.
//!
//! A [`TicketRecord`] (affiliation, relationship, type, performance,
//! schedule, year, serial) is packed into 36 bits, given a 10-bit keyed
//! authentication tag, scrambled with a keyed 46-bit Feistel permutation and
//! written in Base58. The resulting code is at most 8 symbols long and can be
//! decoded only by a holder of the same keys. An Ed25519 signature over the
//! code lets anyone with the public key check it was issued by the
//! signing side.
//!
//! ## Pipeline
//!
//! ```text
//! record → pack → (payload ‖ tag) → Feistel → Base58 → code → sign → "code.signature"
//! ```
//!
//! ## Example
//!
//! ```
//! use ticket_codec_core::{CodecConfig, TicketCodec, TicketRecord};
//!
//! let config = CodecConfig::new(
//!     vec![1; 32],
//!     vec![2; 32],
//!     "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz",
//! );
//! let codec = TicketCodec::initialize(&config)?;
//!
//! let record = TicketRecord {
//!     affiliation: 1101,
//!     relationship: 1,
//!     ticket_type: 2,
//!     performance: 3,
//!     schedule: 4,
//!     year: 5,
//!     serial: 6,
//! };
//! let code = codec.generate(&record)?;
//! assert_eq!(codec.decode(&code), Some(record));
//! # Ok::<(), ticket_codec_core::CodecError>(())
//! ```
//!
//! ## Threading
//!
//! All operations are synchronous and CPU-bound. Codecs, signers and
//! verifiers are immutable after initialization and `Send + Sync`; share
//! them behind an `Arc`.

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

pub mod affiliation;
pub mod authenticator;
pub mod base58;
pub mod codec;
pub mod config;
pub mod credential;
pub mod environment;
pub mod error;
pub mod feistel;
pub mod keyed_hash;
pub mod packing;
pub mod qr;
pub mod signature;

pub use base58::Alphabet;
pub use codec::{MAX_CODE_LEN, TicketCodec};
pub use config::{CodecConfig, SignerConfig, VerifierConfig};
pub use credential::{TicketCredential, TicketIssuer, TicketVerifier};
pub use error::{CodecError, Field, Result};
pub use keyed_hash::{HmacSha256Key, KeyedHash};
pub use packing::{Payload, TicketRecord};
pub use qr::{QrError, QrPayload, is_valid_qr_token, issue_qr_token, restore_qr_token};
pub use signature::{CodeSignature, CodeSigner, CodeVerifier, verify_code_signature};
