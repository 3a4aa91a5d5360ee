//! Bearer credential: a code and its signature joined by `.`.
//!
//! The code alphabet never contains `.`, and the signature is URL-safe
//! base64, so the last `.` always separates the two halves.

use crate::codec::TicketCodec;
use crate::error::{CodecError, Result};
use crate::keyed_hash::{HmacSha256Key, KeyedHash};
use crate::packing::TicketRecord;
use crate::signature::{CodeSignature, CodeSigner, CodeVerifier};
use std::fmt;
use std::str::FromStr;

/// A signed ticket code as presented by the holder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketCredential {
    code: String,
    signature: CodeSignature,
}

impl TicketCredential {
    /// Pair a code with its signature.
    #[must_use]
    pub const fn new(code: String, signature: CodeSignature) -> Self {
        Self { code, signature }
    }

    /// The short ticket code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Signature over the code.
    #[must_use]
    pub const fn signature(&self) -> &CodeSignature {
        &self.signature
    }
}

impl fmt::Display for TicketCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.code, self.signature)
    }
}

impl FromStr for TicketCredential {
    type Err = CodecError;

    fn from_str(text: &str) -> Result<Self> {
        let (code, signature) = text
            .trim()
            .rsplit_once('.')
            .ok_or(CodecError::MalformedCredential)?;
        if code.is_empty() || signature.is_empty() {
            return Err(CodecError::MalformedCredential);
        }

        Ok(Self {
            code: code.to_string(),
            signature: signature.parse()?,
        })
    }
}

/// Issues signed credentials.
#[derive(Debug, Clone)]
pub struct TicketIssuer<H = HmacSha256Key> {
    codec: TicketCodec<H>,
    signer: CodeSigner,
}

impl<H: KeyedHash> TicketIssuer<H> {
    /// Create an issuer from an initialized codec and signer.
    pub const fn new(codec: TicketCodec<H>, signer: CodeSigner) -> Self {
        Self { codec, signer }
    }

    /// Generate the code for `record` and sign it.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::FieldOutOfRange`] if the record does not fit.
    pub fn issue(&self, record: &TicketRecord) -> Result<TicketCredential> {
        let code = self.codec.generate(record)?;
        let signature = self.signer.sign(&code);

        tracing::debug!(
            affiliation = record.affiliation,
            serial = record.serial,
            "Ticket credential issued"
        );

        Ok(TicketCredential::new(code, signature))
    }
}

/// Checks presented credentials.
#[derive(Debug, Clone)]
pub struct TicketVerifier<H = HmacSha256Key> {
    codec: TicketCodec<H>,
    verifier: CodeVerifier,
}

impl<H: KeyedHash> TicketVerifier<H> {
    /// Create a verifier from an initialized codec and public key.
    pub const fn new(codec: TicketCodec<H>, verifier: CodeVerifier) -> Self {
        Self { codec, verifier }
    }

    /// Returns the record if the signature verifies and the code decodes.
    pub fn verify(&self, credential: &TicketCredential) -> Option<TicketRecord> {
        if !self.verifier.verify(&credential.code, &credential.signature) {
            return None;
        }
        self.codec.decode(&credential.code)
    }

    /// Parse and verify a credential string. Unparseable input is `None`.
    pub fn verify_str(&self, credential: &str) -> Option<TicketRecord> {
        match credential.parse::<TicketCredential>() {
            Ok(credential) => self.verify(&credential),
            Err(e) => {
                tracing::debug!(error = %e, "Ticket credential rejected");
                None
            }
        }
    }
}
