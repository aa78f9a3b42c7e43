//! Ed25519 verification of interaction requests.

use crate::{DiscordError, DiscordErrorKind, DiscordResult};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};

/// Header carrying the hex signature.
pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";
/// Header carrying the signed timestamp.
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

/// Checks that interaction requests were signed by Discord.
///
/// Discord signs `timestamp || body` with the application's key; the
/// public half is shown in the developer portal as a hex string.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    key: VerifyingKey,
}

impl SignatureVerifier {
    /// Wrap an already-decoded key.
    pub fn new(key: VerifyingKey) -> Self {
        Self { key }
    }

    /// Parse the application public key from hex.
    pub fn from_hex(public_key: &str) -> DiscordResult<Self> {
        let bytes: [u8; 32] = hex::decode(public_key.trim())
            .map_err(|e| DiscordError::new(DiscordErrorKind::InvalidPublicKey(e.to_string())))?
            .try_into()
            .map_err(|_| {
                DiscordError::new(DiscordErrorKind::InvalidPublicKey(
                    "expected 32 bytes".to_string(),
                ))
            })?;
        let key = VerifyingKey::from_bytes(&bytes)
            .map_err(|e| DiscordError::new(DiscordErrorKind::InvalidPublicKey(e.to_string())))?;
        Ok(Self { key })
    }

    /// Verify one request.
    pub fn verify(&self, timestamp: &str, body: &[u8], signature_hex: &str) -> DiscordResult<()> {
        let bytes: [u8; 64] = hex::decode(signature_hex.trim())
            .map_err(|e| DiscordError::new(DiscordErrorKind::InvalidSignature(e.to_string())))?
            .try_into()
            .map_err(|_| {
                DiscordError::new(DiscordErrorKind::InvalidSignature(
                    "expected 64 bytes".to_string(),
                ))
            })?;
        let signature = Signature::from_bytes(&bytes);

        let mut message = Vec::with_capacity(timestamp.len() + body.len());
        message.extend_from_slice(timestamp.as_bytes());
        message.extend_from_slice(body);

        self.key
            .verify(&message, &signature)
            .map_err(|e| DiscordError::new(DiscordErrorKind::InvalidSignature(e.to_string())))
    }
}
