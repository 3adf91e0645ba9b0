use std::sync::Arc;

use subtle::ConstantTimeEq;

use super::claims::Principal;
use super::codec::TokenCodec;
use super::codec::ALGORITHM;
use super::errors::TokenError;

/// Checks token integrity and expiry on top of a [`TokenCodec`].
#[derive(Clone)]
pub struct TokenVerifier {
    codec: Arc<TokenCodec>,
}

impl TokenVerifier {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }

    /// Verify a token and return the principal it identifies.
    ///
    /// The signature is checked against the raw segments before anything is
    /// decoded, so altered bytes never reach the JSON parser.
    ///
    /// # Errors
    /// * `MalformedToken` - Wrong segment count, bad base64/JSON, or unexpected algorithm
    /// * `SignatureMismatch` - Signature does not match header and payload
    /// * `Expired` - `exp` is missing or not after the current instant
    pub fn verify(&self, token: &str) -> Result<Principal, TokenError> {
        let parts = TokenCodec::split(token)?;

        let expected = self.codec.sign(parts.signing_input);
        if !bool::from(expected.as_bytes().ct_eq(parts.signature.as_bytes())) {
            return Err(TokenError::SignatureMismatch);
        }

        let decoded = TokenCodec::decode_parts(&parts)?;
        if decoded.header.alg != ALGORITHM {
            return Err(TokenError::MalformedToken(format!(
                "unsupported algorithm: {}",
                decoded.header.alg
            )));
        }

        if decoded.claims.is_expired(self.codec.now_millis()) {
            return Err(TokenError::Expired);
        }

        Principal::from_claims(decoded.claims).ok_or(TokenError::Expired)
    }
}
