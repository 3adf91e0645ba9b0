use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Duration;
use hmac::Hmac;
use hmac::Mac;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;
use sha2::Sha256;

use super::claims::Claims;
use super::claims::RESERVED_CLAIMS;
use super::errors::TokenError;
use crate::clock::Clock;
use crate::clock::SystemClock;
use crate::config::Secret;
use crate::config::TokenConfig;

type HmacSha256 = Hmac<Sha256>;

/// Signing algorithm advertised in every token header.
pub const ALGORITHM: &str = "HS256";

/// Token type advertised in every token header.
pub const TOKEN_TYPE: &str = "JWT";

/// Token header segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHeader {
    pub alg: String,
    pub typ: String,
}

impl Default for TokenHeader {
    fn default() -> Self {
        Self {
            alg: ALGORITHM.to_string(),
            typ: TOKEN_TYPE.to_string(),
        }
    }
}

/// A freshly minted token and the exact claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

impl IssuedToken {
    /// Expiry of the token (Unix epoch milliseconds).
    pub fn expires_at(&self) -> i64 {
        self.claims.exp.unwrap_or_default()
    }
}

/// Raw segments of a token, not yet decoded or checked.
#[derive(Debug, Clone, Copy)]
pub struct TokenParts<'a> {
    pub header: &'a str,
    pub payload: &'a str,
    pub signature: &'a str,
    /// `header.payload`, the bytes covered by the signature
    pub signing_input: &'a str,
}

/// Structurally decoded token. Nothing about it has been verified.
#[derive(Debug, Clone)]
pub struct DecodedToken {
    pub header: TokenHeader,
    pub claims: Claims,
    pub signature: String,
}

/// Encodes claims into `base64url(header).base64url(claims).hex(hmac)` tokens.
///
/// Holds the signing secret, the token lifetime and the clock used to stamp
/// expiry. Immutable after construction and safe to share across threads.
pub struct TokenCodec {
    secret: Secret,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Create a codec that reads time from the system clock.
    pub fn new(config: &TokenConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a codec with an injected clock.
    pub fn with_clock(config: &TokenConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            secret: config.secret.clone(),
            ttl: config.ttl,
            clock,
        }
    }

    /// Current instant according to the codec's clock (Unix epoch milliseconds).
    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    /// Encode claims into a signed token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Claims could not be serialized or expiry overflowed
    pub fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        self.issue(claims).map(|issued| issued.token)
    }

    /// Encode claims into a signed token and return the claims actually embedded.
    ///
    /// `exp` is always set to now + TTL, replacing any value in `claims`.
    /// Reserved keys placed directly in `extra` are dropped.
    ///
    /// # Errors
    /// * `EncodingFailed` - Claims could not be serialized or expiry overflowed
    pub fn issue(&self, claims: &Claims) -> Result<IssuedToken, TokenError> {
        let expiry = self
            .now_millis()
            .checked_add(self.ttl.num_milliseconds())
            .ok_or_else(|| TokenError::EncodingFailed("Expiry out of range".to_string()))?;

        let mut claims = claims.clone();
        claims
            .extra
            .retain(|key, _| !RESERVED_CLAIMS.contains(&key.as_str()));
        let claims = claims.with_expiration(expiry);

        let header = encode_segment(&TokenHeader::default())?;
        let payload = encode_segment(&claims)?;
        let signing_input = format!("{}.{}", header, payload);
        let signature = self.sign(&signing_input);

        Ok(IssuedToken {
            token: format!("{}.{}", signing_input, signature),
            claims,
        })
    }

    /// Split and decode a token without checking its signature or expiry.
    ///
    /// # Errors
    /// * `MalformedToken` - Not three non-empty segments, or a segment is not base64url JSON
    pub fn decode(&self, token: &str) -> Result<DecodedToken, TokenError> {
        let parts = Self::split(token)?;
        Self::decode_parts(&parts)
    }

    /// Split a token into its three segments.
    ///
    /// # Errors
    /// * `MalformedToken` - Not exactly three non-empty segments
    pub fn split(token: &str) -> Result<TokenParts<'_>, TokenError> {
        let mut segments = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(TokenError::MalformedToken(
                "expected three dot-separated segments".to_string(),
            ));
        };

        if header.is_empty() || payload.is_empty() || signature.is_empty() {
            return Err(TokenError::MalformedToken("empty segment".to_string()));
        }

        Ok(TokenParts {
            header,
            payload,
            signature,
            signing_input: &token[..header.len() + 1 + payload.len()],
        })
    }

    /// Decode the header and payload segments of an already split token.
    pub fn decode_parts(parts: &TokenParts<'_>) -> Result<DecodedToken, TokenError> {
        Ok(DecodedToken {
            header: decode_segment(parts.header, "header")?,
            claims: decode_segment(parts.payload, "payload")?,
            signature: parts.signature.to_string(),
        })
    }

    /// Hex encoded HMAC-SHA256 of `signing_input` under the codec's secret.
    pub fn sign(&self, signing_input: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

fn encode_segment<T: Serialize>(value: &T) -> Result<String, TokenError> {
    let json = serde_json::to_vec(value).map_err(|e| TokenError::EncodingFailed(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

fn decode_segment<T: DeserializeOwned>(segment: &str, name: &str) -> Result<T, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| TokenError::MalformedToken(format!("{} is not base64url: {}", name, e)))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| TokenError::MalformedToken(format!("{} is not valid JSON: {}", name, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    const NOW: i64 = 1_700_000_000_000;

    fn codec() -> TokenCodec {
        let config = TokenConfig::with_default_ttl("test_secret_key_at_least_32_bytes!");
        TokenCodec::with_clock(&config, Arc::new(ManualClock::new(NOW)))
    }

    #[test]
    fn test_encode_shape() {
        let token = codec().encode(&Claims::for_user(42, "a@b.com")).unwrap();

        let segments: Vec<&str> = token.split('.').collect();
        assert_eq!(segments.len(), 3);
        assert!(!token.contains('='));
        assert_eq!(segments[2].len(), 64);
        assert!(segments[2].bytes().all(|b| b.is_ascii_hexdigit()));

        let header: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(segments[0]).unwrap()).unwrap();
        assert_eq!(header, serde_json::json!({"alg": "HS256", "typ": "JWT"}));
    }

    #[test]
    fn test_issue_sets_expiry() {
        let issued = codec().issue(&Claims::for_user(42, "a@b.com")).unwrap();

        assert_eq!(issued.expires_at(), NOW + 24 * 60 * 60 * 1000);
    }

    #[test]
    fn test_issue_overwrites_caller_expiry() {
        let claims = Claims::for_user(42, "a@b.com").with_expiration(5);
        let issued = codec().issue(&claims).unwrap();

        assert_eq!(issued.claims.exp, Some(NOW + 24 * 60 * 60 * 1000));
    }

    #[test]
    fn test_issue_drops_reserved_keys_from_extra() {
        let codec = codec();
        let mut claims = Claims::for_user(42, "a@b.com");
        claims.extra.insert("exp".to_string(), serde_json::json!(5));
        claims.extra.insert("userId".to_string(), serde_json::json!(1));
        claims.extra.insert("email".to_string(), serde_json::json!("admin@b.com"));
        claims.extra.insert("role".to_string(), serde_json::json!("user"));

        let issued = codec.issue(&claims).unwrap();

        assert!(issued.claims.extra.get("exp").is_none());
        assert_eq!(issued.claims.extra["role"], "user");

        let decoded = codec.decode(&issued.token).expect("Issued token does not decode");
        assert_eq!(decoded.claims.user_id, 42);
        assert_eq!(decoded.claims.email, "a@b.com");
        assert_eq!(decoded.claims.exp, Some(NOW + 24 * 60 * 60 * 1000));
    }

    #[test]
    fn test_decode_round_trip() {
        let codec = codec();
        let claims = Claims::for_user(42, "a@b.com").with_extra("role", "admin");
        let token = codec.encode(&claims).unwrap();

        let decoded = codec.decode(&token).unwrap();

        assert_eq!(decoded.header, TokenHeader::default());
        assert_eq!(decoded.claims.user_id, 42);
        assert_eq!(decoded.claims.email, "a@b.com");
        assert_eq!(decoded.claims.extra["role"], "admin");
        assert_eq!(decoded.signature, token.rsplit('.').next().unwrap());
    }

    #[test]
    fn test_signature_covers_header_and_payload() {
        let codec = codec();
        let token = codec.encode(&Claims::for_user(42, "a@b.com")).unwrap();
        let parts = TokenCodec::split(&token).unwrap();

        assert_eq!(codec.sign(parts.signing_input), parts.signature);
        assert_eq!(
            parts.signing_input,
            format!("{}.{}", parts.header, parts.payload)
        );
    }

    #[test]
    fn test_split_rejects_wrong_segment_count() {
        for token in ["", "abc", "a.b", "a.b.c.d", "a..c", ".b.c", "a.b."] {
            assert!(
                matches!(TokenCodec::split(token), Err(TokenError::MalformedToken(_))),
                "accepted {:?}",
                token
            );
        }
    }

    #[test]
    fn test_decode_rejects_bad_segments() {
        let codec = codec();

        let not_base64 = codec.decode("!!!.e30.abcd");
        assert!(matches!(not_base64, Err(TokenError::MalformedToken(_))));

        let not_json = URL_SAFE_NO_PAD.encode("not json");
        let result = codec.decode(&format!("{}.{}.abcd", not_json, not_json));
        assert!(matches!(result, Err(TokenError::MalformedToken(_))));

        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        let missing_user = URL_SAFE_NO_PAD.encode(r#"{"email":"a@b.com"}"#);
        let result = codec.decode(&format!("{}.{}.abcd", header, missing_user));
        assert!(matches!(result, Err(TokenError::MalformedToken(_))));
    }
}
