use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

/// Claim keys owned by the token format; they cannot be set through `extra`.
pub const RESERVED_CLAIMS: [&str; 3] = ["userId", "email", "exp"];

/// Token claims.
///
/// `userId` and `email` are always present. `exp` (Unix epoch milliseconds) is
/// set by the codec at issuance; any value supplied here is overwritten.
/// Additional custom fields are flattened into the payload via `extra`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: i64,

    pub email: String,

    /// Expiration time (Unix epoch milliseconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Claims {
    /// Create claims for a user.
    pub fn for_user(user_id: i64, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
            exp: None,
            extra: HashMap::new(),
        }
    }

    /// Set expiration (Unix epoch milliseconds).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = Some(exp);
        self
    }

    /// Add a custom field. Reserved keys and unserializable values are ignored.
    pub fn with_extra(mut self, key: impl ToString, value: impl Serialize) -> Self {
        let key = key.to_string();
        if RESERVED_CLAIMS.contains(&key.as_str()) {
            return self;
        }
        if let Ok(json_value) = serde_json::to_value(value) {
            self.extra.insert(key, json_value);
        }
        self
    }

    /// Check if the claims are expired at `now_millis`.
    ///
    /// Claims without `exp` count as expired.
    pub fn is_expired(&self, now_millis: i64) -> bool {
        self.exp.map_or(true, |exp| exp <= now_millis)
    }
}

/// Identity of an authenticated request, taken from a verified token.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Principal {
    #[serde(rename = "userId")]
    pub user_id: i64,

    pub email: String,

    /// Expiration time (Unix epoch milliseconds)
    pub exp: i64,

    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Principal {
    /// Build a principal from claims carrying an expiry. Returns `None` without `exp`.
    pub fn from_claims(claims: Claims) -> Option<Self> {
        let exp = claims.exp?;
        Some(Self {
            user_id: claims.user_id,
            email: claims.email,
            exp,
            extra: claims.extra,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_user() {
        let claims = Claims::for_user(42, "a@b.com");

        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.email, "a@b.com");
        assert!(claims.exp.is_none());
        assert!(claims.extra.is_empty());
    }

    #[test]
    fn test_wire_names() {
        let claims = Claims::for_user(42, "a@b.com")
            .with_expiration(1_000)
            .with_extra("role", "admin");

        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(json["userId"], 42);
        assert_eq!(json["email"], "a@b.com");
        assert_eq!(json["exp"], 1_000);
        assert_eq!(json["role"], "admin");
        assert!(json.get("user_id").is_none());
    }

    #[test]
    fn test_reserved_extra_is_ignored() {
        let claims = Claims::for_user(1, "x@y.z")
            .with_extra("exp", 5)
            .with_extra("userId", 7);

        assert!(claims.extra.is_empty());
        assert_eq!(claims.user_id, 1);
        assert!(claims.exp.is_none());
    }

    #[test]
    fn test_deserialize_without_exp() {
        let claims: Claims =
            serde_json::from_str(r#"{"userId":3,"email":"c@d.e","plan":"pro"}"#).unwrap();

        assert_eq!(claims.exp, None);
        assert_eq!(claims.extra.get("plan").unwrap().as_str(), Some("pro"));
    }

    #[test]
    fn test_is_expired() {
        let claims = Claims::for_user(1, "x@y.z").with_expiration(1000);

        assert!(!claims.is_expired(999));
        assert!(claims.is_expired(1000)); // Exactly at expiration
        assert!(claims.is_expired(1001));
    }

    #[test]
    fn test_is_expired_no_exp_claim() {
        let claims = Claims::for_user(1, "x@y.z");
        assert!(claims.is_expired(0));
    }

    #[test]
    fn test_principal_requires_exp() {
        assert!(Principal::from_claims(Claims::for_user(1, "x@y.z")).is_none());

        let principal =
            Principal::from_claims(Claims::for_user(1, "x@y.z").with_expiration(9)).unwrap();
        assert_eq!(principal.exp, 9);

        let json = serde_json::to_value(&principal).unwrap();
        assert_eq!(json, serde_json::json!({"userId": 1, "email": "x@y.z", "exp": 9}));
    }
}
