use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use diary_types::api::Claims;

pub const DEFAULT_TTL_HOURS: i64 = 24;

/// Issues and verifies HS256 identity tokens carrying a user id.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        // Expiry is exact: no grace period past `exp`.
        let mut validation = Validation::default();
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    pub fn issue(&self, user_id: i64) -> jsonwebtoken::errors::Result<String> {
        let claims = Claims {
            user_id,
            exp: (Utc::now() + self.ttl).timestamp().max(0) as usize,
        };

        encode(&Header::default(), &claims, &self.encoding)
    }

    /// Returns the user id for a valid, unexpired token. Bad signatures,
    /// expiry and garbage all come back as `None`.
    pub fn verify(&self, token: &str) -> Option<i64> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .ok()
            .map(|data| data.claims.user_id)
    }
}
