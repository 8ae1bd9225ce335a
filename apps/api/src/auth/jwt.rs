// JWT verification for identity-provider tokens
// Tokens are HS256-signed with a secret shared with the provider

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT claims structure
///
/// # Fields
/// * `sub` - Subject (identity reference at the provider)
/// * `email` - Verified email address
/// * `name` - Display name, if the provider shares one
/// * `exp` - Expiry time (seconds since epoch)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub exp: usize,
}

impl Claims {
    /// Claims valid for the next 8 hours
    pub fn new(sub: impl Into<String>, email: impl Into<String>, name: Option<String>) -> Self {
        Self {
            sub: sub.into(),
            email: email.into(),
            name,
            exp: (Utc::now() + Duration::hours(8)).timestamp() as usize,
        }
    }
}

/// Signs a token
///
/// The portal never issues tokens itself; this exists for local
/// development and tests.
///
/// # Example
/// ```
/// use hackathon_portal_api::auth::jwt::{create_token, verify_token, Claims};
///
/// let secret = "your-secret-key";
/// let token = create_token(&Claims::new("idp|42", "ada@example.com", None), secret)
///     .expect("valid token");
///
/// let claims = verify_token(&token, secret).expect("valid token");
/// assert_eq!(claims.sub, "idp|42");
/// ```
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| e.to_string())
}

/// Verifies and decodes a JWT token
///
/// # Returns
/// * `Ok(Claims)` - The decoded claims if token is valid
/// * `Err(String)` - If token is invalid or expired
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-key-for-unit-tests";

    fn claims() -> Claims {
        Claims::new("idp|ada", "ada@example.com", Some("Ada".into()))
    }

    #[test]
    fn create_and_verify_token() {
        let token = create_token(&claims(), TEST_SECRET).expect("valid token");

        let decoded = verify_token(&token, TEST_SECRET).expect("valid verification");
        assert_eq!(decoded, claims_with_exp(decoded.exp));
    }

    fn claims_with_exp(exp: usize) -> Claims {
        Claims { exp, ..claims() }
    }

    #[test]
    fn name_is_optional() {
        let token = create_token(&Claims::new("idp|x", "x@example.com", None), TEST_SECRET)
            .expect("valid token");

        let decoded = verify_token(&token, TEST_SECRET).expect("valid verification");
        assert!(decoded.name.is_none());
    }

    #[test]
    fn wrong_secret_fails() {
        let token = create_token(&claims(), TEST_SECRET).expect("valid token");

        let result = verify_token(&token, "wrong-secret");
        assert!(result.is_err());
    }

    #[test]
    fn invalid_token_fails() {
        let result = verify_token("invalid.token.string", TEST_SECRET);
        assert!(result.is_err());
    }

    #[test]
    fn expired_token_fails() {
        let expired = Claims {
            exp: (Utc::now() - Duration::hours(1)).timestamp() as usize,
            ..claims()
        };
        let token = create_token(&expired, TEST_SECRET).expect("valid token");

        assert!(verify_token(&token, TEST_SECRET).is_err());
    }

    #[test]
    fn token_expiry_set() {
        let token = create_token(&claims(), TEST_SECRET).expect("valid token");

        let decoded = verify_token(&token, TEST_SECRET).expect("valid verification");
        let expiry_time = decoded.exp as i64;
        let now = Utc::now().timestamp();
        let in_8_hours = (Utc::now() + Duration::hours(8)).timestamp();

        // 10 second buffer for test execution time
        assert!(expiry_time > now);
        assert!(expiry_time <= in_8_hours + 10);
    }
}
