//! Access token service
//!
//! Tokens are HS256 JWTs carrying the user id and role. They are valid for a
//! fixed hour from issuance and cannot be refreshed or revoked. Verification
//! trusts the embedded role without consulting the store, so a role change
//! only takes effect once the user logs in again.

use crate::entities::Role;
use crate::errors::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Absolute lifetime of an access token.
pub const TOKEN_LIFETIME_MINUTES: i64 = 60;

/// Claims stored in the token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub id: i64,
    /// Role at the time of issuance
    pub role: Role,
    /// Issued-at timestamp (seconds)
    pub iat: i64,
    /// Expiry timestamp (seconds)
    pub exp: i64,
}

/// Verified caller identity, reconstructed from a token on every request.
///
/// Outside this crate an `Identity` can only be obtained from
/// [`TokenService::verify`]; the fields are private and there is no public
/// constructor, so a caller cannot claim a role it was never issued.
///
/// ```compile_fail
/// use order_desk::{auth::Identity, entities::Role};
///
/// let forged = Identity { id: 1000, role: Role::Admin };
/// ```
///
/// ```compile_fail
/// use order_desk::{auth::Identity, entities::Role};
///
/// let forged = Identity::new(999, Role::Admin);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    id: i64,
    role: Role,
}

impl Identity {
    /// Builds an identity for an account the crate has already authenticated.
    #[must_use]
    pub(crate) const fn new(id: i64, role: Role) -> Self {
        Self { id, role }
    }

    const fn from_claims(claims: &Claims) -> Self {
        Self::new(claims.id, claims.role)
    }

    /// User ID
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }

    /// Role embedded in the token
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// True when the caller holds the admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

/// Signs and verifies access tokens with a secret fixed at construction.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService").finish_non_exhaustive()
    }
}

impl TokenService {
    /// Creates a service signing with `secret`.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issues a token for `identity` starting now.
    pub fn issue(&self, identity: &Identity) -> Result<String> {
        self.issue_at(identity, Utc::now())
    }

    /// Issues a token for `identity` as if it had been issued at `issued_at`.
    pub fn issue_at(&self, identity: &Identity, issued_at: DateTime<Utc>) -> Result<String> {
        let expires_at = issued_at + Duration::minutes(TOKEN_LIFETIME_MINUTES);
        let claims = Claims {
            id: identity.id(),
            role: identity.role(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(Into::into)
    }

    /// Extracts the token from an `Authorization` header value.
    #[must_use]
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Verifies the raw `Authorization` header and returns the caller identity.
    ///
    /// # Errors
    /// - [`Error::Unauthenticated`] when the header or bearer token is missing
    /// - [`Error::InvalidToken`] when the token is malformed, expired or forged
    pub fn verify(&self, raw_header: Option<&str>) -> Result<Identity> {
        let Some(token) = raw_header.and_then(Self::extract_from_header) else {
            warn!("auth_missing: no bearer token in authorization header");
            return Err(Error::Unauthenticated);
        };

        self.verify_token(token)
            .map(|claims| Identity::from_claims(&claims))
    }

    /// Validates a bare token and returns its claims.
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let reason = match e.kind() {
                    ErrorKind::ExpiredSignature => "token expired".to_string(),
                    ErrorKind::InvalidSignature => "invalid signature".to_string(),
                    _ => format!("token validation failed: {e}"),
                };
                warn!(reason = %reason, "auth_failed");
                Error::InvalidToken { reason }
            })
    }
}
