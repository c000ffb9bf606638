use chrono::{Duration, Utc};
use crewdeck_config::AuthSettings;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("missing credential")]
    MissingCredential,
    #[error("invalid or expired credential")]
    InvalidCredential,
}

/// Claims carried by a bearer credential from the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The provider's stable subject identifier.
    pub sub: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    /// Credential id, checked against the revocation list.
    pub jti: String,
}

/// The outcome of verifying a bearer credential. Produced fresh per
/// request and never persisted.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    pub subject_id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub picture_url: Option<String>,
    /// The credential's `jti`, used for revocation checks and for
    /// revoking the credential on account deletion.
    pub credential_id: String,
    /// Unix seconds at which the credential expires.
    pub expires_at: i64,
}

/// Verifies bearer credentials against the configured identity
/// provider secret. Pure verification: no side effects, safe to call
/// concurrently and repeatedly. Revocation is checked separately
/// against the store by the request pipeline.
pub struct IdentityService {
    settings: AuthSettings,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl IdentityService {
    pub fn new(settings: AuthSettings) -> Self {
        let encoding_key = EncodingKey::from_secret(settings.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(settings.secret.as_bytes());
        Self {
            settings,
            encoding_key,
            decoding_key,
        }
    }

    /// Verify a raw Authorization header value. The `Bearer ` scheme
    /// prefix is required; anything else is a missing credential.
    pub fn verify_bearer(&self, header_value: &str) -> Result<VerifiedIdentity, IdentityError> {
        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or(IdentityError::MissingCredential)?;
        self.verify(token)
    }

    /// Verify a credential's signature, expiry and issuer. Any failure
    /// (malformed, expired, signature mismatch) collapses to the same
    /// terminal error; the caller must re-authenticate, never retry.
    pub fn verify(&self, token: &str) -> Result<VerifiedIdentity, IdentityError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.settings.issuer]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| IdentityError::InvalidCredential)?;

        let claims = token_data.claims;
        Ok(VerifiedIdentity {
            subject_id: claims.sub,
            email: claims.email,
            display_name: claims.name,
            picture_url: claims.picture,
            credential_id: claims.jti,
            expires_at: claims.exp,
        })
    }

    /// Mint a credential the way the identity provider would. Used by
    /// the test fixtures and local development tooling; production
    /// credentials come from the external provider.
    pub fn issue(
        &self,
        subject_id: &str,
        email: Option<&str>,
        display_name: Option<&str>,
        picture_url: Option<&str>,
    ) -> Result<String, IdentityError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject_id.to_string(),
            email: email.map(str::to_string),
            name: display_name.map(str::to_string),
            picture: picture_url.map(str::to_string),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.settings.credential_ttl_secs as i64)).timestamp(),
            iss: self.settings.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| IdentityError::InvalidCredential)
    }
}
