use base64::Engine;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dexdle_types::User;

/// Audience the hosted auth service puts on access tokens for signed-in users.
pub const TOKEN_AUDIENCE: &str = "authenticated";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserMetadata {
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    pub sub: String,                  // Subject (user ID)
    pub exp: u64,                     // Expiry
    pub aud: Option<String>,          // Audience
    pub email: Option<String>,        // User email - absent for phone sign-ins
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

impl AccessTokenClaims {
    fn into_user(self) -> Result<User, AuthError> {
        let id = Uuid::parse_str(&self.sub).map_err(|_| {
            tracing::warn!("Token subject '{}' is not a UUID", self.sub);
            AuthError::InvalidToken
        })?;

        let email = self.email.unwrap_or_default();
        let display_name = self
            .user_metadata
            .name
            .or(self.user_metadata.full_name)
            .or(self.user_metadata.user_name)
            .or_else(|| email.split('@').next().filter(|s| !s.is_empty()).map(str::to_string))
            .unwrap_or_else(|| "Trainer".to_string());

        Ok(User {
            id,
            email,
            display_name,
        })
    }
}

/// Validates access tokens issued by the hosted auth provider (HS256, shared
/// secret). Dev mode skips signature checks entirely.
pub struct AuthService {
    decoding_key: Option<DecodingKey>,
    dev_mode: bool,
}

impl AuthService {
    pub fn new(jwt_secret: &str) -> Self {
        Self {
            decoding_key: Some(DecodingKey::from_secret(jwt_secret.as_bytes())),
            dev_mode: false,
        }
    }

    pub fn new_dev_mode() -> Self {
        Self {
            decoding_key: None,
            dev_mode: true,
        }
    }

    pub fn is_dev_mode(&self) -> bool {
        self.dev_mode
    }

    /// Resolve the `Authorization` header, if any. No header means an
    /// anonymous player; a header that does not validate is an error.
    pub fn identify(&self, auth_header: Option<&str>) -> Result<Option<User>, AuthError> {
        match auth_header {
            None => Ok(None),
            Some(header) => {
                let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
                self.validate_token(token).map(Some)
            }
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<User, AuthError> {
        if self.dev_mode {
            return self.validate_dev_token(token);
        }

        let decoding_key = self.decoding_key.as_ref().ok_or(AuthError::InvalidKey)?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[TOKEN_AUDIENCE]);
        validation.validate_exp = true;

        let token_data = decode::<AccessTokenClaims>(token, decoding_key, &validation)
            .map_err(|e| {
                tracing::warn!("Access token validation failed: {:?}", e);
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    jsonwebtoken::errors::ErrorKind::InvalidAudience => AuthError::AudienceMismatch,
                    _ => AuthError::InvalidToken,
                }
            })?;

        tracing::debug!("Validated token for subject {}", token_data.claims.sub);
        token_data.claims.into_user()
    }

    fn validate_dev_token(&self, token: &str) -> Result<User, AuthError> {
        let preview: String = token.chars().take(20).collect();
        tracing::debug!("Validating dev token (first 20 chars): {}", preview);

        // A JWT: read the payload without checking the signature
        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() == 3 {
            let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD
                .decode(parts[1].trim_end_matches('='))
                .map_err(|e| {
                    tracing::warn!("Failed to decode JWT payload in dev mode: {:?}", e);
                    AuthError::InvalidToken
                })?;

            let claims: AccessTokenClaims = serde_json::from_slice(&payload).map_err(|e| {
                tracing::warn!("Failed to parse JWT claims in dev mode: {:?}", e);
                AuthError::InvalidToken
            })?;
            return claims.into_user();
        }

        // Simple string format: "user_id:email:name"
        let fields: Vec<&str> = token.splitn(3, ':').collect();
        if let [id, email, name] = fields.as_slice() {
            let id = Uuid::parse_str(id).map_err(|_| AuthError::InvalidToken)?;
            return Ok(User {
                id,
                email: email.to_string(),
                display_name: name.to_string(),
            });
        }

        Err(AuthError::InvalidToken)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Invalid key")]
    InvalidKey,
    #[error("Audience mismatch")]
    AudienceMismatch,
}
