// ABOUTME: JWT session tokens and bcrypt password hashing for Stride accounts
// ABOUTME: Issues HS256 tokens, validates them with detailed failure kinds and hashes off the async executor
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Authentication
//!
//! Tokens are HS256 JWTs signed with the configured secret. A token carries
//! the user id in `sub` and the account role, so handlers can authorize
//! without a database round trip.
//!
//! Password hashing and verification are CPU-bound and run on
//! `tokio::task::spawn_blocking`.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::errors::{join_error, password_hash_error, AppError, AppResult};
use crate::models::{User, UserRole};

/// Name of the session cookie
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Token validation failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JwtValidationError {
    /// Lifetime is over
    TokenExpired {
        /// When it expired
        expired_at: DateTime<Utc>,
    },
    /// Signature or claims did not verify
    TokenInvalid {
        /// Reason reported by the decoder
        reason: String,
    },
    /// Not a JWT at all
    TokenMalformed {
        /// Details about malformation
        details: String,
    },
}

impl fmt::Display for JwtValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TokenExpired { expired_at } => write!(
                f,
                "JWT token expired at {}",
                expired_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            Self::TokenInvalid { reason } => write!(f, "JWT token is invalid: {reason}"),
            Self::TokenMalformed { details } => write!(f, "JWT token is malformed: {details}"),
        }
    }
}

impl std::error::Error for JwtValidationError {}

impl From<JwtValidationError> for AppError {
    fn from(error: JwtValidationError) -> Self {
        let mapped = match &error {
            JwtValidationError::TokenExpired { .. } => Self::auth_expired(),
            JwtValidationError::TokenInvalid { .. } => {
                Self::auth_malformed("Forbidden - Invalid token")
            }
            JwtValidationError::TokenMalformed { .. } => {
                Self::auth_malformed("Forbidden - Malformed token")
            }
        };
        mapped.with_source(error)
    }
}

/// JWT claims for a Stride session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Account role at issue time
    pub role: UserRole,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
}

impl Claims {
    /// Parse the subject as a user id
    ///
    /// # Errors
    ///
    /// Returns a malformed-token error when `sub` is not a UUID.
    pub fn user_id(&self) -> AppResult<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|_| {
            AppError::from(JwtValidationError::TokenMalformed {
                details: "Subject is not a user id".into(),
            })
        })
    }
}

/// Token issuer and verifier plus password hashing policy
#[derive(Clone)]
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_hours: i64,
    bcrypt_cost: u32,
}

impl fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthManager")
            .field("token_expiry_hours", &self.token_expiry_hours)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish_non_exhaustive()
    }
}

impl AuthManager {
    /// Create a manager from a shared secret
    #[must_use]
    pub fn new(secret: &[u8], token_expiry_hours: i64, bcrypt_cost: u32) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            token_expiry_hours,
            bcrypt_cost,
        }
    }

    /// Create a manager from auth configuration
    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.jwt_secret.as_bytes(),
            config.jwt_expiry_hours,
            config.bcrypt_cost,
        )
    }

    /// Issue a session token for `user`
    ///
    /// # Errors
    ///
    /// Returns an internal error if signing fails.
    pub fn generate_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.token_expiry_hours)).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal("Failed to sign token").with_source(e))
    }

    /// Verify a token and return its claims
    ///
    /// # Errors
    ///
    /// Returns the specific validation failure.
    pub fn validate_token_detailed(&self, token: &str) -> Result<Claims, JwtValidationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| Self::convert_jwt_error(&e, token))
    }

    /// Verify a token and map failures to `AppError`
    ///
    /// # Errors
    ///
    /// Expired tokens yield 401, invalid or malformed tokens 403.
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        self.validate_token_detailed(token).map_err(AppError::from)
    }

    fn convert_jwt_error(e: &jsonwebtoken::errors::Error, token: &str) -> JwtValidationError {
        tracing::debug!("JWT token validation failed: {:?}", e);

        match e.kind() {
            ErrorKind::ExpiredSignature => JwtValidationError::TokenExpired {
                expired_at: Self::unverified_expiry(token).unwrap_or_else(Utc::now),
            },
            ErrorKind::InvalidToken => JwtValidationError::TokenMalformed {
                details: "Token format is invalid".into(),
            },
            ErrorKind::Base64(base64_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid base64: {base64_err}"),
            },
            ErrorKind::Json(json_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid JSON: {json_err}"),
            },
            ErrorKind::Utf8(utf8_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid UTF-8: {utf8_err}"),
            },
            ErrorKind::InvalidSignature => JwtValidationError::TokenInvalid {
                reason: "Token signature verification failed".into(),
            },
            _ => JwtValidationError::TokenInvalid {
                reason: format!("Token validation failed: {e}"),
            },
        }
    }

    fn unverified_expiry(token: &str) -> Option<DateTime<Utc>> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        let claims = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
            .ok()?
            .claims;
        DateTime::from_timestamp(claims.exp, 0)
    }

    /// Hash a password with the configured bcrypt cost
    ///
    /// # Errors
    ///
    /// Returns an internal error if hashing fails.
    pub async fn hash_password(&self, password: &str) -> AppResult<String> {
        let password = password.to_owned();
        let cost = self.bcrypt_cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(join_error)?
            .map_err(password_hash_error)
    }

    /// Check a password against a stored hash
    ///
    /// # Errors
    ///
    /// Returns an internal error if the hash cannot be parsed.
    pub async fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(join_error)?
            .map_err(password_hash_error)
    }
}
