// ABOUTME: Request authentication from the access_token cookie or an Authorization bearer header
// ABOUTME: Resolves the caller and answers ownership questions for account and training routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use axum::http::{header, HeaderMap};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::auth::{AuthManager, ACCESS_TOKEN_COOKIE};
use crate::errors::{AppError, AppResult};
use crate::models::UserRole;

/// Caller resolved from a valid session token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Caller's user id
    pub user_id: Uuid,
    /// Caller's role at token issue time
    pub role: UserRole,
}

impl AuthenticatedUser {
    /// The caller is `target` or an admin
    #[must_use]
    pub fn can_modify_account(&self, target: Uuid) -> bool {
        self.user_id == target || self.role.is_admin()
    }

    /// The caller is `target`, a coach or an admin
    #[must_use]
    pub fn can_manage_training_for(&self, target: Uuid) -> bool {
        self.user_id == target || self.role.can_manage_training()
    }

    /// Require account-level access to `target`
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` with `message` otherwise.
    pub fn require_account_access(&self, target: Uuid, message: &str) -> AppResult<()> {
        if self.can_modify_account(target) {
            Ok(())
        } else {
            Err(AppError::permission_denied(message))
        }
    }

    /// Require training-level access to `target`
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` otherwise.
    pub fn require_training_access(&self, target: Uuid) -> AppResult<()> {
        if self.can_manage_training_for(target) {
            Ok(())
        } else {
            Err(AppError::permission_denied(
                "You can only manage your own training",
            ))
        }
    }
}

/// Find the session token: cookie first, then `Authorization: Bearer`
#[must_use]
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(ACCESS_TOKEN_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_owned());
        }
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
}

/// Authenticate a request from its headers
///
/// # Errors
///
/// Missing token gives 401, expired token 401, invalid or malformed token 403.
#[tracing::instrument(skip(headers, auth_manager), fields(user_id = tracing::field::Empty))]
pub fn authenticate_request(
    headers: &HeaderMap,
    auth_manager: &AuthManager,
) -> AppResult<AuthenticatedUser> {
    let token = extract_token(headers).ok_or_else(AppError::auth_required)?;
    let claims = auth_manager.validate_token(&token)?;
    let user_id = claims.user_id()?;
    tracing::Span::current().record("user_id", user_id.to_string());

    Ok(AuthenticatedUser {
        user_id,
        role: claims.role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_cookie_takes_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; access_token=from-cookie"),
        );
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from-header"),
        );
        assert_eq!(extract_token(&headers).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn test_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );
        assert_eq!(extract_token(&headers).as_deref(), Some("abc.def.ghi"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic xyz"));
        assert!(extract_token(&headers).is_none());
    }

    #[test]
    fn test_training_access_rules() {
        let athlete = Uuid::new_v4();
        let other = Uuid::new_v4();
        let user = AuthenticatedUser {
            user_id: athlete,
            role: UserRole::User,
        };
        let coach = AuthenticatedUser {
            user_id: other,
            role: UserRole::Coach,
        };
        assert!(user.can_manage_training_for(athlete));
        assert!(!user.can_manage_training_for(other));
        assert!(coach.can_manage_training_for(athlete));
        assert!(!coach.can_modify_account(athlete));
    }
}
