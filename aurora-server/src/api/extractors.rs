//! Custom Axum extractors for request authentication and bodies.
//!
//! Provides:
//! - `SessionClaimsOnly`: a verified `access-token` cookie, without a database
//!   lookup.
//! - `SessionUser`: a verified cookie whose user still exists.
//! - `AdminSession`: a verified cookie of an account that is still an admin.
//! - `ValidJson<T>` / `JsonBody<T>`: JSON bodies whose rejections use the
//!   common response envelope.

use aurora_core::entities::UserRole;
use aurora_core::entities::users::{GetUserById, UserRecord};
use aurora_sdk::session::{self, SESSION_COOKIE, SessionClaims};
use aurora_sdk::validation::Validate;
use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Request},
    http::{header, request::Parts},
};
use kanau::processor::Processor;
use serde::de::DeserializeOwned;

use super::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Session cookie
// ---------------------------------------------------------------------------

/// Verified claims of the session cookie.
pub struct SessionClaimsOnly(pub SessionClaims);

impl FromRequestParts<AppState> for SessionClaimsOnly {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(|cookies| session::cookie_value(cookies, SESSION_COOKIE))
            .filter(|token| !token.is_empty())
            .ok_or(ApiError::Unauthorized)?;

        let session_config = state.config.session.read().await;
        let claims = session::verify(token, session_config.secret()).map_err(|e| {
            tracing::debug!(error = %e, "Rejected session token");
            ApiError::Unauthorized
        })?;
        drop(session_config);

        Ok(SessionClaimsOnly(claims))
    }
}

/// The signed-in user. Rejects with 401 when the cookie is missing, invalid
/// or names a user that no longer exists.
pub struct SessionUser {
    pub claims: SessionClaims,
    pub user: UserRecord,
}

impl SessionUser {
    pub fn id(&self) -> i32 {
        self.user.id
    }

    pub fn is_admin(&self) -> bool {
        self.claims.is_admin()
    }
}

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let SessionClaimsOnly(claims) = SessionClaimsOnly::from_request_parts(parts, state).await?;
        let user = state
            .db
            .process(GetUserById { id: claims.sub })
            .await?
            .ok_or(ApiError::Unauthorized)?;
        Ok(SessionUser { claims, user })
    }
}

/// A session of an admin account. Rejects with 401 without a valid session
/// or when the account is gone, and 403 for any other role.
pub struct AdminSession(pub SessionClaims);

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let SessionClaimsOnly(claims) = SessionClaimsOnly::from_request_parts(parts, state).await?;
        if !claims.is_admin() {
            tracing::warn!(user_id = claims.sub, "Non-admin session on admin route");
            return Err(ApiError::Forbidden);
        }
        let user = state.db.process(GetUserById { id: claims.sub }).await?;
        check_admin_account(&claims, user.as_ref())?;
        Ok(AdminSession(claims))
    }
}

/// The stored account decides, so a deleted or demoted admin loses access
/// while the token is still valid.
fn check_admin_account(claims: &SessionClaims, user: Option<&UserRecord>) -> Result<(), ApiError> {
    match user {
        None => {
            tracing::warn!(user_id = claims.sub, "Admin session for a deleted account");
            Err(ApiError::Unauthorized)
        }
        Some(user) if user.role != UserRole::Admin => {
            tracing::warn!(user_id = claims.sub, "Admin session for a demoted account");
            Err(ApiError::Forbidden)
        }
        Some(_) => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// JSON bodies
// ---------------------------------------------------------------------------

/// A JSON body. Malformed JSON becomes a 400 in the common envelope.
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            tracing::warn!(error = %e, "Rejected request body");
            ApiError::Validation("Invalid request body.".to_string())
        })?;
        Ok(JsonBody(value))
    }
}

/// A JSON body that passed [`Validate`].
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let JsonBody(value) = JsonBody::<T>::from_request(req, state).await?;
        value.validate().map_err(|e| {
            tracing::warn!(field = e.field, reason = %e.reason, "Request failed validation");
            ApiError::from(e)
        })?;
        Ok(ValidJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::user;
    use aurora_sdk::objects::Role;
    use axum::http::StatusCode;

    fn admin_claims(id: i32) -> SessionClaims {
        SessionClaims::new(id, Role::Admin, 3600)
    }

    #[test]
    fn test_admin_account_still_admin() {
        let account = user(1, UserRole::Admin);
        assert!(check_admin_account(&admin_claims(1), Some(&account)).is_ok());
    }

    #[test]
    fn test_deleted_admin_is_unauthorized() {
        let err = check_admin_account(&admin_claims(1), None).unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_demoted_admin_is_forbidden() {
        let account = user(1, UserRole::Customer);
        let err = check_admin_account(&admin_claims(1), Some(&account)).unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }
}
