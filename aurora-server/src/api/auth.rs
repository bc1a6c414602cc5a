//! Registration and sign-in.
//!
//! # Endpoints
//!
//! - `POST /register`        – create an account and sign in
//! - `POST /register/auth0`  – create an account for an e-mail verified by the identity provider
//! - `POST /login`           – sign in with e-mail and password
//! - `GET  /logout`          – clear the session cookie
//! - `GET  /profile`         – the signed-in user

use aurora_core::entities::users::{CreateExternalUser, CreateUser, GetUserByEmail, UserRecord};
use aurora_core::password;
use aurora_sdk::objects::ApiResponse;
use aurora_sdk::objects::user::{
    ExternalRegisterRequest, LoginRequest, RegisterRequest, UserProfile,
};
use aurora_sdk::session::{self, SessionClaims};
use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use kanau::processor::Processor;

use super::extractors::{SessionUser, ValidJson};
use super::{ApiError, ApiResult, conflict_as, ok};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/register/auth0", post(register_external))
        .route("/login", post(login))
        .route("/logout", get(logout))
        .route("/profile", get(profile))
}

/// `Set-Cookie` value carrying a fresh session for `user`.
async fn session_cookie(state: &AppState, user: &UserRecord) -> Result<String, ApiError> {
    let session_config = state.config.session.read().await;
    let claims = SessionClaims::new(user.id, user.role.into(), session_config.max_age_secs);
    let token = session::issue(&claims, session_config.secret()).map_err(|e| {
        tracing::error!(error = %e, "Failed to issue session token");
        ApiError::Internal
    })?;
    Ok(session::set_cookie(
        &token,
        session_config.max_age_secs,
        session_config.secure_cookie,
    ))
}

async fn hash_password(plaintext: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || password::hash_password(&plaintext))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Password hashing task failed");
            ApiError::Internal
        })?
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to hash password");
            ApiError::Internal
        })
}

async fn verify_password(plaintext: String, hash: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || password::verify_password(&plaintext, &hash))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Password verification task failed");
            ApiError::Internal
        })
}

async fn register(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = request.email.trim().to_lowercase();
    if state
        .db
        .process(GetUserByEmail {
            email: email.clone(),
        })
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("User already exists."));
    }

    let password_hash = hash_password(request.password).await?;
    let user = state
        .db
        .process(CreateUser {
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            email,
            password_hash,
        })
        .await
        .map_err(conflict_as("User already exists."))?;
    tracing::info!(user_id = user.id, "Account registered");

    let cookie = session_cookie(&state, &user).await?;
    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(ApiResponse::success_with("Registered.", user.profile())),
    ))
}

/// The identity provider's sign-in happens in the browser; only the e-mail
/// reaches this route, so it creates the account and never issues a session.
async fn register_external(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<ExternalRegisterRequest>,
) -> Result<Response, ApiError> {
    let created = state
        .db
        .process(CreateExternalUser {
            email: request.email.trim().to_lowercase(),
        })
        .await?;
    Ok(external_registration(created))
}

fn external_registration(created: Option<UserRecord>) -> Response {
    match created {
        Some(user) => {
            tracing::info!(user_id = user.id, "Account registered through identity provider");
            (
                StatusCode::CREATED,
                Json(ApiResponse::success_with("Account created.", user.profile())),
            )
                .into_response()
        }
        None => Json(ApiResponse::message("Account exists.")).into_response(),
    }
}

async fn login(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .db
        .process(GetUserByEmail {
            email: request.email.trim().to_lowercase(),
        })
        .await?
        .ok_or(ApiError::NotFound("User not found."))?;

    // Accounts created through the identity provider have no password
    let Some(hash) = user.password.clone() else {
        return Err(ApiError::Validation("Invalid password.".to_string()));
    };
    if !verify_password(request.password, hash).await? {
        tracing::warn!(user_id = user.id, "Failed login");
        return Err(ApiError::Validation("Invalid password.".to_string()));
    }

    let cookie = session_cookie(&state, &user).await?;
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(ApiResponse::success_with("Logged in.", user.profile())),
    ))
}

async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let secure = state.config.session.read().await.secure_cookie;
    (
        [(header::SET_COOKIE, session::clear_cookie(secure))],
        Json(ApiResponse::message("Logged out.")),
    )
}

async fn profile(session: SessionUser) -> ApiResult<UserProfile> {
    ok(session.user.profile())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::user;
    use aurora_core::entities::UserRole;
    use serde_json::{Value, json};

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_external_registration_of_known_email_reveals_nothing() {
        let response = external_registration(None);
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        assert_eq!(
            body_json(response).await,
            json!({"status": "success", "message": "Account exists."})
        );
    }

    #[tokio::test]
    async fn test_external_registration_creates_without_session() {
        let response = external_registration(Some(user(5, UserRole::Customer)));
        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        let body = body_json(response).await;
        assert_eq!(body["data"]["email"], "user5@aurora.test");
        assert_eq!(body["data"]["role"], "customer");
    }
}
