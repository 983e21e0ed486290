//! Account creation endpoint.

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Response},
};
use sqlx::PgPool;
use std::sync::Arc;

use super::{
    session::session_cookie,
    state::AuthState,
    storage::{self, SignupOutcome},
    types::SignupRequest,
    utils::{MIN_PASSWORD_LEN, hash_password, normalize_email, valid_email},
};
use crate::api::handlers::error::ApiError;

#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created, session cookie set", body = super::types::UserResponse),
        (status = 400, description = "Validation error or duplicate username/email", body = String)
    ),
    tag = "auth"
)]
pub async fn signup(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<SignupRequest>>,
) -> Result<Response, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::InvalidInput("Missing payload"));
    };

    let email = normalize_email(&request.email);
    if !valid_email(&email) {
        return Err(ApiError::InvalidInput("Invalid email format"));
    }

    let username = request.username.trim();
    if username.is_empty() {
        return Err(ApiError::InvalidInput("Username is required"));
    }

    let full_name = request.full_name.trim();
    if full_name.is_empty() {
        return Err(ApiError::InvalidInput("Full name is required"));
    }

    if request.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::InvalidInput(
            "Password must be at least 6 characters",
        ));
    }

    // Two independent friendly checks so the caller learns which field
    // clashed. The unique indexes close the check-then-insert race below.
    if storage::username_exists(&pool, username).await? {
        return Err(ApiError::Conflict("Username already taken"));
    }
    if storage::email_exists(&pool, &email).await? {
        return Err(ApiError::Conflict("Email already taken"));
    }

    let password_hash = hash_password(&request.password)?;
    let outcome = storage::insert_user(&pool, full_name, username, &email, &password_hash).await?;
    let (user_id, user) = match outcome {
        SignupOutcome::Created { user_id, user } => (user_id, user),
        SignupOutcome::Conflict => {
            return Err(ApiError::Conflict("Username or email already taken"));
        }
    };

    let token = auth_state.tokens().issue(user_id)?;
    let cookie = session_cookie(auth_state.config(), &token)
        .map_err(|err| ApiError::Internal(err.into()))?;
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);

    Ok((StatusCode::CREATED, headers, Json(user)).into_response())
}
