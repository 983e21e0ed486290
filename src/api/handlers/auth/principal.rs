//! Authenticated principal extraction.
//!
//! Flow Overview: read the session cookie, verify the token, and resolve the
//! subject to a public projection. The returned principal is the only way
//! downstream handlers learn who is calling; nothing is written here.

use axum::http::HeaderMap;
use sqlx::PgPool;
use uuid::Uuid;

use super::{session::extract_session_token, state::AuthState, storage, types::UserResponse};
use crate::api::handlers::error::ApiError;

/// Authenticated user context derived from the session cookie.
#[derive(Clone, Debug)]
pub struct Principal {
    pub user_id: Uuid,
    pub user: UserResponse,
}

/// Resolve the session cookie into a principal.
///
/// Missing or invalid tokens yield `Unauthorized`; a valid token whose
/// subject no longer exists yields `NotFound`.
pub async fn require_auth(
    headers: &HeaderMap,
    pool: &PgPool,
    auth_state: &AuthState,
) -> Result<Principal, ApiError> {
    let Some(token) = extract_session_token(headers) else {
        return Err(ApiError::Unauthorized);
    };
    let Some(user_id) = auth_state.tokens().verify(&token) else {
        return Err(ApiError::Unauthorized);
    };
    let Some(user) = storage::fetch_user_by_id(pool, user_id).await? else {
        return Err(ApiError::NotFound("User not found"));
    };
    Ok(Principal { user_id, user })
}
