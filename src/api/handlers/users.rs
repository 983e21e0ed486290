//! Follow graph endpoints: profiles, follow/unfollow, and suggestions.
//!
//! Flow Overview:
//! 1) Authenticate the request via session cookie.
//! 2) Follow/unfollow mutates both sides of the edge with two independent
//!    row updates (no cross-record transaction).
//! 3) Suggestions oversample a random pool, then filter and truncate.

use axum::{
    Json,
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

use super::auth::{
    principal::require_auth,
    state::AuthState,
    storage::{self, RelationField},
    types::{FollowAction, FollowResponse, UserResponse},
};
use super::error::ApiError;

/// Fixed random-pool size for suggestions, independent of the final limit.
const SUGGESTION_POOL_SIZE: i64 = 10;
const SUGGESTION_LIMIT: usize = 4;

#[utoipa::path(
    get,
    path = "/users/{username}",
    params(
        ("username" = String, Path, description = "Username to look up")
    ),
    responses(
        (status = 200, description = "Public projection of the requested user", body = UserResponse),
        (status = 401, description = "Missing or invalid session cookie"),
        (status = 404, description = "Unknown username")
    ),
    tag = "users"
)]
pub async fn get_user_profile(
    Path(username): Path<String>,
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> Result<Response, ApiError> {
    require_auth(&headers, &pool, &auth_state).await?;

    let Some(user) = storage::fetch_user_by_username(&pool, username.trim()).await? else {
        return Err(ApiError::NotFound("User not found"));
    };
    Ok((StatusCode::OK, Json(user)).into_response())
}

#[utoipa::path(
    post,
    path = "/users/follow/{id}",
    params(
        ("id" = String, Path, description = "Target user id")
    ),
    responses(
        (status = 200, description = "Which transition occurred", body = FollowResponse),
        (status = 400, description = "Self-follow or malformed id", body = String),
        (status = 401, description = "Missing or invalid session cookie"),
        (status = 404, description = "Unknown target user")
    ),
    tag = "users"
)]
pub async fn follow_or_unfollow(
    Path(id): Path<String>,
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> Result<Response, ApiError> {
    let principal = require_auth(&headers, &pool, &auth_state).await?;

    let Ok(target_id) = Uuid::parse_str(id.trim()) else {
        return Err(ApiError::InvalidInput("Invalid user id"));
    };
    if target_id == principal.user_id {
        return Err(ApiError::InvalidInput(
            "You can't follow or unfollow yourself",
        ));
    }
    if !storage::user_exists(&pool, target_id).await? {
        return Err(ApiError::NotFound("User not found"));
    }

    // The two updates below touch two different rows and are not wrapped in
    // a transaction: a crash between them leaves the edge half-applied until
    // the next transition on the same pair repairs it.
    let action = if storage::is_following(&pool, principal.user_id, target_id).await? {
        storage::remove_from_set(&pool, target_id, RelationField::Followers, principal.user_id)
            .await?;
        storage::remove_from_set(&pool, principal.user_id, RelationField::Following, target_id)
            .await?;
        FollowAction::Unfollowed
    } else {
        storage::add_to_set(&pool, target_id, RelationField::Followers, principal.user_id).await?;
        storage::add_to_set(&pool, principal.user_id, RelationField::Following, target_id).await?;

        // Best-effort side effect; the relationship change is not rolled back.
        if let Err(err) =
            storage::record_follow_notification(&pool, principal.user_id, target_id).await
        {
            error!("Failed to record follow notification: {err:#}");
        }
        FollowAction::Followed
    };

    Ok((StatusCode::OK, Json(FollowResponse { action })).into_response())
}

#[utoipa::path(
    get,
    path = "/users/suggested",
    responses(
        (status = 200, description = "Up to four users the caller does not follow yet", body = [UserResponse]),
        (status = 401, description = "Missing or invalid session cookie")
    ),
    tag = "users"
)]
pub async fn suggested_users(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> Result<Response, ApiError> {
    let principal = require_auth(&headers, &pool, &auth_state).await?;

    let following = storage::fetch_following(&pool, principal.user_id).await?;
    let sampled =
        storage::sample_users_excluding(&pool, principal.user_id, SUGGESTION_POOL_SIZE).await?;

    let suggested = filter_suggestions(sampled, &following);
    Ok((StatusCode::OK, Json(suggested)).into_response())
}

/// Drop already-followed users from the sampled pool and truncate.
///
/// The pool is drawn before this filter runs, so heavy overlap with the
/// caller's follows can yield fewer than the limit; that shortfall is the
/// intended trade for skipping an exclusion clause in the sampling query.
fn filter_suggestions(sampled: Vec<UserResponse>, following: &[Uuid]) -> Vec<UserResponse> {
    let following: Vec<String> = following.iter().map(ToString::to_string).collect();
    sampled
        .into_iter()
        .filter(|user| !following.contains(&user.id))
        .take(SUGGESTION_LIMIT)
        .collect()
}
