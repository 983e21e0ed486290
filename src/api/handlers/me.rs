//! Authenticated self-service endpoints.
//!
//! Flow Overview:
//! 1) Authenticate via session cookie.
//! 2) `GET /me` echoes the resolved public projection.
//! 3) `PATCH /users/me` applies a merge-patch: only present, non-empty
//!    fields overwrite, password changes need both password fields, and
//!    image blobs go through the media store.

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use base64::Engine;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::warn;

use super::auth::{
    principal::require_auth,
    state::AuthState,
    storage::{self, ProfilePatch, ProfileUpdateOutcome},
    types::ProfileUpdateRequest,
    utils::{
        MIN_PASSWORD_LEN, hash_password, normalize_email, normalize_optional, valid_email,
        verify_password,
    },
};
use super::error::ApiError;
use crate::api::media::MediaStore;

#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Public projection of the authenticated user", body = super::auth::types::UserResponse),
        (status = 401, description = "Missing or invalid session cookie"),
        (status = 404, description = "Token subject no longer exists")
    ),
    tag = "users"
)]
pub async fn get_me(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> Result<Response, ApiError> {
    let principal = require_auth(&headers, &pool, &auth_state).await?;
    Ok((StatusCode::OK, Json(principal.user)).into_response())
}

#[utoipa::path(
    patch,
    path = "/users/me",
    request_body = ProfileUpdateRequest,
    responses(
        (status = 200, description = "Profile updated", body = super::auth::types::UserResponse),
        (status = 400, description = "Validation error, bad current password, or duplicate username/email", body = String),
        (status = 401, description = "Missing or invalid session cookie"),
        (status = 404, description = "Token subject no longer exists")
    ),
    tag = "users"
)]
pub async fn update_me(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    media: Extension<Arc<dyn MediaStore>>,
    payload: Option<Json<ProfileUpdateRequest>>,
) -> Result<Response, ApiError> {
    let principal = require_auth(&headers, &pool, &auth_state).await?;
    let Some(Json(request)) = payload else {
        return Err(ApiError::InvalidInput("Missing payload"));
    };

    let email = match normalize_optional(request.email) {
        Some(email) => {
            let email = normalize_email(&email);
            if !valid_email(&email) {
                return Err(ApiError::InvalidInput("Invalid email format"));
            }
            Some(email)
        }
        None => None,
    };

    let password_hash = match (
        normalize_optional(request.current_password),
        normalize_optional(request.new_password),
    ) {
        (None, None) => None,
        (Some(current), Some(new)) => {
            let stored = storage::lookup_password_hash(&pool, principal.user_id).await?;
            if !verify_password(&current, stored.as_deref()) {
                return Err(ApiError::InvalidCredential);
            }
            if new.len() < MIN_PASSWORD_LEN {
                return Err(ApiError::InvalidInput(
                    "Password must be at least 6 characters",
                ));
            }
            Some(hash_password(&new)?)
        }
        _ => {
            return Err(ApiError::InvalidInput(
                "Please provide both current password and new password",
            ));
        }
    };

    let profile_image_url = replace_image(
        &**media,
        normalize_optional(request.profile_image),
        principal.user.profile_image_url.as_deref(),
    )?;
    let cover_image_url = replace_image(
        &**media,
        normalize_optional(request.cover_image),
        principal.user.cover_image_url.as_deref(),
    )?;

    let patch = ProfilePatch {
        full_name: normalize_optional(request.full_name),
        username: normalize_optional(request.username),
        email,
        bio: normalize_optional(request.bio),
        link: normalize_optional(request.link),
        password_hash,
        profile_image_url,
        cover_image_url,
    };

    if patch.is_empty() {
        return Err(ApiError::InvalidInput("No updates provided"));
    }

    match storage::update_profile(&pool, principal.user_id, patch).await? {
        ProfileUpdateOutcome::Updated(user) => Ok((StatusCode::OK, Json(user)).into_response()),
        ProfileUpdateOutcome::Conflict => {
            Err(ApiError::Conflict("Username or email already taken"))
        }
        ProfileUpdateOutcome::Missing => Err(ApiError::NotFound("User not found")),
    }
}

/// Upload a new image blob and best-effort delete the replaced one.
///
/// Malformed base64 is the caller's fault and fails the request; media-store
/// failures are logged and leave the stored reference unchanged.
fn replace_image(
    media: &dyn MediaStore,
    blob_base64: Option<String>,
    previous_ref: Option<&str>,
) -> Result<Option<String>, ApiError> {
    let Some(blob_base64) = blob_base64 else {
        return Ok(None);
    };
    let blob = base64::engine::general_purpose::STANDARD
        .decode(blob_base64.trim())
        .map_err(|_| ApiError::InvalidInput("Invalid image payload"))?;

    let image_ref = match media.upload(&blob) {
        Ok(image_ref) => image_ref,
        Err(err) => {
            warn!("media upload failed, keeping previous image: {err:#}");
            return Ok(None);
        }
    };

    if let Some(previous) = previous_ref {
        if let Err(err) = media.delete(previous) {
            warn!(image_ref = %previous, "failed to delete replaced image: {err:#}");
        }
    }

    Ok(Some(image_ref))
}

#[cfg(test)]
mod tests {
    use super::replace_image;
    use crate::api::{
        handlers::error::ApiError,
        media::{LogMediaStore, MediaStore},
    };
    use anyhow::anyhow;
    use base64::Engine;

    struct FailingStore;

    impl MediaStore for FailingStore {
        fn upload(&self, _blob: &[u8]) -> anyhow::Result<String> {
            Err(anyhow!("upstream down"))
        }

        fn delete(&self, _image_ref: &str) -> anyhow::Result<()> {
            Err(anyhow!("upstream down"))
        }
    }

    #[test]
    fn absent_blob_leaves_reference_unset() -> Result<(), ApiError> {
        let result = replace_image(&LogMediaStore, None, Some("memory://media/old"))?;
        assert_eq!(result, None);
        Ok(())
    }

    #[test]
    fn malformed_base64_is_invalid_input() {
        let result = replace_image(&LogMediaStore, Some("%%%".to_string()), None);
        assert!(matches!(result, Err(ApiError::InvalidInput(_))));
    }

    #[test]
    fn upload_returns_new_reference_and_survives_delete_failure() -> Result<(), ApiError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"image bytes");
        let result = replace_image(&LogMediaStore, Some(encoded), Some("memory://media/old"))?;
        assert!(result.is_some_and(|r| r.starts_with("memory://media/")));
        Ok(())
    }

    #[test]
    fn upload_failure_is_non_fatal() -> Result<(), ApiError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"image bytes");
        let result = replace_image(&FailingStore, Some(encoded), None)?;
        assert_eq!(result, None);
        Ok(())
    }
}
