//! Login endpoint.

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Response},
};
use sqlx::PgPool;
use std::sync::Arc;

use super::{
    session::session_cookie, state::AuthState, storage, types::LoginRequest,
    utils::verify_password,
};
use crate::api::handlers::error::ApiError;

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login accepted, session cookie set", body = super::types::UserResponse),
        (status = 400, description = "Invalid username or password", body = String)
    ),
    tag = "auth"
)]
pub async fn login(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> Result<Response, ApiError> {
    let Some(Json(request)) = payload else {
        return Err(ApiError::InvalidInput("Missing payload"));
    };

    let record = storage::lookup_credentials(&pool, request.username.trim()).await?;

    // The hash comparison also runs for unknown usernames so both failure
    // modes cost the same and collapse into one generic error.
    let verified = verify_password(
        &request.password,
        record.as_ref().map(|record| record.password_hash.as_str()),
    );
    let Some(record) = record else {
        return Err(ApiError::InvalidCredential);
    };
    if !verified {
        return Err(ApiError::InvalidCredential);
    }

    let Some(user) = storage::fetch_user_by_id(&pool, record.user_id).await? else {
        return Err(ApiError::InvalidCredential);
    };

    let token = auth_state.tokens().issue(record.user_id)?;
    let cookie = session_cookie(auth_state.config(), &token)
        .map_err(|err| ApiError::Internal(err.into()))?;
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);

    Ok((StatusCode::OK, headers, Json(user)).into_response())
}

#[cfg(test)]
mod tests {
    use super::login;
    use crate::api::handlers::auth::{
        state::{AuthConfig, AuthState},
        token::TokenService,
    };
    use axum::{extract::Extension, http::StatusCode, response::IntoResponse};
    use secrecy::SecretString;
    use sqlx::postgres::PgPoolOptions;
    use std::sync::Arc;

    #[tokio::test]
    async fn login_missing_payload() -> anyhow::Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let auth_state = Arc::new(AuthState::new(
            AuthConfig::new("http://localhost:3000".to_string()),
            TokenService::new(&SecretString::from("test-secret"), 60),
        ));
        let response = login(Extension(pool), Extension(auth_state), None)
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }
}
