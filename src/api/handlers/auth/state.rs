//! Auth configuration and shared per-process state.

use super::token::TokenService;

const DEFAULT_SESSION_TTL_SECONDS: i64 = 15 * 24 * 60 * 60;

#[derive(Clone, Debug)]
pub struct AuthConfig {
    frontend_base_url: String,
    session_ttl_seconds: i64,
}

impl AuthConfig {
    #[must_use]
    pub fn new(frontend_base_url: String) -> Self {
        Self {
            frontend_base_url,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
        }
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: i64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    pub(crate) fn frontend_base_url(&self) -> &str {
        &self.frontend_base_url
    }

    pub(crate) fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    /// Only mark cookies secure when the frontend is served over HTTPS.
    pub(super) fn session_cookie_secure(&self) -> bool {
        self.frontend_base_url.starts_with("https://")
    }
}

pub struct AuthState {
    config: AuthConfig,
    tokens: TokenService,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig, tokens: TokenService) -> Self {
        Self { config, tokens }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthConfig, AuthState, DEFAULT_SESSION_TTL_SECONDS};
    use crate::api::handlers::auth::token::TokenService;
    use secrecy::SecretString;

    #[test]
    fn auth_config_defaults_and_overrides() {
        let config = AuthConfig::new("https://flock.dev".to_string());
        assert_eq!(config.frontend_base_url(), "https://flock.dev");
        assert_eq!(config.session_ttl_seconds(), DEFAULT_SESSION_TTL_SECONDS);
        assert!(config.session_cookie_secure());

        let config = config.with_session_ttl_seconds(60);
        assert_eq!(config.session_ttl_seconds(), 60);
    }

    #[test]
    fn cookie_not_secure_for_plain_http_frontend() {
        let config = AuthConfig::new("http://localhost:3000".to_string());
        assert!(!config.session_cookie_secure());
    }

    #[test]
    fn auth_state_exposes_config_and_tokens() {
        let config = AuthConfig::new("https://flock.dev".to_string());
        let tokens = TokenService::new(&SecretString::from("sekret"), 60);
        let state = AuthState::new(config, tokens);
        assert_eq!(state.config().frontend_base_url(), "https://flock.dev");
        let user_id = uuid::Uuid::new_v4();
        let token = state.tokens().issue(user_id);
        assert!(token.is_ok());
    }
}
