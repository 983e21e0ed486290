use crate::api::{self, handlers::auth::state::AuthConfig};
use anyhow::Result;
use secrecy::SecretString;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub jwt_secret: SecretString,
    pub session_ttl_days: i64,
    pub frontend_base_url: String,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the database connection or server startup fails.
pub async fn execute(args: Args) -> Result<()> {
    let auth_config = AuthConfig::new(args.frontend_base_url)
        .with_session_ttl_seconds(args.session_ttl_days * 24 * 60 * 60);

    api::new(args.port, args.dsn, args.jwt_secret, auth_config).await
}

#[cfg(test)]
mod tests {
    use super::Args;
    use secrecy::SecretString;

    #[test]
    fn args_debug_hides_nothing_but_secret_is_redacted() {
        let args = Args {
            port: 8080,
            dsn: "postgres://localhost/flock".to_string(),
            jwt_secret: SecretString::from("sekret"),
            session_ttl_days: 15,
            frontend_base_url: "http://localhost:3000".to_string(),
        };
        let rendered = format!("{args:?}");
        assert!(rendered.contains("8080"));
        assert!(!rendered.contains("sekret"));
    }
}
