use clap::{Arg, Command};

pub const ARG_JWT_SECRET: &str = "jwt-secret";
pub const ARG_SESSION_TTL_DAYS: &str = "session-ttl-days";
pub const ARG_FRONTEND_BASE_URL: &str = "frontend-base-url";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_JWT_SECRET)
                .long(ARG_JWT_SECRET)
                .help("Secret key used to sign session tokens")
                .env("FLOCK_JWT_SECRET")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_SESSION_TTL_DAYS)
                .long(ARG_SESSION_TTL_DAYS)
                .help("Session token and cookie lifetime in days")
                .env("FLOCK_SESSION_TTL_DAYS")
                .default_value("15")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new(ARG_FRONTEND_BASE_URL)
                .long(ARG_FRONTEND_BASE_URL)
                .help("Frontend base URL, used for CORS and cookie security")
                .env("FLOCK_FRONTEND_BASE_URL")
                .default_value("http://localhost:3000"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_command() -> Command {
        with_args(Command::new("test"))
    }

    #[test]
    fn jwt_secret_required() {
        temp_env::with_vars([("FLOCK_JWT_SECRET", None::<&str>)], || {
            let result = test_command().try_get_matches_from(vec!["test"]);
            assert_eq!(
                result.map_err(|e| e.kind()),
                Err(clap::error::ErrorKind::MissingRequiredArgument)
            );
        });
    }

    #[test]
    fn session_ttl_defaults_to_fifteen_days() {
        temp_env::with_vars([("FLOCK_SESSION_TTL_DAYS", None::<&str>)], || {
            let matches =
                test_command().get_matches_from(vec!["test", "--jwt-secret", "sekret"]);
            assert_eq!(
                matches.get_one::<i64>(ARG_SESSION_TTL_DAYS).copied(),
                Some(15)
            );
        });
    }

    #[test]
    fn frontend_base_url_defaults_to_localhost() {
        temp_env::with_vars([("FLOCK_FRONTEND_BASE_URL", None::<&str>)], || {
            let matches =
                test_command().get_matches_from(vec!["test", "--jwt-secret", "sekret"]);
            assert_eq!(
                matches.get_one::<String>(ARG_FRONTEND_BASE_URL).cloned(),
                Some("http://localhost:3000".to_string())
            );
        });
    }
}
