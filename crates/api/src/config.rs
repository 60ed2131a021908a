use reviews_core::language::{Language, DEFAULT_LANGUAGE};
use reviews_core::slug::{SlugPolicy, DEFAULT_QUALIFY_ATTEMPTS};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development except the JWT
/// secret.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Time allowed for draining the pool on shutdown (default: `30`).
    pub shutdown_timeout_secs: u64,
    pub jwt: JwtConfig,
    /// Language assumed for writes that do not name one.
    pub default_language: Language,
    /// Reserved slug names and qualification retry limit.
    pub slug_policy: SlugPolicy,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `3000`                     |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                       |
    /// | `DEFAULT_LANGUAGE`      | `en`                       |
    /// | `RESERVED_SLUGS`        | (built-in list only)       |
    /// | `SLUG_QUALIFY_ATTEMPTS` | `2`                        |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = split_list(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let default_language: Language = std::env::var("DEFAULT_LANGUAGE")
            .map(|code| code.parse().expect("DEFAULT_LANGUAGE must be a supported language"))
            .unwrap_or(DEFAULT_LANGUAGE);

        let max_qualify_attempts: u32 = std::env::var("SLUG_QUALIFY_ATTEMPTS")
            .unwrap_or_else(|_| DEFAULT_QUALIFY_ATTEMPTS.to_string())
            .parse()
            .expect("SLUG_QUALIFY_ATTEMPTS must be a valid u32");
        assert!(max_qualify_attempts > 0, "SLUG_QUALIFY_ATTEMPTS must be positive");

        let mut slug_policy = SlugPolicy::default()
            .with_reserved(split_list(&std::env::var("RESERVED_SLUGS").unwrap_or_default()));
        slug_policy.max_qualify_attempts = max_qualify_attempts;

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt: JwtConfig::from_env(),
            default_language,
            slug_policy,
        }
    }

    /// The language of a write: the requested one, else the site default.
    pub fn language_or_default(&self, requested: Option<Language>) -> Language {
        requested.unwrap_or(self.default_language)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
