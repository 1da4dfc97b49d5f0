/// Configuration management for the API server
///
/// Configuration comes from environment variables, with a `.env` file loaded
/// first when present.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `CORS_ORIGINS`: Comma-separated http(s) origins, `*` for permissive (default: *)
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `JWT_SECRET`: Secret key for token signing, at least 32 bytes (required)
/// - `GOOGLE_AUDIENCE`: OAuth client id for federated login (optional)
/// - `COMMENT_SCOPE_POLICY`: `unscoped` or `tenant_scoped` (default: unscoped)
/// - `RUST_LOG`: Log filter
///
/// # Example
///
/// ```no_run
/// use construct_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use construct_shared::services::CommentScopePolicy;
use serde::{Deserialize, Serialize};
use std::env;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub google: GoogleConfig,
    pub comments: CommentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// Allowed CORS origins; `*` means any
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for token signing
    ///
    /// IMPORTANT: This must be kept secret and should be at least 32 bytes.
    /// Generate with: `openssl rand -hex 32`
    #[serde(skip_serializing)]
    pub secret: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// Expected `aud` of Google ID tokens; federated login is off when None
    pub audience: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentConfig {
    pub policy: CommentScopePolicy,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing
    /// - Environment variables have invalid values
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let api_port = lookup("API_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("API_PORT is invalid: {}", e))?;

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if let Some(bad) = cors_origins.iter().find(|o| !is_valid_origin(o)) {
            anyhow::bail!(
                "CORS_ORIGINS entry '{}' must be '*' or an http(s) origin",
                bad
            );
        }

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse::<u32>()
            .map_err(|e| anyhow::anyhow!("DATABASE_MAX_CONNECTIONS is invalid: {}", e))?;

        let jwt_secret = lookup("JWT_SECRET")
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let audience = lookup("GOOGLE_AUDIENCE").filter(|s| !s.trim().is_empty());

        let policy = match lookup("COMMENT_SCOPE_POLICY") {
            None => CommentScopePolicy::default(),
            Some(raw) => raw.trim().parse::<CommentScopePolicy>().map_err(|_| {
                anyhow::anyhow!(
                    "COMMENT_SCOPE_POLICY must be 'unscoped' or 'tenant_scoped', got '{}'",
                    raw
                )
            })?,
        };

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig { secret: jwt_secret },
            google: GoogleConfig { audience },
            comments: CommentConfig { policy },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

/// `*`, or a scheme-qualified origin usable as a header value
fn is_valid_origin(origin: &str) -> bool {
    if origin == "*" {
        return true;
    }

    let host = origin
        .strip_prefix("https://")
        .or_else(|| origin.strip_prefix("http://"));

    matches!(host, Some(h) if !h.is_empty() && !h.contains(char::is_whitespace))
        && axum::http::HeaderValue::from_str(origin).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgresql://localhost/test"),
            ("JWT_SECRET", SECRET),
        ]))
        .unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.api.cors_origins, vec!["*".to_string()]);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.google.audience, None);
        assert_eq!(config.comments.policy, CommentScopePolicy::Unscoped);
    }

    #[test]
    fn test_explicit_values() {
        let config = Config::from_lookup(lookup_from(&[
            ("API_HOST", "127.0.0.1"),
            ("API_PORT", "9000"),
            ("CORS_ORIGINS", "https://app.example.com, https://admin.example.com"),
            ("DATABASE_URL", "postgresql://localhost/test"),
            ("JWT_SECRET", SECRET),
            ("GOOGLE_AUDIENCE", "client.apps.googleusercontent.com"),
            ("COMMENT_SCOPE_POLICY", "tenant_scoped"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.api.cors_origins.len(), 2);
        assert_eq!(
            config.google.audience.as_deref(),
            Some("client.apps.googleusercontent.com")
        );
        assert_eq!(config.comments.policy, CommentScopePolicy::TenantScoped);
    }

    #[test]
    fn test_short_secret_rejected() {
        let result = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgresql://localhost/test"),
            ("JWT_SECRET", "short"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_database_url_rejected() {
        assert!(Config::from_lookup(lookup_from(&[("JWT_SECRET", SECRET)])).is_err());
    }

    #[test]
    fn test_invalid_cors_origin_rejected() {
        for origins in ["app.example.com", "https://ok.example.com,ftp://files", "https://"] {
            let result = Config::from_lookup(lookup_from(&[
                ("DATABASE_URL", "postgresql://localhost/test"),
                ("JWT_SECRET", SECRET),
                ("CORS_ORIGINS", origins),
            ]));
            assert!(result.is_err(), "accepted {:?}", origins);
        }
    }

    #[test]
    fn test_origin_validation() {
        assert!(is_valid_origin("*"));
        assert!(is_valid_origin("http://localhost:3000"));
        assert!(is_valid_origin("https://app.example.com"));
        assert!(!is_valid_origin("https://bad host"));
        assert!(!is_valid_origin("localhost:3000"));
    }

    #[test]
    fn test_unknown_comment_policy_rejected() {
        let result = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgresql://localhost/test"),
            ("JWT_SECRET", SECRET),
            ("COMMENT_SCOPE_POLICY", "strict"),
        ]));
        assert!(result.is_err());
    }
}
