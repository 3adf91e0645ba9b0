use std::env;

use auth::Secret;
use auth::TokenConfig;
use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Postgres connection string; credentials are kept in memory when unset.
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Deserialize, Clone)]
pub struct AuthConfig {
    #[serde(default)]
    pub secret_key: Option<String>,

    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
}

fn default_max_connections() -> u32 {
    5
}

fn default_token_ttl_hours() -> i64 {
    auth::config::DEFAULT_TOKEN_TTL_HOURS
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Flat variables `SECRET_KEY`, `TOKEN_TTL` (hours), `DATABASE_URL`
    /// 2. Nested environment variables (AUTH__SECRET_KEY, SERVER__HTTP_PORT, etc.)
    /// 3. Environment-specific config file (config/{environment}.toml)
    /// 4. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .set_default("server.http_port", 8080_i64)?
            .set_default("auth.token_ttl_hours", default_token_ttl_hours())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: AUTH__SECRET_KEY=... overrides auth.secret_key
            .add_source(Environment::default().separator("__"))
            .set_override_option("auth.secret_key", env::var("SECRET_KEY").ok())?
            .set_override_option("auth.token_ttl_hours", env::var("TOKEN_TTL").ok())?
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }
}

impl AuthConfig {
    /// Build the token configuration.
    ///
    /// A missing or empty secret is replaced by a random per-process secret.
    ///
    /// # Errors
    /// * `ConfigError::Message` - Token lifetime is not positive
    pub fn token_config(&self) -> Result<TokenConfig, ConfigError> {
        if self.token_ttl_hours <= 0 {
            return Err(ConfigError::Message(format!(
                "auth.token_ttl_hours must be positive, got {}",
                self.token_ttl_hours
            )));
        }

        let secret = match self.secret_key.as_deref() {
            Some(secret) if !secret.is_empty() => Secret::from(secret),
            _ => {
                tracing::warn!(
                    "No SECRET_KEY configured; generated a random signing secret. \
                     Issued tokens will not survive a restart"
                );
                Secret::generate()
            }
        };

        Ok(TokenConfig::new(
            secret,
            Duration::hours(self.token_ttl_hours),
        ))
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret_key", &self.secret_key.as_ref().map(|_| "[REDACTED]"))
            .field("token_ttl_hours", &self.token_ttl_hours)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    const ENV_KEYS: [&str; 4] = [
        "SECRET_KEY",
        "TOKEN_TTL",
        "AUTH__SECRET_KEY",
        "AUTH__TOKEN_TTL_HOURS",
    ];

    fn clear_env() {
        for key in ENV_KEYS {
            env::remove_var(key);
        }
    }

    fn auth_config(secret_key: Option<&str>, token_ttl_hours: i64) -> AuthConfig {
        AuthConfig {
            secret_key: secret_key.map(str::to_string),
            token_ttl_hours,
        }
    }

    #[test]
    fn test_token_config_uses_configured_secret() {
        let config = auth_config(Some("configured-secret"), 12)
            .token_config()
            .unwrap();

        assert_eq!(config.secret.as_bytes(), b"configured-secret");
        assert_eq!(config.ttl, Duration::hours(12));
    }

    #[test]
    fn test_token_config_generates_secret_when_missing() {
        let missing = auth_config(None, 24).token_config().unwrap();
        let empty = auth_config(Some(""), 24).token_config().unwrap();

        assert!(!missing.secret.is_empty());
        assert!(!empty.secret.is_empty());
        assert_ne!(missing.secret, empty.secret);
    }

    #[test]
    fn test_token_config_rejects_non_positive_ttl() {
        assert!(auth_config(Some("s"), 0).token_config().is_err());
        assert!(auth_config(Some("s"), -3).token_config().is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let printed = format!("{:?}", auth_config(Some("hunter2"), 24));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    #[serial]
    fn test_load_flat_variables_override_nested() {
        clear_env();
        env::set_var("SECRET_KEY", "flat-secret");
        env::set_var("TOKEN_TTL", "12");
        env::set_var("AUTH__SECRET_KEY", "nested-secret");
        env::set_var("AUTH__TOKEN_TTL_HOURS", "3");

        let loaded = Config::load();
        clear_env();

        let config = loaded.expect("Failed to load configuration");
        assert_eq!(config.auth.token_ttl_hours, 12);
        assert_eq!(config.auth.secret_key.as_deref(), Some("flat-secret"));

        let token_config = config.auth.token_config().unwrap();
        assert_eq!(token_config.secret.as_bytes(), b"flat-secret");
        assert_eq!(token_config.ttl, Duration::hours(12));
    }

    #[test]
    #[serial]
    fn test_load_nested_variables_override_files() {
        clear_env();
        env::set_var("AUTH__TOKEN_TTL_HOURS", "3");

        let loaded = Config::load();
        clear_env();

        let config = loaded.expect("Failed to load configuration");
        assert_eq!(config.auth.token_ttl_hours, 3);
        assert!(config.auth.secret_key.is_none());
    }
}
