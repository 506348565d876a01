use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub password: PasswordConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub cors_origins: Vec<String>,
    pub permissive_cors: bool,
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// `APP_ENV` selects the preset, then individual variables override it.
    /// `DATABASE_URL` and `JWT_SECRET` have no defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let mut config = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        };

        config.database.url = required("DATABASE_URL")?;
        config.security.jwt_secret = required("JWT_SECRET")?;
        config.with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        // Server overrides
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Some(v) = env::var("SERVER_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.server.port = parse("SERVER_PORT", &v)?;
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse("DATABASE_MAX_CONNECTIONS", &v)?;
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = parse("DATABASE_CONNECTION_TIMEOUT", &v)?;
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
            self.security.permissive_cors = false;
        }

        // Password hashing overrides
        if let Ok(v) = env::var("PASSWORD_MEMORY_KIB") {
            self.password.memory_kib = parse("PASSWORD_MEMORY_KIB", &v)?;
        }
        if let Ok(v) = env::var("PASSWORD_ITERATIONS") {
            self.password.iterations = parse("PASSWORD_ITERATIONS", &v)?;
        }
        if let Ok(v) = env::var("PASSWORD_PARALLELISM") {
            self.password.parallelism = parse("PASSWORD_PARALLELISM", &v)?;
        }

        Ok(self)
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 10,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                permissive_cors: true,
            },
            password: PasswordConfig::default(),
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 20,
                connection_timeout: 10,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                cors_origins: vec!["https://staging.example.com".to_string()],
                permissive_cors: false,
            },
            password: PasswordConfig::default(),
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 50,
                connection_timeout: 5,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                cors_origins: vec!["https://app.example.com".to_string()],
                permissive_cors: false,
            },
            password: PasswordConfig::default(),
        }
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn parse<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.environment, Environment::Development);
        assert!(config.security.permissive_cors);
        assert_eq!(config.server_address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(!config.security.permissive_cors);
        assert_eq!(config.database.max_connections, 50);
        assert_eq!(config.password, PasswordConfig::default());
    }

    #[test]
    fn test_password_defaults_follow_argon2() {
        let password = PasswordConfig::default();
        assert_eq!(password.memory_kib, 19 * 1024);
        assert_eq!(password.iterations, 2);
        assert_eq!(password.parallelism, 1);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse::<u16>("SERVER_PORT", "eighty").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "SERVER_PORT", .. }));
        assert_eq!(parse::<u16>("SERVER_PORT", " 8080 ").unwrap(), 8080);
    }
}
