use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub root: RootConfig,
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// IANA name of the timezone "today" is computed in.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

fn default_timezone() -> String {
    "UTC".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub expiration_days: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RootConfig {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (REPDESK__DATABASE__URL, etc.)
    /// 2. Config file specified by path
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("database.url", "sqlite:repdesk.db")?
            .set_default("database.max_connections", 5)?
            .set_default("jwt.issuer", "repdesk")?
            .set_default("jwt.audience", "repdesk")?
            .set_default("jwt.expiration_days", 7)?
            .set_default("root.email", "admin@repdesk.localhost")?
            .set_default("root.full_name", "Administrator")?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("REPDESK")
                .separator("__")
                .try_parsing(true),
        );

        if let Ok(database_url) = env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", database_url)?;
        }
        if let Ok(jwt_secret) = env::var("JWT_SECRET") {
            builder = builder.set_override("jwt.secret", jwt_secret)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.jwt.secret.len() < 32 {
            return Err("JWT secret must be at least 32 characters long".to_string());
        }
        if self.jwt.expiration_days < 1 {
            return Err("JWT expiration_days must be at least 1".to_string());
        }
        if self.database.max_connections < 1 {
            return Err("Database max_connections must be at least 1".to_string());
        }
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }
        if self.root.password.len() < 8 {
            return Err("Root password must be at least 8 characters long".to_string());
        }
        if time_tz::timezones::get_by_name(&self.app.timezone).is_none() {
            return Err(format!("Unknown timezone {}", self.app.timezone));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                url: "sqlite:test.db".to_string(),
                max_connections: 5,
            },
            jwt: JwtConfig {
                secret: "test_secret_key_minimum_32_characters_long".to_string(),
                issuer: "repdesk".to_string(),
                audience: "repdesk".to_string(),
                expiration_days: 7,
            },
            root: RootConfig {
                email: "admin@repdesk.localhost".to_string(),
                password: "root_password".to_string(),
                full_name: "Administrator".to_string(),
            },
            app: AppConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_validation_short_secret() {
        let mut config = config();
        config.jwt.secret = "short".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_port() {
        let mut config = config();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_connections() {
        let mut config = config();
        config.database.max_connections = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_unknown_timezone() {
        let mut config = config();
        config.app.timezone = "Mars/Olympus_Mons".to_string();

        assert_eq!(
            config.validate(),
            Err("Unknown timezone Mars/Olympus_Mons".to_string())
        );

        config.app.timezone = "Europe/Paris".to_string();
        assert!(config.validate().is_ok());
    }
}
