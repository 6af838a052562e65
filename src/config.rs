//! Application configuration
//!
//! Loaded from a TOML file. Every field has a default, so a partial file (or
//! no file at all) is a valid configuration. `DATABASE_URL`, `JWT_SECRET` and
//! `ADMIN_PASSWORD` take precedence over the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::crypto::password::DEFAULT_COST;
use crate::infrastructure::database::DatabaseConfig;

/// Environment variable naming an alternative config file
pub const CONFIG_PATH_ENV: &str = "STATION_BOOKING_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerSection {
    pub api_host: String,
    pub api_port: u16,
    /// Seconds allowed for in-flight requests to drain on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 3000,
            shutdown_timeout: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        let db = DatabaseConfig::default();
        Self {
            url: db.url,
            max_connections: db.max_connections,
            min_connections: db.min_connections,
            connect_timeout_secs: db.connect_timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SecuritySection {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub bcrypt_cost: u32,
}

impl Default for SecuritySection {
    fn default() -> Self {
        let jwt = JwtConfig::default();
        Self {
            jwt_secret: jwt.secret,
            jwt_expiration_hours: jwt.expiration_hours,
            bcrypt_cost: DEFAULT_COST,
        }
    }
}

/// Account seeded on first start when the users table is empty
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AdminSection {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Default for AdminSection {
    fn default() -> Self {
        Self {
            name: "Administrator".to_string(),
            email: "admin@station-booking.local".to_string(),
            // No built-in credential; seeding is skipped until one is set.
            password: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingSection {
    /// `EnvFilter` directive, e.g. `info` or `station_booking=debug`
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub security: SecuritySection,
    pub admin: AdminSection,
    pub logging: LoggingSection,
}

impl AppConfig {
    /// Load the config file at `path`, falling back to defaults when it does
    /// not exist, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with(path, env_lookup)
    }

    /// Like [`load`](Self::load), but an unreadable or invalid file yields
    /// the defaults (still with environment overrides) plus the error.
    pub fn load_or_default(path: &Path) -> (Self, Option<ConfigError>) {
        Self::load_or_default_with(path, env_lookup)
    }

    fn load_with(
        path: &Path,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::read_file(path)?;
        config.apply_overrides(lookup);
        Ok(config)
    }

    fn load_or_default_with(
        path: &Path,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> (Self, Option<ConfigError>) {
        let (mut config, error) = match Self::read_file(path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        };
        config.apply_overrides(lookup);
        (config, error)
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        if let Some(url) = get("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(secret) = get("JWT_SECRET") {
            self.security.jwt_secret = secret;
        }
        if let Some(password) = get("ADMIN_PASSWORD") {
            self.admin.password = password;
        }
    }

    pub fn api_address(&self) -> String {
        format!("{}:{}", self.server.api_host, self.server.api_port)
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
            min_connections: self.database.min_connections,
            connect_timeout_secs: self.database.connect_timeout_secs,
        }
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig::new(
            self.security.jwt_secret.clone(),
            self.security.jwt_expiration_hours,
        )
    }
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// `$STATION_BOOKING_CONFIG`, or `<config dir>/station-booking/config.toml`
pub fn default_config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("station-booking")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg = AppConfig::from_toml(
            r#"
            [server]
            api_port = 8080

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.api_port, 8080);
        assert_eq!(cfg.server.api_host, "0.0.0.0");
        assert_eq!(cfg.logging.format, "json");
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.database, DatabaseSection::default());
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(AppConfig::from_toml("").unwrap(), AppConfig::default());
    }

    #[test]
    fn wrong_types_are_rejected() {
        assert!(AppConfig::from_toml("[server]\napi_port = \"eighty\"").is_err());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::env::temp_dir().join(format!("{}.toml", uuid::Uuid::new_v4()));
        let cfg = AppConfig::load_with(&path, |_| None).unwrap();
        assert_eq!(cfg.server, ServerSection::default());
        assert_eq!(cfg.admin, AdminSection::default());
    }

    #[test]
    fn unreadable_toml_reports_path() {
        let path = std::env::temp_dir().join(format!("{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[server\n").unwrap();
        let err = AppConfig::load_with(&path, |_| None).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(&path.display().to_string()));
    }

    fn lookup(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn environment_values_override_file() {
        let mut cfg = AppConfig::default();
        cfg.apply_overrides(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("JWT_SECRET", "s3cret"),
            ("ADMIN_PASSWORD", "hunter22"),
        ]));
        assert_eq!(cfg.database.url, "sqlite::memory:");
        assert_eq!(cfg.jwt_config().secret, "s3cret");
        assert_eq!(cfg.admin.password, "hunter22");

        let mut cfg = AppConfig::default();
        cfg.apply_overrides(lookup(&[("DATABASE_URL", "")]));
        assert_eq!(cfg.database.url, DatabaseSection::default().url);
    }

    #[test]
    fn invalid_file_fallback_still_applies_environment() {
        let path = std::env::temp_dir().join(format!("{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[security\njwt_secret = 1").unwrap();
        let (cfg, error) =
            AppConfig::load_or_default_with(&path, lookup(&[("JWT_SECRET", "from-env")]));
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(error, Some(ConfigError::Parse { .. })));
        assert_eq!(cfg.security.jwt_secret, "from-env");
        assert_eq!(cfg.server, ServerSection::default());
    }

    #[test]
    fn default_admin_has_no_password() {
        assert!(AdminSection::default().password.is_empty());
    }

    #[test]
    fn sub_configs_carry_section_values() {
        let cfg = AppConfig::from_toml(
            r#"
            [database]
            url = "sqlite://./other.db?mode=rwc"
            max_connections = 3

            [security]
            jwt_expiration_hours = 2
            "#,
        )
        .unwrap();

        let db = cfg.database_config();
        assert_eq!(db.url, "sqlite://./other.db?mode=rwc");
        assert_eq!(db.max_connections, 3);
        assert_eq!(cfg.jwt_config().expiration_hours, 2);
        assert_eq!(cfg.api_address(), "0.0.0.0:3000");
    }
}
