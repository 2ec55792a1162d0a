/// Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_auth")]
    pub auth: AuthSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Directory uploaded audio files are written to and streamed from
    #[serde(default = "default_media_path")]
    pub media_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthSettings {
    pub jwt_secret: String,

    #[serde(default = "default_jwt_expiration_hours")]
    pub jwt_expiration_hours: u64,

    #[serde(default = "default_jwt_refresh_expiration_days")]
    pub jwt_refresh_expiration_days: u64,
}

impl ServerConfig {
    /// Load configuration from `config.toml` (if present) and environment
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("config.toml"))
    }

    /// Load configuration from the given file (if present) and environment
    ///
    /// Environment variables are prefixed with `HARMONY_` and use `__` between
    /// nesting levels, e.g. `HARMONY_AUTH__JWT_SECRET` or `HARMONY_SERVER__PORT`.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mut settings = config::Config::builder();

        if config_path.exists() {
            settings = settings.add_source(config::File::from(config_path));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("HARMONY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(ServerError::Config(
                "JWT secret is required (set HARMONY_AUTH__JWT_SECRET)".to_string(),
            ));
        }

        if self.auth.jwt_expiration_hours == 0 {
            return Err(ServerError::Config(
                "auth.jwt_expiration_hours must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
        media_path: default_media_path(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/harmony.db".to_string()
}

fn default_media_path() -> PathBuf {
    PathBuf::from("./data/media")
}

fn default_auth() -> AuthSettings {
    AuthSettings {
        jwt_secret: String::new(),
        jwt_expiration_hours: default_jwt_expiration_hours(),
        jwt_refresh_expiration_days: default_jwt_refresh_expiration_days(),
    }
}

fn default_jwt_expiration_hours() -> u64 {
    24
}

fn default_jwt_refresh_expiration_days() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            auth: default_auth(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.database_url, "sqlite://./data/harmony.db");
        assert_eq!(config.auth.jwt_expiration_hours, 24);
    }

    #[test]
    fn test_validate_requires_secret() {
        let mut config = ServerConfig::default();
        assert!(config.validate().is_err());

        config.auth.jwt_secret = "secret".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("harmony.toml");
        std::fs::write(
            &path,
            "[server]\nport = 9001\n\n[auth]\njwt_secret = \"from-file\"\n",
        )
        .unwrap();

        let config = ServerConfig::load_from(&path).unwrap();
        assert_eq!(config.server.port, 9001);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.auth.jwt_secret, "from-file");
    }
}
