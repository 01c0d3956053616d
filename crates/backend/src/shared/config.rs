use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Overrides `[auth] jwt_secret` when set
pub const JWT_SECRET_ENV: &str = "INVOICES_JWT_SECRET";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Empty means "generate a random secret on start" (tokens die with the process)
    #[serde(default)]
    pub jwt_secret: String,
    /// Enables `POST /api/system/auth/dev-token`
    #[serde(default)]
    pub allow_dev_tokens: bool,
    #[serde(default = "default_token_lifetime")]
    pub token_lifetime_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            allow_dev_tokens: false,
            token_lifetime_hours: default_token_lifetime(),
        }
    }
}

fn default_token_lifetime() -> i64 {
    24
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3000

[database]
path = "target/db/invoices.db"

[auth]
jwt_secret = ""
allow_dev_tokens = false
token_lifetime_hours = 24
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
///
/// `INVOICES_JWT_SECRET` is applied on top of either.
pub fn load_config() -> anyhow::Result<Config> {
    let mut config = load_file_config()?;
    if let Ok(secret) = std::env::var(JWT_SECRET_ENV) {
        if !secret.trim().is_empty() {
            tracing::info!("JWT secret taken from {}", JWT_SECRET_ENV);
            config.auth.jwt_secret = secret;
        }
    }
    Ok(config)
}

fn load_file_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                return parse_config(&contents);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    if config.auth.token_lifetime_hours <= 0 {
        anyhow::bail!("auth.token_lifetime_hours must be positive");
    }
    Ok(config)
}

/// Get the database file path from configuration
/// Resolves relative paths relative to the executable directory
pub fn get_database_path(config: &Config) -> anyhow::Result<PathBuf> {
    let db_path_str = &config.database.path;
    let db_path = Path::new(db_path_str);

    if db_path.is_absolute() {
        return Ok(db_path.to_path_buf());
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return Ok(exe_dir.join(db_path));
        }
    }

    Ok(PathBuf::from(db_path_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.database.path, "target/db/invoices.db");
        assert_eq!(config.server.port, 3000);
        assert!(config.auth.jwt_secret.is_empty());
        assert!(!config.auth.allow_dev_tokens);
        assert_eq!(config.auth.token_lifetime_hours, 24);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = parse_config("[database]\npath = \"/tmp/x.db\"\n").unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.auth.token_lifetime_hours, 24);
        assert_eq!(
            get_database_path(&config).unwrap(),
            PathBuf::from("/tmp/x.db")
        );
    }

    #[test]
    fn test_rejects_non_positive_lifetime() {
        let toml = "[database]\npath = \"a.db\"\n[auth]\ntoken_lifetime_hours = 0\n";
        assert!(parse_config(toml).is_err());
    }
}
