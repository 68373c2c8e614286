use std::collections::HashSet;
use std::env;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "config/default";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default)]
    pub env: Env,
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub apps: Vec<AppConfig>,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Env {
    #[default]
    Local,
    Dev,
    Prod,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Per-request deadline in seconds; unset means unbounded.
    pub timeout_secs: Option<u64>,
}

impl ServerConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: i64,
    #[serde(default)]
    pub password: PasswordConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_ttl_secs: default_token_ttl_secs(),
            password: PasswordConfig::default(),
        }
    }
}

impl AuthConfig {
    pub fn token_ttl(&self) -> time::Duration {
        time::Duration::seconds(self.token_ttl_secs)
    }
}

/// Argon2id cost parameters.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
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

/// Application seeded into storage at startup.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub id: i32,
    pub name: String,
    pub secret: String,
}

fn default_token_ttl_secs() -> i64 {
    3600
}

impl Settings {
    /// Loads from `--config <path>`, then `CONFIG_PATH`, then `config/default`.
    pub fn new() -> Result<Self, ConfigError> {
        let path = config_path_from(env::args().skip(1), env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        Self::new_with_config(&path)
    }

    pub fn new_with_config(config_path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(config_path))
            .add_source(Environment::with_prefix("SSO").separator("__"))
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.token_ttl_secs <= 0 {
            return Err(ConfigError::Message(format!(
                "auth.token_ttl_secs must be positive, got {}",
                self.auth.token_ttl_secs
            )));
        }

        if self.server.timeout_secs == Some(0) {
            return Err(ConfigError::Message(
                "server.timeout_secs must be positive; omit it for no deadline".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for app in &self.apps {
            if app.id == 0 {
                return Err(ConfigError::Message(format!(
                    "app '{}' must have a non-zero id",
                    app.name
                )));
            }
            if app.secret.is_empty() {
                return Err(ConfigError::Message(format!(
                    "app {} has an empty secret",
                    app.id
                )));
            }
            if !seen.insert(app.id) {
                return Err(ConfigError::Message(format!("duplicate app id {}", app.id)));
            }
        }
        Ok(())
    }
}

fn config_path_from(
    mut args: impl Iterator<Item = String>,
    env_path: Option<String>,
) -> Option<String> {
    while let Some(arg) = args.next() {
        if let Some(path) = arg.strip_prefix("--config=") {
            return Some(path.to_string());
        }
        if arg == "--config" {
            return args.next();
        }
    }
    env_path.filter(|p| !p.is_empty())
}
