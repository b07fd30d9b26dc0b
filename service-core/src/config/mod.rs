use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;

/// Files read into the process environment before configuration is built.
/// `config.env` wins over `.env` because dotenvy never overrides a variable
/// that is already set.
pub const ENV_FILES: [&str; 2] = ["config.env", ".env"];

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default, rename = "node_env")]
    pub environment: Environment,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Deployment mode taken from `NODE_ENV`. Anything unrecognised runs as
/// production so fault detail is never exposed by accident.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Test,
    #[default]
    #[serde(other)]
    Production,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Production => "production",
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "development" => Environment::Development,
            "test" => Environment::Test,
            _ => Environment::Production,
        })
    }
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            environment: Environment::default(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        load_env_files();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::default())
            .build()?;

        Self::from_source(config)
    }

    pub fn from_source(config: Cfg) -> Result<Self, AppError> {
        Ok(config.try_deserialize()?)
    }
}

/// Populate the process environment from [`ENV_FILES`], ignoring missing files.
pub fn load_env_files() {
    for file in ENV_FILES {
        if dotenvy::from_filename(file).is_ok() {
            tracing::debug!(file = %file, "Loaded environment file");
        }
    }
}
