use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

pub const SERVICE_NAME: &str = "vaccine-service";

#[derive(Debug, Clone)]
pub struct VaccineConfig {
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub cors: CorsConfig,
    /// Largest accepted request body, in bytes.
    pub body_limit_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorsConfig {
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty()
    }
}

impl VaccineConfig {
    pub fn load() -> Result<Self, AppError> {
        // Reads config.env/.env, PORT and NODE_ENV
        let common = core_config::Config::load()?;

        Ok(VaccineConfig {
            common,
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI", "mongodb://localhost:27017"),
                database: get_env("MONGODB_DATABASE", "vaccine_management"),
            },
            cors: CorsConfig {
                allowed_origins: parse_origins(&get_env("CORS_ALLOWED_ORIGINS", "*")),
            },
            body_limit_bytes: get_env("BODY_LIMIT_BYTES", "102400")
                .parse()
                .map_err(|e| {
                    AppError::ConfigError(anyhow::anyhow!("BODY_LIMIT_BYTES is invalid: {}", e))
                })?,
        })
    }
}

impl Default for VaccineConfig {
    fn default() -> Self {
        Self {
            common: core_config::Config::default(),
            mongodb: MongoConfig {
                uri: "mongodb://localhost:27017".to_string(),
                database: "vaccine_management".to_string(),
            },
            cors: CorsConfig::default(),
            body_limit_bytes: 100 * 1024,
        }
    }
}

/// Split a comma-separated origin list. A `*` entry anywhere means any origin.
pub fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();

    if origins.iter().any(|o| o == "*") {
        Vec::new()
    } else {
        origins
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
