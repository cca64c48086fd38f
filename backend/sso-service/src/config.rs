//! Configuration management for SSO Service
//!
//! Loads settings from:
//! 1. Environment variables
//! 2. .env file (local development)
//!
//! # Example
//!
//! ```no_run
//! use sso_service::config::Settings;
//!
//! fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     println!("Token TTL: {:?}", settings.auth.token_ttl);
//!     Ok(())
//! }
//! ```

use anyhow::{bail, Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Deployment environment, selects the log format and level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Dev,
    Prod,
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            other => bail!("unknown APP_ENV '{}', expected local, dev or prod", other),
        }
    }
}

/// Application settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,
    pub database: DatabaseSettings,
    pub grpc: GrpcSettings,
    pub http: HttpSettings,
    pub auth: AuthSettings,
}

impl Settings {
    /// Load settings from environment variables
    pub fn load() -> Result<Self> {
        // Load .env file in development
        if cfg!(debug_assertions) {
            dotenvy::dotenv().ok();
        }

        Ok(Settings {
            env: env::var("APP_ENV")
                .unwrap_or_else(|_| "local".to_string())
                .parse()?,
            database: DatabaseSettings::from_env()?,
            grpc: GrpcSettings::from_env()?,
            http: HttpSettings::from_env()?,
            auth: AuthSettings::from_env()?,
        })
    }
}

/// Database connection settings
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: u64,
    pub run_migrations: bool,
}

impl DatabaseSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("Invalid DATABASE_MAX_CONNECTIONS")?,
            acquire_timeout: env::var("DATABASE_ACQUIRE_TIMEOUT")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("Invalid DATABASE_ACQUIRE_TIMEOUT")?,
            run_migrations: env::var("DATABASE_RUN_MIGRATIONS")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .context("Invalid DATABASE_RUN_MIGRATIONS")?,
        })
    }
}

/// gRPC server configuration
#[derive(Debug, Clone)]
pub struct GrpcSettings {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
}

impl GrpcSettings {
    fn from_env() -> Result<Self> {
        let timeout_secs: u64 = env::var("GRPC_TIMEOUT")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("Invalid GRPC_TIMEOUT")?;

        Ok(Self {
            host: env::var("GRPC_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("GRPC_PORT")
                .unwrap_or_else(|_| "44044".to_string())
                .parse()
                .context("Invalid GRPC_PORT")?,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Health and metrics HTTP server
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub port: u16,
}

impl HttpSettings {
    fn from_env() -> Result<Self> {
        Ok(Self {
            port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid HTTP_PORT")?,
        })
    }
}

/// Token issuing settings
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub token_ttl: Duration,
}

impl AuthSettings {
    fn from_env() -> Result<Self> {
        let ttl_secs: u64 = env::var("TOKEN_TTL_SECONDS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .context("Invalid TOKEN_TTL_SECONDS")?;

        if ttl_secs == 0 {
            bail!("TOKEN_TTL_SECONDS must be greater than zero");
        }

        Ok(Self {
            token_ttl: Duration::from_secs(ttl_secs),
        })
    }
}
