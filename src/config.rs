use std::{fmt::Display, str::FromStr};

use anyhow::anyhow;
use tracing::{info, warn};

/// Everything the server reads from the environment (or `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub cloudinary: CloudinaryConfig,
    pub session_ttl_minutes: i64,
    pub cookie_secure: bool,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: try_load("DATABASE_URL", "sqlite://yelpcamp.db")?,
            port: try_load("PORT", "3000")?,
            cloudinary: CloudinaryConfig {
                cloud_name: require("CLOUDINARY_CLOUD_NAME")?,
                api_key: require("CLOUDINARY_API_KEY")?,
                api_secret: require("CLOUDINARY_API_SECRET")?,
            },
            session_ttl_minutes: try_load("SESSION_TTL_MINUTES", "1440")?,
            cookie_secure: try_load("COOKIE_SECURE", "false")?,
            max_upload_bytes: try_load("MAX_UPLOAD_BYTES", "10485760")?,
        })
    }
}

fn require(key: &str) -> anyhow::Result<String> {
    dotenv::var(key).map_err(|_| anyhow!("environment variable {key} must be set"))
}

fn try_load<T>(key: &str, default: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = dotenv::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_owned()
    });

    raw.parse().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        anyhow!("invalid {key} value {raw:?}: {e}")
    })
}
