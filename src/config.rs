//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honored for local development.

use std::env;
use std::str::FromStr;

/// Largest offset any real zone uses (UTC+14), in minutes.
pub const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

/// Where journal data is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Hosted backend over its REST API
    Supabase,
    /// In-process tables, lost on restart
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "supabase" => Ok(StoreBackend::Supabase),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(ConfigError::Invalid("STORE", s.to_string())),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Storage backend
    pub store: StoreBackend,
    /// Backend project URL (e.g. https://xyz.supabase.co)
    pub supabase_url: String,
    /// Day-bucketing offset used when a request doesn't give one (minutes east of UTC)
    pub default_utc_offset_minutes: i32,

    // --- Secrets ---
    /// Service role key for the backend REST API
    pub supabase_service_key: String,
    /// Secret the backend signs user access tokens with (raw bytes)
    pub jwt_secret: Vec<u8>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let store: StoreBackend = env::var("STORE")
            .unwrap_or_else(|_| "supabase".to_string())
            .parse()?;

        // The REST settings only matter when talking to the real backend.
        let required_for_store = |name: &'static str| match store {
            StoreBackend::Supabase => env::var(name)
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing(name)),
            StoreBackend::Memory => Ok(env::var(name).unwrap_or_default()),
        };

        let default_utc_offset_minutes = match env::var("DEFAULT_UTC_OFFSET_MINUTES") {
            Ok(raw) => parse_utc_offset(&raw)
                .ok_or(ConfigError::Invalid("DEFAULT_UTC_OFFSET_MINUTES", raw))?,
            Err(_) => 0,
        };

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            store,
            supabase_url: required_for_store("SUPABASE_URL")?,
            default_utc_offset_minutes,
            supabase_service_key: required_for_store("SUPABASE_SERVICE_KEY")?,
            jwt_secret: env::var("SUPABASE_JWT_SECRET")
                .map_err(|_| ConfigError::Missing("SUPABASE_JWT_SECRET"))?
                .into_bytes(),
        })
    }

    /// Config for tests: in-memory store, UTC day boundaries.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            store: StoreBackend::Memory,
            supabase_url: String::new(),
            default_utc_offset_minutes: 0,
            supabase_service_key: String::new(),
            jwt_secret: b"test_jwt_secret_32_bytes_minimum!".to_vec(),
        }
    }
}

/// Parse a UTC offset in minutes, rejecting anything outside ±14h.
pub fn parse_utc_offset(raw: &str) -> Option<i32> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|m| m.abs() <= MAX_UTC_OFFSET_MINUTES)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
