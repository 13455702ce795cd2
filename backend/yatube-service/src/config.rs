//! Configuration management for yatube-service
//!
//! Everything is loaded from environment variables with development
//! defaults; production refuses to start without an explicit session
//! secret.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub media: MediaConfig,
    pub cache: CacheConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret for session tokens
    pub session_secret: String,
    /// Access token lifetime in seconds
    pub token_ttl_secs: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Directory uploaded post images are written under
    pub root: String,
    /// Upload size cap in bytes
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// TTL of the index page cache
    pub index_ttl_secs: u64,
    /// Entry cap of the index page cache
    pub max_entries: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let session_secret = match std::env::var("SESSION_SECRET") {
            Ok(value) => value,
            Err(_) if app_env.eq_ignore_ascii_case("production") => {
                return Err("SESSION_SECRET must be set in production".to_string())
            }
            Err(_) => "dev-only-insecure-secret".to_string(),
        };
        if app_env.eq_ignore_ascii_case("production") && session_secret.len() < 32 {
            return Err("SESSION_SECRET must be at least 32 bytes in production".to_string());
        }

        Ok(Config {
            app: AppConfig {
                env: app_env.clone(),
                host: std::env::var("YATUBE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("YATUBE_PORT", 8080),
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/yatube".to_string()),
                max_connections: parse_env_or("DATABASE_MAX_CONNECTIONS", 10),
                min_connections: parse_env_or("DATABASE_MIN_CONNECTIONS", 1),
                acquire_timeout_secs: parse_env_or("DATABASE_ACQUIRE_TIMEOUT_SECS", 10),
                idle_timeout_secs: parse_env_or("DATABASE_IDLE_TIMEOUT_SECS", 600),
            },
            auth: AuthConfig {
                session_secret,
                token_ttl_secs: parse_env_or("SESSION_TOKEN_TTL_SECS", 24 * 60 * 60),
            },
            media: MediaConfig {
                root: std::env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".to_string()),
                max_upload_bytes: parse_env_or("MEDIA_MAX_UPLOAD_BYTES", 5 * 1024 * 1024),
            },
            cache: CacheConfig {
                index_ttl_secs: parse_env_or("INDEX_CACHE_TTL_SECS", 20),
                max_entries: parse_env_or("INDEX_CACHE_MAX_ENTRIES", 256),
            },
            cors: {
                let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                    Ok(value) => value,
                    Err(_) if app_env.eq_ignore_ascii_case("production") => {
                        return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                    }
                    Err(_) => "http://localhost:3000".to_string(),
                };
                CorsConfig { allowed_origins }
            },
        })
    }
}

fn parse_env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
