//! Configuration module
//!
//! Environment-driven configuration for the API and media pipeline,
//! including database, storage root, ffmpeg, and authentication settings.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use crate::kind_map::KindMap;

// Common constants
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const FFMPEG_TIMEOUT_SECS: u64 = 120;
const MAX_UPLOAD_MB: u64 = 100;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    /// Root directory all managed files live under. Every resolved path is
    /// checked against this sandbox.
    pub storage_root: PathBuf,
    pub ffmpeg_path: String,
    pub ffmpeg_timeout_secs: u64,
    pub max_upload_bytes: u64,
    /// API key -> user id. Populated from `API_KEYS` as `key:user,key:user`.
    pub api_keys: HashMap<String, String>,
    pub video_extensions: Vec<String>,
    pub image_extensions: Vec<String>,
    pub text_extensions: Vec<String>,
    pub document_extensions: Vec<String>,
}

impl Config {
    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase().eq("production")
            || self.environment.to_lowercase().eq("prod")
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let api_keys_str = env::var("API_KEYS")
            .map_err(|_| anyhow::anyhow!("API_KEYS must be set for authentication"))?;
        let api_keys = parse_api_keys(&api_keys_str)?;

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            storage_root: PathBuf::from(
                env::var("STORAGE_ROOT").unwrap_or_else(|_| "./storage".to_string()),
            ),
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            ffmpeg_timeout_secs: env::var("FFMPEG_TIMEOUT_SECS")
                .unwrap_or_else(|_| FFMPEG_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(FFMPEG_TIMEOUT_SECS),
            max_upload_bytes: env::var("MAX_UPLOAD_MB")
                .unwrap_or_else(|_| MAX_UPLOAD_MB.to_string())
                .parse::<u64>()
                .unwrap_or(MAX_UPLOAD_MB)
                * 1024
                * 1024,
            api_keys,
            video_extensions: extension_list("VIDEO_EXTENSIONS", "mp4,mov,m4v,avi,mkv"),
            image_extensions: extension_list("IMAGE_EXTENSIONS", "jpg,jpeg,png,gif,bmp,webp"),
            text_extensions: extension_list(
                "TEXT_EXTENSIONS",
                "txt,md,markdown,json,yaml,yml,csv,log,xml",
            ),
            document_extensions: extension_list(
                "DOCUMENT_EXTENSIONS",
                "pdf,txt,text,md,markdown,json,yaml,yml,csv,log,xml,doc,docx",
            ),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.database_url.starts_with("postgresql://")
            && !self.database_url.starts_with("postgres://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.api_keys.is_empty() {
            return Err(anyhow::anyhow!(
                "API_KEYS must contain at least one key:user entry"
            ));
        }

        if self.ffmpeg_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "FFMPEG_TIMEOUT_SECS must be greater than zero"
            ));
        }

        if self.max_upload_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_MB must be greater than zero"));
        }

        if self.video_extensions.is_empty()
            || self.image_extensions.is_empty()
            || self.document_extensions.is_empty()
        {
            return Err(anyhow::anyhow!(
                "Extension allow-lists cannot be empty. Check *_EXTENSIONS overrides."
            ));
        }

        Ok(())
    }

    /// Build the extension classification map from the configured lists.
    pub fn kind_map(&self) -> KindMap {
        KindMap::new(
            &self.video_extensions,
            &self.image_extensions,
            &self.text_extensions,
            &self.document_extensions,
        )
    }

    pub fn user_for_api_key(&self, key: &str) -> Option<&str> {
        self.api_keys.get(key).map(|s| s.as_str())
    }
}

fn extension_list(var: &str, default: &str) -> Vec<String> {
    env::var(var)
        .unwrap_or_else(|_| default.to_string())
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_api_keys(raw: &str) -> Result<HashMap<String, String>, anyhow::Error> {
    let mut keys = HashMap::new();
    for entry in raw.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let (key, user) = entry.split_once(':').ok_or_else(|| {
            anyhow::anyhow!("API_KEYS entries must use the form key:user, got '{entry}'")
        })?;
        if key.trim().is_empty() || user.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "API_KEYS entries must use the form key:user, got '{entry}'"
            ));
        }
        keys.insert(key.trim().to_string(), user.trim().to_string());
    }
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_api_keys() {
        let keys = parse_api_keys("abc123:alice, def456:bob").unwrap();
        assert_eq!(keys.get("abc123").map(|s| s.as_str()), Some("alice"));
        assert_eq!(keys.get("def456").map(|s| s.as_str()), Some("bob"));

        assert!(parse_api_keys("no-separator").is_err());
        assert!(parse_api_keys("key:").is_err());
        assert!(parse_api_keys(":user").is_err());
    }
}
