//! Service configuration.

use serde::Deserialize;
use std::path::Path;

/// Secret used when nothing is configured. Only suitable for local development.
const DEVELOPMENT_SESSION_SECRET: &str = "questboard-development-secret";

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// Path to `RocksDB` data directory (default: "/data/questboard").
    pub data_dir: String,

    /// Directory uploaded avatars are written to (default: "static/img/avatares").
    pub upload_dir: String,

    /// HMAC secret for session tokens.
    pub session_secret: String,

    /// Session lifetime in seconds (default: one day).
    pub session_ttl_seconds: u64,

    /// Issuer claim of session tokens (default: "questboard").
    pub session_issuer: String,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,

    /// Insert the default catalog on startup when no mission exists.
    pub seed_catalog: bool,
}

/// Session secrets file structure.
#[derive(Debug, Deserialize)]
struct SessionSecrets {
    secret: String,
}

impl ServiceConfig {
    /// Load configuration from environment variables and secrets files.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "/data/questboard".into()),
            upload_dir: std::env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "static/img/avatares".into()),
            session_secret: load_session_secret(),
            session_ttl_seconds: std::env::var("SESSION_TTL_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(86_400),
            session_issuer: std::env::var("SESSION_ISSUER")
                .unwrap_or_else(|_| "questboard".into()),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5 * 1024 * 1024), // 5MB, room for avatar uploads
            request_timeout_seconds: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            seed_catalog: std::env::var("SEED_CATALOG")
                .ok()
                .map_or(true, |s| !matches!(s.trim(), "0" | "false" | "no")),
        }
    }
}

/// Load the session secret from file or environment.
fn load_session_secret() -> String {
    let secret_paths = [
        ".secrets/session.json",
        "questboard/.secrets/session.json",
        "crates/questboard-service/.secrets/session.json",
        "../.secrets/session.json",
    ];

    for path in &secret_paths {
        if let Ok(secrets) = load_secrets_file::<SessionSecrets>(path) {
            tracing::info!(path = %path, "Loaded session secret from file");
            return secrets.secret;
        }
    }

    if let Ok(secret) = std::env::var("SESSION_SECRET") {
        return secret;
    }

    tracing::warn!("SESSION_SECRET not configured - using the development secret");
    DEVELOPMENT_SESSION_SECRET.into()
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, std::io::Error> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            data_dir: "/data/questboard".into(),
            upload_dir: "static/img/avatares".into(),
            session_secret: DEVELOPMENT_SESSION_SECRET.into(),
            session_ttl_seconds: 86_400,
            session_issuer: "questboard".into(),
            cors_origins: vec!["*".into()],
            max_body_bytes: 5 * 1024 * 1024,
            request_timeout_seconds: 30,
            seed_catalog: true,
        }
    }
}
