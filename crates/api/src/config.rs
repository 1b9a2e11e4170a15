use mentor_core::tree_import::{LinkMode, DEFAULT_MAX_IMPORT_NODES};

use crate::auth::jwt::JwtConfig;

/// Default request body limit: room for a full-size tree import.
pub const DEFAULT_MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Largest accepted request body in bytes (default: 8 MiB).
    pub max_body_bytes: usize,
    /// Maximum pooled database connections (default: `20`).
    pub db_max_connections: u32,
    /// How imported nodes are linked: `tree` (parent_id) or `dag` (requires/next).
    pub link_mode: LinkMode,
    /// Upper bound on the number of nodes in one tree import (default: `500`).
    pub max_import_nodes: usize,
    /// JWT verification settings.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `3000`                  |
    /// | `CORS_ORIGINS`          | `http://localhost:3000` |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
    /// | `MAX_BODY_BYTES`        | `8388608`               |
    /// | `DB_MAX_CONNECTIONS`    | `20`                    |
    /// | `TREE_LINK_MODE`        | `dag`                   |
    /// | `MAX_IMPORT_NODES`      | `500`                   |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_body_bytes: usize = std::env::var("MAX_BODY_BYTES")
            .unwrap_or_else(|_| DEFAULT_MAX_BODY_BYTES.to_string())
            .parse()
            .expect("MAX_BODY_BYTES must be a valid usize");

        let db_max_connections: u32 = std::env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "20".into())
            .parse()
            .expect("DB_MAX_CONNECTIONS must be a valid u32");

        let link_mode: LinkMode = std::env::var("TREE_LINK_MODE")
            .map(|v| v.parse().expect("TREE_LINK_MODE must be 'tree' or 'dag'"))
            .unwrap_or_default();

        let max_import_nodes: usize = std::env::var("MAX_IMPORT_NODES")
            .unwrap_or_else(|_| DEFAULT_MAX_IMPORT_NODES.to_string())
            .parse()
            .expect("MAX_IMPORT_NODES must be a valid usize");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_body_bytes,
            db_max_connections,
            link_mode,
            max_import_nodes,
            jwt,
        }
    }
}
