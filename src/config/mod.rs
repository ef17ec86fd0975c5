use std::env;
use std::net::{IpAddr, Ipv4Addr};

use thiserror::Error;
use url::Url;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
/// Same ceiling `express.json()` applies by default (100kb).
pub const DEFAULT_MAX_REQUEST_SIZE_BYTES: usize = 100 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

impl ConfigError {
    /// True when the hosted store cannot be reached at all with this config.
    pub fn is_store_config(&self) -> bool {
        matches!(
            self,
            ConfigError::Missing("SUPABASE_URL") | ConfigError::Missing("SUPABASE_SERVICE_KEY")
        )
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub auth: AuthConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub url: Url,
    pub service_key: String,
}

#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// Static bearer secret shared with the GPT action caller.
    /// `None` keeps the gate closed for every request.
    pub bearer_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// `None` means permissive CORS.
    pub cors_origins: Option<Vec<String>>,
    pub max_request_size_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST,
            port: DEFAULT_PORT,
            cors_origins: None,
            max_request_size_bytes: DEFAULT_MAX_REQUEST_SIZE_BYTES,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let (url, service_key) = match (var("SUPABASE_URL"), var("SUPABASE_SERVICE_KEY")) {
            (Some(url), Some(key)) => (url, key),
            (None, _) => return Err(ConfigError::Missing("SUPABASE_URL")),
            (_, None) => return Err(ConfigError::Missing("SUPABASE_SERVICE_KEY")),
        };

        let store = StoreConfig {
            url: parse_store_url(&url)?,
            service_key,
        };

        let auth = AuthConfig {
            bearer_token: var("ALLOWED_GPT_BEARER"),
        };

        let mut server = ServerConfig::default();
        if let Some(v) = var("HOST") {
            server.host = v.trim().parse().map_err(|e: std::net::AddrParseError| {
                ConfigError::Invalid { name: "HOST", reason: e.to_string() }
            })?;
        }
        if let Some(v) = var("PORT") {
            server.port = v.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid { name: "PORT", reason: e.to_string() }
            })?;
        }
        if let Some(v) = var("CORS_ORIGINS") {
            let origins: Vec<String> = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !origins.is_empty() {
                server.cors_origins = Some(origins);
            }
        }
        if let Some(v) = var("MAX_REQUEST_SIZE_BYTES") {
            server.max_request_size_bytes = v.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid { name: "MAX_REQUEST_SIZE_BYTES", reason: e.to_string() }
            })?;
        }

        Ok(Self { store, auth, server })
    }
}

fn parse_store_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::Invalid {
        name: "SUPABASE_URL",
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::Invalid {
            name: "SUPABASE_URL",
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}
