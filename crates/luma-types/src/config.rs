//! Application configuration types for Luma.
//!
//! `AppConfig` mirrors the top-level `config.toml`. Every section has
//! defaults so an empty file (or no file at all) yields a usable config.
//! Secret-bearing sections implement `Debug` by hand so credentials never
//! reach logs.

use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

/// Top-level configuration for the Luma backend.
///
/// Loaded from `~/.luma/config.toml` and then overlaid with environment
/// variables by the infra loader.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub anthropic: AnthropicConfig,
    pub auth: AuthConfig,
    pub mail: MailConfig,
    pub storage: StorageConfig,
    /// Base URL of the web frontend, used in confirmation and reset links.
    pub frontend_url: String,
    /// Public base URL of this API, used to build photo URLs.
    pub api_base_url: String,
    /// Extra CORS origins on top of the local development defaults.
    pub cors_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            anthropic: AnthropicConfig::default(),
            auth: AuthConfig::default(),
            mail: MailConfig::default(),
            storage: StorageConfig::default(),
            frontend_url: "http://localhost:3000".to_string(),
            api_base_url: "http://localhost:8080".to_string(),
            cors_origins: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Origins allowed by the CORS layer: local dev servers, the frontend,
    /// and any configured extras. Duplicates are removed.
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins: Vec<String> = [
            "http://localhost:3000",
            "http://localhost:5173",
            "http://127.0.0.1:3000",
            "http://127.0.0.1:5173",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        for extra in std::iter::once(&self.frontend_url).chain(self.cors_origins.iter()) {
            let trimmed = extra.trim_end_matches('/').to_string();
            if !trimmed.is_empty() && !origins.contains(&trimmed) {
                origins.push(trimmed);
            }
        }
        origins
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Database location. `None` means `{data_dir}/luma.db`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
}

/// Completion API settings.
///
/// `api_key` and `api_url` have no defaults: a deployment without them runs
/// with chat degraded rather than failing to start.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AnthropicConfig {
    pub api_key: Option<String>,
    /// Full endpoint URL, e.g. `https://api.anthropic.com/v1/messages`.
    pub api_url: Option<String>,
    pub model: String,
    pub temperature: f64,
    /// Output cap for single-shot replies.
    pub max_tokens: u32,
    /// Output cap for streamed replies.
    pub stream_max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: None,
            model: "claude-3-5-sonnet-20241022".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            stream_max_tokens: 2000,
            timeout_secs: 120,
        }
    }
}

impl fmt::Debug for AnthropicConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnthropicConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("stream_max_tokens", &self.stream_max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Session token and one-time token settings.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 signing secret. Generated per process when absent.
    pub jwt_secret: Option<String>,
    pub token_ttl_hours: i64,
    pub reset_token_ttl_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_hours: 24,
            reset_token_ttl_minutes: 60,
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "[REDACTED]"))
            .field("token_ttl_hours", &self.token_ttl_hours)
            .field("reset_token_ttl_minutes", &self.reset_token_ttl_minutes)
            .finish()
    }
}

/// Outbound SMTP settings. Without `smtp_host`, mail is logged instead of sent.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_user: Option<String>,
    pub smtp_pass: Option<String>,
    pub from: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: None,
            smtp_port: 587,
            smtp_user: None,
            smtp_pass: None,
            from: "Luma <no-reply@luma.local>".to_string(),
        }
    }
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_user", &self.smtp_user)
            .field("smtp_pass", &self.smtp_pass.as_ref().map(|_| "[REDACTED]"))
            .field("from", &self.from)
            .finish()
    }
}

/// Photo storage settings. `None` means `{data_dir}/storage`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub photo_dir: Option<PathBuf>,
    pub max_upload_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            photo_dir: None,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}
