//! Configuration loader for Luma.
//!
//! Reads `config.toml` from the data directory (`~/.luma/` by default) into
//! [`AppConfig`], then overlays environment variables. Falls back to the
//! defaults when the file is missing or malformed.

use std::path::{Path, PathBuf};

use luma_types::config::AppConfig;

/// Directory name under the home directory when `LUMA_DATA_DIR` is unset.
const DEFAULT_DIR_NAME: &str = ".luma";

/// Resolve the data directory: `LUMA_DATA_DIR`, else `~/.luma`, else
/// `./.luma` when no home directory can be determined.
pub fn resolve_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("LUMA_DATA_DIR").filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Load configuration from `{data_dir}/config.toml` plus the process
/// environment.
pub async fn load_config(data_dir: &Path) -> AppConfig {
    let mut config = load_config_file(data_dir).await;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config
}

/// Load `{data_dir}/config.toml` alone.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and
///   returns the default.
pub async fn load_config_file(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}

/// Overlay environment variables onto `config`. Empty values are ignored.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(key) = var("ANTHROPIC_API_KEY").or_else(|| var("CLAUDE_API_KEY")) {
        config.anthropic.api_key = Some(key);
    }
    if let Some(url) = var("ANTHROPIC_API_URL") {
        config.anthropic.api_url = Some(url);
    }
    if let Some(secret) = var("LUMA_JWT_SECRET") {
        config.auth.jwt_secret = Some(secret);
    }
    if let Some(url) = var("FRONTEND_URL") {
        config.frontend_url = url;
    }
    if let Some(url) = var("API_BASE_URL") {
        config.api_base_url = url;
    }
    if let Some(url) = var("DATABASE_URL") {
        config.database.url = Some(url);
    }

    if let Some(host) = var("SMTP_HOST") {
        config.mail.smtp_host = Some(host);
    }
    if let Some(port) = var("SMTP_PORT") {
        match port.trim().parse() {
            Ok(port) => config.mail.smtp_port = port,
            Err(_) => tracing::warn!(value = %port, "ignoring invalid SMTP_PORT"),
        }
    }
    if let Some(user) = var("SMTP_USER") {
        config.mail.smtp_user = Some(user);
    }
    if let Some(pass) = var("SMTP_PASS") {
        config.mail.smtp_pass = Some(pass);
    }
    if let Some(from) = var("SMTP_FROM") {
        config.mail.from = from;
    }
}

/// Where photo bytes live: `storage.photo_dir`, else `{data_dir}/storage`.
pub fn photo_dir(config: &AppConfig, data_dir: &Path) -> PathBuf {
    config
        .storage
        .photo_dir
        .clone()
        .unwrap_or_else(|| data_dir.join("storage"))
}
