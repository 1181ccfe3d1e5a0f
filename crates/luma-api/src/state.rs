//! Application state wiring all services together.
//!
//! Services are generic over repository and port traits; AppState pins them
//! to the concrete infra implementations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Duration;

use luma_core::chat::context::ContextAssembler;
use luma_core::chat::service::{ChatService, ChatSettings};
use luma_core::service::auth::{AuthService, AuthSettings};
use luma_core::service::memory::MemoryService;
use luma_core::service::person::PersonService;
use luma_core::service::photo::PhotoService;
use luma_infra::config::photo_dir;
use luma_infra::crypto::hash::Sha256OneTimeTokens;
use luma_infra::crypto::jwt::JwtSessions;
use luma_infra::crypto::password::Argon2Hasher;
use luma_infra::llm::anthropic::AnthropicProvider;
use luma_infra::mail::AppMailer;
use luma_infra::sqlite::chat::SqliteChatRepository;
use luma_infra::sqlite::memory::SqliteMemoryRepository;
use luma_infra::sqlite::person::SqlitePersonRepository;
use luma_infra::sqlite::photo::SqlitePhotoRepository;
use luma_infra::sqlite::pool::{DatabasePool, default_database_url};
use luma_infra::sqlite::user::SqliteUserRepository;
use luma_infra::storage::filesystem::LocalPhotoStore;
use luma_types::config::AppConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteAuthService = AuthService<
    SqliteUserRepository,
    Argon2Hasher,
    Sha256OneTimeTokens,
    JwtSessions,
    AppMailer,
>;

pub type ConcretePersonService = PersonService<SqlitePersonRepository, SqlitePhotoRepository>;

pub type ConcreteMemoryService =
    MemoryService<SqliteMemoryRepository, SqlitePersonRepository, SqlitePhotoRepository>;

pub type ConcretePhotoService = PhotoService<SqlitePhotoRepository, LocalPhotoStore>;

pub type ConcreteChatService = ChatService<
    SqliteChatRepository,
    AnthropicProvider,
    SqliteMemoryRepository,
    SqlitePersonRepository,
>;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<ConcreteAuthService>,
    pub person_service: Arc<ConcretePersonService>,
    pub memory_service: Arc<ConcreteMemoryService>,
    pub photo_service: Arc<ConcretePhotoService>,
    pub chat_service: Arc<ConcreteChatService>,
    /// Public base URL used to build photo links.
    pub api_base_url: String,
    pub allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
    pub chat_configured: bool,
    pub mail_transport: &'static str,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

/// Open (and migrate) the database named by config, or `{data_dir}/luma.db`.
pub async fn open_database(data_dir: &Path, config: &AppConfig) -> anyhow::Result<DatabasePool> {
    tokio::fs::create_dir_all(data_dir).await?;
    let url = config
        .database
        .url
        .clone()
        .unwrap_or_else(|| default_database_url(data_dir));
    Ok(DatabasePool::new(&url).await?)
}

impl AppState {
    /// Initialize the application state: connect to DB, wire services.
    pub async fn init(data_dir: PathBuf, config: &AppConfig) -> anyhow::Result<Self> {
        let db_pool = open_database(&data_dir, config).await?;
        Self::from_parts(data_dir, config, db_pool)
    }

    /// Wire services over an already opened pool.
    pub fn from_parts(
        data_dir: PathBuf,
        config: &AppConfig,
        db_pool: DatabasePool,
    ) -> anyhow::Result<Self> {
        let mailer = AppMailer::from_config(&config.mail)?;
        let mail_transport = mailer.transport();

        let auth_service = AuthService::new(
            SqliteUserRepository::new(db_pool.clone()),
            Argon2Hasher::new(),
            Sha256OneTimeTokens::new(),
            JwtSessions::from_optional_secret(
                config.auth.jwt_secret.as_deref(),
                Duration::hours(config.auth.token_ttl_hours),
            ),
            mailer,
            AuthSettings {
                frontend_url: config.frontend_url.clone(),
                reset_token_ttl: Duration::minutes(config.auth.reset_token_ttl_minutes),
            },
        );

        let person_service = PersonService::new(
            SqlitePersonRepository::new(db_pool.clone()),
            SqlitePhotoRepository::new(db_pool.clone()),
        );

        let memory_service = MemoryService::new(
            SqliteMemoryRepository::new(db_pool.clone()),
            SqlitePersonRepository::new(db_pool.clone()),
            SqlitePhotoRepository::new(db_pool.clone()),
        );

        let photo_service = PhotoService::new(
            SqlitePhotoRepository::new(db_pool.clone()),
            LocalPhotoStore::new(photo_dir(config, &data_dir)),
        );

        let provider = AnthropicProvider::from_config(&config.anthropic)?;
        let chat_configured = provider.is_configured();
        if !chat_configured {
            tracing::warn!("Anthropic API key or URL missing; chat will answer with a canned reply");
        }
        let chat_service = ChatService::new(
            SqliteChatRepository::new(db_pool.clone()),
            provider,
            ContextAssembler::new(
                SqliteMemoryRepository::new(db_pool.clone()),
                SqlitePersonRepository::new(db_pool.clone()),
            ),
            ChatSettings {
                model: config.anthropic.model.clone(),
                temperature: config.anthropic.temperature,
                max_tokens: config.anthropic.max_tokens,
                stream_max_tokens: config.anthropic.stream_max_tokens,
            },
        );

        Ok(Self {
            auth_service: Arc::new(auth_service),
            person_service: Arc::new(person_service),
            memory_service: Arc::new(memory_service),
            photo_service: Arc::new(photo_service),
            chat_service: Arc::new(chat_service),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            allowed_origins: config.allowed_origins(),
            max_upload_bytes: config.storage.max_upload_bytes,
            chat_configured,
            mail_transport,
            data_dir,
            db_pool,
        })
    }

    /// Public URL of a stored photo.
    pub fn photo_url(&self, id: &uuid::Uuid) -> String {
        format!("{}/api/v1/photos/{id}", self.api_base_url)
    }
}
