//! In-memory fakes of the core ports, shared by the unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use luma_types::chat::{ChatExchange, ChatTurn};
use luma_types::error::{AuthError, MailError, RepositoryError};
use luma_types::llm::{CompletionRequest, CompletionResponse, LlmError, StreamEvent, Usage};
use luma_types::memory::{Memory, MemoryDetail};
use luma_types::person::Person;
use luma_types::photo::Photo;
use luma_types::user::{AuthenticatedUser, User};
use uuid::Uuid;

use crate::chat::repository::ChatRepository;
use crate::llm::provider::{CompletionProvider, EventStream};
use crate::repository::memory::MemoryRepository;
use crate::repository::person::PersonRepository;
use crate::repository::photo::PhotoRepository;
use crate::repository::user::UserRepository;
use crate::service::hash::OneTimeTokens;
use crate::service::mail::Mailer;
use crate::service::password::CredentialHasher;
use crate::service::session::SessionTokens;
use crate::storage::photo_store::PhotoStore;

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct InMemoryUsers {
    users: Arc<Mutex<Vec<User>>>,
}

impl InMemoryUsers {
    pub fn get(&self, id: &Uuid) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == *id).cloned()
    }

    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn modify(&self, id: &Uuid, f: impl FnOnce(&mut User)) {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == *id) {
            f(user);
        }
    }

    fn find(&self, pred: impl Fn(&User) -> bool) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| pred(u)).cloned()
    }
}

impl UserRepository for InMemoryUsers {
    async fn create(&self, user: &User) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict("users.email".to_string()));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: &Uuid) -> Result<Option<User>, RepositoryError> {
        Ok(self.get(id))
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self.find(|u| u.email == email))
    }

    async fn get_by_confirmation_token(
        &self,
        token_hash: &str,
    ) -> Result<Option<User>, RepositoryError> {
        Ok(self.find(|u| u.confirmation_token_hash.as_deref() == Some(token_hash)))
    }

    async fn get_by_reset_token(&self, token_hash: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self.find(|u| u.reset_token_hash.as_deref() == Some(token_hash)))
    }

    async fn update(&self, user: &User) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn delete(&self, id: &Uuid) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != *id);
        if users.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Credentials, tokens, mail
// ---------------------------------------------------------------------------

pub struct FakeHasher;

impl CredentialHasher for FakeHasher {
    fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("hashed:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> bool {
        hash == format!("hashed:{password}")
    }
}

#[derive(Default)]
pub struct FakeTokens {
    counter: AtomicU64,
}

impl OneTimeTokens for FakeTokens {
    fn generate(&self) -> String {
        format!("tok{}", self.counter.fetch_add(1, Ordering::SeqCst))
    }

    fn digest(&self, token: &str) -> String {
        format!("digest:{token}")
    }
}

pub struct FakeSessions;

impl SessionTokens for FakeSessions {
    fn issue(&self, user: &User) -> Result<String, AuthError> {
        Ok(format!("session:{}", user.id))
    }

    fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let id = token
            .strip_prefix("session:")
            .and_then(|id| Uuid::parse_str(id).ok())
            .ok_or(AuthError::InvalidToken)?;
        Ok(AuthenticatedUser {
            user_id: id,
            email: String::new(),
        })
    }
}

#[derive(Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<(String, String, String)>>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// `(to, subject, body)` of the most recent mail.
    pub fn last(&self) -> Option<(String, String, String)> {
        self.sent.lock().unwrap().last().cloned()
    }
}

impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        if self.fail {
            return Err(MailError("smtp unreachable".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string(), body.to_string()));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// People, memories, photos
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct InMemoryPeople {
    people: Arc<Mutex<Vec<Person>>>,
}

impl InMemoryPeople {
    pub fn all(&self) -> Vec<Person> {
        self.people.lock().unwrap().clone()
    }
}

impl PersonRepository for InMemoryPeople {
    async fn create(&self, person: &Person) -> Result<(), RepositoryError> {
        self.people.lock().unwrap().push(person.clone());
        Ok(())
    }

    async fn list_for_user(&self, user_id: &Uuid) -> Result<Vec<Person>, RepositoryError> {
        Ok(self
            .people
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.user_id == *user_id)
            .cloned()
            .collect())
    }

    async fn get_owned(&self, user_id: &Uuid, ids: &[Uuid]) -> Result<Vec<Person>, RepositoryError> {
        Ok(self
            .people
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.user_id == *user_id && ids.contains(&p.id))
            .cloned()
            .collect())
    }
}

#[derive(Clone)]
pub struct InMemoryMemories {
    rows: Arc<Mutex<Vec<(Memory, Vec<Uuid>, Option<Uuid>)>>>,
    people: InMemoryPeople,
}

impl InMemoryMemories {
    pub fn new(people: InMemoryPeople) -> Self {
        Self {
            rows: Arc::default(),
            people,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

impl MemoryRepository for InMemoryMemories {
    async fn create(
        &self,
        memory: &Memory,
        people_ids: &[Uuid],
        photo_id: Option<&Uuid>,
    ) -> Result<(), RepositoryError> {
        self.rows
            .lock()
            .unwrap()
            .push((memory.clone(), people_ids.to_vec(), photo_id.copied()));
        Ok(())
    }

    async fn list_for_user(&self, user_id: &Uuid) -> Result<Vec<MemoryDetail>, RepositoryError> {
        let people = self.people.all();
        let mut details: Vec<MemoryDetail> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _, _)| m.user_id == *user_id)
            .map(|(memory, ids, photo_id)| MemoryDetail {
                memory: memory.clone(),
                people: people.iter().filter(|p| ids.contains(&p.id)).cloned().collect(),
                photo_id: *photo_id,
            })
            .collect();
        details.sort_by(|a, b| b.memory.created_at.cmp(&a.memory.created_at));
        Ok(details)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryPhotos {
    photos: Arc<Mutex<Vec<Photo>>>,
    fail_create: bool,
}

impl InMemoryPhotos {
    pub fn failing() -> Self {
        Self {
            fail_create: true,
            ..Self::default()
        }
    }

    pub fn insert(&self, photo: Photo) {
        self.photos.lock().unwrap().push(photo);
    }
}

impl PhotoRepository for InMemoryPhotos {
    async fn create(&self, photo: &Photo) -> Result<(), RepositoryError> {
        if self.fail_create {
            return Err(RepositoryError::Query("disk full".to_string()));
        }
        self.insert(photo.clone());
        Ok(())
    }

    async fn get_owned(&self, user_id: &Uuid, id: &Uuid) -> Result<Option<Photo>, RepositoryError> {
        Ok(self
            .photos
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == *id && p.user_id == *user_id)
            .cloned())
    }

    async fn storage_keys_for_user(&self, user_id: &Uuid) -> Result<Vec<String>, RepositoryError> {
        Ok(self
            .photos
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.user_id == *user_id)
            .map(|p| p.storage_key.clone())
            .collect())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryPhotoStore {
    blobs: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryPhotoStore {
    pub fn contains(&self, key: &str) -> bool {
        self.blobs.lock().unwrap().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }
}

impl PhotoStore for InMemoryPhotoStore {
    async fn put(&self, key: &str, data: &[u8]) -> Result<(), std::io::Error> {
        self.blobs
            .lock()
            .unwrap()
            .insert(key.to_string(), data.to_vec());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, std::io::Error> {
        self.blobs
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, key.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<(), std::io::Error> {
        self.blobs.lock().unwrap().remove(key);
        Ok(())
    }
}

pub fn person(user_id: Uuid, first: &str, last: &str, relationship: &str, notes: &str) -> Person {
    let now = chrono::Utc::now();
    Person {
        id: Uuid::now_v7(),
        user_id,
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: format!("{}@example.com", first.to_lowercase()),
        phone: "555-0100".to_string(),
        relationship: relationship.to_string(),
        notes: notes.to_string(),
        photo_id: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn photo(user_id: Uuid) -> Photo {
    let id = Uuid::now_v7();
    Photo {
        id,
        user_id,
        memory_id: None,
        storage_key: format!("photos/{id}.jpg"),
        filename: "beach.jpg".to_string(),
        content_type: "image/jpeg".to_string(),
        uploaded_at: chrono::Utc::now(),
    }
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct InMemoryChat {
    turns: Arc<Mutex<Vec<ChatTurn>>>,
    fail: bool,
}

impl InMemoryChat {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn turns(&self) -> Vec<ChatTurn> {
        self.turns.lock().unwrap().clone()
    }
}

impl ChatRepository for InMemoryChat {
    async fn append_exchange(&self, exchange: &ChatExchange) -> Result<(), RepositoryError> {
        if self.fail {
            return Err(RepositoryError::Query("database is locked".to_string()));
        }
        let mut turns = self.turns.lock().unwrap();
        turns.push(exchange.user.clone());
        turns.push(exchange.assistant.clone());
        Ok(())
    }

    async fn history(
        &self,
        user_id: &Uuid,
        limit: Option<u32>,
    ) -> Result<Vec<ChatTurn>, RepositoryError> {
        let turns: Vec<ChatTurn> = self
            .turns
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.user_id == *user_id)
            .cloned()
            .collect();
        let skip = match limit {
            Some(n) => turns.len().saturating_sub(n as usize),
            None => 0,
        };
        Ok(turns.into_iter().skip(skip).collect())
    }
}

/// Provider whose replies are scripted per test. Each scripted result is
/// handed out once.
#[derive(Default)]
pub struct ScriptedProvider {
    completion: Mutex<Option<Result<CompletionResponse, LlmError>>>,
    stream: Mutex<Option<Result<Vec<Result<StreamEvent, LlmError>>, LlmError>>>,
    last_request: Mutex<Option<CompletionRequest>>,
}

impl ScriptedProvider {
    pub fn replying(text: &str) -> Self {
        let provider = Self::default();
        *provider.completion.lock().unwrap() = Some(Ok(CompletionResponse {
            id: "msg_test".to_string(),
            content: text.to_string(),
            model: "test-model".to_string(),
            stop_reason: Some("end_turn".to_string()),
            usage: Usage::default(),
        }));
        provider
    }

    pub fn failing(error: LlmError) -> Self {
        let provider = Self::default();
        *provider.completion.lock().unwrap() = Some(Err(error));
        provider
    }

    pub fn streaming(events: Vec<Result<StreamEvent, LlmError>>) -> Self {
        let provider = Self::default();
        *provider.stream.lock().unwrap() = Some(Ok(events));
        provider
    }

    pub fn refusing_stream(error: LlmError) -> Self {
        let provider = Self::default();
        *provider.stream.lock().unwrap() = Some(Err(error));
        provider
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        *self.last_request.lock().unwrap() = Some(request.clone());
        let scripted = self.completion.lock().unwrap().take();
        scripted.unwrap_or_else(|| Err(LlmError::NotConfigured("no scripted reply".to_string())))
    }

    async fn stream(&self, request: CompletionRequest) -> Result<EventStream, LlmError> {
        *self.last_request.lock().unwrap() = Some(request);
        let scripted = self.stream.lock().unwrap().take();
        let events = scripted
            .unwrap_or_else(|| Err(LlmError::NotConfigured("no scripted stream".to_string())))?;
        Ok(Box::pin(futures_util::stream::iter(events)))
    }
}

pub fn delta(text: &str) -> Result<StreamEvent, LlmError> {
    Ok(StreamEvent::TextDelta {
        text: text.to_string(),
    })
}
