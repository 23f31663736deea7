use async_trait::async_trait;
use shared::models::{Character, Chat, ChatMessage, Role, UpsertCharacterRequest};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

pub mod local;
pub mod postgres;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Clone, Debug)]
pub enum DatabaseConfig {
    /// JSON-file-backed store; `None` keeps everything in memory.
    Local { path: Option<PathBuf> },
    Postgres { url: String },
}

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Entity not found: {0}")]
    NotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

#[async_trait]
pub trait Database: Send + Sync {
    async fn list_characters(&self) -> DbResult<Vec<Character>>;
    async fn get_character(&self, character_id: i32) -> DbResult<Character>;
    async fn create_character(
        &self,
        fields: &UpsertCharacterRequest,
        user_id: &str,
    ) -> DbResult<Character>;
    /// Full replace of the four mutable fields; refreshes `updated_at` and
    /// leaves id, user_id and created_at untouched.
    async fn update_character(
        &self,
        character_id: i32,
        fields: &UpsertCharacterRequest,
    ) -> DbResult<Character>;
    /// Hard delete, cascading over the character's chats and their messages.
    async fn delete_character(&self, character_id: i32) -> DbResult<()>;

    async fn list_chats(&self, character_id: Option<i32>) -> DbResult<Vec<Chat>>;
    async fn get_chat(&self, chat_id: i32) -> DbResult<Chat>;
    async fn create_chat(&self, character_id: i32, user_id: &str, title: &str) -> DbResult<Chat>;

    async fn list_messages(&self, chat_id: i32) -> DbResult<Vec<ChatMessage>>;
    async fn append_message(&self, chat_id: i32, role: Role, content: &str)
    -> DbResult<ChatMessage>;
}

pub async fn connect(config: &DatabaseConfig) -> DbResult<Arc<dyn Database>> {
    match config {
        DatabaseConfig::Local { path } => Ok(Arc::new(local::LocalDatabase::load(path.clone()))),
        DatabaseConfig::Postgres { url } => {
            Ok(Arc::new(postgres::PostgresDatabase::new(url).await?))
        }
    }
}
